use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use speech_highlight::{
    compute_report, load_transcript, render_markdown, simulate_playback, HighlightConfig,
    HighlightSession, HighlighterBuilder, Meta,
};
use tracing_subscriber::EnvFilter;

#[path = "highlight_report/json_report_formatter.rs"]
mod json_report_formatter;

#[derive(Debug, Parser)]
#[command(name = "highlight_report")]
#[command(about = "Align a speech transcript with rendered Markdown and report highlight coverage")]
struct Args {
    /// Markdown file whose rendering is read aloud.
    #[arg(long, env = "SPEECH_HIGHLIGHT_MARKDOWN")]
    markdown: PathBuf,
    /// Transcript JSON: `[{word, start, end}]` or `{"words": [...]}`.
    #[arg(long, env = "SPEECH_HIGHLIGHT_TRANSCRIPT")]
    transcript: PathBuf,
    #[arg(long, env = "SPEECH_HIGHLIGHT_CONFIG")]
    config: Option<PathBuf>,
    /// Report file or directory; stdout when omitted.
    #[arg(long, env = "SPEECH_HIGHLIGHT_OUT")]
    out: Option<PathBuf>,
    /// Seconds between simulated frames.
    #[arg(
        long,
        env = "SPEECH_HIGHLIGHT_SAMPLE_STEP",
        default_value_t = 0.1,
        value_parser = parse_sample_step
    )]
    sample_step: f64,
    /// Skip the simulated playback timeline.
    #[arg(long, default_value_t = false)]
    no_timeline: bool,
}

const MIN_SAMPLE_STEP_SECS: f64 = 0.001;

fn parse_sample_step(raw: &str) -> Result<f64, String> {
    let step: f64 = raw
        .parse()
        .map_err(|err| format!("'{raw}' is not a number: {err}"))?;
    if !step.is_finite() || step < MIN_SAMPLE_STEP_SECS {
        return Err(format!(
            "sample step must be at least {MIN_SAMPLE_STEP_SECS} seconds, got {raw}"
        ));
    }
    Ok(step)
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => HighlightConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => HighlightConfig::default(),
    };
    let markdown = fs::read_to_string(&args.markdown).map_err(|err| {
        format!(
            "Failed to read markdown '{}': {err}",
            args.markdown.display()
        )
    })?;
    let transcript = load_transcript(&args.transcript).map_err(|err| {
        format!(
            "Failed to load transcript '{}': {err}",
            args.transcript.display()
        )
    })?;

    let highlighter = HighlighterBuilder::new(config.clone())
        .build()
        .map_err(|err| format!("Invalid highlight configuration: {err}"))?;

    let mut doc = render_markdown(&markdown, &config.root_element_id, &config.layout);
    let nodes = highlighter.scan(&mut doc);
    let output = highlighter.align(&transcript, nodes);

    let timeline = if args.no_timeline {
        Vec::new()
    } else {
        let duration = transcript.last().map(|w| w.end).unwrap_or(0.0) + args.sample_step;
        let mut session = HighlightSession::new(output.clone(), &config);
        simulate_playback(&mut session, &mut doc, duration, args.sample_step)
    };

    let meta = Meta {
        generated_at: Utc::now().to_rfc3339(),
        source: args.markdown.display().to_string(),
        root_element_id: config.root_element_id.clone(),
        leeway_secs: config.leeway_secs,
        transcript_word_count: transcript.len(),
        node_count: output.nodes.len(),
    };
    let report = compute_report(meta, &transcript, &output, timeline);

    tracing::info!(
        nodes = report.meta.node_count,
        matched = report.coverage.matched_word_count,
        rendered_words = report.coverage.dom_word_count,
        coverage = format!("{:.3}", report.coverage.coverage_ratio),
        "highlight_report: alignment complete"
    );

    match args.out.as_ref() {
        Some(out) => {
            let path = json_report_formatter::write_report(out, &report)?;
            tracing::info!(path = %path.display(), "highlight_report: report written");
            Ok(())
        }
        None => json_report_formatter::print_report(&report),
    }
}
