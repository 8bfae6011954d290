use serde::Serialize;

use crate::document::Document;
use crate::pipeline::runtime::HighlightSession;
use crate::playback::controller::PlaybackController;
use crate::playback::media::ClockMedia;
use crate::playback::tracker::ManualScheduler;

/// Upper bound on recorded samples; shorter steps are widened to fit.
pub const MAX_TIMELINE_SAMPLES: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSample {
    pub time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_node_id: Option<String>,
}

/// Play `duration` seconds of simulated audio through the full
/// controller/tracker/renderer loop, one frame every `step` seconds,
/// recording the active node after each frame. The step is widened when
/// `duration / step` would exceed [`MAX_TIMELINE_SAMPLES`].
pub fn simulate_playback(
    session: &mut HighlightSession,
    doc: &mut Document,
    duration: f64,
    step: f64,
) -> Vec<TimelineSample> {
    const SOURCE: &str = "simulated://speech";

    if !step.is_finite() || step <= 0.0 || !duration.is_finite() || duration <= 0.0 {
        tracing::warn!(duration, step, "timeline: nothing to simulate");
        return Vec::new();
    }

    let min_step = duration / MAX_TIMELINE_SAMPLES as f64;
    let step = if step < min_step {
        tracing::warn!(
            requested = step,
            used = min_step,
            "timeline: sample step too small, widening"
        );
        min_step
    } else {
        step
    };

    let mut controller = PlaybackController::new(ClockMedia::new().with_source(SOURCE, duration));
    let mut scheduler = ManualScheduler::new();
    controller.play(SOURCE);
    controller.sync();
    session.follow(controller.state(), &mut scheduler);

    let mut samples = Vec::new();
    while let Some(handle) = scheduler.next_frame() {
        if samples.len() >= MAX_TIMELINE_SAMPLES {
            break;
        }
        session.on_frame(doc, &mut scheduler, handle, &controller);
        samples.push(TimelineSample {
            time: controller.current_time(),
            active_node_id: session.active_node_id().map(str::to_string),
        });
        controller.media_mut().advance(step);
        controller.sync();
        session.follow(controller.state(), &mut scheduler);
    }

    session.teardown(doc, &mut scheduler);
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightConfig;
    use crate::document::markdown::render_markdown;
    use crate::pipeline::builder::HighlighterBuilder;
    use crate::types::TranscriptWord;

    #[test]
    fn samples_follow_alignment() {
        let config = HighlightConfig::default();
        let mut doc = render_markdown("one two\n\nthree", &config.root_element_id, &config.layout);
        let highlighter = HighlighterBuilder::new(config).build().expect("build");
        let transcript = vec![
            TranscriptWord::new("one", 0.0, 0.4),
            TranscriptWord::new("two", 0.4, 0.8),
            TranscriptWord::new("three", 1.0, 1.5),
        ];
        let mut session = highlighter.prepare(&mut doc, &transcript);

        let samples = simulate_playback(&mut session, &mut doc, 2.0, 0.25);
        let at = |t: f64| {
            samples
                .iter()
                .find(|s| (s.time - t).abs() < 1e-9)
                .and_then(|s| s.active_node_id.clone())
        };
        assert_eq!(samples.first().map(|s| s.time), Some(0.0));
        assert_eq!(at(0.5).as_deref(), Some("text-node-0"));
        assert_eq!(at(1.25).as_deref(), Some("text-node-1"));
        assert_eq!(at(1.75), None);
        assert!(samples.iter().all(|s| s.time < 2.0));
        assert!(!session.is_tracking());
    }

    #[test]
    fn tiny_step_is_widened_to_sample_cap() {
        let config = HighlightConfig::default();
        let mut doc = render_markdown("one", &config.root_element_id, &config.layout);
        let highlighter = HighlighterBuilder::new(config).build().expect("build");
        let mut session = highlighter.prepare(&mut doc, &[TranscriptWord::new("one", 0.0, 0.5)]);

        let samples = simulate_playback(&mut session, &mut doc, 1.0, 1e-9);
        assert!(!samples.is_empty());
        assert!(samples.len() <= MAX_TIMELINE_SAMPLES);
        assert!(!session.is_tracking());
    }

    #[test]
    fn invalid_step_yields_empty_timeline() {
        let config = HighlightConfig::default();
        let mut doc = render_markdown("one", &config.root_element_id, &config.layout);
        let highlighter = HighlighterBuilder::new(config).build().expect("build");
        let mut session = highlighter.prepare(&mut doc, &[]);
        assert!(simulate_playback(&mut session, &mut doc, 1.0, 0.0).is_empty());
    }
}
