use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use speech_highlight::Report;

/// File name used when `--out` points at a directory. Carries the schema
/// version so reports of different layouts never overwrite each other.
pub fn default_file_name(report: &Report) -> String {
    format!("highlight-report.v{}.json", report.schema_version)
}

/// Where a report for `out` lands: `out` itself, or the versioned default
/// name inside it when `out` is an existing directory.
pub fn resolve_output_path(out: &Path, report: &Report) -> PathBuf {
    if out.is_dir() {
        out.join(default_file_name(report))
    } else {
        out.to_path_buf()
    }
}

/// Pretty JSON with a trailing newline.
pub fn render_report(report: &Report) -> Result<String, String> {
    let mut json = serde_json::to_string_pretty(report).map_err(|err| {
        format!(
            "Failed to serialize report (schema v{}): {err}",
            report.schema_version
        )
    })?;
    json.push('\n');
    Ok(json)
}

/// Returns the path actually written.
pub fn write_report(out: &Path, report: &Report) -> Result<PathBuf, String> {
    let path = resolve_output_path(out, report);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create '{}': {err}", parent.display()))?;
    }
    let json = render_report(report)?;
    fs::write(&path, json).map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
    Ok(path)
}

pub fn print_report(report: &Report) -> Result<(), String> {
    let json = render_report(report)?;
    io::stdout()
        .lock()
        .write_all(json.as_bytes())
        .map_err(|err| format!("Failed to write report to stdout: {err}"))
}
