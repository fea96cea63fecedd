pub mod check;
pub mod completions;
pub mod man_pages;
pub mod normalize;

use canonjson_core::{run_batch, BatchReport, Config, FailureKind, FileOutcome, FileStatus, Mode};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;
pub const EXIT_PARSE_ERROR: u8 = 3;
pub const EXIT_IO_ERROR: u8 = 4;
pub const EXIT_INTERRUPTED: u8 = 130;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn colorize_status(status: &str) -> String {
    use console::Style;
    match status {
        "rewritten" => Style::new().green().apply_to(status).to_string(),
        "unchanged" => Style::new().dim().apply_to(status).to_string(),
        "would_rewrite" => Style::new().yellow().apply_to(status).to_string(),
        "failed" => Style::new().red().bold().apply_to(status).to_string(),
        other => other.to_owned(),
    }
}

/// Inputs given on the command line win; otherwise the configured patterns.
pub fn resolve_inputs(
    config_path: Option<&Path>,
    inputs: Vec<String>,
    sort_keys: bool,
) -> Result<(Vec<String>, bool), String> {
    let cwd = std::env::current_dir().map_err(|e| format!("config: current directory: {e}"))?;
    let config = Config::resolve(config_path, &cwd).map_err(|e| format!("config: {e}"))?;
    let inputs = if inputs.is_empty() {
        config.patterns
    } else {
        inputs
    };
    let sort_keys = sort_keys || config.sort_keys;
    debug!("inputs: {inputs:?}, sort_keys: {sort_keys}");
    Ok((inputs, sort_keys))
}

/// Map an aggregate report to a process exit code. I/O failures dominate
/// parse failures; an interrupted run dominates both.
pub fn report_exit_code(report: &BatchReport) -> u8 {
    if report.interrupted {
        EXIT_INTERRUPTED
    } else if report.has_failure(FailureKind::Io) {
        EXIT_IO_ERROR
    } else if report.has_failure(FailureKind::Parse) {
        EXIT_PARSE_ERROR
    } else if report.would_rewrite() > 0 {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

fn outcome_json(outcome: &FileOutcome) -> serde_json::Value {
    let mut entry = serde_json::json!({
        "path": outcome.path.display().to_string(),
        "status": outcome.status.as_str(),
    });
    if let Some(digest) = &outcome.digest {
        entry["digest"] = serde_json::Value::from(digest.as_str());
    }
    if let FileStatus::Failed { kind, reason } = &outcome.status {
        entry["error"] = serde_json::json!({ "kind": kind.as_str(), "reason": reason });
    }
    entry
}

/// Expand `inputs` and process them, with a spinner unless JSON output is requested.
pub fn execute_batch(
    inputs: &[String],
    mode: Mode,
    sort_keys: bool,
    json: bool,
) -> Result<BatchReport, String> {
    let verb = match mode {
        Mode::Rewrite => "normalizing",
        Mode::Check => "checking",
    };
    let pb = (!json).then(|| spinner(&format!("{verb} {}...", inputs.join(" "))));
    match run_batch(inputs, mode, sort_keys) {
        Ok(report) => {
            if let Some(pb) = &pb {
                let msg = format!("{} files processed", report.checked());
                if report.failed() == 0 {
                    spin_ok(pb, &msg);
                } else {
                    spin_fail(pb, &msg);
                }
            }
            Ok(report)
        }
        Err(e) => {
            if let Some(pb) = &pb {
                spin_fail(pb, "aborted");
            }
            Err(e.to_string())
        }
    }
}

pub fn report_json(report: &BatchReport) -> serde_json::Value {
    serde_json::json!({
        "checked": report.checked(),
        "rewritten": report.rewritten(),
        "unchanged": report.unchanged(),
        "would_rewrite": report.would_rewrite(),
        "failed": report.failed(),
        "interrupted": report.interrupted,
        "files": report.outcomes.iter().map(outcome_json).collect::<Vec<_>>(),
    })
}

/// One line per file that is not already canonical; failure reasons go to stderr.
pub fn print_outcomes(report: &BatchReport) {
    for outcome in &report.outcomes {
        match &outcome.status {
            FileStatus::Unchanged => {}
            FileStatus::Failed { kind, reason } => {
                println!(
                    "{} {} ({})",
                    colorize_status(outcome.status.as_str()),
                    outcome.path.display(),
                    kind.as_str()
                );
                eprintln!("error: {reason}");
            }
            status => println!(
                "{} {}",
                colorize_status(status.as_str()),
                outcome.path.display()
            ),
        }
    }
}
