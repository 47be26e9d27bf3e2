//! Text formatting helpers for session output

use std::path::Path;

use chrono::TimeDelta;

/// Formats an elapsed time as `[D days, ]H:MM:SS.micros`
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let elapsed = if elapsed < TimeDelta::zero() { TimeDelta::zero() } else { elapsed };

    let days = elapsed.num_days();
    let seconds = elapsed.num_seconds() - days * 86_400;
    let micros = (elapsed - TimeDelta::seconds(elapsed.num_seconds()))
        .num_microseconds()
        .unwrap_or(0);

    let clock = format!(
        "{}:{:02}:{:02}.{:06}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60,
        micros
    );

    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

/// Renders a path as a quoted, escaped string that can be pasted into JSON
pub fn quote_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    serde_json::to_string(text.as_ref()).unwrap_or_else(|_| format!("\"{}\"", text))
}
