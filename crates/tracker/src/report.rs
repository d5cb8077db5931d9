//! Duration formatting, weekly totals, and CSV export.

use chrono::{DateTime, Duration, Local, Utc};
use entities::Shift;

/// Formats a duration as `HH:MM:SS`. Negative durations (clock skew)
/// render as zero.
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Total hours worked over the last seven local calendar days, counting
/// today. An open shift started today contributes its running duration.
pub fn week_hours(shifts: &[Shift], now: DateTime<Utc>) -> f64 {
    let window_start = now.with_timezone(&Local).date_naive() - Duration::days(6);
    let mut total = Duration::zero();
    for shift in shifts {
        let start_day = shift.start_time.with_timezone(&Local).date_naive();
        if start_day < window_start {
            continue;
        }
        if shift.end_time.is_some() || shift.started_same_day(now) {
            total += shift.duration_at(now);
        }
    }
    total.num_seconds().max(0) as f64 / 3600.0
}

/// How a shift's end renders in a report row.
fn end_marker(shift: &Shift, now: DateTime<Utc>) -> String {
    match shift.end_time {
        Some(end) => end.with_timezone(&Local).format("%H:%M:%S").to_string(),
        // Open and started today means still on the clock; open and older
        // means the clock-out never happened.
        None if shift.started_same_day(now) => "Active".to_string(),
        None => "Missing".to_string(),
    }
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Renders a user's shift history as CSV: a UTF-8 BOM (so spreadsheet
/// applications detect the encoding), a header row, then one quoted row per
/// shift. Open shifts carry a `-` duration.
pub fn shifts_to_csv(user_name: &str, shifts: &[Shift], now: DateTime<Utc>) -> String {
    let mut out = String::from("\u{feff}");
    out.push_str("\"Name\",\"Date\",\"Clock In\",\"Clock Out\",\"Duration\",\"Note\"\n");

    for shift in shifts {
        let local_start = shift.start_time.with_timezone(&Local);
        let duration = match shift.end_time {
            Some(_) => format_duration(shift.duration_at(now)),
            None => "-".to_string(),
        };
        let row = [
            csv_cell(user_name),
            csv_cell(&local_start.format("%Y-%m-%d").to_string()),
            csv_cell(&local_start.format("%H:%M:%S").to_string()),
            csv_cell(&end_marker(shift, now)),
            csv_cell(&duration),
            csv_cell(shift.note.as_deref().unwrap_or("")),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}
