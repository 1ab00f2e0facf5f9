use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use super::meeting::MeetingStatus;

/// Turn a heterogeneous date encoding into a concrete instant.
///
/// The API is not consistent about how it ships timestamps: a field may be
/// a bare RFC 3339 string, a Mongo-style `{"$date": ...}` wrapper (around a
/// string or epoch milliseconds), or a raw millisecond number. Anything that
/// cannot be interpreted yields `None`; this never panics.
pub fn normalize(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Null => None,
        Value::String(s) => parse_datetime(s),
        Value::Object(map) => map.get("$date").and_then(normalize),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite-style datetime (e.g. "2026-01-11 12:34:56")
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

/// Elapsed-duration label for the meeting header.
///
/// A completed meeting with no recorded end time is assumed to have run for
/// an hour; that is a documented fallback, not a measurement. Any other
/// status without an end time reads as still ongoing.
pub fn duration_label(created_at: &Value, ended_at: &Value, status: MeetingStatus) -> String {
    let Some(created) = normalize(created_at) else {
        return "N/A".to_string();
    };

    let end = match normalize(ended_at) {
        Some(end) => end,
        None if status == MeetingStatus::Completed => created + chrono::Duration::hours(1),
        None => return "Ongoing".to_string(),
    };

    let secs = (end - created).num_seconds();
    if secs <= 0 {
        return "N/A".to_string();
    }

    let total_minutes = secs / 60;
    if total_minutes > 60 {
        format!("{}h {}m", total_minutes / 60, total_minutes % 60)
    } else {
        format!("{}m", total_minutes)
    }
}

/// Long-form date for display, or "N/A" when the value is unusable.
pub fn display_date(value: &Value) -> String {
    normalize(value)
        .map(|dt| dt.format("%B %-d, %Y %I:%M %p").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrapped_and_bare_strings_normalize_identically() {
        let bare = json!("2024-01-01T10:00:00Z");
        let wrapped = json!({ "$date": "2024-01-01T10:00:00Z" });
        assert_eq!(normalize(&bare), normalize(&wrapped));
        assert!(normalize(&bare).is_some());
    }

    #[test]
    fn epoch_millis_normalize() {
        let millis = json!(1_704_103_200_000i64);
        let wrapped = json!({ "$date": 1_704_103_200_000i64 });
        assert_eq!(normalize(&millis), normalize(&wrapped));
        assert!(normalize(&millis).is_some());
    }

    #[test]
    fn sqlite_style_datetime_parses() {
        assert!(normalize(&json!("2026-01-11 12:34:56")).is_some());
    }

    #[test]
    fn garbage_is_invalid_not_a_panic() {
        assert_eq!(normalize(&Value::Null), None);
        assert_eq!(normalize(&json!("not a date")), None);
        assert_eq!(normalize(&json!(["2024-01-01"])), None);
        assert_eq!(normalize(&json!({ "date": "2024-01-01T10:00:00Z" })), None);
        assert_eq!(normalize(&json!(true)), None);
    }

    #[test]
    fn completed_without_end_assumes_one_hour() {
        let created = json!("2024-01-01T10:00:00Z");
        assert_eq!(
            duration_label(&created, &Value::Null, MeetingStatus::Completed),
            "60m"
        );
    }

    #[test]
    fn explicit_end_gives_hours_and_minutes() {
        let created = json!("2024-01-01T10:00:00Z");
        let ended = json!("2024-01-01T11:30:00Z");
        assert_eq!(
            duration_label(&created, &ended, MeetingStatus::Completed),
            "1h 30m"
        );
    }

    #[test]
    fn short_meeting_omits_hours() {
        let created = json!("2024-01-01T10:00:00Z");
        let ended = json!("2024-01-01T10:45:00Z");
        assert_eq!(
            duration_label(&created, &ended, MeetingStatus::Completed),
            "45m"
        );
    }

    #[test]
    fn in_progress_meeting_is_ongoing() {
        let created = json!("2024-01-01T10:00:00Z");
        assert_eq!(
            duration_label(&created, &Value::Null, MeetingStatus::Recording),
            "Ongoing"
        );
    }

    #[test]
    fn missing_created_at_is_na() {
        assert_eq!(
            duration_label(&Value::Null, &Value::Null, MeetingStatus::Completed),
            "N/A"
        );
    }

    #[test]
    fn non_positive_duration_is_na() {
        let created = json!("2024-01-01T10:00:00Z");
        let ended = json!("2024-01-01T09:00:00Z");
        assert_eq!(
            duration_label(&created, &ended, MeetingStatus::Completed),
            "N/A"
        );
        assert_eq!(
            duration_label(&created, &created, MeetingStatus::Completed),
            "N/A"
        );
    }

    #[test]
    fn display_date_formats_or_falls_back() {
        assert_eq!(
            display_date(&json!("2024-01-01T10:00:00Z")),
            "January 1, 2024 10:00 AM"
        );
        assert_eq!(display_date(&Value::Null), "N/A");
    }
}
