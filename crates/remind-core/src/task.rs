//! Scheduled task model and minute-resolution time helpers.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format used when echoing a due time back to users (`01.01.2022 20:00`).
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Format used when persisting a due time.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Drop seconds and sub-second precision so minute lookups can match by equality.
pub fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// Render a due time the way the store keeps it.
pub fn to_storage(at: NaiveDateTime) -> String {
    at.format(STORAGE_FORMAT).to_string()
}

/// Parse a due time read back from the store.
pub fn from_storage(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, STORAGE_FORMAT).ok()
}

/// A reminder that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub chat_id: i64,
    pub text: String,
    pub due_at: NaiveDateTime,
}

impl NewTask {
    /// Build a task, truncating `due_at` to the minute.
    pub fn new(chat_id: i64, text: impl Into<String>, due_at: NaiveDateTime) -> Self {
        Self {
            chat_id,
            text: text.into(),
            due_at: truncate_to_minute(due_at),
        }
    }
}

/// A stored reminder. Never mutated; it is delivered and then deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Record key assigned by the store.
    pub id: i64,
    /// Destination chat.
    pub chat_id: i64,
    pub text: String,
    /// Minute-truncated local time.
    pub due_at: NaiveDateTime,
}

impl Task {
    pub fn from_new(id: i64, new: NewTask) -> Self {
        Self {
            id,
            chat_id: new.chat_id,
            text: new.text,
            due_at: truncate_to_minute(new.due_at),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (due {})",
            self.text,
            self.due_at.format(DISPLAY_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn test_truncate_drops_seconds_and_millis() {
        assert_eq!(truncate_to_minute(at(20, 0, 59, 999)), at(20, 0, 0, 0));
        assert_eq!(truncate_to_minute(at(20, 0, 0, 0)), at(20, 0, 0, 0));
    }

    #[test]
    fn test_new_task_truncates_due_at() {
        let task = NewTask::new(42, "x", at(8, 15, 33, 120));
        assert_eq!(task.due_at, at(8, 15, 0, 0));
    }

    #[test]
    fn test_storage_format() {
        let s = to_storage(at(20, 0, 0, 0));
        assert_eq!(s, "2022-01-01 20:00:00");
        assert_eq!(from_storage(&s), Some(at(20, 0, 0, 0)));
        assert_eq!(from_storage("not a date"), None);
    }

    #[test]
    fn test_display_echoes_text_and_due_time() {
        let new = NewTask::new(7, "01.01.2022 20:00 Wash dishes", at(20, 0, 0, 0));
        let task = Task::from_new(1, new);
        assert_eq!(
            task.to_string(),
            "01.01.2022 20:00 Wash dishes (due 01.01.2022 20:00)"
        );
    }
}
