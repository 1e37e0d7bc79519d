//! Note record

use chrono::Utc;

/// Category identifier meaning "no category"
pub const UNCATEGORIZED: i64 = 0;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A single user note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Milliseconds since epoch
    pub create_time: i64,
    /// Milliseconds since epoch, never earlier than `create_time`
    pub modify_time: i64,
    pub category_id: i64,
}

impl Note {
    /// Create a note that has not been stored yet (id 0 lets the store assign one)
    pub fn new(title: impl Into<String>, content: impl Into<String>, now: i64) -> Self {
        Note {
            id: 0,
            title: title.into(),
            content: content.into(),
            create_time: now,
            modify_time: now,
            category_id: UNCATEGORIZED,
        }
    }

    /// Record a modification at `now`.
    ///
    /// The modify time is clamped so it never goes behind the create time,
    /// even when the clock runs backwards.
    pub fn touch(&mut self, now: i64) {
        self.modify_time = now.max(self.create_time);
    }

    pub fn is_categorized(&self) -> bool {
        self.category_id != UNCATEGORIZED
    }
}
