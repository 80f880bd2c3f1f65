//! Spaced-repetition state of a single flashcard.
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReviewData {
    #[serde(skip)]
    pub flashcard_id: i64,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    pub next_review_date: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewData {
    /// State of a card that has never been reviewed: due immediately.
    pub fn initial(flashcard_id: i64, ease_factor: f64, now: DateTime<Utc>) -> Self {
        Self {
            flashcard_id,
            ease_factor,
            interval_days: 0,
            repetitions: 0,
            next_review_date: now,
            last_reviewed_at: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }
}
