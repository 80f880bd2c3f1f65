//! Spaced repetition scheduling (SM-2 derived).
//!
//! Each card carries an ease factor (EF) that is adjusted on every review:
//! - Grades 0-2 fail: repetitions reset to 0 and the interval drops to the minimum
//! - Grades 3-5 pass: the interval grows 1 day -> 6 days -> previous interval * EF
//! - EF never falls below `min_ease` (1.3 by default)
//!
//! All constants live in [`SchedulerConfig`] so a deployment can tune them
//! without touching the arithmetic.

use super::ReviewData;
use chrono::{DateTime, Duration, Utc};

/// Highest accepted review grade
pub const MAX_GRADE: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerConfig {
    pub initial_ease: f64,
    pub min_ease: f64,
    /// Lowest grade that counts as a successful recall
    pub passing_grade: u8,
    pub first_interval_days: i32,
    pub second_interval_days: i32,
    pub min_interval_days: i32,
    pub max_interval_days: i32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            min_ease: 1.3,
            passing_grade: 3,
            first_interval_days: 1,
            second_interval_days: 6,
            min_interval_days: 1,
            max_interval_days: 36_500,
        }
    }
}

/// Calculates the scheduling state that follows a review.
/// quality: 0-5 (0 = complete blackout, 5 = perfect response)
pub fn calculate_next_review(
    review_data: &ReviewData,
    quality: u8,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> ReviewData {
    let quality = quality.min(MAX_GRADE);

    let q = quality as f64;
    let new_ef = (review_data.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)))
        .max(config.min_ease);

    let (new_interval, new_repetitions) = if quality < config.passing_grade {
        (config.min_interval_days, 0)
    } else {
        let new_reps = review_data.repetitions + 1;
        let new_int = match new_reps {
            1 => config.first_interval_days,
            2 => config.second_interval_days,
            _ => {
                // A card with repetitions but no stored interval restarts from the first step.
                let prior = review_data.interval_days.max(config.first_interval_days);
                (prior as f64 * new_ef).round() as i32
            }
        };
        (
            new_int.clamp(config.min_interval_days, config.max_interval_days),
            new_reps,
        )
    };

    ReviewData {
        flashcard_id: review_data.flashcard_id,
        ease_factor: new_ef,
        interval_days: new_interval,
        repetitions: new_repetitions,
        next_review_date: now + Duration::days(new_interval as i64),
        last_reviewed_at: Some(now),
    }
}
