//! Flashcard is a pair <front, back> owned by one user, plus its review state.
use super::ReviewData;
use crate::error::FieldError;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

pub const MAX_TEXT_LEN: usize = 2000;
pub const MAX_DECK_NAME_LEN: usize = 100;
pub const DEFAULT_DECK: &str = "default";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl ToSql for Difficulty {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Difficulty {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Flashcard {
    pub id: i64,
    pub user_id: i64,
    pub deck: String,
    pub front: String,
    pub back: String,
    pub difficulty: Difficulty,
    pub review: ReviewData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl NewFlashcard {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate_text("front", &self.front, &mut errors);
        validate_text("back", &self.back, &mut errors);
        if let Some(deck) = &self.deck {
            validate_deck_name("deck", deck, &mut errors);
        }
        errors
    }

    pub fn deck_name(&self) -> &str {
        self.deck.as_deref().map(str::trim).unwrap_or(DEFAULT_DECK)
    }
}

/// Partial edit; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlashcardUpdate {
    pub front: Option<String>,
    pub back: Option<String>,
    pub deck: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl FlashcardUpdate {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(front) = &self.front {
            validate_text("front", front, &mut errors);
        }
        if let Some(back) = &self.back {
            validate_text("back", back, &mut errors);
        }
        if let Some(deck) = &self.deck {
            validate_deck_name("deck", deck, &mut errors);
        }
        errors
    }
}

/// Review outcome: either a 0-5 quality score or a plain correct/incorrect flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequest {
    pub quality: Option<u8>,
    pub correct: Option<bool>,
}

impl ReviewRequest {
    pub const CORRECT_GRADE: u8 = 4;
    pub const INCORRECT_GRADE: u8 = 1;

    pub fn grade(&self) -> Result<u8, FieldError> {
        match (self.quality, self.correct) {
            (Some(q), _) if q > super::scheduler::MAX_GRADE => Err(FieldError::new(
                "quality",
                format!("must be between 0 and {}", super::scheduler::MAX_GRADE),
            )),
            (Some(q), _) => Ok(q),
            (None, Some(true)) => Ok(Self::CORRECT_GRADE),
            (None, Some(false)) => Ok(Self::INCORRECT_GRADE),
            (None, None) => Err(FieldError::new("quality", "quality or correct is required")),
        }
    }
}

pub fn validate_text(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    } else if value.chars().count() > MAX_TEXT_LEN {
        errors.push(FieldError::new(
            field,
            format!("must be at most {MAX_TEXT_LEN} characters"),
        ));
    }
}

pub fn validate_deck_name(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    } else if value.chars().count() > MAX_DECK_NAME_LEN {
        errors.push(FieldError::new(
            field,
            format!("must be at most {MAX_DECK_NAME_LEN} characters"),
        ));
    }
}
