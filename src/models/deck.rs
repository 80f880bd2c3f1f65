//! Deck is the portable form of a set of flashcards (no ids, no review state)
use super::flashcard::{Difficulty, Flashcard, validate_deck_name, validate_text};
use crate::error::FieldError;
use serde::{Deserialize, Serialize};

pub const MAX_IMPORT_CARDS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckCard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub flashcards: Vec<DeckCard>,
}

impl Deck {
    pub fn from_flashcards(name: impl Into<String>, cards: &[Flashcard]) -> Self {
        Self {
            name: name.into(),
            flashcards: cards
                .iter()
                .map(|card| DeckCard {
                    front: card.front.clone(),
                    back: card.back.clone(),
                    difficulty: card.difficulty,
                })
                .collect(),
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate_deck_name("name", &self.name, &mut errors);
        if self.flashcards.len() > MAX_IMPORT_CARDS {
            errors.push(FieldError::new(
                "flashcards",
                format!("must contain at most {MAX_IMPORT_CARDS} cards"),
            ));
            return errors;
        }
        for (i, card) in self.flashcards.iter().enumerate() {
            validate_text(&format!("flashcards[{i}].front"), &card.front, &mut errors);
            validate_text(&format!("flashcards[{i}].back"), &card.back, &mut errors);
        }
        errors
    }
}
