//! JSON import/export module for flashcard decks.
//! Saves and loads the portable [`Deck`] form to/from JSON files.

use crate::error::Result;
use crate::models::Deck;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Exports a deck to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_json_to_path(deck: &Deck, path: impl AsRef<Path>) -> Result<()> {
    let json_string = serde_json::to_string_pretty(deck)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json_string.as_bytes())?;
    tracing::info!(
        deck = %deck.name,
        cards = deck.flashcards.len(),
        path = %path.as_ref().display(),
        "deck exported"
    );
    Ok(())
}

/// Imports a deck from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json(path: impl AsRef<Path>) -> Result<Deck> {
    let file = File::open(path.as_ref())?;
    let deck: Deck = serde_json::from_reader(BufReader::new(file))?;

    tracing::info!(deck = %deck.name, path = %path.as_ref().display(), "deck read");
    Ok(deck)
}
