pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use api::{AppState, router};
pub use database::Store;
pub use error::{AppError, Result};
pub use models::{Deck, Flashcard, ReviewData, Role, User};
