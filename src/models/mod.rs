pub mod deck;
pub mod flashcard;
pub mod review_data;
pub mod scheduler;
pub mod user;

pub use deck::{Deck, DeckCard};
pub use flashcard::{Difficulty, Flashcard, FlashcardUpdate, NewFlashcard, ReviewRequest};
pub use review_data::ReviewData;
pub use scheduler::SchedulerConfig;
pub use user::{Role, User, UserResponse};
