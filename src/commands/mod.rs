pub mod download;
pub mod flashcards;
pub mod inspect;
