pub mod anki;
pub mod parse;

pub use parse::parse_flashcards;
