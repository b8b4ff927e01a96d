use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cards::parse::Flashcard;
use crate::error::Result;

/// Escape a note field for Anki's tab-separated import format.
/// Double quotes are doubled; a field containing a separator or quote
/// is wrapped in double quotes so Anki reads it as one field.
pub fn escape_field(field: &str) -> String {
    let escaped = field.replace('"', "\"\"");
    if escaped.contains(['\n', '\r', '\t', ';', ',', '"']) {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}

/// Write flashcards as an Anki-importable text file: an optional
/// `tags:` header line, then one question<TAB>answer line per card.
pub fn write_deck(path: &Path, cards: &[Flashcard], tags: &str) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    if !tags.is_empty() {
        writeln!(out, "tags:{}", tags)?;
    }
    for card in cards {
        writeln!(
            out,
            "{}\t{}",
            escape_field(&card.question),
            escape_field(&card.answer)
        )?;
    }
    out.flush()?;
    Ok(())
}
