use std::path::Path;

use crate::error::Result;
use crate::podcast::PodcastDb;

/// Dump the schema of the two tables the other commands rely on, then
/// list listened episodes grouped by podcast. Debugging aid for new
/// Podcast Addict exports.
pub fn run(database: &Path) -> Result<()> {
    let db = PodcastDb::open(database)?;

    println!("Columns in 'podcasts' table:");
    for column in db.table_columns("podcasts")? {
        println!(" - {} ({})", column.name, column.type_name);
    }

    println!();
    println!("Columns in 'episodes' table:");
    for column in db.table_columns("episodes")? {
        println!(" - {} ({})", column.name, column.type_name);
    }

    // The query is ordered by podcast name, so a plain scan groups rows
    let mut current: Option<String> = None;
    for (podcast, episode) in db.listened_by_podcast()? {
        if current.as_deref() != Some(podcast.as_str()) {
            println!();
            println!("Podcast: {}", podcast);
            current = Some(podcast);
        }
        println!(" - {}", episode);
    }

    Ok(())
}
