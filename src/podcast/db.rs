use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// An episode the user has already listened to (seen_status = 1)
#[derive(Debug, Clone)]
pub struct ListenedEpisode {
    pub name: String,
    pub guid: String,
    pub podcast_id: i64,
}

/// One column of a table, as reported by PRAGMA table_info
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub type_name: String,
}

/// Read-only view over a Podcast Addict database export
pub struct PodcastDb {
    conn: Connection,
}

impl PodcastDb {
    /// Open the database read-only. The app's export is never written to.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(PodcastDb { conn })
    }

    /// Episodes marked as listened. Rows without a guid are skipped:
    /// they cannot be matched against a feed.
    pub fn listened_episodes(&self) -> Result<Vec<ListenedEpisode>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, guid, podcast_id FROM episodes WHERE seen_status = 1",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut episodes = Vec::new();
        for row in rows {
            let (name, guid, podcast_id) = row?;
            let guid = match guid {
                Some(g) if !g.is_empty() => g,
                _ => continue,
            };
            episodes.push(ListenedEpisode {
                name: name.unwrap_or_else(|| "Untitled episode".to_string()),
                guid,
                podcast_id,
            });
        }
        Ok(episodes)
    }

    /// Map of podcast _id to its RSS feed URL
    pub fn feed_urls(&self) -> Result<HashMap<i64, String>> {
        let mut stmt = self.conn.prepare("SELECT _id, rssUrl FROM podcasts")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut urls = HashMap::new();
        for row in rows {
            let (id, url) = row?;
            if let Some(url) = url {
                if !url.is_empty() {
                    urls.insert(id, url);
                }
            }
        }
        Ok(urls)
    }

    /// Column listing for a table. Table names cannot be bound as
    /// parameters; callers pass fixed identifiers only.
    pub fn table_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", table))?;
        let rows = stmt.query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get(1)?,
                type_name: row.get(2)?,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    /// Listened episodes joined to their podcast names, ordered by podcast
    pub fn listened_by_podcast(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT podcasts.name, episodes.name
             FROM episodes
             JOIN podcasts ON episodes.podcast_id = podcasts._id
             WHERE episodes.seen_status = 1
             ORDER BY podcasts.name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
            ))
        })?;

        let mut pairs = Vec::new();
        for row in rows {
            let (podcast, episode) = row?;
            pairs.push((
                podcast.unwrap_or_else(|| "Untitled podcast".to_string()),
                episode.unwrap_or_else(|| "Untitled episode".to_string()),
            ));
        }
        Ok(pairs)
    }
}
