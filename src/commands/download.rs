use log::{error, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::podcast::{feed, opml, ListenedEpisode, PodcastDb};
use crate::utils::fs::{audio_extension, ensure_dir, sanitize_component};

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub database: PathBuf,
    pub opml: PathBuf,
    pub out_dir: PathBuf,
}

#[derive(Debug, Default)]
struct Totals {
    downloaded: u32,
    skipped: u32,
    failed: u32,
}

pub fn run(options: DownloadOptions) -> Result<()> {
    // 1. Output directory
    ensure_dir(&options.out_dir)?;

    // 2. Listened episodes and the feed URL map from the database
    let db = PodcastDb::open(&options.database)?;
    let episodes = db.listened_episodes()?;
    let feed_urls = db.feed_urls()?;

    // 3. Subscribed feeds from the OPML export
    let subscribed = opml::feed_urls(&options.opml)?;

    // 4. Keep episodes whose podcast is still subscribed, grouped per feed
    //    so each feed is fetched exactly once
    let by_feed = group_by_feed(episodes, &feed_urls, &subscribed);
    if by_feed.is_empty() {
        println!("Nothing to download.");
        return Ok(());
    }

    // 5. Fetch each feed and download the matching episodes. A failing
    //    feed is logged and the run continues with the next one.
    let mut totals = Totals::default();
    for (rss_url, episodes) in &by_feed {
        if let Err(e) = process_feed(rss_url, episodes, &options.out_dir, &mut totals) {
            error!("Failed to process feed {}: {}", rss_url, e);
            totals.failed += episodes.len() as u32;
        }
    }

    println!(
        "Done: {} downloaded, {} already present, {} failed.",
        totals.downloaded, totals.skipped, totals.failed
    );
    Ok(())
}

/// Match listened episodes to their RSS URL, dropping podcasts that are
/// no longer in the OPML subscription list. BTreeMap keeps feed order
/// stable between runs.
fn group_by_feed(
    episodes: Vec<ListenedEpisode>,
    feed_urls: &HashMap<i64, String>,
    subscribed: &HashSet<String>,
) -> BTreeMap<String, Vec<ListenedEpisode>> {
    let mut by_feed: BTreeMap<String, Vec<ListenedEpisode>> = BTreeMap::new();
    for episode in episodes {
        if let Some(rss_url) = feed_urls.get(&episode.podcast_id) {
            if subscribed.contains(rss_url) {
                by_feed.entry(rss_url.clone()).or_default().push(episode);
            }
        }
    }
    by_feed
}

fn fetch_channel(rss_url: &str) -> Result<feed::Channel> {
    let response = ureq::get(rss_url).call()?;
    let mut body = String::new();
    response.into_reader().read_to_string(&mut body)?;
    feed::parse(&body)
}

fn process_feed(
    rss_url: &str,
    episodes: &[ListenedEpisode],
    out_dir: &Path,
    totals: &mut Totals,
) -> Result<()> {
    let channel = fetch_channel(rss_url)?;
    let podcast_title = if channel.title.is_empty() {
        "Untitled podcast".to_string()
    } else {
        sanitize_component(&channel.title)
    };
    println!("Processing podcast: {}", podcast_title);

    let podcast_dir = out_dir.join(&podcast_title);
    ensure_dir(&podcast_dir)?;

    let listened: HashMap<&str, &ListenedEpisode> =
        episodes.iter().map(|ep| (ep.guid.as_str(), ep)).collect();

    for entry in &channel.entries {
        let guid = match entry.guid.as_deref() {
            Some(g) => g,
            None => continue,
        };
        let episode = match listened.get(guid) {
            Some(ep) => *ep,
            None => continue,
        };

        match download_entry(entry, episode, &podcast_dir) {
            Ok(Outcome::Downloaded) => totals.downloaded += 1,
            Ok(Outcome::AlreadyPresent) => totals.skipped += 1,
            Ok(Outcome::NoAudio) => {
                warn!("No audio link found for episode: {}", episode.name);
                totals.failed += 1;
            }
            Err(e) => {
                error!("Failed to download {}: {}", episode.name, e);
                totals.failed += 1;
            }
        }
    }
    Ok(())
}

enum Outcome {
    Downloaded,
    AlreadyPresent,
    NoAudio,
}

fn download_entry(
    entry: &feed::Entry,
    episode: &ListenedEpisode,
    podcast_dir: &Path,
) -> Result<Outcome> {
    let enclosure = match entry.audio_enclosure() {
        Some(enc) => enc,
        None => return Ok(Outcome::NoAudio),
    };

    let filename = format!(
        "{}.{}",
        sanitize_component(&episode.name),
        audio_extension(&enclosure.url)
    );
    let file_path = podcast_dir.join(&filename);

    if file_path.exists() {
        println!("Episode already downloaded: {}", episode.name);
        return Ok(Outcome::AlreadyPresent);
    }

    match entry.published {
        Some(date) => println!("Downloading: {} ({})", episode.name, date.format("%Y-%m-%d")),
        None => println!("Downloading: {}", episode.name),
    }

    let response = ureq::get(&enclosure.url).call()?;
    let mut reader = response.into_reader();
    let mut file = File::create(&file_path)?;
    if let Err(e) = io::copy(&mut reader, &mut file) {
        // Do not leave a truncated episode behind
        drop(file);
        let _ = std::fs::remove_file(&file_path);
        return Err(e.into());
    }

    println!("Downloaded: {}", episode.name);
    Ok(Outcome::Downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn episode(name: &str, guid: &str, podcast_id: i64) -> ListenedEpisode {
        ListenedEpisode {
            name: name.to_string(),
            guid: guid.to_string(),
            podcast_id,
        }
    }

    #[test]
    fn test_group_by_feed_filters_unsubscribed() {
        let episodes = vec![
            episode("Rome Falls", "guid-rome", 1),
            episode("Quarks", "guid-quark", 2),
            episode("Orphan", "guid-orphan", 99),
        ];
        let mut feed_urls = HashMap::new();
        feed_urls.insert(1, "https://example.com/history.xml".to_string());
        feed_urls.insert(2, "https://example.com/science.xml".to_string());

        let mut subscribed = HashSet::new();
        subscribed.insert("https://example.com/history.xml".to_string());

        let by_feed = group_by_feed(episodes, &feed_urls, &subscribed);

        assert_eq!(by_feed.len(), 1);
        let history = &by_feed["https://example.com/history.xml"];
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].guid, "guid-rome");
    }

    #[test]
    fn test_group_by_feed_groups_same_podcast() {
        let episodes = vec![
            episode("Ep 1", "g1", 1),
            episode("Ep 2", "g2", 1),
        ];
        let mut feed_urls = HashMap::new();
        feed_urls.insert(1, "https://example.com/history.xml".to_string());
        let subscribed: HashSet<String> = feed_urls.values().cloned().collect();

        let by_feed = group_by_feed(episodes, &feed_urls, &subscribed);

        assert_eq!(by_feed.len(), 1);
        assert_eq!(by_feed["https://example.com/history.xml"].len(), 2);
    }

    #[test]
    fn test_group_by_feed_empty_input() {
        let by_feed = group_by_feed(Vec::new(), &HashMap::new(), &HashSet::new());
        assert!(by_feed.is_empty());
    }

    fn entry_with_enclosure(guid: &str, url: &str, mime_type: &str) -> feed::Entry {
        feed::Entry {
            guid: Some(guid.to_string()),
            title: String::new(),
            published: None,
            enclosures: vec![feed::Enclosure {
                url: url.to_string(),
                mime_type: mime_type.to_string(),
            }],
        }
    }

    #[test]
    fn test_download_entry_skips_existing_file() {
        let dir = tempdir().unwrap();
        // example.invalid never resolves, so any network attempt errors
        let entry = entry_with_enclosure(
            "guid-rome",
            "https://example.invalid/rome.mp3",
            "audio/mpeg",
        );
        let ep = episode("Rome Falls", "guid-rome", 1);
        fs::write(dir.path().join("Rome Falls.mp3"), b"audio").unwrap();

        let outcome = download_entry(&entry, &ep, dir.path()).unwrap();

        assert!(matches!(outcome, Outcome::AlreadyPresent));
        // The existing file is left untouched
        assert_eq!(
            fs::read(dir.path().join("Rome Falls.mp3")).unwrap(),
            b"audio"
        );
    }

    #[test]
    fn test_download_entry_without_audio_enclosure() {
        let dir = tempdir().unwrap();
        let entry = entry_with_enclosure(
            "guid-notes",
            "https://example.invalid/notes.pdf",
            "application/pdf",
        );
        let ep = episode("Show Notes", "guid-notes", 1);

        let outcome = download_entry(&entry, &ep, dir.path()).unwrap();

        assert!(matches!(outcome, Outcome::NoAudio));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
