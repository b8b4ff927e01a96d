use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;

/// A media attachment on a feed entry
#[derive(Debug, Clone)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
}

/// One item (RSS) or entry (Atom) of a feed
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub guid: Option<String>,
    pub title: String,
    pub published: Option<DateTime<FixedOffset>>,
    pub enclosures: Vec<Enclosure>,
}

/// A parsed podcast feed
#[derive(Debug, Clone, Default)]
pub struct Channel {
    pub title: String,
    pub entries: Vec<Entry>,
}

impl Entry {
    /// First enclosure carrying audio, matched on the MIME type
    pub fn audio_enclosure(&self) -> Option<&Enclosure> {
        self.enclosures.iter().find(|e| e.mime_type.contains("audio"))
    }
}

/// Which text element is currently being read
enum Field {
    ChannelTitle,
    EntryTitle,
    Guid,
    Published,
}

/// Parse an RSS 2.0 or Atom feed into the channel model.
/// Elements outside the small set a downloader needs are ignored.
pub fn parse(xml: &str) -> Result<Channel> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut channel = Channel::default();
    let mut current: Option<Entry> = None;
    let mut field: Option<Field> = None;
    // <image><title> inside a channel must not clobber the channel title
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(_) if skip_depth > 0 => skip_depth += 1,
            Event::End(_) if skip_depth > 0 => skip_depth -= 1,
            Event::Start(e) => match e.name().as_ref() {
                b"item" | b"entry" => current = Some(Entry::default()),
                b"image" | b"itunes:owner" => skip_depth = 1,
                b"title" => {
                    field = Some(if current.is_some() {
                        Field::EntryTitle
                    } else {
                        Field::ChannelTitle
                    });
                }
                b"guid" | b"id" if current.is_some() => field = Some(Field::Guid),
                b"pubDate" | b"published" if current.is_some() => {
                    field = Some(Field::Published)
                }
                b"enclosure" => {
                    field = None;
                    if let Some(entry) = current.as_mut() {
                        if let Some(enc) = enclosure_from_attrs(&e)? {
                            entry.enclosures.push(enc);
                        }
                    }
                }
                b"link" => {
                    field = None;
                    if let Some(entry) = current.as_mut() {
                        if let Some(enc) = atom_enclosure_from_link(&e)? {
                            entry.enclosures.push(enc);
                        }
                    }
                }
                _ => field = None,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"enclosure" if skip_depth == 0 => {
                    if let Some(entry) = current.as_mut() {
                        if let Some(enc) = enclosure_from_attrs(&e)? {
                            entry.enclosures.push(enc);
                        }
                    }
                }
                b"link" if skip_depth == 0 => {
                    if let Some(entry) = current.as_mut() {
                        if let Some(enc) = atom_enclosure_from_link(&e)? {
                            entry.enclosures.push(enc);
                        }
                    }
                }
                _ => {}
            },
            Event::Text(t) if skip_depth == 0 => {
                let text = t.unescape()?;
                assign(&mut channel, &mut current, &field, text.trim());
            }
            Event::CData(t) if skip_depth == 0 => {
                let raw = t.into_inner();
                let text = String::from_utf8_lossy(&raw);
                assign(&mut channel, &mut current, &field, text.trim());
            }
            Event::End(e) => {
                if matches!(e.name().as_ref(), b"item" | b"entry") {
                    if let Some(entry) = current.take() {
                        channel.entries.push(entry);
                    }
                }
                field = None;
            }
            _ => {}
        }
    }
    Ok(channel)
}

fn assign(channel: &mut Channel, current: &mut Option<Entry>, field: &Option<Field>, text: &str) {
    if text.is_empty() {
        return;
    }
    match field {
        Some(Field::ChannelTitle) if channel.title.is_empty() => {
            channel.title = text.to_string();
        }
        Some(Field::EntryTitle) => {
            if let Some(entry) = current.as_mut() {
                if entry.title.is_empty() {
                    entry.title = text.to_string();
                }
            }
        }
        Some(Field::Guid) => {
            if let Some(entry) = current.as_mut() {
                if entry.guid.is_none() {
                    entry.guid = Some(text.to_string());
                }
            }
        }
        Some(Field::Published) => {
            if let Some(entry) = current.as_mut() {
                if entry.published.is_none() {
                    entry.published = parse_date(text);
                }
            }
        }
        _ => {}
    }
}

/// RSS 2.0 dates are RFC 2822; Atom dates are RFC 3339. Feeds in the
/// wild mix both, so try each before giving up.
fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .ok()
}

fn enclosure_from_attrs(e: &BytesStart<'_>) -> Result<Option<Enclosure>> {
    let mut url = None;
    let mut mime_type = String::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        match attr.key.as_ref() {
            b"url" => url = Some(attr.unescape_value()?.into_owned()),
            b"type" => mime_type = attr.unescape_value()?.into_owned(),
            _ => {}
        }
    }
    Ok(url.map(|url| Enclosure { url, mime_type }))
}

/// Atom feeds attach media as <link rel="enclosure" href=... type=...>
fn atom_enclosure_from_link(e: &BytesStart<'_>) -> Result<Option<Enclosure>> {
    let mut href = None;
    let mut mime_type = String::new();
    let mut is_enclosure = false;
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        match attr.key.as_ref() {
            b"rel" => is_enclosure = attr.unescape_value()?.as_ref() == "enclosure",
            b"href" => href = Some(attr.unescape_value()?.into_owned()),
            b"type" => mime_type = attr.unescape_value()?.into_owned(),
            _ => {}
        }
    }
    if !is_enclosure {
        return Ok(None);
    }
    Ok(href.map(|url| Enclosure { url, mime_type }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>History Pod</title>
    <image>
      <title>History Pod artwork</title>
      <url>https://example.com/art.png</url>
    </image>
    <item>
      <title>Rome Falls</title>
      <guid isPermaLink="false">guid-rome</guid>
      <pubDate>Mon, 02 Dec 2024 08:00:00 +0000</pubDate>
      <enclosure url="https://cdn.example.com/rome.mp3" type="audio/mpeg" length="123"/>
    </item>
    <item>
      <title><![CDATA[Carthage & After]]></title>
      <guid>guid-carthage</guid>
      <enclosure url="https://cdn.example.com/carthage.pdf" type="application/pdf"/>
      <enclosure url="https://cdn.example.com/carthage.m4a" type="audio/mp4"/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_channel_title_ignores_image_title() {
        let channel = parse(RSS_SAMPLE).unwrap();
        assert_eq!(channel.title, "History Pod");
    }

    #[test]
    fn test_parse_entries() {
        let channel = parse(RSS_SAMPLE).unwrap();
        assert_eq!(channel.entries.len(), 2);

        let rome = &channel.entries[0];
        assert_eq!(rome.guid.as_deref(), Some("guid-rome"));
        assert_eq!(rome.title, "Rome Falls");
        assert!(rome.published.is_some());

        let carthage = &channel.entries[1];
        assert_eq!(carthage.title, "Carthage & After");
        assert_eq!(carthage.enclosures.len(), 2);
    }

    #[test]
    fn test_audio_enclosure_skips_non_audio() {
        let channel = parse(RSS_SAMPLE).unwrap();
        let carthage = &channel.entries[1];
        let audio = carthage.audio_enclosure().unwrap();
        assert_eq!(audio.url, "https://cdn.example.com/carthage.m4a");
    }

    #[test]
    fn test_parse_atom_entry() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Science Pod</title>
  <entry>
    <id>urn:uuid:1234</id>
    <title>Quarks</title>
    <published>2024-12-02T08:00:00Z</published>
    <link rel="enclosure" href="https://cdn.example.com/quarks.mp3" type="audio/mpeg"/>
    <link rel="alternate" href="https://example.com/quarks"/>
  </entry>
</feed>"#;
        let channel = parse(xml).unwrap();
        assert_eq!(channel.title, "Science Pod");
        assert_eq!(channel.entries.len(), 1);

        let entry = &channel.entries[0];
        assert_eq!(entry.guid.as_deref(), Some("urn:uuid:1234"));
        assert!(entry.published.is_some());
        assert_eq!(entry.audio_enclosure().unwrap().url, "https://cdn.example.com/quarks.mp3");
    }

    #[test]
    fn test_entry_without_audio() {
        let xml = r#"<rss><channel><title>T</title><item>
            <guid>g</guid><title>e</title>
            <enclosure url="https://example.com/notes.pdf" type="application/pdf"/>
        </item></channel></rss>"#;
        let channel = parse(xml).unwrap();
        assert!(channel.entries[0].audio_enclosure().is_none());
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("Mon, 02 Dec 2024 08:00:00 +0000").is_some());
        assert!(parse_date("2024-12-02T08:00:00+00:00").is_some());
        assert!(parse_date("yesterday").is_none());
    }
}
