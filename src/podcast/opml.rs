use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Read an OPML subscription export and collect every outline's xmlUrl
pub fn feed_urls(path: &Path) -> Result<HashSet<String>> {
    let xml = fs::read_to_string(path)?;
    parse(&xml)
}

/// Collect xmlUrl attributes from outline elements. Nested outlines
/// (folders) are walked implicitly: every outline element is visited.
pub fn parse(xml: &str) -> Result<HashSet<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut urls = HashSet::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"outline" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    if attr.key.as_ref() == b"xmlUrl" {
                        let value = attr.unescape_value()?;
                        if !value.is_empty() {
                            urls.insert(value.into_owned());
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(urls)
}
