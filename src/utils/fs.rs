use std::path::Path;

/// Make a feed-supplied name safe as a single path component.
/// Podcast and episode titles routinely contain slashes.
pub fn sanitize_component(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// Derive an audio file extension from an enclosure URL.
/// The query string and fragment are ignored; anything that does not
/// look like a real extension falls back to "mp3".
pub fn audio_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit_once('.') {
        Some((_, ext))
            if !ext.is_empty()
                && ext.len() <= 4
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext
        }
        _ => "mp3",
    }
}

/// Create a directory (and parents) if it does not already exist
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("History of Rome"), "History of Rome");
        assert_eq!(sanitize_component("AC/DC Special"), "AC_DC Special");
        assert_eq!(sanitize_component("back\\slash"), "back_slash");
    }

    #[test]
    fn test_audio_extension_plain() {
        assert_eq!(audio_extension("https://cdn.example.com/ep1.mp3"), "mp3");
        assert_eq!(audio_extension("https://cdn.example.com/ep1.m4a"), "m4a");
        assert_eq!(audio_extension("https://cdn.example.com/ep1.opus"), "opus");
    }

    #[test]
    fn test_audio_extension_query_string() {
        assert_eq!(
            audio_extension("https://cdn.example.com/ep1.mp3?session=1.23"),
            "mp3"
        );
    }

    #[test]
    fn test_audio_extension_fallback() {
        // No extension at all
        assert_eq!(audio_extension("https://cdn.example.com/stream"), "mp3");
        // Dot only in the host name
        assert_eq!(audio_extension("https://cdn.example.com/ep1"), "mp3");
        // Implausibly long "extension"
        assert_eq!(
            audio_extension("https://cdn.example.com/ep1.download"),
            "mp3"
        );
    }

    #[test]
    fn test_ensure_dir_creates_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a/b/c");

        ensure_dir(&target).unwrap();
        assert!(target.is_dir());

        // Second call is a no-op
        ensure_dir(&target).unwrap();
        assert!(target.is_dir());
    }
}
