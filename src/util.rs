use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Parses `--now`. Accepts RFC 3339 with or without an explicit offset
/// (`2024-06-15T12:00:00Z`, `2024-06-15 12:00:00`).
pub fn parse_instant(input: &str) -> std::result::Result<DateTime<Utc>, String> {
    humantime::parse_rfc3339_weak(input.trim())
        .map(DateTime::<Utc>::from)
        .map_err(|e| format!("invalid timestamp '{input}': {e}"))
}

/// Directory chart links are relative to: the document's own directory.
pub fn document_dir(document: &Path) -> PathBuf {
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_pinned_instants() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(parse_instant("2024-06-15T12:00:00Z"), Ok(expected));
        assert_eq!(parse_instant("2024-06-15 12:00:00"), Ok(expected));
        assert!(parse_instant("next tuesday").is_err());
    }

    #[test]
    fn document_dir_defaults_to_current() {
        assert_eq!(document_dir(Path::new("README.md")), PathBuf::from("."));
        assert_eq!(document_dir(Path::new("docs/README.md")), PathBuf::from("docs"));
    }
}
