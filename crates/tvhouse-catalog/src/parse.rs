//! Catalog document parsing.

use serde_json::Value;

use super::channel::Channel;

/// Catalog shipped with the application, used when no fresh copy is available.
pub const BUNDLED_CATALOG: &str = include_str!("../assets/channels.json");

/// Parses a catalog document into channels, preserving document order.
///
/// Never fails: entries that do not map onto a [`Channel`] are skipped,
/// and a document that is not a JSON array yields an empty list.
#[must_use]
pub fn parse_catalog(text: &str) -> Vec<Channel> {
    let entries: Vec<Value> = match serde_json::from_str(text) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "catalog document is not a JSON array, using empty list");
            return Vec::new();
        }
    };

    let total = entries.len();
    let channels: Vec<Channel> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Channel>(entry) {
            Ok(channel) => Some(channel),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed catalog entry");
                None
            }
        })
        .collect();

    tracing::debug!(total, parsed = channels.len(), "catalog parsed");
    channels
}

/// Returns the channels of the bundled catalog.
#[must_use]
pub fn bundled_channels() -> Vec<Channel> {
    parse_catalog(BUNDLED_CATALOG)
}

/// Checks that a downloaded body is a JSON array before it is cached.
pub(crate) fn validate_catalog(body: &[u8]) -> Result<(), serde_json::Error> {
    serde_json::from_slice::<Vec<Value>>(body).map(|_| ())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing)]

    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    #[test]
    fn test_parse_preserves_order_and_fields() {
        // Arrange
        let json = include_str!("../../../fixtures/catalog/channels_remote.json");

        // Act
        let channels = parse_catalog(json);

        // Assert
        assert_eq!(channels.len(), 4);
        assert_eq!(channels[0].name, "VTV1");
        assert_eq!(channels[1].name, "VTV3");
        assert_eq!(channels[2].name, "HTV7");
        assert_eq!(channels[3].name, "HTV9");
        assert_eq!(channels[0].icon, "https://cdn.example.com/logos/vtv1.png");
        assert_eq!(channels[3].url, "https://live.example.com/htv9/playlist.m3u8");
    }

    #[test]
    fn test_parse_skips_entry_missing_url() {
        // Arrange
        let json = include_str!("../../../fixtures/catalog/channels_malformed.json");

        // Act
        let channels = parse_catalog(json);

        // Assert
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name, "HTV2");
        assert_eq!(channels[1].name, "HTV4");
    }

    #[test]
    fn test_parse_object_document_yields_empty() {
        // Arrange
        let json = r#"{"channels":[{"name":"HTV2","icon":"res://img_htv2","url":"https://example.com"}]}"#;

        // Act & Assert
        assert!(parse_catalog(json).is_empty());
    }

    #[test]
    fn test_parse_garbage_yields_empty() {
        // Arrange & Act & Assert
        assert!(parse_catalog("<html>503 Service Unavailable</html>").is_empty());
        assert!(parse_catalog("").is_empty());
    }

    #[test]
    fn test_parse_empty_array() {
        // Arrange & Act & Assert
        assert!(parse_catalog("[]").is_empty());
    }

    #[test]
    fn test_parse_warns_on_malformed_entry() {
        // Arrange
        let json = r#"[{"name":"HTV2","icon":"res://img_htv2"}]"#;
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::WARN))
            .run_with_handle();

        // Act
        let channels = with_default(subscriber, || parse_catalog(json));

        // Assert
        assert!(channels.is_empty());
        handle.assert_finished();
    }

    #[test]
    fn test_bundled_catalog_lists_original_channels() {
        // Arrange & Act
        let channels = bundled_channels();

        // Assert
        let names: Vec<&str> = channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["HTV2", "HTV3", "HTV4"]);
        assert!(channels.iter().all(|c| c.url.ends_with(".m3u8")));
    }

    #[test]
    fn test_validate_catalog() {
        // Arrange & Act & Assert
        assert!(validate_catalog(b"[]").is_ok());
        assert!(validate_catalog(br#"[{"name":"x"}]"#).is_ok());
        assert!(validate_catalog(b"{}").is_err());
        assert!(validate_catalog(b"not json").is_err());
    }
}
