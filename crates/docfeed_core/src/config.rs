//! Feed encoder configuration.

use crate::error::{FeedError, FeedResult};
use docfeed_spi::FeedType;

/// Default upper bound for one feed, in bytes.
pub const DEFAULT_MAX_FEED_SIZE: usize = 10 * 1024 * 1024;

/// Default upper bound for the content of one document, in bytes.
pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 30 * 1024 * 1024;

/// Configuration for opening a feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Data source name written into the feed header.
    pub data_source: String,

    /// The kind of feed to produce.
    pub feed_type: FeedType,

    /// Capacity the fullness heuristic measures against.
    pub max_feed_size: usize,

    /// Content beyond this many bytes is truncated.
    pub max_document_size: u64,

    /// Content encodings the index accepts, as reported by the index.
    pub content_encodings: String,

    /// Prefix for content URLs in content-URL feeds.
    pub content_url_prefix: Option<String>,

    /// Whether base64 content is wrapped into fixed-length lines.
    pub wrap_lines: bool,

    /// Whether to keep a textual log of every record written.
    pub feed_log: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            data_source: String::new(),
            feed_type: FeedType::Content,
            max_feed_size: DEFAULT_MAX_FEED_SIZE,
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
            content_encodings: "base64binary".to_string(),
            content_url_prefix: None,
            wrap_lines: true,
            feed_log: false,
        }
    }
}

impl FeedConfig {
    /// Creates a configuration for the given data source and feed type.
    #[must_use]
    pub fn new(data_source: impl Into<String>, feed_type: FeedType) -> Self {
        Self {
            data_source: data_source.into(),
            feed_type,
            ..Self::default()
        }
    }

    /// Sets the feed capacity.
    #[must_use]
    pub const fn max_feed_size(mut self, size: usize) -> Self {
        self.max_feed_size = size;
        self
    }

    /// Sets the per-document content limit.
    #[must_use]
    pub const fn max_document_size(mut self, size: u64) -> Self {
        self.max_document_size = size;
        self
    }

    /// Sets the accepted content encodings. Stored lowercased.
    #[must_use]
    pub fn content_encodings(mut self, encodings: impl Into<String>) -> Self {
        self.content_encodings = encodings.into().to_lowercase();
        self
    }

    /// Sets the content URL prefix.
    #[must_use]
    pub fn content_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.content_url_prefix = Some(prefix.into());
        self
    }

    /// Sets whether base64 output is line-wrapped.
    #[must_use]
    pub const fn wrap_lines(mut self, value: bool) -> Self {
        self.wrap_lines = value;
        self
    }

    /// Sets whether a record log is kept.
    #[must_use]
    pub const fn feed_log(mut self, value: bool) -> Self {
        self.feed_log = value;
        self
    }

    /// Checks that the configuration can produce a feed.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidConfig`] for an empty data source or a
    /// zero size limit.
    pub fn validate(&self) -> FeedResult<()> {
        if self.data_source.trim().is_empty() {
            return Err(FeedError::invalid_config("data source must not be empty"));
        }
        if self.max_feed_size == 0 {
            return Err(FeedError::invalid_config("max feed size must be positive"));
        }
        if self.max_document_size == 0 {
            return Err(FeedError::invalid_config("max document size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.feed_type, FeedType::Content);
        assert_eq!(config.max_feed_size, DEFAULT_MAX_FEED_SIZE);
        assert!(config.wrap_lines);
        assert!(!config.feed_log);
        assert_eq!(config.content_encodings, "base64binary");
    }

    #[test]
    fn builder_pattern() {
        let config = FeedConfig::new("ds", FeedType::ContentUrl)
            .max_feed_size(1024)
            .max_document_size(64)
            .content_encodings("Base64Binary,Base64Compressed")
            .content_url_prefix("http://cm/getDocumentContent")
            .wrap_lines(false)
            .feed_log(true);

        assert_eq!(config.data_source, "ds");
        assert_eq!(config.max_feed_size, 1024);
        assert_eq!(config.max_document_size, 64);
        assert_eq!(config.content_encodings, "base64binary,base64compressed");
        assert!(!config.wrap_lines);
        assert!(config.feed_log);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation() {
        assert!(FeedConfig::default().validate().is_err());
        assert!(FeedConfig::new("ds", FeedType::Content)
            .max_feed_size(0)
            .validate()
            .is_err());
        assert!(FeedConfig::new("ds", FeedType::Content)
            .max_document_size(0)
            .validate()
            .is_err());
    }
}
