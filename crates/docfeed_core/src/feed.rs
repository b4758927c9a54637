//! The feed encoder.
//!
//! A [`FeedEncoder`] owns one feed buffer from prolog to epilog:
//!
//! ```text
//! open ──► Open ──add_record*──► Open ──close──► Closed
//! ```
//!
//! Records are appended one document at a time. A document that fails
//! leaves no bytes behind, so the caller can skip it and carry on.

use crate::buffer::FeedBuffer;
use crate::config::FeedConfig;
use crate::content::ContentEncodingPipeline;
use crate::error::{FeedError, FeedResult};
use crate::id::UniqueIdGenerator;
use crate::record::RecordBuilder;
use crate::status::FeedStatus;
use crate::url::UrlConstructor;
use crate::xml;
use docfeed_spi::{Document, FeedType};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// XML declaration and doctype opening every feed.
const XML_START: &str = "<?xml version='1.0' encoding='UTF-8'?>\
<!DOCTYPE gsafeed PUBLIC \"-//Google//DTD GSA Feeds//EN\" \"gsafeed.dtd\">";

/// Identity of a feed.
pub trait FeedData {
    /// The kind of feed.
    fn feed_type(&self) -> FeedType;
    /// The data source named in the header.
    fn data_source(&self) -> &str;
    /// Unique id of this feed.
    fn feed_id(&self) -> &str;
}

/// Encodes documents into one XML feed.
#[derive(Debug)]
pub struct FeedEncoder {
    config: FeedConfig,
    feed_id: String,
    buffer: FeedBuffer,
    urls: UrlConstructor,
    content: ContentEncodingPipeline,
    feed_log: Option<String>,
}

impl FeedEncoder {
    /// Opens a feed and writes its prolog.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidConfig`] for an unusable configuration
    /// and [`FeedError::Prolog`] if the prolog cannot be written.
    pub fn open(config: FeedConfig, ids: &dyn UniqueIdGenerator) -> FeedResult<Self> {
        config.validate()?;
        let urls = UrlConstructor::new(
            config.data_source.clone(),
            config.feed_type,
            config.content_url_prefix.clone(),
        );
        let content = ContentEncodingPipeline::negotiate(
            &config.content_encodings,
            config.wrap_lines,
            config.max_document_size,
        );
        let mut encoder = Self {
            feed_id: ids.next_id(),
            buffer: FeedBuffer::with_capacity(config.max_feed_size),
            feed_log: config.feed_log.then(String::new),
            urls,
            content,
            config,
        };
        encoder.write_prolog()?;
        info!(
            feed_id = %encoder.feed_id,
            data_source = %encoder.config.data_source,
            feed_type = %encoder.config.feed_type,
            "opened feed"
        );
        Ok(encoder)
    }

    fn write_prolog(&mut self) -> FeedResult<()> {
        let mut prolog = String::from(XML_START);
        prolog.push_str("\n<gsafeed>\n<header>");
        xml::append_start_tag(&mut prolog, "datasource");
        xml::append_escaped(&mut prolog, &self.config.data_source);
        prolog.push_str("</datasource>");
        xml::append_start_tag(&mut prolog, "feedtype");
        prolog.push_str(self.config.feed_type.to_legacy_str());
        prolog.push_str("</feedtype></header>\n");
        xml::append_start_tag(&mut prolog, "group");
        prolog.push('\n');
        self.buffer
            .write_all(prolog.as_bytes())
            .map_err(|e| FeedError::prolog(e.to_string()))?;
        if let Some(log) = self.feed_log.as_mut() {
            log.push_str(&prolog);
        }
        Ok(())
    }

    /// Appends the record(s) for `document`, returning how many were added.
    ///
    /// On failure every byte written for the document is discarded and the
    /// record count is unchanged, so the feed stays open and consistent.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Closed`] after [`close`](Self::close), and
    /// document-level errors (see [`FeedError::kind`]) for documents that
    /// cannot be encoded.
    pub fn add_record(&mut self, document: &dyn Document) -> FeedResult<usize> {
        if self.is_closed() {
            return Err(FeedError::Closed);
        }
        let mark = self.buffer.len();
        let log_mark = self.feed_log.as_ref().map(String::len);

        let builder = RecordBuilder::new(self.config.feed_type, &self.urls, &self.content);
        match builder.build(document, &mut self.buffer, self.feed_log.as_mut()) {
            Ok(records) => {
                self.buffer.status().add_records(records);
                debug!(
                    records,
                    size = self.buffer.len(),
                    total = self.record_count(),
                    "added record"
                );
                Ok(records)
            }
            Err(e) => {
                self.buffer.truncate(mark)?;
                if let (Some(log), Some(len)) = (self.feed_log.as_mut(), log_mark) {
                    log.truncate(len);
                }
                warn!(error = %e, kind = ?e.kind(), "discarded record");
                Err(e)
            }
        }
    }

    /// Returns true if the feed should be sent now.
    pub fn is_full(&self) -> bool {
        self.buffer.status().is_full()
    }

    /// Writes the epilog. Calling it again does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Epilog`] if the epilog cannot be written.
    pub fn close(&mut self) -> FeedResult<()> {
        if self.is_closed() {
            return Ok(());
        }
        let mut epilog = String::new();
        xml::append_end_tag(&mut epilog, "group");
        xml::append_end_tag(&mut epilog, "gsafeed");
        self.buffer
            .write_all(epilog.as_bytes())
            .map_err(|e| FeedError::epilog(e.to_string()))?;
        if let Some(log) = self.feed_log.as_mut() {
            log.push_str(&epilog);
        }
        self.buffer.status().mark_closed();
        info!(
            feed_id = %self.feed_id,
            records = self.record_count(),
            size = self.size(),
            "closed feed"
        );
        Ok(())
    }

    /// Returns true once the epilog is written.
    pub fn is_closed(&self) -> bool {
        self.buffer.status().is_closed()
    }

    /// Returns the number of records written.
    pub fn record_count(&self) -> usize {
        self.buffer.status().record_count()
    }

    /// Overrides the record count, for callers that reverted a record.
    pub fn set_record_count(&mut self, count: usize) {
        self.buffer.status().set_record_count(count);
    }

    /// Returns the number of bytes written.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Discards everything after the first `size` bytes.
    ///
    /// The record count is not adjusted.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Closed`] on a closed feed and
    /// [`FeedError::InvalidTruncate`] if `size` exceeds the current size.
    pub fn truncate(&mut self, size: usize) -> FeedResult<()> {
        if self.is_closed() {
            return Err(FeedError::Closed);
        }
        self.buffer.truncate(size)
    }

    /// Returns the counters shared with observers.
    pub fn status(&self) -> Arc<FeedStatus> {
        Arc::clone(self.buffer.status())
    }

    /// Returns the feed bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Consumes the encoder, returning the feed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }

    /// Returns the record log, if enabled.
    pub fn feed_log(&self) -> Option<&str> {
        self.feed_log.as_deref()
    }

    /// Returns the configuration this feed was opened with.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }
}

impl FeedData for FeedEncoder {
    fn feed_type(&self) -> FeedType {
        self.config.feed_type
    }

    fn data_source(&self) -> &str {
        &self.config.data_source
    }

    fn feed_id(&self) -> &str {
        &self.feed_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIdGenerator;
    use docfeed_spi::{properties, SimpleDocument};

    const PROLOG: &str = "<?xml version='1.0' encoding='UTF-8'?><!DOCTYPE gsafeed PUBLIC \
        \"-//Google//DTD GSA Feeds//EN\" \"gsafeed.dtd\">\n<gsafeed>\n\
        <header><datasource>ds</datasource><feedtype>incremental</feedtype></header>\n<group>\n";

    fn open(config: FeedConfig) -> FeedEncoder {
        FeedEncoder::open(config, &SequentialIdGenerator::new("feed")).unwrap()
    }

    fn doc(id: &str) -> SimpleDocument {
        SimpleDocument::new()
            .with(properties::DOCID, id)
            .with(properties::CONTENT, "hello")
    }

    #[test]
    fn open_writes_prolog() {
        let encoder = open(FeedConfig::new("ds", FeedType::Content));
        assert_eq!(encoder.as_bytes(), PROLOG.as_bytes());
        assert_eq!(encoder.size(), PROLOG.len());
        assert_eq!(encoder.record_count(), 0);
        assert_eq!(encoder.feed_id(), "feed-0");
        assert_eq!(encoder.data_source(), "ds");
        assert_eq!(FeedData::feed_type(&encoder), FeedType::Content);
    }

    #[test]
    fn web_feed_header() {
        let encoder = open(FeedConfig::new("ds", FeedType::Web));
        let text = String::from_utf8(encoder.into_bytes()).unwrap();
        assert!(text.contains("<feedtype>metadata-and-url</feedtype>"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = FeedEncoder::open(FeedConfig::new("", FeedType::Content), &SequentialIdGenerator::new("f"))
            .unwrap_err();
        assert!(matches!(err, FeedError::InvalidConfig { .. }));
    }

    #[test]
    fn add_and_close() {
        let mut encoder = open(FeedConfig::new("ds", FeedType::Content));
        assert_eq!(encoder.add_record(&doc("1")).unwrap(), 1);
        assert_eq!(encoder.add_record(&doc("2")).unwrap(), 1);
        assert_eq!(encoder.record_count(), 2);
        encoder.close().unwrap();
        let size = encoder.size();
        encoder.close().unwrap();
        assert_eq!(encoder.size(), size);

        let text = String::from_utf8(encoder.as_bytes().to_vec()).unwrap();
        assert!(text.starts_with(PROLOG));
        assert!(text.ends_with("</record>\n</group>\n</gsafeed>\n"));
        assert_eq!(text.matches("<record ").count(), 2);
    }

    #[test]
    fn closed_feed_rejects_records() {
        let mut encoder = open(FeedConfig::new("ds", FeedType::Content));
        encoder.close().unwrap();
        assert!(matches!(encoder.add_record(&doc("1")), Err(FeedError::Closed)));
        assert!(matches!(encoder.truncate(0), Err(FeedError::Closed)));
        assert!(encoder.is_closed());
        assert!(encoder.status().is_closed());
    }

    #[test]
    fn failed_record_leaves_no_bytes() {
        let mut encoder = open(
            FeedConfig::new("ds", FeedType::Content)
                .content_encodings("base64binary")
                .feed_log(true),
        );
        encoder.add_record(&doc("1")).unwrap();
        let before = encoder.as_bytes().to_vec();
        let log_before = encoder.feed_log().unwrap().to_string();

        let bad = doc("2").with(properties::CONTENT_ENCODING, "base64compressed");
        let err = encoder.add_record(&bad).unwrap_err();
        assert!(err.is_document_level());
        assert_eq!(encoder.as_bytes(), &before[..]);
        assert_eq!(encoder.feed_log().unwrap(), log_before);
        assert_eq!(encoder.record_count(), 1);

        encoder.add_record(&doc("3")).unwrap();
        assert_eq!(encoder.record_count(), 2);
    }

    #[test]
    fn explicit_truncate_keeps_count() {
        let mut encoder = open(FeedConfig::new("ds", FeedType::Content));
        let mark = encoder.size();
        encoder.add_record(&doc("1")).unwrap();
        encoder.truncate(mark).unwrap();
        assert_eq!(encoder.size(), mark);
        assert_eq!(encoder.record_count(), 1);
        encoder.set_record_count(0);
        assert_eq!(encoder.record_count(), 0);
        assert!(matches!(
            encoder.truncate(mark + 1),
            Err(FeedError::InvalidTruncate { .. })
        ));
    }

    #[test]
    fn feed_log_hides_content() {
        let mut encoder = open(FeedConfig::new("ds", FeedType::Content).feed_log(true));
        encoder.add_record(&doc("1")).unwrap();
        encoder.close().unwrap();
        let log = encoder.feed_log().unwrap();
        assert!(log.starts_with(PROLOG));
        assert!(log.contains("<content encoding=\"base64binary\">...content...</content>"));
        assert!(!log.contains("aGVsbG8="));
        assert!(log.ends_with("</gsafeed>\n"));
    }

    #[test]
    fn feed_log_disabled_by_default() {
        let encoder = open(FeedConfig::new("ds", FeedType::Content));
        assert!(encoder.feed_log().is_none());
    }

    #[test]
    fn status_tracks_size() {
        let mut encoder = open(FeedConfig::new("ds", FeedType::Content).max_feed_size(1_000));
        let status = encoder.status();
        encoder.add_record(&doc("1")).unwrap();
        assert_eq!(status.size(), encoder.size());
        assert_eq!(status.record_count(), 1);
        assert_eq!(status.capacity(), 1_000);
    }
}
