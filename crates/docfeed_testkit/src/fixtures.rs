//! Test fixtures and encoder helpers.
//!
//! Provides document builders, deterministic id generators and documents
//! or readers that fail on demand.

use docfeed_core::{FeedConfig, FeedEncoder, UniqueIdGenerator};
use docfeed_spi::{properties, Document, FeedType, Property, SimpleDocument, SpiError, SpiResult, Value};
use std::collections::HashSet;
use std::io::{self, Read};

/// Data source used by the helpers in this module.
pub const TEST_DATA_SOURCE: &str = "testds";

/// Always returns the same feed id.
#[derive(Debug, Clone)]
pub struct FixedIdGenerator {
    id: String,
}

impl FixedIdGenerator {
    /// Creates a generator returning `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Default for FixedIdGenerator {
    fn default() -> Self {
        Self::new("feed-fixed")
    }
}

impl UniqueIdGenerator for FixedIdGenerator {
    fn next_id(&self) -> String {
        self.id.clone()
    }
}

/// Fluent builder for test documents.
///
/// # Example
///
/// ```rust
/// use docfeed_testkit::DocumentBuilder;
///
/// let doc = DocumentBuilder::new("doc-1")
///     .content("hello")
///     .acl_users(["alice=reader"])
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    doc: SimpleDocument,
}

impl DocumentBuilder {
    /// Starts a document with the given docid.
    pub fn new(docid: &str) -> Self {
        Self {
            doc: SimpleDocument::new().with(properties::DOCID, docid),
        }
    }

    /// Adds a value to an arbitrary property.
    #[must_use]
    pub fn property(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.doc.add_value(name, value);
        self
    }

    /// Sets the content.
    #[must_use]
    pub fn content(self, content: impl Into<Value>) -> Self {
        self.property(properties::CONTENT, content)
    }

    /// Sets the title.
    #[must_use]
    pub fn title(self, title: &str) -> Self {
        self.property(properties::TITLE, title)
    }

    /// Sets the mimetype.
    #[must_use]
    pub fn mimetype(self, mimetype: &str) -> Self {
        self.property(properties::MIMETYPE, mimetype)
    }

    /// Sets the action.
    #[must_use]
    pub fn action(self, action: &str) -> Self {
        self.property(properties::ACTION, action)
    }

    /// Marks the document as a stand-alone ACL.
    #[must_use]
    pub fn stand_alone_acl(self) -> Self {
        self.property(properties::DOCUMENTTYPE, "acl")
    }

    /// Adds permitted users.
    #[must_use]
    pub fn acl_users<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.values(properties::ACLUSERS, names)
    }

    /// Adds permitted groups.
    #[must_use]
    pub fn acl_groups<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.values(properties::ACLGROUPS, names)
    }

    /// Adds denied users.
    #[must_use]
    pub fn deny_users<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.values(properties::ACLDENYUSERS, names)
    }

    /// Adds denied groups.
    #[must_use]
    pub fn deny_groups<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.values(properties::ACLDENYGROUPS, names)
    }

    fn values<'a>(mut self, name: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        for value in values {
            self.doc.add_value(name, value);
        }
        self
    }

    /// Returns the finished document.
    pub fn build(self) -> SimpleDocument {
        self.doc
    }
}

/// A document whose named property fails with a repository error.
#[derive(Debug)]
pub struct FailingDocument<D> {
    inner: D,
    failing: String,
}

impl<D: Document> FailingDocument<D> {
    /// Wraps `inner`, failing every read of `property`.
    pub fn new(inner: D, property: impl Into<String>) -> Self {
        Self {
            inner,
            failing: property.into(),
        }
    }
}

impl<D: Document> Document for FailingDocument<D> {
    fn find_property(&self, name: &str) -> SpiResult<Option<Box<dyn Property + '_>>> {
        if name == self.failing {
            return Err(SpiError::repository_access(format!("reading {name} failed")));
        }
        self.inner.find_property(name)
    }

    fn property_names(&self) -> SpiResult<HashSet<String>> {
        let mut names = self.inner.property_names()?;
        names.insert(self.failing.clone());
        Ok(names)
    }
}

/// A reader yielding `data` at most `chunk` bytes per call, then failing
/// if configured to.
#[derive(Debug)]
pub struct ChunkedReader {
    data: Vec<u8>,
    position: usize,
    chunk: usize,
    fail_at_end: bool,
}

impl ChunkedReader {
    /// Creates a reader over `data`.
    pub fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
        Self {
            data: data.into(),
            position: 0,
            chunk: chunk.max(1),
            fail_at_end: false,
        }
    }

    /// Makes the reader fail once `data` is exhausted.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_at_end = true;
        self
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.position..];
        if remaining.is_empty() {
            if self.fail_at_end {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "repository went away"));
            }
            return Ok(0);
        }
        let n = remaining.len().min(self.chunk).min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

/// Returns a content-feed configuration for [`TEST_DATA_SOURCE`].
pub fn test_config() -> FeedConfig {
    FeedConfig::new(TEST_DATA_SOURCE, FeedType::Content)
}

/// Opens an encoder with a fixed feed id.
pub fn open_encoder(config: FeedConfig) -> FeedEncoder {
    FeedEncoder::open(config, &FixedIdGenerator::default()).expect("Failed to open feed")
}

/// Runs `f` against a fresh encoder, then closes it and returns the feed
/// as text.
pub fn with_encoder<F>(config: FeedConfig, f: F) -> String
where
    F: FnOnce(&mut FeedEncoder),
{
    let mut encoder = open_encoder(config);
    f(&mut encoder);
    encoder.close().expect("Failed to close feed");
    String::from_utf8(encoder.into_bytes()).expect("Feed is not UTF-8")
}

/// Encodes `documents` into one closed feed and returns it as text.
pub fn encode_documents(config: FeedConfig, documents: &[SimpleDocument]) -> String {
    with_encoder(config, |encoder| {
        for doc in documents {
            encoder.add_record(doc).expect("Failed to add record");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfeed_spi::doc_utils;

    #[test]
    fn builder_sets_properties() {
        let doc = DocumentBuilder::new("1")
            .content("body")
            .title("T")
            .acl_users(["a", "b"])
            .build();
        assert_eq!(
            doc_utils::get_optional_string(&doc, properties::TITLE).unwrap().as_deref(),
            Some("T")
        );
        let mut users = doc.find_property(properties::ACLUSERS).unwrap().unwrap();
        assert_eq!(users.next_value().unwrap(), Some(Value::from("a")));
        assert_eq!(users.next_value().unwrap(), Some(Value::from("b")));
        assert_eq!(users.next_value().unwrap(), None);
    }

    #[test]
    fn failing_document_fails_named_property() {
        let doc = FailingDocument::new(DocumentBuilder::new("1").build(), properties::TITLE);
        assert!(doc.find_property(properties::TITLE).is_err());
        assert!(doc.find_property(properties::DOCID).unwrap().is_some());
        assert!(doc.property_names().unwrap().contains(properties::TITLE));
    }

    #[test]
    fn chunked_reader() {
        let mut reader = ChunkedReader::new(b"abcdef".to_vec(), 4);
        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf).unwrap(), 4);
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);

        let mut failing = ChunkedReader::new(b"ab".to_vec(), 4).failing();
        assert_eq!(failing.read(&mut buf).unwrap(), 2);
        assert!(failing.read(&mut buf).is_err());
    }

    #[test]
    fn fixed_ids() {
        let ids = FixedIdGenerator::new("x");
        assert_eq!(ids.next_id(), "x");
        assert_eq!(ids.next_id(), "x");
    }

    #[test]
    fn encode_helper_closes_feed() {
        let xml = encode_documents(test_config(), &[DocumentBuilder::new("1").content("hi").build()]);
        assert!(xml.ends_with("</gsafeed>\n"));
        assert_eq!(xml.matches("<record ").count(), 1);
    }
}
