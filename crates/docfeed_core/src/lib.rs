//! # docfeed Core
//!
//! Encodes repository documents into size-bounded XML feeds for a search
//! index.
//!
//! ## Pipeline
//!
//! - [`FeedEncoder`] owns the feed buffer, writes the prolog and epilog and
//!   decides when a batch is full
//! - [`RecordBuilder`] classifies each document and writes its record
//! - [`acl`] turns principal lists into `<principal>` elements
//! - [`metadata`] writes the remaining properties in sorted order
//! - [`ContentEncodingPipeline`] streams content through zlib and base64
//!
//! ## Errors
//!
//! Every [`FeedError`] is either fatal or scoped to one document (see
//! [`FeedError::kind`]). A document-level failure leaves no bytes in the
//! feed, so the caller can log it and move on.
//!
//! ## Example
//!
//! ```rust
//! use docfeed_core::{FeedConfig, FeedEncoder, UuidGenerator};
//! use docfeed_spi::{properties, FeedType, SimpleDocument};
//!
//! let config = FeedConfig::new("wiki", FeedType::Content);
//! let mut feed = FeedEncoder::open(config, &UuidGenerator).unwrap();
//!
//! let doc = SimpleDocument::new()
//!     .with(properties::DOCID, "page-1")
//!     .with(properties::CONTENT, "hello");
//! feed.add_record(&doc).unwrap();
//! feed.close().unwrap();
//!
//! let xml = String::from_utf8(feed.into_bytes()).unwrap();
//! assert!(xml.contains("<content encoding=\"base64binary\">aGVsbG8=</content>"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod acl;
mod buffer;
mod config;
mod content;
mod error;
mod feed;
mod id;
pub mod metadata;
mod record;
mod status;
mod url;
mod xml;

pub use buffer::{FeedBuffer, INITIAL_RESERVATION};
pub use config::{FeedConfig, DEFAULT_MAX_DOCUMENT_SIZE, DEFAULT_MAX_FEED_SIZE};
pub use content::{
    alternate_content, ContentEncodingPipeline, ContentOutcome, EncodingPlan, BASE64_LINE_LENGTH,
    CHUNK_SIZE,
};
pub use error::{ErrorKind, FeedError, FeedResult};
pub use feed::{FeedData, FeedEncoder};
pub use id::{SequentialIdGenerator, UniqueIdGenerator, UuidGenerator};
pub use record::{
    resolve_action, resolve_authmethod, resolve_is_public, resolve_last_modified, FeedRecord,
    FieldIssue, Parsed, RecordBuilder, RecordKind, AUTHMETHOD_CONNECTOR, AUTHMETHOD_NONE,
    CONTENT_PLACEHOLDER,
};
pub use status::{
    is_full, FeedStatus, StatusSnapshot, FULL_SPACE_DIVISOR, FULL_WHEN_FEWER_THAN,
    NOT_FULL_WHEN_MORE_THAN,
};
pub use url::UrlConstructor;
pub use xml::escape as xml_escape;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
