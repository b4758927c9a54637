//! # docfeed SPI
//!
//! The document model consumed by the docfeed encoder.
//!
//! A repository connector hands the encoder [`Document`]s: unordered bags
//! of named, multi-valued properties whose [`Value`]s can be coerced to
//! strings, booleans, integers, timestamps, principals or content streams.
//! Property names starting with `google:` (see [`properties`]) steer how a
//! document is fed; everything else becomes metadata.
//!
//! The [`filter`] module holds decorators that reshape a document's ACL
//! without copying the document.
//!
//! ## Usage
//!
//! ```
//! use docfeed_spi::{doc_utils, properties, SimpleDocument};
//!
//! let doc = SimpleDocument::new()
//!     .with(properties::DOCID, "doc-1")
//!     .with(properties::ACLUSERS, "alice=reader");
//!
//! assert!(doc_utils::has_acl_properties(&doc).unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod doc_utils;
mod document;
mod error;
pub mod filter;
mod principal;
pub mod properties;
mod types;
mod value;

pub use document::{Document, Property, SimpleDocument, ValuesProperty};
pub use error::{SpiError, SpiResult};
pub use principal::{CaseSensitivityType, Principal, PrincipalType};
pub use types::{
    AclAccess, AclScope, ActionType, ContentEncoding, DocumentType, FeedType, RoleType,
};
pub use value::{ContentReader, ContentStream, Value};
