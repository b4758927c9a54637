//! # docfeed Testkit
//!
//! Test utilities for docfeed.
//!
//! This crate provides:
//! - Document builders, fixed id generators and failing documents/readers
//! - Property-based test generators using proptest
//! - Golden test utilities for feed output
//!
//! ## Usage
//!
//! ```rust
//! use docfeed_testkit::prelude::*;
//!
//! let xml = encode_documents(
//!     test_config(),
//!     &[DocumentBuilder::new("doc-1").content("hello").build()],
//! );
//! assert!(xml.contains("aGVsbG8="));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod golden;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
}

pub use fixtures::*;
pub use generators::*;
pub use golden::*;
