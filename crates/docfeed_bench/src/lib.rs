//! Benchmark utilities.

#![warn(missing_docs)]

use docfeed_spi::{properties, SimpleDocument, Value};
use rand::Rng;

/// Generate random content of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate compressible text content of the specified size.
pub fn text_data(size: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(size)
        .collect()
}

/// Generate a document with `meta_count` metadata properties, a small ACL
/// and `content` as its body.
pub fn document(docid: usize, meta_count: usize, content: Vec<u8>) -> SimpleDocument {
    let mut doc = SimpleDocument::new()
        .with(properties::DOCID, format!("doc-{docid}"))
        .with(properties::MIMETYPE, "text/plain")
        .with(properties::ACLUSERS, "alice=reader")
        .with(properties::ACLGROUPS, "engineering")
        .with(properties::ACLDENYUSERS, "mallory")
        .with(properties::CONTENT, Value::Binary(content));
    for i in 0..meta_count {
        doc.add_value(format!("meta_{i:03}"), format!("value {i} & <more>"));
    }
    doc
}

/// Generate a batch of documents.
pub fn documents(count: usize, meta_count: usize, content_size: usize) -> Vec<SimpleDocument> {
    (0..count)
        .map(|i| document(i, meta_count, text_data(content_size)))
        .collect()
}
