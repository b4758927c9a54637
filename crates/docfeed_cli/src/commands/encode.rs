//! Encode command implementation.

use crate::documents::{read_batch, to_document};
use docfeed_core::{FeedConfig, FeedData, FeedEncoder, UniqueIdGenerator, UuidGenerator};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One feed file written by the encode command.
#[derive(Debug, Serialize)]
pub struct FeedFile {
    /// Path of the feed file.
    pub path: String,
    /// Unique id of the feed.
    pub feed_id: String,
    /// Records in the feed.
    pub records: usize,
    /// Size of the feed in bytes.
    pub size: usize,
}

/// Encode command result.
#[derive(Debug, Serialize)]
pub struct EncodeResult {
    /// Documents read from the batch.
    pub documents: usize,
    /// Documents skipped because they could not be encoded.
    pub skipped: usize,
    /// Feed files written, in order.
    pub feeds: Vec<FeedFile>,
}

/// Runs the encode command.
pub fn run(
    input: &Path,
    output: &Path,
    config: FeedConfig,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = encode_batch(input, output, config, &UuidGenerator)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Encodes every document in `input`, starting a new feed file in
/// `output` whenever the current one is full.
pub fn encode_batch(
    input: &Path,
    output: &Path,
    config: FeedConfig,
    ids: &dyn UniqueIdGenerator,
) -> Result<EncodeResult, Box<dyn std::error::Error>> {
    let batch = read_batch(input)?;
    fs::create_dir_all(output)?;

    let mut result = EncodeResult {
        documents: batch.len(),
        skipped: 0,
        feeds: Vec::new(),
    };
    let mut encoder = FeedEncoder::open(config.clone(), ids)?;

    for (index, json) in batch.iter().enumerate() {
        let document = match to_document(index, json) {
            Ok(document) => document,
            Err(e) => {
                warn!(index, error = %e, "skipped document");
                result.skipped += 1;
                continue;
            }
        };
        match encoder.add_record(&document) {
            Ok(_) => {}
            Err(e) if e.is_document_level() => {
                warn!(index, error = %e, "skipped document");
                result.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
        if encoder.is_full() {
            let full = std::mem::replace(&mut encoder, FeedEncoder::open(config.clone(), ids)?);
            result.feeds.push(write_feed(full, output, result.feeds.len())?);
        }
    }

    if encoder.record_count() > 0 {
        result.feeds.push(write_feed(encoder, output, result.feeds.len())?);
    }

    Ok(result)
}

fn write_feed(
    mut encoder: FeedEncoder,
    output: &Path,
    sequence: usize,
) -> Result<FeedFile, Box<dyn std::error::Error>> {
    encoder.close()?;
    let path = feed_path(output, sequence, "xml");
    if let Some(log) = encoder.feed_log() {
        fs::write(feed_path(output, sequence, "log"), log)?;
    }
    let file = FeedFile {
        path: path.display().to_string(),
        feed_id: encoder.feed_id().to_string(),
        records: encoder.record_count(),
        size: encoder.size(),
    };
    fs::write(&path, encoder.into_bytes())?;
    info!(
        path = %file.path,
        feed_id = %file.feed_id,
        records = file.records,
        size = file.size,
        "wrote feed"
    );
    Ok(file)
}

fn feed_path(output: &Path, sequence: usize, extension: &str) -> PathBuf {
    output.join(format!("feed-{sequence:04}.{extension}"))
}

fn print_text_output(result: &EncodeResult) {
    println!("docfeed Encode");
    println!("==============");
    println!();
    println!("Documents: {}", result.documents);
    println!("Skipped:   {}", result.skipped);
    println!();
    println!("Feeds:");
    for feed in &result.feeds {
        println!(
            "  {} ({} records, {} bytes, id {})",
            feed.path, feed.records, feed.size, feed.feed_id
        );
    }
}
