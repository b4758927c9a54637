//! Inspect command implementation.

use serde::Serialize;
use std::fs;
use std::path::Path;

/// Feed inspection result.
#[derive(Debug, Default, Serialize)]
pub struct InspectResult {
    /// Feed file path.
    pub path: String,
    /// Feed size in bytes.
    pub size: u64,
    /// Data source from the header.
    pub data_source: Option<String>,
    /// Feed type from the header.
    pub feed_type: Option<String>,
    /// Number of `<record>` elements.
    pub record_count: usize,
    /// Records with `action="delete"`.
    pub delete_count: usize,
    /// Stand-alone `<acl>` elements.
    pub acl_count: usize,
    /// Records carrying inline content.
    pub content_count: usize,
    /// Whether the feed ends with its epilog.
    pub complete: bool,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No feed found at {:?}", path).into());
    }

    let text = fs::read_to_string(path)?;
    let mut result = analyze(&text);
    result.path = path.display().to_string();
    result.size = fs::metadata(path)?.len();

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

/// Scans feed text line by line.
///
/// Record and ACL start tags always begin a line, and escaped values never
/// contain a raw `<`, so no XML parser is needed.
pub fn analyze(text: &str) -> InspectResult {
    let mut result = InspectResult {
        data_source: between(text, "<datasource>", "</datasource>").map(|s| unescape(&s)),
        feed_type: between(text, "<feedtype>", "</feedtype>").map(|s| unescape(&s)),
        complete: text.trim_end().ends_with("</gsafeed>"),
        ..InspectResult::default()
    };

    let mut in_record = false;
    for line in text.lines() {
        if line.starts_with("<record ") {
            in_record = true;
            result.record_count += 1;
            if line.contains(" action=\"delete\"") {
                result.delete_count += 1;
            }
        } else if line.starts_with("</record>") {
            in_record = false;
        } else if line.starts_with("<acl") && !in_record {
            result.acl_count += 1;
        } else if line.starts_with("<content ") {
            result.content_count += 1;
        }
    }

    result
}

fn between(text: &str, open: &str, close: &str) -> Option<String> {
    let start = text.find(open)? + open.len();
    let len = text[start..].find(close)?;
    Some(text[start..start + len].to_string())
}

/// Reverses the entity escaping applied to header text.
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn print_text_output(result: &InspectResult) {
    println!("docfeed Feed Inspection");
    println!("=======================");
    println!();
    println!("Path: {}", result.path);
    println!("Size: {}", format_size(result.size));
    println!();
    println!("Header:");
    println!(
        "  Data source: {}",
        result.data_source.as_deref().unwrap_or("<missing>")
    );
    println!(
        "  Feed type:   {}",
        result.feed_type.as_deref().unwrap_or("<missing>")
    );
    println!();
    println!("Records:");
    println!("  Records:          {}", result.record_count);
    println!("  Deletes:          {}", result.delete_count);
    println!("  With content:     {}", result.content_count);
    println!("  Stand-alone ACLs: {}", result.acl_count);
    println!();
    println!("Complete: {}", if result.complete { "yes" } else { "no" });
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
