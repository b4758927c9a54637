//! docfeed CLI
//!
//! Command-line tools for producing and checking XML feeds.
//!
//! # Commands
//!
//! - `encode` - Encode a JSON batch of documents into feed files
//! - `inspect` - Display statistics for a feed file

mod commands;
mod documents;

use clap::{Parser, Subcommand};
use docfeed_spi::FeedType;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// docfeed command-line feed tools.
#[derive(Parser)]
#[command(name = "docfeed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON batch of documents into feed files
    Encode {
        /// JSON file holding an array of documents
        input: PathBuf,

        /// Directory the feed files are written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Data source named in the feed header
        #[arg(short, long)]
        data_source: String,

        /// Feed type (content, web, contenturl, acl)
        #[arg(short = 't', long, default_value = "content", value_parser = parse_feed_type)]
        feed_type: FeedType,

        /// Soft cap on the size of one feed file in bytes
        #[arg(long)]
        max_feed_size: Option<usize>,

        /// Maximum content bytes read per document
        #[arg(long)]
        max_document_size: Option<u64>,

        /// Encodings the receiving index accepts
        #[arg(long, default_value = "base64binary")]
        content_encodings: String,

        /// Prefix for content URLs in contenturl feeds
        #[arg(long)]
        content_url_prefix: Option<String>,

        /// Do not wrap base64 content at 76 columns
        #[arg(long)]
        no_wrap: bool,

        /// Also write a feed log next to every feed file
        #[arg(long)]
        feed_log: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Display statistics for a feed file
    Inspect {
        /// Feed file to inspect
        feed: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn parse_feed_type(value: &str) -> Result<FeedType, String> {
    FeedType::find(value).ok_or_else(|| format!("unknown feed type: {value}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Encode {
            input,
            output,
            data_source,
            feed_type,
            max_feed_size,
            max_document_size,
            content_encodings,
            content_url_prefix,
            no_wrap,
            feed_log,
            format,
        } => {
            let mut config = docfeed_core::FeedConfig::new(data_source, feed_type)
                .content_encodings(content_encodings)
                .wrap_lines(!no_wrap)
                .feed_log(feed_log);
            if let Some(size) = max_feed_size {
                config = config.max_feed_size(size);
            }
            if let Some(size) = max_document_size {
                config = config.max_document_size(size);
            }
            if let Some(prefix) = content_url_prefix {
                config = config.content_url_prefix(prefix);
            }
            commands::encode::run(&input, &output, config, &format)?;
        }
        Commands::Inspect { feed, format } => {
            commands::inspect::run(&feed, &format)?;
        }
        Commands::Version => {
            println!("docfeed CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("docfeed core v{}", docfeed_core::VERSION);
        }
    }

    Ok(())
}
