//! Content encoding pipeline.
//!
//! Raw content flows through `zlib -> base64 -> line wrap` (compression
//! only for `base64compressed`) straight into the feed buffer, one bounded
//! chunk at a time. Content that is missing or empty is replaced by a
//! small alternate payload so the index never receives an empty body.

use crate::error::{FeedError, FeedResult};
use crate::xml;
use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderWriter;
use docfeed_spi::{ContentEncoding, ContentReader};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};
use tracing::{debug, warn};

/// Column at which wrapped base64 output breaks lines.
pub const BASE64_LINE_LENGTH: usize = 76;

/// Size of the read buffer used while streaming content.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Mimetype for which the alternate payload is an HTML page.
const HTML_MIMETYPE: &str = "text/html";

/// How the content of one document is to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingPlan {
    /// Encoding named in the `<content encoding=...>` attribute.
    pub encoding: ContentEncoding,
    /// True if the document supplies content that is already encoded.
    pub pre_encoded: bool,
}

/// What [`ContentEncodingPipeline::write_content`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentOutcome {
    /// Raw bytes read from the document.
    pub bytes_read: u64,
    /// True if the alternate payload was written instead.
    pub alternate: bool,
    /// True if reading stopped at the document size limit. Bytes past the
    /// limit are never read, so content of exactly the limit counts too.
    pub truncated: bool,
}

/// Chooses and applies the content transforms for one feed.
#[derive(Debug, Clone)]
pub struct ContentEncodingPipeline {
    capabilities: String,
    default_encoding: ContentEncoding,
    wrap_lines: bool,
    max_document_size: u64,
}

impl ContentEncodingPipeline {
    /// Creates a pipeline from the index's capability string.
    ///
    /// Compressed base64 is the default whenever the index advertises it.
    pub fn negotiate(capabilities: &str, wrap_lines: bool, max_document_size: u64) -> Self {
        let capabilities = capabilities.to_lowercase();
        let default_encoding = if capabilities.contains(ContentEncoding::Base64Compressed.as_str())
        {
            ContentEncoding::Base64Compressed
        } else {
            ContentEncoding::Base64Binary
        };
        debug!(
            capabilities = %capabilities,
            encoding = %default_encoding,
            "negotiated content encoding"
        );
        Self {
            capabilities,
            default_encoding,
            wrap_lines,
            max_document_size,
        }
    }

    /// Returns the encoding used when a document declares none.
    pub fn default_encoding(&self) -> ContentEncoding {
        self.default_encoding
    }

    /// Returns true if the index accepts `encoding`.
    pub fn supports(&self, encoding: &str) -> bool {
        let encoding = encoding.trim().to_lowercase();
        !encoding.is_empty() && self.capabilities.contains(&encoding)
    }

    /// Picks the encoding for a document that declares `declared`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::UnsupportedEncoding`] if the declared encoding
    /// is unknown or not accepted by the index.
    pub fn select(&self, declared: Option<&str>) -> FeedResult<EncodingPlan> {
        let Some(declared) = declared.map(str::trim).filter(|d| !d.is_empty()) else {
            return Ok(EncodingPlan {
                encoding: self.default_encoding,
                pre_encoded: false,
            });
        };
        match ContentEncoding::find(declared) {
            Some(encoding) if self.supports(declared) => Ok(EncodingPlan {
                encoding,
                pre_encoded: true,
            }),
            _ => {
                warn!(encoding = declared, "unsupported content encoding");
                Err(FeedError::unsupported_encoding(declared))
            }
        }
    }

    /// Streams `content` into `out` according to `plan`.
    ///
    /// At most `max_document_size` bytes are read. If `content` is absent
    /// or yields no bytes, `alternate` is encoded instead, never wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] if reading the content or writing the
    /// output fails.
    pub fn write_content(
        &self,
        plan: EncodingPlan,
        content: Option<ContentReader>,
        alternate: &[u8],
        out: &mut dyn Write,
    ) -> FeedResult<ContentOutcome> {
        let Some(reader) = content else {
            encode(plan.encoding, false, alternate, &mut io::empty(), out)?;
            return Ok(ContentOutcome {
                alternate: true,
                ..ContentOutcome::default()
            });
        };

        let mut limited = reader.take(self.max_document_size);
        let mut chunk = vec![0u8; CHUNK_SIZE];
        let first = read_some(&mut limited, &mut chunk)?;
        if first == 0 {
            encode(plan.encoding, false, alternate, &mut io::empty(), out)?;
            return Ok(ContentOutcome {
                alternate: true,
                ..ContentOutcome::default()
            });
        }

        let bytes_read = if plan.pre_encoded {
            out.write_all(&chunk[..first])?;
            first as u64 + io::copy(&mut limited, out)?
        } else {
            encode(plan.encoding, self.wrap_lines, &chunk[..first], &mut limited, out)?
        };

        let truncated = limited.limit() == 0;
        if truncated {
            warn!(
                limit = self.max_document_size,
                "document content reached size limit, rest not read"
            );
        }
        Ok(ContentOutcome {
            bytes_read,
            alternate: false,
            truncated,
        })
    }
}

/// Builds the payload used when a document has no content.
///
/// A blank title yields a single space; HTML documents get a minimal page
/// carrying the title; anything else gets the title text.
pub fn alternate_content(title: Option<&str>, mimetype: Option<&str>) -> Vec<u8> {
    let title = title.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return b" ".to_vec();
    }
    let is_html = mimetype
        .map(|m| m.trim().eq_ignore_ascii_case(HTML_MIMETYPE))
        .unwrap_or(false);
    if is_html {
        let mut page = String::from("<html><title>");
        xml::append_escaped(&mut page, title);
        page.push_str("</title></html>");
        page.into_bytes()
    } else {
        title.as_bytes().to_vec()
    }
}

/// Reads until at least one byte arrives or the reader is exhausted.
fn read_some<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// Encodes `first` followed by everything in `rest`, returning the number
/// of raw bytes consumed.
fn encode(
    encoding: ContentEncoding,
    wrap_lines: bool,
    first: &[u8],
    rest: &mut dyn Read,
    out: &mut dyn Write,
) -> io::Result<u64> {
    let line_length = wrap_lines.then_some(BASE64_LINE_LENGTH);
    let mut base64 = EncoderWriter::new(LineWrapWriter::new(out, line_length), &STANDARD);
    let consumed = match encoding {
        ContentEncoding::Base64Binary => pump(first, rest, &mut base64)?,
        ContentEncoding::Base64Compressed => {
            let mut zlib = ZlibEncoder::new(&mut base64, Compression::default());
            let consumed = pump(first, rest, &mut zlib)?;
            zlib.finish()?;
            consumed
        }
    };
    base64.finish()?;
    Ok(consumed)
}

fn pump(first: &[u8], rest: &mut dyn Read, sink: &mut impl Write) -> io::Result<u64> {
    sink.write_all(first)?;
    let mut total = first.len() as u64;
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = read_some(rest, &mut chunk)?;
        if n == 0 {
            return Ok(total);
        }
        sink.write_all(&chunk[..n])?;
        total += n as u64;
    }
}

/// Inserts a newline after every `line_length` bytes written.
struct LineWrapWriter<W> {
    inner: W,
    line_length: Option<usize>,
    column: usize,
}

impl<W: Write> LineWrapWriter<W> {
    fn new(inner: W, line_length: Option<usize>) -> Self {
        Self {
            inner,
            line_length,
            column: 0,
        }
    }
}

impl<W: Write> Write for LineWrapWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(line_length) = self.line_length else {
            return self.inner.write(buf);
        };
        let mut rest = buf;
        while !rest.is_empty() {
            if self.column == line_length {
                self.inner.write_all(b"\n")?;
                self.column = 0;
            }
            let n = rest.len().min(line_length - self.column);
            self.inner.write_all(&rest[..n])?;
            self.column += n;
            rest = &rest[n..];
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use flate2::read::ZlibDecoder;
    use std::io::Cursor;

    fn reader(bytes: &[u8]) -> Option<ContentReader> {
        Some(Box::new(Cursor::new(bytes.to_vec())))
    }

    fn run(
        pipeline: &ContentEncodingPipeline,
        plan: EncodingPlan,
        content: Option<ContentReader>,
        alternate: &[u8],
    ) -> (String, ContentOutcome) {
        let mut out = Vec::new();
        let outcome = pipeline
            .write_content(plan, content, alternate, &mut out)
            .unwrap();
        (String::from_utf8(out).unwrap(), outcome)
    }

    #[test]
    fn negotiates_compressed_when_advertised() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary,base64compressed", true, 100);
        assert_eq!(pipeline.default_encoding(), ContentEncoding::Base64Compressed);
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", true, 100);
        assert_eq!(pipeline.default_encoding(), ContentEncoding::Base64Binary);
    }

    #[test]
    fn unsupported_declared_encoding() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", true, 100);
        let err = pipeline.select(Some("base64compressed")).unwrap_err();
        assert!(matches!(err, FeedError::UnsupportedEncoding { ref encoding } if encoding == "base64compressed"));
        assert!(pipeline.select(Some("gzip")).is_err());
    }

    #[test]
    fn declared_encoding_is_pre_encoded() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", true, 100);
        let plan = pipeline.select(Some("base64binary")).unwrap();
        assert!(plan.pre_encoded);
        let plan = pipeline.select(None).unwrap();
        assert!(!plan.pre_encoded);
        assert_eq!(plan.encoding, ContentEncoding::Base64Binary);
    }

    #[test]
    fn encodes_plain_base64() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", true, 100);
        let plan = pipeline.select(None).unwrap();
        let (out, outcome) = run(&pipeline, plan, reader(b"hello"), b" ");
        assert_eq!(out, "aGVsbG8=");
        assert_eq!(outcome.bytes_read, 5);
        assert!(!outcome.alternate);
        assert!(!outcome.truncated);
    }

    #[test]
    fn wraps_long_lines() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", true, 1000);
        let plan = pipeline.select(None).unwrap();
        let (out, _) = run(&pipeline, plan, reader(&[b'x'; 120]), b" ");
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[..2].iter().all(|l| l.len() == BASE64_LINE_LENGTH));
        assert_eq!(lines[2].len(), 160 - 2 * BASE64_LINE_LENGTH);
        assert!(!out.ends_with('\n'));

        let unwrapped = ContentEncodingPipeline::negotiate("base64binary", false, 1000);
        let (out, _) = run(&unwrapped, plan, reader(&[b'x'; 120]), b" ");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn compressed_round_trips() {
        let pipeline = ContentEncodingPipeline::negotiate("base64compressed", false, 1000);
        let plan = pipeline.select(None).unwrap();
        let (out, _) = run(&pipeline, plan, reader(b"hello hello hello"), b" ");
        let compressed = STANDARD.decode(out).unwrap();
        let mut text = String::new();
        ZlibDecoder::new(&compressed[..]).read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello hello hello");
    }

    #[test]
    fn missing_or_empty_content_uses_alternate() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", true, 100);
        let plan = pipeline.select(None).unwrap();
        let (out, outcome) = run(&pipeline, plan, None, b" ");
        assert_eq!(out, "IA==");
        assert!(outcome.alternate);
        let (out, outcome) = run(&pipeline, plan, reader(b""), b"title");
        assert_eq!(out, STANDARD.encode("title"));
        assert!(outcome.alternate);
    }

    #[test]
    fn alternate_is_never_wrapped() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", true, 100);
        let plan = pipeline.select(None).unwrap();
        let (out, _) = run(&pipeline, plan, None, &[b'a'; 200]);
        assert!(!out.contains('\n'));
    }

    #[test]
    fn pre_encoded_is_copied() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", true, 100);
        let plan = pipeline.select(Some("base64binary")).unwrap();
        let (out, _) = run(&pipeline, plan, reader(b"aGVsbG8="), b" ");
        assert_eq!(out, "aGVsbG8=");
    }

    #[test]
    fn content_is_truncated_at_limit() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", false, 4);
        let plan = pipeline.select(None).unwrap();
        let (out, outcome) = run(&pipeline, plan, reader(b"abcdefgh"), b" ");
        assert_eq!(out, STANDARD.encode("abcd"));
        assert!(outcome.truncated);
        assert_eq!(outcome.bytes_read, 4);

        let (_, outcome) = run(&pipeline, plan, reader(b"abc"), b" ");
        assert!(!outcome.truncated);
    }

    /// Yields its data, then fails on any further read.
    struct StallingReader(Cursor<Vec<u8>>);

    impl Read for StallingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::TimedOut, "stalled")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn nothing_is_read_past_limit() {
        let pipeline = ContentEncodingPipeline::negotiate("base64binary", false, 4);
        let plan = pipeline.select(None).unwrap();
        let stalling: ContentReader = Box::new(StallingReader(Cursor::new(b"abcd".to_vec())));
        let mut out = Vec::new();
        let outcome = pipeline
            .write_content(plan, Some(stalling), b" ", &mut out)
            .unwrap();
        assert_eq!(out, STANDARD.encode("abcd").into_bytes());
        assert_eq!(outcome.bytes_read, 4);
        assert!(outcome.truncated);
    }

    #[test]
    fn alternate_payloads() {
        assert_eq!(alternate_content(None, None), b" ");
        assert_eq!(alternate_content(Some("  "), Some("text/html")), b" ");
        assert_eq!(
            alternate_content(Some("A & B"), Some("text/html")),
            b"<html><title>A &amp; B</title></html>"
        );
        assert_eq!(alternate_content(Some("Report"), Some("application/pdf")), b"Report");
        assert_eq!(alternate_content(Some("Report"), None), b"Report");
    }
}
