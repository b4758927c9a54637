//! Dynamic property value type.

use crate::error::{SpiError, SpiResult};
use crate::principal::Principal;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::io::{Cursor, Read};
use std::sync::Arc;

/// A boxed content reader.
pub type ContentReader = Box<dyn Read + Send>;

/// A read-once content stream shared between clones of a [`Value`].
///
/// The first call to [`ContentStream::take`] hands the reader out;
/// later calls see `None`, like a consumed input stream.
#[derive(Clone)]
pub struct ContentStream {
    inner: Arc<Mutex<Option<ContentReader>>>,
}

impl ContentStream {
    /// Wraps a reader.
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(Box::new(reader)))),
        }
    }

    /// Takes the reader, leaving the stream consumed.
    pub fn take(&self) -> Option<ContentReader> {
        self.inner.lock().take()
    }

    /// Returns true once the reader has been taken.
    pub fn is_consumed(&self) -> bool {
        self.inner.lock().is_none()
    }
}

impl fmt::Debug for ContentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStream")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

impl PartialEq for ContentStream {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A single value of a document property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text.
    String(String),
    /// Boolean.
    Boolean(bool),
    /// Signed integer.
    Long(i64),
    /// Floating point number.
    Double(f64),
    /// Point in time.
    Date(DateTime<Utc>),
    /// Raw bytes, typically document content.
    Binary(Vec<u8>),
    /// A structured ACL principal.
    Principal(Principal),
    /// Streamed content that can be read once.
    Stream(ContentStream),
}

impl Value {
    /// Creates a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Creates a stream value from a reader.
    pub fn stream(reader: impl Read + Send + 'static) -> Self {
        Self::Stream(ContentStream::new(reader))
    }

    /// Coerces this value to a boolean.
    ///
    /// Strings `true`, `t` and `1` (any case) are true, other strings false.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::InvalidValue`] for dates, binaries, principals and streams.
    pub fn to_bool(&self) -> SpiResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Long(n) => Ok(*n != 0),
            Self::String(s) => {
                let s = s.trim();
                Ok(s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("t") || s == "1")
            }
            other => Err(SpiError::invalid_value("boolean", other.to_string())),
        }
    }

    /// Coerces this value to an integer.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::InvalidValue`] if the value has no integer form.
    pub fn to_long(&self) -> SpiResult<i64> {
        match self {
            Self::Long(n) => Ok(*n),
            Self::Boolean(b) => Ok(i64::from(*b)),
            Self::String(s) => s
                .trim()
                .parse()
                .map_err(|_| SpiError::invalid_value("integer", s.clone())),
            Self::Date(d) => Ok(d.timestamp_millis()),
            other => Err(SpiError::invalid_value("integer", other.to_string())),
        }
    }

    /// Coerces this value to a timestamp.
    ///
    /// Strings are accepted in RFC 3339 form or as a bare `YYYY-MM-DD`
    /// date (midnight UTC). Integers are milliseconds since the epoch.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::InvalidValue`] for malformed timestamps.
    pub fn to_date(&self) -> SpiResult<DateTime<Utc>> {
        match self {
            Self::Date(d) => Ok(*d),
            Self::Long(ms) => Utc
                .timestamp_millis_opt(*ms)
                .single()
                .ok_or_else(|| SpiError::invalid_value("timestamp", ms.to_string())),
            Self::String(s) => parse_timestamp(s.trim())
                .ok_or_else(|| SpiError::invalid_value("timestamp", s.clone())),
            other => Err(SpiError::invalid_value("timestamp", other.to_string())),
        }
    }

    /// Opens this value as a content reader.
    ///
    /// Strings and binaries are read from memory; streams are taken.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::RepositoryDocument`] if the stream was already
    /// consumed, or [`SpiError::InvalidValue`] for non-content values.
    pub fn into_reader(self) -> SpiResult<ContentReader> {
        match self {
            Self::String(s) => Ok(Box::new(Cursor::new(s.into_bytes()))),
            Self::Binary(b) => Ok(Box::new(Cursor::new(b))),
            Self::Stream(stream) => stream
                .take()
                .ok_or_else(|| SpiError::repository_document("content stream already consumed")),
            other => Err(SpiError::invalid_value("stream", other.to_string())),
        }
    }

    /// Returns the text written for this value in a `<meta content=...>`
    /// attribute, or `None` when the value has no metadata form.
    pub fn to_feed_xml(&self) -> Option<String> {
        match self {
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Self::Binary(_) | Self::Stream(_) => None,
            other => Some(other.to_string()),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Long(n) => write!(f, "{n}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Date(d) => f.write_str(&d.to_rfc3339()),
            Self::Binary(b) => f.write_str(&String::from_utf8_lossy(b)),
            Self::Principal(p) => f.write_str(p.name()),
            Self::Stream(_) => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Long(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl From<Principal> for Value {
    fn from(p: Principal) -> Self {
        Self::Principal(p)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}
