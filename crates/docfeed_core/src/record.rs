//! Record assembly.
//!
//! A [`RecordBuilder`] classifies one document and writes the `<record>`
//! (or stand-alone `<acl>`) elements for it. Attribute values that cannot
//! be read cleanly fall back to a default and carry a [`FieldIssue`]
//! instead of failing the document.

use crate::acl;
use crate::content::{self, ContentEncodingPipeline};
use crate::error::FeedResult;
use crate::metadata;
use crate::url::UrlConstructor;
use crate::xml;
use chrono::{DateTime, Utc};
use docfeed_spi::filter::{ExtractedAclDocument, InheritFromExtractedAclDocument, StripAclDocument};
use docfeed_spi::{doc_utils, properties, ActionType, Document, DocumentType, FeedType, Value};
use std::io::Write;
use thiserror::Error;
use tracing::{debug, warn};

/// `authmethod` for documents anyone may see.
pub const AUTHMETHOD_NONE: &str = "none";

/// `authmethod` for documents that require authentication.
pub const AUTHMETHOD_CONNECTOR: &str = "httpbasic";

/// Placeholder written to the feed log instead of content.
pub const CONTENT_PLACEHOLDER: &str = "...content...";

/// Format of the `last-modified` attribute.
const LAST_MODIFIED_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// How a document is turned into feed elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A regular record, possibly with an inline ACL.
    Content,
    /// A content-URL record whose ACL is sent first as a separate element.
    ContentUrlDocument,
    /// A stand-alone ACL.
    AclOnly,
}

/// A field value that had to be replaced by a default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIssue {
    /// `google:lastmodified` could not be read as a timestamp.
    #[error("malformed last-modified value {0:?}, attribute omitted")]
    MalformedTimestamp(String),

    /// `google:action` named no known action.
    #[error("unknown action {0:?}, treated as absent")]
    UnknownAction(String),

    /// `google:ispublic` was not a boolean.
    #[error("invalid ispublic value {0:?}, treated as not public")]
    InvalidPublicFlag(String),

    /// `google:ispublic` and `google:authmethod` disagree.
    #[error("security conflict: ispublic={is_public} and authmethod={authmethod:?}; using {resolved:?}")]
    AuthConflict {
        /// The public flag.
        is_public: bool,
        /// The declared auth method.
        authmethod: String,
        /// The more restrictive value written.
        resolved: String,
    },
}

/// A value read with a fallback, plus what went wrong if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    /// The value to use.
    pub value: T,
    /// Set when `value` is a fallback.
    pub issue: Option<FieldIssue>,
}

impl<T> Parsed<T> {
    fn ok(value: T) -> Self {
        Self { value, issue: None }
    }

    fn fallback(value: T, issue: FieldIssue) -> Self {
        Self {
            value,
            issue: Some(issue),
        }
    }
}

/// Resolves `google:action`. Unknown tokens are treated as absent.
pub fn resolve_action(raw: Option<&str>) -> Parsed<Option<ActionType>> {
    match raw.map(ActionType::find) {
        None => Parsed::ok(None),
        Some(ActionType::Error) => Parsed::fallback(
            None,
            FieldIssue::UnknownAction(raw.unwrap_or_default().to_string()),
        ),
        Some(action) => Parsed::ok(Some(action)),
    }
}

/// Resolves `google:lastmodified`. Malformed values are omitted.
pub fn resolve_last_modified(value: Option<&Value>) -> Parsed<Option<DateTime<Utc>>> {
    match value.map(|v| (v, v.to_date())) {
        None => Parsed::ok(None),
        Some((_, Ok(date))) => Parsed::ok(Some(date)),
        Some((raw, Err(_))) => Parsed::fallback(None, FieldIssue::MalformedTimestamp(raw.to_string())),
    }
}

/// Resolves `google:ispublic`, which defaults to true.
///
/// A value that is not a boolean makes the document non-public.
pub fn resolve_is_public(value: Option<&Value>) -> Parsed<bool> {
    match value.map(|v| (v, v.to_bool())) {
        None => Parsed::ok(true),
        Some((_, Ok(is_public))) => Parsed::ok(is_public),
        Some((raw, Err(_))) => Parsed::fallback(false, FieldIssue::InvalidPublicFlag(raw.to_string())),
    }
}

/// Picks the `authmethod` attribute from the public flag and an explicit
/// `google:authmethod`.
///
/// When they disagree the one requiring authentication wins. An explicit
/// method other than `none` is written as given.
pub fn resolve_authmethod(is_public: bool, authmethod: Option<&str>) -> Parsed<String> {
    let declared = authmethod.unwrap_or_default();
    let normalized = declared.trim().to_lowercase();
    let resolved = if normalized.is_empty() || normalized == AUTHMETHOD_NONE {
        if is_public {
            AUTHMETHOD_NONE.to_string()
        } else {
            AUTHMETHOD_CONNECTOR.to_string()
        }
    } else {
        declared.to_string()
    };
    if !normalized.is_empty() && is_public != (normalized == AUTHMETHOD_NONE) {
        let issue = FieldIssue::AuthConflict {
            is_public,
            authmethod: declared.to_string(),
            resolved: resolved.clone(),
        };
        return Parsed::fallback(resolved, issue);
    }
    Parsed::ok(resolved)
}

/// The attributes of one `<record>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord {
    /// How the document is being encoded.
    pub kind: RecordKind,
    /// Record URL.
    pub url: String,
    /// URL shown in search results, if different.
    pub display_url: Option<String>,
    /// Requested action; `None` means an implicit add.
    pub action: Option<ActionType>,
    /// Keep the document in the index when the index is full.
    pub lock: bool,
    /// Recrawl as soon as possible.
    pub crawl_immediately: bool,
    /// Crawl only once.
    pub crawl_once: bool,
    /// Opaque ranking hint.
    pub pagerank: Option<String>,
    /// Content mimetype.
    pub mimetype: String,
    /// Modification time.
    pub last_modified: Option<DateTime<Utc>>,
    /// Resolved authentication method.
    pub authmethod: String,
    /// Whether the document carries ACL properties.
    pub has_acl: bool,
    /// Values that fell back to a default.
    pub issues: Vec<FieldIssue>,
}

impl FeedRecord {
    /// Reads the record attributes from `document`.
    ///
    /// # Errors
    ///
    /// Propagates repository errors and URL construction failures.
    pub fn from_document(
        kind: RecordKind,
        document: &dyn Document,
        urls: &UrlConstructor,
    ) -> FeedResult<Self> {
        let mut issues = Vec::new();
        let mut note = |issue: Option<FieldIssue>| {
            if let Some(issue) = issue {
                warn!(%issue, "record field replaced by default");
                issues.push(issue);
            }
        };

        let url = urls.record_url(document)?;

        let action = resolve_action(
            doc_utils::get_optional_string(document, properties::ACTION)?.as_deref(),
        );
        note(action.issue);

        let last_modified = resolve_last_modified(
            doc_utils::get_optional_value(document, properties::LASTMODIFIED)?.as_ref(),
        );
        note(last_modified.issue);

        let is_public = resolve_is_public(
            doc_utils::get_optional_value(document, properties::ISPUBLIC)?.as_ref(),
        );
        note(is_public.issue);

        let authmethod = resolve_authmethod(
            is_public.value,
            doc_utils::get_optional_string(document, properties::AUTHMETHOD)?.as_deref(),
        );
        note(authmethod.issue);

        let non_empty = |s: &String| !s.is_empty();
        Ok(Self {
            kind,
            url,
            display_url: doc_utils::get_optional_string(document, properties::DISPLAYURL)?
                .filter(non_empty),
            action: action.value,
            lock: doc_utils::get_optional_bool(document, properties::LOCK, false)?,
            crawl_immediately: doc_utils::get_optional_bool(
                document,
                properties::CRAWL_IMMEDIATELY,
                false,
            )?,
            crawl_once: doc_utils::get_optional_bool(document, properties::CRAWL_ONCE, false)?,
            pagerank: doc_utils::get_optional_string(document, properties::PAGERANK)?
                .filter(non_empty),
            mimetype: doc_utils::get_optional_string(document, properties::MIMETYPE)?
                .filter(non_empty)
                .unwrap_or_else(|| properties::DEFAULT_MIMETYPE.to_string()),
            last_modified: last_modified.value,
            authmethod: authmethod.value,
            has_acl: doc_utils::has_acl_properties(document)?,
            issues,
        })
    }

    /// Returns true if the record removes the document.
    pub fn is_delete(&self) -> bool {
        self.action == Some(ActionType::Delete)
    }

    /// Appends the opening `<record ...>` tag and a newline.
    pub fn write_start(&self, out: &mut String) {
        out.push_str("<record");
        xml::append_attr(out, "url", &self.url);
        xml::append_opt_attr(out, "displayurl", self.display_url.as_deref());
        xml::append_opt_attr(out, "action", self.action.map(ActionType::as_str));
        for (name, set) in [
            ("lock", self.lock),
            ("crawl-immediately", self.crawl_immediately),
            ("crawl-once", self.crawl_once),
        ] {
            if set {
                xml::append_attr(out, name, "true");
            }
        }
        xml::append_opt_attr(out, "pagerank", self.pagerank.as_deref());
        xml::append_attr(out, "mimetype", &self.mimetype);
        if let Some(modified) = self.last_modified {
            xml::append_attr(
                out,
                "last-modified",
                &modified.format(LAST_MODIFIED_FORMAT).to_string(),
            );
        }
        xml::append_attr(out, "authmethod", &self.authmethod);
        out.push_str(">\n");
    }
}

/// Writes the feed elements for one document at a time.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
    feed_type: FeedType,
    urls: &'a UrlConstructor,
    content: &'a ContentEncodingPipeline,
}

impl<'a> RecordBuilder<'a> {
    /// Creates a builder for one feed.
    pub fn new(
        feed_type: FeedType,
        urls: &'a UrlConstructor,
        content: &'a ContentEncodingPipeline,
    ) -> Self {
        Self {
            feed_type,
            urls,
            content,
        }
    }

    /// Decides how `document` is encoded.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub fn classify(&self, document: &dyn Document) -> FeedResult<RecordKind> {
        let document_type = doc_utils::get_optional_string(document, properties::DOCUMENTTYPE)?
            .and_then(|t| DocumentType::find(&t));
        if document_type == Some(DocumentType::Acl) {
            Ok(RecordKind::AclOnly)
        } else if self.feed_type == FeedType::ContentUrl && doc_utils::has_acl_properties(document)?
        {
            Ok(RecordKind::ContentUrlDocument)
        } else {
            Ok(RecordKind::Content)
        }
    }

    /// Writes the elements for `document` to `out`, returning how many
    /// records were written.
    ///
    /// When `log` is given, the XML written is appended to it with content
    /// replaced by a placeholder. On error `out` may hold a partial record.
    ///
    /// # Errors
    ///
    /// Returns document-level errors for repository failures, unsupported
    /// content encodings and content read failures.
    pub fn build(
        &self,
        document: &dyn Document,
        out: &mut dyn Write,
        mut log: Option<&mut String>,
    ) -> FeedResult<usize> {
        let kind = self.classify(document)?;
        match kind {
            RecordKind::AclOnly => {
                self.write_acl_record(document, out, log)?;
                Ok(1)
            }
            RecordKind::ContentUrlDocument => {
                self.write_acl_record(&ExtractedAclDocument::new(document), out, log.as_deref_mut())?;
                self.write_document_record(
                    kind,
                    &InheritFromExtractedAclDocument::new(document),
                    out,
                    log,
                )?;
                Ok(2)
            }
            RecordKind::Content => {
                self.write_document_record(kind, document, out, log)?;
                Ok(1)
            }
        }
    }

    fn write_acl_record(
        &self,
        document: &dyn Document,
        out: &mut dyn Write,
        log: Option<&mut String>,
    ) -> FeedResult<()> {
        let mut element = String::new();
        acl::write_acl(&mut element, document, self.urls)?;
        out.write_all(element.as_bytes())?;
        if let Some(log) = log {
            log.push_str(&element);
        }
        debug!("wrote stand-alone acl");
        Ok(())
    }

    fn write_document_record(
        &self,
        kind: RecordKind,
        document: &dyn Document,
        out: &mut dyn Write,
        log: Option<&mut String>,
    ) -> FeedResult<()> {
        let record = FeedRecord::from_document(kind, document, self.urls)?;
        let delete = record.is_delete();
        let metadata_allowed = !delete && self.feed_type != FeedType::ContentUrl;
        let content_allowed = !delete && self.feed_type == FeedType::Content;

        let mut prefix = String::new();
        record.write_start(&mut prefix);

        let stripped = StripAclDocument::new(document);
        let mut document = document;
        if !delete && record.has_acl {
            acl::write_acl(&mut prefix, document, self.urls)?;
            document = &stripped;
        }
        if metadata_allowed {
            metadata::write_metadata(&mut prefix, document)?;
        }

        let plan = if content_allowed {
            let declared = doc_utils::get_optional_string(document, properties::CONTENT_ENCODING)?;
            let plan = self.content.select(declared.as_deref())?;
            prefix.push_str("<content");
            xml::append_attr(&mut prefix, "encoding", plan.encoding.as_str());
            prefix.push('>');
            Some(plan)
        } else {
            None
        };
        out.write_all(prefix.as_bytes())?;

        let mut suffix = String::new();
        if let Some(plan) = plan {
            let reader = doc_utils::get_optional_value(document, properties::CONTENT)?
                .map(Value::into_reader)
                .transpose()?;
            let alternate = content::alternate_content(
                doc_utils::get_optional_string(document, properties::TITLE)?.as_deref(),
                doc_utils::get_optional_string(document, properties::MIMETYPE)?.as_deref(),
            );
            let outcome = self.content.write_content(plan, reader, &alternate, out)?;
            debug!(
                url = %record.url,
                bytes = outcome.bytes_read,
                alternate = outcome.alternate,
                truncated = outcome.truncated,
                "wrote content"
            );
            xml::append_end_tag(&mut suffix, "content");
        }
        xml::append_end_tag(&mut suffix, "record");
        out.write_all(suffix.as_bytes())?;

        if let Some(log) = log {
            log.push_str(&prefix);
            if plan.is_some() {
                log.push_str(CONTENT_PLACEHOLDER);
            }
            log.push_str(&suffix);
        }
        debug!(url = %record.url, kind = ?kind, action = ?record.action, "wrote record");
        Ok(())
    }
}
