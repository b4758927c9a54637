//! Record and ACL URL construction.

use crate::error::FeedResult;
use docfeed_spi::{doc_utils, properties, Document, FeedType, SpiError};
use url::form_urlencoded;

/// Scheme used for records the index cannot fetch on its own.
const CONNECTOR_SCHEME: &str = "googleconnector://";

/// Builds the URLs that identify records and ACLs in a feed.
#[derive(Debug, Clone)]
pub struct UrlConstructor {
    data_source: String,
    feed_type: FeedType,
    content_url_prefix: Option<String>,
}

impl UrlConstructor {
    /// Creates a constructor for one data source and feed type.
    pub fn new(
        data_source: impl Into<String>,
        feed_type: FeedType,
        content_url_prefix: Option<String>,
    ) -> Self {
        Self {
            data_source: data_source.into(),
            feed_type,
            content_url_prefix,
        }
    }

    /// Returns the URL of the record or stand-alone ACL for `document`.
    ///
    /// Web feeds use the document's search URL. Other feeds derive the URL
    /// from the docid. A `google:fragment` property is appended as a URL
    /// fragment.
    ///
    /// # Errors
    ///
    /// Returns a document-level error if the search URL (web feeds) or the
    /// docid (other feeds) is missing.
    pub fn record_url(&self, document: &dyn Document) -> FeedResult<String> {
        let fragment = doc_utils::get_optional_string(document, properties::FRAGMENT)?;
        if self.feed_type == FeedType::Web {
            let search_url = doc_utils::get_optional_string(document, properties::SEARCHURL)?
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    SpiError::repository_document(format!(
                        "web feed document has no {}",
                        properties::SEARCHURL
                    ))
                })?;
            return Ok(with_fragment(search_url, fragment.as_deref()));
        }
        let docid = doc_utils::get_optional_string(document, properties::DOCID)?
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                SpiError::repository_document(format!("document has no {}", properties::DOCID))
            })?;
        Ok(self.url_for_docid(&docid, self.feed_type, fragment.as_deref()))
    }

    /// Returns the URL of the ACL that `document` inherits from, if any.
    ///
    /// An explicit `google:aclinheritfrom` wins; otherwise the URL is built
    /// from `google:aclinheritfrom:docid` with the optional feed type and
    /// fragment properties.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub fn inherit_from_url(&self, document: &dyn Document) -> FeedResult<Option<String>> {
        if let Some(url) = doc_utils::get_optional_string(document, properties::ACLINHERITFROM)?
            .filter(|s| !s.is_empty())
        {
            return Ok(Some(url));
        }
        let Some(docid) =
            doc_utils::get_optional_string(document, properties::ACLINHERITFROM_DOCID)?
                .filter(|s| !s.is_empty())
        else {
            return Ok(None);
        };
        let feed_type =
            doc_utils::get_optional_string(document, properties::ACLINHERITFROM_FEEDTYPE)?
                .and_then(|s| FeedType::find(&s))
                .unwrap_or(self.feed_type);
        let fragment =
            doc_utils::get_optional_string(document, properties::ACLINHERITFROM_FRAGMENT)?;
        Ok(Some(self.url_for_docid(&docid, feed_type, fragment.as_deref())))
    }

    fn url_for_docid(&self, docid: &str, feed_type: FeedType, fragment: Option<&str>) -> String {
        let encoded: String = form_urlencoded::byte_serialize(docid.as_bytes()).collect();
        let base = match (feed_type, &self.content_url_prefix) {
            (FeedType::ContentUrl, Some(prefix)) => {
                let connector: String =
                    form_urlencoded::byte_serialize(self.data_source.as_bytes()).collect();
                format!("{prefix}?ConnectorName={connector}&docid={encoded}")
            }
            _ => format!(
                "{CONNECTOR_SCHEME}{}.localhost/doc?docid={encoded}",
                self.data_source
            ),
        };
        with_fragment(base, fragment)
    }
}

fn with_fragment(url: String, fragment: Option<&str>) -> String {
    match fragment.filter(|f| !f.is_empty()) {
        Some(fragment) => {
            let encoded: String = form_urlencoded::byte_serialize(fragment.as_bytes()).collect();
            format!("{url}#{encoded}")
        }
        None => url,
    }
}
