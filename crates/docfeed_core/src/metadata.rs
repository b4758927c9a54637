//! Metadata canonicalization.

use crate::error::FeedResult;
use crate::xml;
use docfeed_spi::{doc_utils, properties, Document};
use tracing::{debug, trace};

/// Properties consumed by the record itself and never sent as `<meta>`.
pub const PROPERTY_SKIP_SET: &[&str] = &[
    properties::ACTION,
    properties::AUTHMETHOD,
    properties::CONTENT,
    properties::CONTENTURL,
    properties::CONTENT_ENCODING,
    properties::CONTENT_LENGTH,
    properties::CRAWL_IMMEDIATELY,
    properties::CRAWL_ONCE,
    properties::DISPLAYURL,
    properties::DOCID,
    properties::DOCUMENTTYPE,
    properties::FEEDTYPE,
    properties::FRAGMENT,
    properties::ISPUBLIC,
    properties::LASTMODIFIED,
    properties::LOCK,
    properties::MIMETYPE,
    properties::OVERWRITEACLS,
    properties::PAGERANK,
    properties::SEARCHURL,
    properties::SECURITYTOKEN,
];

/// Returns true if `name` is never written as metadata.
pub fn is_skipped(name: &str) -> bool {
    PROPERTY_SKIP_SET.contains(&name) || properties::is_acl_property(name)
}

/// Appends the `<metadata>` element for `document`.
///
/// Property names are sorted so that an unchanged document always yields
/// identical metadata. Each value becomes its own `<meta>`; values that
/// are blank or have no textual form are dropped.
///
/// # Errors
///
/// Propagates repository errors.
pub fn write_metadata(out: &mut String, document: &dyn Document) -> FeedResult<usize> {
    let overwrite_acls = doc_utils::get_optional_bool(document, properties::OVERWRITEACLS, true)?;
    out.push_str("<metadata");
    if !overwrite_acls {
        xml::append_attr(out, "overwrite-acls", "false");
    }
    out.push_str(">\n");

    let mut names: Vec<String> = document.property_names()?.into_iter().collect();
    if names.is_empty() {
        debug!("document has no properties");
    }
    names.sort_unstable();

    let mut written = 0;
    for name in &names {
        if is_skipped(name) {
            if name == properties::CONTENT {
                trace!(property = %name, "...content...");
            } else {
                trace!(property = %name, "skipped");
            }
            continue;
        }
        let Some(mut property) = document.find_property(name)? else {
            continue;
        };
        while let Some(value) = property.next_value()? {
            trace!(property = %name, value = %value);
            let Some(text) = value.to_feed_xml().filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            out.push_str("<meta");
            xml::append_attr(out, "name", name);
            xml::append_attr(out, "content", &text);
            out.push_str("/>\n");
            written += 1;
        }
    }
    xml::append_end_tag(out, "metadata");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfeed_spi::{SimpleDocument, Value};

    #[test]
    fn skip_set() {
        assert!(is_skipped(properties::CONTENT));
        assert!(is_skipped(properties::ACLUSERS));
        assert!(is_skipped(properties::ACLINHERITFROM_DOCID));
        assert!(is_skipped(properties::LASTMODIFIED));
        assert!(!is_skipped(properties::TITLE));
        assert!(!is_skipped("author"));
    }

    #[test]
    fn sorted_and_multi_valued() {
        let mut doc = SimpleDocument::new()
            .with("zeta", "z")
            .with("alpha", "a1")
            .with(properties::DOCID, "1")
            .with(properties::CONTENT, "body");
        doc.add_value("alpha", "a2");
        let mut out = String::new();
        let written = write_metadata(&mut out, &doc).unwrap();
        assert_eq!(written, 3);
        assert_eq!(
            out,
            "<metadata>\n\
             <meta name=\"alpha\" content=\"a1\"/>\n\
             <meta name=\"alpha\" content=\"a2\"/>\n\
             <meta name=\"zeta\" content=\"z\"/>\n\
             </metadata>\n"
        );
    }

    #[test]
    fn blank_and_binary_values_are_dropped() {
        let doc = SimpleDocument::new()
            .with("blank", "   ")
            .with("bytes", Value::Binary(vec![1, 2, 3]))
            .with("count", 7i64);
        let mut out = String::new();
        write_metadata(&mut out, &doc).unwrap();
        assert_eq!(out, "<metadata>\n<meta name=\"count\" content=\"7\"/>\n</metadata>\n");
    }

    #[test]
    fn overwrite_acls_false() {
        let doc = SimpleDocument::new().with(properties::OVERWRITEACLS, false);
        let mut out = String::new();
        write_metadata(&mut out, &doc).unwrap();
        assert_eq!(out, "<metadata overwrite-acls=\"false\">\n</metadata>\n");

        let doc = SimpleDocument::new().with(properties::OVERWRITEACLS, true);
        let mut out = String::new();
        write_metadata(&mut out, &doc).unwrap();
        assert_eq!(out, "<metadata>\n</metadata>\n");
    }

    #[test]
    fn values_are_escaped() {
        let doc = SimpleDocument::new().with("q", "a<b & \"c\"");
        let mut out = String::new();
        write_metadata(&mut out, &doc).unwrap();
        assert!(out.contains("<meta name=\"q\" content=\"a&lt;b &amp; &quot;c&quot;\"/>"));
    }
}
