//! Convenience readers for single-valued properties.

use crate::document::Document;
use crate::error::SpiResult;
use crate::properties;
use crate::value::Value;

/// Returns the first value of the named property, if any.
///
/// # Errors
///
/// Propagates repository errors.
pub fn get_optional_value(document: &dyn Document, name: &str) -> SpiResult<Option<Value>> {
    match document.find_property(name)? {
        Some(mut property) => property.next_value(),
        None => Ok(None),
    }
}

/// Returns the first value of the named property as a string, if any.
///
/// # Errors
///
/// Propagates repository errors.
pub fn get_optional_string(document: &dyn Document, name: &str) -> SpiResult<Option<String>> {
    Ok(get_optional_value(document, name)?.map(|v| v.to_string()))
}

/// Returns the first value of the named property as a boolean, or
/// `default` when the property is absent.
///
/// # Errors
///
/// Propagates repository errors and failed boolean coercions.
pub fn get_optional_bool(document: &dyn Document, name: &str, default: bool) -> SpiResult<bool> {
    match get_optional_value(document, name)? {
        Some(value) => value.to_bool(),
        None => Ok(default),
    }
}

/// Returns true if the document carries any ACL principals or
/// inheritance information.
///
/// # Errors
///
/// Propagates repository errors.
pub fn has_acl_properties(document: &dyn Document) -> SpiResult<bool> {
    for name in [
        properties::ACLUSERS,
        properties::ACLGROUPS,
        properties::ACLDENYUSERS,
        properties::ACLDENYGROUPS,
        properties::ACLINHERITFROM,
        properties::ACLINHERITFROM_DOCID,
    ] {
        if document.has_property(name)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SimpleDocument;

    #[test]
    fn optional_string() {
        let doc = SimpleDocument::new().with("a", "x").with("a", "y");
        assert_eq!(get_optional_string(&doc, "a").unwrap().as_deref(), Some("x"));
        assert_eq!(get_optional_string(&doc, "b").unwrap(), None);
    }

    #[test]
    fn optional_bool_defaults() {
        let doc = SimpleDocument::new().with(properties::LOCK, "true");
        assert!(get_optional_bool(&doc, properties::LOCK, false).unwrap());
        assert!(get_optional_bool(&doc, properties::CRAWL_ONCE, true).unwrap());
        assert!(!get_optional_bool(&doc, properties::CRAWL_ONCE, false).unwrap());
    }

    #[test]
    fn acl_detection() {
        assert!(!has_acl_properties(&SimpleDocument::new().with("x", "y")).unwrap());
        assert!(has_acl_properties(&SimpleDocument::new().with(properties::ACLGROUPS, "eng")).unwrap());
        assert!(has_acl_properties(
            &SimpleDocument::new().with(properties::ACLINHERITFROM_DOCID, "parent")
        )
        .unwrap());
    }
}
