//! Document decorators that reshape a document's ACL.
//!
//! Each decorator wraps another [`Document`] and rewrites a fixed set of
//! property names, delegating everything else.

use crate::document::{Document, Property, ValuesProperty};
use crate::error::SpiResult;
use crate::properties::{self, is_acl_property};
use crate::value::Value;
use std::collections::HashSet;

fn constant(value: &str) -> Option<Box<dyn Property + 'static>> {
    Some(Box::new(ValuesProperty::new(vec![Value::from(value)])))
}

/// Hides every ACL property of the wrapped document.
///
/// Used once a document's ACL has been written so that the same
/// properties do not reappear as metadata.
#[derive(Debug, Clone)]
pub struct StripAclDocument<D> {
    inner: D,
}

impl<D: Document> StripAclDocument<D> {
    /// Wraps `inner`.
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: Document> Document for StripAclDocument<D> {
    fn find_property(&self, name: &str) -> SpiResult<Option<Box<dyn Property + '_>>> {
        if is_acl_property(name) {
            Ok(None)
        } else {
            self.inner.find_property(name)
        }
    }

    fn property_names(&self) -> SpiResult<HashSet<String>> {
        let mut names = self.inner.property_names()?;
        names.retain(|n| !is_acl_property(n));
        Ok(names)
    }
}

/// Presents only the ACL of the wrapped document, as a stand-alone ACL
/// document addressed by the document's own id plus a fixed fragment.
#[derive(Debug, Clone)]
pub struct ExtractedAclDocument<D> {
    inner: D,
}

impl<D: Document> ExtractedAclDocument<D> {
    /// Wraps `inner`.
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    fn is_passed_through(name: &str) -> bool {
        is_acl_property(name) || name == properties::DOCID || name == properties::SEARCHURL
    }
}

impl<D: Document> Document for ExtractedAclDocument<D> {
    fn find_property(&self, name: &str) -> SpiResult<Option<Box<dyn Property + '_>>> {
        match name {
            properties::DOCUMENTTYPE => Ok(constant("acl")),
            properties::FRAGMENT => Ok(constant(properties::EXTRACTED_ACL_FRAGMENT)),
            n if Self::is_passed_through(n) => self.inner.find_property(n),
            _ => Ok(None),
        }
    }

    fn property_names(&self) -> SpiResult<HashSet<String>> {
        let mut names = self.inner.property_names()?;
        names.retain(|n| Self::is_passed_through(n));
        names.insert(properties::DOCUMENTTYPE.to_string());
        names.insert(properties::FRAGMENT.to_string());
        Ok(names)
    }
}

/// Replaces the wrapped document's ACL with an empty ACL that inherits
/// from the one produced by [`ExtractedAclDocument`].
#[derive(Debug, Clone)]
pub struct InheritFromExtractedAclDocument<D> {
    inner: D,
}

impl<D: Document> InheritFromExtractedAclDocument<D> {
    /// Wraps `inner`.
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: Document> Document for InheritFromExtractedAclDocument<D> {
    fn find_property(&self, name: &str) -> SpiResult<Option<Box<dyn Property + '_>>> {
        match name {
            properties::ACLINHERITFROM_DOCID => self.inner.find_property(properties::DOCID),
            properties::ACLINHERITFROM_FRAGMENT => {
                Ok(constant(properties::EXTRACTED_ACL_FRAGMENT))
            }
            n if is_acl_property(n) => Ok(None),
            n => self.inner.find_property(n),
        }
    }

    fn property_names(&self) -> SpiResult<HashSet<String>> {
        let mut names = self.inner.property_names()?;
        let has_docid = names.contains(properties::DOCID);
        names.retain(|n| !is_acl_property(n));
        if has_docid {
            names.insert(properties::ACLINHERITFROM_DOCID.to_string());
        }
        names.insert(properties::ACLINHERITFROM_FRAGMENT.to_string());
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc_utils::get_optional_string;
    use crate::document::SimpleDocument;

    fn doc() -> SimpleDocument {
        SimpleDocument::new()
            .with(properties::DOCID, "doc1")
            .with(properties::ACLUSERS, "alice")
            .with(properties::ACLINHERITANCETYPE, "parent-overrides")
            .with("author", "bob")
    }

    #[test]
    fn strip_hides_acl() {
        let d = doc();
        let stripped = StripAclDocument::new(&d);
        assert!(!stripped.has_property(properties::ACLUSERS).unwrap());
        assert!(stripped.has_property("author").unwrap());
        let names = stripped.property_names().unwrap();
        assert!(!names.contains(properties::ACLINHERITANCETYPE));
        assert!(names.contains(properties::DOCID));
    }

    #[test]
    fn extracted_is_standalone_acl() {
        let d = doc();
        let acl = ExtractedAclDocument::new(&d);
        assert_eq!(
            get_optional_string(&acl, properties::DOCUMENTTYPE).unwrap().as_deref(),
            Some("acl")
        );
        assert_eq!(
            get_optional_string(&acl, properties::FRAGMENT).unwrap().as_deref(),
            Some(properties::EXTRACTED_ACL_FRAGMENT)
        );
        assert!(acl.has_property(properties::ACLUSERS).unwrap());
        assert!(!acl.has_property("author").unwrap());
        assert!(!acl.property_names().unwrap().contains("author"));
    }

    #[test]
    fn inherit_from_points_at_extracted_acl() {
        let d = doc();
        let inheriting = InheritFromExtractedAclDocument::new(&d);
        assert!(!inheriting.has_property(properties::ACLUSERS).unwrap());
        assert!(!inheriting.has_property(properties::ACLINHERITANCETYPE).unwrap());
        assert_eq!(
            get_optional_string(&inheriting, properties::ACLINHERITFROM_DOCID)
                .unwrap()
                .as_deref(),
            Some("doc1")
        );
        assert_eq!(
            get_optional_string(&inheriting, properties::ACLINHERITFROM_FRAGMENT)
                .unwrap()
                .as_deref(),
            Some(properties::EXTRACTED_ACL_FRAGMENT)
        );
        assert!(inheriting.has_property("author").unwrap());
        let names = inheriting.property_names().unwrap();
        assert!(names.contains(properties::ACLINHERITFROM_DOCID));
        assert!(!names.contains(properties::ACLUSERS));
    }
}
