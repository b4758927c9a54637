//! Document and property interfaces.

use crate::error::SpiResult;
use crate::value::Value;
use std::collections::{HashMap, HashSet};

/// A multi-valued document property, read one value at a time.
pub trait Property {
    /// Returns the next value, or `None` when the values are exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails while producing the value.
    fn next_value(&mut self) -> SpiResult<Option<Value>>;
}

/// A bag of named, multi-valued properties supplied by a repository.
///
/// Property name iteration order is unspecified; consumers that need a
/// stable order must sort.
pub trait Document {
    /// Returns a fresh reader over the named property, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read.
    fn find_property(&self, name: &str) -> SpiResult<Option<Box<dyn Property + '_>>>;

    /// Returns the names of all properties on this document.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read.
    fn property_names(&self) -> SpiResult<HashSet<String>>;

    /// Returns true if the named property is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read.
    fn has_property(&self, name: &str) -> SpiResult<bool> {
        Ok(self.find_property(name)?.is_some())
    }
}

impl<D: Document + ?Sized> Document for &D {
    fn find_property(&self, name: &str) -> SpiResult<Option<Box<dyn Property + '_>>> {
        (**self).find_property(name)
    }

    fn property_names(&self) -> SpiResult<HashSet<String>> {
        (**self).property_names()
    }

    fn has_property(&self, name: &str) -> SpiResult<bool> {
        (**self).has_property(name)
    }
}

/// A property over an in-memory list of values.
#[derive(Debug)]
pub struct ValuesProperty {
    values: std::vec::IntoIter<Value>,
}

impl ValuesProperty {
    /// Creates a property yielding `values` in order.
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }
}

impl Property for ValuesProperty {
    fn next_value(&mut self) -> SpiResult<Option<Value>> {
        Ok(self.values.next())
    }
}

/// A map-backed document.
///
/// # Example
///
/// ```rust
/// use docfeed_spi::{properties, Document, Property, SimpleDocument};
///
/// let doc = SimpleDocument::new()
///     .with(properties::DOCID, "doc-1")
///     .with("author", "alice")
///     .with("author", "bob");
///
/// assert!(doc.has_property("author").unwrap());
/// let mut authors = doc.find_property("author").unwrap().unwrap();
/// assert_eq!(authors.next_value().unwrap().unwrap().to_string(), "alice");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimpleDocument {
    properties: HashMap<String, Vec<Value>>,
}

impl SimpleDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to the named property.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_value(name, value);
        self
    }

    /// Appends a value to the named property.
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Replaces all values of the named property.
    pub fn set_values(&mut self, name: impl Into<String>, values: Vec<Value>) {
        self.properties.insert(name.into(), values);
    }

    /// Removes the named property, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<Value>> {
        self.properties.remove(name)
    }
}

impl Document for SimpleDocument {
    fn find_property(&self, name: &str) -> SpiResult<Option<Box<dyn Property + '_>>> {
        Ok(self
            .properties
            .get(name)
            .map(|values| Box::new(ValuesProperty::new(values.clone())) as Box<dyn Property>))
    }

    fn property_names(&self) -> SpiResult<HashSet<String>> {
        Ok(self.properties.keys().cloned().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for SimpleDocument {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (name, value) in iter {
            doc.add_value(name, value);
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(doc: &dyn Document, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(mut prop) = doc.find_property(name).unwrap() {
            while let Some(v) = prop.next_value().unwrap() {
                out.push(v.to_string());
            }
        }
        out
    }

    #[test]
    fn multi_valued_property_keeps_order() {
        let doc = SimpleDocument::new().with("k", "b").with("k", "a");
        assert_eq!(drain(&doc, "k"), vec!["b", "a"]);
    }

    #[test]
    fn each_lookup_restarts_iteration() {
        let doc = SimpleDocument::new().with("k", "v");
        assert_eq!(drain(&doc, "k"), vec!["v"]);
        assert_eq!(drain(&doc, "k"), vec!["v"]);
    }

    #[test]
    fn missing_property() {
        let doc = SimpleDocument::new();
        assert!(!doc.has_property("k").unwrap());
        assert!(doc.find_property("k").unwrap().is_none());
    }

    #[test]
    fn property_names_and_removal() {
        let mut doc: SimpleDocument = vec![("a", Value::from("1")), ("b", Value::from("2"))]
            .into_iter()
            .collect();
        assert_eq!(doc.property_names().unwrap().len(), 2);
        assert!(doc.remove("a").is_some());
        assert_eq!(
            doc.property_names().unwrap(),
            HashSet::from(["b".to_string()])
        );
    }
}
