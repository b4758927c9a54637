//! Property-based test generators using proptest.
//!
//! Provides strategies for documents, principal names and feed
//! configurations.

use docfeed_core::metadata::is_skipped;
use docfeed_spi::{properties, AclAccess, RoleType, SimpleDocument, Value};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Strategy for metadata property names that are never reserved.
pub fn property_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}")
        .expect("Invalid regex")
        .prop_filter("reserved property name", |name| !is_skipped(name))
}

/// Strategy for metadata values, including characters that need escaping.
pub fn property_value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{0,24}").expect("Invalid regex")
}

/// Strategy for a sorted map of metadata properties with one to three
/// values each.
pub fn metadata_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<String>>> {
    prop::collection::btree_map(
        property_name_strategy(),
        prop::collection::vec(property_value_strategy(), 1..4),
        0..8,
    )
}

/// Strategy for an access tier.
pub fn role_strategy() -> impl Strategy<Value = RoleType> {
    prop::sample::select(RoleType::ALL.to_vec())
}

/// Strategy for an ACL access.
pub fn access_strategy() -> impl Strategy<Value = AclAccess> {
    prop_oneof![Just(AclAccess::Permit), Just(AclAccess::Deny)]
}

/// Strategy for a bare principal name.
pub fn principal_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9.]{0,9}").expect("Invalid regex")
}

/// Strategy for a principal name with an optional `=role` suffix.
pub fn principal_with_role_strategy() -> impl Strategy<Value = (String, Option<RoleType>)> {
    (principal_name_strategy(), prop::option::of(role_strategy()))
}

/// Formats a principal name with its role suffix.
pub fn with_role(name: &str, role: Option<RoleType>) -> String {
    match role {
        Some(role) => format!("{name}={role}"),
        None => name.to_string(),
    }
}

/// A generated document together with the inputs it was built from.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Document id.
    pub docid: String,
    /// Metadata properties.
    pub metadata: BTreeMap<String, Vec<String>>,
    /// Permitted users, role suffixes included.
    pub users: Vec<String>,
    /// Denied groups, role suffixes included.
    pub deny_groups: Vec<String>,
    /// Inline content.
    pub content: Vec<u8>,
}

impl GeneratedDocument {
    /// Builds the document.
    pub fn to_document(&self) -> SimpleDocument {
        let mut doc = SimpleDocument::new().with(properties::DOCID, self.docid.as_str());
        for (name, values) in &self.metadata {
            for value in values {
                doc.add_value(name.as_str(), value.as_str());
            }
        }
        for user in &self.users {
            doc.add_value(properties::ACLUSERS, user.as_str());
        }
        for group in &self.deny_groups {
            doc.add_value(properties::ACLDENYGROUPS, group.as_str());
        }
        doc.add_value(properties::CONTENT, Value::Binary(self.content.clone()));
        doc
    }
}

/// Strategy for complete documents.
pub fn document_strategy() -> impl Strategy<Value = GeneratedDocument> {
    (
        prop::string::string_regex("[a-zA-Z0-9/_-]{1,16}").expect("Invalid regex"),
        metadata_strategy(),
        prop::collection::vec(principal_with_role_strategy(), 0..4),
        prop::collection::vec(principal_with_role_strategy(), 0..3),
        prop::collection::vec(any::<u8>(), 0..512),
    )
        .prop_map(|(docid, metadata, users, deny_groups, content)| GeneratedDocument {
            docid,
            metadata,
            users: users.iter().map(|(n, r)| with_role(n, *r)).collect(),
            deny_groups: deny_groups.iter().map(|(n, r)| with_role(n, *r)).collect(),
            content,
        })
}

/// Strategy for `(capacity, average record size)` pairs for fullness tests.
pub fn fullness_params_strategy() -> impl Strategy<Value = (usize, usize)> {
    (1_000usize..1_000_000, 1usize..10_000)
}

/// Case counts for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Few cases, for tests that encode whole feeds.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
