//! Reserved property names.
//!
//! Connectors set these on documents to steer how a record is fed.
//! Any other property name is treated as plain metadata.

/// Unique document identifier within the data source.
pub const DOCID: &str = "google:docid";
/// Document content.
pub const CONTENT: &str = "google:content";
/// URL the index should fetch content from.
pub const CONTENTURL: &str = "google:contenturl";
/// Declared encoding of pre-encoded content.
pub const CONTENT_ENCODING: &str = "google:contentencoding";
/// Declared content length.
pub const CONTENT_LENGTH: &str = "google:contentlength";
/// URL shown to users in search results.
pub const DISPLAYURL: &str = "google:displayurl";
/// URL the document is served from, required for web feeds.
pub const SEARCHURL: &str = "google:searchurl";
/// Document MIME type.
pub const MIMETYPE: &str = "google:mimetype";
/// Last modification time.
pub const LASTMODIFIED: &str = "google:lastmodified";
/// Document title.
pub const TITLE: &str = "google:title";
/// Whether the document is public.
pub const ISPUBLIC: &str = "google:ispublic";
/// Explicit authentication method.
pub const AUTHMETHOD: &str = "google:authmethod";
/// Requested action (`add` or `delete`).
pub const ACTION: &str = "google:action";
/// Keep the document in the index even when over license limits.
pub const LOCK: &str = "google:lock";
/// Ask the index to crawl the document immediately.
pub const CRAWL_IMMEDIATELY: &str = "google:crawlimmediately";
/// Ask the index to crawl the document only once.
pub const CRAWL_ONCE: &str = "google:crawlonce";
/// Page rank hint, passed through unvalidated.
pub const PAGERANK: &str = "google:pagerank";
/// Document type (`record` or `acl`).
pub const DOCUMENTTYPE: &str = "google:documenttype";
/// Feed type override.
pub const FEEDTYPE: &str = "google:feedtype";
/// Whether to overwrite ACLs on reindex; false emits `overwrite-acls="false"`.
pub const OVERWRITEACLS: &str = "google:overwriteacls";
/// Opaque security token.
pub const SECURITYTOKEN: &str = "google:securitytoken";
/// URL fragment distinguishing several records of one document.
pub const FRAGMENT: &str = "google:fragment";

/// Users granted access.
pub const ACLUSERS: &str = "google:aclusers";
/// Groups granted access.
pub const ACLGROUPS: &str = "google:aclgroups";
/// Users refused access.
pub const ACLDENYUSERS: &str = "google:acldenyusers";
/// Groups refused access.
pub const ACLDENYGROUPS: &str = "google:acldenygroups";
/// ACL inheritance type.
pub const ACLINHERITANCETYPE: &str = "google:aclinheritancetype";
/// Full URL of the ACL to inherit from.
pub const ACLINHERITFROM: &str = "google:aclinheritfrom";
/// Docid of the ACL to inherit from.
pub const ACLINHERITFROM_DOCID: &str = "google:aclinheritfrom:docid";
/// Feed type of the ACL to inherit from.
pub const ACLINHERITFROM_FEEDTYPE: &str = "google:aclinheritfrom:feedtype";
/// Fragment of the ACL to inherit from.
pub const ACLINHERITFROM_FRAGMENT: &str = "google:aclinheritfrom:fragment";

/// Principal lists, in the order they are written into an ACL.
pub const ACL_PRINCIPAL_PROPERTIES: [&str; 4] = [ACLUSERS, ACLGROUPS, ACLDENYUSERS, ACLDENYGROUPS];

/// Every property that belongs to a document's ACL.
pub const ACL_PROPERTIES: [&str; 9] = [
    ACLUSERS,
    ACLGROUPS,
    ACLDENYUSERS,
    ACLDENYGROUPS,
    ACLINHERITANCETYPE,
    ACLINHERITFROM,
    ACLINHERITFROM_DOCID,
    ACLINHERITFROM_FEEDTYPE,
    ACLINHERITFROM_FRAGMENT,
];

/// Fragment given to an ACL extracted from a content-URL document.
pub const EXTRACTED_ACL_FRAGMENT: &str = "generated-acl";

/// MIME type used when a document declares none.
pub const DEFAULT_MIMETYPE: &str = "text/html";

/// Returns true if `name` is one of the ACL properties.
pub fn is_acl_property(name: &str) -> bool {
    ACL_PROPERTIES.contains(&name)
}
