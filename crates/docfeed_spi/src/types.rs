//! Protocol enumerations shared by documents and the feed encoder.
//!
//! Every enum here has a fixed lowercase wire spelling returned by
//! `as_str`, and a lenient lookup that accepts any ASCII case.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! wire_display {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Requested action for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Add or update the document.
    Add,
    /// Remove the document from the index.
    Delete,
    /// Any token the protocol does not recognise.
    Error,
}

impl ActionType {
    /// Maps a property value to an action, returning `Error` for unknown tokens.
    pub fn find(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("add") {
            Self::Add
        } else if tag.eq_ignore_ascii_case("delete") {
            Self::Delete
        } else {
            Self::Error
        }
    }

    /// Returns the wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Error => "error",
        }
    }
}

wire_display!(ActionType);

/// Kind of document handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// A regular content record.
    Record,
    /// A stand-alone ACL.
    Acl,
}

impl DocumentType {
    /// Looks up a document type, returning `None` for unknown tokens.
    pub fn find(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("record") {
            Some(Self::Record)
        } else if tag.eq_ignore_ascii_case("acl") {
            Some(Self::Acl)
        } else {
            None
        }
    }

    /// Returns the wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Acl => "acl",
        }
    }
}

wire_display!(DocumentType);

/// The kind of feed being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    /// Content is embedded inline in every record.
    Content,
    /// Records point at the document's own search URL.
    Web,
    /// Records point at a content URL served by the connector.
    ContentUrl,
    /// Feed carries only stand-alone ACLs.
    Acl,
}

impl FeedType {
    /// Looks up a feed type, returning `None` for unknown tokens.
    pub fn find(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "content" => Some(Self::Content),
            "web" => Some(Self::Web),
            "contenturl" => Some(Self::ContentUrl),
            "acl" => Some(Self::Acl),
            _ => None,
        }
    }

    /// Returns the name used for this feed type in document properties.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Web => "web",
            Self::ContentUrl => "contenturl",
            Self::Acl => "acl",
        }
    }

    /// Returns the value written into the feed header's `<feedtype>`.
    #[must_use]
    pub const fn to_legacy_str(self) -> &'static str {
        match self {
            Self::Content | Self::Acl => "incremental",
            Self::Web | Self::ContentUrl => "metadata-and-url",
        }
    }
}

wire_display!(FeedType);

/// Transfer encoding for inline content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentEncoding {
    /// Plain base64.
    Base64Binary,
    /// zlib compression followed by base64.
    Base64Compressed,
}

impl ContentEncoding {
    /// Looks up an encoding, returning `None` for unknown tokens.
    pub fn find(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("base64binary") {
            Some(Self::Base64Binary)
        } else if tag.eq_ignore_ascii_case("base64compressed") {
            Some(Self::Base64Compressed)
        } else {
            None
        }
    }

    /// Returns the wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base64Binary => "base64binary",
            Self::Base64Compressed => "base64compressed",
        }
    }
}

wire_display!(ContentEncoding);

/// Whether a principal names a user or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclScope {
    /// A single user.
    User,
    /// A group of users.
    Group,
}

impl AclScope {
    /// Returns the wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

wire_display!(AclScope);

/// Whether a principal is granted or refused access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclAccess {
    /// Access is granted.
    Permit,
    /// Access is refused.
    Deny,
}

impl AclAccess {
    /// Returns the wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permit => "permit",
            Self::Deny => "deny",
        }
    }
}

wire_display!(AclAccess);

/// Access tier that may trail a principal name as `name=role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleType {
    /// May see that the document exists.
    Peeker,
    /// May read the document.
    Reader,
    /// May modify the document.
    Writer,
    /// Owns the document.
    Owner,
}

impl RoleType {
    /// All roles, lowest tier first.
    pub const ALL: [RoleType; 4] = [Self::Peeker, Self::Reader, Self::Writer, Self::Owner];

    /// Returns the wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Peeker => "peeker",
            Self::Reader => "reader",
            Self::Writer => "writer",
            Self::Owner => "owner",
        }
    }
}

wire_display!(RoleType);
