//! ACL encoding.
//!
//! Turns the four principal-list properties of a document into
//! `<principal>` elements and wraps them in an `<acl>` element.

use crate::error::FeedResult;
use crate::url::UrlConstructor;
use crate::xml;
use docfeed_spi::{
    doc_utils, properties, AclAccess, AclScope, CaseSensitivityType, Document, DocumentType,
    Principal, PrincipalType, Property, RoleType, Value,
};
use tracing::trace;

/// The principal-list properties in emission order.
const PRINCIPAL_LISTS: [(&str, AclScope, AclAccess); 4] = [
    (properties::ACLUSERS, AclScope::User, AclAccess::Permit),
    (properties::ACLGROUPS, AclScope::Group, AclAccess::Permit),
    (properties::ACLDENYUSERS, AclScope::User, AclAccess::Deny),
    (properties::ACLDENYGROUPS, AclScope::Group, AclAccess::Deny),
];

/// Removes a trailing `=role` suffix from a principal name.
///
/// Permit lists discard roles below reader and strip the rest; deny lists
/// discard roles above reader and strip the rest. Returns `None` if the
/// principal is discarded. Names without a known role pass through.
pub fn strip_roles(name: &str, access: AclAccess) -> Option<&str> {
    let Some((base, role)) = name.rsplit_once('=').and_then(|(base, suffix)| {
        RoleType::ALL
            .into_iter()
            .find(|role| role.as_str() == suffix)
            .map(|role| (base, role))
    }) else {
        return Some(name);
    };
    let discard = match access {
        AclAccess::Permit => role < RoleType::Reader,
        AclAccess::Deny => role > RoleType::Reader,
    };
    (!discard).then_some(base)
}

/// Appends one `<principal>` element per surviving value of `property`.
///
/// # Errors
///
/// Propagates repository errors from the property.
pub fn write_principals(
    out: &mut String,
    property: &mut dyn Property,
    scope: AclScope,
    access: AclAccess,
) -> FeedResult<()> {
    while let Some(value) = property.next_value()? {
        let principal = match value {
            Value::Principal(principal) => principal,
            other => Principal::new(other.to_string().trim()),
        };
        let Some(name) = strip_roles(principal.name(), access).filter(|n| !n.is_empty()) else {
            trace!(principal = principal.name(), %access, "principal dropped by role");
            continue;
        };
        write_principal(out, &principal, name, scope, access);
    }
    Ok(())
}

fn write_principal(
    out: &mut String,
    principal: &Principal,
    name: &str,
    scope: AclScope,
    access: AclAccess,
) {
    out.push_str("<principal");
    if principal.principal_type() == PrincipalType::Unqualified {
        xml::append_attr(out, "principaltype", PrincipalType::Unqualified.as_str());
    }
    if !principal.namespace().is_empty() {
        xml::append_attr(out, "namespace", principal.namespace());
    }
    if principal.case_sensitivity() != CaseSensitivityType::EverythingCaseSensitive {
        xml::append_attr(
            out,
            "case-sensitivity-type",
            principal.case_sensitivity().as_str(),
        );
    }
    xml::append_attr(out, "scope", scope.as_str());
    xml::append_attr(out, "access", access.as_str());
    out.push('>');
    xml::append_escaped(out, name);
    xml::append_end_tag(out, "principal");
}

/// Appends the `<acl>` element for `document`.
///
/// The `url` attribute is written only for stand-alone ACL documents;
/// ACLs nested in a record take the record's URL.
///
/// # Errors
///
/// Propagates repository errors and URL construction failures.
pub fn write_acl(out: &mut String, document: &dyn Document, urls: &UrlConstructor) -> FeedResult<()> {
    out.push_str("<acl");
    let stand_alone = doc_utils::get_optional_string(document, properties::DOCUMENTTYPE)?
        .and_then(|t| DocumentType::find(&t))
        == Some(DocumentType::Acl);
    if stand_alone {
        xml::append_attr(out, "url", &urls.record_url(document)?);
    }
    if let Some(inheritance) =
        doc_utils::get_optional_string(document, properties::ACLINHERITANCETYPE)?
            .filter(|s| !s.is_empty())
    {
        xml::append_attr(out, "inheritance-type", &inheritance);
    }
    if let Some(parent) = urls.inherit_from_url(document)? {
        xml::append_attr(out, "inherit-from", &parent);
    }
    out.push_str(">\n");

    for (name, scope, access) in PRINCIPAL_LISTS {
        if let Some(mut property) = document.find_property(name)? {
            write_principals(out, property.as_mut(), scope, access)?;
        }
    }
    xml::append_end_tag(out, "acl");
    Ok(())
}
