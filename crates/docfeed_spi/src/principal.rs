//! ACL principals.

use std::fmt;

/// How the index should interpret a principal's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrincipalType {
    /// Let the index infer a domain from the name.
    #[default]
    Unknown,
    /// The name must be taken literally, without domain detection.
    Unqualified,
}

impl PrincipalType {
    /// Returns the wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Unqualified => "unqualified",
        }
    }
}

/// Case handling applied by the index when matching a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseSensitivityType {
    /// Names and namespaces are compared case-sensitively (index default).
    #[default]
    EverythingCaseSensitive,
    /// Names and namespaces are compared ignoring case.
    EverythingCaseInsensitive,
}

impl CaseSensitivityType {
    /// Returns the wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EverythingCaseSensitive => "everything-case-sensitive",
            Self::EverythingCaseInsensitive => "everything-case-insensitive",
        }
    }
}

/// A user or group named in an ACL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    name: String,
    namespace: String,
    principal_type: PrincipalType,
    case_sensitivity: CaseSensitivityType,
}

impl Principal {
    /// Creates a principal with the default namespace, type and case handling.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            principal_type: PrincipalType::default(),
            case_sensitivity: CaseSensitivityType::default(),
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the principal type.
    #[must_use]
    pub fn with_principal_type(mut self, principal_type: PrincipalType) -> Self {
        self.principal_type = principal_type;
        self
    }

    /// Sets the case sensitivity.
    #[must_use]
    pub fn with_case_sensitivity(mut self, case_sensitivity: CaseSensitivityType) -> Self {
        self.case_sensitivity = case_sensitivity;
        self
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace, empty when unset.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the principal type.
    pub fn principal_type(&self) -> PrincipalType {
        self.principal_type
    }

    /// Returns the case sensitivity.
    pub fn case_sensitivity(&self) -> CaseSensitivityType {
        self.case_sensitivity
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
