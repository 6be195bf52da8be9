use std::fmt;

/// Namespace of the system-defined element wrapping non-XML managed objects
pub const NON_XML_NAMESPACE_URI: &str = "http://www.rsuitecms.com/rsuite/ns/metadata";

/// An XML qualified name: namespace URI, local part, and prefix
///
/// An empty namespace URI means "no namespace". The prefix is only used when
/// rendering fixed paths such as [`XPATH_ANY_NON_XML_MO`](crate::query::XPATH_ANY_NON_XML_MO);
/// element selectors match on the namespace URI instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    namespace_uri: String,
    local_part: String,
    prefix: String,
}

impl QualifiedName {
    /// A name in no namespace
    pub fn local(local_part: impl Into<String>) -> Self {
        Self::new("", local_part, "")
    }

    pub fn new(
        namespace_uri: impl Into<String>,
        local_part: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            local_part: local_part.into(),
            prefix: prefix.into(),
        }
    }

    /// The element every non-XML managed object is stored under
    pub fn non_xml_mo() -> Self {
        Self::new(NON_XML_NAMESPACE_URI, "nonxml", "r")
    }

    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True when the namespace URI carries non-whitespace text
    pub fn has_namespace(&self) -> bool {
        !self.namespace_uri.trim().is_empty()
    }
}

/// Clark notation: `{namespace}local`, or just `local` without a namespace
impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_namespace() {
            write!(f, "{{{}}}{}", self.namespace_uri, self.local_part)
        } else {
            f.write_str(&self.local_part)
        }
    }
}
