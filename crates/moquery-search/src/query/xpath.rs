//! XPath fragment builders for the search service's materialized view
//!
//! Every function here is pure string assembly. Values are trimmed and quoted
//! but never escaped or validated: a value containing `'` produces a broken
//! expression, which the search service then rejects.

use super::{NameValuesPair, QualifiedName};
use std::fmt;

/// Any content assembly. Excludes CA nodes.
pub const XPATH_ANY_CA: &str = "/rs_ca_map/rs_ca";

/// Any top-level element. Excludes descendants.
pub const XPATH_ANY_ELEMENT: &str = "/element()";

/// Any non-XML managed object; `/{prefix}:{local}` of [`QualifiedName::non_xml_mo`]
pub const XPATH_ANY_NON_XML_MO: &str = "/r:nonxml";

/// Materialized view path to system metadata, up to the metadata name
pub const SYSTEM_METADATA_LEAD_IN: &str = "./mv:metadata/mv:system/mv:";

/// Materialized view path to layered metadata, up to the metadata name
pub const LAYERED_METADATA_LEAD_IN: &str = "./mv:metadata/mv-lmd:layered/mv-lmd:";

/// General comparison; true when any value matches
pub const OP_EQUALS: &str = "=";

/// Value comparison for inequality
pub const OP_NOT_EQUALS: &str = "ne";

/// System metadata fields maintained by the content store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemMetadata {
    CaType,
    DateCreated,
    DateModified,
    DisplayName,
    Id,
    MimeType,
    User,
}

impl SystemMetadata {
    /// Element name of this field inside the materialized view
    pub const fn local_name(self) -> &'static str {
        match self {
            Self::CaType => "ca-type",
            Self::DateCreated => "date-created",
            Self::DateModified => "last-modified",
            Self::DisplayName => "display-name",
            Self::Id => "id",
            Self::MimeType => "mime-type",
            Self::User => "user",
        }
    }
}

/// Selector for elements with the given qualified name
///
/// With `allow_descendants` the selector matches at any depth (`//`, slower);
/// without it only top-level managed objects match (`/`, faster). Namespaced
/// names match on `namespace-uri()` so the query is independent of prefixes.
/// Further predicates may be appended to narrow the node set.
pub fn element_selector(qname: &QualifiedName, allow_descendants: bool) -> String {
    let mut query = String::from(if allow_descendants { "//" } else { "/" });
    if qname.has_namespace() {
        query.push_str("*:");
        query.push_str(qname.local_part());
        query.push_str("[namespace-uri() = '");
        query.push_str(qname.namespace_uri());
        query.push_str("']");
    } else {
        query.push_str(qname.local_part());
    }
    query
}

/// `[...]` predicate testing one system metadata field for equality
pub fn system_metadata_predicate(field: SystemMetadata, value: &str) -> String {
    system_metadata_predicate_with_op(field, OP_EQUALS, value)
}

/// `[...]` predicate comparing one system metadata field with `op`
pub fn system_metadata_predicate_with_op(field: SystemMetadata, op: &str, value: &str) -> String {
    format!(
        "[{}]",
        metadata_constraint(SYSTEM_METADATA_LEAD_IN, field.local_name(), op, &[value])
    )
}

/// `[...]` predicate testing layered metadata for equality with any of `values`
pub fn layered_metadata_predicate<S: AsRef<str>>(name: &str, values: &[S]) -> String {
    format!("[{}]", layered_metadata_constraint(name, values))
}

/// Layered metadata equality constraint, without the surrounding brackets
///
/// The caller is responsible for placing this inside a predicate.
pub fn layered_metadata_constraint<S: AsRef<str>>(name: &str, values: &[S]) -> String {
    metadata_constraint(LAYERED_METADATA_LEAD_IN, name, OP_EQUALS, values)
}

/// `{lead_in}{name}/text() {op} ('v1', 'v2', ...)`
///
/// Each value is trimmed before quoting.
pub fn metadata_constraint<S: AsRef<str>>(
    lead_in: &str,
    name: &str,
    op: &str,
    values: &[S],
) -> String {
    let quoted = values
        .iter()
        .map(|v| format!("'{}'", v.as_ref().trim()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{lead_in}{name}/text() {op} ({quoted})")
}

/// Full-text `cts:contains` predicate against one piece of layered metadata
///
/// `case_insensitive` adds the word query's `'case-insensitive'` option;
/// otherwise the engine's default case handling applies.
pub fn layered_metadata_word_query_predicate(
    name: &str,
    value: &str,
    case_insensitive: bool,
) -> String {
    let options = if case_insensitive {
        "'case-insensitive'"
    } else {
        ""
    };
    format!(
        "[cts:contains({LAYERED_METADATA_LEAD_IN}{name}, cts:word-query('{value}', ({options})))]"
    )
}

/// Incrementally assembled XPath expression
///
/// Starts from a base path and appends predicates in call order, which is the
/// order they appear in the rendered query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathQuery {
    buf: String,
}

impl XPathQuery {
    pub fn new(base: impl Into<String>) -> Self {
        Self { buf: base.into() }
    }

    /// Start from an element selector; see [`element_selector`]
    pub fn for_element(qname: &QualifiedName, allow_descendants: bool) -> Self {
        Self::new(element_selector(qname, allow_descendants))
    }

    /// Append a predicate that already carries its brackets
    #[must_use]
    pub fn predicate(mut self, predicate: impl AsRef<str>) -> Self {
        self.buf.push_str(predicate.as_ref());
        self
    }

    /// Append one layered metadata predicate per pair
    #[must_use]
    pub fn layered_metadata(mut self, criteria: &[NameValuesPair]) -> Self {
        for pair in criteria {
            self.buf
                .push_str(&layered_metadata_predicate(pair.name(), pair.values()));
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Display for XPathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

impl AsRef<str> for XPathQuery {
    fn as_ref(&self) -> &str {
        &self.buf
    }
}
