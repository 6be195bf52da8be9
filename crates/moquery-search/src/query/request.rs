//! Parameter sets for the canned searches
//!
//! Every optional parameter has a default, so callers name only what they
//! need through the `with_*` builders.

use super::xpath::{
    OP_NOT_EQUALS, SystemMetadata, XPATH_ANY_CA, XPathQuery, system_metadata_predicate,
    system_metadata_predicate_with_op,
};
use super::{NameValuesPair, QualifiedName};
use crate::searching::SortOrder;
use moquery_common::is_blank;

/// Search for XML managed objects, non-XML managed objects, or CA nodes by
/// element name
#[derive(Debug, Clone)]
pub struct ManagedObjectQuery {
    pub qname: QualifiedName,
    /// Match below top-level managed objects too (slower)
    pub allow_descendants: bool,
    /// Layered metadata criteria, AND-ed
    pub criteria: Vec<NameValuesPair>,
    /// Zero means no limit; see
    /// [`search_for_objects`](crate::ManagedObjectSearch::search_for_objects)
    pub max_result_count: usize,
}

impl ManagedObjectQuery {
    pub const fn new(qname: QualifiedName) -> Self {
        Self {
            qname,
            allow_descendants: false,
            criteria: Vec::new(),
            max_result_count: 0,
        }
    }

    #[must_use]
    pub const fn with_descendants(mut self, allow_descendants: bool) -> Self {
        self.allow_descendants = allow_descendants;
        self
    }

    #[must_use]
    pub fn with_criterion(mut self, criterion: NameValuesPair) -> Self {
        self.criteria.push(criterion);
        self
    }

    #[must_use]
    pub fn with_criteria(mut self, criteria: impl IntoIterator<Item = NameValuesPair>) -> Self {
        self.criteria.extend(criteria);
        self
    }

    #[must_use]
    pub const fn with_max_result_count(mut self, max_result_count: usize) -> Self {
        self.max_result_count = max_result_count;
        self
    }

    /// Element selector followed by one predicate per criterion
    pub fn to_xpath(&self) -> XPathQuery {
        XPathQuery::for_element(&self.qname, self.allow_descendants)
            .layered_metadata(&self.criteria)
    }
}

/// Search for content assemblies
#[derive(Debug, Clone, Default)]
pub struct ContentAssemblyQuery {
    /// Restrict to one CA type; required by the ID-only search
    pub ca_type: Option<String>,
    /// Layered metadata criteria, AND-ed
    pub criteria: Vec<NameValuesPair>,
    /// Leave this CA out of the results
    pub exclude_id: Option<String>,
    /// Passed through to the search service; `None` leaves ordering to it
    pub sort_order: Option<Vec<SortOrder>>,
    /// Zero means no limit
    pub max_result_count: usize,
}

impl ContentAssemblyQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `new().with_ca_type(ca_type)`
    pub fn of_type(ca_type: impl Into<String>) -> Self {
        Self::new().with_ca_type(ca_type)
    }

    #[must_use]
    pub fn with_ca_type(mut self, ca_type: impl Into<String>) -> Self {
        self.ca_type = Some(ca_type.into());
        self
    }

    #[must_use]
    pub fn with_criterion(mut self, criterion: NameValuesPair) -> Self {
        self.criteria.push(criterion);
        self
    }

    #[must_use]
    pub fn with_criteria(mut self, criteria: impl IntoIterator<Item = NameValuesPair>) -> Self {
        self.criteria.extend(criteria);
        self
    }

    /// Add one layered metadata criterion, skipped when `values` is empty
    #[must_use]
    pub fn with_layered_metadata<I, V>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let pair = NameValuesPair::new(name, values);
        if pair.values().is_empty() {
            self
        } else {
            self.with_criterion(pair)
        }
    }

    #[must_use]
    pub fn excluding(mut self, id: impl Into<String>) -> Self {
        self.exclude_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_sort_order(mut self, sort_order: Vec<SortOrder>) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    #[must_use]
    pub const fn with_max_result_count(mut self, max_result_count: usize) -> Self {
        self.max_result_count = max_result_count;
        self
    }

    /// Base CA path, then ID exclusion, CA type, and layered metadata, each
    /// only when supplied. Blank ID and type are treated as absent.
    pub fn to_xpath(&self) -> XPathQuery {
        let mut query = XPathQuery::new(XPATH_ANY_CA);

        if let Some(id) = self.exclude_id.as_deref()
            && !is_blank(Some(id))
        {
            query = query.predicate(system_metadata_predicate_with_op(
                SystemMetadata::Id,
                OP_NOT_EQUALS,
                id.trim(),
            ));
        }

        if let Some(ca_type) = self.ca_type.as_deref()
            && !is_blank(Some(ca_type))
        {
            query = query.predicate(system_metadata_predicate(SystemMetadata::CaType, ca_type));
        }

        query.layered_metadata(&self.criteria)
    }
}
