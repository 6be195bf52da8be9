//! XPath query construction
pub mod name_values;
pub mod qname;
pub mod request;
pub mod xpath;

pub use name_values::NameValuesPair;
pub use qname::{NON_XML_NAMESPACE_URI, QualifiedName};
pub use request::{ContentAssemblyQuery, ManagedObjectQuery};
pub use xpath::{
    LAYERED_METADATA_LEAD_IN, OP_EQUALS, OP_NOT_EQUALS, SYSTEM_METADATA_LEAD_IN, SystemMetadata,
    XPATH_ANY_CA, XPATH_ANY_ELEMENT, XPATH_ANY_NON_XML_MO, XPathQuery, element_selector,
    layered_metadata_constraint, layered_metadata_predicate,
    layered_metadata_word_query_predicate, metadata_constraint, system_metadata_predicate,
    system_metadata_predicate_with_op,
};
