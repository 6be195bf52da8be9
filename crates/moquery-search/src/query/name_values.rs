use serde::{Deserialize, Serialize};

/// A metadata name paired with the values it may take
///
/// One pair becomes one predicate; its values are OR-ed together by XPath
/// sequence comparison. Several pairs chained on a query are AND-ed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameValuesPair {
    name: String,
    values: Vec<String>,
}

impl NameValuesPair {
    /// Create a pair from a name and any sequence of values, keeping their order
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// A list holding just this one pair, ready for more to be pushed
    pub fn starter_list<N, I, V>(name: N, values: I) -> Vec<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        vec![Self::new(name, values)]
    }
}
