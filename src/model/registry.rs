//! The component registry consulted for cross-component tag resolution.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The contract a component exports under its tag name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentContract {
    /// Key of the component that declares the tag, when known.
    pub component_key: Option<String>,
    pub required_props: BTreeSet<String>,
    pub events: BTreeSet<String>,
    pub prop_schema: BTreeMap<String, Value>,
}

/// Map from template tag name to exported contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entries: BTreeMap<String, ComponentContract>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag_name: impl Into<String>, contract: ComponentContract) {
        self.entries.insert(tag_name.into(), contract);
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        self.entries.contains_key(tag_name)
    }

    pub fn get(&self, tag_name: &str) -> Option<&ComponentContract> {
        self.entries.get(tag_name)
    }

    /// Registered tag names in sorted order.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ComponentContract)> for Registry {
    fn from_iter<I: IntoIterator<Item = (String, ComponentContract)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
