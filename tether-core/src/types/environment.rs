use std::collections::BTreeMap;

use crate::types::KeyValue;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnvironmentMeta {
    pub id: String,
    pub name: String,
}

/// A named, ordered set of string values shared across requests.
///
/// Mutation through [`Environment::set_key`] is purely in-memory; persisting
/// the change is the job of the environment store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Environment {
    pub meta: EnvironmentMeta,

    #[serde(default)]
    pub values: Vec<KeyValue>,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: EnvironmentMeta {
                id: uuid::Uuid::new_v4().to_string(),
                name: name.into(),
            },
            values: Vec::new(),
        }
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta: EnvironmentMeta {
                id: id.into(),
                name: name.into(),
            },
            values: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    /// Sets `key` to `value`, updating the first entry with that key or
    /// appending a new enabled entry.
    pub fn set_key(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|kv| kv.key == key) {
            Some(kv) => kv.value = value,
            None => self.values.push(KeyValue::new(key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }

    /// Enabled values keyed by name; later duplicates do not override earlier ones.
    pub fn enabled_values(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for kv in self.values.iter().filter(|kv| kv.enable) {
            out.entry(kv.key.clone()).or_insert_with(|| kv.value.clone());
        }
        out
    }
}
