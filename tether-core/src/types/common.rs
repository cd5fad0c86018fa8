/// A single key/value entry, used for environment values as well as request
/// headers, query params and RPC metadata.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeyValue {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub key: String,

    #[serde(default)]
    pub value: String,

    #[serde(default = "default_enable")]
    pub enable: bool,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            key: key.into(),
            value: value.into(),
            enable: true,
        }
    }
}

pub(crate) fn default_enable() -> bool {
    true
}
