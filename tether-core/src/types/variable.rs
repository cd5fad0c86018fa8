use crate::types::RequestKind;

/// Where a binding rule reads its value from.
///
/// `Header` and `Cookie` only exist on HTTP responses, `MetaData` and
/// `Trailers` only on RPC responses; `Body` exists on both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableSource {
    Body,
    Header,
    Cookie,
    #[serde(rename = "metadata")]
    MetaData,
    Trailers,
}

impl VariableSource {
    pub fn allowed_for(&self, kind: RequestKind) -> bool {
        match self {
            VariableSource::Body => true,
            VariableSource::Header | VariableSource::Cookie => kind == RequestKind::Http,
            VariableSource::MetaData | VariableSource::Trailers => kind == RequestKind::Rpc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableSource::Body => "body",
            VariableSource::Header => "header",
            VariableSource::Cookie => "cookie",
            VariableSource::MetaData => "metadata",
            VariableSource::Trailers => "trailers",
        }
    }
}

/// A binding rule: extract one value from a response into one environment key.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "targetEnvVariable")]
    pub target_env_variable: String,

    pub from: VariableSource,

    #[serde(rename = "sourceKey", default, skip_serializing_if = "String::is_empty")]
    pub source_key: String,

    #[serde(rename = "onStatusCode")]
    pub on_status_code: i32,

    #[serde(rename = "jsonPath", default, skip_serializing_if = "String::is_empty")]
    pub json_path: String,

    #[serde(default = "crate::types::common::default_enable")]
    pub enable: bool,
}

impl Variable {
    /// True when the rule is enabled and its status code equals `status_code` exactly.
    pub fn matches_status(&self, status_code: i32) -> bool {
        self.enable && self.on_status_code == status_code
    }
}
