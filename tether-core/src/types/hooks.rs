use std::fmt;
use std::str::FromStr;

use crate::types::VariableSource;

/// Target id that disables a trigger-request hook.
pub const NONE_REQUEST_ID: &str = "none";

/// Scripting languages a hook can name. Closed on purpose: unknown names are
/// rejected when the document is parsed, not when the script runs.
///
/// Documents and [`FromStr`] share one rule: names match case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ScriptLanguage {
    Python,
}

impl ScriptLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptLanguage::Python => "python",
        }
    }
}

impl fmt::Display for ScriptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scripting language: {0}")]
pub struct UnknownScriptLanguage(pub String);

impl TryFrom<String> for ScriptLanguage {
    type Error = UnknownScriptLanguage;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for ScriptLanguage {
    type Err = UnknownScriptLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Ok(ScriptLanguage::Python),
            _ => Err(UnknownScriptLanguage(s.to_string())),
        }
    }
}

/// Work done before a request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PreRequest {
    #[default]
    None,
    /// Send another saved request first. `request_id == "none"` disables it.
    TriggerRequest {
        #[serde(rename = "requestId")]
        request_id: String,
    },
    Script {
        language: ScriptLanguage,
        #[serde(default)]
        script: String,
    },
}

impl PreRequest {
    /// The request to send first, if this hook is an enabled trigger.
    pub fn trigger_target(&self) -> Option<&str> {
        match self {
            PreRequest::TriggerRequest { request_id }
                if !request_id.is_empty() && request_id != NONE_REQUEST_ID =>
            {
                Some(request_id.as_str())
            }
            _ => None,
        }
    }
}

/// Work done after a response is received.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PostRequest {
    #[default]
    None,
    #[serde(rename = "setEnv")]
    SetEnvFromResponse(PostRequestSet),
    Script {
        language: ScriptLanguage,
        #[serde(default)]
        script: String,
    },
}

/// The single static binding rule of a `setEnv` post-request hook.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PostRequestSet {
    #[serde(rename = "statusCode")]
    pub status_code: i32,

    pub from: VariableSource,

    #[serde(rename = "fromKey", default)]
    pub from_key: String,

    pub target: String,
}
