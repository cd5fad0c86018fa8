use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tether_core::types::ScriptLanguage;

use crate::executor::ScriptingConfig;

use super::{ExecParams, ExecResult, RequestData, ResponseData, ScriptError, ScriptRunner};

#[derive(Debug, Serialize)]
struct ExecuteBody<'a> {
    script: &'a str,
    #[serde(rename = "requestData")]
    request_data: Option<&'a RequestData>,
    #[serde(rename = "responseData")]
    response_data: Option<&'a ResponseData>,
    variables: BTreeMap<String, String>,
}

/// Runs scripts by posting them to a long-lived interpreter server.
///
/// The server exposes `POST /execute` and answers with
/// `{"set_environments": {..}, "prints": [..]}`.
pub struct HttpScriptRunner {
    client: reqwest::Client,
    language: ScriptLanguage,
    base_url: String,
}

impl HttpScriptRunner {
    pub fn new(
        language: ScriptLanguage,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Self, ScriptError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScriptError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            language,
            base_url: format!("http://{host}:{port}"),
        })
    }

    pub fn from_config(config: &ScriptingConfig) -> Result<Self, ScriptError> {
        Self::new(config.language, &config.host, config.port, config.timeout)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/execute", self.base_url)
    }

    async fn execute(&self, script: &str, params: ExecParams) -> Result<ExecResult, ScriptError> {
        let body = ExecuteBody {
            script,
            request_data: params.req.as_ref(),
            response_data: params.res.as_ref(),
            variables: params
                .env
                .as_ref()
                .map(|env| env.enabled_values())
                .unwrap_or_default(),
        };

        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| ScriptError::Transport(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ScriptError::Transport(e.to_string()))?;

        let mut result = decode_result(status.as_u16(), &text)?;
        result.req = params.req;
        Ok(result)
    }
}

/// Turns the interpreter server's reply into an [`ExecResult`].
pub(crate) fn decode_result(status: u16, body: &str) -> Result<ExecResult, ScriptError> {
    if status != 200 {
        return Err(ScriptError::Runtime(format!(
            "script server returned {status}: {}",
            body.trim()
        )));
    }
    serde_json::from_str(body).map_err(|e| ScriptError::Decode(e.to_string()))
}

#[async_trait]
impl ScriptRunner for HttpScriptRunner {
    fn language(&self) -> ScriptLanguage {
        self.language
    }

    async fn execute_pre_request_script(
        &self,
        script: &str,
        params: ExecParams,
    ) -> Result<ExecResult, ScriptError> {
        self.execute(script, params).await
    }

    async fn execute_post_response_script(
        &self,
        script: &str,
        params: ExecParams,
    ) -> Result<ExecResult, ScriptError> {
        self.execute(script, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_successful_reply() {
        let result = decode_result(
            200,
            r#"{"set_environments":{"TOKEN":"abc"},"prints":["done"]}"#,
        )
        .unwrap();
        assert_eq!(result.set_environments["TOKEN"], "abc");
        assert_eq!(result.prints, vec!["done".to_string()]);
        assert!(result.req.is_none());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let result = decode_result(200, "{}").unwrap();
        assert!(result.set_environments.is_empty());
        assert!(result.prints.is_empty());
    }

    #[test]
    fn non_200_is_runtime_error() {
        let err = decode_result(500, "NameError: x\n").unwrap_err();
        assert!(matches!(err, ScriptError::Runtime(ref m) if m.contains("NameError")));
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(
            decode_result(200, "not json"),
            Err(ScriptError::Decode(_))
        ));
    }

    #[test]
    fn endpoint_uses_host_and_port() {
        let runner =
            HttpScriptRunner::new(ScriptLanguage::Python, "localhost", 2397, Duration::from_secs(1))
                .unwrap();
        assert_eq!(runner.endpoint(), "http://localhost:2397/execute");
        assert_eq!(runner.language(), ScriptLanguage::Python);
    }
}
