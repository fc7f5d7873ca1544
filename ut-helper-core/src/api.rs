// backend api - the three workflow endpoints plus the service probe

use crate::config::Config;
use crate::error::{WorkflowError, WorkflowResult};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

// request bodies. optional fields are sent as null rather than omitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternUpload {
    pub pattern_name: String,
    pub pattern_content: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceUpload {
    pub file_name: String,
    pub source_code: String,
    pub package_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub pattern_content: String,
    pub source_code: String,
    pub file_name: String,
    pub pattern_name: String,
    pub additional_context: Option<String>,
}

/// upload confirmation. only the 2xx matters, the body is read best-effort
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadReceipt {
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedArtifact {
    pub unit_tests: String,
    pub pattern_used: String,
    #[serde(default)]
    pub file_analyzed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// the remote service as the workflow sees it
pub trait Backend: Send + Sync {
    fn upload_pattern(
        &self,
        request: &PatternUpload,
    ) -> impl Future<Output = WorkflowResult<UploadReceipt>> + Send;

    fn upload_source(
        &self,
        request: &SourceUpload,
    ) -> impl Future<Output = WorkflowResult<UploadReceipt>> + Send;

    fn generate_unit_tests(
        &self,
        request: &GenerateRequest,
    ) -> impl Future<Output = WorkflowResult<GeneratedArtifact>> + Send;

    fn service_info(&self) -> impl Future<Output = WorkflowResult<ServiceInfo>> + Send;
}

/// json over http with reqwest
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build http client")?;

        Ok(Self {
            client,
            base: config.api_base().to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// post a json body and hand back the raw text of a 2xx response
    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> WorkflowResult<String> {
        let url = self.url(path);
        tracing::debug!(%url, "sending request");

        let response = self.client.post(&url).json(body).send().await?;
        read_body(path, response).await
    }
}

impl Backend for HttpBackend {
    async fn upload_pattern(&self, request: &PatternUpload) -> WorkflowResult<UploadReceipt> {
        let body = self.post_json("/upload-pattern", request).await?;
        Ok(parse_receipt(&body))
    }

    async fn upload_source(&self, request: &SourceUpload) -> WorkflowResult<UploadReceipt> {
        let body = self.post_json("/upload-source", request).await?;
        Ok(parse_receipt(&body))
    }

    async fn generate_unit_tests(&self, request: &GenerateRequest) -> WorkflowResult<GeneratedArtifact> {
        let body = self.post_json("/generate-ut", request).await?;
        parse_strict(&body)
    }

    async fn service_info(&self) -> WorkflowResult<ServiceInfo> {
        let url = self.url("/");
        tracing::debug!(%url, "probing service");
        let response = self.client.get(&url).send().await?;
        let body = read_body("/", response).await?;
        parse_strict(&body)
    }
}

async fn read_body(path: &str, response: reqwest::Response) -> WorkflowResult<String> {
    let status = response.status();
    let body = response.text().await?;
    tracing::debug!(path, status = status.as_u16(), bytes = body.len(), "response received");

    if status.is_success() {
        Ok(body)
    } else {
        Err(WorkflowError::Server {
            status: status.as_u16(),
            message: extract_error_message(status.as_u16(), &body),
        })
    }
}

fn parse_receipt(body: &str) -> UploadReceipt {
    serde_json::from_str(body).unwrap_or_default()
}

fn parse_strict<T: DeserializeOwned>(body: &str) -> WorkflowResult<T> {
    serde_json::from_str(body).map_err(|e| WorkflowError::Decode(e.to_string()))
}

/// what to show for a failed response: `detail` if the body has one, else the
/// whole json body, else the raw text, else the bare status
pub fn extract_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
            Some(detail) if !detail.is_null() && !detail.is_string() => detail.to_string(),
            _ => value.to_string(),
        },
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("request failed with status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_shown_verbatim() {
        assert_eq!(extract_error_message(400, r#"{"detail": "bad input"}"#), "bad input");
    }

    #[test]
    fn structured_detail_is_stringified() {
        let body = r#"{"detail": [{"loc": ["body", "file_name"], "msg": "field required"}]}"#;
        assert_eq!(
            extract_error_message(422, body),
            r#"[{"loc":["body","file_name"],"msg":"field required"}]"#
        );
    }

    #[test]
    fn body_without_detail_is_stringified_whole() {
        assert_eq!(extract_error_message(500, r#"{"error": "boom"}"#), r#"{"error":"boom"}"#);
        assert_eq!(extract_error_message(500, r#"{"detail": null}"#), r#"{"detail":null}"#);
    }

    #[test]
    fn non_json_body_is_shown_raw() {
        assert_eq!(extract_error_message(502, "Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        assert_eq!(extract_error_message(503, ""), "request failed with status 503");
    }

    #[test]
    fn optional_fields_serialize_as_null() {
        let request = SourceUpload {
            file_name: "main.go".to_string(),
            source_code: "package main".to_string(),
            package_name: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["package_name"], Value::Null);
    }

    #[test]
    fn receipt_tolerates_any_body() {
        assert_eq!(parse_receipt("not json"), UploadReceipt::default());
        let receipt = parse_receipt(r#"{"status": "success", "message": "Pattern 'standard' uploaded successfully"}"#);
        assert_eq!(receipt.status.as_deref(), Some("success"));
    }

    #[test]
    fn artifact_without_file_analyzed_still_parses() {
        let artifact: GeneratedArtifact =
            parse_strict(r#"{"unit_tests": "func TestFoo(t *testing.T) {}", "pattern_used": "standard"}"#).unwrap();
        assert_eq!(artifact.unit_tests, "func TestFoo(t *testing.T) {}");
        assert_eq!(artifact.file_analyzed, None);
    }

    #[test]
    fn artifact_missing_fields_is_a_decode_error() {
        let err = parse_strict::<GeneratedArtifact>(r#"{"pattern_used": "standard"}"#).unwrap_err();
        assert!(matches!(err, WorkflowError::Decode(_)));
    }
}
