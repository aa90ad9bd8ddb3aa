//! HTTP origin client.

use super::OriginSource;
use async_trait::async_trait;
use readthrough_config::OriginConfig;
use readthrough_core::{FetchResult, ReadThroughError, ReadThroughResult};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Longest error body echoed into an error message.
const MAX_ERROR_BODY: usize = 256;

/// Fetches a document with a GET to a fixed URL.
pub struct HttpOriginSource<D> {
    client: Client,
    url: String,
    accept: String,
    _document: PhantomData<fn() -> D>,
}

impl<D: FetchResult> HttpOriginSource<D> {
    /// Creates an origin client with the configured timeouts.
    pub fn new(config: &OriginConfig) -> ReadThroughResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReadThroughError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.url, &config.accept))
    }

    /// Creates an origin client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, url: &str, accept: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
            accept: accept.to_string(),
            _document: PhantomData,
        }
    }

    /// Returns the endpoint this origin fetches.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn unavailable(&self, message: impl Into<String>) -> ReadThroughError {
        ReadThroughError::origin_unavailable(&self.url, message)
    }
}

#[async_trait]
impl<D: FetchResult> OriginSource for HttpOriginSource<D> {
    type Document = D;

    async fn fetch(&self) -> ReadThroughResult<D> {
        debug!("Fetching origin document from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, &self.accept)
            .send()
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Origin {} answered {}", self.url, status);
            return Err(self.unavailable(format!("HTTP {}: {}", status, truncate(&body))));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.unavailable(format!("Failed to read body: {}", e)))?;

        let document = decode_body::<D>(&body).map_err(|e| match e {
            BodyError::Format(message) => ReadThroughError::OriginFormat(message),
            BodyError::Rejected(message) => self.unavailable(message),
        })?;

        debug!("Fetched origin document ({} bytes)", body.len());
        Ok(document)
    }
}

enum BodyError {
    /// Body is not the expected document.
    Format(String),
    /// Body is a well-formed envelope reporting failure.
    Rejected(String),
}

/// Decodes either a bare document or an envelope of the form
/// `{"status": "success", "data": <document>, ...}`.
///
/// An object with a `status` field is always read as an envelope.
fn decode_body<D: FetchResult>(body: &[u8]) -> Result<D, BodyError> {
    let value: JsonValue = serde_json::from_slice(body)
        .map_err(|e| BodyError::Format(format!("body is not JSON: {}", e)))?;

    let document = match value {
        JsonValue::Object(mut envelope) if envelope.contains_key("status") => {
            let status = envelope
                .get("status")
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string();

            if status != "success" {
                let message = envelope
                    .get("message")
                    .and_then(JsonValue::as_str)
                    .unwrap_or("no message");
                return Err(BodyError::Rejected(format!(
                    "origin reported status '{}': {}",
                    status, message
                )));
            }

            envelope
                .remove("data")
                .ok_or_else(|| BodyError::Format("envelope has no data field".to_string()))?
        }
        other => other,
    };

    let document: D = serde_json::from_value(document)
        .map_err(|e| BodyError::Format(format!("unexpected document shape: {}", e)))?;

    document.validate_document().map_err(BodyError::Format)?;

    Ok(document)
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readthrough_core::{Employee, EmployeeList};

    fn decode(body: &str) -> Result<EmployeeList, BodyError> {
        decode_body::<EmployeeList>(body.as_bytes())
    }

    #[test]
    fn test_decode_bare_document() {
        let list = decode(r#"[{"id":1,"name":"Tiger"}]"#).ok().unwrap();
        assert_eq!(list, EmployeeList::new(vec![Employee::new(1, "Tiger")]));
    }

    #[test]
    fn test_decode_envelope() {
        let body = r#"{
            "status": "success",
            "data": [{"id": 1, "employee_name": "Tiger Nixon", "employee_salary": 320800}],
            "message": "Successfully! All records has been fetched."
        }"#;

        let list = decode(body).ok().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.employees()[0].name, "Tiger Nixon");
    }

    #[test]
    fn test_envelope_failure_status_is_rejected() {
        let body = r#"{"status": "error", "message": "Too Many Attempts."}"#;
        match decode(body) {
            Err(BodyError::Rejected(message)) => assert!(message.contains("Too Many Attempts")),
            _ => panic!("Expected Rejected"),
        }
    }

    #[test]
    fn test_envelope_without_data_is_format_error() {
        assert!(matches!(decode(r#"{"status": "success"}"#), Err(BodyError::Format(_))));
    }

    #[test]
    fn test_non_json_is_format_error() {
        assert!(matches!(decode("<html>maintenance</html>"), Err(BodyError::Format(_))));
    }

    #[test]
    fn test_invalid_document_is_format_error() {
        assert!(matches!(decode(r#"[{"id":1,"name":""}]"#), Err(BodyError::Format(_))));
    }

    #[test]
    fn test_truncate() {
        let long = "x".repeat(MAX_ERROR_BODY + 10);
        assert_eq!(truncate(&long).len(), MAX_ERROR_BODY);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_url_is_kept() {
        let origin = HttpOriginSource::<EmployeeList>::new(&OriginConfig::default()).unwrap();
        assert_eq!(origin.url(), readthrough_config::DEFAULT_ORIGIN_URL);
    }
}
