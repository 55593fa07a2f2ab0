//! HTTP delivery of applications to the forms API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{Receipt, SubmissionError, SubmissionGateway, SubmissionRequest};

/// Body returned by `POST /api/forms/{form}`.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    id: Option<serde_json::Value>,
}

impl ApiResponse {
    /// The id arrives as either a string or a number.
    fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(id) if !id.is_empty() => Some(id.clone()),
            serde_json::Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Sends applications with a blocking reqwest client. One request per
/// submission; no retries.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Builds a gateway for `base_url` (e.g. `http://localhost:8000`).
    ///
    /// Without a timeout the client default applies.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint_url(&self, request: &SubmissionRequest) -> String {
        format!("{}/api/forms/{}", self.base_url, request.kind.endpoint())
    }
}

impl SubmissionGateway for HttpGateway {
    fn submit(&self, request: &SubmissionRequest) -> Result<Receipt, SubmissionError> {
        let url = self.endpoint_url(request);
        debug!(url = %url, "posting application");

        let response = self
            .client
            .post(&url)
            .json(&request.payload)
            .send()
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SubmissionError::Network(e.to_string()))?;
        let parsed = serde_json::from_str::<ApiResponse>(&body);

        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "forms API rejected the application");
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message: parsed.ok().and_then(|r| r.message),
            });
        }

        let parsed = parsed.map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;
        if !parsed.success {
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message: parsed.message,
            });
        }

        let id = parsed
            .id_string()
            .ok_or_else(|| SubmissionError::MalformedResponse("response has no application id".to_string()))?;
        Ok(Receipt { id, message: parsed.message })
    }
}
