//! Email delivery through the Resend HTTP API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Fixed sender identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: String,
    pub address: String,
}

impl Mailbox {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.address)
    }
}

/// A plain-text email to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: Mailbox,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Delivery failure, split by whether another attempt can succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("transient delivery failure: {0}")]
    Transient(String),

    #[error("permanent delivery failure: {0}")]
    Permanent(String),
}

impl SendError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SendError::Transient(_))
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendError>;
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// [`EmailSender`] backed by Resend.
pub struct ResendClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl ResendClient {
    pub fn new(api_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: RESEND_ENDPOINT.to_string(),
        })
    }

    /// Point the client at a different API host (e.g. a local mock).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendError> {
        let request = ResendRequest {
            from: email.from.to_string(),
            to: [email.to.as_str()],
            subject: &email.subject,
            text: &email.text,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    SendError::Permanent(e.to_string())
                } else {
                    SendError::Transient(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(classify_status(status, detail))
    }
}

/// Rate limiting and server errors are worth retrying; other rejections are not.
fn classify_status(status: StatusCode, detail: String) -> SendError {
    let message = format!("{}: {}", status, detail);
    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
    {
        SendError::Transient(message)
    } else {
        SendError::Permanent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_display() {
        let from = Mailbox::new("Job Board", "notifications@jobboard.dev");
        assert_eq!(from.to_string(), "Job Board <notifications@jobboard.dev>");
    }

    #[test]
    fn test_retryable_statuses_are_transient() {
        for status in [
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert!(classify_status(status, String::new()).is_transient(), "{}", status);
        }
    }

    #[test]
    fn test_rejections_are_permanent() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::UNPROCESSABLE_ENTITY,
        ] {
            assert!(!classify_status(status, String::new()).is_transient(), "{}", status);
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = ResendRequest {
            from: Mailbox::new("Job Board", "jobs@example.com").to_string(),
            to: ["jane@example.com"],
            subject: "Hello",
            text: "Body",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["from"], "Job Board <jobs@example.com>");
        assert_eq!(json["to"][0], "jane@example.com");
        assert_eq!(json["subject"], "Hello");
        assert_eq!(json["text"], "Body");
    }
}
