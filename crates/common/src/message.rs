//! Notification message codec.
//!
//! New messages are JSON objects with named keys. Bodies in the older
//! `"<subject>|<recipient>|<rest>"` form are still decoded so that anything
//! already sitting in the stream gets delivered.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Legacy field separator.
const LEGACY_DELIMITER: char = '|';

/// A queued email notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub subject: String,
    pub recipient: String,
    pub body: String,
}

impl NotificationMessage {
    /// Notification for a freshly submitted application.
    pub fn application_received(
        job_title: &str,
        job_id: Uuid,
        candidate_name: &str,
        candidate_email: &str,
    ) -> Self {
        let subject = format!(
            "New application for Job {} and ID {}: {}",
            job_title, job_id, candidate_name
        );
        let body = format!(
            "{}\n\nCandidate: {} <{}>",
            subject, candidate_name, candidate_email
        );

        Self {
            subject,
            recipient: candidate_email.to_string(),
            body,
        }
    }

    /// Serialize into the queue wire format.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a queue body. Returns `None` for malformed bodies.
    ///
    /// Legacy bodies need at least two pipe-separated fields: field 0 is the
    /// subject, field 1 the recipient, and the whole original body is sent as
    /// the content.
    pub fn decode(raw: &str) -> Option<Self> {
        if let Ok(message) = serde_json::from_str::<NotificationMessage>(raw) {
            return Some(message);
        }

        let mut parts = raw.split(LEGACY_DELIMITER);
        let subject = parts.next()?;
        let recipient = parts.next()?;

        Some(Self {
            subject: subject.to_string(),
            recipient: recipient.to_string(),
            body: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_legacy_two_fields() {
        let raw = "New application for Job X and ID 1: Jane Doe|jane@example.com";
        let message = NotificationMessage::decode(raw).unwrap();

        assert_eq!(message.subject, "New application for Job X and ID 1: Jane Doe");
        assert_eq!(message.recipient, "jane@example.com");
        assert_eq!(message.body, raw);
    }

    #[test]
    fn test_decode_legacy_extra_fields_keep_whole_body() {
        let raw = "Subject|bob@example.com|first line|second line";
        let message = NotificationMessage::decode(raw).unwrap();

        assert_eq!(message.subject, "Subject");
        assert_eq!(message.recipient, "bob@example.com");
        assert_eq!(message.body, raw);
    }

    #[test]
    fn test_decode_without_delimiter_is_malformed() {
        assert!(NotificationMessage::decode("just some text").is_none());
        assert!(NotificationMessage::decode("").is_none());
    }

    #[test]
    fn test_decode_json_keeps_pipes_in_subject() {
        let original = NotificationMessage {
            subject: "Backend | Platform role".to_string(),
            recipient: "ana@example.com".to_string(),
            body: "a|b|c".to_string(),
        };
        let decoded = NotificationMessage::decode(&original.encode().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_application_received_addresses_candidate() {
        let job_id = Uuid::nil();
        let message = NotificationMessage::application_received(
            "Rust Engineer",
            job_id,
            "Jane Doe",
            "jane@example.com",
        );

        assert_eq!(
            message.subject,
            format!("New application for Job Rust Engineer and ID {}: Jane Doe", job_id)
        );
        assert_eq!(message.recipient, "jane@example.com");
        assert!(message.body.starts_with(&message.subject));
        assert!(message.body.contains("Jane Doe <jane@example.com>"));
    }
}
