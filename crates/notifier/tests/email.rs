//! Resend client against a local mock of the HTTP API.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobboard_notifier::email::{EmailSender, Mailbox, OutboundEmail, ResendClient, SendError};

fn email() -> OutboundEmail {
    OutboundEmail {
        from: Mailbox::new("Job Board", "notifications@jobboard.dev"),
        to: "jane@example.com".to_string(),
        subject: "New application for Job X and ID 1: Jane Doe".to_string(),
        text: "Candidate: Jane Doe <jane@example.com>".to_string(),
    }
}

async fn client(server: &MockServer) -> ResendClient {
    ResendClient::new("re_test_key")
        .unwrap()
        .with_endpoint(format!("{}/emails", server.uri()))
}

#[tokio::test]
async fn test_send_posts_email_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test_key"))
        .and(body_partial_json(json!({
            "from": "Job Board <notifications@jobboard.dev>",
            "to": ["jane@example.com"],
            "subject": "New application for Job X and ID 1: Jane Doe",
            "text": "Candidate: Jane Doe <jane@example.com>"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "email_123" })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).await.send(&email()).await.unwrap();
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let err = client(&server).await.send(&email()).await.unwrap_err();
    assert!(matches!(err, SendError::Transient(_)), "{:?}", err);
}

#[tokio::test]
async fn test_rejected_email_is_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid `to` field"))
        .mount(&server)
        .await;

    let err = client(&server).await.send(&email()).await.unwrap_err();
    assert!(matches!(err, SendError::Permanent(_)), "{:?}", err);
    assert!(err.to_string().contains("invalid `to` field"));
}
