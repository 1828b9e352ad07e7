use chorus::runtime::{CompletionClient, Credentials, OpenAiClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAiClient {
    let credentials = Credentials {
        api_key: "sk-test".to_string(),
        api_base: format!("{}/v1", server.uri()),
    };
    OpenAiClient::new(credentials, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn sends_system_and_user_messages_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "messages": [
                { "role": "system", "content": "You are a reviewer." },
                { "role": "user", "content": "check this" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "looks fine" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .complete("You are a reviewer.", "check this", "gpt-4")
        .await
        .unwrap();

    assert_eq!(reply, "looks fine");
}

#[tokio::test]
async fn unauthorized_is_an_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("s", "u", "m").await.unwrap_err();

    assert!(err.cause.starts_with("authentication failed"));
    assert!(err.cause.contains("invalid key"));
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("s", "u", "m").await.unwrap_err();
    assert!(err.cause.starts_with("rate limited"));
}

#[tokio::test]
async fn server_error_reports_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("s", "u", "m").await.unwrap_err();
    assert!(err.cause.contains("503"));
    assert!(err.cause.contains("overloaded"));
}

#[tokio::test]
async fn unparseable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("s", "u", "m").await.unwrap_err();
    assert!(err.cause.starts_with("malformed response"));
}

#[tokio::test]
async fn empty_choices_are_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("s", "u", "m").await.unwrap_err();
    assert_eq!(err.cause, "malformed response: no message content in choices");
}

#[tokio::test]
async fn unreachable_backend_is_a_request_failure() {
    let credentials = Credentials {
        api_key: "sk-test".to_string(),
        api_base: "http://127.0.0.1:9".to_string(),
    };
    let client = OpenAiClient::new(credentials, Duration::from_secs(2)).unwrap();

    let err = client.complete("s", "u", "m").await.unwrap_err();
    assert!(err.cause.starts_with("HTTP request failed"));
}
