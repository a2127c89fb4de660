use std::time::Duration;

use serde_json::json;
use tally_core::{COUNT_PARAMS, COUNT_SYSTEM_PROMPT};
use tally_engine::{
    CompletionClient, CompletionRequest, GenerationError, OpenAiClient, OpenAiSettings,
    RetryPolicy,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> OpenAiSettings {
    OpenAiSettings {
        base_url: format!("{}/v1", server.uri()),
        api_key: "sk-test".to_string(),
        request_timeout: Duration::from_secs(5),
        retry: RetryPolicy {
            max_retries: 2,
            base_delay_ms: 1,
        },
    }
}

fn client(settings: OpenAiSettings) -> OpenAiClient {
    OpenAiClient::new(settings).expect("client builds")
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

fn count_request() -> CompletionRequest {
    CompletionRequest::new("gpt-4o", COUNT_PARAMS)
        .system(COUNT_SYSTEM_PROMPT)
        .user("Count a and b.")
}

#[tokio::test]
async fn sends_chat_request_and_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_tokens": 100,
            "temperature": 0.0,
            "n": 1,
            "messages": [
                {"role": "system", "content": COUNT_SYSTEM_PROMPT},
                {"role": "user", "content": "Count a and b."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("2,1")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(settings(&server))
        .complete(&count_request())
        .await
        .expect("completion ok");
    assert_eq!(reply, "2,1");
}

#[tokio::test]
async fn retries_after_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("3")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(settings(&server))
        .complete(&count_request())
        .await
        .expect("succeeds after retry");
    assert_eq!(reply, "3");
}

#[tokio::test]
async fn gives_up_when_rate_limit_persists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(settings(&server))
        .complete(&count_request())
        .await
        .unwrap_err();
    assert_eq!(err, GenerationError::RateLimited { attempts: 3 });
}

#[tokio::test]
async fn auth_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(settings(&server))
        .complete(&count_request())
        .await
        .unwrap_err();
    match err {
        GenerationError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("bad key"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(completion_body("1")),
        )
        .mount(&server)
        .await;

    let settings = OpenAiSettings {
        request_timeout: Duration::from_millis(50),
        ..settings(&server)
    };
    let err = client(settings)
        .complete(&count_request())
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "{err:?}");
}

#[tokio::test]
async fn response_without_choices_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client(settings(&server))
        .complete(&count_request())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn retries_after_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("4")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(settings(&server))
        .complete(&count_request())
        .await
        .expect("succeeds after retry");
    assert_eq!(reply, "4");
}

#[tokio::test]
async fn gives_up_when_server_errors_persist() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(settings(&server))
        .complete(&count_request())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GenerationError::Status {
            status: 503,
            body: "overloaded".to_string(),
        }
    );
}

#[tokio::test]
async fn reasoning_model_gets_reasoning_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("2,1")))
        .expect(1)
        .mount(&server)
        .await;

    let request = CompletionRequest::new("o1-preview", COUNT_PARAMS)
        .system(COUNT_SYSTEM_PROMPT)
        .user("Count a and b.");
    let reply = client(settings(&server))
        .complete(&request)
        .await
        .expect("completion ok");
    assert_eq!(reply, "2,1");

    let received = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "model": "o1-preview",
            "max_completion_tokens": 100,
            "n": 1,
            "messages": [
                {"role": "user", "content": format!("{COUNT_SYSTEM_PROMPT}\n\nCount a and b.")}
            ]
        })
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let settings = OpenAiSettings::new("sk-secret-value");
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("sk-secret-value"));
    assert!(rendered.contains("<redacted>"));
}
