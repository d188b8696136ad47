use std::future::IntoFuture;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{self, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::ServiceExt;

use formrelay_core::{BOT_TOKEN_VAR, CHAT_ID_VAR, FormLimits, StaticSecrets};
use formrelay_server::api::{self, AppState};
use formrelay_server::config::{FormRelayConfig, TelegramServerConfig};

const TOKEN: &str = "123456:test-token";
const CHAT: &str = "-1001234567890";
const BOUNDARY: &str = "formrelay-api-test";

// -- Mock Telegram Bot API ------------------------------------------------

/// One call received by the mock, in arrival order.
#[derive(Debug, Clone)]
struct Call {
    bot: String,
    method: String,
    chat_id: String,
    text: Option<String>,
    parse_mode: Option<String>,
    caption: Option<String>,
    filename: Option<String>,
    content: Vec<u8>,
}

#[derive(Clone, Default)]
struct MockTelegram {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_message: bool,
    /// Captions starting with one of these prefixes get an error response.
    fail_caption_prefixes: Vec<&'static str>,
}

impl MockTelegram {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    /// Serve the mock on an ephemeral port and return its base URL.
    async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/{bot}/{method}", post(telegram_method))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(axum::serve(listener, app).into_future());
        format!("http://{addr}")
    }
}

async fn telegram_method(
    State(mock): State<MockTelegram>,
    Path((bot, method)): Path<(String, String)>,
    request: Request,
) -> (StatusCode, Json<Value>) {
    let mut call = Call {
        bot,
        method: method.clone(),
        chat_id: String::new(),
        text: None,
        parse_mode: None,
        caption: None,
        filename: None,
        content: Vec::new(),
    };

    match method.as_str() {
        "sendMessage" => {
            let Json(body) = Json::<Value>::from_request(request, &()).await.unwrap();
            call.chat_id = body["chat_id"].as_str().unwrap().to_owned();
            call.text = body["text"].as_str().map(str::to_owned);
            call.parse_mode = body["parse_mode"].as_str().map(str::to_owned);
        }
        "sendDocument" => {
            let mut multipart = Multipart::from_request(request, &()).await.unwrap();
            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().unwrap().to_owned();
                match name.as_str() {
                    "chat_id" => call.chat_id = field.text().await.unwrap(),
                    "caption" => call.caption = Some(field.text().await.unwrap()),
                    "document" => {
                        call.filename = field.file_name().map(str::to_owned);
                        call.content = field.bytes().await.unwrap().to_vec();
                    }
                    other => panic!("unexpected sendDocument field {other}"),
                }
            }
        }
        other => panic!("unexpected Bot API method {other}"),
    }

    let fail = match call.method.as_str() {
        "sendMessage" => mock.fail_message,
        _ => call.caption.as_deref().is_some_and(|caption| {
            mock.fail_caption_prefixes
                .iter()
                .any(|prefix| caption.starts_with(prefix))
        }),
    };
    mock.calls.lock().unwrap().push(call);

    if fail {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error_code": 400, "description": "Bad Request: simulated"})),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({"ok": true, "result": {"message_id": 1}})),
        )
    }
}

// -- Helpers --------------------------------------------------------------

fn secrets() -> StaticSecrets {
    StaticSecrets::new()
        .with(BOT_TOKEN_VAR, TOKEN)
        .with(CHAT_ID_VAR, CHAT)
}

fn build_app(secrets: StaticSecrets, api_base_url: &str) -> Router {
    build_app_with_config(secrets, api_base_url, &FormRelayConfig::default())
}

fn build_app_with_config(
    secrets: StaticSecrets,
    api_base_url: &str,
    config: &FormRelayConfig,
) -> Router {
    let telegram = TelegramServerConfig {
        api_base_url: api_base_url.to_owned(),
        timeout_seconds: 5,
        ..TelegramServerConfig::default()
    };
    let state = AppState::new(
        Arc::new(secrets),
        reqwest::Client::new(),
        &telegram,
        config.limits.clone(),
    );
    api::router(state, config)
}

fn text_part(name: &str, value: &str) -> String {
    format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
}

fn file_part(name: &str, filename: &str, content: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
         Content-Type: image/jpeg\r\n\r\n{content}\r\n"
    )
}

fn close() -> String {
    format!("--{BOUNDARY}--\r\n")
}

fn full_form() -> Vec<String> {
    vec![
        text_part("khmerName", "សុខ សាន"),
        text_part("englishName", "Sok San"),
        text_part("birthplace", "Phnom Penh"),
        text_part("gender", "Male"),
        text_part("dob", "1990-04-13"),
        text_part("nationality", "Khmer"),
        text_part("currentAddress", "Street 271"),
    ]
}

fn form_with_files() -> String {
    let mut parts = full_form();
    parts.push(file_part("idCard", "id.jpg", "ID-BYTES"));
    parts.push(file_part("photo", "me.jpg", "PHOTO-BYTES"));
    parts.push(close());
    parts.concat()
}

fn submit_request(body: String) -> Request {
    http::Request::builder()
        .method(http::Method::POST)
        .uri("/api/submit")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// -- Tests ----------------------------------------------------------------

#[tokio::test]
async fn non_post_is_rejected_without_calls() {
    let mock = MockTelegram::default();
    let app = build_app(secrets(), &mock.spawn().await);

    let request = http::Request::builder()
        .method(http::Method::GET)
        .uri("/api/submit")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body,
        json!({"status": "error", "message": "Invalid request method."})
    );
    assert!(mock.calls().is_empty());
}

fn preflight_request(origin: &str) -> Request {
    http::Request::builder()
        .method(http::Method::OPTIONS)
        .uri("/api/submit")
        .header(http::header::ORIGIN, origin)
        .header(http::header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn cors_preflight_is_answered_for_allowed_origin() {
    let mock = MockTelegram::default();
    let mut config = FormRelayConfig::default();
    config.cors.allowed_origins = vec!["https://forms.example.com".to_owned()];
    let app = build_app_with_config(secrets(), &mock.spawn().await, &config);

    let response = app
        .oneshot(preflight_request("https://forms.example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[http::header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://forms.example.com"
    );
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn options_without_cors_hits_the_method_gate() {
    let mock = MockTelegram::default();
    let app = build_app(secrets(), &mock.spawn().await);

    let (status, body) = send(app, preflight_request("https://forms.example.com")).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body,
        json!({"status": "error", "message": "Invalid request method."})
    );
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn missing_secrets_are_a_configuration_error() {
    let mock = MockTelegram::default();
    let base = mock.spawn().await;

    for secrets in [
        StaticSecrets::new().with(CHAT_ID_VAR, CHAT),
        StaticSecrets::new().with(BOT_TOKEN_VAR, TOKEN),
        StaticSecrets::new(),
    ] {
        let app = build_app(secrets, &base);
        let (status, body) = send(app, submit_request(form_with_files())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"status": "error", "message": "Server configuration error."})
        );
    }
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn text_only_submission_sends_one_message() {
    let mock = MockTelegram::default();
    let app = build_app(secrets(), &mock.spawn().await);

    let mut parts = full_form();
    parts.push(close());
    let (status, body) = send(app, submit_request(parts.concat())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "message": "Form data and all files sent to Telegram successfully."
        })
    );

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    let message = &calls[0];
    assert_eq!(message.method, "sendMessage");
    assert_eq!(message.bot, format!("bot{TOKEN}"));
    assert_eq!(message.chat_id, CHAT);
    assert_eq!(message.parse_mode.as_deref(), Some("HTML"));

    let text = message.text.as_deref().unwrap();
    for value in [
        "សុខ សាន",
        "Sok San",
        "Phnom Penh",
        "Male",
        "1990-04-13",
        "Khmer",
        "Street 271",
    ] {
        assert!(text.contains(value), "missing {value} in {text}");
    }
    assert!(!text.contains("N/A"));
}

#[tokio::test]
async fn absent_fields_render_as_na() {
    let mock = MockTelegram::default();
    let app = build_app(secrets(), &mock.spawn().await);

    let body = [text_part("englishName", "Dara"), close()].concat();
    let (status, _) = send(app, submit_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    let text = mock.calls()[0].text.clone().unwrap();
    assert!(text.contains("Dara"));
    assert_eq!(text.matches("N/A").count(), 6);
}

#[tokio::test]
async fn notification_failure_skips_uploads() {
    let mock = MockTelegram {
        fail_message: true,
        ..MockTelegram::default()
    };
    let app = build_app(secrets(), &mock.spawn().await);

    let (status, body) = send(app, submit_request(form_with_files())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"status": "error", "message": "Failed to send text message to Telegram."})
    );
    assert_eq!(mock.methods(), ["sendMessage"]);
}

#[tokio::test]
async fn unreachable_telegram_is_a_notification_failure() {
    // Nothing listens on this port once the listener is dropped.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let app = build_app(secrets(), &format!("http://{addr}"));

    let (status, body) = send(app, submit_request(form_with_files())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to send text message to Telegram.");
}

#[tokio::test]
async fn failed_upload_is_partial_success() {
    let mock = MockTelegram {
        fail_caption_prefixes: vec!["photo:"],
        ..MockTelegram::default()
    };
    let app = build_app(secrets(), &mock.spawn().await);

    let (status, body) = send(app, submit_request(form_with_files())).await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(
        body,
        json!({
            "status": "partial_success",
            "message": "Form data sent, but failed to upload files: photo"
        })
    );
    assert_eq!(
        mock.methods(),
        ["sendMessage", "sendDocument", "sendDocument"]
    );
}

#[tokio::test]
async fn every_upload_failing_lists_all_fields() {
    let mock = MockTelegram {
        fail_caption_prefixes: vec!["idCard:", "photo:"],
        ..MockTelegram::default()
    };
    let app = build_app(secrets(), &mock.spawn().await);

    let (status, body) = send(app, submit_request(form_with_files())).await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(
        body["message"],
        "Form data sent, but failed to upload files: idCard, photo"
    );
}

#[tokio::test]
async fn files_are_uploaded_with_captions() {
    let mock = MockTelegram::default();
    let app = build_app(secrets(), &mock.spawn().await);

    let (status, body) = send(app, submit_request(form_with_files())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].method, "sendMessage");

    let id_card = &calls[1];
    assert_eq!(id_card.method, "sendDocument");
    assert_eq!(id_card.chat_id, CHAT);
    assert_eq!(id_card.caption.as_deref(), Some("idCard: id.jpg"));
    assert_eq!(id_card.filename.as_deref(), Some("id.jpg"));
    assert_eq!(id_card.content, b"ID-BYTES");

    let photo = &calls[2];
    assert_eq!(photo.caption.as_deref(), Some("photo: me.jpg"));
    assert_eq!(photo.content, b"PHOTO-BYTES");
}

#[tokio::test]
async fn resubmission_is_relayed_again() {
    let mock = MockTelegram::default();
    let app = build_app(secrets(), &mock.spawn().await);

    for _ in 0..2 {
        let (status, _) = send(app.clone(), submit_request(form_with_files())).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(
        mock.methods(),
        [
            "sendMessage",
            "sendDocument",
            "sendDocument",
            "sendMessage",
            "sendDocument",
            "sendDocument"
        ]
    );
}

#[tokio::test]
async fn truncated_body_is_a_form_error() {
    let mock = MockTelegram::default();
    let app = build_app(secrets(), &mock.spawn().await);

    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"englishName\"\r\n\r\nSok"
    );
    let (status, body) = send(app, submit_request(body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"status": "error", "message": "Error processing form data."})
    );
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn oversized_text_fields_are_a_form_error() {
    let mock = MockTelegram::default();
    let mut config = FormRelayConfig::default();
    config.limits.max_fields_size_bytes = 4;
    let app = build_app_with_config(secrets(), &mock.spawn().await, &config);

    let body = [text_part("englishName", "0123456789"), close()].concat();
    let (status, body) = send(app, submit_request(body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"status": "error", "message": "Error processing form data."})
    );
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_app(StaticSecrets::new(), "http://127.0.0.1:9");

    let request = http::Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
