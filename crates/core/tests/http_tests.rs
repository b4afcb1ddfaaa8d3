// ═══════════════════════════════════════════════════════════════════
// HTTP Tests: HttpBackend and GeminiModel against a local stub server
// ═══════════════════════════════════════════════════════════════════

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use rental_furnish_core::ai::gemini::GeminiModel;
use rental_furnish_core::ai::traits::{LanguageModel, Prompt};
use rental_furnish_core::backend::http::HttpBackend;
use rental_furnish_core::backend::traits::RentalBackend;
use rental_furnish_core::errors::CoreError;
use rental_furnish_core::models::checkout::PaymentRequest;
use rental_furnish_core::models::money::Money;
use rental_furnish_core::models::preferences::{ApartmentSize, ProfilePreferences};
use rental_furnish_core::models::settings::{ModelSettings, Settings};
use rental_furnish_core::models::user::{Credentials, RequestContext};

// ═══════════════════════════════════════════════════════════════════
// Stub server
// ═══════════════════════════════════════════════════════════════════

/// A raw request as the stub saw it.
struct Captured {
    request_line: String,
    headers: String,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.headers
            .lines()
            .find(|l| l.to_ascii_lowercase().starts_with(&prefix))
            .map(|l| l[prefix.len()..].trim().to_string())
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serve one canned `(status, body)` per connection, in order, and hand
/// back what was received.
async fn stub(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            captured.push(read_request(&mut socket).await);
            let reply = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        captured
    });

    (base, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|l| {
            let lower = l.to_ascii_lowercase();
            lower
                .strip_prefix("content-length:")
                .map(|v| v.trim().parse::<usize>().unwrap())
        })
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed mid-body");
        buf.extend_from_slice(&chunk[..n]);
    }

    let (request_line, headers) = head.split_once("\r\n").unwrap_or((&head, ""));
    Captured {
        request_line: request_line.to_string(),
        headers: headers.to_string(),
        body: String::from_utf8_lossy(&buf[body_start..body_start + content_length]).to_string(),
    }
}

fn backend(base: &str) -> HttpBackend {
    let settings = Settings {
        api_base_url: base.to_string(),
        request_timeout_secs: 5,
        model: None,
    };
    HttpBackend::new(&settings).unwrap()
}

fn authed() -> RequestContext {
    RequestContext::with_token("tok-123")
}

// ═══════════════════════════════════════════════════════════════════
// Endpoint construction
// ═══════════════════════════════════════════════════════════════════

mod endpoints {
    use super::*;

    #[test]
    fn test_base_path_is_kept() {
        let b = backend("https://api.example.com/v2/");
        let url = b.endpoint(&["payment", "process"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/payment/process");
    }

    #[test]
    fn test_email_cannot_escape_its_segment() {
        let b = backend("https://api.example.com");
        let url = b.endpoint(&["payment", "history", "x/../y?z@b.co"]).unwrap();
        assert_eq!(url.path(), "/payment/history/x%2F..%2Fy%3Fz@b.co");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_rejects_non_http_base() {
        let settings = Settings {
            api_base_url: "ftp://files.example.com".into(),
            ..Settings::default()
        };
        assert!(matches!(HttpBackend::new(&settings), Err(CoreError::Config(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Backend calls
// ═══════════════════════════════════════════════════════════════════

mod backend_calls {
    use super::*;

    #[tokio::test]
    async fn test_login_posts_credentials_without_auth_header() {
        let (base, server) = stub(vec![(200, r#"{"token":"jwt-abc"}"#)]).await;
        let token = backend(&base)
            .login(&Credentials::new("a@b.co", "pw"))
            .await
            .unwrap();
        assert_eq!(token, "jwt-abc");

        let reqs = server.await.unwrap();
        assert!(reqs[0].request_line.starts_with("POST /auth/login "));
        assert!(reqs[0].header("authorization").is_none());
        assert_eq!(reqs[0].json(), serde_json::json!({"email": "a@b.co", "password": "pw"}));
    }

    #[tokio::test]
    async fn test_login_failure_uses_backend_message() {
        let (base, server) = stub(vec![(401, r#"{"message":"User not found"}"#)]).await;
        let err = backend(&base)
            .login(&Credentials::new("a@b.co", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Api { status: 401, ref message } if message == "User not found"
        ));
        assert!(err.is_unauthorized());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_login_without_token_is_an_error() {
        let (base, server) = stub(vec![(200, r#"{"token":""}"#)]).await;
        let err = backend(&base)
            .login(&Credentials::new("a@b.co", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Api { status: 200, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_history_sends_bearer_and_decodes() {
        let body = r#"[{
            "_id": "t1",
            "email": "a@b.co",
            "amount": 99.99,
            "paymentMethod": "credit_card",
            "createdAt": "2024-03-15T10:30:00Z",
            "items": [{
                "furnitureId": {"_id": "f1", "name": "Lamp", "category": "decor"},
                "quantity": 1,
                "priceAtTime": 99.99
            }]
        }]"#;
        let (base, server) = stub(vec![(200, body)]).await;
        let history = backend(&base)
            .get_transaction_history(&authed(), "a@b.co")
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, Money::from_cents(9_999));

        let reqs = server.await.unwrap();
        assert!(reqs[0].request_line.starts_with("GET /payment/history/a@b.co "));
        assert_eq!(reqs[0].header("authorization").as_deref(), Some("Bearer tok-123"));
    }

    #[tokio::test]
    async fn test_history_error_falls_back_to_generic_message() {
        let (base, server) = stub(vec![(500, "<html>oops</html>")]).await;
        let err = backend(&base)
            .get_transaction_history(&authed(), "a@b.co")
            .await
            .unwrap_err();
        match err {
            CoreError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to fetch transaction history");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_profile_unwraps_data() {
        let (base, server) = stub(vec![(
            200,
            r#"{"success":true,"data":{"email":"a@b.co","name":"Ana"}}"#,
        )])
        .await;
        let user = backend(&base).get_profile(&authed()).await.unwrap();
        assert_eq!(user.name, "Ana");
        let reqs = server.await.unwrap();
        assert!(reqs[0].request_line.starts_with("GET /profile "));
    }

    #[tokio::test]
    async fn test_payment_body_and_receipt() {
        let (base, server) = stub(vec![(200, r#"{"message":"Payment successful"}"#)]).await;
        let receipt = backend(&base)
            .process_payment(&authed(), &PaymentRequest::single("a@b.co", "f9", 2))
            .await
            .unwrap();
        assert_eq!(receipt.message(), Some("Payment successful"));

        let reqs = server.await.unwrap();
        assert!(reqs[0].request_line.starts_with("POST /payment/process "));
        assert_eq!(
            reqs[0].json(),
            serde_json::json!({
                "email": "a@b.co",
                "items": [{"furnitureId": "f9", "quantity": 2}],
                "paymentMethod": "credit_card"
            })
        );
    }

    #[tokio::test]
    async fn test_payment_failure_fallback() {
        let (base, server) = stub(vec![(400, "{}")]).await;
        let err = backend(&base)
            .process_payment(&authed(), &PaymentRequest::single("a@b.co", "f9", 1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Payment failed. Please try again later."));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_preferences_post() {
        let (base, server) = stub(vec![(200, r#"{"success":true}"#)]).await;
        let prefs = ProfilePreferences::new("Scandinavian, light oak", 250.0, ApartmentSize::Small);
        backend(&base).save_preferences(&authed(), &prefs).await.unwrap();

        let reqs = server.await.unwrap();
        assert!(reqs[0].request_line.starts_with("POST /profile/preferences "));
        assert_eq!(reqs[0].json()["apartment_size"], "small");
    }

    #[tokio::test]
    async fn test_catalog_is_public() {
        let body = r#"[{"_id":"f1","name":"Sofa","category":"living-room","price":300,"quantity":2}]"#;
        let (base, server) = stub(vec![(200, body)]).await;
        let items = backend(&base)
            .list_furniture(&RequestContext::anonymous())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        let reqs = server.await.unwrap();
        assert!(reqs[0].header("authorization").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = backend(&format!("http://{addr}"))
            .list_furniture(&RequestContext::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Gemini
// ═══════════════════════════════════════════════════════════════════

mod gemini {
    use super::*;

    fn model(base: &str) -> GeminiModel {
        GeminiModel::new(&ModelSettings {
            api_key: "key-xyz".into(),
            model: "gemini-test".into(),
            base_url: format!("{base}/v1beta/"),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn prompt() -> Prompt {
        Prompt {
            name: "test",
            text: "Say hi as JSON".into(),
            media: Some("data:image/png;base64,iVBORw==".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn test_request_shape_and_reply_text() {
        let reply = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]},"finishReason":"STOP"}]}"#;
        let (base, server) = stub(vec![(200, reply)]).await;
        let text = model(&base).generate_json(&prompt()).await.unwrap();
        assert_eq!(text, r#"{"a":1}"#);

        let reqs = server.await.unwrap();
        assert!(reqs[0]
            .request_line
            .starts_with("POST /v1beta/models/gemini-test:generateContent "));
        assert_eq!(reqs[0].header("x-goog-api-key").as_deref(), Some("key-xyz"));
        let body = reqs[0].json();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Say hi as JSON");
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[tokio::test]
    async fn test_error_envelope_message() {
        let (base, server) = stub(vec![(403, r#"{"error":{"code":403,"message":"API key not valid"}}"#)]).await;
        let err = model(&base).generate_json(&prompt()).await.unwrap_err();
        match err {
            CoreError::Model { provider, message } => {
                assert_eq!(provider, "Gemini");
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_blocked_reply_reports_finish_reason() {
        let (base, server) = stub(vec![(200, r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)]).await;
        let err = model(&base).generate_json(&prompt()).await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_comes_from_settings() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        // Accept and read, then never answer.
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        });

        let slow = GeminiModel::new(&ModelSettings {
            api_key: "key-xyz".into(),
            model: "gemini-test".into(),
            base_url: format!("{base}/v1beta"),
            timeout_secs: 1,
        })
        .unwrap();

        let started = std::time::Instant::now();
        let err = slow.generate_json(&prompt()).await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)), "{err:?}");
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        server.abort();
    }
}
