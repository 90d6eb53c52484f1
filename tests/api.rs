use axum::http::StatusCode;
use axum::body::Body;
use http_body_util::BodyExt;
use tower::ServiceExt;
use serde_json::{json, Value};
use async_trait::async_trait;
use clinic_edge::analytics::{AnalyticsEvent, AnalyticsVendor, VendorCategory};
use clinic_edge::api::{build_router, AppState};
use clinic_edge::config::SiteConfig;
use clinic_edge::consent::MemoryStorage;
use clinic_edge::errors::SiteError;
use clinic_edge::loader::ScriptFetcher;
use clinic_edge::verification::{RecaptchaVerifier, SiteverifyResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct FixedVerifier {
    score: f64,
    action: &'static str,
}

#[async_trait]
impl RecaptchaVerifier for FixedVerifier {
    async fn verify(&self, secret: &str, token: &str) -> Result<SiteverifyResponse, SiteError> {
        assert_eq!(secret, "server-secret");
        if token == "unreachable" {
            return Err(SiteError::Network("connection refused".into()));
        }
        Ok(SiteverifyResponse {
            success: true,
            score: Some(self.score),
            action: Some(self.action.to_string()),
            hostname: Some("clinica.example".into()),
            ..Default::default()
        })
    }
}

#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl ScriptFetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SiteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("/* {} */", url))
    }
}

struct CountingVendor {
    name: &'static str,
    category: VendorCategory,
    calls: AtomicUsize,
}

#[async_trait]
impl AnalyticsVendor for CountingVendor {
    fn name(&self) -> &str { self.name }
    fn category(&self) -> VendorCategory { self.category }
    fn is_available(&self) -> bool { true }

    async fn send(&self, _event: &AnalyticsEvent) -> Result<(), SiteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Harness {
    state: AppState,
    fetcher: Arc<CountingFetcher>,
    ga: Arc<CountingVendor>,
    pixel: Arc<CountingVendor>,
}

fn base_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.recaptcha.secret_key = Some("server-secret".into());
    config.recaptcha.site_key = Some("public-site-key".into());
    config.maps.api_key = Some("maps-key".into());
    config.whatsapp.phone = Some("+55 11 98765-4321".into());
    config.clinic.name = "Clínica Exemplo".into();
    config.clinic.description_pt = "Cuidado dermatológico".into();
    config.clinic.description_en = "Dermatology care".into();
    config
}

fn harness_with(config: SiteConfig, score: f64, action: &'static str) -> Harness {
    let fetcher = Arc::new(CountingFetcher::default());
    let ga = Arc::new(CountingVendor {
        name: "ga4",
        category: VendorCategory::Analytics,
        calls: AtomicUsize::new(0),
    });
    let pixel = Arc::new(CountingVendor {
        name: "meta_pixel",
        category: VendorCategory::Marketing,
        calls: AtomicUsize::new(0),
    });
    let vendors: Vec<Arc<dyn AnalyticsVendor>> = vec![ga.clone() as Arc<dyn AnalyticsVendor>, pixel.clone()];
    let state = AppState::new(
        config,
        Arc::new(MemoryStorage::new()),
        Arc::new(FixedVerifier { score, action }),
        fetcher.clone(),
        vendors,
    );
    Harness { state, fetcher, ga, pixel }
}

fn harness() -> Harness {
    harness_with(base_config(), 0.9, "contact")
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

fn contact_body(token: &str) -> Value {
    json!({
        "token": token,
        "action": "contact",
        "name": "Maria Silva",
        "email": "maria@example.com",
        "phone": "+55 11 90000-0000",
        "message": "Gostaria de agendar uma consulta",
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let h = harness();
    let response = app(&h.state).oneshot(make_request("GET", "/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "clinic-edge");
}

#[tokio::test]
async fn test_contact_rejects_non_post_methods() {
    let h = harness();
    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let req = make_request(method, "/api/contact", Some(contact_body("tok")));
        let response = app(&h.state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "method {}", method);

        let body = response_json(response).await;
        assert_eq!(body["error"], "method_not_allowed");
        assert_eq!(body["message"], "Method not allowed");
    }
}

#[tokio::test]
async fn test_contact_missing_token() {
    let h = harness();
    let req = make_request("POST", "/api/contact", Some(json!({"action": "contact", "name": "Ana"})));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "missing_token");
}

#[tokio::test]
async fn test_contact_empty_body_is_missing_token() {
    let h = harness();
    let response = app(&h.state).oneshot(make_request("POST", "/api/contact", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "missing_token");
}

#[tokio::test]
async fn test_contact_without_secret() {
    let mut config = base_config();
    config.recaptcha.secret_key = None;
    let h = harness_with(config, 0.9, "contact");

    let req = make_request("POST", "/api/contact", Some(contact_body("tok")));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "recaptcha_failed");
}

#[tokio::test]
async fn test_contact_accepted() {
    let h = harness();
    let req = make_request("POST", "/api/contact", Some(contact_body("valid-token")));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["ok"], true);
    assert!(body["recaptcha"]["score"].as_f64().unwrap() > 0.5);
    assert_eq!(body["recaptcha"]["action"], "contact");
}

#[tokio::test]
async fn test_contact_low_score() {
    let h = harness_with(base_config(), 0.3, "contact");
    let req = make_request("POST", "/api/contact", Some(contact_body("valid-token")));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "recaptcha_failed");
    assert!(body.get("score").is_none());
}

#[tokio::test]
async fn test_contact_action_mismatch() {
    let h = harness_with(base_config(), 0.9, "other");
    let req = make_request("POST", "/api/contact", Some(contact_body("valid-token")));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "recaptcha_failed");
}

#[tokio::test]
async fn test_contact_upstream_failure() {
    let h = harness();
    let req = make_request("POST", "/api/contact", Some(contact_body("unreachable")));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "recaptcha_failed");
}

#[tokio::test]
async fn test_consent_starts_undecided() {
    let h = harness();
    let response = app(&h.state).oneshot(make_request("GET", "/api/consent", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["decided"], false);
    assert!(body["consent"].is_null());
}

#[tokio::test]
async fn test_consent_save_and_read_back() {
    let h = harness();
    let req = make_request("POST", "/api/consent", Some(json!({"analytics": true})));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let saved = response_json(response).await;
    assert_eq!(saved["consent"]["functional"], true);
    assert_eq!(saved["consent"]["analytics"], true);
    assert_eq!(saved["consent"]["marketing"], false);

    let response = app(&h.state).oneshot(make_request("GET", "/api/consent", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["decided"], true);
    assert_eq!(body["consent"], saved["consent"]);
}

#[tokio::test]
async fn test_consent_presets() {
    let h = harness();
    let req = make_request("POST", "/api/consent", Some(json!({"preset": "reject_all"})));
    let body = response_json(app(&h.state).oneshot(req).await.unwrap()).await;
    assert_eq!(body["consent"]["analytics"], false);
    assert_eq!(body["consent"]["marketing"], false);
    assert_eq!(body["consent"]["functional"], true);

    let req = make_request("POST", "/api/consent", Some(json!({"preset": "accept_all"})));
    let body = response_json(app(&h.state).oneshot(req).await.unwrap()).await;
    assert_eq!(body["consent"]["marketing"], true);
}

#[tokio::test]
async fn test_consent_save_broadcasts() {
    let h = harness();
    let mut rx = h.state.consent.subscribe();
    let req = make_request("POST", "/api/consent", Some(json!({"preset": "accept_all"})));
    app(&h.state).oneshot(req).await.unwrap();

    match rx.try_recv().unwrap() {
        clinic_edge::consent::SiteEvent::ConsentUpdated(record) => assert!(record.analytics),
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_open_settings_signal() {
    let h = harness();
    let mut rx = h.state.consent.subscribe();
    let response = app(&h.state)
        .oneshot(make_request("POST", "/api/consent/settings", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(rx.try_recv().unwrap(), clinic_edge::consent::SiteEvent::OpenSettings);
}

#[tokio::test]
async fn test_events_gated_by_consent() {
    let h = harness();
    let event = json!({"name": "whatsapp_click", "params": {"location": "header"}});

    let body = response_json(
        app(&h.state).oneshot(make_request("POST", "/api/events", Some(event.clone()))).await.unwrap(),
    ).await;
    assert_eq!(body["delivered"].as_array().unwrap().len(), 0);
    assert_eq!(h.ga.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.pixel.calls.load(Ordering::SeqCst), 0);

    let req = make_request("POST", "/api/consent", Some(json!({"analytics": true, "marketing": false})));
    app(&h.state).oneshot(req).await.unwrap();
    app(&h.state).oneshot(make_request("POST", "/api/events", Some(event.clone()))).await.unwrap();
    assert_eq!(h.ga.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.pixel.calls.load(Ordering::SeqCst), 0);

    let req = make_request("POST", "/api/consent", Some(json!({"analytics": true, "marketing": true})));
    app(&h.state).oneshot(req).await.unwrap();
    let body = response_json(
        app(&h.state).oneshot(make_request("POST", "/api/events", Some(event))).await.unwrap(),
    ).await;
    assert_eq!(body["delivered"].as_array().unwrap().len(), 2);
    assert_eq!(h.ga.calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.pixel.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_event_requires_name() {
    let h = harness();
    let req = make_request("POST", "/api/events", Some(json!({"name": " "})));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn test_script_loaded_once() {
    let h = harness();
    for _ in 0..3 {
        let response = app(&h.state)
            .oneshot(make_request("GET", "/api/scripts/google-maps", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "ready");
        assert!(body["url"].as_str().unwrap().contains("key=maps-key"));
    }
    assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_script_without_key_degrades() {
    let mut config = base_config();
    config.maps.api_key = None;
    let h = harness_with(config, 0.9, "contact");

    let response = app(&h.state)
        .oneshot(make_request("GET", "/api/scripts/google-maps", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response_json(response).await["error"], "script_unavailable");
    assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_script() {
    let h = harness();
    let response = app(&h.state)
        .oneshot(make_request("GET", "/api/scripts/tag-manager", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(response).await["error"], "unknown_script");
}

#[tokio::test]
async fn test_script_listing() {
    let h = harness();
    let response = app(&h.state).oneshot(make_request("GET", "/api/scripts", None)).await.unwrap();
    let body = response_json(response).await;
    let scripts = body["scripts"].as_array().unwrap();
    assert_eq!(scripts.len(), 2);
    assert!(scripts.iter().all(|s| s["status"] == "unstarted"));
}

#[tokio::test]
async fn test_public_config_never_exposes_secret() {
    let h = harness();
    let response = app(&h.state).oneshot(make_request("GET", "/api/public-config", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["recaptcha"]["site_key"], "public-site-key");
    assert_eq!(body["maps"]["enabled"], true);
    assert_eq!(body["whatsapp_link"], "https://wa.me/5511987654321");
    assert!(!body.to_string().contains("server-secret"));
}

#[tokio::test]
async fn test_structured_data_locales() {
    let h = harness();
    let response = app(&h.state).oneshot(make_request("GET", "/api/structured-data", None)).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["@type"], "MedicalClinic");
    assert_eq!(body["description"], "Cuidado dermatológico");

    let response = app(&h.state)
        .oneshot(make_request("GET", "/api/structured-data?lang=en", None))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["description"], "Dermatology care");
}

#[tokio::test]
async fn test_contact_accepts_numeric_phone() {
    let h = harness();
    let body = json!({"token": "valid-token", "action": "contact", "phone": 5511987654321u64});
    let response = app(&h.state).oneshot(make_request("POST", "/api/contact", Some(body))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["ok"], true);
}

#[tokio::test]
async fn test_consent_malformed_body_is_json_error() {
    let h = harness();
    let req = make_request("POST", "/api/consent", Some(json!({"analytics": "yes"})));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "invalid_request");
    assert!(body["message"].is_string());
    assert!(!h.state.consent.read().is_decided());
}

#[tokio::test]
async fn test_event_without_name_field_is_json_error() {
    let h = harness();
    let req = make_request("POST", "/api/events", Some(json!({"nome": "x"})));
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn test_event_non_json_body_is_json_error() {
    let h = harness();
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/events")
        .body(Body::from("name=x"))
        .unwrap();
    let response = app(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn test_structured_data_unknown_locale_is_json_error() {
    let h = harness();
    let response = app(&h.state)
        .oneshot(make_request("GET", "/api/structured-data?lang=fr", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "invalid_request");
    assert!(body["message"].as_str().unwrap().contains("fr"));
}
