use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use crate::api::extract::ApiJson;
use crate::api::models::{ConsentResponse, SaveConsentRequest};
use crate::api::AppState;

pub async fn get_consent(State(state): State<AppState>) -> Json<ConsentResponse> {
    let current = state.consent.read();
    Json(ConsentResponse {
        decided: current.is_decided(),
        consent: current.record().cloned(),
    })
}

pub async fn save_consent(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SaveConsentRequest>,
) -> Json<ConsentResponse> {
    let record = state.consent.save(req.decision());
    Json(ConsentResponse {
        decided: true,
        consent: Some(record),
    })
}

pub async fn open_settings(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    state.consent.open_settings();
    (StatusCode::ACCEPTED, Json(json!({"requested": true})))
}
