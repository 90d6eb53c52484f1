use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use crate::api::models::ScriptResponse;
use crate::api::AppState;
use crate::errors::SiteError;
use crate::loader::{GOOGLE_MAPS, RECAPTCHA};

pub async fn list_scripts(State(state): State<AppState>) -> Json<Value> {
    let scripts: Vec<Value> = [GOOGLE_MAPS, RECAPTCHA]
        .iter()
        .map(|key| json!({
            "key": key,
            "status": state.loader.status(key),
            "configured": state.catalog.resolve(key).is_ok(),
            "error": state.loader.last_error(key).map(|e| e.to_string()),
        }))
        .collect();
    Json(json!({ "scripts": scripts }))
}

/// Load an SDK through the shared loader. Any failure degrades to a 503 the
/// page can render as "unavailable".
pub async fn load_script(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ScriptResponse>, (StatusCode, Json<Value>)> {
    let url = state.catalog.resolve(&key).map_err(|e| match e {
        SiteError::InvalidRequest(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "unknown_script", "message": e.to_string()})),
        ),
        other => unavailable(&other),
    })?;

    let handle = state.loader.load(&key, &url).await.map_err(|e| unavailable(&e))?;

    Ok(Json(ScriptResponse {
        key,
        status: state.loader.status(&handle.key),
        url: Some(handle.url.clone()),
        bytes: Some(handle.script.len()),
        loaded_at: Some(handle.loaded_at.to_rfc3339()),
    }))
}

fn unavailable(error: &SiteError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "script_unavailable",
            "message": error.to_string(),
            "retryable": error.classify().retryable,
        })),
    )
}
