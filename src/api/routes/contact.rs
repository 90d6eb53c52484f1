use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;
use crate::analytics::AnalyticsEvent;
use crate::api::AppState;

/// Contact form endpoint. Mounted for every method so that non-POST requests
/// get the JSON `method_not_allowed` body instead of a bare 405.
pub async fn submit_contact(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    match state.contact.verify(&method, &body).await {
        Ok(accepted) => {
            let dispatcher = state.dispatcher.clone();
            let event = AnalyticsEvent::contact_form_submit(accepted.score);
            tokio::spawn(async move {
                let report = dispatcher.dispatch(&event).await;
                debug!(delivered = ?report.delivered, "Contact conversion dispatched");
            });

            Json(json!({
                "ok": true,
                "recaptcha": accepted,
            }))
            .into_response()
        }
        Err(rejection) => rejection.into_response(),
    }
}
