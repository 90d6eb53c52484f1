use axum::{extract::State, Json};
use crate::analytics::{AnalyticsEvent, DispatchReport};
use crate::api::extract::ApiJson;
use crate::api::AppState;
use crate::errors::SiteError;

pub async fn dispatch_event(
    State(state): State<AppState>,
    ApiJson(event): ApiJson<AnalyticsEvent>,
) -> Result<Json<DispatchReport>, SiteError> {
    if event.name.trim().is_empty() {
        return Err(SiteError::InvalidRequest("Event name must not be empty".into()));
    }
    Ok(Json(state.dispatcher.dispatch(&event).await))
}
