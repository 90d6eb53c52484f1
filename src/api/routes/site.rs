use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::extract::ApiQuery;
use crate::api::models::StructuredDataQuery;
use crate::api::AppState;
use crate::config::non_empty;
use crate::site::{clinic_json_ld, whatsapp_link};

/// Keys the browser needs. The reCAPTCHA secret never leaves the server.
pub async fn public_config(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    let whatsapp = config.whatsapp.phone.as_deref()
        .and_then(|phone| whatsapp_link(phone, config.whatsapp.default_message.as_deref()));

    Json(json!({
        "recaptcha": {
            "site_key": config.recaptcha.public_key(),
            "action": state.contact.expected_action(),
        },
        "maps": {
            "enabled": config.maps.key().is_some(),
            "api_key": config.maps.key(),
            "language": config.maps.language,
        },
        "analytics": {
            "ga_measurement_id": non_empty(&config.analytics.ga_measurement_id),
            "meta_pixel_id": non_empty(&config.analytics.meta_pixel_id),
        },
        "whatsapp_link": whatsapp,
    }))
}

pub async fn structured_data(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StructuredDataQuery>,
) -> Json<Value> {
    Json(clinic_json_ld(&state.config.clinic, query.lang.unwrap_or_default()))
}
