use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use crate::errors::SiteError;

/// `Json` whose rejections render as the usual `{error, message}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(SiteError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejections render as the usual `{error, message}` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(SiteError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for SiteError {
    fn from(rejection: JsonRejection) -> Self {
        SiteError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for SiteError {
    fn from(rejection: QueryRejection) -> Self {
        SiteError::InvalidRequest(rejection.body_text())
    }
}
