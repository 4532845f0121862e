use axum::extract::{FromRequest, FromRequestParts};

use crate::data::models::ApiError;

/// `Query` whose rejection renders as an `ApiError` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `Json` whose rejection renders as an `ApiError` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
