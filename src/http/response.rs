//! Fallback responses.
//!
//! # Design Decisions
//! - The not-found body is fixed plain text
//! - No status code is set; the response keeps the default `200 OK`

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::http::handler::{BoxResponseFuture, Handler};

/// Body written for unmatched paths and methods.
pub const NOT_FOUND_BODY: &str = "Not found";

/// Builds the not-found response.
pub fn not_found() -> Response {
    Response::new(Body::from(NOT_FOUND_BODY))
}

/// Default fallback handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn call(&self, _req: Request<Body>) -> BoxResponseFuture {
        Box::pin(async { not_found() })
    }
}
