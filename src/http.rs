//! HTTP utilities for request/response handling and CORS

use lambda_http::{Body, Response};
use serde_json::{json, Value};

/// CORS origin header for all responses
pub fn get_cors_origin_header() -> (&'static str, &'static str) {
    ("Access-Control-Allow-Origin", "*")
}

/// What a function advertises in its OPTIONS preflight answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorsPolicy {
    pub allow_methods: &'static str,
    pub allow_headers: &'static str,
}

impl CorsPolicy {
    /// Form submissions from the site (contact, quote, invitation).
    pub const POST_FORM: CorsPolicy = CorsPolicy {
        allow_methods: "POST, OPTIONS",
        allow_headers: "Content-Type",
    };

    /// Read-only lookups keyed by the `X-User-Email` header.
    pub const USER_LOOKUP: CorsPolicy = CorsPolicy {
        allow_methods: "GET, OPTIONS",
        allow_headers: "Content-Type, X-User-Email",
    };

    /// Full CORS headers for OPTIONS preflight responses only
    pub fn preflight_headers(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            get_cors_origin_header(),
            ("Access-Control-Allow-Methods", self.allow_methods),
            ("Access-Control-Allow-Headers", self.allow_headers),
            ("Access-Control-Max-Age", "86400"),
        ]
    }
}

/// Build an error response with consistent formatting
pub fn error_response(status: u16, error: &str) -> Response<Body> {
    json_response(status, &json!({ "error": error }))
}

/// Build a successful response with CORS headers
pub fn success_response(status: u16, body: &str) -> Response<Body> {
    let (key, value) = get_cors_origin_header();
    Response::builder()
        .status(status)
        .header(key, value)
        .header("Content-Type", "application/json")
        .body(body.into())
        .expect("Couldn't create success response")
}

pub fn json_response(status: u16, body: &Value) -> Response<Body> {
    success_response(status, &body.to_string())
}

/// Handle CORS preflight requests
pub fn handle_options(policy: &CorsPolicy) -> Response<Body> {
    let mut response = Response::builder().status(200);

    for (key, value) in policy.preflight_headers() {
        response = response.header(key, value);
    }

    response
        .body(Body::Empty)
        .expect("Couldn't handle CORS request")
}

/// Raw request body as text. An empty body reads as `{}`; `None` means the
/// bytes were not valid UTF-8.
pub fn body_text(body: &Body) -> Option<&str> {
    match body {
        Body::Empty => Some("{}"),
        Body::Text(s) => Some(s),
        Body::Binary(b) => std::str::from_utf8(b).ok(),
        _ => Some("{}"),
    }
}

/// Decode the request body straight into `T`. Any failure (bad UTF-8, bad
/// JSON, wrong field types) collapses into `None`; callers own the message.
pub fn parse_json_body<T>(body: &Body) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    body_text(body).and_then(|text| serde_json::from_str(text).ok())
}
