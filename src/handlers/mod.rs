//! Handler modules, one per deployed function

pub mod contact;
pub mod invitation;
pub mod quote;
pub mod user_projects;

// Re-export handler functions for convenience
pub use contact::handle_contact_form;
pub use invitation::handle_send_invitation;
pub use quote::handle_quote_request;
pub use user_projects::handle_user_projects;

use lambda_http::{Body, Request, Response};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{handle_options, json_response, CorsPolicy};

/// Answers preflight and wrong-method requests. `None` means the request
/// should go on to the handler body.
pub(crate) fn screen_method(event: &Request, allowed: &str, policy: &CorsPolicy) -> Option<Response<Body>> {
    let method = event.method().as_str();

    if method == "OPTIONS" {
        return Some(handle_options(policy));
    }

    if method != allowed {
        tracing::debug!(method, allowed, "rejecting request method");
        return Some(ApiError::MethodNotAllowed.into_response());
    }

    None
}

/// Turns a handler outcome into the final response, logging failures.
pub(crate) fn respond(function: &'static str, outcome: Result<Value, ApiError>) -> Response<Body> {
    match outcome {
        Ok(body) => json_response(200, &body),
        Err(e) => {
            if e.status() >= 500 {
                tracing::error!(function, error = %e, "request failed");
            } else {
                tracing::info!(function, error = %e, "request rejected");
            }
            e.into_response()
        }
    }
}
