use std::fmt::Display;

use worker::{Headers, Request, Response, Result};

use crate::error::RsvpError;
use crate::validation::ValidationErrors;

pub const DUPLICATE_MESSAGE: &str = "This email or name has already been used to RSVP. \
If you need to update your response, please contact the host.";

pub const INVALID_LINK_MESSAGE: &str =
    "Invalid or expired verification link. Please submit a new RSVP.";

fn cors_headers(req: &Request) -> Result<Headers> {
    let headers = Headers::new();

    // Reflect Origin when present; otherwise allow all.
    let origin = req.headers().get("Origin")?.unwrap_or_else(|| "*".to_string());

    headers.set("Access-Control-Allow-Origin", &origin)?;
    headers.set("Vary", "Origin")?;
    headers.set("Access-Control-Allow-Methods", "GET,POST,OPTIONS")?;
    headers.set("Access-Control-Allow-Headers", "Authorization,Content-Type,Accept")?;

    Ok(headers)
}

pub fn json_with_cors(req: &Request, mut resp: Response) -> Result<Response> {
    let headers = cors_headers(req)?;
    let resp_headers = resp.headers_mut();
    for (k, v) in headers.entries() {
        resp_headers.set(&k, &v)?;
    }

    Ok(resp)
}

pub fn error_response(req: &Request, status: u16, code: &str, message: &str) -> Result<Response> {
    let body = serde_json::json!({
        "success": false,
        "error": {
            "code": code,
            "message": message
        }
    });

    let resp = Response::from_json(&body)?.with_status(status);
    json_with_cors(req, resp)
}

pub fn internal_error_response<E: Display>(req: &Request, context: &str, err: &E) -> Result<Response> {
    worker::console_log!("{context}: {err}");
    error_response(req, 500, "internal_error", "Internal server error")
}

pub fn validation_error_response(req: &Request, errors: &ValidationErrors) -> Result<Response> {
    let body = serde_json::json!({
        "success": false,
        "error": {
            "code": "validation_failed",
            "message": "Please correct the highlighted fields",
            "fields": errors.fields(),
        }
    });

    let resp = Response::from_json(&body)?.with_status(400);
    json_with_cors(req, resp)
}

/// Status and stable code for each core failure.
pub fn rsvp_error_response(req: &Request, err: &RsvpError) -> Result<Response> {
    match err {
        RsvpError::DuplicateSubmission => {
            error_response(req, 409, "duplicate_submission", DUPLICATE_MESSAGE)
        }
        RsvpError::TokenInvalidOrExpired => {
            error_response(req, 404, "not-found", INVALID_LINK_MESSAGE)
        }
        RsvpError::InvalidArgument(message) => {
            error_response(req, 400, "invalid-argument", message)
        }
        RsvpError::BackendUnavailable(_) => {
            worker::console_log!("Backend unavailable: {err}");
            error_response(req, 500, "backend_unavailable", "The RSVP service is unavailable")
        }
    }
}

pub fn not_found(req: &Request) -> Result<Response> {
    error_response(req, 404, "not_found", "Not found")
}
