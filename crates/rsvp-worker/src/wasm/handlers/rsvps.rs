use worker::{Env, Request, Response, Result};

use crate::config::EventConfig;
use crate::submission::submit_rsvp;
use crate::util::now_ts;
use crate::validation::{validate, RsvpForm};
use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::env::event_config_from_env;
use crate::worker_wasm::http::{
    error_response, internal_error_response, json_with_cors, rsvp_error_response,
    validation_error_response,
};

/// POST /api/rsvps
pub async fn handle_submit_rsvp(mut req: Request, env: &Env) -> Result<Response> {
    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return internal_error_response(&req, "Failed to open libSQL connection", &e),
    };

    let form: RsvpForm = match req.json().await {
        Ok(p) => p,
        Err(e) => {
            worker::console_log!("Invalid JSON in rsvp submission: {e}");
            return error_response(&req, 400, "invalid_json", "Invalid JSON body");
        }
    };

    let new = match validate(form) {
        Ok(v) => v,
        Err(errors) => return validation_error_response(&req, &errors),
    };

    let config = match EventConfig::load(&db, event_config_from_env(env)).await {
        Ok(c) => c,
        Err(e) => return rsvp_error_response(&req, &e),
    };

    match submit_rsvp(&db, &config, new, now_ts()).await {
        Ok(id) => {
            let resp = Response::from_json(&serde_json::json!({
                "success": true,
                "id": id,
            }))?
            .with_status(201);
            json_with_cors(&req, resp)
        }
        Err(e) => rsvp_error_response(&req, &e),
    }
}
