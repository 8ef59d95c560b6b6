use serde::Deserialize;
use worker::{Env, Request, Response, Result};

use crate::config::EventConfig;
use crate::util::now_ts;
use crate::verification::redeem_token;
use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::env::event_config_from_env;
use crate::worker_wasm::http::{
    error_response, internal_error_response, json_with_cors, rsvp_error_response,
};

#[derive(Debug, Default, Deserialize)]
struct VerifyData {
    token: Option<String>,
}

/// POST /api/verify `{ "token": "<64 hex>" }`
pub async fn handle_verify_email(mut req: Request, env: &Env) -> Result<Response> {
    let payload: VerifyData = req.json().await.unwrap_or_default();

    let Some(token) = payload.token.filter(|t| !t.trim().is_empty()) else {
        return error_response(
            &req,
            400,
            "invalid-argument",
            "A verification token is required.",
        );
    };

    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return internal_error_response(&req, "Failed to open libSQL connection", &e),
    };

    let config = match EventConfig::load(&db, event_config_from_env(env)).await {
        Ok(c) => c,
        Err(e) => return rsvp_error_response(&req, &e),
    };

    match redeem_token(&db, &config, &token, now_ts()).await {
        Ok(_) => {
            let resp = Response::from_json(&serde_json::json!({ "success": true }))?;
            json_with_cors(&req, resp)
        }
        Err(e) => rsvp_error_response(&req, &e),
    }
}
