use worker::{Env, Request, Response, Result};

use migration::{Migrator, MigratorTrait};

use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::http::{internal_error_response, json_with_cors};

use super::admin_auth::ensure_admin_authorized;

/// `?steps=N` caps how many migrations run in this call; absent means all pending.
fn requested_steps(req: &Request) -> Option<u32> {
    let url = req.url().ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "steps")
        .and_then(|(_, v)| v.parse::<u32>().ok())
        .filter(|n| *n > 0)
}

/// POST /v1/admin/migrations/up
pub async fn handle_migrations_up(req: &Request, env: &Env) -> Result<Response> {
    if let Some(resp) = ensure_admin_authorized(req, env).await? {
        return Ok(resp);
    }

    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return internal_error_response(req, "Failed to open libSQL connection", &e),
    };

    let pending_before = match Migrator::get_pending_migrations(&db).await {
        Ok(p) => p.len(),
        Err(e) => return internal_error_response(req, "Failed to read pending migrations", &e),
    };

    // Each SQL statement is a subrequest on Workers, so large backlogs can be split across calls.
    let steps = requested_steps(req);
    if pending_before > 0 {
        if let Err(e) = Migrator::up(&db, steps).await {
            return internal_error_response(req, "Failed to apply migrations", &e);
        }
    }

    let pending_after = match Migrator::get_pending_migrations(&db).await {
        Ok(p) => p,
        Err(e) => return internal_error_response(req, "Failed to read pending migrations", &e),
    };

    let resp = Response::from_json(&serde_json::json!({
        "success": true,
        "migrations": {
            "applied": pending_before.saturating_sub(pending_after.len()),
            "pending": pending_after.len(),
            "done": pending_after.is_empty(),
            "next": pending_after.first().map(|m| m.name().to_string()),
        }
    }))?;

    json_with_cors(req, resp)
}
