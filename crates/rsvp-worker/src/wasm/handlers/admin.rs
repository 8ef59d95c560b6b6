use worker::{Env, Request, Response, Result};

use migration::{Migrator, MigratorTrait};

use crate::stats::ledger_stats;
use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::http::{internal_error_response, json_with_cors};

use super::admin_auth::ensure_admin_authorized;

/// Store health: connectivity, migration state, and ledger row counts.
pub async fn handle_db_ping(req: &Request, env: &Env) -> Result<Response> {
    if let Some(resp) = ensure_admin_authorized(req, env).await? {
        return Ok(resp);
    }

    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return internal_error_response(req, "Failed to open libSQL connection", &e),
    };

    if let Err(e) = db.ping().await {
        return internal_error_response(req, "libSQL ping failed", &e);
    }

    let pending = match Migrator::get_pending_migrations(&db).await {
        Ok(p) => p,
        Err(e) => return internal_error_response(req, "Failed to read pending migrations", &e),
    };

    // Counting needs the tables, so only report it once the schema is complete.
    let ledger = if pending.is_empty() {
        match ledger_stats(&db).await {
            Ok(stats) => Some(stats),
            Err(e) => return internal_error_response(req, "Failed to count rsvps", &e),
        }
    } else {
        None
    };

    let resp = Response::from_json(&serde_json::json!({
        "success": true,
        "db": { "ok": true },
        "migrations": {
            "pending": pending.len(),
            "next": pending.first().map(|m| m.name()),
        },
        "ledger": ledger,
        "consistent": ledger.map(|s| s.is_consistent()),
    }))?;

    json_with_cors(req, resp)
}
