use worker::Env;

use crate::sweep::sweep_expired;
use crate::util::now_ts;
use crate::worker_wasm::db::db_connect;

/// Cron trigger entry. Nothing carries over between ticks.
pub async fn handle_scheduled_sweep(env: &Env) {
    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => {
            worker::console_log!("Expiry sweep skipped, failed to open libSQL connection: {e}");
            return;
        }
    };

    match sweep_expired(&db, now_ts()).await {
        Ok(report) => worker::console_log!(
            "Expiry sweep: expired={} deleted={} skipped={} failed={}",
            report.expired,
            report.deleted,
            report.skipped,
            report.failed
        ),
        Err(e) => worker::console_log!("Expiry sweep failed: {e}"),
    }
}
