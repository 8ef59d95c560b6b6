use std::sync::{Arc, Mutex};

use sea_orm::{
    Database, DatabaseConnection, DbBackend, DbErr, ProxyDatabaseTrait, ProxyExecResult, ProxyRow,
    RuntimeErr, Statement,
};
use tracing::{error, warn};
use worker::send::SendFuture;
use worker::{Env, Error, Fetch, Headers, Method, Request, RequestInit, Result};

use crate::libsql::{
    encode_args, pipeline_url, PipelineRequest, PipelineResponse, StmtResult, StreamRequest,
    StreamResponse, StreamResult,
};

use super::env::env_string;

fn map_db_err(e: DbErr) -> Error {
    Error::RustError(e.to_string())
}

pub async fn db_connect(env: &Env) -> Result<DatabaseConnection> {
    let url = env_string(env, "LIBSQL_URL").ok_or_else(|| {
        Error::RustError("LIBSQL_URL is required for libsql connections".to_string())
    })?;
    let client = LibsqlHttp::new(&url, env_string(env, "LIBSQL_AUTH_TOKEN"));

    Database::connect_proxy(DbBackend::Sqlite, Arc::new(Box::new(client)))
        .await
        .map_err(map_db_err)
}

#[derive(Debug, Default)]
struct Stream {
    /// Handle of the server-side stream; only kept open while a transaction runs.
    baton: Option<String>,
    base_url: Option<String>,
    in_txn: bool,
    /// A dropped transaction whose ROLLBACK rides along with the next request.
    rollback_pending: bool,
    /// Set when BEGIN failed; statements must not silently run outside the transaction.
    broken: Option<String>,
}

/// sea-orm proxy backend that sends each statement to libSQL's HTTP pipeline endpoint.
///
/// One instance serves one Worker invocation, so statements never interleave.
struct LibsqlHttp {
    url: String,
    auth_token: Option<String>,
    stream: Mutex<Stream>,
}

impl std::fmt::Debug for LibsqlHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibsqlHttp").field("url", &self.url).finish_non_exhaustive()
    }
}

impl LibsqlHttp {
    fn new(url: &str, auth_token: Option<String>) -> Self {
        Self {
            url: pipeline_url(url),
            auth_token,
            stream: Mutex::new(Stream::default()),
        }
    }

    fn with_stream<T>(&self, f: impl FnOnce(&mut Stream) -> T) -> T {
        let mut stream = self.stream.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut stream)
    }

    async fn post(&self, body: PipelineRequest, url: String) -> std::result::Result<PipelineResponse, String> {
        let json = serde_json::to_string(&body).map_err(|e| format!("encode pipeline: {e}"))?;
        let auth_token = self.auth_token.clone();

        SendFuture::new(async move {
            let headers = Headers::new();
            headers.set("Content-Type", "application/json").map_err(|e| e.to_string())?;
            if let Some(token) = auth_token {
                headers
                    .set("Authorization", &format!("Bearer {token}"))
                    .map_err(|e| e.to_string())?;
            }

            let mut init = RequestInit::new();
            init.with_method(Method::Post);
            init.with_headers(headers);
            init.with_body(Some(json.into()));

            let req = Request::new_with_init(&url, &init).map_err(|e| e.to_string())?;
            let mut resp = Fetch::Request(req).send().await.map_err(|e| e.to_string())?;
            let status = resp.status_code();
            if !(200..=299).contains(&status) {
                let body = resp.text().await.unwrap_or_default();
                return Err(format!("libSQL pipeline failed (status={status}): {body}"));
            }
            resp.json::<PipelineResponse>().await.map_err(|e| e.to_string())
        })
        .await
    }

    /// Runs statements in order on the current stream and returns their results.
    async fn pipeline(&self, stmts: Vec<StreamRequest>) -> std::result::Result<Vec<StmtResult>, String> {
        let (baton, rollback_first, keep_open, url) = self.with_stream(|s| {
            if let Some(reason) = &s.broken {
                return Err(format!("transaction could not be started: {reason}"));
            }
            let url = s.base_url.as_deref().map(pipeline_url).unwrap_or_else(|| self.url.clone());
            Ok((s.baton.clone(), std::mem::take(&mut s.rollback_pending), s.in_txn, url))
        })?;

        let mut requests = Vec::with_capacity(stmts.len() + 2);
        if rollback_first {
            requests.push(StreamRequest::execute("ROLLBACK", Vec::new()));
        }
        requests.extend(stmts);
        if !keep_open {
            requests.push(StreamRequest::Close);
        }

        let response = self.post(PipelineRequest { baton, requests }, url).await?;

        self.with_stream(|s| {
            s.baton = if keep_open { response.baton.clone() } else { None };
            if !keep_open {
                s.base_url = None;
            } else if let Some(base) = &response.base_url {
                s.base_url = Some(base.clone());
            }
        });

        let mut results = Vec::new();
        for (idx, result) in response.results.into_iter().enumerate() {
            if rollback_first && idx == 0 {
                continue;
            }
            match result {
                StreamResult::Ok {
                    response: StreamResponse::Execute { result },
                } => results.push(result),
                StreamResult::Ok {
                    response: StreamResponse::Close,
                } => {}
                StreamResult::Error { error } => return Err(error.to_string()),
            }
        }
        Ok(results)
    }

    async fn run(&self, statement: &Statement) -> std::result::Result<StmtResult, String> {
        let args = encode_args(statement.values.as_ref()).map_err(|e| e.to_string())?;
        let request = StreamRequest::execute(statement.sql.clone(), args);
        self.pipeline(vec![request])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| "libSQL returned no result".to_string())
    }

    async fn control(&self, sql: &str) -> std::result::Result<(), String> {
        self.pipeline(vec![StreamRequest::execute(sql, Vec::new())])
            .await
            .map(|_| ())
    }
}

#[async_trait::async_trait]
impl ProxyDatabaseTrait for LibsqlHttp {
    async fn query(&self, statement: Statement) -> std::result::Result<Vec<ProxyRow>, DbErr> {
        let result = self
            .run(&statement)
            .await
            .map_err(|e| DbErr::Query(RuntimeErr::Internal(e)))?;
        Ok(result
            .decoded_rows()?
            .into_iter()
            .map(|values| ProxyRow { values })
            .collect())
    }

    async fn execute(&self, statement: Statement) -> std::result::Result<ProxyExecResult, DbErr> {
        let result = self
            .run(&statement)
            .await
            .map_err(|e| DbErr::Exec(RuntimeErr::Internal(e)))?;
        Ok(ProxyExecResult {
            last_insert_id: result.last_insert_id(),
            rows_affected: result.affected_row_count,
        })
    }

    async fn begin(&self) {
        self.with_stream(|s| {
            s.in_txn = true;
            s.broken = None;
        });
        if let Err(e) = self.control("BEGIN").await {
            error!(error = %e, "libSQL BEGIN failed");
            self.with_stream(|s| s.broken = Some(e));
        }
    }

    async fn commit(&self) {
        let broken = self.with_stream(|s| {
            s.in_txn = false;
            s.broken.take()
        });
        if broken.is_some() {
            return;
        }
        if let Err(e) = self.control("COMMIT").await {
            error!(error = %e, "libSQL COMMIT failed");
        }
    }

    async fn rollback(&self) {
        self.with_stream(|s| {
            s.in_txn = false;
            s.broken = None;
        });
        if let Err(e) = self.control("ROLLBACK").await {
            warn!(error = %e, "libSQL ROLLBACK failed");
        }
    }

    fn start_rollback(&self) {
        self.with_stream(|s| {
            s.rollback_pending = s.baton.is_some();
            s.in_txn = false;
            s.broken = None;
        });
    }

    async fn ping(&self) -> std::result::Result<(), DbErr> {
        self.control("SELECT 1")
            .await
            .map_err(|e| DbErr::Conn(RuntimeErr::Internal(e)))
    }
}
