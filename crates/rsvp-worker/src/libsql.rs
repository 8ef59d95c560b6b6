//! Wire format for libSQL's HTTP pipeline endpoint (Hrana over HTTP, `/v2/pipeline`).
//!
//! The Worker cannot open sockets, so statements travel as JSON over `fetch`. This module
//! holds the request and response shapes and the mapping between Hrana values and sea-orm
//! values. The transport itself lives with the Worker entrypoint.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use sea_orm::sea_query::{Value, Values};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};

pub const PIPELINE_PATH: &str = "/v2/pipeline";

/// Pipeline endpoint for a database URL. `libsql://` is served over HTTPS.
pub fn pipeline_url(db_url: &str) -> String {
    let base = db_url.trim().trim_end_matches('/');
    let base = match base.strip_prefix("libsql://") {
        Some(rest) => format!("https://{rest}"),
        None => base.to_string(),
    };
    format!("{base}{PIPELINE_PATH}")
}

#[derive(Debug, Serialize)]
pub struct PipelineRequest {
    pub baton: Option<String>,
    pub requests: Vec<StreamRequest>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamRequest {
    Execute { stmt: Stmt },
    Close,
}

#[derive(Debug, Serialize)]
pub struct Stmt {
    pub sql: String,
    pub args: Vec<HranaValue>,
    pub want_rows: bool,
}

impl StreamRequest {
    pub fn execute(sql: impl Into<String>, args: Vec<HranaValue>) -> Self {
        StreamRequest::Execute {
            stmt: Stmt {
                sql: sql.into(),
                args,
                want_rows: true,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HranaValue {
    Null,
    /// Integers are carried as decimal strings to survive JSON number precision.
    Integer { value: String },
    Float { value: f64 },
    Text { value: String },
    Blob { base64: String },
}

#[derive(Debug, Deserialize)]
pub struct PipelineResponse {
    pub baton: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    pub results: Vec<StreamResult>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamResult {
    Ok { response: StreamResponse },
    Error { error: StreamError },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamResponse {
    Execute { result: StmtResult },
    Close,
}

#[derive(Debug, Default, Deserialize)]
pub struct StmtResult {
    #[serde(default)]
    pub cols: Vec<Col>,
    #[serde(default)]
    pub rows: Vec<Vec<HranaValue>>,
    #[serde(default)]
    pub affected_row_count: u64,
    #[serde(default)]
    pub last_insert_rowid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Col {
    pub name: Option<String>,
    pub decltype: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StreamError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl StmtResult {
    pub fn last_insert_id(&self) -> u64 {
        self.last_insert_rowid
            .as_deref()
            .and_then(|id| id.parse().ok())
            .unwrap_or(0)
    }

    /// Rows keyed by column name, typed after each column's declared type.
    pub fn decoded_rows(&self) -> Result<Vec<BTreeMap<String, Value>>, DbErr> {
        self.rows
            .iter()
            .map(|row| {
                self.cols
                    .iter()
                    .zip(row)
                    .enumerate()
                    .map(|(idx, (col, value))| {
                        let name = col.name.clone().unwrap_or_else(|| idx.to_string());
                        Ok((name, decode_value(value, col.decltype.as_deref())?))
                    })
                    .collect()
            })
            .collect()
    }
}

/// Bind parameters of a sea-orm statement as Hrana arguments.
pub fn encode_args(values: Option<&Values>) -> Result<Vec<HranaValue>, DbErr> {
    values
        .map(|values| values.0.iter().map(encode_value).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

fn integer(value: impl ToString) -> HranaValue {
    HranaValue::Integer {
        value: value.to_string(),
    }
}

fn encode_value(value: &Value) -> Result<HranaValue, DbErr> {
    let encoded = match value {
        Value::Bool(Some(b)) => integer(i64::from(*b)),
        Value::TinyInt(Some(n)) => integer(n),
        Value::SmallInt(Some(n)) => integer(n),
        Value::Int(Some(n)) => integer(n),
        Value::BigInt(Some(n)) => integer(n),
        Value::TinyUnsigned(Some(n)) => integer(n),
        Value::SmallUnsigned(Some(n)) => integer(n),
        Value::Unsigned(Some(n)) => integer(n),
        Value::BigUnsigned(Some(n)) => integer(n),
        Value::Float(Some(f)) => HranaValue::Float {
            value: f64::from(*f),
        },
        Value::Double(Some(f)) => HranaValue::Float { value: *f },
        Value::String(Some(s)) => HranaValue::Text {
            value: s.to_string(),
        },
        Value::Char(Some(c)) => HranaValue::Text {
            value: c.to_string(),
        },
        Value::Bytes(Some(b)) => HranaValue::Blob {
            base64: STANDARD_NO_PAD.encode(b.as_slice()),
        },
        Value::Json(Some(j)) => HranaValue::Text {
            value: j.to_string(),
        },
        Value::Bool(None)
        | Value::TinyInt(None)
        | Value::SmallInt(None)
        | Value::Int(None)
        | Value::BigInt(None)
        | Value::TinyUnsigned(None)
        | Value::SmallUnsigned(None)
        | Value::Unsigned(None)
        | Value::BigUnsigned(None)
        | Value::Float(None)
        | Value::Double(None)
        | Value::String(None)
        | Value::Char(None)
        | Value::Bytes(None)
        | Value::Json(None) => HranaValue::Null,
        #[allow(unreachable_patterns)]
        other => {
            return Err(DbErr::Custom(format!(
                "unsupported bind parameter for libSQL: {other:?}"
            )))
        }
    };
    Ok(encoded)
}

/// Rust-side type a column decodes to. sea-orm reads proxy rows by exact value variant, so
/// the declared column type decides it; untyped expressions fall back to the wire type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Affinity {
    Bool,
    Int,
    BigInt,
    Double,
    Text,
    Blob,
}

fn affinity(decltype: Option<&str>, value: &HranaValue) -> Affinity {
    if let Some(decl) = decltype.map(str::to_ascii_lowercase) {
        if decl.contains("bool") {
            return Affinity::Bool;
        }
        if decl.contains("bigint") || decl.contains("int8") {
            return Affinity::BigInt;
        }
        if decl.contains("int") {
            return Affinity::Int;
        }
        if decl.contains("char") || decl.contains("text") || decl.contains("clob") {
            return Affinity::Text;
        }
        if decl.contains("real") || decl.contains("floa") || decl.contains("doub") {
            return Affinity::Double;
        }
        if decl.contains("blob") {
            return Affinity::Blob;
        }
    }

    match value {
        // COUNT(*) and friends: sea-orm reads them as i32 on SQLite.
        HranaValue::Integer { value } => match value.parse::<i32>() {
            Ok(_) => Affinity::Int,
            Err(_) => Affinity::BigInt,
        },
        HranaValue::Float { .. } => Affinity::Double,
        HranaValue::Blob { .. } => Affinity::Blob,
        HranaValue::Text { .. } | HranaValue::Null => Affinity::Text,
    }
}

fn decode_value(value: &HranaValue, decltype: Option<&str>) -> Result<Value, DbErr> {
    let bad = |what: &str| DbErr::Type(format!("libSQL returned {what} for a {decltype:?} column"));

    let decoded = match (affinity(decltype, value), value) {
        (Affinity::Bool, HranaValue::Null) => Value::Bool(None),
        (Affinity::Int, HranaValue::Null) => Value::Int(None),
        (Affinity::BigInt, HranaValue::Null) => Value::BigInt(None),
        (Affinity::Double, HranaValue::Null) => Value::Double(None),
        (Affinity::Text, HranaValue::Null) => Value::String(None),
        (Affinity::Blob, HranaValue::Null) => Value::Bytes(None),

        (Affinity::Bool, HranaValue::Integer { value }) => {
            Value::Bool(Some(value.parse::<i64>().map_err(|_| bad(value.as_str()))? != 0))
        }
        (Affinity::Int, HranaValue::Integer { value }) => match value.parse::<i32>() {
            Ok(n) => Value::Int(Some(n)),
            Err(_) => Value::BigInt(Some(value.parse().map_err(|_| bad(value.as_str()))?)),
        },
        (Affinity::BigInt, HranaValue::Integer { value }) => {
            Value::BigInt(Some(value.parse().map_err(|_| bad(value.as_str()))?))
        }
        (Affinity::Double, HranaValue::Integer { value }) => {
            Value::Double(Some(value.parse().map_err(|_| bad(value.as_str()))?))
        }
        (_, HranaValue::Integer { value }) => Value::String(Some(Box::new(value.clone()))),

        (_, HranaValue::Float { value }) => Value::Double(Some(*value)),

        (Affinity::Blob, HranaValue::Text { value }) => {
            Value::Bytes(Some(Box::new(value.clone().into_bytes())))
        }
        (_, HranaValue::Text { value }) => Value::String(Some(Box::new(value.clone()))),

        (_, HranaValue::Blob { base64 }) => {
            let bytes = STANDARD_NO_PAD
                .decode(base64.trim_end_matches('='))
                .map_err(|_| bad("malformed base64"))?;
            Value::Bytes(Some(Box::new(bytes)))
        }
    };
    Ok(decoded)
}
