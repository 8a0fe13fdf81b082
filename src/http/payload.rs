//! Request payload, response envelopes and request-level errors.

use crate::protocol::RespValue;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// The JSON body accepted by `POST /api/cmd`.
///
/// Keys match case-insensitively (`"Cmd"` and `"CMD"` both fill `cmd`) and
/// unknown keys are ignored. A missing or `null` field keeps its zero value; a
/// repeated key overwrites the earlier one. Address and database index are not
/// checked here; a bad address only shows up when the store is dialed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    /// `host:port` of the store
    pub addr: String,

    /// Logical database index
    pub db: i64,

    /// Command name followed by its arguments
    pub cmd: Vec<String>,
}

impl Payload {
    /// Decodes a request body. A literal `null` body counts as an empty payload.
    pub fn from_slice(body: &[u8]) -> Result<Self, RequestError> {
        let payload = serde_json::from_slice::<Option<Payload>>(body)?.unwrap_or_default();
        if payload.cmd.is_empty() {
            return Err(RequestError::EmptyPayload);
        }
        Ok(payload)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PayloadVisitor)
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = Payload;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a command payload object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Payload, A::Error> {
        let mut payload = Payload::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("addr") {
                set_unless_null(&mut payload.addr, &mut map)?;
            } else if key.eq_ignore_ascii_case("db") {
                set_unless_null(&mut payload.db, &mut map)?;
            } else if key.eq_ignore_ascii_case("cmd") {
                set_unless_null(&mut payload.cmd, &mut map)?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(payload)
    }
}

fn set_unless_null<'de, A, T>(field: &mut T, map: &mut A) -> Result<(), A::Error>
where
    A: MapAccess<'de>,
    T: Deserialize<'de>,
{
    if let Some(value) = map.next_value::<Option<T>>()? {
        *field = value;
    }
    Ok(())
}

/// `{"result": ...}`
#[derive(Debug, Serialize)]
pub struct CommandResult {
    pub result: RespValue,
}

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A request rejected before anything was sent to the store.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Cannot {0}")]
    Method(Method),

    #[error("{0}")]
    Body(#[from] axum::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty payload")]
    EmptyPayload,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        debug!(error = %self, "Rejecting request");
        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
