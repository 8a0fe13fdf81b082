//! The `/api/cmd` endpoint.
//!
//! # Flow
//! ```text
//! method check ─> read body ─> decode payload ─> StoreConnection::new
//!     ─> forward() ─> close connection ─> {"result": ...}
//! ```
//!
//! Method, body and payload problems are answered with 400 and an error
//! envelope. Anything that goes wrong after that is logged and answered with
//! 200 and a `null` result, so callers cannot tell a failed command from one
//! that returned nil.

use crate::commands::forward;
use crate::connection::{ConnectionOptions, StoreConnection};
use crate::http::payload::{CommandResult, Payload, RequestError};
use crate::protocol::RespValue;
use axum::body::Body;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

/// Largest request body read before giving up.
pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Handles every method on `/api/cmd`.
pub async fn handle_cmd(method: Method, body: Body) -> Response {
    if method != Method::POST {
        return RequestError::Method(method).into_response();
    }

    let payload = match read_payload(body).await {
        Ok(payload) => payload,
        Err(e) => return e.into_response(),
    };

    let mut conn = StoreConnection::new(ConnectionOptions::new(payload.addr, payload.db));

    let result = match forward(&mut conn, &payload.cmd).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(
                addr = %conn.options().addr,
                db = conn.options().db,
                command = %payload.cmd[0],
                error = %e,
                "Command forwarding failed"
            );
            RespValue::Null
        }
    };

    conn.close().await;

    Json(CommandResult { result }).into_response()
}

async fn read_payload(body: Body) -> Result<Payload, RequestError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_SIZE).await?;
    Payload::from_slice(&bytes)
}
