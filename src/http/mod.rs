//! HTTP surface of the proxy.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum router, tracing layer)
//!     → handler.rs (method check, body, forward, envelope)
//!     → payload.rs (payload decoding, envelopes, request errors)
//!     → Send to client
//! ```

pub mod handler;
pub mod payload;
pub mod server;

pub use handler::handle_cmd;
pub use payload::{CommandResult, ErrorBody, Payload, RequestError};
pub use server::{router, serve, CMD_ROUTE};
