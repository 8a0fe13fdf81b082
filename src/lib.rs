//! # kvproxy - HTTP to Key-Value Store Command Proxy
//!
//! kvproxy exposes one HTTP endpoint, `POST /api/cmd`. The JSON body names a
//! store address, a logical database and a command; the proxy sends the
//! command to the store and answers with the reply as JSON.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              kvproxy                                    │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ HTTP Server │───>│  /api/cmd   │───>│  forward()  │                  │
//! │  │   (axum)    │    │   Handler   │    │             │                  │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘                  │
//! │                                               │                         │
//! │                                               ▼                         │
//! │  ┌─────────────┐    ┌──────────────────────────────────────────────┐    │
//! │  │   RESP      │<──>│        StoreConnection (one per request)     │    │
//! │  │   Codec     │    │   lazy dial ─> SELECT db ─> command ─> close │    │
//! │  └─────────────┘    └──────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Request
//!
//! ```text
//! POST /api/cmd
//! {"addr": "localhost:6379", "db": 0, "cmd": ["SET", "name", "alice"]}
//! ```
//!
//! ## Responses
//!
//! - `200 {"result": <reply>}` once the request is valid. Store errors and
//!   connection failures are logged and yield `{"result": null}`.
//! - `400 {"error": "<message>"}` for a non-POST method, an unreadable or
//!   malformed body, or an empty command.
//!
//! ## Module Overview
//!
//! - [`protocol`]: RESP codec and the JSON projection of replies
//! - [`connection`]: Per-request store connections
//! - [`commands`]: Generic command forwarding
//! - [`http`]: Router, handler and envelopes
//! - [`config`]: Command-line flags

pub mod commands;
pub mod config;
pub mod connection;
pub mod http;
pub mod protocol;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use commands::{forward, ForwardError};
pub use config::Config;
pub use connection::{ConnectionError, ConnectionOptions, StoreConnection};
pub use protocol::{ParseError, RespParser, RespValue};

/// The default port kvproxy listens on
pub const DEFAULT_PORT: u16 = 1337;

/// The default host kvproxy binds to
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Version of kvproxy
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
