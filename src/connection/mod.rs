//! Store Connection Module
//!
//! Client-side connections to the key-value store. The proxy opens one
//! connection per HTTP request and never shares or reuses it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   StoreConnection                         │
//! │     options (addr, db, timeouts)   lazily dialed stream   │
//! │                                                           │
//! │   ┌─────────────────────── RespStream ─────────────────┐  │
//! │   │  ┌─────────────┐    ┌─────────────┐    ┌─────────┐ │  │
//! │   │  │ Write frame │───>│ Read bytes  │───>│  Parse  │ │  │
//! │   │  └─────────────┘    └─────────────┘    └─────────┘ │  │
//! │   └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use kvproxy::connection::{ConnectionOptions, StoreConnection};
//! use kvproxy::protocol::RespValue;
//!
//! let mut conn = StoreConnection::new(ConnectionOptions::new("localhost:6379", 0));
//! let reply = conn.execute(&RespValue::command(["PING"])).await?;
//! conn.close().await;
//! ```

pub mod store;

pub use store::{ConnectionError, ConnectionOptions, RespStream, StoreConnection};
