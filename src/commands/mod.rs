//! Command Forwarding Module
//!
//! Turns a client-supplied list of strings into one untyped store command and
//! hands back whatever the store replied.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handler
//!       │  ["SET", "k", "v"]
//!       ▼
//! ┌─────────────────┐
//! │    forward()    │  (this module)
//! │                 │
//! │  - Encode       │
//! │  - Submit       │
//! │  - Classify     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ StoreConnection │  (connection module)
//! └─────────────────┘
//! ```
//!
//! The forwarder has no command table. Name and arguments are passed through
//! untouched; arity, types and unknown names are the store's business.

pub mod forwarder;

pub use forwarder::{forward, ForwardError};
