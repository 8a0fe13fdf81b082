//! RESP Protocol Implementation
//!
//! The proxy speaks RESP2 to the store as a client: commands go out as arrays
//! of bulk strings and replies come back as any RESP2 value.
//!
//! ## Modules
//!
//! - `types`: Defines the `RespValue` enum, wire serialization and the JSON projection
//! - `parser`: Incremental parser for replies read off the socket
//!
//! ## Example
//!
//! ```
//! use kvproxy::protocol::{parse_message, RespValue};
//!
//! let frame = RespValue::command(["PING"]).serialize();
//! assert_eq!(frame, b"*1\r\n$4\r\nPING\r\n");
//!
//! let (reply, _) = parse_message(b"+PONG\r\n").unwrap().unwrap();
//! assert_eq!(serde_json::to_string(&reply).unwrap(), "\"PONG\"");
//! ```

pub mod parser;
pub mod types;

pub use parser::{parse_message, ParseError, ParseResult, RespParser};
pub use types::RespValue;
