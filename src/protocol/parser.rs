//! Incremental RESP Reply Parser
//!
//! Replies from the store arrive over a TCP stream, so a single read may carry
//! half a reply or a reply followed by trailing bytes. The parser works on a
//! byte slice and reports how much of it a complete value occupied.
//!
//! ## How the Parser Works
//!
//! The parser reads from a buffer and returns either:
//! - `Ok(Some((value, consumed)))` - Successfully parsed a value, `consumed` bytes were used
//! - `Ok(None)` - Need more data, the message is incomplete
//! - `Err(ParseError)` - Invalid protocol data
//!
//! The store connection appends socket reads to a `BytesMut` and calls
//! `parse()` after every read until a value comes back.

use crate::protocol::types::{prefix, RespValue, CRLF};
use bytes::Bytes;
use std::num::ParseIntError;
use thiserror::Error;

/// Errors that can occur during RESP parsing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// Unknown type prefix byte
    #[error("unknown type prefix: {0:#04x}")]
    UnknownPrefix(u8),

    /// Invalid integer format
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Invalid UTF-8 in a simple string or error message
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Bulk string length is negative (but not -1 for null)
    #[error("invalid bulk string length: {0}")]
    InvalidBulkLength(i64),

    /// Array length is negative (but not -1 for null)
    #[error("invalid array length: {0}")]
    InvalidArrayLength(i64),

    /// Protocol violation (missing CRLF, etc.)
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// The message exceeds maximum allowed size
    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum size for a single bulk string (512 MB, same as Redis)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum array nesting depth (prevent stack overflow)
pub const MAX_NESTING_DEPTH: usize = 32;

/// An incremental RESP parser.
///
/// # Example
///
/// ```
/// use kvproxy::protocol::{RespParser, RespValue};
///
/// let mut parser = RespParser::new();
/// let (value, consumed) = parser.parse(b"+PONG\r\n").unwrap().unwrap();
/// assert_eq!(value, RespValue::simple_string("PONG"));
/// assert_eq!(consumed, 7);
///
/// assert!(parser.parse(b"$5\r\nhel").unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct RespParser {
    /// Current nesting depth (for array parsing)
    depth: usize,
}

impl RespParser {
    /// Creates a new parser instance.
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Attempts to parse a RESP value from the buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((value, consumed)))` - Successfully parsed a value
    /// - `Ok(None)` - Incomplete data, need more bytes
    /// - `Err(e)` - Parse error
    ///
    /// # Arguments
    ///
    /// * `buf` - The buffer containing RESP data
    pub fn parse(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        self.depth = 0;
        self.parse_value(buf)
    }

    /// Internal recursive parsing function.
    fn parse_value(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        if buf.is_empty() {
            return Ok(None);
        }

        // Check nesting depth
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::ProtocolError(format!(
                "maximum nesting depth exceeded: {}",
                MAX_NESTING_DEPTH
            )));
        }

        match buf[0] {
            prefix::SIMPLE_STRING => self.parse_simple_string(buf),
            prefix::ERROR => self.parse_error(buf),
            prefix::INTEGER => self.parse_integer(buf),
            prefix::BULK_STRING => self.parse_bulk_string(buf),
            prefix::ARRAY => self.parse_array(buf),
            other => Err(ParseError::UnknownPrefix(other)),
        }
    }

    /// Reads the text between the prefix byte and the first CRLF.
    ///
    /// Returns the line and the number of bytes it occupies including the
    /// prefix and terminator, or `None` while the terminator is still missing.
    fn read_line(buf: &[u8]) -> ParseResult<Option<(&str, usize)>> {
        let Some(pos) = find_crlf(&buf[1..]) else {
            return Ok(None);
        };
        let line = std::str::from_utf8(&buf[1..1 + pos])
            .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;
        Ok(Some((line, pos + 3)))
    }

    fn read_int_line(buf: &[u8]) -> ParseResult<Option<(i64, usize)>> {
        match Self::read_line(buf)? {
            Some((line, consumed)) => {
                let n = line
                    .parse()
                    .map_err(|e: ParseIntError| ParseError::InvalidInteger(e.to_string()))?;
                Ok(Some((n, consumed)))
            }
            None => Ok(None),
        }
    }

    /// `+OK\r\n`
    fn parse_simple_string(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        Ok(Self::read_line(buf)?
            .map(|(line, consumed)| (RespValue::SimpleString(line.to_string()), consumed)))
    }

    /// `-ERR message\r\n`
    fn parse_error(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        Ok(Self::read_line(buf)?
            .map(|(line, consumed)| (RespValue::Error(line.to_string()), consumed)))
    }

    /// `:42\r\n`
    fn parse_integer(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        Ok(Self::read_int_line(buf)?.map(|(n, consumed)| (RespValue::Integer(n), consumed)))
    }

    /// `$<length>\r\n<data>\r\n`, or `$-1\r\n` for nil.
    fn parse_bulk_string(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        let Some((length, header)) = Self::read_int_line(buf)? else {
            return Ok(None);
        };

        if length == -1 {
            return Ok(Some((RespValue::Null, header)));
        }
        let length = usize::try_from(length).map_err(|_| ParseError::InvalidBulkLength(length))?;
        if length > MAX_BULK_SIZE {
            return Err(ParseError::MessageTooLarge {
                size: length,
                max: MAX_BULK_SIZE,
            });
        }

        let end = header + length;
        if buf.len() < end + 2 {
            return Ok(None);
        }
        if &buf[end..end + 2] != CRLF {
            return Err(ParseError::ProtocolError(
                "bulk string missing trailing CRLF".to_string(),
            ));
        }

        let data = Bytes::copy_from_slice(&buf[header..end]);
        Ok(Some((RespValue::BulkString(data), end + 2)))
    }

    /// `*<count>\r\n` followed by `count` values, or `*-1\r\n` for nil.
    fn parse_array(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        let Some((count, header)) = Self::read_int_line(buf)? else {
            return Ok(None);
        };

        if count == -1 {
            return Ok(Some((RespValue::Null, header)));
        }
        let count = usize::try_from(count).map_err(|_| ParseError::InvalidArrayLength(count))?;

        // The count is untrusted; cap the up-front allocation.
        let mut elements = Vec::with_capacity(count.min(1024));
        let mut consumed = header;

        self.depth += 1;
        let parsed = self.parse_elements(buf, count, &mut elements, &mut consumed);
        self.depth -= 1;

        Ok(parsed?.map(|()| (RespValue::Array(elements), consumed)))
    }

    /// Parses `count` consecutive values starting at `*consumed`.
    fn parse_elements(
        &mut self,
        buf: &[u8],
        count: usize,
        elements: &mut Vec<RespValue>,
        consumed: &mut usize,
    ) -> ParseResult<Option<()>> {
        for _ in 0..count {
            if *consumed >= buf.len() {
                return Ok(None); // Incomplete
            }

            match self.parse_value(&buf[*consumed..])? {
                Some((value, element_consumed)) => {
                    elements.push(value);
                    *consumed += element_consumed;
                }
                None => return Ok(None),
            }
        }

        Ok(Some(()))
    }
}

/// Finds the position of CRLF in the buffer.
///
/// Returns the position of `\r` if found, or None if CRLF is not present.
#[inline]
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|pair| pair == CRLF)
}

/// Helper function to parse a single RESP message from bytes.
///
/// This is a convenience function for simple use cases.
pub fn parse_message(buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
    RespParser::new().parse(buf)
}
