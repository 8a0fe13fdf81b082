//! Store Connection
//!
//! A client connection to the key-value store. One is built per HTTP request
//! and closed before that request finishes.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. StoreConnection::new(options)      no I/O, only parameters
//!        │
//!        ▼
//! 2. First execute()
//!        │   dial addr (dial timeout)
//!        │   SELECT <db> when db > 0
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │  Write command frame, flush  │
//!    │  Read until a reply parses   │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 4. close()                            shutdown + drop
//! ```
//!
//! ## Buffer Management
//!
//! Replies are accumulated in a `BytesMut`. TCP may split a reply over several
//! reads, so the buffer is re-parsed after each read until the parser reports a
//! complete value.

use crate::protocol::{ParseError, RespParser, RespValue};
use bytes::BytesMut;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, trace};

/// Address used when the caller leaves it empty.
pub const DEFAULT_STORE_ADDR: &str = "localhost:6379";

/// Time allowed for the TCP handshake.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Time allowed for a full reply to arrive.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(3);

/// Time allowed for a command to be written and flushed.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(3);

/// Initial reply buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Parameters for a [`StoreConnection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// `host:port` of the store
    pub addr: String,
    /// Logical database index
    pub db: i64,
    /// Limit on establishing the TCP connection
    pub dial_timeout: Duration,
    /// Limit on waiting for each complete reply
    pub read_timeout: Duration,
    /// Limit on writing and flushing each command
    pub write_timeout: Duration,
}

impl ConnectionOptions {
    /// Options for `addr` and `db` with the default timeouts.
    ///
    /// An empty address falls back to [`DEFAULT_STORE_ADDR`].
    pub fn new(addr: impl Into<String>, db: i64) -> Self {
        let addr = addr.into();
        Self {
            addr: if addr.is_empty() {
                DEFAULT_STORE_ADDR.to_string()
            } else {
                addr
            },
            db,
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

/// Errors that can occur while talking to the store.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// TCP connect failed
    #[error("dial {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error on an established connection
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The store sent bytes that are not valid RESP
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    /// An operation ran past its deadline
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// The store closed the connection before replying
    #[error("Connection closed by store")]
    Disconnected,

    /// The store closed the connection in the middle of a reply
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    /// The store refused to switch to the requested database
    #[error("SELECT {db} failed: {message}")]
    SelectRejected { db: i64, message: String },
}

/// A request/reply channel speaking RESP over any byte stream.
pub struct RespStream<S> {
    stream: BufWriter<S>,
    buffer: BytesMut,
    parser: RespParser,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl<S> RespStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, read_timeout: Duration, write_timeout: Duration) -> Self {
        Self {
            stream: BufWriter::new(stream),
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            parser: RespParser::new(),
            read_timeout,
            write_timeout,
        }
    }

    /// Sends one frame and waits for exactly one reply.
    ///
    /// Error replies from the store come back as `Ok(RespValue::Error(_))`.
    pub async fn round_trip(&mut self, frame: &RespValue) -> Result<RespValue, ConnectionError> {
        self.send(frame).await?;
        self.read_reply().await
    }

    async fn send(&mut self, frame: &RespValue) -> Result<(), ConnectionError> {
        let bytes = frame.serialize();
        tokio::time::timeout(self.write_timeout, self.write_frame(&bytes))
            .await
            .map_err(|_| ConnectionError::Timeout("write"))??;
        trace!(bytes = bytes.len(), "Sent command");
        Ok(())
    }

    async fn write_frame(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    async fn read_reply(&mut self) -> Result<RespValue, ConnectionError> {
        tokio::time::timeout(self.read_timeout, self.read_until_reply())
            .await
            .map_err(|_| ConnectionError::Timeout("read"))?
    }

    async fn read_until_reply(&mut self) -> Result<RespValue, ConnectionError> {
        loop {
            if let Some(reply) = self.try_parse_reply()? {
                return Ok(reply);
            }
            self.read_more_data().await?;
        }
    }

    fn try_parse_reply(&mut self) -> Result<Option<RespValue>, ConnectionError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match self.parser.parse(&self.buffer)? {
            Some((value, consumed)) => {
                let _ = self.buffer.split_to(consumed);
                trace!(
                    consumed = consumed,
                    remaining = self.buffer.len(),
                    "Parsed reply"
                );
                Ok(Some(value))
            }
            None => {
                trace!(buffered = self.buffer.len(), "Incomplete reply, need more data");
                Ok(None)
            }
        }
    }

    async fn read_more_data(&mut self) -> Result<(), ConnectionError> {
        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(4096);
        }

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;

        if n == 0 {
            return Err(if self.buffer.is_empty() {
                ConnectionError::Disconnected
            } else {
                ConnectionError::UnexpectedEof
            });
        }

        trace!(bytes = n, "Read data");
        Ok(())
    }

    /// Flushes and shuts down the write half.
    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.stream.shutdown().await
    }
}

/// A lazily dialed connection to one store and database.
pub struct StoreConnection {
    options: ConnectionOptions,
    stream: Option<RespStream<TcpStream>>,
}

impl StoreConnection {
    /// Configures a connection. Nothing is dialed until the first command.
    pub fn new(options: ConnectionOptions) -> Self {
        Self {
            options,
            stream: None,
        }
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Returns true once the TCP connection has been established.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Sends `command` and returns the store's reply, dialing first if needed.
    pub async fn execute(&mut self, command: &RespValue) -> Result<RespValue, ConnectionError> {
        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => self.dial().await?,
        };
        self.stream.insert(stream).round_trip(command).await
    }

    async fn dial(&self) -> Result<RespStream<TcpStream>, ConnectionError> {
        let addr = &self.options.addr;
        let tcp = tokio::time::timeout(self.options.dial_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| ConnectionError::Timeout("dial"))?
            .map_err(|source| ConnectionError::Dial {
                addr: addr.clone(),
                source,
            })?;
        tcp.set_nodelay(true)?;
        debug!(addr = %addr, "Connected to store");

        let mut stream = RespStream::new(
            tcp,
            self.options.read_timeout,
            self.options.write_timeout,
        );

        // Database 0 is the store's default, negative indexes are never selected.
        if self.options.db > 0 {
            let db = self.options.db;
            let reply = stream
                .round_trip(&RespValue::command(["SELECT".to_string(), db.to_string()]))
                .await?;
            if let RespValue::Error(message) = reply {
                return Err(ConnectionError::SelectRejected { db, message });
            }
            debug!(addr = %addr, db = db, "Selected database");
        }

        Ok(stream)
    }

    /// Closes the connection. Safe to call more than once.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!(addr = %self.options.addr, error = %e, "Error while closing store connection");
            }
            debug!(addr = %self.options.addr, "Closed store connection");
        }
    }
}
