//! In-process stand-in for a RESP store, used by unit tests across modules.

use crate::protocol::{RespParser, RespValue};
use bytes::{Bytes, BytesMut};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Commands seen by a [`MockStore`], one entry per command, in arrival order.
pub type CommandLog = Arc<Mutex<Vec<Vec<String>>>>;

pub struct MockStore {
    pub addr: SocketAddr,
    pub commands: CommandLog,
    closed: Arc<AtomicUsize>,
}

impl MockStore {
    /// Starts a store that answers with [`default_reply`].
    pub async fn start() -> Self {
        Self::start_with(default_reply).await
    }

    /// Starts a store whose replies come from `reply`.
    pub async fn start_with<F>(reply: F) -> Self
    where
        F: Fn(&[String]) -> RespValue + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let commands: CommandLog = Arc::default();
        let closed = Arc::new(AtomicUsize::new(0));
        let reply = Arc::new(reply);

        let log = Arc::clone(&commands);
        let closed_count = Arc::clone(&closed);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let log = Arc::clone(&log);
                let reply = Arc::clone(&reply);
                let closed_count = Arc::clone(&closed_count);
                tokio::spawn(async move {
                    serve(stream, log, move |args: &[String]| (*reply)(args)).await;
                    closed_count.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        Self {
            addr,
            commands,
            closed,
        }
    }

    /// Number of client connections that have ended.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().unwrap().clone()
    }
}

async fn serve<F>(mut stream: TcpStream, log: CommandLog, reply: F)
where
    F: Fn(&[String]) -> RespValue,
{
    let mut buffer = BytesMut::with_capacity(4096);
    let mut parser = RespParser::new();

    loop {
        while let Ok(Some((value, consumed))) = parser.parse(&buffer) {
            let _ = buffer.split_to(consumed);
            let args: Vec<String> = value
                .as_array()
                .unwrap_or_default()
                .iter()
                .filter_map(|arg| arg.as_str().map(str::to_string))
                .collect();
            log.lock().unwrap().push(args.clone());
            if stream.write_all(&reply(&args).serialize()).await.is_err() {
                return;
            }
        }

        match stream.read_buf(&mut buffer).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
    }
}

/// A small subset of store behaviour, enough to exercise every reply type.
pub fn default_reply(args: &[String]) -> RespValue {
    let name = args.first().map(|s| s.to_uppercase()).unwrap_or_default();
    match (name.as_str(), args.get(1..).unwrap_or_default()) {
        ("PING", []) => RespValue::simple_string("PONG"),
        ("ECHO", [msg]) => RespValue::bulk_string(Bytes::from(msg.clone())),
        ("SELECT", [db]) => match db.parse::<u32>() {
            Ok(n) if n < 16 => RespValue::simple_string("OK"),
            _ => RespValue::error("ERR DB index is out of range"),
        },
        ("GET", [_]) => RespValue::null(),
        ("INCRBY", [_, by]) => match by.parse::<i64>() {
            Ok(n) => RespValue::integer(n),
            Err(_) => RespValue::error("ERR value is not an integer or out of range"),
        },
        ("SCAN", [_]) => RespValue::array(vec![
            RespValue::bulk_string(Bytes::from("0")),
            RespValue::array(vec![
                RespValue::bulk_string(Bytes::from("k1")),
                RespValue::bulk_string(Bytes::from("k2")),
            ]),
        ]),
        _ => RespValue::error(format!(
            "ERR unknown command '{}', with args beginning with: ",
            args.first().map(String::as_str).unwrap_or_default()
        )),
    }
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
