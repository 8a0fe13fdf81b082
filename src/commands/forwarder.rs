//! Generic command submission.

use crate::connection::{ConnectionError, StoreConnection};
use crate::protocol::RespValue;
use tracing::debug;

/// Why a forwarded command produced no value.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// Nothing to send
    #[error("empty command")]
    EmptyCommand,

    /// The store executed nothing and replied with an error
    #[error("{0}")]
    Store(String),

    /// The command never got a reply
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Sends `command` over `conn` as a single untyped command.
///
/// The first element is the command name and the rest are its arguments.
/// One attempt is made. Error replies become [`ForwardError::Store`]; every
/// other reply, including null, is returned as is.
pub async fn forward(
    conn: &mut StoreConnection,
    command: &[String],
) -> Result<RespValue, ForwardError> {
    let Some(name) = command.first() else {
        return Err(ForwardError::EmptyCommand);
    };

    debug!(
        addr = %conn.options().addr,
        command = %name,
        args = command.len() - 1,
        "Forwarding command"
    );

    match conn.execute(&RespValue::command(command)).await? {
        RespValue::Error(message) => Err(ForwardError::Store(message)),
        RespValue::Null => {
            debug!(command = %name, "Store replied nil");
            Ok(RespValue::Null)
        }
        reply => Ok(reply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionOptions;
    use crate::test_support::{closed_addr, MockStore};
    use bytes::Bytes;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    async fn forward_to(store: &MockStore, command: &[&str]) -> Result<RespValue, ForwardError> {
        let mut conn = StoreConnection::new(ConnectionOptions::new(store.addr.to_string(), 0));
        let result = forward(&mut conn, &args(command)).await;
        conn.close().await;
        result
    }

    #[tokio::test]
    async fn test_ping() {
        let store = MockStore::start().await;
        let reply = forward_to(&store, &["PING"]).await.unwrap();
        assert_eq!(reply, RespValue::simple_string("PONG"));
    }

    #[tokio::test]
    async fn test_arguments_pass_through_untouched() {
        let store = MockStore::start().await;
        forward_to(&store, &["echo", "two words", ""]).await.unwrap_err();
        assert_eq!(store.commands(), vec![vec!["echo", "two words", ""]]);
    }

    #[tokio::test]
    async fn test_integer_reply() {
        let store = MockStore::start().await;
        let reply = forward_to(&store, &["INCRBY", "counter", "5"]).await.unwrap();
        assert_eq!(reply, RespValue::integer(5));
    }

    #[tokio::test]
    async fn test_null_reply_is_ok() {
        let store = MockStore::start().await;
        let reply = forward_to(&store, &["GET", "missing"]).await.unwrap();
        assert!(reply.is_null());
    }

    #[tokio::test]
    async fn test_nested_reply() {
        let store = MockStore::start().await;
        let reply = forward_to(&store, &["SCAN", "0"]).await.unwrap();
        assert_eq!(
            reply,
            RespValue::array(vec![
                RespValue::bulk_string(Bytes::from("0")),
                RespValue::array(vec![
                    RespValue::bulk_string(Bytes::from("k1")),
                    RespValue::bulk_string(Bytes::from("k2")),
                ]),
            ])
        );
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let store = MockStore::start().await;
        let err = forward_to(&store, &["NOTACOMMAND"]).await.unwrap_err();
        match err {
            ForwardError::Store(message) => assert!(message.starts_with("ERR unknown command")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_store_type_error() {
        let store = MockStore::start().await;
        let err = forward_to(&store, &["INCRBY", "counter", "abc"]).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "ERR value is not an integer or out of range"
        );
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let addr = closed_addr().await;
        let mut conn = StoreConnection::new(ConnectionOptions::new(addr.to_string(), 0));
        let err = forward(&mut conn, &args(&["PING"])).await.unwrap_err();
        assert!(matches!(
            err,
            ForwardError::Connection(ConnectionError::Dial { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_command_sends_nothing() {
        let store = MockStore::start().await;
        let mut conn = StoreConnection::new(ConnectionOptions::new(store.addr.to_string(), 0));
        let err = forward(&mut conn, &[]).await.unwrap_err();
        assert!(matches!(err, ForwardError::EmptyCommand));
        assert!(!conn.is_connected());
    }
}
