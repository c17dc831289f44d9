//! Scripted transport for driving sessions without a network

use tokio::sync::mpsc;
use trade_tape::ws::{WsConnection, WsHandle, WsMessage};

/// Queue `messages`, then behave like the real transport: answer a close
/// request with Disconnected. If `then_disconnect` is set the connection
/// drops on its own after the script.
pub fn scripted(messages: Vec<WsMessage>, then_disconnect: bool) -> WsConnection {
    let (tx, rx) = mpsc::channel(messages.len() + 2);
    let (handle, mut close_rx) = WsHandle::new();

    for msg in messages {
        tx.try_send(msg).unwrap();
    }
    if then_disconnect {
        tx.try_send(WsMessage::Disconnected).unwrap();
    }

    tokio::spawn(async move {
        if close_rx.changed().await.is_ok() {
            let _ = tx.send(WsMessage::Disconnected).await;
        }
    });

    WsConnection::from_parts(rx, handle)
}

pub fn trade(price: &str, quantity: &str, time_ms: i64, maker: bool) -> WsMessage {
    WsMessage::Text(format!(
        r#"{{"e":"trade","s":"BTCUSDT","p":"{}","q":"{}","T":{},"m":{}}}"#,
        price, quantity, time_ms, maker
    ))
}
