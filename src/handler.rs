//! TCP connection handler
//!
//! Bridges one socket to the lobby: a read task turns newline-delimited
//! input into lobby events, a write task drains the session's outbound
//! queue back onto the socket.

use chrono::Local;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::lobby::LobbyEvent;
use crate::message::Message;
use crate::types::SessionId;

/// Handle a new TCP connection
///
/// Registers a session with the lobby, then pumps lines in both directions
/// until either side closes. Transport failures end only this connection;
/// the trailing `Disconnect` event runs the departure sequence either way.
pub async fn handle_connection(
    stream: TcpStream,
    events: mpsc::Sender<LobbyEvent>,
    outbound_buffer: usize,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    // The codec strips the newline and any trailing carriage return.
    let framed = Framed::new(stream, LinesCodec::new());
    let (mut sink, mut lines) = framed.split::<String>();

    let session_id = SessionId::new();
    info!(session = %session_id, peer = %peer_addr, "connection accepted");

    // Lobby -> connection line queue
    let (line_tx, mut line_rx) = mpsc::channel::<String>(outbound_buffer);

    if events
        .send(LobbyEvent::Connect {
            id: session_id,
            outbound: line_tx,
        })
        .await
        .is_err()
    {
        error!(session = %session_id, "failed to register session - lobby closed");
        return Err(AppError::ChannelSend);
    }

    let events_read = events.clone();

    // Read task (socket -> lobby events)
    let read_task = tokio::spawn(async move {
        while let Some(result) = lines.next().await {
            match result {
                Ok(text) => {
                    let msg = Message::new(Local::now(), session_id, text);
                    if events_read.send(LobbyEvent::Text(msg)).await.is_err() {
                        debug!(session = %session_id, "lobby closed, ending read task");
                        break;
                    }
                }
                Err(e) => {
                    debug!(session = %session_id, error = %e, "read error");
                    break;
                }
            }
        }
        debug!(session = %session_id, "read task ended");
    });

    // Write task (outbound queue -> socket)
    //
    // Ends when the lobby releases the queue (departure, quit, capacity
    // reject) or the socket dies; closing the sink drops the connection.
    let write_task = tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            if let Err(e) = sink.send(line).await {
                debug!(session = %session_id, error = %e, "write failed, ending write task");
                break;
            }
        }
        let _ = sink.close().await;
        debug!(session = %session_id, "write task ended");
    });

    // Whichever half finishes first ends the connection.
    tokio::select! {
        _ = read_task => {}
        _ = write_task => {}
    }

    let _ = events.send(LobbyEvent::Disconnect { id: session_id }).await;
    info!(session = %session_id, "connection closed");

    Ok(())
}
