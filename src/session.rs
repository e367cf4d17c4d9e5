//! Session struct definition
//!
//! Represents a connected user as seen by the lobby: identity plus the
//! sending half of the connection's outbound queue.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::DEFAULT_NAME;
use crate::types::SessionId;

/// The lobby's session registry, keyed by session id
pub type Registry = HashMap<SessionId, Session>;

/// A connected user's lobby-side state
///
/// Holds the session's id, display name, current room (by name), and the
/// outbound line queue. The `name` and `room` fields are written only by
/// the lobby task.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Display name, `"Anonymous"` until changed with `/name`
    pub name: String,
    /// Name of the room this session occupies, if any
    pub room: Option<String>,
    /// Lobby -> connection line queue
    outbound: mpsc::Sender<String>,
}

impl Session {
    /// Create a new session with the given ID and outbound queue
    pub fn new(id: SessionId, outbound: mpsc::Sender<String>) -> Self {
        Self {
            id,
            name: DEFAULT_NAME.to_string(),
            room: None,
            outbound,
        }
    }

    /// Queue a line for delivery to this session
    ///
    /// Never blocks: a full queue drops the line (`Backlogged`), a closed
    /// queue means the connection is already tearing down (`Closed`).
    pub fn send(&self, line: impl Into<String>) -> Result<(), SendError> {
        self.outbound.try_send(line.into()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::Backlogged,
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_starts_anonymous_and_roomless() {
        let (tx, _rx) = mpsc::channel(32);
        let session = Session::new(SessionId::new(), tx);

        assert_eq!(session.name, DEFAULT_NAME);
        assert!(session.room.is_none());
    }

    #[tokio::test]
    async fn test_send_queues_a_line() {
        let (tx, mut rx) = mpsc::channel(32);
        let session = Session::new(SessionId::new(), tx);

        session.send("hello").unwrap();
        assert_eq!(rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_send_to_full_queue_drops() {
        let (tx, _rx) = mpsc::channel(1);
        let session = Session::new(SessionId::new(), tx);

        session.send("first").unwrap();
        assert!(matches!(
            session.send("second"),
            Err(SendError::Backlogged)
        ));
    }

    #[tokio::test]
    async fn test_send_to_closed_queue_errors() {
        let (tx, rx) = mpsc::channel(32);
        let session = Session::new(SessionId::new(), tx);
        drop(rx);

        assert!(matches!(session.send("hello"), Err(SendError::Closed)));
    }
}
