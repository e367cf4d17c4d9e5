//! Error types for the chat server
//!
//! Defines the user-facing lobby errors, per-connection transport errors,
//! and outbound queue send errors. Uses thiserror for ergonomic error
//! definitions.

use thiserror::Error;

/// User-facing lobby errors
///
/// Each variant displays as the exact line written back to the session that
/// caused it. These never cross the lobby loop as `Err` values; they are
/// formatted and delivered like any other outbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LobbyError {
    /// Create targeting a name already in the registry
    #[error("Error: A chat room with that name already exists.")]
    RoomExists,

    /// Join targeting an unknown name
    #[error("Error: A chat room with that name does not exist.")]
    RoomNotFound,

    /// Leave attempted while not in any room
    #[error("Error: You cannot leave the lobby.")]
    NotInRoom,

    /// Plain chat text sent while not in any room
    #[error("Error: You cannot send messages in the lobby.")]
    LobbyProhibitsSend,

    /// Connection attempted while at the configured session maximum
    #[error("Server is full. Please try reconnecting later.")]
    ServerFull,
}

/// Per-connection transport errors (fatal to that connection only)
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error on the socket
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Line framing error (oversized line or underlying IO failure)
    #[error("line codec error: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),

    /// Lobby event channel closed (lobby task gone)
    #[error("Channel send error")]
    ChannelSend,
}

/// Outbound queue send errors
///
/// Distinguishes a consumer that is gone from one that is merely behind;
/// the delivery policy drops lines in the latter case.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the queue has been closed
    #[error("Channel closed")]
    Closed,

    /// The queue is full; the line was dropped
    #[error("Channel full, line dropped")]
    Backlogged,
}
