//! Multi-room TCP Chat Server Library
//!
//! A line-based chat server where clients create and join named rooms,
//! built on the Actor pattern for state management.
//!
//! # Features
//! - Plain TCP with newline-delimited messages
//! - Named chat rooms with full history replay on join
//! - Idle rooms garbage-collected on a timer
//! - `/`-prefixed commands (create, list, join, leave, name, help, quit)
//! - Connection capacity limit
//! - Disconnection handling
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `Lobby` is the central actor owning the session and room registries
//! - Each connection has a `handler` task pair feeding it lines and
//!   draining its outbound queue
//! - Room expiry timers enqueue check events instead of deleting directly
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use linechat::{Config, Lobby, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let outbound_buffer = config.outbound_buffer;
//!     let listener = TcpListener::bind(&config.addr).await.unwrap();
//!
//!     let (lobby, events) = Lobby::new(config);
//!     tokio::spawn(lobby.run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let events = events.clone();
//!         tokio::spawn(handle_connection(stream, events, outbound_buffer));
//!     }
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod lobby;
pub mod message;
pub mod room;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use command::Command;
pub use config::Config;
pub use error::{AppError, LobbyError, SendError};
pub use handler::handle_connection;
pub use lobby::{Lobby, LobbyEvent};
pub use message::Message;
pub use room::Room;
pub use session::{Registry, Session};
pub use types::SessionId;
