//! Lobby actor implementation
//!
//! The central actor that owns all mutable state: the session registry and
//! the room registry. Every mutation, including timer-driven room expiry,
//! arrives as an event on one mpsc channel and is applied strictly in
//! arrival order, so no locks are needed anywhere.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::command::Command;
use crate::config::Config;
use crate::error::LobbyError;
use crate::message::{self, Message};
use crate::room::Room;
use crate::session::{Registry, Session};
use crate::types::SessionId;

/// Events processed by the lobby actor
///
/// Expiry sleepers, connection handlers, and the accept loop all feed this
/// one stream; the lobby total-orders whatever arrives.
#[derive(Debug)]
pub enum LobbyEvent {
    /// New connection, carrying the sending half of its outbound queue
    Connect {
        id: SessionId,
        outbound: mpsc::Sender<String>,
    },
    /// Connection closed (transport error, EOF, or quit)
    Disconnect { id: SessionId },
    /// A line of input from a session
    Text(Message),
    /// A scheduled idle check for the named room
    CheckExpiry { room: String },
}

/// The lobby actor
///
/// Interprets commands, routes chat text, and garbage-collects idle rooms.
/// Rooms and sessions are plain data; everything that mutates them runs
/// here, one event at a time.
pub struct Lobby {
    /// All registered sessions
    sessions: Registry,
    /// All live rooms, keyed by name
    rooms: HashMap<String, Room>,
    /// Event receiver channel
    receiver: mpsc::Receiver<LobbyEvent>,
    /// Handed to expiry sleepers so checks come back through the loop
    self_tx: mpsc::Sender<LobbyEvent>,
    config: Config,
}

impl Lobby {
    /// Create a lobby and the sender used to feed it events
    pub fn new(config: Config) -> (Self, mpsc::Sender<LobbyEvent>) {
        let (tx, rx) = mpsc::channel(config.event_buffer);
        let lobby = Self {
            sessions: Registry::new(),
            rooms: HashMap::new(),
            receiver: rx,
            self_tx: tx.clone(),
            config,
        };
        (lobby, tx)
    }

    /// Run the lobby event loop
    pub async fn run(mut self) {
        info!("lobby started");

        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }

        info!("lobby shutting down");
    }

    /// Process a single event
    fn handle_event(&mut self, event: LobbyEvent) {
        match event {
            LobbyEvent::Connect { id, outbound } => self.handle_connect(id, outbound),
            LobbyEvent::Disconnect { id } => self.handle_disconnect(id),
            LobbyEvent::Text(msg) => self.handle_text(msg),
            LobbyEvent::CheckExpiry { room } => self.handle_check_expiry(&room),
        }
    }

    /// Register a new session, or reject it at capacity
    fn handle_connect(&mut self, id: SessionId, outbound: mpsc::Sender<String>) {
        if self.sessions.len() >= self.config.max_sessions {
            // Dropping the queue after the notice closes the connection.
            let _ = outbound.try_send(LobbyError::ServerFull.to_string());
            info!(session = %id, "rejected connection, server full");
            return;
        }

        let session = Session::new(id, outbound);
        let _ = session.send(message::MSG_WELCOME);
        self.sessions.insert(id, session);
        info!(session = %id, total = self.sessions.len(), "session connected");
    }

    /// Run the departure sequence for a session
    fn handle_disconnect(&mut self, id: SessionId) {
        self.leave_current_room(id);
        if self.sessions.remove(&id).is_some() {
            info!(session = %id, total = self.sessions.len(), "session departed");
        }
    }

    /// Classify a line of input and dispatch it
    ///
    /// Lines from sessions not in the registry (rejected at capacity, or
    /// already departed while their read task drained) are discarded.
    fn handle_text(&mut self, msg: Message) {
        if !self.sessions.contains_key(&msg.from) {
            return;
        }
        match Command::parse(&msg.text) {
            Some(Command::Create(name)) => self.create_room(msg.from, name),
            Some(Command::List) => self.list_rooms(msg.from),
            Some(Command::Join(name)) => self.join_room(msg.from, name),
            Some(Command::Leave) => self.leave_room(msg.from),
            Some(Command::Name(name)) => self.change_name(msg.from, name),
            Some(Command::Help) => self.send_help(msg.from),
            Some(Command::Quit) => self.handle_disconnect(msg.from),
            None => self.relay_chat(msg),
        }
    }

    /// Broadcast chat text into the sender's room
    fn relay_chat(&mut self, msg: Message) {
        let Some(session) = self.sessions.get(&msg.from) else {
            return;
        };
        let Some(room_name) = session.room.clone() else {
            let _ = session.send(LobbyError::LobbyProhibitsSend.to_string());
            debug!(session = %msg.from, "chat text while in the lobby");
            return;
        };
        let line = msg.render(&session.name);
        if let Some(room) = self.rooms.get_mut(&room_name) {
            room.broadcast(&self.sessions, line);
        }
    }

    /// Create a room and schedule its first expiry check
    fn create_room(&mut self, id: SessionId, name: String) {
        if self.rooms.contains_key(&name) {
            self.reply(id, LobbyError::RoomExists.to_string());
            debug!(session = %id, room = %name, "create for existing room");
            return;
        }

        let room = Room::new(name.clone(), self.config.room_ttl);
        self.rooms.insert(name.clone(), room);
        self.schedule_expiry_check(name.clone(), self.config.room_ttl);
        self.reply(id, message::created_notice(&name));
        info!(session = %id, room = %name, "room created");
    }

    /// Send the room name list, framed by blank lines
    fn list_rooms(&self, id: SessionId) {
        let Some(session) = self.sessions.get(&id) else {
            return;
        };
        let _ = session.send("");
        let _ = session.send(message::LIST_HEADER);
        for name in self.rooms.keys() {
            let _ = session.send(name.clone());
        }
        let _ = session.send("");
    }

    /// Move a session into the named room
    fn join_room(&mut self, id: SessionId, name: String) {
        if !self.rooms.contains_key(&name) {
            self.reply(id, LobbyError::RoomNotFound.to_string());
            debug!(session = %id, room = %name, "join for unknown room");
            return;
        }

        // Switching rooms runs the full leave sequence first.
        self.leave_current_room(id);

        if let Some(room) = self.rooms.get_mut(&name) {
            room.join(&mut self.sessions, id);
            info!(session = %id, room = %name, "session joined room");
        }
    }

    /// Handle an explicit `/leave`
    fn leave_room(&mut self, id: SessionId) {
        let in_room = self.sessions.get(&id).is_some_and(|s| s.room.is_some());
        if !in_room {
            self.reply(id, LobbyError::NotInRoom.to_string());
            debug!(session = %id, "leave while in the lobby");
            return;
        }
        self.leave_current_room(id);
    }

    /// Leave sequence for whatever room the session occupies, if any
    fn leave_current_room(&mut self, id: SessionId) {
        let Some(name) = self.sessions.get(&id).and_then(|s| s.room.clone()) else {
            return;
        };
        if let Some(room) = self.rooms.get_mut(&name) {
            room.leave(&mut self.sessions, id);
            info!(session = %id, room = %name, "session left room");
        }
    }

    /// Change a session's display name
    ///
    /// Confirmed personally in the lobby; announced room-wide otherwise.
    fn change_name(&mut self, id: SessionId, new_name: String) {
        let Some(session) = self.sessions.get(&id) else {
            return;
        };
        match session.room.clone() {
            None => {
                let _ = session.send(message::personal_rename_notice(&new_name));
            }
            Some(room_name) => {
                let notice = message::rename_notice(&session.name, &new_name);
                if let Some(room) = self.rooms.get_mut(&room_name) {
                    room.broadcast(&self.sessions, notice);
                }
            }
        }
        if let Some(session) = self.sessions.get_mut(&id) {
            session.name = new_name;
        }
        info!(session = %id, "session changed their name");
    }

    /// Send the static command list
    fn send_help(&self, id: SessionId) {
        let Some(session) = self.sessions.get(&id) else {
            return;
        };
        for line in message::HELP_LINES {
            let _ = session.send(*line);
        }
    }

    /// Delete the named room if its deadline has passed, else re-arm
    ///
    /// Activity may have moved the deadline since this check was scheduled,
    /// and the room may have been deleted or recreated; everything is
    /// revalidated against the current registry entry.
    fn handle_check_expiry(&mut self, name: &str) {
        let Some(room) = self.rooms.get(name) else {
            return;
        };

        let now = Instant::now();
        let deadline = room.expires_at();
        if deadline > now {
            self.schedule_expiry_check(name.to_string(), deadline - now);
            debug!(room = %name, "room still active, expiry check rescheduled");
            return;
        }

        if let Some(mut room) = self.rooms.remove(name) {
            room.delete(&mut self.sessions);
            info!(room = %name, "idle room deleted");
        }
    }

    /// Arrange for a `CheckExpiry` event after `delay`
    ///
    /// The sleeper only enqueues the event; deletion itself always happens
    /// on the lobby loop.
    fn schedule_expiry_check(&self, room: String, delay: Duration) {
        let tx = self.self_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(LobbyEvent::CheckExpiry { room }).await;
        });
    }

    /// Send a line to one session, ignoring delivery failure
    fn reply(&self, id: SessionId, line: String) {
        if let Some(session) = self.sessions.get(&id) {
            let _ = session.send(line);
        }
    }
}
