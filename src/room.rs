//! Room struct definition
//!
//! A named broadcast group with an insertion-ordered membership, a full
//! message log replayed to new joiners, and an idle-expiry deadline.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::message;
use crate::session::Registry;
use crate::types::SessionId;

/// A chat room
///
/// Membership and log are mutated only by the lobby task, so no locking is
/// needed. Every broadcast pushes the expiry deadline to `now + ttl`; the
/// lobby deletes the room once a scheduled check finds the deadline passed.
#[derive(Debug)]
pub struct Room {
    /// Unique, case-sensitive room name
    pub name: String,
    /// Current members, in join order
    members: Vec<SessionId>,
    /// Every line ever broadcast, replayed in full to joiners
    log: Vec<String>,
    /// Deadline after which an expiry check deletes the room
    expiry: Instant,
    /// Idle duration granted by each broadcast
    ttl: Duration,
}

impl Room {
    /// Create a new empty room expiring `ttl` from now
    pub fn new(name: String, ttl: Duration) -> Self {
        Self {
            name,
            members: Vec::new(),
            log: Vec::new(),
            expiry: Instant::now() + ttl,
            ttl,
        }
    }

    /// Instant at which the room becomes eligible for deletion
    pub fn expires_at(&self) -> Instant {
        self.expiry
    }

    /// Current members in join order
    pub fn members(&self) -> &[SessionId] {
        &self.members
    }

    /// Add a session to the room
    ///
    /// Replays the full log to the joiner, registers membership, then
    /// broadcasts the join notice. Runs as one step on the lobby loop, so
    /// nothing can be delivered twice or dropped around the replay.
    pub fn join(&mut self, sessions: &mut Registry, id: SessionId) {
        let Some(session) = sessions.get_mut(&id) else {
            return;
        };
        session.room = Some(self.name.clone());
        for line in &self.log {
            if let Err(e) = session.send(line.clone()) {
                debug!(session = %id, error = %e, "dropped replay line");
            }
        }
        let name = session.name.clone();
        if !self.members.contains(&id) {
            self.members.push(id);
        }
        self.broadcast(sessions, message::join_notice(&name));
    }

    /// Remove a session from the room
    ///
    /// The leave notice goes out first, so the leaver sees it too.
    pub fn leave(&mut self, sessions: &mut Registry, id: SessionId) {
        let Some(name) = sessions.get(&id).map(|s| s.name.clone()) else {
            return;
        };
        self.broadcast(sessions, message::leave_notice(&name));
        self.members.retain(|m| *m != id);
        if let Some(session) = sessions.get_mut(&id) {
            session.room = None;
        }
    }

    /// Append a line to the log, deliver it to every member, and refresh
    /// the expiry deadline
    ///
    /// Delivery is fire-and-forget: a member whose queue is full loses the
    /// line rather than stalling the lobby.
    pub fn broadcast(&mut self, sessions: &Registry, line: String) {
        self.expiry = Instant::now() + self.ttl;
        self.log.push(line.clone());
        for id in &self.members {
            if let Some(session) = sessions.get(id) {
                if let Err(e) = session.send(line.clone()) {
                    debug!(session = %id, error = %e, "dropped broadcast line");
                }
            }
        }
    }

    /// Announce deletion and eject every member back to the lobby
    pub fn delete(&mut self, sessions: &mut Registry) {
        self.broadcast(sessions, message::NOTICE_ROOM_DELETED.to_string());
        for id in &self.members {
            if let Some(session) = sessions.get_mut(id) {
                session.room = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::session::Session;

    const TTL: Duration = Duration::from_secs(60);

    fn connect(sessions: &mut Registry) -> (SessionId, mpsc::Receiver<String>) {
        let id = SessionId::new();
        let (tx, rx) = mpsc::channel(64);
        sessions.insert(id, Session::new(id, tx));
        (id, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_join_replays_log_then_notice() {
        let mut sessions = Registry::new();
        let mut room = Room::new("news".to_string(), TTL);
        room.broadcast(&sessions, "m1".to_string());
        room.broadcast(&sessions, "m2".to_string());

        let (id, mut rx) = connect(&mut sessions);
        room.join(&mut sessions, id);

        assert_eq!(
            drain(&mut rx),
            vec!["m1", "m2", "Notice: \"Anonymous\" joined the chat room."]
        );
        assert_eq!(room.members(), &[id]);
        assert_eq!(sessions[&id].room.as_deref(), Some("news"));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_members() {
        let mut sessions = Registry::new();
        let mut room = Room::new("news".to_string(), TTL);
        let (a, mut rx_a) = connect(&mut sessions);
        let (b, mut rx_b) = connect(&mut sessions);
        room.join(&mut sessions, a);
        room.join(&mut sessions, b);
        drain(&mut rx_a);
        drain(&mut rx_b);

        room.broadcast(&sessions, "hello".to_string());

        assert_eq!(drain(&mut rx_a), vec!["hello"]);
        assert_eq!(drain(&mut rx_b), vec!["hello"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_broadcast_refreshes_expiry() {
        let mut sessions = Registry::new();
        let mut room = Room::new("news".to_string(), TTL);
        let deadline = room.expires_at();

        tokio::time::advance(Duration::from_secs(30)).await;
        room.broadcast(&sessions, "activity".to_string());

        assert_eq!(room.expires_at(), Instant::now() + TTL);
        assert!(room.expires_at() > deadline);
    }

    #[tokio::test]
    async fn test_leave_notifies_everyone_first() {
        let mut sessions = Registry::new();
        let mut room = Room::new("news".to_string(), TTL);
        let (a, mut rx_a) = connect(&mut sessions);
        let (b, mut rx_b) = connect(&mut sessions);
        room.join(&mut sessions, a);
        room.join(&mut sessions, b);
        drain(&mut rx_a);
        drain(&mut rx_b);

        room.leave(&mut sessions, a);

        // The leaver receives its own leave notice.
        let notice = "Notice: \"Anonymous\" left the chat room.";
        assert_eq!(drain(&mut rx_a), vec![notice]);
        assert_eq!(drain(&mut rx_b), vec![notice]);
        assert_eq!(room.members(), &[b]);
        assert!(sessions[&a].room.is_none());
        assert_eq!(sessions[&b].room.as_deref(), Some("news"));
    }

    #[tokio::test]
    async fn test_delete_ejects_members() {
        let mut sessions = Registry::new();
        let mut room = Room::new("news".to_string(), TTL);
        let (a, mut rx_a) = connect(&mut sessions);
        let (b, mut rx_b) = connect(&mut sessions);
        room.join(&mut sessions, a);
        room.join(&mut sessions, b);
        drain(&mut rx_a);
        drain(&mut rx_b);

        room.delete(&mut sessions);

        assert_eq!(drain(&mut rx_a), vec![message::NOTICE_ROOM_DELETED]);
        assert_eq!(drain(&mut rx_b), vec![message::NOTICE_ROOM_DELETED]);
        assert!(sessions[&a].room.is_none());
        assert!(sessions[&b].room.is_none());
    }

    #[tokio::test]
    async fn test_join_twice_keeps_single_membership() {
        let mut sessions = Registry::new();
        let mut room = Room::new("news".to_string(), TTL);
        let (a, _rx_a) = connect(&mut sessions);

        room.join(&mut sessions, a);
        room.join(&mut sessions, a);

        assert_eq!(room.members(), &[a]);
    }
}
