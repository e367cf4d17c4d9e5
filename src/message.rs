//! Wire text definitions
//!
//! Everything the server writes to a client is a plain text line. The
//! constants and formatters for those lines live here, next to `Message`,
//! the unit of inbound chat text.

use chrono::{DateTime, Local};

use crate::types::SessionId;

/// Display name a session starts with, until `/name` changes it
pub const DEFAULT_NAME: &str = "Anonymous";

/// Greeting pushed to every session the lobby registers
pub const MSG_WELCOME: &str =
    "Welcome to the server! Type \"/help\" to get a list of commands.";

/// Final line broadcast into a room when idle expiry deletes it
pub const NOTICE_ROOM_DELETED: &str = "Notice: Chat room is inactive and being deleted.";

/// Header line for `/list` output
pub const LIST_HEADER: &str = "Chat Rooms:";

/// Reply to `/help`, framed by blank lines
pub const HELP_LINES: &[&str] = &[
    "",
    "Commands:",
    "/help - lists all commands",
    "/list - lists all chat rooms",
    "/create foo - creates a chat room named foo",
    "/join foo - joins a chat room named foo",
    "/leave - leaves the current chat room",
    "/name foo - changes your name to foo",
    "/quit - quits the program",
    "",
];

/// Broadcast when a session enters a room
pub fn join_notice(name: &str) -> String {
    format!("Notice: \"{name}\" joined the chat room.")
}

/// Broadcast when a session leaves a room
pub fn leave_notice(name: &str) -> String {
    format!("Notice: \"{name}\" left the chat room.")
}

/// Broadcast when a room member changes their name
pub fn rename_notice(old: &str, new: &str) -> String {
    format!("Notice: \"{old}\" changed their name to \"{new}\".")
}

/// Personal confirmation for `/create`
pub fn created_notice(room: &str) -> String {
    format!("Notice: Created chat room \"{room}\".")
}

/// Personal confirmation for `/name` outside a room
pub fn personal_rename_notice(name: &str) -> String {
    format!("Notice: Changed name to \"{name}\".")
}

/// A line of input received from a session
///
/// Carries the receipt time and the sender's id. The sender's display name
/// is looked up at delivery time, so a rename between receipt and delivery
/// uses the current name.
#[derive(Debug, Clone)]
pub struct Message {
    /// When the line was read off the socket
    pub at: DateTime<Local>,
    /// Who sent it
    pub from: SessionId,
    /// Raw line content, newline and carriage return already stripped
    pub text: String,
}

impl Message {
    /// Create a new message with the given receipt time, sender, and text
    pub fn new(at: DateTime<Local>, from: SessionId, text: String) -> Self {
        Self { at, from, text }
    }

    /// Format as a chat line: `3:04PM - name: text`
    pub fn render(&self, sender_name: &str) -> String {
        format!(
            "{} - {}: {}",
            self.at.format("%-I:%M%p"),
            sender_name,
            self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_chat_line() {
        let msg = Message::new(Local::now(), SessionId::new(), "hello".to_string());
        let line = msg.render("Alice");
        // The clock part depends on the wall clock; the rest is fixed.
        assert!(line.ends_with(" - Alice: hello"));
        assert!(line.contains(':'));
        assert!(line.starts_with(|c: char| c.is_ascii_digit()));
    }

    #[test]
    fn test_notice_formats() {
        assert_eq!(
            join_notice("Bob"),
            "Notice: \"Bob\" joined the chat room."
        );
        assert_eq!(
            rename_notice("Anonymous", "Bob"),
            "Notice: \"Anonymous\" changed their name to \"Bob\"."
        );
        assert_eq!(created_notice("news"), "Notice: Created chat room \"news\".");
    }
}
