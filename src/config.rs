//! Runtime configuration
//!
//! Defaults match the original deployment; the bind address comes from the
//! first CLI argument and the capacity/expiry knobs from the environment.

use std::env;
use std::time::Duration;

/// Default bind address
const DEFAULT_ADDR: &str = "127.0.0.1:3333";

/// Default maximum concurrent sessions
const DEFAULT_MAX_SESSIONS: usize = 5;

/// Default idle duration before a room expires
const DEFAULT_ROOM_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Lobby event channel capacity
const DEFAULT_EVENT_BUFFER: usize = 256;

/// Per-session outbound queue capacity
const DEFAULT_OUTBOUND_BUFFER: usize = 256;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the TCP listener binds to
    pub addr: String,
    /// Maximum concurrent sessions; connections beyond this are rejected
    pub max_sessions: usize,
    /// How long a room may sit without broadcast activity before deletion
    pub room_ttl: Duration,
    /// Capacity of the lobby's shared event channel
    pub event_buffer: usize,
    /// Capacity of each session's outbound line queue
    pub outbound_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            max_sessions: DEFAULT_MAX_SESSIONS,
            room_ttl: DEFAULT_ROOM_TTL,
            event_buffer: DEFAULT_EVENT_BUFFER,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

impl Config {
    /// Build a config from CLI arguments and environment variables
    ///
    /// The first positional argument overrides the bind address;
    /// `LINECHAT_MAX_SESSIONS` and `LINECHAT_ROOM_TTL_SECS` override the
    /// capacity and expiry knobs. Unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Some(addr) = env::args().nth(1) {
            config.addr = addr;
        }
        if let Some(max) = parse_var("LINECHAT_MAX_SESSIONS") {
            config.max_sessions = max;
        }
        if let Some(secs) = parse_var("LINECHAT_ROOM_TTL_SECS") {
            config.room_ttl = Duration::from_secs(secs);
        }
        config
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
