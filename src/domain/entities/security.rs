use std::fmt;
use std::net::SocketAddr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A logged-in user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub name: String,
    pub terminal: String,
    pub host: Option<String>,
    /// Local wall-clock time the session started, when known.
    pub started: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

/// An open inet socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetConnection {
    pub protocol: Protocol,
    pub local: SocketAddr,
    /// `None` when the socket has no peer (listening or unconnected UDP).
    pub remote: Option<SocketAddr>,
    pub status: String,
}
