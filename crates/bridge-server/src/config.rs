//! Server configuration assembled from the command line.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use bridge_core::{BridgeConfig, ModelKind, DEFAULT_MIN_MEMORY_WORDS};

/// Well-known port the controller connects to.
pub const DEFAULT_PORT: u16 = 8000;

/// What the server does after a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AcceptPolicy {
    /// Serve a single session, then shut down.
    #[default]
    Once,
    /// Keep accepting sessions, one at a time, until the process is killed.
    Persistent,
}

/// Listener, model and backing-image settings for one server run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ServerConfig {
    /// Interface to listen on.
    pub bind: IpAddr,
    /// TCP port to listen on. Zero picks an ephemeral port.
    pub port: u16,
    /// Model instantiated for every session.
    pub model: ModelKind,
    /// Little-endian word image loaded into backing memory.
    pub image: Option<PathBuf>,
    /// Backing-store capacity floor.
    pub min_memory_words: usize,
    /// Session acceptance policy.
    pub accept: AcceptPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            model: ModelKind::default(),
            image: None,
            min_memory_words: DEFAULT_MIN_MEMORY_WORDS,
            accept: AcceptPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the address the listener binds.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Returns the per-session bridge configuration.
    #[must_use]
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            min_memory_words: self.min_memory_words,
            ..BridgeConfig::default()
        }
    }
}
