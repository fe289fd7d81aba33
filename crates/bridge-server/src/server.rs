//! Blocking single-session TCP listener.
//!
//! Connections are served strictly one at a time on the calling thread. Each
//! session gets a freshly reset bridge, so no model state survives a
//! disconnect.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};

use bridge_core::{
    serve_session, Bridge, ModelKind, ScratchpadSoc, SessionError, SessionSummary, SignalPort,
    UnionFindAccel,
};

use crate::image::load_words;
use crate::{AcceptPolicy, ServerConfig, ServerError};

/// Bound listener plus everything needed to build per-session bridges.
#[derive(Debug)]
pub struct BridgeServer {
    listener: TcpListener,
    config: ServerConfig,
    image: Vec<u32>,
}

impl BridgeServer {
    /// Loads the backing image and binds the listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Image`] or [`ServerError::ImageAlignment`] for
    /// a bad image and [`ServerError::Bind`] when the address is unavailable.
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let image = match &config.image {
            Some(path) => load_words(path)?,
            None => Vec::new(),
        };

        let addr = config.socket_addr();
        let listener =
            TcpListener::bind(addr).map_err(|source| ServerError::Bind { addr, source })?;
        log::info!(
            "listening on {} ({} model, {} image words)",
            listener.local_addr().unwrap_or(addr),
            config.model.name(),
            image.len()
        );

        Ok(Self {
            listener,
            config,
            image,
        })
    }

    /// Returns the bound address, useful when port zero was requested.
    ///
    /// # Errors
    ///
    /// Propagates the socket query failure.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts and serves sessions according to the accept policy.
    ///
    /// Returns the number of sessions served. A session that ends with a
    /// protocol or stream error is logged and does not stop the server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Accept`] when accepting a connection fails.
    pub fn run(&self) -> Result<u64, ServerError> {
        let mut sessions = 0_u64;
        loop {
            let (stream, peer) = self.listener.accept().map_err(ServerError::Accept)?;
            sessions += 1;
            self.handle(&stream, peer);

            if self.config.accept == AcceptPolicy::Once {
                break;
            }
        }
        log::info!("shutting down after {sessions} session(s)");
        Ok(sessions)
    }

    fn handle(&self, stream: &TcpStream, peer: SocketAddr) {
        if let Err(error) = stream.set_nodelay(true) {
            log::warn!("could not disable Nagle for {peer}: {error}");
        }
        log::info!("controller connected from {peer}");

        let result = match self.config.model {
            ModelKind::Soc => self.serve::<ScratchpadSoc>(stream),
            ModelKind::UnionFind => self.serve::<UnionFindAccel>(stream),
        };

        match result {
            Ok(summary) => log::info!(
                "session with {peer} closed ({:?}): {} commands, {} cycles",
                summary.end,
                summary.commands,
                summary.cycles
            ),
            Err(error) => log::warn!("session with {peer} aborted: {error}"),
        }
    }

    fn serve<M: SignalPort + Default>(
        &self,
        stream: &TcpStream,
    ) -> Result<SessionSummary, SessionError> {
        let mut bridge = Bridge::new(M::default(), &self.image, &self.config.bridge_config());
        serve_session(&mut bridge, stream, stream)
    }
}
