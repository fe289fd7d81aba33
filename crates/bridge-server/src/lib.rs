//! TCP front end for the co-simulation bridge.

/// Listener, model and image settings.
pub mod config;
pub use config::{AcceptPolicy, ServerConfig, DEFAULT_PORT};

/// Fatal server errors.
pub mod error;
pub use error::ServerError;

/// Backing-memory image loading.
pub mod image;
pub use image::{load_words, words_from_le_bytes};

/// Session accept loop.
pub mod server;
pub use server::BridgeServer;

/// Installs the stderr logger with `info` as the default filter.
///
/// `RUST_LOG` overrides the default. Calling this more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
