use std::io;

use thiserror::Error;

/// Failures reported by the in-process control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BridgeError {
    /// An operation that drives the model ran before `initialize`.
    #[error("model instance is not initialized")]
    NotInitialized,
    /// A find-root walk did not raise `done` within the cycle bound.
    #[error("find-root for node {node} did not complete within {cycles} cycles")]
    FindTimeout {
        /// Node whose root was requested.
        node: u32,
        /// Cycles stepped after the start pulse.
        cycles: u32,
    },
}

/// Reasons a protocol session ended abnormally.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The stream closed between an opcode and the end of its arguments.
    #[error("stream closed inside the arguments of opcode {opcode:#04x}")]
    TruncatedCommand {
        /// Opcode whose arguments were cut short.
        opcode: u8,
    },
    /// Reading or writing the session stream failed.
    #[error("session stream error: {0}")]
    Io(#[from] io::Error),
}

/// Failures seen by the controller side of the protocol.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server closed the stream before a full response arrived.
    #[error("bridge closed the connection before responding")]
    Closed,
    /// Reading or writing the stream failed.
    #[error("bridge stream error: {0}")]
    Io(#[from] io::Error),
}
