//! Cycle-accurate co-simulation bridge between an RTL model and a remote controller.

/// Named-signal adapter implemented by every simulated model.
pub mod signal;
pub use signal::{EdgeDetector, SignalPort};

/// Simulation time in half-cycle ticks.
pub mod timing;
pub use timing::{SimTime, TICKS_PER_CYCLE};

/// Backing store and one-cycle latency memory pipeline.
pub mod memory;
pub use memory::{BackingStore, LatencyMemory, PipelineLatch, DEFAULT_MIN_MEMORY_WORDS};

/// Host-facing configuration.
pub mod api;
pub use api::{BridgeConfig, DEFAULT_FIND_TIMEOUT_CYCLES};

/// Error taxonomy for every layer of the bridge.
pub mod error;
pub use error::{BridgeError, ClientError, SessionError};

/// Cycle stepper and reset protocol.
pub mod bridge;
pub use bridge::Bridge;

mod bus;

/// Binary command protocol, session loop and client.
pub mod protocol;
pub use protocol::client::BridgeClient;
pub use protocol::session::{execute, serve_session, SessionEnd, SessionSummary};
pub use protocol::{read_frame, write_response, Command, Frame, Opcode};

/// Behavioral reference models.
pub mod models;
pub use models::{ModelKind, ScratchpadSoc, UnionFindAccel};

/// In-process control API.
pub mod direct;
pub use direct::DirectControl;

#[cfg(test)]
use env_logger as _;
#[cfg(test)]
use proptest as _;
