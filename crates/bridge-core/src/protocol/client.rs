use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use crate::protocol::{Command, WORD_BYTES};
use crate::ClientError;

/// Controller-side handle speaking the bridge protocol over a byte stream.
///
/// Every call blocks until the bridge has finished the command and sent its
/// response.
#[derive(Debug)]
pub struct BridgeClient<S> {
    stream: S,
}

impl BridgeClient<TcpStream> {
    /// Connects to a bridge server with `TCP_NODELAY` enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] when the connection cannot be opened.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

impl<S: Read + Write> BridgeClient<S> {
    /// Wraps an already-open stream.
    pub const fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Advances the model by `cycles` clock cycles.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the stream fails or closes early.
    pub fn step(&mut self, cycles: u32) -> Result<(), ClientError> {
        self.round_trip(Command::Step { cycles }).map(drop)
    }

    /// Writes `data` to bus address `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the stream fails or closes early.
    pub fn write(&mut self, addr: u32, data: u32) -> Result<(), ClientError> {
        self.round_trip(Command::Write { addr, data }).map(drop)
    }

    /// Reads bus address `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the stream fails or closes early.
    pub fn read(&mut self, addr: u32) -> Result<u32, ClientError> {
        self.round_trip(Command::Read { addr })
    }

    /// Ends the session and returns the stream.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] when the exit opcode cannot be sent.
    pub fn exit(mut self) -> Result<S, ClientError> {
        self.stream.write_all(&Command::Exit.encode())?;
        self.stream.flush()?;
        Ok(self.stream)
    }

    /// Releases the stream without ending the session.
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn round_trip(&mut self, command: Command) -> Result<u32, ClientError> {
        self.stream.write_all(&command.encode())?;
        self.stream.flush()?;

        let mut response = [0_u8; WORD_BYTES];
        self.stream
            .read_exact(&mut response)
            .map_err(|error| match error.kind() {
                io::ErrorKind::UnexpectedEof => ClientError::Closed,
                _ => ClientError::Io(error),
            })?;
        Ok(u32::from_le_bytes(response))
    }
}
