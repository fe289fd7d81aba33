//! Fixed-layout binary command protocol.
//!
//! A request is one opcode byte followed by zero, one or two little-endian
//! `u32` arguments. Every request except [`Opcode::Exit`] is answered with
//! exactly one little-endian `u32`.

use std::io::{self, Read, Write};

use crate::SessionError;

/// Controller side of the protocol.
pub mod client;
/// Blocking per-connection command loop.
pub mod session;

/// Width in bytes of every argument and response word.
pub const WORD_BYTES: usize = 4;

/// Response value for commands without a meaningful result.
pub const RESPONSE_FILLER: u32 = 0;

/// Command opcodes carried in the first byte of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Step `N` clock cycles.
    Step = 0x01,
    /// Bus write of one word.
    Write = 0x02,
    /// Bus read of one word.
    Read = 0x03,
    /// End the session without a response.
    Exit = 0xFF,
}

impl Opcode {
    /// Returns the wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decodes a wire byte.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Step),
            0x02 => Some(Self::Write),
            0x03 => Some(Self::Read),
            0xFF => Some(Self::Exit),
            _ => None,
        }
    }

    /// Number of `u32` arguments following the opcode.
    #[must_use]
    pub const fn arg_words(self) -> usize {
        match self {
            Self::Exit => 0,
            Self::Step | Self::Read => 1,
            Self::Write => 2,
        }
    }
}

/// Fully decoded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Step the clock.
    Step {
        /// Logical cycles to advance.
        cycles: u32,
    },
    /// Bus write.
    Write {
        /// Bus address.
        addr: u32,
        /// Word to write.
        data: u32,
    },
    /// Bus read.
    Read {
        /// Bus address.
        addr: u32,
    },
    /// End of session.
    Exit,
}

impl Command {
    /// Returns the opcode this command travels under.
    #[must_use]
    pub const fn opcode(self) -> Opcode {
        match self {
            Self::Step { .. } => Opcode::Step,
            Self::Write { .. } => Opcode::Write,
            Self::Read { .. } => Opcode::Read,
            Self::Exit => Opcode::Exit,
        }
    }

    /// Appends the wire encoding to `buf`.
    pub fn encode_into(self, buf: &mut Vec<u8>) {
        buf.push(self.opcode().as_u8());
        match self {
            Self::Step { cycles } => buf.extend_from_slice(&cycles.to_le_bytes()),
            Self::Write { addr, data } => {
                buf.extend_from_slice(&addr.to_le_bytes());
                buf.extend_from_slice(&data.to_le_bytes());
            }
            Self::Read { addr } => buf.extend_from_slice(&addr.to_le_bytes()),
            Self::Exit => {}
        }
    }

    /// Returns the wire encoding.
    #[must_use]
    pub fn encode(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + self.opcode().arg_words() * WORD_BYTES);
        self.encode_into(&mut buf);
        buf
    }

    /// Returns `true` when the server answers this command.
    #[must_use]
    pub const fn expects_response(self) -> bool {
        !matches!(self, Self::Exit)
    }
}

/// Result of reading one request from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// A complete command.
    Command(Command),
    /// An opcode byte with no assigned meaning. No arguments were consumed.
    Unknown(u8),
    /// The peer closed the stream at an opcode boundary.
    Closed,
}

/// Reads one request, blocking until its opcode and arguments arrive.
///
/// # Errors
///
/// Returns [`SessionError::TruncatedCommand`] when the stream ends inside an
/// argument list, and [`SessionError::Io`] for any other stream failure. A
/// reset or aborted connection while awaiting an opcode is a clean close.
pub fn read_frame<R: Read + ?Sized>(input: &mut R) -> Result<Frame, SessionError> {
    let mut opcode = [0_u8; 1];
    loop {
        match input.read(&mut opcode) {
            Ok(0) => return Ok(Frame::Closed),
            Ok(_) => break,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) if is_peer_disconnect(error.kind()) => return Ok(Frame::Closed),
            Err(error) => return Err(error.into()),
        }
    }

    let Some(op) = Opcode::from_u8(opcode[0]) else {
        return Ok(Frame::Unknown(opcode[0]));
    };

    let command = match op {
        Opcode::Step => Command::Step {
            cycles: read_word(input, op)?,
        },
        Opcode::Write => {
            let addr = read_word(input, op)?;
            let data = read_word(input, op)?;
            Command::Write { addr, data }
        }
        Opcode::Read => Command::Read {
            addr: read_word(input, op)?,
        },
        Opcode::Exit => Command::Exit,
    };
    Ok(Frame::Command(command))
}

/// Writes one response word.
///
/// # Errors
///
/// Propagates stream write failures.
pub fn write_response<W: Write + ?Sized>(output: &mut W, value: u32) -> io::Result<()> {
    output.write_all(&value.to_le_bytes())?;
    output.flush()
}

const fn is_peer_disconnect(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted
    )
}

fn read_word<R: Read + ?Sized>(input: &mut R, opcode: Opcode) -> Result<u32, SessionError> {
    let mut word = [0_u8; WORD_BYTES];
    input.read_exact(&mut word).map_err(|error| {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            SessionError::TruncatedCommand {
                opcode: opcode.as_u8(),
            }
        } else {
            SessionError::Io(error)
        }
    })?;
    Ok(u32::from_le_bytes(word))
}
