//! Blocking request/response loop for one controller connection.
//!
//! Per command the loop moves through await-opcode, decode-args, execute and
//! respond, then waits for the next opcode. It ends on an exit command or
//! when the peer closes the stream at an opcode boundary.

use std::io::{Read, Write};

use crate::protocol::{read_frame, write_response, Command, Frame, RESPONSE_FILLER};
use crate::{Bridge, SessionError, SignalPort, TICKS_PER_CYCLE};

/// How a session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEnd {
    /// The controller sent the exit opcode.
    Exit,
    /// The controller closed the stream.
    Disconnected,
}

/// Lifecycle summary of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSummary {
    /// How the session finished.
    pub end: SessionEnd,
    /// Commands executed, exit included.
    pub commands: u64,
    /// Logical cycles stepped during the session, bus transactions included.
    pub cycles: u64,
}

/// Serves commands from `input` against `bridge` until the session ends.
///
/// Responses are flushed to `output` one by one so the controller never
/// waits on buffered data.
///
/// # Errors
///
/// Returns [`SessionError::TruncatedCommand`] when the stream closes inside
/// an argument list and [`SessionError::Io`] on stream failures. The bridge
/// keeps every effect of commands completed before the error.
pub fn serve_session<M, R, W>(
    bridge: &mut Bridge<M>,
    mut input: R,
    mut output: W,
) -> Result<SessionSummary, SessionError>
where
    M: SignalPort,
    R: Read,
    W: Write,
{
    let started = bridge.time();
    let mut commands = 0_u64;

    let end = loop {
        let command = match read_frame(&mut input)? {
            Frame::Command(command) => command,
            Frame::Unknown(opcode) => {
                log::warn!("skipping unknown opcode {opcode:#04x}");
                continue;
            }
            Frame::Closed => break SessionEnd::Disconnected,
        };
        commands += 1;

        match execute(bridge, command) {
            Some(response) => write_response(&mut output, response)?,
            None => break SessionEnd::Exit,
        }
    };

    Ok(SessionSummary {
        end,
        commands,
        cycles: bridge.time().ticks_since(started) / TICKS_PER_CYCLE,
    })
}

/// Runs one command to completion and returns its response word.
///
/// Returns `None` for [`Command::Exit`], which has no response and no effect
/// on the model.
pub fn execute<M: SignalPort>(bridge: &mut Bridge<M>, command: Command) -> Option<u32> {
    match command {
        Command::Step { cycles } => {
            log::trace!("step {cycles} cycles");
            bridge.step_cycles(cycles);
            Some(RESPONSE_FILLER)
        }
        Command::Write { addr, data } => {
            bridge.write(addr, data);
            Some(RESPONSE_FILLER)
        }
        Command::Read { addr } => Some(bridge.read(addr)),
        Command::Exit => None,
    }
}
