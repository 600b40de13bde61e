//! Debug session state machine.
//!
//! A [`DebugSession`] owns at most one TCP connection to an emulator's
//! debug port. The protocol has no request IDs; responses match
//! requests purely by arrival order, so every operation writes its
//! request and then blocks until the single response frame has been
//! fully consumed. Taking `&mut self` keeps a second request from being
//! interleaved mid-exchange; sharing a session across threads requires
//! an external mutex.

use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

use tracing::{debug, info, warn};

use mosdbg_wire::{
    encode_request, read_frame, BreakpointList, Command, MemoryBlock, RegisterSnapshot, WireError,
};

use crate::error::SessionError;

/// Version string this client reports alongside [`DebugSession::about`].
pub const CLIENT_VERSION: &str = "mosdbg 6502 debug client v0.1";

/// Whether a session currently holds a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport is open; only `connect` is useful.
    Disconnected,
    /// A TCP transport to the emulator is live.
    Connected,
}

/// A half-duplex debug session with a remote emulator.
#[derive(Debug)]
pub struct DebugSession {
    transport: Option<TcpStream>,
    response_timeout: Option<Duration>,
}

impl DebugSession {
    /// Create a session in the [`Disconnected`](ConnectionState::Disconnected) state.
    pub fn new() -> Self {
        Self {
            transport: None,
            response_timeout: None,
        }
    }

    /// Return the current connection state.
    pub fn state(&self) -> ConnectionState {
        if self.transport.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// True when a transport is live.
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Connect to an emulator's debug port.
    ///
    /// An already-open connection is dropped first. On failure the
    /// session stays disconnected.
    pub fn connect(&mut self, host: &str, port: u16) -> Result<(), SessionError> {
        if self.transport.take().is_some() {
            warn!("dropping previous connection before reconnect");
        }
        let addr = format!("{}:{}", host, port);
        let stream = TcpStream::connect(&addr).map_err(|source| SessionError::ConnectionFailed {
            addr: addr.clone(),
            source,
        })?;
        stream
            .set_read_timeout(self.response_timeout)
            .map_err(|source| SessionError::ConnectionFailed {
                addr: addr.clone(),
                source,
            })?;
        info!("connected to emulator at {}", addr);
        self.transport = Some(stream);
        Ok(())
    }

    /// Drop the connection, if any. Always ends disconnected.
    pub fn disconnect(&mut self) {
        if self.transport.take().is_some() {
            info!("disconnected from emulator");
        }
    }

    /// Set the response timeout applied to every exchange.
    ///
    /// `None` (the default) blocks indefinitely, which `continue`
    /// relies on while waiting for a breakpoint to fire. An expired
    /// timeout surfaces as a transport error and tears the session
    /// down, because response alignment is lost once an exchange is
    /// abandoned.
    pub fn set_response_timeout(&mut self, timeout: Option<Duration>) -> Result<(), SessionError> {
        if let Some(stream) = &self.transport {
            stream
                .set_read_timeout(timeout)
                .map_err(WireError::Transport)?;
        }
        self.response_timeout = timeout;
        Ok(())
    }

    /// Query the emulator's version text.
    ///
    /// Returns the emulator's string together with this client's own
    /// version constant.
    pub fn about(&mut self) -> Result<(String, &'static str), SessionError> {
        let payload = self.exchange(Command::About, &[])?;
        Ok((text_from(payload), CLIENT_VERSION))
    }

    /// Ask the emulator process to exit.
    ///
    /// No response is expected; the peer closes the connection, so the
    /// session ends disconnected either way.
    pub fn shutdown(&mut self) -> Result<(), SessionError> {
        let stream = self.transport.as_mut().ok_or(SessionError::NotConnected)?;
        let frame = encode_request(Command::Shutdown, &[]);
        let result = stream.write_all(&frame);
        self.transport = None;
        info!("shutdown sent, session closed");
        match result {
            Ok(()) => Ok(()),
            Err(e) => Err(WireError::Transport(e).into()),
        }
    }

    /// Fetch a disassembly listing as text.
    ///
    /// Flag bit 0 marks an explicit start address, bit 1 an explicit
    /// instruction count; the emulator substitutes its own defaults for
    /// whichever is absent.
    pub fn disassemble(
        &mut self,
        address: Option<u16>,
        count: Option<u16>,
    ) -> Result<String, SessionError> {
        let mut flags = 0u8;
        if address.is_some() {
            flags |= 0x01;
        }
        if count.is_some() {
            flags |= 0x02;
        }
        let mut payload = [0u8; 5];
        payload[0] = flags;
        payload[1..3].copy_from_slice(&address.unwrap_or(0).to_be_bytes());
        payload[3..5].copy_from_slice(&count.unwrap_or(0).to_be_bytes());
        let response = self.exchange(Command::Disassemble, &payload)?;
        Ok(text_from(response))
    }

    /// Dump the CPU registers without disturbing execution.
    pub fn read_registers(&mut self) -> Result<RegisterSnapshot, SessionError> {
        let payload = self.exchange(Command::ReadRegisters, &[])?;
        Ok(RegisterSnapshot::decode(&payload)?)
    }

    /// Execute `count` instructions, then halt.
    ///
    /// Returns the register dump the emulator sends once it has stopped
    /// again.
    pub fn step(&mut self, count: u16) -> Result<RegisterSnapshot, SessionError> {
        let payload = self.exchange(Command::Step, &count.to_be_bytes())?;
        Ok(RegisterSnapshot::decode(&payload)?)
    }

    /// Pause a running emulator and dump its registers.
    pub fn halt(&mut self) -> Result<RegisterSnapshot, SessionError> {
        let payload = self.exchange(Command::Halt, &[])?;
        Ok(RegisterSnapshot::decode(&payload)?)
    }

    /// Resume execution.
    ///
    /// Blocks until the emulator halts again, for example at a
    /// breakpoint, and returns the register dump from that halt.
    pub fn continue_execution(&mut self) -> Result<RegisterSnapshot, SessionError> {
        let payload = self.exchange(Command::Continue, &[])?;
        Ok(RegisterSnapshot::decode(&payload)?)
    }

    /// Read `count` bytes of emulator memory starting at `address`.
    pub fn read_memory(&mut self, address: u16, count: u16) -> Result<MemoryBlock, SessionError> {
        let mut payload = [0u8; 4];
        payload[0..2].copy_from_slice(&address.to_be_bytes());
        payload[2..4].copy_from_slice(&count.to_be_bytes());
        let response = self.exchange(Command::ReadMemory, &payload)?;
        Ok(MemoryBlock::decode(&response)?)
    }

    /// Set an instruction breakpoint at `address`.
    ///
    /// Every breakpoint command answers with the emulator's updated
    /// breakpoint list.
    pub fn add_breakpoint(&mut self, address: u16) -> Result<BreakpointList, SessionError> {
        self.breakpoint_command(Command::AddBreakpoint, address)
    }

    /// Clear the instruction breakpoint at `address`.
    pub fn remove_breakpoint(&mut self, address: u16) -> Result<BreakpointList, SessionError> {
        self.breakpoint_command(Command::RemoveBreakpoint, address)
    }

    /// Set a watchpoint that halts on any access to `address`.
    pub fn add_watchpoint(&mut self, address: u16) -> Result<BreakpointList, SessionError> {
        self.breakpoint_command(Command::AddWatchpoint, address)
    }

    /// Clear the memory-access watchpoint at `address`.
    pub fn remove_watchpoint(&mut self, address: u16) -> Result<BreakpointList, SessionError> {
        self.breakpoint_command(Command::RemoveWatchpoint, address)
    }

    /// List the breakpoints currently set in the emulator.
    pub fn list_breakpoints(&mut self) -> Result<BreakpointList, SessionError> {
        let payload = self.exchange(Command::ListBreakpoints, &[])?;
        Ok(BreakpointList::decode(&payload)?)
    }

    fn breakpoint_command(
        &mut self,
        command: Command,
        address: u16,
    ) -> Result<BreakpointList, SessionError> {
        let payload = self.exchange(command, &address.to_be_bytes())?;
        Ok(BreakpointList::decode(&payload)?)
    }

    /// Send one request and block for its response payload.
    ///
    /// A transport failure tears the session down: with no request IDs,
    /// a partially-consumed exchange cannot be resynchronized. Decode
    /// failures happen in the callers and leave the connection open.
    fn exchange(&mut self, command: Command, payload: &[u8]) -> Result<Vec<u8>, SessionError> {
        let stream = self.transport.as_mut().ok_or(SessionError::NotConnected)?;
        let frame = encode_request(command, payload);
        debug!("sending {:?} with {} byte payload", command, payload.len());
        let result = stream
            .write_all(&frame)
            .map_err(WireError::Transport)
            .and_then(|()| read_frame(stream));
        match result {
            Ok(response) => {
                debug!("{:?} answered with {} byte payload", command, response.len());
                Ok(response)
            }
            Err(err) => {
                warn!("transport failed during {:?}: {}", command, err);
                self.transport = None;
                Err(err.into())
            }
        }
    }
}

impl Default for DebugSession {
    fn default() -> Self {
        Self::new()
    }
}

fn text_from(payload: Vec<u8>) -> String {
    String::from_utf8_lossy(&payload).into_owned()
}
