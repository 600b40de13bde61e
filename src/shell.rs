//! Interactive debugger shell.
//!
//! A line-oriented front-end over [`DebugSession`]: one command per
//! line, hex addresses, output on stdout. Command failures are printed
//! and the loop continues; only `quit`, a successful `shutdown`, or
//! end-of-input leave it.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, info};

use mosdbg_session::{DebugSession, SessionError, CLIENT_VERSION};
use mosdbg_wire::{format_memory_dump, BreakpointList, RegisterSnapshot};

use crate::config::Config;

/// The interactive prompt.
const PROMPT: &str = "6502> ";

const HELP_TEXT: &str = "\
Commands:
  connect [host] [port]   connect to an emulator's debug port
  about                   show emulator and client versions
  regs                    dump CPU registers
  step [n]                execute n instructions (default 1)
  halt                    pause execution
  continue                resume until the next halt
  disass [addr] [n]       disassemble n instructions at addr
  mem <addr> [len]        hex dump emulator memory
  break <addr>            set an instruction breakpoint
  unbreak <addr>          clear an instruction breakpoint
  watch <addr>            set a memory-access watchpoint
  unwatch <addr>          clear a memory-access watchpoint
  breaks                  list breakpoints
  shutdown                ask the emulator to exit
  quit                    leave the shell
Addresses are hex ($ and 0x prefixes accepted); counts are decimal
unless prefixed.";

/// What the loop should do after a dispatched line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Why a shell command could not run.
#[derive(Debug, Error)]
enum CommandError {
    /// The command line itself was wrong.
    #[error("{0}")]
    Usage(String),

    /// The session rejected or failed the operation.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// The interactive shell driving one debug session.
pub struct Shell {
    session: DebugSession,
    config: Config,
}

impl Shell {
    /// Create a shell with a disconnected session.
    pub fn new(config: Config) -> Self {
        Self {
            session: DebugSession::new(),
            config,
        }
    }

    /// Connect to an emulator, applying the configured response timeout.
    pub fn connect(&mut self, host: &str, port: u16) -> Result<(), SessionError> {
        self.session.connect(host, port)?;
        self.session
            .set_response_timeout(self.config.connect.timeout())?;
        Ok(())
    }

    /// Run the read-dispatch loop until `quit` or end-of-input.
    pub fn run(&mut self, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<()> {
        writeln!(output, "{}", CLIENT_VERSION)?;
        writeln!(output, "Type 'help' for commands.")?;
        let mut line = String::new();
        loop {
            write!(output, "{}", PROMPT)?;
            output.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }
            match self.dispatch(line.trim(), output)? {
                Flow::Continue => {}
                Flow::Exit => break,
            }
        }
        info!("shell finished");
        Ok(())
    }

    fn dispatch(&mut self, line: &str, output: &mut impl Write) -> io::Result<Flow> {
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(word) => word,
            None => return Ok(Flow::Continue),
        };
        let args: Vec<&str> = words.collect();
        debug!("command: {}", line);

        match command {
            "quit" | "exit" => return Ok(Flow::Exit),
            "shutdown" => {
                return match self.cmd_shutdown() {
                    Ok(reply) => {
                        writeln!(output, "{}", reply)?;
                        Ok(Flow::Exit)
                    }
                    Err(e) => {
                        writeln!(output, "error: {}", e)?;
                        Ok(Flow::Continue)
                    }
                };
            }
            _ => {}
        }

        match self.execute(command, &args) {
            Ok(reply) => {
                if !reply.is_empty() {
                    writeln!(output, "{}", reply)?;
                }
            }
            Err(e) => writeln!(output, "error: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn execute(&mut self, command: &str, args: &[&str]) -> Result<String, CommandError> {
        match command {
            "help" | "?" => Ok(HELP_TEXT.to_string()),
            "connect" => self.cmd_connect(args),
            "about" => self.cmd_about(),
            "regs" => Ok(render_registers(&self.session.read_registers()?)),
            "step" => self.cmd_step(args),
            "halt" => Ok(render_registers(&self.session.halt()?)),
            "continue" => Ok(render_registers(&self.session.continue_execution()?)),
            "disass" => self.cmd_disass(args),
            "mem" => self.cmd_mem(args),
            "break" => {
                let addr = require_address(args, "break <addr>")?;
                Ok(render_breakpoints(&self.session.add_breakpoint(addr)?))
            }
            "unbreak" => {
                let addr = require_address(args, "unbreak <addr>")?;
                Ok(render_breakpoints(&self.session.remove_breakpoint(addr)?))
            }
            "watch" => {
                let addr = require_address(args, "watch <addr>")?;
                Ok(render_breakpoints(&self.session.add_watchpoint(addr)?))
            }
            "unwatch" => {
                let addr = require_address(args, "unwatch <addr>")?;
                Ok(render_breakpoints(&self.session.remove_watchpoint(addr)?))
            }
            "breaks" => Ok(render_breakpoints(&self.session.list_breakpoints()?)),
            _ => Err(CommandError::Usage(format!(
                "unknown command: {} (try 'help')",
                command
            ))),
        }
    }

    fn cmd_connect(&mut self, args: &[&str]) -> Result<String, CommandError> {
        let host = match args.first() {
            Some(word) => (*word).to_string(),
            None => self.config.connect.host.clone(),
        };
        let port = match args.get(1) {
            Some(word) => word
                .parse::<u16>()
                .map_err(|_| CommandError::Usage(format!("bad port: {}", word)))?,
            None => self.config.connect.port,
        };
        self.connect(&host, port)?;
        Ok(format!("connected to {}:{}", host, port))
    }

    fn cmd_about(&mut self) -> Result<String, CommandError> {
        let (emulator, client) = self.session.about()?;
        Ok(format!("Emulator: {}\nClient: {}", emulator.trim_end(), client))
    }

    fn cmd_shutdown(&mut self) -> Result<String, CommandError> {
        self.session.shutdown()?;
        Ok("shutdown sent".to_string())
    }

    fn cmd_step(&mut self, args: &[&str]) -> Result<String, CommandError> {
        let count = match args.first().copied() {
            Some(word) => parse_count(word)?,
            None => 1,
        };
        Ok(render_registers(&self.session.step(count)?))
    }

    fn cmd_disass(&mut self, args: &[&str]) -> Result<String, CommandError> {
        let address = args.first().copied().map(parse_address).transpose()?;
        let count = args.get(1).copied().map(parse_count).transpose()?;
        let listing = self.session.disassemble(address, count)?;
        Ok(listing.trim_end().to_string())
    }

    fn cmd_mem(&mut self, args: &[&str]) -> Result<String, CommandError> {
        let address = require_address(args, "mem <addr> [len]")?;
        let count = match args.get(1).copied() {
            Some(word) => parse_count(word)?,
            None => self.config.dump.mem_length,
        };
        let block = self.session.read_memory(address, count)?;
        Ok(format_memory_dump(&block))
    }
}

/// Parse an address: `$c000`, `0xc000`, or bare hex digits.
fn parse_address(word: &str) -> Result<u16, CommandError> {
    let digits = word
        .strip_prefix("0x")
        .or_else(|| word.strip_prefix("0X"))
        .or_else(|| word.strip_prefix('$'))
        .unwrap_or(word);
    u16::from_str_radix(digits, 16)
        .map_err(|_| CommandError::Usage(format!("bad address: {}", word)))
}

/// Parse a count: decimal by default, hex with a `$` or `0x` prefix.
fn parse_count(word: &str) -> Result<u16, CommandError> {
    let (digits, radix) = match word
        .strip_prefix("0x")
        .or_else(|| word.strip_prefix("0X"))
        .or_else(|| word.strip_prefix('$'))
    {
        Some(hex) => (hex, 16),
        None => (word, 10),
    };
    u16::from_str_radix(digits, radix)
        .map_err(|_| CommandError::Usage(format!("bad count: {}", word)))
}

fn require_address(args: &[&str], usage: &str) -> Result<u16, CommandError> {
    match args.first().copied() {
        Some(word) => parse_address(word),
        None => Err(CommandError::Usage(format!("usage: {}", usage))),
    }
}

/// One-line register summary: hex registers, named flags, cycle count.
fn render_registers(regs: &RegisterSnapshot) -> String {
    let flags = regs.flags();
    let flag_field = if flags.is_empty() {
        "-".to_string()
    } else {
        flags
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        "PC={:04x} A={:02x} X={:02x} Y={:02x} SP={:02x} SR={:02x} [{}] clk={}",
        regs.program_counter,
        regs.accumulator,
        regs.x,
        regs.y,
        regs.stack_pointer,
        regs.status,
        flag_field,
        regs.clock_count(),
    )
}

fn render_breakpoints(list: &BreakpointList) -> String {
    if list.is_empty() {
        return "no breakpoints set".to_string();
    }
    let mut lines = Vec::new();
    for addr in &list.instruction {
        lines.push(format!("  instruction  {:04x}", addr));
    }
    for addr in &list.memory_access {
        lines.push(format!("  mem access   {:04x}", addr));
    }
    lines.join("\n")
}
