//! mosdbg — interactive debug client for a 6502 emulator's TCP debug port.

mod config;
mod shell;

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, Config};
use crate::shell::Shell;

/// Where the config file lives when the user hasn't said otherwise.
fn default_config_path() -> Option<PathBuf> {
    let home = env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("mosdbg")
            .join("config.toml"),
    )
}

/// Set up tracing, load config, and run the shell against stdin/stdout.
fn run_shell(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = match env::var_os("MOSDBG_CONFIG")
        .map(PathBuf::from)
        .or_else(default_config_path)
    {
        Some(path) => load_config(&path).unwrap_or_else(|e| {
            error!("config load failed, using defaults: {}", e);
            Config::default()
        }),
        None => Config::default(),
    };

    // Direct tracing to a file so it never interleaves with the prompt.
    init_tracing(&config);
    info!("mosdbg starting");

    let mut shell = Shell::new(config.clone());
    if let Some(host) = host {
        let port = port.unwrap_or(config.connect.port);
        shell
            .connect(&host, port)
            .with_context(|| format!("failed to connect to {}:{}", host, port))?;
        println!("connected to {}:{}", host, port);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    shell.run(&mut stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

fn init_tracing(config: &Config) {
    let writer: Box<dyn Write + Send> = match &config.log.file {
        Some(path) => match std::fs::File::create(path) {
            Ok(file) => Box::new(file),
            Err(_) => Box::new(io::sink()),
        },
        None => Box::new(io::sink()),
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(writer))
        .with_ansi(false)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("usage: mosdbg [host [port]]");
        println!("Connects to a 6502 emulator's debug port; run 'help' at the prompt.");
        return;
    }
    let host = args.get(1).cloned();
    let port = match args.get(2) {
        Some(word) => match word.parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                eprintln!("mosdbg: bad port: {}", word);
                std::process::exit(1);
            }
        },
        None => None,
    };

    if let Err(e) = run_shell(host, port) {
        eprintln!("mosdbg: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_path_is_under_home() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(".config/mosdbg/config.toml"));
        }
    }
}
