//! mosdbg configuration.
//!
//! Loaded from a single TOML file; every setting has a default, so a
//! missing or comment-only file behaves like no file at all.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration loading or parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parsing failed.
    #[error("TOML parse error: {0}")]
    Parse(String),

    /// An I/O error occurred while reading or writing the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Log verbosity level.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug messages.
    Debug,
    /// Informational messages (default).
    #[default]
    Info,
    /// Warnings only.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// The filter directive `tracing_subscriber` understands.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Host dialed when none is given on the command line.
    #[serde(default = "default_host")]
    pub host: String,
    /// Debug port the emulator listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-response timeout in seconds; 0 waits forever.
    ///
    /// `continue` blocks until the emulator halts again, so a timeout
    /// only suits scripted use where a hang must not wedge the caller.
    #[serde(default)]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6502
}

impl ConnectConfig {
    /// The configured response timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: 0,
        }
    }
}

/// Memory dump settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Bytes fetched by `mem` when no length is given.
    #[serde(default = "default_mem_length")]
    pub mem_length: u16,
}

fn default_mem_length() -> u16 {
    0x100
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            mem_length: default_mem_length(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log verbosity level.
    #[serde(default)]
    pub level: LogLevel,
    /// Optional path to a log file.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
        }
    }
}

/// Top-level mosdbg configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings.
    #[serde(default)]
    pub connect: ConnectConfig,
    /// Memory dump settings.
    #[serde(default)]
    pub dump: DumpConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Content written into a newly-created default config file.
const DEFAULT_CONFIG_CONTENT: &str = r#"# mosdbg configuration
# Uncomment and edit settings below to override defaults.

# [connect]
# host = "localhost"
# port = 6502
# timeout_secs = 0

# [dump]
# mem_length = 256

# [log]
# level = "info"
# file = "mosdbg.log"
"#;

/// Load configuration from `path`.
///
/// If the file does not exist it is created with commented-out
/// defaults and the default configuration is returned.
///
/// # Errors
///
/// Returns [`ConfigError`] on I/O or parse failure.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, DEFAULT_CONFIG_CONTENT)?;
        tracing::info!("Created default config at {}", path.display());
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

/// Parse a TOML string directly into a [`Config`].
///
/// Useful for tests or one-off parsing without file I/O.
pub fn load_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = Config::default();
        assert_eq!(cfg.connect.host, "localhost");
        assert_eq!(cfg.connect.port, 6502);
        assert_eq!(cfg.connect.timeout_secs, 0);
        assert!(cfg.connect.timeout().is_none());
        assert_eq!(cfg.dump.mem_length, 0x100);
        assert_eq!(cfg.log.level, LogLevel::Info);
        assert!(cfg.log.file.is_none());
    }

    #[test]
    fn parse_from_toml_string() {
        let input = r#"
[connect]
host = "192.168.1.20"
port = 4321
timeout_secs = 5

[dump]
mem_length = 64

[log]
level = "debug"
"#;
        let cfg = load_from_str(input).expect("parse toml");
        assert_eq!(cfg.connect.host, "192.168.1.20");
        assert_eq!(cfg.connect.port, 4321);
        assert_eq!(cfg.connect.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.dump.mem_length, 64);
        assert_eq!(cfg.log.level, LogLevel::Debug);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = load_from_str("[connect]\nport = 9000\n").unwrap();
        assert_eq!(cfg.connect.port, 9000);
        // Unspecified fields keep defaults via serde(default)
        assert_eq!(cfg.connect.host, "localhost");
        assert_eq!(cfg.dump.mem_length, 0x100);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = load_from_str("").expect("parse empty toml");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_str_rejects_invalid_toml() {
        assert!(matches!(
            load_from_str("{{bad}}"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_config_creates_default_when_missing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mosdbg").join("config.toml");

        let config = load_config(&path).unwrap();
        assert_eq!(config, Config::default());

        // File was created with the commented template
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# mosdbg configuration"));
        assert_eq!(load_from_str(&written).unwrap(), Config::default());
    }

    #[test]
    fn load_config_reads_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[connect]\nhost = \"emu-box\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.connect.host, "emu-box");
    }

    #[test]
    fn serde_roundtrip_preserves_values() {
        let cfg = Config {
            connect: ConnectConfig {
                host: "10.0.0.2".into(),
                port: 7000,
                timeout_secs: 30,
            },
            dump: DumpConfig { mem_length: 32 },
            log: LogConfig {
                level: LogLevel::Trace,
                file: Some(PathBuf::from("/tmp/mosdbg.log")),
            },
        };
        let toml_str = toml::to_string(&cfg).expect("serialize");
        let deserialized: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(cfg, deserialized);
    }
}
