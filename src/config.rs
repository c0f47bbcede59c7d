use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cpu::PRINT_ADDRESS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    Unbounded, // runs until BRK, however long that takes
    Sandboxed, // 1M instruction budget
}

impl Profile {
    pub fn get_config(&self) -> SimConfig {
        match self {
            Profile::Unbounded => SimConfig {
                print_address: PRINT_ADDRESS,
                max_steps: None,
                entry: None,
            },
            Profile::Sandboxed => SimConfig {
                print_address: PRINT_ADDRESS,
                max_steps: Some(1_000_000),
                entry: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// `JSR` target that prints the accumulator.
    pub print_address: u16,
    /// Instruction budget; `None` runs until BRK.
    pub max_steps: Option<u64>,
    /// Entry point; `None` starts at the program origin.
    pub entry: Option<u16>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Profile::Unbounded.get_config()
    }
}

/// On-disk form: an optional profile with field overrides on top.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    profile: Option<Profile>,
    print_address: Option<u16>,
    max_steps: Option<u64>,
    entry: Option<u16>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Failed to read config: {}", err),
            ConfigError::Parse(err) => write!(f, "Invalid config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl SimConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(text).map_err(ConfigError::Parse)?;

        let mut config = file.profile.unwrap_or(Profile::Unbounded).get_config();
        if let Some(print_address) = file.print_address {
            config.print_address = print_address;
        }
        if file.max_steps.is_some() {
            config.max_steps = file.max_steps;
        }
        if file.entry.is_some() {
            config.entry = file.entry;
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&text)
    }
}
