use std::time::Duration;

use thiserror::Error;

/// Time between two generations
pub const TICK: Duration = Duration::from_millis(500);

/// How long the last frame stays up once the population dies out
pub const LINGER: Duration = Duration::from_secs(5);

/// Side of a cell, in braille dots
pub const CELL_SIZE: usize = 4;

/// Largest accepted cell side, in braille dots
pub const MAX_CELL_SIZE: usize = 16;

pub const TICK_VAR: &str = "LIFE_TICK_MS";
pub const LINGER_VAR: &str = "LIFE_LINGER_MS";
pub const CELL_SIZE_VAR: &str = "LIFE_CELL_SIZE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number, got \"{value}\"")]
    NotANumber { var: &'static str, value: String },

    #[error("{var} must be at least 1")]
    Zero { var: &'static str },

    #[error("{var} must be at most {max}, got {value}")]
    TooLarge {
        var: &'static str,
        max: u64,
        value: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tick: Duration,
    pub linger: Duration,
    pub cell_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: TICK,
            linger: LINGER,
            cell_size: CELL_SIZE,
        }
    }
}

impl Config {
    /// Defaults, overridden by `LIFE_TICK_MS`, `LIFE_LINGER_MS` and `LIFE_CELL_SIZE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = read_number(&lookup, TICK_VAR)? {
            config.tick = Duration::from_millis(ms);
        }

        if let Some(ms) = read_number(&lookup, LINGER_VAR)? {
            config.linger = Duration::from_millis(ms);
        }

        if let Some(size) = read_number(&lookup, CELL_SIZE_VAR)? {
            if size == 0 {
                return Err(ConfigError::Zero { var: CELL_SIZE_VAR });
            }

            let max = MAX_CELL_SIZE as u64;
            if size > max {
                return Err(ConfigError::TooLarge {
                    var: CELL_SIZE_VAR,
                    max,
                    value: size,
                });
            }

            config.cell_size = size as usize;
        }

        Ok(config)
    }
}

fn read_number<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    match value.trim().parse() {
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(ConfigError::NotANumber { var, value }),
    }
}
