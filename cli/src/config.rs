use std::{env, str::FromStr};

pub const ROWS_VAR: &str = "MAZE_ROWS";
pub const COLS_VAR: &str = "MAZE_COLS";
pub const SEED_VAR: &str = "MAZE_SEED";
pub const MAX_TRIES_VAR: &str = "MAZE_MAX_TRIES";

pub const DEFAULT_ROWS: usize = 12;
pub const DEFAULT_COLS: usize = 20;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid number")]
    InvalidNumber { name: &'static str, value: String },
}

/// Values used when a flag is not given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Defaults {
    pub rows: usize,
    pub cols: usize,
    pub seed: Option<u64>,
    pub max_tries: Option<usize>,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            seed: None,
            max_tries: None,
        }
    }
}

impl Defaults {
    /// Reads `MAZE_*` variables, after loading a `.env` file if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let fallback = Defaults::default();

        Ok(Defaults {
            rows: parse_var(&lookup, ROWS_VAR)?.unwrap_or(fallback.rows),
            cols: parse_var(&lookup, COLS_VAR)?.unwrap_or(fallback.cols),
            seed: parse_var(&lookup, SEED_VAR)?,
            max_tries: parse_var(&lookup, MAX_TRIES_VAR)?,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}
