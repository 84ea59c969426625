//! Runtime configuration, loaded from `NEXTPEN_*` environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;
pub const DEFAULT_PENCIL_WIDTH: f64 = 10.0;
pub const DEFAULT_ERASER_WIDTH: f64 = 10.0;
pub const DEFAULT_EVALUATOR_QUEUE: usize = 256;
pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid value")]
    Invalid { key: &'static str, value: String },
    #[error("{key}={value:?} must be greater than zero")]
    NotPositive { key: &'static str, value: String },
}

/// Settings for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub pencil_width: f64,
    pub eraser_width: f64,
    /// Capacity of the evaluator's request queue.
    pub evaluator_queue: usize,
    /// How long to wait for outstanding verdicts before giving up.
    pub settle_timeout: Duration,
    /// Session script to replay; the built-in demo runs when unset.
    pub script: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            pencil_width: DEFAULT_PENCIL_WIDTH,
            eraser_width: DEFAULT_ERASER_WIDTH,
            evaluator_queue: DEFAULT_EVALUATOR_QUEUE,
            settle_timeout: Duration::from_millis(DEFAULT_SETTLE_TIMEOUT_MS),
            script: None,
        }
    }
}

impl AppConfig {
    /// Read the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable does not parse or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    /// Build a config from an arbitrary key lookup. Unset keys take their
    /// defaults; set keys must parse.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            canvas_width: length(&lookup, "NEXTPEN_CANVAS_WIDTH", DEFAULT_CANVAS_WIDTH)?,
            canvas_height: length(&lookup, "NEXTPEN_CANVAS_HEIGHT", DEFAULT_CANVAS_HEIGHT)?,
            pencil_width: length(&lookup, "NEXTPEN_PENCIL_WIDTH", DEFAULT_PENCIL_WIDTH)?,
            eraser_width: length(&lookup, "NEXTPEN_ERASER_WIDTH", DEFAULT_ERASER_WIDTH)?,
            evaluator_queue: positive(&lookup, "NEXTPEN_EVALUATOR_QUEUE", DEFAULT_EVALUATOR_QUEUE)?,
            settle_timeout: Duration::from_millis(parse(
                &lookup,
                "NEXTPEN_SETTLE_TIMEOUT_MS",
                DEFAULT_SETTLE_TIMEOUT_MS,
            )?),
            script: lookup("NEXTPEN_SCRIPT").filter(|s| !s.is_empty()).map(PathBuf::from),
        })
    }
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
    }
}

fn parse<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn positive<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    F: Fn(&str) -> Option<String>,
{
    let value = parse(lookup, key, default)?;
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { key, value: lookup(key).unwrap_or_default() })
    }
}

/// A canvas or brush size: finite and greater than zero.
fn length<F>(lookup: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: f64 = parse(lookup, key, default)?;
    if !value.is_finite() {
        return Err(ConfigError::Invalid { key, value: lookup(key).unwrap_or_default() });
    }
    positive(lookup, key, default)
}
