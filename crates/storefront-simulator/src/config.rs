//! Simulator configuration, read once from the environment at startup.

use std::str::FromStr;
use std::time::Duration;

use storefront_dispatch::DispatchStrategy;

use crate::error::AppError;

const DEFAULT_EVENTS: u32 = 10;
const DEFAULT_DELAY_MS: u64 = 750;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable lines.
    Text,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "pretty" => Ok(Self::Text),
            other => Err(AppError::Config(format!(
                "LOG_FORMAT must be 'json' or 'text', got '{other}'"
            ))),
        }
    }
}

/// Everything the simulator binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Routing strategy used by the dispatcher.
    pub strategy: DispatchStrategy,
    /// Number of simulation ticks.
    pub events: u32,
    /// Pause after each tick.
    pub delay: Duration,
    /// Seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            strategy: DispatchStrategy::default(),
            events: DEFAULT_EVENTS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            seed: None,
            log_format: LogFormat::default(),
        }
    }
}

impl SimulatorConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; unset keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let strategy = match lookup("DISPATCH_STRATEGY") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("DISPATCH_STRATEGY: {e}")))?,
            None => defaults.strategy,
        };
        let events = parse_or("SIMULATION_EVENTS", &lookup, defaults.events)?;
        let delay_ms = parse_or("SIMULATION_DELAY_MS", &lookup, DEFAULT_DELAY_MS)?;
        let seed = lookup("SIMULATION_SEED")
            .map(|raw| parse_value::<u64>("SIMULATION_SEED", &raw))
            .transpose()?;
        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            strategy,
            events,
            delay: Duration::from_millis(delay_ms),
            seed,
            log_format,
        })
    }
}

fn parse_or<T>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key} must be a non-negative integer: {e}")))
}
