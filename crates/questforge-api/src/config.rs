//! Runtime configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use questforge_session::domain::config::TurnConfig;

use crate::error::AppError;

/// Server and turn-processing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Port to bind (`PORT`, default `3000`).
    pub port: u16,
    /// Fixed RNG seed (`QUESTFORGE_RNG_SEED`); OS-seeded when absent.
    pub rng_seed: Option<u64>,
    /// Bound on one narrator call (`QUESTFORGE_NARRATOR_TIMEOUT_SECS`, default 15).
    pub narrator_timeout: Duration,
    /// `QUESTFORGE_AUTO_ENEMY_TURN`, default `true`.
    pub auto_enemy_turn: bool,
    /// `QUESTFORGE_LEGACY_TAGS`, default `false`.
    pub legacy_tags: bool,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };
        let rng_seed = lookup("QUESTFORGE_RNG_SEED")
            .map(|raw| {
                raw.parse().map_err(|e| {
                    AppError::Config(format!("QUESTFORGE_RNG_SEED must be a valid u64: {e}"))
                })
            })
            .transpose()?;
        let timeout_secs: u64 = match lookup("QUESTFORGE_NARRATOR_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::Config(format!(
                    "QUESTFORGE_NARRATOR_TIMEOUT_SECS must be a whole number of seconds: {e}"
                ))
            })?,
            None => 15,
        };
        let auto_enemy_turn = flag(&lookup, "QUESTFORGE_AUTO_ENEMY_TURN", true)?;
        let legacy_tags = flag(&lookup, "QUESTFORGE_LEGACY_TAGS", false)?;

        Ok(Self {
            host,
            port,
            rng_seed,
            narrator_timeout: Duration::from_secs(timeout_secs),
            auto_enemy_turn,
            legacy_tags,
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Turn-processing switches derived from this configuration.
    #[must_use]
    pub fn turn_config(&self) -> TurnConfig {
        TurnConfig {
            auto_enemy_turn: self.auto_enemy_turn,
            legacy_tags: self.legacy_tags,
            narrator_timeout: self.narrator_timeout,
        }
    }
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, AppError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!("{key} must be true or false, got {raw:?}"))),
    }
}
