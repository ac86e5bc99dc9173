//! Tracing subscriber setup for processes hosting the token provider.
//!
//! The provider reports each rejected token as a `trace` event under the
//! `token_provider::jwt` target. Those events are off at the usual `info`
//! level, so the config can switch that target on by itself.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::parse_env;
use crate::error::TokenError;

/// Target prefix of the token issuance and validation events.
pub const TOKEN_EVENTS_TARGET: &str = "token_provider::jwt";

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Base level filter, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit the per-token `trace` events regardless of the base level
    pub trace_token_events: bool,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "token-provider".to_string(),
            log_level: "info".to_string(),
            trace_token_events: false,
            json_output: false,
        }
    }
}

impl TracingConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `SERVICE_NAME`, `LOG_LEVEL`, `LOG_FORMAT` (`json` or `text`) and
    /// `JWT_TRACE_TOKEN_EVENTS`.
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_TRACE_TOKEN_EVENTS` is not a boolean or
    /// `LOG_FORMAT` is not recognized.
    pub fn from_env() -> Result<Self, TokenError> {
        let defaults = Self::default();
        let format: String = parse_env("LOG_FORMAT", "text".to_string())?;
        let json_output = match format.as_str() {
            "json" => true,
            "text" => false,
            other => return Err(TokenError::config(format!("Invalid LOG_FORMAT: {other}"))),
        };

        Ok(Self {
            service_name: parse_env("SERVICE_NAME", defaults.service_name)?,
            log_level: parse_env("LOG_LEVEL", defaults.log_level)?,
            trace_token_events: parse_env("JWT_TRACE_TOKEN_EVENTS", false)?,
            json_output,
        })
    }

    /// Set the service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Set the base log level filter.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Emit the per-token `trace` events.
    #[must_use]
    pub const fn with_token_events(mut self) -> Self {
        self.trace_token_events = true;
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Filter directives built from this config.
    #[must_use]
    pub fn directives(&self) -> String {
        if self.trace_token_events {
            format!("{},{TOKEN_EVENTS_TARGET}=trace", self.log_level)
        } else {
            self.log_level.clone()
        }
    }

    /// `RUST_LOG` when set, otherwise [`Self::directives`].
    fn env_filter(&self) -> Result<EnvFilter, TokenError> {
        EnvFilter::try_from_default_env().or_else(|_| {
            EnvFilter::try_new(self.directives())
                .map_err(|e| TokenError::config(format!("Invalid log filter: {e}")))
        })
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter does not parse or a global subscriber is
/// already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TokenError> {
    let filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_output {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.map_err(|e| TokenError::config(format!("Tracing already initialized: {e}")))?;

    tracing::info!(
        service = %config.service_name,
        token_events = config.trace_token_events,
        "Tracing initialized"
    );
    Ok(())
}
