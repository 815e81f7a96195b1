//! # App Token CLI
//!
//! Command-line interface that prints a signed GitHub App JWT.
//!
//! The key path and App ID come from flags or from the `GITHUB_APP_KEY_PATH`
//! and `GITHUB_APP_ID` environment variables. Token timing can be tuned
//! through an optional settings file, `APP_TOKEN__*` environment variables
//! or flags. Standard output carries only the token; diagnostics and logs go
//! to standard error.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use app_token_core::claims::{DEFAULT_CLOCK_SKEW_SECONDS, DEFAULT_LIFETIME_SECONDS};
use app_token_core::{
    issue_token, ConfigurationError, IssueError, IssuerConfig, Token, TokenTiming,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Prefix for settings supplied through the environment,
/// e.g. `APP_TOKEN__TIMING__LIFETIME_SECONDS=300`.
pub const SETTINGS_ENV_PREFIX: &str = "APP_TOKEN";

// ============================================================================
// CLI Structure
// ============================================================================

/// Print a signed JWT for GitHub App authentication
#[derive(Parser, Debug)]
#[command(name = "app-token")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Print a signed JWT for GitHub App authentication")]
#[command(
    long_about = "Reads a GitHub App private key, signs a short-lived RS256 JWT with the App ID \
                  as issuer and prints it on standard output"
)]
pub struct Cli {
    /// Path to the GitHub App private key (PEM)
    #[arg(short, long, env = "GITHUB_APP_KEY_PATH")]
    pub key_path: Option<PathBuf>,

    /// GitHub App ID, placed in the `iss` claim
    #[arg(short, long, env = "GITHUB_APP_ID")]
    pub app_id: Option<String>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long, env = "APP_TOKEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seconds to backdate the `iat` claim by
    #[arg(long)]
    pub clock_skew_seconds: Option<i64>,

    /// Seconds until the token expires (max 600)
    #[arg(long)]
    pub lifetime_seconds: Option<i64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Logging level, used when RUST_LOG is not set
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    /// The bare token
    Text,
    /// The token with its issue and expiry times
    Json,
}

// ============================================================================
// CLI Error Types
// ============================================================================

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error(transparent)]
    Issue(#[from] IssueError),

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Failed to write token: {0}")]
    Output(#[from] std::io::Error),

    #[error("Logging initialization failed: {message}")]
    Logging { message: String },
}

impl From<ConfigurationError> for CliError {
    fn from(e: ConfigurationError) -> Self {
        Self::Issue(IssueError::Configuration(e))
    }
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Logging { .. } | Self::Render(_) => 1,
            Self::Settings(_) => 2,
            Self::Issue(IssueError::Configuration(_)) => 2,
            Self::Issue(IssueError::KeyLoad(_)) => 3,
            Self::Issue(IssueError::Signing(_)) => 4,
            Self::Output(_) => 5,
        }
    }
}

// ============================================================================
// Configuration Types
// ============================================================================

/// Settings loaded from the optional file and `APP_TOKEN__*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Settings {
    pub timing: TimingSettings,
}

/// Token timing settings, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct TimingSettings {
    pub clock_skew_seconds: i64,
    pub lifetime_seconds: i64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            clock_skew_seconds: DEFAULT_CLOCK_SKEW_SECONDS,
            lifetime_seconds: DEFAULT_LIFETIME_SECONDS,
        }
    }
}

impl Settings {
    /// Apply command-line overrides on top of the loaded settings.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(skew) = cli.clock_skew_seconds {
            self.timing.clock_skew_seconds = skew;
        }
        if let Some(lifetime) = cli.lifetime_seconds {
            self.timing.lifetime_seconds = lifetime;
        }
        self
    }

    /// Validate the timing settings.
    pub fn token_timing(&self) -> Result<TokenTiming, ConfigurationError> {
        TokenTiming::new(
            self.timing.clock_skew_seconds,
            self.timing.lifetime_seconds,
        )
    }
}

/// Load settings from `path` (if given) and the process environment.
///
/// Later sources override earlier ones:
///  1. Built-in defaults
///  2. The settings file, format chosen by its extension
///  3. Environment variables prefixed `APP_TOKEN__` (double-underscore separator)
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    load_settings_with_env(path, None)
}

/// Like [`load_settings`], reading variables from `env` instead of the
/// process environment when it is `Some`.
pub fn load_settings_with_env(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<Settings, CliError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        debug!(path = %path.display(), "Loading settings file");
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(SETTINGS_ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    Ok(settings)
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, serde::Serialize)]
struct TokenOutput<'a> {
    token: &'a str,
    issuer: &'a str,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

/// Render `token` for standard output, without a trailing newline.
pub fn render_token(token: &Token, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(token.as_str().to_string()),
        OutputFormat::Json => Ok(serde_json::to_string(&TokenOutput {
            token: token.as_str(),
            issuer: token.issuer(),
            issued_at: token.issued_at(),
            expires_at: token.expires_at(),
        })?),
    }
}

/// Write `output` and a newline to standard output.
pub fn write_output(output: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output)?;
    stdout.flush()?;
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Initialize logging to standard error.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn initialize_logging(level: &str, json: bool) -> Result<(), CliError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| CliError::Logging {
            message: format!("invalid log level '{}': {}", level, e),
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}

/// Validate the inputs, issue a token and render it.
///
/// The App ID and key path are checked before any settings file or key
/// file is read.
pub fn run(cli: &Cli) -> Result<String, CliError> {
    let config = IssuerConfig::from_parts(cli.key_path.clone(), cli.app_id.clone())?;

    let settings = load_settings(cli.config.as_deref())?.with_overrides(cli);
    let timing = settings.token_timing()?;
    info!(
        issuer = %config.issuer_id(),
        key_path = %config.key_path().display(),
        clock_skew_seconds = timing.clock_skew().num_seconds(),
        lifetime_seconds = timing.lifetime().num_seconds(),
        "Issuing GitHub App JWT"
    );

    let token = issue_token(&config.with_timing(timing))?;
    render_token(&token, cli.format)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
