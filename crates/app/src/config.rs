//! Application configuration
//!
//! Every setting can come from a flag or the environment (a `.env` file is
//! honoured by the binary).

use std::path::PathBuf;

use clap::Args;

/// Marketplace API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Marketplace API base URL
    #[arg(
        long,
        env = "HAAT_API_URL",
        default_value = "http://localhost:5000/api",
        global = true
    )]
    pub api_url: String,

    /// Bearer token for authenticated calls
    #[arg(long, env = "HAAT_API_TOKEN", hide_env_values = true, global = true)]
    pub api_token: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(
        long,
        env = "HAAT_HTTP_TIMEOUT_MS",
        default_value_t = 10_000u64,
        global = true
    )]
    pub http_timeout_ms: u64,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "HAAT_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Everything the application needs to start.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Directory holding the locally persisted cart
    #[arg(long, env = "HAAT_STORAGE_DIR", default_value = ".haat", global = true)]
    pub storage_dir: PathBuf,

    /// Logging settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
