//! Command line arguments and their resolution into run settings
//!
//! Values come from three layers: command line, TOML config file, built-in
//! defaults. The command line is parsed first; config values only fill what
//! the command line left unset (see `config.rs`); `resolve` applies defaults
//! and validates the result.

use crate::core::validation::{validate_item_id, validate_positive_int, ValidationError};
use crate::harvest::types::{HarvestSettings, DEFAULT_CONCURRENCY_CAP, DEFAULT_ERROR_THRESHOLD};
use crate::remote::recorder::{RecorderSettings, DEFAULT_FIELDS, DEFAULT_WALL_LIMIT};
use crate::remote::vk::{VkSettings, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::sink::format::RecordFormat;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "vkfetch")]
#[command(about = "Fetch VK user profiles and walls concurrently across many access tokens")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// File with one access token per line
    #[arg(short = 't', long = "tokens-path", value_name = "FILE")]
    pub tokens_path: Option<PathBuf>,

    /// User ids to fetch*
    #[arg(
        short = 'u',
        long = "user-ids",
        value_name = "IDS",
        value_delimiter = ',',
        value_parser = validate_item_id,
        action = ArgAction::Append,
        conflicts_with = "user_ids_path"
    )]
    pub user_ids: Vec<String>,

    /// File with one user id per line
    #[arg(short = 'i', long = "user-ids-path", value_name = "FILE")]
    pub user_ids_path: Option<PathBuf>,

    /// File the fetched records are appended to
    #[arg(short = 'o', long = "output-path", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Maximum simultaneous API requests across all tokens [default: 10]
    #[arg(short = 'n', long = "concurrency", value_name = "N", value_parser = validate_positive_int)]
    pub concurrency: Option<usize>,

    /// Failed attempts after which a token is abandoned [default: 10]
    #[arg(short = 'e', long = "error-threshold", value_name = "N", value_parser = validate_positive_int)]
    pub error_threshold: Option<usize>,

    /// Profile fields requested from users.get
    #[arg(long = "fields", value_name = "LIST")]
    pub fields: Option<String>,

    /// Number of wall posts requested per user [default: 10]
    #[arg(long = "wall-limit", value_name = "N", value_parser = validate_positive_int)]
    pub wall_limit: Option<usize>,

    /// Output record format [default: text]
    #[arg(long = "output-format", value_name = "FORMAT", value_parser = ["text", "json"])]
    pub output_format: Option<String>,

    /// API base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// API version sent with each request
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<String>,

    /// Per-request timeout in seconds, 0 disables [default: 30]
    #[arg(long = "request-timeout", value_name = "SECONDS")]
    pub request_timeout: Option<u64>,

    /// Exit with status 2 when some users could not be processed
    #[arg(long = "fail-on-partial")]
    pub fail_on_partial: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Force colored log output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// More output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Less output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,
}

/// Where the user ids come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
    Inline(Vec<String>),
    File(PathBuf),
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub tokens_path: PathBuf,
    pub items: ItemSource,
    pub output_path: PathBuf,
    pub harvest: HarvestSettings,
    pub recorder: RecorderSettings,
    pub vk: VkSettings,
    pub fail_on_partial: bool,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether log lines should carry color codes
    pub fn use_color(&self, is_terminal: bool) -> bool {
        (self.color || is_terminal) && !self.no_color
    }

    /// Apply defaults and check that the combination is usable
    pub fn resolve(&self) -> Result<RunConfig, ValidationError> {
        let tokens_path = self.tokens_path.clone().ok_or_else(|| {
            ValidationError::new("--tokens-path is required (or 'tokens-path' in the config file)")
        })?;
        let output_path = self.output_path.clone().ok_or_else(|| {
            ValidationError::new("--output-path is required (or 'output-path' in the config file)")
        })?;

        let items = match (&self.user_ids_path, self.user_ids.is_empty()) {
            (Some(_), false) => {
                return Err(ValidationError::new(
                    "--user-ids and --user-ids-path cannot be used together",
                ))
            }
            (Some(path), true) => ItemSource::File(path.clone()),
            (None, false) => ItemSource::Inline(self.user_ids.clone()),
            (None, true) => {
                return Err(ValidationError::new(
                    "one of --user-ids or --user-ids-path is required",
                ))
            }
        };

        let harvest = HarvestSettings {
            concurrency_cap: self.concurrency.unwrap_or(DEFAULT_CONCURRENCY_CAP),
            error_threshold: self.error_threshold.unwrap_or(DEFAULT_ERROR_THRESHOLD),
        };
        harvest
            .validate()
            .map_err(|e| ValidationError::new(e.to_string()))?;

        let format = match &self.output_format {
            Some(name) => name.parse::<RecordFormat>().map_err(ValidationError::new)?,
            None => RecordFormat::default(),
        };
        let recorder = RecorderSettings {
            fields: self
                .fields
                .clone()
                .unwrap_or_else(|| DEFAULT_FIELDS.to_string()),
            wall_limit: self.wall_limit.unwrap_or(DEFAULT_WALL_LIMIT),
            format,
        };

        let timeout_secs = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        let vk = VkSettings {
            api_url: self
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_version: self
                .api_version
                .clone()
                .unwrap_or_else(|| crate::core::version::vk_api_version().to_string()),
            request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        };

        Ok(RunConfig {
            tokens_path,
            items,
            output_path,
            harvest,
            recorder,
            vk,
            fail_on_partial: self.fail_on_partial,
        })
    }
}
