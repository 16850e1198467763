//! TOML configuration file loading
//!
//! Keys are the long option names (`tokens-path`, `concurrency`, ...).
//! Config values only fill options the command line left unset.

use super::args::Args;
use crate::core::validation::{validate_item_id, validate_positive_toml, ValidationError};
use std::path::{Path, PathBuf};

const KNOWN_KEYS: &[&str] = &[
    "tokens-path",
    "user-ids",
    "user-ids-path",
    "output-path",
    "concurrency",
    "error-threshold",
    "fields",
    "wall-limit",
    "output-format",
    "api-url",
    "api-version",
    "request-timeout",
    "fail-on-partial",
    "log-level",
    "log-file",
    "log-format",
    "color",
    "no-color",
];

/// Default config location: `<config_dir>/Vkfetch/vkfetch.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Vkfetch").join("vkfetch.toml"))
}

/// Read and parse the config file
///
/// An explicitly named file must exist. Without one, the default location is
/// used when present and silently skipped otherwise.
pub async fn load_config_file(
    config_file: Option<&Path>,
) -> Result<Option<(PathBuf, toml::Table)>, ValidationError> {
    let path = match config_file {
        Some(path) if !path.exists() => {
            return Err(ValidationError::new(format!(
                "The specified configuration file does not exist: {}",
                path.display()
            )))
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
        ValidationError::new(format!(
            "Error reading configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    let table = toml::from_str::<toml::Table>(&contents).map_err(|e| {
        ValidationError::new(format!(
            "Error parsing configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(Some((path, table)))
}

impl Args {
    /// Apply TOML configuration values to Args
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> Result<(), ValidationError> {
        if let Some(unknown) = config.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            return Err(ValidationError::new(format!(
                "unknown configuration key '{}'",
                unknown
            )));
        }

        let cli_has_items = !args.user_ids.is_empty() || args.user_ids_path.is_some();

        fill_path(config, "tokens-path", &mut args.tokens_path)?;
        fill_path(config, "output-path", &mut args.output_path)?;
        fill_path(config, "log-file", &mut args.log_file)?;

        if !cli_has_items {
            if let Some(value) = config.get("user-ids") {
                args.user_ids = parse_user_ids(value)?;
            }
            fill_path(config, "user-ids-path", &mut args.user_ids_path)?;
        }

        fill_positive(config, "concurrency", &mut args.concurrency)?;
        fill_positive(config, "error-threshold", &mut args.error_threshold)?;
        fill_positive(config, "wall-limit", &mut args.wall_limit)?;

        if args.fields.is_none() {
            if let Some(value) = config.get("fields") {
                args.fields = Some(parse_fields(value)?);
            }
        }

        fill_choice(config, "output-format", &["text", "json"], &mut args.output_format)?;
        fill_choice(
            config,
            "log-level",
            &["trace", "debug", "info", "warn", "error", "off"],
            &mut args.log_level,
        )?;
        fill_choice(config, "log-format", &["text", "ext", "json"], &mut args.log_format)?;
        fill_string(config, "api-url", &mut args.api_url)?;
        fill_string(config, "api-version", &mut args.api_version)?;

        if args.request_timeout.is_none() {
            if let Some(value) = config.get("request-timeout") {
                let secs = value
                    .as_integer()
                    .and_then(|n| u64::try_from(n).ok())
                    .ok_or_else(|| {
                        ValidationError::new(
                            "'request-timeout' must be a non-negative integer number of seconds",
                        )
                    })?;
                args.request_timeout = Some(secs);
            }
        }

        if get_bool(config, "fail-on-partial")? == Some(true) {
            args.fail_on_partial = true;
        }
        // Command line color flags win over the config file
        if !args.color && !args.no_color {
            args.color = get_bool(config, "color")? == Some(true);
            args.no_color = get_bool(config, "no-color")? == Some(true);
        }

        Ok(())
    }
}

fn get_str<'a>(config: &'a toml::Table, key: &str) -> Result<Option<&'a str>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value.as_str().map(Some).ok_or_else(|| {
            ValidationError::new(format!("'{}' must be a string, got {}", key, value.type_str()))
        }),
    }
}

fn get_bool(config: &toml::Table, key: &str) -> Result<Option<bool>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value.as_bool().map(Some).ok_or_else(|| {
            ValidationError::new(format!("'{}' must be a boolean, got {}", key, value.type_str()))
        }),
    }
}

fn fill_string(
    config: &toml::Table,
    key: &str,
    target: &mut Option<String>,
) -> Result<(), ValidationError> {
    if target.is_none() {
        *target = get_str(config, key)?.map(str::to_string);
    }
    Ok(())
}

fn fill_path(
    config: &toml::Table,
    key: &str,
    target: &mut Option<PathBuf>,
) -> Result<(), ValidationError> {
    if target.is_none() {
        *target = get_str(config, key)?.map(PathBuf::from);
    }
    Ok(())
}

fn fill_positive(
    config: &toml::Table,
    key: &str,
    target: &mut Option<usize>,
) -> Result<(), ValidationError> {
    if target.is_none() {
        if let Some(value) = config.get(key) {
            *target = Some(validate_positive_toml(key, value)?);
        }
    }
    Ok(())
}

fn fill_choice(
    config: &toml::Table,
    key: &str,
    choices: &[&str],
    target: &mut Option<String>,
) -> Result<(), ValidationError> {
    if target.is_some() {
        return Ok(());
    }
    if let Some(value) = get_str(config, key)? {
        if !choices.contains(&value) {
            return Err(ValidationError::new(format!(
                "'{}' must be one of {}, got '{}'",
                key,
                choices.join(", "),
                value
            )));
        }
        *target = Some(value.to_string());
    }
    Ok(())
}

/// `user-ids` accepts `"1,2,3"`, `42`, or an array of strings and integers
fn parse_user_ids(value: &toml::Value) -> Result<Vec<String>, ValidationError> {
    let raw: Vec<String> = match value {
        toml::Value::String(s) => s.split(',').map(str::to_string).collect(),
        toml::Value::Integer(n) => vec![n.to_string()],
        toml::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                toml::Value::String(s) => Ok(s.clone()),
                toml::Value::Integer(n) => Ok(n.to_string()),
                other => Err(ValidationError::new(format!(
                    "'user-ids' entries must be strings or integers, got {}",
                    other.type_str()
                ))),
            })
            .collect::<Result<_, _>>()?,
        other => {
            return Err(ValidationError::new(format!(
                "'user-ids' must be a string, integer or array, got {}",
                other.type_str()
            )))
        }
    };
    raw.iter()
        .map(|id| validate_item_id(id).map_err(ValidationError::new))
        .collect()
}

/// `fields` accepts `"a,b"` or `["a", "b"]`
fn parse_fields(value: &toml::Value) -> Result<String, ValidationError> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ValidationError::new("'fields' entries must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|fields| fields.join(",")),
        other => Err(ValidationError::new(format!(
            "'fields' must be a string or array of strings, got {}",
            other.type_str()
        ))),
    }
}
