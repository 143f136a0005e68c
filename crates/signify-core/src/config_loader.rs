//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. An explicit path (the CLI `--config` flag).
//! 2. `SIGNIFY_CONFIG` environment variable.
//! 3. `./signify.json` in the working directory.
//! 4. `~/.signify/config.json`
//! 5. If none found, defaults (equivalent to an empty JSON object).
//!
//! JSON keys are normalized from camelCase to snake_case before
//! deserializing, so files written for the browser extension load as-is.
//! After deserializing, `PORT` and `SIGNIFY_PUBLIC_URL` / `BACKEND_URL`
//! override the server section.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use signify_types::{Config, Result, SignifyError};

pub const CONFIG_ENV_VAR: &str = "SIGNIFY_CONFIG";
pub const LOCAL_CONFIG_FILE: &str = "signify.json";

/// Read access to environment variables.
pub trait Environment {
    fn get_var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn get_var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Discover the config file path using the fallback chain.
///
/// Explicit and environment-provided paths are returned without an
/// existence check; the working-directory and home candidates are only
/// returned when the file exists.
pub fn discover_config_path(
    explicit: Option<&Path>,
    env: &dyn Environment,
    cwd: Option<&Path>,
    home_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(env_path) = env.get_var(CONFIG_ENV_VAR).filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(env_path));
    }

    if let Some(local) = cwd.map(|dir| dir.join(LOCAL_CONFIG_FILE)) {
        if local.is_file() {
            return Some(local);
        }
    }

    if let Some(home) = home_dir {
        let home_path = home.join(".signify").join("config.json");
        if home_path.is_file() {
            return Some(home_path);
        }
    }

    None
}

/// Load the configuration from the process environment and filesystem.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().ok();
    let home = dirs::home_dir();
    load_config_with(explicit, &ProcessEnv, cwd.as_deref(), home.as_deref())
}

/// [`load_config`] with injectable environment and directories.
pub fn load_config_with(
    explicit: Option<&Path>,
    env: &dyn Environment,
    cwd: Option<&Path>,
    home_dir: Option<&Path>,
) -> Result<Config> {
    let raw = match discover_config_path(explicit, env, cwd, home_dir) {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "loading config file");
            let contents = std::fs::read_to_string(&path)?;
            let value: Value = serde_json::from_str(&contents)?;
            info!(path = %path.display(), "config loaded");
            value
        }
        Some(path) if explicit.is_some() => {
            return Err(SignifyError::ConfigInvalid {
                reason: format!("config file {} does not exist", path.display()),
            });
        }
        Some(path) => {
            warn!(path = %path.display(), "config path does not exist, using defaults");
            Value::Object(serde_json::Map::new())
        }
        None => {
            info!("no config file found, using defaults");
            Value::Object(serde_json::Map::new())
        }
    };

    let mut config: Config = serde_json::from_value(normalize_keys(raw))?;
    apply_env_overrides(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

/// Apply `PORT` and public URL overrides from the environment.
pub fn apply_env_overrides(config: &mut Config, env: &dyn Environment) -> Result<()> {
    if let Some(port) = env.get_var("PORT") {
        config.server.port = port.trim().parse().map_err(|_| SignifyError::ConfigInvalid {
            reason: format!("PORT must be a port number, got '{port}'"),
        })?;
    }

    let public_url = env
        .get_var("SIGNIFY_PUBLIC_URL")
        .or_else(|| env.get_var("BACKEND_URL"))
        .filter(|url| !url.trim().is_empty());
    if let Some(url) = public_url {
        config.server.public_url = Some(url);
    }
    Ok(())
}

/// Maps whose keys are data (caption words), not field names. Their keys
/// are kept verbatim.
const VERBATIM_KEY_MAPS: &[&str] = &["fallback_clips"];

/// Convert camelCase JSON keys to snake_case recursively.
///
/// Children of [`VERBATIM_KEY_MAPS`] entries are left untouched.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| {
                    let key = camel_to_snake(&key);
                    if VERBATIM_KEY_MAPS.contains(&key.as_str()) {
                        (key, val)
                    } else {
                        (key, normalize_keys(val))
                    }
                })
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert a single camelCase string to snake_case.
///
/// A run of uppercase letters is kept together, with an underscore
/// inserted before its last letter when a lowercase letter follows
/// (`"publicURL"` → `"public_url"`, `"HTMLParser"` → `"html_parser"`).
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next.is_some_and(|c| c.is_lowercase()))
            {
                result.push('_');
            }
        }
        result.extend(ch.to_lowercase());
    }
    result
}
