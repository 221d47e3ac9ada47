//! Configuration management for summzy.
//!
//! Parses `summzy.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `telegram.admin_user_ids` (string form)

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override maximum message length.
    pub max_message_length: Option<usize>,
    /// Override admin user IDs.
    pub admin_user_ids: Option<Vec<u64>>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "summzy.toml";

/// Default maximum message length, leaving headroom below the platform limit.
const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4000;

/// Accepted range for `telegram.max_message_length`.
const MIN_MESSAGE_LENGTH: usize = 1000;
const MAX_MESSAGE_LENGTH: usize = 4096;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Telegram configuration as written in TOML.
    telegram: TelegramConfigRaw,
    /// Per-user rate limiting of AI requests.
    pub throttle: ThrottleConfig,

    /// Resolved Telegram configuration (set after loading).
    #[serde(skip)]
    pub telegram_resolved: TelegramConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw Telegram configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TelegramConfigRaw {
    max_message_length: Option<usize>,
    admin_user_ids: Option<UserIdsRaw>,
}

/// Admin IDs as a TOML array or as a (possibly env-expanded) string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserIdsRaw {
    List(Vec<i64>),
    Text(String),
}

/// Resolved Telegram configuration.
#[derive(Debug)]
pub struct TelegramConfig {
    /// Maximum length of one outgoing message, in UTF-16 units.
    pub max_message_length: usize,
    /// Users exempt from throttling.
    pub admin_user_ids: Vec<u64>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            admin_user_ids: Vec::new(),
        }
    }
}

/// Sliding-window throttle for AI requests by non-admin users.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Requests allowed per window.
    pub limit: usize,
    /// Window length in seconds.
    pub window_secs: u64,
    /// Users tracked at once; the least recently active are forgotten first.
    pub max_tracked_users: usize,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            window_secs: 3600,
            max_tracked_users: 10_000,
        }
    }
}

impl ThrottleConfig {
    /// Window length as a duration.
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`telegram.admin_user_ids`").
        field: String,
        /// Error message (e.g., "${`TELEGRAM_USER_IDS`} not set").
        message: String,
    },
}

/// Parse a list of Telegram user IDs.
///
/// Accepts a comma-separated list (`"1, 2"`) or a JSON array (`"[1, 2]"`,
/// string items allowed). Duplicates are dropped, keeping the first
/// occurrence. Blank input yields an empty list.
///
/// # Errors
///
/// Returns `ConfigError::Validation` for malformed JSON or for any ID that is
/// not a positive integer.
///
/// # Example
///
/// ```
/// use summzy_config::parse_user_ids;
///
/// assert_eq!(parse_user_ids("42, 7, 42").unwrap(), vec![42, 7]);
/// assert_eq!(parse_user_ids("[\"5\", 6]").unwrap(), vec![5, 6]);
/// assert!(parse_user_ids("").unwrap().is_empty());
/// ```
pub fn parse_user_ids(raw: &str) -> Result<Vec<u64>, ConfigError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<String> = if value.starts_with('[') {
        let parsed: Vec<serde_json::Value> = serde_json::from_str(value).map_err(|err| {
            ConfigError::Validation(format!("user IDs must be a JSON array of user ids: {err}"))
        })?;
        parsed
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            })
            .collect()
    } else {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .collect()
    };

    let mut ids = Vec::with_capacity(items.len());
    for item in &items {
        push_unique(&mut ids, parse_one_id(item)?);
    }
    Ok(ids)
}

fn parse_one_id(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ConfigError::Validation(format!("Invalid Telegram user id: \"{raw}\"")))
}

fn push_unique(ids: &mut Vec<u64>, id: u64) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

impl UserIdsRaw {
    fn resolve(&self) -> Result<Vec<u64>, ConfigError> {
        match self {
            Self::Text(text) => parse_user_ids(text),
            Self::List(list) => {
                let mut ids = Vec::with_capacity(list.len());
                for &id in list {
                    let id = u64::try_from(id)
                        .ok()
                        .filter(|id| *id > 0)
                        .ok_or_else(|| {
                            ConfigError::Validation(format!("Invalid Telegram user id: \"{id}\""))
                        })?;
                    push_unique(&mut ids, id);
                }
                Ok(ids)
            }
        }
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `summzy.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated again
    /// after overrides.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value is out of range.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "Discovered config file");
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Whether `user_id` is a configured admin.
    #[must_use]
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.telegram_resolved.admin_user_ids.contains(&user_id)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(max_message_length) = settings.max_message_length {
            self.telegram_resolved.max_message_length = max_message_length;
        }
        if let Some(admin_user_ids) = &settings.admin_user_ids {
            self.telegram_resolved.admin_user_ids.clone_from(admin_user_ids);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.resolve()?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_telegram()?;
        self.validate_throttle()?;
        Ok(())
    }

    fn validate_telegram(&self) -> Result<(), ConfigError> {
        let length = self.telegram_resolved.max_message_length;
        if !(MIN_MESSAGE_LENGTH..=MAX_MESSAGE_LENGTH).contains(&length) {
            return Err(ConfigError::Validation(format!(
                "telegram.max_message_length must be between {MIN_MESSAGE_LENGTH} and {MAX_MESSAGE_LENGTH}, got {length}"
            )));
        }
        Ok(())
    }

    fn validate_throttle(&self) -> Result<(), ConfigError> {
        if self.throttle.limit == 0 {
            return Err(ConfigError::Validation(
                "throttle.limit must be greater than 0".to_owned(),
            ));
        }
        if self.throttle.window_secs == 0 {
            return Err(ConfigError::Validation(
                "throttle.window_secs must be greater than 0".to_owned(),
            ));
        }
        if self.throttle.max_tracked_users == 0 {
            return Err(ConfigError::Validation(
                "throttle.max_tracked_users must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(UserIdsRaw::Text(ref mut text)) = self.telegram.admin_user_ids {
            *text = expand::expand_env(text, "telegram.admin_user_ids")?;
        }
        Ok(())
    }

    /// Turn raw TOML values into the resolved configuration.
    fn resolve(&mut self) -> Result<(), ConfigError> {
        let admin_user_ids = match &self.telegram.admin_user_ids {
            Some(raw) => raw.resolve()?,
            None => Vec::new(),
        };
        self.telegram_resolved = TelegramConfig {
            max_message_length: self
                .telegram
                .max_message_length
                .unwrap_or(DEFAULT_MAX_MESSAGE_LENGTH),
            admin_user_ids,
        };
        Ok(())
    }
}
