use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PUSH_ENDPOINT: &str = "https://actions.googleapis.com/v2/conversations:send";
pub const DEFAULT_LOCALE: &str = "en-US";

/// Top-level config (gymbot.toml + GYMBOT_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GymbotConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub push: PushConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Where the weekly class schedule comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Path to a schedule JSON file. The built-in schedule is used when unset.
    pub path: Option<String>,
}

/// Authentication mode for the fulfillment endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WebhookAuthMode {
    /// HMAC-SHA256 over the raw request body (`X-Hub-Signature-256: sha256=<hex>`).
    HmacSha256,
    /// Static bearer token in the Authorization header.
    BearerToken,
    /// No authentication: the platform reaches us over a trusted network.
    #[default]
    None,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub auth_mode: WebhookAuthMode,
    /// HMAC signing secret or bearer token value.
    pub secret: Option<String>,
}

/// Push-notification delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Path to the service account JSON key used to mint access tokens.
    /// Without it every dispatch batch aborts at the authentication step.
    pub key_file: Option<String>,
    #[serde(default = "default_push_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_push_title")]
    pub title: String,
    /// Deliver to the platform sandbox instead of production users.
    #[serde(default = "bool_true")]
    pub sandbox: bool,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            key_file: None,
            endpoint: default_push_endpoint(),
            locale: default_locale(),
            title: default_push_title(),
            sandbox: true,
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_push_endpoint() -> String {
    DEFAULT_PUSH_ENDPOINT.to_string()
}
fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}
fn default_push_title() -> String {
    "Test Notification from Action Gym".to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.gymbot/gymbot.db", home)
}

impl GymbotConfig {
    /// Load config from a TOML file with GYMBOT_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g. `GYMBOT_PUSH__KEY_FILE`.
    /// A missing file is not an error; every section has defaults.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: GymbotConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("GYMBOT_").split("__"))
            .extract()
            .map_err(|e| crate::error::GymbotError::Config(e.to_string()))?;

        tracing::debug!(path = %path, "configuration loaded");
        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.gymbot/gymbot.toml", home)
}
