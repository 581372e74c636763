use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub qq: QqConfig,
    pub token: SaveTokenConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// QQ Connect application credentials and endpoint URLs.
///
/// Endpoint URLs default to the production graph.qq.com endpoints and only
/// need overriding in tests or behind a proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QqConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Default anti-forgery state carried through the authorization redirect.
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_openid_url")]
    pub openid_url: String,
    #[serde(default = "default_user_info_url")]
    pub user_info_url: String,
}

/// Signing key and lifetime for the save-user token carrying an OpenID
/// across the registration step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTokenConfig {
    pub secret: String,
    #[serde(default = "default_save_token_ttl")]
    pub expires_in: u64,
}

/// Log filter level for the consuming application. This crate only emits
/// `tracing` events and never installs a subscriber; the host reads this
/// when initializing its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_state() -> String {
    "/".to_string()
}

fn default_authorize_url() -> String {
    "https://graph.qq.com/oauth2.0/authorize".to_string()
}

fn default_token_url() -> String {
    "https://graph.qq.com/oauth2.0/token".to_string()
}

fn default_openid_url() -> String {
    "https://graph.qq.com/oauth2.0/me".to_string()
}

fn default_user_info_url() -> String {
    "https://graph.qq.com/user/get_user_info".to_string()
}

fn default_save_token_ttl() -> u64 {
    600 // 10 minutes
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qq: QqConfig {
                client_id: String::new(),
                client_secret: String::new(),
                redirect_uri: String::new(),
                state: default_state(),
                authorize_url: default_authorize_url(),
                token_url: default_token_url(),
                openid_url: default_openid_url(),
                user_info_url: default_user_info_url(),
            },
            token: SaveTokenConfig {
                secret: "your-signing-secret".to_string(),
                expires_in: default_save_token_ttl(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(config::Config::try_from(&Config::default())?);

        if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("QQ")
                .prefix_separator("_")
                .separator("__"),
        );

        builder.build()?.try_deserialize()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(config::Config::try_from(&Config::default())?);

        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        builder = builder.add_source(
            Environment::with_prefix("QQ")
                .prefix_separator("_")
                .separator("__"),
        );

        builder.build()?.try_deserialize()
    }
}
