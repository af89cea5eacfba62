use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub listings: String,
    pub preferences: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_recommended_limit")]
    pub recommended_limit: usize,
    /// Documents requested per page when fetching the listing snapshot
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_true")]
    pub refresh_on_start: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            recommended_limit: default_recommended_limit(),
            page_size: default_page_size(),
            refresh_on_start: true,
        }
    }
}

fn default_recommended_limit() -> usize { 5 }
fn default_page_size() -> usize { 100 }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Disable to make recommended ordering reproducible
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            jitter: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_city_weight")]
    pub city: f64,
    #[serde(default = "default_property_type_weight")]
    pub property_type: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            city: default_city_weight(),
            property_type: default_property_type_weight(),
        }
    }
}

fn default_city_weight() -> f64 { 5.0 }
fn default_property_type_weight() -> f64 { 3.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Text,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

fn environment() -> Environment {
    Environment::with_prefix("ESTATE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ESTATE__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ESTATE__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed Appwrite variables (APPWRITE_ENDPOINT,
/// APPWRITE_API_KEY, APPWRITE_PROJECT_ID, APPWRITE_DATABASE_ID) when the
/// prefixed ones are not set
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("APPWRITE_ENDPOINT", "ESTATE__APPWRITE__ENDPOINT", "appwrite.endpoint"),
        ("APPWRITE_API_KEY", "ESTATE__APPWRITE__API_KEY", "appwrite.api_key"),
        ("APPWRITE_PROJECT_ID", "ESTATE__APPWRITE__PROJECT_ID", "appwrite.project_id"),
        ("APPWRITE_DATABASE_ID", "ESTATE__APPWRITE__DATABASE_ID", "appwrite.database_id"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (plain, prefixed, key) in overrides {
        if env::var(prefixed).is_ok() {
            continue;
        }
        if let Ok(value) = env::var(plain) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
