use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://0.0.0.0:27017";
pub const DEFAULT_MONGODB_DATABASE: &str = "mission-two";

#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    /// Pin the Stable API v1 with `strict` and `deprecationErrors` enabled.
    pub strict_api: bool,
}

impl AggregationConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(AggregationConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some(DEFAULT_MONGODB_URI), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some(DEFAULT_MONGODB_DATABASE), is_prod)?,
                strict_api: parse_bool(
                    "MONGODB_STRICT_API",
                    &get_env("MONGODB_STRICT_API", Some("true"), false)?,
                )?,
            },
            service_name: get_env("SERVICE_NAME", Some("aggregation-service"), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be a boolean, got '{}'",
            key,
            other
        ))),
    }
}
