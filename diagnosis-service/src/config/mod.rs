use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::fmt;
use std::time::Duration;

/// Public Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
/// 10 MiB, enough for a phone photo.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct DiagnosisConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub limits: LimitsConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Clone)]
pub struct GoogleConfig {
    pub api_key: String,
    pub base_url: String,
}

impl fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model that accepts text plus an image. `None` disables image input.
    pub vision_model: Option<String>,
    /// Model used for text-only requests.
    pub text_model: Option<String>,
    pub request_timeout_secs: u64,
}

impl ModelConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_upload_bytes: usize,
}

impl DiagnosisConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(DiagnosisConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: require_non_empty(
                    "GEMINI_API_KEY",
                    get_env("GEMINI_API_KEY", None, is_prod)?,
                )?,
                base_url: get_env(
                    "DIAGNOSIS_GEMINI_BASE_URL",
                    Some(DEFAULT_GEMINI_BASE_URL),
                    is_prod,
                )?,
            },
            models: ModelConfig {
                vision_model: optional_model(get_env(
                    "DIAGNOSIS_VISION_MODEL",
                    Some(DEFAULT_MODEL),
                    is_prod,
                )?),
                text_model: optional_model(get_env(
                    "DIAGNOSIS_TEXT_MODEL",
                    Some(DEFAULT_MODEL),
                    is_prod,
                )?),
                request_timeout_secs: parse_or(
                    "DIAGNOSIS_REQUEST_TIMEOUT_SECS",
                    &get_env(
                        "DIAGNOSIS_REQUEST_TIMEOUT_SECS",
                        Some(&DEFAULT_REQUEST_TIMEOUT_SECS.to_string()),
                        is_prod,
                    )?,
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                ),
            },
            limits: LimitsConfig {
                max_upload_bytes: parse_or(
                    "DIAGNOSIS_MAX_UPLOAD_BYTES",
                    &get_env(
                        "DIAGNOSIS_MAX_UPLOAD_BYTES",
                        Some(&DEFAULT_MAX_UPLOAD_BYTES.to_string()),
                        is_prod,
                    )?,
                    DEFAULT_MAX_UPLOAD_BYTES,
                ),
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    resolve(key, env::var(key).ok(), default, is_prod)
}

fn resolve(
    key: &str,
    value: Option<String>,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError> {
    match value {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn require_non_empty(key: &str, value: String) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is set but empty",
            key
        )));
    }
    Ok(value)
}

fn optional_model(name: String) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn parse_or<T: std::str::FromStr + Copy + fmt::Display>(key: &str, raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = raw, %default, "Unparseable value, using default");
        default
    })
}
