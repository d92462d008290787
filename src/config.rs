//! Environment-driven configuration.
//!
//! Every setting has a default except the mail credentials; when those are
//! absent the service still generates offers but reports every send attempt
//! as failed.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::generators::ConverterKind;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TEMPLATE_PATH: &str = "templates/offer_letter.html";
const DEFAULT_LEDGER_PATH: &str = "intern_offers.csv";
const DEFAULT_ARTIFACT_DIR: &str = "artifacts";
const DEFAULT_COMPANY_NAME: &str = "SkyHighes Technologies";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a valid port number, got '{value}'")]
    InvalidPort { key: &'static str, value: String },
    #[error("unknown converter '{0}' (expected direct-render, native-office or raster-fallback)")]
    UnknownConverter(String),
}

/// Credentials and relay for outbound mail.
#[derive(Clone)]
pub struct MailConfig {
    pub relay_host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("relay_host", &self.relay_host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub template_path: PathBuf,
    pub ledger_path: PathBuf,
    pub artifact_dir: PathBuf,
    pub converter: ConverterKind,
    /// Overrides the converter's default executable.
    pub converter_bin: Option<String>,
    pub company_name: String,
    pub mail: Option<MailConfig>,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// | Variable               | Default                        |
    /// |------------------------|--------------------------------|
    /// | `HOST`                 | `0.0.0.0`                      |
    /// | `PORT`                 | `8080`                         |
    /// | `OFFER_TEMPLATE_PATH`  | `templates/offer_letter.html`  |
    /// | `OFFER_LEDGER_PATH`    | `intern_offers.csv`            |
    /// | `OFFER_ARTIFACT_DIR`   | `artifacts`                    |
    /// | `OFFER_CONVERTER`      | `direct-render`                |
    /// | `OFFER_CONVERTER_BIN`  | converter specific             |
    /// | `COMPANY_NAME`         | `SkyHighes Technologies`       |
    /// | `MAIL_USER`            | none                           |
    /// | `MAIL_PASSWORD`        | none                           |
    /// | `SMTP_HOST`            | `smtp.gmail.com`               |
    /// | `SMTP_PORT`            | `587`                          |
    /// | `CORS_ALLOWED_ORIGINS` | `http://localhost:3000`        |
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_port("PORT", non_empty("PORT"), DEFAULT_PORT)?;
        let converter = match non_empty("OFFER_CONVERTER") {
            Some(value) => ConverterKind::from_str(&value)?,
            None => ConverterKind::DirectRender,
        };

        let mail = match (non_empty("MAIL_USER"), non_empty("MAIL_PASSWORD")) {
            (Some(user), Some(password)) => Some(MailConfig {
                relay_host: non_empty("SMTP_HOST")
                    .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: parse_port("SMTP_PORT", non_empty("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
                user,
                password,
            }),
            _ => None,
        };

        let allowed_origins = non_empty("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            template_path: non_empty("OFFER_TEMPLATE_PATH")
                .unwrap_or_else(|| DEFAULT_TEMPLATE_PATH.to_string())
                .into(),
            ledger_path: non_empty("OFFER_LEDGER_PATH")
                .unwrap_or_else(|| DEFAULT_LEDGER_PATH.to_string())
                .into(),
            artifact_dir: non_empty("OFFER_ARTIFACT_DIR")
                .unwrap_or_else(|| DEFAULT_ARTIFACT_DIR.to_string())
                .into(),
            converter,
            converter_bin: non_empty("OFFER_CONVERTER_BIN"),
            company_name: non_empty("COMPANY_NAME")
                .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
            mail,
            allowed_origins,
        })
    }
}

fn parse_port(key: &'static str, value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort { key, value: raw }),
        None => Ok(default),
    }
}
