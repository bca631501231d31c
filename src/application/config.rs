use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::application::services::dispatch::Envelope;

/// Invalid or incomplete settings, detected before any metric is collected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("conflicting options: {0}")]
    ConflictingFlags(String),
}

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

/// Report output defaults, overridable from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub metrics: Option<String>,
}

/// SMTP relay used when the report is mailed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub smtp_server: Option<String>,
    #[serde(default)]
    pub smtp_port: Option<u16>,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default = "default_true")]
    pub smtp_starttls: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Comma-separated recipient list.
    #[serde(default)]
    pub email_send_to: Option<String>,
    #[serde(default)]
    pub email_send_from: Option<String>,
}

/// Validated connection parameters for the SMTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub starttls: bool,
}

/// Everything needed to mail a report, checked up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub smtp: SmtpSettings,
    pub envelope: Envelope,
}

// --- Default value functions ---

// NOTE: Stored as raw string with tilde, expand with shellexpand at point of use.
fn default_output_path() -> String {
    "server_info.txt".into()
}

fn default_true() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            metrics: None,
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            smtp_server: None,
            smtp_port: None,
            smtp_username: None,
            smtp_password: None,
            smtp_starttls: default_true(),
        }
    }
}

fn required(value: Option<&String>, key: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::Missing(key))
}

fn check_address(address: &str, key: &'static str) -> Result<(), ConfigError> {
    match address.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidValue {
            key,
            reason: format!("'{address}' is not an email address"),
        }),
    }
}

/// Splits a comma-separated recipient list, dropping blank entries.
#[must_use]
pub fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Read-only variant of [`AppConfig::load`]: the default file is used when
    /// it exists, otherwise defaults apply and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_existing() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Self::load_if_present(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load from `path` when it is a file, defaults otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_if_present(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Default location: `<config_dir>/sysreport/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no config directory.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("sysreport").join("config.toml"))
    }

    /// Validates the `[smtp]` and `[email]` tables for dispatch.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` for an absent or blank key and
    /// `ConfigError::InvalidValue` for a zero port or malformed address.
    pub fn mail_settings(&self) -> Result<MailSettings, ConfigError> {
        let server = required(self.smtp.smtp_server.as_ref(), "smtp_server")?;
        let port = self.smtp.smtp_port.ok_or(ConfigError::Missing("smtp_port"))?;
        if port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "smtp_port",
                reason: "port must be between 1 and 65535".into(),
            });
        }
        let username = required(self.smtp.smtp_username.as_ref(), "smtp_username")?;
        let password = self
            .smtp
            .smtp_password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::Missing("smtp_password"))?;

        let from = required(self.email.email_send_from.as_ref(), "email_send_from")?;
        check_address(&from, "email_send_from")?;

        let recipients = self
            .email
            .email_send_to
            .as_deref()
            .map(split_recipients)
            .unwrap_or_default();
        if recipients.is_empty() {
            return Err(ConfigError::Missing("email_send_to"));
        }
        for recipient in &recipients {
            check_address(recipient, "email_send_to")?;
        }

        Ok(MailSettings {
            smtp: SmtpSettings {
                server,
                port,
                username,
                password,
                starttls: self.smtp.smtp_starttls,
            },
            envelope: Envelope { from, recipients },
        })
    }
}
