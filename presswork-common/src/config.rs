//! Configuration loading and data folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. PRESSWORK_DATA environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("PRESSWORK_DATA") {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = load_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return PathBuf::from(data_dir);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Get default configuration file path for the platform
fn load_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("presswork").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/presswork/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default data folder path
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("presswork"))
        .unwrap_or_else(|| PathBuf::from("./presswork_data"))
}

/// Database file path within the data folder
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("presswork.db")
}

/// Root of the statically-served uploads tree
pub fn uploads_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("uploads")
}

/// SMTP settings for the email notifier
///
/// Loaded from environment variables. When EMAIL_USER or EMAIL_PASS is
/// absent the notifier is disabled and submissions proceed without email.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Address notifications are sent from
    pub from_address: String,
    /// Inbox that receives admin notifications
    pub admin_address: String,
}

impl SmtpSettings {
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("EMAIL_USER").ok()?;
        let password = std::env::var("EMAIL_PASS").ok()?;

        let host = std::env::var("EMAIL_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let port = std::env::var("EMAIL_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);
        let admin_address = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| username.clone());

        Some(Self {
            host,
            port,
            from_address: username.clone(),
            username,
            password,
            admin_address,
        })
    }
}
