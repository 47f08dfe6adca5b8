use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::errors::ConfigError;
use crate::i18n::Language;
use crate::mail::{
    MailSettings, DEFAULT_RECIPIENT, DEFAULT_RELAY_HOST, DEFAULT_RELAY_PORT,
    DEFAULT_TIMEOUT_SECS,
};
use crate::utils::app_home;

pub const CONFIG_FILE: &str = "config.json";
pub const OUTBOX_ENV: &str = "LEASING_INQUIRY_OUTBOX";
/// Upload limit for the vehicle photo.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 200 * 1024 * 1024;
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: Language,
    pub relay_host: String,
    pub relay_port: u16,
    pub recipient: String,
    pub timeout_secs: u64,
    pub max_attachment_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbox_dir: Option<PathBuf>,
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            relay_host: DEFAULT_RELAY_HOST.into(),
            relay_port: DEFAULT_RELAY_PORT,
            recipient: DEFAULT_RECIPIENT.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            outbox_dir: None,
            plain_output: false,
        }
    }
}

impl Config {
    /// Mail settings with `LEASING_INQUIRY_OUTBOX` taking precedence over `outbox_dir`.
    pub fn mail_settings(&self) -> MailSettings {
        let outbox_dir = env::var_os(OUTBOX_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.outbox_dir.clone());
        MailSettings {
            relay_host: self.relay_host.clone(),
            relay_port: self.relay_port,
            recipient: self.recipient.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            outbox_dir,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_base(app_home())
    }

    #[cfg(test)]
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Missing file means defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().join("home")).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.relay_host, "smtp.gmail.com");
        assert_eq!(config.relay_port, 587);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            language: Language::Sinhala,
            recipient: "leasing@example.lk".into(),
            plain_output: true,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert!(!tmp_path(manager.path()).exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "language": "sinhala", "relay_port": 2525 }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.language, Language::Sinhala);
        assert_eq!(config.relay_port, 2525);
        assert_eq!(config.recipient, DEFAULT_RECIPIENT);
    }

    #[test]
    fn invalid_json_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
    }
}
