use crate::common::config_directory;
use crate::registry::{Hive, RegistryKey};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CleanerConfig {
    /// Display name of the application being cleaned
    #[validate(length(min = 1))]
    pub app_name: String,
    /// Folders to delete, may contain `%VARIABLE%` and a leading `~`
    #[validate(custom = "validate_templates")]
    pub folders: Vec<String>,
    /// Location of the storage.json document containing the telemetry identifiers
    #[validate(length(min = 1))]
    pub storage_path: String,
    #[validate(custom = "validate_registry_keys")]
    pub registry_keys: Vec<RegistryKey>,
}

fn validate_templates(templates: &[String]) -> Result<(), ValidationError> {
    if templates.iter().any(|t| t.trim().is_empty()) {
        return Err(ValidationError::new("empty_folder"));
    }
    Ok(())
}

fn validate_registry_keys(keys: &[RegistryKey]) -> Result<(), ValidationError> {
    let empty = |s: &str| s.trim().is_empty();
    if keys
        .iter()
        .any(|k| empty(&k.path) || k.subkey.as_deref().map_or(false, empty))
    {
        return Err(ValidationError::new("empty_registry_path"));
    }
    Ok(())
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            app_name: "Kiro".to_owned(),
            folders: vec![
                r"%APPDATA%\Kiro".to_owned(),
                r"%LOCALAPPDATA%\Programs\Kiro".to_owned(),
                r"%LOCALAPPDATA%\Kiro".to_owned(),
                r"%PROGRAMDATA%\Kiro".to_owned(),
                r"~\Documents\Kiro".to_owned(),
                r"~\Downloads\Kiro".to_owned(),
            ],
            storage_path: r"%APPDATA%\Kiro\User\globalStorage\storage.json".to_owned(),
            registry_keys: vec![RegistryKey {
                hive: Hive::LocalMachine,
                path: r"SOFTWARE\Microsoft\RADAR\HeapLeakDetection\DiagnosedApplications"
                    .to_owned(),
                subkey: Some("Kiro.exe".to_owned()),
            }],
        }
    }
}

impl CleanerConfig {
    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(config_directory()?.join(CONFIG_FILE_NAME))
    }

    /// Loads the config from `path` (or the default location).
    /// Returns `None` if the file does not exist.
    pub fn load(path: Option<PathBuf>) -> anyhow::Result<Option<Self>> {
        let path = match path {
            Some(p) => p,
            None => Self::default_path()?,
        };
        if !path.exists() {
            log::debug!("Config file {} does not exist", path.display());
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Unable to parse config file {}", path.display()))?;
        config.validate().context("Invalid config file")?;
        log::info!("Loaded config file {}", path.display());
        Ok(Some(config))
    }

    /// Loads the config, falling back to the defaults if there is no file
    pub fn load_or_default(path: Option<PathBuf>) -> anyhow::Result<Self> {
        Ok(Self::load(path)?.unwrap_or_default())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        self.validate().context("Refusing to save invalid config")?;
        let toml = toml::to_string_pretty(self).context("Unable to serialize config")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Unable to create config directory")?;
        }
        fs::write(path, toml)
            .with_context(|| format!("Unable to write config file {}", path.display()))?;
        log::info!("Saved config file {}", path.display());
        Ok(())
    }

    pub fn folder_paths(&self) -> Vec<PathBuf> {
        self.folders.iter().map(|f| crate::env::expand(f)).collect()
    }

    pub fn storage_file(&self) -> PathBuf {
        crate::env::expand(&self.storage_path)
    }
}
