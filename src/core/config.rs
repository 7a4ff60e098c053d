use crate::error::{Result, ToolupError};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub toolup_dir: PathBuf,
    pub github_api_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let toolup_dir = get_toolup_dir().unwrap_or_else(|_| PathBuf::from(".toolup"));

        Config {
            toolup_dir,
            github_api_token: None,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let toolup_dir = get_toolup_dir()?;

        Ok(Config {
            toolup_dir,
            github_api_token: std::env::var("GITHUB_TOKEN").ok(),
        })
    }

    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            let config = Self::new()?;
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;

        fs::ensure_dir_exists(&config.toolup_dir)?;
        fs::ensure_dir_exists(&config.bin_dir())?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::ensure_dir_exists(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.toolup_dir.join("bin")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.toolup_dir.join("catalog.json")
    }
}

fn get_toolup_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".toolup"))
        .ok_or(ToolupError::HomeDirectoryNotFound)
}

fn get_config_path() -> Result<PathBuf> {
    Ok(get_toolup_dir()?.join("config.json"))
}
