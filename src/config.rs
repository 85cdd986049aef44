use crate::error::{ReefIdError, Result};
use reef_id_common::{ImageStore, TrigramScheme};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const STORAGE_URL_ENV: &str = "REEF_ID_STORAGE_URL";
const CATALOG_ENV: &str = "REEF_ID_CATALOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub vision_model: String,
    pub chat_model: String,
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    pub storage_base_url: Option<String>,
    pub image_bucket: String,
    pub image_extension: String,
    pub catalog_path: PathBuf,
    pub bind_address: String,
    pub trigram_scheme: TrigramScheme,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default_config()
        };

        Ok(config.with_env_overrides())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReefIdError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("reef-id").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://api.openai.com/v1".into(),
            vision_model: "gpt-4o-mini".into(),
            chat_model: "gpt-4o-mini".into(),
            max_image_size: 1024,
            timeout_seconds: 60,
            storage_base_url: None,
            image_bucket: "fish-images".into(),
            image_extension: reef_id_common::storage::DEFAULT_IMAGE_EXTENSION.into(),
            catalog_path: PathBuf::from("catalog.json"),
            bind_address: "127.0.0.1:8787".into(),
            trigram_scheme: TrigramScheme::default(),
        }
    }

    /// 環境変数で上書き（APIキーはファイルより環境変数を優先）
    fn with_env_overrides(mut self) -> Self {
        if let Some(url) = non_empty_env(STORAGE_URL_ENV) {
            self.storage_base_url = Some(url);
        }
        if let Some(path) = non_empty_env(CATALOG_ENV) {
            self.catalog_path = PathBuf::from(path);
        }
        self
    }

    pub fn get_api_key(&self) -> Result<String> {
        if let Some(key) = non_empty_env(API_KEY_ENV) {
            return Ok(key);
        }

        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ReefIdError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn image_store(&self) -> Result<ImageStore> {
        let base_url = self
            .storage_base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                ReefIdError::Config(format!(
                    "storage_base_url が未設定です（設定ファイルまたは {}）",
                    STORAGE_URL_ENV
                ))
            })?;

        Ok(ImageStore::new(base_url, &self.image_bucket, &self.image_extension))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
