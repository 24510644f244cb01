use crate::error::{PantryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 在庫ファイルの場所（環境変数）
pub const STORE_ENV: &str = "PANTRY_AI_STORE";
/// 分類コマンド（環境変数）
pub const CLASSIFIER_ENV: &str = "PANTRY_AI_CLASSIFIER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store_path: Option<PathBuf>,
    pub classifier_command: Option<String>,
    pub classifier_args: Vec<String>,
    pub camera_folder: Option<PathBuf>,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            classifier_command: None,
            classifier_args: Vec::new(),
            camera_folder: None,
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PantryError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pantry-ai").join("config.json"))
    }

    fn default_store_path() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| PantryError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("pantry-ai").join("pantry.json"))
    }

    /// 在庫ファイルのパス（環境変数 > 設定 > 既定）
    pub fn resolve_store_path(&self) -> Result<PathBuf> {
        if let Ok(path) = std::env::var(STORE_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Self::default_store_path(),
        }
    }

    /// 分類コマンド（環境変数を優先）
    pub fn resolve_classifier_command(&self) -> Result<String> {
        if let Ok(command) = std::env::var(CLASSIFIER_ENV) {
            if !command.trim().is_empty() {
                return Ok(command);
            }
        }

        self.classifier_command.clone().ok_or_else(|| {
            PantryError::Config(
                "分類コマンドが設定されていません。`pantry-ai config --set-classifier COMMAND` で設定してください"
                    .into(),
            )
        })
    }

    pub fn set_store_path(&mut self, path: PathBuf) -> Result<()> {
        self.store_path = Some(path);
        self.save()
    }

    pub fn set_classifier(&mut self, command: String, args: Vec<String>) -> Result<()> {
        self.classifier_command = Some(command);
        self.classifier_args = args;
        self.save()
    }

    pub fn set_camera_folder(&mut self, folder: PathBuf) -> Result<()> {
        if !folder.is_dir() {
            return Err(PantryError::FolderNotFound(folder.display().to_string()));
        }
        self.camera_folder = Some(folder);
        self.save()
    }
}
