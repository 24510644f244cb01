use pantry_ai_common::{ClassifyError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PantryError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ストアエラー: {0}")]
    Store(#[from] StoreError),

    #[error("分類器エラー: {0}")]
    Classifier(#[from] ClassifyError),

    #[error("カメラエラー: {0}")]
    Camera(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] pantry_ai_common::Error),
}

pub type Result<T> = std::result::Result<T, PantryError>;
