//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Classifier error: {0}")]
    Classify(#[from] ClassifyError),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// ドキュメントストアの失敗（通信・権限・永続化）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("store I/O error: {0}")]
    Io(String),

    #[error("corrupt store data: {0}")]
    Corrupt(String),
}

/// 画像デコード・モデル読込・分類の失敗
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("classification failed: {0}")]
    Classify(String),
}

/// 画面に出すエラー（1枠のみ、新しいもので上書き）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiError {
    #[error("Failed to fetch inventory.")]
    FetchFailed,

    #[error("Item, quantity, weight, and weight unit are required.")]
    MissingFields,

    #[error("Failed to add item.")]
    AddFailed,

    #[error("Item not found.")]
    ItemNotFound,

    #[error("Failed to update item.")]
    UpdateFailed,

    #[error("Failed to delete item.")]
    DeleteFailed,

    #[error("Failed to search inventory.")]
    SearchFailed,

    #[error("Failed to process image.")]
    ImageFailed,
}
