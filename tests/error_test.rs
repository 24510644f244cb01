//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use pantry_ai::camera::{self, CameraSource};
use pantry_ai::error::PantryError;
use pantry_ai::store::JsonFileStore;
use pantry_ai_common::{ClassifyError, StoreError, UiError};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない取り込みフォルダ
#[test]
fn test_camera_nonexistent_folder() {
    let result = camera::newest_image(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(PantryError::FolderNotFound(_))));
}

/// 画像のない取り込みフォルダ
#[test]
fn test_camera_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").expect("書き込み失敗");

    let result = CameraSource::Folder(dir.path().to_path_buf()).capture();
    assert!(matches!(result, Err(PantryError::NoImagesFound(_))));
}

/// 壊れた在庫ファイル
#[test]
fn test_store_corrupt_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("pantry.json");
    std::fs::write(&path, "{ invalid }").expect("書き込み失敗");

    let result = JsonFileStore::open(&path);
    assert!(matches!(result, Err(StoreError::Corrupt(_))));
}

/// 未対応バージョンの在庫ファイル
#[test]
fn test_store_unknown_version() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("pantry.json");
    std::fs::write(&path, r#"{"version": 9, "documents": {}}"#).expect("書き込み失敗");

    let err = JsonFileStore::open(&path).err().expect("エラーになるべき");
    assert!(err.to_string().contains("version 9"));
}

/// PantryErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PantryError::Config("テスト設定エラー".to_string()),
        PantryError::Camera("カメラなし".to_string()),
        PantryError::FileNotFound("test.jpg".to_string()),
        PantryError::FolderNotFound("/path/to/folder".to_string()),
        PantryError::NoImagesFound("フォルダ".to_string()),
        PantryError::Prompt("中断".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// ストア・分類器エラーからの変換
#[test]
fn test_domain_error_conversion() {
    let err: PantryError = StoreError::Unavailable("offline".into()).into();
    assert!(matches!(err, PantryError::Store(_)));
    assert!(format!("{}", err).contains("offline"));

    let err: PantryError = ClassifyError::ModelLoad("missing".into()).into();
    assert!(matches!(err, PantryError::Classifier(_)));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PantryError = io_err.into();

    assert!(matches!(err, PantryError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: PantryError = json_err.into();

    assert!(matches!(err, PantryError::JsonParse(_)));
}

/// common::Errorは透過的に表示される
#[test]
fn test_common_error_transparent() {
    let common_err = pantry_ai_common::Error::Config("設定エラー".to_string());
    let err: PantryError = common_err.into();

    assert!(matches!(err, PantryError::Common(_)));
    assert_eq!(format!("{}", err), "Config error: 設定エラー");
}

/// 画面エラーの文言は固定
#[test]
fn test_ui_error_messages() {
    assert_eq!(UiError::FetchFailed.to_string(), "Failed to fetch inventory.");
    assert_eq!(UiError::ItemNotFound.to_string(), "Item not found.");
    assert_eq!(UiError::ImageFailed.to_string(), "Failed to process image.");
}
