//! 静止画の取得
//!
//! 端末版のカメラは「画像ファイル」か「取り込みフォルダの最新画像」。
//! どちらも Data URI にして撮影・分類パイプラインへ渡す。

use crate::error::{PantryError, Result};
use pantry_ai_common::pipeline::encode_data_uri;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// 撮影元
#[derive(Debug, Clone, PartialEq)]
pub enum CameraSource {
    /// 指定ファイル
    File(PathBuf),
    /// フォルダ内で最も新しい画像
    Folder(PathBuf),
}

impl CameraSource {
    /// 静止画を取得して Data URI で返す
    pub fn capture(&self) -> Result<String> {
        match self {
            CameraSource::File(path) => photo_data_uri(path),
            CameraSource::Folder(folder) => photo_data_uri(&newest_image(folder)?),
        }
    }
}

/// 拡張子から MIME タイプ
pub fn mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 画像ファイルを Data URI に変換
pub fn photo_data_uri(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(PantryError::FileNotFound(path.display().to_string()));
    }
    let mime = mime_type(path)
        .ok_or_else(|| PantryError::Camera(format!("未対応の画像形式: {}", path.display())))?;
    let bytes = std::fs::read(path)?;
    Ok(encode_data_uri(mime, &bytes))
}

/// フォルダ直下で更新日時が最も新しい画像
pub fn newest_image(folder: &Path) -> Result<PathBuf> {
    if !folder.is_dir() {
        return Err(PantryError::FolderNotFound(folder.display().to_string()));
    }

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in WalkDir::new(folder)
        .max_depth(1) // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_image(path) {
            continue;
        }
        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        // 同時刻ならファイル名の大きい方
        let replace = match &newest {
            None => true,
            Some((time, current)) => modified > *time || (modified == *time && path > current.as_path()),
        };
        if replace {
            newest = Some((modified, path.to_path_buf()));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| PantryError::NoImagesFound(folder.display().to_string()))
}
