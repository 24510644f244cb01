//! ドキュメントid の採番
//!
//! 時刻・連番・品名の SHA-256 先頭20桁（16進）。

use sha2::{Digest, Sha256};

/// id の長さ（16進文字数）
pub const ID_LEN: usize = 20;

/// 新しいドキュメントid を生成
pub fn generate_id(item_name: &str, counter: u64) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    id_from_parts(nanos, counter, item_name)
}

fn id_from_parts(nanos: i64, counter: u64, item_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nanos.to_le_bytes());
    hasher.update(counter.to_le_bytes());
    hasher.update(item_name.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..ID_LEN].to_string()
}
