//! JSONファイル在庫ストア
//!
//! `{ "version": 1, "documents": { id: record } }` 形式で1ファイルに保存する。
//! 変更はファイルへ書き出せた場合のみ確定し、購読者へ通知する。購読はプロセス内のみ。

pub mod id;

use async_trait::async_trait;
use pantry_ai_common::{
    InventoryItem, InventoryStore, ItemPatch, MemoryStore, NewInventoryItem, StoreError, Subscription,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// ドキュメントファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// id → レコード
    documents: BTreeMap<String, NewInventoryItem>,
}

impl DocumentFile {
    const CURRENT_VERSION: u32 = 1;
}

pub struct JsonFileStore {
    path: PathBuf,
    memory: MemoryStore,
}

impl JsonFileStore {
    /// ファイルを開く（無ければ空のストア）
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let items = if path.exists() {
            load_documents(path)?
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), count = items.len(), "store opened");

        let mut counter = 0u64;
        let target = path.to_path_buf();
        let memory = MemoryStore::with_items(items)
            .with_id_source(move |item: &NewInventoryItem| {
                counter += 1;
                id::generate_id(&item.item, counter)
            })
            .with_persister(move |documents: &[InventoryItem]| write_documents(&target, documents));

        Ok(Self {
            path: path.to_path_buf(),
            memory,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 現在の全レコード
    pub fn documents(&self) -> Vec<InventoryItem> {
        self.memory.documents()
    }

    pub fn len(&self) -> usize {
        self.memory.documents().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}

/// 全件を一時ファイルへ書いてから置き換える
fn write_documents(path: &Path, items: &[InventoryItem]) -> Result<(), StoreError> {
    let documents = items
        .iter()
        .cloned()
        .map(InventoryItem::into_parts)
        .collect();
    let file = DocumentFile {
        version: DocumentFile::CURRENT_VERSION,
        documents,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp_path).map_err(io_error)?);
        serde_json::to_writer_pretty(&mut writer, &file).map_err(|e| StoreError::Io(e.to_string()))?;
        writer.flush().map_err(io_error)?;
    }
    std::fs::rename(&tmp_path, path).map_err(io_error)?;
    debug!(path = %path.display(), count = items.len(), "store saved");
    Ok(())
}

fn io_error(e: std::io::Error) -> StoreError {
    StoreError::Io(e.to_string())
}

fn load_documents(path: &Path) -> Result<Vec<InventoryItem>, StoreError> {
    let reader = BufReader::new(File::open(path).map_err(io_error)?);
    let file: DocumentFile =
        serde_json::from_reader(reader).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    if file.version != DocumentFile::CURRENT_VERSION {
        return Err(StoreError::Corrupt(format!(
            "unsupported store version {}",
            file.version
        )));
    }
    Ok(file
        .documents
        .into_iter()
        .map(|(id, record)| record.with_id(id))
        .collect())
}

#[async_trait(?Send)]
impl InventoryStore for JsonFileStore {
    async fn create(&self, item: NewInventoryItem) -> Result<String, StoreError> {
        self.memory.create(item).await
    }

    async fn update(&self, id: &str, patch: ItemPatch) -> Result<(), StoreError> {
        self.memory.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.memory.delete(id).await
    }

    async fn query_by_item(&self, name: &str) -> Result<Vec<InventoryItem>, StoreError> {
        self.memory.query_by_item(name).await
    }

    fn subscribe(&self) -> Result<Subscription, StoreError> {
        self.memory.subscribe()
    }
}
