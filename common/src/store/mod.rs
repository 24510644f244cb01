//! ドキュメントストア境界
//!
//! 在庫レコードの永続化・検索・ライブ同期はすべて外部ストアに委譲する。
//! 実装:
//! - MemoryStore: プロセス内ストア（テスト、CLIのファイルストアの土台）
//! - CLI: JSONファイルストア
//! - Web: JavaScript ブリッジ経由のホスト型DB

mod memory;

pub use memory::{MemoryStore, StoreCalls};

use crate::error::StoreError;
use crate::types::{InventoryItem, ItemPatch, NewInventoryItem};
use async_trait::async_trait;
use futures::channel::mpsc::UnboundedReceiver;
use futures::{FutureExt, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// ライブ購読の通知（全件スナップショット or 購読エラー）
pub type SnapshotEvent = Result<Vec<InventoryItem>, StoreError>;

/// 在庫ストア
///
/// すべての呼び出しは失敗しうる。リトライはしない。
#[async_trait(?Send)]
pub trait InventoryStore {
    /// レコードを作成し、採番されたidを返す
    async fn create(&self, item: NewInventoryItem) -> Result<String, StoreError>;

    /// 指定フィールドのみ更新
    async fn update(&self, id: &str, patch: ItemPatch) -> Result<(), StoreError>;

    /// レコードを削除
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// `item` フィールドの完全一致検索
    async fn query_by_item(&self, name: &str) -> Result<Vec<InventoryItem>, StoreError>;

    /// 全件のライブ購読を開始
    fn subscribe(&self) -> Result<Subscription, StoreError>;
}

/// ライブ購読ハンドル
///
/// 通知は `Stream` として読むか `try_next_event` で取り出す。
/// 解除処理は `unsubscribe` か drop のどちらかで一度だけ実行される。
pub struct Subscription {
    events: UnboundedReceiver<SnapshotEvent>,
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(events: UnboundedReceiver<SnapshotEvent>, teardown: impl FnOnce() + 'static) -> Self {
        Self {
            events,
            teardown: Some(Box::new(teardown)),
        }
    }

    /// 届いている通知を1件取り出す（待たない）
    pub fn try_next_event(&mut self) -> Option<SnapshotEvent> {
        match self.events.next().now_or_never() {
            Some(Some(event)) => Some(event),
            _ => None,
        }
    }

    /// 購読を解除
    pub fn unsubscribe(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Stream for Subscription {
    type Item = SnapshotEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.events).poll_next(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.teardown.is_some())
            .finish()
    }
}
