//! プロセス内ドキュメントストア
//!
//! 変更のたびに全購読者へ全件スナップショットを送る。
//! テスト用に失敗注入・呼び出し回数・更新ログを持つ。

use super::{InventoryStore, SnapshotEvent, Subscription};
use crate::error::StoreError;
use crate::types::{InventoryItem, ItemPatch, NewInventoryItem};
use async_trait::async_trait;
use futures::channel::mpsc::{self, UnboundedSender};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

type IdSource = Box<dyn FnMut(&NewInventoryItem) -> String>;
type Persister = Box<dyn FnMut(&[InventoryItem]) -> Result<(), StoreError>>;

/// 操作ごとの呼び出し回数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub query: usize,
    pub subscribe: usize,
}

impl StoreCalls {
    /// 書き込み・検索の合計（購読は含まない）
    pub fn total(&self) -> usize {
        self.create + self.update + self.delete + self.query
    }
}

struct MemoryInner {
    documents: Vec<InventoryItem>,
    subscribers: Vec<(u64, UnboundedSender<SnapshotEvent>)>,
    next_subscriber: u64,
    next_id: u64,
    failing: bool,
    calls: StoreCalls,
    patches: Vec<(String, ItemPatch)>,
    id_source: Option<IdSource>,
    persister: Option<Persister>,
}

impl MemoryInner {
    fn broadcast(&mut self) {
        let snapshot = self.documents.clone();
        self.subscribers
            .retain(|(_, tx)| tx.unbounded_send(Ok(snapshot.clone())).is_ok());
    }

    /// 変更後の全件を確定する（書き出しに失敗したら何も変えない）
    fn commit(&mut self, documents: Vec<InventoryItem>) -> Result<(), StoreError> {
        if let Some(persist) = self.persister.as_mut() {
            persist(&documents)?;
        }
        self.documents = documents;
        self.broadcast();
        Ok(())
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.failing {
            Err(StoreError::Unavailable("store offline".into()))
        } else {
            Ok(())
        }
    }

    fn allocate_id(&mut self, item: &NewInventoryItem) -> String {
        if let Some(source) = self.id_source.as_mut() {
            return source(item);
        }
        self.next_id += 1;
        format!("item-{:06}", self.next_id)
    }
}

/// プロセス内ストア（クローンは同じデータを共有する）
#[derive(Clone)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// 既存レコードで初期化
    pub fn with_items(items: Vec<InventoryItem>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryInner {
                documents: items,
                subscribers: Vec::new(),
                next_subscriber: 0,
                next_id: 0,
                failing: false,
                calls: StoreCalls::default(),
                patches: Vec::new(),
                id_source: None,
                persister: None,
            })),
        }
    }

    /// id の採番方法を差し替える
    pub fn with_id_source(self, source: impl FnMut(&NewInventoryItem) -> String + 'static) -> Self {
        self.inner.borrow_mut().id_source = Some(Box::new(source));
        self
    }

    /// 変更を確定する前に全件を書き出す関数を設定する
    pub fn with_persister(
        self,
        persister: impl FnMut(&[InventoryItem]) -> Result<(), StoreError> + 'static,
    ) -> Self {
        self.inner.borrow_mut().persister = Some(Box::new(persister));
        self
    }

    /// true の間、すべての呼び出しを失敗させる
    pub fn set_failing(&self, failing: bool) {
        self.inner.borrow_mut().failing = failing;
    }

    /// 購読者へエラー通知を送る
    pub fn emit_error(&self, error: StoreError) {
        let mut inner = self.inner.borrow_mut();
        inner
            .subscribers
            .retain(|(_, tx)| tx.unbounded_send(Err(error.clone())).is_ok());
    }

    /// 現在の全レコード（挿入順）
    pub fn documents(&self) -> Vec<InventoryItem> {
        self.inner.borrow().documents.clone()
    }

    pub fn get(&self, id: &str) -> Option<InventoryItem> {
        self.inner
            .borrow()
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    pub fn calls(&self) -> StoreCalls {
        self.inner.borrow().calls
    }

    /// 受け取った部分更新の履歴
    pub fn patches(&self) -> Vec<(String, ItemPatch)> {
        self.inner.borrow().patches.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

#[async_trait(?Send)]
impl InventoryStore for MemoryStore {
    async fn create(&self, item: NewInventoryItem) -> Result<String, StoreError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.create += 1;
        inner.check_online()?;

        let id = inner.allocate_id(&item);
        let mut documents = inner.documents.clone();
        documents.push(item.with_id(id.clone()));
        inner.commit(documents)?;
        Ok(id)
    }

    async fn update(&self, id: &str, patch: ItemPatch) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.update += 1;
        inner.check_online()?;

        let mut documents = inner.documents.clone();
        let doc = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply_to(doc);
        inner.commit(documents)?;
        inner.patches.push((id.to_string(), patch));
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.delete += 1;
        inner.check_online()?;

        // 存在しない id の削除は成功扱い
        let mut documents = inner.documents.clone();
        documents.retain(|d| d.id != id);
        inner.commit(documents)
    }

    async fn query_by_item(&self, name: &str) -> Result<Vec<InventoryItem>, StoreError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.query += 1;
        inner.check_online()?;

        Ok(inner
            .documents
            .iter()
            .filter(|d| d.item == name)
            .cloned()
            .collect())
    }

    fn subscribe(&self) -> Result<Subscription, StoreError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.subscribe += 1;
        inner.check_online()?;

        let (tx, rx) = mpsc::unbounded();
        // 購読直後に現在の全件を1回通知
        let _ = tx.unbounded_send(Ok(inner.documents.clone()));

        let key = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.subscribers.push((key, tx));

        let weak: Weak<RefCell<MemoryInner>> = Rc::downgrade(&self.inner);
        Ok(Subscription::new(rx, move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut inner) = inner.try_borrow_mut() {
                    inner.subscribers.retain(|(k, _)| *k != key);
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeightUnit;
    use futures::executor::block_on;

    fn new_item(name: &str) -> NewInventoryItem {
        NewInventoryItem {
            item: name.to_string(),
            quantity: 1,
            weight: 2.0,
            weight_unit: WeightUnit::Gram,
            date_added: "1/1/2026".to_string(),
            photo_url: None,
            classification: Some("Unknown".to_string()),
        }
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = block_on(store.create(new_item("salt"))).unwrap();
        let b = block_on(store.create(new_item("salt"))).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.documents().len(), 2);
        assert_eq!(store.calls().create, 2);
    }

    #[test]
    fn test_custom_id_source() {
        let mut n = 0;
        let store = MemoryStore::new().with_id_source(move |item| {
            n += 1;
            format!("{}-{}", item.item, n)
        });
        let id = block_on(store.create(new_item("oats"))).unwrap();
        assert_eq!(id, "oats-1");
    }

    #[test]
    fn test_subscribe_sends_initial_and_changes() {
        let store = MemoryStore::new();
        let mut sub = store.subscribe().unwrap();
        assert!(matches!(sub.try_next_event(), Some(Ok(items)) if items.is_empty()));

        block_on(store.create(new_item("tea"))).unwrap();
        let snapshot = sub.try_next_event().unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].item, "tea");
    }

    #[test]
    fn test_unsubscribe_removes_subscriber() {
        let store = MemoryStore::new();
        let sub = store.subscribe().unwrap();
        assert_eq!(store.subscriber_count(), 1);
        sub.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_update_missing_document() {
        let store = MemoryStore::new();
        let result = block_on(store.update("nope", ItemPatch::quantity(3)));
        assert_eq!(result, Err(StoreError::NotFound("nope".into())));
    }

    #[test]
    fn test_update_records_patch() {
        let store = MemoryStore::new();
        let id = block_on(store.create(new_item("jam"))).unwrap();
        block_on(store.update(&id, ItemPatch::quantity(9))).unwrap();
        assert_eq!(store.get(&id).unwrap().quantity, 9);
        assert_eq!(store.patches(), vec![(id, ItemPatch::quantity(9))]);
    }

    #[test]
    fn test_query_is_exact_match() {
        let store = MemoryStore::new();
        block_on(store.create(new_item("Milk"))).unwrap();
        block_on(store.create(new_item("milk"))).unwrap();
        block_on(store.create(new_item("milk powder"))).unwrap();

        let found = block_on(store.query_by_item("milk")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].item, "milk");
    }

    #[test]
    fn test_failing_store() {
        let store = MemoryStore::new();
        store.set_failing(true);
        assert!(block_on(store.create(new_item("x"))).is_err());
        assert!(block_on(store.delete("x")).is_err());
        assert!(store.subscribe().is_err());
        assert_eq!(store.calls().create, 1);
        assert!(store.documents().is_empty());
    }

    #[test]
    fn test_persist_failure_leaves_documents_unchanged() {
        let store = MemoryStore::with_items(vec![new_item("rice").with_id("r")])
            .with_persister(|_| Err(StoreError::Io("disk full".into())));
        let mut sub = store.subscribe().unwrap();
        let _initial = sub.try_next_event();

        assert!(block_on(store.create(new_item("salt"))).is_err());
        assert!(block_on(store.update("r", ItemPatch::quantity(7))).is_err());
        assert!(block_on(store.delete("r")).is_err());

        assert_eq!(store.documents().len(), 1);
        assert_eq!(store.get("r").unwrap().quantity, 1);
        assert!(store.patches().is_empty());
        assert!(sub.try_next_event().is_none());
    }

    #[test]
    fn test_persister_sees_new_documents() {
        let seen = Rc::new(RefCell::new(0usize));
        let counter = seen.clone();
        let store = MemoryStore::new().with_persister(move |docs| {
            *counter.borrow_mut() = docs.len();
            Ok(())
        });
        block_on(store.create(new_item("tea"))).unwrap();
        block_on(store.create(new_item("coffee"))).unwrap();
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn test_emit_error_reaches_subscriber() {
        let store = MemoryStore::new();
        let mut sub = store.subscribe().unwrap();
        let _initial = sub.try_next_event();
        store.emit_error(StoreError::Unavailable("permission denied".into()));
        assert!(matches!(sub.try_next_event(), Some(Err(StoreError::Unavailable(_)))));
    }
}
