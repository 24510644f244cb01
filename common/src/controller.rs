//! 同期コントローラ
//!
//! ストアのライブ購読と画面状態を保持し、追加・数量更新・削除・検索を発行して
//! 結果を状態へ反映する。購読通知は `pump` で取り込む。

use crate::clock::Clock;
use crate::form::ItemForm;
use crate::pipeline::{ClassifyPipeline, ModelLoader};
use crate::state::InventoryState;
use crate::store::{InventoryStore, Subscription};
use tracing::{debug, info};

pub struct SyncController<S: InventoryStore> {
    store: S,
    clock: Box<dyn Clock>,
    state: InventoryState,
    subscription: Option<Subscription>,
}

impl<S: InventoryStore> SyncController<S> {
    pub fn new(store: S, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
            state: InventoryState::new(),
            subscription: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InventoryState {
        &mut self.state
    }

    pub fn form_mut(&mut self) -> &mut ItemForm {
        &mut self.state.form
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// ライブ購読を開始し、届いている初回通知を取り込む
    ///
    /// すでに購読中なら何もしない。
    pub fn start(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        match self.store.subscribe() {
            Ok(subscription) => {
                info!("inventory subscription started");
                self.subscription = Some(subscription);
                self.pump();
            }
            Err(e) => self.state.apply_snapshot(Err(e)),
        }
    }

    /// 届いている購読通知をすべて反映し、件数を返す
    pub fn pump(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_mut() else {
            return 0;
        };
        let mut applied = 0;
        while let Some(event) = subscription.try_next_event() {
            self.state.apply_snapshot(event);
            applied += 1;
        }
        applied
    }

    /// 購読を解除（二度目以降は何もしない）
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            info!("inventory subscription closed");
        }
    }

    /// フォーム内容で1件追加
    pub async fn add_item(&mut self) -> bool {
        let Some(new_item) = self.state.prepare_add(self.clock.as_ref()) else {
            return false;
        };
        debug!(item = %new_item.item, "adding item");
        let result = self.store.create(new_item).await;
        let ok = result.is_ok();
        self.state.finish_add(result);
        ok
    }

    /// 数量を指定値に更新
    pub async fn update_quantity(&mut self, id: &str, quantity: i64) -> bool {
        let Some(patch) = self.state.prepare_update(id, quantity) else {
            return false;
        };
        let result = self.store.update(id, patch).await;
        let ok = result.is_ok();
        self.state.finish_update(id, quantity, result);
        ok
    }

    pub async fn increment(&mut self, id: &str) -> bool {
        self.adjust(id, 1).await
    }

    pub async fn decrement(&mut self, id: &str) -> bool {
        self.adjust(id, -1).await
    }

    async fn adjust(&mut self, id: &str, delta: i64) -> bool {
        let Some((quantity, patch)) = self.state.prepare_adjust(id, delta) else {
            return false;
        };
        let result = self.store.update(id, patch).await;
        let ok = result.is_ok();
        self.state.finish_update(id, quantity, result);
        ok
    }

    pub async fn delete_item(&mut self, id: &str) -> bool {
        let result = self.store.delete(id).await;
        let ok = result.is_ok();
        self.state.finish_delete(id, result);
        ok
    }

    /// 現在の検索語で完全一致検索
    pub async fn search(&mut self) -> bool {
        let term = self.state.prepare_search();
        let result = self.store.query_by_item(&term).await;
        let ok = result.is_ok();
        self.state.finish_search(result);
        ok
    }

    /// 検索語を設定して検索
    pub async fn search_for(&mut self, term: impl Into<String>) -> bool {
        self.state.search_term = term.into();
        self.search().await
    }

    pub fn reset_search(&mut self) {
        self.state.reset_search();
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.set_page(page);
    }

    pub fn open_camera(&mut self) -> bool {
        self.state.open_camera()
    }

    pub fn close_camera(&mut self) -> bool {
        self.state.close_camera()
    }

    /// 撮影した静止画を分類してフォームへ反映
    pub async fn capture<L: ModelLoader>(&mut self, pipeline: &ClassifyPipeline<L>, data_uri: String) -> bool {
        pipeline.capture(&mut self.state, data_uri).await
    }
}

impl<S: InventoryStore> Drop for SyncController<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
