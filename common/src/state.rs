//! 在庫画面の状態（ビューモデル）
//!
//! 画面の状態はすべてこの構造体が持ち、遷移関数を通してのみ変更する。
//! 非同期処理は `prepare_*`（送信内容の決定）と `finish_*`（結果の反映）に分け、
//! ストア呼び出しそのものは呼び出し側（SyncController / Web画面）が行う。
//!
//! ライブ購読の通知と楽観的更新はどちらが先に届いても同じ結果に収束する。

use crate::clock::Clock;
use crate::error::{ClassifyError, StoreError, UiError};
use crate::form::ItemForm;
use crate::pagination::{paginate, total_pages, PAGE_SIZE};
use crate::store::SnapshotEvent;
use crate::types::{top_label, InventoryItem, ItemPatch, NewInventoryItem, Prediction, UNKNOWN_LABEL};
use tracing::{debug, error, warn};

/// 撮影・分類パイプラインの状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureState {
    #[default]
    Idle,
    CameraOpen,
    Capturing,
    Classifying,
}

impl CaptureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::CameraOpen => "camera-open",
            CaptureState::Capturing => "capturing",
            CaptureState::Classifying => "classifying",
        }
    }
}

/// 在庫画面の状態
#[derive(Debug, Clone)]
pub struct InventoryState {
    pub form: ItemForm,
    pub search_term: String,
    searching: bool,
    inventory: Vec<InventoryItem>,
    search_results: Vec<InventoryItem>,
    current_page: usize,
    capture: CaptureState,
    photo: Option<String>,
    classification: Option<String>,
    error: Option<UiError>,
    loading: bool,
}

impl Default for InventoryState {
    fn default() -> Self {
        Self {
            form: ItemForm::default(),
            search_term: String::new(),
            searching: false,
            inventory: Vec::new(),
            search_results: Vec::new(),
            current_page: 1,
            capture: CaptureState::Idle,
            photo: None,
            classification: None,
            error: None,
            loading: false,
        }
    }
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    // =============================================
    // 参照
    // =============================================

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// 購読で保持している全件
    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn search_results(&self) -> &[InventoryItem] {
        &self.search_results
    }

    /// 表示中のリスト（検索中なら検索結果、そうでなければ全件）
    pub fn active_items(&self) -> &[InventoryItem] {
        if self.searching {
            &self.search_results
        } else {
            &self.inventory
        }
    }

    pub fn find_active(&self, id: &str) -> Option<&InventoryItem> {
        self.active_items().iter().find(|item| item.id == id)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// 現在ページの行
    pub fn page_items(&self) -> &[InventoryItem] {
        paginate(self.active_items(), self.current_page, PAGE_SIZE)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.active_items().len(), PAGE_SIZE)
    }

    pub fn error(&self) -> Option<UiError> {
        self.error
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture
    }

    pub fn is_camera_open(&self) -> bool {
        self.capture == CaptureState::CameraOpen
    }

    /// 撮影済みで未保存の写真
    pub fn pending_photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn pending_classification(&self) -> Option<&str> {
        self.classification.as_deref()
    }

    // =============================================
    // 入力・ページ
    // =============================================

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// 表示中リストが縮んだとき、最終ページを越えていれば最終ページへ戻す
    fn clamp_page(&mut self) {
        let last = self.total_pages().max(1);
        if self.current_page > last {
            debug!(from = self.current_page, to = last, "page clamped");
            self.current_page = last;
        }
    }

    // =============================================
    // ライブ購読
    // =============================================

    /// 購読通知を反映（全件置換、id の降順）
    pub fn apply_snapshot(&mut self, event: SnapshotEvent) {
        match event {
            Ok(mut items) => {
                items.sort_by(|a, b| b.id.cmp(&a.id));
                debug!(count = items.len(), "inventory snapshot");
                self.inventory = items;
                self.error = None;
                self.clamp_page();
            }
            Err(e) => {
                error!("Error fetching inventory: {}", e);
                self.error = Some(UiError::FetchFailed);
            }
        }
    }

    // =============================================
    // 追加
    // =============================================

    /// 追加リクエストを組み立てる（空欄があればエラーを立てて None）
    pub fn prepare_add(&mut self, clock: &dyn Clock) -> Option<NewInventoryItem> {
        match self
            .form
            .to_new_item(clock.today(), self.photo.clone(), self.classification.clone())
        {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("add rejected: {}", e);
                self.error = Some(e);
                None
            }
        }
    }

    pub fn finish_add(&mut self, result: Result<String, StoreError>) {
        match result {
            Ok(id) => {
                debug!(%id, "item added");
                self.form = ItemForm::default();
                self.photo = None;
                self.classification = None;
                self.error = None;
            }
            Err(e) => {
                error!("Error adding document: {}", e);
                self.error = Some(UiError::AddFailed);
            }
        }
    }

    // =============================================
    // 数量更新
    // =============================================

    /// 数量更新のパッチを組み立てる（表示中リストに無ければ "Item not found."）
    pub fn prepare_update(&mut self, id: &str, quantity: i64) -> Option<ItemPatch> {
        if self.find_active(id).is_none() {
            warn!(%id, "update target not in active list");
            self.error = Some(UiError::ItemNotFound);
            return None;
        }
        Some(ItemPatch::quantity(quantity))
    }

    /// 現在数量 ± delta の更新パッチ
    pub fn prepare_adjust(&mut self, id: &str, delta: i64) -> Option<(i64, ItemPatch)> {
        let Some(current) = self.find_active(id).map(|item| item.quantity) else {
            warn!(%id, "update target not in active list");
            self.error = Some(UiError::ItemNotFound);
            return None;
        };
        let quantity = current.saturating_add(delta);
        Some((quantity, ItemPatch::quantity(quantity)))
    }

    /// 更新結果を反映（成功時は表示中リストを楽観的に書き換える）
    pub fn finish_update(&mut self, id: &str, quantity: i64, result: Result<(), StoreError>) {
        if let Err(e) = result {
            error!("Error updating document: {}", e);
            self.error = Some(UiError::UpdateFailed);
            return;
        }

        let photo = self.photo.clone();
        let classification = self.classification.clone();
        let list = if self.searching {
            &mut self.search_results
        } else {
            &mut self.inventory
        };
        if let Some(item) = list.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
            if photo.is_some() {
                item.photo_url = photo;
            }
            if classification.is_some() {
                item.classification = classification;
            }
        }
        self.error = None;
    }

    // =============================================
    // 削除
    // =============================================

    /// 削除結果を反映（表示中リストからのみ取り除く）
    pub fn finish_delete(&mut self, id: &str, result: Result<(), StoreError>) {
        if let Err(e) = result {
            error!("Error deleting document: {}", e);
            self.error = Some(UiError::DeleteFailed);
            return;
        }

        if self.searching {
            self.search_results.retain(|item| item.id != id);
        } else {
            self.inventory.retain(|item| item.id != id);
        }
        self.error = None;
        self.clamp_page();
    }

    // =============================================
    // 検索
    // =============================================

    /// 検索を開始（検索中フラグは結果に関係なく立ったまま）
    pub fn prepare_search(&mut self) -> String {
        self.searching = true;
        self.current_page = 1;
        self.search_term.clone()
    }

    pub fn finish_search(&mut self, result: Result<Vec<InventoryItem>, StoreError>) {
        match result {
            Ok(items) => {
                debug!(count = items.len(), "search results");
                self.search_results = items;
                self.error = None;
                self.clamp_page();
            }
            Err(e) => {
                error!("Error searching inventory: {}", e);
                self.error = Some(UiError::SearchFailed);
            }
        }
    }

    /// 検索解除（再取得はしない）
    pub fn reset_search(&mut self) {
        self.searching = false;
        self.search_term.clear();
        self.current_page = 1;
    }

    // =============================================
    // カメラ・分類
    // =============================================

    /// カメラを開く（Idle 以外では無視）
    pub fn open_camera(&mut self) -> bool {
        if self.capture != CaptureState::Idle {
            return false;
        }
        self.capture = CaptureState::CameraOpen;
        true
    }

    /// 撮影前にカメラを閉じる（副作用なし）
    pub fn close_camera(&mut self) -> bool {
        if self.capture != CaptureState::CameraOpen {
            return false;
        }
        self.capture = CaptureState::Idle;
        true
    }

    /// 撮影: 写真を保持し、カメラを閉じてローディング開始
    pub fn begin_capture(&mut self, data_uri: String) -> bool {
        if self.capture != CaptureState::CameraOpen {
            debug!(state = self.capture.as_str(), "capture ignored");
            return false;
        }
        self.photo = Some(data_uri);
        self.capture = CaptureState::Capturing;
        self.loading = true;
        true
    }

    /// デコード完了、分類へ
    pub fn begin_classify(&mut self) {
        if self.capture == CaptureState::Capturing {
            self.capture = CaptureState::Classifying;
        }
    }

    /// 分類結果を反映（成否にかかわらずローディング解除）
    pub fn finish_capture(&mut self, result: Result<Vec<Prediction>, ClassifyError>) {
        match result {
            Ok(predictions) => {
                let label = top_label(&predictions).unwrap_or(UNKNOWN_LABEL).to_string();
                debug!(%label, "classified");
                self.form.item = label.clone();
                self.classification = Some(label);
            }
            Err(e) => {
                error!("Error processing image: {}", e);
                self.error = Some(UiError::ImageFailed);
            }
        }
        self.loading = false;
        self.capture = CaptureState::Idle;
    }
}
