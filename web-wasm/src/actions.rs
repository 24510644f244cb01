//! 画面アクション
//!
//! 状態は1つの `RwSignal<InventoryState>` に置き、遷移関数で更新する。
//! ストア・分類器の呼び出しは `spawn_local` で行い、結果を `finish_*` で反映する。

use crate::bridge::{camera, classifier, store::JsStore, JsClock};
use futures::channel::oneshot;
use futures::StreamExt;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pantry_ai_common::{ClassifyError, InventoryState, InventoryStore, PixelTensor};

pub type AppState = RwSignal<InventoryState>;

/// ライブ購読ループを開始（コンポーネント破棄時に解除）
pub fn start_sync(state: AppState) {
    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

    spawn_local(async move {
        let subscription = match JsStore.subscribe() {
            Ok(subscription) => subscription,
            Err(e) => {
                state.update(|s| s.apply_snapshot(Err(e)));
                return;
            }
        };

        // キャンセルされると subscription ごと drop され解除される
        let mut events = subscription.take_until(cancel_rx);
        while let Some(event) = events.next().await {
            if let Err(e) = &event {
                gloo::console::error!("Error fetching inventory:", e.to_string());
            }
            state.update(|s| s.apply_snapshot(event));
        }
    });

    on_cleanup(move || {
        let _ = cancel_tx.send(());
    });
}

pub fn add_item(state: AppState) {
    let Some(new_item) = state.try_update(|s| s.prepare_add(&JsClock)).flatten() else {
        return;
    };
    spawn_local(async move {
        let result = JsStore.create(new_item).await;
        if let Err(e) = &result {
            gloo::console::error!("Error adding document:", e.to_string());
        }
        state.update(|s| s.finish_add(result));
    });
}

/// 数量を ±delta 更新
pub fn adjust_quantity(state: AppState, id: String, delta: i64) {
    let Some((quantity, patch)) = state.try_update(|s| s.prepare_adjust(&id, delta)).flatten() else {
        return;
    };
    spawn_local(async move {
        let result = JsStore.update(&id, patch).await;
        if let Err(e) = &result {
            gloo::console::error!("Error updating document:", e.to_string());
        }
        state.update(|s| s.finish_update(&id, quantity, result));
    });
}

pub fn delete_item(state: AppState, id: String) {
    spawn_local(async move {
        let result = JsStore.delete(&id).await;
        if let Err(e) = &result {
            gloo::console::error!("Error deleting document:", e.to_string());
        }
        state.update(|s| s.finish_delete(&id, result));
    });
}

pub fn search(state: AppState) {
    let Some(term) = state.try_update(|s| s.prepare_search()) else {
        return;
    };
    spawn_local(async move {
        let result = JsStore.query_by_item(&term).await;
        if let Err(e) = &result {
            gloo::console::error!("Error searching inventory:", e.to_string());
        }
        state.update(|s| s.finish_search(result));
    });
}

pub fn reset_search(state: AppState) {
    state.update(|s| s.reset_search());
}

pub fn open_camera(state: AppState) {
    if !state.try_update(|s| s.open_camera()).unwrap_or(false) {
        return;
    }
    spawn_local(async move {
        if let Err(message) = camera::start().await {
            gloo::console::error!("Error accessing camera:", message.clone());
            state.update(|s| s.finish_capture(Err(ClassifyError::Decode(message))));
        }
    });
}

pub fn close_camera(state: AppState) {
    if state.try_update(|s| s.close_camera()).unwrap_or(false) {
        camera::stop();
    }
}

/// 撮影して分類し、品名・分類欄へ反映
pub fn capture_photo(state: AppState) {
    let frame = camera::capture_frame();
    camera::stop();

    let data_uri = match frame {
        Ok(data_uri) => data_uri,
        Err(message) => {
            gloo::console::error!("Error capturing photo:", message.clone());
            state.update(|s| s.finish_capture(Err(ClassifyError::Decode(message))));
            return;
        }
    };

    if !state.try_update(|s| s.begin_capture(data_uri.clone())).unwrap_or(false) {
        return;
    }

    spawn_local(async move {
        let pipeline = classifier::pipeline();
        let result = match PixelTensor::from_data_uri(&data_uri) {
            Ok(tensor) => {
                state.update(|s| s.begin_classify());
                pipeline.classify_tensor(&tensor).await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            gloo::console::error!("Error processing image:", e.to_string());
        }
        state.update(|s| s.finish_capture(result));
    });
}
