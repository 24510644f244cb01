//! ホスト型ドキュメントDBへのブリッジ（/js/pantry-store.js）

use super::js_error_message;
use async_trait::async_trait;
use futures::channel::mpsc;
use pantry_ai_common::{
    parse_documents, InventoryItem, InventoryStore, ItemPatch, NewInventoryItem, StoreError, Subscription,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/pantry-store.js")]
extern "C" {
    /// レコードを作成し id を返す
    #[wasm_bindgen(js_name = "createItem", catch)]
    async fn create_item_js(item_json: &str) -> Result<JsValue, JsValue>;

    /// 指定フィールドのみ更新
    #[wasm_bindgen(js_name = "updateItem", catch)]
    async fn update_item_js(id: &str, patch_json: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = "deleteItem", catch)]
    async fn delete_item_js(id: &str) -> Result<JsValue, JsValue>;

    /// `item` の完全一致検索（InventoryItem配列のJSON文字列を返す）
    #[wasm_bindgen(js_name = "queryByItem", catch)]
    async fn query_by_item_js(name: &str) -> Result<JsValue, JsValue>;

    /// 全件のライブ購読を開始し、解除用ハンドルを返す
    #[wasm_bindgen(js_name = "subscribe", catch)]
    fn subscribe_js(
        on_snapshot: &Closure<dyn FnMut(String)>,
        on_error: &Closure<dyn FnMut(String)>,
    ) -> Result<u32, JsValue>;

    #[wasm_bindgen(js_name = "unsubscribe")]
    fn unsubscribe_js(handle: u32);
}

fn unavailable(error: JsValue) -> StoreError {
    StoreError::Unavailable(js_error_message(&error))
}

/// InventoryItem配列のJSONをパース（崩れたレコードは読み飛ばす）
pub fn parse_snapshot(json: &str) -> Result<Vec<InventoryItem>, StoreError> {
    parse_documents(json).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// JS ストアのハンドル（状態は JS 側が持つ）
#[derive(Debug, Clone, Copy, Default)]
pub struct JsStore;

#[async_trait(?Send)]
impl InventoryStore for JsStore {
    async fn create(&self, item: NewInventoryItem) -> Result<String, StoreError> {
        let json = serde_json::to_string(&item).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let id = create_item_js(&json).await.map_err(unavailable)?;
        id.as_string()
            .ok_or_else(|| StoreError::Corrupt("document id is not a string".into()))
    }

    async fn update(&self, id: &str, patch: ItemPatch) -> Result<(), StoreError> {
        let json = serde_json::to_string(&patch).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        update_item_js(id, &json).await.map_err(unavailable)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        delete_item_js(id).await.map_err(unavailable)?;
        Ok(())
    }

    async fn query_by_item(&self, name: &str) -> Result<Vec<InventoryItem>, StoreError> {
        let value = query_by_item_js(name).await.map_err(unavailable)?;
        let json = value
            .as_string()
            .ok_or_else(|| StoreError::Corrupt("query result is not a string".into()))?;
        parse_snapshot(&json)
    }

    fn subscribe(&self) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::unbounded();

        let snapshot_tx = tx.clone();
        let on_snapshot = Closure::<dyn FnMut(String)>::new(move |json: String| {
            let _ = snapshot_tx.unbounded_send(parse_snapshot(&json));
        });
        let on_error = Closure::<dyn FnMut(String)>::new(move |message: String| {
            let _ = tx.unbounded_send(Err(StoreError::Unavailable(message)));
        });

        let handle = subscribe_js(&on_snapshot, &on_error).map_err(unavailable)?;

        // コールバックは解除まで生かしておく
        Ok(Subscription::new(rx, move || {
            unsubscribe_js(handle);
            drop(on_snapshot);
            drop(on_error);
        }))
    }
}
