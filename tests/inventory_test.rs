//! 在庫操作の結合テスト
//!
//! JSONファイルストア上で同期コントローラと撮影・分類パイプラインを通しで検証

use async_trait::async_trait;
use pantry_ai::render;
use pantry_ai::store::JsonFileStore;
use pantry_ai_common::pipeline::encode_data_uri;
use pantry_ai_common::{
    ClassifyError, ClassifyPipeline, FixedClock, ImageClassifier, ModelLoader, PixelTensor, Prediction,
    SyncController, UiError,
};
use std::cell::Cell;
use std::rc::Rc;
use tempfile::tempdir;

struct FixedModel(Vec<Prediction>);

#[async_trait(?Send)]
impl ImageClassifier for FixedModel {
    async fn classify(&self, tensor: &PixelTensor) -> Result<Vec<Prediction>, ClassifyError> {
        assert_eq!(tensor.shape(), [1, 224, 224, 3]);
        Ok(self.0.clone())
    }
}

struct CountingLoader {
    predictions: Vec<Prediction>,
    loads: Rc<Cell<usize>>,
}

#[async_trait(?Send)]
impl ModelLoader for CountingLoader {
    type Model = FixedModel;

    async fn load(&self) -> Result<FixedModel, ClassifyError> {
        self.loads.set(self.loads.get() + 1);
        Ok(FixedModel(self.predictions.clone()))
    }
}

fn jpeg_data_uri() -> String {
    let image = image::RgbImage::from_pixel(300, 200, image::Rgb([250, 220, 60]));
    let mut out = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("JPEG生成失敗");
    encode_data_uri("image/jpeg", &out.into_inner())
}

fn open_controller(dir: &std::path::Path) -> SyncController<JsonFileStore> {
    let store = JsonFileStore::open(&dir.join("pantry.json")).expect("オープン失敗");
    let mut controller = SyncController::new(store, FixedClock::new("3/14/2026"));
    controller.start();
    controller
}

/// 追加 → 通知 → 一覧に1件（今日の日付）
#[tokio::test]
async fn test_add_item_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = open_controller(dir.path());

    let form = controller.form_mut();
    form.item = "Rice".into();
    form.quantity = "3".into();
    form.weight = "2".into();
    form.weight_unit = "kg".into();
    assert!(controller.add_item().await);
    controller.pump();

    let rows = controller.state().inventory();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date_added, "3/14/2026");
    assert_eq!(rows[0].classification.as_deref(), Some("Unknown"));

    let table = render::render_table(controller.state());
    assert!(table.contains("6.00"));
}

/// 空欄があればストアへは何も書かない
#[tokio::test]
async fn test_add_blank_field_writes_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = open_controller(dir.path());
    controller.form_mut().item = "Rice".into();

    assert!(!controller.add_item().await);
    assert_eq!(controller.state().error(), Some(UiError::MissingFields));
    assert!(!dir.path().join("pantry.json").exists());
}

/// 撮影 → 分類 → 追加で品名と分類が入る
#[tokio::test]
async fn test_capture_then_add() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = open_controller(dir.path());
    let loads = Rc::new(Cell::new(0));
    let pipeline = ClassifyPipeline::new(CountingLoader {
        predictions: vec![Prediction::new("banana", 0.93), Prediction::new("lemon", 0.04)],
        loads: loads.clone(),
    });

    assert!(controller.open_camera());
    assert!(controller.capture(&pipeline, jpeg_data_uri()).await);
    assert_eq!(controller.state().form.item, "banana");
    assert!(!controller.state().is_loading());

    let form = controller.form_mut();
    form.quantity = "6".into();
    form.weight = "0.12".into();
    assert!(controller.add_item().await);
    controller.pump();

    let row = &controller.state().inventory()[0];
    assert_eq!(row.item, "banana");
    assert_eq!(row.classification.as_deref(), Some("banana"));
    assert!(row.photo_url.as_deref().unwrap_or_default().starts_with("data:image/jpeg;base64,"));

    // 2回目の撮影でもモデルは読み直さない
    assert!(controller.open_camera());
    controller.capture(&pipeline, jpeg_data_uri()).await;
    assert_eq!(loads.get(), 1);
}

/// 検索 → 数量変更 → 解除
#[tokio::test]
async fn test_search_update_reset() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = open_controller(dir.path());
    for (name, quantity) in [("Milk", "1"), ("Eggs", "12"), ("Milk", "2")] {
        let form = controller.form_mut();
        form.item = name.into();
        form.quantity = quantity.into();
        form.weight = "1".into();
        assert!(controller.add_item().await);
    }
    controller.pump();
    assert_eq!(controller.state().inventory().len(), 3);

    assert!(controller.search_for("Milk").await);
    assert_eq!(controller.state().active_items().len(), 2);

    let id = controller.state().active_items()[0].id.clone();
    assert!(controller.increment(&id).await);
    assert_eq!(controller.store().documents().iter().find(|d| d.id == id).map(|d| d.quantity),
        Some(controller.state().active_items()[0].quantity));

    controller.reset_search();
    controller.pump();
    assert_eq!(controller.state().active_items().len(), 3);
}
