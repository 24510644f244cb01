//! MobileNet 分類器へのブリッジ（/js/classifier.js）
//!
//! デコード・リサイズ済みの 224×224 RGB を JS に渡し、
//! JS 側でテンソル化・推論・解放を行う。

use super::js_error_message;
use async_trait::async_trait;
use pantry_ai_common::{
    parse_predictions, ClassifyError, ClassifyPipeline, ImageClassifier, ModelLoader, PixelTensor,
    Prediction,
};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/classifier.js")]
extern "C" {
    /// モデルを読み込みハンドルを返す
    #[wasm_bindgen(js_name = "loadModel", catch)]
    async fn load_model_js() -> Result<JsValue, JsValue>;

    /// RGB バイト列を分類し、予測配列のJSON文字列を返す
    #[wasm_bindgen(js_name = "classifyPixels", catch)]
    async fn classify_pixels_js(
        model: &JsValue,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<JsValue, JsValue>;
}

pub struct MobileNetLoader;

#[async_trait(?Send)]
impl ModelLoader for MobileNetLoader {
    type Model = MobileNetModel;

    async fn load(&self) -> Result<MobileNetModel, ClassifyError> {
        let handle = load_model_js()
            .await
            .map_err(|e| ClassifyError::ModelLoad(js_error_message(&e)))?;
        gloo::console::log!("MobileNet loaded");
        Ok(MobileNetModel { handle })
    }
}

pub struct MobileNetModel {
    handle: JsValue,
}

#[async_trait(?Send)]
impl ImageClassifier for MobileNetModel {
    async fn classify(&self, tensor: &PixelTensor) -> Result<Vec<Prediction>, ClassifyError> {
        let value = classify_pixels_js(&self.handle, tensor.as_bytes(), tensor.width(), tensor.height())
            .await
            .map_err(|e| ClassifyError::Classify(js_error_message(&e)))?;
        let json = value
            .as_string()
            .ok_or_else(|| ClassifyError::Classify("predictions are not a string".into()))?;
        parse_predictions(&json).map_err(|e| ClassifyError::Classify(e.to_string()))
    }
}

pub type Pipeline = ClassifyPipeline<MobileNetLoader>;

thread_local! {
    static PIPELINE: Rc<Pipeline> = Rc::new(ClassifyPipeline::new(MobileNetLoader));
}

/// ページ全体で共有するパイプライン（モデルは最初の分類時に1回だけ読み込む）
pub fn pipeline() -> Rc<Pipeline> {
    PIPELINE.with(Rc::clone)
}
