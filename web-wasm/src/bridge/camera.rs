//! カメラへのブリッジ（/js/camera.js）

use super::js_error_message;
use wasm_bindgen::prelude::*;

/// プレビュー用 video 要素の id
pub const VIDEO_ID: &str = "camera-preview";

#[wasm_bindgen(module = "/js/camera.js")]
extern "C" {
    #[wasm_bindgen(js_name = "startCamera", catch)]
    async fn start_camera_js(video_id: &str) -> Result<JsValue, JsValue>;

    /// 現在のフレームを JPEG の Data URI で返す
    #[wasm_bindgen(js_name = "captureFrame", catch)]
    fn capture_frame_js(video_id: &str) -> Result<String, JsValue>;

    #[wasm_bindgen(js_name = "stopCamera")]
    fn stop_camera_js(video_id: &str);
}

pub async fn start() -> Result<(), String> {
    start_camera_js(VIDEO_ID)
        .await
        .map(|_| ())
        .map_err(|e| js_error_message(&e))
}

pub fn capture_frame() -> Result<String, String> {
    capture_frame_js(VIDEO_ID).map_err(|e| js_error_message(&e))
}

pub fn stop() {
    stop_camera_js(VIDEO_ID);
}
