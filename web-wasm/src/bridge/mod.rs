//! JavaScript Bridge
//!
//! ホスト型DB・MobileNet・カメラはすべて JS 側に置き、
//! Rust からは JSON 文字列とバイト列だけを受け渡す。

pub mod camera;
pub mod classifier;
pub mod store;

use pantry_ai_common::Clock;
use wasm_bindgen::JsValue;

/// ブラウザの日付（en-US ロケール表示、例: 3/14/2026）
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn today(&self) -> String {
        js_sys::Date::new_0()
            .to_locale_date_string("en-US", &JsValue::UNDEFINED)
            .into()
    }
}

/// JS 例外をメッセージ文字列にする
pub fn js_error_message(error: &JsValue) -> String {
    if let Some(message) = error.as_string() {
        return message;
    }
    js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}
