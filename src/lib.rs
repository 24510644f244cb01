//! pantry-ai: 食品在庫トラッカーの端末版
//!
//! 在庫モデル・画面状態・同期ロジックは `pantry_ai_common` を使用

pub mod camera;
pub mod classifier;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod shell;
pub mod store;
