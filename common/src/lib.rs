//! Pantry AI Common Library
//!
//! CLIとWeb(WASM)で共有される在庫モデル・画面状態・同期ロジック

pub mod clock;
pub mod controller;
pub mod error;
pub mod form;
pub mod pagination;
pub mod parser;
pub mod pipeline;
pub mod state;
pub mod store;
pub mod types;

pub use clock::{Clock, FixedClock};
pub use controller::SyncController;
pub use error::{ClassifyError, Error, Result, StoreError, UiError};
pub use form::ItemForm;
pub use pagination::{paginate, total_pages, PAGE_SIZE};
pub use parser::{extract_json, parse_documents, parse_predictions};
pub use pipeline::{ClassifyPipeline, ImageClassifier, ModelLoader, PixelTensor, MODEL_INPUT_SIZE};
pub use state::{CaptureState, InventoryState};
pub use store::{InventoryStore, MemoryStore, SnapshotEvent, Subscription};
pub use types::{InventoryItem, ItemPatch, NewInventoryItem, Prediction, WeightUnit, UNKNOWN_LABEL};
