//! 撮影・分類パイプライン
//!
//! Idle → CameraOpen → Capturing → Classifying → Idle
//!
//! 1. カメラの静止画（Data URI）をデコード
//! 2. 224×224 に最近傍リサイズしてテンソル化
//! 3. 分類器（初回のみ読み込み、以後は再利用）で推論
//! 4. 先頭ラベルを品名・分類欄へ書き込む
//!
//! テンソルは分類呼び出しのスコープ内でのみ生存し、成否にかかわらず直後に解放される。

use crate::error::ClassifyError;
use crate::state::InventoryState;
use crate::types::Prediction;
use async_trait::async_trait;
use base64::Engine as _;
use image::imageops::FilterType;
use image::{ImageFormat, RgbImage};
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;
use tracing::debug;

/// モデル入力の一辺（ピクセル）
pub const MODEL_INPUT_SIZE: u32 = 224;

/// 分類器への入力（RGB, HWC）
#[derive(Debug, Clone, PartialEq)]
pub struct PixelTensor {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelTensor {
    /// 画像バイト列（JPEG/PNG/WebP）からモデル入力を作る
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self, ClassifyError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ClassifyError::Decode(e.to_string()))?;
        let resized = image::imageops::resize(
            &image.to_rgb8(),
            MODEL_INPUT_SIZE,
            MODEL_INPUT_SIZE,
            FilterType::Nearest,
        );
        Ok(Self {
            width: resized.width(),
            height: resized.height(),
            data: resized.into_raw(),
        })
    }

    /// Data URI（`data:image/...;base64,...`）からモデル入力を作る
    pub fn from_data_uri(data_uri: &str) -> Result<Self, ClassifyError> {
        let bytes = decode_data_uri(data_uri)?;
        Self::from_image_bytes(&bytes)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// バッチ次元付きの形状 `[1, H, W, 3]`
    pub fn shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, 3]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// float32 に変換（値域は 0.0〜255.0 のまま）
    pub fn to_f32(&self) -> Vec<f32> {
        self.data.iter().map(|&v| v as f32).collect()
    }

    /// PNG にエンコード（外部分類器へ渡す用）
    pub fn to_png(&self) -> Result<Vec<u8>, ClassifyError> {
        let image = RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ClassifyError::Decode("tensor size mismatch".into()))?;
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| ClassifyError::Decode(e.to_string()))?;
        Ok(out.into_inner())
    }
}

/// Data URI の本体をデコード（base64 のみ対応）
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, ClassifyError> {
    let rest = data_uri
        .strip_prefix("data:")
        .ok_or_else(|| ClassifyError::Decode("not a data URI".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ClassifyError::Decode("data URI has no payload".into()))?;
    if !meta.ends_with(";base64") {
        return Err(ClassifyError::Decode(format!("unsupported data URI encoding: {}", meta)));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ClassifyError::Decode(e.to_string()))
}

/// 画像バイト列を Data URI にする
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// 読み込み済みの分類モデル
#[async_trait(?Send)]
pub trait ImageClassifier {
    /// 確信度順の予測（空もありうる）
    async fn classify(&self, tensor: &PixelTensor) -> Result<Vec<Prediction>, ClassifyError>;
}

/// 分類モデルの読み込み
#[async_trait(?Send)]
pub trait ModelLoader {
    type Model: ImageClassifier;

    async fn load(&self) -> Result<Self::Model, ClassifyError>;
}

/// 撮影・分類パイプライン
///
/// モデルは最初の分類時に一度だけ読み込み、インスタンスの生存中は再利用する。
/// フロントエンドはプロセスにつき1つだけ保持する。
pub struct ClassifyPipeline<L: ModelLoader> {
    loader: L,
    model: OnceCell<Rc<L::Model>>,
    loads: Cell<usize>,
}

impl<L: ModelLoader> ClassifyPipeline<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
            loads: Cell::new(0),
        }
    }

    /// モデルを取得（未読み込みなら読み込む）
    pub async fn model(&self) -> Result<Rc<L::Model>, ClassifyError> {
        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }
        debug!("loading classification model");
        let loaded = Rc::new(self.loader.load().await?);
        self.loads.set(self.loads.get() + 1);
        Ok(self.model.get_or_init(|| loaded).clone())
    }

    /// モデル読み込みが行われた回数
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub async fn classify_tensor(&self, tensor: &PixelTensor) -> Result<Vec<Prediction>, ClassifyError> {
        let model = self.model().await?;
        model.classify(tensor).await
    }

    /// Data URI をデコードして分類
    pub async fn classify_data_uri(&self, data_uri: &str) -> Result<Vec<Prediction>, ClassifyError> {
        let tensor = PixelTensor::from_data_uri(data_uri)?;
        self.classify_tensor(&tensor).await
    }

    /// 撮影から分類結果の反映までを実行
    ///
    /// カメラが開いていなければ何もせず false を返す。
    pub async fn capture(&self, state: &mut InventoryState, data_uri: String) -> bool {
        if !state.begin_capture(data_uri.clone()) {
            return false;
        }

        let result = match PixelTensor::from_data_uri(&data_uri) {
            Ok(tensor) => {
                state.begin_classify();
                self.classify_tensor(&tensor).await
            }
            Err(e) => Err(e),
        };

        state.finish_capture(result);
        true
    }
}
