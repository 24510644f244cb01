//! 端末セッション
//!
//! 在庫ファイル・同期コントローラ・分類パイプラインを束ねる。
//! 分類パイプラインは最初に写真を使うときに作り、セッション中は使い回す。

use crate::camera::CameraSource;
use crate::classifier::{CommandClassifierLoader, CommandSpec};
use crate::clock::LocalClock;
use crate::config::Config;
use crate::error::Result;
use crate::store::JsonFileStore;
use indicatif::{ProgressBar, ProgressStyle};
use pantry_ai_common::{ClassifyPipeline, InventoryState, Prediction, SyncController, UiError};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub type Pipeline = ClassifyPipeline<CommandClassifierLoader>;

pub struct Session {
    config: Config,
    controller: SyncController<JsonFileStore>,
    pipeline: Option<Pipeline>,
}

impl Session {
    /// 在庫ファイルを開いてライブ購読を開始
    pub fn open(config: Config, store_override: Option<PathBuf>) -> Result<Self> {
        let store_path = match store_override {
            Some(path) => path,
            None => config.resolve_store_path()?,
        };
        let store = JsonFileStore::open(&store_path)?;
        let mut controller = SyncController::new(store, LocalClock);
        controller.start();
        Ok(Self {
            config,
            controller,
            pipeline: None,
        })
    }

    /// 分類パイプラインを差し込む（テスト・独自分類器用）
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controller(&self) -> &SyncController<JsonFileStore> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SyncController<JsonFileStore> {
        &mut self.controller
    }

    pub fn state(&self) -> &InventoryState {
        self.controller.state()
    }

    /// 届いている購読通知を反映
    pub fn refresh(&mut self) {
        let applied = self.controller.pump();
        debug!(applied, "snapshots applied");
    }

    /// 画面エラーを取り出す（取り出したら消える）
    pub fn take_error(&mut self) -> Option<UiError> {
        let error = self.controller.state().error();
        self.controller.state_mut().clear_error();
        error
    }

    /// 撮影元から静止画を取り、分類してフォームへ反映
    pub async fn capture(&mut self, source: &CameraSource) -> Result<()> {
        let data_uri = source.capture()?;
        let pipeline = ensure_pipeline(&mut self.pipeline, &self.config)?;

        if !self.controller.open_camera() {
            debug!("capture already in progress");
            return Ok(());
        }

        let spinner = spinner("分類中...");
        self.controller.capture(pipeline, data_uri).await;
        spinner.finish_and_clear();
        Ok(())
    }

    /// 画像を分類して予測リストを返す（在庫は変更しない）
    pub async fn classify(&mut self, source: &CameraSource) -> Result<Vec<Prediction>> {
        let data_uri = source.capture()?;
        let pipeline = ensure_pipeline(&mut self.pipeline, &self.config)?;
        let spinner = spinner("分類中...");
        let result = pipeline.classify_data_uri(&data_uri).await;
        spinner.finish_and_clear();
        Ok(result?)
    }

    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }
}

/// 分類パイプラインを初回だけ作る（以降は同じモデルを使い回す）
fn ensure_pipeline<'a>(slot: &'a mut Option<Pipeline>, config: &Config) -> Result<&'a Pipeline> {
    let pipeline = match slot.take() {
        Some(pipeline) => pipeline,
        None => ClassifyPipeline::new(CommandClassifierLoader::new(CommandSpec::from_config(config)?)),
    };
    Ok(slot.insert(pipeline))
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
