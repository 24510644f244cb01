//! 外部コマンド分類器
//!
//! 設定された分類コマンドに 224×224 の PNG を標準入力で渡し、
//! 標準出力の JSON 予測リストを読む。
//!
//! ```text
//! $ mobilenet-classify < photo.png
//! [{"className": "banana", "probability": 0.93}, ...]
//! ```

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use pantry_ai_common::{parse_predictions, ClassifyError, ImageClassifier, ModelLoader, PixelTensor, Prediction};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            program: config.resolve_classifier_command()?,
            args: config.classifier_args.clone(),
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
        })
    }
}

/// 分類コマンドの読み込み（`--version` で起動確認のみ行う）
pub struct CommandClassifierLoader {
    command: CommandSpec,
}

impl CommandClassifierLoader {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }
}

#[async_trait(?Send)]
impl ModelLoader for CommandClassifierLoader {
    type Model = CommandClassifier;

    async fn load(&self) -> std::result::Result<CommandClassifier, ClassifyError> {
        let probe = Command::new(&self.command.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output();
        let output = tokio::time::timeout(self.command.timeout, probe)
            .await
            .map_err(|_| ClassifyError::ModelLoad(format!("{} timed out", self.command.program)))?
            .map_err(|e| ClassifyError::ModelLoad(format!("{}: {}", self.command.program, e)))?;

        if !output.status.success() {
            return Err(ClassifyError::ModelLoad(format!(
                "{} --version failed (code {:?})",
                self.command.program,
                output.status.code()
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(program = %self.command.program, %version, "classifier ready");
        Ok(CommandClassifier {
            command: self.command.clone(),
        })
    }
}

pub struct CommandClassifier {
    command: CommandSpec,
}

#[async_trait(?Send)]
impl ImageClassifier for CommandClassifier {
    async fn classify(&self, tensor: &PixelTensor) -> std::result::Result<Vec<Prediction>, ClassifyError> {
        let png = tensor.to_png()?;

        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ClassifyError::Classify(format!("{}: {}", self.command.program, e)))?;

        // 標準入力への書き込みも含めて制限時間内に収める
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(&png).await {
                    // 入力を読まずに終了した分類器は出力で判断する
                    Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };
        let run = async move {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            fed?;
            output
        };

        let output = tokio::time::timeout(self.command.timeout, run)
            .await
            .map_err(|_| ClassifyError::Classify(format!("{} timed out", self.command.program)))?
            .map_err(|e| ClassifyError::Classify(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClassifyError::Classify(format!(
                "{} failed (code {:?}): {}",
                self.command.program,
                output.status.code(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let predictions = parse_predictions(&stdout).map_err(|e| ClassifyError::Classify(e.to_string()))?;
        debug!(count = predictions.len(), "predictions received");
        Ok(predictions)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pantry_ai_common::ClassifyPipeline;

    fn sh_command(script: &str) -> CommandSpec {
        CommandSpec {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
            timeout: Duration::from_secs(10),
        }
    }

    fn tensor() -> PixelTensor {
        let image = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut png = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .expect("PNG生成失敗");
        PixelTensor::from_image_bytes(&png.into_inner()).expect("テンソル生成失敗")
    }

    #[tokio::test]
    async fn test_classify_reads_stdout() {
        let classifier = CommandClassifier {
            command: sh_command(r#"cat > /dev/null; echo '[{"className": "banana", "probability": 0.9}]'"#),
        };
        let predictions = classifier.classify(&tensor()).await.expect("分類失敗");
        assert_eq!(predictions, vec![Prediction::new("banana", 0.9)]);
    }

    #[tokio::test]
    async fn test_classify_nonzero_exit() {
        let classifier = CommandClassifier {
            command: sh_command("cat > /dev/null; echo boom >&2; exit 3"),
        };
        let err = classifier.classify(&tensor()).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Classify(msg) if msg.contains("boom")));
    }

    /// 入力を読まない分類器でも制限時間で打ち切る
    #[tokio::test]
    async fn test_timeout_covers_stdin_write() {
        let mut seed = 0x2545_f491u32;
        let noise = image::RgbImage::from_fn(224, 224, |_, _| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let [r, g, b, _] = seed.to_le_bytes();
            image::Rgb([r, g, b])
        });
        let mut png = std::io::Cursor::new(Vec::new());
        noise
            .write_to(&mut png, image::ImageFormat::Png)
            .expect("PNG生成失敗");
        let tensor = PixelTensor::from_image_bytes(&png.into_inner()).expect("テンソル生成失敗");
        assert!(tensor.to_png().expect("PNG変換失敗").len() > 128 * 1024);

        let classifier = CommandClassifier {
            command: CommandSpec {
                timeout: Duration::from_secs(1),
                ..sh_command("sleep 8; echo '[]'")
            },
        };
        let started = std::time::Instant::now();
        let err = classifier.classify(&tensor).await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(err, ClassifyError::Classify(msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_load_missing_program() {
        let loader = CommandClassifierLoader::new(CommandSpec {
            program: "/nonexistent/classifier-12345".into(),
            args: vec![],
            timeout: Duration::from_secs(5),
        });
        let pipeline = ClassifyPipeline::new(loader);
        assert!(matches!(pipeline.model().await, Err(ClassifyError::ModelLoad(_))));
    }
}
