//! 日付の供給元
//!
//! 作成日はロケール表示形式の文字列として保存する。
//! 実際の時計はフロントエンドごとに注入する（CLI: chrono、Web: JS Date）。

/// 今日の日付を表示形式で返す
pub trait Clock {
    fn today(&self) -> String;
}

/// 固定日付（テスト用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new(date: impl Into<String>) -> Self {
        Self(date.into())
    }
}

impl Clock for FixedClock {
    fn today(&self) -> String {
        self.0.clone()
    }
}

impl<F> Clock for F
where
    F: Fn() -> String,
{
    fn today(&self) -> String {
        self()
    }
}
