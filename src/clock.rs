use pantry_ai_common::Clock;

/// ローカル日付（例: 3/14/2026）
pub const DATE_FORMAT: &str = "%-m/%-d/%Y";

/// システム時計
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> String {
        chrono::Local::now().format(DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_date_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).expect("日付生成失敗");
        assert_eq!(date.format(DATE_FORMAT).to_string(), "3/4/2026");
    }

    #[test]
    fn test_today_not_empty() {
        let today = LocalClock.today();
        assert_eq!(today.matches('/').count(), 2);
    }
}
