//! 入力フォーム
//!
//! フォームの値は文字列のまま保持し、追加時にだけ検証・数値変換する。
//! 検証は「空欄でないこと」のみ。数値として読めない入力は 0 として保存される。

use crate::error::UiError;
use crate::types::{NewInventoryItem, WeightUnit, UNKNOWN_LABEL};

/// 追加フォームの入力値
#[derive(Debug, Clone, PartialEq)]
pub struct ItemForm {
    pub item: String,
    pub quantity: String,
    pub weight: String,
    pub weight_unit: String,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            item: String::new(),
            quantity: String::new(),
            weight: String::new(),
            weight_unit: WeightUnit::default().as_str().to_string(),
        }
    }
}

impl ItemForm {
    /// 必須4項目のいずれかが空欄か
    pub fn has_blank_field(&self) -> bool {
        [&self.item, &self.quantity, &self.weight, &self.weight_unit]
            .iter()
            .any(|v| v.trim().is_empty())
    }

    /// 作成リクエストを組み立てる
    ///
    /// # Arguments
    /// * `date_added` - 作成日（表示形式の文字列）
    /// * `photo_url` - 撮影済みの写真（Data URI）
    /// * `classification` - 分類ラベル（None なら "Unknown"）
    pub fn to_new_item(
        &self,
        date_added: String,
        photo_url: Option<String>,
        classification: Option<String>,
    ) -> Result<NewInventoryItem, UiError> {
        if self.has_blank_field() {
            return Err(UiError::MissingFields);
        }
        // 単位はセレクタ由来なので既知の値以外は未入力扱い
        let weight_unit: WeightUnit = self
            .weight_unit
            .parse()
            .map_err(|_| UiError::MissingFields)?;

        Ok(NewInventoryItem {
            item: self.item.clone(),
            quantity: parse_quantity(&self.quantity),
            weight: parse_weight(&self.weight),
            weight_unit,
            date_added,
            photo_url,
            classification: Some(classification.unwrap_or_else(|| UNKNOWN_LABEL.to_string())),
        })
    }
}

/// 整数として読める先頭部分を解釈する（"12abc" → 12、"3.7" → 3、読めなければ 0）
pub fn parse_quantity(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for c in rest.chars() {
        let Some(d) = c.to_digit(10) else { break };
        value = value.saturating_mul(10).saturating_add(d as i64);
    }

    if negative {
        -value
    } else {
        value
    }
}

/// 小数として読める先頭部分を解釈する（"1.5kg" → 1.5、読めなければ 0.0）
pub fn parse_weight(input: &str) -> f64 {
    let s = input.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let candidate = &s[..end];

    // 最長一致: 後ろから削って最初にパースできた値
    (1..=candidate.len())
        .rev()
        .filter_map(|len| candidate[..len].parse::<f64>().ok())
        .find(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ItemForm {
        ItemForm {
            item: "apple".to_string(),
            quantity: "4".to_string(),
            weight: "0.25".to_string(),
            weight_unit: "kg".to_string(),
        }
    }

    #[test]
    fn test_default_unit_is_kg() {
        let form = ItemForm::default();
        assert_eq!(form.weight_unit, "kg");
        assert!(form.item.is_empty());
    }

    #[test]
    fn test_blank_fields_detected_after_trim() {
        for field in 0..4 {
            let mut form = filled_form();
            let target = match field {
                0 => &mut form.item,
                1 => &mut form.quantity,
                2 => &mut form.weight,
                _ => &mut form.weight_unit,
            };
            *target = "   ".to_string();
            assert!(form.has_blank_field(), "field {} should be blank", field);
            assert_eq!(
                form.to_new_item("1/1/2026".into(), None, None),
                Err(UiError::MissingFields)
            );
        }
    }

    #[test]
    fn test_to_new_item_defaults_classification() {
        let item = filled_form()
            .to_new_item("10/18/2026".into(), None, None)
            .expect("作成失敗");
        assert_eq!(item.item, "apple");
        assert_eq!(item.quantity, 4);
        assert!((item.weight - 0.25).abs() < f64::EPSILON);
        assert_eq!(item.weight_unit, WeightUnit::Kg);
        assert_eq!(item.date_added, "10/18/2026");
        assert_eq!(item.classification.as_deref(), Some("Unknown"));
        assert!(item.photo_url.is_none());
    }

    #[test]
    fn test_to_new_item_keeps_photo_and_label() {
        let item = filled_form()
            .to_new_item(
                "10/18/2026".into(),
                Some("data:image/png;base64,AAAA".into()),
                Some("Granny Smith".into()),
            )
            .unwrap();
        assert_eq!(item.photo_url.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(item.classification.as_deref(), Some("Granny Smith"));
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let mut form = filled_form();
        form.weight_unit = "ounce".to_string();
        assert_eq!(
            form.to_new_item("1/1/2026".into(), None, None),
            Err(UiError::MissingFields)
        );
    }

    #[test]
    fn test_parse_quantity_prefix() {
        assert_eq!(parse_quantity("12"), 12);
        assert_eq!(parse_quantity("  7 cans"), 7);
        assert_eq!(parse_quantity("3.9"), 3);
        assert_eq!(parse_quantity("-2"), -2);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity(""), 0);
    }

    #[test]
    fn test_parse_weight_prefix() {
        assert!((parse_weight("1.5") - 1.5).abs() < f64::EPSILON);
        assert!((parse_weight("2.25kg") - 2.25).abs() < f64::EPSILON);
        assert!((parse_weight(".5") - 0.5).abs() < f64::EPSILON);
        assert!((parse_weight("1e2") - 100.0).abs() < f64::EPSILON);
        assert!((parse_weight("3e") - 3.0).abs() < f64::EPSILON);
        assert_eq!(parse_weight("heavy"), 0.0);
        assert_eq!(parse_weight("-"), 0.0);
    }
}
