//! 分類器出力パーサー
//!
//! 外部分類器（コマンド・JSブリッジ）の出力から予測リストを取り出す

use crate::error::{Error, Result};
use crate::types::{InventoryItem, Prediction};
use tracing::warn;

/// 出力文字列からJSON配列部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列
/// 3. エラー
///
/// # Examples
/// ```
/// use pantry_ai_common::extract_json;
///
/// let output = "loaded model\n[{\"label\": \"banana\", \"confidence\": 0.9}]";
/// let json = extract_json(output).unwrap();
/// assert!(json.starts_with('['));
/// ```
pub fn extract_json(output: &str) -> Result<&str> {
    if let Some(start_marker) = output.find("```json") {
        let start = start_marker + 7;
        if let Some(end_offset) = output[start..].find("```") {
            let end = start + end_offset;
            return Ok(output[start..end].trim());
        }
    }

    if let Some(start) = output.find('[') {
        if let Some(end) = output.rfind(']') {
            if end >= start {
                return Ok(&output[start..=end]);
            }
        }
    }

    Err(Error::Parse("no JSON array in classifier output".into()))
}

/// 予測リストをパース（`className`/`probability` 形式も受け付ける）
///
/// 確信度の降順に並べ替えて返す。
pub fn parse_predictions(output: &str) -> Result<Vec<Prediction>> {
    let json_str = extract_json(output)?;
    let mut predictions: Vec<Prediction> = serde_json::from_str(json_str.trim())?;
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Ok(predictions)
}

/// ストアのスナップショット（レコード配列のJSON）を読む
///
/// 配列として読めなければエラー。形の崩れたレコードは警告を出して読み飛ばす。
pub fn parse_documents(json: &str) -> Result<Vec<InventoryItem>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut items = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<InventoryItem>(value) {
            Ok(item) => items.push(item),
            Err(e) => warn!("skipping malformed document: {}", e),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_with_block() {
        let output = r#"Predictions:
```json
[{"label": "banana", "confidence": 0.91}]
```
done"#;
        let json = extract_json(output).unwrap();
        assert!(json.contains("banana"));
        assert!(!json.contains("```"));
    }

    #[test]
    fn test_extract_json_raw() {
        let output = r#"[{"label": "orange", "confidence": 0.5}]"#;
        assert_eq!(extract_json(output).unwrap(), output);
    }

    #[test]
    fn test_extract_json_missing() {
        let result = extract_json("model not found");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_predictions_mobilenet_shape() {
        let output = r#"[
            {"className": "granny smith", "probability": 0.12},
            {"className": "banana", "probability": 0.81}
        ]"#;
        let predictions = parse_predictions(output).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].label, "banana");
        assert!((predictions[0].confidence - 0.81).abs() < 1e-6);
    }

    #[test]
    fn test_parse_predictions_empty() {
        assert!(parse_predictions("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_predictions_invalid_json() {
        let result = parse_predictions("[{\"label\": }]");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_documents_null_numbers() {
        let json = r#"[
            {"id": "a", "item": "Rice", "quantity": 2, "weight": 1.5,
             "weightUnit": "kg", "dateAdded": "3/14/2026"},
            {"id": "b", "item": "Oats", "quantity": null, "weight": null,
             "weightUnit": "gram", "dateAdded": "3/14/2026"}
        ]"#;
        let items = parse_documents(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].quantity, 0);
        assert_eq!(items[1].weight, 0.0);
    }

    #[test]
    fn test_parse_documents_skips_malformed() {
        let json = r#"[
            {"id": "a", "item": "Rice", "quantity": 2, "weight": 1.5,
             "weightUnit": "kg", "dateAdded": "3/14/2026"},
            {"id": "b", "item": "Oats", "quantity": 1, "weight": 1,
             "weightUnit": "bushel", "dateAdded": "3/14/2026"},
            "not a record"
        ]"#;
        let items = parse_documents(json).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "a");
    }

    #[test]
    fn test_parse_documents_not_array() {
        assert!(matches!(parse_documents("{}"), Err(Error::Json(_))));
    }
}
