//! 在庫データの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - InventoryItem: ストアに保存された在庫レコード
//! - NewInventoryItem: 作成時に送るレコード（id なし）
//! - ItemPatch: フィールド単位の部分更新
//! - Prediction: 画像分類器の出力

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 分類できなかった場合のラベル
pub const UNKNOWN_LABEL: &str = "Unknown";

/// 重量単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "kg")]
    Kg,
    #[serde(rename = "pound")]
    Pound,
    #[serde(rename = "litre")]
    Litre,
    #[serde(rename = "milliliter")]
    Milliliter,
    #[serde(rename = "gram")]
    Gram,
    #[serde(rename = "tablespoon")]
    Tablespoon,
    #[serde(rename = "serving size")]
    ServingSize,
}

impl WeightUnit {
    /// セレクタに並べる順序
    pub const ALL: [WeightUnit; 7] = [
        WeightUnit::Kg,
        WeightUnit::Pound,
        WeightUnit::Litre,
        WeightUnit::Milliliter,
        WeightUnit::Gram,
        WeightUnit::Tablespoon,
        WeightUnit::ServingSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Pound => "pound",
            WeightUnit::Litre => "litre",
            WeightUnit::Milliliter => "milliliter",
            WeightUnit::Gram => "gram",
            WeightUnit::Tablespoon => "tablespoon",
            WeightUnit::ServingSize => "serving size",
        }
    }
}

impl FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeightUnit::ALL
            .iter()
            .copied()
            .find(|unit| unit.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown weight unit: {}", s))
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 在庫レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub item: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub date_added: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

impl InventoryItem {
    /// 表示用の総重量（重量 × 数量）
    pub fn total_weight(&self) -> f64 {
        self.weight * self.quantity as f64
    }

    /// id と本体に分ける
    pub fn into_parts(self) -> (String, NewInventoryItem) {
        (
            self.id,
            NewInventoryItem {
                item: self.item,
                quantity: self.quantity,
                weight: self.weight,
                weight_unit: self.weight_unit,
                date_added: self.date_added,
                photo_url: self.photo_url,
                classification: self.classification,
            },
        )
    }
}

/// 数値欄の null は 0 として読む（NaN は JSON 化で null になる）
fn null_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 作成リクエスト（id はストアが採番する）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub item: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub date_added: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

impl NewInventoryItem {
    pub fn with_id(self, id: impl Into<String>) -> InventoryItem {
        InventoryItem {
            id: id.into(),
            item: self.item,
            quantity: self.quantity,
            weight: self.weight,
            weight_unit: self.weight_unit,
            date_added: self.date_added,
            photo_url: self.photo_url,
            classification: self.classification,
        }
    }
}

/// 部分更新（None のフィールドは送らない）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

impl ItemPatch {
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    /// レコードにパッチを適用
    pub fn apply_to(&self, item: &mut InventoryItem) {
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(photo_url) = &self.photo_url {
            item.photo_url = Some(photo_url.clone());
        }
        if let Some(classification) = &self.classification {
            item.classification = Some(classification.clone());
        }
    }
}

/// 分類結果（MobileNet の className / probability も受け付ける）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(alias = "className")]
    pub label: String,

    #[serde(alias = "probability", default)]
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// 最も確信度の高いラベル（同点なら先頭）
pub fn top_label(predictions: &[Prediction]) -> Option<&str> {
    let mut best: Option<&Prediction> = None;
    for p in predictions {
        match best {
            Some(b) if b.confidence >= p.confidence => {}
            _ => best = Some(p),
        }
    }
    best.map(|p| p.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> InventoryItem {
        InventoryItem {
            id: "abc".to_string(),
            item: "rice".to_string(),
            quantity: 3,
            weight: 1.5,
            weight_unit: WeightUnit::Kg,
            date_added: "10/18/2026".to_string(),
            photo_url: None,
            classification: Some("Unknown".to_string()),
        }
    }

    #[test]
    fn test_weight_unit_wire_names() {
        let json = serde_json::to_string(&WeightUnit::ServingSize).unwrap();
        assert_eq!(json, "\"serving size\"");

        let unit: WeightUnit = serde_json::from_str("\"milliliter\"").unwrap();
        assert_eq!(unit, WeightUnit::Milliliter);
    }

    #[test]
    fn test_weight_unit_from_str() {
        assert_eq!("kg".parse::<WeightUnit>().unwrap(), WeightUnit::Kg);
        assert_eq!(" tablespoon ".parse::<WeightUnit>().unwrap(), WeightUnit::Tablespoon);
        assert!("ounce".parse::<WeightUnit>().is_err());
        assert!("".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn test_weight_unit_order() {
        let names: Vec<&str> = WeightUnit::ALL.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            names,
            vec!["kg", "pound", "litre", "milliliter", "gram", "tablespoon", "serving size"]
        );
        assert_eq!(WeightUnit::default(), WeightUnit::Kg);
    }

    #[test]
    fn test_inventory_item_serialize_camel_case() {
        let json = serde_json::to_string(&sample_item()).expect("シリアライズ失敗");
        assert!(json.contains("\"weightUnit\":\"kg\""));
        assert!(json.contains("\"dateAdded\":\"10/18/2026\""));
        assert!(!json.contains("photoUrl"));
    }

    #[test]
    fn test_inventory_item_deserialize_missing_optionals() {
        let json = r#"{
            "id": "x1",
            "item": "flour",
            "quantity": 2,
            "weight": 0.5,
            "weightUnit": "pound",
            "dateAdded": "1/2/2026"
        }"#;
        let item: InventoryItem = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(item.item, "flour");
        assert_eq!(item.weight_unit, WeightUnit::Pound);
        assert!(item.photo_url.is_none());
        assert!(item.classification.is_none());
    }

    #[test]
    fn test_total_weight() {
        let item = sample_item();
        assert!((item.total_weight() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quantity_patch_serializes_single_field() {
        let json = serde_json::to_string(&ItemPatch::quantity(7)).unwrap();
        assert_eq!(json, r#"{"quantity":7}"#);
    }

    #[test]
    fn test_patch_apply_keeps_other_fields() {
        let mut item = sample_item();
        ItemPatch::quantity(-1).apply_to(&mut item);
        assert_eq!(item.quantity, -1);
        assert_eq!(item.item, "rice");
        assert_eq!(item.classification.as_deref(), Some("Unknown"));
    }

    #[test]
    fn test_prediction_accepts_mobilenet_fields() {
        let json = r#"[{"className": "banana", "probability": 0.91}]"#;
        let preds: Vec<Prediction> = serde_json::from_str(json).unwrap();
        assert_eq!(preds[0].label, "banana");
        assert!((preds[0].confidence - 0.91).abs() < 1e-6);
    }

    #[test]
    fn test_top_label() {
        let preds = vec![
            Prediction::new("orange", 0.2),
            Prediction::new("banana", 0.7),
            Prediction::new("lemon", 0.7),
        ];
        assert_eq!(top_label(&preds), Some("banana"));
        assert_eq!(top_label(&[]), None);
    }
}
