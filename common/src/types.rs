//! 図鑑データの型定義
//!
//! CLIとHTTPサーバで共有される型:
//! - CatalogRecord: 魚類図鑑の1レコード
//! - ScoredCandidate: 類似度付きの候補
//! - MatchResult: 照合結果（信頼度・画像URL・分布地域付き）
//! - SpeciesResponse: `/identify-fish` のレスポンス形式

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// レコードID（数値または文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Int(0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// 分布地域（カンマ区切り文字列または配列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distribution {
    List(Vec<String>),
    Text(String),
}

impl Default for Distribution {
    fn default() -> Self {
        Distribution::Text(String::new())
    }
}

impl Distribution {
    /// 地域リストに正規化する
    ///
    /// - 文字列: カンマで分割し、前後の空白を除去、空要素は捨てる
    /// - 配列: そのまま返す
    pub fn regions(&self) -> Vec<String> {
        match self {
            Distribution::List(regions) => regions.clone(),
            Distribution::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// 図鑑レコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogRecord {
    pub id: RecordId,

    #[serde(alias = "name", deserialize_with = "null_as_default")]
    pub common_name: String,

    #[serde(alias = "scientific_name", deserialize_with = "null_as_default")]
    pub scientific_name: String,

    #[serde(alias = "category", deserialize_with = "null_as_default")]
    pub family: String,

    #[serde(alias = "conservation_status", deserialize_with = "null_as_default")]
    pub conservation_status: String,

    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(deserialize_with = "null_as_default")]
    pub distribution: Distribution,

    #[serde(alias = "depth_range", alias = "depth", deserialize_with = "null_as_default")]
    pub depth_range: String,
}

/// DBエクスポートの `null` をデフォルト値として読む
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 類似度付きの候補
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub record: CatalogRecord,
    /// 一般名（commonName）との類似度
    pub common_name_similarity: f64,
    /// 学名との類似度
    pub scientific_name_similarity: f64,
}

impl ScoredCandidate {
    pub fn best(&self) -> f64 {
        self.common_name_similarity.max(self.scientific_name_similarity)
    }
}

/// 照合結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub record: CatalogRecord,
    /// 0-100
    pub confidence: u8,
    pub image_url: String,
    pub regions: Vec<String>,
}

/// `/identify-fish` の成功レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesResponse {
    pub id: RecordId,
    pub name: String,
    pub scientific_name: String,
    pub category: String,
    pub conservation_status: String,
    pub description: String,
    pub confidence: u8,
    pub image_url: String,
    pub regions: Vec<String>,
    pub depth: String,
}

impl From<MatchResult> for SpeciesResponse {
    fn from(result: MatchResult) -> Self {
        let record = result.record;
        Self {
            id: record.id,
            name: record.common_name,
            scientific_name: record.scientific_name,
            category: record.family,
            conservation_status: record.conservation_status,
            description: record.description,
            confidence: result.confidence,
            image_url: result.image_url,
            regions: result.regions,
            depth: record.depth_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_from_text() {
        let distribution = Distribution::Text("A, B,C".to_string());
        assert_eq!(distribution.regions(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_regions_from_empty_text() {
        let distribution = Distribution::Text(String::new());
        assert!(distribution.regions().is_empty());
    }

    #[test]
    fn test_regions_drop_blank_entries() {
        let distribution = Distribution::Text(" Red Sea, , ,Caribbean ".to_string());
        assert_eq!(distribution.regions(), vec!["Red Sea", "Caribbean"]);
    }

    #[test]
    fn test_regions_list_passthrough() {
        let list = vec![" Indo-Pacific".to_string(), "".to_string()];
        let distribution = Distribution::List(list.clone());
        assert_eq!(distribution.regions(), list);
    }

    #[test]
    fn test_record_deserialize_camel_case() {
        let json = r#"{
            "id": 7,
            "commonName": "Clownfish",
            "scientificName": "Amphiprion ocellaris",
            "family": "Pomacentridae",
            "conservationStatus": "Least Concern",
            "distribution": "Indo-Pacific, Red Sea",
            "depthRange": "1-15m"
        }"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::Int(7));
        assert_eq!(record.common_name, "Clownfish");
        assert_eq!(record.depth_range, "1-15m");
        assert_eq!(record.description, ""); // デフォルト値
    }

    #[test]
    fn test_record_deserialize_snake_case_aliases() {
        let json = r#"{
            "id": "whale-shark",
            "name": "Whale Shark",
            "scientific_name": "Rhincodon typus",
            "category": "Rhincodontidae",
            "conservation_status": "Endangered",
            "distribution": ["Tropical oceans"],
            "depth": "0-1900m",
            "created_at": "2024-01-01"
        }"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::Text("whale-shark".to_string()));
        assert_eq!(record.common_name, "Whale Shark");
        assert_eq!(record.family, "Rhincodontidae");
        assert_eq!(record.distribution, Distribution::List(vec!["Tropical oceans".to_string()]));
        assert_eq!(record.depth_range, "0-1900m");
    }

    #[test]
    fn test_record_deserialize_nulls() {
        let json = r#"{"id": 3, "commonName": "Lionfish", "description": null, "distribution": null}"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.description, "");
        assert!(record.distribution.regions().is_empty());
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::Int(42).to_string(), "42");
        assert_eq!(RecordId::from("manta").to_string(), "manta");
    }

    #[test]
    fn test_species_response_shape() {
        let result = MatchResult {
            record: CatalogRecord {
                id: RecordId::Int(7),
                common_name: "Clownfish".to_string(),
                family: "Pomacentridae".to_string(),
                depth_range: "1-15m".to_string(),
                ..Default::default()
            },
            confidence: 100,
            image_url: "https://cdn.example/fish-images/7.png".to_string(),
            regions: vec!["Red Sea".to_string()],
        };
        let value = serde_json::to_value(SpeciesResponse::from(result)).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["name"], "Clownfish");
        assert_eq!(value["category"], "Pomacentridae");
        assert_eq!(value["imageUrl"], "https://cdn.example/fish-images/7.png");
        assert_eq!(value["depth"], "1-15m");
        assert_eq!(value["regions"][0], "Red Sea");
    }
}
