//! 図鑑ファイル読み込みテスト
//!
//! DBエクスポート相当のJSONから図鑑を構築し、照合まで通す

use reef_id::catalog::{load_catalog, parse_catalog, CatalogSummary};
use reef_id::error::ReefIdError;
use reef_id_common::{match_species, ImageStore, MatchFailure, RecordId, TrigramScheme};
use std::path::Path;
use tempfile::tempdir;

const EXPORT: &str = r#"[
    {
        "id": 1,
        "commonName": "Clownfish",
        "scientificName": "Amphiprion ocellaris",
        "family": "Pomacentridae",
        "conservationStatus": "Least Concern",
        "description": "Lives among anemones.",
        "distribution": "Indo-Pacific, Red Sea",
        "depthRange": "1-15m"
    },
    {
        "id": 2,
        "commonName": "Blue Tang",
        "scientificName": "Paracanthurus hepatus",
        "family": "Acanthuridae",
        "conservationStatus": null,
        "description": null,
        "distribution": ["Indo-Pacific"],
        "depthRange": null
    },
    {
        "id": "whale-shark",
        "name": "Whale Shark",
        "scientific_name": "Rhincodon typus",
        "category": "Rhincodontidae"
    }
]"#;

fn images() -> ImageStore {
    ImageStore::new("https://cdn.example.com", "fish-images", "png")
}

/// 配列形式のエクスポートを読み込める
#[test]
fn test_parse_array_export() {
    let catalog = parse_catalog(EXPORT).expect("catalog should parse");
    let records = catalog.records();

    assert_eq!(records.len(), 3);
    assert_eq!(records[1].conservation_status, "");
    assert_eq!(records[1].depth_range, "");
    assert_eq!(records[2].id, RecordId::Text("whale-shark".into()));
    assert_eq!(records[2].common_name, "Whale Shark");
    assert_eq!(records[2].family, "Rhincodontidae");
}

/// `{ "species": [...] }` 形式も読み込める
#[test]
fn test_parse_wrapped_export() {
    let json = format!(r#"{{ "species": {} }}"#, EXPORT);
    let catalog = parse_catalog(&json).unwrap();
    assert_eq!(catalog.records().len(), 3);
}

/// 壊れたJSONは InvalidCatalog
#[test]
fn test_parse_invalid_json() {
    let result = parse_catalog("{ broken");
    assert!(matches!(result, Err(ReefIdError::InvalidCatalog(_))));
}

/// IDの重複は InvalidCatalog
#[test]
fn test_parse_duplicate_ids() {
    let json = r#"[{"id": 1, "commonName": "A"}, {"id": 1, "commonName": "B"}]"#;
    match parse_catalog(json) {
        Err(ReefIdError::InvalidCatalog(message)) => assert!(message.contains('1')),
        other => panic!("Expected InvalidCatalog, got {:?}", other.map(|c| c.records().len())),
    }
}

/// 数値IDと同じ表記の文字列IDも重複扱い
#[test]
fn test_parse_duplicate_ids_across_types() {
    let json = r#"[{"id": 7, "commonName": "A"}, {"id": "7", "commonName": "B"}]"#;
    let result = parse_catalog(json);
    assert!(matches!(result, Err(ReefIdError::InvalidCatalog(_))));
}

/// 存在しないファイルは FileNotFound
#[test]
fn test_load_missing_file() {
    let result = load_catalog(Path::new("/nonexistent/catalog-12345.json"));
    assert!(matches!(result, Err(ReefIdError::FileNotFound(_))));
}

/// ファイルから読み込んで照合まで通す
#[test]
fn test_load_and_match() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, EXPORT).unwrap();

    let catalog = load_catalog(&path).unwrap();

    let result = match_species("Blue Tang", &catalog, &images(), TrigramScheme::Substring).unwrap();
    assert_eq!(result.record.id, RecordId::Int(2));
    assert_eq!(result.confidence, 100);
    assert_eq!(result.regions, vec!["Indo-Pacific"]);
    assert_eq!(result.image_url, "https://cdn.example.com/fish-images/2.png");

    let result = match_species("Whale Shark", &catalog, &images(), TrigramScheme::PgTrgm).unwrap();
    assert_eq!(result.image_url, "https://cdn.example.com/fish-images/whale-shark.png");
    assert!(result.regions.is_empty());

    let result = match_species("Lionfish", &catalog, &images(), TrigramScheme::Substring);
    assert!(matches!(result, Err(MatchFailure::NoMatch { .. })));
}

/// 科ごとの件数と分布地域なしの件数
#[test]
fn test_catalog_summary() {
    let catalog = parse_catalog(EXPORT).unwrap();
    let summary = CatalogSummary::from_records(catalog.records());

    assert_eq!(summary.total, 3);
    assert_eq!(summary.without_regions, 1);
    assert_eq!(summary.by_family.get("Pomacentridae"), Some(&1));
    assert_eq!(summary.by_family.get("Acanthuridae"), Some(&1));
    assert_eq!(summary.by_family.get("Rhincodontidae"), Some(&1));
}
