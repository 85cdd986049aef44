//! 図鑑ファイルの読み込み
//!
//! JSON配列、または `{ "species": [...] }` 形式のエクスポートを受け付ける。

use crate::error::{ReefIdError, Result};
use reef_id_common::{CatalogRecord, InMemoryCatalog};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Records(Vec<CatalogRecord>),
    Wrapped { species: Vec<CatalogRecord> },
}

/// 図鑑ファイルを読み込む
pub fn load_catalog(path: &Path) -> Result<InMemoryCatalog> {
    if !path.exists() {
        return Err(ReefIdError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_catalog(&content)
}

/// JSON文字列から図鑑を構築する
pub fn parse_catalog(json: &str) -> Result<InMemoryCatalog> {
    let file: CatalogFile = serde_json::from_str(json)
        .map_err(|e| ReefIdError::InvalidCatalog(format!("JSONパースエラー: {}", e)))?;

    let records = match file {
        CatalogFile::Records(records) => records,
        CatalogFile::Wrapped { species } => species,
    };

    // 7 と "7" は同じ画像URLになるため表示形で比較する
    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id.to_string()) {
            return Err(ReefIdError::InvalidCatalog(format!("IDが重複しています: {}", record.id)));
        }
    }

    tracing::debug!(records = records.len(), "catalog loaded");
    Ok(InMemoryCatalog::new(records))
}

/// 図鑑の概要
#[derive(Debug, Clone, Default)]
pub struct CatalogSummary {
    pub total: usize,
    /// 科ごとの件数（科名が空のレコードは "(none)"）
    pub by_family: BTreeMap<String, usize>,
    /// 分布地域が空のレコード数
    pub without_regions: usize,
}

impl CatalogSummary {
    pub fn from_records(records: &[CatalogRecord]) -> Self {
        let mut summary = CatalogSummary {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            let family = if record.family.trim().is_empty() {
                "(none)".to_string()
            } else {
                record.family.trim().to_string()
            };
            *summary.by_family.entry(family).or_insert(0) += 1;

            if record.distribution.regions().is_empty() {
                summary.without_regions += 1;
            }
        }

        summary
    }
}
