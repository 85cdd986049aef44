//! 図鑑の検索インターフェース
//!
//! 照合処理はデータストアに次の3機能を要求する:
//! 1. 2つのテキスト列に対する大文字小文字を区別しないワイルドカード照合
//! 2. 任意の文字列ペアに対する類似度スコア
//! 3. 並べ替えと件数制限

use crate::error::Result;
use crate::pattern::ilike;
use crate::trigram::{similarity, TrigramScheme};
use crate::types::CatalogRecord;

/// 候補検索の条件
#[derive(Debug, Clone)]
pub struct CatalogQuery<'a> {
    /// `%tok1%tok2%` 形式のパターン
    pub pattern: &'a str,
    /// 並べ替えに使う候補名
    pub candidate_name: &'a str,
    pub limit: usize,
    pub scheme: TrigramScheme,
}

/// 図鑑データストア
///
/// `search` は commonName または scientificName がパターンに一致するレコードを、
/// commonName との類似度の降順（同値はストアの並び順）で最大 `limit` 件返す。
pub trait SpeciesCatalog: Send + Sync {
    fn search(&self, query: &CatalogQuery<'_>) -> Result<Vec<CatalogRecord>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// メモリ上の図鑑（全件走査）
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    records: Vec<CatalogRecord>,
}

impl InMemoryCatalog {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }
}

impl SpeciesCatalog for InMemoryCatalog {
    fn search(&self, query: &CatalogQuery<'_>) -> Result<Vec<CatalogRecord>> {
        let mut hits: Vec<(f64, &CatalogRecord)> = self
            .records
            .iter()
            .filter(|r| ilike(&r.common_name, query.pattern) || ilike(&r.scientific_name, query.pattern))
            .map(|r| (similarity(query.candidate_name, &r.common_name, query.scheme), r))
            .collect();

        // sort_by は安定ソートなので同値はストア順のまま
        hits.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(hits
            .into_iter()
            .take(query.limit)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
