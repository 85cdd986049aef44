//! 魚種照合
//!
//! 画像認識モデルが返した候補名から、図鑑の最も近いレコードを選ぶ。
//!
//! ## 処理フロー
//! 1. 拒否文・空文字を除外
//! 2. ワイルドカードパターンで候補を粗く絞り込み（最大5件）
//! 3. 一般名・学名それぞれとのトライグラム類似度を計算
//! 4. 類似度の大きい方が最大のレコードを採用（同値は先勝ち）
//! 5. 閾値 0.2 未満は低信頼として失敗
//! 6. 信頼度・画像URL・分布地域を付けて返す

use crate::catalog::{CatalogQuery, SpeciesCatalog};
use crate::error::Error;
use crate::pattern::build_pattern;
use crate::refusal::is_refusal;
use crate::storage::ImageStore;
use crate::trigram::{similarity, TrigramScheme};
use crate::types::{CatalogRecord, MatchResult, ScoredCandidate};
use thiserror::Error;

/// 類似度で比較する候補の最大件数
pub const CANDIDATE_LIMIT: usize = 5;

/// これ未満の類似度は採用しない
pub const MIN_CONFIDENCE: f64 = 0.2;

/// 照合失敗
///
/// いずれも終端的な失敗で、再試行はしない。
#[derive(Error, Debug)]
pub enum MatchFailure {
    #[error("Could not identify a fish in the image")]
    NoIdentification,

    #[error("No match found in database for \"{candidate_name}\"")]
    NoMatch { candidate_name: String },

    #[error("Identified as \"{candidate_name}\" but no confident match in database ({confidence}%)")]
    LowConfidence { candidate_name: String, confidence: u8 },

    #[error(transparent)]
    Catalog(#[from] Error),
}

/// 候補名を図鑑と照合する
///
/// # Arguments
/// * `candidate_name` - 画像認識モデルが返した魚名
/// * `catalog` - 図鑑データストア
/// * `images` - 画像URLの命名規則
/// * `scheme` - トライグラム生成方式
pub fn match_species<C>(
    candidate_name: &str,
    catalog: &C,
    images: &ImageStore,
    scheme: TrigramScheme,
) -> Result<MatchResult, MatchFailure>
where
    C: SpeciesCatalog + ?Sized,
{
    if is_refusal(candidate_name) {
        return Err(MatchFailure::NoIdentification);
    }
    let candidate_name = candidate_name.trim();

    let pattern = build_pattern(candidate_name);
    let rows = catalog.search(&CatalogQuery {
        pattern: &pattern,
        candidate_name,
        limit: CANDIDATE_LIMIT,
        scheme,
    })?;

    let scored = score_candidates(candidate_name, rows, scheme);
    let winner = select_best(scored).ok_or_else(|| MatchFailure::NoMatch {
        candidate_name: candidate_name.to_string(),
    })?;

    let raw = winner.best();
    let confidence = to_percent(raw);
    if raw < MIN_CONFIDENCE {
        return Err(MatchFailure::LowConfidence {
            candidate_name: candidate_name.to_string(),
            confidence,
        });
    }

    let record = winner.record;
    Ok(MatchResult {
        image_url: images.image_url(&record.id),
        regions: record.distribution.regions(),
        confidence,
        record,
    })
}

/// 各候補の一般名・学名との類似度を計算する
pub fn score_candidates(
    candidate_name: &str,
    rows: Vec<CatalogRecord>,
    scheme: TrigramScheme,
) -> Vec<ScoredCandidate> {
    rows.into_iter()
        .map(|record| ScoredCandidate {
            common_name_similarity: similarity(candidate_name, &record.common_name, scheme),
            scientific_name_similarity: similarity(candidate_name, &record.scientific_name, scheme),
            record,
        })
        .collect()
}

/// 類似度最大の候補を選ぶ（同値は先に現れた方）
pub fn select_best(candidates: Vec<ScoredCandidate>) -> Option<ScoredCandidate> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.best() >= candidate.best() => Some(current),
        _ => Some(candidate),
    })
}

fn to_percent(raw: f64) -> u8 {
    (raw.clamp(0.0, 1.0) * 100.0).round() as u8
}
