//! 識別拒否の検出
//!
//! 画像認識モデルが魚名の代わりに返す拒否文・非回答を判定する。

use regex::Regex;

/// 完全一致で非回答とみなす文言（小文字・末尾の句読点除去後）
const NON_ANSWERS: &[&str] = &["not a fish", "unknown", "none", "n/a"];

/// 候補名が識別拒否かどうか
///
/// - 空文字・空白のみ
/// - "Not a fish" 等の非回答（大文字小文字を区別しない）
/// - "I cannot identify ..." 等の拒否文を含む
pub fn is_refusal(candidate_name: &str) -> bool {
    lazy_static::lazy_static! {
        static ref REFUSAL_RE: Regex = Regex::new(
            r"(?i)\b(?:i\s+(?:cannot|can't|can\s+not|am\s+unable\s+to)\s+identify|i'm\s+unable\s+to\s+identify|unable\s+to\s+identify|cannot\s+be\s+identified)\b"
        ).unwrap();
    }

    let trimmed = candidate_name.trim();
    if trimmed.is_empty() {
        return true;
    }

    let normalized = trimmed
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?'))
        .trim()
        .to_lowercase();
    if NON_ANSWERS.contains(&normalized.as_str()) {
        return true;
    }

    // 曲線引用符のアポストロフィを揃える
    let straightened = trimmed.replace('\u{2019}', "'");
    REFUSAL_RE.is_match(&straightened)
}
