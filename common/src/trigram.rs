//! トライグラム類似度
//!
//! 2つの文字列のトライグラム集合のJaccard係数を返す。
//! 範囲は [0, 1]、1.0 = 同一、0.0 = 共通トライグラムなし。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// トライグラムの生成方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrigramScheme {
    /// 小文字化した文字列全体の連続3文字。3文字未満は空白で右詰めして1トライグラム
    #[default]
    Substring,
    /// PostgreSQL pg_trgm 互換。英数字の単語ごとに "  word " として3文字を取る
    PgTrgm,
}

impl std::str::FromStr for TrigramScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "substring" | "plain" => Ok(TrigramScheme::Substring),
            "pg-trgm" | "pg_trgm" | "postgres" => Ok(TrigramScheme::PgTrgm),
            _ => Err(format!("Unknown trigram scheme: {}. Use substring or pg-trgm", s)),
        }
    }
}

impl std::fmt::Display for TrigramScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrigramScheme::Substring => write!(f, "substring"),
            TrigramScheme::PgTrgm => write!(f, "pg-trgm"),
        }
    }
}

/// トライグラム集合を生成する
pub fn trigrams(text: &str, scheme: TrigramScheme) -> HashSet<String> {
    match scheme {
        TrigramScheme::Substring => substring_trigrams(text),
        TrigramScheme::PgTrgm => pg_trgm_trigrams(text),
    }
}

/// トライグラム類似度（Jaccard係数）
pub fn similarity(a: &str, b: &str, scheme: TrigramScheme) -> f64 {
    let a_set = trigrams(a, scheme);
    let b_set = trigrams(b, scheme);

    let union = a_set.union(&b_set).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a_set.intersection(&b_set).count();

    intersection as f64 / union as f64
}

fn substring_trigrams(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();

    if chars.is_empty() {
        return HashSet::new();
    }

    if chars.len() < 3 {
        let mut padded: String = chars.iter().collect();
        while padded.chars().count() < 3 {
            padded.push(' ');
        }
        return HashSet::from([padded]);
    }

    chars.windows(3).map(|w| w.iter().collect()).collect()
}

fn pg_trgm_trigrams(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let mut set = HashSet::new();

    for word in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = format!("  {} ", word).chars().collect();
        set.extend(padded.windows(3).map(|w| w.iter().collect::<String>()));
    }

    set
}
