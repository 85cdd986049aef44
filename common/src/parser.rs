//! 画像認識レスポンスの整形
//!
//! モデルは指示に反して装飾付きで答えることがあるため、
//! 魚名部分だけを取り出す。

/// 取り除く先頭ラベル（小文字で比較）
const ANSWER_LABELS: &[&str] = &["answer:", "species:", "common name:", "fish:"];

/// モデル応答から候補名を取り出す
///
/// 処理順:
/// 1. ``` フェンスを除去
/// 2. 最初の空でない行を採用
/// 3. "Answer:" 等のラベルを除去
/// 4. 前後の引用符・バッククォート・アスタリスクを除去
/// 5. 末尾のピリオドを除去
///
/// # Examples
/// ```
/// use reef_id_common::clean_species_answer;
///
/// assert_eq!(clean_species_answer("**Clownfish**.\n"), "Clownfish");
/// assert_eq!(clean_species_answer("Species: \"Blue Tang\""), "Blue Tang");
/// ```
pub fn clean_species_answer(response: &str) -> String {
    let line = response
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("```"))
        .unwrap_or("");

    let answer = ANSWER_LABELS
        .iter()
        .find_map(|label| {
            line.get(..label.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(label))
                .map(|_| line[label.len()..].trim_start())
        })
        .unwrap_or(line);

    answer
        .trim_end_matches('.')
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*' | '\u{201C}' | '\u{201D}'))
        .trim()
        .trim_end_matches('.')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answer() {
        assert_eq!(clean_species_answer("Clownfish"), "Clownfish");
    }

    #[test]
    fn test_trailing_period_and_newline() {
        assert_eq!(clean_species_answer("Whale Shark.\n"), "Whale Shark");
    }

    #[test]
    fn test_code_fence() {
        let response = "```\nMoorish Idol\n```";
        assert_eq!(clean_species_answer(response), "Moorish Idol");
    }

    #[test]
    fn test_label_and_quotes() {
        assert_eq!(clean_species_answer("Answer: 'Lionfish'"), "Lionfish");
        assert_eq!(clean_species_answer("COMMON NAME: Green Sea Turtle"), "Green Sea Turtle");
    }

    #[test]
    fn test_takes_first_line() {
        let response = "Blue Tang\nIt is commonly found on Indo-Pacific reefs.";
        assert_eq!(clean_species_answer(response), "Blue Tang");
    }

    #[test]
    fn test_refusal_is_preserved() {
        assert_eq!(clean_species_answer("Not a fish."), "Not a fish");
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(clean_species_answer(""), "");
        assert_eq!(clean_species_answer("```\n```"), "");
    }
}
