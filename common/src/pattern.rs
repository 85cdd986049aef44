//! ワイルドカードパターン
//!
//! 候補名を空白で分割し `%` で連結した ILIKE 形式のパターンを作り、
//! 大文字小文字を区別せずに照合する。
//!
//! - `%`: 0文字以上
//! - `_`: 任意の1文字
//! - `\`: 次の1文字をリテラルとして扱う

/// 候補名からパターンを生成する
///
/// ```
/// use reef_id_common::pattern::build_pattern;
///
/// assert_eq!(build_pattern("Blue  Tang"), "%Blue%Tang%");
/// assert_eq!(build_pattern("100%_fish"), "%100\\%\\_fish%");
/// ```
pub fn build_pattern(candidate_name: &str) -> String {
    let tokens: Vec<String> = candidate_name
        .split_whitespace()
        .map(escape_token)
        .collect();

    if tokens.is_empty() {
        return "%".to_string();
    }

    format!("%{}%", tokens.join("%"))
}

fn escape_token(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len());
    for c in token.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Any,
    One,
    Literal(char),
}

fn compile(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '%' => {
                // 連続する % は1つにまとめる
                if tokens.last() != Some(&Token::Any) {
                    tokens.push(Token::Any);
                }
            }
            '_' => tokens.push(Token::One),
            '\\' => match chars.next() {
                Some(next) => push_literal(&mut tokens, next),
                None => tokens.push(Token::Literal('\\')),
            },
            other => push_literal(&mut tokens, other),
        }
    }

    tokens
}

/// 照合対象と同じ規則で小文字化する（1文字が複数文字になる場合もある）
fn push_literal(tokens: &mut Vec<Token>, c: char) {
    tokens.extend(c.to_lowercase().map(Token::Literal));
}

fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// 大文字小文字を区別しないパターン照合（ILIKE相当）
pub fn ilike(text: &str, pattern: &str) -> bool {
    let tokens = compile(pattern);
    let text = fold(text);

    // 貪欲法 + バックトラック位置の記録
    let (mut t, mut p) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(Token::Any) => {
                star = Some((p, t));
                p += 1;
            }
            Some(Token::One) => {
                t += 1;
                p += 1;
            }
            Some(Token::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    star = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    tokens[p..].iter().all(|t| *t == Token::Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_pattern_single_word() {
        assert_eq!(build_pattern("Clownfish"), "%Clownfish%");
    }

    #[test]
    fn test_build_pattern_collapses_whitespace() {
        assert_eq!(build_pattern("  Blue \t Tang "), "%Blue%Tang%");
    }

    #[test]
    fn test_build_pattern_empty() {
        assert_eq!(build_pattern("   "), "%");
    }

    #[test]
    fn test_ilike_case_insensitive_substring() {
        assert!(ilike("Common Clownfish", "%clownfish%"));
        assert!(ilike("CLOWNFISH", "%Clownfish%"));
        assert!(!ilike("Whale Shark", "%clownfish%"));
    }

    #[test]
    fn test_ilike_token_order() {
        let pattern = build_pattern("blue tang");
        assert!(ilike("Blue Tang", &pattern));
        assert!(ilike("Blue Surgeonfish Tang", &pattern));
        // トークン順が逆だと一致しない
        assert!(!ilike("Tang Blue", &pattern));
    }

    #[test]
    fn test_ilike_partial_tokens() {
        let pattern = build_pattern("moray");
        assert!(ilike("Giant Moray Eel", &pattern));
    }

    #[test]
    fn test_ilike_underscore() {
        assert!(ilike("cat", "c_t"));
        assert!(!ilike("ct", "c_t"));
    }

    #[test]
    fn test_ilike_escaped_wildcards_are_literal() {
        let pattern = build_pattern("50%");
        assert!(ilike("about 50% of reefs", &pattern));
        assert!(!ilike("about 500 reefs", &pattern));
    }

    #[test]
    fn test_ilike_anchored_without_wildcards() {
        assert!(ilike("Grouper", "grouper"));
        assert!(!ilike("Giant Grouper", "grouper"));
    }

    #[test]
    fn test_ilike_backtracking() {
        assert!(ilike("aaab", "%a%b"));
        assert!(ilike("abcabd", "%ab_"));
        assert!(!ilike("abcabe", "%abd"));
    }

    #[test]
    fn test_ilike_multi_char_lowercase() {
        // 'İ' は小文字化すると "i\u{307}" の2文字になる
        assert!(ilike("İskorpit", &build_pattern("İskorpit")));
        assert!(ilike("İskorpit", "%i\u{307}skorpit%"));
        assert!(ilike("STRAẞE", "%straße%"));
    }

    #[test]
    fn test_ilike_empty_text() {
        assert!(ilike("", "%"));
        assert!(!ilike("", "%a%"));
    }
}
