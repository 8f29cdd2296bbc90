//! キーワード入力の検証
//!
//! UI 境界で空・空白のみの入力を弾く。ネットワーク呼び出しより前に行う。

use crate::error::{DashboardError, Result};

/// 区切り文字（ASCII / 全角のカンマ・読点と空白）
fn is_separator(c: char) -> bool {
    c == ',' || c == '，' || c == '、' || c.is_whitespace()
}

/// 自由入力の文字列をキーワード列にする
///
/// 空要素と重複は捨て、初出順を保つ。結果が空なら `EmptyKeywords`。
pub fn parse_keywords(input: &str) -> Result<Vec<String>> {
    normalize_keywords(input.split(is_separator))
}

/// 既に分割済みのキーワード列を正規化する
pub fn normalize_keywords<I, S>(raw: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for item in raw {
        let trimmed = item.as_ref().trim();
        if trimmed.is_empty() || out.iter().any(|k| k == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    if out.is_empty() {
        return Err(DashboardError::EmptyKeywords);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_mixed_separators() {
        let kws = parse_keywords("口红, 面膜，护肤 美妆、防晒").unwrap();
        assert_eq!(kws, vec!["口红", "面膜", "护肤", "美妆", "防晒"]);
    }

    #[test]
    fn drops_duplicates_keeping_first() {
        let kws = parse_keywords("A,B,A").unwrap();
        assert_eq!(kws, vec!["A", "B"]);
    }

    #[test]
    fn blank_input_is_rejected() {
        assert!(matches!(parse_keywords(""), Err(DashboardError::EmptyKeywords)));
        assert!(matches!(
            parse_keywords("  , ，  "),
            Err(DashboardError::EmptyKeywords)
        ));
    }

    #[test]
    fn normalizes_pre_split_list() {
        let kws = normalize_keywords(vec![" A ", "", "B"]).unwrap();
        assert_eq!(kws, vec!["A", "B"]);
        assert!(normalize_keywords(Vec::<String>::new()).is_err());
    }
}
