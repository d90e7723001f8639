//! 検索語からマッチャーを構築する

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use super::types::{PatternSyntax, SearchOptions};
use crate::error::{HighlightError, Result};

/// コンパイル後のサイズ上限
const SIZE_LIMIT: usize = 1 << 20;

/// コンパイル済み検索パターン
#[derive(Debug, Clone)]
pub struct SearchPattern {
    regex: Regex,
}

impl SearchPattern {
    /// 検索語をパターンに変換してコンパイルする
    ///
    /// 空白のみの検索語は `None`（ハイライトなし）
    pub fn compile(search_string: &str, options: &SearchOptions) -> Result<Option<Self>> {
        let source = match prepare(search_string, options) {
            Some(source) => source,
            None => return Ok(None),
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(options.case_insensitive)
            .multi_line(options.multi_line)
            .dot_matches_new_line(options.dot_matches_new_line)
            .size_limit(SIZE_LIMIT)
            .build()
            .map_err(|err| HighlightError::invalid_pattern(search_string, &err))?;

        log::debug!("compiled search pattern `{}` from `{}`", source, search_string);
        Ok(Some(Self { regex }))
    }

    /// 準備済みパターン文字列
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// 左から順に重ならないマッチ範囲（バイト単位）を返す
    pub fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        self.regex.find_iter(text).map(|m| m.range()).collect()
    }
}

/// 検索語をパターン文字列に変換する
///
/// improper match では空白の連続を1つの区切りとみなす。
/// 空の項はすべての位置に空マッチを作るため取り除く。
pub fn prepare(search_string: &str, options: &SearchOptions) -> Option<String> {
    if search_string.trim().is_empty() {
        return None;
    }

    let term = |token: &str| match options.syntax {
        PatternSyntax::Literal => regex::escape(token),
        PatternSyntax::Regex => token.to_string(),
    };

    if options.improper_match {
        let terms: Vec<String> = search_string.split_whitespace().map(term).collect();
        Some(terms.join("|"))
    } else {
        Some(term(search_string))
    }
}
