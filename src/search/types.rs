//! 検索ハイライト関連の共通型

use serde::{Deserialize, Serialize};

/// 検索語の解釈方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternSyntax {
    /// 検索語をそのまま文字列として扱う（特殊文字はエスケープ）
    #[default]
    Literal,
    /// 検索語を正規表現として扱う
    Regex,
}

impl PatternSyntax {
    /// ラベルを取得
    pub fn label(self) -> &'static str {
        match self {
            PatternSyntax::Literal => "literal",
            PatternSyntax::Regex => "regex",
        }
    }
}

/// 検索オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchOptions {
    /// 大文字小文字を区別しない
    pub case_insensitive: bool,
    /// 空白区切りの各語をOR条件で検索する
    pub improper_match: bool,
    /// 検索語の解釈方法
    pub syntax: PatternSyntax,
    /// `^`/`$` を行単位で扱う（正規表現のみ）
    pub multi_line: bool,
    /// `.` を改行にもマッチさせる（正規表現のみ）
    pub dot_matches_new_line: bool,
}

impl SearchOptions {
    /// フレーズ全体の一致を要求するオプション
    pub fn exact() -> Self {
        Self {
            improper_match: false,
            ..Self::default()
        }
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn with_improper_match(mut self, improper_match: bool) -> Self {
        self.improper_match = improper_match;
        self
    }

    pub fn with_syntax(mut self, syntax: PatternSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_multi_line(mut self, multi_line: bool) -> Self {
        self.multi_line = multi_line;
        self
    }

    pub fn with_dot_matches_new_line(mut self, dot_matches_new_line: bool) -> Self {
        self.dot_matches_new_line = dot_matches_new_line;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            improper_match: true,
            syntax: PatternSyntax::Literal,
            multi_line: false,
            dot_matches_new_line: false,
        }
    }
}

/// ハイライト単位のテキスト片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 元テキストの連続した部分文字列
    pub text: String,
    /// マッチ部分であるか
    pub highlighted: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }

    pub fn highlighted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: true,
        }
    }

    /// バイト長
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// 交互マージの先頭となる系列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lead {
    /// 非マッチ部分から始まる
    Mismatch,
    /// マッチ部分から始まる
    Match,
}

impl Lead {
    /// マージ後の位置がマッチ系列に属するか
    pub fn is_match_position(self, index: usize) -> bool {
        let leading_family = index % 2 == 0;
        match self {
            Lead::Match => leading_family,
            Lead::Mismatch => !leading_family,
        }
    }
}
