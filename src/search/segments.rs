//! マッチ/非マッチ部分の分割と交互マージ
//!
//! テキストをマッチ範囲で分割し、非マッチ系列とマッチ系列を
//! 元の順序どおりに交互に並べ直してハイライトフラグを付与する。

use std::ops::Range;

use super::pattern::SearchPattern;
use super::types::{Lead, SearchOptions, Segment};
use crate::error::Result;

/// テキストを検索語でハイライト単位に分割する
///
/// * 空テキストは空列
/// * 空白のみの検索語はテキスト全体を1つの非ハイライト片として返す
/// * 連結するとテキストが完全に復元される
pub fn compute_segments(text: &str, search_string: &str, options: &SearchOptions) -> Result<Vec<Segment>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    match SearchPattern::compile(search_string, options)? {
        Some(pattern) => Ok(pattern.segments(text)),
        None => Ok(vec![Segment::plain(text)]),
    }
}

impl SearchPattern {
    /// コンパイル済みパターンでテキストを分割する
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }

        let spans = self.find_spans(text);
        let matches: Vec<&str> = spans.iter().map(|span| &text[span.clone()]).collect();
        let mismatches = split_mismatches(text, &spans);
        debug_assert_eq!(mismatches.len(), matches.len() + 1);

        let lead = leading_side(&mismatches, &matches);
        let merged = match lead {
            Lead::Mismatch => interleave(mismatches, matches),
            // 先頭の空の非マッチ片を捨ててマッチ系列から始める
            Lead::Match => interleave(matches, mismatches.into_iter().skip(1).collect()),
        };

        log::debug!(
            "split {} bytes into {} runs ({} matches, lead {:?})",
            text.len(),
            merged.len(),
            spans.len(),
            lead
        );

        normalize(tag(merged, lead))
    }
}

/// マッチ範囲の間（前後を含む）の部分文字列を返す
///
/// 要素数は常に `spans.len() + 1`
fn split_mismatches<'a>(text: &'a str, spans: &[Range<usize>]) -> Vec<&'a str> {
    let mut mismatches = Vec::with_capacity(spans.len() + 1);
    let mut last_end = 0usize;
    for span in spans {
        mismatches.push(&text[last_end..span.start]);
        last_end = span.end;
    }
    mismatches.push(&text[last_end..]);
    mismatches
}

/// テキストがマッチから始まるか判定
fn leading_side(mismatches: &[&str], matches: &[&str]) -> Lead {
    let starts_with_gap = mismatches.first().map_or(true, |first| first.is_empty());
    if !matches.is_empty() && starts_with_gap {
        Lead::Match
    } else {
        Lead::Mismatch
    }
}

/// 2系列を先頭系列から交互に1つずつ取り出して連結する
///
/// 片方が尽きたら残りをそのまま後ろに続ける
fn interleave<T>(leading: Vec<T>, trailing: Vec<T>) -> Vec<T> {
    let mut merged = Vec::with_capacity(leading.len() + trailing.len());
    let mut leading = leading.into_iter();
    let mut trailing = trailing.into_iter();

    loop {
        match (leading.next(), trailing.next()) {
            (Some(a), Some(b)) => {
                merged.push(a);
                merged.push(b);
            }
            (Some(a), None) => {
                merged.push(a);
                merged.extend(leading);
                break;
            }
            (None, Some(b)) => {
                merged.push(b);
                merged.extend(trailing);
                break;
            }
            (None, None) => break,
        }
    }

    merged
}

/// マッチ系列に属する位置へハイライトフラグを付ける
fn tag(merged: Vec<&str>, lead: Lead) -> Vec<Segment> {
    merged
        .into_iter()
        .enumerate()
        .map(|(index, text)| Segment {
            text: text.to_string(),
            highlighted: lead.is_match_position(index),
        })
        .collect()
}

/// 空マッチを取り除き、隣接した非マッチ片を結合する
///
/// マッチ片は1つのマッチ範囲のまま残す。隣接するマッチの間の空の
/// 非マッチ片は残し、先頭と末尾の空片は捨てる。
fn normalize(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.highlighted && segment.is_empty() {
            continue;
        }
        match result.last_mut() {
            Some(last) if !last.highlighted && !segment.highlighted => last.text.push_str(&segment.text),
            _ => result.push(segment),
        }
    }

    if result.last().is_some_and(Segment::is_empty) {
        result.pop();
    }
    if result.first().is_some_and(Segment::is_empty) {
        result.remove(0);
    }
    result
}
