//! compute_segments property tests
//!
//! 公開APIのみを使い、復元性と交互性が任意の入力で保たれることを確認する

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use textmark::{compute_segments, PatternSyntax, SearchOptions, Segment};

fn small_text() -> impl Strategy<Value = String> {
    // マッチが起きやすいよう小さなアルファベットを使う
    proptest::collection::vec(prop_oneof![Just('a'), Just('b'), Just('C'), Just(' '), Just('é'), Just('\n')], 0..40)
        .prop_map(|chars| chars.into_iter().collect::<String>())
}

fn search_string() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just('a'), Just('b'), Just('c'), Just(' '), Just('.')], 0..6)
        .prop_map(|chars| chars.into_iter().collect::<String>())
}

fn options() -> impl Strategy<Value = SearchOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(case_insensitive, improper_match)| {
        SearchOptions::default()
            .with_case_insensitive(case_insensitive)
            .with_improper_match(improper_match)
    })
}

fn concat(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn segments_reconstruct_text(text in small_text(), search in search_string(), options in options()) {
        let segments = compute_segments(&text, &search, &options).unwrap();
        prop_assert_eq!(concat(&segments), text);
    }

    #[test]
    fn segments_alternate(text in small_text(), search in search_string(), options in options()) {
        let segments = compute_segments(&text, &search, &options).unwrap();
        for pair in segments.windows(2) {
            prop_assert_ne!(pair[0].highlighted, pair[1].highlighted);
        }
        // 空片は隣接マッチの区切りとしてのみ現れる
        for (index, segment) in segments.iter().enumerate().filter(|(_, s)| s.is_empty()) {
            prop_assert!(!segment.highlighted);
            prop_assert!(index > 0 && index + 1 < segments.len());
        }
    }

    #[test]
    fn absent_search_string_yields_single_plain_segment(text in "[a-z ]{1,30}") {
        let segments = compute_segments(&text, "0123", &SearchOptions::default()).unwrap();
        prop_assert_eq!(segments, vec![Segment::plain(text.clone())]);
    }

    #[test]
    fn highlighted_segments_match_search_terms(text in small_text(), search in "[abc]{1,3}") {
        let segments = compute_segments(&text, &search, &SearchOptions::exact()).unwrap();
        for segment in segments.iter().filter(|s| s.highlighted) {
            prop_assert_eq!(segment.text.to_lowercase(), search.to_lowercase());
        }
    }

    #[test]
    fn regex_syntax_reconstructs_text_with_empty_matches(text in small_text(), search in "[ab]\\*?") {
        let options = SearchOptions::default().with_syntax(PatternSyntax::Regex);
        let segments = compute_segments(&text, &search, &options).unwrap();
        prop_assert_eq!(concat(&segments), text);
        for pair in segments.windows(2) {
            prop_assert_ne!(pair[0].highlighted, pair[1].highlighted);
        }
    }
}

#[test]
fn documented_examples() {
    let pairs = |segments: Vec<Segment>| -> Vec<(String, bool)> {
        segments.into_iter().map(|s| (s.text, s.highlighted)).collect()
    };

    assert!(compute_segments("", "foo", &SearchOptions::default()).unwrap().is_empty());
    assert_eq!(
        pairs(compute_segments("abc", "", &SearchOptions::default()).unwrap()),
        vec![("abc".to_string(), false)]
    );
    assert_eq!(
        pairs(compute_segments("Hello World", "hello", &SearchOptions::default()).unwrap()),
        vec![("Hello".to_string(), true), (" World".to_string(), false)]
    );
    assert_eq!(
        pairs(compute_segments("the cat sat", "cat dog", &SearchOptions::default()).unwrap()),
        vec![
            ("the ".to_string(), false),
            ("cat".to_string(), true),
            (" sat".to_string(), false)
        ]
    );
    assert_eq!(
        pairs(compute_segments("the cat sat", "cat sat", &SearchOptions::exact()).unwrap()),
        vec![("the ".to_string(), false), ("cat sat".to_string(), true)]
    );
    assert_eq!(
        pairs(compute_segments("catfish", "cat", &SearchOptions::exact()).unwrap()),
        vec![("cat".to_string(), true), ("fish".to_string(), false)]
    );
}

#[test]
fn adjacent_matches_are_separate_spans() {
    let segments = compute_segments("catcat", "cat", &SearchOptions::exact()).unwrap();
    assert_eq!(
        segments,
        vec![Segment::highlighted("cat"), Segment::plain(""), Segment::highlighted("cat")]
    );
    assert_eq!(segments.iter().filter(|s| s.highlighted).count(), 2);
}

#[test]
fn literal_syntax_does_not_interpret_metacharacters() {
    let segments = compute_segments("axb a.b", "a.b", &SearchOptions::default()).unwrap();
    assert_eq!(
        segments,
        vec![Segment::plain("axb "), Segment::highlighted("a.b")]
    );
}
