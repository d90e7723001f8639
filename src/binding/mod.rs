//! 表示要素へのハイライト結合
//!
//! テキスト表示要素にアタッチし、検索語やオプションの変更、
//! 表示内容のロード完了をきっかけにハイライトを再計算して描画させる。

use serde::{Deserialize, Serialize};

use crate::error::{HighlightError, Result};
use crate::search::{compute_segments, SearchOptions, Segment};

/// ハイライト描画先のテキスト表示
///
/// `S` はハイライト用スタイルのハンドルで、中身は参照しない
pub trait TextDisplay<S> {
    /// 現在表示しているテキスト
    fn current_text(&self) -> String;

    /// 既存の描画片を破棄し、新しい片の列を描画する
    ///
    /// `highlighted` な片には `highlight_style` を適用する
    fn apply_runs(&mut self, segments: &[Segment], highlight_style: Option<&S>);
}

/// アタッチ対象となり得る表示要素
pub trait DisplayElement<S> {
    /// 要素名（エラー表示用）
    fn element_name(&self) -> &str;

    /// テキスト表示として扱えない要素は `None`
    fn as_text_display(&mut self) -> Option<&mut dyn TextDisplay<S>>;
}

/// 再計算のタイミング
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecolorPolicy {
    /// 最初のロード完了時に一度だけ描画し、以降は変更時のみ
    #[default]
    OnLoad,
    /// アタッチ時と変更時に即座に描画
    Eager,
}

/// 検索語ハイライトの結合
#[derive(Debug)]
pub struct HighlightBinding<E, S> {
    element: Option<E>,
    search_string: String,
    options: SearchOptions,
    highlight_style: Option<S>,
    policy: RecolorPolicy,
    load_pending: bool,
    last_text: String,
}

impl<E, S> HighlightBinding<E, S>
where
    E: DisplayElement<S>,
{
    /// 既定の検索オプションで作成
    pub fn new(policy: RecolorPolicy) -> Self {
        Self {
            element: None,
            search_string: String::new(),
            options: SearchOptions::default(),
            highlight_style: None,
            policy,
            load_pending: false,
            last_text: String::new(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_search_string(mut self, search_string: impl Into<String>) -> Self {
        self.search_string = search_string.into();
        self
    }

    pub fn with_highlight_style(mut self, style: S) -> Self {
        self.highlight_style = Some(style);
        self
    }

    pub fn search_string(&self) -> &str {
        &self.search_string
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn highlight_style(&self) -> Option<&S> {
        self.highlight_style.as_ref()
    }

    pub fn policy(&self) -> RecolorPolicy {
        self.policy
    }

    pub fn is_attached(&self) -> bool {
        self.element.is_some()
    }

    /// ロード完了待ちか
    pub fn is_load_pending(&self) -> bool {
        self.load_pending
    }

    /// 直近の再計算で読み取ったテキスト
    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    pub fn element_mut(&mut self) -> Option<&mut E> {
        self.element.as_mut()
    }

    /// 表示要素にアタッチする
    ///
    /// テキスト表示でない要素は `AttachmentType` で拒否する。
    /// `Eager` では即座に再計算し、そのエラーを返す（要素はアタッチされたまま）。
    pub fn attach(&mut self, mut element: E) -> Result<()> {
        if element.as_text_display().is_none() {
            let name = element.element_name().to_string();
            log::error!("refusing to attach highlighting to {}", name);
            return Err(HighlightError::AttachmentType { element: name });
        }

        if self.element.is_some() {
            self.detach();
        }
        log::debug!("attached to {} ({:?})", element.element_name(), self.policy);
        self.element = Some(element);

        match self.policy {
            RecolorPolicy::OnLoad => {
                self.load_pending = !self.search_string.is_empty();
                Ok(())
            }
            RecolorPolicy::Eager => self.recolor().map(|_| ()),
        }
    }

    /// アタッチを解除して要素を返す
    pub fn detach(&mut self) -> Option<E> {
        self.load_pending = false;
        self.last_text.clear();
        self.element.take()
    }

    /// 表示内容のロード完了通知
    ///
    /// 待機中であれば一度だけ再計算する
    pub fn notify_loaded(&mut self) -> Result<bool> {
        if !self.load_pending {
            return Ok(false);
        }
        self.load_pending = false;
        self.recolor()
    }

    /// 検索語を変更して再計算
    pub fn set_search_string(&mut self, search_string: impl Into<String>) -> Result<bool> {
        self.search_string = search_string.into();
        self.recolor()
    }

    /// 検索オプションを変更して再計算
    pub fn set_options(&mut self, options: SearchOptions) -> Result<bool> {
        self.options = options;
        self.recolor()
    }

    /// ハイライトスタイルを変更して再描画
    pub fn set_highlight_style(&mut self, style: Option<S>) -> Result<bool> {
        self.highlight_style = style;
        self.recolor()
    }

    /// 現在のテキストを読み取り、ハイライトを再計算して描画する
    ///
    /// 描画した場合は `true`。未アタッチや空テキストでは何もしない。
    /// パターン不正時は既存の描画を残したままエラーを返す。
    pub fn recolor(&mut self) -> Result<bool> {
        let element = match self.element.as_mut() {
            Some(element) => element,
            None => return Ok(false),
        };
        let name = element.element_name().to_string();
        let display = element
            .as_text_display()
            .ok_or(HighlightError::AttachmentType { element: name })?;

        let text = display.current_text();
        if text.is_empty() {
            self.last_text.clear();
            return Ok(false);
        }

        let segments = match compute_segments(&text, &self.search_string, &self.options) {
            Ok(segments) => segments,
            Err(err) => {
                log::warn!("keeping previous runs: {}", err);
                return Err(err);
            }
        };

        display.apply_runs(&segments, self.highlight_style.as_ref());
        log::debug!(
            "rendered {} runs ({} highlighted)",
            segments.len(),
            segments.iter().filter(|s| s.highlighted).count()
        );
        self.last_text = text;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingLabel {
        text: String,
        runs: Vec<(String, Option<u8>)>,
        apply_count: usize,
    }

    impl RecordingLabel {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                ..Self::default()
            }
        }
    }

    impl TextDisplay<u8> for RecordingLabel {
        fn current_text(&self) -> String {
            self.text.clone()
        }

        fn apply_runs(&mut self, segments: &[Segment], highlight_style: Option<&u8>) {
            self.apply_count += 1;
            self.runs = segments
                .iter()
                .map(|s| (s.text.clone(), if s.highlighted { highlight_style.copied() } else { None }))
                .collect();
        }
    }

    impl DisplayElement<u8> for RecordingLabel {
        fn element_name(&self) -> &str {
            "label"
        }

        fn as_text_display(&mut self) -> Option<&mut dyn TextDisplay<u8>> {
            Some(self)
        }
    }

    #[test]
    fn on_load_waits_for_load_notification() {
        let mut binding: HighlightBinding<RecordingLabel, u8> = HighlightBinding::new(RecolorPolicy::OnLoad)
            .with_search_string("cat")
            .with_highlight_style(7u8);
        binding.attach(RecordingLabel::new("the cat")).unwrap();
        assert!(binding.is_load_pending());
        assert_eq!(binding.element().unwrap().apply_count, 0);

        assert!(binding.notify_loaded().unwrap());
        assert!(!binding.notify_loaded().unwrap());

        let label = binding.element().unwrap();
        assert_eq!(label.apply_count, 1);
        assert_eq!(
            label.runs,
            vec![("the ".to_string(), None), ("cat".to_string(), Some(7))]
        );
    }

    #[test]
    fn on_load_without_search_string_does_not_arm() {
        let mut binding: HighlightBinding<RecordingLabel, u8> = HighlightBinding::new(RecolorPolicy::OnLoad);
        binding.attach(RecordingLabel::new("the cat")).unwrap();
        assert!(!binding.is_load_pending());
        assert!(!binding.notify_loaded().unwrap());
    }

    #[test]
    fn eager_recolors_on_attach() {
        let mut binding: HighlightBinding<RecordingLabel, u8> =
            HighlightBinding::new(RecolorPolicy::Eager).with_search_string("cat");
        binding.attach(RecordingLabel::new("catfish")).unwrap();
        let label = binding.element().unwrap();
        assert_eq!(label.apply_count, 1);
        assert_eq!(binding.last_text(), "catfish");
    }

    #[test]
    fn empty_text_is_not_rendered() {
        let mut binding: HighlightBinding<RecordingLabel, u8> =
            HighlightBinding::new(RecolorPolicy::Eager).with_search_string("cat");
        assert!(!binding.recolor().unwrap());
        binding.attach(RecordingLabel::new("")).unwrap();
        assert_eq!(binding.element().map(|l| l.apply_count), Some(0));
    }

    #[test]
    fn detach_returns_element() {
        let mut binding: HighlightBinding<RecordingLabel, u8> =
            HighlightBinding::new(RecolorPolicy::OnLoad).with_search_string("x");
        binding.attach(RecordingLabel::new("x")).unwrap();
        let label = binding.detach().unwrap();
        assert_eq!(label.text, "x");
        assert!(!binding.is_attached());
        assert!(!binding.is_load_pending());
        assert!(!binding.set_search_string("y").unwrap());
    }
}
