//! ratatui 用のハイライト付きテキストブロック

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::binding::{DisplayElement, TextDisplay};
use crate::search::Segment;

/// テキストと描画片を保持する表示要素
#[derive(Debug, Clone, Default)]
pub struct StyledTextBlock {
    text: String,
    runs: Vec<Span<'static>>,
    highlighted_runs: usize,
    block: Option<Block<'static>>,
}

impl StyledTextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        let mut block = Self::default();
        block.set_text(text);
        block
    }

    /// 枠を設定
    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    /// テキストを差し替える（描画片はハイライトなしに戻る）
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.runs.clear();
        self.highlighted_runs = 0;
        if !self.text.is_empty() {
            self.runs.push(Span::raw(self.text.clone()));
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 現在の描画片
    pub fn runs(&self) -> &[Span<'static>] {
        &self.runs
    }

    /// ハイライトされている描画片の数（スタイルの有無によらない）
    pub fn highlighted_count(&self) -> usize {
        self.highlighted_runs
    }

    /// 描画片を改行で区切って行の列にする
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let mut current: Vec<Span<'static>> = Vec::new();

        for span in &self.runs {
            let mut parts = span.content.split('\n');
            if let Some(first) = parts.next() {
                if !first.is_empty() {
                    current.push(Span::styled(first.to_string(), span.style));
                }
            }
            for part in parts {
                lines.push(Line::from(std::mem::take(&mut current)));
                if !part.is_empty() {
                    current.push(Span::styled(part.to_string(), span.style));
                }
            }
        }

        lines.push(Line::from(current));
        lines
    }
}

impl TextDisplay<Style> for StyledTextBlock {
    fn current_text(&self) -> String {
        self.text.clone()
    }

    fn apply_runs(&mut self, segments: &[Segment], highlight_style: Option<&Style>) {
        self.runs.clear();
        self.highlighted_runs = segments.iter().filter(|s| s.highlighted).count();
        for segment in segments {
            let span = match (segment.highlighted, highlight_style) {
                (true, Some(style)) => Span::styled(segment.text.clone(), *style),
                _ => Span::raw(segment.text.clone()),
            };
            self.runs.push(span);
        }
    }
}

impl DisplayElement<Style> for StyledTextBlock {
    fn element_name(&self) -> &str {
        "text-block"
    }

    fn as_text_display(&mut self) -> Option<&mut dyn TextDisplay<Style>> {
        Some(self)
    }
}

impl Widget for &StyledTextBlock {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut paragraph = Paragraph::new(self.lines()).wrap(Wrap { trim: false });
        if let Some(block) = &self.block {
            paragraph = paragraph.block(block.clone());
        }
        paragraph.render(area, buf);
    }
}
