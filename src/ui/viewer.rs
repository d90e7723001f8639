//! 対話モードのビューア
//!
//! 入力した検索語でテキストを即時にハイライトし直す

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use super::text_block::StyledTextBlock;
use crate::binding::{HighlightBinding, RecolorPolicy};
use crate::config::HighlightConfig;
use crate::error::{ErrorLevel, HighlightError, Result, UiError};
use crate::search::{PatternSyntax, SearchOptions};

/// 対話ビューア
#[derive(Debug)]
pub struct Viewer {
    binding: HighlightBinding<StyledTextBlock, Style>,
    message: Option<String>,
    running: bool,
}

impl Viewer {
    /// テキストと設定からビューアを作成
    pub fn new(text: impl Into<String>, config: &HighlightConfig, search_string: &str) -> Result<Self> {
        let block = StyledTextBlock::new(text).with_block(
            Block::default().borders(Borders::ALL).title(" textmark "),
        );
        let mut binding = HighlightBinding::new(config.policy)
            .with_options(config.options)
            .with_search_string(search_string)
            .with_highlight_style(config.highlight_style()?);

        let attached = binding.attach(block);

        let mut viewer = Self {
            binding,
            message: None,
            running: true,
        };
        viewer.record(attached.map(|_| true))?;
        Ok(viewer)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn search_string(&self) -> &str {
        self.binding.search_string()
    }

    pub fn options(&self) -> &SearchOptions {
        self.binding.options()
    }

    /// プロンプトに表示中のメッセージ
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn text_block(&self) -> Option<&StyledTextBlock> {
        self.binding.element()
    }

    /// 再計算のタイミング
    pub fn policy(&self) -> RecolorPolicy {
        self.binding.policy()
    }

    /// 初回描画の完了を通知する
    ///
    /// `OnLoad` ではここで最初のハイライトが描画される
    pub fn notify_loaded(&mut self) -> Result<()> {
        let result = self.binding.notify_loaded();
        self.record(result)
    }

    /// 端末を初期化してイベントループを実行
    pub fn run(&mut self) -> Result<()> {
        enter_terminal()?;

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend).map_err(|err| terminal_error("terminal init", err))?;

        let loop_result = self.event_loop(&mut terminal);
        drop(terminal);
        let cleanup_result = leave_terminal();

        loop_result.and(cleanup_result)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut first_frame = true;
        while self.running {
            terminal
                .draw(|frame| self.render(frame))
                .map_err(|err| terminal_error("render", err))?;

            if first_frame {
                first_frame = false;
                if self.binding.is_load_pending() {
                    self.notify_loaded()?;
                    continue;
                }
            }

            if event::poll(Duration::from_millis(16)).map_err(|err| terminal_error("event poll", err))? {
                match event::read().map_err(|err| terminal_error("event read", err))? {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => self.handle_key(key_event)?,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// キー入力を処理
    ///
    /// パターン不正はメッセージとして表示し、エラーにはしない
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let result = match key.code {
            KeyCode::Esc => {
                self.running = false;
                return Ok(());
            }
            KeyCode::Char('c') if ctrl => {
                self.running = false;
                return Ok(());
            }
            KeyCode::Char('t') if ctrl => {
                let options = *self.binding.options();
                self.binding
                    .set_options(options.with_case_insensitive(!options.case_insensitive))
            }
            KeyCode::Char('r') if ctrl => {
                let options = *self.binding.options();
                let syntax = match options.syntax {
                    PatternSyntax::Literal => PatternSyntax::Regex,
                    PatternSyntax::Regex => PatternSyntax::Literal,
                };
                self.binding.set_options(options.with_syntax(syntax))
            }
            KeyCode::Tab => {
                let options = *self.binding.options();
                self.binding
                    .set_options(options.with_improper_match(!options.improper_match))
            }
            KeyCode::Char(ch) if !ctrl => {
                let mut search = self.binding.search_string().to_string();
                search.push(ch);
                self.binding.set_search_string(search)
            }
            KeyCode::Backspace => {
                let mut search = self.binding.search_string().to_string();
                if search.pop().is_none() {
                    return Ok(());
                }
                self.binding.set_search_string(search)
            }
            _ => return Ok(()),
        };
        self.record(result)
    }

    /// 再計算結果をメッセージに反映
    ///
    /// 警告レベルのエラーはメッセージに留め、それ以外は呼び出し元へ返す
    fn record(&mut self, result: Result<bool>) -> Result<()> {
        match result {
            Ok(_) => {
                self.message = None;
                Ok(())
            }
            Err(err) if err.level() == ErrorLevel::Warning => {
                log::warn!("{}", err);
                self.message = Some(err.display_message());
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn render(&self, frame: &mut Frame<'_>) {
        let [text_area, prompt_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        if let Some(block) = self.binding.element() {
            frame.render_widget(block, text_area);
        }
        frame.render_widget(Paragraph::new(self.prompt_line()), prompt_area);
    }

    fn prompt_line(&self) -> Line<'static> {
        let options = self.binding.options();
        let mut spans: Vec<Span<'static>> = Vec::new();
        spans.push(Span::styled("Search: ", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(self.binding.search_string().to_string()));

        let flags = format!(
            "  [{}] [{}] [{}]",
            if options.improper_match { "any word" } else { "phrase" },
            if options.case_insensitive { "aA" } else { "Aa" },
            options.syntax.label(),
        );
        spans.push(Span::styled(flags, Style::default().fg(Color::Gray)));

        if let Some(block) = self.binding.element() {
            spans.push(Span::styled(
                format!(" {} hits", block.highlighted_count()),
                Style::default().fg(Color::Gray),
            ));
        }

        if let Some(message) = &self.message {
            spans.push(Span::styled(format!(" {}", message), Style::default().fg(Color::Red)));
        }

        Line::from(spans)
    }
}

fn enter_terminal() -> Result<()> {
    enable_raw_mode().map_err(|err| HighlightError::Ui(UiError::TerminalInit { message: err.to_string() }))?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen).map_err(|err| terminal_error("enter alternate screen", err))?;
    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(out, LeaveAlternateScreen).map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> HighlightError {
    HighlightError::Ui(UiError::RenderingFailed {
        component: format!("{}: {}", context, err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn viewer(text: &str) -> Viewer {
        Viewer::new(text, &HighlightConfig::default(), "").unwrap()
    }

    #[test]
    fn typing_recolors_eagerly() {
        let mut viewer = viewer("the cat sat");
        for ch in "cat".chars() {
            viewer.handle_key(key(KeyCode::Char(ch))).unwrap();
        }
        assert_eq!(viewer.search_string(), "cat");
        assert_eq!(viewer.text_block().unwrap().highlighted_count(), 1);

        viewer.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(viewer.search_string(), "ca");
    }

    #[test]
    fn invalid_regex_keeps_previous_runs() {
        let mut viewer = viewer("a (cat)");
        viewer.handle_key(ctrl('r')).unwrap();
        assert_eq!(viewer.options().syntax, PatternSyntax::Regex);

        viewer.handle_key(key(KeyCode::Char('c'))).unwrap();
        let before = viewer.text_block().unwrap().runs().to_vec();
        viewer.handle_key(key(KeyCode::Char('('))).unwrap();

        assert!(viewer.message().is_some());
        assert_eq!(viewer.text_block().unwrap().runs(), before.as_slice());

        viewer.handle_key(key(KeyCode::Backspace)).unwrap();
        assert!(viewer.message().is_none());
    }

    #[test]
    fn toggles_options() {
        let mut viewer = viewer("x");
        viewer.handle_key(key(KeyCode::Tab)).unwrap();
        assert!(!viewer.options().improper_match);
        viewer.handle_key(ctrl('t')).unwrap();
        assert!(!viewer.options().case_insensitive);
    }

    #[test]
    fn on_load_policy_waits_for_first_frame() {
        let config = HighlightConfig {
            policy: RecolorPolicy::OnLoad,
            ..HighlightConfig::default()
        };
        let mut viewer = Viewer::new("the cat", &config, "cat").unwrap();
        assert_eq!(viewer.policy(), RecolorPolicy::OnLoad);
        assert_eq!(viewer.text_block().unwrap().highlighted_count(), 0);

        viewer.notify_loaded().unwrap();
        assert_eq!(viewer.text_block().unwrap().highlighted_count(), 1);
    }

    #[test]
    fn eager_policy_highlights_on_creation() {
        let config = HighlightConfig {
            policy: RecolorPolicy::Eager,
            ..HighlightConfig::default()
        };
        let viewer = Viewer::new("the cat", &config, "cat").unwrap();
        assert_eq!(viewer.text_block().unwrap().highlighted_count(), 1);
    }

    #[test]
    fn invalid_initial_regex_becomes_message() {
        let mut config = HighlightConfig {
            policy: RecolorPolicy::Eager,
            ..HighlightConfig::default()
        };
        config.options.syntax = PatternSyntax::Regex;
        let viewer = Viewer::new("a (cat)", &config, "(").unwrap();
        assert!(viewer.message().is_some());
        assert_eq!(viewer.text_block().unwrap().highlighted_count(), 0);
    }

    #[test]
    fn adjacent_matches_count_as_separate_hits() {
        let mut viewer = viewer("catcat");
        for ch in "cat".chars() {
            viewer.handle_key(key(KeyCode::Char(ch))).unwrap();
        }
        assert_eq!(viewer.text_block().unwrap().highlighted_count(), 2);
    }

    #[test]
    fn escape_stops_viewer() {
        let mut viewer = viewer("x");
        assert!(viewer.is_running());
        viewer.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!viewer.is_running());
    }
}
