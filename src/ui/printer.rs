//! 非対話モード用の ANSI 出力

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use ratatui::style::{Color, Modifier, Style};

use crate::search::Segment;

/// 描画片を端末へ書き出す
///
/// ハイライト片のみスタイルを適用し、毎回リセットする
pub fn print_segments<W: Write>(out: &mut W, segments: &[Segment], highlight_style: &Style) -> io::Result<()> {
    for segment in segments {
        if !segment.highlighted {
            queue!(out, Print(&segment.text))?;
            continue;
        }

        if let Some(fg) = highlight_style.fg {
            queue!(out, SetForegroundColor(to_term_color(fg)))?;
        }
        if let Some(bg) = highlight_style.bg {
            queue!(out, SetBackgroundColor(to_term_color(bg)))?;
        }
        if highlight_style.add_modifier.contains(Modifier::BOLD) {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if highlight_style.add_modifier.contains(Modifier::UNDERLINED) {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        queue!(out, Print(&segment.text), SetAttribute(Attribute::Reset), ResetColor)?;
    }
    out.flush()
}

/// ratatui の色を crossterm の色へ変換
fn to_term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(index) => TermColor::AnsiValue(index),
    }
}
