//! 端末向けの表示
//!
//! ratatui のテキストブロック、ANSI 出力、対話ビューアを提供

mod printer;
mod text_block;
mod viewer;

pub use printer::print_segments;
pub use text_block::StyledTextBlock;
pub use viewer::Viewer;
