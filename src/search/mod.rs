//! 検索ハイライトモジュール
//!
//! 検索語のパターン化、マッチ、分割、交互マージとハイライトフラグ付与を提供

mod pattern;
mod segments;
pub mod types;

pub use pattern::{prepare, SearchPattern};
pub use segments::compute_segments;
pub use types::{Lead, PatternSyntax, SearchOptions, Segment};
