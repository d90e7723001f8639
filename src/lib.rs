//! textmark - search string highlighting for text display elements
//!
//! 検索語に一致する部分をマッチ/非マッチの片に分割し、
//! マッチ部分だけを別スタイルで描画する

// コアモジュール
pub mod error;
pub mod logging;

// 検索ロジック
pub mod search;

// 表示要素との結合
pub mod binding;
pub mod config;

// 表示層
pub mod ui;

// 公開API
pub use binding::{DisplayElement, HighlightBinding, RecolorPolicy, TextDisplay};
pub use config::HighlightConfig;
pub use error::{HighlightError, Result};
pub use search::{compute_segments, PatternSyntax, SearchOptions, SearchPattern, Segment};
