//! エラーハンドリング
//!
//! textmark 全体で使用されるエラー型とユーティリティを定義
//! パターン不正は呼び出し側で握りつぶせる警告扱い、アタッチ失敗は致命的

use thiserror::Error;

/// ライブラリ全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// 検索パターンがコンパイルできない
    #[error("Invalid search pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// テキスト表示を持たない要素へのアタッチ
    #[error("Highlighting is only attachable to text displays (got {element})")]
    AttachmentType { element: String },

    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// 端末UIエラー
    #[error("UI operation failed")]
    Ui(#[from] UiError),
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },
}

/// 端末UI固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("Terminal initialization failed: {message}")]
    TerminalInit { message: String },

    #[error("Rendering failed: {component}")]
    RenderingFailed { component: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Warning,
    Error,
    Fatal,
}

impl HighlightError {
    /// パターン不正エラーを作成
    pub fn invalid_pattern(pattern: impl Into<String>, err: &regex::Error) -> Self {
        let message = match err {
            regex::Error::Syntax(detail) => detail
                .lines()
                .last()
                .unwrap_or(detail.as_str())
                .trim_start_matches("error: ")
                .to_string(),
            regex::Error::CompiledTooBig(limit) => format!("compiled pattern exceeds {} bytes", limit),
            other => other.to_string(),
        };
        Self::InvalidPattern {
            pattern: pattern.into(),
            message,
        }
    }

    /// エラーレベルを取得
    pub fn level(&self) -> ErrorLevel {
        match self {
            HighlightError::InvalidPattern { .. } => ErrorLevel::Warning,
            HighlightError::AttachmentType { .. } => ErrorLevel::Fatal,
            HighlightError::Config(_) => ErrorLevel::Error,
            HighlightError::Ui(UiError::TerminalInit { .. }) => ErrorLevel::Fatal,
            HighlightError::Ui(UiError::RenderingFailed { .. }) => ErrorLevel::Error,
        }
    }

    /// UI表示用メッセージ
    pub fn display_message(&self) -> String {
        match self {
            HighlightError::InvalidPattern { message, .. } => {
                format!("無効な検索パターンです: {}", message)
            }
            HighlightError::AttachmentType { element } => {
                format!("テキスト表示以外にはアタッチできません: {}", element)
            }
            HighlightError::Config(ConfigError::InvalidFile { path, .. }) => {
                format!("設定ファイルが不正です: {}", path)
            }
            HighlightError::Config(ConfigError::InvalidValue { key, value }) => {
                format!("{} の値が不正です: {}", key, value)
            }
            HighlightError::Config(ConfigError::Io { path, message }) => {
                format!("設定ファイルを読めません: {} ({})", path, message)
            }
            HighlightError::Ui(UiError::TerminalInit { message }) => {
                format!("ターミナル初期化に失敗しました: {}", message)
            }
            HighlightError::Ui(UiError::RenderingFailed { component }) => {
                format!("描画に失敗しました: {}", component)
            }
        }
    }
}

/// ライブラリ全体で使用するResult型
pub type Result<T> = std::result::Result<T, HighlightError>;

/// パニック時の情報出力
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // 端末がrawモードのままだと出力が崩れる
        let _ = crossterm::terminal::disable_raw_mode();

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("PANIC at {}: {}", location, message);
        eprintln!("PANIC at {}: {}", location, message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_is_warning() {
        let err = regex::Regex::new("(").unwrap_err();
        let error = HighlightError::invalid_pattern("(", &err);
        assert_eq!(error.level(), ErrorLevel::Warning);
        assert!(matches!(error, HighlightError::InvalidPattern { ref pattern, .. } if pattern == "("));
        assert!(error.display_message().starts_with("無効な検索パターンです"));
    }

    #[test]
    fn attachment_error_is_fatal() {
        let error = HighlightError::AttachmentType {
            element: "image".to_string(),
        };
        assert_eq!(error.level(), ErrorLevel::Fatal);
        assert!(error.to_string().contains("image"));
    }

    #[test]
    fn config_error_converts() {
        let error: HighlightError = ConfigError::InvalidValue {
            key: "highlight-color".to_string(),
            value: "#zz".to_string(),
        }
        .into();
        assert_eq!(error.level(), ErrorLevel::Error);
        assert_eq!(error.display_message(), "highlight-color の値が不正です: #zz");
    }
}
