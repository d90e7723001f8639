//! ハイライト設定
//!
//! 検索オプションとハイライト配色をJSONから読み込む。
//! 既定の配置先は `<config_dir>/textmark/config.json`。

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::binding::RecolorPolicy;
use crate::error::{ConfigError, Result};
use crate::search::SearchOptions;

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = "config.json";

/// ハイライト設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HighlightConfig {
    /// 検索オプション
    pub options: SearchOptions,
    /// ハイライト文字色
    pub highlight_color: String,
    /// ハイライト背景色
    pub highlight_background: Option<String>,
    /// 太字で描画するか
    pub bold: bool,
    /// 再計算のタイミング
    pub policy: RecolorPolicy,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            options: SearchOptions::default(),
            highlight_color: "yellow".to_string(),
            highlight_background: None,
            bold: true,
            policy: RecolorPolicy::OnLoad,
        }
    }
}

impl HighlightConfig {
    /// 既定の設定ファイルパス
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("textmark").join(CONFIG_FILE_NAME))
    }

    /// 指定ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: display.clone(),
            message: err.to_string(),
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|err| ConfigError::InvalidFile {
            path: display.clone(),
            message: err.to_string(),
        })?;

        // 配色は読み込み時に検証する
        config.highlight_style()?;
        log::info!("loaded highlight configuration from {}", display);
        Ok(config)
    }

    /// ユーザー指定パス（`~` や環境変数を展開）または既定パスから読み込む
    ///
    /// 既定パスにファイルが無ければ既定値を返す
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        if let Some(raw) = path {
            let expanded = expand_path(raw)?;
            return Self::load(&expanded);
        }

        match Self::default_path() {
            Some(default) if default.is_file() => Self::load(&default),
            _ => {
                log::debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// ハイライト用のスタイルを構築
    pub fn highlight_style(&self) -> Result<Style> {
        let mut style = Style::default().fg(parse_color("highlight-color", &self.highlight_color)?);
        if let Some(background) = &self.highlight_background {
            style = style.bg(parse_color("highlight-background", background)?);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        Ok(style)
    }
}

/// パス文字列の `~` と環境変数を展開する
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|err| ConfigError::InvalidValue {
        key: "path".to_string(),
        value: format!("{} ({})", raw, err),
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// 色名または `#rrggbb` を解釈する
pub fn parse_color(key: &str, value: &str) -> Result<Color> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > 32 || !trimmed.is_ascii() {
        return Err(invalid().into());
    }
    Color::from_str(trimmed).map_err(|_| invalid().into())
}
