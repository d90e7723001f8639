use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use textmark::logging::TerminalLogger;
use textmark::ui::{print_segments, Viewer};
use textmark::{compute_segments, error, HighlightConfig, PatternSyntax};

/// Highlight occurrences of a search string in text
#[derive(Parser, Debug)]
#[command(name = "textmark", version, about)]
struct Cli {
    /// Search string; whitespace separates alternative words unless --exact
    search: String,

    /// File to read (stdin when omitted)
    file: Option<PathBuf>,

    /// Match case exactly
    #[arg(long)]
    case_sensitive: bool,

    /// Require the whole search string as one phrase
    #[arg(long)]
    exact: bool,

    /// Treat the search string as a regular expression
    #[arg(long)]
    regex: bool,

    /// Let ^ and $ match at line boundaries (with --regex)
    #[arg(long)]
    multi_line: bool,

    /// Let . match newlines (with --regex)
    #[arg(long)]
    dot_all: bool,

    /// Highlight colour (name or #rrggbb)
    #[arg(long)]
    color: Option<String>,

    /// Configuration file (defaults to <config dir>/textmark/config.json)
    #[arg(long)]
    config: Option<String>,

    /// Open the interactive viewer
    #[arg(short, long)]
    interactive: bool,

    /// Append log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    error::setup_panic_handler();
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config(&cli)?;
    let text = read_input(cli.file.as_ref())?;

    if cli.interactive {
        let mut viewer = Viewer::new(text, &config, &cli.search)?;
        viewer.run()?;
        return Ok(());
    }

    let style = config.highlight_style()?;
    let segments = compute_segments(&text, &cli.search, &config.options)
        .with_context(|| format!("cannot highlight `{}`", cli.search))?;
    let mut out = io::stdout().lock();
    print_segments(&mut out, &segments, &style).context("failed to write output")?;
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut logger = TerminalLogger::from_verbosity(cli.verbose);
    if let Some(path) = &cli.log_file {
        logger = logger.with_file_output(path.clone());
    }
    if cli.interactive {
        // 対話モードでは画面が崩れる
        logger = logger.with_stderr(false);
    }
    logger.init().context("failed to install logger")
}

fn load_config(cli: &Cli) -> Result<HighlightConfig> {
    let mut config = HighlightConfig::load_or_default(cli.config.as_deref())?;
    if cli.case_sensitive {
        config.options.case_insensitive = false;
    }
    if cli.exact {
        config.options.improper_match = false;
    }
    if cli.regex {
        config.options.syntax = PatternSyntax::Regex;
    }
    if cli.multi_line {
        config.options.multi_line = true;
    }
    if cli.dot_all {
        config.options.dot_matches_new_line = true;
    }
    if let Some(color) = &cli.color {
        config.highlight_color = color.clone();
    }
    Ok(config)
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("cannot read stdin")?;
            Ok(text)
        }
    }
}
