//! Command-line surface and the resolved per-run configuration.
//!
//! Mode names: `paul` (pretty), `json`, `inspect`, `simple`. A `-N` suffix
//! on the mode name is stripped before lookup and, for `json` only, sets
//! the indent width.

use clap::{ArgAction, Parser};

use crate::render::OutputMode;

pub const DEFAULT_JSON_INDENT: usize = 2;

#[derive(Debug, Parser)]
#[command(
    name = "jog",
    version,
    disable_version_flag = true,
    about = "Reformat JSON structured-log streams for humans"
)]
pub struct Cli {
    /// Output mode: paul, json, inspect or simple (json-N sets indent width)
    #[arg(short = 'o', long = "output", value_name = "MODE", value_parser = parse_mode)]
    pub output: Option<ModeSelection>,

    /// Shorthand for `-o json`
    #[arg(short = 'j')]
    pub json: bool,

    /// Accepted for compatibility; has no effect
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Reserved
    #[arg(short = 'd', value_name = "VALUE", hide = true)]
    pub reserved: Option<String>,

    /// Print version information
    #[arg(long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Ignored; input is always read from standard input
    #[arg(value_name = "ARGS")]
    pub positional: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ModeSelection {
    pub mode: OutputMode,
    pub indent: Option<usize>,
}

fn parse_mode(arg: &str) -> Result<ModeSelection, String> {
    let (name, suffix) = match arg.rsplit_once('-') {
        Some((name, digits)) if !name.is_empty() && digits.parse::<usize>().is_ok() => {
            (name, digits.parse::<usize>().ok())
        }
        _ => (arg, None),
    };
    let mode = match name {
        "paul" => OutputMode::Pretty,
        "json" => OutputMode::Json,
        "inspect" => OutputMode::Inspect,
        "simple" => OutputMode::Simple,
        _ => return Err(format!("unknown output mode: {arg}")),
    };
    // Only json consumes the suffix; for other modes it is stripped and
    // ignored.
    let indent = if mode == OutputMode::Json { suffix } else { None };
    Ok(ModeSelection { mode, indent })
}

/// Immutable per-run configuration resolved from the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: OutputMode,
    pub json_indent: usize,
    pub quiet: bool,
    pub positional: Vec<String>,
}

impl Config {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            json_indent: DEFAULT_JSON_INDENT,
            quiet: false,
            positional: Vec::new(),
        }
    }

    pub fn with_indent(json_indent: usize) -> Self {
        Self {
            json_indent,
            ..Self::new(OutputMode::Json)
        }
    }
}

impl Cli {
    pub fn into_config(self) -> Config {
        let selection = self.output.unwrap_or(ModeSelection {
            mode: if self.json {
                OutputMode::Json
            } else {
                OutputMode::Pretty
            },
            indent: None,
        });
        Config {
            mode: selection.mode,
            json_indent: selection.indent.unwrap_or(DEFAULT_JSON_INDENT),
            quiet: self.quiet,
            positional: self.positional,
        }
    }
}
