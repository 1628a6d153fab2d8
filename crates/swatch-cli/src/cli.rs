//! CLI argument definitions for swatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use swatch_cli::theme::Edit;

#[derive(Parser)]
#[command(
    name = "swatch",
    version,
    about = "Derive and edit relative color palettes from CSS custom properties",
    long_about = "Derive lighten/darken palettes from seed colors declared as CSS custom\n\
                  properties, edit seeds and watch relative categories follow."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the derived palette of a theme.
    Palette(ThemeArgs),

    /// Commit seed edits and print the resulting palette.
    Set(SetArgs),

    /// Replay recorded picker events and print the resulting palette.
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct ThemeArgs {
    /// Theme file (TOML). Uses the built-in theme when omitted.
    #[arg(long = "theme", value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub theme: ThemeArgs,

    /// Seed edits, applied in order.
    #[arg(value_name = "CATEGORY=COLOR", required = true)]
    pub edits: Vec<Edit>,
}

#[derive(Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub theme: ThemeArgs,

    /// JSON array of timed events.
    #[arg(value_name = "EVENTS")]
    pub events: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
