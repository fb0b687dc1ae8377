//! Command-line argument definitions for `interleave`.
//!
//! Uses [`clap`] derive macros for argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Interleave several log files according to their timestamps, coloring each uniquely.
///
/// Lines that start with an ISO 8601 timestamp open a new block; the lines
/// that follow stay attached to it. Blocks from all files are written to
/// stdout in timestamp order.
#[derive(Debug, Parser)]
#[command(name = "interleave", version, about, long_about = None)]
pub struct Cli {
    /// Log files to interleave.
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Give each input log its own background color.
    #[arg(short = 'c', long, visible_alias = "colour")]
    pub color: bool,

    /// Replace node IDs found in the logs with a briefer `<index>=<prefix>` form.
    #[arg(long)]
    pub replace_ids: bool,

    /// Derive each log's background color from its node ID instead of its position.
    ///
    /// Logs without a discoverable node ID fall back to their file path.
    #[arg(long)]
    pub color_by_identity: bool,

    /// Regex used to parse incoming log lines.
    ///
    /// Named groups can be substituted into `--output-format`. Lines that do
    /// not match are dropped. Defaults to a pattern for CCF node logs.
    #[arg(short = 'r', long)]
    pub line_parsing_regex: Option<String>,

    /// Format string used to rewrite each input line (`{name:spec}` fields).
    #[arg(short = 'f', long)]
    pub output_format: Option<String>,

    /// Background colors assigned to the logs in order, when coloring is on.
    ///
    /// Accepts `#rrggbb`, `#rgb`, or basic color names.
    #[arg(long, visible_alias = "bg-colours", num_args = 1..)]
    pub bg_colors: Option<Vec<String>>,

    /// Warn on stderr about every line the parsing regex drops.
    #[arg(long)]
    pub strict: bool,

    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log diagnostic details (identity discovery, dropped lines) to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
