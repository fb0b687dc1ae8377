//! Configuration management with TOML file support.
//!
//! Merges settings from three sources (highest precedence first):
//! 1. CLI flags
//! 2. Config file (`~/.config/interleave/config.toml` or `$XDG_CONFIG_HOME/interleave/config.toml`)
//! 3. Built-in defaults
//!
//! [`Config`] holds the merged values as given; [`Settings`] is the compiled
//! form (regex, template, colors) handed to the stream registry.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::color::{self, Color};
use crate::error::InterleaveError;
use crate::pattern::{DEFAULT_LINE_PATTERN, DEFAULT_OUTPUT_FORMAT, LinePattern};
use crate::template::Template;

/// Runtime configuration merged from defaults, config file, and CLI arguments.
///
/// Use [`Config::from_cli`] to build from parsed CLI arguments, or
/// [`Config::default`] for built-in defaults (useful in tests and benchmarks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Paint each stream's lines with a background color.
    pub color: bool,
    /// Shorten discovered node identities wherever they appear.
    pub replace_ids: bool,
    /// Pick background colors from node identities rather than stream order.
    pub color_by_identity: bool,
    /// Log every line dropped by the line parsing regex.
    pub strict: bool,
    /// Regex matched against each raw line.
    pub line_parsing_regex: String,
    /// Template each matched line is rendered through.
    pub output_format: String,
    /// Explicit background colors, assigned round-robin. Empty = built-in palette.
    pub bg_colors: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: false,
            replace_ids: false,
            color_by_identity: false,
            strict: false,
            line_parsing_regex: DEFAULT_LINE_PATTERN.to_string(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            bg_colors: Vec::new(),
        }
    }
}

impl Config {
    /// Build a [`Config`] from CLI arguments, loading the config file if present.
    ///
    /// Merge precedence: CLI flags > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, InterleaveError> {
        let mut config = Self::default();

        let config_path = cli.config.clone().unwrap_or_else(Self::default_config_path);
        if config_path.exists() {
            let file_config = FileConfig::load(&config_path)?;
            config.apply_file_config(file_config);
        } else if cli.config.is_some() {
            return Err(InterleaveError::Config(format!(
                "config file {} does not exist",
                config_path.display()
            )));
        }

        // Flags can only switch features on
        config.color |= cli.color;
        config.replace_ids |= cli.replace_ids;
        config.color_by_identity |= cli.color_by_identity;
        config.strict |= cli.strict;

        if let Some(ref regex) = cli.line_parsing_regex {
            config.line_parsing_regex.clone_from(regex);
        }
        if let Some(ref format) = cli.output_format {
            config.output_format.clone_from(format);
        }
        if let Some(ref colors) = cli.bg_colors {
            config.bg_colors.clone_from(colors);
        }

        Ok(config)
    }

    /// Default config file path: `$XDG_CONFIG_HOME/interleave/config.toml` or `~/.config/interleave/config.toml`.
    fn default_config_path() -> PathBuf {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(xdg).join("interleave").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("interleave")
                .join("config.toml")
        } else {
            PathBuf::from(".config/interleave/config.toml")
        }
    }

    /// Apply settings from a parsed config file.
    fn apply_file_config(&mut self, file: FileConfig) {
        if let Some(color) = file.color {
            self.color = color;
        }
        if let Some(replace_ids) = file.replace_ids {
            self.replace_ids = replace_ids;
        }
        if let Some(by_identity) = file.color_by_identity {
            self.color_by_identity = by_identity;
        }
        if let Some(strict) = file.strict {
            self.strict = strict;
        }
        if let Some(regex) = file.line_parsing_regex {
            self.line_parsing_regex = regex;
        }
        if let Some(format) = file.output_format {
            self.output_format = format;
        }
        if let Some(colors) = file.bg_colors {
            self.bg_colors = colors;
        }
    }
}

/// Config file structure (TOML deserialization).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    color: Option<bool>,
    replace_ids: Option<bool>,
    color_by_identity: Option<bool>,
    strict: Option<bool>,
    line_parsing_regex: Option<String>,
    output_format: Option<String>,
    bg_colors: Option<Vec<String>>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self, InterleaveError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InterleaveError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Validated, compiled configuration shared by every stream.
#[derive(Debug, Clone)]
pub struct Settings {
    pub color: bool,
    pub replace_ids: bool,
    pub color_by_identity: bool,
    pub strict: bool,
    pub pattern: LinePattern,
    pub template: Template,
    /// Background colors assigned by stream index, round-robin. Never empty.
    pub palette: Vec<Color>,
}

impl Settings {
    /// Compile a [`Config`], rejecting bad regexes, templates and colors.
    pub fn from_config(config: &Config) -> Result<Self, InterleaveError> {
        let pattern = LinePattern::new(&config.line_parsing_regex)?;
        let template = Template::parse(&config.output_format)?;
        pattern.check_template(&template)?;

        let palette = if config.bg_colors.is_empty() {
            color::default_palette()
                .into_iter()
                .map(Color::rescaled_readable)
                .collect()
        } else {
            config
                .bg_colors
                .iter()
                .map(|c| Color::parse(c))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            color: config.color,
            replace_ids: config.replace_ids,
            color_by_identity: config.color_by_identity,
            strict: config.strict,
            pattern,
            template,
            palette,
        })
    }

    /// Whether streams need their identities resolved before merging.
    pub fn needs_identities(&self) -> bool {
        self.replace_ids || (self.color && self.color_by_identity)
    }
}
