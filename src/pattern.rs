//! Line parsing pattern and the substitution context built from it.
//!
//! The pattern is a regex matched at the start of each raw line. Every named
//! capture group becomes a template field, and a few well-known group names
//! unlock derived fields:
//!
//! | group      | derived fields                                        |
//! |------------|-------------------------------------------------------|
//! | `filename` | `basename`, `dirname`, `without_ext`, `ext`            |
//! | `date`     | `year`, `month`, `day`                                |
//! | `time`     | `hour`, `minute`, `second`, `microsecond`, `short_time` |
//!
//! `index`, `indent` and `original` are always available.

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;

use crate::error::InterleaveError;
use crate::template::{Context, Template};

/// Default pattern, matching CCF node log lines. Everything before `| ` is an
/// optional prefix so continuation lines still match with only `content`.
pub const DEFAULT_LINE_PATTERN: &str = r"(?P<prefix>(?P<datetime>(?P<date>.*)(?:T| )(?P<time>.*)Z)\s+(?P<timeoffset>\S+)?\s+(?P<thread_id>\d+)\s+\[(?P<level>\w+)\s?\]\s+(?P<filename>.*):(?P<linenumber>\d+)\s+\| )?(?P<content>.*$)";

/// Default output template.
pub const DEFAULT_OUTPUT_FORMAT: &str =
    "{short_time} |{index:02}| {indent}{content} ({basename}:{linenumber})";

const ALWAYS_FIELDS: &[&str] = &["index", "indent", "original"];
const FILENAME_FIELDS: &[&str] = &["basename", "dirname", "without_ext", "ext"];
const DATE_FIELDS: &[&str] = &["year", "month", "day"];
const TIME_FIELDS: &[&str] = &["hour", "minute", "second", "microsecond", "short_time"];

/// Compiled line parsing pattern.
#[derive(Debug, Clone)]
pub struct LinePattern {
    regex: Regex,
    names: Vec<String>,
}

impl LinePattern {
    /// Compile `pattern`, anchored at the start of the line.
    pub fn new(pattern: &str) -> Result<Self, InterleaveError> {
        let regex = Regex::new(&format!(r"\A(?:{pattern})"))?;
        let names = regex.capture_names().flatten().map(str::to_string).collect();
        Ok(Self { regex, names })
    }

    /// Every field name a template rendered against this pattern may use.
    pub fn available_fields(&self) -> BTreeSet<&str> {
        let mut fields: BTreeSet<&str> = ALWAYS_FIELDS.iter().copied().collect();
        for name in &self.names {
            fields.insert(name.as_str());
            match name.as_str() {
                "filename" => fields.extend(FILENAME_FIELDS),
                "date" => fields.extend(DATE_FIELDS),
                "time" => fields.extend(TIME_FIELDS),
                _ => {}
            }
        }
        fields
    }

    /// Reject templates that name fields this pattern never produces.
    pub fn check_template(&self, template: &Template) -> Result<(), InterleaveError> {
        let available = self.available_fields();
        let unknown: Vec<&str> = template
            .field_names()
            .filter(|name| !available.contains(name))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        Err(InterleaveError::Template(format!(
            "'{}' uses field(s) {} not produced by the line parsing regex (available: {})",
            template.source(),
            unknown.join(", "),
            available.into_iter().collect::<Vec<_>>().join(", ")
        )))
    }

    /// Match `line` and build the substitution context for the stream at
    /// `index`. Returns `None` when the line does not match.
    pub fn context(&self, line: &str, index: usize) -> Option<Context> {
        let caps = self.regex.captures(line)?;
        let mut ctx = Context::new();
        ctx.insert("indent", "  ".repeat(index));
        ctx.insert("index", i64::try_from(index).unwrap_or(i64::MAX));
        ctx.insert("original", line);

        for name in &self.names {
            let value = caps.name(name).map_or("", |m| m.as_str());
            ctx.insert(name.as_str(), value);
            match name.as_str() {
                "filename" => insert_filename_fields(&mut ctx, value),
                "date" => insert_date_fields(&mut ctx, value),
                "time" => insert_time_fields(&mut ctx, value),
                _ => {}
            }
        }
        Some(ctx)
    }
}

fn insert_filename_fields(ctx: &mut Context, filename: &str) {
    let path = Path::new(filename);
    let basename = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dirname = path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let without_ext = filename.strip_suffix(ext.as_str()).unwrap_or(filename);

    ctx.insert("basename", basename);
    ctx.insert("dirname", dirname);
    ctx.insert("without_ext", without_ext);
    ctx.insert("ext", ext);
}

fn insert_date_fields(ctx: &mut Context, date: &str) {
    match date.parse::<jiff::civil::Date>() {
        Ok(d) => {
            ctx.insert("year", i64::from(d.year()));
            ctx.insert("month", i64::from(d.month()));
            ctx.insert("day", i64::from(d.day()));
        }
        Err(_) => {
            ctx.insert("date", " ".repeat(10));
            ctx.insert("year", " ".repeat(4));
            ctx.insert("month", " ".repeat(2));
            ctx.insert("day", " ".repeat(2));
        }
    }
}

fn insert_time_fields(ctx: &mut Context, time: &str) {
    match time.parse::<jiff::civil::Time>() {
        Ok(t) => {
            let micros = i64::from(t.subsec_nanosecond()) / 1_000;
            ctx.insert("hour", i64::from(t.hour()));
            ctx.insert("minute", i64::from(t.minute()));
            ctx.insert("second", i64::from(t.second()));
            ctx.insert("microsecond", micros);
            ctx.insert(
                "short_time",
                format!("{:02}:{:02}.{:03}", t.minute(), t.second(), micros / 1_000),
            );
        }
        Err(_) => {
            ctx.insert("time", " ".repeat(15));
            ctx.insert("hour", " ".repeat(2));
            ctx.insert("minute", " ".repeat(2));
            ctx.insert("second", " ".repeat(2));
            ctx.insert("microsecond", " ".repeat(6));
            ctx.insert("short_time", " ".repeat(9));
        }
    }
}
