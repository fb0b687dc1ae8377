//! Node identity discovery and identity shortening.
//!
//! A node announces its identity once in its log (`Created new node
//! n[<id>]` or `Created join node n[<id>]`). Identities are long hex
//! strings; [`IdReplacer`] rewrites every mention of a known identity,
//! including truncated ones, into `<stream index>=<first four chars>`.

use std::io::BufRead;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use regex::{NoExpand, Regex, RegexBuilder};
use tracing::warn;

use crate::color::Color;

/// Characters of an identity that must be present for a mention to match.
const REQUIRED_PREFIX_CHARS: usize = 10;

/// Characters of an identity kept in its short display form.
const SHORT_FORM_CHARS: usize = 4;

/// Compiled size cap for one identity rule. Real identities are a few dozen
/// characters; anything past this is not worth matching.
const RULE_SIZE_LIMIT: usize = 1 << 20;

static ANNOUNCEMENT: OnceLock<Regex> = OnceLock::new();

/// Scan `reader` for the first identity announcement.
///
/// Reading stops at the first match. Lines that are not valid UTF-8 are
/// decoded lossily.
pub fn discover(mut reader: impl BufRead) -> std::io::Result<Option<String>> {
    let announcement = ANNOUNCEMENT.get_or_init(|| {
        Regex::new(r"Created new node n\[(?P<new>.*?)\]|Created join node n\[(?P<join>.*?)\]")
            .expect("Invalid announcement regex")
    });
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(caps) = announcement.captures(&line) {
            let id = caps
                .name("new")
                .or_else(|| caps.name("join"))
                .map(|m| m.as_str().to_string());
            return Ok(id);
        }
    }
}

/// One identity rewrite rule.
#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    replacement: String,
}

/// Ordered identity rewrite rules shared by every stream's decorators.
#[derive(Debug, Clone, Default)]
pub struct IdReplacer {
    rules: Vec<Rule>,
}

impl IdReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identity` as belonging to the stream at `index`.
    ///
    /// When `color` is given, the short form is drawn in that foreground color.
    pub fn register(&mut self, index: usize, identity: &str, color: Option<Color>) {
        if identity.is_empty() {
            return;
        }
        let pattern = match RegexBuilder::new(&tolerant_pattern(identity))
            .size_limit(RULE_SIZE_LIMIT)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(stream = index, identity_len = identity.len(), error = %e, "identity cannot be matched; mentions are left as is");
                return;
            }
        };
        let short: String = identity.chars().take(SHORT_FORM_CHARS).collect();
        let plain = format!("{index}={short}");
        let replacement = match color {
            Some(c) => {
                let (r, g, b) = c.rgb8();
                plain.truecolor(r, g, b).to_string()
            }
            None => plain,
        };
        self.rules.push(Rule {
            pattern,
            replacement,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Apply every rule, in registration order.
    pub fn replace(&self, line: String) -> String {
        self.rules.iter().fold(line, |acc, rule| {
            if rule.pattern.is_match(&acc) {
                rule.pattern
                    .replace_all(&acc, NoExpand(&rule.replacement))
                    .into_owned()
            } else {
                acc
            }
        })
    }
}

/// Regex matching `identity` with everything past the first
/// [`REQUIRED_PREFIX_CHARS`] characters optional.
fn tolerant_pattern(identity: &str) -> String {
    let mut pattern = String::new();
    for (i, c) in identity.chars().enumerate() {
        let escaped = regex::escape(c.encode_utf8(&mut [0; 4]));
        if i < REQUIRED_PREFIX_CHARS {
            pattern.push_str(&escaped);
        } else {
            pattern.push_str(&format!("(?:{escaped})?"));
        }
    }
    pattern
}
