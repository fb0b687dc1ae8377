//! Per-line decoration: template rewriting, identity shortening and
//! background coloring.
//!
//! Each stream owns a [`DecoratorChain`], an ordered list of
//! [`LineDecorator`]s run one after another. Any decorator may drop the line,
//! which ends the chain.

use std::rc::Rc;

use regex::{Captures, Regex};
use tracing::warn;

use crate::color::Color;
use crate::error::InterleaveError;
use crate::identity::IdReplacer;
use crate::pattern::LinePattern;
use crate::template::Template;

/// SGR sequences (`ESC [ <codes> m`) already present in a line.
const SGR_PATTERN: &str = r"\x1b\[(\d+(?:;\d+)*)m";

/// Clear to end of line, then reset all attributes.
const LINE_END: &str = "\x1b[K\x1b[0m";

/// A single line transformation. Returning `None` drops the line.
pub trait LineDecorator {
    fn decorate(&self, line: String) -> Option<String>;
}

/// Matches the raw line against the line pattern and renders the output
/// template. Lines that do not match are dropped.
#[derive(Debug, Clone)]
pub struct RegexRewriter {
    pattern: LinePattern,
    template: Template,
    index: usize,
    strict: bool,
}

impl RegexRewriter {
    /// `strict` logs a warning for every dropped line.
    pub fn new(pattern: LinePattern, template: Template, index: usize, strict: bool) -> Self {
        Self {
            pattern,
            template,
            index,
            strict,
        }
    }
}

impl LineDecorator for RegexRewriter {
    fn decorate(&self, line: String) -> Option<String> {
        let Some(ctx) = self.pattern.context(&line, self.index) else {
            if self.strict {
                warn!(stream = self.index, line = %line, "line does not match the line parsing regex; dropped");
            }
            return None;
        };
        Some(self.template.render_to_string(&ctx))
    }
}

/// Rewrites known node identities into their short form.
#[derive(Debug, Clone)]
pub struct IdentityReplacer {
    replacer: Rc<IdReplacer>,
}

impl IdentityReplacer {
    pub fn new(replacer: Rc<IdReplacer>) -> Self {
        Self { replacer }
    }
}

impl LineDecorator for IdentityReplacer {
    fn decorate(&self, line: String) -> Option<String> {
        Some(self.replacer.replace(line))
    }
}

/// Paints the whole terminal line in a background color.
///
/// Existing SGR sequences are extended with the background code so that
/// resets inside the line (e.g. the end of a red `ERROR`) do not clear the
/// background. The line ends with clear-to-end-of-line so the color spans
/// the full terminal width, followed by a full reset.
#[derive(Debug, Clone)]
pub struct BackgroundPainter {
    sgr: String,
    escapes: Regex,
}

impl BackgroundPainter {
    pub fn new(color: Color) -> Result<Self, InterleaveError> {
        Ok(Self {
            sgr: color.background_sgr(),
            escapes: Regex::new(SGR_PATTERN)?,
        })
    }

    pub fn paint(&self, line: &str) -> String {
        let nested = self
            .escapes
            .replace_all(line, |caps: &Captures<'_>| format!("\x1b[{};{}m", &caps[1], self.sgr));
        format!("\x1b[{}m{nested}{LINE_END}", self.sgr)
    }
}

impl LineDecorator for BackgroundPainter {
    fn decorate(&self, line: String) -> Option<String> {
        Some(self.paint(&line))
    }
}

/// Ordered decorators applied to every line of one stream.
#[derive(Default)]
pub struct DecoratorChain {
    decorators: Vec<Box<dyn LineDecorator>>,
}

impl DecoratorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, decorator: impl LineDecorator + 'static) {
        self.decorators.push(Box::new(decorator));
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Run every decorator in order, stopping at the first drop.
    pub fn apply(&self, line: String) -> Option<String> {
        self.decorators
            .iter()
            .try_fold(line, |acc, decorator| decorator.decorate(acc))
    }
}

impl std::fmt::Debug for DecoratorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratorChain")
            .field("len", &self.decorators.len())
            .finish()
    }
}
