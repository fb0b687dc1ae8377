//! Input streams: one per log source, owning its read cursor and all
//! per-stream decoration state.

use std::cell::OnceCell;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::color::Color;
use crate::config::Settings;
use crate::decorate::{BackgroundPainter, DecoratorChain, IdentityReplacer, RegexRewriter};
use crate::error::InterleaveError;
use crate::identity::{self, IdReplacer};

/// A readable log that can be opened more than once.
///
/// The primary cursor feeds the block reader; identity discovery opens an
/// independent second cursor so the primary position is never disturbed.
pub trait LogSource {
    /// Human-readable name, also used as the stream's fallback key.
    fn label(&self) -> String;

    /// Open a fresh cursor at the start of the log.
    fn open(&self) -> io::Result<Box<dyn BufRead>>;
}

/// A log file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LogSource for FileSource {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> io::Result<Box<dyn BufRead>> {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }
}

/// One registered input log.
///
/// Identity and decorator chain are resolved on first use and kept for the
/// stream's lifetime. The primary reader is dropped as soon as it reports
/// end of input.
pub struct Stream {
    index: usize,
    source: Box<dyn LogSource>,
    reader: Option<Box<dyn BufRead>>,
    settings: Rc<Settings>,
    replacer: Option<Rc<IdReplacer>>,
    identity: OnceCell<Option<String>>,
    background: OnceCell<Color>,
    chain: Option<DecoratorChain>,
}

impl Stream {
    /// Open the primary cursor of `source`. Failing to open is fatal.
    pub fn open(
        index: usize,
        source: Box<dyn LogSource>,
        settings: Rc<Settings>,
    ) -> Result<Self, InterleaveError> {
        let reader = source.open().map_err(|e| InterleaveError::Open {
            path: PathBuf::from(source.label()),
            source: e,
        })?;
        Ok(Self {
            index,
            source,
            reader: Some(reader),
            settings,
            replacer: None,
            identity: OnceCell::new(),
            background: OnceCell::new(),
            chain: None,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> String {
        self.source.label()
    }

    /// Whether the primary reader is still held.
    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// The node identity announced in this log, scanned for at most once.
    ///
    /// A source that cannot be reopened simply has no identity.
    pub fn identity(&self) -> Option<&str> {
        self.identity
            .get_or_init(|| match self.source.open().and_then(identity::discover) {
                Ok(found) => {
                    debug!(stream = self.index, source = %self.label(), identity = ?found, "identity scan finished");
                    found
                }
                Err(e) => {
                    warn!(stream = self.index, source = %self.label(), error = %e, "cannot rescan log for its identity");
                    None
                }
            })
            .as_deref()
    }

    /// Identity when known, otherwise the source label. Unique per stream as
    /// long as labels are.
    pub fn key(&self) -> String {
        self.identity()
            .map_or_else(|| self.label(), str::to_string)
    }

    /// Background color for this stream's lines.
    pub fn background(&self) -> Color {
        *self.background.get_or_init(|| {
            if self.settings.color_by_identity {
                Color::pick_for(&self.key()).rescaled_readable()
            } else {
                self.settings.palette[self.index % self.settings.palette.len()]
            }
        })
    }

    /// Foreground color for text meant to stand out on top of [`background`](Self::background).
    pub fn foreground(&self) -> Color {
        self.background().with_inverted_luminance()
    }

    /// Share the identity rewrite rules built across all streams.
    pub fn attach_replacer(&mut self, replacer: Rc<IdReplacer>) {
        self.replacer = Some(replacer);
    }

    /// Read the next raw line, without trailing whitespace.
    ///
    /// Returns `None` at end of input, at which point the reader is released.
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        buf.clear();
        if reader.read_until(b'\n', buf)? == 0 {
            self.reader = None;
            return Ok(None);
        }
        let line = String::from_utf8_lossy(buf);
        Ok(Some(line.trim_end().to_string()))
    }

    /// Decorate one raw line. `None` means the line is dropped.
    pub fn decorate(&mut self, line: String) -> Result<Option<String>, InterleaveError> {
        if self.chain.is_none() {
            let chain = self.build_chain()?;
            self.chain = Some(chain);
        }
        Ok(self.chain.as_ref().and_then(|chain| chain.apply(line)))
    }

    fn build_chain(&self) -> Result<DecoratorChain, InterleaveError> {
        let mut chain = DecoratorChain::new();
        chain.push(RegexRewriter::new(
            self.settings.pattern.clone(),
            self.settings.template.clone(),
            self.index,
            self.settings.strict,
        ));
        if self.settings.replace_ids
            && let Some(ref replacer) = self.replacer
        {
            chain.push(IdentityReplacer::new(Rc::clone(replacer)));
        }
        if self.settings.color {
            chain.push(BackgroundPainter::new(self.background())?);
        }
        debug!(stream = self.index, decorators = chain.len(), "built decorator chain");
        Ok(chain)
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("index", &self.index)
            .field("label", &self.label())
            .field("open", &self.is_open())
            .field("identity", &self.identity.get())
            .finish_non_exhaustive()
    }
}
