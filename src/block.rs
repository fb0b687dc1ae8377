//! Block reader: groups a stream's lines under the timestamp that opened them.
//!
//! A line starting with a timestamp followed by a space opens a new block;
//! every other line continues the current one. Blocks are produced one at a
//! time, on demand, and never contain lines the decorator chain dropped.

use tracing::trace;

use crate::error::InterleaveError;
use crate::stream::Stream;
use crate::timestamp::Timestamp;

/// The unit of merging: a timestamp and the decorated lines logged under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub timestamp: Timestamp,
    pub lines: Vec<String>,
}

/// Lazily produces a stream's [`Block`]s in file order.
///
/// Lines before the first timestamp are anchored at [`Timestamp::EARLIEST`].
#[derive(Debug)]
pub struct BlockReader {
    stream: Stream,
    anchor: Timestamp,
    lines: Vec<String>,
    buf: Vec<u8>,
    finished: bool,
}

impl BlockReader {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            anchor: Timestamp::EARLIEST,
            lines: Vec::new(),
            buf: Vec::new(),
            finished: false,
        }
    }

    pub fn stream(&self) -> &Stream {
        &self.stream
    }

    /// Hand out the accumulated lines as a block, if there are any.
    fn take_block(&mut self) -> Option<Block> {
        if self.lines.is_empty() {
            return None;
        }
        Some(Block {
            timestamp: self.anchor.clone(),
            lines: std::mem::take(&mut self.lines),
        })
    }

    fn push_decorated(&mut self, line: String) -> Result<(), InterleaveError> {
        if let Some(decorated) = self.stream.decorate(line)? {
            self.lines.push(decorated);
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<Block>, InterleaveError> {
        loop {
            let Some(line) = self.stream.read_line(&mut self.buf)? else {
                self.finished = true;
                return Ok(self.take_block());
            };
            match Timestamp::from_line_prefix(&line) {
                Some(timestamp) => {
                    let finished = self.take_block();
                    trace!(stream = self.stream.index(), anchor = %timestamp, "block started");
                    self.anchor = timestamp;
                    self.push_decorated(line)?;
                    if finished.is_some() {
                        return Ok(finished);
                    }
                }
                None => self.push_decorated(line)?,
            }
        }
    }
}

impl Iterator for BlockReader {
    type Item = Result<Block, InterleaveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(block) => block.map(Ok),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
