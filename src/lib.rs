//! `interleave` — Merge several timestamped log files into one stream.
//!
//! Each input file is read lazily as a sequence of blocks: a line starting
//! with an ISO 8601 timestamp plus every line after it up to the next
//! timestamp. Blocks from all files are merged in timestamp order, and every
//! line is rewritten through a regex and output template, optionally
//! shortening node identities and painting each file in its own background
//! color.
//!
//! # Example
//!
//! ```
//! use std::io::{BufRead, Cursor};
//! use interleave::{Config, LogSource, Settings, StreamRegistry, merge_streams};
//!
//! struct Text(&'static str);
//!
//! impl LogSource for Text {
//!     fn label(&self) -> String {
//!         "text".to_string()
//!     }
//!     fn open(&self) -> std::io::Result<Box<dyn BufRead>> {
//!         Ok(Box::new(Cursor::new(self.0)))
//!     }
//! }
//!
//! let config = Config {
//!     line_parsing_regex: "(?P<content>.*)".to_string(),
//!     output_format: "{index}: {content}".to_string(),
//!     ..Config::default()
//! };
//! let settings = Settings::from_config(&config).unwrap();
//! let sources: Vec<Box<dyn LogSource>> = vec![
//!     Box::new(Text("2024-01-01T00:00:00Z start\n2024-01-01T00:00:02Z end\n")),
//!     Box::new(Text("2024-01-01T00:00:01Z middle\n")),
//! ];
//! let registry = StreamRegistry::open(sources, settings).unwrap();
//!
//! let lines: Vec<String> = merge_streams(registry)
//!     .map(|block| block.unwrap())
//!     .flat_map(|block| block.lines)
//!     .collect();
//! assert_eq!(lines, [
//!     "0: 2024-01-01T00:00:00Z start",
//!     "1: 2024-01-01T00:00:01Z middle",
//!     "0: 2024-01-01T00:00:02Z end",
//! ]);
//! ```

pub mod block;
pub mod cli;
pub mod color;
pub mod config;
pub mod decorate;
pub mod error;
pub mod identity;
pub mod merge;
pub mod pattern;
pub mod registry;
pub mod stream;
pub mod template;
pub mod timestamp;

// Re-export primary API types for convenience.
pub use block::{Block, BlockReader};
pub use config::{Config, Settings};
pub use error::InterleaveError;
pub use merge::Merger;
pub use registry::StreamRegistry;
pub use stream::{FileSource, LogSource, Stream};
pub use timestamp::Timestamp;

/// Merge every stream of `registry` into one time-ordered block sequence.
pub fn merge_streams(registry: StreamRegistry) -> Merger<BlockReader> {
    Merger::new(registry.into_block_readers())
}
