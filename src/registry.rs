//! Stream registration: opens every input, resolves identities and hands
//! out one block reader per stream.

use std::path::PathBuf;
use std::rc::Rc;

use tracing::{debug, info};

use crate::block::BlockReader;
use crate::config::Settings;
use crate::error::InterleaveError;
use crate::identity::IdReplacer;
use crate::stream::{FileSource, LogSource, Stream};

/// All registered streams, indexed in registration order.
#[derive(Debug)]
pub struct StreamRegistry {
    streams: Vec<Stream>,
    replacer: Rc<IdReplacer>,
}

impl StreamRegistry {
    /// Register `sources` in order. Every source is opened before any
    /// merging starts; the first failure aborts and releases the streams
    /// opened so far.
    pub fn open(
        sources: Vec<Box<dyn LogSource>>,
        settings: Settings,
    ) -> Result<Self, InterleaveError> {
        let settings = Rc::new(settings);
        let mut streams = Vec::with_capacity(sources.len());
        for (index, source) in sources.into_iter().enumerate() {
            let stream = Stream::open(index, source, Rc::clone(&settings))?;
            debug!(stream = index, source = %stream.label(), "registered stream");
            streams.push(stream);
        }

        let mut replacer = IdReplacer::new();
        if settings.needs_identities() {
            for stream in &streams {
                match stream.identity() {
                    Some(id) => {
                        info!(stream = stream.index(), source = %stream.label(), identity = id, "found node identity");
                        if settings.replace_ids {
                            let fg = settings.color.then(|| stream.foreground());
                            replacer.register(stream.index(), id, fg);
                        }
                    }
                    None => debug!(stream = stream.index(), source = %stream.label(), "no node identity found"),
                }
            }
        }

        let replacer = Rc::new(replacer);
        for stream in &mut streams {
            stream.attach_replacer(Rc::clone(&replacer));
        }

        Ok(Self { streams, replacer })
    }

    /// Register one [`FileSource`] per path.
    pub fn open_files(paths: &[PathBuf], settings: Settings) -> Result<Self, InterleaveError> {
        let sources = paths
            .iter()
            .map(|p| Box::new(FileSource::new(p)) as Box<dyn LogSource>)
            .collect();
        Self::open(sources, settings)
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Identity rewrite rules built from every stream's identity.
    pub fn replacer(&self) -> &IdReplacer {
        &self.replacer
    }

    /// One block reader per stream, in registration order.
    pub fn into_block_readers(self) -> Vec<BlockReader> {
        self.streams.into_iter().map(BlockReader::new).collect()
    }
}
