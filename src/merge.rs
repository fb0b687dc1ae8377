//! K-way merge of per-stream block sequences.
//!
//! The pool holds at most one pending block per source. Each step yields
//! the pool's earliest block and, on the following step, refills the pool
//! from the source that block came from. Ties between equal timestamps go
//! to the lower source index, so output is deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::block::Block;
use crate::timestamp::Timestamp;

/// A block waiting in the pool, tagged with its source.
#[derive(Debug)]
struct Pending {
    block: Block,
    source: usize,
}

impl Pending {
    fn key(&self) -> (&Timestamp, usize) {
        (&self.block.timestamp, self.source)
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    /// Reversed, so the max-heap pops the earliest block first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Merges block sources that are each non-decreasing in timestamp into one
/// non-decreasing sequence.
///
/// A source that fails is dropped from the merge after its error is
/// yielded; the other sources carry on.
#[derive(Debug)]
pub struct Merger<I> {
    sources: Vec<I>,
    pool: BinaryHeap<Pending>,
    /// Sources `0..primed` have contributed their first block.
    primed: usize,
    /// Source whose block was yielded last and has not been refilled yet.
    refill: Option<usize>,
}

impl<I, E> Merger<I>
where
    I: Iterator<Item = Result<Block, E>>,
{
    pub fn new(sources: Vec<I>) -> Self {
        Self {
            sources,
            pool: BinaryHeap::new(),
            primed: 0,
            refill: None,
        }
    }

    /// Source indices and timestamps of the blocks currently held in the pool.
    pub fn pending(&self) -> impl Iterator<Item = (usize, &Timestamp)> {
        self.pool.iter().map(|p| (p.source, &p.block.timestamp))
    }

    fn draw(&mut self, source: usize) -> Result<(), E> {
        match self.sources.get_mut(source).and_then(|it| it.next()) {
            Some(Ok(block)) => {
                self.pool.push(Pending { block, source });
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Ok(()),
        }
    }
}

impl<I, E> Iterator for Merger<I>
where
    I: Iterator<Item = Result<Block, E>>,
{
    type Item = Result<Block, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.refill.take()
            && let Err(e) = self.draw(source)
        {
            return Some(Err(e));
        }
        while self.primed < self.sources.len() {
            let source = self.primed;
            self.primed += 1;
            if let Err(e) = self.draw(source) {
                return Some(Err(e));
            }
        }
        let Pending { block, source } = self.pool.pop()?;
        self.refill = Some(source);
        Some(Ok(block))
    }
}
