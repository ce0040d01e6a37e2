use apnum_core::Result;
use std::collections::VecDeque;
use std::sync::Arc;

/// Two-tier LRU cache of fixed-size disk blocks.
///
/// Lookups hit the small L1 tier first, then L2. A miss reads a burst of
/// consecutive blocks: the requested block lands in L1, the read-ahead in L2.
/// L1 evictions are demoted to L2; L2 evictions are dropped.
#[derive(Debug)]
pub struct BlockCache {
    block_size: usize,
    l1: VecDeque<(usize, Arc<[u8]>)>,
    l1_blocks: usize,
    l2: VecDeque<(usize, Arc<[u8]>)>,
    l2_blocks: usize,
    burst_blocks: usize,
    hits: u64,
    misses: u64,
}

impl BlockCache {
    /// Sizes are in bytes and rounded down to whole blocks (at least one each).
    pub fn new(block_size: usize, l1_size: usize, l2_size: usize, burst_size: usize) -> Self {
        let block_size = block_size.max(1);
        let l1_blocks = (l1_size / block_size).max(1);
        let l2_blocks = (l2_size / block_size).max(l1_blocks);
        let burst_blocks = (burst_size / block_size).clamp(1, l2_blocks + 1);
        Self {
            block_size,
            l1: VecDeque::with_capacity(l1_blocks),
            l1_blocks,
            l2: VecDeque::with_capacity(l2_blocks),
            l2_blocks,
            burst_blocks,
            hits: 0,
            misses: 0,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Returns block `index`, calling `load(first, count)` on a miss.
    ///
    /// `load` must return at least one block, starting with `first`.
    pub fn get<F>(&mut self, index: usize, load: F) -> Result<Arc<[u8]>>
    where
        F: FnOnce(usize, usize) -> Result<Vec<Vec<u8>>>,
    {
        if let Some(pos) = self.l1.iter().position(|(i, _)| *i == index) {
            self.hits += 1;
            if let Some(entry) = self.l1.remove(pos) {
                let data = entry.1.clone();
                self.l1.push_front(entry);
                return Ok(data);
            }
        }

        if let Some(pos) = self.l2.iter().position(|(i, _)| *i == index) {
            self.hits += 1;
            if let Some((_, data)) = self.l2.remove(pos) {
                self.promote(index, data.clone());
                return Ok(data);
            }
        }

        self.misses += 1;
        let mut blocks = load(index, self.burst_blocks)?.into_iter();
        let first: Arc<[u8]> = blocks.next().unwrap_or_default().into();
        for (offset, block) in blocks.enumerate() {
            self.insert_l2(index + offset + 1, block.into());
        }
        self.promote(index, first.clone());
        Ok(first)
    }

    fn promote(&mut self, index: usize, data: Arc<[u8]>) {
        self.l1.push_front((index, data));
        while self.l1.len() > self.l1_blocks {
            if let Some((i, d)) = self.l1.pop_back() {
                self.insert_l2(i, d);
            }
        }
    }

    fn insert_l2(&mut self, index: usize, data: Arc<[u8]>) {
        if self.l1.iter().any(|(i, _)| *i == index) || self.l2.iter().any(|(i, _)| *i == index) {
            return;
        }
        self.l2.push_front((index, data));
        self.l2.truncate(self.l2_blocks);
    }
}
