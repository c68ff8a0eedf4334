//! alive.rs
//! One bit per edge index, packed into atomic 64-bit words.
//!
//! During a pass each word is handed to exactly one worker, so writes never
//! contend; the atomics only make the sharing visible to the type system.
//! Relaxed ordering is enough because the pass join orders everything.

use std::sync::atomic::{AtomicU64, Ordering};

pub const WORD_BITS: u64 = 64;

#[derive(Debug)]
pub struct AliveSet {
    words: Vec<AtomicU64>,
    len: u64,
}

impl AliveSet {
    /// Creates a set of `len` edges, all alive.
    pub fn new(len: u64) -> Self {
        let nwords = len.div_ceil(WORD_BITS) as usize;
        let words = (0..nwords).map(|_| AtomicU64::new(0)).collect();
        let set = Self { words, len };
        set.revive_all();
        set
    }

    pub fn len(&self) -> u64 { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn word_count(&self) -> usize { self.words.len() }

    /// Marks every edge alive again. Only called between searches.
    pub fn revive_all(&self) {
        let last = self.words.len().saturating_sub(1);
        for (i, word) in self.words.iter().enumerate() {
            word.store(self.full_word_mask(i, last), Ordering::Relaxed);
        }
    }

    fn full_word_mask(&self, i: usize, last: usize) -> u64 {
        let tail = self.len % WORD_BITS;
        if i == last && tail != 0 { (1u64 << tail) - 1 } else { u64::MAX }
    }

    #[inline(always)]
    pub fn word(&self, index: usize) -> u64 {
        self.words[index].load(Ordering::Relaxed)
    }

    #[inline(always)]
    pub fn is_alive(&self, edge: u64) -> bool {
        (self.word((edge / WORD_BITS) as usize) >> (edge % WORD_BITS)) & 1 == 1
    }

    /// Clears the bit of `edge`. There is no way to set it again short of
    /// `revive_all`.
    #[inline(always)]
    pub fn kill(&self, edge: u64) {
        let mask = !(1u64 << (edge % WORD_BITS));
        self.words[(edge / WORD_BITS) as usize].fetch_and(mask, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.words.iter().map(|w| w.load(Ordering::Relaxed).count_ones() as u64).sum()
    }

    /// Alive edges in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.words.len()).flat_map(move |i| AliveBits::new(i, self.word(i)))
    }
}

/// Alive edge indices within one word, lowest first.
pub struct AliveBits {
    base: u64,
    bits: u64,
}

impl AliveBits {
    pub fn new(word_index: usize, bits: u64) -> Self {
        Self { base: word_index as u64 * WORD_BITS, bits }
    }
}

impl Iterator for AliveBits {
    type Item = u64;

    #[inline(always)]
    fn next(&mut self) -> Option<u64> {
        if self.bits == 0 {
            return None;
        }
        let offset = self.bits.trailing_zeros() as u64;
        self.bits &= self.bits - 1;
        Some(self.base + offset)
    }
}
