//! twice.rs
//! Saturating 2-bit degree counters, sixteen per atomic word.
//!
//! Bit 0 of a slot records "seen once", bit 1 "seen at least twice". An
//! increment is a `fetch_or` of bit 0; whoever finds bit 0 already set
//! promotes the slot with a second `fetch_or`. Two racing increments on an
//! empty slot therefore always end at "many", never at "one".

use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};

const SLOTS_PER_ATOM: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degree {
    Zero,
    One,
    Many,
}

#[derive(Debug)]
pub struct DegreeCounters {
    atoms: Vec<AtomicU32>,
    len: u64,
}

impl DegreeCounters {
    pub fn new(len: u64) -> Self {
        let natoms = len.div_ceil(SLOTS_PER_ATOM) as usize;
        Self { atoms: (0..natoms).map(|_| AtomicU32::new(0)).collect(), len }
    }

    pub fn len(&self) -> u64 { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Bytes held by the counter array.
    pub fn byte_size(&self) -> u64 {
        (self.atoms.len() * std::mem::size_of::<AtomicU32>()) as u64
    }

    #[inline(always)]
    fn locate(node: u64) -> (usize, u32) {
        let atom = (node / SLOTS_PER_ATOM) as usize;
        let once = 1u32 << (2 * (node % SLOTS_PER_ATOM));
        (atom, once)
    }

    /// Records one more incident edge on `node`.
    #[inline(always)]
    pub fn increment(&self, node: u64) {
        let (atom, once) = Self::locate(node);
        let old = self.atoms[atom].fetch_or(once, Ordering::Relaxed);
        if old & once != 0 {
            self.atoms[atom].fetch_or(once << 1, Ordering::Relaxed);
        }
    }

    #[inline(always)]
    pub fn degree(&self, node: u64) -> Degree {
        let (atom, once) = Self::locate(node);
        let slot = self.atoms[atom].load(Ordering::Relaxed);
        if slot & (once << 1) != 0 {
            Degree::Many
        } else if slot & once != 0 {
            Degree::One
        } else {
            Degree::Zero
        }
    }

    #[inline(always)]
    pub fn is_leaf(&self, node: u64) -> bool {
        self.degree(node) == Degree::One
    }

    pub fn clear(&self) {
        for atom in &self.atoms {
            atom.store(0, Ordering::Relaxed);
        }
    }

    /// `clear` spread over the current rayon pool.
    pub fn par_clear(&self) {
        self.atoms.par_iter().for_each(|atom| atom.store(0, Ordering::Relaxed));
    }
}
