//! Abundance-aware k-mer set.
//!
//! Keys are k-mer words, values are saturating occurrence counters. An entry
//! only counts as present once its counter reaches the run's minimum
//! abundance; weaker entries stay stored so later insertions can lift them.

use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::kmer::{canonical, KmerWord};

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Counter value of saturated (and force-inserted) entries.
pub const MAX_ABUNDANCE: u8 = u8::MAX;

/// Per-run parameters every set operation is evaluated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerParams {
    pub k: usize,
    /// Store and look up k-mers by their canonical form.
    pub canonical: bool,
    pub min_abundance: u8,
}

impl KmerParams {
    pub fn new(k: usize, canonical: bool) -> Self {
        Self {
            k,
            canonical,
            min_abundance: 1,
        }
    }

    pub fn with_min_abundance(self, min_abundance: u8) -> Self {
        Self {
            min_abundance,
            ..self
        }
    }

    /// Key a k-mer is stored under.
    #[inline]
    pub fn key<W: KmerWord>(&self, kmer: W) -> W {
        if self.canonical {
            canonical(kmer, self.k)
        } else {
            kmer
        }
    }

    #[inline]
    fn is_present(&self, count: u8) -> bool {
        self.min_abundance <= 1 || count >= self.min_abundance
    }
}

/// Resumable position of a take-next scan over a [`KmerSet`].
///
/// The scan walks the slots from the top down. Every slot at or above the
/// cursor holds an entry below the abundance threshold, so erasing keys
/// between calls never hides a present key from the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    slot: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self { slot: usize::MAX }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct KmerSet<W: KmerWord> {
    counts: FxIndexMap<W, u8>,
}

impl<W: KmerWord> Default for KmerSet<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: KmerWord> KmerSet<W> {
    pub fn new() -> Self {
        Self {
            counts: FxIndexMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: FxIndexMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Number of stored entries, regardless of abundance.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count one more occurrence of the k-mer.
    pub fn insert(&mut self, kmer: W, params: &KmerParams) {
        let count = self.counts.entry(params.key(kmer)).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Mark the k-mer as present whatever its previous count.
    pub fn insert_saturated(&mut self, kmer: W, params: &KmerParams) {
        self.counts.insert(params.key(kmer), MAX_ABUNDANCE);
    }

    #[inline]
    pub fn contains(&self, kmer: W, params: &KmerParams) -> bool {
        self.counts
            .get(&params.key(kmer))
            .is_some_and(|&count| params.is_present(count))
    }

    /// Remove the entry outright, below-threshold or not.
    #[inline]
    pub fn erase(&mut self, kmer: W, params: &KmerParams) -> bool {
        self.counts.swap_remove(&params.key(kmer)).is_some()
    }

    /// Raw counter of the k-mer, 0 if absent.
    pub fn count(&self, kmer: W, params: &KmerParams) -> u8 {
        self.counts.get(&params.key(kmer)).copied().unwrap_or(0)
    }

    /// Every stored key, present or not.
    pub fn keys(&self) -> impl Iterator<Item = W> + '_ {
        self.counts.keys().copied()
    }

    /// Keys whose counter reaches the minimum abundance.
    pub fn iter_present<'a>(&'a self, params: &'a KmerParams) -> impl Iterator<Item = W> + 'a {
        self.counts
            .iter()
            .filter(|&(_, &count)| params.is_present(count))
            .map(|(&kmer, _)| kmer)
    }

    pub fn present_len(&self, params: &KmerParams) -> usize {
        self.iter_present(params).count()
    }

    /// Stored keys in slot order.
    pub fn to_vec(&self) -> Vec<W> {
        self.keys().collect()
    }

    /// Next present key from `cursor`, or `None` once none is left.
    ///
    /// The key is not removed; callers draining the set erase it themselves.
    pub fn next_present(&self, cursor: &mut Cursor, params: &KmerParams) -> Option<W> {
        let mut slot = cursor.slot.min(self.counts.len());
        while slot > 0 {
            let (&kmer, &count) = self.counts.get_index(slot - 1)?;
            if params.is_present(count) {
                cursor.slot = slot;
                return Some(kmer);
            }
            slot -= 1;
        }
        cursor.slot = 0;
        None
    }
}
