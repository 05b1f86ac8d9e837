//! Intersection and in-place difference of k-mer sets.

use crate::kmer::KmerWord;
use crate::kmer_set::{KmerParams, KmerSet};

/// K-mers present in every set, as a fresh set of saturated entries.
///
/// Fewer than two sets give an empty intersection. The physically smallest
/// set drives the scan.
pub fn intersection<W: KmerWord>(sets: &[KmerSet<W>], params: &KmerParams) -> KmerSet<W> {
    let mut result = KmerSet::new();
    if sets.len() < 2 {
        return result;
    }
    let Some((driver_index, driver)) = sets.iter().enumerate().min_by_key(|(_, set)| set.len())
    else {
        return result;
    };

    for kmer in driver.iter_present(params) {
        let everywhere = sets
            .iter()
            .enumerate()
            .all(|(i, set)| i == driver_index || set.contains(kmer, params));
        if everywhere {
            result.insert_saturated(kmer, params);
        }
    }
    result
}

/// Erase every stored key of `subtrahend` from `set`.
pub fn subtract<W: KmerWord>(set: &mut KmerSet<W>, subtrahend: &KmerSet<W>, params: &KmerParams) {
    for kmer in subtrahend.keys() {
        set.erase(kmer, params);
    }
}

pub fn difference_in_place<W: KmerWord>(
    sets: &mut [KmerSet<W>],
    subtrahend: &KmerSet<W>,
    params: &KmerParams,
) {
    for set in sets.iter_mut() {
        subtract(set, subtrahend, params);
    }
}
