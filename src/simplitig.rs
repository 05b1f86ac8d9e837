//! Greedy simplitig assembly.
//!
//! A walk starts from a seed k-mer and extends it one symbol at a time,
//! first to the left and then to the right, trying A, C, G, T in that order
//! and erasing every k-mer it uses. Draining a set this way covers each of
//! its present k-mers exactly once.

use std::io::{self, Write};

use crate::kmer::{bit_prefix, bit_suffix, decode_into, KmerWord, LETTERS};
use crate::kmer_set::{Cursor, KmerParams, KmerSet};
use crate::writer::write_simplitig;

/// Find a present k-mer overlapping `last` by k-1 symbols on its right.
/// Returns the appended symbol code and that k-mer.
pub fn right_extension<W: KmerWord>(
    last: W,
    set: &KmerSet<W>,
    params: &KmerParams,
) -> Option<(u8, W)> {
    let stem = bit_suffix(last, params.k - 1) << 2;
    (0..4u8)
        .map(|code| (code, stem | W::from_u8(code)))
        .find(|&(_, next)| set.contains(next, params))
}

/// Find a present k-mer overlapping `first` by k-1 symbols on its left.
/// Returns the prepended symbol code and that k-mer.
pub fn left_extension<W: KmerWord>(
    first: W,
    set: &KmerSet<W>,
    params: &KmerParams,
) -> Option<(u8, W)> {
    let k = params.k;
    let stem = bit_prefix(first, k, k - 1);
    let shift = ((k - 1) << 1) as u32;
    (0..4u8)
        .map(|code| (code, (W::from_u8(code) << shift) | stem))
        .find(|&(_, next)| set.contains(next, params))
}

/// Run one walk from `begin`, which must be present, leaving the simplitig
/// in `seq`. Every k-mer the walk uses is erased from the set.
pub fn next_simplitig<W: KmerWord>(
    set: &mut KmerSet<W>,
    begin: W,
    params: &KmerParams,
    seq: &mut Vec<u8>,
) {
    seq.clear();
    set.erase(begin, params);

    let mut first = begin;
    while let Some((code, next)) = left_extension(first, set, params) {
        set.erase(next, params);
        seq.push(LETTERS[code as usize]);
        first = next;
    }
    seq.reverse();
    decode_into(begin, params.k, seq);

    let mut last = begin;
    while let Some((code, next)) = right_extension(last, set, params) {
        set.erase(next, params);
        seq.push(LETTERS[code as usize]);
        last = next;
    }
}

/// Drain every present k-mer of the set into simplitigs written to `out`
/// with IDs counting from 0. Returns how many were written.
pub fn compute_simplitigs<W: KmerWord, O: Write>(
    set: &mut KmerSet<W>,
    params: &KmerParams,
    out: &mut O,
) -> io::Result<usize> {
    let mut cursor = Cursor::new();
    let mut seq = Vec::with_capacity(params.k * 4);
    let mut id = 0;
    while let Some(begin) = set.next_present(&mut cursor, params) {
        next_simplitig(set, begin, params, &mut seq);
        write_simplitig(out, id, &seq)?;
        id += 1;
    }
    Ok(id)
}
