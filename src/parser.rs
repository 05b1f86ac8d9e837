//! FASTA reader feeding k-mer sets.
//!
//! Every valid window of k consecutive A/C/G/T symbols is counted once per
//! occurrence. Windows never span two records, and any other symbol breaks
//! the window. Spaces and carriage returns inside sequence lines are ignored.
//! Input that does not open with a `>` header is read as raw sequence text,
//! where a later `>` line still starts a new record.

use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use seq_io::fasta::Reader;
use tracing::debug;

use crate::error::{ProphasmError, Result};
use crate::kmer::{mask_for_k, nucleotide_to_code, KmerWord};
use crate::kmer_set::{KmerParams, KmerSet};
use crate::utils::{fmt_count, open_input};

/// Rolling window over the symbols of one record.
#[derive(Debug, Clone, Copy)]
pub struct KmerWindow<W: KmerWord> {
    k: usize,
    mask: W,
    kmer: W,
    filled: usize,
}

impl<W: KmerWord> KmerWindow<W> {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            mask: mask_for_k(k),
            kmer: W::ZERO,
            filled: 0,
        }
    }

    pub fn reset(&mut self) {
        self.kmer = W::ZERO;
        self.filled = 0;
    }

    /// Shift in one symbol code; returns the k-mer once the window is full.
    #[inline]
    pub fn push(&mut self, code: u8) -> Option<W> {
        self.kmer = ((self.kmer << 2) | W::from_u8(code)) & self.mask;
        if self.filled < self.k {
            self.filled += 1;
        }
        (self.filled == self.k).then_some(self.kmer)
    }
}

/// Feed one sequence byte through the window; 1 if a k-mer was counted.
#[inline]
fn count_base<W: KmerWord>(
    window: &mut KmerWindow<W>,
    base: u8,
    set: &mut KmerSet<W>,
    params: &KmerParams,
) -> u64 {
    if base == b' ' || base == b'\r' {
        return 0;
    }
    match nucleotide_to_code(base) {
        Some(code) => match window.push(code) {
            Some(kmer) => {
                set.insert(kmer, params);
                1
            }
            None => 0,
        },
        None => {
            window.reset();
            0
        }
    }
}

/// Skip leading blank bytes and tell whether the stream opens with a header.
fn starts_with_header<R: BufRead>(input: &mut R) -> io::Result<bool> {
    loop {
        let buf = input.fill_buf()?;
        if buf.is_empty() {
            return Ok(true);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(start) => {
                let header = buf[start] == b'>';
                input.consume(start);
                return Ok(header);
            }
            None => {
                let len = buf.len();
                input.consume(len);
            }
        }
    }
}

fn read_records<W: KmerWord, R: Read>(
    input: R,
    set: &mut KmerSet<W>,
    params: &KmerParams,
) -> std::result::Result<u64, seq_io::fasta::Error> {
    let mut reader = Reader::new(input);
    let mut window = KmerWindow::<W>::new(params.k);
    let mut windows = 0u64;
    while let Some(record) = reader.next() {
        let record = record?;
        window.reset();
        for line in record.seq_lines() {
            for &base in line {
                windows += count_base(&mut window, base, set, params);
            }
        }
    }
    Ok(windows)
}

fn read_raw<W: KmerWord, R: BufRead>(
    mut input: R,
    set: &mut KmerSet<W>,
    params: &KmerParams,
) -> io::Result<u64> {
    let mut window = KmerWindow::<W>::new(params.k);
    let mut windows = 0u64;
    let mut in_header = false;
    loop {
        let buf = input.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        for &byte in buf {
            match byte {
                b'>' => {
                    in_header = true;
                    window.reset();
                }
                b'\n' => in_header = false,
                _ if in_header => {}
                _ => windows += count_base(&mut window, byte, set, params),
            }
        }
        let len = buf.len();
        input.consume(len);
    }
    Ok(windows)
}

/// Count every k-mer of a FASTA (or headerless sequence) stream into `set`.
/// Returns the number of windows read.
pub fn read_kmers<W: KmerWord, R: Read>(
    input: R,
    set: &mut KmerSet<W>,
    params: &KmerParams,
) -> std::result::Result<u64, seq_io::fasta::Error> {
    let mut input = BufReader::new(input);
    if starts_with_header(&mut input)? {
        read_records(input, set, params)
    } else {
        Ok(read_raw(input, set, params)?)
    }
}

/// Load the k-mer set of one input file (`-` for stdin).
pub fn load_kmers<W: KmerWord>(path: &Path, params: &KmerParams) -> Result<KmerSet<W>> {
    let input = open_input(path)?;
    let mut set = KmerSet::new();
    let windows = read_kmers(input, &mut set, params).map_err(|source| ProphasmError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "{}: {} k-mer occurrences, {} distinct",
        path.display(),
        fmt_count(windows as usize),
        fmt_count(set.len())
    );
    Ok(set)
}
