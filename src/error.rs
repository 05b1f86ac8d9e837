//! Errors of a prophasm run.
//!
//! Every variant is fatal: configuration problems are caught before any
//! input is read, I/O problems abort the stage they happen in, and an
//! invariant violation means the set algebra itself is broken.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::kmer::MAX_K;

#[derive(Error, Diagnostic, Debug)]
pub enum ProphasmError {
    #[error("k-mer length {k} is not supported (must be between 1 and {max})")]
    #[diagnostic(code(prophasm::config::kmer_length))]
    InvalidKmerLength { k: usize, max: usize },

    #[error("minimum abundance {0} is out of range (must be between 1 and 255)")]
    #[diagnostic(code(prophasm::config::min_abundance))]
    InvalidMinAbundance(usize),

    #[error("thread count must be at least 1")]
    #[diagnostic(code(prophasm::config::threads))]
    InvalidThreads,

    #[error("{outputs} output paths given for {inputs} input paths")]
    #[diagnostic(
        code(prophasm::config::shard_count),
        help("give exactly one -o per -i, in the same order")
    )]
    ShardCountMismatch { inputs: usize, outputs: usize },

    #[error("no output requested")]
    #[diagnostic(
        code(prophasm::config::no_operation),
        help("use -o to write simplitigs per input, -x to write the intersection, or both")
    )]
    NoOperation,

    #[error("standard {stream} is used by more than one path")]
    #[diagnostic(code(prophasm::config::std_stream))]
    StdStreamReused { stream: &'static str },

    #[error("cannot verify simplitigs written to standard output")]
    #[diagnostic(
        code(prophasm::config::verify_stdout),
        help("write the simplitigs to a file or drop --verify")
    )]
    VerifyStdout,

    #[error("could not open {}", path.display())]
    #[diagnostic(code(prophasm::io::open))]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not detect the compression of {}", path.display())]
    #[diagnostic(code(prophasm::io::compression))]
    Decompress {
        path: PathBuf,
        #[source]
        source: niffler::Error,
    },

    #[error("could not parse {} as FASTA", path.display())]
    #[diagnostic(code(prophasm::io::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: seq_io::fasta::Error,
    },

    #[error("could not write {}", path.display())]
    #[diagnostic(code(prophasm::io::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "k-mer count mismatch for {label}: {input} loaded, {output} left after subtraction, \
         {intersection} in the intersection"
    )]
    #[diagnostic(code(prophasm::invariant::conservation))]
    SizeMismatch {
        label: String,
        input: usize,
        output: usize,
        intersection: usize,
    },

    #[error(
        "verification of {} failed ({missing} k-mers missing, {repeated} repeated, {extra} unexpected)",
        path.display()
    )]
    #[diagnostic(code(prophasm::invariant::coverage))]
    VerificationFailed {
        path: PathBuf,
        missing: usize,
        repeated: usize,
        extra: usize,
    },

    #[error("could not start the worker pool")]
    #[diagnostic(code(prophasm::threads::pool))]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ProphasmError {
    pub(crate) fn kmer_length(k: usize) -> Self {
        ProphasmError::InvalidKmerLength { k, max: MAX_K }
    }
}

pub type Result<T, E = ProphasmError> = std::result::Result<T, E>;
