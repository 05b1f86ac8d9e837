//! Simplitig computation over k-mer sets of FASTA inputs.
//!
//! Each input becomes a set of (optionally canonical) k-mers. Sets can be
//! intersected, have the intersection subtracted, and are finally drained
//! into simplitigs: spelled paths covering every k-mer exactly once.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod kmer;
pub mod kmer_set;
pub mod parser;
pub mod pipeline;
pub mod set_ops;
pub mod simplitig;
pub mod stats;
pub mod utils;
pub mod writer;

pub use config::{Mode, RunConfig};
pub use error::{ProphasmError, Result};
pub use kmer::{KmerWord, Width, MAX_K};
pub use kmer_set::{KmerParams, KmerSet};
pub use pipeline::{run, RunSummary};
