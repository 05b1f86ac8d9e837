use std::path::PathBuf;

use clap::Parser;

use crate::config::RunConfig;

/// Compute simplitigs of k-mer sets, optionally splitting off the k-mers
/// shared by all of them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input FASTA file, possibly compressed ("-" for stdin); repeatable
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<PathBuf>,
    /// Output file for the simplitigs of each input, in input order ("-" for stdout)
    #[arg(short, long = "output")]
    pub outputs: Vec<PathBuf>,
    /// Output file for the simplitigs of the k-mers shared by all inputs
    #[arg(short = 'x', long)]
    pub intersection: Option<PathBuf>,
    /// Stats report ("-" for stdout)
    #[arg(short, long)]
    pub stats: Option<PathBuf>,
    /// K-mer length (1 to 128)
    #[arg(short)]
    pub k: usize,
    /// Number of threads
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,
    /// Minimum occurrences of a k-mer in an input for it to be kept
    #[arg(short, long, default_value_t = 1)]
    pub min_abundance: usize,
    /// Keep k-mers and their reverse complements apart
    #[arg(short, long, default_value_t = false)]
    pub unidirectional: bool,
    /// Only log warnings and errors
    #[arg(short = 'S', long, default_value_t = false)]
    pub silent: bool,
    /// Re-read every written file and check that it covers its k-mers exactly once
    #[arg(long, default_value_t = false)]
    pub verify: bool,
}

impl Args {
    pub fn into_config(self, command_line: String) -> RunConfig {
        RunConfig {
            inputs: self.inputs,
            outputs: self.outputs,
            intersection: self.intersection,
            stats: self.stats,
            k: self.k,
            canonical: !self.unidirectional,
            min_abundance: self.min_abundance,
            threads: self.threads,
            verify: self.verify,
            command_line,
        }
    }
}
