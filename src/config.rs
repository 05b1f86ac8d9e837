//! Run configuration and its validation.

use std::path::{Path, PathBuf};

use crate::error::{ProphasmError, Result};
use crate::kmer::{Width, MAX_K};
use crate::kmer_set::KmerParams;
use crate::utils::is_std_stream;

/// What a run produces, decided by which outputs were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Simplitigs of every input, nothing shared.
    Assemble,
    /// Simplitigs of the k-mers common to all inputs only.
    Intersect,
    /// Common k-mers to the intersection output, the rest per input.
    IntersectAndSubtract,
}

impl Mode {
    pub fn subtracts(self) -> bool {
        self == Mode::IntersectAndSubtract
    }

    pub fn writes_shards(self) -> bool {
        self != Mode::Intersect
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub intersection: Option<PathBuf>,
    pub stats: Option<PathBuf>,
    pub k: usize,
    pub canonical: bool,
    pub min_abundance: usize,
    pub threads: usize,
    pub verify: bool,
    /// Echoed at the top of the stats report.
    pub command_line: String,
}

impl RunConfig {
    pub fn new(k: usize, inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            outputs: Vec::new(),
            intersection: None,
            stats: None,
            k,
            canonical: true,
            min_abundance: 1,
            threads: 1,
            verify: false,
            command_line: String::new(),
        }
    }

    /// Check the configuration before any input is touched.
    pub fn validate(&self) -> Result<Mode> {
        if self.k == 0 || self.k > MAX_K {
            return Err(ProphasmError::kmer_length(self.k));
        }
        self.params()?;
        if self.threads == 0 {
            return Err(ProphasmError::InvalidThreads);
        }

        let mode = match (self.outputs.is_empty(), self.intersection.is_some()) {
            (true, false) => return Err(ProphasmError::NoOperation),
            (false, false) => Mode::Assemble,
            (true, true) => Mode::Intersect,
            (false, true) => Mode::IntersectAndSubtract,
        };
        if mode.writes_shards() && self.outputs.len() != self.inputs.len() {
            return Err(ProphasmError::ShardCountMismatch {
                inputs: self.inputs.len(),
                outputs: self.outputs.len(),
            });
        }

        if count_std(self.inputs.iter()) > 1 {
            return Err(ProphasmError::StdStreamReused { stream: "input" });
        }
        let written = self
            .outputs
            .iter()
            .chain(self.intersection.iter())
            .chain(self.stats.iter());
        if count_std(written) > 1 {
            return Err(ProphasmError::StdStreamReused { stream: "output" });
        }
        let assembled = self.outputs.iter().chain(self.intersection.iter());
        if self.verify && count_std(assembled) > 0 {
            return Err(ProphasmError::VerifyStdout);
        }
        Ok(mode)
    }

    /// Set parameters of the run; fails on a minimum abundance outside 1..=255.
    pub fn params(&self) -> Result<KmerParams> {
        let min_abundance = u8::try_from(self.min_abundance)
            .ok()
            .filter(|&m| m >= 1)
            .ok_or(ProphasmError::InvalidMinAbundance(self.min_abundance))?;
        Ok(KmerParams::new(self.k, self.canonical).with_min_abundance(min_abundance))
    }

    pub fn width(&self) -> Result<Width> {
        Width::for_k(self.k).ok_or_else(|| ProphasmError::kmer_length(self.k))
    }
}

fn count_std<'a>(paths: impl Iterator<Item = &'a PathBuf>) -> usize {
    paths.filter(|p| is_std_stream(Path::new(p))).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(inputs: &[&str], outputs: &[&str], intersection: Option<&str>) -> RunConfig {
        let mut config = RunConfig::new(31, inputs.iter().map(PathBuf::from).collect());
        config.outputs = outputs.iter().map(PathBuf::from).collect();
        config.intersection = intersection.map(PathBuf::from);
        config
    }

    #[test]
    fn mode_follows_requested_outputs() {
        let cfg = config(&["a.fa", "b.fa"], &["a.out", "b.out"], None);
        assert_eq!(cfg.validate().unwrap(), Mode::Assemble);
        let cfg = config(&["a.fa", "b.fa"], &[], Some("x.fa"));
        assert_eq!(cfg.validate().unwrap(), Mode::Intersect);
        let cfg = config(&["a.fa", "b.fa"], &["a.out", "b.out"], Some("x.fa"));
        assert_eq!(cfg.validate().unwrap(), Mode::IntersectAndSubtract);
        let cfg = config(&["a.fa"], &[], None);
        assert!(matches!(cfg.validate(), Err(ProphasmError::NoOperation)));
    }

    #[test]
    fn kmer_length_bounds() {
        let mut cfg = config(&["a.fa"], &["a.out"], None);
        for k in [1, 32, 33, 64, 65, 128] {
            cfg.k = k;
            assert!(cfg.validate().is_ok(), "k = {k}");
        }
        for k in [0, 129] {
            cfg.k = k;
            assert!(matches!(
                cfg.validate(),
                Err(ProphasmError::InvalidKmerLength { max: MAX_K, .. })
            ));
        }
    }

    #[test]
    fn abundance_and_threads_bounds() {
        let mut cfg = config(&["a.fa"], &["a.out"], None);
        cfg.min_abundance = 0;
        assert!(matches!(cfg.validate(), Err(ProphasmError::InvalidMinAbundance(0))));
        cfg.min_abundance = 256;
        assert!(matches!(cfg.validate(), Err(ProphasmError::InvalidMinAbundance(256))));
        assert!(matches!(cfg.params(), Err(ProphasmError::InvalidMinAbundance(256))));
        cfg.min_abundance = 0;
        assert!(matches!(cfg.params(), Err(ProphasmError::InvalidMinAbundance(0))));
        cfg.min_abundance = 255;
        assert_eq!(cfg.params().unwrap().min_abundance, 255);
        cfg.threads = 0;
        assert!(matches!(cfg.validate(), Err(ProphasmError::InvalidThreads)));
    }

    #[test]
    fn outputs_must_match_inputs() {
        let cfg = config(&["a.fa", "b.fa"], &["a.out"], None);
        assert!(matches!(
            cfg.validate(),
            Err(ProphasmError::ShardCountMismatch { inputs: 2, outputs: 1 })
        ));
        let cfg = config(&["a.fa", "b.fa"], &["a.out"], Some("x.fa"));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn std_streams_are_used_once() {
        let cfg = config(&["-", "-"], &["a.out", "b.out"], None);
        assert!(matches!(
            cfg.validate(),
            Err(ProphasmError::StdStreamReused { stream: "input" })
        ));
        let cfg = config(&["a.fa", "b.fa"], &["-", "b.out"], Some("-"));
        assert!(matches!(
            cfg.validate(),
            Err(ProphasmError::StdStreamReused { stream: "output" })
        ));
        let mut cfg = config(&["-"], &["a.out"], None);
        cfg.stats = Some(PathBuf::from("-"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn verify_needs_files() {
        let mut cfg = config(&["a.fa"], &["-"], None);
        cfg.verify = true;
        assert!(matches!(cfg.validate(), Err(ProphasmError::VerifyStdout)));
        cfg.outputs = vec![PathBuf::from("a.out")];
        cfg.stats = Some(PathBuf::from("-"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn width_and_params() {
        let mut cfg = config(&["a.fa"], &["a.out"], None);
        cfg.k = 31;
        assert_eq!(cfg.width().unwrap(), Width::W64);
        cfg.k = 64;
        assert_eq!(cfg.width().unwrap(), Width::W128);
        cfg.k = 100;
        cfg.canonical = false;
        cfg.min_abundance = 3;
        assert_eq!(cfg.width().unwrap(), Width::W256);
        let params = cfg.params().unwrap();
        assert_eq!((params.k, params.canonical, params.min_abundance), (100, false, 3));
    }
}
