//! One prophasm run: load, intersect, subtract, assemble, verify.
//!
//! The word width is picked once from k; everything below [`run`] is
//! monomorphic in it.

use std::path::{Path, PathBuf};

use ethnum::U256;
use tracing::{debug, info, warn};

use crate::config::{Mode, RunConfig};
use crate::error::{ProphasmError, Result};
use crate::executor::ShardExecutor;
use crate::kmer::{KmerWord, Width};
use crate::kmer_set::{KmerParams, KmerSet};
use crate::parser::load_kmers;
use crate::set_ops::{intersection, subtract};
use crate::simplitig::compute_simplitigs;
use crate::stats::StatsReport;
use crate::utils::fmt_count;
use crate::writer::SimplitigWriter;

/// Sizes seen along a run, in physically stored k-mers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: Mode,
    pub width: Width,
    pub input_sizes: Vec<usize>,
    pub intersection_size: Option<usize>,
    /// Per-input sizes handed to assembly, after subtraction. Empty when
    /// only the intersection is written.
    pub output_sizes: Vec<usize>,
    /// Simplitigs written per assembled file, outputs first.
    pub simplitigs: Vec<usize>,
    pub report: StatsReport,
}

/// A set about to be drained into a file.
struct AssemblyTarget<W: KmerWord> {
    path: PathBuf,
    set: KmerSet<W>,
}

impl<W: KmerWord> AssemblyTarget<W> {
    fn new(path: &Path, set: KmerSet<W>) -> Self {
        Self {
            path: path.to_path_buf(),
            set,
        }
    }
}

pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let mode = config.validate()?;
    let width = config.width()?;
    info!(
        "k = {}, {} k-mers, {} input(s), {:?}",
        config.k,
        width,
        config.inputs.len(),
        mode
    );
    match width {
        Width::W64 => run_with::<u64>(config, mode, width),
        Width::W128 => run_with::<u128>(config, mode, width),
        Width::W256 => run_with::<U256>(config, mode, width),
    }
}

fn run_with<W: KmerWord>(config: &RunConfig, mode: Mode, width: Width) -> Result<RunSummary> {
    let params = config.params()?;
    let executor = ShardExecutor::new(config.threads);
    let mut report = StatsReport::new(config.command_line.clone());

    let sets: Vec<KmerSet<W>> =
        executor.map(config.inputs.len(), |i| load_kmers(&config.inputs[i], &params))?;
    let input_sizes: Vec<usize> = sets.iter().map(KmerSet::len).collect();
    for (path, set) in config.inputs.iter().zip(&sets) {
        if set.is_empty() {
            warn!("{} holds no k-mer of length {}", path.display(), config.k);
        }
        info!(
            "loaded {}: {} distinct k-mers",
            path.display(),
            fmt_count(set.len())
        );
        report.record(format!("input:{}", path.display()), set.len());
    }

    let common = match &config.intersection {
        Some(path) => {
            if sets.len() < 2 {
                warn!("intersection of fewer than two inputs is empty");
            }
            let common = intersection(&sets, &params);
            info!("intersection: {} k-mers", fmt_count(common.len()));
            report.record(format!("intersection:{}", path.display()), common.len());
            Some(common)
        }
        None => None,
    };

    let mut shards = if mode.writes_shards() {
        sets
    } else {
        drop(sets);
        Vec::new()
    };
    if let (true, Some(common)) = (mode.subtracts(), &common) {
        executor.for_each_mut(&mut shards, |_, shard| {
            subtract(shard, common, &params);
            Ok(())
        })?;
        for ((path, shard), &input) in config.inputs.iter().zip(&shards).zip(&input_sizes) {
            if input != shard.len() + common.len() {
                return Err(ProphasmError::SizeMismatch {
                    label: path.display().to_string(),
                    input,
                    output: shard.len(),
                    intersection: common.len(),
                });
            }
        }
    }
    let output_sizes: Vec<usize> = shards.iter().map(KmerSet::len).collect();
    for (path, &size) in config.outputs.iter().zip(&output_sizes) {
        report.record(format!("output:{}", path.display()), size);
    }
    let intersection_size = common.as_ref().map(KmerSet::len);

    let mut targets: Vec<AssemblyTarget<W>> = config
        .outputs
        .iter()
        .zip(shards)
        .map(|(path, set)| AssemblyTarget::new(path, set))
        .collect();
    if let (Some(path), Some(common)) = (&config.intersection, common) {
        targets.push(AssemblyTarget::new(path, common));
    }

    let snapshots: Vec<KmerSet<W>> = if config.verify {
        targets.iter().map(|t| t.set.clone()).collect()
    } else {
        Vec::new()
    };

    let simplitigs = executor.map_mut(&mut targets, |_, target| assemble(target, &params))?;

    if config.verify {
        executor.for_each(targets.len(), |i| {
            verify(&targets[i].path, &snapshots[i], &params)
        })?;
        info!("verified {} file(s)", targets.len());
    }

    if let Some(path) = &config.stats {
        report.save(path)?;
    }

    Ok(RunSummary {
        mode,
        width,
        input_sizes,
        intersection_size,
        output_sizes,
        simplitigs,
        report,
    })
}

fn assemble<W: KmerWord>(target: &mut AssemblyTarget<W>, params: &KmerParams) -> Result<usize> {
    let write_err = |source| ProphasmError::Write {
        path: target.path.clone(),
        source,
    };
    let kmers = target.set.present_len(params);
    let mut writer = SimplitigWriter::create(&target.path)?;
    let count = compute_simplitigs(&mut target.set, params, &mut writer).map_err(write_err)?;
    writer.finish().map_err(write_err)?;
    info!(
        "{}: {} simplitigs covering {} k-mers",
        target.path.display(),
        fmt_count(count),
        fmt_count(kmers)
    );
    if !target.set.is_empty() {
        debug!(
            "{}: {} k-mers below the abundance threshold left out",
            target.path.display(),
            fmt_count(target.set.len())
        );
    }
    Ok(count)
}

/// Re-read a written file and check it holds exactly the present k-mers of
/// `expected`, each once.
fn verify<W: KmerWord>(path: &Path, expected: &KmerSet<W>, params: &KmerParams) -> Result<()> {
    let written_params = params.with_min_abundance(1);
    let written: KmerSet<W> = load_kmers(path, &written_params)?;

    let (mut missing, mut repeated) = (0, 0);
    for kmer in expected.iter_present(params) {
        match written.count(kmer, &written_params) {
            0 => missing += 1,
            1 => {}
            _ => repeated += 1,
        }
    }
    let extra = written
        .keys()
        .filter(|&kmer| !expected.contains(kmer, params))
        .count();

    if missing + repeated + extra > 0 {
        return Err(ProphasmError::VerificationFailed {
            path: path.to_path_buf(),
            missing,
            repeated,
            extra,
        });
    }
    debug!("{}: coverage verified", path.display());
    Ok(())
}
