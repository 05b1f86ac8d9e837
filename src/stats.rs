use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{ProphasmError, Result};
use crate::utils::is_std_stream;

/*
STATS REPORT OF ONE RUN.

1) THE COMMAND LINE, AS A COMMENT
2) ONE "label<TAB>count" LINE PER SET: input:<path>, intersection:<path>, output:<path>

Counts are physically stored k-mers, so for every subtracted shard
input = output + intersection.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsReport {
    command: String,
    entries: Vec<(String, usize)>,
}

impl StatsReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, label: impl Into<String>, count: usize) {
        self.entries.push((label.into(), count));
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn write_to<O: Write>(&self, out: &mut O) -> io::Result<()> {
        writeln!(out, "# {}", self.command)?;
        for (label, count) in &self.entries {
            writeln!(out, "{label}\t{count}")?;
        }
        Ok(())
    }

    /// Write the report to `path` (`-` for stdout).
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source| ProphasmError::Write {
            path: path.to_path_buf(),
            source,
        };
        if is_std_stream(path) {
            let mut out = io::stdout().lock();
            self.write_to(&mut out).and_then(|_| out.flush()).map_err(write_err)
        } else {
            let file = File::create(path).map_err(|source| ProphasmError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            let mut out = BufWriter::new(file);
            self.write_to(&mut out).and_then(|_| out.flush()).map_err(write_err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_layout() {
        let mut report = StatsReport::new("prophasm -k 3 -i a.fa -o a.out.fa");
        report.record("input:a.fa", 12);
        report.record("output:a.out.fa", 12);
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# prophasm -k 3 -i a.fa -o a.out.fa\ninput:a.fa\t12\noutput:a.out.fa\t12\n"
        );
    }

    #[test]
    fn save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.tsv");
        let mut report = StatsReport::new("cmd");
        report.record("intersection:x.fa", 0);
        report.save(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# cmd\nintersection:x.fa\t0\n"
        );
    }
}
