//! Simplitig output: one FASTA record per simplitig, `>ID` then the sequence.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use zstd::stream::write::Encoder as ZstdEncoder;

use crate::error::{ProphasmError, Result};
use crate::utils::is_std_stream;

const ZSTD_LEVEL_FAST4: i32 = -4; // zstd "fast=4" mode for lower memory and higher speed

/// Write one simplitig record.
pub fn write_simplitig<O: Write>(out: &mut O, id: usize, seq: &[u8]) -> io::Result<()> {
    writeln!(out, ">{id}")?;
    out.write_all(seq)?;
    out.write_all(b"\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Gzip,
    Zstd,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if name.ends_with(".gz") {
            OutputFormat::Gzip
        } else if name.ends_with(".zst") || name.ends_with(".zstd") {
            OutputFormat::Zstd
        } else {
            OutputFormat::Plain
        }
    }
}

/// Destination of one shard's simplitigs, opened before assembly and
/// finished after it.
pub enum SimplitigWriter {
    Stdout(BufWriter<io::Stdout>),
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Zstd(ZstdEncoder<'static, BufWriter<File>>),
}

impl SimplitigWriter {
    /// Open `path` (`-` for stdout), compressing by file extension.
    pub fn create(path: &Path) -> Result<Self> {
        let open_err = |source| ProphasmError::Open {
            path: path.to_path_buf(),
            source,
        };
        if is_std_stream(path) {
            return Ok(SimplitigWriter::Stdout(BufWriter::new(io::stdout())));
        }
        let file = BufWriter::new(File::create(path).map_err(open_err)?);
        let writer = match OutputFormat::from_path(path) {
            OutputFormat::Plain => SimplitigWriter::Plain(file),
            OutputFormat::Gzip => SimplitigWriter::Gzip(GzEncoder::new(file, Compression::default())),
            OutputFormat::Zstd => {
                SimplitigWriter::Zstd(ZstdEncoder::new(file, ZSTD_LEVEL_FAST4).map_err(open_err)?)
            }
        };
        Ok(writer)
    }

    /// Flush everything and write compression trailers.
    pub fn finish(self) -> io::Result<()> {
        match self {
            SimplitigWriter::Stdout(mut writer) => writer.flush(),
            SimplitigWriter::Plain(mut writer) => writer.flush(),
            SimplitigWriter::Gzip(encoder) => encoder.finish()?.flush(),
            SimplitigWriter::Zstd(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for SimplitigWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SimplitigWriter::Stdout(writer) => writer.write(buf),
            SimplitigWriter::Plain(writer) => writer.write(buf),
            SimplitigWriter::Gzip(encoder) => encoder.write(buf),
            SimplitigWriter::Zstd(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SimplitigWriter::Stdout(writer) => writer.flush(),
            SimplitigWriter::Plain(writer) => writer.flush(),
            SimplitigWriter::Gzip(encoder) => encoder.flush(),
            SimplitigWriter::Zstd(encoder) => encoder.flush(),
        }
    }
}
