use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use num_format::{Locale, ToFormattedString};

use crate::error::{ProphasmError, Result};

/// `-` stands for stdin or stdout depending on the side it is used on.
pub fn is_std_stream(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Bytes niffler needs to recognise a compression format.
const SNIFF_LEN: usize = 5;

/// Open an input for reading, transparently decompressing it.
///
/// Inputs shorter than the format magic are passed through as plain text.
pub fn open_input(path: &Path) -> Result<Box<dyn Read + Send>> {
    let mut raw: Box<dyn Read + Send> = if is_std_stream(path) {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(path).map_err(|source| ProphasmError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Box::new(BufReader::new(file))
    };
    let mut head = Vec::with_capacity(SNIFF_LEN);
    raw.by_ref()
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .map_err(|source| ProphasmError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let short = head.len() < SNIFF_LEN;
    let stream: Box<dyn Read + Send> = Box::new(io::Cursor::new(head).chain(raw));
    if short {
        return Ok(stream);
    }
    let (reader, _format) =
        niffler::send::get_reader(stream).map_err(|source| ProphasmError::Decompress {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(reader)
}

/// Thousands-separated count for log lines.
pub fn fmt_count(count: usize) -> String {
    count.to_formatted_string(&Locale::en)
}
