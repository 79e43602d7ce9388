//! Opening command input named on the command line.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::tokenizer::STDIN_MARKER;

const GZIP_EXTENSIONS: [&str; 2] = ["gz", "GZ"];
const BZIP2_EXTENSIONS: [&str; 2] = ["bz", "bz2"];

/// Errors raised while opening an input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to open input {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Opens `name` for buffered reading.
///
/// `-` is standard input. Names ending in `.gz` or `.bz2` are decompressed
/// on the fly and anything else is read as a plain file.
///
/// # Errors
///
/// Returns [`InputError`] when the file cannot be opened.
pub fn open_input(name: &str) -> Result<Box<dyn BufRead>, InputError> {
    if name == STDIN_MARKER {
        return Ok(Box::new(io::stdin().lock()));
    }

    let path = Path::new(name);
    let extension = path.extension().and_then(|ext| ext.to_str());
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match extension {
        Some(ext) if GZIP_EXTENSIONS.contains(&ext) => {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        }
        Some(ext) if BZIP2_EXTENSIONS.contains(&ext) => {
            Box::new(BufReader::new(MultiBzDecoder::new(file)))
        }
        _ => Box::new(BufReader::new(file)),
    })
}
