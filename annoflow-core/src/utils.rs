use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> Result<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(std::io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

///
/// Get a writer to a file (gzip'd when the path ends in `.gz`) or stdout.
///
/// # Arguments
///
/// - file_path: path to write to, or '-' for stdout
///
pub fn get_dynamic_writer_w_stdout(file_path_str: &str) -> Result<Box<dyn Write>> {
    if file_path_str == "-" {
        return Ok(Box::new(BufWriter::new(std::io::stdout())));
    }

    let path = Path::new(file_path_str);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }
    let file = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let writer: Box<dyn Write> = match is_gzipped(path) {
        true => Box::new(GzEncoder::new(BufWriter::new(file), Compression::default())),
        false => Box::new(BufWriter::new(file)),
    };
    Ok(writer)
}
