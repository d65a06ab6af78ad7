//! Common test helpers shared across the integration suite.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use tempfile::NamedTempFile;

/// Write a corpus file with one document per line, returning the live
/// temp file handle (the file is removed when the handle drops).
pub fn write_corpus(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// Write a gzip-compressed corpus file with a `.gz` suffix.
#[allow(dead_code)]
pub fn write_gzip_corpus(lines: &[&str]) -> NamedTempFile {
    let file = tempfile::Builder::new().suffix(".gz").tempfile().unwrap();
    let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
    for line in lines {
        writeln!(encoder, "{line}").unwrap();
    }
    encoder.finish().unwrap();
    file
}
