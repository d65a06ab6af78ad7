//! Lazy line-by-line reading of an input corpus.
//!
//! This module provides [`LineSource`], the stream session for one ingestion
//! run: it owns the underlying handle, decodes each line under a single
//! configured encoding, and releases the handle when dropped, whether
//! consumption completed, was abandoned early, or unwound through a panic.
//!
//! # Examples
//!
//! Reading lines from a file:
//!
//! ```no_run
//! use bibjsonl::LineSource;
//!
//! let source = LineSource::open("works.jsonl")?;
//! for line in source {
//!     println!("{}", line?);
//! }
//! # Ok::<(), bibjsonl::IngestError>(())
//! ```
//!
//! Reading from an already-open byte stream:
//!
//! ```
//! use bibjsonl::LineSource;
//! use std::io::Cursor;
//!
//! let source = LineSource::new(Cursor::new("{\"title\":[\"A\"]}\n"));
//! assert_eq!(source.count(), 1);
//! ```

use crate::error::Result;
use encoding_rs::{Encoding, UTF_8};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Lazy, finite, forward-only sequence of text lines over a byte stream.
///
/// The sequence is not restartable and not seekable. Line terminators
/// (`\n` or `\r\n`) are stripped. After exhaustion or a read failure the
/// iterator is fused: it yields `None` forever.
#[derive(Debug)]
pub struct LineSource<R: Read> {
    reader: BufReader<R>,
    encoding: &'static Encoding,
    lines_read: usize,
    done: bool,
}

impl LineSource<Box<dyn Read>> {
    /// Open a corpus file for line-by-line reading.
    ///
    /// Paths ending in `.gz` are transparently decompressed. The handle is
    /// owned by the returned source and released when it is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IngestError::Io`] if the file cannot be opened; no
    /// line is produced in that case.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(LineSource::new(reader))
    }
}

impl<R: Read> LineSource<R> {
    /// Wrap an already-open byte stream.
    pub fn new(reader: R) -> Self {
        LineSource {
            reader: BufReader::new(reader),
            encoding: UTF_8,
            lines_read: 0,
            done: false,
        }
    }

    /// Set the text encoding used to decode each line.
    ///
    /// Defaults to UTF-8. Bytes that are invalid under the configured
    /// encoding decode to replacement characters rather than failing the
    /// line.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibjsonl::LineSource;
    /// use std::io::Cursor;
    ///
    /// let source = LineSource::new(Cursor::new(b"{}\n".to_vec()))
    ///     .with_encoding(encoding_rs::WINDOWS_1252);
    /// ```
    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Number of lines produced so far.
    #[must_use]
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Read and decode the next line, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        let (text, _, _) = self.encoding.decode(&buf);
        self.lines_read += 1;
        Ok(Some(text.into_owned()))
    }
}

impl<R: Read> Iterator for LineSource<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) => {
                // A mid-stream read failure is terminal for the session.
                self.done = true;
                Some(Err(e))
            },
        }
    }
}
