//! Driving a line source through parsing, filtering, and delivery.
//!
//! This module provides [`StreamDriver`], the orchestrator of one ingestion
//! run. It pulls lines from a [`LineSource`] one at a time and pushes results
//! to a caller-supplied sink, in strict input order, in one of two modes:
//!
//! - **raw mode** ([`StreamDriver::load_lines`]): every line is delivered
//!   verbatim;
//! - **record mode** ([`StreamDriver::load_records`]): each line is parsed,
//!   checked by an injected completeness predicate, rewritten by an injected
//!   normalizer, and only then delivered.
//!
//! Failure isolation is the point of this component: a malformed line or an
//! incomplete record is logged and skipped, never aborting the run. Only an
//! I/O-level failure terminates the stream, and even that is surfaced to the
//! caller solely through the log and the absence of further deliveries.
//!
//! # Examples
//!
//! ```
//! use bibjsonl::{LineSource, StreamDriver};
//! use serde_json::Value;
//! use std::io::Cursor;
//!
//! let input = "{\"title\":[\"A\"]}\nnot json\n{\"title\":[\"B\"]}\n";
//! let mut titles = Vec::new();
//!
//! let stats = StreamDriver::new().load_records(
//!     LineSource::new(Cursor::new(input)),
//!     |_doc: &Value| true,
//!     |doc: Value| doc,
//!     |doc: Value| titles.push(doc["title"][0].as_str().unwrap().to_string()),
//! );
//!
//! assert_eq!(titles, ["A", "B"]);
//! assert_eq!(stats.parse_errors, 1);
//! ```

use crate::parser::LineParser;
use crate::source::LineSource;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::{debug, error};

/// Completeness predicate over one parsed document.
///
/// Decides whether a record has enough required data to be useful
/// downstream. Pure: no side effects, may be called zero or more times per
/// line. Implemented by the surrounding system and injected into the driver;
/// any `Fn(&Value) -> bool` closure qualifies.
pub trait RecordFilter {
    /// Return `true` if the document should be delivered.
    fn is_complete(&self, doc: &Value) -> bool;
}

impl<F: Fn(&Value) -> bool> RecordFilter for F {
    fn is_complete(&self, doc: &Value) -> bool {
        self(doc)
    }
}

/// Normalization transform applied to a complete document before delivery.
///
/// Pure and total: must not fail on any document that passed the filter.
/// Implemented by the surrounding system and injected into the driver; any
/// `Fn(Value) -> Value` closure qualifies.
pub trait RecordNormalizer {
    /// Rewrite a document into its canonical delivery form.
    fn normalize(&self, doc: Value) -> Value;
}

impl<F: Fn(Value) -> Value> RecordNormalizer for F {
    fn normalize(&self, doc: Value) -> Value {
        self(doc)
    }
}

/// Counters for one ingestion run.
///
/// Deliveries may legitimately number fewer than lines read: malformed and
/// incomplete lines are counted here instead of being delivered. Serializes
/// to JSON for run reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Lines pulled from the source.
    pub lines_read: usize,
    /// Documents handed to the sink.
    pub records_delivered: usize,
    /// Lines rejected by the parser.
    pub parse_errors: usize,
    /// Parsed documents rejected by the completeness predicate.
    pub incomplete_records: usize,
}

/// Orchestrator for one ingestion run over a line source.
///
/// The driver owns no I/O itself: it consumes a [`LineSource`] (releasing
/// the underlying handle when the run ends, on every exit path) and borrows
/// the injected collaborators for the duration of the run.
#[derive(Debug, Default, Clone)]
pub struct StreamDriver {
    parser: LineParser,
}

impl StreamDriver {
    /// Create a new stream driver.
    #[must_use]
    pub fn new() -> Self {
        StreamDriver {
            parser: LineParser::new(),
        }
    }

    /// Deliver every input line verbatim to the sink, in input order.
    ///
    /// An empty input produces zero sink invocations. A mid-stream read
    /// failure is logged at error level and terminates the run without
    /// propagating to the caller.
    pub fn load_lines<R, S>(&self, source: LineSource<R>, mut sink: S) -> IngestStats
    where
        R: Read,
        S: FnMut(&str),
    {
        let mut stats = IngestStats::default();
        for item in source {
            match item {
                Ok(line) => {
                    stats.lines_read += 1;
                    sink(&line);
                },
                Err(e) => {
                    error!(error = %e, "input stream failed, terminating run");
                    break;
                },
            }
        }
        stats
    }

    /// Open `path` and deliver every line verbatim, in input order.
    ///
    /// An open failure is logged at error level and produces zero sink
    /// invocations; no error reaches the caller.
    pub fn load_lines_from_path<P, S>(&self, path: P, sink: S) -> IngestStats
    where
        P: AsRef<Path>,
        S: FnMut(&str),
    {
        match LineSource::open(path.as_ref()) {
            Ok(source) => self.load_lines(source, sink),
            Err(e) => {
                error!(path = %path.as_ref().display(), error = %e, "cannot open input");
                IngestStats::default()
            },
        }
    }

    /// Parse, filter, normalize, and deliver each complete record, in input
    /// order.
    ///
    /// Per-line policy:
    /// - a line the parser rejects is logged at error level with its content
    ///   and skipped;
    /// - a parsed document the filter rejects is logged at debug level and
    ///   skipped;
    /// - otherwise the normalized document is handed to the sink.
    ///
    /// Only an I/O failure ends the run early; it is logged and absorbed.
    pub fn load_records<R, F, N, S>(
        &self,
        source: LineSource<R>,
        filter: F,
        normalizer: N,
        mut sink: S,
    ) -> IngestStats
    where
        R: Read,
        F: RecordFilter,
        N: RecordNormalizer,
        S: FnMut(Value),
    {
        let mut stats = IngestStats::default();
        for item in source {
            let line = match item {
                Ok(line) => line,
                Err(e) => {
                    error!(error = %e, "input stream failed, terminating run");
                    break;
                },
            };
            stats.lines_read += 1;

            let doc = match self.parser.parse(&line) {
                Ok(doc) => doc,
                Err(failure) => {
                    stats.parse_errors += 1;
                    error!(%line, error = %failure.kind, "line cannot be parsed, skipping");
                    continue;
                },
            };

            if !filter.is_complete(&doc) {
                stats.incomplete_records += 1;
                debug!(%line, "incomplete record ignored");
                continue;
            }

            stats.records_delivered += 1;
            sink(normalizer.normalize(doc));
        }
        stats
    }

    /// Open `path` and deliver each complete record, in input order.
    ///
    /// An open failure is logged at error level and produces zero sink
    /// invocations; no error reaches the caller.
    pub fn load_records_from_path<P, F, N, S>(
        &self,
        path: P,
        filter: F,
        normalizer: N,
        sink: S,
    ) -> IngestStats
    where
        P: AsRef<Path>,
        F: RecordFilter,
        N: RecordNormalizer,
        S: FnMut(Value),
    {
        match LineSource::open(path.as_ref()) {
            Ok(source) => self.load_records(source, filter, normalizer, sink),
            Err(e) => {
                error!(path = %path.as_ref().display(), error = %e, "cannot open input");
                IngestStats::default()
            },
        }
    }
}
