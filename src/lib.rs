#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # bibjsonl: streaming bibliographic JSON ingestion
//!
//! A Rust library for ingesting large line-delimited JSON corpora of
//! bibliographic metadata, one document per line, and exposing each record
//! to a downstream consumer after lightweight validation and normalization.
//!
//! One malformed input line never aborts a run: bad lines are logged and
//! skipped, and the remaining records are delivered in strict input order.
//!
//! ## Quick Start
//!
//! ### Streaming records from a corpus file
//!
//! ```no_run
//! use bibjsonl::StreamDriver;
//! use serde_json::Value;
//!
//! let driver = StreamDriver::new();
//! let stats = driver.load_records_from_path(
//!     "crossref-works.jsonl.gz",
//!     |doc: &Value| doc.get("title").is_some(),
//!     |doc: Value| doc,
//!     |doc: Value| println!("{doc}"),
//! );
//! println!("delivered {} of {} lines", stats.records_delivered, stats.lines_read);
//! ```
//!
//! ### Streaming raw lines
//!
//! ```
//! use bibjsonl::{LineSource, StreamDriver};
//! use std::io::Cursor;
//!
//! let source = LineSource::new(Cursor::new("{\"title\":[\"A\"]}\n"));
//! let stats = StreamDriver::new().load_lines(source, |line| println!("{line}"));
//! assert_eq!(stats.lines_read, 1);
//! ```
//!
//! ## Modules
//!
//! - [`source`] — lazy line reading with configurable text encoding
//! - [`parser`] — strict-but-tolerant JSON line parsing
//! - [`schema`] — accepted-field tables for the strict parser
//! - [`stream`] — the stream driver, collaborator traits, and run statistics
//! - [`error`] — error types and result type

pub mod error;
pub mod parser;
pub mod schema;
pub mod source;
pub mod stream;

pub use error::{IngestError, Result};
pub use parser::{LineParser, ParseFailure, ParseFailureKind};
pub use source::LineSource;
pub use stream::{IngestStats, RecordFilter, RecordNormalizer, StreamDriver};
