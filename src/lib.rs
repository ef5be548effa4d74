//! `csv-normalizer` cleans and validates CSV data too large to hold comfortably in memory.
//!
//! Rows are streamed in bounded chunks through per-column [`rules::Rule`]s. Each rule normalizes
//! its target cell (for email: trim → strip invisible characters → lowercase → NFC) and validates the
//! result. Valid cells keep the normalized value; invalid cells are cleared and recorded as a
//! [`report::RejectionRecord`] in the run's [`report::Report`].
//!
//! ## Quick example: clean an in-memory CSV
//!
//! ```rust
//! use csv_normalizer::execution::{Pipeline, PipelineOptions};
//! use csv_normalizer::ingestion::CsvRowSource;
//! use csv_normalizer::rules::Rule;
//!
//! # fn main() -> Result<(), csv_normalizer::PipelineError> {
//! let input = "id,email\n1,  Foo@Bar.COM \n2,not-an-email\n";
//! let source = CsvRowSource::from_reader(input.as_bytes(), b',')?;
//!
//! let pipeline = Pipeline::new(PipelineOptions { chunk_size: 1_000 }, Rule::email("email"))?;
//! let out = pipeline.run(source)?;
//!
//! assert_eq!(out.rows[0].get("email"), Some("foo@bar.com"));
//! assert_eq!(out.rows[1].get("email"), Some(""));
//!
//! let section = out.report.section("email", "email").unwrap();
//! assert_eq!(section.stats.rejected, 1);
//! assert_eq!(section.records[0].raw, "not-an-email");
//! # Ok(())
//! # }
//! ```
//!
//! ## File to file, driven by a JSON profile
//!
//! ```no_run
//! use csv_normalizer::config::PipelineConfig;
//! use csv_normalizer::runner::normalize_csv_file;
//!
//! # fn main() -> Result<(), csv_normalizer::PipelineError> {
//! let config = PipelineConfig::from_path("profiles/minimal_email.json")?;
//! let report = normalize_csv_file("input.csv", "out.csv", &config, "out_log.txt")?;
//! println!("rejected={}", report.total_rejected());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`normalize`]: pure text primitives (trim, invisible-character cleanup, NFC, lowercase)
//! - [`rules`]: rule variants and the [`rules::RuleSet`] registry
//! - [`processing`]: applying one rule to one chunk; row filter and dedup
//! - [`execution`]: the chunked [`execution::Pipeline`] and its observer hooks
//! - [`report`]: the structured report and its text rendering
//! - [`ingestion`] / [`output`]: row sources and sinks (CSV and in-memory)
//! - [`config`]: JSON profiles
//! - [`runner`]: file-to-file convenience entry point
//! - [`error`]: the shared error type

pub mod config;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod normalize;
pub mod output;
pub mod processing;
pub mod report;
pub mod rules;
pub mod runner;
pub mod types;

pub use error::{PipelineError, PipelineResult};
