//! Per-chunk transformations.
//!
//! The processing layer operates on one [`crate::types::Chunk`] at a time and holds no state
//! across chunks, except for [`DedupFilter`] which remembers the keys it has seen.
//!
//! - [`process_chunk()`]: apply one rule to its target column
//! - [`OneFilledFilter`]: drop rows with a single filled cell among the checked columns
//! - [`DedupFilter`]: drop rows whose key columns repeat an earlier row
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use csv_normalizer::processing::process_chunk;
//! use csv_normalizer::rules::Rule;
//! use csv_normalizer::types::{Chunk, Header, Row};
//!
//! let header = Arc::new(Header::new(["id", "email"]));
//! let chunk = Chunk::new(
//!     0,
//!     vec![
//!         Row::from_pairs(header.clone(), [("id", "1"), ("email", " Ann@Mail.COM ")]),
//!         Row::from_pairs(header.clone(), [("id", "2"), ("email", "nope")]),
//!     ],
//! );
//!
//! let out = process_chunk(chunk, &Rule::email("email"));
//! assert_eq!(out.chunk.rows[0].get("email"), Some("ann@mail.com"));
//! assert_eq!(out.chunk.rows[1].get("email"), Some(""));
//! assert_eq!(out.rejections[0].row, 1);
//! assert_eq!(out.rejections[0].raw, "nope");
//! ```

pub mod chunk;
pub mod dedup;
pub mod row_filter;

pub use chunk::{process_chunk, ProcessedChunk};
pub use dedup::DedupFilter;
pub use row_filter::OneFilledFilter;
