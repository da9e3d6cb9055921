//! PDF Tools Library
//!
//! Structural operations on PDF documents, entirely local:
//! - Resize every page by a uniform factor
//! - Extract pages selected by a range expression like `"1-3,5,7-9"`
//! - Merge several PDFs in order
//! - Re-serialize compactly and report the size change
//!
//! Operations work through the [`pdf::DocumentCodec`] trait; [`pdf::LopdfCodec`]
//! is the lopdf-backed implementation used by the byte and file helpers.
//!
//! # Example
//!
//! ```no_run
//! use pdf_tools::pdf::{MergeOptions, merge_files};
//! use std::path::PathBuf;
//!
//! let options = MergeOptions {
//!     input_paths: vec![
//!         PathBuf::from("1. intro.pdf"),
//!         PathBuf::from("2. advanced.pdf"),
//!     ],
//!     output_path: PathBuf::from("merged.pdf"),
//! };
//!
//! merge_files(&options).expect("Failed to merge PDFs");
//! ```

pub mod error;
pub mod geometry;
pub mod output;
pub mod pdf;
pub mod range;

// Re-export commonly used items
pub use error::{Error, Result};
pub use geometry::{PageSize, ScaleFactor};
pub use output::Operation;
pub use range::{parse_page_ranges, PageSelection};
