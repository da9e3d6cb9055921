//! Concatenating PDFs
//!
//! Pages are copied document by document through the codec, so each input
//! keeps its own resources and no input's page tree ends up in the output.

use std::path::PathBuf;
use log::{debug, info};
use crate::error::{Error, Result};
use super::codec::{DocumentCodec, LopdfCodec};
use super::compact::SaveOptions;
use super::files::{read_pdf, write_pdf};

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// Append every page of every document, in input order, to one new document
///
/// A single input yields a copy of it. No inputs is an error rather than an
/// empty PDF.
pub fn merge_documents<C: DocumentCodec>(codec: &C, documents: &[C::Document]) -> Result<Vec<u8>> {
    if documents.is_empty() {
        return Err(Error::NoOperationTarget("No documents to merge".to_string()));
    }

    let mut merged = codec.create_empty();
    let mut total = 0;

    for (position, doc) in documents.iter().enumerate() {
        let page_count = codec.page_count(doc);
        let indices: Vec<usize> = (0..page_count).collect();

        let pages = codec.copy_pages(&mut merged, doc, &indices)?;
        for page in pages {
            codec.append_page(&mut merged, page)?;
        }

        debug!("Appended {} pages from document {}", page_count, position + 1);
        total += page_count;
    }

    info!("Merged {} documents into {} pages", documents.len(), total);
    codec.serialize(&merged, &SaveOptions::default())
}

/// Merge PDFs given as bytes
///
/// Every input is parsed before any page is copied, so one corrupt input
/// fails the merge up front.
///
/// # Example
///
/// ```no_run
/// use pdf_tools::pdf::merge_pdfs;
///
/// let first = std::fs::read("1. first.pdf").unwrap();
/// let second = std::fs::read("2. second.pdf").unwrap();
/// let merged = merge_pdfs(&[first, second]).unwrap();
/// std::fs::write("merged.pdf", merged).unwrap();
/// ```
pub fn merge_pdfs<B: AsRef<[u8]>>(inputs: &[B]) -> Result<Vec<u8>> {
    let codec = LopdfCodec;
    let documents = inputs
        .iter()
        .map(|bytes| codec.load(bytes.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    merge_documents(&codec, &documents)
}

/// Merge multiple PDF files into a single PDF
///
/// # Example
///
/// ```no_run
/// use pdf_tools::pdf::{MergeOptions, merge_files};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![
///         PathBuf::from("1. first.pdf"),
///         PathBuf::from("2. second.pdf"),
///     ],
///     output_path: PathBuf::from("merged.pdf"),
/// };
///
/// merge_files(&options).expect("Failed to merge");
/// ```
pub fn merge_files(options: &MergeOptions) -> Result<()> {
    if options.input_paths.is_empty() {
        return Err(Error::NoOperationTarget("No input files provided".to_string()));
    }

    let inputs = options
        .input_paths
        .iter()
        .map(|path| read_pdf(path))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_pdfs(&inputs)?;
    write_pdf(&options.output_path, &merged)
}
