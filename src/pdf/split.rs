//! Extracting a subset of pages into a new PDF

use std::path::PathBuf;
use log::info;
use crate::error::{Error, Result};
use crate::range::{parse_page_ranges, PageSelection};
use super::codec::{DocumentCodec, LopdfCodec};
use super::compact::SaveOptions;
use super::files::{read_pdf, write_pdf};

/// Options for splitting a PDF file
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// PDF file to take pages from
    pub input_path: PathBuf,
    /// Where to write the extracted pages
    pub output_path: PathBuf,
    /// Page range expression, e.g. `"1-3,5,7-9"`
    pub pages: String,
}

/// Build a new document holding the selected pages of `doc`
///
/// Pages appear in selection order (ascending). An empty selection produces a
/// valid document with no pages. The source document is not modified.
pub fn split_document<C: DocumentCodec>(
    codec: &C,
    doc: &C::Document,
    selection: &PageSelection,
) -> Result<Vec<u8>> {
    let page_count = codec.page_count(doc);
    if selection.page_count() != page_count {
        return Err(Error::StaleSelection {
            expected: selection.page_count(),
            actual: page_count,
        });
    }

    let mut output = codec.create_empty();
    let pages = codec.copy_pages(&mut output, doc, selection.indices())?;
    for page in pages {
        codec.append_page(&mut output, page)?;
    }

    info!("Extracted {} of {} pages", selection.len(), page_count);
    codec.serialize(&output, &SaveOptions::default())
}

/// Extract the pages named by a range expression from PDF bytes
///
/// The expression is parsed against the loaded document's page count.
/// Unparsable tokens and out-of-range pages are ignored.
///
/// # Example
///
/// ```no_run
/// use pdf_tools::pdf::split_pdf;
///
/// let input = std::fs::read("input.pdf").unwrap();
/// let output = split_pdf(&input, "1-3,5").unwrap();
/// std::fs::write("split-input.pdf", output).unwrap();
/// ```
pub fn split_pdf(bytes: &[u8], pages: &str) -> Result<Vec<u8>> {
    let codec = LopdfCodec;
    let doc = codec.load(bytes)?;
    let selection = parse_page_ranges(pages, codec.page_count(&doc));
    split_document(&codec, &doc, &selection)
}

/// Split a PDF file and write the extracted pages
///
/// Fails with [`Error::NoOperationTarget`] when the expression selects no
/// pages, instead of writing an empty PDF.
pub fn split_file(options: &SplitOptions) -> Result<()> {
    let input = read_pdf(&options.input_path)?;

    let codec = LopdfCodec;
    let doc = codec.load(&input)?;
    let selection = parse_page_ranges(&options.pages, codec.page_count(&doc));
    if selection.is_empty() {
        return Err(Error::NoOperationTarget(format!(
            "\"{}\" selects no pages of {}",
            options.pages,
            options.input_path.display()
        )));
    }

    let output = split_document(&codec, &doc, &selection)?;
    write_pdf(&options.output_path, &output)
}
