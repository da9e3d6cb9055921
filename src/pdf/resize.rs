//! Uniform page resizing
//!
//! Only the page boxes change. Page content is not rescaled, so shrinking a
//! page crops what lies outside the new box and enlarging it leaves blank
//! space above and to the right of the original content.

use std::path::PathBuf;
use log::info;
use crate::error::Result;
use crate::geometry::{PageSize, ScaleFactor};
use super::codec::{DocumentCodec, LopdfCodec};
use super::compact::SaveOptions;
use super::files::{read_pdf, write_pdf};

/// Options for resizing a PDF file
#[derive(Debug, Clone)]
pub struct ResizeOptions {
    /// PDF file to resize
    pub input_path: PathBuf,
    /// Where to write the resized PDF
    pub output_path: PathBuf,
    /// Factor applied to every page's width and height
    pub scale: ScaleFactor,
}

/// Scale every page of `doc` by `factor` in place and serialize it
///
/// Page count, order and content are left as they are. Every page box is
/// read before the first one is written, so a page with an unreadable box
/// fails the operation without resizing any page.
pub fn resize_document<C: DocumentCodec>(
    codec: &C,
    doc: &mut C::Document,
    factor: ScaleFactor,
) -> Result<Vec<u8>> {
    let scaled: Vec<(usize, PageSize)> = codec
        .page_sizes(doc)?
        .into_iter()
        .map(|size| size.scaled(factor))
        .enumerate()
        .collect();
    let page_count = scaled.len();

    codec.set_page_sizes(doc, &scaled)?;

    info!("Resized {} pages by a factor of {}", page_count, factor.get());
    codec.serialize(doc, &SaveOptions::default())
}

/// Resize the pages of PDF bytes
///
/// # Example
///
/// ```no_run
/// use pdf_tools::geometry::ScaleFactor;
/// use pdf_tools::pdf::resize_pdf;
///
/// let input = std::fs::read("input.pdf").unwrap();
/// let output = resize_pdf(&input, ScaleFactor::new(0.5).unwrap()).unwrap();
/// std::fs::write("resized-input.pdf", output).unwrap();
/// ```
pub fn resize_pdf(bytes: &[u8], factor: ScaleFactor) -> Result<Vec<u8>> {
    let codec = LopdfCodec;
    let mut doc = codec.load(bytes)?;
    resize_document(&codec, &mut doc, factor)
}

/// Resize a PDF file and write the result
pub fn resize_file(options: &ResizeOptions) -> Result<()> {
    let input = read_pdf(&options.input_path)?;
    let output = resize_pdf(&input, options.scale)?;
    write_pdf(&options.output_path, &output)
}
