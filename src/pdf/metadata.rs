//! PDF metadata extraction

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::Result;
use crate::geometry::PageSize;
use super::codec::{DocumentCodec, LopdfCodec};
use super::files::read_pdf;

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Size of each page, in page order
    pub page_sizes: Vec<PageSize>,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
    /// Size of the file in bytes
    pub file_size: u64,
}

/// Extract metadata from PDF bytes
pub fn extract_metadata(bytes: &[u8]) -> Result<PdfMetadata> {
    let codec = LopdfCodec;
    let doc = codec.load(bytes)?;

    let page_sizes = codec.page_sizes(&doc)?;
    let page_count = page_sizes.len();

    Ok(PdfMetadata {
        page_count,
        page_sizes,
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
        file_size: bytes.len() as u64,
    })
}

/// Extract metadata from a PDF file
pub fn extract_file_metadata(path: &Path) -> Result<PdfMetadata> {
    extract_metadata(&read_pdf(path)?)
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    let bytes = read_pdf(path)?;
    let codec = LopdfCodec;
    Ok(codec.page_count(&codec.load(&bytes)?))
}

/// A text entry of the trailer's Info dictionary
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    let value = info.get(key).ok()?.as_str().ok()?;
    Some(decode_text_string(value))
}

/// PDF text strings are UTF-16BE with a byte order mark, or PDFDocEncoding
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}
