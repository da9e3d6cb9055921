//! PDF manipulation module

pub mod codec;
pub mod compact;
pub mod compress;
pub mod files;
pub mod merge;
pub mod metadata;
pub mod resize;
pub mod split;

mod copy;
mod page_tree;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use codec::{CopiedPage, DocumentCodec, LopdfCodec};
pub use compact::SaveOptions;
pub use compress::{
    compress_document, compress_file, compress_pdf, format_file_size, CompressOptions,
    CompressionLevel, CompressionProfile, CompressionReport,
};
pub use merge::{merge_documents, merge_files, merge_pdfs, MergeOptions};
pub use metadata::{count_pages, extract_file_metadata, extract_metadata, PdfMetadata};
pub use resize::{resize_document, resize_file, resize_pdf, ResizeOptions};
pub use split::{split_document, split_file, split_pdf, SplitOptions};
