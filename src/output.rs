//! Output file naming

use std::fmt;
use std::path::Path;

/// Name used when an operation's input has no usable file name
const FALLBACK_NAME: &str = "document.pdf";

/// The page operations, as far as output naming is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Resize,
    Split,
    Merge,
    Compress,
}

impl Operation {
    /// Output file name for this operation applied to `original`
    ///
    /// - resize → `resized-<original>`
    /// - split → `split-<original>`
    /// - merge → `merged.pdf`
    /// - compress → `compressed-<original>`
    ///
    /// Only the file name of `original` is used, never its directory.
    ///
    /// ```
    /// use pdf_tools::output::Operation;
    /// use std::path::Path;
    ///
    /// assert_eq!(Operation::Split.output_name(Some(Path::new("docs/report.pdf"))), "split-report.pdf");
    /// assert_eq!(Operation::Merge.output_name(None), "merged.pdf");
    /// ```
    pub fn output_name(&self, original: Option<&Path>) -> String {
        let prefix = match self {
            Operation::Merge => return "merged.pdf".to_string(),
            Operation::Resize => "resized",
            Operation::Split => "split",
            Operation::Compress => "compressed",
        };

        let name = original
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        format!("{}-{}", prefix, name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Resize => "resize",
            Operation::Split => "split",
            Operation::Merge => "merge",
            Operation::Compress => "compress",
        };
        f.write_str(name)
    }
}
