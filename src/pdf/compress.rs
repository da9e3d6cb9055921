//! PDF size reduction
//!
//! Compression re-serializes the document with every structural compaction
//! pass: duplicate streams are shared, unreachable objects dropped, streams
//! flate-compressed, objects renumbered and packed into object streams.
//!
//! The quality and image scale of a [`CompressionProfile`] are reported but
//! not applied: embedded images are written back as they are, so the chosen
//! level does not change the output and a larger file than the input is
//! possible.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use log::{debug, info};
use crate::error::{Error, Result};
use super::codec::{DocumentCodec, LopdfCodec};
use super::compact::SaveOptions;
use super::files::{read_pdf, write_pdf};

/// How aggressively to compress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl CompressionLevel {
    /// Encoder parameters for this level
    pub fn profile(self) -> CompressionProfile {
        let (quality_factor, image_scale) = match self {
            CompressionLevel::Low => (0.8, 0.9),
            CompressionLevel::Medium => (0.6, 0.7),
            CompressionLevel::High => (0.3, 0.4),
        };
        CompressionProfile {
            quality_factor,
            image_scale,
            level: self,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionLevel::Low => "low",
            CompressionLevel::Medium => "medium",
            CompressionLevel::High => "high",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(CompressionLevel::Low),
            "medium" => Ok(CompressionLevel::Medium),
            "high" => Ok(CompressionLevel::High),
            _ => Err(Error::InvalidCompressionLevel(s.to_string())),
        }
    }
}

/// Image encoder parameters for a compression level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionProfile {
    /// JPEG-style quality, 0.0 to 1.0
    pub quality_factor: f64,
    /// Factor applied to image pixel dimensions
    pub image_scale: f64,
    pub level: CompressionLevel,
}

/// Sizes before and after compression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionReport {
    pub original_size_bytes: u64,
    pub compressed_size_bytes: u64,
    /// `(original - compressed) / original * 100`; negative when the output grew
    pub percent_reduction: f64,
}

impl CompressionReport {
    /// Compute the report, refusing a zero-byte original
    pub fn new(original_size_bytes: u64, compressed_size_bytes: u64) -> Result<Self> {
        if original_size_bytes == 0 {
            return Err(Error::DivisionGuard);
        }

        let original = original_size_bytes as f64;
        let compressed = compressed_size_bytes as f64;
        Ok(Self {
            original_size_bytes,
            compressed_size_bytes,
            percent_reduction: (original - compressed) / original * 100.0,
        })
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Original size: {}\nCompressed size: {}\nReduction: {:.1}%",
            format_file_size(self.original_size_bytes),
            format_file_size(self.compressed_size_bytes),
            self.percent_reduction
        )
    }
}

/// Human readable size: bytes below 1 KB, then KB and MB with two decimals
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// Options for compressing a PDF file
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// PDF file to compress
    pub input_path: PathBuf,
    /// Where to write the compressed PDF
    pub output_path: PathBuf,
    pub level: CompressionLevel,
}

/// Re-serialize `doc` compactly and report the size change against `original_size`
///
/// `original_size` is the byte length `doc` was loaded from. `doc` itself is
/// not modified.
pub fn compress_document<C: DocumentCodec>(
    codec: &C,
    doc: &C::Document,
    original_size: u64,
    level: CompressionLevel,
) -> Result<(Vec<u8>, CompressionReport)> {
    if original_size == 0 {
        return Err(Error::DivisionGuard);
    }

    let profile = level.profile();
    debug!(
        "Compression level {} (quality {}, image scale {}); images are kept as is",
        profile.level, profile.quality_factor, profile.image_scale
    );

    let output = codec.serialize(doc, &SaveOptions::compact())?;
    let report = CompressionReport::new(original_size, output.len() as u64)?;

    info!(
        "Compressed {} -> {} bytes ({:.1}%)",
        report.original_size_bytes, report.compressed_size_bytes, report.percent_reduction
    );
    Ok((output, report))
}

/// Compress PDF bytes
///
/// Empty input fails with [`Error::DivisionGuard`] before any parsing.
///
/// # Example
///
/// ```no_run
/// use pdf_tools::pdf::{compress_pdf, CompressionLevel};
///
/// let input = std::fs::read("input.pdf").unwrap();
/// let (output, report) = compress_pdf(&input, CompressionLevel::High).unwrap();
/// println!("{}", report);
/// std::fs::write("compressed-input.pdf", output).unwrap();
/// ```
pub fn compress_pdf(bytes: &[u8], level: CompressionLevel) -> Result<(Vec<u8>, CompressionReport)> {
    if bytes.is_empty() {
        return Err(Error::DivisionGuard);
    }

    let codec = LopdfCodec;
    let doc = codec.load(bytes)?;
    compress_document(&codec, &doc, bytes.len() as u64, level)
}

/// Compress a PDF file, write the result and return the size report
pub fn compress_file(options: &CompressOptions) -> Result<CompressionReport> {
    let input = read_pdf(&options.input_path)?;
    let (output, report) = compress_pdf(&input, options.level)?;
    write_pdf(&options.output_path, &output)?;
    Ok(report)
}
