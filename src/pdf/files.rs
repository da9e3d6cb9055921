//! Reading input PDFs from disk and writing results

use std::fs;
use std::path::Path;
use log::info;
use crate::error::{Error, Result};

/// Read a PDF file into memory
pub fn read_pdf(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

/// Write output bytes, creating parent directories as needed
pub fn write_pdf(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let result = read_pdf(Path::new("nonexistent.pdf"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_write_creates_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("out.pdf");

        write_pdf(&path, b"%PDF-1.7").unwrap();
        assert_eq!(read_pdf(&path).unwrap(), b"%PDF-1.7");
    }
}
