//! Accelerator binary images.
//!
//! The binary consumed from `-a` is an opaque, externally defined
//! program image; this module only slurps it from disk and hands the
//! bytes to whichever backend builds it.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from loading a binary image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image file could not be read.
    #[error("failed to read accelerator binary '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The image file was empty.
    #[error("accelerator binary '{path}' is empty")]
    Empty {
        /// Path that was read.
        path: PathBuf,
    },
}

/// An opaque precompiled accelerator program image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    path: Option<PathBuf>,
    bytes: Vec<u8>,
}

impl BinaryImage {
    /// Reads an image from disk.
    ///
    /// The content is not inspected here; format checks belong to the
    /// backend's build step. An empty file is rejected up front since
    /// no backend can build it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(ImageError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: Some(path.to_path_buf()),
            bytes,
        })
    }

    /// Wraps raw image bytes that did not come from a file.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { path: None, bytes }
    }

    /// Returns the raw image bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the image size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true when the image holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the source path, when the image was loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_reads_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"binary-bytes").unwrap();

        let image = BinaryImage::from_file(file.path()).unwrap();
        assert_eq!(image.bytes(), b"binary-bytes");
        assert_eq!(image.len(), 12);
        assert_eq!(image.path(), Some(file.path()));
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let result = BinaryImage::from_file("/nonexistent/kernel.xclbin");
        assert!(matches!(result, Err(ImageError::Io { .. })));
    }

    #[test]
    fn test_from_file_empty_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = BinaryImage::from_file(file.path());
        assert!(matches!(result, Err(ImageError::Empty { .. })));
    }

    #[test]
    fn test_from_bytes_has_no_path() {
        let image = BinaryImage::from_bytes(vec![1, 2, 3]);
        assert!(image.path().is_none());
        assert!(!image.is_empty());
    }
}
