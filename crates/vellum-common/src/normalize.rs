//! Pre-upload blob normalization.
//!
//! Browsers hand the editor formats the upload target may not accept
//! (HEIC/HEIF from phone cameras, most commonly). The `BlobNormalizer`
//! seam lets the host convert such blobs before the preview upload; the
//! machine's `Loading` state covers the time this runs.

use thiserror::Error;

use crate::media::FileBlob;

/// Formats that are uploaded as-is, without conversion.
const PASSTHROUGH_MIME: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Whether a blob needs conversion before upload.
///
/// A blob with no sniffable MIME type is assumed to need conversion.
pub fn needs_conversion(blob: &FileBlob) -> bool {
    match &blob.mime {
        Some(mime) => !PASSTHROUGH_MIME.contains(&mime.as_str()),
        None => true,
    }
}

/// Converts locally-selected blobs into an uploadable format.
///
/// Implementations are provided by the consuming application (a wasm host
/// would call into a codec there). The unit implementation passes blobs
/// through unchanged.
pub trait BlobNormalizer {
    fn normalize(&self, blob: FileBlob) -> Result<FileBlob, NormalizeError>;
}

/// Unit type implementation - no conversion.
impl BlobNormalizer for () {
    fn normalize(&self, blob: FileBlob) -> Result<FileBlob, NormalizeError> {
        Ok(blob)
    }
}

impl<T: BlobNormalizer> BlobNormalizer for &T {
    fn normalize(&self, blob: FileBlob) -> Result<FileBlob, NormalizeError> {
        (*self).normalize(blob)
    }
}

/// Errors from blob normalization.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NormalizeError {
    /// Format conversion failed.
    #[error("image conversion failed: {0}")]
    Conversion(String),
}
