//! The file upload collaborator contract, plus the built-in data-URL store.

use base64::{Engine, engine::general_purpose::STANDARD};
use vellum_common::{FileBlob, ImageDescriptor};

use crate::error::StoreError;

/// Error code surfaced when a blob exceeds the configured size limit.
///
/// Passed through verbatim; hosts map it to a translated message.
pub const ERR_IMAGE_TOO_LARGE: &str = "upload_file.image_too_large";

/// The file upload collaborator, owned by the host application.
///
/// This core only ever calls these two operations; it never implements
/// storage itself (the [`DataUrlStore`] default excepted).
#[allow(async_fn_in_trait)]
pub trait FileStore {
    /// Store a blob, returning a descriptor with at least a `url`.
    async fn add_file(&self, blob: &FileBlob) -> Result<ImageDescriptor, StoreError>;

    /// Remove a stored file by id (or url, for descriptors without an id).
    ///
    /// Idempotent: removing an unknown reference is a no-op, not an error.
    async fn remove_file(&self, file_ref: &str) -> Result<(), StoreError>;
}

impl<T: FileStore> FileStore for &T {
    async fn add_file(&self, blob: &FileBlob) -> Result<ImageDescriptor, StoreError> {
        (*self).add_file(blob).await
    }

    async fn remove_file(&self, file_ref: &str) -> Result<(), StoreError> {
        (*self).remove_file(file_ref).await
    }
}

/// Size constraints applied before a blob is accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct UploadLimits {
    /// Maximum blob size in bytes. `None` disables the check.
    pub max_file_size: Option<u64>,
}

impl UploadLimits {
    fn check(&self, blob: &FileBlob) -> Result<(), StoreError> {
        match self.max_file_size {
            Some(max) if blob.size() > max => Err(StoreError::msg(ERR_IMAGE_TOO_LARGE)),
            _ => Ok(()),
        }
    }
}

/// A file store that keeps data in a `data:` URL, without uploading it
/// anywhere.
///
/// The default collaborator when the host does not supply one; also handy
/// in tests. Removal is a no-op since nothing is stored.
#[derive(Clone, Debug, Default)]
pub struct DataUrlStore {
    limits: UploadLimits,
}

impl DataUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: UploadLimits) -> Self {
        Self { limits }
    }
}

impl FileStore for DataUrlStore {
    async fn add_file(&self, blob: &FileBlob) -> Result<ImageDescriptor, StoreError> {
        self.limits.check(blob)?;

        let mime = blob.mime.as_deref().unwrap_or("application/octet-stream");
        let url = format!("data:{};base64,{}", mime, STANDARD.encode(&blob.data));

        let mut descriptor = ImageDescriptor::new(url);
        descriptor.mime = Some(mime.to_string());
        descriptor.size = Some(blob.size());
        Ok(descriptor)
    }

    async fn remove_file(&self, _file_ref: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_data_url_store_encodes_blob() {
        let store = DataUrlStore::new();
        let blob = FileBlob::with_mime(None, "image/png", Bytes::from_static(b"abc"));

        let descriptor = store.add_file(&blob).await.unwrap();
        assert_eq!(descriptor.url, "data:image/png;base64,YWJj");
        assert_eq!(descriptor.mime.as_deref(), Some("image/png"));
        assert_eq!(descriptor.size, Some(3));
        assert!(descriptor.id.is_none());
    }

    #[tokio::test]
    async fn test_data_url_store_remove_is_noop() {
        let store = DataUrlStore::new();
        store.remove_file("anything").await.unwrap();
    }

    #[tokio::test]
    async fn test_size_limit_surfaces_error_code() {
        let store = DataUrlStore::with_limits(UploadLimits {
            max_file_size: Some(2),
        });
        let blob = FileBlob::with_mime(None, "image/png", Bytes::from_static(b"abc"));

        let err = store.add_file(&blob).await.unwrap_err();
        assert_eq!(err.as_str(), "upload_file.image_too_large");
    }
}
