//! Invoked services: the asynchronous collaborator work behind the
//! machines' waiting states.
//!
//! A machine step returns a request; the driver runs it against the file
//! store and feeds the settlement back to the machine as an event. Exactly
//! one service is ever in flight per machine instance.

use vellum_common::{BlobNormalizer, FileBlob, ImageDescriptor, needs_conversion};

use crate::edit::{EditEvent, EditedUploadRequest};
use crate::error::StoreError;
use crate::preview::PreviewEvent;
use crate::store::FileStore;

/// Services the preview upload machine can request.
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceRequest {
    /// Upload every file in the batch, concurrently.
    UploadPreview(Vec<FileBlob>),
    /// Remove the original preview file, then store the edited blob.
    UploadEdited {
        original_ref: smol_str::SmolStr,
        blob: FileBlob,
    },
}

/// Run a preview-machine service, producing the settlement event to feed
/// back.
///
/// Failures never escape: they settle as error events the machine turns
/// into an `Error*` state.
pub async fn run_preview_service<S: FileStore>(
    store: &S,
    request: ServiceRequest,
) -> PreviewEvent {
    match request {
        ServiceRequest::UploadPreview(files) => {
            PreviewEvent::PreviewSettled(upload_preview(store, &files).await)
        }
        ServiceRequest::UploadEdited { original_ref, blob } => {
            PreviewEvent::EditedSettled(upload_edited(store, &original_ref, &blob).await)
        }
    }
}

/// Run an edit-machine service, producing the settlement event to feed back.
pub async fn run_edit_service<S: FileStore>(
    store: &S,
    request: EditedUploadRequest,
) -> EditEvent {
    EditEvent::UploadSettled(upload_edited(store, &request.original_ref, &request.blob).await)
}

/// Normalize a freshly selected batch before upload.
///
/// The host sends `Loading` to the machine, runs this, then sends `Upload`
/// with the result - or `Error` when conversion fails. Blobs already in an
/// uploadable format pass through untouched.
pub fn prepare_batch<N: BlobNormalizer>(
    normalizer: &N,
    files: Vec<FileBlob>,
) -> Result<Vec<FileBlob>, StoreError> {
    files
        .into_iter()
        .map(|blob| {
            if needs_conversion(&blob) {
                normalizer
                    .normalize(blob)
                    .map_err(|e| StoreError::msg(e.to_string()))
            } else {
                Ok(blob)
            }
        })
        .collect()
}

/// Upload a preview batch: fan out over all files concurrently, await all.
///
/// The batch settles as a unit - every descriptor in submission order, or
/// the first error. Succeeded uploads in a failed batch are discarded.
pub async fn upload_preview<S: FileStore>(
    store: &S,
    files: &[FileBlob],
) -> Result<Vec<ImageDescriptor>, StoreError> {
    tracing::debug!(target: "vellum::upload", count = files.len(), "uploading preview batch");
    let settled = n0_future::join_all(files.iter().map(|file| store.add_file(file))).await;
    settled.into_iter().collect()
}

/// Upload an edited image: remove the original backing file, then store the
/// edited blob. Either step failing fails the whole operation.
pub async fn upload_edited<S: FileStore>(
    store: &S,
    original_ref: &str,
    blob: &FileBlob,
) -> Result<ImageDescriptor, StoreError> {
    tracing::debug!(target: "vellum::upload", original_ref, "uploading edited image");
    store.remove_file(original_ref).await?;
    store.add_file(blob).await
}
