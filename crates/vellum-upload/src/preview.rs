//! The preview upload machine.
//!
//! Governs the toolbar "insert image" affordance: one or more locally
//! selected files flow through normalization, a concurrent preview upload,
//! and then either straight insertion (multi-image) or a crop/edit sub-flow
//! (single image) before the final document mutation.
//!
//! States are a flat tagged enum; the nested `uploading.preview` /
//! `uploading.edited` and `error.*` groupings of the original design are
//! flattened so every (state, event) pair is matched exhaustively.

use smol_str::SmolStr;
use vellum_common::{EditedImage, FileBlob, ImageDescriptor};
use vellum_document::DocumentBridge;

use crate::error::StoreError;
use crate::outcome::{Signal, StepOutcome};
use crate::service::ServiceRequest;

/// Leaf states of the preview upload machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreviewState {
    /// Nothing in flight; context is empty.
    #[default]
    Idle,
    /// Files are being normalized (format conversion); no upload call yet.
    Loading,
    /// Preview batch upload in flight.
    UploadingPreview,
    /// Single image awaiting the crop/edit sub-flow.
    Editing,
    /// Post-edit remove-then-add in flight.
    UploadingEdited,
    /// The preview batch upload failed.
    ErrorPreviewUpload,
    /// The post-edit upload failed.
    ErrorEditedUpload,
}

/// A preview image: the raw file before settlement, the descriptor after.
#[derive(Clone, Debug, PartialEq)]
pub enum PreviewImage {
    File(FileBlob),
    Uploaded(ImageDescriptor),
}

/// Mutable state threaded through the machine.
///
/// Owned exclusively by one machine instance; cleared in full whenever the
/// machine returns to `Idle`.
#[derive(Clone, Debug, Default)]
pub struct PreviewContext {
    pub preview_images: Vec<PreviewImage>,
    pub preview_image_initial_size: Option<u64>,
    pub edited_image: Option<FileBlob>,
    pub edited_image_alt: Option<String>,
    pub error: Option<StoreError>,
}

impl PreviewContext {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Raw files of the stored batch (for retrying the preview upload).
    fn stored_files(&self) -> Vec<FileBlob> {
        self.preview_images
            .iter()
            .filter_map(|image| match image {
                PreviewImage::File(blob) => Some(blob.clone()),
                PreviewImage::Uploaded(_) => None,
            })
            .collect()
    }

    /// Removal reference of the first uploaded preview (id, else url).
    fn first_removal_ref(&self) -> Option<SmolStr> {
        self.preview_images.first().and_then(|image| match image {
            PreviewImage::Uploaded(descriptor) => Some(SmolStr::new(descriptor.removal_ref())),
            PreviewImage::File(_) => None,
        })
    }
}

/// Events accepted by the preview upload machine.
///
/// `PreviewSettled` and `EditedSettled` are delivered by the driver when an
/// invoked service completes; everything else is user-driven.
#[derive(Clone, Debug)]
pub enum PreviewEvent {
    /// File normalization started.
    Loading,
    /// File normalization failed before any upload.
    Error(StoreError),
    /// A batch of files was selected; upload previews.
    Upload(Vec<FileBlob>),
    /// Abandon the current flow.
    Dismiss,
    /// The crop/edit UI produced an edited image.
    DoneEditing(EditedImage),
    /// Re-attempt the failed service with the same stored inputs.
    Retry,
    /// The preview upload service settled.
    PreviewSettled(Result<Vec<ImageDescriptor>, StoreError>),
    /// The edited upload service settled.
    EditedSettled(Result<ImageDescriptor, StoreError>),
}

/// State machine for the insert-image flow.
#[derive(Debug, Default)]
pub struct PreviewUploadMachine {
    state: PreviewState,
    context: PreviewContext,
}

impl PreviewUploadMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn context(&self) -> &PreviewContext {
        &self.context
    }

    /// Feed one event to the machine.
    ///
    /// The transition completes fully (state + context) before this returns;
    /// document mutations happen synchronously through `doc`, collaborator
    /// calls come back as a [`ServiceRequest`] for the driver to run.
    pub fn handle<D: DocumentBridge>(
        &mut self,
        event: PreviewEvent,
        doc: &mut D,
    ) -> StepOutcome<ServiceRequest> {
        use PreviewEvent as E;
        use PreviewState as S;

        match (self.state, event) {
            (S::Idle, E::Loading) => {
                self.state = S::Loading;
                StepOutcome::none()
            }

            (
                S::Idle | S::Loading | S::ErrorPreviewUpload | S::ErrorEditedUpload,
                E::Upload(files),
            ) => self.start_preview_upload(files),

            (S::Loading, E::Error(error)) => self.fail(error, S::ErrorPreviewUpload),

            (S::UploadingPreview, E::PreviewSettled(Ok(descriptors))) => {
                self.context.preview_images = descriptors
                    .iter()
                    .cloned()
                    .map(PreviewImage::Uploaded)
                    .collect();

                // Single vs multi branches on the count of uploaded results,
                // not the count of submitted files.
                if descriptors.len() == 1 {
                    self.state = S::Editing;
                    StepOutcome::none().with_signal(Signal::PreviewReady(descriptors))
                } else {
                    for descriptor in &descriptors {
                        doc.insert_image_node(descriptor);
                    }
                    let outcome = StepOutcome::none()
                        .with_signal(Signal::PreviewReady(descriptors.clone()))
                        .with_signal(Signal::EditedUploadDone(descriptors));
                    self.enter_idle();
                    outcome
                }
            }

            (S::UploadingPreview, E::PreviewSettled(Err(error))) => {
                // The stored batch stays in context for a user-driven retry.
                self.fail(error, S::ErrorPreviewUpload)
            }

            (S::Editing, E::Dismiss) => {
                self.enter_idle();
                StepOutcome::none()
            }

            (S::Editing, E::DoneEditing(edited)) => {
                let Some(original_ref) = self.context.first_removal_ref() else {
                    tracing::warn!(
                        target: "vellum::upload",
                        "DoneEditing with no uploaded preview in context"
                    );
                    return StepOutcome::rejected();
                };
                self.context.edited_image = Some(edited.blob.clone());
                self.context.edited_image_alt = edited.alt;
                self.state = S::UploadingEdited;
                StepOutcome::invoke(ServiceRequest::UploadEdited {
                    original_ref,
                    blob: edited.blob,
                })
            }

            (S::UploadingEdited, E::EditedSettled(Ok(descriptor))) => {
                let merged = descriptor.merged_with_alt(self.context.edited_image_alt.take());
                doc.insert_image_node(&merged);
                let outcome =
                    StepOutcome::none().with_signal(Signal::EditedUploadDone(vec![merged]));
                self.enter_idle();
                outcome
            }

            (S::UploadingEdited, E::EditedSettled(Err(error))) => {
                self.fail(error, S::ErrorEditedUpload)
            }

            (S::ErrorPreviewUpload, E::Retry) => {
                self.state = S::UploadingPreview;
                StepOutcome::invoke(ServiceRequest::UploadPreview(self.context.stored_files()))
            }

            (S::ErrorEditedUpload, E::Retry) => {
                let (Some(original_ref), Some(blob)) = (
                    self.context.first_removal_ref(),
                    self.context.edited_image.clone(),
                ) else {
                    tracing::warn!(
                        target: "vellum::upload",
                        "Retry with no stored edited image in context"
                    );
                    return StepOutcome::rejected();
                };
                self.state = S::UploadingEdited;
                StepOutcome::invoke(ServiceRequest::UploadEdited { original_ref, blob })
            }

            (S::ErrorPreviewUpload | S::ErrorEditedUpload, E::Dismiss) => {
                self.enter_idle();
                StepOutcome::none()
            }

            (state, event) => {
                tracing::debug!(
                    target: "vellum::upload",
                    ?state,
                    event = ?event,
                    "event not legal in current state"
                );
                StepOutcome::rejected()
            }
        }
    }

    fn start_preview_upload(&mut self, files: Vec<FileBlob>) -> StepOutcome<ServiceRequest> {
        self.context.preview_image_initial_size = files.first().map(FileBlob::size);
        self.context.preview_images = files.iter().cloned().map(PreviewImage::File).collect();
        self.context.error = None;
        self.state = PreviewState::UploadingPreview;
        StepOutcome::invoke(ServiceRequest::UploadPreview(files))
    }

    fn fail(&mut self, error: StoreError, state: PreviewState) -> StepOutcome<ServiceRequest> {
        self.context.error = Some(error.clone());
        self.state = state;
        StepOutcome::none().with_signal(Signal::Error(error))
    }

    /// Idle entry action: context is always cleared.
    fn enter_idle(&mut self) {
        self.context.reset();
        self.state = PreviewState::Idle;
    }
}
