//! vellum-upload: upload/edit coordination for the vellum editor core.
//!
//! This crate provides:
//! - `PreviewUploadMachine` - select, preview-upload, and insert or edit
//!   freshly chosen images
//! - `EditInPlaceMachine` - re-edit an already-inserted image and replace
//!   its document node
//! - `FileStore` - the upload collaborator contract, with a built-in
//!   data-URL implementation
//! - Service drivers turning collaborator calls into settlement events
//!
//! Transitions are synchronous and atomic; asynchronous collaborator work
//! is requested by a step and settled back as an event, so a host event
//! loop (wasm or native) can drive a machine without this crate ever
//! owning an executor.

mod edit;
mod error;
mod outcome;
mod preview;
mod service;
mod store;

pub use edit::{EditContext, EditEvent, EditInPlaceMachine, EditState, EditedUploadRequest};
pub use error::StoreError;
pub use outcome::{Signal, StepOutcome};
pub use preview::{
    PreviewContext, PreviewEvent, PreviewImage, PreviewState, PreviewUploadMachine,
};
pub use service::{
    ServiceRequest, prepare_batch, run_edit_service, run_preview_service, upload_edited,
    upload_preview,
};
pub use store::{DataUrlStore, ERR_IMAGE_TOO_LARGE, FileStore, UploadLimits};
