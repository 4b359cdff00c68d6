//! The edit-in-place machine.
//!
//! Governs re-editing an image already committed to the document: crop/
//! rotate adjustments, re-upload of the edited blob, and replacement of the
//! original document node. One machine instance corresponds to exactly one
//! inserted image.
//!
//! The node to replace is named by a [`NodeHandle`], resolved through the
//! [`HandleTable`] at the moment the upload settles. The same node can have
//! been replaced since the edit session began (edited twice in sequence),
//! so a key captured at `Edit` time would be stale.

use smol_str::SmolStr;
use vellum_common::{EditedImage, FileBlob, ImageDescriptor};
use vellum_document::{DocumentBridge, HandleTable, NodeHandle, NodeSpec};

use crate::error::StoreError;
use crate::outcome::{Signal, StepOutcome};

/// Leaf states of the edit-in-place machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    /// Crop/edit UI is open for the referenced node.
    Editing,
    /// Remove-then-add of the edited blob in flight.
    Uploading,
    /// The edited upload failed.
    Error,
}

/// Events accepted by the edit-in-place machine.
#[derive(Clone, Debug)]
pub enum EditEvent {
    /// Open the crop/edit UI.
    Edit,
    /// Abandon editing (or dismiss an error).
    Dismiss,
    /// The crop/edit UI produced an edited image.
    DoneEditing(EditedImage),
    /// Go back to the crop UI from an error.
    Reedit,
    /// Re-attempt the upload with the same stored edited image.
    Retry,
    /// The edited upload service settled.
    UploadSettled(Result<ImageDescriptor, StoreError>),
}

/// The remove-then-add the driver runs for this machine.
#[derive(Clone, Debug, PartialEq)]
pub struct EditedUploadRequest {
    /// Removal reference of the node's current backing file.
    pub original_ref: SmolStr,
    /// The edited blob to store.
    pub blob: FileBlob,
}

/// Mutable state threaded through the machine; cleared on `Idle` entry.
#[derive(Clone, Debug, Default)]
pub struct EditContext {
    pub edited_image: Option<FileBlob>,
    pub edited_image_alt: Option<String>,
    pub error: Option<StoreError>,
}

/// State machine for re-editing one already-inserted image.
#[derive(Debug)]
pub struct EditInPlaceMachine {
    state: EditState,
    context: EditContext,
    /// Live reference to the node; resolved at settlement time.
    handle: NodeHandle,
    /// Descriptor currently backing the node; updated after each replace so
    /// a later edit removes the right file.
    descriptor: ImageDescriptor,
}

impl EditInPlaceMachine {
    /// Create a machine for the node named by `handle`, currently backed by
    /// `descriptor`.
    pub fn new(handle: NodeHandle, descriptor: ImageDescriptor) -> Self {
        Self {
            state: EditState::Idle,
            context: EditContext::default(),
            handle,
            descriptor,
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn context(&self) -> &EditContext {
        &self.context
    }

    /// The descriptor currently backing the node.
    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    /// Feed one event to the machine.
    pub fn handle_event<D: DocumentBridge>(
        &mut self,
        event: EditEvent,
        doc: &mut D,
        handles: &mut HandleTable,
    ) -> StepOutcome<EditedUploadRequest> {
        use EditEvent as E;
        use EditState as S;

        match (self.state, event) {
            (S::Idle, E::Edit) => {
                self.state = S::Editing;
                StepOutcome::none().with_signal(Signal::ShowEditor)
            }

            (S::Editing | S::Error, E::Dismiss) => {
                self.enter_idle();
                StepOutcome::none()
            }

            (S::Editing, E::DoneEditing(edited)) => {
                self.context.edited_image = Some(edited.blob.clone());
                self.context.edited_image_alt = edited.alt;
                self.state = S::Uploading;
                StepOutcome::invoke(EditedUploadRequest {
                    original_ref: SmolStr::new(self.descriptor.removal_ref()),
                    blob: edited.blob,
                })
            }

            (S::Uploading, E::UploadSettled(Ok(descriptor))) => {
                let merged = descriptor.merged_with_alt(self.context.edited_image_alt.take());

                match handles.replace_tracked(doc, self.handle, NodeSpec::Image(merged.clone())) {
                    Ok(Some(_new_key)) => {
                        // The node is now backed by the new file.
                        self.descriptor = merged.clone();
                    }
                    Ok(None) => {
                        // Node removed while uploading; already logged.
                    }
                    Err(error) => {
                        tracing::warn!(
                            target: "vellum::upload",
                            %error,
                            "replace after edited upload failed"
                        );
                    }
                }

                let outcome =
                    StepOutcome::none().with_signal(Signal::EditedUploadDone(vec![merged]));
                self.enter_idle();
                outcome
            }

            (S::Uploading, E::UploadSettled(Err(error))) => {
                self.context.error = Some(error.clone());
                self.state = S::Error;
                StepOutcome::none().with_signal(Signal::Error(error))
            }

            (S::Error, E::Reedit) => {
                self.state = S::Editing;
                StepOutcome::none().with_signal(Signal::ShowEditor)
            }

            (S::Error, E::Retry) => {
                let Some(blob) = self.context.edited_image.clone() else {
                    tracing::warn!(
                        target: "vellum::upload",
                        "Retry with no stored edited image in context"
                    );
                    return StepOutcome::rejected();
                };
                self.state = S::Uploading;
                StepOutcome::invoke(EditedUploadRequest {
                    original_ref: SmolStr::new(self.descriptor.removal_ref()),
                    blob,
                })
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

    /// Idle entry action: context is always cleared.
    fn enter_idle(&mut self) {
        self.context = EditContext::default();
        self.state = EditState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use vellum_document::SimpleDocument;

    fn file(tag: &str) -> FileBlob {
        FileBlob::with_mime(
            Some(tag.into()),
            "image/png",
            Bytes::from(tag.as_bytes().to_vec()),
        )
    }

    fn descriptor(id: &str, url: &str) -> ImageDescriptor {
        ImageDescriptor::new(url).with_id(id)
    }

    fn setup() -> (SimpleDocument, HandleTable, EditInPlaceMachine) {
        let mut doc = SimpleDocument::new();
        let original = descriptor("orig", "http://x/orig");
        let key = doc.insert_image_node(&original);

        let mut handles = HandleTable::new();
        let handle = handles.track(key);

        let machine = EditInPlaceMachine::new(handle, original);
        (doc, handles, machine)
    }

    #[test]
    fn test_edit_shows_editor() {
        let (mut doc, mut handles, mut machine) = setup();
        let out = machine.handle_event(EditEvent::Edit, &mut doc, &mut handles);
        assert_eq!(machine.state(), EditState::Editing);
        assert_eq!(out.signals, vec![Signal::ShowEditor]);
    }

    #[test]
    fn test_done_editing_removes_original_by_id() {
        let (mut doc, mut handles, mut machine) = setup();
        machine.handle_event(EditEvent::Edit, &mut doc, &mut handles);

        let out = machine.handle_event(
            EditEvent::DoneEditing(EditedImage::new(file("v2")).with_alt("after crop")),
            &mut doc,
            &mut handles,
        );
        assert_eq!(machine.state(), EditState::Uploading);
        let request = out.service.unwrap();
        assert_eq!(request.original_ref, "orig");
        assert_eq!(request.blob.name.as_deref(), Some("v2"));
    }

    #[test]
    fn test_settlement_replaces_node_with_merged_alt() {
        let (mut doc, mut handles, mut machine) = setup();
        machine.handle_event(EditEvent::Edit, &mut doc, &mut handles);
        machine.handle_event(
            EditEvent::DoneEditing(EditedImage::new(file("v2")).with_alt("after crop")),
            &mut doc,
            &mut handles,
        );

        machine.handle_event(
            EditEvent::UploadSettled(Ok(descriptor("new", "http://x/new"))),
            &mut doc,
            &mut handles,
        );

        assert_eq!(machine.state(), EditState::Idle);
        assert_eq!(doc.len(), 1);
        let node = doc.nodes()[0].1.as_image().unwrap();
        assert_eq!(node.url, "http://x/new");
        assert_eq!(node.alt.as_deref(), Some("after crop"));
    }

    #[test]
    fn test_second_edit_targets_key_from_first_replace() {
        let (mut doc, mut handles, mut machine) = setup();
        let original_key = doc.nodes()[0].0.clone();

        // First edit session.
        machine.handle_event(EditEvent::Edit, &mut doc, &mut handles);
        machine.handle_event(
            EditEvent::DoneEditing(EditedImage::new(file("v2"))),
            &mut doc,
            &mut handles,
        );
        machine.handle_event(
            EditEvent::UploadSettled(Ok(descriptor("v2", "http://x/v2"))),
            &mut doc,
            &mut handles,
        );
        let key_after_first = doc.nodes()[0].0.clone();
        assert_ne!(key_after_first, original_key);

        // Second edit session on the same machine instance.
        machine.handle_event(EditEvent::Edit, &mut doc, &mut handles);
        let out = machine.handle_event(
            EditEvent::DoneEditing(EditedImage::new(file("v3"))),
            &mut doc,
            &mut handles,
        );
        // The remove now targets the file uploaded by the first edit.
        assert_eq!(out.service.unwrap().original_ref, "v2");

        machine.handle_event(
            EditEvent::UploadSettled(Ok(descriptor("v3", "http://x/v3"))),
            &mut doc,
            &mut handles,
        );

        // The second replace consumed the key produced by the first one.
        assert_eq!(doc.len(), 1);
        assert_ne!(doc.nodes()[0].0, key_after_first);
        assert_eq!(doc.nodes()[0].1.as_image().unwrap().url, "http://x/v3");
    }

    #[test]
    fn test_failure_then_retry_and_reedit() {
        let (mut doc, mut handles, mut machine) = setup();
        machine.handle_event(EditEvent::Edit, &mut doc, &mut handles);
        machine.handle_event(
            EditEvent::DoneEditing(EditedImage::new(file("v2"))),
            &mut doc,
            &mut handles,
        );
        machine.handle_event(
            EditEvent::UploadSettled(Err(StoreError::msg("net down"))),
            &mut doc,
            &mut handles,
        );
        assert_eq!(machine.state(), EditState::Error);
        assert_eq!(machine.context().error, Some(StoreError::msg("net down")));

        // Retry re-invokes with the same stored edited image.
        let out = machine.handle_event(EditEvent::Retry, &mut doc, &mut handles);
        assert_eq!(machine.state(), EditState::Uploading);
        assert_eq!(out.service.unwrap().blob.name.as_deref(), Some("v2"));

        machine.handle_event(
            EditEvent::UploadSettled(Err(StoreError::msg("still down"))),
            &mut doc,
            &mut handles,
        );

        // Reedit goes back to the crop UI without clearing context.
        let out = machine.handle_event(EditEvent::Reedit, &mut doc, &mut handles);
        assert_eq!(machine.state(), EditState::Editing);
        assert_eq!(out.signals, vec![Signal::ShowEditor]);
        assert!(machine.context().edited_image.is_some());
    }

    #[test]
    fn test_dismiss_from_error_clears_context() {
        let (mut doc, mut handles, mut machine) = setup();
        machine.handle_event(EditEvent::Edit, &mut doc, &mut handles);
        machine.handle_event(
            EditEvent::DoneEditing(EditedImage::new(file("v2"))),
            &mut doc,
            &mut handles,
        );
        machine.handle_event(
            EditEvent::UploadSettled(Err(StoreError::msg("boom"))),
            &mut doc,
            &mut handles,
        );

        machine.handle_event(EditEvent::Dismiss, &mut doc, &mut handles);
        assert_eq!(machine.state(), EditState::Idle);
        assert!(machine.context().error.is_none());
        assert!(machine.context().edited_image.is_none());
    }

    #[test]
    fn test_settlement_after_node_removed_is_not_fatal() {
        let (mut doc, mut handles, mut machine) = setup();
        let key = doc.nodes()[0].0.clone();

        machine.handle_event(EditEvent::Edit, &mut doc, &mut handles);
        machine.handle_event(
            EditEvent::DoneEditing(EditedImage::new(file("v2"))),
            &mut doc,
            &mut handles,
        );

        // Node deleted while the upload is in flight.
        doc.remove_node(&key).unwrap();

        machine.handle_event(
            EditEvent::UploadSettled(Ok(descriptor("new", "http://x/new"))),
            &mut doc,
            &mut handles,
        );
        assert_eq!(machine.state(), EditState::Idle);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_done_editing_outside_editing_is_rejected() {
        let (mut doc, mut handles, mut machine) = setup();
        let out = machine.handle_event(
            EditEvent::DoneEditing(EditedImage::new(file("v2"))),
            &mut doc,
            &mut handles,
        );
        assert!(out.rejected);
        assert_eq!(machine.state(), EditState::Idle);
    }
}
