//! What a machine step hands back to its driver.

use vellum_common::ImageDescriptor;

use crate::error::StoreError;

/// Side effects for the hosting UI, fired on transitions.
///
/// Each corresponds 1:1 to a machine action; the host reacts (shows the
/// crop dialog, dismisses a spinner, displays an error) without ever
/// touching machine context.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    /// Preview descriptors are available for display.
    PreviewReady(Vec<ImageDescriptor>),
    /// Final descriptors are in the document; the flow is complete.
    EditedUploadDone(Vec<ImageDescriptor>),
    /// The crop/edit UI should be shown.
    ShowEditor,
    /// A collaborator call failed; the message is displayable as-is.
    Error(StoreError),
}

/// Result of feeding one event to a machine.
///
/// Transitions are synchronous and atomic; anything asynchronous comes back
/// as a `service` request the driver must run, whose settlement is delivered
/// as a future event.
#[derive(Debug)]
pub struct StepOutcome<R> {
    /// Service to invoke, when the transition entered a waiting state.
    pub service: Option<R>,
    /// UI side effects fired by this transition, in order.
    pub signals: Vec<Signal>,
    /// True when the event was not legal in the current state and nothing
    /// changed (guarded machine; see the concurrency rules).
    pub rejected: bool,
}

impl<R> StepOutcome<R> {
    pub(crate) fn none() -> Self {
        Self {
            service: None,
            signals: Vec::new(),
            rejected: false,
        }
    }

    pub(crate) fn rejected() -> Self {
        Self {
            service: None,
            signals: Vec::new(),
            rejected: true,
        }
    }

    pub(crate) fn invoke(service: R) -> Self {
        Self {
            service: Some(service),
            signals: Vec::new(),
            rejected: false,
        }
    }

    pub(crate) fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }
}
