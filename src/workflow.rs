// src/workflow.rs
//! The upload-and-classify state machine behind one form.
//!
//! Idle → FileSelected → Submitting → {Result | Error}. `reset` returns to
//! Idle from anywhere; a new `select` returns to FileSelected.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::classifier::Classifier;
use crate::errors::{ClassifyError, Result};
use crate::intake::{self, Candidate, DragEvent, DragState, FileSummary, PreviewDataUri, SelectedFile};
use crate::models::ClassificationResult;
use crate::presenter::{self, ResultView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    FileSelected,
    Submitting,
    Result,
    Error,
}

#[derive(Default)]
struct WorkflowState {
    file: Option<SelectedFile>,
    preview: Option<PreviewDataUri>,
    result: Option<ClassificationResult>,
    error: Option<String>,
    drag: DragState,
    /// Bumped by every select and reset; stale completions compare against it.
    generation: u64,
    /// Generation the in-flight submission started from.
    in_flight: Option<u64>,
}

impl WorkflowState {
    fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
    }

    fn phase(&self) -> Phase {
        if self.in_flight == Some(self.generation) {
            Phase::Submitting
        } else if self.error.is_some() {
            Phase::Error
        } else if self.result.is_some() {
            Phase::Result
        } else if self.file.is_some() {
            Phase::FileSelected
        } else {
            Phase::Idle
        }
    }
}

/// Serializable snapshot of what the form should show.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowView {
    pub phase: Phase,
    pub loading: bool,
    pub drag_active: bool,
    pub file: Option<FileSummary>,
    pub preview: Option<PreviewDataUri>,
    pub result: Option<ResultView>,
    pub error: Option<String>,
}

pub struct ClassificationWorkflow {
    classifier: Arc<dyn Classifier>,
    state: Mutex<WorkflowState>,
}

/// Clears the network guard even if the submitting future is dropped.
struct InFlight<'a> {
    workflow: &'a ClassificationWorkflow,
    generation: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.workflow.state();
        if state.in_flight == Some(self.generation) {
            state.in_flight = None;
        }
    }
}

impl ClassificationWorkflow {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            state: Mutex::new(WorkflowState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accepts a picked file, clears any previous outcome and builds its preview.
    ///
    /// A non-image candidate surfaces `InvalidFileType` and leaves the stored
    /// file and result untouched.
    pub async fn select(&self, candidate: Candidate) -> Result<SelectedFile> {
        let file = match intake::accept(candidate) {
            Ok(file) => file,
            Err(err) => {
                log::warn!("File rejected: {}", err.detail());
                self.state().error = Some(err.to_string());
                return Err(err);
            }
        };

        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.file = Some(file.clone());
            state.preview = None;
            state.clear_outcome();
            state.generation
        };

        log::debug!("Selected '{}' ({} bytes)", file.name(), file.size());

        let preview = intake::encode_preview_async(file.clone()).await;

        let mut state = self.state();
        if state.generation == generation {
            state.preview = Some(preview);
        }
        Ok(file)
    }

    /// Drop path: ends the drag, then behaves exactly like `select`.
    pub async fn drop_file(&self, candidate: Candidate) -> Result<SelectedFile> {
        self.state().drag.dropped();
        self.select(candidate).await
    }

    pub fn drag(&self, event: DragEvent) {
        self.state().drag.apply(event);
    }

    /// Sends the selected file to the classifier.
    ///
    /// Rejected with `SubmissionInProgress` (state untouched, no network call)
    /// while another submission is outstanding.
    pub async fn submit(&self) -> Result<ClassificationResult> {
        let (file, generation) = {
            let mut state = self.state();
            if state.in_flight.is_some() {
                log::debug!("Ignoring submit while a prediction is in flight");
                return Err(ClassifyError::SubmissionInProgress);
            }
            let Some(file) = state.file.clone() else {
                let err = ClassifyError::NoFileSelected;
                state.result = None;
                state.error = Some(err.to_string());
                return Err(err);
            };
            state.clear_outcome();
            state.in_flight = Some(state.generation);
            (file, state.generation)
        };

        let guard = InFlight { workflow: self, generation };
        let outcome = self.classifier.classify(&file).await;
        drop(guard);

        let mut state = self.state();
        if state.generation != generation {
            log::debug!("Discarding outcome for '{}': selection changed", file.name());
            return outcome;
        }

        match outcome {
            Ok(result) => {
                log::info!(
                    "✅ '{}' classified as {} ({}ms)",
                    file.name(),
                    result.predicted_class.raw_label(),
                    result.latency_ms
                );
                state.error = None;
                state.result = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                log::error!("❌ Classification of '{}' failed: {}", file.name(), err.detail());
                state.result = None;
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Back to Idle. An outstanding submission still completes but its
    /// outcome is discarded.
    pub fn reset(&self) {
        let mut state = self.state();
        state.generation += 1;
        state.file = None;
        state.preview = None;
        state.drag = DragState::default();
        state.clear_outcome();
    }

    pub fn phase(&self) -> Phase {
        self.state().phase()
    }

    pub fn is_loading(&self) -> bool {
        self.state().in_flight.is_some()
    }

    pub fn is_drag_active(&self) -> bool {
        self.state().drag.is_active()
    }

    pub fn selected_file(&self) -> Option<SelectedFile> {
        self.state().file.clone()
    }

    pub fn preview(&self) -> Option<PreviewDataUri> {
        self.state().preview.clone()
    }

    pub fn result(&self) -> Option<ClassificationResult> {
        self.state().result.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Only one of result and error is rendered; the error wins.
    pub fn view(&self) -> WorkflowView {
        let state = self.state();
        let phase = state.phase();
        WorkflowView {
            phase,
            loading: state.in_flight.is_some(),
            drag_active: state.drag.is_active(),
            file: state.file.as_ref().map(SelectedFile::summary),
            preview: state.preview.clone(),
            result: match (&state.error, &state.result) {
                (None, Some(result)) => Some(presenter::present(result)),
                _ => None,
            },
            error: state.error.clone(),
        }
    }
}
