// src/intake.rs
//! File intake: validating what the user picked or dropped and producing a
//! preview for it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::sync::Arc;

use crate::errors::{ClassifyError, Result};

/// A file offered by the user, not yet validated.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// An accepted image. Cloning is cheap; the bytes are shared.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn summary(&self) -> FileSummary {
        FileSummary {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            size_bytes: self.size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: usize,
}

/// `data:<mime>;base64,<payload>` rendering of a selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PreviewDataUri(String);

impl PreviewDataUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Accept a candidate only if its declared type is `image/*`.
pub fn accept(candidate: Candidate) -> Result<SelectedFile> {
    let declared = candidate.mime_type.trim().to_ascii_lowercase();
    if !declared.starts_with("image/") {
        return Err(ClassifyError::InvalidFileType {
            mime_type: candidate.mime_type,
        });
    }
    Ok(SelectedFile {
        name: candidate.name,
        mime_type: declared,
        bytes: candidate.bytes.into(),
    })
}

pub fn encode_preview(file: &SelectedFile) -> PreviewDataUri {
    PreviewDataUri(format!(
        "data:{};base64,{}",
        file.mime_type,
        STANDARD.encode(file.bytes())
    ))
}

/// Encode the preview off the async executor; large photos take a while.
pub async fn encode_preview_async(file: SelectedFile) -> PreviewDataUri {
    let fallback = file.clone();
    match tokio::task::spawn_blocking(move || encode_preview(&file)).await {
        Ok(preview) => preview,
        Err(e) => {
            log::warn!("Preview encoding task failed ({}), encoding inline", e);
            encode_preview(&fallback)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
}

/// Transient "something is hovering over the drop zone" flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct DragState {
    active: bool,
}

impl DragState {
    pub fn apply(&mut self, event: DragEvent) {
        self.active = matches!(event, DragEvent::Enter | DragEvent::Over);
    }

    pub fn dropped(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
