//! Upload Workflow
//!
//! ```text
//! Empty --pick--> Selected --submit--> Uploading --success--> Empty
//!                    ^                     |
//!                    +------failure--------+
//! ```
//!
//! Only one upload may be in flight. A failed upload keeps the file selected
//! so the user can retry.

use super::api::UploadProgress;
use super::models::FileSelection;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Empty,
    Selected(FileSelection),
    Uploading { file: FileSelection, progress: u8 },
}

#[derive(Debug, Clone, Default)]
pub struct UploadWorkflow {
    state: UploadState,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn selected(&self) -> Option<&FileSelection> {
        match &self.state {
            UploadState::Empty => None,
            UploadState::Selected(file) | UploadState::Uploading { file, .. } => Some(file),
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, UploadState::Uploading { .. })
    }

    /// Progress percent; zero unless uploading.
    pub fn progress(&self) -> u8 {
        match self.state {
            UploadState::Uploading { progress, .. } => progress,
            _ => 0,
        }
    }

    /// Replace the selection. `None` clears it. Ignored mid-upload.
    pub fn pick(&mut self, file: Option<FileSelection>) -> bool {
        if self.is_uploading() {
            tracing::warn!("file picked while an upload is in flight; ignoring");
            return false;
        }
        self.state = match file {
            Some(file) => UploadState::Selected(file),
            None => UploadState::Empty,
        };
        true
    }

    /// Start uploading the selected file. Returns the file to send, or `None`
    /// when nothing is selected or an upload is already running.
    pub fn submit(&mut self) -> Option<FileSelection> {
        match &self.state {
            UploadState::Selected(file) => {
                let file = file.clone();
                self.state = UploadState::Uploading {
                    file: file.clone(),
                    progress: 0,
                };
                Some(file)
            }
            UploadState::Uploading { .. } => {
                tracing::debug!("upload already in flight");
                None
            }
            UploadState::Empty => None,
        }
    }

    /// Record a progress event. Returns the new percent when it was applied;
    /// events without a known total are ignored.
    pub fn on_progress(&mut self, event: UploadProgress) -> Option<u8> {
        let UploadState::Uploading { progress, .. } = &mut self.state else {
            return None;
        };
        let percent = event.percent()?;
        *progress = percent;
        Some(percent)
    }

    /// Terminal event. Success clears the selection; failure keeps it for a
    /// retry. Either way progress goes back to zero.
    pub fn finish(&mut self, success: bool) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            UploadState::Uploading { file, .. } if !success => UploadState::Selected(file),
            UploadState::Uploading { .. } => UploadState::Empty,
            other => other,
        };
    }
}
