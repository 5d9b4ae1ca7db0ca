//! Recording Command Handlers

use crate::application::commands::{AddRecording, RemoveRecording};
use crate::application::error::ApplicationError;
use crate::application::recordings::RecordingShelf;
use crate::domain::recording::SavedRecording;

/// AddRecording Handler
pub struct AddRecordingHandler {
    shelf: RecordingShelf,
}

impl AddRecordingHandler {
    pub fn new(shelf: RecordingShelf) -> Self {
        Self { shelf }
    }

    pub async fn handle(&self, command: AddRecording) -> Result<SavedRecording, ApplicationError> {
        if command.word.trim().is_empty() || command.uri.trim().is_empty() {
            return Err(ApplicationError::validation("word and uri are required"));
        }
        let mut recordings = self.shelf.load().await?;
        let recording = SavedRecording::new(command.word, command.uri);
        recordings.push(recording.clone());
        self.shelf.save(&recordings).await?;

        tracing::info!(id = %recording.id, word = %recording.word, "Recording saved");
        Ok(recording)
    }
}

/// RemoveRecording Handler
pub struct RemoveRecordingHandler {
    shelf: RecordingShelf,
}

impl RemoveRecordingHandler {
    pub fn new(shelf: RecordingShelf) -> Self {
        Self { shelf }
    }

    pub async fn handle(&self, command: RemoveRecording) -> Result<(), ApplicationError> {
        let mut recordings = self.shelf.load().await?;
        let before = recordings.len();
        recordings.retain(|r| r.id != command.id);
        if recordings.len() == before {
            return Err(ApplicationError::not_found("Recording", &command.id));
        }
        self.shelf.save(&recordings).await?;

        tracing::info!(id = %command.id, "Recording removed");
        Ok(())
    }
}
