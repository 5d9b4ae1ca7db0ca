//! Recording Query Handlers

use crate::application::error::ApplicationError;
use crate::application::queries::ListRecordings;
use crate::application::recordings::RecordingShelf;
use crate::domain::recording::SavedRecording;

/// ListRecordings Handler
///
/// 按录制时间倒序返回
pub struct ListRecordingsHandler {
    shelf: RecordingShelf,
}

impl ListRecordingsHandler {
    pub fn new(shelf: RecordingShelf) -> Self {
        Self { shelf }
    }

    pub async fn handle(&self, _query: ListRecordings) -> Result<Vec<SavedRecording>, ApplicationError> {
        let mut recordings = self.shelf.load().await?;
        recordings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(recordings)
    }
}
