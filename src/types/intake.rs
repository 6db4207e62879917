use tracing::{info, warn};

use crate::error::{Result, TrimError};
use crate::types::media::SelectedFile;
use crate::types::source::{SourceHandle, SourceRegistry};

/// Whether a drag carrying files is hovering over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

/// What an accepted file yields: the revocable handle and the file itself.
#[derive(Debug)]
pub struct Accepted {
    pub handle: SourceHandle,
    pub file: SelectedFile,
}

/// Accepts video files from the picker or a drop and hands out source handles.
#[derive(Debug, Default)]
pub struct FileIntake {
    drag: DragPhase,
    selected: Option<SelectedFile>,
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragPhase::Dragging
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn drag_enter(&mut self) {
        self.drag = DragPhase::Dragging;
    }

    pub fn drag_leave(&mut self) {
        self.drag = DragPhase::Idle;
    }

    /// Handles a drop. Only the first file is considered; an empty drop
    /// just ends the drag.
    pub fn drop_files(
        &mut self,
        files: Vec<SelectedFile>,
        registry: &SourceRegistry,
    ) -> Result<Option<Accepted>> {
        self.drag = DragPhase::Idle;
        match files.into_iter().next() {
            Some(file) => self.offer(file, registry).map(Some),
            None => Ok(None),
        }
    }

    /// Validates `file` and, if it declares a video type, selects it.
    ///
    /// A rejected file leaves the current selection untouched.
    pub fn offer(&mut self, file: SelectedFile, registry: &SourceRegistry) -> Result<Accepted> {
        if !file.is_video() {
            warn!(file = %file.file_name, mime = %file.mime_type, "rejected non-video file");
            return Err(TrimError::NotVideo {
                name: file.file_name,
                mime: file.mime_type,
            });
        }

        let handle = registry.acquire(&file)?;
        info!(file = %file.file_name, size = file.size, "accepted video file");
        self.selected = Some(file.clone());
        Ok(Accepted { handle, file })
    }

    /// Discards the held file reference.
    pub fn clear(&mut self) {
        self.selected = None;
        self.drag = DragPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(suffix: &str) -> (tempfile::NamedTempFile, SelectedFile) {
        let tmp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        let file = SelectedFile::from_path(tmp.path()).unwrap();
        (tmp, file)
    }

    #[test]
    fn test_accepts_video_mp4() {
        let (_tmp, file) = fixture(".mp4");
        assert_eq!(file.mime_type, "video/mp4");
        let registry = SourceRegistry::new();
        let mut intake = FileIntake::new();

        let accepted = intake.offer(file.clone(), &registry).unwrap();
        assert_eq!(accepted.file, file);
        assert_eq!(intake.selected(), Some(&file));
        assert!(registry.resolve(accepted.handle.id()).is_some());
    }

    #[test]
    fn test_rejects_image_png_without_side_effects() {
        let (_tmp_video, video) = fixture(".mp4");
        let (_tmp_image, image) = fixture(".png");
        assert_eq!(image.mime_type, "image/png");
        let registry = SourceRegistry::new();
        let mut intake = FileIntake::new();

        let kept = intake.offer(video.clone(), &registry).unwrap();
        let err = intake.offer(image, &registry).unwrap_err();

        assert!(matches!(err, TrimError::NotVideo { ref mime, .. } if mime == "image/png"));
        assert_eq!(intake.selected(), Some(&video));
        assert_eq!(registry.live_count(), 1);
        drop(kept);
    }

    #[test]
    fn test_drag_state_machine() {
        let (_tmp, file) = fixture(".mov");
        let registry = SourceRegistry::new();
        let mut intake = FileIntake::new();
        assert_eq!(intake.drag_phase(), DragPhase::Idle);

        intake.drag_enter();
        assert!(intake.is_dragging());
        intake.drag_leave();
        assert_eq!(intake.drag_phase(), DragPhase::Idle);

        intake.drag_enter();
        let accepted = intake.drop_files(vec![file], &registry).unwrap();
        assert!(accepted.is_some());
        assert_eq!(intake.drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn test_drop_uses_first_file_only() {
        let (_tmp_a, a) = fixture(".png");
        let (_tmp_b, b) = fixture(".mp4");
        let registry = SourceRegistry::new();
        let mut intake = FileIntake::new();

        intake.drag_enter();
        assert!(intake.drop_files(vec![a, b], &registry).is_err());
        assert!(intake.selected().is_none());
        assert_eq!(intake.drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn test_empty_drop_ends_drag() {
        let registry = SourceRegistry::new();
        let mut intake = FileIntake::new();
        intake.drag_enter();
        assert!(intake.drop_files(Vec::new(), &registry).unwrap().is_none());
        assert_eq!(intake.drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn test_clear_selection() {
        let (_tmp, file) = fixture(".webm");
        let registry = SourceRegistry::new();
        let mut intake = FileIntake::new();
        let _accepted = intake.offer(file, &registry).unwrap();
        intake.clear();
        assert!(intake.selected().is_none());
    }
}
