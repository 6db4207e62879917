use tracing::{debug, info, warn};

use crate::error::{Result, TrimError};
use crate::ops::format::format_time;
use crate::ops::timeline_math::{self, TimelineMarkers};
use crate::renderer::surface::{PlayerEvent, SurfaceCommand};
use crate::types::cut_list::CutList;
use crate::types::playback_state::PlaybackState;
use crate::types::source::SourceHandle;
use crate::types::trim::{TrimEdge, TrimPolicy, TrimRange};

/// Every way the editor state can be changed from the outside.
#[derive(Debug)]
pub enum EditorCommand {
    LoadSource(SourceHandle),
    ClearSource,
    TogglePlayPause,
    Seek(f64),
    /// Values reported by the seek control; only the first is used.
    SeekValues(Vec<f64>),
    SetTrimStartToCurrent,
    SetTrimEndToCurrent,
    SetTrimStart(f64),
    SetTrimEnd(f64),
    ResetTrim,
    CutAtPosition,
}

/// Owns the editing state for the active source.
///
/// State changes only through [`EditorSession::dispatch`] (user commands) and
/// [`EditorSession::handle_event`] (pipeline notifications). `dispatch`
/// returns the commands the caller must forward to the playback surface.
#[derive(Debug)]
pub struct EditorSession {
    source: Option<SourceHandle>,
    playback: PlaybackState,
    trim: TrimRange,
    cuts: CutList,
    policy: TrimPolicy,
}

impl EditorSession {
    pub fn new(policy: TrimPolicy) -> Self {
        Self {
            source: None,
            playback: PlaybackState::new(),
            trim: TrimRange::default(),
            cuts: CutList::new(),
            policy,
        }
    }

    pub fn dispatch(&mut self, command: EditorCommand) -> Result<Vec<SurfaceCommand>> {
        debug!(?command, "dispatch");
        match command {
            EditorCommand::LoadSource(handle) => Ok(self.load_source(handle)),
            EditorCommand::ClearSource => Ok(self.clear_source()),
            EditorCommand::TogglePlayPause => Ok(self.toggle_play_pause().into_iter().collect()),
            EditorCommand::Seek(time) => self.seek(time),
            EditorCommand::SeekValues(values) => match timeline_math::seek_target(&values) {
                Some(time) => self.seek(time),
                None => Ok(Vec::new()),
            },
            EditorCommand::SetTrimStartToCurrent => {
                self.set_trim(TrimEdge::Start, self.playback.current_time)
            }
            EditorCommand::SetTrimEndToCurrent => {
                self.set_trim(TrimEdge::End, self.playback.current_time)
            }
            EditorCommand::SetTrimStart(value) => self.set_trim(TrimEdge::Start, value),
            EditorCommand::SetTrimEnd(value) => self.set_trim(TrimEdge::End, value),
            EditorCommand::ResetTrim => {
                self.trim = TrimRange::full(self.playback.duration);
                Ok(Vec::new())
            }
            EditorCommand::CutAtPosition => {
                self.require_source()?;
                if self.cuts.cut_at(self.playback.current_time) {
                    info!(at = self.playback.current_time, segments = self.cuts.segments().len(), "cut added");
                }
                Ok(Vec::new())
            }
        }
    }

    pub fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::TimeUpdated(time) => self.playback.current_time = time,
            PlayerEvent::MetadataLoaded(duration) => {
                if self.playback.has_duration() {
                    debug!(duration, "ignoring repeated metadata");
                    return;
                }
                info!(duration, "metadata loaded");
                self.playback.duration = duration;
                self.trim = TrimRange::full(duration);
                self.cuts = CutList::covering(duration);
            }
            PlayerEvent::Ended => {
                debug!("end of media");
                self.playback.is_playing = false;
            }
            PlayerEvent::Failed(reason) => {
                warn!(%reason, "playback failed");
                self.playback.is_playing = false;
            }
        }
    }

    fn load_source(&mut self, handle: SourceHandle) -> Vec<SurfaceCommand> {
        let uri = handle.uri().to_string();
        info!(id = %handle.id(), uri = %uri, "loading source");
        // Replacing the option drops, and so revokes, the previous handle.
        self.source = Some(handle);
        self.reset_state();
        vec![SurfaceCommand::Load { uri }]
    }

    fn clear_source(&mut self) -> Vec<SurfaceCommand> {
        if self.source.take().is_none() {
            return Vec::new();
        }
        info!("source cleared");
        self.reset_state();
        vec![SurfaceCommand::Unload]
    }

    fn reset_state(&mut self) {
        self.playback = PlaybackState::new();
        self.trim = TrimRange::default();
        self.cuts = CutList::new();
    }

    fn toggle_play_pause(&mut self) -> Option<SurfaceCommand> {
        self.source.as_ref()?;
        self.playback.is_playing = !self.playback.is_playing;
        Some(if self.playback.is_playing {
            SurfaceCommand::Play
        } else {
            SurfaceCommand::Pause
        })
    }

    fn seek(&mut self, time: f64) -> Result<Vec<SurfaceCommand>> {
        self.require_source()?;
        if !time.is_finite() {
            return Err(TrimError::InvalidTime(time));
        }
        self.playback.current_time = time;
        Ok(vec![SurfaceCommand::SeekTo(time)])
    }

    fn set_trim(&mut self, edge: TrimEdge, value: f64) -> Result<Vec<SurfaceCommand>> {
        self.trim
            .set_edge(edge, value, self.playback.duration, self.policy)?;
        debug!(start = self.trim.start, end = self.trim.end, "trim updated");
        Ok(Vec::new())
    }

    fn require_source(&self) -> Result<&SourceHandle> {
        self.source.as_ref().ok_or(TrimError::NoSource)
    }

    pub fn source(&self) -> Option<&SourceHandle> {
        self.source.as_ref()
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn trim(&self) -> TrimRange {
        self.trim
    }

    pub fn cuts(&self) -> &CutList {
        &self.cuts
    }

    pub fn policy(&self) -> TrimPolicy {
        self.policy
    }

    /// Timeline marker positions, `None` until the duration is known.
    pub fn markers(&self) -> Option<TimelineMarkers> {
        timeline_math::markers(
            self.trim.start,
            self.trim.end,
            self.playback.current_time,
            self.playback.duration,
        )
    }

    pub fn current_label(&self) -> String {
        format_time(self.playback.current_time)
    }

    pub fn duration_label(&self) -> String {
        format_time(self.playback.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::PlaybackSurface;
    use crate::renderer::surface::testing::RecordingSurface;
    use crate::types::media::SelectedFile;
    use crate::types::source::SourceRegistry;

    struct Fixture {
        _file: tempfile::NamedTempFile,
        registry: SourceRegistry,
        selected: SelectedFile,
    }

    impl Fixture {
        fn new() -> Self {
            let file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
            let selected = SelectedFile::from_path(file.path()).unwrap();
            Self {
                _file: file,
                registry: SourceRegistry::new(),
                selected,
            }
        }

        fn handle(&self) -> SourceHandle {
            self.registry.acquire(&self.selected).unwrap()
        }
    }

    fn loaded(fixture: &Fixture, duration: f64) -> EditorSession {
        let mut session = EditorSession::new(TrimPolicy::Clamp);
        session
            .dispatch(EditorCommand::LoadSource(fixture.handle()))
            .unwrap();
        session.handle_event(PlayerEvent::MetadataLoaded(duration));
        session
    }

    #[test]
    fn test_load_source_resets_state() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 60.0);
        session.dispatch(EditorCommand::Seek(20.0)).unwrap();
        session.dispatch(EditorCommand::TogglePlayPause).unwrap();
        session.dispatch(EditorCommand::SetTrimStart(5.0)).unwrap();
        assert!(session.playback().is_playing);

        let commands = session
            .dispatch(EditorCommand::LoadSource(fixture.handle()))
            .unwrap();

        assert!(matches!(commands.as_slice(), [SurfaceCommand::Load { .. }]));
        assert_eq!(session.playback().current_time, 0.0);
        assert!(!session.playback().is_playing);
        assert_eq!(session.playback().duration, 0.0);
        assert_eq!(session.trim(), TrimRange { start: 0.0, end: 0.0 });
        assert!(session.markers().is_none());
    }

    #[test]
    fn test_replacing_source_revokes_previous_handle() {
        let fixture = Fixture::new();
        let mut session = EditorSession::new(TrimPolicy::Clamp);
        let first = fixture.handle();
        let first_id = first.id();
        session.dispatch(EditorCommand::LoadSource(first)).unwrap();
        assert!(fixture.registry.resolve(first_id).is_some());

        let second = fixture.handle();
        let second_id = second.id();
        session.dispatch(EditorCommand::LoadSource(second)).unwrap();

        assert!(fixture.registry.resolve(first_id).is_none());
        assert!(fixture.registry.resolve(second_id).is_some());
        assert_eq!(fixture.registry.live_count(), 1);

        let commands = session.dispatch(EditorCommand::ClearSource).unwrap();
        assert_eq!(commands, vec![SurfaceCommand::Unload]);
        assert_eq!(fixture.registry.live_count(), 0);
        assert!(session.source().is_none());

        drop(session);
        assert_eq!(fixture.registry.live_count(), 0);
    }

    #[test]
    fn test_session_drop_releases_handle() {
        let fixture = Fixture::new();
        let session = loaded(&fixture, 10.0);
        assert_eq!(fixture.registry.live_count(), 1);
        drop(session);
        assert_eq!(fixture.registry.live_count(), 0);
    }

    #[test]
    fn test_metadata_sets_full_trim_interval() {
        let fixture = Fixture::new();
        let session = loaded(&fixture, 120.0);
        assert_eq!(session.playback().duration, 120.0);
        assert_eq!(session.trim(), TrimRange { start: 0.0, end: 120.0 });
        assert_eq!(session.cuts().segments().len(), 1);
        assert_eq!(session.duration_label(), "02:00");
    }

    #[test]
    fn test_duration_is_set_once_per_source() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 120.0);
        session.handle_event(PlayerEvent::MetadataLoaded(90.0));
        assert_eq!(session.playback().duration, 120.0);
    }

    #[test]
    fn test_time_update_moves_position() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 120.0);
        session.handle_event(PlayerEvent::TimeUpdated(65.4));
        assert_eq!(session.playback().current_time, 65.4);
        assert_eq!(session.current_label(), "01:05");
    }

    #[test]
    fn test_set_trim_end_to_current_scenario() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 120.0);
        session.handle_event(PlayerEvent::TimeUpdated(30.0));

        let commands = session
            .dispatch(EditorCommand::SetTrimEndToCurrent)
            .unwrap();

        assert!(commands.is_empty());
        assert_eq!(session.trim().end, 30.0);
        assert_eq!(session.trim().start, 0.0);
    }

    #[test]
    fn test_set_trim_start_to_current() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 120.0);
        session.dispatch(EditorCommand::Seek(42.0)).unwrap();
        session
            .dispatch(EditorCommand::SetTrimStartToCurrent)
            .unwrap();
        assert_eq!(session.trim(), TrimRange { start: 42.0, end: 120.0 });
    }

    #[test]
    fn test_reset_trim_restores_full_range() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 120.0);
        session.dispatch(EditorCommand::SetTrimStart(12.0)).unwrap();
        session.dispatch(EditorCommand::SetTrimEnd(80.0)).unwrap();
        session.dispatch(EditorCommand::SetTrimStart(200.0)).unwrap();
        session.dispatch(EditorCommand::SetTrimEnd(1.0)).unwrap();

        session.dispatch(EditorCommand::ResetTrim).unwrap();
        assert_eq!(session.trim(), TrimRange { start: 0.0, end: 120.0 });
    }

    #[test]
    fn test_policy_applies_to_current_position_edits() {
        let fixture = Fixture::new();
        let mut session = EditorSession::new(TrimPolicy::Reject);
        session
            .dispatch(EditorCommand::LoadSource(fixture.handle()))
            .unwrap();
        session.handle_event(PlayerEvent::MetadataLoaded(100.0));
        session.dispatch(EditorCommand::SetTrimEnd(20.0)).unwrap();
        session.handle_event(PlayerEvent::TimeUpdated(50.0));

        let err = session
            .dispatch(EditorCommand::SetTrimStartToCurrent)
            .unwrap_err();
        assert!(matches!(err, TrimError::UnorderedTrim { .. }));
        assert_eq!(session.trim(), TrimRange { start: 0.0, end: 20.0 });
    }

    #[test]
    fn test_toggle_twice_issues_play_then_pause() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 120.0);
        let mut surface = RecordingSurface::default();
        let before = session.playback().is_playing;

        for _ in 0..2 {
            for command in session.dispatch(EditorCommand::TogglePlayPause).unwrap() {
                surface.execute(&command).unwrap();
            }
        }

        assert_eq!(session.playback().is_playing, before);
        assert_eq!(
            surface.commands,
            vec![SurfaceCommand::Play, SurfaceCommand::Pause]
        );
    }

    #[test]
    fn test_toggle_without_source_is_noop() {
        let mut session = EditorSession::new(TrimPolicy::Clamp);
        let commands = session.dispatch(EditorCommand::TogglePlayPause).unwrap();
        assert!(commands.is_empty());
        assert!(!session.playback().is_playing);
    }

    #[test]
    fn test_end_of_media_stops_playing() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 5.0);
        session.dispatch(EditorCommand::TogglePlayPause).unwrap();
        session.handle_event(PlayerEvent::Ended);
        assert!(!session.playback().is_playing);

        let commands = session.dispatch(EditorCommand::TogglePlayPause).unwrap();
        assert_eq!(commands, vec![SurfaceCommand::Play]);
    }

    #[test]
    fn test_seek_forwards_absolute_position() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 120.0);
        let commands = session.dispatch(EditorCommand::Seek(12.34)).unwrap();
        assert_eq!(commands, vec![SurfaceCommand::SeekTo(12.34)]);
        assert_eq!(session.playback().current_time, 12.34);

        let commands = session
            .dispatch(EditorCommand::SeekValues(vec![7.5, 99.0]))
            .unwrap();
        assert_eq!(commands, vec![SurfaceCommand::SeekTo(7.5)]);

        let commands = session
            .dispatch(EditorCommand::SeekValues(Vec::new()))
            .unwrap();
        assert!(commands.is_empty());
        assert_eq!(session.playback().current_time, 7.5);
    }

    #[test]
    fn test_seek_without_source_fails() {
        let mut session = EditorSession::new(TrimPolicy::Clamp);
        let err = session.dispatch(EditorCommand::Seek(1.0)).unwrap_err();
        assert!(matches!(err, TrimError::NoSource));
    }

    #[test]
    fn test_markers_follow_state() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 200.0);
        session.dispatch(EditorCommand::SetTrimStart(50.0)).unwrap();
        session.dispatch(EditorCommand::SetTrimEnd(150.0)).unwrap();
        session.dispatch(EditorCommand::Seek(100.0)).unwrap();

        let markers = session.markers().unwrap();
        assert_eq!(markers.start, 25.0);
        assert_eq!(markers.end, 75.0);
        assert_eq!(markers.playhead, 50.0);
    }

    #[test]
    fn test_cut_at_position() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 60.0);
        session.dispatch(EditorCommand::Seek(20.0)).unwrap();
        session.dispatch(EditorCommand::CutAtPosition).unwrap();
        session.dispatch(EditorCommand::Seek(45.0)).unwrap();
        session.dispatch(EditorCommand::CutAtPosition).unwrap();

        assert_eq!(session.cuts().cut_points(), vec![20.0, 45.0]);
        assert_eq!(session.cuts().segments().len(), 3);
    }

    #[test]
    fn test_failure_event_stops_playback() {
        let fixture = Fixture::new();
        let mut session = loaded(&fixture, 60.0);
        session.dispatch(EditorCommand::TogglePlayPause).unwrap();
        session.handle_event(PlayerEvent::Failed("decoder missing".to_string()));
        assert!(!session.playback().is_playing);
    }
}
