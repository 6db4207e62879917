use crate::error::Result;

/// Notifications the playback surface reports back to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Playback position changed, in seconds.
    TimeUpdated(f64),
    /// Total duration became known. Sent once per loaded source.
    MetadataLoaded(f64),
    /// Playback reached the end of the media.
    Ended,
    /// The pipeline failed; playback has stopped.
    Failed(String),
}

/// Instructions the editor issues to the playback surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    Load { uri: String },
    Unload,
    Play,
    Pause,
    /// Absolute position in seconds.
    SeekTo(f64),
}

/// Anything that can render the source and report playback events.
pub trait PlaybackSurface {
    fn load(&mut self, uri: &str) -> Result<()>;
    fn unload(&mut self);
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn seek(&mut self, seconds: f64) -> Result<()>;

    /// Drains the events produced since the last call.
    fn poll_events(&mut self) -> Vec<PlayerEvent>;

    fn execute(&mut self, command: &SurfaceCommand) -> Result<()> {
        match command {
            SurfaceCommand::Load { uri } => self.load(uri),
            SurfaceCommand::Unload => {
                self.unload();
                Ok(())
            }
            SurfaceCommand::Play => self.play(),
            SurfaceCommand::Pause => self.pause(),
            SurfaceCommand::SeekTo(seconds) => self.seek(*seconds),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Surface that records every command it receives.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub commands: Vec<SurfaceCommand>,
        pub pending: Vec<PlayerEvent>,
    }

    impl PlaybackSurface for RecordingSurface {
        fn load(&mut self, uri: &str) -> Result<()> {
            self.commands.push(SurfaceCommand::Load {
                uri: uri.to_string(),
            });
            Ok(())
        }

        fn unload(&mut self) {
            self.commands.push(SurfaceCommand::Unload);
        }

        fn play(&mut self) -> Result<()> {
            self.commands.push(SurfaceCommand::Play);
            Ok(())
        }

        fn pause(&mut self) -> Result<()> {
            self.commands.push(SurfaceCommand::Pause);
            Ok(())
        }

        fn seek(&mut self, seconds: f64) -> Result<()> {
            self.commands.push(SurfaceCommand::SeekTo(seconds));
            Ok(())
        }

        fn poll_events(&mut self) -> Vec<PlayerEvent> {
            std::mem::take(&mut self.pending)
        }
    }
}
