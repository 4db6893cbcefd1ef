//! Playback handles.
//!
//! `Playback` is the seam between a `VideoEntry` and whatever decodes the
//! clip. The application uses `GstPlayback`, a thin layer over
//! `iced_video_player::Video` (GStreamer underneath).

use iced_video_player::Video;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Invalid video path: {0}")]
    InvalidPath(String),

    #[error("Failed to load video: {0}")]
    Decoder(#[from] iced_video_player::Error),
}

/// What happens when a clip reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Repeat indefinitely.
    Loop,
    /// Play once and stay on the last frame.
    Once,
}

pub trait Playback {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError>;

    /// Begin or resume from the current position.
    fn play(&mut self);

    /// Halt, keeping the current position.
    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Seek back to the first frame.
    fn rewind(&mut self);

    fn set_loop_mode(&mut self, mode: LoopMode);

    fn set_volume(&mut self, volume: f32);

    /// Intrinsic pixel size of the clip, `(0, 0)` when nothing is loaded.
    fn native_size(&self) -> (f32, f32);

    /// Advance internal state by one frame tick.
    fn update(&mut self);

    /// Index of the frame at the current position.
    fn current_frame(&self) -> u64;
}

/// Whether a running clip that reached its end should stop there. Looping
/// clips carry on; a clip that plays once stays parked on its last frame.
pub fn parks_at_end(mode: Option<LoopMode>, playing: bool, at_end: bool) -> bool {
    playing && at_end && mode == Some(LoopMode::Once)
}

/// GStreamer-backed handle. Inert until `load` succeeds.
#[derive(Default)]
pub struct GstPlayback {
    video: Option<Video>,
    playing: bool,
    loop_mode: Option<LoopMode>,
}

impl GstPlayback {
    pub fn new() -> Self {
        GstPlayback::default()
    }

    /// The underlying video, for the renderer.
    pub fn video(&self) -> Option<&Video> {
        self.video.as_ref()
    }
}

impl Playback for GstPlayback {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let absolute = std::path::absolute(path)
            .map_err(|e| PlaybackError::InvalidPath(format!("{}: {}", path.display(), e)))?;
        let url = url::Url::from_file_path(&absolute)
            .map_err(|_| PlaybackError::InvalidPath(absolute.display().to_string()))?;

        let video = Video::new(&url)?;
        log::info!(
            "Video loaded: path={}, size={:?}, fps={}",
            path.display(),
            video.size(),
            video.framerate()
        );
        self.video = Some(video);
        self.playing = self.video.as_ref().is_some_and(|v| !v.paused());
        Ok(())
    }

    fn play(&mut self) {
        if let Some(video) = self.video.as_mut() {
            video.set_paused(false);
            self.playing = true;
        }
    }

    fn stop(&mut self) {
        if let Some(video) = self.video.as_mut() {
            video.set_paused(true);
        }
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn rewind(&mut self) {
        if let Some(video) = self.video.as_mut() {
            if let Err(e) = video.seek(Duration::ZERO, true) {
                log::warn!("Rewind failed: {}", e);
            }
        }
    }

    fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = Some(mode);
        if let Some(video) = self.video.as_mut() {
            video.set_looping(mode == LoopMode::Loop);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        if let Some(video) = self.video.as_mut() {
            video.set_volume(f64::from(volume));
        }
    }

    fn native_size(&self) -> (f32, f32) {
        match &self.video {
            Some(video) => {
                let (w, h) = video.size();
                (w as f32, h as f32)
            }
            None => (0.0, 0.0),
        }
    }

    fn update(&mut self) {
        if let Some(video) = self.video.as_mut() {
            if parks_at_end(self.loop_mode, self.playing, video.eos()) {
                video.set_paused(true);
                self.playing = false;
            }
        }
    }

    fn current_frame(&self) -> u64 {
        match &self.video {
            Some(video) => {
                let frame = video.position().as_secs_f64() * video.framerate();
                if frame.is_finite() && frame > 0.0 {
                    frame.floor() as u64
                } else {
                    0
                }
            }
            None => 0,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_once_parks_at_end() {
        assert!(parks_at_end(Some(LoopMode::Once), true, true));
    }

    #[test]
    fn test_looping_never_parks() {
        assert!(!parks_at_end(Some(LoopMode::Loop), true, true));
    }

    #[test]
    fn test_nothing_to_park_before_end_or_when_stopped() {
        assert!(!parks_at_end(Some(LoopMode::Once), true, false));
        assert!(!parks_at_end(Some(LoopMode::Once), false, true));
        assert!(!parks_at_end(None, true, true));
    }
}
