use std::path::{Path, PathBuf};

use crate::config::{Rect, VideoRecord};
use crate::playback::{LoopMode, Playback};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

/// One configured clip and its playback handle.
pub struct VideoEntry<P: Playback> {
    path: PathBuf,
    autoplay: bool,
    looping: bool,
    trigger_key: char,
    volume: f32,
    rect: Rect,
    handle: P,
}

impl<P: Playback> VideoEntry<P> {
    /// Load the clip and leave it initialised and stopped. A clip that fails
    /// to load is kept; it simply never shows anything.
    pub fn new(record: &VideoRecord, mut handle: P) -> Self {
        if let Err(e) = handle.load(&record.file) {
            log::error!("VideoEntry: error loading {}: {}", record.file.display(), e);
        }

        let mut entry = VideoEntry {
            path: record.file.clone(),
            autoplay: record.autoplay,
            looping: record.looping,
            trigger_key: record.trigger,
            volume: record.volume,
            rect: record.rect,
            handle,
        };
        entry.reset();
        entry.stop();
        entry
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn trigger_key(&self) -> char {
        self.trigger_key
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn handle(&self) -> &P {
        &self.handle
    }

    pub fn state(&self) -> PlayState {
        if self.handle.is_playing() {
            PlayState::Playing
        } else {
            PlayState::Stopped
        }
    }

    /// Rewind, reapply loop mode and volume, resolve native size, then `start`.
    pub fn reset(&mut self) {
        self.stop();
        self.handle.rewind();
        self.handle.set_loop_mode(if self.looping {
            LoopMode::Loop
        } else {
            LoopMode::Once
        });
        self.handle.set_volume(self.volume);

        let (native_w, native_h) = self.handle.native_size();
        if self.rect.width == 0.0 {
            self.rect.width = native_w;
        }
        if self.rect.height == 0.0 {
            self.rect.height = native_h;
        }

        self.start();
    }

    /// Plays only when the entry autoplays.
    pub fn start(&mut self) {
        if self.autoplay {
            self.handle.play();
        }
    }

    pub fn stop(&mut self) {
        self.handle.stop();
    }

    /// Toggle between playing and stopped, resuming from the current position.
    pub fn trigger(&mut self) {
        if self.handle.is_playing() {
            self.stop();
        } else {
            self.handle.play();
        }
    }

    /// Tick the decoder and return where to render, if there is a decoded
    /// frame to show yet.
    pub fn draw(&mut self) -> Option<Rect> {
        self.handle.update();
        (self.handle.current_frame() > 0).then_some(self.rect)
    }
}

impl<P: Playback> Drop for VideoEntry<P> {
    fn drop(&mut self) {
        log::info!("Releasing video {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::testing::{journal, FakePlayback};

    fn record(file: &str, autoplay: bool, looping: bool) -> VideoRecord {
        VideoRecord {
            file: PathBuf::from(file),
            autoplay,
            looping,
            ..VideoRecord::default()
        }
    }

    fn entry(record: &VideoRecord) -> VideoEntry<FakePlayback> {
        VideoEntry::new(record, FakePlayback::new(journal()))
    }

    #[test]
    fn test_new_entry_is_stopped_regardless_of_autoplay() {
        for autoplay in [true, false] {
            let e = entry(&record("a.mov", autoplay, true));
            assert_eq!(e.state(), PlayState::Stopped, "autoplay={autoplay}");
        }
    }

    #[test]
    fn test_construction_sequence() {
        let log = journal();
        let _e = VideoEntry::new(&record("a.mov", true, true), FakePlayback::new(log.clone()));
        let ops: Vec<&str> = log.borrow().iter().map(|(_, op)| *op).collect();
        assert_eq!(ops, ["load", "stop", "rewind", "play", "stop"]);
    }

    #[test]
    fn test_reset_applies_loop_mode_and_volume() {
        let mut looped = record("a.mov", true, true);
        looped.volume = 0.3;
        let e = entry(&looped);
        assert_eq!(e.handle().loop_mode, Some(LoopMode::Loop));
        assert_eq!(e.handle().volume, 0.3);

        let once = entry(&record("b.mov", true, false));
        assert_eq!(once.handle().loop_mode, Some(LoopMode::Once));
    }

    #[test]
    fn test_start_respects_autoplay() {
        let mut auto = entry(&record("a.mov", true, true));
        auto.start();
        assert_eq!(auto.state(), PlayState::Playing);

        let mut manual = entry(&record("b.mov", false, true));
        manual.start();
        assert_eq!(manual.state(), PlayState::Stopped);
    }

    #[test]
    fn test_reset_plays_iff_autoplay() {
        let mut auto = entry(&record("a.mov", true, true));
        auto.reset();
        assert_eq!(auto.state(), PlayState::Playing);

        let mut manual = entry(&record("b.mov", false, true));
        manual.trigger();
        assert_eq!(manual.state(), PlayState::Playing);
        manual.reset();
        assert_eq!(manual.state(), PlayState::Stopped);
    }

    #[test]
    fn test_trigger_twice_restores_state() {
        for autoplay in [true, false] {
            let mut e = entry(&record("a.mov", autoplay, true));
            e.start();
            let before = e.state();
            e.trigger();
            assert_ne!(e.state(), before);
            e.trigger();
            assert_eq!(e.state(), before);
        }
    }

    #[test]
    fn test_trigger_plays_even_without_autoplay() {
        let mut e = entry(&record("a.mov", false, true));
        e.trigger();
        assert_eq!(e.state(), PlayState::Playing);
    }

    #[test]
    fn test_stop_keeps_position() {
        let mut e = entry(&record("a.mov", true, true));
        e.start();
        e.draw();
        e.draw();
        e.stop();
        e.draw();
        assert_eq!(e.handle().current_frame(), 2);
    }

    #[test]
    fn test_zero_rect_takes_native_size() {
        let e = entry(&record("a.mov", true, true));
        assert_eq!(e.rect(), Rect::new(0.0, 0.0, 640.0, 360.0));
    }

    #[test]
    fn test_partial_rect_keeps_configured_side() {
        let mut r = record("a.mov", true, true);
        r.rect = Rect::new(5.0, 6.0, 100.0, 0.0);
        let e = entry(&r);
        assert_eq!(e.rect(), Rect::new(5.0, 6.0, 100.0, 360.0));
    }

    #[test]
    fn test_draw_waits_for_first_frame() {
        let mut e = entry(&record("a.mov", true, true));
        // Stopped at frame 0: nothing to show, even after a tick.
        assert_eq!(e.draw(), None);
        e.start();
        assert_eq!(e.draw(), Some(e.rect()));
    }

    #[test]
    fn test_failed_load_is_not_fatal() {
        let mut handle = FakePlayback::new(journal());
        handle.fail_load = true;
        let mut e = VideoEntry::new(&record("missing.mov", true, true), handle);
        assert_eq!(e.state(), PlayState::Stopped);
        assert_eq!(e.rect(), Rect::default());

        e.start();
        e.trigger();
        assert_eq!(e.state(), PlayState::Stopped);
        assert_eq!(e.draw(), None);
    }

    fn clip(file: &str, looping: bool, length: u64) -> VideoEntry<FakePlayback> {
        let mut handle = FakePlayback::new(journal());
        handle.length = length;
        VideoEntry::new(&record(file, true, looping), handle)
    }

    #[test]
    fn test_play_once_stops_on_last_frame() {
        let mut e = clip("once.mov", false, 5);
        e.start();
        for _ in 0..10 {
            e.draw();
        }
        assert_eq!(e.state(), PlayState::Stopped);
        assert_eq!(e.handle().current_frame(), 4);
        // The last frame stays on screen.
        assert_eq!(e.draw(), Some(e.rect()));
    }

    #[test]
    fn test_looping_clip_keeps_running() {
        let mut e = clip("loop.mov", true, 5);
        e.start();
        for _ in 0..10 {
            e.draw();
        }
        assert_eq!(e.state(), PlayState::Playing);
    }

    #[test]
    fn test_drop_releases_handle() {
        let log = journal();
        let e = VideoEntry::new(&record("a.mov", true, true), FakePlayback::new(log.clone()));
        drop(e);
        let last = log.borrow().last().cloned();
        assert_eq!(last, Some((PathBuf::from("a.mov"), "drop")));
    }
}
