//! Owns every entry and routes frames and key presses to them.

use std::collections::HashMap;

use crate::config::{Rect, VideoRecord};
use crate::entry::VideoEntry;
use crate::playback::Playback;

pub const FULLSCREEN_KEY: char = 'f';
pub const RESET_KEY: char = 'r';

/// Where one entry should be rendered this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub rect: Rect,
}

/// Outcome of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Window mode change; no entry is touched.
    ToggleFullscreen,
    ResetAll,
    Triggered(usize),
    Unmapped,
}

pub struct Controller<P: Playback> {
    entries: Vec<VideoEntry<P>>,
    triggers: HashMap<char, usize>,
}

impl<P: Playback> Controller<P> {
    /// Construct one entry per record, in order. Entries are left stopped;
    /// call `start_all` once construction is done.
    pub fn build(records: &[VideoRecord], mut open: impl FnMut() -> P) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        let mut triggers = HashMap::new();

        for record in records {
            let index = entries.len();
            entries.push(VideoEntry::new(record, open()));
            // Later records take over a shared key.
            triggers.insert(record.trigger, index);
        }

        log::info!(
            "Created {} video entries, {} trigger key(s)",
            entries.len(),
            triggers.len()
        );

        Controller { entries, triggers }
    }

    pub fn start_all(&mut self) {
        for entry in &mut self.entries {
            entry.start();
        }
    }

    pub fn entries(&self) -> &[VideoEntry<P>] {
        &self.entries
    }

    /// Tick every entry in configuration order and collect the ones with a
    /// frame to show.
    pub fn draw(&mut self) -> Vec<Placement> {
        self.entries
            .iter_mut()
            .enumerate()
            .filter_map(|(index, entry)| entry.draw().map(|rect| Placement { index, rect }))
            .collect()
    }

    pub fn reset_all(&mut self) {
        for entry in &mut self.entries {
            entry.reset();
        }
    }

    pub fn key_pressed(&mut self, key: char) -> KeyAction {
        match key {
            FULLSCREEN_KEY => KeyAction::ToggleFullscreen,
            RESET_KEY => {
                log::debug!("Resetting all videos");
                self.reset_all();
                KeyAction::ResetAll
            }
            _ => match self.triggers.get(&key) {
                Some(&index) => {
                    let entry = &mut self.entries[index];
                    log::debug!("Key {:?} triggers {}", key, entry.path().display());
                    entry.trigger();
                    KeyAction::Triggered(index)
                }
                None => {
                    log::info!("Unknown key pressed {:?}", key);
                    KeyAction::Unmapped
                }
            },
        }
    }
}
