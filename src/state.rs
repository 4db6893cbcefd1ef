use crate::config::{DisplaySettings, Settings};
use crate::controller::{Controller, Placement};
use crate::loader;
use crate::playback::GstPlayback;

/// Application state: the video controller plus what the window needs.
pub struct App {
    pub controller: Controller<GstPlayback>,
    pub display: DisplaySettings,
    pub fullscreen: bool,
    // Result of the most recent `Controller::draw`
    pub placements: Vec<Placement>,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        App {
            controller: loader::load_controller(settings),
            display: settings.display.clone(),
            fullscreen: false,
            placements: Vec::new(),
        }
    }
}
