use std::path::Path;

use crate::config::Settings;
use crate::controller::Controller;
use crate::entry::PlayState;
use crate::playback::GstPlayback;

const ALERT_TITLE: &str = "MSA Multi Video Player";

/// Read the settings file. Any failure here is fatal: the user gets an
/// alert and the process exits before a single video is opened.
pub fn load_settings_or_exit(path: &Path) -> Settings {
    match Settings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Startup aborted: {}", e);
            let description = e.to_string();
            let _ = rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title(ALERT_TITLE)
                .set_description(&description)
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
            std::process::exit(1);
        }
    }
}

/// Open every configured video and start the ones that autoplay.
pub fn load_controller(settings: &Settings) -> Controller<GstPlayback> {
    let mut controller = Controller::build(&settings.videos, GstPlayback::new);
    controller.start_all();
    for entry in controller.entries() {
        log::debug!("Trigger {:?} -> {}", entry.trigger_key(), entry.path().display());
    }
    log::info!(
        "Startup complete: {} video(s), {} playing",
        controller.entries().len(),
        controller
            .entries()
            .iter()
            .filter(|e| e.state() == PlayState::Playing)
            .count()
    );
    controller
}
