mod app;
mod config;
mod controller;
mod entry;
mod loader;
mod message;
mod playback;
mod state;
mod ui;

use clap::Parser;
use std::path::PathBuf;

use state::App;

/// Plays the clips listed in a settings file and toggles them from the keyboard.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Settings document to load
    #[arg(default_value = "settings.xml")]
    settings: PathBuf,
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = loader::load_settings_or_exit(&args.settings);

    iced::application(move || App::new(&settings), App::update, App::view)
        .title("MSA Multi Video Player")
        .subscription(App::subscription)
        .run()
}
