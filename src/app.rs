use iced::keyboard::{self, key};
use iced::{event, time, window};
use iced::{Element, Subscription, Task};
use std::time::Duration;

use crate::controller::KeyAction;
use crate::message::Message;
use crate::state::App;
use crate::ui;

impl App {
    /// Handle UI messages and state updates.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                self.placements = self.controller.draw();
                Task::none()
            }
            Message::KeyPressed(key, window) => match self.controller.key_pressed(key) {
                KeyAction::ToggleFullscreen => {
                    self.fullscreen = !self.fullscreen;
                    log::info!("Fullscreen: {}", self.fullscreen);
                    let mode = if self.fullscreen {
                        window::Mode::Fullscreen
                    } else {
                        window::Mode::Windowed
                    };
                    window::set_mode(window, mode)
                }
                KeyAction::ResetAll | KeyAction::Triggered(_) | KeyAction::Unmapped => Task::none(),
            },
        }
    }

    /// Keyboard input plus one `Tick` per frame: the display refresh when
    /// vsync is on, the configured frame rate otherwise.
    pub fn subscription(&self) -> Subscription<Message> {
        let frames = if self.display.vsync {
            window::frames().map(|_| Message::Tick)
        } else {
            time::every(frame_interval(self.display.fps)).map(|_| Message::Tick)
        };

        Subscription::batch([event::listen_with(key_event), frames])
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        ui::render_main_view(self)
    }
}

fn key_event(event: iced::Event, _status: event::Status, window: window::Id) -> Option<Message> {
    match event {
        iced::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
            key_to_char(&key).map(|c| Message::KeyPressed(c, window))
        }
        _ => None,
    }
}

/// Printable keys map to their character, the space bar to `' '`.
pub fn key_to_char(key: &keyboard::Key) -> Option<char> {
    match key {
        keyboard::Key::Character(text) => text.chars().next(),
        keyboard::Key::Named(key::Named::Space) => Some(' '),
        _ => None,
    }
}

fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
}
