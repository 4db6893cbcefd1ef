use iced::window;

#[derive(Clone, Debug)]
pub enum Message {
    /// One display frame elapsed.
    Tick,
    KeyPressed(char, window::Id),
}
