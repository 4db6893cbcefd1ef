use iced::widget::{container, Stack};
use iced::{Color, ContentFit, Element, Length, Padding, Theme};
use iced_video_player::VideoPlayer;

use crate::config::{Rect, Rgb};
use crate::message::Message;
use crate::state::App;

pub fn background_color(rgb: Rgb) -> Color {
    Color::from_rgb8(rgb.r, rgb.g, rgb.b)
}

/// Render the main view: every drawable clip stacked in configuration order
/// over the background colour.
pub fn render_main_view(app: &App) -> Element<'_, Message> {
    let entries = app.controller.entries();

    let layers: Vec<Element<'_, Message>> = app
        .placements
        .iter()
        .filter_map(|placement| {
            let video = entries.get(placement.index)?.handle().video()?;
            Some(place(
                VideoPlayer::new(video)
                    .width(Length::Fixed(placement.rect.width))
                    .height(Length::Fixed(placement.rect.height))
                    .content_fit(ContentFit::Fill)
                    .into(),
                placement.rect,
            ))
        })
        .collect();

    let background = background_color(app.display.background);

    container(
        Stack::with_children(layers)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .style(move |_theme: &Theme| container::Style {
        background: Some(background.into()),
        ..Default::default()
    })
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

/// Offset a layer to the rectangle's top-left corner. Layers cannot start
/// off-screen, negative offsets are pinned to the window edge.
fn place<'a>(content: Element<'a, Message>, rect: Rect) -> Element<'a, Message> {
    container(content)
        .padding(offset(rect))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn offset(rect: Rect) -> Padding {
    Padding {
        top: rect.y.max(0.0),
        right: 0.0,
        bottom: 0.0,
        left: rect.x.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_follows_rect_origin() {
        let padding = offset(Rect::new(12.0, 34.0, 100.0, 100.0));
        assert_eq!(padding.left, 12.0);
        assert_eq!(padding.top, 34.0);
        assert_eq!(padding.right, 0.0);
        assert_eq!(padding.bottom, 0.0);
    }

    #[test]
    fn test_negative_origin_is_pinned() {
        let padding = offset(Rect::new(-5.0, -1.0, 10.0, 10.0));
        assert_eq!(padding.left, 0.0);
        assert_eq!(padding.top, 0.0);
    }

    #[test]
    fn test_background_color() {
        let color = background_color(Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(color, Color::from_rgb8(255, 0, 0));
    }
}
