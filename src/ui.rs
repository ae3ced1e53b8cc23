pub mod layout;
pub mod menu;
pub mod play;
pub mod results;
pub mod screen;
pub mod tutorial;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 16;

/// Below this size only a notice is drawn, so nothing on screen can be clicked.
pub(crate) fn too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

pub(crate) fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn accent() -> Style {
    bold().fg(Color::Cyan)
}

pub(crate) fn success() -> Style {
    bold().fg(Color::Green)
}

pub(crate) fn danger() -> Style {
    bold().fg(Color::Red)
}

pub(crate) fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Cuts `text` to at most `width` display columns, marking the cut with `…`.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        let next = format!("{out}{c}");
        if next.width() + 1 > width {
            break;
        }
        out = next;
    }
    out.push('…');
    out
}

/// Draws a row of bordered buttons at the rects computed by the layout.
pub(crate) fn render_buttons(buttons: &[(layout::Button, Rect)], buf: &mut Buffer) {
    for (button, rect) in buttons {
        let style = match button {
            layout::Button::TutorialStart | layout::Button::NextLevel => success(),
            layout::Button::BackToMenu => bold(),
            _ => accent(),
        };
        Paragraph::new(Span::styled(button.label(), style))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(style))
            .render(*rect, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area) {
            Paragraph::new(Span::styled(
                "Please make the window bigger",
                bold().fg(Color::Yellow),
            ))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }
        screen::current_screen(self).render(self, area, buf);
    }
}

/// Draws the whole app and remembers the frame size so mouse positions can be
/// mapped back onto what was drawn.
pub fn ui(app: &mut App, f: &mut Frame) {
    app.area = f.area();
    f.render_widget(&*app, f.area());
}
