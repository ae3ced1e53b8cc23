use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap},
};

use crate::engine::{LevelEngine, Phase};
use crate::level;
use crate::ui::layout::ResultLayout;
use crate::ui::{bold, danger, dim, render_buttons, success};

pub fn render_results(engine: &LevelEngine, area: Rect, buf: &mut Buffer) {
    let phase = engine.phase();
    let definition = engine.definition();
    let has_next = level::next_level(definition.id).is_some();
    let layout = ResultLayout::compute(area, phase, has_next);

    let (title, style, lines) = match phase {
        Phase::Succeeded => (
            " Level Complete! ",
            success(),
            vec![
                Line::from(Span::styled("Great Job!", success())),
                Line::from(""),
                Line::from(format!("You finished {}.", definition.title)),
                Line::from(Span::styled(
                    format!(
                        "{} seconds were still left on the clock.",
                        engine.seconds_remaining()
                    ),
                    dim(),
                )),
            ],
        ),
        _ => (
            " Time's Up! ",
            danger(),
            vec![
                Line::from(Span::styled("Time's Up!", danger())),
                Line::from(""),
                Line::from(definition.failure_message(engine.done())),
                Line::from(Span::styled("Press r to try again or m for the menu", dim())),
            ],
        ),
    };

    Clear.render(layout.panel, buf);
    Block::bordered()
        .border_type(BorderType::Double)
        .border_style(style)
        .title(Span::styled(title, bold().fg(Color::White)))
        .title_alignment(Alignment::Center)
        .render(layout.panel, buf);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout.message, buf);

    render_buttons(&layout.buttons, buf);
}
