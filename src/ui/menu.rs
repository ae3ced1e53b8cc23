use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::ui::layout::MenuLayout;
use crate::ui::{accent, bold, dim, success};

const KEYS: [&str; 4] = ["←↑→↓ move", "1-6 pick", "Enter start", "q quit"];

pub fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let layout = MenuLayout::compute(area, app.levels().len());

    let done = app.registry.len();
    Paragraph::new(vec![
        Line::from(Span::styled("Computer Skills Practice", accent())),
        Line::from(Span::styled("Choose a Level", bold())),
        Line::from(Span::styled(
            format!("{done} of {} levels completed", app.levels().len()),
            if done == app.levels().len() {
                success()
            } else {
                dim()
            },
        )),
    ])
    .alignment(Alignment::Center)
    .render(layout.title, buf);

    for (n, (level, card)) in app.levels().iter().zip(&layout.cards).enumerate() {
        let completed = app.registry.is_completed(level.id);
        let selected = n == app.menu_cursor;

        let border = match (selected, completed) {
            (true, _) => Style::default().fg(Color::Yellow),
            (false, true) => Style::default().fg(Color::Green),
            (false, false) => Style::default(),
        };
        let block = Block::bordered()
            .border_type(if selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(border)
            .title(Span::styled(format!(" Level {} ", level.id), bold()));

        let mut lines = vec![
            Line::from(Span::styled(level.title.clone(), bold())),
            Line::from(level.description.clone()),
            Line::from(Span::styled(
                format!("{} · {} seconds", level.kind(), level.duration_secs),
                dim(),
            )),
        ];
        if completed {
            lines.push(Line::from(Span::styled("✓ Completed", success())));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(*card, buf);
    }

    Paragraph::new(Span::styled(KEYS.iter().join("  ·  "), dim()))
        .alignment(Alignment::Center)
        .render(layout.footer, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::tests::{rendered, test_app};

    #[test]
    fn menu_lists_every_level_with_duration() {
        let app = test_app();
        let text = rendered(&app, Rect::new(0, 0, 100, 40));
        for level in app.levels() {
            assert!(text.contains(&level.title), "missing {}", level.title);
        }
        assert!(text.contains("60 seconds"));
        assert!(text.contains("15 seconds"));
        assert!(text.contains("0 of 6 levels completed"));
        assert!(!text.contains("Completed"));
    }

    #[test]
    fn completed_levels_get_a_badge() {
        let mut app = test_app();
        app.registry.record(2);
        app.registry.record(5);
        let text = rendered(&app, Rect::new(0, 0, 100, 40));
        assert_eq!(text.matches("✓ Completed").count(), 2);
        assert!(text.contains("2 of 6 levels completed"));
    }
}
