use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Gauge, Paragraph, Widget, Wrap},
};

use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::engine::{LevelEngine, SlotStatus};
use crate::level::{Challenge, LevelKind};
use crate::timer::Urgency;
use crate::ui::layout::{contains, PlayLayout};
use crate::ui::{accent, bold, dim, success, truncate};

fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Calm => Color::Green,
        Urgency::Warning => Color::Yellow,
        Urgency::Danger => Color::Red,
    }
}

fn slot_style(status: SlotStatus) -> Style {
    match status {
        SlotStatus::Empty => Style::default().fg(Color::Gray),
        SlotStatus::Correct => Style::default().fg(Color::Green),
        SlotStatus::Incorrect => Style::default().fg(Color::Red),
    }
}

pub fn render_play(app: &App, engine: &LevelEngine, area: Rect, buf: &mut Buffer) {
    let layout = PlayLayout::compute(area, engine);
    let definition = engine.definition();

    Paragraph::new(Span::styled("← Back to Menu", bold()))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(dim()))
        .render(layout.back, buf);

    Paragraph::new(vec![
        Line::from(Span::styled(definition.heading(), accent())),
        Line::from(Span::styled(
            format!(
                "{} · {}/{} done",
                definition.kind(),
                engine.done(),
                definition.challenge.total()
            ),
            dim(),
        )),
    ])
    .alignment(Alignment::Right)
    .render(layout.title, buf);

    let countdown = engine.countdown();
    let color = urgency_color(countdown.urgency());
    Gauge::default()
        .block(
            Block::bordered()
                .border_style(Style::default().fg(color))
                .title(Span::styled(" Time Left ", bold())),
        )
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(countdown.fraction_remaining().clamp(0.0, 1.0))
        .label(Span::styled(
            format!("{} seconds", countdown.seconds_remaining()),
            bold(),
        ))
        .render(layout.timer, buf);

    Paragraph::new(Span::styled(definition.prompt(), bold()))
        .alignment(Alignment::Center)
        .render(layout.prompt, buf);

    match &definition.challenge {
        Challenge::TextCopy { phrase, .. } => render_text(app, engine, &layout, phrase, buf),
        Challenge::DragDrop { items } | Challenge::FileCopy { files: items } => {
            render_files(app, engine, &layout, items, buf)
        }
    }

    if let Some(menu) = &app.interaction.context_menu {
        let rect = menu.rect.intersection(area);
        let style = if menu.enabled { bold() } else { dim() };
        Clear.render(rect, buf);
        Paragraph::new(Span::styled(menu.action.label(menu.enabled), style))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .render(rect, buf);
    }
}

fn render_text(app: &App, engine: &LevelEngine, layout: &PlayLayout, phrase: &str, buf: &mut Buffer) {
    if layout.compact {
        return render_text_rows(app, engine, layout, phrase, buf);
    }
    let focus = app.interaction.focus;

    if let Some(rect) = layout.phrase {
        let mut block = Block::bordered()
            .title(Span::styled(" Copy this text ", bold()))
            .border_style(if focus == Focus::Phrase {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Cyan)
            });
        if let Some(copied) = &app.interaction.text_clipboard {
            block = block.title_bottom(Span::styled(format!(" Copied: {copied} "), dim()));
        }
        Paragraph::new(Span::styled(phrase.to_string(), bold().fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .block(block)
            .render(rect, buf);
    }

    for (slot, rect) in layout.slots.iter().enumerate() {
        let status = engine.slot_status(slot).unwrap_or(SlotStatus::Empty);
        let value = engine.slot_value(slot).unwrap_or_default();
        let focused = focus == Focus::Slot(slot);

        let mut title = format!(" Box {} ", slot + 1);
        if status == SlotStatus::Correct {
            title.push_str("✓ ");
        }
        let block = Block::bordered()
            .title(title)
            .border_type(if focused {
                BorderType::Thick
            } else {
                BorderType::Plain
            })
            .border_style(if focused {
                slot_style(status).fg(Color::Yellow)
            } else {
                slot_style(status)
            });

        let shown = if value.is_empty() && focused {
            Span::styled("Paste here…", dim())
        } else {
            Span::styled(
                truncate(value, rect.width.saturating_sub(4) as usize),
                slot_style(status),
            )
        };
        Paragraph::new(shown).block(block).render(*rect, buf);
    }
}

fn focus_marker(focused: bool) -> Span<'static> {
    if focused {
        Span::styled("▶ ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("  ")
    }
}

fn render_text_rows(
    app: &App,
    engine: &LevelEngine,
    layout: &PlayLayout,
    phrase: &str,
    buf: &mut Buffer,
) {
    let focus = app.interaction.focus;

    if let Some(rect) = layout.phrase {
        let mut spans = vec![
            focus_marker(focus == Focus::Phrase),
            Span::styled("Copy this text: ", bold()),
            Span::styled(phrase.to_string(), bold().fg(Color::Cyan)),
        ];
        if app.interaction.text_clipboard.is_some() {
            spans.push(Span::styled(" (copied)", dim()));
        }
        Paragraph::new(Line::from(spans)).render(rect, buf);
    }

    for (slot, rect) in layout.slots.iter().enumerate() {
        let status = engine.slot_status(slot).unwrap_or(SlotStatus::Empty);
        let value = engine.slot_value(slot).unwrap_or_default();
        let focused = focus == Focus::Slot(slot);

        let label = if status == SlotStatus::Correct {
            format!("Box {} ✓: ", slot + 1)
        } else {
            format!("Box {}: ", slot + 1)
        };
        let room = (rect.width as usize).saturating_sub(label.width() + 2);
        let shown = if value.is_empty() && focused {
            Span::styled("Paste here…", dim())
        } else {
            Span::styled(truncate(value, room), slot_style(status))
        };
        let label_style = if focused {
            bold().fg(Color::Yellow)
        } else {
            slot_style(status)
        };
        Paragraph::new(Line::from(vec![
            focus_marker(focused),
            Span::styled(label, label_style),
            shown,
        ]))
        .render(*rect, buf);
    }
}

fn render_files(
    app: &App,
    engine: &LevelEngine,
    layout: &PlayLayout,
    names: &[String],
    buf: &mut Buffer,
) {
    let kind = engine.definition().kind();
    let selected = app.interaction.selected_item;
    let dragging = app.interaction.drag.map(|d| d.item);

    for (item, rect) in &layout.items {
        let Some(name) = names.get(*item) else {
            continue;
        };
        let done = engine.is_item_done(*item);
        let copied = engine.clipboard() == Some(*item);

        let (icon, style) = match (done, copied) {
            (true, _) => ("✓", success()),
            (false, true) => ("📋", bold().fg(Color::Yellow)),
            (false, false) => ("📄", bold()),
        };
        let border = if dragging == Some(*item) {
            dim()
        } else if *item == selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let width = rect.width.saturating_sub(5) as usize;
        Paragraph::new(Span::styled(format!("{icon} {}", truncate(name, width)), style))
            .block(Block::bordered().border_type(BorderType::Rounded).border_style(border))
            .render(*rect, buf);
    }

    if let Some(folder) = layout.folder {
        let hovering = app
            .interaction
            .drag
            .is_some_and(|d| contains(folder, d.column, d.row));
        let (title, empty) = match kind {
            LevelKind::FileCopy => (" 💾 Backup Folder ", "Right-click here to paste"),
            _ => (" 📁 My Folder ", "Drop files here"),
        };

        let mut lines: Vec<Line> = names
            .iter()
            .enumerate()
            .filter(|(item, _)| engine.is_item_done(*item))
            .map(|(_, name)| Line::from(Span::styled(format!("✓ {name}"), success())))
            .collect();
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(empty, dim())));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_type(BorderType::Double)
                    .border_style(if hovering {
                        bold().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::Blue)
                    })
                    .title(Span::styled(title, bold()))
                    .title_bottom(format!(
                        " {}/{} files ",
                        engine.done(),
                        engine.definition().challenge.total()
                    )),
            )
            .render(folder, buf);
    }

    if let Some(drag) = app.interaction.drag {
        if let Some(name) = names.get(drag.item) {
            let label = format!("📄 {name}");
            let width = (label.width() as u16 + 2).min(30);
            let ghost = Rect::new(drag.column, drag.row, width, 3).intersection(*buf.area());
            Clear.render(ghost, buf);
            Paragraph::new(Span::styled(label, bold().fg(Color::Yellow)))
                .block(Block::bordered().border_style(Style::default().fg(Color::Yellow)))
                .render(ghost, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::AppEvent;
    use crate::ui::tests::{rendered, test_app};
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use std::time::Duration;

    fn area() -> Rect {
        Rect::new(0, 0, 100, 40)
    }

    fn started(id: u8) -> App {
        let mut app = test_app();
        app.select_level(id);
        app.handle_event(AppEvent::Key(KeyEvent::from(KeyCode::Enter)));
        app.handle_event(AppEvent::Key(KeyEvent::from(KeyCode::Enter)));
        app
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> AppEvent {
        AppEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn text_level_shows_phrase_slots_and_timer() {
        let app = started(2);
        let text = rendered(&app, area());
        assert!(text.contains("Good Morning"));
        assert!(text.contains("Box 5"));
        assert!(text.contains("30 seconds"));
        assert!(text.contains("0/5 done"));
    }

    #[test]
    fn correct_slot_is_marked() {
        let mut app = started(1);
        app.handle_event(AppEvent::Paste("Hello World".into()));
        let text = rendered(&app, area());
        assert!(text.contains("Box 1 ✓"));
        assert!(text.contains("1/5 done"));
    }

    #[test]
    fn every_box_value_is_drawn_on_small_screens() {
        let mut app = started(1);
        for value in ["Hello World", "Hello World", "Hello World", "Hello World", "Hello"] {
            app.handle_event(AppEvent::Paste(value.into()));
            app.handle_event(AppEvent::Key(KeyEvent::from(KeyCode::Tab)));
        }
        assert_eq!(app.engine().unwrap().done(), 4);

        for area in [Rect::new(0, 0, 80, 24), Rect::new(0, 0, 40, 16)] {
            let layout = PlayLayout::compute(area, app.engine().unwrap());
            let text = rendered(&app, area);
            let rows: Vec<&str> = text.lines().collect();
            for (i, slot) in layout.slots.iter().enumerate() {
                let row = rows[slot.y as usize];
                assert!(row.contains(&format!("Box {}", i + 1)), "{row}");
                let value = if i < 4 { "Hello World" } else { "Hello" };
                assert!(row.contains(value), "{row}");
            }
        }
    }

    #[test]
    fn timer_counts_down_on_screen() {
        let mut app = started(3);
        app.elapse(Duration::from_secs(4));
        assert!(rendered(&app, area()).contains("11 seconds"));
    }

    #[test]
    fn dropped_files_move_to_folder() {
        let mut app = started(4);
        app.handle_event(AppEvent::Key(KeyEvent::from(KeyCode::Enter)));
        let text = rendered(&app, area());
        assert!(text.contains("✓ Letter.txt"));
        assert!(text.contains("1/10 files"));
    }

    #[test]
    fn backup_folder_context_menu_disabled_without_copy() {
        let mut app = started(6);
        let folder = PlayLayout::compute(app.area, app.engine().unwrap())
            .folder
            .unwrap();
        app.handle_event(mouse(
            MouseEventKind::Down(MouseButton::Right),
            folder.x + 2,
            folder.y + 2,
        ));
        let text = rendered(&app, area());
        assert!(text.contains("Paste (No files copied)"));
    }

    #[test]
    fn drag_shows_ghost_under_pointer() {
        let mut app = started(5);
        let layout = PlayLayout::compute(app.area, app.engine().unwrap());
        let (_, rect) = layout.items[0];
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), rect.x + 1, rect.y + 1));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 30));
        let text = rendered(&app, area());
        assert!(text.lines().nth(31).unwrap_or_default().contains("Report.pdf"));
    }
}
