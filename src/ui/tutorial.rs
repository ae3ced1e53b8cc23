use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::engine::LevelEngine;
use crate::tutorial::{instructions, quick_tips, TutorialStep, VideoRef};
use crate::ui::layout::TutorialLayout;
use crate::ui::{accent, bold, dim, render_buttons, success};

pub fn render_tutorial(app: &App, engine: &LevelEngine, area: Rect, buf: &mut Buffer) {
    let step = engine.tutorial().step();
    let layout = TutorialLayout::compute(area, step);
    let definition = engine.definition();

    Clear.render(layout.panel, buf);
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(accent())
        .title(Span::styled(format!(" {} ", definition.heading()), bold()))
        .title_alignment(Alignment::Center)
        .render(layout.panel, buf);

    match step {
        TutorialStep::Text => {
            let [how, tips] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(5)]).areas(layout.body);

            let mut lines = vec![
                Line::from(Span::styled("How to Play", accent())),
                Line::from(""),
            ];
            for step in instructions(definition.kind()) {
                lines.push(Line::from(Span::styled(step.title, bold())));
                lines.push(Line::from(format!("   {}", step.body)));
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(definition.prompt(), dim())));
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .render(how, buf);

            let tip_lines: Vec<Line> = quick_tips(definition.kind())
                .iter()
                .map(|tip| Line::from(format!("• {tip}")))
                .collect();
            Paragraph::new(tip_lines)
                .block(
                    Block::bordered()
                        .border_style(dim())
                        .title(Span::styled(" Quick Tips ", bold().fg(Color::Yellow))),
                )
                .render(tips, buf);
        }
        TutorialStep::Video => {
            let mut lines = vec![
                Line::from(Span::styled("Video Tutorial", accent())),
                Line::from(""),
            ];
            match app.video(definition.id) {
                VideoRef::Url(url) => {
                    lines.push(Line::from("Watch how it is done before you start:"));
                    lines.push(Line::from(Span::styled(
                        crate::tutorial::embed_url(&url),
                        bold().fg(Color::Blue),
                    )));
                    lines.push(Line::from(""));
                    if app.opens_videos() {
                        lines.push(Line::from(Span::styled(
                            "Click \"Open Video\" or press w to watch it in your browser",
                            dim(),
                        )));
                    }
                }
                VideoRef::Placeholder => {
                    lines.push(Line::from(Span::styled("▶  Video coming soon", dim())));
                    lines.push(Line::from(Span::styled(
                        "No video has been set up for this level yet",
                        dim(),
                    )));
                }
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "You will have {} seconds. Press \"Start Game!\" when you are ready.",
                    definition.duration_secs
                ),
                success(),
            )));
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(layout.body, buf);
        }
    }

    render_buttons(&layout.buttons, buf);
}
