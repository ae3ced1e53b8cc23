use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{App, Route};
use crate::engine::Phase;
use crate::ui::{menu, play, results, tutorial};

/// A UI Screen boundary: draws one route of the app into the frame.
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Level selection grid
pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        menu::render_menu(app, area, buf);
    }
}

/// Two-step tutorial shown before every level
pub struct TutorialScreen;

impl Screen for TutorialScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(engine) = app.engine() {
            tutorial::render_tutorial(app, engine, area, buf);
        }
    }
}

pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(engine) = app.engine() {
            play::render_play(app, engine, area, buf);
        }
    }
}

/// Success or failure overlay on top of the finished board
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(engine) = app.engine() {
            play::render_play(app, engine, area, buf);
            results::render_results(engine, area, buf);
        }
    }
}

/// Helper to construct the appropriate screen for the current route
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    match &app.route {
        Route::Menu => Box::new(MenuScreen),
        Route::Level(engine) => match engine.phase() {
            Phase::Tutorial => Box::new(TutorialScreen),
            Phase::Playing => Box::new(PlayScreen),
            Phase::Succeeded | Phase::Failed => Box::new(ResultsScreen),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::tests::{rendered, test_app};
    use crate::runtime::AppEvent;
    use crossterm::event::{KeyCode, KeyEvent};
    use std::time::Duration;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 40,
    };

    #[test]
    fn screen_follows_route_and_phase() {
        let mut app = test_app();
        assert!(rendered(&app, AREA).contains("Choose a Level"));

        app.select_level(3);
        assert!(rendered(&app, AREA).contains("Step 1"));

        let enter = AppEvent::Key(KeyEvent::from(KeyCode::Enter));
        app.handle_event(enter.clone());
        assert!(rendered(&app, AREA).contains("Video Tutorial"));
        app.handle_event(enter);
        assert!(rendered(&app, AREA).contains("Thank You"));

        app.elapse(Duration::from_secs(15));
        assert!(rendered(&app, AREA).contains("Time's Up"));
    }
}
