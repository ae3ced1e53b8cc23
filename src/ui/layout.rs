//! Screen geometry shared by the renderers and the mouse handler, so a click
//! lands on exactly what was drawn there.

use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};

use crate::engine::{LevelEngine, Phase};
use crate::level::{Challenge, LevelKind};
use crate::tutorial::TutorialStep;

const ITEM_HEIGHT: u16 = 3;
const ITEM_COLUMNS: u16 = 2;
const MENU_WIDTH: u16 = 28;

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// A clickable control outside the play area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    BackToMenu,
    TutorialNext,
    TutorialBack,
    TutorialStart,
    OpenVideo,
    Continue,
    NextLevel,
    PlayAgain,
}

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::BackToMenu => "Back to Menu",
            Button::TutorialNext => "Next: Watch Video Tutorial",
            Button::TutorialBack => "Back to Text",
            Button::TutorialStart => "Start Game!",
            Button::OpenVideo => "Open Video",
            Button::Continue => "Continue",
            Button::NextLevel => "Next Level",
            Button::PlayAgain => "Play Again",
        }
    }
}

pub fn button_at(buttons: &[(Button, Rect)], column: u16, row: u16) -> Option<Button> {
    buttons
        .iter()
        .find(|(_, rect)| contains(*rect, column, row))
        .map(|(button, _)| *button)
}

fn button_row(area: Rect, buttons: &[Button]) -> Vec<(Button, Rect)> {
    if buttons.is_empty() {
        return Vec::new();
    }
    let cells = Layout::horizontal(vec![Constraint::Fill(1); buttons.len()])
        .spacing(2)
        .split(area);
    buttons.iter().copied().zip(cells.iter().copied()).collect()
}

pub struct MenuLayout {
    pub title: Rect,
    pub cards: Vec<Rect>,
    pub footer: Rect,
}

impl MenuLayout {
    pub fn compute(area: Rect, count: usize) -> Self {
        let [title, grid, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area.inner(Margin::new(2, 1)));

        let rows = count.div_ceil(ITEM_COLUMNS as usize).max(1);
        let row_areas = Layout::vertical(vec![Constraint::Fill(1); rows]).split(grid);
        let cards = row_areas
            .iter()
            .flat_map(|row| {
                Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)])
                    .spacing(2)
                    .split(*row)
                    .to_vec()
            })
            .take(count)
            .collect();

        Self {
            title,
            cards,
            footer,
        }
    }

    pub fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        self.cards
            .iter()
            .position(|card| contains(*card, column, row))
    }
}

pub struct TutorialLayout {
    pub panel: Rect,
    pub body: Rect,
    pub buttons: Vec<(Button, Rect)>,
}

impl TutorialLayout {
    pub fn compute(area: Rect, step: TutorialStep) -> Self {
        let panel = area.inner(Margin::new(4, 1));
        let [body, controls] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(panel.inner(Margin::new(2, 1)));
        let buttons = match step {
            TutorialStep::Text => vec![Button::TutorialNext],
            TutorialStep::Video => vec![Button::TutorialBack, Button::OpenVideo, Button::TutorialStart],
        };
        Self {
            panel,
            body,
            buttons: button_row(controls, &buttons),
        }
    }
}

/// What sits under the pointer during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Back,
    Phrase,
    Slot(usize),
    Item(usize),
    Folder,
}

pub struct PlayLayout {
    pub back: Rect,
    pub title: Rect,
    pub timer: Rect,
    pub prompt: Rect,
    pub phrase: Option<Rect>,
    pub slots: Vec<Rect>,
    pub items: Vec<(usize, Rect)>,
    pub folder: Option<Rect>,
    /// Text boxes drawn as single borderless rows because bordered ones do not fit.
    pub compact: bool,
}

impl PlayLayout {
    pub fn compute(area: Rect, engine: &LevelEngine) -> Self {
        let [header, timer, prompt, body] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area.inner(Margin::new(2, 0)));

        let [back, title] =
            Layout::horizontal([Constraint::Length(18), Constraint::Min(0)]).areas(header);

        let mut layout = Self {
            back,
            title,
            timer,
            prompt,
            phrase: None,
            slots: Vec::new(),
            items: Vec::new(),
            folder: None,
            compact: false,
        };

        match &engine.definition().challenge {
            Challenge::TextCopy { slots, .. } => {
                let boxed = ITEM_HEIGHT * (*slots as u16 + 1);
                layout.compact = body.height < boxed;
                let height = if layout.compact { 1 } else { ITEM_HEIGHT };
                let rows = Layout::vertical(vec![Constraint::Length(height); slots + 1])
                    .flex(Flex::Start)
                    .split(body);
                layout.phrase = rows.first().copied();
                layout.slots = rows.iter().skip(1).copied().collect();
            }
            Challenge::DragDrop { .. } | Challenge::FileCopy { .. } => {
                let [files, folder] =
                    Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                        .spacing(2)
                        .areas(body);
                // Moved files leave the grid; copied files stay with a checkmark
                let shown: Vec<usize> = match engine.definition().kind() {
                    LevelKind::DragDrop => engine.remaining_items(),
                    _ => (0..engine.definition().challenge.total()).collect(),
                };
                layout.items = item_grid(files, &shown);
                layout.folder = Some(folder);
            }
        }
        layout
    }

    pub fn target_at(&self, column: u16, row: u16) -> Option<Target> {
        if contains(self.back, column, row) {
            return Some(Target::Back);
        }
        if let Some(phrase) = self.phrase {
            if contains(phrase, column, row) {
                return Some(Target::Phrase);
            }
        }
        if let Some(slot) = self.slots.iter().position(|r| contains(*r, column, row)) {
            return Some(Target::Slot(slot));
        }
        if let Some((item, _)) = self.items.iter().find(|(_, r)| contains(*r, column, row)) {
            return Some(Target::Item(*item));
        }
        match self.folder {
            Some(folder) if contains(folder, column, row) => Some(Target::Folder),
            _ => None,
        }
    }

    pub fn item_rect(&self, item: usize) -> Option<Rect> {
        self.items
            .iter()
            .find(|(i, _)| *i == item)
            .map(|(_, rect)| *rect)
    }
}

fn item_grid(area: Rect, shown: &[usize]) -> Vec<(usize, Rect)> {
    let width = area.width / ITEM_COLUMNS;
    shown
        .iter()
        .enumerate()
        .filter_map(|(n, item)| {
            let col = n as u16 % ITEM_COLUMNS;
            let row = n as u16 / ITEM_COLUMNS;
            let y = area.y + row * ITEM_HEIGHT;
            if y + ITEM_HEIGHT > area.y + area.height {
                return None;
            }
            Some((
                *item,
                Rect::new(area.x + col * width, y, width.saturating_sub(1), ITEM_HEIGHT),
            ))
        })
        .collect()
}

/// One-entry context menu placed at the pointer, nudged back inside the
/// screen when it would overflow an edge.
pub fn context_menu_rect(area: Rect, column: u16, row: u16) -> Rect {
    let width = MENU_WIDTH.min(area.width);
    let height = 3.min(area.height);
    let right = area.x + area.width;
    let bottom = area.y + area.height;

    let x = if column + width > right {
        column.saturating_sub(width)
    } else {
        column
    };
    let y = if row + height > bottom {
        row.saturating_sub(height)
    } else {
        row
    };
    Rect::new(x.max(area.x), y.max(area.y), width, height)
}

pub struct ResultLayout {
    pub panel: Rect,
    pub message: Rect,
    pub buttons: Vec<(Button, Rect)>,
}

impl ResultLayout {
    pub fn compute(area: Rect, phase: Phase, has_next: bool) -> Self {
        let panel = area.inner(Margin::new(6, 3));
        let [message, controls] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(panel.inner(Margin::new(2, 1)));
        let buttons = match (phase, has_next) {
            (Phase::Succeeded, true) => vec![Button::Continue, Button::NextLevel, Button::PlayAgain],
            (Phase::Succeeded, false) => vec![Button::Continue, Button::PlayAgain],
            _ => vec![Button::PlayAgain, Button::BackToMenu],
        };
        Self {
            panel,
            message,
            buttons: button_row(controls, &buttons),
        }
    }
}
