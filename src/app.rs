//! Application shell: routes between the level menu and one active level,
//! owns the completion registry and translates terminal input into engine
//! actions.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::{debug, info, warn};
use ratatui::layout::Rect;

use crate::engine::{LevelEngine, Phase, Transition};
use crate::level::{self, LevelDefinition, LevelId, LevelKind};
use crate::registry::{CompletionRegistry, RegistryStore};
use crate::runtime::AppEvent;
use crate::tutorial::{TutorialStep, VideoRef, VideoTable};
use crate::ui::layout::{
    button_at, context_menu_rect, contains, Button, MenuLayout, PlayLayout, ResultLayout, Target,
    TutorialLayout,
};

#[derive(Debug)]
pub enum Route {
    Menu,
    Level(Box<LevelEngine>),
}

/// Where keyboard input goes on a text level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Phrase,
    Slot(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CopyPhrase,
    PasteSlot(usize),
    CopyFile(usize),
    PasteFolder,
}

impl MenuAction {
    pub fn label(self, enabled: bool) -> &'static str {
        match (self, enabled) {
            (MenuAction::CopyPhrase | MenuAction::CopyFile(_), _) => "📋 Copy",
            (MenuAction::PasteSlot(_) | MenuAction::PasteFolder, true) => "📄 Paste",
            (MenuAction::PasteSlot(_), false) => "📄 Paste (Nothing copied)",
            (MenuAction::PasteFolder, false) => "📄 Paste (No files copied)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMenu {
    pub action: MenuAction,
    pub enabled: bool,
    pub rect: Rect,
}

/// A file held by the left mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub item: usize,
    pub column: u16,
    pub row: u16,
}

/// Pointer and keyboard state of the current attempt. Reset with the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub focus: Focus,
    pub selected_item: usize,
    pub text_clipboard: Option<String>,
    pub drag: Option<Drag>,
    pub context_menu: Option<ContextMenu>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            focus: Focus::Slot(0),
            selected_item: 0,
            text_clipboard: None,
            drag: None,
            context_menu: None,
        }
    }
}

const DEFAULT_AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 100,
    height: 40,
};

pub struct App {
    levels: Vec<LevelDefinition>,
    pub route: Route,
    pub registry: CompletionRegistry,
    store: Box<dyn RegistryStore>,
    videos: VideoTable,
    open_videos: bool,
    pub menu_cursor: usize,
    pub interaction: Interaction,
    pub area: Rect,
    last_tick: Instant,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Box<dyn RegistryStore>, videos: VideoTable) -> Self {
        let registry = store.load();
        info!("Loaded {} completed level(s)", registry.len());
        Self {
            levels: level::catalog(),
            route: Route::Menu,
            registry,
            store,
            videos,
            open_videos: true,
            menu_cursor: 0,
            interaction: Interaction::default(),
            area: DEFAULT_AREA,
            last_tick: Instant::now(),
            should_quit: false,
        }
    }

    pub fn with_open_videos(mut self, open: bool) -> Self {
        self.open_videos = open;
        self
    }

    pub fn opens_videos(&self) -> bool {
        self.open_videos
    }

    pub fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }

    pub fn engine(&self) -> Option<&LevelEngine> {
        match &self.route {
            Route::Level(engine) => Some(engine.as_ref()),
            Route::Menu => None,
        }
    }

    /// Current level id, 0 for the menu.
    pub fn current_level(&self) -> LevelId {
        self.engine().map(LevelEngine::level_id).unwrap_or(0)
    }

    pub fn video(&self, id: LevelId) -> VideoRef {
        self.videos.resolve(id)
    }

    pub fn reset_progress(&mut self) {
        self.registry.clear();
        self.persist();
    }

    pub fn select_level(&mut self, id: LevelId) {
        let Some(definition) = self.levels.iter().find(|l| l.id == id).cloned() else {
            warn!("Ignoring unknown level {id}");
            return;
        };
        if let Some(pos) = self.levels.iter().position(|l| l.id == id) {
            self.menu_cursor = pos;
        }
        info!("Entering {}", definition.heading());
        self.interaction = Interaction::default();
        self.route = Route::Level(Box::new(LevelEngine::new(definition)));
    }

    pub fn back_to_menu(&mut self) {
        if let Route::Level(engine) = std::mem::replace(&mut self.route, Route::Menu) {
            let id = (*engine).back();
            debug!("Back to menu from level {id}");
        }
        self.interaction = Interaction::default();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.registry) {
            warn!("Could not save progress: {e}");
        }
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Started => self.interaction = Interaction::default(),
            Transition::Succeeded(id) => {
                self.interaction.drag = None;
                self.interaction.context_menu = None;
                if self.registry.record(id) {
                    self.persist();
                }
            }
            Transition::Failed => {
                self.interaction.drag = None;
                self.interaction.context_menu = None;
            }
        }
    }

    fn with_engine(&mut self, f: impl FnOnce(&mut LevelEngine) -> Transition) {
        let transition = match &mut self.route {
            Route::Level(engine) => f(engine.as_mut()),
            Route::Menu => Transition::None,
        };
        self.apply(transition);
    }

    /// Feeds real elapsed time to the active level. Returns true when this
    /// ran the countdown out.
    pub fn elapse(&mut self, elapsed: Duration) -> bool {
        let transition = match &mut self.route {
            Route::Level(engine) => engine.advance(elapsed),
            Route::Menu => Transition::None,
        };
        let expired = transition == Transition::Failed;
        self.apply(transition);
        expired
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        self.handle_event_at(event, Instant::now());
    }

    /// Every event first settles the time passed since the previous one, so a
    /// steady stream of input cannot hold the countdown back. Input that
    /// arrives after the deadline is dropped.
    pub fn handle_event_at(&mut self, event: AppEvent, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        if self.elapse(elapsed) {
            debug!("Dropping {event:?} that arrived after the deadline");
            return;
        }
        match event {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Mouse(mouse) => self.on_mouse(mouse),
            AppEvent::Paste(text) => self.on_paste(&text),
        }
    }

    fn phase(&self) -> Option<Phase> {
        self.engine().map(LevelEngine::phase)
    }

    fn press(&mut self, button: Button) {
        match button {
            Button::BackToMenu | Button::Continue => self.back_to_menu(),
            Button::TutorialNext => self.with_tutorial(|t| t.next()),
            Button::TutorialBack => self.with_tutorial(|t| t.back()),
            Button::TutorialStart => self.with_engine(LevelEngine::start),
            Button::OpenVideo => self.open_video(),
            Button::NextLevel => {
                if let Some(next) = level::next_level(self.current_level()) {
                    self.select_level(next);
                }
            }
            Button::PlayAgain => self.with_engine(LevelEngine::restart),
        }
    }

    fn with_tutorial(&mut self, f: impl FnOnce(&mut crate::tutorial::Tutorial)) {
        if let Route::Level(engine) = &mut self.route {
            f(engine.tutorial_mut());
        }
    }

    fn open_video(&self) {
        if !self.open_videos {
            return;
        }
        let Some(url) = self.video(self.current_level()).embed_url() else {
            return;
        };
        if webbrowser::Browser::is_available() {
            if let Err(e) = webbrowser::open(&url) {
                warn!("Could not open {url}: {e}");
            }
        }
    }

    // ---------------- keyboard -----------------

    fn on_key(&mut self, key: KeyEvent) {
        match self.phase() {
            None => self.on_menu_key(key),
            Some(Phase::Tutorial) => self.on_tutorial_key(key),
            Some(Phase::Playing) => self.on_play_key(key),
            Some(Phase::Succeeded) | Some(Phase::Failed) => self.on_result_key(key),
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent) {
        let count = self.levels.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Up => self.menu_cursor = self.menu_cursor.saturating_sub(2),
            KeyCode::Down => self.menu_cursor = (self.menu_cursor + 2).min(count - 1),
            KeyCode::Left => self.menu_cursor = self.menu_cursor.saturating_sub(1),
            KeyCode::Right | KeyCode::Tab => {
                self.menu_cursor = (self.menu_cursor + 1).min(count - 1)
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let id = self.levels[self.menu_cursor].id;
                self.select_level(id);
            }
            KeyCode::Char(c) => {
                if let Some(id) = c.to_digit(10) {
                    if level::is_valid_id(id as i64) {
                        self.select_level(id as LevelId);
                    }
                }
            }
            _ => {}
        }
    }

    fn on_tutorial_key(&mut self, key: KeyEvent) {
        let step = match self.engine() {
            Some(engine) => engine.tutorial().step(),
            None => return,
        };
        match (step, key.code) {
            (_, KeyCode::Esc) => self.back_to_menu(),
            (TutorialStep::Text, KeyCode::Enter | KeyCode::Right | KeyCode::Char('n')) => {
                self.press(Button::TutorialNext)
            }
            (TutorialStep::Video, KeyCode::Left | KeyCode::Backspace | KeyCode::Char('b')) => {
                self.press(Button::TutorialBack)
            }
            (TutorialStep::Video, KeyCode::Enter | KeyCode::Char('s')) => {
                self.press(Button::TutorialStart)
            }
            (TutorialStep::Video, KeyCode::Char('w')) => self.press(Button::OpenVideo),
            _ => {}
        }
    }

    fn on_result_key(&mut self, key: KeyEvent) {
        let won = self.phase() == Some(Phase::Succeeded);
        match key.code {
            KeyCode::Esc | KeyCode::Char('m') => self.back_to_menu(),
            KeyCode::Char('r') => self.press(Button::PlayAgain),
            KeyCode::Char('n') if won => self.press(Button::NextLevel),
            KeyCode::Enter | KeyCode::Char('c') if won => self.press(Button::Continue),
            KeyCode::Enter => self.press(Button::PlayAgain),
            _ => {}
        }
    }

    fn on_play_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            if self.interaction.context_menu.is_some() || self.interaction.drag.is_some() {
                self.interaction.context_menu = None;
                self.interaction.drag = None;
            } else {
                self.back_to_menu();
            }
            return;
        }
        if key.code == KeyCode::Enter && self.interaction.context_menu.is_some() {
            self.activate_context_menu();
            return;
        }

        let kind = match self.engine() {
            Some(engine) => engine.definition().kind(),
            None => return,
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match kind {
            LevelKind::TextCopy => self.on_text_key(key, ctrl),
            LevelKind::DragDrop => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let item = self.interaction.selected_item;
                    self.with_engine(|engine| engine.drop_item(item));
                    self.clamp_selection();
                }
                code => self.move_selection(code),
            },
            LevelKind::FileCopy => match key.code {
                KeyCode::Char('c') if ctrl => {
                    let item = self.interaction.selected_item;
                    self.with_engine(|engine| engine.copy(item));
                }
                KeyCode::Char('v') if ctrl => self.with_engine(LevelEngine::paste),
                code => self.move_selection(code),
            },
        }
    }

    fn on_text_key(&mut self, key: KeyEvent, ctrl: bool) {
        let slots = self
            .engine()
            .map(|e| e.definition().challenge.total())
            .unwrap_or(0);
        let focus = self.interaction.focus;
        match key.code {
            KeyCode::Char('c') if ctrl => {
                if focus == Focus::Phrase {
                    self.copy_phrase();
                }
            }
            KeyCode::Char('v') if ctrl => {
                if let (Focus::Slot(slot), Some(text)) =
                    (focus, self.interaction.text_clipboard.clone())
                {
                    self.append_to_slot(slot, &text);
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                self.interaction.focus = match focus {
                    Focus::Phrase => Focus::Slot(0),
                    Focus::Slot(i) if i + 1 < slots => Focus::Slot(i + 1),
                    Focus::Slot(_) => Focus::Phrase,
                };
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.interaction.focus = match focus {
                    Focus::Phrase => Focus::Slot(slots.saturating_sub(1)),
                    Focus::Slot(0) => Focus::Phrase,
                    Focus::Slot(i) => Focus::Slot(i - 1),
                };
            }
            KeyCode::Backspace => {
                if let Focus::Slot(slot) = focus {
                    let mut value = self.slot_value(slot);
                    value.pop();
                    self.with_engine(|engine| engine.set_input(slot, value));
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Focus::Slot(slot) = focus {
                    self.append_to_slot(slot, &c.to_string());
                }
            }
            _ => {}
        }
    }

    fn slot_value(&self, slot: usize) -> String {
        self.engine()
            .and_then(|e| e.slot_value(slot))
            .unwrap_or_default()
            .to_string()
    }

    fn append_to_slot(&mut self, slot: usize, text: &str) {
        let value = self.slot_value(slot) + text;
        self.with_engine(|engine| engine.set_input(slot, value));
    }

    fn copy_phrase(&mut self) {
        let phrase = self.engine().and_then(|engine| match &engine.definition().challenge {
            level::Challenge::TextCopy { phrase, .. } => Some(phrase.clone()),
            _ => None,
        });
        if phrase.is_some() {
            self.interaction.text_clipboard = phrase;
        }
    }

    fn on_paste(&mut self, text: &str) {
        if self.phase() != Some(Phase::Playing) {
            return;
        }
        if let Focus::Slot(slot) = self.interaction.focus {
            // Terminals may append a newline when pasting a whole line
            self.append_to_slot(slot, text.trim_end_matches(['\r', '\n']));
        }
    }

    fn visible_items(&self) -> Vec<usize> {
        match self.engine() {
            Some(engine) if engine.definition().kind() == LevelKind::DragDrop => {
                engine.remaining_items()
            }
            Some(engine) => (0..engine.definition().challenge.total()).collect(),
            None => Vec::new(),
        }
    }

    fn move_selection(&mut self, code: KeyCode) {
        let items = self.visible_items();
        if items.is_empty() {
            return;
        }
        let pos = items
            .iter()
            .position(|i| *i == self.interaction.selected_item)
            .unwrap_or(0);
        let last = items.len() - 1;
        let pos = match code {
            KeyCode::Left => pos.saturating_sub(1),
            KeyCode::Right | KeyCode::Tab => (pos + 1).min(last),
            KeyCode::Up => pos.saturating_sub(2),
            KeyCode::Down => (pos + 2).min(last),
            _ => pos,
        };
        self.interaction.selected_item = items[pos];
    }

    fn clamp_selection(&mut self) {
        let items = self.visible_items();
        if !items.contains(&self.interaction.selected_item) {
            if let Some(first) = items.first() {
                self.interaction.selected_item = *first;
            }
        }
    }

    // ---------------- mouse -----------------

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if crate::ui::too_small(self.area) {
            return;
        }
        let (column, row) = (mouse.column, mouse.row);
        match self.phase() {
            None => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    let layout = MenuLayout::compute(self.area, self.levels.len());
                    if let Some(card) = layout.card_at(column, row) {
                        let id = self.levels[card].id;
                        self.select_level(id);
                    }
                }
            }
            Some(Phase::Tutorial) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    let step = self
                        .engine()
                        .map(|e| e.tutorial().step())
                        .unwrap_or(TutorialStep::Text);
                    let layout = TutorialLayout::compute(self.area, step);
                    if let Some(button) = button_at(&layout.buttons, column, row) {
                        self.press(button);
                    }
                }
            }
            Some(phase @ (Phase::Succeeded | Phase::Failed)) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    let has_next = level::next_level(self.current_level()).is_some();
                    let layout = ResultLayout::compute(self.area, phase, has_next);
                    if let Some(button) = button_at(&layout.buttons, column, row) {
                        self.press(button);
                    }
                }
            }
            Some(Phase::Playing) => self.on_play_mouse(mouse),
        }
    }

    fn on_play_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        let Some(engine) = self.engine() else {
            return;
        };
        let kind = engine.definition().kind();
        let file_copied = engine.clipboard().is_some();
        let target = PlayLayout::compute(self.area, engine).target_at(column, row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(menu) = self.interaction.context_menu.take() {
                    if contains(menu.rect, column, row) {
                        self.interaction.context_menu = Some(menu);
                        self.activate_context_menu();
                    }
                    return;
                }
                match target {
                    Some(Target::Back) => self.back_to_menu(),
                    Some(Target::Phrase) => self.interaction.focus = Focus::Phrase,
                    Some(Target::Slot(slot)) => self.interaction.focus = Focus::Slot(slot),
                    Some(Target::Item(item)) => {
                        self.interaction.selected_item = item;
                        if kind == LevelKind::DragDrop {
                            self.interaction.drag = Some(Drag { item, column, row });
                        }
                    }
                    Some(Target::Folder) | None => {}
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = &mut self.interaction.drag {
                    drag.column = column;
                    drag.row = row;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(drag) = self.interaction.drag.take() {
                    if target == Some(Target::Folder) {
                        self.with_engine(|engine| engine.drop_item(drag.item));
                        self.clamp_selection();
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                let action = match target {
                    Some(Target::Phrase) => Some(MenuAction::CopyPhrase),
                    Some(Target::Slot(slot)) => Some(MenuAction::PasteSlot(slot)),
                    Some(Target::Item(item)) if kind == LevelKind::FileCopy => {
                        Some(MenuAction::CopyFile(item))
                    }
                    Some(Target::Folder) if kind == LevelKind::FileCopy => {
                        Some(MenuAction::PasteFolder)
                    }
                    _ => None,
                };
                let text_copied = self.interaction.text_clipboard.is_some();
                let area = self.area;
                self.interaction.context_menu = action.map(|action| {
                    let enabled = match action {
                        MenuAction::PasteSlot(_) => text_copied,
                        MenuAction::PasteFolder => file_copied,
                        MenuAction::CopyPhrase | MenuAction::CopyFile(_) => true,
                    };
                    ContextMenu {
                        action,
                        enabled,
                        rect: context_menu_rect(area, column, row),
                    }
                });
                match target {
                    Some(Target::Slot(slot)) => self.interaction.focus = Focus::Slot(slot),
                    Some(Target::Phrase) => self.interaction.focus = Focus::Phrase,
                    Some(Target::Item(item)) => self.interaction.selected_item = item,
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn activate_context_menu(&mut self) {
        let Some(menu) = self.interaction.context_menu.take() else {
            return;
        };
        if !menu.enabled {
            return;
        }
        match menu.action {
            MenuAction::CopyPhrase => self.copy_phrase(),
            MenuAction::PasteSlot(slot) => {
                if let Some(text) = self.interaction.text_clipboard.clone() {
                    self.append_to_slot(slot, &text);
                }
            }
            MenuAction::CopyFile(item) => self.with_engine(|engine| engine.copy(item)),
            MenuAction::PasteFolder => self.with_engine(LevelEngine::paste),
        }
    }
}
