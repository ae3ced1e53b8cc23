//! Level engine: one play session for one level definition.
//!
//! The engine owns the tutorial, the countdown and the player's progress, and
//! walks `Tutorial -> Playing -> Succeeded | Failed`. Every leave from
//! `Playing` goes through [`LevelEngine::finish`], which cancels the countdown
//! in the same call that sets the terminal phase, so an expiry can never land
//! after a success.

use std::collections::BTreeSet;
use std::time::Duration;

use log::{debug, info};

use crate::level::{Challenge, LevelDefinition, LevelId};
use crate::timer::Countdown;
use crate::tutorial::{Tutorial, TutorialComplete};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tutorial,
    Playing,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

/// What an action did to the session; the owner reacts to it synchronously.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Started,
    Succeeded(LevelId),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Empty,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    TextCopy {
        inputs: Vec<String>,
    },
    DragDrop {
        dropped: BTreeSet<usize>,
    },
    FileCopy {
        clipboard: Option<usize>,
        pasted: BTreeSet<usize>,
    },
}

impl Progress {
    pub fn empty_for(challenge: &Challenge) -> Self {
        match challenge {
            Challenge::TextCopy { slots, .. } => Progress::TextCopy {
                inputs: vec![String::new(); *slots],
            },
            Challenge::DragDrop { .. } => Progress::DragDrop {
                dropped: BTreeSet::new(),
            },
            Challenge::FileCopy { .. } => Progress::FileCopy {
                clipboard: None,
                pasted: BTreeSet::new(),
            },
        }
    }

    /// Number of slots, items or files already done.
    pub fn done(&self, challenge: &Challenge) -> usize {
        match (self, challenge) {
            (Progress::TextCopy { inputs }, Challenge::TextCopy { phrase, .. }) => {
                inputs.iter().filter(|input| *input == phrase).count()
            }
            (Progress::DragDrop { dropped }, _) => dropped.len(),
            (Progress::FileCopy { pasted, .. }, _) => pasted.len(),
            _ => 0,
        }
    }

    /// Completion predicate for the level's kind.
    pub fn is_complete(&self, challenge: &Challenge) -> bool {
        match (self, challenge) {
            (Progress::TextCopy { inputs }, Challenge::TextCopy { phrase, slots }) => {
                inputs.len() == *slots && inputs.iter().all(|input| input == phrase)
            }
            (Progress::DragDrop { dropped }, Challenge::DragDrop { items }) => {
                dropped.len() == items.len()
            }
            (Progress::FileCopy { pasted, .. }, Challenge::FileCopy { files }) => {
                pasted.len() == files.len()
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LevelEngine {
    definition: LevelDefinition,
    phase: Phase,
    tutorial: Tutorial,
    countdown: Countdown,
    progress: Progress,
}

impl LevelEngine {
    pub fn new(definition: LevelDefinition) -> Self {
        let countdown = Countdown::new(definition.duration_secs);
        let progress = Progress::empty_for(&definition.challenge);
        Self {
            definition,
            phase: Phase::Tutorial,
            tutorial: Tutorial::new(),
            countdown,
            progress,
        }
    }

    pub fn definition(&self) -> &LevelDefinition {
        &self.definition
    }

    pub fn level_id(&self) -> LevelId {
        self.definition.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tutorial(&self) -> &Tutorial {
        &self.tutorial
    }

    pub fn tutorial_mut(&mut self) -> &mut Tutorial {
        &mut self.tutorial
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.countdown.seconds_remaining()
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn done(&self) -> usize {
        self.progress.done(&self.definition.challenge)
    }

    /// Presses Start on the tutorial and enters play.
    pub fn start(&mut self) -> Transition {
        if self.phase != Phase::Tutorial {
            return Transition::None;
        }
        match self.tutorial.start() {
            Some(TutorialComplete) => {
                self.enter_play();
                Transition::Started
            }
            None => Transition::None,
        }
    }

    /// Re-enters play with fresh progress and a fresh countdown.
    pub fn restart(&mut self) -> Transition {
        if !self.phase.is_terminal() {
            return Transition::None;
        }
        info!("Restarting level {}", self.definition.id);
        self.enter_play();
        Transition::Started
    }

    /// Leaves the session for the menu. The countdown is cancelled first so a
    /// dropped session can never expire.
    pub fn back(mut self) -> LevelId {
        self.countdown.cancel();
        debug!("Leaving level {} from {:?}", self.definition.id, self.phase);
        self.definition.id
    }

    fn enter_play(&mut self) {
        self.progress = Progress::empty_for(&self.definition.challenge);
        self.countdown.start(self.definition.duration_secs);
        self.phase = Phase::Playing;
        info!(
            "Level {} started with {}s on the clock",
            self.definition.id, self.definition.duration_secs
        );
    }

    /// The single exit from `Playing`.
    fn finish(&mut self, phase: Phase) -> Transition {
        debug_assert!(phase.is_terminal());
        self.countdown.cancel();
        self.phase = phase;
        match phase {
            Phase::Succeeded => {
                info!(
                    "Level {} completed with {}s left",
                    self.definition.id,
                    self.countdown.seconds_remaining()
                );
                Transition::Succeeded(self.definition.id)
            }
            _ => {
                info!(
                    "Level {} failed: time ran out at {}/{}",
                    self.definition.id,
                    self.done(),
                    self.definition.challenge.total()
                );
                Transition::Failed
            }
        }
    }

    fn evaluate(&mut self) -> Transition {
        if self.progress.is_complete(&self.definition.challenge) {
            self.finish(Phase::Succeeded)
        } else {
            Transition::None
        }
    }

    /// One whole second of play time.
    pub fn tick(&mut self) -> Transition {
        if self.phase != Phase::Playing {
            return Transition::None;
        }
        match self.countdown.tick() {
            Some(_) => self.finish(Phase::Failed),
            None => Transition::None,
        }
    }

    /// Wall-clock time since the last call.
    pub fn advance(&mut self, elapsed: Duration) -> Transition {
        if self.phase != Phase::Playing {
            return Transition::None;
        }
        match self.countdown.advance(elapsed) {
            Some(_) => self.finish(Phase::Failed),
            None => Transition::None,
        }
    }

    /// Overwrites one text slot and checks for completion.
    pub fn set_input(&mut self, slot: usize, value: impl Into<String>) -> Transition {
        if self.phase != Phase::Playing {
            return Transition::None;
        }
        let Progress::TextCopy { inputs } = &mut self.progress else {
            return Transition::None;
        };
        let Some(target) = inputs.get_mut(slot) else {
            return Transition::None;
        };
        *target = value.into();
        debug!("Slot {slot} now {target:?}");
        self.evaluate()
    }

    /// Moves an item into the folder; dropping it again changes nothing.
    pub fn drop_item(&mut self, item: usize) -> Transition {
        if self.phase != Phase::Playing || item >= self.definition.challenge.total() {
            return Transition::None;
        }
        let Progress::DragDrop { dropped } = &mut self.progress else {
            return Transition::None;
        };
        if !dropped.insert(item) {
            return Transition::None;
        }
        debug!("Dropped item {item}, {} in folder", dropped.len());
        self.evaluate()
    }

    /// Puts a file on the clipboard, replacing whatever was there.
    pub fn copy(&mut self, file: usize) -> Transition {
        if self.phase != Phase::Playing || file >= self.definition.challenge.total() {
            return Transition::None;
        }
        if let Progress::FileCopy { clipboard, .. } = &mut self.progress {
            *clipboard = Some(file);
            debug!("Copied file {file}");
        }
        Transition::None
    }

    /// Pastes the clipboard into the backup folder. Ignored when the clipboard
    /// is empty or holds a file that was already pasted.
    pub fn paste(&mut self) -> Transition {
        if self.phase != Phase::Playing {
            return Transition::None;
        }
        let Progress::FileCopy { clipboard, pasted } = &mut self.progress else {
            return Transition::None;
        };
        let Some(file) = *clipboard else {
            return Transition::None;
        };
        if pasted.contains(&file) {
            return Transition::None;
        }
        pasted.insert(file);
        *clipboard = None;
        debug!("Pasted file {file}, {} in backup", pasted.len());
        self.evaluate()
    }

    pub fn clipboard(&self) -> Option<usize> {
        match &self.progress {
            Progress::FileCopy { clipboard, .. } => *clipboard,
            _ => None,
        }
    }

    pub fn slot_status(&self, slot: usize) -> Option<SlotStatus> {
        let (Progress::TextCopy { inputs }, Challenge::TextCopy { phrase, .. }) =
            (&self.progress, &self.definition.challenge)
        else {
            return None;
        };
        inputs.get(slot).map(|input| {
            if input.is_empty() {
                SlotStatus::Empty
            } else if input == phrase {
                SlotStatus::Correct
            } else {
                SlotStatus::Incorrect
            }
        })
    }

    pub fn slot_value(&self, slot: usize) -> Option<&str> {
        match &self.progress {
            Progress::TextCopy { inputs } => inputs.get(slot).map(String::as_str),
            _ => None,
        }
    }

    /// Whether an item is already in the folder (drag levels) or backed up (file levels).
    pub fn is_item_done(&self, item: usize) -> bool {
        match &self.progress {
            Progress::DragDrop { dropped } => dropped.contains(&item),
            Progress::FileCopy { pasted, .. } => pasted.contains(&item),
            Progress::TextCopy { .. } => false,
        }
    }

    /// Items still waiting to be moved, by index into the challenge's entries.
    pub fn remaining_items(&self) -> Vec<usize> {
        (0..self.definition.challenge.entries().len())
            .filter(|item| !self.is_item_done(*item))
            .collect()
    }
}
