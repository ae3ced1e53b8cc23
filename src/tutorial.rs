use std::collections::BTreeMap;

use crate::level::{LevelId, LevelKind};

/// Marks a video table entry that has not been filled in yet.
pub const PLACEHOLDER_PREFIX: &str = "YOUR_YOUTUBE_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialStep {
    Text,
    Video,
}

/// Raised once when the player presses Start.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialComplete;

/// Two-step instruction flow shown before a level starts.
#[derive(Debug, Clone)]
pub struct Tutorial {
    step: TutorialStep,
    started: bool,
}

impl Default for Tutorial {
    fn default() -> Self {
        Self::new()
    }
}

impl Tutorial {
    pub fn new() -> Self {
        Self {
            step: TutorialStep::Text,
            started: false,
        }
    }

    pub fn step(&self) -> TutorialStep {
        self.step
    }

    pub fn next(&mut self) {
        if !self.started {
            self.step = TutorialStep::Video;
        }
    }

    pub fn back(&mut self) {
        if !self.started {
            self.step = TutorialStep::Text;
        }
    }

    pub fn start(&mut self) -> Option<TutorialComplete> {
        if self.started {
            return None;
        }
        self.started = true;
        Some(TutorialComplete)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstructionStep {
    pub title: &'static str,
    pub body: &'static str,
}

pub fn instructions(kind: LevelKind) -> &'static [InstructionStep] {
    match kind {
        LevelKind::TextCopy => &[
            InstructionStep {
                title: "Step 1: Select the Text",
                body: "Click the text box at the top to choose the text you want to copy",
            },
            InstructionStep {
                title: "Step 2: Copy the Text",
                body: "Press Ctrl + C, or right-click the text and choose \"Copy\"",
            },
            InstructionStep {
                title: "Step 3: Paste the Text",
                body: "Click an empty box, then press Ctrl + V, or right-click it and choose \"Paste\"",
            },
        ],
        LevelKind::DragDrop => &[
            InstructionStep {
                title: "Step 1: Click and Hold",
                body: "Click on a file and HOLD the mouse button down",
            },
            InstructionStep {
                title: "Step 2: Drag the File",
                body: "While holding the button, move the mouse to the folder",
            },
            InstructionStep {
                title: "Step 3: Release to Drop",
                body: "Release the mouse button when the file is over the folder",
            },
        ],
        LevelKind::FileCopy => &[
            InstructionStep {
                title: "Step 1: Right-Click File",
                body: "Right-click on a file to open the menu (the RIGHT mouse button)",
            },
            InstructionStep {
                title: "Step 2: Click \"Copy\"",
                body: "Click on \"Copy\" in the menu",
            },
            InstructionStep {
                title: "Step 3: Right-Click Folder",
                body: "Right-click on the \"Backup Folder\"",
            },
            InstructionStep {
                title: "Step 4: Click \"Paste\"",
                body: "Click \"Paste\" to copy the file into the folder",
            },
        ],
    }
}

pub fn quick_tips(kind: LevelKind) -> [&'static str; 3] {
    match kind {
        LevelKind::TextCopy => [
            "Select the text before copying it",
            "Use Ctrl+C to copy, Ctrl+V to paste",
            "Practice makes perfect!",
        ],
        LevelKind::DragDrop => [
            "Click and HOLD the mouse button",
            "Move the mouse while holding",
            "Release when over the target",
        ],
        LevelKind::FileCopy => [
            "Right-click means use the RIGHT mouse button",
            "Copy files first, then paste in folder",
            "Watch for the green checkmark!",
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoRef {
    Placeholder,
    Url(String),
}

impl VideoRef {
    pub fn from_configured(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.contains(PLACEHOLDER_PREFIX) {
            VideoRef::Placeholder
        } else {
            VideoRef::Url(raw.to_string())
        }
    }

    pub fn embed_url(&self) -> Option<String> {
        match self {
            VideoRef::Placeholder => None,
            VideoRef::Url(url) => Some(embed_url(url)),
        }
    }
}

/// Rewrites YouTube watch and short links into embed links. Anything else is
/// returned as given.
pub fn embed_url(url: &str) -> String {
    if url.contains("embed") {
        return url.to_string();
    }

    let id = url
        .split_once("youtube.com/watch?v=")
        .or_else(|| url.split_once("youtu.be/"))
        .map(|(_, rest)| rest.split(['&', '?', ' ']).next().unwrap_or_default())
        .filter(|id| !id.is_empty());

    match id {
        Some(id) => format!("https://www.youtube.com/embed/{id}"),
        None => url.to_string(),
    }
}

/// Level id to tutorial video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTable {
    entries: BTreeMap<LevelId, VideoRef>,
}

impl Default for VideoTable {
    fn default() -> Self {
        let defaults = [
            (1, "https://youtu.be/QW8wNjq0B0I"),
            (2, "https://youtu.be/_kxR4tb4LUg"),
            (3, "https://youtu.be/nVGl5qBsaGc"),
            (4, "https://youtu.be/EdzL9dgzWEg"),
            (5, "https://youtu.be/zFfg7iYb1BA"),
            (6, "https://youtu.be/DfGgL3VocCY"),
        ];
        Self {
            entries: defaults
                .into_iter()
                .map(|(id, url)| (id, VideoRef::from_configured(url)))
                .collect(),
        }
    }
}

impl VideoTable {
    pub fn with_overrides(overrides: &BTreeMap<LevelId, String>) -> Self {
        let mut table = Self::default();
        for (id, raw) in overrides {
            table.entries.insert(*id, VideoRef::from_configured(raw));
        }
        table
    }

    pub fn resolve(&self, id: LevelId) -> VideoRef {
        self.entries
            .get(&id)
            .cloned()
            .unwrap_or(VideoRef::Placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_then_video_then_back() {
        let mut tutorial = Tutorial::new();
        assert_eq!(tutorial.step(), TutorialStep::Text);
        tutorial.next();
        assert_eq!(tutorial.step(), TutorialStep::Video);
        tutorial.back();
        assert_eq!(tutorial.step(), TutorialStep::Text);
    }

    #[test]
    fn start_signals_exactly_once() {
        let mut tutorial = Tutorial::new();
        tutorial.next();
        assert_eq!(tutorial.start(), Some(TutorialComplete));
        assert_eq!(tutorial.start(), None);
        assert_eq!(tutorial.start(), None);
    }

    #[test]
    fn every_kind_has_instructions_and_tips() {
        for kind in [LevelKind::TextCopy, LevelKind::DragDrop, LevelKind::FileCopy] {
            assert!(instructions(kind).len() >= 3);
            assert!(quick_tips(kind).iter().all(|tip| !tip.is_empty()));
        }
        assert_eq!(instructions(LevelKind::FileCopy).len(), 4);
    }

    #[test]
    fn placeholder_detection() {
        assert_eq!(
            VideoRef::from_configured("YOUR_YOUTUBE_URL_FOR_LEVEL_1"),
            VideoRef::Placeholder
        );
        assert_eq!(VideoRef::from_configured("   "), VideoRef::Placeholder);
        assert_eq!(
            VideoRef::from_configured("https://youtu.be/abc"),
            VideoRef::Url("https://youtu.be/abc".into())
        );
    }

    #[test]
    fn embed_url_normalisation() {
        assert_eq!(
            embed_url("https://youtu.be/QW8wNjq0B0I"),
            "https://www.youtube.com/embed/QW8wNjq0B0I"
        );
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=abc123&t=10"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            embed_url("https://www.youtube.com/embed/xyz"),
            "https://www.youtube.com/embed/xyz"
        );
        assert_eq!(embed_url("https://example.com/v.mp4"), "https://example.com/v.mp4");
    }

    #[test]
    fn table_resolves_defaults_and_overrides() {
        let table = VideoTable::default();
        assert!(matches!(table.resolve(1), VideoRef::Url(_)));
        assert_eq!(table.resolve(42), VideoRef::Placeholder);

        let overrides = BTreeMap::from([(2, "YOUR_YOUTUBE_URL_FOR_LEVEL_2".to_string())]);
        let table = VideoTable::with_overrides(&overrides);
        assert_eq!(table.resolve(2), VideoRef::Placeholder);
        assert!(matches!(table.resolve(3), VideoRef::Url(_)));
    }
}
