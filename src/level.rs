//! Level catalog: the six exercises and what each one asks of the player.

pub type LevelId = u8;

pub const FIRST_LEVEL: LevelId = 1;
pub const LAST_LEVEL: LevelId = 6;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum LevelKind {
    #[strum(serialize = "Copy & Paste")]
    TextCopy,
    #[strum(serialize = "Drag & Drop")]
    DragDrop,
    #[strum(serialize = "Copy Files")]
    FileCopy,
}

/// What the player has to do to finish a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
    /// Paste `phrase` into every one of `slots` input boxes.
    TextCopy { phrase: String, slots: usize },
    /// Drag every item into the folder.
    DragDrop { items: Vec<String> },
    /// Copy every file and paste it into the backup folder.
    FileCopy { files: Vec<String> },
}

impl Challenge {
    pub fn kind(&self) -> LevelKind {
        match self {
            Challenge::TextCopy { .. } => LevelKind::TextCopy,
            Challenge::DragDrop { .. } => LevelKind::DragDrop,
            Challenge::FileCopy { .. } => LevelKind::FileCopy,
        }
    }

    /// Number of things to finish: slots, items or files.
    pub fn total(&self) -> usize {
        match self {
            Challenge::TextCopy { slots, .. } => *slots,
            Challenge::DragDrop { items } => items.len(),
            Challenge::FileCopy { files } => files.len(),
        }
    }

    /// Display names of the draggable/copyable entries; empty for text levels.
    pub fn entries(&self) -> &[String] {
        match self {
            Challenge::TextCopy { .. } => &[],
            Challenge::DragDrop { items } => items,
            Challenge::FileCopy { files } => files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDefinition {
    pub id: LevelId,
    pub title: String,
    pub description: String,
    pub duration_secs: u32,
    pub challenge: Challenge,
}

impl LevelDefinition {
    pub fn kind(&self) -> LevelKind {
        self.challenge.kind()
    }

    /// Headline shown in the menu and above the play area.
    pub fn heading(&self) -> String {
        format!("Level {}: {}", self.id, self.title)
    }

    /// Short instruction line shown above the play area.
    pub fn prompt(&self) -> String {
        match &self.challenge {
            Challenge::TextCopy { slots, .. } => {
                format!("Copy the text below and paste it into all {slots} boxes")
            }
            Challenge::DragDrop { items } => {
                format!("Drag all {} files into the folder", items.len())
            }
            Challenge::FileCopy { .. } => {
                "Right-click a file to copy it, then right-click the Backup Folder to paste".into()
            }
        }
    }

    /// Encouragement shown on the failure screen, with progress where it helps.
    pub fn failure_message(&self, done: usize) -> String {
        match self.kind() {
            LevelKind::TextCopy => "Don't worry, practice makes perfect!".into(),
            LevelKind::DragDrop => format!(
                "You moved {}/{} files. Try again!",
                done,
                self.challenge.total()
            ),
            LevelKind::FileCopy => format!(
                "You copied {}/{} files. Try again!",
                done,
                self.challenge.total()
            ),
        }
    }
}

const TEXT_SLOTS: usize = 5;

const MOVE_FILES: [&str; 10] = [
    "Letter.txt",
    "Photo.jpg",
    "Recipe.doc",
    "Notes.txt",
    "Budget.xls",
    "Song.mp3",
    "Video.mp4",
    "Address.txt",
    "List.doc",
    "Memo.txt",
];

const SPEED_FILES: [&str; 10] = [
    "Report.pdf",
    "Picture.png",
    "Invoice.doc",
    "Data.xls",
    "Music.mp3",
    "Movie.avi",
    "Email.txt",
    "Form.pdf",
    "Plan.doc",
    "Info.txt",
];

const BACKUP_FILES: [&str; 3] = ["Important.doc", "Family.jpg", "Contact.txt"];

fn text_level(id: LevelId, title: &str, description: &str, secs: u32, phrase: &str) -> LevelDefinition {
    LevelDefinition {
        id,
        title: title.into(),
        description: description.into(),
        duration_secs: secs,
        challenge: Challenge::TextCopy {
            phrase: phrase.into(),
            slots: TEXT_SLOTS,
        },
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// The built-in levels, in menu order.
pub fn catalog() -> Vec<LevelDefinition> {
    vec![
        text_level(
            1,
            "Copy & Paste Basics",
            "Learn to copy and paste text",
            60,
            "Hello World",
        ),
        text_level(
            2,
            "Copy & Paste Practice",
            "Get faster at copying",
            30,
            "Good Morning",
        ),
        text_level(
            3,
            "Copy & Paste Expert",
            "Master copy and paste",
            15,
            "Thank You",
        ),
        LevelDefinition {
            id: 4,
            title: "Drag & Drop Basics".into(),
            description: "Learn to drag and drop files".into(),
            duration_secs: 30,
            challenge: Challenge::DragDrop {
                items: names(&MOVE_FILES),
            },
        },
        LevelDefinition {
            id: 5,
            title: "Drag & Drop Practice".into(),
            description: "Get faster at dragging".into(),
            duration_secs: 15,
            challenge: Challenge::DragDrop {
                items: names(&SPEED_FILES),
            },
        },
        LevelDefinition {
            id: 6,
            title: "Copy & Paste Files".into(),
            description: "Copy files like a pro".into(),
            duration_secs: 30,
            challenge: Challenge::FileCopy {
                files: names(&BACKUP_FILES),
            },
        },
    ]
}

#[cfg(test)]
pub(crate) fn find(id: LevelId) -> Option<LevelDefinition> {
    catalog().into_iter().find(|level| level.id == id)
}

pub fn next_level(id: LevelId) -> Option<LevelId> {
    (FIRST_LEVEL..LAST_LEVEL).contains(&id).then(|| id + 1)
}

pub fn is_valid_id(id: i64) -> bool {
    (FIRST_LEVEL as i64..=LAST_LEVEL as i64).contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_six_levels_in_order() {
        let ids: Vec<LevelId> = catalog().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn catalog_durations_and_kinds() {
        let levels = catalog();
        let summary: Vec<(LevelKind, u32, usize)> = levels
            .iter()
            .map(|l| (l.kind(), l.duration_secs, l.challenge.total()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (LevelKind::TextCopy, 60, 5),
                (LevelKind::TextCopy, 30, 5),
                (LevelKind::TextCopy, 15, 5),
                (LevelKind::DragDrop, 30, 10),
                (LevelKind::DragDrop, 15, 10),
                (LevelKind::FileCopy, 30, 3),
            ]
        );
    }

    #[test]
    fn first_level_phrase() {
        let level = find(1).unwrap();
        assert_eq!(
            level.challenge,
            Challenge::TextCopy {
                phrase: "Hello World".into(),
                slots: 5
            }
        );
        assert_eq!(level.heading(), "Level 1: Copy & Paste Basics");
    }

    #[test]
    fn next_level_stops_after_last() {
        assert_eq!(next_level(1), Some(2));
        assert_eq!(next_level(5), Some(6));
        assert_eq!(next_level(6), None);
        assert_eq!(next_level(0), None);
    }

    #[test]
    fn valid_ids() {
        assert!(is_valid_id(1));
        assert!(is_valid_id(6));
        assert!(!is_valid_id(0));
        assert!(!is_valid_id(7));
        assert!(!is_valid_id(-1));
    }

    #[test]
    fn failure_messages_report_progress() {
        assert_eq!(
            find(4).unwrap().failure_message(3),
            "You moved 3/10 files. Try again!"
        );
        assert_eq!(
            find(6).unwrap().failure_message(1),
            "You copied 1/3 files. Try again!"
        );
        assert_eq!(
            find(2).unwrap().failure_message(0),
            "Don't worry, practice makes perfect!"
        );
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(LevelKind::TextCopy.to_string(), "Copy & Paste");
        assert_eq!(LevelKind::DragDrop.to_string(), "Drag & Drop");
        assert_eq!(LevelKind::FileCopy.to_string(), "Copy Files");
    }
}
