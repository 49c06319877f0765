//! Chapters, scenes, world elements and project notes

use super::counting::{letter_count, word_count};
use serde::Serialize;
use std::collections::BTreeMap;

/// Canonical kind of a chapter or scene.
///
/// yWriter spreads this over up to three legacy fields; see [`super::kind`] for the codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Kind {
    #[default]
    Normal,
    Notes,
    Todo,
    Unused,
}

/// Completion stage of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SceneStatus {
    Outline = 1,
    Draft = 2,
    FirstEdit = 3,
    SecondEdit = 4,
    Done = 5,
}

impl SceneStatus {
    pub const ALL: [SceneStatus; 5] = [
        SceneStatus::Outline,
        SceneStatus::Draft,
        SceneStatus::FirstEdit,
        SceneStatus::SecondEdit,
        SceneStatus::Done,
    ];

    /// Numeric rank as stored in the project file.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_rank(rank: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| i64::from(s.rank()) == rank)
    }

    pub fn label(self) -> &'static str {
        match self {
            SceneStatus::Outline => "Outline",
            SceneStatus::Draft => "Draft",
            SceneStatus::FirstEdit => "1st Edit",
            SceneStatus::SecondEdit => "2nd Edit",
            SceneStatus::Done => "Done",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.label() == label)
    }
}

/// When a scene takes place.
///
/// A specific date and an unspecific day are mutually exclusive, so they are two variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SceneTime {
    Specific {
        date: String,
        time: String,
    },
    Unspecific {
        day: Option<String>,
        time: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Chapter {
    pub title: Option<String>,
    pub desc: Option<String>,
    /// 0 for a chapter, 1 for a part (a chapter that starts a new section).
    pub level: Option<u8>,
    pub kind: Option<Kind>,
    pub suppress_title: Option<bool>,
    pub suppress_break: Option<bool>,
    pub is_trash: Option<bool>,
    pub srt_scenes: Vec<String>,
    pub kw_var: BTreeMap<String, String>,
}

impl Chapter {
    pub fn is_part(&self) -> bool {
        self.level == Some(1)
    }

    pub fn kind(&self) -> Kind {
        self.kind.unwrap_or_default()
    }
}

/// Scene content with its counters; only [`Scene::set_content`] builds one with text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneText {
    content: Option<String>,
    word_count: usize,
    letter_count: usize,
}

impl SceneText {
    fn new(content: String) -> Self {
        SceneText {
            word_count: word_count(&content),
            letter_count: letter_count(&content),
            content: Some(content),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub text: SceneText,
    pub kind: Option<Kind>,
    pub do_not_export: Option<bool>,
    pub status: Option<SceneStatus>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub field1: Option<String>,
    pub field2: Option<String>,
    pub field3: Option<String>,
    pub field4: Option<String>,
    pub append_to_prev: Option<bool>,
    pub is_reaction_scene: Option<bool>,
    pub is_sub_plot: Option<bool>,
    pub goal: Option<String>,
    pub conflict: Option<String>,
    pub outcome: Option<String>,
    pub characters: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
    pub items: Option<Vec<String>>,
    pub when: Option<SceneTime>,
    pub lasts_days: Option<String>,
    pub lasts_hours: Option<String>,
    pub lasts_minutes: Option<String>,
    pub image: Option<String>,
    pub kw_var: BTreeMap<String, String>,
}

impl Scene {
    pub fn content(&self) -> Option<&str> {
        self.text.content.as_deref()
    }

    /// Replace the scene text and recount words and letters.
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.text = SceneText::new(text.into());
    }

    pub fn word_count(&self) -> usize {
        self.text.word_count
    }

    pub fn letter_count(&self) -> usize {
        self.text.letter_count
    }

    pub fn kind(&self) -> Kind {
        self.kind.unwrap_or_default()
    }

    /// Specific date, if the scene has one.
    pub fn date(&self) -> Option<&str> {
        match &self.when {
            Some(SceneTime::Specific { date, .. }) => Some(date),
            _ => None,
        }
    }

    /// Time of day, from either form of scene time.
    pub fn time(&self) -> Option<&str> {
        match &self.when {
            Some(SceneTime::Specific { time, .. }) => Some(time),
            Some(SceneTime::Unspecific { time, .. }) => time.as_deref(),
            None => None,
        }
    }

    /// Unspecific day number, if the scene has one.
    pub fn day(&self) -> Option<&str> {
        match &self.when {
            Some(SceneTime::Unspecific { day, .. }) => day.as_deref(),
            _ => None,
        }
    }
}

/// A location or an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorldElement {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub image: Option<String>,
    pub aka: Option<String>,
    pub tags: Option<Vec<String>>,
    pub kw_var: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Character {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub image: Option<String>,
    pub aka: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub bio: Option<String>,
    pub goals: Option<String>,
    pub full_name: Option<String>,
    pub is_major: Option<bool>,
    pub kw_var: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectNote {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub kw_var: BTreeMap<String, String>,
}
