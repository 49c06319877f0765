//! Project root

use super::elements::{Chapter, Character, Kind, ProjectNote, Scene, WorldElement};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

static LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[lang=(.*?)\]").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Project {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub author_name: Option<String>,
    pub author_bio: Option<String>,
    pub field_title1: Option<String>,
    pub field_title2: Option<String>,
    pub field_title3: Option<String>,
    pub field_title4: Option<String>,
    pub word_count_start: Option<i64>,
    pub word_target: Option<i64>,
    pub language_code: Option<String>,
    pub country_code: Option<String>,
    /// Non-default languages tagged in scene content, in first-seen order.
    pub languages: Option<Vec<String>>,
    pub kw_var: BTreeMap<String, String>,

    pub chapters: BTreeMap<String, Chapter>,
    pub scenes: BTreeMap<String, Scene>,
    pub characters: BTreeMap<String, Character>,
    pub locations: BTreeMap<String, WorldElement>,
    pub items: BTreeMap<String, WorldElement>,
    pub project_notes: BTreeMap<String, ProjectNote>,

    pub srt_chapters: Vec<String>,
    pub srt_characters: Vec<String>,
    pub srt_locations: Vec<String>,
    pub srt_items: Vec<String>,
    pub srt_prj_notes: Vec<String>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the `[lang=xx]` tags used in scene content.
    pub fn get_languages(&mut self) {
        let mut languages: Vec<String> = Vec::new();
        for scene in self.scenes.values() {
            let Some(text) = scene.content() else {
                continue;
            };
            for caps in LANGUAGE_TAG.captures_iter(text) {
                let language = &caps[1];
                if !languages.iter().any(|l| l == language) {
                    languages.push(language.to_string());
                }
            }
        }
        self.languages = Some(languages);
    }

    /// Make sure language and country codes are usable.
    ///
    /// A project without a language takes the fallback locale; malformed codes become the
    /// "no linguistic content" locale.
    pub fn check_locale(&mut self, fallback_language: &str, fallback_country: &str) {
        let language = self.language_code.as_deref().unwrap_or("");
        if language.is_empty() {
            self.language_code = Some(fallback_language.to_string());
            self.country_code = Some(fallback_country.to_string());
            return;
        }
        let country = self.country_code.as_deref().unwrap_or("");
        if language.chars().count() == 2 && country.chars().count() == 2 {
            return;
        }
        self.language_code = Some("zxx".to_string());
        self.country_code = Some("none".to_string());
    }

    /// Scenes inherit the kind of a non-normal chapter.
    pub fn propagate_kinds(&mut self) {
        for chapter in self.chapters.values() {
            let kind = chapter.kind();
            if kind == Kind::Normal {
                continue;
            }
            for sc_id in &chapter.srt_scenes {
                if let Some(scene) = self.scenes.get_mut(sc_id) {
                    scene.kind = Some(kind);
                }
            }
        }
    }

    /// Chapter that lists `sc_id`, if any.
    pub fn chapter_of(&self, sc_id: &str) -> Option<&str> {
        self.srt_chapters.iter().map(String::as_str).find(|ch_id| {
            self.chapters
                .get(*ch_id)
                .is_some_and(|ch| ch.srt_scenes.iter().any(|s| s == sc_id))
        })
    }
}
