//! Document events and the import state machine
//!
//!     HTML and ODT readers both reduce their input to a flat stream of [`DocEvent`]s in HTML
//!     vocabulary: `p`, `h1`..`h4`, `em`, `strong`, `lang`, `blockquote`, `li`, `s`, `div` with an
//!     `id` attribute for sections, `title`/`meta`/`body` for document properties. A [`ReadState`]
//!     consumes the stream and builds the partial project the document describes.
//!
//!     Section IDs are the bridge back to the project: `ChID:3`, `ScID:12`, `CrID_desc:1`,
//!     `LcID:4`, `ItID:2`. Scene titles travel in comments as `~ Title ~`.

use crate::common::markup::join_split_spans;
use crate::error::FormatError;
use crate::model::{Chapter, Character, Kind, Project, Scene, SceneStatus, WorldElement};
use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

const COMMENT_START: &str = "/*";
const COMMENT_END: &str = "*/";
const TITLE_BRACKET: char = '~';
const BULLET: &str = "- ";
const INDENT: &str = "> ";
const CHAPTER_MARKER: &str = "## ";
const PART_MARKER: &str = "# ";
const SCENE_DIVIDER: &str = "* * *";
/// Imported scenes with fewer words stay outlines.
const LOW_WORD_COUNT: usize = 10;

/// One parser event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocEvent {
    Start {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    End {
        tag: String,
    },
    Text(String),
    Comment(String),
}

impl DocEvent {
    pub fn start(tag: &str, attrs: &[(&str, &str)]) -> Self {
        DocEvent::Start {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn end(tag: &str) -> Self {
        DocEvent::End {
            tag: tag.to_string(),
        }
    }

    pub fn text(text: &str) -> Self {
        DocEvent::Text(text.to_string())
    }
}

/// What a document holds, and so how its events are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderKind {
    /// Manuscript with visible `[ScID:n]` markers
    Proof,
    Manuscript,
    Notes,
    Todo,
    SceneDesc,
    ChapterDesc,
    PartDesc,
    Characters,
    Locations,
    Items,
    /// Work in progress without IDs; headings start chapters, paragraphs scenes
    Import,
    /// Headings only; `h3` starts a scene, paragraphs are descriptions
    Outline,
}

impl ReaderKind {
    fn scene_kind(self) -> Kind {
        match self {
            ReaderKind::Notes => Kind::Notes,
            ReaderKind::Todo => Kind::Todo,
            _ => Kind::Normal,
        }
    }

    fn is_manuscript(self) -> bool {
        matches!(
            self,
            ReaderKind::Manuscript | ReaderKind::Notes | ReaderKind::Todo
        )
    }

    fn reads_text(self) -> bool {
        self.is_manuscript() || matches!(self, ReaderKind::Proof | ReaderKind::Import)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharacterSection {
    Desc,
    Bio,
    Goals,
    Notes,
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn first_id(text: &str) -> Option<String> {
    DIGITS.find(text).map(|m| m.as_str().to_string())
}

/// Builds a partial project from document events.
pub struct ReadState {
    kind: ReaderKind,
    project: Project,
    languages: Vec<String>,
    lines: Vec<String>,
    sc_id: Option<String>,
    ch_id: Option<String>,
    element_id: Option<String>,
    section: Option<CharacterSection>,
    language: Option<String>,
    in_heading: bool,
    skip_data: bool,
    chapter_count: usize,
    scene_count: usize,
}

impl ReadState {
    pub fn new(kind: ReaderKind) -> Self {
        ReadState {
            kind,
            project: Project::new(),
            languages: Vec::new(),
            lines: Vec::new(),
            sc_id: None,
            ch_id: None,
            element_id: None,
            section: None,
            language: None,
            in_heading: false,
            skip_data: false,
            chapter_count: 0,
            scene_count: 0,
        }
    }

    pub fn handle(&mut self, event: DocEvent) -> Result<(), FormatError> {
        match event {
            DocEvent::Start { tag, attrs } => self.start(&tag, &attrs),
            DocEvent::End { tag } => self.end(&tag),
            // Line breaks between tags are layout, not text.
            DocEvent::Text(text) if text.trim().is_empty() && text.contains('\n') => {}
            DocEvent::Text(text) => self.data(&text)?,
            DocEvent::Comment(text) => self.comment(&text),
        }
        Ok(())
    }

    /// The partial project read so far.
    pub fn finish(mut self) -> Project {
        if self.kind.reads_text() {
            self.project.languages = Some(self.languages);
        }
        self.project
    }

    fn text(&self) -> String {
        self.lines.concat()
    }

    fn cleanup(&self, text: &str) -> String {
        join_split_spans(text, &self.languages)
    }

    fn open_language(&mut self, attrs: &[(String, String)]) {
        if let Some(language) = attr(attrs, "lang") {
            if !self.languages.iter().any(|l| l == language) {
                self.languages.push(language.to_string());
            }
            self.lines.push(format!("[lang={language}]"));
            self.language = Some(language.to_string());
        }
    }

    fn close_language(&mut self) {
        if let Some(language) = self.language.take() {
            self.lines.push(format!("[/lang={language}]"));
        }
    }

    fn set_locale(&mut self, attrs: &[(String, String)]) {
        if let Some(language) = attr(attrs, "language").filter(|l| !l.is_empty()) {
            self.project.language_code = Some(language.to_string());
        }
        if let Some(country) = attr(attrs, "country").filter(|c| !c.is_empty()) {
            self.project.country_code = Some(country.to_string());
        }
    }

    fn set_meta(&mut self, attrs: &[(String, String)]) {
        let content = attr(attrs, "content").map(str::to_string);
        match attr(attrs, "name") {
            Some("author") => self.project.author_name = content,
            Some("description") => self.project.desc = content,
            _ => {}
        }
    }

    /// Inline formatting shared by the text reading kinds.
    fn formatting_start(&mut self, tag: &str, attrs: &[(String, String)]) -> bool {
        match tag {
            "em" => self.lines.push("[i]".into()),
            "strong" => self.lines.push("[b]".into()),
            "lang" | "p" => self.open_language(attrs),
            "li" => self.lines.push(BULLET.into()),
            "blockquote" => {
                self.lines.push(INDENT.into());
                self.open_language(attrs);
            }
            "s" => self.lines.push(" ".into()),
            _ => return false,
        }
        true
    }

    fn formatting_end(&mut self, tag: &str) -> bool {
        match tag {
            "em" => self.lines.push("[/i]".into()),
            "strong" => self.lines.push("[/b]".into()),
            "lang" => self.close_language(),
            "p" | "blockquote" => {
                self.close_language();
                self.lines.push("\n".into());
            }
            _ => return false,
        }
        true
    }

    /// `div` sections with chapter or scene IDs.
    fn open_section(&mut self, attrs: &[(String, String)]) {
        let Some(id) = attr(attrs, "id") else {
            return;
        };
        let kind = self.kind.scene_kind();
        if id.starts_with("ScID") {
            let Some(sc_id) = first_id(id) else {
                return;
            };
            if !self.project.scenes.contains_key(&sc_id) {
                self.project.scenes.insert(sc_id.clone(), Scene::default());
                if let Some(chapter) = self.ch_id.as_ref().and_then(|c| self.project.chapters.get_mut(c)) {
                    chapter.srt_scenes.push(sc_id.clone());
                }
            }
            if let Some(scene) = self.project.scenes.get_mut(&sc_id) {
                scene.kind = Some(kind);
            }
            self.sc_id = Some(sc_id);
        } else if id.starts_with("ChID") {
            let Some(ch_id) = first_id(id) else {
                return;
            };
            if !self.project.chapters.contains_key(&ch_id) {
                self.project.chapters.insert(ch_id.clone(), Chapter::default());
                self.project.srt_chapters.push(ch_id.clone());
            }
            if let Some(chapter) = self.project.chapters.get_mut(&ch_id) {
                chapter.kind = Some(kind);
            }
            self.ch_id = Some(ch_id);
        }
    }

    fn new_chapter(&mut self, tag: &str) {
        self.sc_id = None;
        self.lines.clear();
        self.chapter_count += 1;
        let ch_id = self.chapter_count.to_string();
        let chapter = Chapter {
            level: Some(if tag == "h1" { 1 } else { 0 }),
            kind: Some(Kind::Normal),
            ..Default::default()
        };
        self.project.chapters.insert(ch_id.clone(), chapter);
        self.project.srt_chapters.push(ch_id.clone());
        self.ch_id = Some(ch_id);
    }

    fn new_scene(&mut self, scene: Scene) -> Option<String> {
        let chapter = self.ch_id.as_ref().and_then(|c| self.project.chapters.get_mut(c))?;
        self.scene_count += 1;
        let sc_id = self.scene_count.to_string();
        chapter.srt_scenes.push(sc_id.clone());
        self.project.scenes.insert(sc_id.clone(), scene);
        Some(sc_id)
    }

    fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.sc_id.as_ref().and_then(|id| self.project.scenes.get_mut(id))
    }

    fn chapter_mut(&mut self) -> Option<&mut Chapter> {
        self.ch_id.as_ref().and_then(|id| self.project.chapters.get_mut(id))
    }

    fn start(&mut self, tag: &str, attrs: &[(String, String)]) {
        match self.kind {
            ReaderKind::Proof => self.proof_start(tag, attrs),
            ReaderKind::Manuscript | ReaderKind::Notes | ReaderKind::Todo => {
                self.manuscript_start(tag, attrs)
            }
            ReaderKind::SceneDesc | ReaderKind::ChapterDesc | ReaderKind::PartDesc => {
                match tag {
                    "div" => self.open_section(attrs),
                    "h1" | "h2" => self.in_heading = true,
                    "s" => self.lines.push(" ".into()),
                    _ => {}
                }
            }
            ReaderKind::Characters => self.character_start(tag, attrs),
            ReaderKind::Locations | ReaderKind::Items => self.world_element_start(tag, attrs),
            ReaderKind::Import => self.import_start(tag, attrs),
            ReaderKind::Outline => self.outline_start(tag, attrs),
        }
    }

    fn end(&mut self, tag: &str) {
        match self.kind {
            ReaderKind::Proof => self.proof_end(tag),
            ReaderKind::Manuscript | ReaderKind::Notes | ReaderKind::Todo => {
                self.manuscript_end(tag)
            }
            ReaderKind::SceneDesc => self.scene_desc_end(tag),
            ReaderKind::ChapterDesc | ReaderKind::PartDesc => self.chapter_desc_end(tag),
            ReaderKind::Characters => self.character_end(tag),
            ReaderKind::Locations | ReaderKind::Items => self.world_element_end(tag),
            ReaderKind::Import => self.import_end(tag),
            ReaderKind::Outline => self.outline_end(tag),
        }
    }

    fn data(&mut self, text: &str) -> Result<(), FormatError> {
        match self.kind {
            ReaderKind::Proof => return self.proof_data(text),
            ReaderKind::Manuscript | ReaderKind::Notes | ReaderKind::Todo => {
                if self.skip_data {
                    self.skip_data = false;
                } else if self.sc_id.is_some() {
                    self.lines.push(text.to_string());
                } else if self.in_heading {
                    if let Some(chapter) = self.chapter_mut() {
                        if chapter.title.is_none() {
                            chapter.title = Some(text.trim().to_string());
                        }
                    }
                }
            }
            ReaderKind::SceneDesc => {
                if self.sc_id.is_some() {
                    self.lines.push(text.to_string());
                } else if self.in_heading {
                    if let Some(chapter) = self.chapter_mut() {
                        if chapter.title.as_deref().map_or(true, str::is_empty) {
                            chapter.title = Some(text.trim().to_string());
                        }
                    }
                }
            }
            ReaderKind::ChapterDesc | ReaderKind::PartDesc => {
                if self.ch_id.is_some() {
                    self.lines.push(text.trim().to_string());
                }
            }
            ReaderKind::Characters => {
                if self.section.is_some() {
                    self.lines.push(text.trim().to_string());
                }
            }
            ReaderKind::Locations | ReaderKind::Items => {
                if self.element_id.is_some() {
                    self.lines.push(text.trim().to_string());
                }
            }
            ReaderKind::Import => {
                if self.sc_id.is_some() && text.contains(SCENE_DIVIDER) {
                    self.sc_id = None;
                } else {
                    self.lines.push(text.to_string());
                }
            }
            ReaderKind::Outline => self.lines.push(text.to_string()),
        }
        Ok(())
    }

    fn comment(&mut self, text: &str) {
        if self.sc_id.is_none() {
            return;
        }
        match self.kind {
            ReaderKind::Manuscript | ReaderKind::Notes | ReaderKind::Todo => {
                if text.contains(TITLE_BRACKET) {
                    let title = text.split(TITLE_BRACKET).nth(1).unwrap_or_default().trim();
                    if let Some(scene) = self.scene_mut() {
                        scene.title = Some(title.to_string());
                    }
                    return;
                }
                self.lines
                    .push(format!("{COMMENT_START}{}{COMMENT_END}", text.trim()));
            }
            ReaderKind::Import => {
                if self.lines.is_empty() {
                    let title = text.trim().to_string();
                    if let Some(scene) = self.scene_mut() {
                        scene.title = Some(title);
                    }
                    return;
                }
                self.lines
                    .push(format!("{COMMENT_START}{}{COMMENT_END}", text.trim()));
            }
            ReaderKind::Proof => {}
            _ => self.lines.push(format!("{COMMENT_START}{text}{COMMENT_END}")),
        }
    }

    fn proof_start(&mut self, tag: &str, attrs: &[(String, String)]) {
        match tag {
            "h2" => self.lines.push(CHAPTER_MARKER.into()),
            "h1" => self.lines.push(PART_MARKER.into()),
            "body" => self.set_locale(attrs),
            "br" | "ul" => self.skip_data = true,
            _ => {
                self.formatting_start(tag, attrs);
            }
        }
    }

    fn proof_end(&mut self, tag: &str) {
        if matches!(tag, "h1" | "h2") {
            self.close_language();
            self.lines.push("\n".into());
        } else {
            self.formatting_end(tag);
        }
    }

    fn proof_data(&mut self, text: &str) -> Result<(), FormatError> {
        if self.skip_data {
            self.skip_data = false;
        } else if text.contains("[ScID") {
            let sc_id = first_id(text)
                .ok_or_else(|| FormatError::ParseError(format!("Corrupt marker: \"{text}\"")))?;
            if !self.project.scenes.contains_key(&sc_id) {
                self.project.scenes.insert(sc_id.clone(), Scene::default());
                if let Some(chapter) = self.chapter_mut() {
                    chapter.srt_scenes.push(sc_id.clone());
                }
            }
            self.sc_id = Some(sc_id);
            self.lines.clear();
        } else if text.contains("[ChID") {
            let ch_id = first_id(text)
                .ok_or_else(|| FormatError::ParseError(format!("Corrupt marker: \"{text}\"")))?;
            if !self.project.chapters.contains_key(&ch_id) {
                self.project.chapters.insert(ch_id.clone(), Chapter::default());
                self.project.srt_chapters.push(ch_id.clone());
            }
            self.ch_id = Some(ch_id);
        } else if text.contains("[/ChID") {
            self.ch_id = None;
        } else if text.contains("[/ScID") {
            if let Some(sc_id) = self.sc_id.take() {
                let content = self.cleanup(&self.text()).trim().to_string();
                self.project
                    .scenes
                    .entry(sc_id)
                    .or_default()
                    .set_content(content);
            }
            self.lines.clear();
        } else if self.sc_id.is_some() {
            self.lines.push(text.to_string());
        }
        Ok(())
    }

    fn manuscript_start(&mut self, tag: &str, attrs: &[(String, String)]) {
        match tag {
            "div" => self.open_section(attrs),
            "h1" | "h2" if self.sc_id.is_none() => self.in_heading = true,
            _ => {}
        }
        if self.sc_id.is_some() {
            match tag {
                "h3" => self.skip_data = true,
                "h2" => self.lines.push(CHAPTER_MARKER.into()),
                "h1" => self.lines.push(PART_MARKER.into()),
                _ => {
                    self.formatting_start(tag, attrs);
                }
            }
        } else if tag == "body" {
            self.set_locale(attrs);
        }
    }

    fn manuscript_end(&mut self, tag: &str) {
        if matches!(tag, "h1" | "h2") {
            self.in_heading = false;
        }
        if self.sc_id.is_some() {
            match tag {
                "div" => {
                    let content = self.cleanup(&self.text()).trim_end().to_string();
                    if let Some(scene) = self.scene_mut() {
                        scene.set_content(content);
                    }
                    self.lines.clear();
                    self.sc_id = None;
                }
                "h1" | "h2" => self.lines.push("\n".into()),
                _ => {
                    self.formatting_end(tag);
                }
            }
        } else if tag == "div" {
            self.ch_id = None;
        }
    }

    fn scene_desc_end(&mut self, tag: &str) {
        if self.sc_id.is_some() {
            match tag {
                "div" => {
                    let mut text = self.text();
                    let mut title = None;
                    if text.starts_with(COMMENT_START) {
                        if let Some((comment, rest)) = text.split_once(COMMENT_END) {
                            if comment.contains(TITLE_BRACKET) {
                                title = comment
                                    .split(TITLE_BRACKET)
                                    .nth(1)
                                    .map(|t| t.trim().to_string());
                            }
                            text = rest.to_string();
                        }
                    }
                    if let Some(scene) = self.scene_mut() {
                        if title.is_some() {
                            scene.title = title;
                        }
                        scene.desc = Some(text.trim_end().to_string());
                    }
                    self.lines.clear();
                    self.sc_id = None;
                }
                "p" => self.lines.push("\n".into()),
                _ => {}
            }
        } else if tag == "div" {
            self.ch_id = None;
        }
        self.track_heading_end(tag);
    }

    fn track_heading_end(&mut self, tag: &str) {
        if matches!(tag, "h1" | "h2") {
            self.in_heading = false;
        }
    }

    fn chapter_desc_end(&mut self, tag: &str) {
        if self.ch_id.is_none() {
            return;
        }
        match tag {
            "div" => {
                let desc = self.text().trim_end().to_string();
                if let Some(chapter) = self.chapter_mut() {
                    chapter.desc = Some(desc);
                }
                self.lines.clear();
                self.ch_id = None;
            }
            "p" => self.lines.push("\n".into()),
            "h1" | "h2" => {
                let title = self.text();
                if let Some(chapter) = self.chapter_mut() {
                    if chapter.title.as_deref().map_or(true, str::is_empty) {
                        chapter.title = Some(title);
                    }
                }
                self.lines.clear();
            }
            _ => {}
        }
    }

    fn character_start(&mut self, tag: &str, attrs: &[(String, String)]) {
        match tag {
            "div" => {
                let Some(id) = attr(attrs, "id") else {
                    return;
                };
                if id.starts_with("CrID_desc") {
                    let Some(cr_id) = first_id(id) else {
                        return;
                    };
                    if !self.project.characters.contains_key(&cr_id) {
                        self.project.srt_characters.push(cr_id.clone());
                        self.project
                            .characters
                            .insert(cr_id.clone(), Character::default());
                    }
                    self.element_id = Some(cr_id);
                    self.section = Some(CharacterSection::Desc);
                } else if id.starts_with("CrID_bio") {
                    self.section = Some(CharacterSection::Bio);
                } else if id.starts_with("CrID_goals") {
                    self.section = Some(CharacterSection::Goals);
                } else if id.starts_with("CrID_notes") {
                    self.section = Some(CharacterSection::Notes);
                }
            }
            "s" => self.lines.push(" ".into()),
            _ => {}
        }
    }

    fn character_end(&mut self, tag: &str) {
        let Some(cr_id) = self.element_id.clone() else {
            return;
        };
        match tag {
            "div" => {
                let Some(section) = self.section.take() else {
                    return;
                };
                let text = self.text();
                self.lines.clear();
                let Some(character) = self.project.characters.get_mut(&cr_id) else {
                    return;
                };
                match section {
                    CharacterSection::Desc => character.desc = Some(text.trim_end().to_string()),
                    CharacterSection::Bio => character.bio = Some(text.trim_end().to_string()),
                    CharacterSection::Goals => character.goals = Some(text.trim_end().to_string()),
                    CharacterSection::Notes => character.notes = Some(text),
                }
            }
            "p" => self.lines.push("\n".into()),
            _ => {}
        }
    }

    fn world_element_start(&mut self, tag: &str, attrs: &[(String, String)]) {
        let (prefix, elements, order) = match self.kind {
            ReaderKind::Locations => (
                "LcID",
                &mut self.project.locations,
                &mut self.project.srt_locations,
            ),
            _ => ("ItID", &mut self.project.items, &mut self.project.srt_items),
        };
        match tag {
            "div" => {
                let Some(id) = attr(attrs, "id").filter(|id| id.starts_with(prefix)) else {
                    return;
                };
                let Some(element_id) = first_id(id) else {
                    return;
                };
                if !elements.contains_key(&element_id) {
                    order.push(element_id.clone());
                    elements.insert(element_id.clone(), WorldElement::default());
                }
                self.element_id = Some(element_id);
            }
            "s" => self.lines.push(" ".into()),
            _ => {}
        }
    }

    fn world_element_end(&mut self, tag: &str) {
        let Some(element_id) = self.element_id.clone() else {
            return;
        };
        match tag {
            "div" => {
                let desc = self.text().trim_end().to_string();
                let elements = match self.kind {
                    ReaderKind::Locations => &mut self.project.locations,
                    _ => &mut self.project.items,
                };
                if let Some(element) = elements.get_mut(&element_id) {
                    element.desc = Some(desc);
                }
                self.lines.clear();
                self.element_id = None;
            }
            "p" => self.lines.push("\n".into()),
            _ => {}
        }
    }

    fn import_start(&mut self, tag: &str, attrs: &[(String, String)]) {
        match tag {
            "p" => {
                if self.sc_id.is_none() && self.ch_id.is_some() {
                    self.lines.clear();
                    let scene = Scene {
                        title: Some(format!("Scene {}", self.scene_count + 1)),
                        status: Some(SceneStatus::Outline),
                        ..Default::default()
                    };
                    self.sc_id = self.new_scene(scene);
                }
                self.open_language(attrs);
            }
            "h1" | "h2" => self.new_chapter(tag),
            "div" => {
                self.sc_id = None;
                self.ch_id = None;
            }
            "meta" => self.set_meta(attrs),
            "title" => self.lines.clear(),
            "body" => self.set_locale(attrs),
            _ => {
                self.formatting_start(tag, attrs);
            }
        }
    }

    fn import_end(&mut self, tag: &str) {
        match tag {
            "p" | "blockquote" => {
                self.formatting_end(tag);
                if self.sc_id.is_some() {
                    let content = self.cleanup(self.text().trim_end());
                    if let Some(scene) = self.scene_mut() {
                        scene.set_content(content);
                        scene.status = Some(if scene.word_count() < LOW_WORD_COUNT {
                            SceneStatus::Outline
                        } else {
                            SceneStatus::Draft
                        });
                    }
                }
            }
            "h1" | "h2" => {
                let title = self.text();
                if let Some(chapter) = self.chapter_mut() {
                    chapter.title = Some(title);
                }
                self.lines.clear();
            }
            "title" => self.project.title = Some(self.text()),
            _ => {
                self.formatting_end(tag);
            }
        }
    }

    fn outline_start(&mut self, tag: &str, attrs: &[(String, String)]) {
        match tag {
            "h1" | "h2" => self.new_chapter(tag),
            "h3" => {
                self.lines.clear();
                let mut scene = Scene {
                    status: Some(SceneStatus::Outline),
                    ..Default::default()
                };
                scene.set_content("");
                self.sc_id = self.new_scene(scene);
            }
            "div" => {
                self.sc_id = None;
                self.ch_id = None;
            }
            "meta" => self.set_meta(attrs),
            "title" => self.lines.clear(),
            "body" => self.set_locale(attrs),
            "s" => self.lines.push(" ".into()),
            _ => {}
        }
    }

    fn outline_end(&mut self, tag: &str) {
        let text = self.text();
        match tag {
            "p" => {
                let text = format!("{}\n", text.trim());
                self.lines = vec![text.clone()];
                if let Some(scene) = self.scene_mut() {
                    scene.desc = Some(text);
                } else if let Some(chapter) = self.chapter_mut() {
                    chapter.desc = Some(text);
                }
            }
            "h1" | "h2" => {
                if let Some(chapter) = self.chapter_mut() {
                    chapter.title = Some(text.trim().to_string());
                }
                self.lines.clear();
            }
            "h3" => {
                if let Some(scene) = self.scene_mut() {
                    scene.title = Some(text.trim().to_string());
                }
                self.lines.clear();
            }
            "title" => self.project.title = Some(text.trim().to_string()),
            _ => {}
        }
    }
}

/// Feed `events` through a fresh [`ReadState`].
pub fn read_events(
    kind: ReaderKind,
    events: impl IntoIterator<Item = DocEvent>,
) -> Result<Project, FormatError> {
    let mut state = ReadState::new(kind);
    for event in events {
        state.handle(event)?;
    }
    Ok(state.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> Vec<DocEvent> {
        vec![DocEvent::start("p", &[]), DocEvent::text(text), DocEvent::end("p")]
    }

    fn section(id: &str, inner: Vec<DocEvent>) -> Vec<DocEvent> {
        let mut events = vec![DocEvent::start("div", &[("id", id)])];
        events.extend(inner);
        events.push(DocEvent::end("div"));
        events
    }

    #[test]
    fn test_manuscript_scene_text_and_title() {
        let mut scene = vec![
            DocEvent::start("p", &[]),
            DocEvent::Comment("~ The Chase ~".into()),
            DocEvent::text("Run "),
            DocEvent::start("em", &[]),
            DocEvent::text("fast"),
            DocEvent::end("em"),
            DocEvent::end("p"),
        ];
        scene.extend(p("Then hide."));
        let mut chapter = vec![
            DocEvent::start("h2", &[]),
            DocEvent::text("One"),
            DocEvent::end("h2"),
        ];
        chapter.extend(section("ScID:7", scene));
        let project = read_events(ReaderKind::Manuscript, section("ChID:2", chapter)).unwrap();

        assert_eq!(project.srt_chapters, vec!["2"]);
        assert_eq!(project.chapters["2"].title.as_deref(), Some("One"));
        assert_eq!(project.chapters["2"].srt_scenes, vec!["7"]);
        let scene = &project.scenes["7"];
        assert_eq!(scene.title.as_deref(), Some("The Chase"));
        assert_eq!(scene.content(), Some("Run [i]fast[/i]\nThen hide."));
        assert_eq!(scene.kind, Some(Kind::Normal));
    }

    #[test]
    fn test_manuscript_divider_outside_scene_is_no_title() {
        let mut chapter = vec![DocEvent::start("h2", &[]), DocEvent::end("h2")];
        chapter.extend(vec![
            DocEvent::start("h4", &[]),
            DocEvent::text("* * *"),
            DocEvent::end("h4"),
        ]);
        let project = read_events(ReaderKind::Manuscript, section("ChID:1", chapter)).unwrap();
        assert_eq!(project.chapters["1"].title, None);
    }

    #[test]
    fn test_notes_kind_and_languages() {
        let scene = vec![
            DocEvent::start("p", &[("lang", "fr-FR")]),
            DocEvent::text("Bonjour"),
            DocEvent::end("p"),
        ];
        let events = section("ChID:1", section("ScID:1", scene));
        let project = read_events(ReaderKind::Notes, events).unwrap();
        assert_eq!(project.scenes["1"].kind, Some(Kind::Notes));
        assert_eq!(project.chapters["1"].kind, Some(Kind::Notes));
        assert_eq!(
            project.scenes["1"].content(),
            Some("[lang=fr-FR]Bonjour[/lang=fr-FR]")
        );
        assert_eq!(project.languages, Some(vec!["fr-FR".to_string()]));
    }

    #[test]
    fn test_proof_markers() {
        let mut events = p("[ChID:2]");
        events.extend(p("[ScID:3]"));
        events.extend(p("Some text"));
        events.extend(vec![
            DocEvent::start("h2", &[]),
            DocEvent::text("New"),
            DocEvent::end("h2"),
        ]);
        events.extend(p("[/ScID]"));
        events.extend(p("[/ChID]"));
        let project = read_events(ReaderKind::Proof, events).unwrap();
        assert_eq!(project.scenes["3"].content(), Some("Some text\n## New"));
        assert_eq!(project.srt_chapters, vec!["2"]);
        assert_eq!(project.chapters["2"].srt_scenes, vec!["3"]);
    }

    #[test]
    fn test_proof_corrupt_marker() {
        let err = read_events(ReaderKind::Proof, p("[ScID:x]")).unwrap_err();
        assert!(matches!(err, FormatError::ParseError(_)));
    }

    #[test]
    fn test_scene_descriptions() {
        let mut inner = vec![DocEvent::start("p", &[]), DocEvent::Comment("~ Title ~".into())];
        inner.push(DocEvent::text("First"));
        inner.push(DocEvent::end("p"));
        inner.extend(p("Second"));
        let project = read_events(ReaderKind::SceneDesc, section("ChID:1", section("ScID:4", inner))).unwrap();
        let scene = &project.scenes["4"];
        assert_eq!(scene.title.as_deref(), Some("Title"));
        assert_eq!(scene.desc.as_deref(), Some("First\nSecond"));
        assert_eq!(scene.content(), None);
    }

    #[test]
    fn test_chapter_descriptions() {
        let mut inner = vec![
            DocEvent::start("h2", &[]),
            DocEvent::text(" One "),
            DocEvent::end("h2"),
        ];
        inner.extend(p("About one"));
        let project = read_events(ReaderKind::ChapterDesc, section("ChID:5", inner)).unwrap();
        assert_eq!(project.chapters["5"].title.as_deref(), Some("One"));
        assert_eq!(project.chapters["5"].desc.as_deref(), Some("About one"));
    }

    #[test]
    fn test_characters() {
        let mut events = section("CrID_desc:2", p("Tall"));
        events.extend(section("CrID_bio:2", p("Born")));
        events.extend(section("CrID_goals:2", p("Win")));
        events.extend(section("CrID_notes:2", p("None")));
        let project = read_events(ReaderKind::Characters, events).unwrap();
        let character = &project.characters["2"];
        assert_eq!(project.srt_characters, vec!["2"]);
        assert_eq!(character.desc.as_deref(), Some("Tall"));
        assert_eq!(character.bio.as_deref(), Some("Born"));
        assert_eq!(character.goals.as_deref(), Some("Win"));
        assert_eq!(character.notes.as_deref(), Some("None\n"));
    }

    #[test]
    fn test_locations_and_items() {
        let project = read_events(ReaderKind::Locations, section("LcID:3", p("Dark"))).unwrap();
        assert_eq!(project.locations["3"].desc.as_deref(), Some("Dark"));
        let project = read_events(ReaderKind::Items, section("ItID:1", p("Sharp"))).unwrap();
        assert_eq!(project.items["1"].desc.as_deref(), Some("Sharp"));
        assert_eq!(project.srt_items, vec!["1"]);
    }

    #[test]
    fn test_import_builds_chapters_and_scenes() {
        let mut events = vec![
            DocEvent::start("body", &[("language", "en"), ("country", "GB")]),
            DocEvent::start("title", &[]),
            DocEvent::text("Book"),
            DocEvent::end("title"),
            DocEvent::start("meta", &[("name", "author"), ("content", "Jo")]),
            DocEvent::start("h2", &[]),
            DocEvent::text("Start"),
            DocEvent::end("h2"),
        ];
        events.extend(p("one two three four five six seven eight nine ten"));
        events.extend(p("more"));
        events.extend(vec![
            DocEvent::start("h4", &[]),
            DocEvent::text("* * *"),
            DocEvent::end("h4"),
        ]);
        events.extend(p("short"));
        let project = read_events(ReaderKind::Import, events).unwrap();

        assert_eq!(project.title.as_deref(), Some("Book"));
        assert_eq!(project.author_name.as_deref(), Some("Jo"));
        assert_eq!(project.language_code.as_deref(), Some("en"));
        assert_eq!(project.chapters["1"].title.as_deref(), Some("Start"));
        assert_eq!(project.chapters["1"].srt_scenes, vec!["1", "2"]);
        let first = &project.scenes["1"];
        assert_eq!(
            first.content(),
            Some("one two three four five six seven eight nine ten\nmore")
        );
        assert_eq!(first.status, Some(SceneStatus::Draft));
        assert_eq!(project.scenes["2"].title.as_deref(), Some("Scene 2"));
        assert_eq!(project.scenes["2"].status, Some(SceneStatus::Outline));
    }

    #[test]
    fn test_outline() {
        let mut events = vec![
            DocEvent::start("h1", &[]),
            DocEvent::text("Part"),
            DocEvent::end("h1"),
            DocEvent::start("h2", &[]),
            DocEvent::text("Chapter"),
            DocEvent::end("h2"),
        ];
        events.extend(p("What the chapter does"));
        events.extend(vec![
            DocEvent::start("h3", &[]),
            DocEvent::text("Scene"),
            DocEvent::end("h3"),
        ]);
        events.extend(p("What happens"));
        let project = read_events(ReaderKind::Outline, events).unwrap();

        assert_eq!(project.srt_chapters, vec!["1", "2"]);
        assert_eq!(project.chapters["1"].level, Some(1));
        assert_eq!(project.chapters["2"].desc.as_deref(), Some("What the chapter does\n"));
        let scene = &project.scenes["1"];
        assert_eq!(scene.title.as_deref(), Some("Scene"));
        assert_eq!(scene.desc.as_deref(), Some("What happens\n"));
        assert_eq!(scene.status, Some(SceneStatus::Outline));
    }
}
