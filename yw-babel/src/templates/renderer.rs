//! Walks a project in presentation order and fills a [`TemplateSet`]

use super::mapping::{
    chapter_mapping, character_mapping, item_mapping, location_mapping, project_mapping,
    project_note_mapping, scene_mapping, Counters,
};
use super::{substitute, Mapping, TemplateSet, TextConverter};
use crate::format::ExportContext;
use crate::model::{Kind, Project};

type Accept = fn(&Project, &str) -> bool;
type AddPlaceholders = fn(&Project, &str, &mut Mapping);

fn accept_all(_project: &Project, _id: &str) -> bool {
    true
}

/// Per-entity predicates; an entity is rendered only if its filter accepts the ID.
#[derive(Clone, Copy)]
pub struct Filters {
    pub chapter: Accept,
    pub scene: Accept,
    pub character: Accept,
    pub location: Accept,
    pub item: Accept,
}

impl Default for Filters {
    fn default() -> Self {
        Filters {
            chapter: accept_all,
            scene: accept_all,
            character: accept_all,
            location: accept_all,
            item: accept_all,
        }
    }
}

/// Writer specific placeholders, added after the common mapping is built.
#[derive(Clone, Copy, Default)]
pub struct Hooks {
    pub project: Option<fn(&Project, &mut Mapping)>,
    pub chapter: Option<AddPlaceholders>,
    pub scene: Option<AddPlaceholders>,
    pub character: Option<AddPlaceholders>,
    pub location: Option<AddPlaceholders>,
    pub item: Option<AddPlaceholders>,
}

/// Which chapters a writer renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChapterSelection {
    /// Every chapter, with the template matching its kind.
    #[default]
    All,
    /// Only chapters of one kind (notes or todo documents).
    Only(Kind),
}

pub struct Renderer<'a> {
    project: &'a Project,
    ctx: &'a ExportContext,
    templates: &'a TemplateSet,
    converter: &'a dyn TextConverter,
    filters: Filters,
    hooks: Hooks,
    selection: ChapterSelection,
}

impl<'a> Renderer<'a> {
    pub fn new(
        project: &'a Project,
        ctx: &'a ExportContext,
        templates: &'a TemplateSet,
        converter: &'a dyn TextConverter,
    ) -> Self {
        Renderer {
            project,
            ctx,
            templates,
            converter,
            filters: Filters::default(),
            hooks: Hooks::default(),
            selection: ChapterSelection::All,
        }
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_selection(mut self, selection: ChapterSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Header, chapters, characters, locations, items, project notes and footer.
    pub fn render(&self) -> String {
        let mut text = self.render_header();
        text.push_str(&self.render_chapters());
        text.push_str(&self.render_characters());
        text.push_str(&self.render_locations());
        text.push_str(&self.render_items());
        text.push_str(&self.render_project_notes());
        text.push_str(&self.templates.file_footer);
        text
    }

    pub fn render_header(&self) -> String {
        let mut mapping = project_mapping(self.project, self.converter);
        if let Some(hook) = self.hooks.project {
            hook(self.project, &mut mapping);
        }
        substitute(&self.templates.file_header, &mapping)
    }

    pub fn render_footer(&self) -> String {
        self.templates.file_footer.to_string()
    }

    fn chapter_text(&self, template: &str, ch_id: &str, number: usize) -> String {
        let mut mapping = chapter_mapping(self.project, self.ctx, self.converter, ch_id, number);
        if let Some(hook) = self.hooks.chapter {
            hook(self.project, ch_id, &mut mapping);
        }
        substitute(template, &mapping)
    }

    pub fn render_chapters(&self) -> String {
        match self.selection {
            ChapterSelection::All => self.render_all_chapters(),
            ChapterSelection::Only(kind) => self.render_chapters_of(kind),
        }
    }

    fn render_all_chapters(&self) -> String {
        let t = self.templates;
        let mut out = String::new();
        let mut counters = Counters::default();
        for ch_id in &self.project.srt_chapters {
            if !(self.filters.chapter)(self.project, ch_id) {
                continue;
            }
            let Some(chapter) = self.project.chapters.get(ch_id) else {
                continue;
            };
            let scenes: Vec<_> = chapter
                .srt_scenes
                .iter()
                .filter_map(|id| self.project.scenes.get(id))
                .collect();
            let do_not_export =
                !scenes.is_empty() && scenes.iter().all(|s| s.do_not_export == Some(true));

            let mut number = 0;
            let opening: &str = match chapter.kind() {
                Kind::Todo if chapter.is_part() => &t.todo_part,
                Kind::Todo => &t.todo_chapter,
                Kind::Notes if chapter.is_part() => &t.notes_part,
                Kind::Notes => &t.notes_chapter,
                Kind::Unused => &t.unused_chapter,
                Kind::Normal if do_not_export => &t.not_exported_chapter,
                Kind::Normal if chapter.is_part() && !t.part.is_empty() => &t.part,
                Kind::Normal => {
                    counters.chapter_number += 1;
                    number = counters.chapter_number;
                    &t.chapter
                }
            };
            if !opening.is_empty() {
                out.push_str(&self.chapter_text(opening, ch_id, number));
            }

            out.push_str(&self.render_scenes(ch_id, &mut counters, do_not_export));

            let closing: &str = match chapter.kind() {
                Kind::Todo => &t.todo_chapter_end,
                Kind::Notes => &t.notes_chapter_end,
                Kind::Unused => &t.unused_chapter_end,
                Kind::Normal if do_not_export => &t.not_exported_chapter_end,
                Kind::Normal => &t.chapter_end,
            };
            if !closing.is_empty() {
                out.push_str(&self.chapter_text(closing, ch_id, number));
            }
        }
        out
    }

    fn render_chapters_of(&self, kind: Kind) -> String {
        let t = self.templates;
        let (part, chapter_template, end): (&str, &str, &str) = match kind {
            Kind::Notes => (&t.notes_part, &t.notes_chapter, &t.notes_chapter_end),
            Kind::Todo => (&t.todo_part, &t.todo_chapter, &t.todo_chapter_end),
            Kind::Unused => (&t.unused_chapter, &t.unused_chapter, &t.unused_chapter_end),
            Kind::Normal => (&t.part, &t.chapter, &t.chapter_end),
        };
        let mut out = String::new();
        if end.is_empty() {
            return out;
        }
        let mut counters = Counters::default();
        for ch_id in &self.project.srt_chapters {
            if !(self.filters.chapter)(self.project, ch_id) {
                continue;
            }
            let Some(chapter) = self.project.chapters.get(ch_id) else {
                continue;
            };
            if chapter.kind() != kind {
                continue;
            }
            let mut number = 0;
            let opening = if chapter.is_part() {
                part
            } else {
                counters.chapter_number += 1;
                number = counters.chapter_number;
                chapter_template
            };
            if opening.is_empty() {
                continue;
            }
            out.push_str(&self.chapter_text(opening, ch_id, number));
            out.push_str(&self.render_scenes(ch_id, &mut counters, false));
            out.push_str(&self.chapter_text(end, ch_id, number));
        }
        out
    }

    fn render_scenes(&self, ch_id: &str, counters: &mut Counters, do_not_export: bool) -> String {
        let t = self.templates;
        let mut out = String::new();
        let Some(chapter) = self.project.chapters.get(ch_id) else {
            return out;
        };
        let mut first_in_chapter = true;
        for sc_id in &chapter.srt_scenes {
            if !(self.filters.scene)(self.project, sc_id) {
                continue;
            }
            let Some(scene) = self.project.scenes.get(sc_id) else {
                continue;
            };
            let content = scene.content().unwrap_or_default();
            let append = scene.append_to_prev == Some(true);
            let mut number = 0;

            let mut template: &str = match scene.kind() {
                Kind::Todo => &t.todo_scene,
                Kind::Notes => &t.notes_scene,
                _ if scene.kind() == Kind::Unused || chapter.kind() == Kind::Unused => {
                    &t.unused_scene
                }
                _ if scene.do_not_export == Some(true) || do_not_export => &t.not_exported_scene,
                _ if content.starts_with("<HTML>") || content.starts_with("<TEX>") => continue,
                _ => {
                    counters.scene_number += 1;
                    number = counters.scene_number;
                    counters.words_total += scene.word_count();
                    counters.letters_total += scene.letter_count();
                    if !first_in_chapter && append && !t.appended_scene.is_empty() {
                        &t.appended_scene
                    } else {
                        &t.scene
                    }
                }
            };
            if number == 0 && template.is_empty() {
                continue;
            }
            if !(first_in_chapter || append) {
                out.push_str(&t.scene_divider);
            }
            if first_in_chapter && !t.first_scene.is_empty() {
                template = &*t.first_scene;
            }
            let mut mapping =
                scene_mapping(self.project, self.ctx, self.converter, sc_id, number, counters);
            if let Some(hook) = self.hooks.scene {
                hook(self.project, sc_id, &mut mapping);
            }
            out.push_str(&substitute(template, &mapping));
            first_in_chapter = false;
        }
        out
    }

    fn render_characters(&self) -> String {
        let mut out = self.templates.character_section_heading.to_string();
        for cr_id in &self.project.srt_characters {
            if !self.project.characters.contains_key(cr_id)
                || !(self.filters.character)(self.project, cr_id)
            {
                continue;
            }
            let mut mapping = character_mapping(self.project, self.ctx, self.converter, cr_id);
            if let Some(hook) = self.hooks.character {
                hook(self.project, cr_id, &mut mapping);
            }
            out.push_str(&substitute(&self.templates.character, &mapping));
        }
        out
    }

    fn render_locations(&self) -> String {
        let mut out = self.templates.location_section_heading.to_string();
        for lc_id in &self.project.srt_locations {
            if !self.project.locations.contains_key(lc_id)
                || !(self.filters.location)(self.project, lc_id)
            {
                continue;
            }
            let mut mapping = location_mapping(self.project, self.ctx, self.converter, lc_id);
            if let Some(hook) = self.hooks.location {
                hook(self.project, lc_id, &mut mapping);
            }
            out.push_str(&substitute(&self.templates.location, &mapping));
        }
        out
    }

    fn render_items(&self) -> String {
        let mut out = self.templates.item_section_heading.to_string();
        for it_id in &self.project.srt_items {
            if !self.project.items.contains_key(it_id) || !(self.filters.item)(self.project, it_id) {
                continue;
            }
            let mut mapping = item_mapping(self.project, self.ctx, self.converter, it_id);
            if let Some(hook) = self.hooks.item {
                hook(self.project, it_id, &mut mapping);
            }
            out.push_str(&substitute(&self.templates.item, &mapping));
        }
        out
    }

    fn render_project_notes(&self) -> String {
        let mut out = String::new();
        for pn_id in &self.project.srt_prj_notes {
            if !self.project.project_notes.contains_key(pn_id) {
                continue;
            }
            let mapping = project_note_mapping(self.project, self.ctx, self.converter, pn_id);
            out.push_str(&substitute(&self.templates.project_note, &mapping));
        }
        out
    }
}
