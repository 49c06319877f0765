//! [`Project`] into a yWriter 7 element tree
//!
//!     The tree of the previous read is updated in place. Scene and chapter elements keep their
//!     unknown children; world elements, project notes and ID lists are rebuilt from the model.
//!     Elements yWriter expects at a fixed position are inserted with a running index, everything
//!     else is appended.

use super::tree::XmlElement;
use super::{PROJECT_FIELDS, SCENE_FIELDS};
use crate::model::kind::{encode_chapter, encode_scene};
use crate::model::{
    create_id, list_to_string, Chapter, Character, Project, Scene, SceneTime, WorldElement,
};
use std::collections::HashMap;

pub const ROOT_TAG: &str = "YWRITER7";
const VERSION: &str = "7";

/// Empty yWriter 7 document.
pub fn new_tree() -> XmlElement {
    let mut root = XmlElement::new(ROOT_TAG);
    for section in [
        "PROJECT",
        "LOCATIONS",
        "ITEMS",
        "CHARACTERS",
        "PROJECTNOTES",
        "SCENES",
        "CHAPTERS",
    ] {
        root.sub_element(section, None);
    }
    root
}

/// Write `project` into `root`.
///
/// The project is expected to carry its language list; the locale is checked against the
/// fallback before project variables are written.
pub fn build_tree(
    project: &mut Project,
    root: &mut XmlElement,
    fallback_language: &str,
    fallback_country: &str,
) {
    build_project(section(root, "PROJECT"), project);

    let locations = section(root, "LOCATIONS");
    locations.remove_all("LOCATION");
    for (index, id) in project.srt_locations.iter().enumerate() {
        if let Some(location) = project.locations.get(id) {
            locations.push(world_element("LOCATION", id, location, index + 1));
        }
    }

    let items = section(root, "ITEMS");
    items.remove_all("ITEM");
    for (index, id) in project.srt_items.iter().enumerate() {
        if let Some(item) = project.items.get(id) {
            items.push(world_element("ITEM", id, item, index + 1));
        }
    }

    let characters = section(root, "CHARACTERS");
    characters.remove_all("CHARACTER");
    for (index, id) in project.srt_characters.iter().enumerate() {
        if let Some(character) = project.characters.get(id) {
            characters.push(character_element(id, character, index + 1));
        }
    }

    build_project_notes(root, project);

    let has_locale = project.languages.as_ref().is_some_and(|l| !l.is_empty())
        || project.language_code.as_ref().is_some_and(|c| !c.is_empty())
        || project.country_code.as_ref().is_some_and(|c| !c.is_empty());
    if has_locale {
        project.check_locale(fallback_language, fallback_country);
        build_project_vars(section(root, "PROJECTVARS"), project);
    }

    let scenes = section(root, "SCENES");
    let mut existing = by_id(scenes.remove_all("SCENE"));
    let mut scene_ids: Vec<&String> = project.scenes.keys().collect();
    scene_ids.sort_by(|a, b| numeric_key(a).cmp(&numeric_key(b)));
    for sc_id in scene_ids {
        let mut element = existing
            .remove(sc_id)
            .unwrap_or_else(|| with_id("SCENE", sc_id));
        build_scene(&mut element, project, sc_id, &project.scenes[sc_id]);
        scenes.push(element);
    }

    let chapters = section(root, "CHAPTERS");
    let mut existing = by_id(chapters.remove_all("CHAPTER"));
    for (index, ch_id) in project.srt_chapters.iter().enumerate() {
        let Some(chapter) = project.chapters.get(ch_id) else {
            continue;
        };
        let mut element = existing
            .remove(ch_id)
            .unwrap_or_else(|| with_id("CHAPTER", ch_id));
        build_chapter(&mut element, chapter, index + 1);
        chapters.push(element);
    }
}

fn numeric_key(id: &str) -> (u64, &str) {
    (id.parse().unwrap_or(u64::MAX), id)
}

fn section<'a>(root: &'a mut XmlElement, name: &str) -> &'a mut XmlElement {
    match root.position(name) {
        Some(index) => &mut root.children[index],
        None => root.sub_element(name, None),
    }
}

fn with_id(name: &str, id: &str) -> XmlElement {
    let mut element = XmlElement::new(name);
    element.sub_element("ID", Some(id));
    element
}

fn by_id(elements: Vec<XmlElement>) -> HashMap<String, XmlElement> {
    elements
        .into_iter()
        .filter_map(|e| e.child_text("ID").map(str::to_string).map(|id| (id, e)))
        .collect()
}

/// Set the text of `tag`, inserting it at `index` when missing; returns the index past it.
fn set_element(parent: &mut XmlElement, tag: &str, text: Option<&str>, index: usize) -> usize {
    let Some(text) = text else {
        return index;
    };
    match parent.find_mut(tag) {
        Some(element) => element.text = Some(text.to_string()),
        None => parent.insert(index, XmlElement::with_text(tag, text)),
    }
    index + 1
}

/// Update `tag` when present, append it when the value is non-empty.
fn set_or_add(parent: &mut XmlElement, tag: &str, text: Option<&str>) {
    let Some(text) = text else {
        return;
    };
    match parent.find_mut(tag) {
        Some(element) => element.text = Some(text.to_string()),
        None if !text.is_empty() => {
            parent.sub_element(tag, Some(text));
        }
        None => {}
    }
}

/// Update or append `tag` regardless of the value.
fn set_or_push(parent: &mut XmlElement, tag: &str, text: &str) {
    match parent.find_mut(tag) {
        Some(element) => element.text = Some(text.to_string()),
        None => {
            parent.sub_element(tag, Some(text));
        }
    }
}

/// yWriter flags are `-1` when set and absent otherwise.
fn set_flag(parent: &mut XmlElement, tag: &str, on: bool) {
    if on {
        if !parent.has(tag) {
            parent.sub_element(tag, Some("-1"));
        }
    } else {
        parent.remove(tag);
    }
}

/// Set a custom field below `Fields`, or remove it when the value is empty.
fn set_field(parent: &mut XmlElement, name: &str, value: Option<&str>) {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => set_or_push(section(parent, "Fields"), name, value),
        None => {
            if let Some(fields) = parent.find_mut("Fields") {
                fields.remove(name);
            }
        }
    }
}

fn build_project(xml: &mut XmlElement, project: &Project) {
    set_or_push(xml, "Ver", VERSION);
    let texts = [
        ("Title", &project.title),
        ("Desc", &project.desc),
        ("AuthorName", &project.author_name),
        ("Bio", &project.author_bio),
        ("FieldTitle1", &project.field_title1),
        ("FieldTitle2", &project.field_title2),
        ("FieldTitle3", &project.field_title3),
        ("FieldTitle4", &project.field_title4),
    ];
    for (tag, value) in texts {
        if let Some(value) = value {
            set_or_push(xml, tag, value);
        }
    }
    if let Some(count) = project.word_count_start {
        set_or_push(xml, "WordCountStart", &count.to_string());
    }
    if let Some(target) = project.word_target {
        set_or_push(xml, "WordTarget", &target.to_string());
    }

    // The locale lives in project variables.
    for name in PROJECT_FIELDS {
        set_field(xml, name, None);
    }
}

fn world_element(tag: &str, id: &str, element: &WorldElement, sort_order: usize) -> XmlElement {
    let mut xml = with_id(tag, id);
    let tags = element.tags.as_deref().map(list_to_string);
    for (name, value) in [
        ("Title", element.title.as_deref()),
        ("ImageFile", element.image.as_deref()),
        ("Desc", element.desc.as_deref()),
        ("AKA", element.aka.as_deref()),
        ("Tags", tags.as_deref()),
    ] {
        if let Some(value) = value {
            xml.sub_element(name, Some(value));
        }
    }
    xml.sub_element("SortOrder", Some(&sort_order.to_string()));
    xml
}

fn character_element(id: &str, character: &Character, sort_order: usize) -> XmlElement {
    let mut xml = with_id("CHARACTER", id);
    let optional = |xml: &mut XmlElement, name: &str, value: Option<&str>| {
        if let Some(value) = value {
            xml.sub_element(name, Some(value));
        }
    };
    optional(&mut xml, "Title", character.title.as_deref());
    optional(&mut xml, "Desc", character.desc.as_deref());
    optional(&mut xml, "ImageFile", character.image.as_deref());
    xml.sub_element("SortOrder", Some(&sort_order.to_string()));
    optional(&mut xml, "Notes", character.notes.as_deref());
    optional(&mut xml, "AKA", character.aka.as_deref());
    let tags = character.tags.as_deref().map(list_to_string);
    optional(&mut xml, "Tags", tags.as_deref());
    optional(&mut xml, "Bio", character.bio.as_deref());
    optional(&mut xml, "Goals", character.goals.as_deref());
    optional(&mut xml, "FullName", character.full_name.as_deref());
    if character.is_major == Some(true) {
        xml.sub_element("Major", Some("-1"));
    }
    xml
}

fn build_project_notes(root: &mut XmlElement, project: &Project) {
    if project.srt_prj_notes.is_empty() {
        root.remove("PROJECTNOTES");
        return;
    }
    let notes = section(root, "PROJECTNOTES");
    notes.remove_all("PROJECTNOTE");
    for (index, id) in project.srt_prj_notes.iter().enumerate() {
        let Some(note) = project.project_notes.get(id) else {
            continue;
        };
        let xml = notes.push(with_id("PROJECTNOTE", id));
        if let Some(title) = &note.title {
            xml.sub_element("Title", Some(title));
        }
        if let Some(desc) = &note.desc {
            xml.sub_element("Desc", Some(desc));
        }
        xml.sub_element("SortOrder", Some(&(index + 1).to_string()));
    }
}

/// Locale and language switches as project variables, so yWriter's own RTF export can use them.
fn build_project_vars(vars: &mut XmlElement, project: &Project) {
    let mut ids: Vec<String> = Vec::new();
    let mut languages = project.languages.clone().unwrap_or_default();
    let mut has_language = false;
    let mut has_country = false;

    for var in vars.children.iter_mut().filter(|c| c.name == "PROJECTVAR") {
        if let Some(id) = var.child_text("ID") {
            ids.push(id.to_string());
        }
        let title = var.child_text("Title").unwrap_or_default().to_string();
        if let Some(code) = title.strip_prefix("lang=") {
            languages.retain(|l| l != code);
        } else if title == "Language" {
            set_or_push(var, "Desc", project.language_code.as_deref().unwrap_or_default());
            has_language = true;
        } else if title == "Country" {
            set_or_push(var, "Desc", project.country_code.as_deref().unwrap_or_default());
            has_country = true;
        }
    }

    if !has_language {
        let code = project.language_code.clone().unwrap_or_default();
        add_project_var(vars, &mut ids, "Language", &code);
    }
    if !has_country {
        let code = project.country_code.clone().unwrap_or_default();
        add_project_var(vars, &mut ids, "Country", &code);
    }
    for code in languages {
        add_project_var(
            vars,
            &mut ids,
            &format!("lang={code}"),
            &format!("<HTM <SPAN LANG=\"{code}\"> /HTM>"),
        );
        add_project_var(vars, &mut ids, &format!("/lang={code}"), "<HTM </SPAN> /HTM>");
    }
}

fn add_project_var(vars: &mut XmlElement, ids: &mut Vec<String>, title: &str, desc: &str) {
    let id = create_id(ids.iter());
    let var = vars.push(with_id("PROJECTVAR", &id));
    var.sub_element("Title", Some(title));
    var.sub_element("Desc", Some(desc));
    var.sub_element("Tags", Some("0"));
    ids.push(id);
}

fn remove_date_time(xml: &mut XmlElement) {
    for tag in ["SpecificDateTime", "SpecificDateMode", "Day", "Hour", "Minute"] {
        xml.remove(tag);
    }
}

fn build_scene_time(xml: &mut XmlElement, when: &SceneTime) {
    match when {
        SceneTime::Specific { date, time } => {
            let mut date_time = format!("{date} {time}");
            if !time.is_empty() && time.matches(':').count() < 2 {
                date_time.push_str(":00");
            }
            if date_time == " " {
                remove_date_time(xml);
            } else if let Some(element) = xml.find_mut("SpecificDateTime") {
                element.text = Some(date_time);
            } else {
                xml.sub_element("SpecificDateTime", Some(&date_time));
                xml.sub_element("SpecificDateMode", Some("-1"));
                for tag in ["Day", "Hour", "Minute"] {
                    xml.remove(tag);
                }
            }
        }
        SceneTime::Unspecific { day, time } => {
            let day_empty = day.as_deref().map_or(true, str::is_empty);
            let time_empty = time.as_deref().map_or(true, str::is_empty);
            if day_empty && time_empty {
                remove_date_time(xml);
                return;
            }
            xml.remove("SpecificDateTime");
            xml.remove("SpecificDateMode");
            if let Some(day) = day {
                set_or_push(xml, "Day", day);
            }
            if let Some(time) = time {
                let mut parts = time.split(':');
                let hours = parts.next().unwrap_or_default();
                let minutes = parts.next().unwrap_or_default();
                set_or_push(xml, "Hour", hours);
                set_or_push(xml, "Minute", minutes);
            }
        }
    }
}

fn set_id_list(xml: &mut XmlElement, tag: &str, entry: &str, ids: Option<&Vec<String>>) {
    let Some(ids) = ids else {
        return;
    };
    let list = section(xml, tag);
    list.remove_all(entry);
    for id in ids {
        list.sub_element(entry, Some(id));
    }
}

fn build_scene(xml: &mut XmlElement, project: &Project, sc_id: &str, scene: &Scene) {
    set_element(xml, "Title", scene.title.as_deref(), 1);

    if !xml.has("BelongsToChID") {
        if let Some(ch_id) = project.chapter_of(sc_id) {
            xml.sub_element("BelongsToChID", Some(ch_id));
        }
    }
    set_or_add(xml, "Desc", scene.desc.as_deref());
    if !xml.has("SceneContent") {
        xml.sub_element("SceneContent", scene.content());
    }
    if !xml.has("WordCount") {
        xml.sub_element("WordCount", Some(&scene.word_count().to_string()));
    }
    if !xml.has("LetterCount") {
        xml.sub_element("LetterCount", Some(&scene.letter_count().to_string()));
    }

    let encoded = encode_scene(scene.kind());
    set_flag(xml, "Unused", encoded.unused);
    set_field(xml, "Field_SceneType", encoded.scene_type);

    match scene.do_not_export {
        Some(true) => {
            if !xml.has("ExportCondSpecific") {
                xml.sub_element("ExportCondSpecific", None);
            }
            xml.remove("ExportWhenRTF");
        }
        Some(false) => {
            if xml.has("ExportCondSpecific") && !xml.has("ExportWhenRTF") {
                xml.sub_element("ExportWhenRTF", Some("-1"));
            }
        }
        None => {}
    }

    for name in SCENE_FIELDS {
        set_field(xml, name, scene.kw_var.get(*name).map(String::as_str));
    }

    if let Some(status) = scene.status {
        set_or_push(xml, "Status", &status.rank().to_string());
    }
    let tags = scene.tags.as_deref().map(list_to_string);
    set_or_add(xml, "Notes", scene.notes.as_deref());
    set_or_add(xml, "Tags", tags.as_deref());
    set_or_add(xml, "Field1", scene.field1.as_deref());
    set_or_add(xml, "Field2", scene.field2.as_deref());
    set_or_add(xml, "Field3", scene.field3.as_deref());
    set_or_add(xml, "Field4", scene.field4.as_deref());
    set_flag(xml, "AppendToPrev", scene.append_to_prev == Some(true));

    if let Some(when) = &scene.when {
        build_scene_time(xml, when);
    }

    set_or_add(xml, "LastsDays", scene.lasts_days.as_deref());
    set_or_add(xml, "LastsHours", scene.lasts_hours.as_deref());
    set_or_add(xml, "LastsMinutes", scene.lasts_minutes.as_deref());
    set_flag(xml, "ReactionScene", scene.is_reaction_scene == Some(true));
    set_flag(xml, "SubPlot", scene.is_sub_plot == Some(true));
    set_or_add(xml, "Goal", scene.goal.as_deref());
    set_or_add(xml, "Conflict", scene.conflict.as_deref());
    set_or_add(xml, "Outcome", scene.outcome.as_deref());
    set_or_add(xml, "ImageFile", scene.image.as_deref());

    set_id_list(xml, "Characters", "CharID", scene.characters.as_ref());
    set_id_list(xml, "Locations", "LocID", scene.locations.as_ref());
    set_id_list(xml, "Items", "ItemID", scene.items.as_ref());

    if let Some(content) = scene.content() {
        set_or_push(xml, "SceneContent", content);
        set_or_push(xml, "WordCount", &scene.word_count().to_string());
        set_or_push(xml, "LetterCount", &scene.letter_count().to_string());
    }
    // Text lives in the project file since yWriter 7.
    xml.remove("RTFFile");
}

fn build_chapter(xml: &mut XmlElement, chapter: &Chapter, sort_order: usize) {
    let encoded = encode_chapter(chapter.kind());

    let mut i = 1;
    i = set_element(xml, "Title", chapter.title.as_deref(), i);
    i = set_element(xml, "Desc", chapter.desc.as_deref(), i);

    if encoded.unused {
        if !xml.has("Unused") {
            xml.insert(i, XmlElement::with_text("Unused", "-1"));
        }
    } else {
        xml.remove("Unused");
    }
    if xml.has("Unused") {
        i += 1;
    }

    i = set_element(xml, "SortOrder", Some(&sort_order.to_string()), i);

    let flags = [
        ("Field_SuppressChapterTitle", chapter.suppress_title == Some(true), Some("0")),
        ("Field_SuppressChapterBreak", chapter.suppress_break == Some(true), Some("0")),
        ("Field_IsTrash", chapter.is_trash == Some(true), None),
    ];
    for (name, on, off) in flags {
        if on {
            if !xml.has("Fields") {
                xml.insert(i, XmlElement::new("Fields"));
            }
            set_or_push(section(xml, "Fields"), name, "1");
        } else if let Some(fields) = xml.find_mut("Fields") {
            match off {
                Some(off) => {
                    if let Some(field) = fields.find_mut(name) {
                        field.text = Some(off.to_string());
                    }
                }
                None => {
                    fields.remove(name);
                }
            }
        }
    }
    if xml.has("Fields") {
        i += 1;
    }

    let is_part = chapter.is_part();
    if xml.has("SectionStart") {
        if !is_part {
            xml.remove("SectionStart");
        }
    } else if is_part {
        xml.insert(i, XmlElement::with_text("SectionStart", "-1"));
    }
    if xml.has("SectionStart") {
        i += 1;
    }

    i = set_element(xml, "Type", Some(encoded.type_code), i);
    i = set_element(xml, "ChapterType", Some(encoded.chapter_type), i);

    xml.remove("Scenes");
    if !chapter.srt_scenes.is_empty() {
        let mut scenes = XmlElement::new("Scenes");
        for sc_id in &chapter.srt_scenes {
            scenes.sub_element("ScID", Some(sc_id));
        }
        xml.insert(i, scenes);
    }
}
