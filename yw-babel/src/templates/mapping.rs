//! Placeholder values for projects, chapters, scenes and world elements

use super::{Mapping, TextConverter};
use crate::format::ExportContext;
use crate::model::{Project, NULL_DATE};

/// Divider for lists rendered into documents.
pub const LIST_DIVIDER: &str = ", ";

const ACTION_MARKER: &str = "A";
const REACTION_MARKER: &str = "R";
const MAJOR_MARKER: &str = "Major";
const MINOR_MARKER: &str = "Minor";

/// Running numbers while rendering; only normal scenes and chapters advance them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    pub chapter_number: usize,
    pub scene_number: usize,
    pub words_total: usize,
    pub letters_total: usize,
}

fn number_or_empty(n: usize) -> String {
    if n == 0 {
        String::new()
    } else {
        n.to_string()
    }
}

fn join_tags(tags: Option<&Vec<String>>) -> String {
    tags.map(|t| t.join(LIST_DIVIDER)).unwrap_or_default()
}

fn common(mapping: &mut Mapping, ctx: &ExportContext, conv: &dyn TextConverter) {
    mapping.insert("ProjectName", conv.convert(Some(&ctx.project_name), true));
    mapping.insert("ProjectPath", ctx.project_path.clone());
}

fn locale(mapping: &mut Mapping, project: &Project) {
    mapping.insert("Language", project.language_code.clone().unwrap_or_default());
    mapping.insert("Country", project.country_code.clone().unwrap_or_default());
}

pub fn project_mapping(project: &Project, conv: &dyn TextConverter) -> Mapping {
    let mut m = Mapping::new();
    m.insert("Title", conv.convert(project.title.as_deref(), true));
    m.insert("Desc", conv.convert(project.desc.as_deref(), false));
    m.insert("AuthorName", conv.convert(project.author_name.as_deref(), true));
    m.insert("AuthorBio", conv.convert(project.author_bio.as_deref(), true));
    m.insert("FieldTitle1", conv.convert(project.field_title1.as_deref(), true));
    m.insert("FieldTitle2", conv.convert(project.field_title2.as_deref(), true));
    m.insert("FieldTitle3", conv.convert(project.field_title3.as_deref(), true));
    m.insert("FieldTitle4", conv.convert(project.field_title4.as_deref(), true));
    locale(&mut m, project);
    m
}

pub fn chapter_mapping(
    project: &Project,
    ctx: &ExportContext,
    conv: &dyn TextConverter,
    ch_id: &str,
    chapter_number: usize,
) -> Mapping {
    let chapter = &project.chapters[ch_id];
    let mut m = Mapping::new();
    m.insert("ID", ch_id.to_string());
    m.insert("ChapterNumber", number_or_empty(chapter_number));
    m.insert("Title", conv.convert(chapter.title.as_deref(), true));
    m.insert("Desc", conv.convert(chapter.desc.as_deref(), false));
    common(&mut m, ctx, conv);
    locale(&mut m, project);
    m
}

pub fn scene_mapping(
    project: &Project,
    ctx: &ExportContext,
    conv: &dyn TextConverter,
    sc_id: &str,
    scene_number: usize,
    counters: &Counters,
) -> Mapping {
    let scene = &project.scenes[sc_id];

    let character_titles: Vec<String> = scene
        .characters
        .iter()
        .flatten()
        .filter_map(|id| project.characters.get(id))
        .map(|c| c.title.clone().unwrap_or_default())
        .collect();
    let viewpoint = character_titles.first().cloned().unwrap_or_default();
    let location_titles: Vec<String> = scene
        .locations
        .iter()
        .flatten()
        .filter_map(|id| project.locations.get(id))
        .map(|l| l.title.clone().unwrap_or_default())
        .collect();
    let item_titles: Vec<String> = scene
        .items
        .iter()
        .flatten()
        .filter_map(|id| project.items.get(id))
        .map(|i| i.title.clone().unwrap_or_default())
        .collect();

    let (sc_date, sc_day, combined_date) = match (scene.date(), scene.day()) {
        (Some(date), _) if date != NULL_DATE && !date.is_empty() => {
            (date.to_string(), String::new(), date.to_string())
        }
        (_, Some(day)) => (String::new(), day.to_string(), format!("Day {day}")),
        _ => (String::new(), String::new(), String::new()),
    };
    let sc_time = scene
        .time()
        .map(|t| t.rsplit_once(':').map_or(t, |(head, _)| head).to_string())
        .unwrap_or_default();

    let lasting = |value: &Option<String>| match value.as_deref() {
        Some(v) if v != "0" && !v.is_empty() => v.to_string(),
        _ => String::new(),
    };
    let lasts_days = lasting(&scene.lasts_days);
    let lasts_hours = lasting(&scene.lasts_hours);
    let lasts_minutes = lasting(&scene.lasts_minutes);
    let mut duration = String::new();
    if !lasts_days.is_empty() {
        duration.push_str(&format!("{lasts_days}d "));
    }
    if !lasts_hours.is_empty() {
        duration.push_str(&format!("{lasts_hours}h "));
    }
    if !lasts_minutes.is_empty() {
        duration.push_str(&format!("{lasts_minutes}min"));
    }

    let reaction = if scene.is_reaction_scene == Some(true) {
        REACTION_MARKER
    } else {
        ACTION_MARKER
    };

    let mut m = Mapping::new();
    m.insert("ID", sc_id.to_string());
    m.insert("SceneNumber", number_or_empty(scene_number));
    m.insert("Title", conv.convert(scene.title.as_deref(), true));
    m.insert("Desc", conv.convert(scene.desc.as_deref(), false));
    m.insert("WordCount", scene.word_count().to_string());
    m.insert("WordsTotal", counters.words_total.to_string());
    m.insert("LetterCount", scene.letter_count().to_string());
    m.insert("LettersTotal", counters.letters_total.to_string());
    m.insert(
        "Status",
        scene.status.map(|s| s.label().to_string()).unwrap_or_default(),
    );
    m.insert("SceneContent", conv.convert(scene.content(), false));
    m.insert("FieldTitle1", conv.convert(project.field_title1.as_deref(), true));
    m.insert("FieldTitle2", conv.convert(project.field_title2.as_deref(), true));
    m.insert("FieldTitle3", conv.convert(project.field_title3.as_deref(), true));
    m.insert("FieldTitle4", conv.convert(project.field_title4.as_deref(), true));
    m.insert("Field1", scene.field1.clone().unwrap_or_default());
    m.insert("Field2", scene.field2.clone().unwrap_or_default());
    m.insert("Field3", scene.field3.clone().unwrap_or_default());
    m.insert("Field4", scene.field4.clone().unwrap_or_default());
    m.insert("Date", sc_date);
    m.insert("Time", sc_time);
    m.insert("Day", sc_day);
    m.insert("ScDate", combined_date);
    m.insert("LastsDays", lasts_days);
    m.insert("LastsHours", lasts_hours);
    m.insert("LastsMinutes", lasts_minutes);
    m.insert("Duration", duration);
    m.insert("ReactionScene", reaction.to_string());
    m.insert("Goal", conv.convert(scene.goal.as_deref(), false));
    m.insert("Conflict", conv.convert(scene.conflict.as_deref(), false));
    m.insert("Outcome", conv.convert(scene.outcome.as_deref(), false));
    m.insert("Tags", conv.convert(Some(&join_tags(scene.tags.as_ref())), true));
    m.insert("Image", scene.image.clone().unwrap_or_default());
    m.insert("Characters", character_titles.join(LIST_DIVIDER));
    m.insert("Viewpoint", viewpoint);
    m.insert("Locations", location_titles.join(LIST_DIVIDER));
    m.insert("Items", item_titles.join(LIST_DIVIDER));
    m.insert("Notes", conv.convert(scene.notes.as_deref(), false));
    common(&mut m, ctx, conv);
    locale(&mut m, project);
    m
}

pub fn character_mapping(
    project: &Project,
    ctx: &ExportContext,
    conv: &dyn TextConverter,
    cr_id: &str,
) -> Mapping {
    let character = &project.characters[cr_id];
    let status = if character.is_major == Some(true) {
        MAJOR_MARKER
    } else {
        MINOR_MARKER
    };
    let mut m = Mapping::new();
    m.insert("ID", cr_id.to_string());
    m.insert("Title", conv.convert(character.title.as_deref(), true));
    m.insert("Desc", conv.convert(character.desc.as_deref(), false));
    m.insert("Tags", conv.convert(Some(&join_tags(character.tags.as_ref())), false));
    m.insert("Image", character.image.clone().unwrap_or_default());
    m.insert("AKA", conv.convert(character.aka.as_deref(), true));
    m.insert("Notes", conv.convert(character.notes.as_deref(), false));
    m.insert("Bio", conv.convert(character.bio.as_deref(), false));
    m.insert("Goals", conv.convert(character.goals.as_deref(), false));
    m.insert("FullName", conv.convert(character.full_name.as_deref(), true));
    m.insert("Status", status.to_string());
    common(&mut m, ctx, conv);
    m
}

fn world_element_mapping(
    element: &crate::model::WorldElement,
    ctx: &ExportContext,
    conv: &dyn TextConverter,
    id: &str,
) -> Mapping {
    let mut m = Mapping::new();
    m.insert("ID", id.to_string());
    m.insert("Title", conv.convert(element.title.as_deref(), true));
    m.insert("Desc", conv.convert(element.desc.as_deref(), false));
    m.insert("Tags", conv.convert(Some(&join_tags(element.tags.as_ref())), true));
    m.insert("Image", element.image.clone().unwrap_or_default());
    m.insert("AKA", conv.convert(element.aka.as_deref(), true));
    common(&mut m, ctx, conv);
    m
}

pub fn location_mapping(
    project: &Project,
    ctx: &ExportContext,
    conv: &dyn TextConverter,
    lc_id: &str,
) -> Mapping {
    world_element_mapping(&project.locations[lc_id], ctx, conv, lc_id)
}

pub fn item_mapping(
    project: &Project,
    ctx: &ExportContext,
    conv: &dyn TextConverter,
    it_id: &str,
) -> Mapping {
    world_element_mapping(&project.items[it_id], ctx, conv, it_id)
}

pub fn project_note_mapping(
    project: &Project,
    ctx: &ExportContext,
    conv: &dyn TextConverter,
    pn_id: &str,
) -> Mapping {
    let note = &project.project_notes[pn_id];
    let mut m = Mapping::new();
    m.insert("ID", pn_id.to_string());
    m.insert("Title", conv.convert(note.title.as_deref(), true));
    m.insert("Desc", conv.convert(note.desc.as_deref(), true));
    common(&mut m, ctx, conv);
    m
}
