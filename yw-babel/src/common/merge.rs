//! Merging an imported partial project into the stored one
//!
//!     Readers return a [`Project`] holding only what their document carries. The merge applies
//!     it to the project read from the yw7 file:
//!
//!     - A field present in the source replaces the target's value; absent fields keep it.
//!       Titles only replace when non-empty. Empty lists count as present.
//!     - World elements and project notes are re-sequenced in source order when the source
//!       lists any; target entries the source does not mention follow in their old order.
//!     - Scene references to characters, locations and items are filtered against the merged
//!       collections, so those merge first.
//!     - A source chapter's scene list replaces the stored one, keeping only known scenes. A scene
//!       the source moved or dropped leaves the chapter; the scene itself is kept. Sources without
//!       any scene, such as chapter descriptions, leave the scene lists alone.
//!     - The chapter order is joined as a stable ordered union. Chapters are never deleted.
//!
//!     If the source brought scene text, the splitter runs afterwards, and kinds are propagated
//!     from chapters to scenes again.

use super::split::split_scenes;
use crate::model::{Chapter, Character, Project, ProjectNote, Scene, WorldElement};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What a merge did besides updating fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Divider lines in the imported text created new scenes or chapters.
    pub scenes_split: bool,
}

/// Merge `source` into `target`.
pub fn merge(target: &mut Project, source: Project) -> MergeReport {
    let has_text = source.scenes.values().any(|s| s.content().is_some());
    let has_scenes = !source.scenes.is_empty();
    let Project {
        title,
        desc,
        author_name,
        author_bio,
        field_title1,
        field_title2,
        field_title3,
        field_title4,
        word_count_start,
        word_target,
        language_code,
        country_code,
        languages,
        kw_var,
        chapters,
        scenes,
        characters,
        locations,
        items,
        project_notes,
        srt_chapters,
        srt_characters,
        srt_locations,
        srt_items,
        srt_prj_notes,
    } = source;

    set_title(&mut target.title, title);
    set(&mut target.desc, desc);
    set(&mut target.author_name, author_name);
    set(&mut target.author_bio, author_bio);
    set(&mut target.field_title1, field_title1);
    set(&mut target.field_title2, field_title2);
    set(&mut target.field_title3, field_title3);
    set(&mut target.field_title4, field_title4);
    set(&mut target.word_count_start, word_count_start);
    set(&mut target.word_target, word_target);
    set(&mut target.language_code, language_code);
    set(&mut target.country_code, country_code);
    set(&mut target.languages, languages);
    target.kw_var.extend(kw_var);

    merge_collection(
        &mut target.characters,
        &mut target.srt_characters,
        characters,
        &srt_characters,
        merge_character,
    );
    merge_collection(
        &mut target.locations,
        &mut target.srt_locations,
        locations,
        &srt_locations,
        merge_world_element,
    );
    merge_collection(
        &mut target.items,
        &mut target.srt_items,
        items,
        &srt_items,
        merge_world_element,
    );
    merge_collection(
        &mut target.project_notes,
        &mut target.srt_prj_notes,
        project_notes,
        &srt_prj_notes,
        merge_project_note,
    );

    // A scene the target does not know needs a source chapter to live in.
    let placed: Vec<&String> = chapters.values().flat_map(|c| &c.srt_scenes).collect();
    let (scenes, orphans): (BTreeMap<_, _>, BTreeMap<_, _>) = scenes
        .into_iter()
        .partition(|(id, _)| target.scenes.contains_key(id) || placed.contains(&id));
    if !orphans.is_empty() {
        debug!(skipped = orphans.len(), "scenes without chapter skipped");
    }
    let new_scenes = scenes.keys().filter(|id| !target.scenes.contains_key(*id)).count();
    for (sc_id, source_scene) in scenes {
        let scene = target.scenes.entry(sc_id).or_default();
        merge_scene(
            scene,
            source_scene,
            &target.characters,
            &target.locations,
            &target.items,
        );
    }

    merge_chapters(target, chapters, &srt_chapters, has_scenes);

    let scenes_split = has_text && split_scenes(target);
    target.propagate_kinds();

    info!(
        chapters = target.chapters.len(),
        scenes = target.scenes.len(),
        new_scenes,
        scenes_split,
        "projects merged"
    );
    MergeReport { scenes_split }
}

fn set<T>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}

fn set_title(target: &mut Option<String>, source: Option<String>) {
    if source.as_deref().is_some_and(|t| !t.is_empty()) {
        *target = source;
    }
}

fn set_ids<T>(target: &mut Option<Vec<String>>, source: Option<Vec<String>>, known: &BTreeMap<String, T>) {
    if let Some(ids) = source {
        *target = Some(ids.into_iter().filter(|id| known.contains_key(id)).collect());
    }
}

/// Insert each missing entry of `source` after its nearest preceding source entry.
pub fn stable_union(target: &mut Vec<String>, source: &[String]) {
    for (index, id) in source.iter().enumerate() {
        if target.contains(id) {
            continue;
        }
        let position = source[..index]
            .iter()
            .rev()
            .find_map(|prev| target.iter().position(|t| t == prev))
            .map_or(0, |p| p + 1);
        target.insert(position, id.clone());
    }
}

fn merge_collection<T: Default>(
    target: &mut BTreeMap<String, T>,
    target_order: &mut Vec<String>,
    source: BTreeMap<String, T>,
    source_order: &[String],
    merge_entry: fn(&mut T, T),
) {
    for (id, entry) in source {
        merge_entry(target.entry(id).or_default(), entry);
    }
    if source_order.is_empty() {
        return;
    }
    let mut order: Vec<String> = source_order
        .iter()
        .filter(|id| target.contains_key(*id))
        .cloned()
        .collect();
    for id in target_order.iter() {
        if !order.contains(id) {
            order.push(id.clone());
        }
    }
    for id in target.keys() {
        if !order.contains(id) {
            order.push(id.clone());
        }
    }
    *target_order = order;
}

fn merge_world_element(target: &mut WorldElement, source: WorldElement) {
    set_title(&mut target.title, source.title);
    set(&mut target.desc, source.desc);
    set(&mut target.image, source.image);
    set(&mut target.aka, source.aka);
    set(&mut target.tags, source.tags);
    target.kw_var.extend(source.kw_var);
}

fn merge_character(target: &mut Character, source: Character) {
    set_title(&mut target.title, source.title);
    set(&mut target.desc, source.desc);
    set(&mut target.image, source.image);
    set(&mut target.aka, source.aka);
    set(&mut target.tags, source.tags);
    set(&mut target.notes, source.notes);
    set(&mut target.bio, source.bio);
    set(&mut target.goals, source.goals);
    set(&mut target.full_name, source.full_name);
    set(&mut target.is_major, source.is_major);
    target.kw_var.extend(source.kw_var);
}

fn merge_project_note(target: &mut ProjectNote, source: ProjectNote) {
    set_title(&mut target.title, source.title);
    set(&mut target.desc, source.desc);
    target.kw_var.extend(source.kw_var);
}

fn merge_scene(
    target: &mut Scene,
    source: Scene,
    characters: &BTreeMap<String, Character>,
    locations: &BTreeMap<String, WorldElement>,
    items: &BTreeMap<String, WorldElement>,
) {
    if let Some(content) = source.content() {
        target.set_content(content);
    }
    set_title(&mut target.title, source.title);
    set(&mut target.desc, source.desc);
    set(&mut target.kind, source.kind);
    set(&mut target.do_not_export, source.do_not_export);
    set(&mut target.status, source.status);
    set(&mut target.notes, source.notes);
    set(&mut target.tags, source.tags);
    set(&mut target.field1, source.field1);
    set(&mut target.field2, source.field2);
    set(&mut target.field3, source.field3);
    set(&mut target.field4, source.field4);
    set(&mut target.append_to_prev, source.append_to_prev);
    set(&mut target.is_reaction_scene, source.is_reaction_scene);
    set(&mut target.is_sub_plot, source.is_sub_plot);
    set(&mut target.goal, source.goal);
    set(&mut target.conflict, source.conflict);
    set(&mut target.outcome, source.outcome);
    set_ids(&mut target.characters, source.characters, characters);
    set_ids(&mut target.locations, source.locations, locations);
    set_ids(&mut target.items, source.items, items);
    set(&mut target.when, source.when);
    set(&mut target.lasts_days, source.lasts_days);
    set(&mut target.lasts_hours, source.lasts_hours);
    set(&mut target.lasts_minutes, source.lasts_minutes);
    set(&mut target.image, source.image);
    target.kw_var.extend(source.kw_var);
}

fn merge_chapter_fields(target: &mut Chapter, source: &mut Chapter) {
    set_title(&mut target.title, source.title.take());
    set(&mut target.desc, source.desc.take());
    set(&mut target.level, source.level.take());
    set(&mut target.kind, source.kind.take());
    set(&mut target.suppress_title, source.suppress_title.take());
    set(&mut target.suppress_break, source.suppress_break.take());
    set(&mut target.is_trash, source.is_trash.take());
    target.kw_var.append(&mut source.kw_var);
}

fn merge_chapters(
    target: &mut Project,
    mut chapters: BTreeMap<String, Chapter>,
    order: &[String],
    has_scenes: bool,
) {
    let mut assigned: Vec<String> = Vec::new();
    for (ch_id, source_chapter) in chapters.iter_mut() {
        let chapter = target.chapters.entry(ch_id.clone()).or_default();
        merge_chapter_fields(chapter, source_chapter);
        if !has_scenes {
            continue;
        }
        chapter.srt_scenes = source_chapter
            .srt_scenes
            .iter()
            .filter(|sc_id| target.scenes.contains_key(*sc_id) && !assigned.contains(*sc_id))
            .cloned()
            .collect();
        assigned.extend(chapter.srt_scenes.iter().cloned());
    }

    // A scene lives in one chapter only.
    for (ch_id, other) in target.chapters.iter_mut() {
        if !chapters.contains_key(ch_id) {
            other.srt_scenes.retain(|sc_id| !assigned.contains(sc_id));
        }
    }

    let order: Vec<String> = order
        .iter()
        .filter(|id| target.chapters.contains_key(*id))
        .cloned()
        .collect();
    stable_union(&mut target.srt_chapters, &order);
    debug!(chapters = order.len(), "chapter lists merged");
}
