//! yWriter 7 element tree to [`Project`]
//!
//! Sections are read in dependency order: world elements first so scene references can be
//! checked, scenes before chapters so chapter scene lists can be checked. Unknown references
//! are dropped.

use super::tree::XmlElement;
use super::{PROJECT_FIELDS, SCENE_FIELDS};
use crate::model::kind::{decode_chapter, decode_scene};
use crate::model::{
    string_to_list, Chapter, Character, Project, ProjectNote, Scene, SceneStatus, SceneTime,
    WorldElement,
};
use chrono::NaiveDateTime;

pub fn read_project(root: &XmlElement) -> Project {
    let mut project = Project::new();
    if let Some(xml_project) = root.find("PROJECT") {
        read_project_data(xml_project, &mut project);
    }
    if let Some(section) = root.find("LOCATIONS") {
        read_world_elements(section, &mut project.locations, &mut project.srt_locations);
    }
    if let Some(section) = root.find("ITEMS") {
        read_world_elements(section, &mut project.items, &mut project.srt_items);
    }
    if let Some(section) = root.find("CHARACTERS") {
        read_characters(section, &mut project);
    }
    if let Some(section) = root.find("PROJECTVARS") {
        read_project_vars(section, &mut project);
    }
    if let Some(section) = root.find("PROJECTNOTES") {
        read_project_notes(section, &mut project);
    }
    if let Some(section) = root.find("SCENES") {
        read_scenes(section, &mut project);
    }
    if let Some(section) = root.find("CHAPTERS") {
        read_chapters(section, &mut project);
    }
    project.propagate_kinds();
    project
}

fn text(element: &XmlElement, name: &str) -> Option<String> {
    element.find(name).and_then(|e| e.text.clone())
}

fn tags(element: &XmlElement) -> Option<Vec<String>> {
    element.child_text("Tags").map(string_to_list)
}

fn field<'a>(element: &'a XmlElement, name: &str) -> Option<&'a str> {
    element
        .find_all("Fields")
        .find_map(|fields| fields.child_text(name))
}

fn read_project_data(xml: &XmlElement, project: &mut Project) {
    project.title = text(xml, "Title");
    project.author_name = text(xml, "AuthorName");
    project.author_bio = text(xml, "Bio");
    project.desc = text(xml, "Desc");
    project.field_title1 = text(xml, "FieldTitle1");
    project.field_title2 = text(xml, "FieldTitle2");
    project.field_title3 = text(xml, "FieldTitle3");
    project.field_title4 = text(xml, "FieldTitle4");
    project.word_count_start = xml
        .find("WordCountStart")
        .map(|e| e.text.as_deref().and_then(|t| t.trim().parse().ok()).unwrap_or(0));
    project.word_target = xml
        .find("WordTarget")
        .map(|e| e.text.as_deref().and_then(|t| t.trim().parse().ok()).unwrap_or(0));

    for name in PROJECT_FIELDS {
        if let Some(value) = field(xml, name).filter(|v| !v.is_empty()) {
            match *name {
                "Field_LanguageCode" => project.language_code = Some(value.to_string()),
                "Field_CountryCode" => project.country_code = Some(value.to_string()),
                _ => {}
            }
        }
    }
}

fn read_world_elements(
    section: &XmlElement,
    map: &mut std::collections::BTreeMap<String, WorldElement>,
    order: &mut Vec<String>,
) {
    for xml in &section.children {
        let Some(id) = xml.child_text("ID") else {
            continue;
        };
        let element = WorldElement {
            title: text(xml, "Title"),
            image: text(xml, "ImageFile"),
            desc: text(xml, "Desc"),
            aka: text(xml, "AKA"),
            tags: tags(xml),
            ..Default::default()
        };
        order.push(id.to_string());
        map.insert(id.to_string(), element);
    }
}

fn read_characters(section: &XmlElement, project: &mut Project) {
    for xml in &section.children {
        let Some(id) = xml.child_text("ID") else {
            continue;
        };
        let character = Character {
            title: text(xml, "Title"),
            image: text(xml, "ImageFile"),
            desc: text(xml, "Desc"),
            aka: text(xml, "AKA"),
            tags: tags(xml),
            notes: text(xml, "Notes"),
            bio: text(xml, "Bio"),
            goals: text(xml, "Goals"),
            full_name: text(xml, "FullName"),
            is_major: Some(xml.has("Major")),
            ..Default::default()
        };
        project.srt_characters.push(id.to_string());
        project.characters.insert(id.to_string(), character);
    }
}

/// Locale and extra languages are stored as project variables by older versions.
fn read_project_vars(section: &XmlElement, project: &mut Project) {
    for xml in &section.children {
        let Some(title) = xml.child_text("Title") else {
            continue;
        };
        match title {
            "Language" => {
                if let Some(desc) = xml.child_text("Desc") {
                    project.language_code = Some(desc.to_string());
                }
            }
            "Country" => {
                if let Some(desc) = xml.child_text("Desc") {
                    project.country_code = Some(desc.to_string());
                }
            }
            _ => {
                if let Some(code) = title.strip_prefix("lang=") {
                    project.languages.get_or_insert_with(Vec::new).push(code.to_string());
                }
            }
        }
    }
}

fn read_project_notes(section: &XmlElement, project: &mut Project) {
    for xml in &section.children {
        let Some(id) = xml.child_text("ID") else {
            continue;
        };
        let note = ProjectNote {
            title: text(xml, "Title"),
            desc: text(xml, "Desc"),
            ..Default::default()
        };
        project.srt_prj_notes.push(id.to_string());
        project.project_notes.insert(id.to_string(), note);
    }
}

fn read_scene_time(xml: &XmlElement) -> Option<SceneTime> {
    if let Some(element) = xml.find("SpecificDateTime") {
        let raw = element.text.as_deref().unwrap_or_default().trim();
        let parsed = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok());
        return Some(match parsed {
            Some(dt) => SceneTime::Specific {
                date: dt.format("%Y-%m-%d").to_string(),
                time: dt.format("%H:%M:%S").to_string(),
            },
            None => SceneTime::Specific {
                date: String::new(),
                time: String::new(),
            },
        });
    }

    let day = xml.find("Day").map(|e| {
        let day = e.text.as_deref().unwrap_or_default();
        if day.trim().parse::<i64>().is_ok() {
            day.to_string()
        } else {
            String::new()
        }
    });
    let hour = xml.find("Hour").map(|e| e.text.clone().unwrap_or_default());
    let minute = xml.find("Minute").map(|e| e.text.clone().unwrap_or_default());
    let time = if hour.is_some() || minute.is_some() {
        let hour = hour.unwrap_or_default();
        let minute = minute.unwrap_or_default();
        Some(format!("{hour:0>2}:{minute:0>2}:00"))
    } else {
        None
    };
    if day.is_none() && time.is_none() {
        return None;
    }
    Some(SceneTime::Unspecific { day, time })
}

fn id_list(xml: &XmlElement, section: &str, entry: &str, known: &[String]) -> Option<Vec<String>> {
    let ids: Vec<String> = xml
        .find(section)?
        .find_all(entry)
        .filter_map(|e| e.text.as_deref())
        .filter(|id| known.iter().any(|k| k == id))
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

fn read_scenes(section: &XmlElement, project: &mut Project) {
    for xml in &section.children {
        let Some(id) = xml.child_text("ID") else {
            continue;
        };
        let mut scene = Scene {
            title: text(xml, "Title"),
            desc: text(xml, "Desc"),
            ..Default::default()
        };
        if let Some(content) = xml.child_text("SceneContent") {
            scene.set_content(content);
        }
        scene.kind = Some(decode_scene(xml.has("Unused"), field(xml, "Field_SceneType")));
        for name in SCENE_FIELDS {
            if let Some(value) = field(xml, name) {
                scene.kw_var.insert(name.to_string(), value.to_string());
            }
        }
        scene.do_not_export = Some(xml.has("ExportCondSpecific") && !xml.has("ExportWhenRTF"));
        scene.status = xml
            .child_text("Status")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(SceneStatus::from_rank);
        scene.notes = text(xml, "Notes");
        scene.tags = tags(xml);
        scene.field1 = text(xml, "Field1");
        scene.field2 = text(xml, "Field2");
        scene.field3 = text(xml, "Field3");
        scene.field4 = text(xml, "Field4");
        scene.append_to_prev = Some(xml.has("AppendToPrev"));
        scene.when = read_scene_time(xml);
        scene.lasts_days = text(xml, "LastsDays");
        scene.lasts_hours = text(xml, "LastsHours");
        scene.lasts_minutes = text(xml, "LastsMinutes");
        scene.is_reaction_scene = Some(xml.has("ReactionScene"));
        scene.is_sub_plot = Some(xml.has("SubPlot"));
        scene.goal = text(xml, "Goal");
        scene.conflict = text(xml, "Conflict");
        scene.outcome = text(xml, "Outcome");
        scene.image = text(xml, "ImageFile");
        scene.characters = id_list(xml, "Characters", "CharID", &project.srt_characters);
        scene.locations = id_list(xml, "Locations", "LocID", &project.srt_locations);
        scene.items = id_list(xml, "Items", "ItemID", &project.srt_items);
        project.scenes.insert(id.to_string(), scene);
    }
}

fn read_chapters(section: &XmlElement, project: &mut Project) {
    for xml in &section.children {
        let Some(id) = xml.child_text("ID") else {
            continue;
        };
        let title = text(xml, "Title");
        let suppress_title = title.as_deref().is_some_and(|t| t.starts_with('@'))
            || field(xml, "Field_SuppressChapterTitle") == Some("1");
        let srt_scenes = xml
            .find("Scenes")
            .map(|scenes| {
                scenes
                    .find_all("ScID")
                    .filter_map(|e| e.text.as_deref())
                    .filter(|sc_id| project.scenes.contains_key(*sc_id))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let chapter = Chapter {
            title,
            desc: text(xml, "Desc"),
            level: Some(if xml.has("SectionStart") { 1 } else { 0 }),
            kind: Some(decode_chapter(
                xml.has("Unused"),
                xml.child_text("Type"),
                xml.child_text("ChapterType"),
            )),
            suppress_title: Some(suppress_title),
            suppress_break: Some(field(xml, "Field_SuppressChapterBreak") == Some("1")),
            is_trash: Some(field(xml, "Field_IsTrash") == Some("1")),
            srt_scenes,
            ..Default::default()
        };
        project.srt_chapters.push(id.to_string());
        project.chapters.insert(id.to_string(), chapter);
    }
}
