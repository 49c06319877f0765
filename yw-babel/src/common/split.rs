//! Scene and chapter splitting
//!
//!     Imported scene text may carry divider lines that start new units:
//!
//!         ### Title|Description     new scene
//!         ## Title|Description      new chapter
//!         # Title|Description       new part
//!
//!     The markers share their first character, so they are tested longest first. Text after a
//!     chapter or part divider without a scene divider of its own starts a new scene anyway.
//!     New units take the next free numeric IDs and follow their origin in the order lists.

use crate::model::{Chapter, Kind, Project, Scene, SceneStatus};
use tracing::debug;

const SCENE_DIVIDER: &str = "###";
const CHAPTER_DIVIDER: &str = "##";
const PART_DIVIDER: &str = "#";
const DESC_SEPARATOR: char = '|';
const CLIP_TITLE: usize = 20;

/// Prefix marking fields of a scene whose text was split off.
pub const WARNING: &str = "(!)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Divider {
    Scene,
    Chapter,
    Part,
}

fn divider(line: &str) -> Option<Divider> {
    if line.starts_with(SCENE_DIVIDER) {
        Some(Divider::Scene)
    } else if line.starts_with(CHAPTER_DIVIDER) {
        Some(Divider::Chapter)
    } else if line.starts_with(PART_DIVIDER) {
        Some(Divider::Part)
    } else {
        None
    }
}

/// Title and description given on a divider line.
fn heading(line: &str) -> (String, String) {
    let mut parts = line
        .trim_matches(|c| c == '#' || c == ' ')
        .split(DESC_SEPARATOR);
    let title = parts.next().unwrap_or_default().to_string();
    let desc = parts.next().unwrap_or_default().to_string();
    (title, desc)
}

fn max_id<'a>(ids: impl Iterator<Item = &'a String>) -> u64 {
    ids.filter_map(|id| id.parse().ok()).max().unwrap_or(0)
}

fn warn_field(field: &mut Option<String>) {
    if let Some(text) = field {
        if !text.is_empty() && !text.starts_with(WARNING) {
            text.insert_str(0, WARNING);
        }
    }
}

/// Scene split off `parent`. Marks the parent and caps its status.
fn split_off(parent: &mut Scene, split_count: usize, title: &str, desc: &str) -> Scene {
    let title = if !title.is_empty() {
        title.to_string()
    } else {
        match parent.title.as_deref().filter(|t| !t.is_empty()) {
            Some(parent_title) if parent_title.chars().count() > CLIP_TITLE => {
                let clipped: String = parent_title.chars().take(CLIP_TITLE).collect();
                format!("{clipped}... Split: {split_count}")
            }
            Some(parent_title) => format!("{parent_title} Split: {split_count}"),
            None => format!("New Scene Split: {split_count}"),
        }
    };

    warn_field(&mut parent.desc);
    warn_field(&mut parent.goal);
    warn_field(&mut parent.conflict);
    warn_field(&mut parent.outcome);
    if parent.status.is_some_and(|s| s > SceneStatus::Draft) {
        parent.status = Some(SceneStatus::Draft);
    }

    Scene {
        title: Some(title),
        desc: (!desc.is_empty()).then(|| desc.to_string()),
        status: parent.status,
        kind: parent.kind,
        when: parent.when.clone(),
        lasts_days: parent.lasts_days.clone(),
        lasts_hours: parent.lasts_hours.clone(),
        lasts_minutes: parent.lasts_minutes.clone(),
        ..Default::default()
    }
}

fn new_chapter(title: String, desc: String, level: u8) -> Chapter {
    let title = if title.is_empty() {
        let fallback = if level == 0 { "New Chapter" } else { "New Part" };
        fallback.to_string()
    } else {
        title
    };
    Chapter {
        title: Some(title),
        desc: Some(desc),
        level: Some(level),
        kind: Some(Kind::Normal),
        ..Default::default()
    }
}

/// Split scenes at divider lines. Returns whether any new unit was created.
pub fn split_scenes(project: &mut Project) -> bool {
    let mut ch_id_max = max_id(project.srt_chapters.iter().chain(project.chapters.keys()));
    let mut sc_id_max = max_id(project.scenes.keys());
    let mut split = false;
    let mut srt_chapters = Vec::new();

    for ch_id in std::mem::take(&mut project.srt_chapters) {
        srt_chapters.push(ch_id.clone());
        let mut chapter_id = ch_id.clone();
        let mut srt_scenes = Vec::new();
        let scene_ids = project
            .chapters
            .get(&ch_id)
            .map(|c| c.srt_scenes.clone())
            .unwrap_or_default();

        for sc_id in scene_ids {
            srt_scenes.push(sc_id.clone());
            let Some(content) = project
                .scenes
                .get(&sc_id)
                .and_then(|s| s.content())
                .filter(|c| !c.is_empty())
                .map(str::to_string)
            else {
                continue;
            };

            let mut scene_id = sc_id.clone();
            let mut lines: Vec<&str> = Vec::new();
            let mut in_scene = true;
            let mut split_count = 0;

            for line in content.split('\n') {
                match divider(line) {
                    Some(Divider::Scene) => {
                        if in_scene {
                            set_lines(project, &scene_id, &mut lines);
                        }
                        split_count += 1;
                        sc_id_max += 1;
                        scene_id = sc_id_max.to_string();
                        let (title, desc) = heading(line);
                        add_scene(project, &sc_id, &scene_id, split_count, &title, &desc);
                        srt_scenes.push(scene_id.clone());
                        split = true;
                        in_scene = true;
                    }
                    Some(kind @ (Divider::Chapter | Divider::Part)) => {
                        if in_scene {
                            set_lines(project, &scene_id, &mut lines);
                            split_count = 0;
                            in_scene = false;
                        }
                        if let Some(chapter) = project.chapters.get_mut(&chapter_id) {
                            chapter.srt_scenes = std::mem::take(&mut srt_scenes);
                        }
                        ch_id_max += 1;
                        chapter_id = ch_id_max.to_string();
                        let (title, desc) = heading(line);
                        let level = if kind == Divider::Part { 1 } else { 0 };
                        project
                            .chapters
                            .insert(chapter_id.clone(), new_chapter(title, desc, level));
                        srt_chapters.push(chapter_id.clone());
                        split = true;
                    }
                    None if !in_scene => {
                        lines.push(line);
                        split_count += 1;
                        sc_id_max += 1;
                        scene_id = sc_id_max.to_string();
                        add_scene(project, &sc_id, &scene_id, split_count, "", "");
                        srt_scenes.push(scene_id.clone());
                        split = true;
                        in_scene = true;
                    }
                    None => lines.push(line),
                }
            }
            if in_scene {
                set_lines(project, &scene_id, &mut lines);
            }
        }
        if let Some(chapter) = project.chapters.get_mut(&chapter_id) {
            chapter.srt_scenes = srt_scenes;
        }
    }
    project.srt_chapters = srt_chapters;

    if split {
        debug!(
            chapters = project.chapters.len(),
            scenes = project.scenes.len(),
            "scenes split at divider lines"
        );
    }
    split
}

fn set_lines(project: &mut Project, sc_id: &str, lines: &mut Vec<&str>) {
    if let Some(scene) = project.scenes.get_mut(sc_id) {
        scene.set_content(lines.join("\n"));
    }
    lines.clear();
}

fn add_scene(
    project: &mut Project,
    parent_id: &str,
    sc_id: &str,
    split_count: usize,
    title: &str,
    desc: &str,
) {
    let Some(parent) = project.scenes.get_mut(parent_id) else {
        return;
    };
    let scene = split_off(parent, split_count, title, desc);
    project.scenes.insert(sc_id.to_string(), scene);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SceneTime;

    fn project_with(content: &str) -> Project {
        let mut project = Project::new();
        let mut scene = Scene {
            title: Some("Parent".into()),
            desc: Some("What happens".into()),
            status: Some(SceneStatus::Done),
            when: Some(SceneTime::Unspecific {
                day: Some("1".into()),
                time: None,
            }),
            ..Default::default()
        };
        scene.set_content(content);
        project.scenes.insert("1".into(), scene);
        project.chapters.insert(
            "1".into(),
            Chapter {
                title: Some("C1".into()),
                srt_scenes: vec!["1".into()],
                ..Default::default()
            },
        );
        project.srt_chapters.push("1".into());
        project
    }

    #[test]
    fn test_scene_divider_with_heading() {
        let mut project = project_with("A\n### B|desc\nC");
        assert!(split_scenes(&mut project));
        assert_eq!(project.chapters["1"].srt_scenes, vec!["1", "2"]);
        assert_eq!(project.scenes["1"].content(), Some("A"));
        let new = &project.scenes["2"];
        assert_eq!(new.title.as_deref(), Some("B"));
        assert_eq!(new.desc.as_deref(), Some("desc"));
        assert_eq!(new.content(), Some("C"));
    }

    #[test]
    fn test_explicit_title_skips_split_suffix() {
        let mut project = project_with("first\n###Foo|Bar\nsecond");
        split_scenes(&mut project);
        assert_eq!(project.chapters["1"].srt_scenes.len(), 2);
        assert_eq!(project.scenes["2"].title.as_deref(), Some("Foo"));
        assert_eq!(project.scenes["2"].desc.as_deref(), Some("Bar"));
    }

    #[test]
    fn test_derived_title_status_and_warning() {
        let mut project = project_with("A\n###\nB");
        split_scenes(&mut project);
        let parent = &project.scenes["1"];
        let new = &project.scenes["2"];
        assert_eq!(new.title.as_deref(), Some("Parent Split: 1"));
        assert_eq!(parent.desc.as_deref(), Some("(!)What happens"));
        assert_eq!(parent.status, Some(SceneStatus::Draft));
        assert_eq!(new.status, Some(SceneStatus::Draft));
        assert_eq!(new.when, parent.when);
    }

    #[test]
    fn test_long_parent_title_is_clipped() {
        let mut project = project_with("A\n###\nB");
        if let Some(scene) = project.scenes.get_mut("1") {
            scene.title = Some("A very long scene title indeed".into());
        }
        split_scenes(&mut project);
        assert_eq!(
            project.scenes["2"].title.as_deref(),
            Some("A very long scene ti... Split: 1")
        );
    }

    #[test]
    fn test_chapter_and_part_dividers() {
        let mut project = project_with("A\n## Next|Later\nB\n# Book Two\n### S\nC");
        assert!(split_scenes(&mut project));
        assert_eq!(project.srt_chapters, vec!["1", "2", "3"]);
        assert_eq!(project.chapters["1"].srt_scenes, vec!["1"]);

        let chapter = &project.chapters["2"];
        assert_eq!(chapter.title.as_deref(), Some("Next"));
        assert_eq!(chapter.desc.as_deref(), Some("Later"));
        assert_eq!(chapter.level, Some(0));
        // Headingless text after a chapter divider starts a scene of its own.
        assert_eq!(chapter.srt_scenes, vec!["2"]);
        assert_eq!(project.scenes["2"].content(), Some("B"));

        let part = &project.chapters["3"];
        assert!(part.is_part());
        assert_eq!(part.srt_scenes, vec!["3"]);
        assert_eq!(project.scenes["3"].title.as_deref(), Some("S"));
        assert_eq!(project.scenes["3"].content(), Some("C"));
    }

    #[test]
    fn test_untitled_chapter() {
        let mut project = project_with("A\n##\nB");
        split_scenes(&mut project);
        assert_eq!(project.chapters["2"].title.as_deref(), Some("New Chapter"));
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut project = project_with("A\n### B|desc\nC\n## D\nE");
        assert!(split_scenes(&mut project));
        let once = project.clone();
        assert!(!split_scenes(&mut project));
        assert_eq!(project, once);
    }
}
