//! Shared fixtures

use std::path::{Path, PathBuf};
use yw_babel::formats::Yw7File;
use yw_babel::model::{Chapter, Character, Kind, Scene, SceneStatus, WorldElement};
use yw_babel::Project;

/// Two chapters, a notes chapter and one of each world element.
pub fn sample_project() -> Project {
    let mut project = Project::new();
    project.title = Some("The Lighthouse".into());
    project.desc = Some("A keeper and a storm.".into());
    project.author_name = Some("Jo Doe".into());
    project.language_code = Some("en".into());
    project.country_code = Some("GB".into());

    project.characters.insert(
        "1".into(),
        Character {
            title: Some("Ada".into()),
            full_name: Some("Ada Byrne".into()),
            desc: Some("The keeper.".into()),
            is_major: Some(true),
            ..Default::default()
        },
    );
    project.srt_characters.push("1".into());
    project.locations.insert(
        "1".into(),
        WorldElement {
            title: Some("Harbour".into()),
            desc: Some("Ships and gulls".into()),
            aka: Some("Port".into()),
            tags: Some(vec!["sea".into(), "town".into()]),
            ..Default::default()
        },
    );
    project.srt_locations.push("1".into());
    project.items.insert(
        "1".into(),
        WorldElement {
            title: Some("Lamp".into()),
            ..Default::default()
        },
    );
    project.srt_items.push("1".into());

    let scenes = [
        ("1", "Arrival", "The boat lands.\nAda waits on the pier.", Kind::Normal),
        ("2", "Storm", "Wind [i]howls[/i] all night.", Kind::Normal),
        ("3", "Idea", "Maybe a ghost?", Kind::Notes),
    ];
    for (id, title, text, kind) in scenes {
        let mut scene = Scene {
            title: Some(title.into()),
            desc: Some(format!("{title} happens.")),
            kind: Some(kind),
            status: Some(SceneStatus::Draft),
            characters: Some(vec!["1".into()]),
            locations: Some(vec!["1".into()]),
            ..Default::default()
        };
        scene.set_content(text);
        project.scenes.insert(id.into(), scene);
    }

    let chapters = [
        ("1", "Landing", vec!["1"], Kind::Normal),
        ("2", "Night", vec!["2"], Kind::Normal),
        ("3", "Notes", vec!["3"], Kind::Notes),
    ];
    for (id, title, scenes, kind) in chapters {
        project.chapters.insert(
            id.into(),
            Chapter {
                title: Some(title.into()),
                level: Some(0),
                kind: Some(kind),
                srt_scenes: scenes.into_iter().map(String::from).collect(),
                ..Default::default()
            },
        );
        project.srt_chapters.push(id.into());
    }
    project
}

/// Write the sample project as `<dir>/lighthouse.yw7`.
pub fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("lighthouse.yw7");
    Yw7File::new(&path)
        .write(&sample_project())
        .expect("sample project is written");
    path
}

pub fn read_project(path: &Path) -> Project {
    Yw7File::new(path).read().expect("project is readable")
}
