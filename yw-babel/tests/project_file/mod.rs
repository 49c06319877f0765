//! yw7 round trips and merge properties

use crate::common::{read_project, sample_project, write_sample};
use yw_babel::common::merge::merge;
use yw_babel::formats::Yw7File;
use yw_babel::model::{Kind, Scene};
use yw_babel::Project;

#[test]
fn test_round_trip_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let first = read_project(&path);

    let copy = dir.path().join("copy.yw7");
    Yw7File::new(&copy).write(&first).unwrap();
    let second = read_project(&copy);

    assert_eq!(first, second);
    assert_eq!(second.srt_chapters, vec!["1", "2", "3"]);
    assert_eq!(second.chapters["3"].kind, Some(Kind::Notes));
    assert_eq!(second.scenes["3"].kind, Some(Kind::Notes));
    assert_eq!(second.scenes["2"].content(), Some("Wind [i]howls[/i] all night."));
    assert_eq!(second.characters["1"].full_name.as_deref(), Some("Ada Byrne"));
}

#[test]
fn test_rewrite_keeps_unknown_elements() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let text = std::fs::read_to_string(&path).unwrap();
    let text = text.replacen("<PROJECT>", "<PROJECT>\n<Bookmark>42</Bookmark>", 1);
    std::fs::write(&path, text).unwrap();

    let mut file = Yw7File::new(&path);
    let mut project = file.read().unwrap();
    project.title = Some("The Lamp".into());
    file.write(&project).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("<Bookmark>42</Bookmark>"));
    assert!(text.contains("The Lamp"));
}

#[test]
fn test_merge_with_itself_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let project = read_project(&write_sample(dir.path()));
    let mut merged = project.clone();
    merge(&mut merged, project.clone());
    assert_eq!(merged, project);
}

#[test]
fn test_merge_never_removes_entities() {
    let mut target = sample_project();
    let mut source = Project::new();
    source.scenes.insert(
        "2".into(),
        Scene {
            title: Some("Gale".into()),
            ..Default::default()
        },
    );
    merge(&mut target, source);

    assert_eq!(target.scenes.len(), 3);
    assert_eq!(target.chapters.len(), 3);
    assert_eq!(target.characters.len(), 1);
    assert_eq!(target.scenes["2"].title.as_deref(), Some("Gale"));
    assert_eq!(
        target.scenes["2"].content(),
        Some("Wind [i]howls[/i] all night.")
    );
}

#[test]
fn test_empty_title_does_not_overwrite() {
    let mut target = sample_project();
    let mut source = Project::new();
    source.scenes.insert(
        "1".into(),
        Scene {
            title: Some(String::new()),
            desc: Some("Changed.".into()),
            ..Default::default()
        },
    );
    merge(&mut target, source);
    assert_eq!(target.scenes["1"].title.as_deref(), Some("Arrival"));
    assert_eq!(target.scenes["1"].desc.as_deref(), Some("Changed."));
}

#[test]
fn test_empty_list_overwrites() {
    let mut target = sample_project();
    let mut source = Project::new();
    source.scenes.insert(
        "1".into(),
        Scene {
            characters: Some(Vec::new()),
            ..Default::default()
        },
    );
    merge(&mut target, source);
    assert_eq!(target.scenes["1"].characters, Some(Vec::new()));
    assert_eq!(target.scenes["1"].title.as_deref(), Some("Arrival"));
}
