use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use yw_babel::formats::Yw7File;
use yw_babel::model::{Chapter, Scene};
use yw_babel::Project;

fn write_project(dir: &Path) -> PathBuf {
    let mut project = Project::new();
    project.title = Some("Harbour".into());
    let mut scene = Scene {
        title: Some("Fog".into()),
        desc: Some("Nothing is seen.".into()),
        ..Default::default()
    };
    scene.set_content("Grey on grey.");
    project.scenes.insert("1".into(), scene);
    project.chapters.insert(
        "1".into(),
        Chapter {
            title: Some("Morning".into()),
            srt_scenes: vec!["1".into()],
            ..Default::default()
        },
    );
    project.srt_chapters.push("1".into());

    let path = dir.join("harbour.yw7");
    Yw7File::new(&path).write(&project).unwrap();
    path
}

#[test]
fn export_writes_document_next_to_project() {
    let dir = tempdir().unwrap();
    let project = write_project(dir.path());

    let mut cmd = cargo_bin_cmd!("ywcnv");
    cmd.arg("export")
        .arg(project.as_os_str())
        .arg("--suffix")
        .arg("_scenes")
        .arg("--format")
        .arg("html");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("File written:"));

    let html = fs::read_to_string(dir.path().join("harbour_scenes.html")).unwrap();
    assert!(html.contains("Nothing is seen."));
}

#[test]
fn file_argument_runs_default_command() {
    let dir = tempdir().unwrap();
    let project = write_project(dir.path());

    let mut cmd = cargo_bin_cmd!("ywcnv");
    cmd.arg(project.as_os_str()).arg("-s").arg("_chapters");
    cmd.assert().success();
    assert!(dir.path().join("harbour_chapters.odt").is_file());
}

#[test]
fn import_merges_edited_document() {
    let dir = tempdir().unwrap();
    let project = write_project(dir.path());
    cargo_bin_cmd!("ywcnv")
        .arg("export")
        .arg(project.as_os_str())
        .arg("--suffix")
        .arg("_scenelist")
        .arg("--format")
        .arg("csv")
        .assert()
        .success();

    let list = dir.path().join("harbour_scenelist.csv");
    let text = fs::read_to_string(&list).unwrap();
    fs::write(&list, text.replace("\"Fog\"", "\"Mist\"")).unwrap();

    cargo_bin_cmd!("ywcnv")
        .arg("import")
        .arg(list.as_os_str())
        .assert()
        .success();

    let read = Yw7File::new(&project).read().unwrap();
    assert_eq!(read.scenes["1"].title.as_deref(), Some("Mist"));
}

#[test]
fn locked_project_fails_with_exit_code() {
    let dir = tempdir().unwrap();
    let project = write_project(dir.path());
    fs::write(dir.path().join("harbour.yw7.lock"), "").unwrap();

    let mut cmd = cargo_bin_cmd!("ywcnv");
    cmd.arg("export")
        .arg(project.as_os_str())
        .arg("--suffix")
        .arg("_manuscript");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("yWriter seems to be open"));
}

#[test]
fn new_refuses_existing_project() {
    let dir = tempdir().unwrap();
    write_project(dir.path());
    let draft = dir.path().join("harbour.html");
    fs::write(&draft, "<html><body><h2>One</h2><p>Text</p></body></html>").unwrap();

    cargo_bin_cmd!("ywcnv")
        .arg("new")
        .arg(draft.as_os_str())
        .assert()
        .failure()
        .stderr(predicate::str::contains("File exists"));
}

#[test]
fn formats_lists_document_endings() {
    cargo_bin_cmd!("ywcnv")
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("_manuscript.odt"))
        .stdout(predicate::str::contains("_charlist.csv"));
}

#[test]
fn inspect_prints_project_json() {
    let dir = tempdir().unwrap();
    let project = write_project(dir.path());

    let output = cargo_bin_cmd!("ywcnv")
        .arg("inspect")
        .arg(project.as_os_str())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["title"], "Harbour");
    assert_eq!(json["scenes"]["1"]["title"], "Fog");
}

#[test]
fn config_file_turns_off_backups() {
    let dir = tempdir().unwrap();
    let project = write_project(dir.path());
    let config = dir.path().join("ywcnv.toml");
    fs::write(&config, "[output]\nkeep_backup = false\n").unwrap();

    for _ in 0..2 {
        cargo_bin_cmd!("ywcnv")
            .arg("export")
            .arg(project.as_os_str())
            .arg("--suffix")
            .arg("_scenes")
            .arg("--config")
            .arg(config.as_os_str())
            .assert()
            .success();
    }
    assert!(dir.path().join("harbour_scenes.odt").is_file());
    assert!(!dir.path().join("harbour_scenes.odt.bak").exists());
}
