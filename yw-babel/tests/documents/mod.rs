//! Export and import through the conversion driver

use crate::common::{read_project, sample_project, write_sample};
use insta::assert_snapshot;
use std::fs;
use yw_babel::model::Kind;
use yw_babel::{Converter, ExportContext, FormatRegistry, SerializedDocument};

fn text(document: SerializedDocument) -> String {
    match document {
        SerializedDocument::Text(text) => text,
        SerializedDocument::Binary(_) => panic!("expected a text document"),
    }
}

#[test]
fn test_location_list_csv() {
    let registry = FormatRegistry::with_defaults();
    let document = registry
        .serialize(&sample_project(), &ExportContext::default(), "csv-loclist")
        .unwrap();
    assert_snapshot!(text(document), @r#"
    "ID","Name","Description","Aka","Tags"
    "LcID:1","Harbour","Ships and gulls","Port","sea, town"
    "#);
}

#[test]
fn test_every_writer_renders_the_sample() {
    let registry = FormatRegistry::with_defaults();
    let project = sample_project();
    let ctx = ExportContext::new("lighthouse", "home/jo");
    for format in registry.formats() {
        if !format.supports_serialization() {
            continue;
        }
        let bytes = format.serialize(&project, &ctx).unwrap().into_bytes();
        assert!(!bytes.is_empty(), "{} wrote nothing", format.name());
    }
}

#[test]
fn test_inline_markup_survives_manuscript_round_trip() {
    let registry = FormatRegistry::with_defaults();
    let cases = [
        ("Plain text.", "Plain text."),
        ("A [i]quiet[/i] night.", "A [i]quiet[/i] night."),
        ("A [b]loud[/b] bang.", "A [b]loud[/b] bang."),
        (
            "She said [lang=fr-FR]bonjour[/lang=fr-FR].",
            "She said [lang=fr-FR]bonjour[/lang=fr-FR].",
        ),
        (
            "[i]Line one\nline two[/i]",
            "[i]Line one[/i]\n[i]line two[/i]",
        ),
    ];
    for name in ["odt-manuscript", "html-manuscript"] {
        for (content, expected) in cases {
            let mut project = sample_project();
            if let Some(scene) = project.scenes.get_mut("2") {
                scene.set_content(content);
            }
            project.languages = None;
            let bytes = registry
                .serialize(&project, &ExportContext::default(), name)
                .unwrap()
                .into_bytes();
            let read = registry.parse(&bytes, name).unwrap();
            assert_eq!(
                read.scenes["2"].content(),
                Some(expected),
                "{name} changed {content:?}"
            );
        }
    }
}

#[test]
fn test_unchanged_manuscript_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let before = read_project(&path);

    let converter = Converter::new();
    converter
        .export_from_yw(&path, "_manuscript", None)
        .unwrap();
    converter
        .import_to_yw(&dir.path().join("lighthouse_manuscript.odt"))
        .unwrap();

    let after = read_project(&path);
    assert_eq!(after.srt_chapters, before.srt_chapters);
    for id in ["1", "2"] {
        assert_eq!(after.scenes[id].title, before.scenes[id].title);
        assert_eq!(after.scenes[id].content(), before.scenes[id].content());
    }
}

#[test]
fn test_edited_html_manuscript_splits_scenes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let converter = Converter::new();
    converter
        .export_from_yw(&path, "_manuscript", Some("html"))
        .unwrap();

    let document = dir.path().join("lighthouse_manuscript.html");
    let html = fs::read_to_string(&document).unwrap();
    let edited = html.replacen(
        "<p>Wind <em>howls</em> all night.</p>",
        "<p>Wind <em>howls</em> all night.</p>\n<p>### Dawn|The storm is over</p>\n<p>Gulls again.</p>",
        1,
    );
    assert_ne!(html, edited);
    fs::write(&document, edited).unwrap();

    let status = converter.run(&document, None);
    assert!(status.starts_with("File written"), "{status}");

    let project = read_project(&path);
    assert_eq!(project.chapters["2"].srt_scenes, vec!["2", "4"]);
    assert_eq!(project.scenes["2"].content(), Some("Wind [i]howls[/i] all night."));
    let dawn = &project.scenes["4"];
    assert_eq!(dawn.title.as_deref(), Some("Dawn"));
    assert_eq!(dawn.desc.as_deref(), Some("The storm is over"));
    assert_eq!(dawn.content(), Some("Gulls again."));
    assert_eq!(project.scenes["3"].kind, Some(Kind::Notes));
}

#[test]
fn test_character_list_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let converter = Converter::new();
    converter.export_from_yw(&path, "_charlist", None).unwrap();
    let status = converter.run(&dir.path().join("lighthouse_charlist.ods"), None);
    assert!(status.starts_with("File written"), "{status}");

    let project = read_project(&path);
    let ada = &project.characters["1"];
    assert_eq!(ada.full_name.as_deref(), Some("Ada Byrne"));
    assert_eq!(ada.is_major, Some(true));
}

#[test]
fn test_new_project_from_outline() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("plan.html");
    fs::write(
        &source,
        "<html><head><title>Plan</title></head><body>\
         <h1>Book One</h1><h2>Act</h2><p>Setup</p><h3>Meet</h3><p>They meet.</p>\
         </body></html>",
    )
    .unwrap();

    let status = Converter::new().run(&source, None);
    assert!(status.starts_with("File written"), "{status}");

    let project = read_project(&dir.path().join("plan.yw7"));
    assert_eq!(project.title.as_deref(), Some("Plan"));
    assert_eq!(project.srt_chapters.len(), 2);
    let scene_titles: Vec<_> = project
        .scenes
        .values()
        .filter_map(|s| s.title.as_deref())
        .collect();
    assert_eq!(scene_titles, vec!["Meet"]);
}
