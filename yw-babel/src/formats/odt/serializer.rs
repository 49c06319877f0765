//! ODT serialization
//!
//! Renders `content.xml` with the document's templates and packs it with the static parts.

use super::templates::writer;
use super::OdtDocument;
use crate::common::markup::{convert_odt_notes, mark_odt_quotations, OdtText};
use crate::error::FormatError;
use crate::format::ExportContext;
use crate::formats::common::export_copy;
use crate::formats::common::package::ODT_ASSETS;
use crate::model::Project;
use crate::templates::Renderer;
use tracing::debug;

/// Render the `content.xml` of `document`.
pub fn render_content(document: OdtDocument, project: &Project, ctx: &ExportContext) -> String {
    let writer = writer(document);
    let languages = project.languages.clone().unwrap_or_default();
    let author = project.author_name.clone().unwrap_or_default();
    let converter = OdtText::new(writer.flavour, &languages, &author);
    let mut content = Renderer::new(project, ctx, &writer.templates, &converter)
        .with_hooks(writer.hooks)
        .with_selection(writer.selection)
        .render();
    if writer.notes {
        content = convert_odt_notes(&content, &author);
    }
    if writer.quotations {
        content = mark_odt_quotations(&content);
    }
    content
}

/// Serialize `project` as an ODT package of type `document`.
pub fn serialize_to_odt(
    document: OdtDocument,
    project: &Project,
    ctx: &ExportContext,
) -> Result<Vec<u8>, FormatError> {
    let project = export_copy(project, ctx);
    let content = render_content(document, &project, ctx);
    debug!(document = document.suffix(), bytes = content.len(), "content.xml rendered");
    ODT_ASSETS.package(&project, ctx, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chapter, Character, Kind, Scene};

    fn project() -> Project {
        let mut project = Project::new();
        project.title = Some("Book".into());
        project.author_name = Some("Jo".into());
        project.language_code = Some("en".into());
        project.country_code = Some("GB".into());
        let mut scene = Scene {
            title: Some("Start".into()),
            desc: Some("It begins".into()),
            ..Default::default()
        };
        scene.set_content("First [i]line[/i]\n> Quoted");
        project.scenes.insert("1".into(), scene);
        let mut note = Scene {
            title: Some("Idea".into()),
            kind: Some(Kind::Notes),
            ..Default::default()
        };
        note.set_content("Remember");
        project.scenes.insert("2".into(), note);
        project.chapters.insert(
            "1".into(),
            Chapter {
                title: Some("One".into()),
                desc: Some("First chapter".into()),
                level: Some(0),
                srt_scenes: vec!["1".into()],
                ..Default::default()
            },
        );
        project.chapters.insert(
            "2".into(),
            Chapter {
                title: Some("Notes".into()),
                level: Some(0),
                kind: Some(Kind::Notes),
                srt_scenes: vec!["2".into()],
                ..Default::default()
            },
        );
        project.srt_chapters = vec!["1".into(), "2".into()];
        project.characters.insert(
            "1".into(),
            Character {
                title: Some("Al".into()),
                full_name: Some("Alan".into()),
                aka: Some("Big".into()),
                bio: Some("Born".into()),
                ..Default::default()
            },
        );
        project.srt_characters.push("1".into());
        project.get_languages();
        project
    }

    fn ctx() -> ExportContext {
        ExportContext::new("book", "/tmp")
    }

    #[test]
    fn test_manuscript_sections_and_quotations() {
        let content = render_content(OdtDocument::Manuscript, &project(), &ctx());
        assert!(content.contains("<text:section text:style-name=\"Sect1\" text:name=\"ChID:1\">"));
        assert!(content.contains("text:name=\"ScID:1\""));
        assert!(content.contains("<dc:creator>Scene</dc:creator><text:p>~ Start ~</text:p>"));
        assert!(content.contains("../book_scenes.odt#ScID:1%7Cregion"));
        assert!(content.contains("<text:span text:style-name=\"Emphasis\">line</text:span>"));
        assert!(content.contains("<text:p text:style-name=\"Quotations\">Quoted"));
        assert!(!content.contains("ScID:2"));
        assert!(content.contains("<office:automatic-styles/>"));
    }

    #[test]
    fn test_proof_marks() {
        let content = render_content(OdtDocument::Proof, &project(), &ctx());
        assert!(content.contains("[ChID:1]"));
        assert!(content.contains("[ScID:1]</text:p>"));
        assert!(content.contains("[ChID:2 (Notes)]"));
        assert!(content.contains("scene_20_mark_20_notes"));
        assert!(content.contains("style:name=\"T1\""));
    }

    #[test]
    fn test_notes_only_notes_chapters() {
        let content = render_content(OdtDocument::Notes, &project(), &ctx());
        assert!(content.contains("text:name=\"ChID:2\""));
        assert!(content.contains("Remember"));
        assert!(!content.contains("ChID:1"));
    }

    #[test]
    fn test_character_sections() {
        let content = render_content(OdtDocument::Characters, &project(), &ctx());
        assert!(content.contains("Al/Alan (\"Big\")</text:h>"));
        assert!(content.contains("text:name=\"CrID_bio:1\">\n<text:p text:style-name=\"Text_20_body\">Born"));
    }

    #[test]
    fn test_chapter_descriptions() {
        let content = render_content(OdtDocument::ChapterDesc, &project(), &ctx());
        assert!(content.contains("First chapter"));
        assert!(content.contains("../book_manuscript.odt#ChID:1%7Cregion"));
    }

    #[test]
    fn test_package_is_zip() {
        let bytes = serialize_to_odt(OdtDocument::Export, &project(), &ctx()).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
