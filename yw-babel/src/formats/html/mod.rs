//! HTML documents
//!
//! HTML is both written and read. Writers produce one self-contained HTML5 file with embedded
//! CSS; readers parse HTML with `html5ever` into a `markup5ever_rcdom` tree and feed it to the
//! shared readers in [`crate::formats::common::events`].
//!
//! # Element Mapping
//!
//! | Project element       | HTML                                         |
//! |-----------------------|----------------------------------------------|
//! | Part, chapter         | `<div id="ChID:n">` with `<h1>` / `<h2>`     |
//! | Scene                 | `<div id="ScID:n">`, title in `<!-- ~ T ~ -->` |
//! | Paragraph             | `<p>`                                        |
//! | `> ` quotation line   | `<blockquote>`                               |
//! | `[i]`, `[b]`          | `<em>`, `<strong>` (`<i>`, `<b>` on import)  |
//! | `[lang=xx-YY]`        | `<span lang="xx-YY">`                        |
//! | `/* comment */`       | `<!-- comment -->`                           |
//! | Project locale        | `<html lang="xx-YY">`                        |
//! | Author, description   | `<meta name="author">`, `<meta name="description">` |
//!
//! Character, location, item, notes and todo documents are only read; they follow the same
//! section conventions (`CrID_desc:n`, `LcID:n`, `ItID:n`) as their ODT counterparts.
//!
//! An unsuffixed document is a work in progress without IDs, read as an outline when it uses
//! third level headings.

pub mod parser;
pub mod serializer;
mod templates;

use crate::error::FormatError;
use crate::format::{ExportContext, Format, SerializedDocument};
use crate::formats::common::events::ReaderKind;
use crate::model::Project;

pub const EXTENSION: &str = "html";

const OUTLINE_MARKER: &[u8] = b"<h3";

/// Document types read or written as HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlDocument {
    Manuscript,
    Proof,
    SceneDesc,
    ChapterDesc,
    PartDesc,
    Notes,
    Todo,
    Characters,
    Locations,
    Items,
    Import,
}

impl HtmlDocument {
    pub const ALL: [HtmlDocument; 11] = [
        HtmlDocument::Manuscript,
        HtmlDocument::Proof,
        HtmlDocument::SceneDesc,
        HtmlDocument::ChapterDesc,
        HtmlDocument::PartDesc,
        HtmlDocument::Notes,
        HtmlDocument::Todo,
        HtmlDocument::Characters,
        HtmlDocument::Locations,
        HtmlDocument::Items,
        HtmlDocument::Import,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            HtmlDocument::Manuscript => "_manuscript",
            HtmlDocument::Proof => "_proof",
            HtmlDocument::SceneDesc => "_scenes",
            HtmlDocument::ChapterDesc => "_chapters",
            HtmlDocument::PartDesc => "_parts",
            HtmlDocument::Notes => "_notes",
            HtmlDocument::Todo => "_todo",
            HtmlDocument::Characters => "_characters",
            HtmlDocument::Locations => "_locations",
            HtmlDocument::Items => "_items",
            HtmlDocument::Import => "",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            HtmlDocument::Manuscript => "Editable manuscript",
            HtmlDocument::Proof => "Tagged manuscript for proofing",
            HtmlDocument::SceneDesc => "Scene descriptions",
            HtmlDocument::ChapterDesc => "Chapter descriptions",
            HtmlDocument::PartDesc => "Part descriptions",
            HtmlDocument::Notes => "Notes chapters",
            HtmlDocument::Todo => "Todo chapters",
            HtmlDocument::Characters => "Character descriptions",
            HtmlDocument::Locations => "Location descriptions",
            HtmlDocument::Items => "Item descriptions",
            HtmlDocument::Import => "Work in progress",
        }
    }

    pub fn reader(self) -> ReaderKind {
        match self {
            HtmlDocument::Manuscript => ReaderKind::Manuscript,
            HtmlDocument::Proof => ReaderKind::Proof,
            HtmlDocument::SceneDesc => ReaderKind::SceneDesc,
            HtmlDocument::ChapterDesc => ReaderKind::ChapterDesc,
            HtmlDocument::PartDesc => ReaderKind::PartDesc,
            HtmlDocument::Notes => ReaderKind::Notes,
            HtmlDocument::Todo => ReaderKind::Todo,
            HtmlDocument::Characters => ReaderKind::Characters,
            HtmlDocument::Locations => ReaderKind::Locations,
            HtmlDocument::Items => ReaderKind::Items,
            HtmlDocument::Import => ReaderKind::Import,
        }
    }

    pub fn is_written(self) -> bool {
        templates::writer(self).is_some()
    }
}

/// HTML document of one type.
pub struct HtmlFormat {
    document: HtmlDocument,
    name: String,
}

impl HtmlFormat {
    pub fn new(document: HtmlDocument) -> Self {
        let name = match document.suffix() {
            "" => "html".to_string(),
            suffix => format!("html{}", suffix.replace('_', "-")),
        };
        HtmlFormat { document, name }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        self.document.description()
    }

    fn suffix(&self) -> &str {
        self.document.suffix()
    }

    fn extension(&self) -> &str {
        EXTENSION
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        self.document.is_written()
    }

    fn parse(&self, source: &[u8]) -> Result<Project, FormatError> {
        let mut kind = self.document.reader();
        if kind == ReaderKind::Import
            && source
                .windows(OUTLINE_MARKER.len())
                .any(|w| w.eq_ignore_ascii_case(OUTLINE_MARKER))
        {
            kind = ReaderKind::Outline;
        }
        parser::parse_from_html(kind, source)
    }

    fn serialize(
        &self,
        project: &Project,
        ctx: &ExportContext,
    ) -> Result<SerializedDocument, FormatError> {
        serializer::serialize_to_html(self.document, project, ctx).map(SerializedDocument::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chapter, Scene};

    #[test]
    fn test_names() {
        assert_eq!(HtmlFormat::new(HtmlDocument::SceneDesc).name(), "html-scenes");
        assert_eq!(HtmlFormat::new(HtmlDocument::Import).file_ending(), ".html");
        assert!(!HtmlFormat::new(HtmlDocument::Items).supports_serialization());
    }

    #[test]
    fn test_manuscript_round_trip() {
        let mut project = Project::new();
        let mut scene = Scene {
            title: Some("Fish & Chips".into()),
            ..Default::default()
        };
        scene.set_content("One [b]two[/b]\n> three\nfour");
        project.scenes.insert("3".into(), scene);
        project.chapters.insert(
            "1".into(),
            Chapter {
                title: Some("Lunch".into()),
                srt_scenes: vec!["3".into()],
                ..Default::default()
            },
        );
        project.srt_chapters.push("1".into());

        let format = HtmlFormat::new(HtmlDocument::Manuscript);
        let SerializedDocument::Text(html) =
            format.serialize(&project, &ExportContext::default()).unwrap()
        else {
            panic!("HTML is text");
        };
        let read = format.parse(html.as_bytes()).unwrap();
        assert_eq!(read.chapters["1"].title.as_deref(), Some("Lunch"));
        assert_eq!(read.scenes["3"].title.as_deref(), Some("Fish & Chips"));
        assert_eq!(read.scenes["3"].content(), Some("One [b]two[/b]\n> three\nfour"));
        assert_eq!(read.language_code.as_deref(), Some("en"));
    }

    #[test]
    fn test_unsuffixed_with_h3_is_outline() {
        let html = b"<h2>Act</h2><H3>Scene</H3><p>Plan</p>";
        let project = HtmlFormat::new(HtmlDocument::Import).parse(html).unwrap();
        assert_eq!(project.scenes["1"].desc.as_deref(), Some("Plan\n"));
    }
}
