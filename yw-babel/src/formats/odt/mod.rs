//! OpenDocument text
//!
//! Every ODT document this crate writes is the same package (see [`crate::formats::common::package`])
//! around a different `content.xml`. The document type is told by the file name suffix.
//!
//! # Document Table
//!
//! | Suffix          | Written from                          | Read back into                     |
//! |-----------------|---------------------------------------|------------------------------------|
//! | `_manuscript`   | chapters and normal scenes, sections  | scene content, scene titles        |
//! | `_proof`        | visible `[ScID:n]` markers            | scene content                      |
//! | `_scenes`       | scene descriptions                    | scene titles and descriptions      |
//! | `_chapters`     | chapter descriptions                  | chapter titles and descriptions    |
//! | `_parts`        | part descriptions                     | part titles and descriptions       |
//! | `_brf_synopsis` | headings and scene titles             | not read                           |
//! | (none)          | plain manuscript without IDs          | new project (import or outline)    |
//! | `_characters`   | character sections                    | description, bio, goals, notes     |
//! | `_locations`    | location sections                     | descriptions                       |
//! | `_items`        | item sections                         | descriptions                       |
//! | `_notes`        | notes chapters only                   | scene content of notes chapters    |
//! | `_todo`         | todo chapters only                    | scene content of todo chapters     |
//!
//! Sections carry the IDs (`ChID:3`, `ScID:12`, `CrID_bio:1`), so the word processor keeps them
//! through editing and the readers can map text back onto the project.
//!
//! An unsuffixed document is read as an outline when it uses third level headings, as a work in
//! progress otherwise.

pub mod parser;
pub mod serializer;
mod templates;

use crate::error::FormatError;
use crate::format::{ExportContext, Format, SerializedDocument};
use crate::formats::common::events::ReaderKind;
use crate::model::Project;

pub const EXTENSION: &str = "odt";

/// Marker style of third level headings in `content.xml`.
const OUTLINE_MARKER: &str = "Heading_20_3";

/// Document types written and read as ODT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdtDocument {
    Manuscript,
    Proof,
    SceneDesc,
    ChapterDesc,
    PartDesc,
    BriefSynopsis,
    Export,
    Characters,
    Locations,
    Items,
    Notes,
    Todo,
}

impl OdtDocument {
    pub const ALL: [OdtDocument; 12] = [
        OdtDocument::Manuscript,
        OdtDocument::Proof,
        OdtDocument::SceneDesc,
        OdtDocument::ChapterDesc,
        OdtDocument::PartDesc,
        OdtDocument::BriefSynopsis,
        OdtDocument::Export,
        OdtDocument::Characters,
        OdtDocument::Locations,
        OdtDocument::Items,
        OdtDocument::Notes,
        OdtDocument::Todo,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            OdtDocument::Manuscript => "_manuscript",
            OdtDocument::Proof => "_proof",
            OdtDocument::SceneDesc => "_scenes",
            OdtDocument::ChapterDesc => "_chapters",
            OdtDocument::PartDesc => "_parts",
            OdtDocument::BriefSynopsis => "_brf_synopsis",
            OdtDocument::Export => "",
            OdtDocument::Characters => "_characters",
            OdtDocument::Locations => "_locations",
            OdtDocument::Items => "_items",
            OdtDocument::Notes => "_notes",
            OdtDocument::Todo => "_todo",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OdtDocument::Manuscript => "Editable manuscript",
            OdtDocument::Proof => "Tagged manuscript for proofing",
            OdtDocument::SceneDesc => "Scene descriptions",
            OdtDocument::ChapterDesc => "Chapter descriptions",
            OdtDocument::PartDesc => "Part descriptions",
            OdtDocument::BriefSynopsis => "Brief synopsis",
            OdtDocument::Export => "Manuscript without IDs",
            OdtDocument::Characters => "Character descriptions",
            OdtDocument::Locations => "Location descriptions",
            OdtDocument::Items => "Item descriptions",
            OdtDocument::Notes => "Notes chapters",
            OdtDocument::Todo => "Todo chapters",
        }
    }

    /// Reader for documents of this type; `None` if they are write-only.
    pub fn reader(self) -> Option<ReaderKind> {
        match self {
            OdtDocument::Manuscript => Some(ReaderKind::Manuscript),
            OdtDocument::Proof => Some(ReaderKind::Proof),
            OdtDocument::SceneDesc => Some(ReaderKind::SceneDesc),
            OdtDocument::ChapterDesc => Some(ReaderKind::ChapterDesc),
            OdtDocument::PartDesc => Some(ReaderKind::PartDesc),
            OdtDocument::BriefSynopsis => None,
            OdtDocument::Export => Some(ReaderKind::Import),
            OdtDocument::Characters => Some(ReaderKind::Characters),
            OdtDocument::Locations => Some(ReaderKind::Locations),
            OdtDocument::Items => Some(ReaderKind::Items),
            OdtDocument::Notes => Some(ReaderKind::Notes),
            OdtDocument::Todo => Some(ReaderKind::Todo),
        }
    }
}

/// ODT document of one type.
pub struct OdtFormat {
    document: OdtDocument,
    name: String,
}

impl OdtFormat {
    pub fn new(document: OdtDocument) -> Self {
        let name = match document.suffix() {
            "" => "odt".to_string(),
            suffix => format!("odt{}", suffix.replace('_', "-")),
        };
        OdtFormat { document, name }
    }

    pub fn document(&self) -> OdtDocument {
        self.document
    }
}

impl Format for OdtFormat {
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
        self.document.reader().is_some()
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8]) -> Result<Project, FormatError> {
        let Some(mut kind) = self.document.reader() else {
            return Err(FormatError::UnsupportedFormat(format!(
                "{} documents cannot be read back",
                self.document.description()
            )));
        };
        let package = parser::OdtPackage::open(source)?;
        if kind == ReaderKind::Import && package.content.contains(OUTLINE_MARKER) {
            kind = ReaderKind::Outline;
        }
        package.read(kind)
    }

    fn serialize(
        &self,
        project: &Project,
        ctx: &ExportContext,
    ) -> Result<SerializedDocument, FormatError> {
        serializer::serialize_to_odt(self.document, project, ctx).map(SerializedDocument::Binary)
    }
}
