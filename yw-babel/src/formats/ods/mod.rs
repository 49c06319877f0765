//! OpenDocument spreadsheets
//!
//! One table per file: the scene list, character list, location list or item list. The first
//! column holds the element ID (`ScID:3`, `CrID:1`, ...); the scene list links it to the scene
//! section of the manuscript. Rows are read back by ID, so users may sort and filter freely.

pub mod parser;
pub mod serializer;
mod templates;

use crate::error::FormatError;
use crate::format::{ExportContext, Format, SerializedDocument};
use crate::formats::common::table::ListKind;
use crate::model::Project;

pub const EXTENSION: &str = "ods";

/// Spreadsheet of one list.
pub struct OdsFormat {
    list: ListKind,
    name: String,
}

impl OdsFormat {
    pub fn new(list: ListKind) -> Self {
        OdsFormat {
            list,
            name: format!("ods{}", list.suffix().replace('_', "-")),
        }
    }
}

impl Format for OdsFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        self.list.description()
    }

    fn suffix(&self) -> &str {
        self.list.suffix()
    }

    fn extension(&self) -> &str {
        EXTENSION
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8]) -> Result<Project, FormatError> {
        parser::parse_from_ods(self.list, source)
    }

    fn serialize(
        &self,
        project: &Project,
        ctx: &ExportContext,
    ) -> Result<SerializedDocument, FormatError> {
        serializer::serialize_to_ods(self.list, project, ctx).map(SerializedDocument::Binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Character, WorldElement};

    #[test]
    fn test_character_list_round_trip() {
        let mut project = Project::new();
        project.characters.insert(
            "3".into(),
            Character {
                title: Some("Al".into()),
                bio: Some("Born\nRaised".into()),
                tags: Some(vec!["hero".into(), "tall".into()]),
                is_major: Some(true),
                ..Default::default()
            },
        );
        project.srt_characters.push("3".into());
        let format = OdsFormat::new(ListKind::Characters);
        assert_eq!(format.name(), "ods-charlist");

        let SerializedDocument::Binary(bytes) =
            format.serialize(&project, &ExportContext::default()).unwrap()
        else {
            panic!("ODS is binary");
        };
        let read = format.parse(&bytes).unwrap();
        let al = &read.characters["3"];
        assert_eq!(al.bio.as_deref(), Some("Born\nRaised"));
        assert_eq!(al.tags, Some(vec!["hero".to_string(), "tall".to_string()]));
        assert_eq!(al.is_major, Some(true));
        assert_eq!(read.srt_characters, vec!["3"]);
    }

    #[test]
    fn test_item_list_ignores_locations() {
        let mut project = Project::new();
        project.items.insert(
            "1".into(),
            WorldElement {
                title: Some("Key".into()),
                ..Default::default()
            },
        );
        project.srt_items.push("1".into());
        project.locations.insert("1".into(), WorldElement::default());
        project.srt_locations.push("1".into());

        let format = OdsFormat::new(ListKind::Items);
        let SerializedDocument::Binary(bytes) =
            format.serialize(&project, &ExportContext::default()).unwrap()
        else {
            panic!("ODS is binary");
        };
        let read = format.parse(&bytes).unwrap();
        assert_eq!(read.items["1"].title.as_deref(), Some("Key"));
        assert!(read.locations.is_empty());
    }
}
