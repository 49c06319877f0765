//! Comma separated lists
//!
//! The same four lists as the spreadsheets, with the same columns: scene list, character list,
//! location list and item list. Files are UTF-8 with every field quoted.

pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::{ExportContext, Format, SerializedDocument};
use crate::formats::common::table::ListKind;
use crate::model::Project;

pub const EXTENSION: &str = "csv";

/// CSV file of one list.
pub struct CsvFormat {
    list: ListKind,
    name: String,
}

impl CsvFormat {
    pub fn new(list: ListKind) -> Self {
        CsvFormat {
            list,
            name: format!("csv{}", list.suffix().replace('_', "-")),
        }
    }
}

impl Format for CsvFormat {
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
        parser::parse_from_csv(self.list, source)
    }

    fn serialize(
        &self,
        project: &Project,
        ctx: &ExportContext,
    ) -> Result<SerializedDocument, FormatError> {
        serializer::serialize_to_csv(self.list, project, ctx).map(SerializedDocument::Text)
    }
}
