//! CSV serialization
//!
//! The templates render each record with control-character separators; the records are then
//! written through [`csv::Writer`] with every field quoted. Line breaks inside a field become
//! tabs (see [`CsvField`]).

use crate::common::markup::{CsvField, CSV_FIELD_SEPARATOR, CSV_RECORD_SEPARATOR};
use crate::error::FormatError;
use crate::format::ExportContext;
use crate::formats::common::export_copy;
use crate::formats::common::table::{blank_unrated, ListKind};
use crate::model::Project;
use crate::templates::{Hooks, Renderer, TemplateSet};
use csv::{QuoteStyle, WriterBuilder};
use tracing::debug;

const SCENE_FIELDS: &[&str] = &[
    "ScID:$ID",
    "$Title",
    "$Desc",
    "$Tags",
    "$Notes",
    "$ReactionScene",
    "$Goal",
    "$Conflict",
    "$Outcome",
    "$SceneNumber",
    "$WordsTotal",
    "$Field1",
    "$Field2",
    "$Field3",
    "$Field4",
    "$WordCount",
    "$LetterCount",
    "$Status",
    "$Characters",
    "$Locations",
    "$Items",
];

const CHARACTER_FIELDS: &[&str] = &[
    "CrID:$ID",
    "$Title",
    "$FullName",
    "$AKA",
    "$Desc",
    "$Bio",
    "$Goals",
    "$Status",
    "$Tags",
    "$Notes",
];

const LOCATION_FIELDS: &[&str] = &["LcID:$ID", "$Title", "$Desc", "$AKA", "$Tags"];

const ITEM_FIELDS: &[&str] = &["ItID:$ID", "$Title", "$Desc", "$AKA", "$Tags"];

fn fields(list: ListKind) -> &'static [&'static str] {
    match list {
        ListKind::Scenes => SCENE_FIELDS,
        ListKind::Characters => CHARACTER_FIELDS,
        ListKind::Locations => LOCATION_FIELDS,
        ListKind::Items => ITEM_FIELDS,
    }
}

/// Row template: the field templates joined by the field separator.
fn record(cells: &[&str]) -> String {
    let mut row = cells.join(&CSV_FIELD_SEPARATOR.to_string());
    row.push(CSV_RECORD_SEPARATOR);
    row
}

fn write_error(err: impl std::fmt::Display) -> FormatError {
    FormatError::WriteError(format!("cannot write CSV: {err}"))
}

/// Write the heading and the rendered records as quoted CSV.
fn write_records(columns: &[&str], rendered: &str) -> Result<String, FormatError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(columns).map_err(write_error)?;
    for row in rendered.split(CSV_RECORD_SEPARATOR).filter(|r| !r.is_empty()) {
        writer
            .write_record(row.split(CSV_FIELD_SEPARATOR))
            .map_err(write_error)?;
    }
    let bytes = writer.into_inner().map_err(write_error)?;
    String::from_utf8(bytes).map_err(write_error)
}

/// Serialize one list of `project` as CSV.
pub fn serialize_to_csv(
    list: ListKind,
    project: &Project,
    ctx: &ExportContext,
) -> Result<String, FormatError> {
    let project = export_copy(project, ctx);
    let row = record(fields(list));
    let mut templates = TemplateSet::default();
    let mut hooks = Hooks::default();
    match list {
        ListKind::Scenes => {
            templates.scene = row.into();
            hooks.scene = Some(blank_unrated);
        }
        ListKind::Characters => templates.character = row.into(),
        ListKind::Locations => templates.location = row.into(),
        ListKind::Items => templates.item = row.into(),
    }
    let rendered = Renderer::new(&project, ctx, &templates, &CsvField)
        .with_hooks(hooks)
        .render();
    let text = write_records(list.columns(), &rendered)?;
    debug!(list = list.suffix(), bytes = text.len(), "CSV rendered");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorldElement;

    #[test]
    fn test_fields_match_columns() {
        for list in ListKind::ALL {
            assert_eq!(fields(list).len(), list.columns().len());
        }
    }

    #[test]
    fn test_location_list() {
        let mut project = Project::new();
        project.locations.insert(
            "7".into(),
            WorldElement {
                title: Some("The \"Inn\"".into()),
                desc: Some("Warm\nLoud".into()),
                tags: Some(vec!["town".into(), "night".into()]),
                ..Default::default()
            },
        );
        project.srt_locations.push("7".into());
        let text =
            serialize_to_csv(ListKind::Locations, &project, &ExportContext::default()).unwrap();
        assert_eq!(
            text,
            "\"ID\",\"Name\",\"Description\",\"Aka\",\"Tags\"\n\
             \"LcID:7\",\"The \"\"Inn\"\"\",\"Warm\tLoud\",\"\",\"town, night\"\n"
        );
    }
}
