//! Spreadsheet rows per list

use crate::formats::common::table::{blank_unrated, ListKind};
use crate::templates::{Hooks, TemplateSet};

const HEADER: &str = include_str!("../../../assets/ods/content_header.xml");
const FOOTER: &str = include_str!("../../../assets/ods/content_footer.xml");

/// Blank heading cells Calc expects after the last used column.
const TRAILING_COLUMNS: usize = 1003;

#[derive(Debug, Clone, Copy)]
enum Cell {
    /// Element ID with its prefix, e.g. `CrID:$ID`
    Id(&'static str),
    /// Scene ID linked to the scene section of the manuscript
    SceneLink,
    Text(&'static str),
    Number(&'static str),
}

const SCENE_ROW: &[Cell] = &[
    Cell::SceneLink,
    Cell::Text("Title"),
    Cell::Text("Desc"),
    Cell::Text("Tags"),
    Cell::Text("Notes"),
    Cell::Text("ReactionScene"),
    Cell::Text("Goal"),
    Cell::Text("Conflict"),
    Cell::Text("Outcome"),
    Cell::Number("SceneNumber"),
    Cell::Number("WordsTotal"),
    Cell::Number("Field1"),
    Cell::Number("Field2"),
    Cell::Number("Field3"),
    Cell::Number("Field4"),
    Cell::Number("WordCount"),
    Cell::Number("LetterCount"),
    Cell::Text("Status"),
    Cell::Text("Characters"),
    Cell::Text("Locations"),
    Cell::Text("Items"),
];

const CHARACTER_ROW: &[Cell] = &[
    Cell::Id("CrID"),
    Cell::Text("Title"),
    Cell::Text("FullName"),
    Cell::Text("AKA"),
    Cell::Text("Desc"),
    Cell::Text("Bio"),
    Cell::Text("Goals"),
    Cell::Text("Status"),
    Cell::Text("Tags"),
    Cell::Text("Notes"),
];

const LOCATION_ROW: &[Cell] = &[
    Cell::Id("LcID"),
    Cell::Text("Title"),
    Cell::Text("Desc"),
    Cell::Text("AKA"),
    Cell::Text("Tags"),
];

const ITEM_ROW: &[Cell] = &[
    Cell::Id("ItID"),
    Cell::Text("Title"),
    Cell::Text("Desc"),
    Cell::Text("AKA"),
    Cell::Text("Tags"),
];

// co1 2cm, co2 3cm, co3 4cm, co4 8cm
const SCENE_WIDTHS: &[&str] = &[
    "co1", "co3", "co4", "co3", "co4", "co1", "co4", "co4", "co4", "co1", "co1", "co1", "co1",
    "co1", "co1", "co1", "co1", "co2", "co3", "co3", "co3",
];
const CHARACTER_WIDTHS: &[&str] = &[
    "co1", "co3", "co3", "co3", "co4", "co4", "co4", "co2", "co3", "co4",
];
const WORLD_ELEMENT_WIDTHS: &[&str] = &["co1", "co3", "co4", "co3", "co3"];

fn row_cells(list: ListKind) -> &'static [Cell] {
    match list {
        ListKind::Scenes => SCENE_ROW,
        ListKind::Characters => CHARACTER_ROW,
        ListKind::Locations => LOCATION_ROW,
        ListKind::Items => ITEM_ROW,
    }
}

fn widths(list: ListKind) -> &'static [&'static str] {
    match list {
        ListKind::Scenes => SCENE_WIDTHS,
        ListKind::Characters => CHARACTER_WIDTHS,
        ListKind::Locations | ListKind::Items => WORLD_ELEMENT_WIDTHS,
    }
}

fn header(list: ListKind) -> String {
    let mut out = String::from(HEADER);
    out.push_str(list.description());
    out.push_str("\" table:style-name=\"ta1\" table:print=\"false\">\n");
    for width in widths(list) {
        out.push_str(&format!(
            "    <table:table-column table:style-name=\"{width}\" table:default-cell-style-name=\"Default\"/>\n"
        ));
    }
    out.push_str("    <table:table-row table:style-name=\"ro1\">\n");
    for title in list.columns() {
        out.push_str(&format!(
            "     <table:table-cell table:style-name=\"Heading\" office:value-type=\"string\">\n      <text:p>{title}</text:p>\n     </table:table-cell>\n"
        ));
    }
    out.push_str(&format!(
        "     <table:table-cell table:style-name=\"Heading\" table:number-columns-repeated=\"{TRAILING_COLUMNS}\"/>\n    </table:table-row>\n\n"
    ));
    out
}

fn row(list: ListKind) -> String {
    let mut out = String::from("   <table:table-row table:style-name=\"ro2\">\n");
    for cell in row_cells(list) {
        let text = match cell {
            Cell::Id(prefix) => format!(
                "     <table:table-cell office:value-type=\"string\">\n      <text:p>{prefix}:$ID</text:p>\n     </table:table-cell>\n"
            ),
            Cell::SceneLink => concat!(
                "     <table:table-cell table:formula=\"of:=HYPERLINK(&quot;file:///$ProjectPath/${ProjectName}_manuscript.odt#ScID:$ID%7Cregion&quot;;&quot;ScID:$ID&quot;)\" ",
                "office:value-type=\"string\" office:string-value=\"ScID:$ID\">\n",
                "      <text:p>ScID:$ID</text:p>\n     </table:table-cell>\n"
            )
            .to_string(),
            Cell::Text(key) => format!(
                "     <table:table-cell office:value-type=\"string\">\n      <text:p>${key}</text:p>\n     </table:table-cell>\n"
            ),
            Cell::Number(key) => format!(
                "     <table:table-cell office:value-type=\"float\" office:value=\"${key}\">\n      <text:p>${key}</text:p>\n     </table:table-cell>\n"
            ),
        };
        out.push_str(&text);
    }
    out.push_str("    </table:table-row>\n\n");
    out
}

/// Templates and hooks of one spreadsheet list.
pub(super) fn writer(list: ListKind) -> (TemplateSet, Hooks) {
    let mut templates = TemplateSet {
        file_header: header(list).into(),
        file_footer: FOOTER.into(),
        ..TemplateSet::default()
    };
    let mut hooks = Hooks::default();
    match list {
        ListKind::Scenes => {
            templates.scene = row(list).into();
            hooks.scene = Some(blank_unrated);
        }
        ListKind::Characters => templates.character = row(list).into(),
        ListKind::Locations => templates.location = row(list).into(),
        ListKind::Items => templates.item = row(list).into(),
    }
    (templates, hooks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_match_columns() {
        for list in ListKind::ALL {
            assert_eq!(row_cells(list).len(), list.columns().len());
            assert_eq!(widths(list).len(), list.columns().len());
        }
    }

    #[test]
    fn test_header_names_the_table() {
        let text = header(ListKind::Items);
        assert!(text.contains("<table:table table:name=\"Item list\" table:style-name=\"ta1\""));
        assert!(text.contains("<text:p>Description</text:p>"));
    }
}
