//! ODS parsing
//!
//! Reads the first table of `content.xml` into rows of cell strings. A cell's paragraphs are
//! joined with line breaks. Rows whose first cell is empty are skipped, cells beyond the list's
//! width are dropped, and `table:number-columns-repeated` is expanded up to that width.

use crate::error::FormatError;
use crate::formats::common::package::read_part;
use crate::formats::common::table::{read_rows, ListKind};
use crate::model::Project;
use roxmltree::Node;

const OFFICE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
const TABLE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";
const TEXT_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

fn paragraph_text(paragraph: Node) -> String {
    paragraph
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn row_cells(row: Node, width: usize) -> Vec<String> {
    let mut cells = Vec::new();
    for cell in row
        .children()
        .filter(|n| n.has_tag_name((TABLE_NS, "table-cell")))
    {
        let paragraphs: Vec<String> = cell
            .children()
            .filter(|n| n.has_tag_name((TEXT_NS, "p")))
            .map(paragraph_text)
            .collect();
        if paragraphs.is_empty() && cells.is_empty() {
            break;
        }
        let content = paragraphs.join("\n");
        cells.push(content.clone());
        if cells.len() >= width {
            break;
        }
        let repeat = cell
            .attribute((TABLE_NS, "number-columns-repeated"))
            .and_then(|r| r.parse::<usize>().ok())
            .unwrap_or(1);
        for _ in 1..repeat {
            if cells.len() >= width {
                break;
            }
            cells.push(content.clone());
        }
    }
    cells
}

/// Rows of the first table in `content`, at most `width` cells each.
pub fn table_rows(content: &str, width: usize) -> Result<Vec<Vec<String>>, FormatError> {
    let doc = roxmltree::Document::parse(content)
        .map_err(|e| FormatError::ParseError(format!("cannot parse ODS document: {e}")))?;
    let table = doc
        .descendants()
        .find(|n| n.has_tag_name((OFFICE_NS, "spreadsheet")))
        .and_then(|s| s.children().find(|n| n.has_tag_name((TABLE_NS, "table"))))
        .ok_or_else(|| FormatError::ParseError("ODS document without a table".into()))?;
    Ok(table
        .children()
        .filter(|n| n.has_tag_name((TABLE_NS, "table-row")))
        .map(|row| row_cells(row, width))
        .filter(|cells| !cells.is_empty())
        .collect())
}

/// Read one list from an ODS package.
pub fn parse_from_ods(list: ListKind, bytes: &[u8]) -> Result<Project, FormatError> {
    let content = read_part(bytes, "content.xml")?
        .ok_or_else(|| FormatError::ParseError("ODS package without content.xml".into()))?;
    let rows = table_rows(&content, list.columns().len())?;
    read_rows(list, &rows)
}
