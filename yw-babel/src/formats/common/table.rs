//! Tabular lists
//!
//! Spreadsheet and CSV lists share their columns. Readers hand over rows of cell strings with
//! line breaks already restored; [`read_rows`] turns them into a partial project. Rows whose
//! first cell carries no element ID (the heading row, for instance) are ignored.

use crate::error::FormatError;
use crate::model::{split_list, Character, Project, Scene, SceneStatus, WorldElement};
use crate::templates::Mapping;
use once_cell::sync::Lazy;
use regex::Regex;

static SCENE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"ScID:([0-9]+)").expect("valid regex"));
static CHARACTER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CrID:([0-9]+)").expect("valid regex"));
static LOCATION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"LcID:([0-9]+)").expect("valid regex"));
static ITEM_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"ItID:([0-9]+)").expect("valid regex"));

/// Separator of tag lists inside a cell.
pub const TAG_DIVIDER: char = ',';

/// Rating values kept on import; anything else means "not rated".
const SCENE_RATINGS: &[&str] = &["2", "3", "4", "5", "6", "7", "8", "9", "10"];
const NOT_RATED: &str = "1";
const REACTION_MARKER: &str = "r";
const MAJOR_MARKER: &str = "Major";

const SCENE_COLUMNS: &[&str] = &[
    "Scene link",
    "Scene title",
    "Scene description",
    "Tags",
    "Scene notes",
    "A/R",
    "Goal",
    "Conflict",
    "Outcome",
    "Scene",
    "Words total",
    "$FieldTitle1",
    "$FieldTitle2",
    "$FieldTitle3",
    "$FieldTitle4",
    "Word count",
    "Letter count",
    "Status",
    "Characters",
    "Locations",
    "Items",
];

const CHARACTER_COLUMNS: &[&str] = &[
    "ID",
    "Name",
    "Full name",
    "Aka",
    "Description",
    "Bio",
    "Goals",
    "Importance",
    "Tags",
    "Notes",
];

const WORLD_ELEMENT_COLUMNS: &[&str] = &["ID", "Name", "Description", "Aka", "Tags"];

/// The four lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Scenes,
    Characters,
    Locations,
    Items,
}

impl ListKind {
    pub const ALL: [ListKind; 4] = [
        ListKind::Scenes,
        ListKind::Characters,
        ListKind::Locations,
        ListKind::Items,
    ];

    /// Column headings; `$FieldTitle<n>` stands for the project's rating titles.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            ListKind::Scenes => SCENE_COLUMNS,
            ListKind::Characters => CHARACTER_COLUMNS,
            ListKind::Locations | ListKind::Items => WORLD_ELEMENT_COLUMNS,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ListKind::Scenes => "_scenelist",
            ListKind::Characters => "_charlist",
            ListKind::Locations => "_loclist",
            ListKind::Items => "_itemlist",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ListKind::Scenes => "Scene list",
            ListKind::Characters => "Character list",
            ListKind::Locations => "Location list",
            ListKind::Items => "Item list",
        }
    }
}

/// Scene hook for list writers: rating "1" means "not rated" and stays blank.
pub fn blank_unrated(project: &Project, sc_id: &str, mapping: &mut Mapping) {
    let scene = &project.scenes[sc_id];
    let fields = [
        ("Field1", &scene.field1),
        ("Field2", &scene.field2),
        ("Field3", &scene.field3),
        ("Field4", &scene.field4),
    ];
    for (key, value) in fields {
        if value.as_deref() == Some(NOT_RATED) {
            mapping.insert(key, String::new());
        }
    }
}

fn cell_text(cell: &str) -> String {
    cell.trim_end().to_string()
}

fn tags(cell: &str) -> Vec<String> {
    split_list(cell, TAG_DIVIDER)
}

fn rating(cell: &str) -> String {
    if SCENE_RATINGS.contains(&cell.trim()) {
        cell.trim().to_string()
    } else {
        NOT_RATED.to_string()
    }
}

fn row_id(pattern: &Regex, cell: &str) -> Option<String> {
    pattern.captures(cell).map(|caps| caps[1].to_string())
}

/// Build a partial project from table rows.
///
/// Every row must have exactly as many cells as the list has columns.
pub fn read_rows(kind: ListKind, rows: &[Vec<String>]) -> Result<Project, FormatError> {
    let width = kind.columns().len();
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(FormatError::ParseError(format!(
            "Wrong table structure: {} cells where {} are expected",
            row.len(),
            width
        )));
    }
    let mut project = Project::new();
    for cells in rows {
        match kind {
            ListKind::Scenes => read_scene(&mut project, cells),
            ListKind::Characters => read_character(&mut project, cells),
            ListKind::Locations | ListKind::Items => read_world_element(&mut project, kind, cells),
        }
    }
    Ok(project)
}

fn read_scene(project: &mut Project, cells: &[String]) {
    let Some(sc_id) = row_id(&SCENE_ID, &cells[0]) else {
        return;
    };
    // Scene number, word and letter totals are derived; the reference lists hold names.
    let scene = Scene {
        title: Some(cell_text(&cells[1])),
        desc: Some(cell_text(&cells[2])),
        tags: Some(tags(&cells[3])),
        notes: Some(cell_text(&cells[4])),
        is_reaction_scene: Some(cells[5].to_lowercase().contains(REACTION_MARKER)),
        goal: Some(cell_text(&cells[6])),
        conflict: Some(cell_text(&cells[7])),
        outcome: Some(cell_text(&cells[8])),
        field1: Some(rating(&cells[11])),
        field2: Some(rating(&cells[12])),
        field3: Some(rating(&cells[13])),
        field4: Some(rating(&cells[14])),
        status: SceneStatus::from_label(cells[17].trim()),
        ..Default::default()
    };
    project.scenes.insert(sc_id, scene);
}

fn read_character(project: &mut Project, cells: &[String]) {
    let Some(cr_id) = row_id(&CHARACTER_ID, &cells[0]) else {
        return;
    };
    let character = Character {
        title: Some(cell_text(&cells[1])),
        full_name: Some(cell_text(&cells[2])),
        aka: Some(cell_text(&cells[3])),
        desc: Some(cell_text(&cells[4])),
        bio: Some(cell_text(&cells[5])),
        goals: Some(cell_text(&cells[6])),
        is_major: Some(cells[7].contains(MAJOR_MARKER)),
        tags: Some(tags(&cells[8])),
        notes: Some(cell_text(&cells[9])),
        ..Default::default()
    };
    project.srt_characters.push(cr_id.clone());
    project.characters.insert(cr_id, character);
}

fn read_world_element(project: &mut Project, kind: ListKind, cells: &[String]) {
    let (pattern, elements, order) = match kind {
        ListKind::Locations => (
            &*LOCATION_ID,
            &mut project.locations,
            &mut project.srt_locations,
        ),
        _ => (&*ITEM_ID, &mut project.items, &mut project.srt_items),
    };
    let Some(id) = row_id(pattern, &cells[0]) else {
        return;
    };
    let element = WorldElement {
        title: Some(cell_text(&cells[1])),
        desc: Some(cell_text(&cells[2])),
        aka: Some(cell_text(&cells[3])),
        tags: Some(tags(&cells[4])),
        ..Default::default()
    };
    order.push(id.clone());
    elements.insert(id, element);
}
