//! In-memory novel model
//!
//!     A [`Project`] owns every entity map (ID to entity) and the ordered ID lists that define
//!     presentation order. The maps carry identity, the order lists carry sequence, so importers
//!     can reorder without touching entity data.
//!
//!     Optional fields are `Option<T>`: `None` means the source document did not carry the value,
//!     which is what the merge engine keys on.

mod counting;
mod elements;
pub mod kind;
mod project;

pub use counting::{letter_count, word_count};
pub use elements::{
    Chapter, Character, Kind, ProjectNote, Scene, SceneStatus, SceneText, SceneTime, WorldElement,
};
pub use project::Project;

/// Date used by yWriter for "no specific date".
pub const NULL_DATE: &str = "0001-01-01";

/// Time used by yWriter for "no specific time".
pub const NULL_TIME: &str = "00:00:00";

/// Split a `;` separated string into a list of stripped, unique, non-empty entries.
pub fn string_to_list(text: &str) -> Vec<String> {
    split_list(text, ';')
}

/// Split `text` on `divider`, dropping empty and repeated entries.
pub fn split_list(text: &str, divider: char) -> Vec<String> {
    let mut elements: Vec<String> = Vec::new();
    for element in text.split(divider) {
        let element = element.trim();
        if !element.is_empty() && !elements.iter().any(|e| e == element) {
            elements.push(element.to_string());
        }
    }
    elements
}

/// Join a list with the yWriter divider.
pub fn list_to_string(elements: &[String]) -> String {
    elements.join(";")
}

/// Smallest unused positive integer, as a string.
pub fn create_id<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let taken: std::collections::BTreeSet<&str> = existing.into_iter().map(|s| s.as_str()).collect();
    let mut i: u32 = 1;
    while taken.contains(i.to_string().as_str()) {
        i += 1;
    }
    i.to_string()
}

/// Largest numeric ID plus one, as a string.
pub fn next_id<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let max = existing
        .into_iter()
        .filter_map(|id| id.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_list_strips_and_dedups() {
        assert_eq!(
            string_to_list(" a; b;;a ; c "),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(string_to_list("").is_empty());
    }

    #[test]
    fn test_list_to_string() {
        let list = vec!["x".to_string(), "y".to_string()];
        assert_eq!(list_to_string(&list), "x;y");
    }

    #[test]
    fn test_create_id_fills_gaps() {
        let ids: Vec<String> = vec!["1".into(), "2".into(), "4".into()];
        assert_eq!(create_id(&ids), "3");
        let none: Vec<String> = Vec::new();
        assert_eq!(create_id(&none), "1");
    }

    #[test]
    fn test_next_id_uses_max() {
        let ids: Vec<String> = vec!["1".into(), "7".into(), "3".into()];
        assert_eq!(next_id(&ids), "8");
    }
}
