//! Legacy kind fields
//!
//!     yWriter stores the kind of a chapter in up to three elements (`Unused`, `Type`,
//!     `ChapterType`) whose meaning drifted across versions; scenes use `Unused` plus the
//!     `Field_SceneType` custom field. These functions collapse the legacy fields into a [`Kind`]
//!     on read and expand it again on write. Nothing else in the crate looks at the raw fields.

use super::elements::Kind;

/// Legacy field values written for a chapter kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterFields {
    pub unused: bool,
    pub type_code: &'static str,
    pub chapter_type: &'static str,
}

/// Legacy field values written for a scene kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneFields {
    pub unused: bool,
    /// `None` removes the `Field_SceneType` field.
    pub scene_type: Option<&'static str>,
}

/// Decode a chapter kind. `ChapterType` wins over the older `Type` field.
///
/// `Unused` alone, without either type field, leaves the chapter normal.
pub fn decode_chapter(unused: bool, type_code: Option<&str>, chapter_type: Option<&str>) -> Kind {
    match (chapter_type, type_code) {
        (Some("2"), _) => Kind::Todo,
        (Some("1"), _) => Kind::Notes,
        (None, Some("1")) => Kind::Notes,
        (None, None) => Kind::Normal,
        _ if unused => Kind::Unused,
        _ => Kind::Normal,
    }
}

pub fn encode_chapter(kind: Kind) -> ChapterFields {
    let (unused, type_code, chapter_type) = match kind {
        Kind::Normal => (false, "0", "0"),
        Kind::Notes => (true, "1", "1"),
        Kind::Todo => (true, "1", "2"),
        Kind::Unused => (true, "1", "0"),
    };
    ChapterFields {
        unused,
        type_code,
        chapter_type,
    }
}

pub fn decode_scene(unused: bool, scene_type: Option<&str>) -> Kind {
    match scene_type {
        Some("1") => Kind::Notes,
        Some("2") => Kind::Todo,
        _ if unused => Kind::Unused,
        _ => Kind::Normal,
    }
}

pub fn encode_scene(kind: Kind) -> SceneFields {
    let (unused, scene_type) = match kind {
        Kind::Normal => (false, None),
        Kind::Notes => (true, Some("1")),
        Kind::Todo => (true, Some("2")),
        Kind::Unused => (true, Some("0")),
    };
    SceneFields { unused, scene_type }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Kind; 4] = [Kind::Normal, Kind::Notes, Kind::Todo, Kind::Unused];

    #[test]
    fn test_chapter_decode_table() {
        assert_eq!(decode_chapter(false, None, None), Kind::Normal);
        assert_eq!(decode_chapter(false, Some("0"), None), Kind::Normal);
        assert_eq!(decode_chapter(true, Some("1"), None), Kind::Notes);
        assert_eq!(decode_chapter(true, Some("0"), None), Kind::Unused);
        assert_eq!(decode_chapter(false, Some("1"), Some("0")), Kind::Normal);
        assert_eq!(decode_chapter(true, Some("0"), Some("1")), Kind::Notes);
        assert_eq!(decode_chapter(false, None, Some("2")), Kind::Todo);
        assert_eq!(decode_chapter(true, Some("1"), Some("3")), Kind::Unused);
    }

    #[test]
    fn test_unused_without_type_fields_is_normal() {
        assert_eq!(decode_chapter(true, None, None), Kind::Normal);
        assert_eq!(decode_chapter(true, Some("0"), None), Kind::Unused);
    }

    #[test]
    fn test_unused_chapter_with_chapter_type_zero() {
        // Written by yWriter for unused chapters, so it must decode as Unused.
        assert_eq!(decode_chapter(true, Some("1"), Some("0")), Kind::Unused);
    }

    #[test]
    fn test_chapter_roundtrip() {
        for kind in ALL {
            let f = encode_chapter(kind);
            assert_eq!(
                decode_chapter(f.unused, Some(f.type_code), Some(f.chapter_type)),
                kind
            );
        }
    }

    #[test]
    fn test_scene_roundtrip() {
        for kind in ALL {
            let f = encode_scene(kind);
            assert_eq!(decode_scene(f.unused, f.scene_type), kind);
        }
    }

    #[test]
    fn test_scene_type_zero_without_unused_is_normal() {
        assert_eq!(decode_scene(false, Some("0")), Kind::Normal);
        assert_eq!(decode_scene(true, None), Kind::Unused);
    }
}
