//! Properties of counting and the kind codec

use proptest::prelude::*;
use yw_babel::model::kind::{decode_chapter, decode_scene, encode_chapter, encode_scene};
use yw_babel::model::{letter_count, word_count, Kind, Scene};

const KINDS: [Kind; 4] = [Kind::Normal, Kind::Notes, Kind::Todo, Kind::Unused];

proptest! {
    #[test]
    fn prop_scene_counts_match_counting_functions(text in "[a-z \\n\\-\\[\\]/*]{0,80}") {
        let mut scene = Scene::default();
        scene.set_content(text.clone());
        prop_assert_eq!(scene.word_count(), word_count(&text));
        prop_assert_eq!(scene.letter_count(), letter_count(&text));
        // Reading twice has no side effects.
        prop_assert_eq!(scene.word_count(), word_count(&text));
    }

    #[test]
    fn prop_double_dash_separates(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        prop_assert_eq!(word_count(&format!("{a}--{b}")), 2);
    }
}

#[test]
fn test_kind_codec_is_identity() {
    for kind in KINDS {
        let fields = encode_chapter(kind);
        assert_eq!(
            decode_chapter(fields.unused, Some(fields.type_code), Some(fields.chapter_type)),
            kind
        );
        let fields = encode_scene(kind);
        assert_eq!(decode_scene(fields.unused, fields.scene_type), kind);
    }
}

#[test]
fn test_word_count_scenario() {
    let mut scene = Scene::default();
    scene.set_content("word1 word2--word3");
    assert_eq!(scene.word_count(), 3);
}
