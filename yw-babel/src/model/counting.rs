//! Word and letter counting with the rules yWriter applies to scene content

use once_cell::sync::Lazy;
use regex::Regex;

static ADDITIONAL_WORD_LIMITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--|—|–").expect("valid regex"));

static NO_WORD_LIMITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\[.+?\]|/\*.+?\*/|-|^>").expect("valid regex"));

static NON_LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.+?\]|/\*.+?\*/|\n|\r").expect("valid regex"));

/// Number of words in `text`.
///
/// Dash sequences separate words, single hyphens join them, and bracket codes and comments
/// do not count.
pub fn word_count(text: &str) -> usize {
    let text = ADDITIONAL_WORD_LIMITS.replace_all(text, " ");
    let text = NO_WORD_LIMITS.replace_all(&text, "");
    text.split_whitespace().count()
}

/// Number of characters in `text`, ignoring bracket codes, comments and line breaks.
pub fn letter_count(text: &str) -> usize {
    NON_LETTERS.replace_all(text, "").chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_dash_separates_words() {
        assert_eq!(word_count("word1 word2--word3"), 3);
    }

    #[test]
    fn test_hyphen_joins_words() {
        assert_eq!(word_count("a well-known fact"), 3);
    }

    #[test]
    fn test_markup_and_comments_ignored() {
        assert_eq!(word_count("[i]one[/i] /*not counted*/ two"), 2);
        assert_eq!(letter_count("[b]ab[/b]\ncd"), 4);
    }

    #[test]
    fn test_quote_marker_not_a_word() {
        assert_eq!(word_count("> quoted text"), 2);
    }
}
