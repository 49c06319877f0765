//! Template rendering for document writers
//!
//! Every writer is described by data: a [`TemplateSet`] with named template slots, a markup
//! converter, optional filters and mapping hooks. The [`Renderer`] walks the project in
//! presentation order and fills the templates.
//!
//! Placeholders use `$Name` or `${Name}`. Unknown placeholders are left in the output
//! unchanged, and `$$` renders a literal dollar sign.
//!
//! # Example
//!
//! ```ignore
//! use yw_babel::templates::{Renderer, TemplateSet};
//!
//! let templates = TemplateSet {
//!     chapter: "<h2>$Title</h2>\n".into(),
//!     scene: "<p>$SceneContent</p>\n".into(),
//!     ..TemplateSet::default()
//! };
//! let text = Renderer::new(&project, &ctx, &templates, &PlainText).render();
//! ```

mod mapping;
mod renderer;

pub use mapping::{
    chapter_mapping, character_mapping, item_mapping, location_mapping, project_mapping,
    project_note_mapping, scene_mapping, Counters,
};
pub use renderer::{ChapterSelection, Filters, Hooks, Renderer};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashMap;

/// Placeholder values for one template instance.
pub type Mapping = HashMap<&'static str, String>;

/// Converts yWriter text into the target markup.
///
/// `quick` is set for one-line fields such as titles, which only need character escaping.
pub trait TextConverter {
    fn convert(&self, text: Option<&str>, quick: bool) -> String;
}

/// Leaves text as it is.
pub struct PlainText;

impl TextConverter for PlainText {
    fn convert(&self, text: Option<&str>, _quick: bool) -> String {
        text.unwrap_or_default().to_string()
    }
}

/// Named template slots of a writer. Empty slots are skipped.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    pub file_header: Cow<'static, str>,
    pub part: Cow<'static, str>,
    pub chapter: Cow<'static, str>,
    pub notes_part: Cow<'static, str>,
    pub todo_part: Cow<'static, str>,
    pub notes_chapter: Cow<'static, str>,
    pub todo_chapter: Cow<'static, str>,
    pub unused_chapter: Cow<'static, str>,
    pub not_exported_chapter: Cow<'static, str>,
    pub scene: Cow<'static, str>,
    pub first_scene: Cow<'static, str>,
    pub appended_scene: Cow<'static, str>,
    pub notes_scene: Cow<'static, str>,
    pub todo_scene: Cow<'static, str>,
    pub unused_scene: Cow<'static, str>,
    pub not_exported_scene: Cow<'static, str>,
    pub scene_divider: Cow<'static, str>,
    pub chapter_end: Cow<'static, str>,
    pub unused_chapter_end: Cow<'static, str>,
    pub not_exported_chapter_end: Cow<'static, str>,
    pub notes_chapter_end: Cow<'static, str>,
    pub todo_chapter_end: Cow<'static, str>,
    pub character_section_heading: Cow<'static, str>,
    pub character: Cow<'static, str>,
    pub location_section_heading: Cow<'static, str>,
    pub location: Cow<'static, str>,
    pub item_section_heading: Cow<'static, str>,
    pub item: Cow<'static, str>,
    pub project_note: Cow<'static, str>,
    pub file_footer: Cow<'static, str>,
}

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:(\$)|([_A-Za-z][_A-Za-z0-9]*)|\{([_A-Za-z][_A-Za-z0-9]*)\})")
        .expect("valid regex")
});

/// Fill `$Name` and `${Name}` placeholders from `mapping`.
pub fn substitute(template: &str, mapping: &Mapping) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            if caps.get(1).is_some() {
                return "$".to_string();
            }
            let name = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            match mapping.get(name) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_plain_and_braced() {
        let mut mapping = Mapping::new();
        mapping.insert("Title", "Hello".to_string());
        mapping.insert("ID", "7".to_string());
        assert_eq!(substitute("$Title ~ ${ID}x", &mapping), "Hello ~ 7x");
    }

    #[test]
    fn test_substitute_keeps_unknown_placeholders() {
        let mapping = Mapping::new();
        assert_eq!(substitute("$Missing and ${Gone}", &mapping), "$Missing and ${Gone}");
    }

    #[test]
    fn test_substitute_escaped_dollar() {
        let mapping = Mapping::new();
        assert_eq!(substitute("costs $$5", &mapping), "costs $5");
    }

    #[test]
    fn test_plain_text_converter() {
        assert_eq!(PlainText.convert(None, false), "");
        assert_eq!(PlainText.convert(Some("a<b"), true), "a<b");
    }
}
