//! Bracket markup to target markup
//!
//!     yWriter scene text carries a small inline markup: `[i]..[/i]`, `[b]..[/b]`,
//!     `[lang=xx-YY]..[/lang=xx-YY]`, comments as `/* .. */`, quotation lines starting with `> `
//!     and raw export codes such as `<HTM .. /HTM>`. Paragraphs are separated by `\n`.
//!
//!     Paragraph oriented targets (ODF, HTML) need every paragraph to be well formed on its own,
//!     so [`balance_tags`] closes spans at the end of a line and reopens them on the next line
//!     before any conversion happens.
//!
//!     The converters here implement [`TextConverter`] and are handed to the template renderer.
//!     The way back (target markup to bracket markup) is done by the document readers.

use crate::templates::TextConverter;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static UNSUPPORTED_CODES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[/*[h|c|r|s|u]\d*\]").expect("valid regex"));

static INLINE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(HTM|TEX|RTF|epub|mobi|rtfimg) .+?/(HTM|TEX|RTF|epub|mobi|rtfimg)>")
        .expect("valid regex")
});

static LANGUAGE_OPENING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[lang=([^\]]+)\]").expect("valid regex"));

static LANGUAGE_CLOSING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[/lang=[^\]]+\]").expect("valid regex"));

static NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\* @([ef]n\**) (.*?)\*/").expect("valid regex"));

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*(.*?)\*/").expect("valid regex"));

static ANNOTATED_QUOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""Text_20_body">(<office:annotation>.+?</office:annotation>)&gt; "#)
        .expect("valid regex")
});

static HTML_QUOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<p>&gt; (.*?)</p>").expect("valid regex"));

const QUOTE_PREFIX: &str = "> ";

// Line breaks inside the replacements are `\r` until all replacements are done.
const ODT_PARAGRAPH: &str = "</text:p>\r<text:p text:style-name=\"First_20_line_20_indent\">";
const ODT_SECTION_BREAK: &str = "</text:p>\r<text:p text:style-name=\"First_20_line_20_indent\" />\r<text:p text:style-name=\"Text_20_body\">";
const ODT_EMPHASIS: &str = "<text:span text:style-name=\"Emphasis\">";
const ODT_STRONG: &str = "<text:span text:style-name=\"Strong_20_Emphasis\">";
const ODT_SPAN_END: &str = "</text:span>";

/// Escape the XML special characters, quotes included.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `&`, `<` and `>` only.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Make every line carry balanced `[tag]`/`[/tag]` pairs.
///
/// A span left open at the end of a line is closed there and reopened at the start of the next
/// line (after a leading quotation marker). Closing tags without an opening one get an opening
/// tag at the line start. Empty pairs are dropped.
pub fn balance_tags(text: &str, tags: &[String]) -> String {
    let openings: Vec<String> = tags.iter().map(|t| format!("[{t}]")).collect();
    let closings: Vec<String> = tags.iter().map(|t| format!("[/{t}]")).collect();
    let mut is_open = vec![false; tags.len()];
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let mut line = line.to_string();
        for (i, (opening, closing)) in openings.iter().zip(&closings).enumerate() {
            if is_open[i] {
                line = match line.strip_prefix(QUOTE_PREFIX) {
                    Some(rest) => format!("{QUOTE_PREFIX}{opening}{rest}"),
                    None => format!("{opening}{line}"),
                };
                is_open[i] = false;
            }
            while line.matches(opening.as_str()).count() > line.matches(closing.as_str()).count() {
                line.push_str(closing);
                is_open[i] = true;
            }
            while line.matches(closing.as_str()).count() > line.matches(opening.as_str()).count() {
                line.insert_str(0, opening);
            }
            line = line.replace(&format!("{opening}{closing}"), "");
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Remove raw codes meant for other yWriter export targets.
pub fn remove_inline_code(text: &str) -> String {
    let text = text.replace("<RTFBRK>", "");
    INLINE_CODE.replace_all(&text, "").into_owned()
}

/// Join spans that a document split at paragraph or formatting boundaries.
///
/// Word processors close and reopen formatting per paragraph; after reading, `[/i]\n[i]` is the
/// same span as `\n`.
pub fn join_split_spans(text: &str, languages: &[String]) -> String {
    let mut tags = vec!["i".to_string(), "b".to_string()];
    tags.extend(languages.iter().map(|l| format!("lang={l}")));
    let mut text = text.to_string();
    for tag in &tags {
        text = text.replace(&format!("[/{tag}][{tag}]"), "");
        text = text.replace(&format!("[/{tag}]\n[{tag}]"), "\n");
        text = text.replace(&format!("[/{tag}]\n> [{tag}]"), "\n> ");
    }
    text
}

/// Language tags used in `text`, in first-seen order.
pub fn languages_in(text: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for caps in LANGUAGE_OPENING.captures_iter(text) {
        if !languages.iter().any(|l| l == &caps[1]) {
            languages.push(caps[1].to_string());
        }
    }
    languages
}

fn formatting_tags(languages: &[String]) -> Vec<String> {
    let mut tags = vec!["i".to_string(), "b".to_string()];
    tags.extend(languages.iter().map(|l| format!("lang={l}")));
    tags
}

/// Flavours of ODF text conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdtFlavour {
    /// Escaping and paragraphs only (descriptions, world elements)
    Plain,
    /// Emphasis, language spans and comments as annotations
    Formatted,
    /// Formatted without comments and with raw export codes removed
    Export,
    /// Emphasis styled with automatic styles following the language styles
    Proof,
}

/// Converts bracket markup into ODF `text:p` content.
pub struct OdtText<'a> {
    pub flavour: OdtFlavour,
    pub languages: &'a [String],
    pub author: &'a str,
}

impl<'a> OdtText<'a> {
    pub fn plain() -> Self {
        OdtText {
            flavour: OdtFlavour::Plain,
            languages: &[],
            author: "",
        }
    }

    pub fn new(flavour: OdtFlavour, languages: &'a [String], author: &'a str) -> Self {
        OdtText {
            flavour,
            languages,
            author,
        }
    }

    fn replacements(&self) -> Vec<(String, String)> {
        let n = self.languages.len();
        let mut list: Vec<(String, String)> = vec![
            ("\n\n".into(), ODT_SECTION_BREAK.into()),
            ("\n".into(), ODT_PARAGRAPH.into()),
        ];
        match self.flavour {
            OdtFlavour::Proof => {
                list.push(("[i]".into(), format!("<text:span text:style-name=\"T{}\">", n + 1)));
                list.push(("[b]".into(), format!("<text:span text:style-name=\"T{}\">", n + 2)));
            }
            _ => {
                list.push(("[i]".into(), ODT_EMPHASIS.into()));
                list.push(("[b]".into(), ODT_STRONG.into()));
            }
        }
        list.push(("[/i]".into(), ODT_SPAN_END.into()));
        list.push(("[/b]".into(), ODT_SPAN_END.into()));
        if self.flavour != OdtFlavour::Export {
            list.push((
                "/*".into(),
                format!(
                    "<office:annotation><dc:creator>{}</dc:creator><text:p>",
                    escape_xml(self.author)
                ),
            ));
            list.push(("*/".into(), "</text:p></office:annotation>".into()));
        }
        for (i, language) in self.languages.iter().enumerate() {
            list.push((
                format!("[lang={language}]"),
                format!("<text:span text:style-name=\"T{}\">", i + 1),
            ));
            list.push((format!("[/lang={language}]"), ODT_SPAN_END.into()));
        }
        list
    }
}

impl TextConverter for OdtText<'_> {
    fn convert(&self, text: Option<&str>, quick: bool) -> String {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return String::new();
        };
        if quick {
            return escape_xml(text);
        }
        if self.flavour == OdtFlavour::Plain {
            return escape_xml(text)
                .replace("\n\n", ODT_SECTION_BREAK)
                .replace('\n', ODT_PARAGRAPH)
                .replace('\r', "\n");
        }
        let text = if self.flavour == OdtFlavour::Export {
            remove_inline_code(text)
        } else {
            text.to_string()
        };
        let balanced = balance_tags(&text, &formatting_tags(self.languages));
        let mut text = escape_xml(balanced.trim_end());
        for (from, to) in self.replacements() {
            text = text.replace(&from, &to);
        }
        UNSUPPORTED_CODES
            .replace_all(&text.replace('\r', "\n"), "")
            .into_owned()
    }
}

/// `office:automatic-styles` element for the content header.
///
/// One `T<n>` text style per language; the proof flavour appends italic and bold styles.
pub fn odt_automatic_styles(languages: &[String], proof: bool) -> String {
    if languages.is_empty() && !proof {
        return "<office:automatic-styles/>".to_string();
    }
    let mut lines = vec!["<office:automatic-styles>".to_string()];
    for (i, language) in languages.iter().enumerate() {
        let (lng, ctr) = language.split_once('-').unwrap_or(("zxx", "none"));
        lines.push(format!(
            "  <style:style style:name=\"T{n}\" style:family=\"text\">\n   <style:text-properties fo:language=\"{lng}\" fo:country=\"{ctr}\" style:language-asian=\"{lng}\" style:country-asian=\"{ctr}\" style:language-complex=\"{lng}\" style:country-complex=\"{ctr}\"/>\n  </style:style>",
            n = i + 1
        ));
    }
    if proof {
        let n = languages.len();
        lines.push(format!(
            "  <style:style style:name=\"T{}\" style:family=\"text\">\n   <style:text-properties fo:font-style=\"italic\" style:font-style-asian=\"italic\" style:font-style-complex=\"italic\"/>\n  </style:style>",
            n + 1
        ));
        lines.push(format!(
            "  <style:style style:name=\"T{}\" style:family=\"text\">\n   <style:text-properties fo:font-weight=\"bold\" style:font-weight-asian=\"bold\" style:font-weight-complex=\"bold\"/>\n  </style:style>",
            n + 2
        ));
    }
    lines.push(" </office:automatic-styles>".to_string());
    lines.join("\n")
}

/// Turn paragraphs starting with an escaped quotation marker into `Quotations` paragraphs.
pub fn mark_odt_quotations(text: &str) -> String {
    if !text.contains("&gt; ") {
        return text.to_string();
    }
    let text = text
        .replace("\"First_20_line_20_indent\">&gt; ", "\"Quotations\">")
        .replace("\"Text_20_body\">&gt; ", "\"Quotations\">");
    ANNOTATED_QUOTATION
        .replace_all(&text, "\"Quotations\">$1")
        .into_owned()
}

/// Turn `/* @fn text*/` and `/* @en text*/` into ODF notes and any other comment into an
/// annotation. `@fn*` is a footnote without number.
pub fn convert_odt_notes(text: &str, author: &str) -> String {
    if !text.contains("/*") {
        return text.to_string();
    }
    let mut counter = 0;
    let mut number = 0;
    let text = NOTE.replace_all(text, |caps: &Captures| {
        let note_type = &caps[1];
        counter += 1;
        number += 1;
        let mut label = number.to_string();
        let (class, style) = if note_type.starts_with("fn") {
            if note_type.ends_with('*') {
                number -= 1;
                label = "*".to_string();
            }
            ("footnote", "Footnote")
        } else {
            ("endnote", "Endnote")
        };
        let body = caps[2].replace(
            "text:style-name=\"First_20_line_20_indent\"",
            &format!("text:style-name=\"{style}\""),
        );
        format!(
            "<text:note text:id=\"ftn{counter}\" text:note-class=\"{class}\"><text:note-citation text:label=\"{label}\">*</text:note-citation><text:note-body><text:p text:style-name=\"{style}\">{body}</text:p></text:note-body></text:note>"
        )
    });
    COMMENT
        .replace_all(&text, |caps: &Captures| {
            format!(
                "<office:annotation><dc:creator>{}</dc:creator><text:p>{}</text:p></office:annotation>",
                escape_xml(author),
                &caps[1]
            )
        })
        .into_owned()
}

/// Converts text for an ODS table cell.
pub struct OdsCell;

impl TextConverter for OdsCell {
    fn convert(&self, text: Option<&str>, _quick: bool) -> String {
        escape_xml(text.unwrap_or_default().trim_end()).replace('\n', "</text:p>\n<text:p>")
    }
}

/// Converts bracket markup into HTML paragraph content.
pub struct HtmlText;

impl TextConverter for HtmlText {
    fn convert(&self, text: Option<&str>, quick: bool) -> String {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return String::new();
        };
        if quick {
            return escape_html(text);
        }
        let balanced = balance_tags(text, &formatting_tags(&languages_in(text)));
        let text = escape_html(balanced.trim_end())
            .replace('\n', "</p>\n<p>")
            .replace("[i]", "<em>")
            .replace("[/i]", "</em>")
            .replace("[b]", "<strong>")
            .replace("[/b]", "</strong>")
            .replace("/*", "<!--")
            .replace("*/", "-->");
        let text = LANGUAGE_OPENING.replace_all(&text, "<span lang=\"$1\">");
        let text = LANGUAGE_CLOSING.replace_all(&text, "</span>");
        UNSUPPORTED_CODES.replace_all(&text, "").into_owned()
    }
}

/// Wrap paragraphs starting with an escaped quotation marker in `blockquote`.
pub fn mark_html_quotations(text: &str) -> String {
    HTML_QUOTATION
        .replace_all(text, "<blockquote>$1</blockquote>")
        .into_owned()
}

/// Line breaks inside a CSV field.
pub const CSV_LINEBREAK: char = '\t';

/// Separates rendered CSV fields before they are handed to the CSV writer.
pub const CSV_FIELD_SEPARATOR: char = '\u{1f}';

/// Ends a rendered CSV record.
pub const CSV_RECORD_SEPARATOR: char = '\u{1e}';

/// Converts text for a CSV field: no markup conversion, line breaks become tabs.
///
/// Quoting is left to the CSV writer.
pub struct CsvField;

impl TextConverter for CsvField {
    fn convert(&self, text: Option<&str>, _quick: bool) -> String {
        text.unwrap_or_default()
            .trim_end()
            .replace([CSV_FIELD_SEPARATOR, CSV_RECORD_SEPARATOR], "")
            .replace('\n', &CSV_LINEBREAK.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Vec<String> {
        formatting_tags(&[])
    }

    #[test]
    fn test_balance_tags_across_lines() {
        let text = "one [i]two\nthree[/i] four";
        assert_eq!(
            balance_tags(text, &tags()),
            "one [i]two[/i]\n[i]three[/i] four"
        );
    }

    #[test]
    fn test_balance_tags_reopens_after_quote_marker() {
        let text = "[b]a\n> b[/b]";
        assert_eq!(balance_tags(text, &tags()), "[b]a[/b]\n> [b]b[/b]");
    }

    #[test]
    fn test_balance_tags_drops_empty_pairs() {
        let text = "[i]x\n\ny[/i]";
        assert_eq!(balance_tags(text, &tags()), "[i]x[/i]\n\n[i]y[/i]");
    }

    #[test]
    fn test_join_split_spans_is_inverse_of_balancing() {
        let text = "one [i]two\nthree[/i] four";
        let balanced = balance_tags(text, &tags());
        assert_eq!(join_split_spans(&balanced, &[]), text);
    }

    #[test]
    fn test_remove_inline_code() {
        let text = "a<RTFBRK>b <HTM <SPAN LANG=\"de\"> /HTM>c";
        assert_eq!(remove_inline_code(text), "ab c");
    }

    #[test]
    fn test_odt_formatted_conversion() {
        let languages = vec!["de-CH".to_string()];
        let conv = OdtText::new(OdtFlavour::Formatted, &languages, "Me");
        let out = conv.convert(Some("[i]A & B[/i]\n[lang=de-CH]C[/lang=de-CH] /*note*/"), false);
        assert_eq!(
            out,
            "<text:span text:style-name=\"Emphasis\">A &amp; B</text:span></text:p>\n\
             <text:p text:style-name=\"First_20_line_20_indent\">\
             <text:span text:style-name=\"T1\">C</text:span> \
             <office:annotation><dc:creator>Me</dc:creator><text:p>note</text:p></office:annotation>"
        );
    }

    #[test]
    fn test_odt_quick_mode_escapes_only() {
        let conv = OdtText::new(OdtFlavour::Formatted, &[], "");
        assert_eq!(conv.convert(Some("[i]\"x\"[/i]\n"), true), "[i]&quot;x&quot;[/i]\n");
        assert_eq!(conv.convert(None, false), "");
    }

    #[test]
    fn test_odt_export_strips_codes_and_keeps_comments() {
        let conv = OdtText::new(OdtFlavour::Export, &[], "Me");
        let out = conv.convert(Some("a<RTFBRK> /*c*/ [h1]b[/h1]"), false);
        assert_eq!(out, "a /*c*/ b");
    }

    #[test]
    fn test_odt_proof_styles_follow_languages() {
        let languages = vec!["fr-FR".to_string()];
        let conv = OdtText::new(OdtFlavour::Proof, &languages, "");
        assert_eq!(
            conv.convert(Some("[i]x[/i][b]y[/b]"), false),
            "<text:span text:style-name=\"T2\">x</text:span><text:span text:style-name=\"T3\">y</text:span>"
        );
        let styles = odt_automatic_styles(&languages, true);
        assert!(styles.contains("style:name=\"T1\""));
        assert!(styles.contains("fo:language=\"fr\" fo:country=\"FR\""));
        assert!(styles.contains("style:name=\"T3\""));
    }

    #[test]
    fn test_automatic_styles_empty() {
        assert_eq!(odt_automatic_styles(&[], false), "<office:automatic-styles/>");
    }

    #[test]
    fn test_odt_quotations() {
        let text = "<text:p text:style-name=\"Text_20_body\">&gt; quoted</text:p>";
        assert_eq!(
            mark_odt_quotations(text),
            "<text:p text:style-name=\"Quotations\">quoted</text:p>"
        );
    }

    #[test]
    fn test_odt_notes() {
        let text = "x/* @fn first*/ y/* @fn* star*/ z/* @en end*/ /*plain*/";
        let out = convert_odt_notes(text, "Me");
        assert!(out.contains("text:note-class=\"footnote\"><text:note-citation text:label=\"1\">"));
        assert!(out.contains("text:label=\"*\""));
        assert!(out.contains("text:id=\"ftn3\" text:note-class=\"endnote\"><text:note-citation text:label=\"2\">"));
        assert!(out.contains("<dc:creator>Me</dc:creator><text:p>plain</text:p>"));
    }

    #[test]
    fn test_ods_cell() {
        assert_eq!(OdsCell.convert(Some("a<b\nc\n"), false), "a&lt;b</text:p>\n<text:p>c");
    }

    #[test]
    fn test_html_conversion() {
        let out = HtmlText.convert(Some("[i]a\nb[/i] [lang=fr]c[/lang=fr] /*x*/"), false);
        assert_eq!(
            out,
            "<em>a</em></p>\n<p><em>b</em> <span lang=\"fr\">c</span> <!--x-->"
        );
        assert_eq!(
            mark_html_quotations("<p>&gt; q</p>\n<p>n</p>"),
            "<blockquote>q</blockquote>\n<p>n</p>"
        );
    }

    #[test]
    fn test_csv_field() {
        assert_eq!(CsvField.convert(Some("a\n\"b\"\n"), false), "a\t\"b\"");
        assert_eq!(CsvField.convert(Some("x\u{1f}y"), false), "xy");
    }
}
