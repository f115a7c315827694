/// Field code post-processing.
///
/// A Word field is stored inline in the text as
/// `BEGIN instructions SEPARATOR result END`, using the control characters
/// 0x13, 0x14 and 0x15 as delimiters. Plain text output should show the
/// field result (the visible text) and drop the instructions.
use once_cell::sync::Lazy;
use regex::Regex;

/// Field begin marker (0x13)
pub const FIELD_BEGIN: char = '\u{13}';
/// Field separator marker (0x14)
pub const FIELD_SEPARATOR: char = '\u{14}';
/// Field end marker (0x15)
pub const FIELD_END: char = '\u{15}';

/// Fields whose result is an embedded picture or form control, with no text
/// worth keeping.
static HIDDEN_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\x13 *(?:INCLUDEPICTURE|HTMLCONTROL).*?\x15")
        .expect("Failed to build hidden field pattern")
});

/// Any field with a separator; group 1 is its result text.
static FIELD_RESULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\x13.*?\x14(.*?)\x15").expect("Failed to build field result pattern")
});

/// Replace every field by its result and drop picture and control fields.
///
/// Markers left over from nested or unterminated fields are stripped.
///
/// # Examples
///
/// ```
/// use oletext::ole::doc::parts::fields::resolve_fields;
///
/// let text = "See \u{13} HYPERLINK \"http://example.com\" \u{14}Click here\u{15}.";
/// assert_eq!(resolve_fields(text), "See Click here.");
/// ```
pub fn resolve_fields(text: &str) -> String {
    let without_pictures = HIDDEN_FIELD.replace_all(text, "");
    let results = FIELD_RESULT.replace_all(&without_pictures, "${1}");
    strip_markers(&results)
}

/// Remove field markers and keep everything between them.
pub fn strip_markers(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c, FIELD_BEGIN | FIELD_SEPARATOR | FIELD_END))
        .collect()
}
