/// Pure text utilities for job descriptions.
///
/// Board APIs deliver descriptions as entity-encoded HTML. These helpers turn
/// that into a single line of plain text suitable for keyword matching.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Entities decoded before tag stripping, in order.
///
/// `&amp;` comes after `&lt;`/`&gt;` so a literal `&amp;lt;` stays `&lt;`.
const ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

/// Decode the common HTML entities.
pub fn decode_entities(html: &str) -> String {
    ENTITIES
        .iter()
        .fold(html.to_string(), |text, (entity, replacement)| {
            text.replace(entity, replacement)
        })
}

/// Decode entities, strip every tag, collapse whitespace runs to one space and trim.
pub fn html_to_plain_text(html: &str) -> String {
    let decoded = decode_entities(html);
    let stripped = TAG_REGEX.replace_all(&decoded, " ");
    WHITESPACE_REGEX
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}
