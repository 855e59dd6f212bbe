use super::wikilink::WikiLink;

/// A link target split into its note name and heading levels.
///
/// `Project#Goals#Q1` parses to note `Project` with headings `[Goals, Q1]`,
/// ordered outermost to innermost. Segments are kept verbatim, including
/// empty ones produced by doubled `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingPath {
    pub note: String,
    pub headings: Vec<String>,
}

impl HeadingPath {
    /// Splits a heading-path string on `#`.
    ///
    /// Any `|display` suffix must already be removed, see
    /// [`split_display_text`]. Never fails: a string without `#` yields a
    /// path with no headings, which the composer rejects.
    pub fn parse(path: &str) -> Self {
        let mut segments = path.split(WikiLink::HEADING).map(str::to_owned);
        let note = segments.next().unwrap_or_default();
        Self {
            note,
            headings: segments.collect(),
        }
    }
}

/// Splits a link query at the first unescaped `|`.
///
/// Returns the heading-path part and, when present, the existing display
/// text without its leading `|`. A `\|` stays part of the path.
pub fn split_display_text(query: &str) -> (&str, Option<&str>) {
    let mut escaped = false;
    for (i, c) in query.char_indices() {
        if c == WikiLink::ALIAS && !escaped {
            let display = &query[i + WikiLink::ALIAS.len_utf8()..];
            return (&query[..i], Some(display));
        }
        escaped = c == WikiLink::ESCAPE && !escaped;
    }
    (query, None)
}
