/// Wikilink delimiters.
///
/// The trigger regexes spell the brackets out themselves; everything that
/// splits or splices a link goes through these constants.
pub struct WikiLink;

impl WikiLink {
    pub const CLOSE: &'static str = "]]";
    /// Separates the link target from its display text.
    pub const ALIAS: char = '|';
    /// Separates the note name and each heading level.
    pub const HEADING: char = '#';
    /// Prefix marking a heading segment as a block reference.
    pub const BLOCK_REF: char = '^';
    /// Escapes an `ALIAS` that should stay part of the target (tables).
    pub const ESCAPE: char = '\\';
}
