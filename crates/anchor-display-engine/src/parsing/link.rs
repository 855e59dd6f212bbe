use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::span::Span;
use super::wikilink::WikiLink;

// A path character is anything but brackets, line breaks, `|` and `\`.
// A backslash escapes the next character, so `\|` stays in the path while
// `\\|` is an escaped backslash followed by the display separator.
const PATH_CHAR: &str = r"(?:\\[^\[\]\r\n]|[^\[\]|\r\n\\])";

static WITHOUT_DISPLAY_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\[\[(?P<path>{PATH_CHAR}*#{PATH_CHAR}+)\]\]$"
    ))
    .expect("Invalid heading link regex")
});

static WITH_DISPLAY_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\[\[(?P<path>{PATH_CHAR}*#{PATH_CHAR}+)(?P<display>\|[^\[\]\r\n]*)?\]\]$"
    ))
    .expect("Invalid heading link with display text regex")
});

/// Which wikilinks qualify as a trigger.
///
/// Auto-insertion only fires on links that have no display text yet, which
/// is what stops it from re-firing on its own output. The suggestion popup
/// also accepts links that already carry `|display` so the user can replace
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPattern {
    WithoutDisplayText,
    WithOptionalDisplayText,
}

impl LinkPattern {
    fn regex(self) -> &'static Regex {
        match self {
            Self::WithoutDisplayText => &WITHOUT_DISPLAY_TEXT,
            Self::WithOptionalDisplayText => &WITH_DISPLAY_TEXT,
        }
    }

    /// Finds a complete `[[...#...]]` link ending exactly at `cursor`.
    ///
    /// `cursor` is a byte offset into `line`; anything after it is ignored.
    /// Returns `None` when the cursor is out of range or not on a character
    /// boundary.
    pub fn find_before(self, line: &str, cursor: usize) -> Option<LinkMatch> {
        let prefix = line.get(..cursor)?;
        let caps = self.regex().captures(prefix)?;
        LinkMatch::from_captures(&caps)
    }
}

/// A heading link found immediately before the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// The whole link, `[[` through `]]`.
    pub span: Span,
    /// Heading-path string between `[[` and the display text or `]]`.
    pub path: String,
    /// Existing display text, without the leading `|`.
    pub display_text: Option<String>,
}

impl LinkMatch {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let full = caps.get(0)?;
        let path = caps.name("path")?;
        let display_text = caps.name("display").map(|m| {
            m.as_str()
                .strip_prefix(WikiLink::ALIAS)
                .unwrap_or(m.as_str())
                .to_string()
        });
        Some(Self {
            span: Span::new(full.start(), full.end()),
            path: path.as_str().to_string(),
            display_text,
        })
    }

    /// Offset just before the closing `]]`.
    pub fn insertion_point(&self) -> usize {
        self.span.end - WikiLink::CLOSE.len()
    }

    /// The span occupied by `|display`, or an empty span at the insertion
    /// point when the link has no display text.
    pub fn display_span(&self) -> Span {
        let end = self.insertion_point();
        let len = self
            .display_text
            .as_ref()
            .map_or(0, |d| WikiLink::ALIAS.len_utf8() + d.len());
        Span::new(end - len, end)
    }

    /// The raw query as typed: heading path plus any `|display` suffix.
    pub fn query(&self) -> String {
        match &self.display_text {
            Some(display) => format!("{}{}{}", self.path, WikiLink::ALIAS, display),
            None => self.path.clone(),
        }
    }
}
