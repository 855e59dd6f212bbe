use serde::{Deserialize, Serialize};

/// Message shown by the notice collaborator after an automatic rewrite.
pub const DEFAULT_NOTIFY_TEXT: &str = "Updated anchor link display text.";

/// Where the note name goes in the composed display text.
///
/// The `headersOnly` alias reads settings written by older releases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoteNamePlacement {
    #[default]
    #[serde(alias = "headersOnly")]
    None,
    NoteNameFirst,
    NoteNameLast,
}

impl NoteNamePlacement {
    pub const ALL: [NoteNamePlacement; 3] = [Self::None, Self::NoteNameFirst, Self::NoteNameLast];

    /// Human-readable description, shown next to suggestion candidates.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Don't include note name",
            Self::NoteNameFirst => "Note name and then heading(s)",
            Self::NoteNameLast => "Heading(s) and then note name",
        }
    }
}

/// Which heading levels of the path make it into the display text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadingSelection {
    #[default]
    #[serde(alias = "allHeaders")]
    All,
    #[serde(alias = "lastHeader")]
    LastOnly,
    #[serde(alias = "firstHeader")]
    FirstOnly,
}

impl HeadingSelection {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All linked headings",
            Self::LastOnly => "Last heading only",
            Self::FirstOnly => "First heading only",
        }
    }
}

/// Immutable settings snapshot passed to every compose and trigger call.
///
/// Hosts replace the whole value when the user changes a setting; nothing in
/// the engine holds on to it between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(alias = "includeNoteName")]
    pub include_note_name: NoteNamePlacement,
    #[serde(alias = "whichHeadings")]
    pub which_headings: HeadingSelection,
    /// Inserted between headings (and the note name) instead of `#`.
    #[serde(alias = "sep")]
    pub separator: String,
    /// Signal the notice collaborator after each automatic rewrite.
    #[serde(alias = "includeNotice")]
    pub notify: bool,
    #[serde(alias = "notifyText")]
    pub notify_text: String,
    /// Insert display text automatically when a heading link is closed.
    pub auto_insert: bool,
    /// Offer the three note-name placements in a suggestion popup.
    pub suggest: bool,
    /// Coalesce edit notifications with a trailing-edge delay before
    /// auto-insertion runs.
    pub debounce: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_note_name: NoteNamePlacement::default(),
            which_headings: HeadingSelection::default(),
            separator: " ".to_string(),
            notify: false,
            notify_text: DEFAULT_NOTIFY_TEXT.to_string(),
            auto_insert: true,
            suggest: true,
            debounce: false,
        }
    }
}
