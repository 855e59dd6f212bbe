//! # Display Text Composition
//!
//! Turns a [`HeadingPath`] into the text inserted after `|`.
//!
//! Composition runs in three fixed steps:
//!
//! 1. **Heading selection** picks first, last or all headings (joined with
//!    the separator). The note name never takes part in this step.
//! 2. **Block reference stripping** removes one leading `^` from the
//!    selected text.
//! 3. **Note-name placement** wraps the result with the note name before or
//!    after it, or leaves it alone.
//!
//! Stripping happens before wrapping so `[[Notes#^abc]]` with the note name
//! first becomes `Notes abc`, not `Notes ^abc`.

use crate::error::EngineError;
use crate::parsing::{HeadingPath, WikiLink};
use crate::settings::{HeadingSelection, NoteNamePlacement, Settings};

/// A composed display text offered in the suggestion popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub display_text: String,
    /// Describes the policy that produced `display_text`.
    pub label: &'static str,
    pub placement: NoteNamePlacement,
}

/// Composes display text using the configured placement and selection.
pub fn compose(path: &HeadingPath, settings: &Settings) -> Result<String, EngineError> {
    compose_with(path, settings, settings.include_note_name)
}

/// Composes display text with an explicit note-name placement, ignoring
/// `settings.include_note_name`.
pub fn compose_with(
    path: &HeadingPath,
    settings: &Settings,
    placement: NoteNamePlacement,
) -> Result<String, EngineError> {
    compose_parts(path, settings.which_headings, &settings.separator, placement)
}

fn compose_parts(
    path: &HeadingPath,
    which: HeadingSelection,
    sep: &str,
    placement: NoteNamePlacement,
) -> Result<String, EngineError> {
    let selected = select_headings(path, which, sep)?;
    let heading_text = selected
        .strip_prefix(WikiLink::BLOCK_REF)
        .unwrap_or(selected.as_str());

    let note = &path.note;
    Ok(match placement {
        NoteNamePlacement::None => heading_text.to_string(),
        NoteNamePlacement::NoteNameFirst => format!("{note}{sep}{heading_text}"),
        NoteNamePlacement::NoteNameLast => format!("{heading_text}{sep}{note}"),
    })
}

/// Composes one candidate per note-name placement, in the order of
/// [`NoteNamePlacement::ALL`], so the user can override the configured
/// default from the popup.
///
/// Candidates always join every heading; `which_headings` only applies to
/// automatic insertion.
pub fn compose_all(path: &HeadingPath, settings: &Settings) -> Result<Vec<Candidate>, EngineError> {
    NoteNamePlacement::ALL
        .into_iter()
        .map(|placement| {
            Ok(Candidate {
                display_text: compose_parts(
                    path,
                    HeadingSelection::All,
                    &settings.separator,
                    placement,
                )?,
                label: placement.label(),
                placement,
            })
        })
        .collect()
}

/// Applies the heading-selection policy to the heading tokens only.
fn select_headings(
    path: &HeadingPath,
    which: HeadingSelection,
    separator: &str,
) -> Result<String, EngineError> {
    let (Some(first), Some(last)) = (path.headings.first(), path.headings.last()) else {
        return Err(EngineError::MissingHeading {
            note: path.note.clone(),
        });
    };
    Ok(match which {
        HeadingSelection::FirstOnly => first.clone(),
        HeadingSelection::LastOnly => last.clone(),
        HeadingSelection::All => path.headings.join(separator),
    })
}
