pub mod compose;
pub mod editing;
pub mod error;
pub mod parsing;
pub mod settings;
pub mod triggers;

// Re-export key types for easier usage
pub use compose::{Candidate, compose, compose_all, compose_with};
pub use editing::{Buffer, Editor, Notifier, Position, Silent};
pub use error::EngineError;
pub use parsing::{HeadingPath, LinkMatch, LinkPattern};
pub use settings::{HeadingSelection, NoteNamePlacement, Settings};
pub use triggers::{DebouncedRewriter, SuggestSession, SuggestionList, apply_display_text};
