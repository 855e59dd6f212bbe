//! # Edit Triggers
//!
//! Reacts to edit notifications from the host.
//!
//! ## Modules
//!
//! - **`auto`**: `apply_display_text()` and `DebouncedRewriter`, which insert
//!   display text when a heading link is closed
//! - **`suggest`**: `SuggestSession`, the popup offering one candidate per
//!   note-name placement
//! - **`debounce`**: `Debouncer`, the trailing-edge deadline behind
//!   `DebouncedRewriter`
//!
//! Every coordinator splices at most once per trigger and reads nothing after
//! the cursor.

pub mod auto;
pub mod debounce;
pub mod suggest;

pub use auto::{DebouncedRewriter, Rewrite, apply_display_text, plan_rewrite};
pub use debounce::{DEBOUNCE_DELAY, Debouncer};
pub use suggest::{
    ACCEPT_INSTRUCTION, Instruction, SuggestSession, SuggestState, SuggestionList, TriggerInfo,
};
