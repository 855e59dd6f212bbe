//! # Editor Seam
//!
//! The engine never owns a document. It reads a line and the cursor through
//! [`Editor`], performs at most one [`Editor::replace_range`] per trigger,
//! and reports through an optional [`Notifier`].
//!
//! ## Modules
//!
//! - **`editor`**: `Editor`, `Notifier` and `Position`, the host-facing traits
//! - **`buffer`**: `Buffer`, an xi-rope document implementing `Editor`
//! - **`patch`**: `Patch`, what a `Buffer` splice changed
//!
//! ## Coordinates
//!
//! `Position::ch` is a byte offset into the line, not a UTF-16 or char index.
//! Hosts with other column units convert at the boundary.

pub mod buffer;
pub mod editor;
pub mod patch;

pub use buffer::Buffer;
pub use editor::{Editor, Notifier, Position, Silent};
pub use patch::Patch;
