//! # Link Parsing
//!
//! Recognises heading links in a line of text and splits their targets.
//!
//! ## Modules
//!
//! - **`wikilink`**: `WikiLink` delimiter constants (`]]`, `|`, `#`, `^`, `\`)
//! - **`span`**: `Span` byte ranges into a line
//! - **`link`**: `LinkPattern` / `LinkMatch`, the cursor-anchored trigger patterns
//! - **`heading_path`**: `HeadingPath` and `split_display_text()`
//!
//! Matching is deliberately shallow: it never resolves note names or checks
//! that a heading exists.

pub mod heading_path;
pub mod link;
pub mod span;
pub mod wikilink;

pub use heading_path::{HeadingPath, split_display_text};
pub use link::{LinkMatch, LinkPattern};
pub use span::Span;
pub use wikilink::WikiLink;
