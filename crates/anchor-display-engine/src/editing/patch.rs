use std::ops::Range;

/// Result of applying one splice to a [`Buffer`](super::Buffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte range now occupied by the inserted text.
    pub changed: Range<usize>,
    /// Number of bytes the splice removed.
    pub removed: usize,
    /// Cursor offset after the edit.
    pub new_cursor: usize,
    pub version: u64,
}
