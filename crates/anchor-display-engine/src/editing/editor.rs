/// A cursor or range endpoint: line index and byte column within that line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    /// Byte offset into the line, always on a character boundary.
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// The editor state the engine reads and the one mutation it performs.
///
/// Hosts deliver edit notifications serially, so implementations never see
/// overlapping calls.
pub trait Editor {
    /// Text of line `index` without its line terminator.
    fn line(&self, index: usize) -> Option<String>;

    fn cursor(&self) -> Position;

    /// Replaces `from..to` with `text` as one atomic edit. `to = None` inserts
    /// at `from` without removing anything.
    fn replace_range(&mut self, text: &str, from: Position, to: Option<Position>);
}

/// Fire-and-forget notice channel (toasts, status bars).
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

impl<F: FnMut(&str)> Notifier for F {
    fn notify(&mut self, message: &str) {
        self(message)
    }
}

/// Notifier for hosts without a notice surface.
pub struct Silent;

impl Notifier for Silent {
    fn notify(&mut self, _message: &str) {}
}
