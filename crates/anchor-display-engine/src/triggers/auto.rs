use std::time::{Duration, Instant};

use crate::compose::compose;
use crate::editing::{Editor, Notifier, Position};
use crate::error::EngineError;
use crate::parsing::{HeadingPath, LinkMatch, LinkPattern, WikiLink};
use crate::settings::Settings;

use super::debounce::{DEBOUNCE_DELAY, Debouncer};

/// The closing bracket the debounced rewriter waits for.
const CLOSING_BRACKET: char = ']';

/// One display-text insertion, planned against a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub line: usize,
    /// The link that triggered the rewrite.
    pub link: LinkMatch,
    /// Text spliced in before `]]`, including the leading `|`.
    pub insert: String,
}

impl Rewrite {
    /// Where `insert` goes: immediately before the closing `]]`.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.link.insertion_point())
    }
}

/// Plans the rewrite for `line` with the cursor at byte `cursor`, without
/// touching any editor.
///
/// Returns `Ok(None)` unless a heading link without display text ends exactly
/// at the cursor.
pub fn plan_rewrite(
    line_index: usize,
    line: &str,
    cursor: usize,
    settings: &Settings,
) -> Result<Option<Rewrite>, EngineError> {
    let Some(link) = LinkPattern::WithoutDisplayText.find_before(line, cursor) else {
        return Ok(None);
    };
    let path = HeadingPath::parse(&link.path);
    let display_text = compose(&path, settings)?;
    Ok(Some(Rewrite {
        line: line_index,
        insert: format!("{}{display_text}", WikiLink::ALIAS),
        link,
    }))
}

/// Handles one edit notification: if the cursor has just closed a heading
/// link, inserts `|display text` before its `]]`.
///
/// Performs at most one splice. Once the link has display text the pattern no
/// longer matches, so calling this again on the same line is a no-op.
pub fn apply_display_text<E: Editor + ?Sized>(
    editor: &mut E,
    settings: &Settings,
    notifier: &mut dyn Notifier,
) -> Result<Option<Rewrite>, EngineError> {
    if !settings.auto_insert {
        return Ok(None);
    }

    let cursor = editor.cursor();
    let Some(line) = editor.line(cursor.line) else {
        return Ok(None);
    };

    let rewrite = match plan_rewrite(cursor.line, &line, cursor.ch, settings) {
        Ok(Some(rewrite)) => rewrite,
        Ok(None) => return Ok(None),
        Err(e) => {
            log::warn!("Skipping display text for line {}: {e}", cursor.line);
            return Err(e);
        }
    };

    log::debug!(
        "Inserting {:?} into [[{}]] at {:?}",
        rewrite.insert,
        rewrite.link.path,
        rewrite.position()
    );
    editor.replace_range(&rewrite.insert, rewrite.position(), None);

    if settings.notify {
        notifier.notify(&settings.notify_text);
    }

    Ok(Some(rewrite))
}

/// Auto-insertion behind a trailing-edge debounce.
///
/// Edit notifications only reschedule the deadline. When the deadline passes,
/// the rewrite runs once, and only if the last keystroke of the burst was the
/// closing `]`, so display text is never inserted while the user is still
/// typing a heading.
#[derive(Debug)]
pub struct DebouncedRewriter {
    debouncer: Debouncer,
    last_typed: Option<char>,
    torn_down: bool,
}

impl DebouncedRewriter {
    pub fn new() -> Self {
        Self::with_delay(DEBOUNCE_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            last_typed: None,
            torn_down: false,
        }
    }

    /// Records an edit notification. `typed` is the character the edit
    /// inserted, if any (deletions and pastes pass `None`).
    pub fn on_change(&mut self, typed: Option<char>, now: Instant) {
        if self.torn_down {
            return;
        }
        self.last_typed = typed;
        self.debouncer.schedule(now);
    }

    /// Time the host may sleep before calling [`Self::poll`] again.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until(now)
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Runs the rewrite if the debounce deadline has passed.
    pub fn poll<E: Editor + ?Sized>(
        &mut self,
        now: Instant,
        editor: &mut E,
        settings: &Settings,
        notifier: &mut dyn Notifier,
    ) -> Result<Option<Rewrite>, EngineError> {
        if !self.debouncer.fire(now) {
            return Ok(None);
        }
        if self.last_typed.take() != Some(CLOSING_BRACKET) {
            log::trace!("Debounce fired without a closing bracket, nothing to do");
            return Ok(None);
        }
        apply_display_text(editor, settings, notifier)
    }

    /// Cancels any pending rewrite; later notifications are ignored.
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.last_typed = None;
        self.torn_down = true;
    }
}

impl Default for DebouncedRewriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Buffer, Silent};
    use crate::settings::{HeadingSelection, NoteNamePlacement};
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn plan_rewrite_for_closed_link() {
        let rewrite = plan_rewrite(0, "See [[Project#Goals#Q1]]", 24, &Settings::default())
            .unwrap()
            .unwrap();
        assert_eq!(rewrite.insert, "|Goals Q1");
        assert_eq!(rewrite.position(), Position::new(0, 22));
    }

    #[test]
    fn plan_rewrite_ignores_unfinished_link() {
        let plan = plan_rewrite(0, "See [[Project#Goa", 17, &Settings::default()).unwrap();
        assert_eq!(plan, None);
    }

    #[test]
    fn apply_inserts_before_closing_brackets() {
        let mut buffer = Buffer::new("See [[Project#Goals#Q1]]");
        let rewrite = apply_display_text(&mut buffer, &Settings::default(), &mut Silent).unwrap();

        assert!(rewrite.is_some());
        assert_eq!(buffer.text(), "See [[Project#Goals#Q1|Goals Q1]]");
        assert_eq!(buffer.cursor(), Position::new(0, buffer.len()));
    }

    #[test]
    fn apply_twice_is_idempotent() {
        let mut buffer = Buffer::new("[[A#B]]");
        let settings = Settings::default();
        apply_display_text(&mut buffer, &settings, &mut Silent).unwrap();
        let second = apply_display_text(&mut buffer, &settings, &mut Silent).unwrap();

        assert_eq!(second, None);
        assert_eq!(buffer.text(), "[[A#B|B]]");
        assert_eq!(buffer.version(), 1);
    }

    #[test]
    fn apply_respects_auto_insert_switch() {
        let mut buffer = Buffer::new("[[A#B]]");
        let settings = Settings {
            auto_insert: false,
            ..Settings::default()
        };
        assert_eq!(apply_display_text(&mut buffer, &settings, &mut Silent).unwrap(), None);
        assert_eq!(buffer.text(), "[[A#B]]");
    }

    #[test]
    fn apply_notifies_when_enabled() {
        let mut notices = Vec::new();
        let mut buffer = Buffer::new("[[A#B]]");
        let settings = Settings {
            notify: true,
            notify_text: "Link updated".to_string(),
            ..Settings::default()
        };

        apply_display_text(&mut buffer, &settings, &mut |m: &str| notices.push(m.to_string()))
            .unwrap();
        assert_eq!(notices, vec!["Link updated"]);
    }

    #[test]
    fn apply_does_not_notify_without_match() {
        let mut notices: Vec<String> = Vec::new();
        let mut buffer = Buffer::new("plain text");
        let settings = Settings {
            notify: true,
            ..Settings::default()
        };

        apply_display_text(&mut buffer, &settings, &mut |m: &str| notices.push(m.to_string()))
            .unwrap();
        assert!(notices.is_empty());
    }

    #[test]
    fn apply_uses_cursor_line_only() {
        let mut buffer = Buffer::new("[[Other#One]]\nnothing here");
        apply_display_text(&mut buffer, &Settings::default(), &mut Silent).unwrap();
        assert_eq!(buffer.text(), "[[Other#One]]\nnothing here");

        buffer.set_cursor(Position::new(0, 13));
        apply_display_text(&mut buffer, &Settings::default(), &mut Silent).unwrap();
        assert_eq!(buffer.text(), "[[Other#One|One]]\nnothing here");
    }

    #[test]
    fn debounced_fires_once_after_closing_bracket() {
        let t0 = Instant::now();
        let settings = Settings {
            include_note_name: NoteNamePlacement::NoteNameLast,
            which_headings: HeadingSelection::FirstOnly,
            ..Settings::default()
        };
        let mut buffer = Buffer::new("[[Note#Heading]");
        let mut rewriter = DebouncedRewriter::new();

        buffer.insert("]");
        rewriter.on_change(Some(']'), t0);

        let early = rewriter.poll(t0 + ms(100), &mut buffer, &settings, &mut Silent).unwrap();
        assert_eq!(early, None);

        let fired = rewriter.poll(t0 + ms(150), &mut buffer, &settings, &mut Silent).unwrap();
        assert!(fired.is_some());
        assert_eq!(buffer.text(), "[[Note#Heading|Heading Note]]");
        assert!(!rewriter.is_pending());
    }

    #[test]
    fn debounced_skips_when_last_key_was_not_bracket() {
        let t0 = Instant::now();
        // pasted in one go, so the last "typed" char is unknown
        let mut buffer = Buffer::new("[[Note#Heading]]");
        let mut rewriter = DebouncedRewriter::with_delay(ms(10));
        rewriter.on_change(None, t0);

        let fired = rewriter
            .poll(t0 + ms(10), &mut buffer, &Settings::default(), &mut Silent)
            .unwrap();
        assert_eq!(fired, None);
        assert_eq!(buffer.text(), "[[Note#Heading]]");
    }

    #[test]
    fn teardown_cancels_pending_rewrite() {
        let t0 = Instant::now();
        let mut buffer = Buffer::new("[[Note#Heading]]");
        let mut rewriter = DebouncedRewriter::new();
        rewriter.on_change(Some(']'), t0);
        rewriter.teardown();
        rewriter.on_change(Some(']'), t0 + ms(1));

        assert!(!rewriter.is_pending());
        let fired = rewriter
            .poll(t0 + ms(1000), &mut buffer, &Settings::default(), &mut Silent)
            .unwrap();
        assert_eq!(fired, None);
        assert_eq!(buffer.version(), 0);
    }
}
