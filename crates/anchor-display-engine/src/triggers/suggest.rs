use crate::compose::{Candidate, compose_all};
use crate::editing::{Editor, Position};
use crate::error::EngineError;
use crate::parsing::{HeadingPath, LinkMatch, LinkPattern, WikiLink, split_display_text};
use crate::settings::Settings;

/// A keyboard hint shown beneath the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub command: &'static str,
    pub purpose: &'static str,
}

pub const ACCEPT_INSTRUCTION: Instruction = Instruction {
    command: "↵",
    purpose: "to accept",
};

/// Where suggestions get drawn. Implemented by the host's popup.
pub trait SuggestionList {
    fn render_candidate(&mut self, candidate: &Candidate);

    /// Called once per listing, after the first candidate.
    fn render_instructions(&mut self, instructions: &[Instruction]);
}

/// What a suggestion trigger matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerInfo {
    pub line: usize,
    /// Start and end of the trigger span; both sit just before `]]`.
    pub start: usize,
    pub end: usize,
    /// Heading path plus any `|display` suffix, as typed.
    pub query: String,
    pub link: LinkMatch,
}

impl TriggerInfo {
    fn from_link(line: usize, link: LinkMatch) -> Self {
        let at = link.insertion_point();
        Self {
            line,
            start: at,
            end: at,
            query: link.query(),
            link,
        }
    }

    /// The range a selection replaces: the trigger span, widened backward
    /// over any existing `|display`.
    pub fn replacement_range(&self) -> (Position, Position) {
        let span = self.link.display_span();
        (
            Position::new(self.line, span.start),
            Position::new(self.line, span.end),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestState {
    #[default]
    Inactive,
    Triggered,
    Listing,
    Selected,
    Cancelled,
}

/// Interactive correction of display text through a popup.
///
/// ```text
/// Inactive -> Triggered -> Listing -> Selected
///                                  \-> Cancelled
/// ```
///
/// Selected and Cancelled are terminal for the trigger; the next call to
/// [`SuggestSession::on_trigger`] starts over.
#[derive(Debug, Default)]
pub struct SuggestSession {
    state: SuggestState,
    trigger: Option<TriggerInfo>,
    candidates: Vec<Candidate>,
}

impl SuggestSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SuggestState {
        self.state
    }

    pub fn trigger(&self) -> Option<&TriggerInfo> {
        self.trigger.as_ref()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// True while a trigger or listing is waiting on the user.
    pub fn is_open(&self) -> bool {
        matches!(self.state, SuggestState::Triggered | SuggestState::Listing)
    }

    /// Checks whether the cursor sits right after a heading link, with or
    /// without display text. Resets the session when it does not.
    pub fn on_trigger<E: Editor + ?Sized>(
        &mut self,
        editor: &E,
        settings: &Settings,
    ) -> Option<&TriggerInfo> {
        self.candidates.clear();
        self.trigger = None;
        self.state = SuggestState::Inactive;

        if !settings.suggest {
            return None;
        }
        let cursor = editor.cursor();
        let line = editor.line(cursor.line)?;
        let link = LinkPattern::WithOptionalDisplayText.find_before(&line, cursor.ch)?;

        log::debug!("Suggestion trigger for [[{}]]", link.query());
        self.state = SuggestState::Triggered;
        self.trigger = Some(TriggerInfo::from_link(cursor.line, link));
        self.trigger.as_ref()
    }

    /// Composes the three candidates and renders them into `ui`.
    ///
    /// Listing again re-renders the candidates; the instruction row is only
    /// rendered on the first listing of a trigger.
    pub fn list(
        &mut self,
        settings: &Settings,
        ui: &mut dyn SuggestionList,
    ) -> Result<&[Candidate], EngineError> {
        let trigger = match (&self.state, &self.trigger) {
            (SuggestState::Triggered | SuggestState::Listing, Some(trigger)) => trigger,
            _ => return Err(EngineError::NoActiveSuggestions),
        };
        let first_listing = self.state == SuggestState::Triggered;

        let (path, _) = split_display_text(&trigger.query);
        let path = HeadingPath::parse(path);
        self.candidates = compose_all(&path, settings)?;

        for (i, candidate) in self.candidates.iter().enumerate() {
            ui.render_candidate(candidate);
            if i == 0 && first_listing {
                ui.render_instructions(&[ACCEPT_INSTRUCTION]);
            }
        }
        self.state = SuggestState::Listing;
        Ok(&self.candidates)
    }

    /// Splices `|` plus the chosen candidate over the trigger span.
    pub fn select<E: Editor + ?Sized>(
        &mut self,
        index: usize,
        editor: &mut E,
    ) -> Result<Candidate, EngineError> {
        let trigger = match (&self.state, &self.trigger) {
            (SuggestState::Listing, Some(trigger)) => trigger,
            _ => return Err(EngineError::NoActiveSuggestions),
        };
        let candidate = self
            .candidates
            .get(index)
            .cloned()
            .ok_or(EngineError::CandidateOutOfRange {
                index,
                len: self.candidates.len(),
            })?;

        let (from, to) = trigger.replacement_range();
        let text = format!("{}{}", WikiLink::ALIAS, candidate.display_text);
        log::debug!("Replacing {from:?}..{to:?} with {text:?}");
        editor.replace_range(&text, from, Some(to));

        self.state = SuggestState::Selected;
        Ok(candidate)
    }

    /// Dismisses the popup without touching the document.
    pub fn cancel(&mut self) {
        if self.is_open() {
            self.state = SuggestState::Cancelled;
        }
        self.candidates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Buffer;
    use crate::settings::NoteNamePlacement;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingList {
        rows: Vec<String>,
    }

    impl SuggestionList for RecordingList {
        fn render_candidate(&mut self, candidate: &Candidate) {
            self.rows
                .push(format!("{} | {}", candidate.display_text, candidate.label));
        }

        fn render_instructions(&mut self, instructions: &[Instruction]) {
            for i in instructions {
                self.rows.push(format!("{} {}", i.command, i.purpose));
            }
        }
    }

    fn open(text: &str) -> (Buffer, SuggestSession) {
        let buffer = Buffer::new(text);
        let mut session = SuggestSession::new();
        session.on_trigger(&buffer, &Settings::default());
        (buffer, session)
    }

    #[test]
    fn trigger_span_sits_before_closing_brackets() {
        let (_, session) = open("x [[Project#Goals]]");
        let trigger = session.trigger().unwrap();
        assert_eq!(session.state(), SuggestState::Triggered);
        assert_eq!((trigger.start, trigger.end), (17, 17));
        assert_eq!(trigger.query, "Project#Goals");
    }

    #[test]
    fn trigger_query_includes_display_text() {
        let (_, session) = open("[[Project#Goals|Custom]]");
        assert_eq!(session.trigger().unwrap().query, "Project#Goals|Custom");
    }

    #[test]
    fn no_trigger_without_heading() {
        let (_, session) = open("[[Project]]");
        assert_eq!(session.trigger(), None);
        assert_eq!(session.state(), SuggestState::Inactive);
        assert!(!session.is_open());
    }

    #[test]
    fn escaped_backslash_before_pipe_ends_the_path() {
        let (_, session) = open(r"[[A\\|B#C]]");
        assert_eq!(session.trigger(), None);

        let (mut buffer, mut session) = open(r"[[Note#Part\\|shown]]");
        assert_eq!(session.trigger().unwrap().query, r"Note#Part\\|shown");
        let listed = session
            .list(&Settings::default(), &mut RecordingList::default())
            .unwrap();
        assert_eq!(listed[0].display_text, r"Part\\");

        session.select(0, &mut buffer).unwrap();
        assert_eq!(buffer.text(), r"[[Note#Part\\|Part\\]]");
    }

    #[test]
    fn suggest_switch_disables_trigger() {
        let buffer = Buffer::new("[[A#B]]");
        let mut session = SuggestSession::new();
        let settings = Settings {
            suggest: false,
            ..Settings::default()
        };
        assert_eq!(session.on_trigger(&buffer, &settings), None);
    }

    #[test]
    fn listing_renders_instruction_once() {
        let (_, mut session) = open("[[Project#Goals]]");
        let mut ui = RecordingList::default();
        session.list(&Settings::default(), &mut ui).unwrap();
        session.list(&Settings::default(), &mut ui).unwrap();

        insta::assert_snapshot!(ui.rows.join("\n"), @r"
        Goals | Don't include note name
        ↵ to accept
        Project Goals | Note name and then heading(s)
        Goals Project | Heading(s) and then note name
        Goals | Don't include note name
        Project Goals | Note name and then heading(s)
        Goals Project | Heading(s) and then note name
        ");
    }

    #[test]
    fn select_inserts_at_trigger_span() {
        let (mut buffer, mut session) = open("[[Project#Goals]]");
        session
            .list(&Settings::default(), &mut RecordingList::default())
            .unwrap();
        let chosen = session.select(1, &mut buffer).unwrap();

        assert_eq!(chosen.placement, NoteNamePlacement::NoteNameFirst);
        assert_eq!(buffer.text(), "[[Project#Goals|Project Goals]]");
        assert_eq!(session.state(), SuggestState::Selected);
    }

    #[test]
    fn select_replaces_existing_display_text() {
        let (mut buffer, mut session) = open("see [[Project#Goals|Custom]]");
        session
            .list(&Settings::default(), &mut RecordingList::default())
            .unwrap();
        session.select(2, &mut buffer).unwrap();
        assert_eq!(buffer.text(), "see [[Project#Goals|Goals Project]]");
    }

    #[test]
    fn select_widens_over_empty_display_text() {
        let (mut buffer, mut session) = open("[[Project#Goals|]]");
        session
            .list(&Settings::default(), &mut RecordingList::default())
            .unwrap();
        session.select(0, &mut buffer).unwrap();
        assert_eq!(buffer.text(), "[[Project#Goals|Goals]]");
    }

    #[test]
    fn select_before_listing_fails() {
        let (mut buffer, mut session) = open("[[A#B]]");
        assert_eq!(
            session.select(0, &mut buffer),
            Err(EngineError::NoActiveSuggestions)
        );
    }

    #[test]
    fn select_out_of_range_leaves_document() {
        let (mut buffer, mut session) = open("[[A#B]]");
        session
            .list(&Settings::default(), &mut RecordingList::default())
            .unwrap();
        assert_eq!(
            session.select(3, &mut buffer),
            Err(EngineError::CandidateOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(buffer.version(), 0);
        assert!(session.is_open());
    }

    #[test]
    fn cancel_leaves_document_untouched() {
        let (mut buffer, mut session) = open("[[A#B]]");
        session
            .list(&Settings::default(), &mut RecordingList::default())
            .unwrap();
        session.cancel();

        assert_eq!(session.state(), SuggestState::Cancelled);
        assert!(session.candidates().is_empty());
        assert_eq!(
            session.select(0, &mut buffer),
            Err(EngineError::NoActiveSuggestions)
        );
        assert_eq!(buffer.text(), "[[A#B]]");
    }
}
