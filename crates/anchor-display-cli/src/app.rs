use std::path::PathBuf;
use std::time::{Duration, Instant};

use anchor_display_engine::editing::{Buffer, Editor, Position};
use anchor_display_engine::settings::Settings;
use anchor_display_engine::triggers::{
    DebouncedRewriter, Instruction, SuggestSession, SuggestionList, apply_display_text,
};
use anchor_display_engine::{Candidate, EngineError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

/// Event-loop wake-up interval when no debounce deadline is pending.
pub const IDLE_TICK: Duration = Duration::from_millis(250);

/// Rows rendered into the suggestion popup.
#[derive(Debug, Default)]
pub struct Popup {
    pub rows: Vec<String>,
    pub hint: Option<String>,
}

impl SuggestionList for Popup {
    fn render_candidate(&mut self, candidate: &Candidate) {
        self.rows
            .push(format!("{}  ({})", candidate.display_text, candidate.label));
    }

    fn render_instructions(&mut self, instructions: &[Instruction]) {
        let hint = instructions
            .iter()
            .map(|i| format!("{} {}", i.command, i.purpose))
            .collect::<Vec<_>>()
            .join("  ");
        self.hint = Some(hint);
    }
}

pub struct App {
    pub buffer: Buffer,
    pub settings: Settings,
    pub file: Option<PathBuf>,
    pub status: Option<String>,
    pub popup: Popup,
    pub popup_state: ListState,
    pub dirty: bool,
    pub should_quit: bool,
    rewriter: DebouncedRewriter,
    suggest: SuggestSession,
}

impl App {
    pub fn new(text: &str, settings: Settings, file: Option<PathBuf>) -> Self {
        Self {
            buffer: Buffer::new(text),
            settings,
            file,
            status: None,
            popup: Popup::default(),
            popup_state: ListState::default(),
            dirty: false,
            should_quit: false,
            rewriter: DebouncedRewriter::new(),
            suggest: SuggestSession::new(),
        }
    }

    pub fn cursor(&self) -> Position {
        self.buffer.cursor()
    }

    pub fn popup_open(&self) -> bool {
        self.suggest.is_open()
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.rewriter.time_until_due(now).unwrap_or(IDLE_TICK)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => self.quit(),
                KeyCode::Char('s') => self.save(),
                _ => {}
            }
            return;
        }

        if self.popup_open() && self.handle_popup_key(key.code) {
            return;
        }

        match key.code {
            KeyCode::Char(c) => self.type_text(&c.to_string(), Some(c), now),
            KeyCode::Enter => self.type_text("\n", Some('\n'), now),
            KeyCode::Tab => self.type_text("\t", Some('\t'), now),
            KeyCode::Backspace => {
                if self.buffer.backspace().is_some() {
                    self.after_edit(None, now);
                }
            }
            KeyCode::Left => self.buffer.move_left(),
            KeyCode::Right => self.buffer.move_right(),
            KeyCode::Up => self.buffer.move_up(),
            KeyCode::Down => self.buffer.move_down(),
            KeyCode::Home => self.buffer.move_line_start(),
            KeyCode::End => self.buffer.move_line_end(),
            _ => {}
        }
    }

    /// Returns true when the popup consumed the key.
    fn handle_popup_key(&mut self, code: KeyCode) -> bool {
        let len = self.suggest.candidates().len();
        match code {
            KeyCode::Up => {
                let i = self.popup_state.selected().unwrap_or(0);
                self.popup_state.select(Some((i + len.saturating_sub(1)) % len.max(1)));
                true
            }
            KeyCode::Down => {
                let i = self.popup_state.selected().unwrap_or(0);
                self.popup_state.select(Some((i + 1) % len.max(1)));
                true
            }
            KeyCode::Enter => {
                let index = self.popup_state.selected().unwrap_or(0);
                match self.suggest.select(index, &mut self.buffer) {
                    Ok(candidate) => {
                        log::info!("Selected display text {:?}", candidate.display_text);
                        self.dirty = true;
                    }
                    Err(e) => self.report(&e),
                }
                self.close_popup();
                true
            }
            KeyCode::Esc => {
                self.suggest.cancel();
                self.close_popup();
                true
            }
            _ => {
                // any other key dismisses the popup and is handled as an edit
                self.suggest.cancel();
                self.close_popup();
                false
            }
        }
    }

    fn type_text(&mut self, text: &str, typed: Option<char>, now: Instant) {
        self.buffer.insert(text);
        self.after_edit(typed, now);
    }

    fn after_edit(&mut self, typed: Option<char>, now: Instant) {
        self.dirty = true;
        if self.settings.debounce {
            self.rewriter.on_change(typed, now);
            return;
        }
        self.rewrite_now();
        self.open_suggestions();
    }

    /// Runs the debounced edit handling once its deadline has passed: the
    /// rewrite first, then the suggestion check, whether or not anything was
    /// rewritten.
    pub fn tick(&mut self, now: Instant) {
        if !self.rewriter.is_pending() {
            return;
        }
        let status = &mut self.status;
        let mut notify = |m: &str| *status = Some(m.to_string());
        let polled = self
            .rewriter
            .poll(now, &mut self.buffer, &self.settings, &mut notify);
        if let Err(e) = polled {
            self.report(&e);
        }
        if !self.rewriter.is_pending() {
            self.open_suggestions();
        }
    }

    fn rewrite_now(&mut self) {
        let status = &mut self.status;
        let mut notify = |m: &str| *status = Some(m.to_string());
        if let Err(e) = apply_display_text(&mut self.buffer, &self.settings, &mut notify) {
            self.report(&e);
        }
    }

    fn open_suggestions(&mut self) {
        if self.suggest.on_trigger(&self.buffer, &self.settings).is_none() {
            return;
        }
        self.popup = Popup::default();
        let listed = self
            .suggest
            .list(&self.settings, &mut self.popup)
            .map(<[Candidate]>::len);
        match listed {
            Ok(len) => {
                log::debug!("Listing {len} display text candidates");
                self.popup_state.select(Some(0));
            }
            Err(e) => {
                self.report(&e);
                self.suggest.cancel();
            }
        }
    }

    fn close_popup(&mut self) {
        self.popup = Popup::default();
        self.popup_state.select(None);
    }

    fn report(&mut self, error: &EngineError) {
        log::warn!("{error}");
        self.status = Some(format!("Error: {error}"));
    }

    fn save(&mut self) {
        let Some(path) = &self.file else {
            self.status = Some("No file to save to".to_string());
            return;
        };
        match std::fs::write(path, self.buffer.text()) {
            Ok(()) => {
                log::info!("Saved {}", path.display());
                self.status = Some(format!("Saved {}", path.display()));
                self.dirty = false;
            }
            Err(e) => {
                log::error!("Failed to save {}: {e}", path.display());
                self.status = Some(format!("Failed to save {}: {e}", path.display()));
            }
        }
    }

    fn quit(&mut self) {
        self.rewriter.teardown();
        self.should_quit = true;
    }
}
