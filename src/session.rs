//! Interactive session state machine.
//!
//! The session is a reducer over explicit state: every input event is
//! applied through [`Session::apply`], which updates the query, the match
//! set, the cursor, and the viewport window. No terminal types appear here,
//! so the whole state machine is unit-testable without a terminal.

use crate::query;

/// Rows reserved for the prompt and status chrome around the match list.
const CHROME_ROWS: u16 = 5;

/// One input event fed to the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Cancel,
    Confirm,
    MoveUp,
    MoveDown,
    Insert(char),
    Backspace,
    Resize { height: u16 },
}

/// How a terminated session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cancelled,
    Selected(String),
}

/// Session state: the cached file list plus the live query, match set,
/// cursor, and viewport window over the matches.
#[derive(Debug)]
pub struct Session {
    files: Vec<String>,
    query: String,
    matches: Vec<usize>,
    cursor: usize,
    window_start: usize,
    window_size: usize,
    outcome: Option<Outcome>,
}

impl Session {
    /// Starts a browsing session over `files` with a viewport sized for a
    /// terminal of `height` rows.
    pub fn new(files: Vec<String>, height: u16) -> Self {
        Self {
            files,
            query: String::new(),
            matches: Vec::new(),
            cursor: 0,
            window_start: 0,
            window_size: window_size_for_height(height),
            outcome: None,
        }
    }

    /// Applies one event. Events arriving after termination are ignored.
    pub fn apply(&mut self, event: SessionEvent) {
        if self.outcome.is_some() {
            return;
        }

        match event {
            SessionEvent::Cancel => {
                self.outcome = Some(Outcome::Cancelled);
            }
            SessionEvent::Confirm => {
                // No-op while the match set is empty.
                if let Some(&index) = self.matches.get(self.cursor) {
                    self.outcome = Some(Outcome::Selected(self.files[index].clone()));
                }
            }
            SessionEvent::MoveUp => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    if self.cursor < self.window_start {
                        self.window_start -= 1;
                    }
                }
            }
            SessionEvent::MoveDown => {
                if self.cursor + 1 < self.matches.len() {
                    self.cursor += 1;
                    if self.cursor >= self.window_start + self.window_size {
                        self.window_start += 1;
                    }
                }
            }
            SessionEvent::Insert(ch) => {
                self.query.push(ch);
                self.recompute();
            }
            SessionEvent::Backspace => {
                if self.query.pop().is_some() {
                    self.recompute();
                }
            }
            SessionEvent::Resize { height } => {
                // Cursor and window start stay put; rendering clamps the
                // visible slice to the match list end.
                self.window_size = window_size_for_height(height);
            }
        }
    }

    fn recompute(&mut self) {
        self.matches = query::match_paths(&self.files, &self.query);
        self.cursor = 0;
        self.window_start = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn window_start(&self) -> usize {
        self.window_start
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn is_terminated(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Consumes the session and returns the selected path, if any.
    pub fn into_selection(self) -> Option<String> {
        match self.outcome {
            Some(Outcome::Selected(path)) => Some(path),
            _ => None,
        }
    }

    /// Visible slice of the match set as `(match position, path)` pairs.
    ///
    /// The end of the slice is clamped to the match list, so a freshly
    /// shrunk or grown viewport never reads past it.
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        let end = (self.window_start + self.window_size).min(self.matches.len());
        let start = self.window_start.min(end);
        self.matches[start..end]
            .iter()
            .enumerate()
            .map(move |(offset, &index)| (start + offset, self.files[index].as_str()))
    }
}

fn window_size_for_height(height: u16) -> usize {
    usize::from(height.saturating_sub(CHROME_ROWS)).max(1)
}
