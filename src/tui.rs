//! Crossterm front-end for the interactive session.
//!
//! Owns the terminal for the lifetime of the session: raw mode plus the
//! alternate screen, restored on every exit path. Each input event is fully
//! reduced and re-rendered before the next one is read.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use crate::error::Result;
use crate::session::{Session, SessionEvent};

/// Runs the interactive session over `files` and returns the selected path,
/// if any.
pub fn run(files: Vec<String>) -> Result<Option<String>> {
    let (_, height) = terminal::size()?;
    let mut session = Session::new(files, height);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = event_loop(&mut session, &mut stdout);

    let _ = execute!(stdout, LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();

    result?;
    Ok(session.into_selection())
}

fn event_loop(session: &mut Session, stdout: &mut impl Write) -> Result<()> {
    loop {
        render(session, stdout)?;
        if let Some(event) = map_event(event::read()?) {
            session.apply(event);
        }
        if session.is_terminated() {
            return Ok(());
        }
    }
}

fn map_event(event: Event) -> Option<SessionEvent> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key),
        Event::Resize(_, height) => Some(SessionEvent::Resize { height }),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<SessionEvent> {
    match key.code {
        KeyCode::Esc => Some(SessionEvent::Cancel),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SessionEvent::Cancel)
        }
        KeyCode::Enter => Some(SessionEvent::Confirm),
        KeyCode::Up => Some(SessionEvent::MoveUp),
        KeyCode::Down => Some(SessionEvent::MoveDown),
        KeyCode::Backspace | KeyCode::Delete => Some(SessionEvent::Backspace),
        KeyCode::Char(ch) => Some(SessionEvent::Insert(ch)),
        _ => None,
    }
}

fn render(session: &Session, stdout: &mut impl Write) -> Result<()> {
    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    queue!(stdout, Print("\r\n  Search (Esc to quit)\r\n"))?;
    queue!(
        stdout,
        Print(format!("  > {}\u{2588}\r\n\r\n", session.query()))
    )?;

    if session.match_count() == 0 {
        if !session.query().is_empty() {
            queue!(stdout, Print("  No matches found.\r\n"))?;
        }
        stdout.flush()?;
        return Ok(());
    }

    let mut shown_to = session.window_start();
    for (position, path) in session.visible_rows() {
        if position == session.cursor() {
            queue!(
                stdout,
                SetForegroundColor(Color::Cyan),
                SetAttribute(Attribute::Bold),
                Print(format!("> {path}\r\n")),
                SetAttribute(Attribute::Reset),
                ResetColor,
            )?;
        } else {
            queue!(stdout, Print(format!("  {path}\r\n")))?;
        }
        shown_to = position + 1;
    }

    queue!(
        stdout,
        Print(format!(
            "\r\n  [Showing {}-{} of {}]\r\n",
            session.window_start() + 1,
            shown_to,
            session.match_count()
        ))
    )?;
    stdout.flush()?;
    Ok(())
}
