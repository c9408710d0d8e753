use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    time::Duration,
};

use crossterm::event::{self, KeyCode};

use crate::app::AppEvent;

/// Sends [`AppEvent::InputClosed`] when dropped, so the main loop learns that
/// no more keys will come however the input thread ends, a panic included.
struct ClosingNotice<'a> {
    app_event_tx: &'a Sender<AppEvent>,
    error: Option<io::Error>,
}

impl<'a> ClosingNotice<'a> {
    fn new(app_event_tx: &'a Sender<AppEvent>) -> Self {
        ClosingNotice {
            app_event_tx,
            error: None,
        }
    }
}

impl Drop for ClosingNotice<'_> {
    fn drop(&mut self) {
        // The main loop may already be gone
        let _ = self
            .app_event_tx
            .send(AppEvent::InputClosed(self.error.take()));
    }
}

/// Whether a key ends the game from anywhere.
pub fn is_quit_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Esc | KeyCode::Char('q'))
}

/// Forward key presses and resizes to the main loop until the player quits,
/// the main loop asks to stop, or reading the terminal fails.
/// This runs in its own thread, and is the only place input is read while a maze is on screen.
/// A read error is not returned but handed to the main loop inside [`AppEvent::InputClosed`].
pub fn listen_to_user_input(
    app_event_tx: Sender<AppEvent>,
    event_poll_timeout: Duration,
    should_stop: &AtomicBool,
) {
    let mut notice = ClosingNotice::new(&app_event_tx);
    if let Err(err) = forward_events(&app_event_tx, event_poll_timeout, should_stop) {
        tracing::error!("[input] Reading the terminal failed: {}", err);
        notice.error = Some(err);
    }
}

fn forward_events(
    app_event_tx: &Sender<AppEvent>,
    event_poll_timeout: Duration,
    should_stop: &AtomicBool,
) -> io::Result<()> {
    while !should_stop.load(Ordering::Acquire) {
        // Wake up regularly to look at the stop flag
        if !event::poll(event_poll_timeout)? {
            continue;
        }

        let app_event = match event::read()? {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                AppEvent::KeyPress(key_event)
            }
            event::Event::Resize(_, _) => AppEvent::Resize,
            _ => continue,
        };
        let quit = matches!(&app_event, AppEvent::KeyPress(key) if is_quit_key(key.code));

        if app_event_tx.send(app_event).is_err() {
            return Ok(());
        }
        if quit {
            tracing::debug!("[input] Quit key pressed, exiting");
            return Ok(());
        }
    }
    Ok(())
}
