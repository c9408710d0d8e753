pub mod args;
mod input;
pub mod renderer;
mod timer;

use std::{
    io::{self, Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, Sender},
    },
    time::Duration,
};

use crossterm::{
    QueueableCommand, cursor,
    event::{self, KeyCode},
    execute, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    game::{Difficulty, MoveOutcome, Session, TickOutcome},
    maze::Direction,
};
use timer::Timer;

/// Everything the main loop reacts to. Input and timer threads feed one channel,
/// so the session only ever sees one event at a time.
#[derive(Debug)]
pub enum AppEvent {
    KeyPress(event::KeyEvent),
    Resize,
    /// One second of the round with this generation elapsed
    Tick { generation: u64 },
    /// The input thread is gone, with the read error that ended it if any
    InputClosed(Option<io::Error>),
}

/// What the main loop does once an event has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Redraw,
    Unchanged,
    Exit,
}

impl Flow {
    fn redraw_if(changed: bool) -> Flow {
        if changed { Flow::Redraw } else { Flow::Unchanged }
    }
}

pub struct App {
    /// Time between two clock ticks
    tick_duration: Duration,
    /// Timeout for polling input events in the input thread, a.k.a.
    /// how often the input thread checks whether it should stop
    user_input_event_poll_timeout: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self {
            tick_duration: Duration::from_secs(1),
            user_input_event_poll_timeout: Duration::from_millis(100),
        }
    }
}

/// Per-round clock bookkeeping. Every new round bumps the generation so ticks
/// still queued from an older round can be told apart and dropped.
struct Clock {
    generation: u64,
    timer: Option<Timer>,
    tick_duration: Duration,
    app_event_tx: Sender<AppEvent>,
}

impl Clock {
    fn new(tick_duration: Duration, app_event_tx: Sender<AppEvent>) -> Self {
        Clock {
            generation: 0,
            timer: None,
            tick_duration,
            app_event_tx,
        }
    }

    fn restart(&mut self) {
        self.stop();
        self.generation += 1;
        self.timer = Some(Timer::start(
            self.generation,
            self.tick_duration,
            self.app_event_tx.clone(),
        ));
    }

    fn stop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
    }

    fn is_running(&self) -> bool {
        self.timer.is_some()
    }
}

impl App {
    /// Restore the terminal before the default hook prints a panic,
    /// whichever thread panicked
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut io::stdout()); // already failing, nothing to do with errors
            hook(panic_info);
        }));
    }

    /// Switch to raw mode on the alternate screen, with the cursor hidden,
    /// and make sure a panic puts everything back
    pub fn setup_terminal(stdout: &mut Stdout) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()
    }

    /// Hand the terminal back to the shell
    pub fn restore_terminal(stdout: &mut Stdout) -> io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()
    }

    /// Run the game until the player quits.
    /// Asks for a difficulty first unless one is given.
    pub fn run(
        &self,
        stdout: &mut Stdout,
        difficulty: Option<Difficulty>,
        seed: Option<u64>,
    ) -> io::Result<()> {
        let difficulty = match difficulty {
            Some(d) => d,
            None => match App::select_difficulty(stdout)? {
                Some(d) => d,
                None => return Ok(()),
            },
        };

        let (app_event_tx, app_event_rx) = std::sync::mpsc::channel::<AppEvent>();

        // Flag to let the input thread stop. Enabled by the main thread only.
        let should_stop = Arc::new(AtomicBool::new(false));
        let should_stop_for_input = should_stop.clone();
        let input_event_tx = app_event_tx.clone();
        let poll_timeout = self.user_input_event_poll_timeout;
        let input_thread_handle = std::thread::spawn(move || {
            input::listen_to_user_input(input_event_tx, poll_timeout, &should_stop_for_input)
        });

        let mut clock = Clock::new(self.tick_duration, app_event_tx);
        let mut session = Session::new(seed);
        session.start(difficulty);
        clock.restart();
        tracing::info!("[app] Started main loop at {:?}", difficulty);

        let result = App::event_loop(stdout, &mut session, &mut clock, &app_event_rx);

        // Stop all background threads before handing the terminal back
        clock.stop();
        should_stop.store(true, Ordering::Release);
        let input_thread_result = input_thread_handle.join();
        tracing::info!("[app] Exiting main loop");

        result?;
        input_thread_result.map_err(|_| {
            tracing::error!("[app] Input thread panicked");
            io::Error::other("input thread panicked")
        })
    }

    /// Draw the session, then keep applying events until the player quits.
    fn event_loop(
        stdout: &mut Stdout,
        session: &mut Session,
        clock: &mut Clock,
        app_event_rx: &Receiver<AppEvent>,
    ) -> io::Result<()> {
        renderer::draw(stdout, session)?;
        App::process_events(session, clock, app_event_rx, |session| {
            renderer::draw(stdout, session)
        })
    }

    /// Apply events to the session one at a time, calling `redraw` after every change.
    fn process_events(
        session: &mut Session,
        clock: &mut Clock,
        app_event_rx: &Receiver<AppEvent>,
        mut redraw: impl FnMut(&Session) -> io::Result<()>,
    ) -> io::Result<()> {
        // The clock holds a sender for the whole loop, so the channel never closes
        // by itself. The input thread always ends with `InputClosed` instead.
        while let Ok(app_event) = app_event_rx.recv() {
            match App::handle_event(session, clock, app_event)? {
                Flow::Redraw => redraw(session)?,
                Flow::Unchanged => {}
                Flow::Exit => break,
            }
        }
        Ok(())
    }

    /// Apply one event to the session and its clock. A read error from the
    /// input thread is returned as is.
    fn handle_event(
        session: &mut Session,
        clock: &mut Clock,
        app_event: AppEvent,
    ) -> io::Result<Flow> {
        let flow = match app_event {
            AppEvent::InputClosed(Some(err)) => return Err(err),
            AppEvent::InputClosed(None) => {
                tracing::debug!("[app] Input thread closed");
                Flow::Exit
            }
            AppEvent::Tick { generation } if generation != clock.generation => {
                tracing::trace!("[app] Dropping stale tick from round {}", generation);
                Flow::Unchanged
            }
            AppEvent::Tick { .. } => Flow::redraw_if(session.tick() != TickOutcome::NotRunning),
            AppEvent::Resize => Flow::Redraw,
            AppEvent::KeyPress(key_event) => match key_event.code {
                code if input::is_quit_key(code) => {
                    tracing::debug!("[app] Exit requested");
                    Flow::Exit
                }
                KeyCode::Up => App::apply_move(session, Direction::Up),
                KeyCode::Down => App::apply_move(session, Direction::Down),
                KeyCode::Left => App::apply_move(session, Direction::Left),
                KeyCode::Right => App::apply_move(session, Direction::Right),
                KeyCode::Char('r') => {
                    let restarted = session.restart();
                    if restarted {
                        clock.restart();
                    }
                    Flow::redraw_if(restarted)
                }
                KeyCode::Char(c) => match difficulty_for_key(c) {
                    Some(difficulty) => {
                        session.start(difficulty);
                        clock.restart();
                        Flow::Redraw
                    }
                    None => Flow::Unchanged,
                },
                _ => Flow::Unchanged,
            },
        };

        // A finished round has no use for its clock
        if session.state().is_terminal() {
            clock.stop();
        }
        Ok(flow)
    }

    fn apply_move(session: &mut Session, direction: Direction) -> Flow {
        let outcome = session.move_agent(direction);
        if let MoveOutcome::Won { score, .. } = outcome {
            tracing::info!("[app] Round won with score {}", score);
        }
        Flow::redraw_if(outcome.is_accepted())
    }

    /// Ask for a difficulty with a small menu: arrow keys and Enter, or the
    /// difficulty's number key. Returns None if the player quits instead.
    fn select_difficulty(stdout: &mut Stdout) -> io::Result<Option<Difficulty>> {
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;

        let mut selected = 0;
        let choice = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;
            stdout.queue(style::PrintStyledContent(
                "Choose a maze (↑/↓ and Enter, 1/2/3, Esc to quit):".with(Color::Yellow),
            ))?;
            for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
                let line = format!("\r\n {}. {}", i + 1, difficulty);
                if i == selected {
                    stdout.queue(style::PrintStyledContent(line.attribute(Attribute::Reverse)))?;
                } else {
                    stdout.queue(style::Print(line))?;
                }
            }
            stdout.queue(style::Print("\r\n"))?;
            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()?
                && kind == event::KeyEventKind::Press
            {
                match code {
                    code if input::is_quit_key(code) => break None,
                    KeyCode::Up => {
                        selected = selected.checked_sub(1).unwrap_or(Difficulty::ALL.len() - 1)
                    }
                    KeyCode::Down => selected = (selected + 1) % Difficulty::ALL.len(),
                    KeyCode::Enter => break Some(Difficulty::ALL[selected]),
                    KeyCode::Char(c) => {
                        if let Some(difficulty) = difficulty_for_key(c) {
                            break Some(difficulty);
                        }
                    }
                    _ => {}
                }
            }
        };

        execute!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
        )?;
        tracing::debug!("[app] Menu choice: {:?}", choice);
        Ok(choice)
    }
}

/// The number keys 1, 2 and 3 pick Easy, Medium and Hard.
fn difficulty_for_key(key: char) -> Option<Difficulty> {
    let index = key.to_digit(10)?.checked_sub(1)?;
    Difficulty::ALL.get(index as usize).copied()
}
