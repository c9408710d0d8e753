use std::{
    fmt,
    io::{Stdout, Write},
};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    game::{GameState, Round, Session},
    maze::{Coord, Direction},
};

/// What occupies one spot of the drawn maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Wall,
    Empty,
    /// A cell or passage the agent has already walked
    Trail,
    Start,
    Goal,
    Agent,
}

impl Glyph {
    /// The width of each glyph when rendered, in character widths.
    pub const WIDTH: u16 = 2;
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Glyph::Wall => "⬜".with(Color::White),
            Glyph::Empty => "  ".with(Color::Reset),
            Glyph::Trail => "* ".with(Color::Blue),
            Glyph::Start => "🟩".with(Color::Green),
            Glyph::Goal => "🟥".with(Color::Red),
            Glyph::Agent => "🟡".with(Color::Yellow),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::WIDTH as usize,
                "Each glyph must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// The maze of a round laid out on a `(2 * rows + 1) x (2 * cols + 1)` glyph grid:
/// cells sit on odd rows and columns, walls and passages between them.
/// Spots are `usize`: the frame of a board near the `u16` limit is larger than `u16`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    height: usize,
    width: usize,
    glyphs: Vec<Glyph>,
}

impl Frame {
    pub fn from_round(round: &Round) -> Self {
        let maze = round.maze();
        let height = maze.rows() as usize * 2 + 1;
        let width = maze.cols() as usize * 2 + 1;
        let mut frame = Frame {
            height,
            width,
            glyphs: vec![Glyph::Wall; height * width],
        };

        for coord in maze.coords() {
            frame.set(Frame::cell_spot(coord), Glyph::Empty);
            for direction in [Direction::Down, Direction::Right] {
                if maze.neighbor(coord, direction).is_some() && !maze.has_wall(coord, direction) {
                    frame.set(Frame::passage_spot(coord, direction), Glyph::Empty);
                }
            }
        }

        // Trail first so the markers below win on shared cells
        for (i, &coord) in round.trail().iter().enumerate() {
            frame.set(Frame::cell_spot(coord), Glyph::Trail);
            if let Some(&next) = round.trail().get(i + 1) {
                frame.set(Frame::between(coord, next), Glyph::Trail);
            }
        }
        frame.set(Frame::cell_spot(round.start()), Glyph::Start);
        frame.set(Frame::cell_spot(round.goal()), Glyph::Goal);
        frame.set(Frame::cell_spot(round.position()), Glyph::Agent);

        frame
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Width on screen, in terminal columns.
    pub fn screen_width(&self) -> usize {
        self.width * Glyph::WIDTH as usize
    }

    /// Glyph at `(row, col)` of the frame.
    pub fn get(&self, spot: (usize, usize)) -> Glyph {
        self.glyphs[spot.0 * self.width + spot.1]
    }

    fn set(&mut self, spot: (usize, usize), glyph: Glyph) {
        let idx = spot.0 * self.width + spot.1;
        self.glyphs[idx] = glyph;
    }

    /// Frame spot of a maze cell.
    pub fn cell_spot(coord: Coord) -> (usize, usize) {
        (coord.0 as usize * 2 + 1, coord.1 as usize * 2 + 1)
    }

    /// Frame spot of the wall or passage on the `direction` side of a cell.
    pub fn passage_spot(coord: Coord, direction: Direction) -> (usize, usize) {
        let (row, col) = Frame::cell_spot(coord);
        match direction {
            Direction::Up => (row - 1, col),
            Direction::Down => (row + 1, col),
            Direction::Left => (row, col - 1),
            Direction::Right => (row, col + 1),
        }
    }

    /// Frame spot between two adjacent cells.
    fn between(a: Coord, b: Coord) -> (usize, usize) {
        let (a, b) = (Frame::cell_spot(a), Frame::cell_spot(b));
        ((a.0 + b.0) / 2, (a.1 + b.1) / 2)
    }

    /// One frame row, ready to print.
    fn row(&self, row: usize) -> String {
        let start = row * self.width;
        self.glyphs[start..start + self.width]
            .iter()
            .map(|g| g.to_string())
            .collect()
    }
}

/// Number of terminal rows used below the maze.
pub const NUM_STATUS_ROWS: u16 = 3;
const PROGRESS_BAR_WIDTH: usize = 30;

/// "Easy  Score: 3  Time: 117s / 180s"
pub fn status_line(round: &Round) -> String {
    format!(
        "{}  Score: {}  Time: {}s / {}s",
        round.profile().name,
        round.score(),
        round.time_remaining(),
        round.time_limit()
    )
}

/// Timer bar filling up as time runs out, e.g. `[######--------] 42%`.
pub fn progress_bar(elapsed_percent: u8, width: usize) -> String {
    let filled = (elapsed_percent.min(100) as usize * width).div_ceil(100);
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        elapsed_percent.min(100)
    )
}

/// Message shown over the maze once a session has ended.
pub fn overlay_text(state: GameState) -> Option<&'static str> {
    match state {
        GameState::Won => Some(" You Win! "),
        GameState::TimedOut => Some(" Time's Up! "),
        GameState::NotStarted | GameState::Running => None,
    }
}

fn help_line(state: GameState) -> StyledContent<&'static str> {
    match state {
        GameState::Won => "Congratulations! r: play again  1/2/3: difficulty  Esc: exit"
            .with(Color::Green)
            .attribute(Attribute::Bold),
        GameState::TimedOut => "Out of time! r: try again  1/2/3: difficulty  Esc: exit"
            .with(Color::Red)
            .attribute(Attribute::Bold),
        GameState::NotStarted | GameState::Running => {
            "←/→/↑/↓: move  r: restart  1/2/3: difficulty  Esc: exit".with(Color::Cyan)
        }
    }
}

/// Clip `text` to the terminal width.
fn fit(text: &str, term_width: u16) -> &str {
    text.unicode_truncate(term_width as usize).0
}

/// Check whether the whole frame plus the status rows fit in the terminal.
pub fn fits(frame: &Frame, term_size: (u16, u16)) -> bool {
    let (term_width, term_height) = term_size;
    term_width as usize >= frame.screen_width()
        && term_height as usize >= frame.height() + NUM_STATUS_ROWS as usize
}

/// Draw the whole session: maze, status line, timer bar and help or result line.
pub fn draw(stdout: &mut Stdout, session: &Session) -> std::io::Result<()> {
    let Some(round) = session.round() else {
        return Ok(());
    };
    let frame = Frame::from_round(round);
    let term_size = terminal::size()?;
    let term_width = term_size.0;

    queue!(
        stdout,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    if !fits(&frame, term_size) {
        let msg = format!(
            "Terminal size is too small ({}x{}) for the maze ({}x{}). Please resize the terminal, or press Esc to exit.",
            term_size.0,
            term_size.1,
            frame.screen_width(),
            frame.height() + NUM_STATUS_ROWS as usize
        );
        queue!(
            stdout,
            style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold))
        )?;
        return stdout.flush();
    }

    // The frame fits, so every row and column below is within u16
    let height = frame.height() as u16;
    for row in 0..height {
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            style::Print(frame.row(row as usize))
        )?;
    }

    if let Some(text) = overlay_text(session.state()) {
        let color = match session.state() {
            GameState::Won => Color::Green,
            _ => Color::Red,
        };
        let col = frame.screen_width().saturating_sub(text.len()) / 2;
        queue!(
            stdout,
            cursor::MoveTo(col as u16, height / 2),
            style::PrintStyledContent(
                text.with(Color::Black)
                    .on(color)
                    .attribute(Attribute::Bold)
            )
        )?;
    }

    let status = status_line(round);
    let bar = progress_bar(round.elapsed_percent(), PROGRESS_BAR_WIDTH);
    let bar_color = match round.elapsed_percent() {
        0..50 => Color::Green,
        50..75 => Color::Yellow,
        _ => Color::Red,
    };
    let help = help_line(session.state());

    let base = height;
    queue!(
        stdout,
        cursor::MoveTo(0, base),
        style::PrintStyledContent(fit(&status, term_width).with(Color::Yellow).attribute(Attribute::Bold)),
        cursor::MoveTo(0, base + 1),
        style::PrintStyledContent(fit(&bar, term_width).with(bar_color)),
        cursor::MoveTo(0, base + 2),
        style::PrintStyledContent(StyledContent::new(*help.style(), fit(help.content(), term_width))),
    )?;
    stdout.flush()
}
