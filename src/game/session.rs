use rand::rngs::StdRng;

use crate::{
    game::difficulty::{Difficulty, Profile},
    generators::{carve_maze, get_rng},
    maze::{Coord, Direction, Maze},
    solvers,
};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// No maze has been generated yet
    NotStarted,
    /// Moves and ticks are accepted
    Running,
    /// The agent reached the goal cell
    Won,
    /// The clock ran out first
    TimedOut,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Won | GameState::TimedOut)
    }
}

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The agent stepped to `to`; `score` is the new score.
    Moved { to: Coord, score: u32 },
    /// The step landed on the goal and ended the session.
    Won { to: Coord, score: u32 },
    /// A wall is in the way. Nothing changed.
    Blocked,
    /// The session isn't running. Nothing changed.
    NotRunning,
}

impl MoveOutcome {
    /// Whether the move changed the session, i.e. whether there is anything to redraw.
    pub fn is_accepted(self) -> bool {
        matches!(self, MoveOutcome::Moved { .. } | MoveOutcome::Won { .. })
    }
}

/// Result of a clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second elapsed, `remaining` seconds left.
    Ticked { remaining: u32 },
    /// The clock hit zero and ended the session.
    TimedOut,
    /// The session isn't running. Nothing changed.
    NotRunning,
}

/// Everything that belongs to one play-through. Built in one piece when a session
/// starts and thrown away as a whole when the next one starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    profile: Profile,
    maze: Maze,
    /// Where the agent currently is
    position: Coord,
    goal: Coord,
    /// Every cell the agent has stood on, in order, starting with the start cell
    trail: Vec<Coord>,
    score: u32,
    time_remaining: u32,
    /// Length of the shortest route from start to goal
    optimal_moves: usize,
}

impl Round {
    const START: Coord = (0, 0);

    fn new<R: rand::Rng>(profile: Profile, rng: &mut R) -> Self {
        let mut maze = Maze::new(profile.rows, profile.cols);
        carve_maze(&mut maze, rng);

        let goal = maze.last_cell();
        let optimal_moves = solvers::solve_bfs(&maze, Self::START, goal)
            .map(|route| route.len())
            .unwrap_or_default();

        Round {
            profile,
            maze,
            position: Self::START,
            goal,
            trail: vec![Self::START],
            score: 0,
            time_remaining: profile.time_limit_secs,
            optimal_moves,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn start(&self) -> Coord {
        Self::START
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }

    pub fn trail(&self) -> &[Coord] {
        &self.trail
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn time_limit(&self) -> u32 {
        self.profile.time_limit_secs
    }

    /// Share of the time budget already used, from 0 to 100.
    pub fn elapsed_percent(&self) -> u8 {
        let limit = self.time_limit();
        if limit == 0 {
            return 100;
        }
        let elapsed = limit.saturating_sub(self.time_remaining) as u64;
        (elapsed * 100 / limit as u64) as u8
    }

    pub fn optimal_moves(&self) -> usize {
        self.optimal_moves
    }
}

/// A single-player maze session.
///
/// The session is passive: a caller drives it with [`Session::move_agent`] on
/// input and [`Session::tick`] roughly once per second, and reads the current
/// [`Round`] back to draw it. Ticking is the caller's job, and
/// [`Session::is_running`] tells it whether more ticks mean anything.
pub struct Session {
    state: GameState,
    round: Option<Round>,
    rng: StdRng,
}

impl Session {
    /// Creates a session that hasn't started yet. With a `seed`, every maze the
    /// session generates is reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        Session {
            state: GameState::NotStarted,
            round: None,
            rng: get_rng(seed),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Whether moves and ticks are currently accepted.
    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    /// The current play-through, `None` before the first start.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Start a fresh session at the given difficulty.
    pub fn start(&mut self, difficulty: Difficulty) {
        self.start_with_profile(difficulty.profile());
    }

    /// Start a fresh session with an arbitrary board size and time limit.
    /// Discards the previous round, whatever state it was in.
    ///
    /// Panics if the profile has a zero dimension.
    pub fn start_with_profile(&mut self, profile: Profile) {
        let round = Round::new(profile, &mut self.rng);
        tracing::info!(
            "[session] Starting {} session: {}x{} maze, {}s, shortest route {} moves",
            profile.name,
            profile.rows,
            profile.cols,
            profile.time_limit_secs,
            round.optimal_moves
        );
        self.round = Some(round);
        self.state = GameState::Running;
    }

    /// Start again with the most recent profile and a newly generated maze.
    /// Returns `false`, without changing anything, if nothing was ever started.
    pub fn restart(&mut self) -> bool {
        match self.round.as_ref().map(|r| r.profile) {
            Some(profile) => {
                tracing::debug!("[session] Restarting from {:?}", self.state);
                self.start_with_profile(profile);
                true
            }
            None => {
                tracing::warn!("[session] Restart requested before any session was started");
                false
            }
        }
    }

    /// Try to step the agent one cell in `direction`.
    ///
    /// A wall in the way, or a session that isn't running, rejects the move and
    /// leaves everything untouched. Otherwise position, score, trail and the win
    /// check are all applied together.
    pub fn move_agent(&mut self, direction: Direction) -> MoveOutcome {
        if self.state != GameState::Running {
            return MoveOutcome::NotRunning;
        }
        let Some(round) = self.round.as_mut() else {
            return MoveOutcome::NotRunning;
        };

        let from = round.position;
        if round.maze.has_wall(from, direction) {
            tracing::trace!("[session] Blocked moving {} from {:?}", direction, from);
            return MoveOutcome::Blocked;
        }
        // Boundary walls are never carved, so an open side always has a cell behind it
        let Some(to) = round.maze.neighbor(from, direction) else {
            return MoveOutcome::Blocked;
        };

        round.position = to;
        round.score = round.score.saturating_add(1);
        round.trail.push(to);
        tracing::debug!("[session] Moved {} to {:?}, score {}", direction, to, round.score);

        if to == round.goal {
            self.state = GameState::Won;
            tracing::info!(
                "[session] Goal reached with score {} and {}s left",
                round.score,
                round.time_remaining
            );
            return MoveOutcome::Won {
                to,
                score: round.score,
            };
        }

        MoveOutcome::Moved {
            to,
            score: round.score,
        }
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != GameState::Running {
            return TickOutcome::NotRunning;
        }
        let Some(round) = self.round.as_mut() else {
            return TickOutcome::NotRunning;
        };

        // A round that is already at zero times out here instead of underflowing
        round.time_remaining = round.time_remaining.saturating_sub(1);
        if round.time_remaining == 0 {
            self.state = GameState::TimedOut;
            tracing::info!("[session] Time's up with score {}", round.score);
            return TickOutcome::TimedOut;
        }

        TickOutcome::Ticked {
            remaining: round.time_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(profile: Profile, seed: u64) -> Session {
        let mut session = Session::new(Some(seed));
        session.start_with_profile(profile);
        session
    }

    /// A direction that is walled off even though there is a cell on the other side.
    fn inner_wall(round: &Round) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&d| {
            round.maze().has_wall(round.position(), d)
                && round.maze().neighbor(round.position(), d).is_some()
        })
    }

    fn round_has_wall(session: &Session, direction: Direction) -> bool {
        let round = session.round().unwrap();
        round.maze().has_wall(round.position(), direction)
    }

    fn route_to_goal(session: &Session) -> Vec<Direction> {
        let round = session.round().unwrap();
        solvers::solve_bfs(round.maze(), round.position(), round.goal()).unwrap()
    }

    #[test]
    fn test_new_session_rejects_everything() {
        let mut session = Session::new(Some(1));
        assert_eq!(session.state(), GameState::NotStarted);
        assert!(session.round().is_none());
        assert_eq!(session.move_agent(Direction::Right), MoveOutcome::NotRunning);
        assert_eq!(session.tick(), TickOutcome::NotRunning);
        assert!(!session.restart());
        assert_eq!(session.state(), GameState::NotStarted);
    }

    #[test]
    fn test_start_resets_everything() {
        let mut session = Session::new(Some(5));
        session.start(Difficulty::Medium);
        assert_eq!(session.state(), GameState::Running);

        let round = session.round().unwrap();
        assert_eq!(round.maze().rows(), 15);
        assert_eq!(round.maze().cols(), 15);
        assert_eq!(round.position(), (0, 0));
        assert_eq!(round.goal(), (14, 14));
        assert_eq!(round.trail(), &[(0, 0)]);
        assert_eq!(round.score(), 0);
        assert_eq!(round.time_remaining(), 120);
        assert_eq!(round.time_limit(), 120);
        assert_eq!(round.elapsed_percent(), 0);
        assert!(solvers::is_perfect(round.maze()));
        assert!(round.optimal_moves() >= 28);
    }

    #[test]
    fn test_boundary_move_is_inert() {
        let mut session = running(Profile::custom(5, 5, 30), 2);
        let before = session.round().cloned();

        assert_eq!(session.move_agent(Direction::Up), MoveOutcome::Blocked);
        assert_eq!(session.move_agent(Direction::Left), MoveOutcome::Blocked);

        assert_eq!(session.round().cloned(), before);
        assert_eq!(session.state(), GameState::Running);
    }

    #[test]
    fn test_inner_wall_move_is_inert() {
        // Find a seed whose start cell has a wall with a cell behind it
        let (mut session, direction) = (0..100)
            .find_map(|seed| {
                let session = running(Profile::custom(6, 6, 30), seed);
                let direction = inner_wall(session.round().unwrap())?;
                Some((session, direction))
            })
            .expect("some seed leaves an inner wall at the start");

        let before = session.round().cloned();
        let outcome = session.move_agent(direction);
        assert_eq!(outcome, MoveOutcome::Blocked);
        assert!(!outcome.is_accepted());
        assert_eq!(session.round().cloned(), before);
    }

    #[test]
    fn test_score_stops_at_max() {
        let mut session = running(Profile::custom(8, 8, 60), 11);
        let (direction, next) = session
            .round()
            .unwrap()
            .maze()
            .open_neighbors((0, 0))
            .next()
            .unwrap();
        session.round.as_mut().unwrap().score = u32::MAX;

        assert_eq!(
            session.move_agent(direction),
            MoveOutcome::Moved {
                to: next,
                score: u32::MAX
            }
        );
        assert_eq!(session.round().unwrap().score(), u32::MAX);
    }

    #[test]
    fn test_score_counts_accepted_moves_including_revisits() {
        let mut session = running(Profile::custom(8, 8, 60), 11);
        let (direction, next) = session
            .round()
            .unwrap()
            .maze()
            .open_neighbors((0, 0))
            .next()
            .unwrap();

        let outcome = session.move_agent(direction);
        assert_eq!(outcome, MoveOutcome::Moved { to: next, score: 1 });
        assert!(outcome.is_accepted());

        // Step back onto the start cell: still scores, still recorded
        assert_eq!(
            session.move_agent(direction.opposite()),
            MoveOutcome::Moved {
                to: (0, 0),
                score: 2
            }
        );
        session.move_agent(direction);

        let round = session.round().unwrap();
        assert_eq!(round.score(), 3);
        assert_eq!(round.trail(), &[(0, 0), next, (0, 0), next]);
        assert_eq!(round.position(), next);

        // Ticks and blocked moves leave the score alone
        session.tick();
        let walled = Direction::ALL
            .into_iter()
            .find(|&d| round_has_wall(&session, d))
            .expect("cells next to the start touch the boundary");
        assert_eq!(session.move_agent(walled), MoveOutcome::Blocked);
        assert_eq!(session.round().unwrap().score(), 3);
    }

    #[test]
    fn test_win_on_two_by_two() {
        for seed in 0..10 {
            let mut session = running(Profile::custom(2, 2, 10), seed);
            let route = route_to_goal(&session);
            assert_eq!(route.len(), 2, "2x2 perfect mazes always give a two-step route");

            assert!(matches!(
                session.move_agent(route[0]),
                MoveOutcome::Moved { score: 1, .. }
            ));
            assert_eq!(
                session.move_agent(route[1]),
                MoveOutcome::Won {
                    to: (1, 1),
                    score: 2
                }
            );
            assert_eq!(session.state(), GameState::Won);
            assert!(session.state().is_terminal());

            // Frozen from now on
            let frozen = session.round().cloned();
            for direction in Direction::ALL {
                assert_eq!(session.move_agent(direction), MoveOutcome::NotRunning);
            }
            assert_eq!(session.tick(), TickOutcome::NotRunning);
            assert_eq!(session.round().cloned(), frozen);
            assert_eq!(session.state(), GameState::Won);
        }
    }

    #[test]
    fn test_win_on_generated_difficulty() {
        let mut session = Session::new(Some(99));
        session.start(Difficulty::Hard);
        let route = route_to_goal(&session);
        assert_eq!(route.len(), session.round().unwrap().optimal_moves());

        let last = route.len() - 1;
        for (i, step) in route.into_iter().enumerate() {
            let outcome = session.move_agent(step);
            if i < last {
                assert!(matches!(outcome, MoveOutcome::Moved { .. }));
            } else {
                assert!(matches!(outcome, MoveOutcome::Won { to: (19, 19), .. }));
            }
        }
        assert_eq!(session.state(), GameState::Won);
    }

    #[test]
    fn test_timeout_after_exact_limit() {
        let mut session = running(Profile::custom(4, 4, 5), 3);
        for remaining in (1..5).rev() {
            assert_eq!(session.tick(), TickOutcome::Ticked { remaining });
            assert_eq!(session.state(), GameState::Running);
        }
        assert_eq!(session.round().unwrap().elapsed_percent(), 80);
        assert_eq!(session.tick(), TickOutcome::TimedOut);
        assert_eq!(session.state(), GameState::TimedOut);

        let round = session.round().unwrap();
        assert_eq!(round.time_remaining(), 0);
        assert_eq!(round.elapsed_percent(), 100);

        // No underflow, no further effect
        assert_eq!(session.tick(), TickOutcome::NotRunning);
        assert_eq!(session.round().unwrap().time_remaining(), 0);
        assert_eq!(
            session.move_agent(Direction::Right),
            MoveOutcome::NotRunning
        );
    }

    #[test]
    fn test_zero_time_limit_times_out_on_first_tick() {
        let mut session = running(Profile::custom(3, 3, 0), 8);
        assert_eq!(session.state(), GameState::Running);
        assert_eq!(session.tick(), TickOutcome::TimedOut);
        assert_eq!(session.round().unwrap().time_remaining(), 0);
        assert_eq!(session.state(), GameState::TimedOut);
    }

    #[test]
    fn test_single_cell_only_ends_by_timeout() {
        let mut session = running(Profile::custom(1, 1, 2), 0);
        for direction in Direction::ALL {
            assert_eq!(session.move_agent(direction), MoveOutcome::Blocked);
        }
        assert_eq!(session.state(), GameState::Running);
        session.tick();
        assert_eq!(session.tick(), TickOutcome::TimedOut);
    }

    #[test]
    fn test_restart_after_win_and_timeout() {
        let mut session = running(Profile::custom(2, 2, 3), 4);
        for step in route_to_goal(&session) {
            session.move_agent(step);
        }
        assert_eq!(session.state(), GameState::Won);

        assert!(session.restart());
        assert_eq!(session.state(), GameState::Running);
        let round = session.round().unwrap();
        assert!(solvers::is_perfect(round.maze()));
        assert_eq!(round.score(), 0);
        assert_eq!(round.trail(), &[(0, 0)]);
        assert_eq!(round.position(), (0, 0));
        assert_eq!(round.time_remaining(), 3);

        while session.tick() != TickOutcome::TimedOut {}
        assert_eq!(session.state(), GameState::TimedOut);

        assert!(session.restart());
        let round = session.round().unwrap();
        assert_eq!(session.state(), GameState::Running);
        assert_eq!(round.profile(), Profile::custom(2, 2, 3));
        assert_eq!(round.time_remaining(), 3);
        assert!(solvers::is_perfect(round.maze()));
    }

    #[test]
    fn test_restart_mid_game_keeps_difficulty() {
        let mut session = Session::new(Some(21));
        session.start(Difficulty::Easy);
        session.tick();
        session.tick();

        assert!(session.restart());
        let round = session.round().unwrap();
        assert_eq!(round.profile(), Difficulty::Easy.profile());
        assert_eq!(round.time_remaining(), 180);
        assert_eq!(round.score(), 0);
    }

    #[test]
    fn test_new_difficulty_replaces_round() {
        let mut session = Session::new(Some(13));
        session.start(Difficulty::Easy);
        session.start(Difficulty::Hard);
        let round = session.round().unwrap();
        assert_eq!(round.maze().rows(), 20);
        assert_eq!(round.time_limit(), 90);
        assert_eq!(round.goal(), (19, 19));
    }

    #[test]
    fn test_seeded_sessions_repeat() {
        let mut a = Session::new(Some(77));
        let mut b = Session::new(Some(77));
        a.start(Difficulty::Easy);
        b.start(Difficulty::Easy);
        assert_eq!(a.round(), b.round());

        // Restarts draw new mazes from the same stream
        a.restart();
        b.restart();
        assert_eq!(a.round(), b.round());
    }
}
