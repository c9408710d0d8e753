pub mod difficulty;
mod session;

pub use difficulty::{Difficulty, Profile};
pub use session::{GameState, MoveOutcome, Round, Session, TickOutcome};
