use std::{fmt, str::FromStr};

use crate::error::MazeError;

/// Board dimensions and time budget of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub name: &'static str,
    pub rows: u16,
    pub cols: u16,
    pub time_limit_secs: u32,
}

impl Profile {
    /// A profile outside the standard difficulty set, e.g. for small test boards.
    pub const fn custom(rows: u16, cols: u16, time_limit_secs: u32) -> Self {
        Profile {
            name: "Custom",
            rows,
            cols,
            time_limit_secs,
        }
    }
}

/// The fixed set of difficulties a player can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn profile(self) -> Profile {
        match self {
            Difficulty::Easy => Profile {
                name: "Easy",
                rows: 10,
                cols: 10,
                time_limit_secs: 180,
            },
            Difficulty::Medium => Profile {
                name: "Medium",
                rows: 15,
                cols: 15,
                time_limit_secs: 120,
            },
            Difficulty::Hard => Profile {
                name: "Hard",
                rows: 20,
                cols: 20,
                time_limit_secs: 90,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.profile();
        write!(
            f,
            "{} ({}x{}, {}s)",
            p.name, p.rows, p.cols, p.time_limit_secs
        )
    }
}

impl FromStr for Difficulty {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.profile().name.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MazeError::UnknownDifficulty(s.to_string()))
    }
}
