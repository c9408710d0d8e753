use crate::{error::MazeError, game::Difficulty};

pub const USAGE: &str = "\
Usage: mazerun [DIFFICULTY] [--seed N]

Race through a randomly carved maze from the top-left corner to the
bottom-right one before the clock runs out.

Arguments:
  DIFFICULTY   easy (10x10, 180s), medium (15x15, 120s) or hard (20x20, 90s).
               Without it, a menu asks.

Options:
  --seed N     Seed the maze generator so every maze of the run is reproducible
  -h, --help   Print this help

Logs go to mazerun.log in the system temp directory; set RUST_LOG to change the level.";

/// Command line options.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub difficulty: Option<Difficulty>,
    pub seed: Option<u64>,
    pub help: bool,
}

impl Args {
    /// Parse the arguments that follow the executable name.
    pub fn parse<I>(args: I) -> Result<Args, MazeError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--seed" => {
                    let value = args
                        .next()
                        .ok_or_else(|| MazeError::InvalidArgument("--seed needs a value".into()))?;
                    let seed = value.parse::<u64>().map_err(|_| {
                        MazeError::InvalidArgument(format!("`{}` is not a valid seed", value))
                    })?;
                    parsed.seed = Some(seed);
                }
                flag if flag.starts_with('-') => {
                    return Err(MazeError::InvalidArgument(format!(
                        "unknown option `{}`",
                        flag
                    )));
                }
                name => {
                    if parsed.difficulty.is_some() {
                        return Err(MazeError::InvalidArgument(format!(
                            "unexpected extra argument `{}`",
                            name
                        )));
                    }
                    parsed.difficulty = Some(name.parse()?);
                }
            }
        }
        Ok(parsed)
    }
}
