use mazerun::{
    MazeError,
    app::{App, args::{Args, USAGE}},
};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "mazerun.log";

fn main() -> Result<(), MazeError> {
    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    // Log to a file so nothing gets written over the game screen
    let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), LOG_FILE_NAME);
    let (log_writer, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_writer)
        .with_ansi(false)
        .init();

    tracing::info!(
        "[main] Starting with difficulty {:?} and seed {:?}",
        args.difficulty,
        args.seed
    );

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::default().run(&mut stdout, args.difficulty, args.seed);
    App::restore_terminal(&mut stdout)?;

    if let Err(e) = &result {
        tracing::error!("[main] Exiting with error: {}", e);
    }
    result.map_err(MazeError::from)
}
