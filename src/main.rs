use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
};

use mousewise::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    level::{self, LevelId},
    registry::FileRegistryStore,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    ui::ui,
};

/// mouse skills practice for people new to computers
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Six short, timed levels that teach copy & paste and drag & drop with the mouse, each preceded by a step-by-step tutorial."
)]
pub struct Cli {
    /// jump straight into a level (1-6) instead of the menu
    #[clap(short = 'l', long, value_parser = parse_level)]
    level: Option<LevelId>,

    /// forget which levels have been completed
    #[clap(long)]
    reset_progress: bool,

    /// config file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// where completed levels are stored
    #[clap(long)]
    registry: Option<PathBuf>,

    /// log file (level set with RUST_LOG, default info)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_level(raw: &str) -> Result<LevelId, String> {
    let id: i64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if level::is_valid_id(id) {
        Ok(id as LevelId)
    } else {
        Err(format!(
            "levels go from {} to {}",
            level::FIRST_LEVEL,
            level::LAST_LEVEL
        ))
    }
}

fn init_logging(path: PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_file.clone().unwrap_or_else(AppDirs::log_path))?;

    let config = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    }
    .load();
    let store = match &cli.registry {
        Some(path) => FileRegistryStore::with_path(path),
        None => FileRegistryStore::new(),
    };
    info!("Progress is kept in {}", store.path().display());

    let mut app = App::new(Box::new(store), config.video_table()).with_open_videos(config.open_videos);
    if cli.reset_progress {
        info!("Resetting progress");
        app.reset_progress();
    }
    if let Some(id) = cli.level {
        app.select_level(id);
    }

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("preparing the terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("Exiting after error: {e:#}");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui(app, f))?;
    while !app.should_quit {
        let event = runner.step();
        let redraw = match &event {
            // Only a running countdown changes the screen between inputs
            AppEvent::Tick => app.engine().is_some_and(|e| e.countdown().is_active()),
            _ => true,
        };
        app.handle_event(event);
        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }
    info!("Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["mousewise"]);
        assert_eq!(cli.level, None);
        assert!(!cli.reset_progress);
        assert_eq!(cli.config, None);
        assert_eq!(cli.registry, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn cli_level_in_range() {
        let cli = Cli::parse_from(["mousewise", "-l", "4"]);
        assert_eq!(cli.level, Some(4));

        let cli = Cli::parse_from(["mousewise", "--level", "6"]);
        assert_eq!(cli.level, Some(6));
    }

    #[test]
    fn cli_level_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["mousewise", "--level", "0"]).is_err());
        assert!(Cli::try_parse_from(["mousewise", "--level", "7"]).is_err());
        assert!(Cli::try_parse_from(["mousewise", "--level", "two"]).is_err());
    }

    #[test]
    fn cli_paths_and_reset() {
        let cli = Cli::parse_from([
            "mousewise",
            "--reset-progress",
            "--config",
            "/tmp/c.json",
            "--registry",
            "/tmp/p.json",
            "--log-file",
            "/tmp/m.log",
        ]);
        assert!(cli.reset_progress);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        assert_eq!(cli.registry, Some(PathBuf::from("/tmp/p.json")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/m.log")));
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
