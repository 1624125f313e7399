mod app;
mod clock;
mod config;
mod event;
mod games;
mod input;
mod leaderboard;
mod scores;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::time::Instant;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::{Settings, Source};
use event::{Event, EventHandler};
use leaderboard::{FileLeaderboard, LeaderboardClient};
use scores::{FileStore, HighScores, KeyValueStore};

/// Send log records to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        let _ = fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn run<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
    events: &EventHandler,
) -> io::Result<()> {
    terminal.draw(|frame| ui::render(frame, app))?;
    let mut last_frame = Instant::now();

    loop {
        match events.next()? {
            Event::Frame => {
                let now = Instant::now();
                app.on_frame(now - last_frame);
                last_frame = now;
                terminal.draw(|frame| ui::render(frame, app))?;
            }
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> io::Result<()> {
    let (settings, source) = Settings::load();
    init_logging(&settings.log_path());
    match &source {
        Source::File(path) => log::info!("settings loaded from {}", path.display()),
        Source::Missing(path) => log::info!("no settings at {}, using defaults", path.display()),
        Source::Invalid(e) => log::warn!("{e}; using defaults"),
    }

    let mut high_scores = HighScores::new(FileStore::open(&settings.data_dir()));
    log::info!("scores stored in {}", high_scores.store().path().display());
    match high_scores.migrate_legacy() {
        Ok(0) => {}
        Ok(n) => log::info!("migrated {n} legacy snake scores"),
        Err(e) => log::warn!("legacy score migration failed: {e}"),
    }
    let leaderboard = match &settings.leaderboard_path {
        Some(path) => {
            let board = FileLeaderboard::new(path);
            log::info!("leaderboard at {}", board.path().display());
            LeaderboardClient::spawn(board)
        }
        None => LeaderboardClient::disabled(),
    };
    let mut app = App::new(&settings, high_scores, leaderboard);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let events = EventHandler::new(settings.frame_interval());
    let result = run(&mut terminal, &mut app, &events);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("terminal loop failed: {e}");
    }
    log::info!("bye");
    result
}
