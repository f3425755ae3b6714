use astrotype::{
    app::{App, AppSettings},
    app_dirs::AppDirs,
    audio::{SilentCues, SoundCue},
    config::{Config, ConfigStore, FileConfigStore},
    highscore::SqliteHighscores,
    input::Bindings,
    runtime::{FrameClock, FrameLoop, GameEvent, TerminalEvents},
    session::Playfield,
    stage::Stage,
    words::WordLists,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

/// Longest frame step fed to the game after a stall.
const MAX_FRAME_STEP: Duration = Duration::from_millis(250);

/// type the words before they reach the line
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing game: words drift toward a pulsing limit line and every letter you type in time turns into stars."
)]
pub struct Cli {
    /// stage preselected in the stage menu (1-3)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u8).range(1..=3))]
    stage: Option<u8>,

    /// name recorded with your highscores
    #[clap(short = 'p', long)]
    player: Option<String>,

    /// highscore database file
    #[clap(long)]
    db: Option<PathBuf>,

    /// milliseconds between frames
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// disable sound
    #[clap(long)]
    mute: bool,

    /// directory holding the audio/ folder with the sound files
    #[cfg(feature = "audio")]
    #[clap(long)]
    assets: Option<PathBuf>,
}

impl Cli {
    /// Command line flags override the stored config.
    fn merge(&self, mut config: Config) -> Config {
        if let Some(stage) = self.stage.and_then(Stage::from_number) {
            config.stage = stage;
        }
        if let Some(player) = &self.player {
            config.player_name = Some(player.clone());
        }
        if let Some(ms) = self.tick_rate_ms {
            config.tick_rate_ms = ms;
        }
        if self.mute {
            config.sound = false;
        }
        config
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    // stderr would draw over the alternate screen
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

#[cfg(feature = "audio")]
fn sound_cues(cli: &Cli, config: &Config) -> Result<Box<dyn SoundCue>, Box<dyn Error>> {
    use astrotype::{assets::AssetCache, audio::RodioCues};

    match (&cli.assets, config.sound) {
        (Some(dir), true) => Ok(Box::new(RodioCues::new(AssetCache::new(dir))?)),
        _ => Ok(Box::new(SilentCues)),
    }
}

#[cfg(not(feature = "audio"))]
fn sound_cues(_cli: &Cli, _config: &Config) -> Result<Box<dyn SoundCue>, Box<dyn Error>> {
    Ok(Box::new(SilentCues))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let config_store = FileConfigStore::new();
    let config = cli.merge(config_store.load());

    let db_path = cli
        .db
        .clone()
        .or_else(AppDirs::db_path)
        .unwrap_or_else(|| PathBuf::from("astrotype_highscores.db"));
    let store = SqliteHighscores::open(&db_path)?;
    let words = WordLists::embedded()?;
    let sounds = sound_cues(&cli, &config)?;

    let settings = AppSettings {
        stage: config.stage,
        player_name: config
            .player_name
            .clone()
            .unwrap_or_else(AppDirs::login_name),
        playfield: Playfield::default().with_miss_threshold(config.miss_threshold),
        bindings: Bindings::default(),
        seed: None,
    };
    info!(
        "starting on {} as {} with highscores in {}",
        settings.stage,
        settings.player_name,
        db_path.display()
    );
    let mut app = App::new(words, Box::new(store), sounds, settings);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, config.tick_rate_ms);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    let config = Config {
        stage: app.stage(),
        ..config
    };
    if let Err(e) = config_store.save(&config) {
        log::warn!("could not save config: {e}");
    }

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let mut frames = FrameLoop::new(
        TerminalEvents::spawn(),
        Duration::from_millis(tick_rate_ms),
    );
    let mut clock = FrameClock::new(MAX_FRAME_STEP);

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit() {
        match frames.next_event() {
            // keys apply before the frame they arrived in advances
            GameEvent::Key(key) => app.on_key(&key),
            GameEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            GameEvent::Tick => {
                app.on_tick(clock.tick());
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
