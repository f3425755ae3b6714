use crossterm::event::{KeyCode, KeyEvent};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{Cue, SoundCue};
use crate::highscore::{HighscoreStore, TOP_LIMIT};
use crate::input::{route, Bindings, Focus, Route, SessionAction};
use crate::menu::{HighscoreMenu, MainMenu, Menu, MenuKind, MenuOutcome, StageSelectMenu};
use crate::session::{Playfield, Session};
use crate::stage::Stage;
use crate::words::WordLists;

/// Top-level mode: browsing a menu or inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu(MenuKind),
    InGame,
}

/// Startup choices for an [`App`].
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub stage: Stage,
    pub player_name: String,
    pub playfield: Playfield,
    pub bindings: Bindings,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            stage: Stage::default(),
            player_name: "player".to_string(),
            playfield: Playfield::default(),
            bindings: Bindings::default(),
            seed: None,
        }
    }
}

pub struct App {
    mode: Mode,
    session: Option<Session>,
    main_menu: MainMenu,
    stage_select: StageSelectMenu,
    highscores: HighscoreMenu,
    store: Box<dyn HighscoreStore>,
    sounds: Box<dyn SoundCue>,
    words: WordLists,
    settings: AppSettings,
    rng: StdRng,
    should_quit: bool,
}

impl App {
    pub fn new(
        words: WordLists,
        store: Box<dyn HighscoreStore>,
        sounds: Box<dyn SoundCue>,
        settings: AppSettings,
    ) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut app = Self {
            mode: Mode::Menu(MenuKind::Main),
            session: None,
            main_menu: MainMenu::default(),
            stage_select: StageSelectMenu::new(settings.stage),
            highscores: HighscoreMenu::default(),
            store,
            sounds,
            words,
            settings,
            rng,
            should_quit: false,
        };
        app.sounds.play(Cue::MenuMusic);
        app
    }

    pub fn focus(&self) -> Focus {
        match (&self.mode, &self.session) {
            (Mode::InGame, Some(session)) => Focus::Session(session.phase()),
            _ => Focus::Menu,
        }
    }

    /// Routes one key press to exactly one handler.
    pub fn on_key(&mut self, key: &KeyEvent) {
        match route(self.focus(), key, &self.settings.bindings) {
            Route::Quit => self.should_quit = true,
            Route::Menu(code) => self.on_menu_key(code),
            Route::Session(action) => self.on_session_action(action),
            Route::Keystroke(code) => {
                if let Some(session) = self.session.as_mut() {
                    session.handle_keystroke(code);
                }
            }
            Route::Ignored => {}
        }
    }

    /// Advances the running session by `dt` seconds.
    pub fn on_tick(&mut self, dt: f64) {
        if self.mode != Mode::InGame {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.update(dt);
        }
    }

    fn on_menu_key(&mut self, code: KeyCode) {
        let Mode::Menu(kind) = self.mode else {
            return;
        };
        let response = match kind {
            MenuKind::Main => self.main_menu.handle_key(code),
            MenuKind::StageSelect => self.stage_select.handle_key(code),
            MenuKind::Highscores => self.highscores.handle_key(code),
        };
        if let Some(cue) = response.cue {
            self.sounds.play(cue);
        }

        match response.outcome {
            MenuOutcome::Stay => {}
            MenuOutcome::Open(MenuKind::Highscores) => {
                self.reload_scores(self.highscores.stage());
                self.mode = Mode::Menu(MenuKind::Highscores);
            }
            MenuOutcome::Open(next) => self.mode = Mode::Menu(next),
            MenuOutcome::StartGame(stage) => self.start_session(stage),
            MenuOutcome::LoadScores(stage) => self.reload_scores(stage),
            MenuOutcome::Quit => self.should_quit = true,
        }
    }

    fn on_session_action(&mut self, action: SessionAction) {
        match action {
            SessionAction::Pause => {
                if let Some(session) = self.session.as_mut() {
                    session.pause();
                }
            }
            SessionAction::Resume => {
                if let Some(session) = self.session.as_mut() {
                    session.resume();
                }
            }
            SessionAction::Retry => {
                self.save_score();
                if let Some(session) = self.session.as_mut() {
                    session.retry();
                }
            }
            SessionAction::ReturnToMenu => self.return_to_menu(),
        }
    }

    /// The session is the only place a first word gets requested.
    fn start_session(&mut self, stage: Stage) {
        self.settings.stage = stage;
        let rng = StdRng::seed_from_u64(self.rng.gen());
        self.session = Some(Session::start(
            stage,
            self.settings.playfield,
            self.words.clone(),
            rng,
        ));
        self.mode = Mode::InGame;
        self.sounds.play(Cue::StageMusic(stage));
    }

    fn return_to_menu(&mut self) {
        self.save_score();
        self.session = None;
        self.mode = Mode::Menu(MenuKind::Main);
        self.sounds.play(Cue::MenuMusic);
        info!("returned to main menu");
    }

    fn save_score(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let (stage, score) = (session.stage(), session.score());
        match self.store.record(stage, &self.settings.player_name, score) {
            Ok(()) => info!(
                "recorded {score} for {} on {stage}",
                self.settings.player_name
            ),
            Err(e) => warn!("could not record highscore: {e}"),
        }
    }

    fn reload_scores(&mut self, stage: Stage) {
        let scores = self.store.top_scores(stage, TOP_LIMIT).unwrap_or_else(|e| {
            warn!("could not load highscores for {stage}: {e}");
            Vec::new()
        });
        self.highscores.set_scores(scores);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The menu currently on screen, if any.
    pub fn active_menu(&self) -> Option<&dyn Menu> {
        match self.mode {
            Mode::Menu(MenuKind::Main) => Some(&self.main_menu),
            Mode::Menu(MenuKind::StageSelect) => Some(&self.stage_select),
            Mode::Menu(MenuKind::Highscores) => Some(&self.highscores),
            Mode::InGame => None,
        }
    }

    pub fn highscore_menu(&self) -> &HighscoreMenu {
        &self.highscores
    }

    pub fn store(&self) -> &dyn HighscoreStore {
        self.store.as_ref()
    }

    /// Last stage chosen in the stage select menu.
    pub fn stage(&self) -> Stage {
        self.settings.stage
    }

    pub fn player_name(&self) -> &str {
        &self.settings.player_name
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
