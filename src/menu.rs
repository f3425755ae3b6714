use crossterm::event::KeyCode;
use itertools::Itertools;

use crate::audio::Cue;
use crate::highscore::{ScoreEntry, TOP_LIMIT};
use crate::stage::{Rgba, Stage};

pub const GOLD: Rgba = [255, 255, 0, 255];
pub const SILVER: Rgba = [192, 192, 192, 255];
pub const BRONZE: Rgba = [205, 127, 50, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Main,
    StageSelect,
    Highscores,
}

/// What the owner of a menu should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Stay,
    Open(MenuKind),
    StartGame(Stage),
    /// The highscore browser switched stage and needs that stage's ranking.
    LoadScores(Stage),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuResponse {
    pub outcome: MenuOutcome,
    pub cue: Option<Cue>,
}

impl MenuResponse {
    fn stay() -> Self {
        Self {
            outcome: MenuOutcome::Stay,
            cue: None,
        }
    }

    fn with_cue(outcome: MenuOutcome, cue: Cue) -> Self {
        Self {
            outcome,
            cue: Some(cue),
        }
    }
}

/// A vertical list of entries with one selected row.
///
/// Selection lives only in `selected_index`; the renderer derives any
/// highlighting from it.
pub trait Menu {
    fn title(&self) -> &str;
    fn labels(&self) -> Vec<String>;
    fn selected_index(&self) -> usize;
    fn handle_key(&mut self, key: KeyCode) -> MenuResponse;
}

fn step(index: usize, len: usize, delta: isize) -> usize {
    (index as isize + delta).rem_euclid(len as isize) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum MainEntry {
    Start,
    Highscore,
    Exit,
}

impl MainEntry {
    pub const ALL: [MainEntry; 3] = [MainEntry::Start, MainEntry::Highscore, MainEntry::Exit];
}

#[derive(Debug, Default)]
pub struct MainMenu {
    selected: usize,
}

impl MainMenu {
    pub fn selected(&self) -> MainEntry {
        MainEntry::ALL[self.selected]
    }
}

impl Menu for MainMenu {
    fn title(&self) -> &str {
        "Astrotype"
    }

    fn labels(&self) -> Vec<String> {
        MainEntry::ALL.iter().map(ToString::to_string).collect()
    }

    fn selected_index(&self) -> usize {
        self.selected
    }

    fn handle_key(&mut self, key: KeyCode) -> MenuResponse {
        let len = MainEntry::ALL.len();
        match key {
            KeyCode::Up => {
                self.selected = step(self.selected, len, -1);
                MenuResponse::with_cue(MenuOutcome::Stay, Cue::MenuClick)
            }
            KeyCode::Down => {
                self.selected = step(self.selected, len, 1);
                MenuResponse::with_cue(MenuOutcome::Stay, Cue::MenuClick)
            }
            KeyCode::Enter => match self.selected() {
                MainEntry::Start => MenuResponse::with_cue(
                    MenuOutcome::Open(MenuKind::StageSelect),
                    Cue::MenuSelect,
                ),
                MainEntry::Highscore => MenuResponse::with_cue(
                    MenuOutcome::Open(MenuKind::Highscores),
                    Cue::MenuSelect,
                ),
                MainEntry::Exit => MenuResponse {
                    outcome: MenuOutcome::Quit,
                    cue: None,
                },
            },
            _ => MenuResponse::stay(),
        }
    }
}

/// Rows: stage picker, "Start Game", "Back".
#[derive(Debug, Default)]
pub struct StageSelectMenu {
    selected: usize,
    stage: Stage,
}

impl StageSelectMenu {
    const ROWS: usize = 3;
    const PICKER: usize = 0;
    const START: usize = 1;
    const BACK: usize = 2;

    pub fn new(stage: Stage) -> Self {
        Self { selected: 0, stage }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

impl Menu for StageSelectMenu {
    fn title(&self) -> &str {
        "Select Stage"
    }

    fn labels(&self) -> Vec<String> {
        vec![
            format!("< {}: {} >", self.stage, self.stage.title()),
            "Start Game".to_string(),
            "Back".to_string(),
        ]
    }

    fn selected_index(&self) -> usize {
        self.selected
    }

    fn handle_key(&mut self, key: KeyCode) -> MenuResponse {
        match key {
            KeyCode::Up | KeyCode::Down => {
                let delta = if key == KeyCode::Up { -1 } else { 1 };
                self.selected = step(self.selected, Self::ROWS, delta);
                MenuResponse::with_cue(MenuOutcome::Stay, Cue::MenuClick)
            }
            KeyCode::Left | KeyCode::Right if self.selected == Self::PICKER => {
                let delta = if key == KeyCode::Left { -1 } else { 1 };
                self.stage = self.stage.cycle(delta);
                MenuResponse::with_cue(MenuOutcome::Stay, Cue::StageSelect)
            }
            KeyCode::Enter if self.selected == Self::START => MenuResponse {
                outcome: MenuOutcome::StartGame(self.stage),
                cue: None,
            },
            KeyCode::Enter if self.selected == Self::BACK => {
                MenuResponse::with_cue(MenuOutcome::Open(MenuKind::Main), Cue::MenuSelect)
            }
            _ => MenuResponse::stay(),
        }
    }
}

/// Rows: stage picker, "Back". The ranking below is display only.
#[derive(Debug, Default)]
pub struct HighscoreMenu {
    selected: usize,
    stage: Stage,
    scores: Vec<ScoreEntry>,
}

impl HighscoreMenu {
    const PICKER: usize = 0;
    const BACK: usize = 1;

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn set_scores(&mut self, scores: Vec<ScoreEntry>) {
        self.scores = scores;
    }

    /// Exactly `TOP_LIMIT` ranking lines; unused ranks read `N. ---`.
    pub fn ranking(&self) -> Vec<String> {
        self.scores
            .iter()
            .take(TOP_LIMIT)
            .map(|e| format!("{} - {}", e.player_name, e.score))
            .pad_using(TOP_LIMIT, |_| "---".to_string())
            .enumerate()
            .map(|(i, text)| format!("{}. {}", i + 1, text))
            .collect()
    }

    /// Medal colour of the zero-based `rank`, if any.
    pub fn rank_color(rank: usize) -> Option<Rgba> {
        match rank {
            0 => Some(GOLD),
            1 => Some(SILVER),
            2 => Some(BRONZE),
            _ => None,
        }
    }
}

impl Menu for HighscoreMenu {
    fn title(&self) -> &str {
        "Highscores"
    }

    fn labels(&self) -> Vec<String> {
        vec![
            format!("< Stage: {} >", self.stage.number()),
            "Back".to_string(),
        ]
    }

    fn selected_index(&self) -> usize {
        self.selected
    }

    fn handle_key(&mut self, key: KeyCode) -> MenuResponse {
        match key {
            KeyCode::Up | KeyCode::Down => {
                self.selected = if self.selected == Self::PICKER {
                    Self::BACK
                } else {
                    Self::PICKER
                };
                MenuResponse::with_cue(MenuOutcome::Stay, Cue::MenuClick)
            }
            KeyCode::Left | KeyCode::Right if self.selected == Self::PICKER => {
                let delta = if key == KeyCode::Left { -1 } else { 1 };
                self.stage = self.stage.cycle(delta);
                self.scores.clear();
                MenuResponse::with_cue(MenuOutcome::LoadScores(self.stage), Cue::StageSelect)
            }
            KeyCode::Enter if self.selected == Self::BACK => {
                MenuResponse::with_cue(MenuOutcome::Open(MenuKind::Main), Cue::MenuSelect)
            }
            _ => MenuResponse::stay(),
        }
    }
}
