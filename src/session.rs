use crossterm::event::KeyCode;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

use crate::dust::{Dust, DustMote};
use crate::input::normalize_key;
use crate::particles::{Burst, ParticleBounds};
use crate::stage::{Rgba, Stage};
use crate::words::{WordLists, WordSource};

pub const MAX_HEALTH: usize = 3;
/// Seconds the leading glyph shakes after a wrong key.
pub const SHAKE_DURATION: f64 = 0.3;
pub const TOKEN_COLOR: Rgba = [255, 255, 0, 255];
const LIMIT_LINE_RGB: [u8; 3] = [238, 75, 43];
const PULSE_RATE: f64 = 5.0;
const SHAKE_FREQUENCY: f64 = 50.0;
const SHAKE_DEGREES: f64 = 20.0;

/// Logical geometry of the play area. Coordinates are y-up, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
    pub limit_line_x: f64,
    /// A word is missed once its leading glyph is closer than this to the limit line.
    pub miss_threshold: f64,
    pub token_spacing: f64,
}

impl Playfield {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            limit_line_x: width / 5.0,
            miss_threshold: 12.0,
            token_spacing: 40.0,
        }
    }

    pub fn with_miss_threshold(mut self, threshold: f64) -> Self {
        self.miss_threshold = threshold;
        self
    }

    pub fn particle_bounds(&self) -> ParticleBounds {
        ParticleBounds::for_width(self.width)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Phase {
    Playing,
    Paused,
    #[strum(to_string = "Game Over")]
    GameOver,
}

/// One untyped glyph of the current word as drawn on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterToken {
    pub glyph: char,
    pub x: f64,
    pub y: f64,
    /// Degrees, only non-zero on the leading glyph while it shakes.
    pub rotation: f64,
    pub color: Rgba,
}

/// Remaining lives. The session is over exactly when this is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPool {
    units: usize,
}

impl HealthPool {
    pub fn full() -> Self {
        Self { units: MAX_HEALTH }
    }

    /// Removes one unit; returns false if there was nothing left to remove.
    pub fn pop(&mut self) -> bool {
        if self.units == 0 {
            return false;
        }
        self.units -= 1;
        true
    }

    pub fn len(&self) -> usize {
        self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units == 0
    }
}

/// What a keystroke did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// Not a letter, or the session is not accepting keys.
    Ignored,
    Hit,
    /// The last glyph of a word was hit; a new word is on screen.
    WordCompleted,
    Mismatch,
}

/// Read-only view of everything the draw step needs for one frame.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub stage: Stage,
    pub tokens: &'a [CharacterToken],
    pub bursts: &'a [Burst],
    pub dust: &'a [DustMote],
    pub limit_line_x: f64,
    pub limit_line_color: Rgba,
    pub health: usize,
    pub score: u32,
}

/// Authoritative state of one play-through.
#[derive(Debug)]
pub struct Session {
    stage: Stage,
    playfield: Playfield,
    words: WordSource,
    tokens: Vec<CharacterToken>,
    bursts: Vec<Burst>,
    dust: Dust,
    health: HealthPool,
    score: u32,
    phase: Phase,
    shake_timer: f64,
    pulsate_time: f64,
    rng: StdRng,
}

impl Session {
    /// Starts a new play-through of `stage`. The session requests its own first word.
    pub fn start(stage: Stage, playfield: Playfield, lists: WordLists, rng: StdRng) -> Self {
        let mut session = Self {
            stage,
            playfield,
            words: WordSource::new(lists),
            tokens: Vec::new(),
            bursts: Vec::new(),
            dust: Dust::default(),
            health: HealthPool::full(),
            score: 0,
            phase: Phase::Playing,
            shake_timer: 0.0,
            pulsate_time: 0.0,
            rng,
        };
        session.reset();
        session
    }

    /// Puts the session back to a fresh start of the same stage.
    pub fn reset(&mut self) {
        self.score = 0;
        self.health = HealthPool::full();
        self.phase = Phase::Playing;
        self.shake_timer = 0.0;
        self.pulsate_time = 0.0;
        self.bursts.clear();
        self.dust = Dust::initialize(
            self.stage,
            self.playfield.width,
            self.playfield.height,
            &mut self.rng,
        );
        self.next_word();
        info!("session started on {}", self.stage);
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.phase = Phase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Playing;
        true
    }

    pub fn retry(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.reset();
        true
    }

    /// Advances one frame by `dt` seconds. Does nothing unless playing.
    pub fn update(&mut self, dt: f64) {
        if self.health.is_empty() {
            self.phase = Phase::GameOver;
        }
        if self.phase != Phase::Playing {
            return;
        }

        let multiplier = self.stage.speed_multiplier();
        self.pulsate_time += dt;

        let step = self.words.base_speed() * multiplier * dt;
        for token in &mut self.tokens {
            token.x -= step;
        }

        if self.leading_token_crossed() {
            self.register_miss();
            if self.phase == Phase::GameOver {
                return;
            }
        }

        let bounds = self.playfield.particle_bounds();
        for burst in &mut self.bursts {
            burst.update(dt, bounds);
        }
        self.bursts.retain(|b| !b.is_empty());

        self.dust.update(dt, self.playfield.width);

        let rotation = if self.shake_timer > 0.0 {
            self.shake_timer -= dt;
            (self.shake_timer * SHAKE_FREQUENCY).sin() * SHAKE_DEGREES
        } else {
            0.0
        };
        if let Some(leading) = self.tokens.first_mut() {
            leading.rotation = rotation;
        }

        self.check_invariants();
    }

    /// Applies one key press to the current word.
    pub fn handle_keystroke(&mut self, key: KeyCode) -> Keystroke {
        if self.phase != Phase::Playing {
            return Keystroke::Ignored;
        }
        let Some(c) = normalize_key(key) else {
            debug!("ignoring non-letter key {key:?}");
            return Keystroke::Ignored;
        };

        if !self.words.match_key(c) {
            self.shake_timer = SHAKE_DURATION;
            return Keystroke::Mismatch;
        }

        let hit = self.tokens.remove(0);
        self.bursts.push(Burst::spawn(hit.x, hit.y, &mut self.rng));

        let outcome = if self.words.is_exhausted() {
            self.next_word();
            self.score += 1;
            Keystroke::WordCompleted
        } else {
            Keystroke::Hit
        };
        self.check_invariants();
        outcome
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            stage: self.stage,
            tokens: &self.tokens,
            bursts: &self.bursts,
            dust: &self.dust.motes,
            limit_line_x: self.playfield.limit_line_x,
            limit_line_color: self.limit_line_color(),
            health: self.health.len(),
            score: self.score,
        }
    }

    /// Limit line colour with its pulsing alpha.
    pub fn limit_line_color(&self) -> Rgba {
        let alpha = 255.0 * (0.5 + 0.5 * (self.pulsate_time * PULSE_RATE).sin());
        let [r, g, b] = LIMIT_LINE_RGB;
        [r, g, b, alpha.clamp(0.0, 255.0) as u8]
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn health(&self) -> usize {
        self.health.len()
    }

    pub fn tokens(&self) -> &[CharacterToken] {
        &self.tokens
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn dust(&self) -> &[DustMote] {
        &self.dust.motes
    }

    pub fn remaining_word(&self) -> &[char] {
        self.words.remaining()
    }

    pub fn shake_timer(&self) -> f64 {
        self.shake_timer
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    fn leading_token_crossed(&self) -> bool {
        self.tokens.first().is_some_and(|leading| {
            leading.x < self.playfield.limit_line_x + self.playfield.miss_threshold
        })
    }

    fn register_miss(&mut self) {
        self.health.pop();
        info!(
            "missed word, {} health left (score {})",
            self.health.len(),
            self.score
        );
        if self.health.is_empty() {
            self.phase = Phase::GameOver;
            info!("game over on {} with score {}", self.stage, self.score);
        }
        self.next_word();
    }

    /// Requests a fresh word and lays its glyphs out off the right edge.
    fn next_word(&mut self) {
        let field = self.playfield;
        let y = self
            .rng
            .gen_range(field.height / 4.0..=field.height * 3.0 / 4.0)
            .floor();

        let word = self.words.new_word(self.stage, &mut self.rng);
        self.tokens = word
            .iter()
            .enumerate()
            .map(|(i, &glyph)| CharacterToken {
                glyph,
                x: field.width + i as f64 * field.token_spacing,
                y,
                rotation: 0.0,
                color: TOKEN_COLOR,
            })
            .collect();
    }

    fn check_invariants(&self) {
        debug_assert_eq!(
            self.tokens.len(),
            self.words.remaining().len(),
            "on-screen glyphs out of step with the remaining word"
        );
        debug_assert!(self.health.len() <= MAX_HEALTH);
        debug_assert_eq!(self.health.is_empty(), self.phase == Phase::GameOver);
    }
}
