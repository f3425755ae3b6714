use std::collections::HashMap;

use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::error::{GameError, Result};
use crate::stage::Stage;

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

/// On-disk shape of one stage's word list.
#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
struct WordListFile {
    stage: u8,
    size: u32,
    words: Vec<String>,
}

/// Word lists for every stage, uppercased and checked to be non-empty.
#[derive(Debug, Clone)]
pub struct WordLists {
    lists: HashMap<Stage, Vec<String>>,
}

impl WordLists {
    /// The lists compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let mut lists = HashMap::new();
        for stage in Stage::ALL {
            let name = format!("stage{}.json", stage.number());
            let contents = WORDS_DIR
                .get_file(&name)
                .and_then(|f| f.contents_utf8())
                .ok_or(GameError::MissingWordList(stage))?;
            let parsed: WordListFile = serde_json::from_str(contents)?;
            lists.insert(stage, parsed.words);
        }
        Self::new(lists)
    }

    pub fn new(lists: HashMap<Stage, Vec<String>>) -> Result<Self> {
        let mut cleaned = HashMap::new();
        for stage in Stage::ALL {
            let words: Vec<String> = lists
                .get(&stage)
                .map(|words| {
                    words
                        .iter()
                        .map(|w| w.trim().to_ascii_uppercase())
                        .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_alphabetic()))
                        .collect()
                })
                .unwrap_or_default();

            if words.is_empty() {
                return Err(GameError::MissingWordList(stage));
            }
            cleaned.insert(stage, words);
        }
        Ok(Self { lists: cleaned })
    }

    /// The same list for every stage.
    pub fn uniform(words: &[&str]) -> Result<Self> {
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        Self::new(Stage::ALL.iter().map(|&s| (s, words.clone())).collect())
    }

    pub fn words(&self, stage: Stage) -> &[String] {
        self.lists.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Supplies target words and tracks how much of the current one is left.
#[derive(Debug, Clone)]
pub struct WordSource {
    lists: WordLists,
    remaining: Vec<char>,
    base_speed: f64,
}

impl WordSource {
    pub fn new(lists: WordLists) -> Self {
        Self {
            lists,
            remaining: Vec::new(),
            base_speed: Stage::One.base_word_speed(),
        }
    }

    /// Replaces the current word with one picked uniformly from the stage's list.
    pub fn new_word<R: Rng + ?Sized>(&mut self, stage: Stage, rng: &mut R) -> &[char] {
        let word = self
            .lists
            .words(stage)
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default();

        self.remaining = word.chars().collect();
        self.base_speed = stage.base_word_speed();
        &self.remaining
    }

    /// Consumes the first remaining character if `c` matches it (case-insensitively).
    ///
    /// Never advances to a new word on its own; an emptied word stays empty
    /// until `new_word` is called.
    pub fn match_key(&mut self, c: char) -> bool {
        let c = c.to_ascii_uppercase();
        match self.remaining.first() {
            Some(&expected) if expected == c => {
                self.remaining.remove(0);
                true
            }
            _ => false,
        }
    }

    /// The untyped suffix of the current word.
    pub fn remaining(&self) -> &[char] {
        &self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }
}
