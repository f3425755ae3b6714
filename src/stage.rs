use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// RGBA colour, one byte per channel.
pub type Rgba = [u8; 4];

/// Difficulty level of a session. Picks the word list, the scroll speed,
/// the dust decoration and the background music.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    strum_macros::Display,
)]
pub enum Stage {
    #[default]
    #[strum(to_string = "Stage 1")]
    One,
    #[strum(to_string = "Stage 2")]
    Two,
    #[strum(to_string = "Stage 3")]
    Three,
}

/// Outline drawn for each dust mote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DustShape {
    Rectangle,
    Circle,
    Star,
}

/// Per-channel ranges a stage draws its dust colours from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBands {
    pub red: RangeInclusive<u8>,
    pub green: RangeInclusive<u8>,
    pub blue: RangeInclusive<u8>,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::One, Stage::Two, Stage::Three];

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Stage::One),
            2 => Some(Stage::Two),
            3 => Some(Stage::Three),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Stage::One => 1,
            Stage::Two => 2,
            Stage::Three => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::One => "Cyber Adagio",
            Stage::Two => "Lake Andante",
            Stage::Three => "Space Vivace",
        }
    }

    /// Runtime multiplier applied to token motion every frame.
    pub fn speed_multiplier(self) -> f64 {
        match self {
            Stage::One => 1.0,
            Stage::Two => 2.0,
            Stage::Three => 3.0,
        }
    }

    /// Base scroll speed in logical pixels per second, fixed when a word spawns.
    pub fn base_word_speed(self) -> f64 {
        match self {
            Stage::One => 100.0,
            Stage::Two => 150.0,
            Stage::Three => 200.0,
        }
    }

    pub fn dust_shape(self) -> DustShape {
        match self {
            Stage::One => DustShape::Rectangle,
            Stage::Two => DustShape::Circle,
            Stage::Three => DustShape::Star,
        }
    }

    pub fn color_bands(self) -> ColorBands {
        match self {
            // purples
            Stage::One => ColorBands {
                red: 100..=180,
                green: 50..=120,
                blue: 150..=220,
            },
            // blues
            Stage::Two => ColorBands {
                red: 50..=120,
                green: 100..=180,
                blue: 150..=220,
            },
            // reds
            Stage::Three => ColorBands {
                red: 150..=220,
                green: 50..=120,
                blue: 100..=180,
            },
        }
    }

    /// Cycles through the stages, wrapping at both ends.
    pub fn cycle(self, step: i32) -> Self {
        let idx = (self.number() as i32 - 1 + step).rem_euclid(Self::ALL.len() as i32);
        Self::ALL[idx as usize]
    }
}

/// Draws an opaque colour from the stage's palette.
pub fn stage_color<R: Rng + ?Sized>(stage: Stage, rng: &mut R) -> Rgba {
    let bands = stage.color_bands();
    [
        rng.gen_range(bands.red),
        rng.gen_range(bands.green),
        rng.gen_range(bands.blue),
        255,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn stage_numbers_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_number(stage.number()), Some(stage));
        }
        assert_eq!(Stage::from_number(0), None);
        assert_eq!(Stage::from_number(4), None);
    }

    #[test]
    fn speed_scales_with_stage() {
        assert_eq!(Stage::One.speed_multiplier(), 1.0);
        assert_eq!(Stage::Two.speed_multiplier(), 2.0);
        assert_eq!(Stage::Three.speed_multiplier(), 3.0);

        assert_eq!(Stage::One.base_word_speed(), 100.0);
        assert_eq!(Stage::Two.base_word_speed(), 150.0);
        assert_eq!(Stage::Three.base_word_speed(), 200.0);
    }

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(Stage::One.cycle(1), Stage::Two);
        assert_eq!(Stage::Three.cycle(1), Stage::One);
        assert_eq!(Stage::One.cycle(-1), Stage::Three);
        assert_eq!(Stage::Two.cycle(0), Stage::Two);
    }

    #[test]
    fn display_names() {
        assert_eq!(Stage::One.to_string(), "Stage 1");
        assert_eq!(Stage::Three.to_string(), "Stage 3");
    }

    #[test]
    fn stage_color_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for stage in Stage::ALL {
            let bands = stage.color_bands();
            for _ in 0..200 {
                let [r, g, b, a] = stage_color(stage, &mut rng);
                assert!(bands.red.contains(&r));
                assert!(bands.green.contains(&g));
                assert!(bands.blue.contains(&b));
                assert_eq!(a, 255);
            }
        }
    }
}
