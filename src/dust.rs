use rand::Rng;

use crate::stage::{stage_color, DustShape, Rgba, Stage};

pub const DUST_COUNT: usize = 20;
const BASE_SIZE: f64 = 10.0;
const DRIFT_SPEED: f64 = 20.0;

/// One piece of ambient background decoration.
#[derive(Debug, Clone, PartialEq)]
pub struct DustMote {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub shape: DustShape,
    pub color: Rgba,
}

/// The fixed set of motes drifting right behind the playfield.
#[derive(Debug, Clone, Default)]
pub struct Dust {
    pub motes: Vec<DustMote>,
}

impl Dust {
    /// Builds a fresh set of motes for `stage`, scattered over a `width` x `height` viewport.
    pub fn initialize<R: Rng + ?Sized>(stage: Stage, width: f64, height: f64, rng: &mut R) -> Self {
        let motes = (0..DUST_COUNT)
            .map(|_| {
                let variation: f64 = rng.gen_range(0.8..=1.2);
                DustMote {
                    x: rng.gen_range(0.0..=width),
                    y: rng.gen_range(0.0..=height),
                    size: BASE_SIZE * variation,
                    shape: stage.dust_shape(),
                    color: stage_color(stage, rng),
                }
            })
            .collect();

        Self { motes }
    }

    /// Drifts every mote right, wrapping to the left edge past `width`.
    pub fn update(&mut self, dt: f64, width: f64) {
        for mote in &mut self.motes {
            mote.x += dt * DRIFT_SPEED;
            if mote.x > width {
                mote.x = 0.0;
            }
        }
    }
}
