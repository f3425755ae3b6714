use rand::Rng;

use crate::stage::Rgba;

/// Particles spawned per successful keystroke.
pub const BURST_SIZE: usize = 3;
/// Vertical offset between the matched glyph and the burst's arc origin.
const ORIGIN_LIFT: f64 = 50.0;
/// Local clock starts negative so particles rise before they fall.
const START_TIME: f64 = -2.0;
const TIME_SCALE: f64 = 20.0;
const DRIFT_SCALE: f64 = 10.0;

/// One star of a burst.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub dir_x: f64,
    pub dir_y: f64,
    pub speed: f64,
    pub size: f64,
    pub rotation: f64,
    pub color: Rgba,
}

/// Region outside of which particles are culled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBounds {
    pub width: f64,
    pub margin: f64,
}

impl ParticleBounds {
    pub fn for_width(width: f64) -> Self {
        Self {
            width,
            margin: 10.0,
        }
    }

    fn contains(&self, p: &Particle) -> bool {
        !(p.y < -self.margin || p.x < -self.margin || p.x > self.width + self.margin)
    }
}

impl Default for ParticleBounds {
    fn default() -> Self {
        Self::for_width(800.0)
    }
}

/// Group of particles spawned together from one matched glyph.
///
/// Coordinates are y-up: a particle "falls" as its y decreases.
#[derive(Debug, Clone)]
pub struct Burst {
    pub particles: Vec<Particle>,
    origin_y: f64,
    time: f64,
}

impl Burst {
    pub fn spawn<R: Rng + ?Sized>(x: f64, y: f64, rng: &mut R) -> Self {
        let particles = (0..BURST_SIZE)
            .map(|_| Particle {
                x,
                y: y + ORIGIN_LIFT,
                dir_x: rng.gen_range(-10.0..=10.0),
                dir_y: rng.gen_range(5.0..=15.0),
                speed: rng.gen_range(2.0..=5.0),
                size: rng.gen_range(5..=15) as f64,
                rotation: rng.gen_range(0.0..360.0),
                color: [rng.gen(), rng.gen(), rng.gen(), 255],
            })
            .collect();

        Self {
            particles,
            origin_y: y + ORIGIN_LIFT,
            time: START_TIME,
        }
    }

    /// Advances the arc and drops particles that left `bounds`.
    pub fn update(&mut self, dt: f64, bounds: ParticleBounds) {
        self.time += dt * TIME_SCALE;
        let t = self.time;
        let origin_y = self.origin_y;

        self.particles.retain_mut(|p| {
            p.y = origin_y - t * t * p.speed + p.dir_y * dt * DRIFT_SCALE;
            p.x += p.dir_x * dt * DRIFT_SCALE;
            bounds.contains(p)
        });
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}
