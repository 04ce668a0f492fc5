//! emitter - Recycles pool particles into the hero-text bleed and hover bursts
//!
//! Nothing is allocated here. Both emitters pick victims uniformly at random
//! from the pool, with replacement, and overwrite their state in place.

use core::f32::consts::TAU;

use libm::{cosf, sinf};
use rand::Rng;

use crate::particle::{centered, lerp, Particle, Tint};
use crate::quality::Viewport;

/// Axis-aligned rectangle in viewport pixels.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Whether any part of the rectangle lies inside `viewport`.
    pub fn overlaps(&self, viewport: &Viewport) -> bool {
        self.x < viewport.width()
            && self.x + self.width > 0.0
            && self.y < viewport.height()
            && self.y + self.height > 0.0
    }
}

/// Parameters of one radial burst.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BurstConfig {
    pub count: usize,
    /// Spawn disc radius around the origin.
    pub radius: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Alpha floor; never lowers a brighter particle.
    pub opacity: f32,
    pub tint: Option<Tint>,
}

/// Continuous bleed: teleport `count` particles into `region`.
///
/// Returns how many particles were relocated. A region scrolled out of the
/// viewport relocates nothing.
pub fn emit_from_region<R: Rng + ?Sized>(
    pool: &mut [Particle],
    region: &Rect,
    count: usize,
    speed: f32,
    jitter: f32,
    viewport: &Viewport,
    rng: &mut R,
) -> usize {
    if pool.is_empty() || !region.overlaps(viewport) {
        return 0;
    }
    for _ in 0..count {
        let i = rng.gen_range(0..pool.len());
        let x = region.x + rng.gen::<f32>() * region.width + centered(rng, jitter);
        let y = region.y + rng.gen::<f32>() * region.height + centered(rng, jitter);
        let vx = centered(rng, speed);
        let vy = centered(rng, speed);

        let p = &mut pool[i];
        (p.x, p.y) = viewport.confine(x, y);
        p.vx = vx;
        p.vy = vy;
        p.alpha = 1.0;
    }
    count
}

/// Radial burst around `origin`. Returns how many particles were touched,
/// counting repeats.
pub fn emit_burst<R: Rng + ?Sized>(
    pool: &mut [Particle],
    origin: (f32, f32),
    config: &BurstConfig,
    jitter: f32,
    viewport: &Viewport,
    rng: &mut R,
) -> usize {
    if pool.is_empty() {
        return 0;
    }
    let count = config.count.min(pool.len());
    for _ in 0..count {
        let i = rng.gen_range(0..pool.len());
        let angle = rng.gen::<f32>() * TAU;
        let dist = rng.gen::<f32>() * config.radius;
        let (dir_x, dir_y) = (cosf(angle), sinf(angle));
        let speed = lerp(config.speed_min, config.speed_max, rng.gen());
        let vx = dir_x * speed + centered(rng, jitter);
        let vy = dir_y * speed + centered(rng, jitter);

        let p = &mut pool[i];
        (p.x, p.y) = viewport.confine(origin.0 + dir_x * dist, origin.1 + dir_y * dist);
        p.vx = vx;
        p.vy = vy;
        p.alpha = p.alpha.max(config.opacity);
        if let Some(tint) = config.tint {
            p.tint = tint;
        }
    }
    count
}

/// Give every particle a fresh random velocity.
pub fn scatter<R: Rng + ?Sized>(pool: &mut [Particle], speed: f32, rng: &mut R) {
    for p in pool {
        p.vx = centered(rng, speed);
        p.vy = centered(rng, speed);
    }
}
