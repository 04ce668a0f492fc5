//! particle - A single dust speck and its per-tick integration

use libm::sqrtf;
use rand::Rng;

use crate::field::ForceField;
use crate::quality::Viewport;
use crate::settings::Settings;
use crate::surface::{Rgb, Surface};

/// Transient colour wash applied by bursts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tint {
    pub color: Rgb,
    /// 0 means untinted.
    pub strength: f32,
    /// Multiplier applied to `strength` every tick.
    pub decay: f32,
}

impl Tint {
    pub const NONE: Tint = Tint {
        color: Rgb::BLACK,
        strength: 0.0,
        decay: 0.92,
    };

    pub const fn new(color: Rgb, strength: f32, decay: f32) -> Self {
        Self {
            color,
            strength,
            decay,
        }
    }

    pub fn is_active(&self) -> bool {
        self.strength > 0.0
    }

    fn fade(&mut self, cutoff: f32) {
        if self.strength > 0.0 {
            self.strength *= self.decay;
            if self.strength < cutoff {
                self.strength = 0.0;
            }
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Tint::NONE
    }
}

// Plain record; the pool owns every particle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub base_alpha: f32,
    pub alpha: f32,
    pub tint: Tint,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            size: 0.5,
            base_alpha: 0.5,
            alpha: 0.5,
            tint: Tint::NONE,
        }
    }
}

impl Particle {
    /// Fresh particle anywhere in the viewport.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, viewport: &Viewport, settings: &Settings) -> Self {
        let x = rng.gen::<f32>() * viewport.width();
        let y = rng.gen::<f32>() * viewport.height();
        let vx = centered(rng, settings.spawn_speed);
        let vy = centered(rng, settings.spawn_speed);
        let size = lerp(settings.size_min, settings.size_max, rng.gen());
        let base_alpha = lerp(settings.alpha_min, settings.alpha_max, rng.gen());
        Self {
            x,
            y,
            vx,
            vy,
            size,
            base_alpha,
            alpha: base_alpha,
            tint: Tint::NONE,
        }
    }

    pub fn speed(&self) -> f32 {
        sqrtf(self.vx * self.vx + self.vy * self.vy)
    }

    /// Advance one tick.
    ///
    /// Order matters and is fixed: jitter, gravity, speed clamp, friction,
    /// integrate, wrap, pointer push, tint decay, alpha relaxation. The
    /// pointer acts on position rather than velocity, so it wins over the
    /// wrap for that tick.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        field: &ForceField<'_>,
        viewport: &Viewport,
        rng: &mut R,
    ) {
        let (jx, jy) = field.jitter(rng);
        self.vx += jx;
        self.vy += jy;

        let (gx, gy) = field.gravity(self.x, self.y);
        self.vx += gx;
        self.vy += gy;

        let cap = field.speed_cap();
        let speed = self.speed();
        if speed > cap {
            let k = cap / speed;
            self.vx *= k;
            self.vy *= k;
        }

        let friction = field.friction();
        self.vx *= friction;
        self.vy *= friction;

        self.x += self.vx;
        self.y += self.vy;
        (self.x, self.y) = viewport.wrap(self.x, self.y);

        if let Some((px, py)) = field.pointer_push(self.x, self.y) {
            (self.x, self.y) = viewport.confine(self.x + px, self.y + py);
        }

        self.tint.fade(field.settings.tint_cutoff);
        self.alpha += (self.base_alpha - self.alpha) * field.settings.alpha_fade;
    }

    /// Black when untinted, else a blend from `baseline` toward the tint.
    pub fn fill_color(&self, baseline: Rgb) -> Rgb {
        if self.tint.is_active() {
            baseline.lerp(self.tint.color, self.tint.strength)
        } else {
            Rgb::BLACK
        }
    }

    pub fn draw<S: Surface>(&self, surface: &mut S, baseline: Rgb) -> Result<(), S::Error> {
        surface.fill_circle(self.x, self.y, self.size, self.fill_color(baseline), self.alpha)
    }
}

/// Uniform value in `(-half, half)`.
pub(crate) fn centered<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0 * half
}

pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
