//! field - Net influence on a particle from the gravity source and the pointer

use libm::{fabsf, sqrtf};
use rand::Rng;

use crate::settings::Settings;

/// The single attraction/repulsion point.
///
/// `y` is in document coordinates; the field subtracts the scroll offset so
/// the source stays pinned to the page while particles live in the viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GravitySource {
    pub x: f32,
    pub y: f32,
    /// Positive attracts, negative repels.
    pub strength: f32,
}

impl GravitySource {
    pub fn attractor(x: f32, y: f32) -> Self {
        Self { x, y, strength: 1.0 }
    }

    pub fn repeller(x: f32, y: f32) -> Self {
        Self { x, y, strength: -1.0 }
    }

    pub fn is_repulsive(&self) -> bool {
        self.strength < 0.0
    }
}

/// Per-tick snapshot of everything that pushes particles around.
#[derive(Debug, Copy, Clone)]
pub struct ForceField<'a> {
    pub settings: &'a Settings,
    pub source: Option<GravitySource>,
    pub scroll_y: f32,
    pub pointer: Option<(f32, f32)>,
    pub mouse_distance: f32,
}

impl<'a> ForceField<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            source: None,
            scroll_y: 0.0,
            pointer: None,
            mouse_distance: settings.mouse_distance_wide,
        }
    }

    /// Random velocity nudge that keeps idle dust alive.
    pub fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> (f32, f32) {
        let j = self.settings.jitter;
        (
            (rng.gen::<f32>() - 0.5) * 2.0 * j,
            (rng.gen::<f32>() - 0.5) * 2.0 * j,
        )
    }

    /// Velocity change from the gravity source for a particle at `(x, y)`.
    pub fn gravity(&self, x: f32, y: f32) -> (f32, f32) {
        let Some(src) = self.source else {
            return (0.0, 0.0);
        };
        let s = self.settings;
        let dx = src.x - x;
        let dy = (src.y - self.scroll_y) - y;
        let d2 = dx * dx + dy * dy;

        // Dead zone around the source avoids the 1/d blow-up.
        if d2 <= s.gravity_dead_zone * s.gravity_dead_zone {
            return (0.0, 0.0);
        }

        let d = sqrtf(d2);
        let (ux, uy) = (dx / d, dy / d);
        let force = s.gravity_force * src.strength;

        if src.is_repulsive() {
            if d2 < s.repulsion_radius * s.repulsion_radius {
                let push = fabsf(force) * s.repulsion_boost;
                (-ux * push, -uy * push)
            } else {
                (0.0, 0.0)
            }
        } else {
            (ux * force, uy * force)
        }
    }

    pub fn speed_cap(&self) -> f32 {
        if self.source.is_some() {
            self.settings.max_speed_active
        } else {
            self.settings.max_speed_idle
        }
    }

    pub fn friction(&self) -> f32 {
        if self.source.is_some() {
            self.settings.friction_active
        } else {
            self.settings.friction_idle
        }
    }

    /// Direct position offset away from the pointer, linear falloff to zero
    /// at `mouse_distance`.
    pub fn pointer_push(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (px, py) = self.pointer?;
        let dx = px - x;
        let dy = py - y;
        let d2 = dx * dx + dy * dy;
        let md = self.mouse_distance;
        if d2 <= 0.0 || d2 >= md * md {
            return None;
        }
        let d = sqrtf(d2);
        let falloff = (md - d) / md * self.settings.pointer_push;
        Some((-dx / d * falloff, -dy / d * falloff))
    }
}
