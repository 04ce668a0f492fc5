//! settings - Every tunable of the dust field in one place

use crate::emitter::BurstConfig;
use crate::error::ConfigError;
use crate::particle::Tint;
use crate::quality::{Tier, Tiered};
use crate::sim::POOL_CAPACITY;
use crate::surface::Rgb;

/// Simulation constants. `Default` carries the tuned values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Settings {
    // Quality tiers
    pub pool_size: Tiered<usize>,
    pub emit_per_tick: Tiered<usize>,
    pub update_stride: Tiered<u32>,
    pub emit_speed: Tiered<f32>,
    pub emit_jitter: Tiered<f32>,
    pub mobile_max_width: f32,
    pub tablet_max_width: f32,

    // Pointer repulsion
    pub mouse_distance_narrow: f32,
    pub mouse_distance_wide: f32,
    pub pointer_push: f32,

    // Motion
    pub jitter: f32,
    pub max_speed_idle: f32,
    pub max_speed_active: f32,
    pub friction_idle: f32,
    pub friction_active: f32,

    // Gravity source
    pub gravity_force: f32,
    pub gravity_dead_zone: f32,
    pub repulsion_radius: f32,
    pub repulsion_boost: f32,
    pub release_scatter_speed: f32,

    // Particle generation
    pub spawn_speed: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub alpha_min: f32,
    pub alpha_max: f32,
    pub alpha_fade: f32,

    // Tint
    pub tint_baseline: Rgb,
    pub tint_cutoff: f32,

    // Bursts
    pub burst_jitter: f32,
    pub skill_pill_burst: BurstConfig,
    pub skill_pill_cooldown_ms: u64,
    pub social_icon_burst: BurstConfig,
    pub social_icon_cooldown_ms: u64,

    // RNG seed
    pub rng_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pool_size: Tiered::new(110, 220, 420, 920),
            emit_per_tick: Tiered::new(0, 2, 3, 6),
            update_stride: Tiered::new(3, 2, 2, 1),
            emit_speed: Tiered::new(0.4, 0.6, 0.8, 1.0),
            emit_jitter: Tiered::new(1.0, 2.0, 4.0, 6.0),
            mobile_max_width: 768.0,
            tablet_max_width: 1200.0,
            mouse_distance_narrow: 72.0,
            mouse_distance_wide: 100.0,
            pointer_push: 2.0,
            jitter: 0.01,
            max_speed_idle: 1.2,
            max_speed_active: 3.0,
            friction_idle: 0.992,
            friction_active: 0.95,
            gravity_force: 0.05,
            gravity_dead_zone: 10.0,
            repulsion_radius: 250.0,
            repulsion_boost: 5.0,
            release_scatter_speed: 1.0,
            spawn_speed: 0.15,
            size_min: 0.1,
            size_max: 0.9,
            alpha_min: 0.4,
            alpha_max: 0.7,
            alpha_fade: 0.02,
            tint_baseline: Rgb::new(48, 48, 52),
            tint_cutoff: 0.03,
            burst_jitter: 0.1,
            skill_pill_burst: BurstConfig {
                count: 14,
                radius: 18.0,
                speed_min: 0.6,
                speed_max: 1.6,
                opacity: 0.85,
                tint: Some(Tint::new(Rgb::new(37, 99, 235), 1.0, 0.92)),
            },
            skill_pill_cooldown_ms: 140,
            social_icon_burst: BurstConfig {
                count: 22,
                radius: 12.0,
                speed_min: 0.8,
                speed_max: 2.2,
                opacity: 0.95,
                tint: Some(Tint::new(Rgb::new(219, 39, 119), 1.0, 0.92)),
            },
            social_icon_cooldown_ms: 160,
            rng_seed: 0x5EED_D057,
        }
    }
}

impl Settings {
    /// Reject values the simulation cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tier in Tier::ALL {
            let requested = self.pool_size.get(tier);
            if requested > POOL_CAPACITY {
                return Err(ConfigError::PoolTooLarge {
                    tier,
                    requested,
                    capacity: POOL_CAPACITY,
                });
            }
            if self.update_stride.get(tier) == 0 {
                return Err(ConfigError::ZeroStride(tier));
            }
        }

        positive("max_speed_idle", self.max_speed_idle)?;
        positive("max_speed_active", self.max_speed_active)?;
        positive("mouse_distance_narrow", self.mouse_distance_narrow)?;
        positive("mouse_distance_wide", self.mouse_distance_wide)?;
        within("friction_idle", self.friction_idle, f32::MIN_POSITIVE, 1.0)?;
        within("friction_active", self.friction_active, f32::MIN_POSITIVE, 1.0)?;
        within("alpha_fade", self.alpha_fade, 0.0, 1.0)?;
        within("tint_cutoff", self.tint_cutoff, 0.0, 1.0)?;
        ordered("size", self.size_min, self.size_max)?;
        ordered("alpha", self.alpha_min, self.alpha_max)?;
        within("alpha_max", self.alpha_max, 0.0, 1.0)?;

        for (name, burst) in [
            ("skill_pill_burst", &self.skill_pill_burst),
            ("social_icon_burst", &self.social_icon_burst),
        ] {
            ordered(name, burst.speed_min, burst.speed_max)?;
            within(name, burst.opacity, 0.0, 1.0)?;
            if let Some(tint) = burst.tint {
                // Decay must lie strictly inside (0, 1).
                within(name, tint.decay, f32::MIN_POSITIVE, 1.0 - f32::EPSILON)?;
            }
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    within(name, value, f32::MIN_POSITIVE, f32::MAX)
}

fn within(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

fn ordered(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { name, min, max })
    }
}
