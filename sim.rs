//! sim - The dust field: one context owning pool, gravity slot, pointer and clock

use heapless::Vec;
use log::{debug, info, trace};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::clock::{Frame, FrameClock};
use crate::emitter::{self, BurstConfig, Rect};
use crate::error::ConfigError;
use crate::field::{ForceField, GravitySource};
use crate::particle::Particle;
use crate::quality::{MotionPreference, Quality, Viewport};
use crate::settings::Settings;
use crate::surface::Surface;

/// Upper bound on any tier's pool size.
pub const POOL_CAPACITY: usize = 1024;

pub type Pool = Vec<Particle, POOL_CAPACITY>;

/// Result of one call to [`DustField::tick`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Stopped,
    Skipped,
    Stepped { emitted: usize },
}

#[derive(Debug)]
pub struct DustField {
    settings: Settings,
    pool: Pool,
    viewport: Viewport,
    scroll_y: f32,
    pointer: Option<(f32, f32)>,
    source: Option<GravitySource>,
    region: Option<Rect>,
    preference: MotionPreference,
    system_reduced: bool,
    quality: Quality,
    clock: FrameClock,
    rng: SmallRng,
}

impl DustField {
    pub fn new(settings: Settings, viewport: Viewport) -> Result<Self, ConfigError> {
        settings.validate()?;
        let quality = Quality::resolve(&settings, &viewport, false);
        let mut field = Self {
            rng: SmallRng::seed_from_u64(settings.rng_seed),
            settings,
            pool: Vec::new(),
            viewport,
            scroll_y: 0.0,
            pointer: None,
            source: None,
            region: None,
            preference: MotionPreference::System,
            system_reduced: false,
            quality,
            clock: FrameClock::new(),
        };
        field.rebuild_pool();
        info!(
            "dust field {}x{} at {:?} tier, {} particles",
            viewport.width(),
            viewport.height(),
            quality.tier,
            field.pool.len()
        );
        Ok(field)
    }

    // Mutation surface used by the bindings layer.

    /// Replace the gravity source. Last writer wins.
    pub fn set_gravity_source(&mut self, source: Option<GravitySource>) {
        self.source = source;
    }

    /// Fire a radial burst at `origin` (viewport pixels).
    pub fn emit_burst(&mut self, origin: (f32, f32), config: &BurstConfig) -> usize {
        let n = emitter::emit_burst(
            &mut self.pool,
            origin,
            config,
            self.settings.burst_jitter,
            &self.viewport,
            &mut self.rng,
        );
        trace!("burst of {} at ({:.0}, {:.0})", n, origin.0, origin.1);
        n
    }

    /// Randomise every particle's velocity so a settled cluster disperses.
    pub fn scatter(&mut self) {
        emitter::scatter(&mut self.pool, self.settings.release_scatter_speed, &mut self.rng);
    }

    pub fn notify_motion_preference_changed(
        &mut self,
        preference: MotionPreference,
        system_reduced: bool,
    ) {
        self.preference = preference;
        self.system_reduced = system_reduced;
        self.apply_quality();
    }

    pub fn notify_resize(&mut self, viewport: Viewport) {
        let old = self.viewport;
        self.viewport = viewport;
        debug!("resize to {}x{}", viewport.width(), viewport.height());
        let rebuilt = self.apply_quality();
        if !rebuilt {
            self.rescale(&old);
        }
    }

    pub fn notify_pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Some((x, y));
    }

    pub fn notify_pointer_left(&mut self) {
        self.pointer = None;
    }

    pub fn notify_scrolled(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
    }

    /// Hero-text rectangle in viewport pixels; `None` turns the bleed off.
    pub fn set_emission_region(&mut self, region: Option<Rect>) {
        if region != self.region {
            debug!("emission region {:?}", region);
        }
        self.region = region;
    }

    pub fn notify_visibility(&mut self, visible: bool) {
        self.clock.set_visible(visible);
    }

    pub fn set_preview_freeze(&mut self, frozen: bool) {
        self.clock.set_frozen(frozen);
    }

    pub fn start(&mut self) {
        self.clock.start();
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// One display frame: emit, update and draw every particle.
    pub fn tick<S: Surface>(&mut self, now_ms: u64, surface: &mut S) -> Result<TickOutcome, S::Error> {
        match self.clock.advance(now_ms, self.quality.update_stride) {
            Frame::Stopped => return Ok(TickOutcome::Stopped),
            Frame::Skipped => return Ok(TickOutcome::Skipped),
            Frame::Step => {}
        }

        let emitted = match self.region {
            Some(region) if self.quality.emit_per_tick > 0 => emitter::emit_from_region(
                &mut self.pool,
                &region,
                self.quality.emit_per_tick,
                self.quality.emit_speed,
                self.quality.emit_jitter,
                &self.viewport,
                &mut self.rng,
            ),
            _ => 0,
        };

        let field = ForceField {
            settings: &self.settings,
            source: self.source,
            scroll_y: self.scroll_y,
            pointer: self.pointer,
            mouse_distance: self.quality.mouse_distance,
        };
        let baseline = self.settings.tint_baseline;

        surface.clear()?;
        for p in self.pool.iter_mut() {
            p.update(&field, &self.viewport, &mut self.rng);
            p.draw(surface, baseline)?;
        }
        Ok(TickOutcome::Stepped { emitted })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.pool
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.pool
    }

    pub fn quality(&self) -> &Quality {
        &self.quality
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn gravity_source(&self) -> Option<GravitySource> {
        self.source
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn emission_region(&self) -> Option<Rect> {
        self.region
    }

    pub fn motion_preference(&self) -> MotionPreference {
        self.preference
    }

    pub fn reduced_motion(&self) -> bool {
        self.preference.is_reduced(self.system_reduced)
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Recompute the tier; rebuild the pool if its size changed.
    fn apply_quality(&mut self) -> bool {
        let previous = self.quality;
        self.quality = Quality::resolve(&self.settings, &self.viewport, self.reduced_motion());
        if self.quality.tier != previous.tier {
            info!("quality tier {:?} -> {:?}", previous.tier, self.quality.tier);
        }
        if self.quality.pool_size != self.pool.len() {
            self.rebuild_pool();
            return true;
        }
        false
    }

    fn rebuild_pool(&mut self) {
        let size = self.quality.pool_size.min(POOL_CAPACITY);
        self.pool.clear();
        for _ in 0..size {
            let p = Particle::spawn(&mut self.rng, &self.viewport, &self.settings);
            if self.pool.push(p).is_err() {
                break;
            }
        }
        debug!("pool rebuilt with {} particles", self.pool.len());
    }

    // Keep relative positions when the viewport changes under a live pool.
    // A pool laid out on an empty viewport has no positions worth keeping.
    fn rescale(&mut self, old: &Viewport) {
        if old.is_empty() {
            for p in self.pool.iter_mut() {
                *p = Particle::spawn(&mut self.rng, &self.viewport, &self.settings);
            }
            return;
        }
        let sx = self.viewport.width() / old.width();
        let sy = self.viewport.height() / old.height();
        for p in self.pool.iter_mut() {
            (p.x, p.y) = self.viewport.confine(p.x * sx, p.y * sy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Tier;
    use crate::surface::testing::Recorder;

    fn desktop() -> DustField {
        DustField::new(Settings::default(), Viewport::new(1440.0, 900.0)).expect("valid settings")
    }

    fn run(field: &mut DustField, frames: u64) -> std::vec::Vec<TickOutcome> {
        let mut surface = Recorder::default();
        let start = field.now_ms();
        (1..=frames)
            .map(|i| field.tick(start + i * 16, &mut surface).expect("infallible"))
            .collect()
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut settings = Settings::default();
        settings.pool_size.desktop = POOL_CAPACITY * 2;
        assert!(DustField::new(settings, Viewport::new(1440.0, 900.0)).is_err());
    }

    #[test]
    fn pool_starts_at_tier_size() {
        let field = desktop();
        assert_eq!(field.quality().tier, Tier::Desktop);
        assert_eq!(field.particles().len(), 920);
    }

    #[test]
    fn stopped_clock_draws_nothing() {
        let mut field = desktop();
        let mut surface = Recorder::default();
        assert_eq!(field.tick(16, &mut surface), Ok(TickOutcome::Stopped));
        assert_eq!(surface.clears, 0);

        field.start();
        field.tick(32, &mut surface).expect("infallible");
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.circles.len(), 920);
    }

    #[test]
    fn bounds_and_speed_hold_every_tick() {
        let mut field = desktop();
        field.start();
        field.set_emission_region(Some(Rect::new(0.0, 0.0, 600.0, 120.0)));
        field.notify_pointer_moved(3.0, 4.0);
        field.set_gravity_source(Some(GravitySource::repeller(700.0, 450.0)));
        let mut surface = Recorder::default();
        for i in 1..=240u64 {
            if i == 120 {
                field.set_gravity_source(Some(GravitySource::attractor(10.0, 890.0)));
            }
            field.tick(i * 16, &mut surface).expect("infallible");
            for p in field.particles() {
                assert!((0.0..=1440.0).contains(&p.x));
                assert!((0.0..=900.0).contains(&p.y));
                assert!(p.speed() <= 3.0 + 1e-5);
            }
        }
        field.set_gravity_source(None);
        run(&mut field, 1);
        assert!(field.particles().iter().all(|p| p.speed() <= 1.2 + 1e-5));
    }

    #[test]
    fn desktop_emits_every_tick() {
        let mut field = desktop();
        field.start();
        field.set_emission_region(Some(Rect::new(100.0, 100.0, 400.0, 90.0)));
        let outcomes = run(&mut field, 4);
        assert!(outcomes
            .iter()
            .all(|o| *o == TickOutcome::Stepped { emitted: 6 }));
    }

    #[test]
    fn no_region_no_emission() {
        let mut field = desktop();
        field.start();
        assert_eq!(run(&mut field, 1), [TickOutcome::Stepped { emitted: 0 }]);
    }

    #[test]
    fn reduced_motion_stops_emission_and_throttles() {
        let mut field = desktop();
        field.start();
        field.set_emission_region(Some(Rect::new(100.0, 100.0, 400.0, 90.0)));
        field.notify_motion_preference_changed(MotionPreference::System, true);

        assert!(field.reduced_motion());
        assert_eq!(field.quality().emit_per_tick, 0);
        assert_eq!(field.particles().len(), 110);

        let outcomes = run(&mut field, 9);
        let stepped = outcomes
            .iter()
            .filter(|o| matches!(o, TickOutcome::Stepped { .. }))
            .count();
        assert_eq!(stepped, 3);
        assert!(outcomes
            .iter()
            .all(|o| !matches!(o, TickOutcome::Stepped { emitted } if *emitted > 0)));
    }

    #[test]
    fn full_preference_overrides_system() {
        let mut field = desktop();
        field.notify_motion_preference_changed(MotionPreference::Full, true);
        assert!(!field.reduced_motion());
        assert_eq!(field.quality().tier, Tier::Desktop);
    }

    #[test]
    fn crossing_tier_boundary_rebuilds_pool() {
        let mut field =
            DustField::new(Settings::default(), Viewport::new(1200.0, 800.0)).expect("valid");
        assert_eq!(field.particles().len(), 420);
        for p in field.particles_mut() {
            p.x = 0.5;
            p.y = 0.5;
        }

        field.notify_resize(Viewport::new(1201.0, 800.0));
        assert_eq!(field.quality().tier, Tier::Desktop);
        assert_eq!(field.particles().len(), 920);
        let fresh = field
            .particles()
            .iter()
            .filter(|p| p.x != 0.5 || p.y != 0.5)
            .count();
        assert_eq!(fresh, 920);
    }

    #[test]
    fn resize_within_tier_rescales() {
        let mut field = desktop();
        field.particles_mut()[0].x = 720.0;
        field.particles_mut()[0].y = 900.0;
        field.notify_resize(Viewport::new(1920.0, 600.0));
        assert_eq!(field.particles().len(), 920);
        let p = field.particles()[0];
        assert!((p.x - 960.0).abs() < 1e-3);
        assert!((p.y - 600.0).abs() < 1e-3);
    }

    #[test]
    fn resize_from_empty_viewport_spreads_pool() {
        let mut field =
            DustField::new(Settings::default(), Viewport::new(0.0, 0.0)).expect("valid");
        assert_eq!(field.quality().tier, Tier::Mobile);
        assert_eq!(field.particles().len(), 220);

        field.notify_resize(Viewport::new(500.0, 800.0));
        assert_eq!(field.particles().len(), 220);
        let at_origin = field
            .particles()
            .iter()
            .filter(|p| p.x == 0.0 || p.y == 0.0)
            .count();
        assert_eq!(at_origin, 0);
        assert!(field
            .particles()
            .iter()
            .all(|p| (0.0..=500.0).contains(&p.x) && (0.0..=800.0).contains(&p.y)));
    }

    #[test]
    fn offscreen_region_emits_nothing() {
        let mut field = desktop();
        field.start();
        field.set_emission_region(Some(Rect::new(100.0, -600.0, 400.0, 90.0)));
        let outcomes = run(&mut field, 10);
        assert!(outcomes
            .iter()
            .all(|o| *o == TickOutcome::Stepped { emitted: 0 }));

        field.set_emission_region(Some(Rect::new(100.0, -60.0, 400.0, 90.0)));
        assert_eq!(run(&mut field, 1), [TickOutcome::Stepped { emitted: 6 }]);
    }

    #[test]
    fn hidden_document_stops_ticking() {
        let mut field = desktop();
        field.start();
        field.notify_visibility(false);
        assert_eq!(run(&mut field, 2), [TickOutcome::Stopped, TickOutcome::Stopped]);
        field.notify_visibility(true);
        assert!(matches!(run(&mut field, 1)[0], TickOutcome::Stepped { .. }));

        field.set_preview_freeze(true);
        assert_eq!(run(&mut field, 1), [TickOutcome::Stopped]);
    }

    #[test]
    fn tinted_particles_draw_in_color() {
        let mut field = desktop();
        field.start();
        let config = field.settings().skill_pill_burst;
        assert_eq!(field.emit_burst((300.0, 300.0), &config), 14);

        let mut surface = Recorder::default();
        field.tick(16, &mut surface).expect("infallible");
        assert!(surface
            .circles
            .iter()
            .any(|&(_, _, _, color, _)| color != crate::surface::Rgb::BLACK));
    }
}
