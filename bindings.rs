//! bindings - UI events in, gravity-source and burst requests out
//!
//! The page layer turns its own listener callbacks into [`Event`]s and feeds
//! them to [`Bindings::dispatch`]. Geometry arrives already measured; nothing
//! here looks anything up.

use heapless::FnvIndexMap;
use log::debug;

use crate::emitter::{BurstConfig, Rect};
use crate::field::GravitySource;
use crate::quality::{MotionPreference, Viewport};
use crate::sim::DustField;

pub type ElementId = u16;

// Power of two, required by FnvIndexMap.
const COOLDOWN_SLOTS: usize = 64;

/// What an interactive region does to the field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegionKind {
    /// Attracts dust while hovered (the "view projects" button).
    GravityWell,
    /// Repels dust while hovered (project cards).
    Repeller,
    /// Small tinted burst on hover or focus.
    SkillPill,
    /// Tighter, faster burst on hover or focus.
    SocialIcon,
}

/// An interactive element and where it currently sits, in viewport pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Region {
    pub id: ElementId,
    pub kind: RegionKind,
    pub rect: Rect,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    Scrolled { offset_y: f32 },
    Resized(Viewport),
    /// Hero text moved or disappeared.
    HeroTextMoved(Option<Rect>),
    MotionPreferenceChanged {
        preference: MotionPreference,
        system_reduced: bool,
    },
    VisibilityChanged { visible: bool },
    PreviewFreeze { frozen: bool },
    RegionEntered(Region),
    RegionFocused(Region),
    RegionLeft(Region),
}

/// How the field reacted to an event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reaction {
    None,
    SourceSet,
    SourceCleared,
    Burst(usize),
    /// Burst swallowed by the element's cooldown.
    CoolingDown,
}

#[derive(Debug, Default)]
pub struct Bindings {
    last_burst: FnvIndexMap<ElementId, u64, COOLDOWN_SLOTS>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, field: &mut DustField, event: Event) -> Reaction {
        match event {
            Event::PointerMoved { x, y } => {
                field.notify_pointer_moved(x, y);
                Reaction::None
            }
            Event::PointerLeft => {
                field.notify_pointer_left();
                Reaction::None
            }
            Event::Scrolled { offset_y } => {
                field.notify_scrolled(offset_y);
                Reaction::None
            }
            Event::Resized(viewport) => {
                field.notify_resize(viewport);
                Reaction::None
            }
            Event::HeroTextMoved(rect) => {
                field.set_emission_region(rect);
                Reaction::None
            }
            Event::MotionPreferenceChanged {
                preference,
                system_reduced,
            } => {
                field.notify_motion_preference_changed(preference, system_reduced);
                Reaction::None
            }
            Event::VisibilityChanged { visible } => {
                field.notify_visibility(visible);
                Reaction::None
            }
            Event::PreviewFreeze { frozen } => {
                field.set_preview_freeze(frozen);
                Reaction::None
            }
            Event::RegionEntered(region) => self.entered(field, &region),
            Event::RegionFocused(region) => match region.kind {
                RegionKind::SkillPill | RegionKind::SocialIcon => self.burst(field, &region),
                RegionKind::GravityWell | RegionKind::Repeller => Reaction::None,
            },
            Event::RegionLeft(region) => Self::left(field, &region),
        }
    }

    fn entered(&mut self, field: &mut DustField, region: &Region) -> Reaction {
        let (cx, cy) = region.rect.center();
        // Sources live in document space.
        let doc_y = cy + field.scroll_y();
        match region.kind {
            RegionKind::GravityWell => {
                field.set_gravity_source(Some(GravitySource::attractor(cx, doc_y)));
                Reaction::SourceSet
            }
            RegionKind::Repeller => {
                field.set_gravity_source(Some(GravitySource::repeller(cx, doc_y)));
                Reaction::SourceSet
            }
            RegionKind::SkillPill | RegionKind::SocialIcon => self.burst(field, region),
        }
    }

    // Leaving clears the slot even if another region has since claimed it.
    fn left(field: &mut DustField, region: &Region) -> Reaction {
        match region.kind {
            RegionKind::GravityWell => {
                field.set_gravity_source(None);
                field.scatter();
                Reaction::SourceCleared
            }
            RegionKind::Repeller => {
                field.set_gravity_source(None);
                Reaction::SourceCleared
            }
            RegionKind::SkillPill | RegionKind::SocialIcon => Reaction::None,
        }
    }

    fn burst(&mut self, field: &mut DustField, region: &Region) -> Reaction {
        let settings = field.settings();
        let (config, cooldown): (BurstConfig, u64) = match region.kind {
            RegionKind::SocialIcon => (settings.social_icon_burst, settings.social_icon_cooldown_ms),
            _ => (settings.skill_pill_burst, settings.skill_pill_cooldown_ms),
        };

        let now = field.now_ms();
        if let Some(&last) = self.last_burst.get(&region.id) {
            if now.saturating_sub(last) < cooldown {
                return Reaction::CoolingDown;
            }
        }
        if self.last_burst.insert(region.id, now).is_err() {
            debug!("cooldown table full, resetting");
            self.last_burst.clear();
            // Cannot fail on an empty table.
            self.last_burst.insert(region.id, now).ok();
        }

        Reaction::Burst(field.emit_burst(region.rect.center(), &config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::surface::testing::Recorder;

    fn field() -> DustField {
        let mut field =
            DustField::new(Settings::default(), Viewport::new(1440.0, 900.0)).expect("valid");
        field.start();
        field
    }

    fn region(id: ElementId, kind: RegionKind) -> Region {
        Region {
            id,
            kind,
            rect: Rect::new(600.0, 400.0, 120.0, 40.0),
        }
    }

    fn tick(field: &mut DustField, now_ms: u64) {
        field.tick(now_ms, &mut Recorder::default()).expect("infallible");
    }

    #[test]
    fn gravity_well_attracts_in_document_space() {
        let mut field = field();
        let mut bindings = Bindings::new();
        bindings.dispatch(&mut field, Event::Scrolled { offset_y: 300.0 });

        let reaction = bindings.dispatch(
            &mut field,
            Event::RegionEntered(region(1, RegionKind::GravityWell)),
        );
        assert_eq!(reaction, Reaction::SourceSet);
        assert_eq!(field.gravity_source(), Some(GravitySource::attractor(660.0, 720.0)));
    }

    #[test]
    fn leaving_gravity_well_scatters() {
        let mut field = field();
        let mut bindings = Bindings::new();
        let well = region(1, RegionKind::GravityWell);
        bindings.dispatch(&mut field, Event::RegionEntered(well));
        for p in field.particles_mut() {
            p.vx = 0.0;
            p.vy = 0.0;
        }

        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionLeft(well)),
            Reaction::SourceCleared
        );
        assert_eq!(field.gravity_source(), None);
        assert!(field.particles().iter().any(|p| p.vx != 0.0));
    }

    #[test]
    fn last_writer_wins() {
        let mut field = field();
        let mut bindings = Bindings::new();
        let card_a = region(1, RegionKind::Repeller);
        let card_b = Region {
            rect: Rect::new(100.0, 100.0, 200.0, 200.0),
            ..region(2, RegionKind::Repeller)
        };

        bindings.dispatch(&mut field, Event::RegionEntered(card_a));
        bindings.dispatch(&mut field, Event::RegionEntered(card_b));
        assert_eq!(field.gravity_source(), Some(GravitySource::repeller(200.0, 200.0)));

        // A stale leave from A still clears B's source.
        bindings.dispatch(&mut field, Event::RegionLeft(card_a));
        assert_eq!(field.gravity_source(), None);
    }

    #[test]
    fn bursts_respect_cooldown() {
        let mut field = field();
        let mut bindings = Bindings::new();
        let pill = region(7, RegionKind::SkillPill);
        tick(&mut field, 1_000);

        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionEntered(pill)),
            Reaction::Burst(14)
        );
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionFocused(pill)),
            Reaction::CoolingDown
        );

        tick(&mut field, 1_100);
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionEntered(pill)),
            Reaction::CoolingDown
        );

        tick(&mut field, 1_140);
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionEntered(pill)),
            Reaction::Burst(14)
        );
    }

    #[test]
    fn full_cooldown_table_starts_over() {
        let mut field = field();
        let mut bindings = Bindings::new();
        tick(&mut field, 1_000);

        for id in 0..COOLDOWN_SLOTS as ElementId {
            let pill = region(id, RegionKind::SkillPill);
            assert_eq!(
                bindings.dispatch(&mut field, Event::RegionFocused(pill)),
                Reaction::Burst(14)
            );
        }
        let late = region(COOLDOWN_SLOTS as ElementId, RegionKind::SkillPill);
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionFocused(late)),
            Reaction::Burst(14)
        );
        // The overflowing element is tracked in the fresh table.
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionFocused(late)),
            Reaction::CoolingDown
        );
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionFocused(region(0, RegionKind::SkillPill))),
            Reaction::Burst(14)
        );
    }

    #[test]
    fn cooldowns_are_per_element() {
        let mut field = field();
        let mut bindings = Bindings::new();
        tick(&mut field, 500);

        let icon = region(3, RegionKind::SocialIcon);
        let pill = region(4, RegionKind::SkillPill);
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionEntered(icon)),
            Reaction::Burst(22)
        );
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionEntered(pill)),
            Reaction::Burst(14)
        );

        // Social icons cool down for longer than pills.
        tick(&mut field, 650);
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionEntered(icon)),
            Reaction::CoolingDown
        );
        tick(&mut field, 660);
        assert_eq!(
            bindings.dispatch(&mut field, Event::RegionEntered(icon)),
            Reaction::Burst(22)
        );
    }

    #[test]
    fn burst_lands_around_region_center() {
        let mut field = field();
        let mut bindings = Bindings::new();
        let before: std::vec::Vec<_> = field.particles().to_vec();
        bindings.dispatch(
            &mut field,
            Event::RegionEntered(region(9, RegionKind::SocialIcon)),
        );
        let radius = field.settings().social_icon_burst.radius;
        for (now, was) in field.particles().iter().zip(&before) {
            if now != was {
                let (dx, dy) = (now.x - 660.0, now.y - 420.0);
                assert!(dx * dx + dy * dy <= radius * radius + 1e-3);
            }
        }
    }

    #[test]
    fn focus_does_not_move_sources() {
        let mut field = field();
        let mut bindings = Bindings::new();
        assert_eq!(
            bindings.dispatch(
                &mut field,
                Event::RegionFocused(region(1, RegionKind::GravityWell))
            ),
            Reaction::None
        );
        assert_eq!(field.gravity_source(), None);
    }

    #[test]
    fn page_signals_reach_the_field() {
        let mut field = field();
        let mut bindings = Bindings::new();
        let hero = Rect::new(80.0, 120.0, 640.0, 96.0);

        bindings.dispatch(&mut field, Event::PointerMoved { x: 10.0, y: 20.0 });
        bindings.dispatch(&mut field, Event::HeroTextMoved(Some(hero)));
        assert_eq!(field.pointer(), Some((10.0, 20.0)));
        assert_eq!(field.emission_region(), Some(hero));

        bindings.dispatch(&mut field, Event::PointerLeft);
        assert_eq!(field.pointer(), None);

        bindings.dispatch(
            &mut field,
            Event::MotionPreferenceChanged {
                preference: MotionPreference::Reduced,
                system_reduced: false,
            },
        );
        assert_eq!(field.particles().len(), 110);

        bindings.dispatch(&mut field, Event::PreviewFreeze { frozen: true });
        assert!(!field.clock().is_running());
        bindings.dispatch(&mut field, Event::PreviewFreeze { frozen: false });
        bindings.dispatch(&mut field, Event::VisibilityChanged { visible: false });
        assert!(!field.clock().is_running());

        bindings.dispatch(
            &mut field,
            Event::Resized(Viewport::new(390.0, 844.0).with_coarse_pointer(true)),
        );
        assert_eq!(field.quality().mouse_distance, 72.0);
    }
}
