//! quality - Adaptive quality tiers derived from viewport and motion signals

use crate::settings::Settings;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tier {
    Reduced,
    Mobile,
    Tablet,
    Desktop,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Reduced, Tier::Mobile, Tier::Tablet, Tier::Desktop];
}

/// One value per quality tier.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tiered<T> {
    pub reduced: T,
    pub mobile: T,
    pub tablet: T,
    pub desktop: T,
}

impl<T: Copy> Tiered<T> {
    pub const fn new(reduced: T, mobile: T, tablet: T, desktop: T) -> Self {
        Self {
            reduced,
            mobile,
            tablet,
            desktop,
        }
    }

    pub fn get(&self, tier: Tier) -> T {
        match tier {
            Tier::Reduced => self.reduced,
            Tier::Mobile => self.mobile,
            Tier::Tablet => self.tablet,
            Tier::Desktop => self.desktop,
        }
    }
}

/// Tri-state motion preference as chosen by the user.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum MotionPreference {
    /// Follow the operating system setting.
    #[default]
    System,
    Reduced,
    Full,
}

impl MotionPreference {
    /// Whether motion should be reduced, given the system setting.
    pub fn is_reduced(self, system_reduced: bool) -> bool {
        match self {
            MotionPreference::System => system_reduced,
            MotionPreference::Reduced => true,
            MotionPreference::Full => false,
        }
    }

    pub fn next(self) -> Self {
        match self {
            MotionPreference::System => MotionPreference::Reduced,
            MotionPreference::Reduced => MotionPreference::Full,
            MotionPreference::Full => MotionPreference::System,
        }
    }
}

/// Visible area the field covers, in pixels. Dimensions are never negative.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    coarse_pointer: bool,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            coarse_pointer: false,
        }
    }

    pub fn with_coarse_pointer(mut self, coarse_pointer: bool) -> Self {
        self.coarse_pointer = coarse_pointer;
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn coarse_pointer(&self) -> bool {
        self.coarse_pointer
    }

    /// Zero-area viewports exist before the first layout.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Toroidal wrap: leaving one edge re-enters exactly at the opposite one.
    pub fn wrap(&self, mut x: f32, mut y: f32) -> (f32, f32) {
        if x < 0.0 {
            x = self.width;
        } else if x > self.width {
            x = 0.0;
        }
        if y < 0.0 {
            y = self.height;
        } else if y > self.height {
            y = 0.0;
        }
        (x, y)
    }

    pub fn confine(&self, x: f32, y: f32) -> (f32, f32) {
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }
}

/// Everything the clock and emitter need to know about the current tier.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quality {
    pub tier: Tier,
    pub pool_size: usize,
    pub emit_per_tick: usize,
    pub update_stride: u32,
    pub emit_speed: f32,
    pub emit_jitter: f32,
    pub mouse_distance: f32,
}

impl Quality {
    pub fn resolve(settings: &Settings, viewport: &Viewport, reduced_motion: bool) -> Self {
        let tier = classify(settings, viewport, reduced_motion);
        let mouse_distance = if viewport.width() <= settings.mobile_max_width {
            settings.mouse_distance_narrow
        } else {
            settings.mouse_distance_wide
        };
        Self {
            tier,
            pool_size: settings.pool_size.get(tier),
            emit_per_tick: settings.emit_per_tick.get(tier),
            update_stride: settings.update_stride.get(tier).max(1),
            emit_speed: settings.emit_speed.get(tier),
            emit_jitter: settings.emit_jitter.get(tier),
            mouse_distance,
        }
    }
}

pub fn classify(settings: &Settings, viewport: &Viewport, reduced_motion: bool) -> Tier {
    if reduced_motion {
        Tier::Reduced
    } else if viewport.coarse_pointer() || viewport.width() <= settings.mobile_max_width {
        Tier::Mobile
    } else if viewport.width() <= settings.tablet_max_width {
        Tier::Tablet
    } else {
        Tier::Desktop
    }
}
