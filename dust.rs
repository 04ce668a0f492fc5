//! dust-field - Decorative dust particles behind a page
//! Fixed-capacity pool, no heap allocation, no_std compatible
//!
//! [`DustField`] owns the simulation. Page code pushes geometry and input in
//! through [`Bindings`] (or the `notify_*` methods directly) and calls
//! [`DustField::tick`] once per display frame with any [`Surface`].

#![cfg_attr(not(test), no_std)]

pub mod bindings;
pub mod clock;
pub mod emitter;
pub mod error;
pub mod field;
pub mod particle;
pub mod quality;
pub mod settings;
pub mod sim;
pub mod surface;

pub use bindings::{Bindings, ElementId, Event, Reaction, Region, RegionKind};
pub use clock::{Frame, FrameClock};
pub use emitter::{BurstConfig, Rect};
pub use error::ConfigError;
pub use field::{ForceField, GravitySource};
pub use particle::{Particle, Tint};
pub use quality::{MotionPreference, Quality, Tier, Tiered, Viewport};
pub use settings::Settings;
pub use sim::{DustField, TickOutcome, POOL_CAPACITY};
pub use surface::{Rgb, Surface};

#[cfg(feature = "graphics")]
pub use surface::PageCanvas;
