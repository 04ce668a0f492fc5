//! surface - Drawing surface the field renders onto

/// 8-bit RGB colour.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend from `self` toward `other`, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t + 0.5) as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Composite `self` at `alpha` over an opaque background.
    pub fn over(self, background: Rgb, alpha: f32) -> Rgb {
        background.lerp(self, alpha)
    }
}

/// Anything the field can be drawn on.
///
/// The field clears the surface once per stepped tick, then fills one circle
/// per particle.
pub trait Surface {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;

    fn fill_circle(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        color: Rgb,
        alpha: f32,
    ) -> Result<(), Self::Error>;
}

#[cfg(feature = "graphics")]
pub use canvas::PageCanvas;

#[cfg(feature = "graphics")]
mod canvas {
    use embedded_graphics::{
        pixelcolor::Rgb888,
        prelude::*,
        primitives::{Circle, PrimitiveStyle},
    };

    use super::{Rgb, Surface};

    /// Adapts an `embedded-graphics` target into a [`Surface`].
    ///
    /// `Rgb888` has no alpha channel, so particle opacity is composited
    /// against the page background colour.
    pub struct PageCanvas<'a, D> {
        target: &'a mut D,
        background: Rgb,
    }

    impl<'a, D> PageCanvas<'a, D>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        pub fn new(target: &'a mut D, background: Rgb) -> Self {
            Self { target, background }
        }
    }

    impl<D> Surface for PageCanvas<'_, D>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        type Error = D::Error;

        fn clear(&mut self) -> Result<(), Self::Error> {
            let bg = self.background;
            self.target.clear(Rgb888::new(bg.r, bg.g, bg.b))
        }

        fn fill_circle(
            &mut self,
            x: f32,
            y: f32,
            radius: f32,
            color: Rgb,
            alpha: f32,
        ) -> Result<(), Self::Error> {
            let c = color.over(self.background, alpha);
            // Sub-pixel dust still covers one pixel.
            let diameter = ((radius * 2.0) + 0.5).max(1.0) as u32;
            let center = Point::new((x + 0.5) as i32, (y + 0.5) as i32);
            Circle::with_center(center, diameter)
                .into_styled(PrimitiveStyle::with_fill(Rgb888::new(c.r, c.g, c.b)))
                .draw(&mut *self.target)
        }
    }
}
