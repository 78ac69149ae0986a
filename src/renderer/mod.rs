//! Rendering module
//!
//! The scene draws through `Canvas` into an offscreen buffer owned by a
//! `Surface`; `present` copies the finished frame to the visible output.

pub mod framebuffer;
pub mod shapes;
pub mod terminal;

pub use framebuffer::{FrameBuffer, Label};
pub use terminal::TerminalSurface;

use glam::IVec2;

use crate::error::PresentError;
use crate::sim::Rect;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Source-over blend onto an opaque destination
    pub fn over(self, dst: Color) -> Color {
        let alpha = self.a as u32;
        let mix = |src: u8, dst: u8| ((src as u32 * alpha + dst as u32 * (255 - alpha)) / 255) as u8;
        Color::rgb(mix(self.r, dst.r), mix(self.g, dst.g), mix(self.b, dst.b))
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = Color::BLACK;
    pub const CENTERLINE: Color = Color::WHITE;
    pub const PADDLE: Color = Color::WHITE;
    pub const BALL: Color = Color::WHITE;
    /// Translucent white for the stats overlay
    pub const TEXT: Color = Color::rgba(255, 255, 255, 200);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    /// Nominal height in panel pixels
    pub size: u16,
}

/// Primitive drawing operations in panel coordinates
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Ellipse inscribed in `bounds`
    fn fill_ellipse(&mut self, bounds: Rect, color: Color);

    /// Text with its baseline starting at `origin`
    fn draw_text(&mut self, text: &str, origin: IVec2, color: Color, font: Font);
}

/// Offscreen buffer plus the visible output it is copied to
pub trait Surface {
    /// The offscreen canvas for the next frame, or `None` if it cannot be
    /// created right now. Callers skip rendering and try again next frame.
    fn canvas(&mut self) -> Option<&mut dyn Canvas>;

    /// Copy the last rendered frame to the visible output
    fn present(&mut self) -> Result<(), PresentError>;
}
