//! Offscreen frame buffer
//!
//! A software raster of the panel at a reduced resolution. Text is not
//! rasterized; it is kept as labels for the presenter to place.

use glam::IVec2;

use super::shapes::{self, Grid, Span};
use super::{Canvas, Color, Font};
use crate::sim::Rect;

/// Text drawn during the current frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub origin: IVec2,
    pub color: Color,
    pub font: Font,
}

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    grid: Grid,
    pixels: Vec<Color>,
    labels: Vec<Label>,
}

impl FrameBuffer {
    /// Largest buffer with square pixels that fits in `max_width` x `max_height`
    pub fn fit(panel: IVec2, max_width: usize, max_height: usize) -> Self {
        let scale = (panel.x as f32 / max_width.max(1) as f32)
            .max(panel.y as f32 / max_height.max(1) as f32);
        let width = ((panel.x as f32 / scale).ceil() as usize).min(max_width);
        let height = ((panel.y as f32 / scale).ceil() as usize).min(max_height);

        Self {
            grid: Grid {
                width,
                height,
                scale,
            },
            pixels: vec![Color::BLACK; width * height],
            labels: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    /// Panel pixels per buffer pixel
    pub fn scale(&self) -> f32 {
        self.grid.scale
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.grid.width && y < self.grid.height {
            Some(self.pixels[y * self.grid.width + x])
        } else {
            None
        }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Drop last frame's text; pixels are simply painted over
    pub fn begin_frame(&mut self) {
        self.labels.clear();
    }

    fn fill_spans(&mut self, spans: Vec<Span>, color: Color) {
        let width = self.grid.width;
        for span in spans {
            let row = &mut self.pixels[span.y * width..(span.y + 1) * width];
            for pixel in &mut row[span.x_start..span.x_end] {
                *pixel = if color.a == 255 { color } else { color.over(*pixel) };
            }
        }
    }
}

impl Canvas for FrameBuffer {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let spans = shapes::rect(rect, self.grid);
        self.fill_spans(spans, color);
    }

    fn fill_ellipse(&mut self, bounds: Rect, color: Color) {
        let spans = shapes::ellipse(bounds, self.grid);
        self.fill_spans(spans, color);
    }

    fn draw_text(&mut self, text: &str, origin: IVec2, color: Color, font: Font) {
        self.labels.push(Label {
            text: text.to_string(),
            origin,
            color,
            font,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> FrameBuffer {
        FrameBuffer::fit(IVec2::new(700, 400), 140, 80)
    }

    #[test]
    fn test_fit_keeps_aspect() {
        let fb = buffer();
        assert_eq!((fb.width(), fb.height()), (140, 80));
        assert_eq!(fb.scale(), 5.0);

        // An 80x24 terminal gives 80x48 pixels; width is the limit
        let fb = FrameBuffer::fit(IVec2::new(700, 400), 80, 48);
        assert_eq!(fb.width(), 80);
        assert_eq!(fb.height(), 46);
    }

    #[test]
    fn test_fill_rect() {
        let mut fb = buffer();
        fb.fill_rect(Rect::new(0, 150, 25, 100), Color::WHITE);
        assert_eq!(fb.pixel(0, 30), Some(Color::WHITE));
        assert_eq!(fb.pixel(4, 49), Some(Color::WHITE));
        assert_eq!(fb.pixel(5, 30), Some(Color::BLACK));
        assert_eq!(fb.pixel(0, 29), Some(Color::BLACK));
        assert_eq!(fb.pixel(140, 0), None);
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut fb = buffer();
        fb.fill_rect(Rect::new(0, 0, 5, 5), Color::rgba(255, 255, 255, 200));
        assert_eq!(fb.pixel(0, 0), Some(Color::rgb(200, 200, 200)));
    }

    #[test]
    fn test_labels_reset_each_frame() {
        let mut fb = buffer();
        let font = Font { size: 20 };
        fb.draw_text("Score - 1/5", IVec2::new(5, 395), Color::WHITE, font);
        assert_eq!(fb.labels().len(), 1);
        assert_eq!(fb.labels()[0].text, "Score - 1/5");

        fb.begin_frame();
        assert!(fb.labels().is_empty());
    }
}
