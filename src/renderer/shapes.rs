//! Rasterization of 2D primitives
//!
//! Shapes are given in panel coordinates and converted to runs of pixels on
//! a grid where one pixel covers `scale` panel units on each axis.

use crate::sim::Rect;

/// One row of filled pixels, `x_end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: usize,
    pub x_start: usize,
    pub x_end: usize,
}

/// Pixel grid the shapes are rasterized onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub scale: f32,
}

impl Grid {
    fn clamp_x(&self, x: f32) -> usize {
        (x.max(0.0) as usize).min(self.width)
    }

    fn clamp_y(&self, y: f32) -> usize {
        (y.max(0.0) as usize).min(self.height)
    }
}

/// Every pixel the rectangle overlaps, so thin lines never vanish
pub fn rect(rect: Rect, grid: Grid) -> Vec<Span> {
    if rect.is_empty() {
        return Vec::new();
    }

    let s = grid.scale;
    let x_start = grid.clamp_x((rect.left() as f32 / s).floor());
    let x_end = grid.clamp_x((rect.right() as f32 / s).ceil());
    let y_start = grid.clamp_y((rect.top() as f32 / s).floor());
    let y_end = grid.clamp_y((rect.bottom() as f32 / s).ceil());

    if x_start >= x_end {
        return Vec::new();
    }
    (y_start..y_end)
        .map(|y| Span { y, x_start, x_end })
        .collect()
}

/// Pixels whose centers fall inside the ellipse inscribed in `bounds`.
/// An ellipse smaller than a pixel still lights the pixel at its center.
pub fn ellipse(bounds: Rect, grid: Grid) -> Vec<Span> {
    if bounds.is_empty() {
        return Vec::new();
    }

    let s = grid.scale;
    let a = bounds.size.x as f32 / 2.0;
    let b = bounds.size.y as f32 / 2.0;
    let cx = bounds.left() as f32 + a;
    let cy = bounds.top() as f32 + b;

    let mut spans = Vec::new();
    let y_start = grid.clamp_y((bounds.top() as f32 / s).floor());
    let y_end = grid.clamp_y((bounds.bottom() as f32 / s).ceil());

    for y in y_start..y_end {
        let dy = ((y as f32 + 0.5) * s - cy) / b;
        if dy * dy > 1.0 {
            continue;
        }
        let half_width = a * (1.0 - dy * dy).sqrt();
        // Pixel i is lit when its center (i + 0.5) * s lies in [cx - hw, cx + hw]
        let first = ((cx - half_width) / s - 0.5).ceil();
        let last = ((cx + half_width) / s - 0.5).floor();
        if last < first {
            continue;
        }
        let x_start = grid.clamp_x(first);
        let x_end = grid.clamp_x(last + 1.0);
        if x_start < x_end {
            spans.push(Span { y, x_start, x_end });
        }
    }

    if spans.is_empty() {
        let (x, y) = ((cx / s).floor(), (cy / s).floor());
        if x >= 0.0 && y >= 0.0 && (x as usize) < grid.width && (y as usize) < grid.height {
            spans.push(Span {
                y: y as usize,
                x_start: x as usize,
                x_end: x as usize + 1,
            });
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: Grid = Grid {
        width: 140,
        height: 80,
        scale: 5.0,
    };

    #[test]
    fn test_thin_line_covers_a_column() {
        let spans = rect(Rect::new(350, 0, 2, 400), GRID);
        assert_eq!(spans.len(), 80);
        assert!(spans.iter().all(|s| s.x_start == 70 && s.x_end == 71));
    }

    #[test]
    fn test_rect_clipped_to_grid() {
        let spans = rect(Rect::new(-20, 390, 40, 40), GRID);
        assert_eq!(
            spans,
            vec![
                Span { y: 78, x_start: 0, x_end: 4 },
                Span { y: 79, x_start: 0, x_end: 4 },
            ]
        );
    }

    #[test]
    fn test_rect_off_grid_is_empty() {
        assert!(rect(Rect::new(-40, 100, 20, 20), GRID).is_empty());
        assert!(rect(Rect::new(720, 100, 20, 20), GRID).is_empty());
    }

    #[test]
    fn test_ball_ellipse() {
        // 20px ball at (340, 190): 4x4 pixel box at (68, 38)
        let spans = ellipse(Rect::new(340, 190, 20, 20), GRID);
        assert_eq!(spans.len(), 4);
        for span in &spans {
            assert!(span.x_start >= 68 && span.x_end <= 72);
            assert!((38..42).contains(&span.y));
        }
        // Middle rows are full width
        assert_eq!(spans[1], Span { y: 39, x_start: 68, x_end: 72 });
    }

    #[test]
    fn test_tiny_ellipse_lights_center() {
        let spans = ellipse(Rect::new(101, 101, 1, 1), GRID);
        assert_eq!(spans, vec![Span { y: 20, x_start: 20, x_end: 21 }]);
    }
}
