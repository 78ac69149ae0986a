//! Axis-aligned rectangles
//!
//! Ball and paddles collide as boxes: the ball's box is its bounding square.

use glam::IVec2;

/// Rectangle with its top-left corner at `pos`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(width, height),
        }
    }

    pub fn left(&self) -> i32 {
        self.pos.x
    }

    pub fn top(&self) -> i32 {
        self.pos.y
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// True when the interiors overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0, 0, 25, 100);
        let b = Rect::new(20, 50, 20, 20);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_miss() {
        let paddle = Rect::new(0, 150, 25, 100);
        // Ball box starting exactly at the paddle's right edge
        let ball = Rect::new(25, 150, 20, 20);
        assert!(!paddle.intersects(&ball));
        // Ball box sitting right above the paddle
        let ball = Rect::new(0, 130, 20, 20);
        assert!(!paddle.intersects(&ball));
    }

    #[test]
    fn test_empty_never_intersects() {
        let a = Rect::new(0, 0, 0, 10);
        let b = Rect::new(0, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }
}
