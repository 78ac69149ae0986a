//! The ball
//!
//! Moves a fixed number of pixels per tick on each axis. Bounces only flip
//! the sign of a velocity component, so per-axis speed never changes over a
//! match.

use glam::IVec2;
use rand::Rng;

use super::Side;
use super::collision::Rect;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ball {
    /// Top-left corner of the bounding square
    pub pos: IVec2,
    /// Pixels per tick
    pub vel: IVec2,
    pub radius: i32,
    panel: IVec2,
}

impl Ball {
    /// A ball in the middle of the table, already reset once
    pub fn new(settings: &Settings, rng: &mut impl Rng) -> Self {
        let step = settings.ball.step;
        let mut ball = Self {
            pos: IVec2::ZERO,
            vel: IVec2::new(step, step),
            radius: settings.ball.radius,
            panel: settings.panel_size(),
        };
        ball.reset(rng);
        ball
    }

    pub fn diameter(&self) -> i32 {
        self.radius * 2
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: IVec2::splat(self.diameter()),
        }
    }

    /// Advance one tick. Returns the side that won a point, if any.
    pub fn update(&mut self, left: &Rect, right: &Rect, rng: &mut impl Rng) -> Option<Side> {
        let scored = if self.bounce_off_paddles(left, right) {
            None
        } else {
            self.check_walls(rng)
        };

        self.pos += self.vel;
        scored
    }

    /// Re-center and flip exactly one axis of the velocity.
    ///
    /// The flip ignores who conceded, so the ball can head back toward the
    /// side that just lost the point.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.pos = self.panel / 2 - IVec2::splat(self.radius);

        if rng.random_bool(0.5) {
            self.vel.x = -self.vel.x;
        } else {
            self.vel.y = -self.vel.y;
        }
    }

    fn bounce_off_paddles(&mut self, left: &Rect, right: &Rect) -> bool {
        let bounds = self.rect();

        if bounds.intersects(left) {
            self.vel.x = -self.vel.x;
            // Push clear of the paddle so the next tick doesn't hit it again
            self.pos.x += (self.vel.x / 2).abs();
            true
        } else if bounds.intersects(right) {
            self.vel.x = -self.vel.x;
            self.pos.x -= (self.vel.x / 2).abs();
            true
        } else {
            false
        }
    }

    fn check_walls(&mut self, rng: &mut impl Rng) -> Option<Side> {
        let size = self.diameter();

        if self.pos.y <= 0 && self.vel.y < 0 {
            self.vel.y = -self.vel.y;
            None
        } else if self.pos.y + size >= self.panel.y && self.vel.y > 0 {
            self.vel.y = -self.vel.y;
            None
        } else if self.pos.x + size <= 0 && self.vel.x < 0 {
            self.reset(rng);
            Some(Side::Right)
        } else if self.pos.x >= self.panel.x && self.vel.x > 0 {
            self.reset(rng);
            Some(Side::Left)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Paddle;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Ball, Rect, Rect, Pcg32) {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let ball = Ball::new(&settings, &mut rng);
        let left = Paddle::new(Side::Left, &settings).rect();
        let right = Paddle::new(Side::Right, &settings).rect();
        (ball, left, right, rng)
    }

    #[test]
    fn test_new_is_centered() {
        let (ball, _, _, _) = setup();
        assert_eq!(ball.pos, IVec2::new(340, 190));
        assert_eq!(ball.vel.abs(), IVec2::splat(10));
    }

    #[test]
    fn test_left_exit_scores_for_right() {
        let (mut ball, left, right, mut rng) = setup();
        ball.pos = IVec2::new(-20, 100);
        ball.vel = IVec2::new(-10, 10);

        assert_eq!(ball.update(&left, &right, &mut rng), Some(Side::Right));
        // Reset happened before the move
        assert_eq!(ball.pos - ball.vel, IVec2::new(340, 190));
        let flipped = (ball.vel.x != -10) as u32 + (ball.vel.y != 10) as u32;
        assert_eq!(flipped, 1);
    }

    #[test]
    fn test_almost_off_screen_keeps_going() {
        let (mut ball, left, right, mut rng) = setup();
        ball.pos = IVec2::new(-15, 100);
        ball.vel = IVec2::new(-10, 10);

        assert_eq!(ball.update(&left, &right, &mut rng), None);
        assert_eq!(ball.pos, IVec2::new(-25, 110));
    }

    #[test]
    fn test_right_exit_scores_for_left() {
        let (mut ball, left, right, mut rng) = setup();
        ball.pos = IVec2::new(700, 100);
        ball.vel = IVec2::new(10, -10);

        assert_eq!(ball.update(&left, &right, &mut rng), Some(Side::Left));
        assert_eq!(ball.pos - ball.vel, IVec2::new(340, 190));
    }

    #[test]
    fn test_wall_bounces() {
        let (mut ball, left, right, mut rng) = setup();

        ball.pos = IVec2::new(300, 0);
        ball.vel = IVec2::new(10, -10);
        ball.update(&left, &right, &mut rng);
        assert_eq!(ball.vel, IVec2::new(10, 10));
        assert_eq!(ball.pos, IVec2::new(310, 10));

        ball.pos = IVec2::new(300, 380);
        ball.update(&left, &right, &mut rng);
        assert_eq!(ball.vel, IVec2::new(10, -10));
        assert_eq!(ball.pos, IVec2::new(310, 370));
    }

    #[test]
    fn test_left_paddle_bounce_nudges_right() {
        let (mut ball, left, right, mut rng) = setup();
        ball.pos = IVec2::new(20, 160);
        ball.vel = IVec2::new(-10, 10);

        assert_eq!(ball.update(&left, &right, &mut rng), None);
        assert_eq!(ball.vel, IVec2::new(10, 10));
        // 20 + nudge 5 + step 10
        assert_eq!(ball.pos, IVec2::new(35, 170));
    }

    #[test]
    fn test_right_paddle_bounce_nudges_left() {
        let (mut ball, left, right, mut rng) = setup();
        ball.pos = IVec2::new(660, 160);
        ball.vel = IVec2::new(10, 10);

        ball.update(&left, &right, &mut rng);
        assert_eq!(ball.vel, IVec2::new(-10, 10));
        assert_eq!(ball.pos, IVec2::new(645, 170));
    }

    #[test]
    fn test_paddle_hit_skips_wall_check() {
        let (mut ball, _, right, mut rng) = setup();
        let left = Rect::new(0, 0, 25, 100);
        ball.pos = IVec2::new(20, 0);
        ball.vel = IVec2::new(-10, -10);

        ball.update(&left, &right, &mut rng);
        // Vertical velocity untouched even though the ball is on the top edge
        assert_eq!(ball.vel, IVec2::new(10, -10));
        assert_eq!(ball.pos, IVec2::new(35, -10));
    }

    #[test]
    fn test_reset_flips_one_axis_evenly() {
        let (mut ball, _, _, mut rng) = setup();
        let trials = 10_000;
        let mut x_flips = 0;

        for _ in 0..trials {
            let before = ball.vel;
            ball.reset(&mut rng);
            let x_flipped = ball.vel.x != before.x;
            let y_flipped = ball.vel.y != before.y;
            assert!(x_flipped ^ y_flipped);
            if x_flipped {
                x_flips += 1;
            }
        }

        assert!((4_700..=5_300).contains(&x_flips), "x flipped {x_flips} times");
    }

    proptest! {
        #[test]
        fn speed_is_invariant(
            seed in any::<u64>(),
            left_y in 0..=300i32,
            right_y in 0..=300i32,
            ticks in 1..3_000usize,
        ) {
            let settings = Settings::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ball = Ball::new(&settings, &mut rng);
            let left = Rect::new(0, left_y, 25, 100);
            let right = Rect::new(675, right_y, 25, 100);

            for _ in 0..ticks {
                ball.update(&left, &right, &mut rng);
                prop_assert_eq!(ball.vel.abs(), IVec2::splat(10));
            }
        }
    }
}
