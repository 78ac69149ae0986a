//! The match: paddles, ball, score and game-over state

use std::sync::Arc;
use std::time::Duration;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::{Ball, Paddle, Side};
use crate::platform::input::InputState;
use crate::renderer::{Canvas, Font, colors};
use crate::scheduler::{Flow, FrameContext, Simulation, TickContext};
use crate::settings::Settings;

/// Stats overlay font
const STATS_FONT: Font = Font { size: 20 };

#[derive(Debug)]
pub struct Scene {
    input: Arc<InputState>,
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    left_score: u32,
    right_score: u32,
    winning_score: u32,
    game_over: bool,
    panel: IVec2,
    rng: Pcg32,
    /// Whole seconds played, frozen once the match ends
    time_in_game: u64,
}

impl Scene {
    /// New match seeded from settings, or randomly when no seed is set
    pub fn new(settings: &Settings, input: Arc<InputState>) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("New match (seed {seed})");
        Self::with_rng(settings, input, Pcg32::seed_from_u64(seed))
    }

    pub fn with_rng(settings: &Settings, input: Arc<InputState>, mut rng: Pcg32) -> Self {
        Self {
            input,
            left: Paddle::new(Side::Left, settings),
            right: Paddle::new(Side::Right, settings),
            ball: Ball::new(settings, &mut rng),
            left_score: 0,
            right_score: 0,
            winning_score: settings.winning_score,
            game_over: false,
            panel: settings.panel_size(),
            rng,
            time_in_game: 0,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Award a point. Reaching the winning score ends the match for good.
    pub fn on_score(&mut self, side: Side) {
        if self.game_over {
            return;
        }

        let score = match side {
            Side::Left => &mut self.left_score,
            Side::Right => &mut self.right_score,
        };
        *score += 1;
        let score = *score;
        log::info!("{side:?} scores ({score}/{})", self.winning_score);

        if score >= self.winning_score {
            self.game_over = true;
            log::info!(
                "Game over: {} - {}",
                self.left_score,
                self.right_score
            );
        }
    }

    fn draw_stats(&mut self, canvas: &mut dyn Canvas, elapsed: Duration) {
        let (width, height) = (self.panel.x, self.panel.y);

        canvas.draw_text(
            &format!("Score - {}/{}", self.left_score, self.winning_score),
            IVec2::new(5, height - 5),
            colors::TEXT,
            STATS_FONT,
        );
        canvas.draw_text(
            &format!("Score - {}/{}", self.right_score, self.winning_score),
            IVec2::new(width - 115, height - 5),
            colors::TEXT,
            STATS_FONT,
        );

        if self.game_over {
            canvas.draw_text(
                &format!("Game Over! Time - {}", self.time_in_game),
                IVec2::new(5, 20),
                colors::TEXT,
                STATS_FONT,
            );
        } else {
            self.time_in_game = elapsed.as_secs();
            canvas.draw_text(
                &format!("Game time - {}", self.time_in_game),
                IVec2::new(5, 20),
                colors::TEXT,
                STATS_FONT,
            );
        }
    }
}

impl Simulation for Scene {
    fn tick(&mut self, ctx: TickContext) -> Flow {
        if self.game_over {
            return Flow::Continue;
        }

        let input = self.input.sample();
        self.left.update(input.for_side(Side::Left));
        self.right.update(input.for_side(Side::Right));

        // Pausing freezes the ball only; paddles stay live
        if !ctx.paused {
            let (left, right) = (self.left.rect(), self.right.rect());
            if let Some(side) = self.ball.update(&left, &right, &mut self.rng) {
                self.on_score(side);
            }
        }

        if input.quit {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    fn render(&mut self, canvas: &mut dyn Canvas, frame: FrameContext) {
        let (width, height) = (self.panel.x, self.panel.y);

        canvas.fill_rect(Rect::new(0, 0, width, height), colors::BACKGROUND);
        canvas.fill_rect(Rect::new(width / 2, 0, 2, height), colors::CENTERLINE);

        canvas.fill_rect(self.left.rect(), colors::PADDLE);
        canvas.fill_rect(self.right.rect(), colors::PADDLE);
        canvas.fill_ellipse(self.ball.rect(), colors::BALL);

        self.draw_stats(canvas, frame.elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::input::Key;
    use crate::renderer::Color;

    #[derive(Debug, PartialEq)]
    enum Op {
        Rect(Rect, Color),
        Ellipse(Rect, Color),
        Text(String, IVec2),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Canvas for Recorder {
        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(Op::Rect(rect, color));
        }

        fn fill_ellipse(&mut self, bounds: Rect, color: Color) {
            self.ops.push(Op::Ellipse(bounds, color));
        }

        fn draw_text(&mut self, text: &str, origin: IVec2, _color: Color, _font: Font) {
            self.ops.push(Op::Text(text.to_string(), origin));
        }
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    fn scene() -> (Scene, Arc<InputState>) {
        let input = Arc::new(InputState::default());
        let scene = Scene::with_rng(
            &Settings::default(),
            Arc::clone(&input),
            Pcg32::seed_from_u64(42),
        );
        (scene, input)
    }

    const RUNNING: TickContext = TickContext {
        paused: false,
        catch_up: false,
    };

    #[test]
    fn test_fifth_point_ends_match() {
        let (mut scene, _) = scene();
        for point in 1..=4 {
            scene.on_score(Side::Right);
            assert_eq!(scene.score(Side::Right), point);
            assert!(!scene.is_game_over());
        }

        scene.on_score(Side::Right);
        assert!(scene.is_game_over());

        // Nothing changes afterwards
        scene.on_score(Side::Right);
        scene.on_score(Side::Left);
        assert_eq!(scene.score(Side::Right), 5);
        assert_eq!(scene.score(Side::Left), 0);
        assert!(scene.is_game_over());
    }

    #[test]
    fn test_ball_leaving_left_scores_right() {
        let (mut scene, _) = scene();
        scene.ball.pos = IVec2::new(-20, 100);
        scene.ball.vel = IVec2::new(-10, 10);

        assert_eq!(scene.tick(RUNNING), Flow::Continue);
        assert_eq!(scene.score(Side::Right), 1);
        assert_eq!(scene.ball.pos - scene.ball.vel, IVec2::new(340, 190));
    }

    #[test]
    fn test_pause_freezes_ball_only() {
        let (mut scene, input) = scene();
        input.press(Key::LeftUp);
        input.press(Key::RightDown);
        let ball = scene.ball.clone();

        scene.tick(TickContext {
            paused: true,
            catch_up: false,
        });

        assert_eq!(scene.ball, ball);
        assert_eq!(scene.left.pos.y, 135);
        assert_eq!(scene.right.pos.y, 165);
    }

    #[test]
    fn test_game_over_stops_updates() {
        let (mut scene, input) = scene();
        for _ in 0..5 {
            scene.on_score(Side::Left);
        }
        input.press(Key::LeftUp);
        let ball = scene.ball.clone();

        scene.tick(RUNNING);
        assert_eq!(scene.ball, ball);
        assert_eq!(scene.left.pos.y, 150);
    }

    #[test]
    fn test_quit_key_stops() {
        let (mut scene, input) = scene();
        input.press(Key::Quit);
        assert_eq!(scene.tick(RUNNING), Flow::Stop);
        input.release(Key::Quit);
        assert_eq!(scene.tick(RUNNING), Flow::Continue);
    }

    #[test]
    fn test_render_draws_table() {
        let (mut scene, _) = scene();
        let mut canvas = Recorder::default();
        scene.render(
            &mut canvas,
            FrameContext {
                elapsed: Duration::from_millis(3_500),
            },
        );

        assert_eq!(
            canvas.ops[0],
            Op::Rect(Rect::new(0, 0, 700, 400), colors::BACKGROUND)
        );
        assert_eq!(
            canvas.ops[1],
            Op::Rect(Rect::new(350, 0, 2, 400), colors::CENTERLINE)
        );
        assert!(canvas.ops.contains(&Op::Rect(scene.left.rect(), colors::PADDLE)));
        assert!(canvas.ops.contains(&Op::Rect(scene.right.rect(), colors::PADDLE)));
        assert!(canvas.ops.contains(&Op::Ellipse(scene.ball.rect(), colors::BALL)));
        assert!(canvas.ops.contains(&Op::Text("Score - 0/5".into(), IVec2::new(5, 395))));
        assert!(canvas.ops.contains(&Op::Text("Score - 0/5".into(), IVec2::new(585, 395))));
        assert!(canvas.texts().contains(&"Game time - 3"));
    }

    #[test]
    fn test_game_over_freezes_timer() {
        let (mut scene, _) = scene();
        let mut canvas = Recorder::default();
        scene.render(
            &mut canvas,
            FrameContext {
                elapsed: Duration::from_secs(42),
            },
        );
        for _ in 0..5 {
            scene.on_score(Side::Left);
        }

        let mut canvas = Recorder::default();
        scene.render(
            &mut canvas,
            FrameContext {
                elapsed: Duration::from_secs(90),
            },
        );
        let texts = canvas.texts();
        assert!(texts.contains(&"Game Over! Time - 42"));
        assert!(texts.contains(&"Score - 5/5"));
        assert!(!texts.iter().any(|t| t.starts_with("Game time")));
    }
}
