//! Player paddles

use glam::IVec2;

use super::Side;
use super::collision::Rect;
use crate::platform::input::PaddleIntent;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paddle {
    pub side: Side,
    /// Top-left corner
    pub pos: IVec2,
    pub size: IVec2,
    /// Pixels moved per tick while a key is held
    pub step: i32,
    panel_height: i32,
}

impl Paddle {
    /// Paddle flush against its side wall, vertically centered
    pub fn new(side: Side, settings: &Settings) -> Self {
        let size = IVec2::new(settings.paddle.width, settings.paddle.height);
        let x = match side {
            Side::Left => 0,
            Side::Right => settings.panel.width - size.x,
        };
        Self {
            side,
            pos: IVec2::new(x, settings.panel.height / 2 - size.y / 2),
            size,
            step: settings.paddle.step,
            panel_height: settings.panel.height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Move according to this paddle's half of the input. Up before down.
    pub fn update(&mut self, intent: PaddleIntent) {
        if intent.up {
            self.move_up();
        }
        if intent.down {
            self.move_down();
        }
    }

    // Overshooting the top snaps to 0; overshooting the bottom cancels the move
    fn move_up(&mut self) {
        if self.pos.y - self.step <= 0 {
            self.pos.y = 0;
        } else {
            self.pos.y -= self.step;
        }
    }

    fn move_down(&mut self) {
        if self.pos.y + self.step + self.size.y <= self.panel_height {
            self.pos.y += self.step;
        }
    }
}
