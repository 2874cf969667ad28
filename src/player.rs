use std::time::Duration;

use crate::consts::{game::*, screen};
use crate::geom::{Rect, Vec2};

/// Horizontal speed in units per frame after `elapsed` of play.
pub fn player_speed(elapsed: Duration) -> u32 {
    PLAYER_SPEED_INITIAL + (elapsed.as_secs() / PLAYER_SPEED_STEP_SECS) as u32
}

#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub speed: u32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            rect: Rect::centered_at(
                Vec2::new(screen::WIDTH / 2.0, screen::HEIGHT - PLAYER_BOTTOM_OFFSET),
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            speed: PLAYER_SPEED_INITIAL,
        }
    }

    pub fn update(&mut self, left: bool, right: bool, elapsed: Duration) {
        let step = self.speed as f32;
        if left {
            self.rect.x -= step;
        }
        if right {
            self.rect.x += step;
        }

        // Keep the whole sprite on screen.
        self.rect.x = self.rect.x.clamp(0.0, screen::WIDTH - self.rect.w);

        self.speed = player_speed(elapsed);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
