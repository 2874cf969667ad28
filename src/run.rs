//! One play-through: everything that happens between START and the first hit.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::consts::{game::*, screen};
use crate::geom::{Rect, Vec2};
use crate::input::Input;
use crate::obstacles::{DiagonalField, FallingField, hit_box, obstacle_speed, spawn_interval};
use crate::player::Player;
use crate::render::{
    BLACK, BLUE, FLOATING, LIGHT_GRAY, OBSTACLE_DARK, PLAYER_HI, PixelBuf, RED, TELEGRAPH, WHITE,
    draw_number,
};

/// Ten points per second of survival.
pub fn score_for(elapsed: Duration) -> u32 {
    (elapsed.as_millis() / 100).min(u32::MAX as u128) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    Collided { score: u32 },
}

/// Scale-pulse shown when a multiple of 100 is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub started: Duration,
    pub value: u32,
}

impl Pulse {
    /// Linear up to full size over the first half, back down over the second.
    /// `None` once the pulse has finished.
    pub fn scale(&self, now: Duration) -> Option<f32> {
        let t = now.checked_sub(self.started)?;
        if t >= MILESTONE_PULSE {
            return None;
        }
        let progress = t.as_secs_f32() / MILESTONE_PULSE.as_secs_f32();
        let scale = if progress < 0.5 {
            progress * 2.0
        } else {
            (1.0 - progress) * 2.0
        };
        Some(scale.max(MILESTONE_MIN_SCALE))
    }
}

/// Decorative text drifting behind the playfield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingText {
    pub rect: Rect,
    pub vel: Vec2,
}

impl FloatingText {
    pub fn new() -> Self {
        let (vx, vy) = FLOATING_TEXT_VELOCITY;
        Self {
            rect: Rect::new(
                screen::WIDTH / 3.0,
                screen::HEIGHT / 3.0,
                FLOATING_TEXT.len() as f32 * 16.0,
                24.0,
            ),
            vel: Vec2::new(vx, vy),
        }
    }

    pub fn step(&mut self) {
        self.rect = self.rect.translate(self.vel);
        if self.rect.left() < 0.0 || self.rect.right() > screen::WIDTH {
            self.vel.x = -self.vel.x;
        }
        if self.rect.top() < 0.0 || self.rect.bottom() > screen::HEIGHT {
            self.vel.y = -self.vel.y;
        }
    }
}

impl Default for FloatingText {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct Run {
    pub started_at: Duration,
    pub player: Player,
    pub falling: FallingField,
    pub diagonal: DiagonalField,
    pub floating: FloatingText,
    pub score: u32,
    pub high_score: u32,
    pub next_milestone: u32,
    pub pulse: Option<Pulse>,
}

impl Run {
    pub fn new(now: Duration, high_score: u32) -> Self {
        Self {
            started_at: now,
            player: Player::new(),
            falling: FallingField::new(),
            diagonal: DiagonalField::new(),
            floating: FloatingText::new(),
            score: 0,
            high_score,
            next_milestone: MILESTONE_STEP,
            pulse: None,
        }
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    /// Advances one frame.
    pub fn update<R: Rng + ?Sized>(&mut self, input: &Input, now: Duration, rng: &mut R) -> Outcome {
        let elapsed = self.elapsed(now);

        self.player.update(input.left, input.right, elapsed);

        let speed = obstacle_speed(elapsed);
        let interval = spawn_interval(elapsed);
        self.falling.step(speed, interval, rng);
        self.diagonal
            .step(now, self.score > DIAGONAL_SCORE_THRESHOLD, rng);

        self.floating.step();

        if self.collides() {
            self.score = score_for(elapsed);
            return Outcome::Collided { score: self.score };
        }

        self.score = score_for(elapsed);
        if self.score >= self.next_milestone {
            debug!(milestone = self.next_milestone, "milestone reached");
            self.pulse = Some(Pulse {
                started: now,
                value: self.next_milestone,
            });
            self.next_milestone += MILESTONE_STEP;
        }

        Outcome::Running
    }

    pub fn collides(&self) -> bool {
        let player = &self.player.rect;
        self.falling
            .obstacles
            .iter()
            .chain(self.diagonal.active.iter().map(|d| &d.rect))
            .any(|ob| player.intersects(&hit_box(ob)))
    }

    /// Current pulse scale and the milestone it shows.
    pub fn pulse_at(&self, now: Duration) -> Option<(u32, f32)> {
        let pulse = self.pulse?;
        pulse.scale(now).map(|s| (pulse.value, s))
    }

    /// While beating an existing record, alternates between two phases every
    /// flash period.
    pub fn record_flash(&self, now: Duration) -> Option<bool> {
        if self.high_score > 0 && self.score > self.high_score {
            Some((now.as_millis() / RECORD_FLASH.as_millis()) % 2 == 0)
        } else {
            None
        }
    }
}

// Drawing logic
impl Run {
    pub fn draw(&self, buf: &mut PixelBuf, now: Duration) {
        buf.clear(WHITE);
        buf.text_centered(self.floating.rect.center(), FLOATING_TEXT, FLOATING);

        if let Some(pending) = &self.diagonal.pending {
            buf.line_logical(pending.start, pending.end, TELEGRAPH);
        }

        self.draw_player(buf);
        for ob in &self.falling.obstacles {
            draw_obstacle(buf, ob);
        }
        for ob in &self.diagonal.active {
            draw_obstacle(buf, &ob.rect);
        }

        buf.text(Vec2::new(10.0, 10.0), &format!("Score: {}", self.score), BLACK);

        let center = Vec2::new(screen::WIDTH / 2.0, screen::HEIGHT / 2.0);
        if let Some(lit) = self.record_flash(now) {
            let color = if lit { RED } else { BLUE };
            buf.text_centered(center - Vec2::new(0.0, 20.0), "Whoa... you are", color);
            buf.text_centered(center + Vec2::new(0.0, 20.0), "breaking the record!", color);
        } else if let Some((value, scale)) = self.pulse_at(now) {
            let cell = 16.0 * scale;
            // Skip sizes that would collapse to stray pixels.
            if cell * buf.viewport.scale >= 0.5 {
                draw_number(buf, center, value, cell, LIGHT_GRAY);
            }
        }
    }

    fn draw_player(&self, buf: &mut PixelBuf) {
        let r = self.player.rect;
        buf.fill_logical(&r, BLUE);
        buf.fill_logical(&Rect::new(r.x + 4.0, r.y + 4.0, r.w - 8.0, r.h / 5.0), PLAYER_HI);
    }
}

fn draw_obstacle(buf: &mut PixelBuf, r: &Rect) {
    buf.fill_logical(r, RED);
    let cap = r.h / 8.0;
    buf.fill_logical(&Rect::new(r.x, r.y, r.w, cap), OBSTACLE_DARK);
    buf.fill_logical(&Rect::new(r.x, r.bottom() - cap, r.w, cap), OBSTACLE_DARK);
}
