//! Falling and diagonal hazards.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::consts::{game::*, screen};
use crate::geom::{Rect, Vec2};

/// Fall speed in units per frame after `elapsed` of play.
pub fn obstacle_speed(elapsed: Duration) -> u32 {
    OBSTACLE_SPEED_INITIAL + (elapsed.as_secs() / OBSTACLE_SPEED_STEP_SECS) as u32
}

/// Frames between two falling obstacles after `elapsed` of play.
pub fn spawn_interval(elapsed: Duration) -> u32 {
    let steps = (elapsed.as_secs() / SPAWN_INTERVAL_STEP_SECS).min(u32::MAX as u64) as u32;
    SPAWN_INTERVAL_INITIAL
        .saturating_sub(steps.saturating_mul(SPAWN_INTERVAL_DECREMENT))
        .max(SPAWN_INTERVAL_MIN)
}

/// The forgiving hit-box used for collision tests.
pub fn hit_box(rect: &Rect) -> Rect {
    rect.inflate(-HIT_MARGIN, -HIT_MARGIN)
}

/// Unit vector from `start` to `end`, or zero for a zero-length path.
pub fn direction(start: Vec2, end: Vec2) -> Vec2 {
    let delta = end - start;
    let len = delta.length();
    if len > f32::EPSILON {
        delta * (1.0 / len)
    } else {
        Vec2::ZERO
    }
}

// ── Falling ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct FallingField {
    pub obstacles: Vec<Rect>,
    counter: u32,
}

impl FallingField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step<R: Rng + ?Sized>(&mut self, speed: u32, interval: u32, rng: &mut R) {
        self.counter += 1;
        if self.counter >= interval {
            self.counter = 0;
            let max_x = (screen::WIDTH - OBSTACLE_WIDTH) as u32;
            let x = rng.gen_range(0..=max_x) as f32;
            self.obstacles
                .push(Rect::new(x, -OBSTACLE_HEIGHT, OBSTACLE_WIDTH, OBSTACLE_HEIGHT));
        }

        for ob in &mut self.obstacles {
            ob.y += speed as f32;
        }
        self.obstacles.retain(|ob| ob.top() <= screen::HEIGHT);
    }
}

// ── Diagonal ────────────────────────────────────────────────────────────────

/// A telegraphed spawn: the path is drawn until `spawn_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingDiagonal {
    pub start: Vec2,
    pub end: Vec2,
    pub spawn_at: Duration,
}

impl PendingDiagonal {
    /// Random path from the left or right edge (upper half) to the bottom edge.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, now: Duration) -> Self {
        let start_x = if rng.gen_bool(0.5) { 0.0 } else { screen::WIDTH };
        let start = Vec2::new(start_x, rng.gen_range(0.0..=screen::HEIGHT / 2.0));
        let end = Vec2::new(rng.gen_range(0.0..=screen::WIDTH), screen::HEIGHT);
        Self {
            start,
            end,
            spawn_at: now + DIAGONAL_WARNING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagonalObstacle {
    pub rect: Rect,
    pub dir: Vec2,
}

impl DiagonalObstacle {
    /// `None` when the path has no length to travel along.
    pub fn from_path(start: Vec2, end: Vec2) -> Option<Self> {
        let dir = direction(start, end);
        if dir == Vec2::ZERO {
            return None;
        }
        Some(Self {
            rect: Rect::centered_at(start, OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            dir,
        })
    }

    fn advance(&mut self) {
        self.rect = self.rect.translate(self.dir * DIAGONAL_SPEED);
    }
}

#[derive(Debug, Default)]
pub struct DiagonalField {
    pub pending: Option<PendingDiagonal>,
    pub active: Vec<DiagonalObstacle>,
    counter: u32,
}

impl DiagonalField {
    pub fn new() -> Self {
        Self::default()
    }

    /// `enabled` gates scheduling only; already scheduled or moving obstacles
    /// keep going regardless.
    pub fn step<R: Rng + ?Sized>(&mut self, now: Duration, enabled: bool, rng: &mut R) {
        if enabled {
            self.counter += 1;
            if self.counter >= DIAGONAL_INTERVAL_FRAMES {
                self.counter = 0;
                if self.pending.is_none() {
                    let pending = PendingDiagonal::random(rng, now);
                    debug!(start = ?pending.start, end = ?pending.end, "diagonal obstacle scheduled");
                    self.pending = Some(pending);
                }
            }
        }

        if let Some(pending) = self.pending.filter(|p| now >= p.spawn_at) {
            self.pending = None;
            match DiagonalObstacle::from_path(pending.start, pending.end) {
                Some(ob) => self.active.push(ob),
                None => debug!("skipping diagonal obstacle with zero-length path"),
            }
        }

        let screen = Rect::screen();
        for ob in &mut self.active {
            ob.advance();
        }
        self.active.retain(|ob| ob.rect.intersects(&screen));
    }
}
