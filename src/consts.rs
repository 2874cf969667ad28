pub mod screen {
    pub const WIDTH: f32 = 405.0;
    pub const HEIGHT: f32 = 720.0;
    pub const PLAY_FPS: u32 = 60;
    pub const MENU_FPS: u32 = 15;
}

pub mod game {
    use std::time::Duration;

    pub const PLAYER_WIDTH: f32 = 44.0;
    pub const PLAYER_HEIGHT: f32 = 56.0;
    /// Distance of the player's centre from the bottom edge.
    pub const PLAYER_BOTTOM_OFFSET: f32 = 40.0;
    pub const PLAYER_SPEED_INITIAL: u32 = 3;
    pub const PLAYER_SPEED_STEP_SECS: u64 = 10;

    pub const OBSTACLE_WIDTH: f32 = 32.0;
    pub const OBSTACLE_HEIGHT: f32 = 64.0;
    pub const OBSTACLE_SPEED_INITIAL: u32 = 2;
    pub const OBSTACLE_SPEED_STEP_SECS: u64 = 8;
    pub const SPAWN_INTERVAL_INITIAL: u32 = 50;
    pub const SPAWN_INTERVAL_MIN: u32 = 10;
    pub const SPAWN_INTERVAL_STEP_SECS: u64 = 5;
    pub const SPAWN_INTERVAL_DECREMENT: u32 = 2;
    /// Total shrink applied to an obstacle's hit-box on each axis.
    pub const HIT_MARGIN: f32 = 20.0;

    pub const DIAGONAL_SCORE_THRESHOLD: u32 = 300;
    pub const DIAGONAL_INTERVAL_FRAMES: u32 = 150;
    pub const DIAGONAL_WARNING: Duration = Duration::from_millis(2000);
    pub const DIAGONAL_SPEED: f32 = 10.0;

    pub const MILESTONE_STEP: u32 = 100;
    pub const MILESTONE_PULSE: Duration = Duration::from_millis(500);
    pub const MILESTONE_MIN_SCALE: f32 = 0.01;
    pub const RECORD_FLASH: Duration = Duration::from_millis(250);

    pub const SHAKE_DURATION: Duration = Duration::from_millis(1000);
    pub const SHAKE_MAGNITUDE: f32 = 8.0;

    pub const FLOATING_TEXT: &str = "DODGE!";
    pub const FLOATING_TEXT_VELOCITY: (f32, f32) = (1.5, 1.2);
}

pub mod ui {
    pub const BUTTON_WIDTH: f32 = 200.0;
    pub const BUTTON_HEIGHT: f32 = 80.0;
    pub const ADVICE_MARGIN: f32 = 20.0;
    pub const TITLE: &str = "DODGE THE DOTI";
    pub const ADVICE_TITLE: &str = "Today's lesson:";
}
