//! Screen flow: START → playing → shake → GAME OVER → START …

use std::time::Duration;

use rand::{Rng, rngs::StdRng};
use tracing::{info, warn};

use crate::advice::{AdviceSource, advice_or_fallback};
use crate::consts::{game::*, screen, ui::*};
use crate::geom::{Rect, Vec2};
use crate::highscore::HighScoreStore;
use crate::input::Input;
use crate::render::{BLACK, BUTTON, PixelBuf, WHITE};
use crate::run::{Outcome, Run};
use crate::text::TextBlock;

pub fn start_button() -> Rect {
    Rect::new(
        screen::WIDTH / 2.0 - BUTTON_WIDTH / 2.0,
        screen::HEIGHT / 2.0 + 50.0,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    )
}

pub fn restart_button() -> Rect {
    Rect::new(
        screen::WIDTH / 2.0 - BUTTON_WIDTH / 2.0,
        screen::HEIGHT - 150.0,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    )
}

fn activated(input: &Input, button: &Rect) -> bool {
    input.confirm || input.clicks.iter().any(|p| button.contains(*p))
}

#[derive(Debug)]
pub enum Screen {
    Start,
    Playing(Run),
    /// The run is over; its last frame shakes until `until`.
    Dying {
        run: Run,
        score: u32,
        until: Duration,
        frozen: Option<PixelBuf>,
    },
    GameOver {
        score: u32,
        advice: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// A run just ended on this tick.
    Collided,
    Quit,
}

/// Everything that lives for the whole process.
pub struct App {
    screen: Screen,
    high_score: u32,
    store: HighScoreStore,
    advice: Box<dyn AdviceSource>,
    rng: StdRng,
}

impl App {
    pub fn new(store: HighScoreStore, advice: Box<dyn AdviceSource>, rng: StdRng) -> Self {
        let high_score = store.load();
        info!(high_score, path = %store.path().display(), "loaded high score");
        Self {
            screen: Screen::Start,
            high_score,
            store,
            advice,
            rng,
        }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The active run, if one is being played.
    pub fn run_mut(&mut self) -> Option<&mut Run> {
        match &mut self.screen {
            Screen::Playing(run) => Some(run),
            _ => None,
        }
    }

    pub fn fps(&self) -> u32 {
        match self.screen {
            Screen::Playing(_) | Screen::Dying { .. } => screen::PLAY_FPS,
            Screen::Start | Screen::GameOver { .. } => screen::MENU_FPS,
        }
    }

    fn record(&mut self, score: u32) {
        if score <= self.high_score {
            return;
        }
        info!(score, previous = self.high_score, "new high score");
        self.high_score = score;
        if let Err(e) = self.store.save(score) {
            warn!(error = %e, "could not save high score");
        }
    }
}

// Update logic
impl App {
    pub fn tick(&mut self, input: &Input, now: Duration) -> Step {
        if input.quit {
            return Step::Quit;
        }

        let mut step = Step::Continue;
        let current = std::mem::replace(&mut self.screen, Screen::Start);
        self.screen = match current {
            Screen::Start => {
                if activated(input, &start_button()) {
                    info!("run started");
                    Screen::Playing(Run::new(now, self.high_score))
                } else {
                    Screen::Start
                }
            }
            Screen::Playing(mut run) => match run.update(input, now, &mut self.rng) {
                Outcome::Running => Screen::Playing(run),
                Outcome::Collided { score } => {
                    info!(score, "run ended");
                    self.record(score);
                    step = Step::Collided;
                    Screen::Dying {
                        run,
                        score,
                        until: now + SHAKE_DURATION,
                        frozen: None,
                    }
                }
            },
            Screen::Dying { score, until, .. } if now >= until => Screen::GameOver {
                score,
                advice: advice_or_fallback(self.advice.as_ref()),
            },
            dying @ Screen::Dying { .. } => dying,
            Screen::GameOver { score, advice } => {
                if activated(input, &restart_button()) {
                    Screen::Start
                } else {
                    Screen::GameOver { score, advice }
                }
            }
        };
        step
    }
}

// Drawing logic
impl App {
    pub fn draw(&mut self, buf: &mut PixelBuf, now: Duration) {
        match &mut self.screen {
            Screen::Start => draw_start(buf, self.high_score),
            Screen::Playing(run) => run.draw(buf, now),
            Screen::Dying { run, frozen, .. } => match frozen {
                None => {
                    run.draw(buf, now);
                    *frozen = Some(buf.clone());
                }
                Some(frame) => {
                    let scale = buf.viewport.scale;
                    let mut jitter =
                        || (self.rng.gen_range(-SHAKE_MAGNITUDE..=SHAKE_MAGNITUDE) * scale).round() as i32;
                    let (dx, dy) = (jitter(), jitter());
                    buf.blit_shifted(frame, dx, dy, WHITE);
                }
            },
            Screen::GameOver { score, advice } => {
                draw_game_over(buf, *score, self.high_score, advice)
            }
        }
    }
}

fn draw_button(buf: &mut PixelBuf, button: &Rect, label: &str) {
    buf.fill_logical(button, BUTTON);
    buf.text_centered(button.center(), label, BLACK);
}

fn draw_start(buf: &mut PixelBuf, high_score: u32) {
    let cx = screen::WIDTH / 2.0;
    let cy = screen::HEIGHT / 2.0;
    buf.clear(WHITE);
    buf.text_centered(Vec2::new(cx, cy - 150.0), TITLE, BLACK);
    buf.text_centered(
        Vec2::new(cx, cy - 50.0),
        &format!("High Score: {high_score}"),
        BLACK,
    );
    draw_button(buf, &start_button(), "START");
}

fn draw_game_over(buf: &mut PixelBuf, score: u32, high_score: u32, advice: &str) {
    let cx = screen::WIDTH / 2.0;
    let cy = screen::HEIGHT / 2.0;
    buf.clear(WHITE);
    buf.text_centered(Vec2::new(cx, screen::HEIGHT / 4.0), "GAME OVER", BLACK);
    buf.text_centered(Vec2::new(cx, cy - 50.0), &format!("Your Score: {score}"), BLACK);
    buf.text_centered(Vec2::new(cx, cy), &format!("High Score: {high_score}"), BLACK);

    let metrics = buf.viewport.cell_metrics();
    let top = cy + 80.0;
    buf.text(Vec2::new(ADVICE_MARGIN, top), ADVICE_TITLE, BLACK);
    let block = TextBlock::build(advice, &metrics, screen::WIDTH - ADVICE_MARGIN * 2.0);
    for (x, y, line) in block.positioned(ADVICE_MARGIN, top + metrics.line_height) {
        buf.text(Vec2::new(x, y), line, BLACK);
    }

    draw_button(buf, &restart_button(), "RESTART");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{AdviceError, CONNECTION_FALLBACK};
    use rand::SeedableRng;

    struct Offline;

    impl AdviceSource for Offline {
        fn fetch(&self) -> Result<String, AdviceError> {
            Err(AdviceError::Transport("offline".into()))
        }
    }

    fn app(dir: &tempfile::TempDir) -> App {
        App::new(
            HighScoreStore::new(dir.path().join("highscore.txt")),
            Box::new(Offline),
            StdRng::seed_from_u64(1),
        )
    }

    fn click(p: Vec2) -> Input {
        Input {
            clicks: vec![p],
            ..Input::default()
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn start_needs_the_button() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.tick(&click(Vec2::new(5.0, 5.0)), ms(0));
        assert!(matches!(app.screen(), Screen::Start));
        app.tick(&click(start_button().center()), ms(0));
        assert!(matches!(app.screen(), Screen::Playing(_)));
        assert_eq!(app.fps(), screen::PLAY_FPS);
    }

    #[test]
    fn quit_from_any_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        let quit = Input {
            quit: true,
            ..Input::default()
        };
        assert_eq!(app.tick(&quit, ms(0)), Step::Quit);
    }

    #[test]
    fn shake_lasts_a_second_then_game_over() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.tick(&click(start_button().center()), ms(0));
        let run = app.run_mut().unwrap();
        run.falling.obstacles.push(run.player.rect);
        assert_eq!(app.tick(&Input::default(), ms(1_000)), Step::Collided);

        let mut buf = PixelBuf::new(81, 144);
        app.draw(&mut buf, ms(1_000));
        app.tick(&Input::default(), ms(1_999));
        app.draw(&mut buf, ms(1_999));
        assert!(matches!(app.screen(), Screen::Dying { .. }));

        app.tick(&Input::default(), ms(2_000));
        match app.screen() {
            Screen::GameOver { score, advice } => {
                assert_eq!(*score, 10);
                assert_eq!(advice, CONNECTION_FALLBACK);
            }
            _ => panic!("expected game over"),
        }
        assert_eq!(app.fps(), screen::MENU_FPS);
    }

    #[test]
    fn restart_returns_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.screen = Screen::GameOver {
            score: 3,
            advice: String::new(),
        };
        app.tick(&click(start_button().center()), ms(0));
        assert!(matches!(app.screen(), Screen::GameOver { .. }));
        app.tick(&click(restart_button().center()), ms(0));
        assert!(matches!(app.screen(), Screen::Start));
    }

    #[test]
    fn every_screen_draws() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        let mut buf = PixelBuf::new(60, 100);
        app.draw(&mut buf, ms(0));
        app.screen = Screen::GameOver {
            score: 42,
            advice: "A long piece of advice that has to wrap over several lines".into(),
        };
        app.draw(&mut buf, ms(0));
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        assert!(!out.is_empty());
    }
}
