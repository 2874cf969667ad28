use std::time::Duration;

use dodge_tui::advice::{AdviceError, AdviceSource, REST_FALLBACK, parse_advice};
use dodge_tui::app::{restart_button, start_button};
use dodge_tui::geom::Rect;
use dodge_tui::highscore::HighScoreStore;
use dodge_tui::input::Input;
use dodge_tui::render::PixelBuf;
use dodge_tui::{App, Screen, Step};
use rand::{SeedableRng, rngs::StdRng};

/// Endpoint that answers with an HTML error page.
struct Garbled;

impl AdviceSource for Garbled {
    fn fetch(&self) -> Result<String, AdviceError> {
        parse_advice("<html>502 Bad Gateway</html>")
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn press_start() -> Input {
    Input {
        clicks: vec![start_button().center()],
        ..Input::default()
    }
}

fn app_with_record(dir: &tempfile::TempDir, record: Option<u32>) -> (App, HighScoreStore) {
    let store = HighScoreStore::new(dir.path().join("highscore.txt"));
    if let Some(record) = record {
        store.save(record).unwrap();
    }
    let app = App::new(store.clone(), Box::new(Garbled), StdRng::seed_from_u64(2024));
    (app, store)
}

/// Plays frames at 60fps from `from` until `until` with the field kept
/// clear, then drops an obstacle onto the player.
fn survive_then_crash(app: &mut App, from: u64, until: u64) -> Step {
    let mut t = from;
    while t < until {
        let run = app.run_mut().expect("run in progress");
        run.falling.obstacles.clear();
        run.diagonal.active.clear();
        assert_eq!(app.tick(&Input::default(), ms(t)), Step::Continue);
        t += 16;
    }
    let run = app.run_mut().expect("run in progress");
    run.falling.obstacles.clear();
    run.diagonal.active.clear();
    let p = run.player.rect;
    run.falling
        .obstacles
        .push(Rect::new(p.x, p.y - 4.0, p.w, p.h));
    app.tick(&Input::default(), ms(until))
}

#[test]
fn crash_at_12_3_seconds_sets_new_record() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, store) = app_with_record(&dir, Some(100));
    assert_eq!(app.high_score(), 100);

    app.tick(&press_start(), ms(1_000));
    assert!(matches!(app.screen(), Screen::Playing(_)));

    let step = survive_then_crash(&mut app, 1_016, 1_000 + 12_300);
    assert_eq!(step, Step::Collided);
    assert_eq!(app.high_score(), 123);
    assert_eq!(store.load(), 123);

    let mut buf = PixelBuf::new(120, 200);
    let mut t = 1_000 + 12_300;
    while matches!(app.screen(), Screen::Dying { .. }) {
        app.draw(&mut buf, ms(t));
        t += 16;
        app.tick(&Input::default(), ms(t));
    }
    assert!(t >= 1_000 + 12_300 + 1_000);

    match app.screen() {
        Screen::GameOver { score, advice } => {
            assert_eq!(*score, 123);
            assert_eq!(advice, REST_FALLBACK);
        }
        other => panic!("expected game over, got {other:?}"),
    }

    let restart = Input {
        clicks: vec![restart_button().center()],
        ..Input::default()
    };
    app.tick(&restart, ms(t + 100));
    assert!(matches!(app.screen(), Screen::Start));
}

#[test]
fn lower_score_keeps_stored_record() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, store) = app_with_record(&dir, Some(500));

    app.tick(&press_start(), ms(0));
    assert_eq!(survive_then_crash(&mut app, 16, 5_000), Step::Collided);
    assert_eq!(app.high_score(), 500);
    assert_eq!(store.load(), 500);
}

#[test]
fn first_run_creates_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, store) = app_with_record(&dir, None);
    assert_eq!(app.high_score(), 0);

    app.tick(&press_start(), ms(0));
    survive_then_crash(&mut app, 16, 2_050);
    assert_eq!(store.load(), 20);
}

#[test]
fn second_run_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _) = app_with_record(&dir, None);

    app.tick(&press_start(), ms(0));
    survive_then_crash(&mut app, 16, 3_000);
    app.tick(&Input::default(), ms(4_000));
    app.tick(
        &Input {
            confirm: true,
            ..Input::default()
        },
        ms(4_100),
    );
    assert!(matches!(app.screen(), Screen::Start));

    app.tick(&press_start(), ms(5_000));
    let run = app.run_mut().unwrap();
    assert_eq!(run.score, 0);
    assert_eq!(run.high_score, 30);
    assert!(run.falling.obstacles.is_empty());
}
