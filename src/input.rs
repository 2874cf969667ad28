use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::geom::Vec2;
use crate::render::Viewport;

/// Without key release reports, a key counts as held for this long after
/// its last press or auto-repeat.
const HOLD_GRACE: Duration = Duration::from_millis(120);

/// What the player did since the previous frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    /// Pointer-down positions in logical units.
    pub clicks: Vec<Vec2>,
    /// Enter or Space.
    pub confirm: bool,
    pub quit: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct HeldKey {
    down: bool,
    last_seen: Option<Duration>,
}

impl HeldKey {
    fn press(&mut self, now: Duration) {
        self.down = true;
        self.last_seen = Some(now);
    }

    fn release(&mut self) {
        self.down = false;
        self.last_seen = None;
    }

    fn is_held(&self, now: Duration, releases_reported: bool) -> bool {
        if releases_reported {
            return self.down;
        }
        self.last_seen
            .is_some_and(|t| now.saturating_sub(t) <= HOLD_GRACE)
    }
}

/// Folds terminal events into [`Input`] snapshots.
#[derive(Debug, Default)]
pub struct Controls {
    releases_reported: bool,
    left: HeldKey,
    right: HeldKey,
    clicks: Vec<Vec2>,
    confirm: bool,
    quit: bool,
}

impl Controls {
    /// `releases_reported` is true when the terminal sends key-up events.
    pub fn new(releases_reported: bool) -> Self {
        Self {
            releases_reported,
            ..Self::default()
        }
    }

    pub fn handle(&mut self, event: &Event, now: Duration, viewport: &Viewport) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => self.clicks.push(viewport.cell_to_logical(*column, *row)),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, now: Duration) {
        let is_press = matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat);
        let is_release = key.kind == KeyEventKind::Release;

        let held = match key.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(&mut self.left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(&mut self.right),
            _ => None,
        };
        if let Some(held) = held {
            if is_press {
                held.press(now);
            } else if is_release {
                held.release();
            }
            return;
        }

        if !is_press {
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Enter | KeyCode::Char(' ') => self.confirm = true,
            _ => {}
        }
    }

    /// Current state; one-shot events are consumed.
    pub fn snapshot(&mut self, now: Duration) -> Input {
        Input {
            left: self.left.is_held(now, self.releases_reported),
            right: self.right.is_held(now, self.releases_reported),
            clicks: std::mem::take(&mut self.clicks),
            confirm: std::mem::take(&mut self.confirm),
            quit: self.quit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn press_and_release_when_reported() {
        let vp = Viewport::fit(405, 720);
        let mut c = Controls::new(true);
        c.handle(&key(KeyCode::Left, KeyEventKind::Press), ms(0), &vp);
        assert!(c.snapshot(ms(10_000)).left);
        c.handle(&key(KeyCode::Left, KeyEventKind::Release), ms(10_000), &vp);
        assert!(!c.snapshot(ms(10_001)).left);
    }

    #[test]
    fn grace_window_without_release_reports() {
        let vp = Viewport::fit(405, 720);
        let mut c = Controls::new(false);
        c.handle(&key(KeyCode::Right, KeyEventKind::Press), ms(0), &vp);
        assert!(c.snapshot(ms(100)).right);
        c.handle(&key(KeyCode::Right, KeyEventKind::Repeat), ms(100), &vp);
        assert!(c.snapshot(ms(200)).right);
        assert!(!c.snapshot(ms(400)).right);
    }

    #[test]
    fn clicks_and_confirm_are_one_shot() {
        let vp = Viewport::fit(405, 720);
        let mut c = Controls::new(true);
        c.handle(
            &Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 10,
                row: 20,
                modifiers: KeyModifiers::NONE,
            }),
            ms(0),
            &vp,
        );
        c.handle(&key(KeyCode::Enter, KeyEventKind::Press), ms(0), &vp);

        let first = c.snapshot(ms(1));
        assert_eq!(first.clicks.len(), 1);
        assert!(first.confirm);

        let second = c.snapshot(ms(2));
        assert!(second.clicks.is_empty());
        assert!(!second.confirm);
    }

    #[test]
    fn quit_sticks() {
        let vp = Viewport::fit(405, 720);
        let mut c = Controls::new(true);
        c.handle(&key(KeyCode::Esc, KeyEventKind::Press), ms(0), &vp);
        assert!(c.snapshot(ms(1)).quit);
        assert!(c.snapshot(ms(2)).quit);
    }
}
