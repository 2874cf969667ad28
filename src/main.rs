use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use rand::{SeedableRng, rngs::StdRng};
use std::fs::File;
use std::io::{self, Stdout, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dodge_tui::{
    App, Config, Step, advice::HttpAdvice, highscore::HighScoreStore, input::Controls,
    render::PixelBuf,
};

#[derive(Parser)]
#[command(name = "dodge-tui")]
#[command(about = "Dodge the falling blocks for as long as you can")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long)]
    highscore_file: Option<PathBuf>,

    /// Endpoint queried for the game-over advice
    #[arg(long)]
    advice_url: Option<String>,

    /// Seconds to wait for the advice before falling back
    #[arg(long)]
    advice_timeout_secs: Option<u64>,

    /// Log file (RUST_LOG controls the level)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for reproducible obstacle patterns
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(path) = self.highscore_file {
            config.highscore_file = path;
        }
        if let Some(url) = self.advice_url {
            config.advice_url = url;
        }
        if let Some(secs) = self.advice_timeout_secs {
            config.advice_timeout_secs = secs;
        }
        if let Some(path) = self.log_file {
            config.log_file = path;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

/// Logging is best effort: without a writable log file the game still runs.
fn init_logging(path: &Path) {
    let Ok(file) = File::create(path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // best effort
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

struct Effects {
    #[cfg(feature = "sound")]
    sound: Option<dodge_tui::sound::Sound>,
}

impl Effects {
    fn open() -> Self {
        Self {
            #[cfg(feature = "sound")]
            sound: dodge_tui::sound::Sound::open(),
        }
    }

    fn death(&self) {
        #[cfg(feature = "sound")]
        {
            if let Some(sound) = &self.sound {
                sound.play_death();
            }
        }
    }
}

fn play(out: &mut Stdout, app: &mut App, releases_reported: bool) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut controls = Controls::new(releases_reported);
    let effects = Effects::open();
    let epoch = Instant::now();

    loop {
        let frame_start = Instant::now();
        let frame_dur = Duration::from_secs(1) / app.fps();

        // Input
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let Event::Resize(c, r) = ev {
                buf.resize(c as usize, r as usize * 2);
            }
            controls.handle(&ev, epoch.elapsed(), &buf.viewport);
        }

        // Update
        let now = epoch.elapsed();
        match app.tick(&controls.snapshot(now), now) {
            Step::Quit => return Ok(()),
            Step::Collided => effects.death(),
            Step::Continue => {}
        }

        // Render
        app.draw(&mut buf, now);
        buf.render(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;
    init_logging(&config.log_file);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let advice = HttpAdvice::new(config.advice_url.clone(), config.advice_timeout());
    let mut app = App::new(
        HighScoreStore::new(config.highscore_file.clone()),
        Box::new(advice),
        rng,
    );

    terminal::enable_raw_mode().context("enabling raw mode")?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let releases_reported = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if releases_reported {
        execute!(
            out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let cleanup = |out: &mut Stdout| -> io::Result<()> {
        if releases_reported {
            execute!(out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let result = play(&mut out, &mut app, releases_reported);
    if let Err(e) = cleanup(&mut out) {
        warn!(error = %e, "could not restore terminal");
    }
    info!(high_score = app.high_score(), "bye");
    result.context("terminal I/O failed")
}
