//! Terminal Block Blast runner (default binary).
//!
//! Uses crossterm for input and the framebuffer-based renderer from the
//! `term` crate.

use std::fs::File;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use log::{info, LevelFilter};

use block_blast::config::{Cli, Config};
use block_blast::core::{JsonFileStore, OfferGenerator, Session, SessionSnapshot, SimpleRng};
use block_blast::input::{handle_key_event, should_quit, CursorMode, KeyboardCursor};
use block_blast::term::{CursorView, FrameBuffer, GameView, TerminalRenderer, Viewport};
use block_blast::types::TICK_MS;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(&cli)?;
    init_logging(&config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Logs go to the configured file only; stderr would draw over the game.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: &Config) -> Result<()> {
    let seed = config.seed.unwrap_or_else(clock_seed);
    info!("starting with seed {seed}, high score file {}", config.high_score_file.display());

    let mut session = Session::with_parts(
        OfferGenerator::standard(),
        Box::new(SimpleRng::new(seed)),
        Box::new(JsonFileStore::new(config.high_score_file.clone())),
        config.timing(),
    );
    let mut cursor = KeyboardCursor::new();

    let view = GameView::default();
    let mut snapshot = SessionSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snapshot);
        cursor.sync(session.offer());
        let cursor_view = CursorView {
            slot: cursor.slot(),
            anchor: (cursor.mode() == CursorMode::Grid).then(|| cursor.position()),
            shaking: cursor.shaking(),
        };
        view.render_into(&snapshot, Some(&cursor_view), Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!("quit with score {}", session.score());
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        cursor.drive(action, &mut session);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_MS);
            cursor.update(TICK_MS);
        }
    }
}
