//! Planet Repair terminal runner (default binary).
//!
//! crossterm for input, the framebuffer renderer for output, and the
//! optional TCP bridge for an external renderer. Everything runs on one
//! thread; the bridge's tokio runtime only moves bytes.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use planet_repair::adapter::Bridge;
use planet_repair::config::GameConfig;
use planet_repair::core::SessionSnapshot;
use planet_repair::engine::SessionDriver;
use planet_repair::input::{handle_key_event, intent_to_action, should_quit};
use planet_repair::term::{FrameBuffer, SceneView, TerminalRenderer, Viewport};

const FRAME_MS: u64 = 50;

fn main() -> Result<()> {
    // Configuration errors are reported before the terminal goes raw.
    let config = GameConfig::from_env()?;
    init_logging(config.log_path.as_deref())?;

    let bridge = match Bridge::start_from_env() {
        Ok(bridge) => bridge,
        Err(e) => {
            let error = format!("{:#}", e);
            warn!(%error, "bridge unavailable, continuing without it");
            None
        }
    };
    if let Some(bridge) = &bridge {
        info!(addr = %bridge.local_addr(), "bridge ready");
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config, bridge);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Log to a file when one is configured; stdout belongs to the renderer.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("planet_repair=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, config: &GameConfig, mut bridge: Option<Bridge>) -> Result<()> {
    let mut driver = SessionDriver::new(config.new_session(), config.reveal_delay_ms);
    info!(
        seed = config.seed,
        questions = config.bank.len(),
        buildings = config.scene.len(),
        "session ready"
    );

    let view = SceneView::default();
    let mut snap = SessionSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let frame = Duration::from_millis(FRAME_MS);
    let mut last = Instant::now();

    if let Some(bridge) = bridge.as_mut() {
        driver.snapshot_into(&mut snap);
        bridge.broadcast_snapshot(&snap);
    }

    loop {
        // Render.
        driver.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        let mut changed = false;

        // Keyboard.
        if event::poll(frame)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    let action = handle_key_event(key).and_then(|i| intent_to_action(i, &snap));
                    if let Some(action) = action {
                        changed |= driver.apply(action).is_ok();
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Bridge commands.
        if let Some(bridge) = bridge.as_mut() {
            while let Some(cmd) = bridge.try_recv() {
                let result = driver.apply(cmd.action.clone());
                bridge.acknowledge(&cmd, &result);
                changed |= result.is_ok();
            }
        }

        // Time.
        let now = Instant::now();
        let elapsed = u32::try_from(now.duration_since(last).as_millis()).unwrap_or(u32::MAX);
        last = now;
        changed |= driver.advance(elapsed).changed();

        if changed {
            if let Some(bridge) = bridge.as_mut() {
                driver.snapshot_into(&mut snap);
                bridge.broadcast_snapshot(&snap);
            }
        }
    }
}
