//! Character Sample
//!
//! Run with: `cargo run --bin character -- [frames]`
//!
//! Walks the character through the sample scene headlessly for `frames`
//! frames (default 900): forward, a run, a jump, a turn by dragging, then a
//! strafe back to rest.
//!
//! Environment:
//! - `SAMPLES_CONFIG`: JSON config file
//! - `SAMPLES_ASSET_ROOT`: Directory holding `res/`
//! - `RUST_LOG`: Log filter (default `info`)

use std::path::Path;

use anyhow::{Context, Result};
use gameplay_samples_engine::samples::{CharacterGame, SamplesConfig};
use gameplay_samples_engine::{Engine, GameRunner, InputEvent, KeyCode, KeyEvent, TouchEvent};

const DEFAULT_FRAMES: u64 = 900;
const DT: f32 = 1.0 / 60.0;

/// Input for frame `index`, scripted in seconds.
fn script(index: u64) -> Vec<InputEvent> {
    let key = |event| vec![InputEvent::Key(event)];
    match index {
        60 => key(KeyEvent::press(KeyCode::W)),
        180 => key(KeyEvent::press(KeyCode::ShiftLeft)),
        300 => key(KeyEvent::release(KeyCode::ShiftLeft)),
        330 => key(KeyEvent::press(KeyCode::Space)),
        420 => key(KeyEvent::release(KeyCode::W)),
        480 => vec![
            InputEvent::Touch(TouchEvent::press(640, 200, 1)),
            InputEvent::Touch(TouchEvent::moved(760, 200, 1)),
            InputEvent::Touch(TouchEvent::release(760, 200, 1)),
        ],
        540 => key(KeyEvent::press(KeyCode::D)),
        660 => key(KeyEvent::release(KeyCode::D)),
        _ => Vec::new(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frames = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid frame count '{arg}'"))?,
        None => DEFAULT_FRAMES,
    };

    let mut config = SamplesConfig::from_env().context("failed to load samples config")?;
    config.resolve_asset_root(Path::new(env!("CARGO_MANIFEST_DIR")));
    log::info!("[Character] assets from {}", config.engine.asset_root.display());

    let engine = Engine::new(config.engine.clone());
    let mut runner = GameRunner::new(engine, CharacterGame::new(config.character.clone()));
    runner.initialize().context("failed to initialize character sample")?;

    let ran = runner.run(frames, DT, script);

    if let Some(handles) = runner.game().handles() {
        let position = runner.engine().scene.translation_world(handles.character_node);
        log::info!(
            "[Character] {ran} frames, {} jumps, character at {position}",
            runner.game().jumps()
        );
    }
    runner.finalize();
    Ok(())
}
