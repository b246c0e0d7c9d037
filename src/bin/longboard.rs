//! Longboard Sample
//!
//! Run with: `cargo run --bin longboard -- [frames]`
//!
//! Rides the longboard headlessly for `frames` frames (default 600) while a
//! scripted accelerometer tilts the device: first forward to speed up, then
//! side to side to carve, then back to coast.
//!
//! Environment:
//! - `SAMPLES_CONFIG`: JSON config file
//! - `SAMPLES_ASSET_ROOT`: Directory holding `res/`
//! - `RUST_LOG`: Log filter (default `info`)

use std::path::Path;

use anyhow::{Context, Result};
use gameplay_samples_engine::input::AccelerometerReading;
use gameplay_samples_engine::samples::{LongboardGame, SamplesConfig};
use gameplay_samples_engine::{Engine, GameRunner, InputEvent};

const DEFAULT_FRAMES: u64 = 600;
const DT: f32 = 1.0 / 60.0;

/// Device tilt for frame `index` out of `frames`.
fn tilt(index: u64, frames: u64) -> AccelerometerReading {
    let t = index as f32 / frames.max(1) as f32;
    if t < 0.3 {
        AccelerometerReading::new(70.0 * t / 0.3, 0.0)
    } else if t < 0.8 {
        let phase = (t - 0.3) * std::f32::consts::TAU * 3.0;
        AccelerometerReading::new(60.0, 35.0 * phase.sin())
    } else {
        AccelerometerReading::new(15.0, 0.0)
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
    log::info!("[Longboard] assets from {}", config.engine.asset_root.display());

    let engine = Engine::new(config.engine.clone());
    let mut runner = GameRunner::new(engine, LongboardGame::new(config.longboard.clone()));
    runner.initialize().context("failed to initialize longboard sample")?;

    let ran = runner.run(frames, DT, |index| {
        vec![InputEvent::Accelerometer(tilt(index, frames))]
    });

    let kinematics = runner.game().kinematics();
    log::info!(
        "[Longboard] {ran} frames, final speed {:.2}, uv offset {:?}",
        kinematics.speed(),
        kinematics.uv_offset()
    );
    runner.finalize();
    Ok(())
}
