//
// Copyright 2025 Jeff Bush
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

mod host;
mod locations;
mod walkthrough;

use anyhow::{bail, Context};
use clap::Parser;
use engine::config::{GameConfig, PLAYER_SPEED};
use engine::player::{HeroSprites, Player};
use engine::session::Session;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const STARTING_MONEY: u32 = 100;

#[derive(Parser, Debug)]
#[command(version, about = "Kingdom Quest")]
struct Args {
    /// Player speed in pixels per second.
    #[arg(long, default_value_t = PLAYER_SPEED)]
    speed: f32,

    /// Location to start in.
    #[arg(long, default_value = locations::START_LOCATION)]
    start: String,

    #[arg(long, default_value = "savegame.json")]
    save_file: PathBuf,

    /// Directory backgrounds and music are loaded from.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Turn off the softer camera follow near the bottom of a location.
    #[arg(long)]
    no_damping: bool,

    /// Play the scripted walkthrough instead of opening a window.
    #[arg(long)]
    headless: bool,

    /// Stop the walkthrough after this many frames.
    #[arg(long)]
    frames: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if !(args.speed.is_finite() && args.speed >= 0.0) {
        bail!("speed must be a non-negative number, got {}", args.speed);
    }

    let registry = locations::load_registry().context("loading maps")?;
    let mut config = GameConfig {
        player_speed: args.speed,
        ..GameConfig::default()
    };
    if args.no_damping {
        config.camera.lower_zone_damping = None;
    }

    let player = Player::new(HeroSprites::with_base("hero/knight"), STARTING_MONEY);
    if args.headless || cfg!(not(feature = "sdl")) {
        let music = Box::new(host::SilentMusic::default());
        let host = host::GameHost::new(&args.save_file, &args.assets, music);
        let mut session = Session::new(registry, config, host, player);
        session.start(&args.start, None)?;

        let frames =
            walkthrough::Walkthrough::new(args.frames).run(&mut session, walkthrough::CASTLE_RUN);
        info!(
            frames = frames,
            location = session.current().map(|c| c.id()).unwrap_or("-"),
            interactions = session.host().interactions(),
            "walkthrough done"
        );
        return Ok(());
    }

    #[cfg(feature = "sdl")]
    run_windowed(&args, registry, config, player)?;

    Ok(())
}

#[cfg(feature = "sdl")]
fn run_windowed(
    args: &Args,
    registry: engine::registry::LocationRegistry,
    config: GameConfig,
    player: Player,
) -> anyhow::Result<()> {
    use anyhow::anyhow;
    use engine::audio;

    let mut eng = engine::GameEngine::new(config.view.x as u32, config.view.y as u32)
        .map_err(|e| anyhow!(e))?;
    let _mixer = audio::init_audio().map_err(|e| anyhow!(e))?;
    let music = audio::MixerMusic::new(args.assets.clone());
    let host = host::GameHost::new(&args.save_file, &args.assets, Box::new(music));

    let mut session = Session::new(registry, config, host, player);
    session.start(&args.start, None)?;
    eng.run(&mut session);
    Ok(())
}
