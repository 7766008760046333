//! Flap Rush headless runner
//!
//! Plays a seeded run with a simple autopilot and prints a JSON summary.
//!
//! Usage: `flap-rush [variant] [seed] [frames]`
//! Set `FLAP_RUSH_CONFIG` to a JSON config file to override the preset.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flap_rush::{Game, MemoryBestScore, SimConfig, Variant};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let variant = match args.first() {
        Some(name) => Variant::from_str(name).unwrap_or_else(|| {
            log::error!("Unknown variant '{}' (classic, enhanced, ultimate)", name);
            std::process::exit(1);
        }),
        None => Variant::default(),
    };
    let seed: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let frames: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(3600);

    let config = match std::env::var("FLAP_RUSH_CONFIG") {
        Ok(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| SimConfig::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(config) => config,
                Err(err) => {
                    log::error!("Failed to load config from {}: {}", path, err);
                    std::process::exit(1);
                }
            }
        }
        Err(_) => SimConfig::for_variant(variant),
    };

    let mut game = match Game::new(config, seed, MemoryBestScore::default()) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Invalid config: {}", err);
            std::process::exit(1);
        }
    };

    let mut runs = 1u32;
    let mut pipes_passed = 0u32;
    for _ in 0..frames {
        if autopilot::should_flap(game.state()) {
            game.flap();
        }
        for event in game.step() {
            match event {
                flap_rush::sim::GameEvent::PipePassed { .. } => pipes_passed += 1,
                flap_rush::sim::GameEvent::Restarted => runs += 1,
                _ => {}
            }
        }
    }

    let state = game.state();
    let summary = serde_json::json!({
        "variant": state.config.variant.as_str(),
        "seed": seed,
        "frames": frames,
        "runs": runs,
        "pipes_passed": pipes_passed,
        "best_score": game.best_score(),
        "final_score": state.score.score,
        "final_phase": format!("{:?}", state.phase),
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{}", text),
        Err(err) => log::error!("Failed to write summary: {}", err),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive `flap_rush::Game` directly on wasm
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use flap_rush::sim::GameState;

    /// Flap when sinking below the middle of the next opening.
    /// Game over always "flaps" so the runner keeps playing.
    pub fn should_flap(state: &GameState) -> bool {
        if state.is_game_over() {
            return true;
        }
        let bird = &state.bird;
        let config = &state.config;
        let target = state
            .pipes
            .iter()
            .find(|p| p.right(config) >= bird.left())
            .and_then(|p| p.open_span(state.time_ticks, config))
            .map(|(top, bottom)| (top + bottom) / 2.0)
            .unwrap_or(config.floor_y() / 2.0);

        bird.pos.y > target + 10.0 && bird.velocity >= 0.0
    }
}
