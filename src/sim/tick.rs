//! Per-frame simulation tick
//!
//! One call advances the world by exactly one frame:
//! flap → physics → effect decay → entity updates → spawn floor →
//! collisions → compaction. Nothing runs while the game is over except the
//! restart check.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision;
use super::effects::Effect;
use super::particles::{burst, fire_projectile, spawn_rain, update_particles};
use super::physics;
use super::spawner;
use super::state::{Bird, GameEvent, GamePhase, GameState, ParticleKind};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Flap (space bar or click)
    pub flap: bool,
    /// Start a new run (only honored after game over)
    pub restart: bool,
}

/// Advance the game state by one frame
pub fn tick<R: Rng>(state: &mut GameState, input: &TickInput, rng: &mut R) {
    state.events.clear();

    if state.phase == GamePhase::GameOver {
        if input.restart {
            restart(state, rng);
        }
        return;
    }

    state.time_ticks += 1;

    if input.flap && physics::flap(&mut state.bird, &state.config) {
        let origin = Vec2::new(state.bird.left(), state.bird.pos.y);
        burst(state, rng, ParticleKind::Flap, origin, 5);
        state.events.push(GameEvent::Flapped);
    }

    // Physics
    let time_scale = physics::time_scale(&state.effects, &state.config);
    let gravity = physics::effective_gravity(&state.bird, &state.zones, &state.config);
    let wind = physics::wind_force(&state.bird, &state.pipes, &state.config);
    physics::integrate(&mut state.bird, gravity, wind, time_scale, &state.config);

    // Timers
    state.effects.decay();
    if state.score.decay() {
        state.events.push(GameEvent::ComboLost);
    }

    update_entities(state, rng, time_scale);

    spawner::maintain_floor(state, rng);

    let died = collision::detect(state, rng);

    compact(state);

    if died {
        game_over(state, rng);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Start a fresh run: new bird, empty world, zeroed score and timers
pub fn restart<R: Rng>(state: &mut GameState, rng: &mut R) {
    state.bird = Bird::new(&state.config);
    state.pipes.clear();
    state.powerups.clear();
    state.particles.clear();
    state.enemies.clear();
    state.portals.clear();
    state.zones.clear();
    state.effects.clear();
    state.score = Default::default();
    state.time_ticks = 0;
    state.phase = GamePhase::Playing;

    spawner::spawn_initial(state, rng);

    state.events.push(GameEvent::Restarted);
    log::info!("Restarted ({})", state.config.variant.as_str());
}

fn game_over<R: Rng>(state: &mut GameState, rng: &mut R) {
    state.phase = GamePhase::GameOver;
    let origin = state.bird.pos;
    burst(state, rng, ParticleKind::Death, origin, 15);

    let score = state.score.score;
    state.events.push(GameEvent::Died { score });
    log::info!("Game over at tick {}: score {}", state.time_ticks, score);
}

/// Scroll speed this tick, before time scaling
fn scroll_speed(state: &GameState) -> f32 {
    let boost = if state.effects.is_active(Effect::Speed) {
        state.config.speed_boost
    } else {
        0.0
    };
    state.config.pipe_speed + boost
}

fn update_entities<R: Rng>(state: &mut GameState, rng: &mut R, time_scale: f32) {
    let tick = state.time_ticks;
    let scroll = scroll_speed(state) * time_scale;

    for pipe in state.pipes.iter_mut() {
        pipe.x -= scroll;
        pipe.animate(tick, &state.config);
    }
    score_passes(state, rng);

    update_powerups(state, scroll, time_scale);

    for zone in state.zones.iter_mut() {
        zone.x -= scroll;
    }

    let bird_pos = state.bird.pos;
    for enemy in state.enemies.iter_mut() {
        enemy.advance(tick, bird_pos, time_scale);
    }

    for portal in state.portals.iter_mut() {
        portal.advance(scroll, time_scale);
    }

    update_particles(&mut state.particles, time_scale);

    let fire_interval = state.config.fire_interval as u64;
    if state.effects.is_active(Effect::Fire) && tick.is_multiple_of(fire_interval) {
        fire_projectile(state);
    }

    let rain_chance = state.config.rain_chance;
    if rain_chance > 0.0 && rng.random_bool(rain_chance as f64) {
        spawn_rain(state, rng);
    }
}

/// Award score for every pipe whose trailing edge just cleared the bird
fn score_passes<R: Rng>(state: &mut GameState, rng: &mut R) {
    let bird_left = state.bird.left();
    let config = &state.config;

    let mut cleared = Vec::new();
    for pipe in state.pipes.iter_mut() {
        if !pipe.passed && pipe.right(config) < bird_left {
            pipe.passed = true;
            cleared.push((pipe.id, pipe.points(config)));
        }
    }

    for (pipe_id, base) in cleared {
        let points =
            state
                .score
                .award_pass(base, state.config.multiplier_cap, state.config.combo_window);
        let origin = state.bird.pos;
        burst(state, rng, ParticleKind::Score, origin, 8);
        state.events.push(GameEvent::PipePassed { pipe_id, points });
    }
}

fn update_powerups(state: &mut GameState, scroll: f32, time_scale: f32) {
    let magnet = state.effects.is_active(Effect::Magnet);
    let bird_pos = state.bird.pos;
    let range = state.config.magnet_range;
    let pull = state.config.magnet_pull;

    for powerup in state.powerups.iter_mut().filter(|p| !p.is_expired()) {
        powerup.pos.x -= scroll;
        powerup.pulse += POWERUP_PULSE_RATE;

        let to_bird = bird_pos - powerup.pos;
        if magnet && to_bird.length() < range {
            powerup.trail.insert(0, powerup.pos);
            powerup.trail.truncate(POWERUP_TRAIL_LENGTH);
            powerup.pos += to_bird * pull * time_scale;
        } else {
            powerup.trail.pop();
        }
    }
}

/// Drop every entity whose removal predicate holds
fn compact(state: &mut GameState) {
    let config = &state.config;
    state.pipes.retain(|p| !p.is_offscreen(config));
    state.powerups.retain(|p| !p.is_expired());
    state.zones.retain(|z| !z.is_offscreen());
    state.enemies.retain(|e| !e.is_expired());
    state.portals.retain(|p| !p.is_expired());
    state.particles.retain(|p| p.is_alive());
}
