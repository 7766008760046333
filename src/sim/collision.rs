//! Collision detection and response
//!
//! Box tests for the bird against the playfield and pipes, circle tests for
//! everything round (power-ups, portals, enemies, projectiles). Only the
//! boundary and pipe checks can kill the bird; the rest trigger effects.

use glam::Vec2;
use rand::Rng;

use super::effects::Effect;
use super::particles::burst;
use super::state::{Bird, GameEvent, GameState, ParticleKind, Pipe, PipeKind, PowerUpKind};
use crate::config::SimConfig;
use crate::consts::{CRYSTAL_HIT_COOLDOWN, ENEMY_RADIUS};
use crate::{circles_overlap, spans_overlap};

/// Outcome of testing the bird against one pipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeContact {
    /// Not touching solid pipe
    Clear,
    /// Touching solid pipe (or a firing laser beam)
    Solid,
}

/// Bird touches the ceiling or the floor line
pub fn boundary_hit(bird: &Bird, config: &SimConfig) -> bool {
    bird.top() <= 0.0 || bird.bottom() >= config.floor_y()
}

/// Test the bird's box against a pipe pair at the given tick
pub fn pipe_contact(bird: &Bird, pipe: &Pipe, tick: u64, config: &SimConfig) -> PipeContact {
    if !spans_overlap(bird.left(), bird.right(), pipe.x, pipe.right(config)) {
        return PipeContact::Clear;
    }
    match pipe.open_span(tick, config) {
        Some((top, bottom)) if bird.top() >= top && bird.bottom() <= bottom => PipeContact::Clear,
        _ => PipeContact::Solid,
    }
}

/// Run every collision check for this tick. Returns true if the bird died.
///
/// All checks run even after a fatal one; their particle output is harmless
/// and the caller makes the death final.
pub fn detect<R: Rng>(state: &mut GameState, rng: &mut R) -> bool {
    let mut dead = boundary_hit(&state.bird, &state.config);

    if !state.effects.intangible() {
        dead |= check_pipes(state, rng);
    }
    collect_powerups(state, rng);
    enter_portals(state, rng);
    projectiles_vs_enemies(state, rng);
    bird_vs_enemies(state, rng);

    dead
}

fn check_pipes<R: Rng>(state: &mut GameState, rng: &mut R) -> bool {
    let tick = state.time_ticks;
    let bird = &state.bird;
    let config = &state.config;

    let mut dead = false;
    let mut cracks = Vec::new();
    for pipe in state.pipes.iter_mut() {
        // A freshly cracked crystal is briefly intangible
        if matches!(pipe.kind, PipeKind::Crystal { hit_cooldown, .. } if hit_cooldown > 0) {
            continue;
        }
        if pipe_contact(bird, pipe, tick, config) == PipeContact::Clear {
            continue;
        }
        match &mut pipe.kind {
            PipeKind::Crystal {
                health,
                hit_cooldown,
            } if *health > 1 => {
                *health -= 1;
                *hit_cooldown = CRYSTAL_HIT_COOLDOWN;
                cracks.push((pipe.id, *health));
            }
            _ => dead = true,
        }
    }

    for (pipe_id, health) in cracks {
        log::debug!("Crystal pipe #{} cracked, {} health left", pipe_id, health);
        let origin = state.bird.pos;
        burst(state, rng, ParticleKind::Spark, origin, 12);
        state.events.push(GameEvent::CrystalCracked { pipe_id, health });
    }

    dead
}

fn collect_powerups<R: Rng>(state: &mut GameState, rng: &mut R) {
    let bird_pos = state.bird.pos;
    let bird_radius = state.bird.half();

    let mut collected = Vec::new();
    for powerup in state.powerups.iter_mut() {
        if powerup.collected {
            continue;
        }
        if circles_overlap(bird_pos, bird_radius, powerup.pos, powerup.radius) {
            powerup.collected = true;
            collected.push((powerup.kind, powerup.pos));
        }
    }

    for (kind, pos) in collected {
        apply_powerup(state, kind, rng);
        burst(state, rng, ParticleKind::Collect, pos, 10);
        state.events.push(GameEvent::PowerUpCollected { kind });
    }
}

/// Apply a collected power-up's effect
pub fn apply_powerup<R: Rng>(state: &mut GameState, kind: PowerUpKind, rng: &mut R) {
    let durations = &state.config.durations;
    match kind {
        PowerUpKind::Speed => state.effects.activate(Effect::Speed, durations),
        PowerUpKind::Shield => {
            state.effects.activate(Effect::Shield, durations);
            let origin = state.bird.pos;
            burst(state, rng, ParticleKind::Shield, origin, 16);
        }
        PowerUpKind::Magnet => state.effects.activate(Effect::Magnet, durations),
        PowerUpKind::Fire => state.effects.activate(Effect::Fire, durations),
        PowerUpKind::Time => state.effects.activate(Effect::TimeWarp, durations),
        PowerUpKind::Score => state.score.add_flat(state.config.score_powerup_points),
        PowerUpKind::Energy => state.bird.energy = state.config.max_energy,
        PowerUpKind::Multi => state.score.bump_multiplier(state.config.multiplier_cap),
    }
}

fn enter_portals<R: Rng>(state: &mut GameState, rng: &mut R) {
    let bird_pos = state.bird.pos;
    let bird_radius = state.bird.half();

    let Some(portal) = state
        .portals
        .iter_mut()
        .find(|p| !p.used && circles_overlap(bird_pos, bird_radius, p.pos, p.radius))
    else {
        return;
    };
    portal.used = true;

    let from_x = bird_pos.x;
    let to_x = from_x + state.config.teleport_offset;
    state.bird.pos.x = to_x;
    state
        .effects
        .activate(Effect::Ghost, &state.config.durations);

    burst(state, rng, ParticleKind::Teleport, bird_pos, 12);
    burst(state, rng, ParticleKind::Teleport, Vec2::new(to_x, bird_pos.y), 12);
    state.events.push(GameEvent::Teleported { from_x, to_x });
}

fn projectiles_vs_enemies<R: Rng>(state: &mut GameState, rng: &mut R) {
    let mut hits = Vec::new();
    for particle in state.particles.iter_mut() {
        if particle.kind != ParticleKind::Projectile || !particle.is_alive() {
            continue;
        }
        for enemy in state.enemies.iter_mut() {
            if enemy.health <= 0 {
                continue;
            }
            if circles_overlap(particle.pos, particle.size, enemy.pos, ENEMY_RADIUS) {
                enemy.health -= 1;
                particle.life = 0;
                hits.push((enemy.id, enemy.pos, enemy.health <= 0));
                break;
            }
        }
    }

    for (enemy_id, pos, killed) in hits {
        burst(state, rng, ParticleKind::Explosion, pos, 12);
        if killed {
            let bounty = state.config.enemy_bounty * state.score.multiplier as u64;
            state.score.add_flat(bounty);
            state.events.push(GameEvent::EnemyDestroyed { enemy_id });
        }
    }
}

fn bird_vs_enemies<R: Rng>(state: &mut GameState, rng: &mut R) {
    let bird_pos = state.bird.pos;
    let bird_radius = state.bird.half();
    let shielded = state.effects.is_active(Effect::Shield);

    let mut rammed = Vec::new();
    for enemy in state.enemies.iter_mut() {
        if enemy.health > 0 && circles_overlap(bird_pos, bird_radius, enemy.pos, ENEMY_RADIUS) {
            enemy.health = 0;
            rammed.push((enemy.id, enemy.pos));
        }
    }

    for (enemy_id, pos) in rammed {
        if !shielded {
            state.bird.energy = (state.bird.energy - state.config.enemy_contact_drain).max(0.0);
        }
        burst(state, rng, ParticleKind::Explosion, pos, 12);
        state.events.push(GameEvent::EnemyDestroyed { enemy_id });
    }
}
