//! Particle emission and per-role motion

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Particle, ParticleKind};
use crate::consts::{PROJECTILE_LIFE, PROJECTILE_SPEED};

/// Burst shape for a role: (speed spread, life ticks, size)
fn burst_profile(kind: ParticleKind) -> (f32, i32, f32) {
    match kind {
        ParticleKind::Flap => (4.0, 20, 3.0),
        ParticleKind::Score => (8.0, 30, 4.0),
        ParticleKind::Death => (12.0, 40, 5.0),
        ParticleKind::Explosion => (10.0, 25, 4.0),
        ParticleKind::Shield => (4.0, 20, 3.0),
        ParticleKind::Rain => (0.0, 100, 2.0),
        ParticleKind::Projectile => (0.0, PROJECTILE_LIFE, 4.0),
        ParticleKind::Collect => (10.0, 30, 3.0),
        ParticleKind::Spark => (6.0, 15, 2.0),
        ParticleKind::Teleport => (8.0, 25, 3.0),
    }
}

/// Emit `count` particles of a role scattered around `origin`
pub fn burst<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
    kind: ParticleKind,
    origin: Vec2,
    count: usize,
) {
    let (spread, life, size) = burst_profile(kind);
    for _ in 0..count {
        let vel = match kind {
            // Flap puffs trail behind the bird
            ParticleKind::Flap => Vec2::new(
                rng.random::<f32>() * spread - 6.0,
                rng.random::<f32>() * spread - 2.0,
            ),
            _ => Vec2::new(
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
            ),
        };
        state.push_particle(Particle {
            pos: origin,
            vel,
            life,
            max_life: life,
            size,
            kind,
        });
    }
}

/// Launch one projectile forward from the bird
pub fn fire_projectile(state: &mut GameState) {
    let (_, life, size) = burst_profile(ParticleKind::Projectile);
    let origin = Vec2::new(state.bird.right(), state.bird.pos.y);
    state.push_particle(Particle {
        pos: origin,
        vel: Vec2::new(PROJECTILE_SPEED, 0.0),
        life,
        max_life: life,
        size,
        kind: ParticleKind::Projectile,
    });
}

/// Drop a raindrop somewhere along the top edge
pub fn spawn_rain<R: Rng>(state: &mut GameState, rng: &mut R) {
    let (_, life, size) = burst_profile(ParticleKind::Rain);
    let x = rng.random_range(0.0..=state.config.screen_width);
    state.push_particle(Particle {
        pos: Vec2::new(x, 0.0),
        vel: Vec2::new(-1.0, 7.0 + rng.random::<f32>() * 3.0),
        life,
        max_life: life,
        size,
        kind: ParticleKind::Rain,
    });
}

/// Move live particles and age them one tick
pub fn update_particles(particles: &mut [Particle], time_scale: f32) {
    for particle in particles.iter_mut().filter(|p| p.is_alive()) {
        particle.pos += particle.vel * time_scale;
        particle.vel.y += particle.kind.gravity() * time_scale;
        particle.life -= 1;
    }
}
