//! Bird integration, flapping and ambient force fields

use super::effects::{Effect, EffectBank};
use super::state::{Bird, GravityZone, Pipe, PipeKind};
use crate::config::SimConfig;
use crate::consts::WIND_REACH;
use crate::spans_overlap;

/// Global motion scale: slowed while time-warp is active
pub fn time_scale(effects: &EffectBank, config: &SimConfig) -> f32 {
    if effects.is_active(Effect::TimeWarp) {
        config.time_warp_scale
    } else {
        1.0
    }
}

/// Gravity for this tick.
///
/// Recomputed from scratch every tick; every zone the bird overlaps
/// overwrites the value in iteration order, so the last one wins.
pub fn effective_gravity(bird: &Bird, zones: &[GravityZone], config: &SimConfig) -> f32 {
    let mut gravity = config.gravity;
    for zone in zones {
        if spans_overlap(bird.left(), bird.right(), zone.x, zone.x + zone.width) {
            gravity = zone.gravity(config);
        }
    }
    gravity
}

/// Summed push from wind pipes whose field the bird is in
pub fn wind_force(bird: &Bird, pipes: &[Pipe], config: &SimConfig) -> f32 {
    pipes
        .iter()
        .filter_map(|pipe| match pipe.kind {
            PipeKind::Wind { force }
                if spans_overlap(
                    bird.left(),
                    bird.right(),
                    pipe.x - WIND_REACH,
                    pipe.right(config),
                ) =>
            {
                Some(force)
            }
            _ => None,
        })
        .sum()
}

/// Advance the bird one tick
pub fn integrate(bird: &mut Bird, gravity: f32, wind: f32, time_scale: f32, config: &SimConfig) {
    bird.velocity += (gravity + wind) * time_scale;
    bird.pos.y += bird.velocity * time_scale;
    bird.rotation =
        (bird.velocity * config.rotation_factor).clamp(config.rotation_min, config.rotation_max);

    bird.energy = (bird.energy + config.energy_regen).min(config.max_energy);

    // Ease back to the home column after a teleport
    let dx = config.bird_x - bird.pos.x;
    if dx != 0.0 {
        let step = config.x_return_rate * time_scale;
        bird.pos.x += dx.clamp(-step, step);
    }

    bird.record_trail();
}

/// Try to flap. Returns false (and changes nothing) when out of energy.
pub fn flap(bird: &mut Bird, config: &SimConfig) -> bool {
    if bird.energy <= config.flap_threshold {
        return false;
    }
    bird.energy = (bird.energy - config.flap_cost).max(0.0);
    bird.velocity = config.jump_power;
    bird.rotation = config.flap_rotation;
    true
}
