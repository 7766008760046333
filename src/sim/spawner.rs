//! Pipe spawning with weighted kind selection
//!
//! Every pipe is appended exactly `pipe_spacing` to the right of the current
//! rightmost pipe, so obstacle density stays constant. Power-ups, gravity
//! zones, enemies and portals hitch a ride on pipe spawns.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Enemy, EnemyKind, GameState, GravityKind, GravityZone, Pipe, PipeKind, Portal, PowerUp,
};
use crate::config::SimConfig;
use crate::consts::*;

/// Fill the opening window with `spawn_floor` pipes starting at the right edge
pub fn spawn_initial<R: Rng>(state: &mut GameState, rng: &mut R) {
    let start = state.config.screen_width;
    let spacing = state.config.pipe_spacing;
    for i in 0..state.config.spawn_floor {
        spawn_pipe_at(state, start + i as f32 * spacing, rng);
    }
}

/// Top up the pipe stream so the live count never drops below the floor
pub fn maintain_floor<R: Rng>(state: &mut GameState, rng: &mut R) {
    while state.pipes.len() < state.config.spawn_floor {
        let rightmost = state.pipes.iter().map(|p| p.x).reduce(f32::max);
        let x = match rightmost {
            Some(last_x) => last_x + state.config.pipe_spacing,
            None => state.config.screen_width,
        };
        spawn_pipe_at(state, x, rng);
    }
}

/// Spawn one pipe at `x` plus whatever rides along with it
pub fn spawn_pipe_at<R: Rng>(state: &mut GameState, x: f32, rng: &mut R) {
    let config = &state.config;

    // Rounding can leave either upper bound a hair below its lower bound
    let gap_max = config.feasible_gap_max().max(config.gap_min);
    let gap = rng.random_range(config.gap_min..=gap_max);
    let max_top = (config.floor_y() - gap - config.min_bottom).max(config.min_top);
    let top_height = rng.random_range(config.min_top..=max_top);
    let kind = determine_pipe_kind(config, gap, rng);

    let id = state.next_entity_id();
    let pipe = Pipe {
        id,
        x,
        top_height,
        gap,
        passed: false,
        kind,
    };
    log::debug!(
        "Spawned {} pipe #{} at x={:.0} (gap {:.0}..{:.0})",
        kind.name(),
        id,
        x,
        top_height,
        pipe.bottom_y()
    );
    let gap_center = Vec2::new(x + state.config.pipe_width / 2.0, top_height + gap / 2.0);
    state.pipes.push(pipe);

    if kind == PipeKind::Portal {
        let id = state.next_entity_id();
        state.portals.push(Portal {
            id,
            pos: gap_center,
            rotation: 0.0,
            radius: PORTAL_RADIUS,
            used: false,
        });
    }

    if rng.random_bool(state.config.powerup_chance as f64) {
        let kinds = &state.config.powerup_kinds;
        let kind = kinds[rng.random_range(0..kinds.len())];
        let jitter = rng.random_range(-POWERUP_JITTER..=POWERUP_JITTER);
        let id = state.next_entity_id();
        state
            .powerups
            .push(PowerUp::new(id, kind, gap_center + Vec2::new(0.0, jitter)));
    }

    if rng.random_bool(state.config.gravity_zone_chance as f64) {
        let kind = if rng.random_bool(0.5) {
            GravityKind::Low
        } else {
            GravityKind::High
        };
        let id = state.next_entity_id();
        state.zones.push(GravityZone {
            id,
            x: x + GRAVITY_ZONE_OFFSET,
            width: GRAVITY_ZONE_WIDTH,
            kind,
        });
    }

    if rng.random_bool(state.config.enemy_chance as f64) {
        spawn_enemy(state, x + state.config.pipe_spacing / 2.0, rng);
    }
}

/// Special pipe kinds, in weight-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialKind {
    Moving,
    Shrinking,
    Crystal,
    Laser,
    Portal,
    Wind,
    Electric,
}

/// Special kinds are drawn by weight once the special roll succeeds
fn determine_pipe_kind<R: Rng>(config: &SimConfig, gap: f32, rng: &mut R) -> PipeKind {
    let weights = &config.pipe_weights;
    let total = weights.total();
    if total == 0 || !rng.random_bool(config.special_chance as f64) {
        return PipeKind::Normal;
    }

    let table = [
        (weights.moving, SpecialKind::Moving),
        (weights.shrinking, SpecialKind::Shrinking),
        (weights.crystal, SpecialKind::Crystal),
        (weights.laser, SpecialKind::Laser),
        (weights.portal, SpecialKind::Portal),
        (weights.wind, SpecialKind::Wind),
        (weights.electric, SpecialKind::Electric),
    ];
    let mut roll = rng.random_range(0..total);
    for (weight, kind) in table {
        if roll < weight {
            return build_special(kind, config, gap, rng);
        }
        roll -= weight;
    }
    // roll < total, so the table always matches
    PipeKind::Normal
}

fn build_special<R: Rng>(
    kind: SpecialKind,
    config: &SimConfig,
    gap: f32,
    rng: &mut R,
) -> PipeKind {
    match kind {
        SpecialKind::Moving => PipeKind::Moving {
            phase: rng.random_range(0.0..std::f32::consts::TAU),
        },
        SpecialKind::Shrinking => PipeKind::Shrinking {
            base_gap: gap,
            phase: rng.random_range(0.0..std::f32::consts::TAU),
        },
        SpecialKind::Crystal => PipeKind::Crystal {
            health: CRYSTAL_HEALTH,
            hit_cooldown: 0,
        },
        SpecialKind::Laser => PipeKind::Laser {
            phase: rng.random_range(0..LASER_PERIOD),
        },
        SpecialKind::Portal => PipeKind::Portal,
        SpecialKind::Wind => {
            let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            PipeKind::Wind {
                force: config.wind_strength * direction,
            }
        }
        SpecialKind::Electric => PipeKind::Electric {
            phase: rng.random_range(0..ELECTRIC_PERIOD),
        },
    }
}

fn spawn_enemy<R: Rng>(state: &mut GameState, x: f32, rng: &mut R) {
    let kind = match rng.random_range(0..10) {
        0..=4 => EnemyKind::Drone,
        5..=7 => EnemyKind::Seeker,
        _ => EnemyKind::Bomber,
    };
    let speed = state.config.pipe_speed;
    let vel = match kind {
        EnemyKind::Drone => Vec2::new(-(speed + 1.0), 0.0),
        EnemyKind::Seeker => Vec2::new(-(speed + 0.5), 0.0),
        EnemyKind::Bomber => Vec2::new(-(speed * 0.6), 0.0),
    };
    let margin = state.config.min_top;
    let y = rng.random_range(margin..=(state.config.floor_y() - margin).max(margin));
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        kind,
        pos: Vec2::new(x, y),
        vel,
        health: kind.starting_health(),
        phase: rng.random_range(0.0..std::f32::consts::TAU),
        trail: Vec::new(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipeWeights;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fresh(config: SimConfig, seed: u64) -> (GameState, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(config, &mut rng).unwrap();
        (state, rng)
    }

    #[test]
    fn test_initial_window_spacing() {
        let (state, _) = fresh(SimConfig::enhanced(), 1);
        assert_eq!(state.pipes.len(), 4);
        for (i, pipe) in state.pipes.iter().enumerate() {
            assert_eq!(pipe.x, 800.0 + i as f32 * 300.0);
        }
    }

    #[test]
    fn test_pipes_fit_on_screen() {
        let (mut state, mut rng) = fresh(SimConfig::ultimate(), 2);
        for _ in 0..500 {
            let x = state.pipes.last().unwrap().x + 300.0;
            spawn_pipe_at(&mut state, x, &mut rng);
        }
        let config = &state.config;
        for pipe in &state.pipes {
            assert!(pipe.gap > 0.0);
            assert!(pipe.top_height >= config.min_top);
            assert!(pipe.bottom_y() <= config.floor_y() - config.min_bottom + 0.001);
            assert_eq!(pipe.bottom_y(), pipe.top_height + pipe.gap);
        }
    }

    #[test]
    fn test_maintain_floor_appends_after_rightmost() {
        let (mut state, mut rng) = fresh(SimConfig::classic(), 3);
        let removed = state.pipes.remove(0);
        let last_x = state.pipes.last().unwrap().x;
        maintain_floor(&mut state, &mut rng);
        assert_eq!(state.pipes.len(), 3);
        assert_eq!(state.pipes.last().unwrap().x, last_x + 300.0);
        assert!(state.pipes.last().unwrap().id > removed.id);
    }

    #[test]
    fn test_maintain_floor_from_empty() {
        let (mut state, mut rng) = fresh(SimConfig::classic(), 4);
        state.pipes.clear();
        maintain_floor(&mut state, &mut rng);
        assert_eq!(state.pipes.len(), 3);
        assert_eq!(state.pipes[0].x, 800.0);
    }

    #[test]
    fn test_mostly_normal_pipes() {
        let (mut state, mut rng) = fresh(SimConfig::ultimate(), 5);
        for i in 0..2000 {
            spawn_pipe_at(&mut state, i as f32, &mut rng);
        }
        let normal = state
            .pipes
            .iter()
            .filter(|p| p.kind == PipeKind::Normal)
            .count();
        let ratio = normal as f32 / state.pipes.len() as f32;
        assert!(ratio > 0.8, "normal ratio {ratio}");
    }

    #[test]
    fn test_zero_weight_kinds_never_spawn() {
        let config = SimConfig {
            special_chance: 1.0,
            pipe_weights: PipeWeights {
                crystal: 1,
                ..Default::default()
            },
            ..SimConfig::classic()
        };
        let (state, _) = fresh(config, 6);
        assert!(
            state
                .pipes
                .iter()
                .all(|p| matches!(p.kind, PipeKind::Crystal { health: 3, .. }))
        );
    }

    #[test]
    fn test_portal_pipes_host_portals() {
        let config = SimConfig {
            special_chance: 1.0,
            pipe_weights: PipeWeights {
                portal: 1,
                ..Default::default()
            },
            ..SimConfig::ultimate()
        };
        let (state, _) = fresh(config, 7);
        assert_eq!(state.portals.len(), state.pipes.len());
        for (pipe, portal) in state.pipes.iter().zip(&state.portals) {
            assert!(portal.pos.y > pipe.top_height && portal.pos.y < pipe.bottom_y());
        }
    }

    #[test]
    fn test_each_weighted_kind_spawns_itself() {
        let cases: [(PipeWeights, fn(&PipeKind) -> bool); 3] = [
            (
                PipeWeights {
                    electric: 1,
                    ..Default::default()
                },
                |k| matches!(k, PipeKind::Electric { .. }),
            ),
            (
                PipeWeights {
                    moving: 1,
                    ..Default::default()
                },
                |k| matches!(k, PipeKind::Moving { .. }),
            ),
            (
                PipeWeights {
                    wind: 1,
                    ..Default::default()
                },
                |k| matches!(k, PipeKind::Wind { .. }),
            ),
        ];
        for (weights, expected) in cases {
            let config = SimConfig {
                special_chance: 1.0,
                pipe_weights: weights,
                ..SimConfig::ultimate()
            };
            let (state, _) = fresh(config, 12);
            assert!(state.pipes.iter().all(|p| expected(&p.kind)));
        }
    }

    #[test]
    fn test_tight_fractional_config_spawns() {
        // Margins and gap fill the playfield exactly, with fractional values
        let config = SimConfig {
            min_top: 100.1,
            min_bottom: 50.3,
            gap_min: 449.6,
            gap_max: 449.6,
            shrink_amplitude: 0.0,
            electric_reach: 0.0,
            ..SimConfig::classic()
        };
        let Ok(()) = config.validate() else {
            // Rejected up front is fine too; it just must not panic
            return;
        };
        let (mut state, mut rng) = fresh(config, 13);
        for _ in 0..50 {
            let x = state.pipes.last().unwrap().x + 300.0;
            spawn_pipe_at(&mut state, x, &mut rng);
        }
        for pipe in &state.pipes {
            assert!(pipe.gap >= state.config.gap_min);
            assert!(pipe.top_height >= state.config.min_top);
        }
    }

    #[test]
    fn test_classic_has_no_enemies() {
        let (mut state, mut rng) = fresh(SimConfig::classic(), 8);
        for i in 0..200 {
            spawn_pipe_at(&mut state, i as f32, &mut rng);
        }
        assert!(state.enemies.is_empty());
        assert!(state.portals.is_empty());
    }
}
