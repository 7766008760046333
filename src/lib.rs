//! Flap Rush - A side-scrolling pipe-dodging arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, scoring)
//! - `config`: Variant presets and validated tuning
//! - `best_score`: Best-score persistence boundary
//! - `game`: Frame-driven driver tying state, RNG and the best-score store together

pub mod best_score;
pub mod config;
pub mod game;
pub mod sim;

pub use best_score::{BestScoreStore, JsonBestScore, MemoryBestScore};
pub use config::{ConfigError, SimConfig, Variant};
pub use game::Game;

use glam::Vec2;

/// Simulation constants that are not part of the tunable config
pub mod consts {
    /// Nominal frame rate the per-tick constants are tuned for
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Bird trail: max stored points and max age in ticks
    pub const TRAIL_LENGTH: usize = 12;
    pub const TRAIL_MAX_AGE: u32 = 10;

    /// Power-up motion trail (only recorded while magnet-pulled)
    pub const POWERUP_TRAIL_LENGTH: usize = 6;
    /// Enemy cosmetic trail
    pub const ENEMY_TRAIL_LENGTH: usize = 8;

    /// Hard cap on live particles
    pub const MAX_PARTICLES: usize = 512;

    /// Animation rates (radians per tick)
    pub const MOVE_RATE: f32 = 0.08;
    pub const SHRINK_RATE: f32 = 0.13;
    pub const POWERUP_PULSE_RATE: f32 = 0.2;
    pub const PORTAL_SPIN_RATE: f32 = 0.1;

    /// Laser pipes: beam cycle
    pub const LASER_PERIOD: u64 = 120;
    pub const LASER_ON_TICKS: u64 = 40;

    /// Electric pipes: charge cycle
    pub const ELECTRIC_PERIOD: u64 = 90;
    pub const ELECTRIC_ON_TICKS: u64 = 30;

    /// Wind field extends this far in front of a wind pipe
    pub const WIND_REACH: f32 = 120.0;

    /// Crystal pipes: starting health and post-hit intangibility
    pub const CRYSTAL_HEALTH: u8 = 3;
    pub const CRYSTAL_HIT_COOLDOWN: u32 = 20;

    /// Vertical jitter of power-ups around their pipe's gap centre
    pub const POWERUP_JITTER: f32 = 20.0;
    pub const POWERUP_RADIUS: f32 = 12.0;

    /// Gravity zones
    pub const GRAVITY_ZONE_OFFSET: f32 = 100.0;
    pub const GRAVITY_ZONE_WIDTH: f32 = 80.0;

    /// Entities are removed once this far past the left edge
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    pub const PORTAL_RADIUS: f32 = 25.0;
    pub const ENEMY_RADIUS: f32 = 14.0;

    /// Enemy steering
    pub const DRONE_BOB_RATE: f32 = 0.1;
    pub const DRONE_BOB_SPEED: f32 = 1.5;
    pub const SEEKER_STEER: f32 = 0.02;
    pub const SEEKER_MAX_TURN: f32 = 0.3;
    pub const SEEKER_MAX_SPEED: f32 = 3.0;

    /// Projectiles fired in fire mode
    pub const PROJECTILE_SPEED: f32 = 9.0;
    pub const PROJECTILE_LIFE: i32 = 90;
}

/// Do 1D spans `[a0, a1]` and `[b0, b1]` overlap? Touching edges don't count.
#[inline]
pub fn spans_overlap(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
    a0 < b1 && a1 > b0
}

/// Circular proximity test: centres closer than the combined radius
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}
