//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to [`tick`] is one frame)
//! - Seeded RNG only, passed in by the caller
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod effects;
pub mod particles;
pub mod physics;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::PipeContact;
pub use effects::{Effect, EffectBank};
pub use scoring::ScoreState;
pub use state::{
    Bird, Enemy, EnemyKind, GameEvent, GamePhase, GameState, GravityKind, GravityZone, Particle,
    ParticleKind, Pipe, PipeKind, Portal, PowerUp, PowerUpKind, TrailPoint,
};
pub use tick::{TickInput, restart, tick};
