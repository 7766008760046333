//! Game state and core simulation types
//!
//! Everything a renderer reads and everything needed to resume a run lives
//! here. The whole state serializes, so a snapshot plus the RNG reproduces
//! the next tick exactly.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effects::EffectBank;
use super::scoring::ScoreState;
use super::spawner;
use crate::config::{ConfigError, SimConfig};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, frozen until restart
    GameOver,
}

/// Trail point for bird rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Ticks since this point was recorded
    pub age: u32,
}

/// The player-controlled bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Centre of the bird's square
    pub pos: Vec2,
    pub velocity: f32,
    pub rotation: f32,
    pub size: f32,
    pub energy: f32,
    /// Recent positions, newest first
    pub trail: Vec<TrailPoint>,
}

impl Bird {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            pos: Vec2::new(config.bird_x, config.bird_start_y),
            velocity: 0.0,
            rotation: 0.0,
            size: config.bird_size,
            energy: config.max_energy,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    #[inline]
    pub fn half(&self) -> f32 {
        self.size / 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.half()
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.half()
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.half()
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half()
    }

    /// Age existing trail points and record the current position
    pub fn record_trail(&mut self) {
        for point in &mut self.trail {
            point.age += 1;
        }
        self.trail.retain(|p| p.age <= TRAIL_MAX_AGE);
        self.trail.insert(
            0,
            TrailPoint {
                pos: self.pos,
                age: 0,
            },
        );
        self.trail.truncate(TRAIL_LENGTH);
    }
}

/// Pipe behaviours, each carrying its own animation/health state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PipeKind {
    Normal,
    /// Whole gap bobs up and down
    Moving { phase: f32 },
    /// Gap breathes around its spawn size
    Shrinking { base_gap: f32, phase: f32 },
    /// Absorbs hits until health runs down
    Crystal { health: u8, hit_cooldown: u32 },
    /// Periodically fires a beam across the gap
    Laser { phase: u64 },
    /// Gap hosts a teleport portal
    Portal,
    /// Blows the bird up or down while it is in the field
    Wind { force: f32 },
    /// Periodically charges, extending arcs into the gap
    Electric { phase: u64 },
}

impl PipeKind {
    pub fn is_special(&self) -> bool {
        !matches!(self, PipeKind::Normal)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PipeKind::Normal => "normal",
            PipeKind::Moving { .. } => "moving",
            PipeKind::Shrinking { .. } => "shrinking",
            PipeKind::Crystal { .. } => "crystal",
            PipeKind::Laser { .. } => "laser",
            PipeKind::Portal => "portal",
            PipeKind::Wind { .. } => "wind",
            PipeKind::Electric { .. } => "electric",
        }
    }
}

/// A pipe pair: a top pipe down to `top_height`, a bottom pipe from `bottom_y()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub top_height: f32,
    pub gap: f32,
    /// Score already awarded for this pipe
    pub passed: bool,
    pub kind: PipeKind,
}

impl Pipe {
    /// Top edge of the bottom pipe (before any moving offset)
    #[inline]
    pub fn bottom_y(&self) -> f32 {
        self.top_height + self.gap
    }

    #[inline]
    pub fn right(&self, config: &SimConfig) -> f32 {
        self.x + config.pipe_width
    }

    /// Vertical displacement of the whole pipe pair this tick
    pub fn vertical_offset(&self, tick: u64, config: &SimConfig) -> f32 {
        match self.kind {
            PipeKind::Moving { phase } => {
                (tick as f32 * MOVE_RATE + phase).sin() * config.move_amplitude
            }
            _ => 0.0,
        }
    }

    pub fn laser_firing(&self, tick: u64) -> bool {
        match self.kind {
            PipeKind::Laser { phase } => (tick + phase) % LASER_PERIOD < LASER_ON_TICKS,
            _ => false,
        }
    }

    pub fn electrified(&self, tick: u64) -> bool {
        match self.kind {
            PipeKind::Electric { phase } => (tick + phase) % ELECTRIC_PERIOD < ELECTRIC_ON_TICKS,
            _ => false,
        }
    }

    /// Open vertical interval the bird may occupy, or `None` while a laser
    /// beam closes the gap
    pub fn open_span(&self, tick: u64, config: &SimConfig) -> Option<(f32, f32)> {
        if self.laser_firing(tick) {
            return None;
        }
        let offset = self.vertical_offset(tick, config);
        let reach = if self.electrified(tick) {
            config.electric_reach
        } else {
            0.0
        };
        Some((
            self.top_height + offset + reach,
            self.bottom_y() + offset - reach,
        ))
    }

    /// Advance per-tick animation state
    pub fn animate(&mut self, tick: u64, config: &SimConfig) {
        match &mut self.kind {
            PipeKind::Shrinking { base_gap, phase } => {
                let shrink = (tick as f32 * SHRINK_RATE + *phase).sin() * config.shrink_amplitude;
                self.gap = *base_gap - shrink;
            }
            PipeKind::Crystal { hit_cooldown, .. } => {
                *hit_cooldown = hit_cooldown.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Points awarded when the bird clears this pipe
    pub fn points(&self, config: &SimConfig) -> u64 {
        if self.kind.is_special() {
            config.special_points
        } else {
            config.normal_points
        }
    }

    /// Removal predicate: fully past the left edge
    pub fn is_offscreen(&self, config: &SimConfig) -> bool {
        self.right(config) <= 0.0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Faster scrolling
    Speed,
    /// Ignore pipe collisions
    Shield,
    /// Pull nearby power-ups in
    Magnet,
    /// Flat score bonus
    Score,
    /// Refill energy
    Energy,
    /// Shoot projectiles at enemies
    Fire,
    /// Slow down time
    Time,
    /// Raise the score multiplier
    Multi,
}

/// A collectable power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
    /// Decorative pulse phase
    pub pulse: f32,
    /// Motion trail while being pulled by the magnet (newest first)
    pub trail: Vec<Vec2>,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: POWERUP_RADIUS,
            collected: false,
            pulse: 0.0,
            trail: Vec::new(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.collected || self.pos.x <= -OFFSCREEN_MARGIN
    }
}

/// Particle roles; the role picks the force model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Flap,
    Score,
    Death,
    Explosion,
    Shield,
    Rain,
    /// Damages enemies on contact
    Projectile,
    Collect,
    /// Crystal damage feedback
    Spark,
    Teleport,
}

impl ParticleKind {
    /// Downward acceleration per tick
    pub fn gravity(&self) -> f32 {
        match self {
            ParticleKind::Flap
            | ParticleKind::Score
            | ParticleKind::Death
            | ParticleKind::Explosion
            | ParticleKind::Collect
            | ParticleKind::Spark => 0.2,
            ParticleKind::Shield
            | ParticleKind::Rain
            | ParticleKind::Projectile
            | ParticleKind::Teleport => 0.0,
        }
    }
}

/// A short-lived particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks; dead at <= 0
    pub life: i32,
    pub max_life: i32,
    pub size: f32,
    pub kind: ParticleKind,
}

impl Particle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Enemy behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Drifts left with a sinusoidal bob
    Drone,
    /// Steers toward the bird
    Seeker,
    /// Slow and heavily armoured
    Bomber,
}

impl EnemyKind {
    pub fn starting_health(&self) -> i32 {
        match self {
            EnemyKind::Drone => 1,
            EnemyKind::Seeker => 2,
            EnemyKind::Bomber => 3,
        }
    }
}

/// A hostile flyer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub phase: f32,
    pub trail: Vec<Vec2>,
}

impl Enemy {
    pub fn is_expired(&self) -> bool {
        self.health <= 0 || self.pos.x <= -OFFSCREEN_MARGIN
    }

    /// Steer by kind, then move one tick. Expired enemies stay put.
    pub fn advance(&mut self, tick: u64, bird_pos: Vec2, time_scale: f32) {
        if self.is_expired() {
            return;
        }
        match self.kind {
            EnemyKind::Drone => {
                self.vel.y = (tick as f32 * DRONE_BOB_RATE + self.phase).sin() * DRONE_BOB_SPEED;
            }
            EnemyKind::Seeker => {
                let steer = ((bird_pos.y - self.pos.y) * SEEKER_STEER)
                    .clamp(-SEEKER_MAX_TURN, SEEKER_MAX_TURN);
                self.vel.y =
                    (self.vel.y + steer * time_scale).clamp(-SEEKER_MAX_SPEED, SEEKER_MAX_SPEED);
            }
            EnemyKind::Bomber => self.vel.y = 0.0,
        }
        self.trail.insert(0, self.pos);
        self.trail.truncate(ENEMY_TRAIL_LENGTH);
        self.pos += self.vel * time_scale;
    }
}

/// A teleport portal sitting in a portal pipe's gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub id: u32,
    pub pos: Vec2,
    pub rotation: f32,
    pub radius: f32,
    pub used: bool,
}

impl Portal {
    pub fn is_expired(&self) -> bool {
        self.used || self.pos.x <= -OFFSCREEN_MARGIN
    }

    /// Scroll with the world and keep spinning
    pub fn advance(&mut self, scroll: f32, time_scale: f32) {
        if self.is_expired() {
            return;
        }
        self.pos.x -= scroll;
        self.rotation += PORTAL_SPIN_RATE * time_scale;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GravityKind {
    Low,
    High,
}

/// A vertical band that overrides gravity while the bird is inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityZone {
    pub id: u32,
    pub x: f32,
    pub width: f32,
    pub kind: GravityKind,
}

impl GravityZone {
    pub fn gravity(&self, config: &SimConfig) -> f32 {
        match self.kind {
            GravityKind::Low => config.low_gravity,
            GravityKind::High => config.high_gravity,
        }
    }

    pub fn is_offscreen(&self) -> bool {
        self.x + self.width <= 0.0
    }
}

/// Things that happened during the last tick (audio/HUD hooks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Flapped,
    PipePassed { pipe_id: u32, points: u64 },
    PowerUpCollected { kind: PowerUpKind },
    CrystalCracked { pipe_id: u32, health: u8 },
    Teleported { from_x: f32, to_x: f32 },
    EnemyDestroyed { enemy_id: u32 },
    ComboLost,
    Died { score: u64 },
    Restarted,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub config: SimConfig,
    /// Simulation tick counter (drives every animation phase)
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub bird: Bird,
    /// Live pipes (sorted by id, which is also left-to-right)
    pub pipes: Vec<Pipe>,
    pub powerups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub enemies: Vec<Enemy>,
    pub portals: Vec<Portal>,
    pub zones: Vec<GravityZone>,
    pub effects: EffectBank,
    pub score: ScoreState,
    /// Events from the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Validate the config and build a fresh run with the initial pipe window
    pub fn new<R: Rng>(config: SimConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            bird: Bird::new(&config),
            config,
            time_ticks: 0,
            phase: GamePhase::Playing,
            pipes: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            enemies: Vec::new(),
            portals: Vec::new(),
            zones: Vec::new(),
            effects: EffectBank::default(),
            score: ScoreState::default(),
            events: Vec::new(),
            next_id: 1,
        };
        spawner::spawn_initial(&mut state, rng);
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a particle unless the particle budget is spent
    pub fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() < MAX_PARTICLES {
            self.particles.push(particle);
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.pipes.sort_by_key(|p| p.id);
        self.powerups.sort_by_key(|p| p.id);
        self.enemies.sort_by_key(|e| e.id);
        self.portals.sort_by_key(|p| p.id);
        self.zones.sort_by_key(|z| z.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pipe(kind: PipeKind) -> Pipe {
        Pipe {
            id: 1,
            x: 200.0,
            top_height: 150.0,
            gap: 180.0,
            passed: false,
            kind,
        }
    }

    #[test]
    fn test_new_state_has_initial_window() {
        let mut rng = Pcg32::seed_from_u64(7);
        let state = GameState::new(SimConfig::classic(), &mut rng).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pipes.len(), state.config.spawn_floor);
        assert_eq!(state.score.score, 0);
        assert_eq!(state.bird.pos, Vec2::new(165.0, 315.0));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut rng = Pcg32::seed_from_u64(7);
        let config = SimConfig {
            min_top: 400.0,
            ..SimConfig::classic()
        };
        assert!(GameState::new(config, &mut rng).is_err());
    }

    #[test]
    fn test_trail_is_age_capped() {
        let mut bird = Bird::new(&SimConfig::classic());
        for i in 0..30 {
            bird.pos.y = i as f32;
            bird.record_trail();
        }
        assert!(bird.trail.len() <= TRAIL_LENGTH);
        assert!(bird.trail.iter().all(|p| p.age <= TRAIL_MAX_AGE));
        assert_eq!(bird.trail[0].pos.y, 29.0);
        assert_eq!(bird.trail[0].age, 0);
    }

    #[test]
    fn test_shrinking_keeps_bottom_consistent() {
        let config = SimConfig::classic();
        let mut p = pipe(PipeKind::Shrinking {
            base_gap: 180.0,
            phase: 0.0,
        });
        for tick in 0..200 {
            p.animate(tick, &config);
            assert_eq!(p.bottom_y(), p.top_height + p.gap);
            assert!(p.gap > 0.0);
            assert!(p.gap >= 180.0 - config.shrink_amplitude - 0.001);
        }
    }

    #[test]
    fn test_laser_closes_gap_while_firing() {
        let config = SimConfig::classic();
        let p = pipe(PipeKind::Laser { phase: 0 });
        assert!(p.open_span(0, &config).is_none());
        assert!(p.open_span(LASER_ON_TICKS, &config).is_some());
    }

    #[test]
    fn test_electric_narrows_gap_while_charged() {
        let config = SimConfig::classic();
        let p = pipe(PipeKind::Electric { phase: 0 });
        let (top, bottom) = p.open_span(0, &config).unwrap();
        assert_eq!(top, 150.0 + config.electric_reach);
        assert_eq!(bottom, 330.0 - config.electric_reach);
        let (top, _) = p.open_span(ELECTRIC_ON_TICKS, &config).unwrap();
        assert_eq!(top, 150.0);
    }

    #[test]
    fn test_special_pipes_award_more() {
        let config = SimConfig::classic();
        assert_eq!(pipe(PipeKind::Normal).points(&config), 1);
        assert_eq!(pipe(PipeKind::Portal).points(&config), 2);
    }

    #[test]
    fn test_particle_roles() {
        assert!(ParticleKind::Flap.gravity() > 0.0);
        assert_eq!(ParticleKind::Projectile.gravity(), 0.0);
    }

    fn enemy(kind: EnemyKind, pos: Vec2) -> Enemy {
        Enemy {
            id: 1,
            kind,
            pos,
            vel: Vec2::new(-3.0, 0.0),
            health: kind.starting_health(),
            phase: 0.0,
            trail: Vec::new(),
        }
    }

    #[test]
    fn test_seeker_steers_toward_bird() {
        let bird = Vec2::new(165.0, 100.0);
        let mut seeker = enemy(EnemyKind::Seeker, Vec2::new(500.0, 400.0));
        seeker.advance(1, bird, 1.0);
        assert_eq!(seeker.vel.y, -SEEKER_MAX_TURN);
        assert!(seeker.pos.y < 400.0);

        for tick in 2..40 {
            seeker.advance(tick, bird, 1.0);
            assert!(seeker.vel.y.abs() <= SEEKER_MAX_SPEED);
        }
        assert_eq!(seeker.vel.y, -SEEKER_MAX_SPEED);
        assert_eq!(seeker.trail.len(), ENEMY_TRAIL_LENGTH);
    }

    #[test]
    fn test_bomber_flies_level() {
        let mut bomber = enemy(EnemyKind::Bomber, Vec2::new(500.0, 300.0));
        bomber.vel.y = 2.0;
        for tick in 1..10 {
            bomber.advance(tick, Vec2::new(165.0, 50.0), 1.0);
            assert_eq!(bomber.vel.y, 0.0);
        }
        assert_eq!(bomber.pos.y, 300.0);
        assert_eq!(bomber.pos.x, 500.0 - 9.0 * 3.0);
    }

    #[test]
    fn test_drone_bobs() {
        let mut drone = enemy(EnemyKind::Drone, Vec2::new(500.0, 300.0));
        let mut seen_up = false;
        let mut seen_down = false;
        for tick in 0..100 {
            drone.advance(tick, Vec2::ZERO, 1.0);
            assert!(drone.vel.y.abs() <= DRONE_BOB_SPEED);
            seen_up |= drone.vel.y < 0.0;
            seen_down |= drone.vel.y > 0.0;
        }
        assert!(seen_up && seen_down);
    }

    #[test]
    fn test_expired_entities_never_move() {
        let mut dead = enemy(EnemyKind::Seeker, Vec2::new(500.0, 400.0));
        dead.health = 0;
        let before = dead.clone();
        dead.advance(5, Vec2::new(165.0, 100.0), 1.0);
        assert_eq!(dead, before);

        let mut portal = Portal {
            id: 2,
            pos: Vec2::new(300.0, 300.0),
            rotation: 0.0,
            radius: PORTAL_RADIUS,
            used: true,
        };
        let before = portal.clone();
        portal.advance(3.0, 1.0);
        assert_eq!(portal, before);

        portal.used = false;
        portal.advance(3.0, 1.0);
        assert_eq!(portal.pos.x, 297.0);
        assert_eq!(portal.rotation, PORTAL_SPIN_RATE);
    }
}
