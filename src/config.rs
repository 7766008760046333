//! Simulation tuning and variant presets
//!
//! Every per-tick constant the simulation reads lives in [`SimConfig`]. The
//! three game variants differ only in which presets they start from.
//! Configs can be loaded from JSON (a preset plus field overrides) and are
//! validated before a game may be built from them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::state::PowerUpKind;

/// Game variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Normal/moving/shrinking pipes, four power-ups, gravity zones
    #[default]
    Classic,
    /// Adds crystal, laser and wind pipes, energy, fire and time-warp
    Enhanced,
    /// Adds portals, electric pipes, enemies, rain and the multiplier power-up
    Ultimate,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Enhanced => "Enhanced",
            Variant::Ultimate => "Ultimate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "1" => Some(Variant::Classic),
            "enhanced" | "2" => Some(Variant::Enhanced),
            "ultimate" | "3" => Some(Variant::Ultimate),
            _ => None,
        }
    }
}

/// Relative weights of the special pipe kinds (0 = never spawned)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipeWeights {
    pub moving: u32,
    pub shrinking: u32,
    pub crystal: u32,
    pub laser: u32,
    pub portal: u32,
    pub wind: u32,
    pub electric: u32,
}

impl PipeWeights {
    pub fn total(&self) -> u32 {
        self.moving
            + self.shrinking
            + self.crystal
            + self.laser
            + self.portal
            + self.wind
            + self.electric
    }
}

/// Duration in ticks each timed effect lasts once activated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDurations {
    pub shield: u32,
    pub magnet: u32,
    pub speed: u32,
    pub fire: u32,
    pub time_warp: u32,
    pub ghost: u32,
}

impl Default for EffectDurations {
    fn default() -> Self {
        Self {
            shield: 300,
            magnet: 200,
            speed: 180,
            fire: 300,
            time_warp: 240,
            ghost: 60,
        }
    }
}

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no room for a gap: min_top ({min_top}) + gap_min ({gap_min}) + min_bottom ({min_bottom}) exceeds playfield height {height}"
    )]
    InfeasibleGap {
        min_top: f32,
        gap_min: f32,
        min_bottom: f32,
        height: f32,
    },
    #[error("gap range {gap_min}..={gap_max} is empty or not positive")]
    InvalidGap { gap_min: f32, gap_max: f32 },
    #[error("pipe animation ({reach}px) would close a {gap_min}px gap")]
    ShrinkExceedsGap { reach: f32, gap_min: f32 },
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{min_field} must not exceed {max_field}")]
    InvertedRange {
        min_field: &'static str,
        max_field: &'static str,
    },
    #[error("{field} must be a probability in [0, 1]")]
    InvalidChance { field: &'static str },
    #[error("special pipes enabled but every pipe weight is zero")]
    NoSpecialPipes,
    #[error("power-ups enabled but no power-up kinds are configured")]
    NoPowerUps,
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub variant: Variant,

    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Height of the ground strip; the floor line is `screen_height - ground_height`
    pub ground_height: f32,

    // === Bird ===
    /// Home x of the bird's centre
    pub bird_x: f32,
    /// Starting y of the bird's centre
    pub bird_start_y: f32,
    pub bird_size: f32,
    pub gravity: f32,
    pub jump_power: f32,
    pub flap_rotation: f32,
    pub rotation_factor: f32,
    pub rotation_min: f32,
    pub rotation_max: f32,
    /// How fast the bird drifts back to `bird_x` after a teleport (px/tick)
    pub x_return_rate: f32,

    // === Energy ===
    pub max_energy: f32,
    pub energy_regen: f32,
    pub flap_cost: f32,
    /// Flaps are only honored while energy is strictly above this
    pub flap_threshold: f32,

    // === Pipes ===
    pub pipe_speed: f32,
    pub pipe_width: f32,
    pub pipe_spacing: f32,
    pub gap_min: f32,
    pub gap_max: f32,
    pub min_top: f32,
    pub min_bottom: f32,
    pub spawn_floor: usize,
    pub special_chance: f32,
    pub pipe_weights: PipeWeights,
    pub move_amplitude: f32,
    pub shrink_amplitude: f32,
    pub electric_reach: f32,
    pub wind_strength: f32,

    // === Spawns attached to pipes ===
    pub powerup_chance: f32,
    pub powerup_kinds: Vec<PowerUpKind>,
    pub gravity_zone_chance: f32,
    pub low_gravity: f32,
    pub high_gravity: f32,
    pub enemy_chance: f32,
    pub rain_chance: f32,

    // === Scoring ===
    pub normal_points: u64,
    pub special_points: u64,
    pub score_powerup_points: u64,
    pub enemy_bounty: u64,
    pub multiplier_cap: u32,
    pub combo_window: u32,

    // === Effects ===
    pub durations: EffectDurations,
    pub speed_boost: f32,
    pub magnet_range: f32,
    pub magnet_pull: f32,
    pub fire_interval: u32,
    pub time_warp_scale: f32,
    pub teleport_offset: f32,
    pub enemy_contact_drain: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl SimConfig {
    /// Preset for a variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Enhanced => Self::enhanced(),
            Variant::Ultimate => Self::ultimate(),
        }
    }

    /// The plain three-pipe game
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,

            screen_width: 800.0,
            screen_height: 600.0,
            ground_height: 0.0,

            bird_x: 165.0,
            bird_start_y: 315.0,
            bird_size: 30.0,
            gravity: 0.6,
            jump_power: -12.0,
            flap_rotation: -0.3,
            rotation_factor: 0.05,
            rotation_min: -0.5,
            rotation_max: 1.2,
            x_return_rate: 2.0,

            // Flapping is free in the classic game
            max_energy: 100.0,
            energy_regen: 0.5,
            flap_cost: 0.0,
            flap_threshold: 0.0,

            pipe_speed: 3.0,
            pipe_width: 60.0,
            pipe_spacing: 300.0,
            gap_min: 180.0,
            gap_max: 180.0,
            min_top: 100.0,
            min_bottom: 100.0,
            spawn_floor: 3,
            special_chance: 0.15,
            pipe_weights: PipeWeights {
                moving: 3,
                shrinking: 2,
                ..Default::default()
            },
            move_amplitude: 50.0,
            shrink_amplitude: 30.0,
            electric_reach: 20.0,
            wind_strength: 0.25,

            powerup_chance: 0.3,
            powerup_kinds: vec![
                PowerUpKind::Speed,
                PowerUpKind::Shield,
                PowerUpKind::Magnet,
                PowerUpKind::Score,
            ],
            gravity_zone_chance: 0.2,
            low_gravity: 0.3,
            high_gravity: 1.2,
            enemy_chance: 0.0,
            rain_chance: 0.0,

            normal_points: 1,
            special_points: 2,
            score_powerup_points: 5,
            enemy_bounty: 3,
            multiplier_cap: 1,
            combo_window: 120,

            durations: EffectDurations::default(),
            speed_boost: 2.0,
            magnet_range: 100.0,
            magnet_pull: 0.1,
            fire_interval: 12,
            time_warp_scale: 0.3,
            teleport_offset: 150.0,
            enemy_contact_drain: 30.0,
        }
    }

    /// Energy-limited flaps, destructible and hazardous pipes
    pub fn enhanced() -> Self {
        Self {
            variant: Variant::Enhanced,
            flap_cost: 8.0,
            flap_threshold: 8.0,
            gap_min: 160.0,
            gap_max: 200.0,
            spawn_floor: 4,
            pipe_weights: PipeWeights {
                moving: 3,
                shrinking: 2,
                crystal: 2,
                laser: 1,
                wind: 2,
                ..Default::default()
            },
            powerup_kinds: vec![
                PowerUpKind::Speed,
                PowerUpKind::Shield,
                PowerUpKind::Magnet,
                PowerUpKind::Score,
                PowerUpKind::Energy,
                PowerUpKind::Fire,
                PowerUpKind::Time,
            ],
            multiplier_cap: 3,
            ..Self::classic()
        }
    }

    /// Everything: enemies, portals, electric pipes, rain
    pub fn ultimate() -> Self {
        Self {
            variant: Variant::Ultimate,
            pipe_weights: PipeWeights {
                moving: 3,
                shrinking: 2,
                crystal: 2,
                laser: 1,
                portal: 1,
                wind: 2,
                electric: 1,
            },
            powerup_kinds: vec![
                PowerUpKind::Speed,
                PowerUpKind::Shield,
                PowerUpKind::Magnet,
                PowerUpKind::Score,
                PowerUpKind::Energy,
                PowerUpKind::Fire,
                PowerUpKind::Time,
                PowerUpKind::Multi,
            ],
            enemy_chance: 0.25,
            rain_chance: 0.3,
            multiplier_cap: 5,
            ..Self::enhanced()
        }
    }

    /// y coordinate of the floor line
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    /// Largest gap that can still leave both margins on screen
    #[inline]
    pub fn feasible_gap_max(&self) -> f32 {
        self.gap_max
            .min(self.floor_y() - self.min_top - self.min_bottom)
    }

    fn float_fields(&self) -> [(&'static str, f32); 41] {
        [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("ground_height", self.ground_height),
            ("bird_x", self.bird_x),
            ("bird_start_y", self.bird_start_y),
            ("bird_size", self.bird_size),
            ("gravity", self.gravity),
            ("jump_power", self.jump_power),
            ("flap_rotation", self.flap_rotation),
            ("rotation_factor", self.rotation_factor),
            ("rotation_min", self.rotation_min),
            ("rotation_max", self.rotation_max),
            ("x_return_rate", self.x_return_rate),
            ("max_energy", self.max_energy),
            ("energy_regen", self.energy_regen),
            ("flap_cost", self.flap_cost),
            ("flap_threshold", self.flap_threshold),
            ("pipe_speed", self.pipe_speed),
            ("pipe_width", self.pipe_width),
            ("pipe_spacing", self.pipe_spacing),
            ("gap_min", self.gap_min),
            ("gap_max", self.gap_max),
            ("min_top", self.min_top),
            ("min_bottom", self.min_bottom),
            ("special_chance", self.special_chance),
            ("move_amplitude", self.move_amplitude),
            ("shrink_amplitude", self.shrink_amplitude),
            ("electric_reach", self.electric_reach),
            ("wind_strength", self.wind_strength),
            ("powerup_chance", self.powerup_chance),
            ("gravity_zone_chance", self.gravity_zone_chance),
            ("low_gravity", self.low_gravity),
            ("high_gravity", self.high_gravity),
            ("enemy_chance", self.enemy_chance),
            ("rain_chance", self.rain_chance),
            ("speed_boost", self.speed_boost),
            ("magnet_range", self.magnet_range),
            ("magnet_pull", self.magnet_pull),
            ("time_warp_scale", self.time_warp_scale),
            ("teleport_offset", self.teleport_offset),
            ("enemy_contact_drain", self.enemy_contact_drain),
        ]
    }

    /// Reject configurations that could produce an impossible pipe
    pub fn validate(&self) -> Result<(), ConfigError> {
        // NaN slips through every comparison below
        for (field, value) in self.float_fields() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }

        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("bird_size", self.bird_size),
            ("pipe_width", self.pipe_width),
            ("pipe_spacing", self.pipe_spacing),
            ("pipe_speed", self.pipe_speed),
            ("max_energy", self.max_energy),
            ("time_warp_scale", self.time_warp_scale),
            ("x_return_rate", self.x_return_rate),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        if self.spawn_floor == 0 {
            return Err(ConfigError::NonPositive {
                field: "spawn_floor",
            });
        }
        if self.multiplier_cap == 0 {
            return Err(ConfigError::NonPositive {
                field: "multiplier_cap",
            });
        }
        if self.fire_interval == 0 {
            return Err(ConfigError::NonPositive {
                field: "fire_interval",
            });
        }

        let chances = [
            ("special_chance", self.special_chance),
            ("powerup_chance", self.powerup_chance),
            ("gravity_zone_chance", self.gravity_zone_chance),
            ("enemy_chance", self.enemy_chance),
            ("rain_chance", self.rain_chance),
        ];
        for (field, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidChance { field });
            }
        }

        if self.gap_min <= 0.0 || self.gap_min > self.gap_max {
            return Err(ConfigError::InvalidGap {
                gap_min: self.gap_min,
                gap_max: self.gap_max,
            });
        }
        if self.rotation_min > self.rotation_max {
            return Err(ConfigError::InvertedRange {
                min_field: "rotation_min",
                max_field: "rotation_max",
            });
        }

        // Same expression the spawner bounds its gap draw with
        if self.floor_y() - self.min_top - self.min_bottom < self.gap_min {
            return Err(ConfigError::InfeasibleGap {
                min_top: self.min_top,
                gap_min: self.gap_min,
                min_bottom: self.min_bottom,
                height: self.floor_y(),
            });
        }

        // Shrinking pipes and charged electric arcs eat into the gap
        let reach = self.shrink_amplitude.max(2.0 * self.electric_reach);
        if reach >= self.gap_min {
            return Err(ConfigError::ShrinkExceedsGap {
                reach,
                gap_min: self.gap_min,
            });
        }

        if self.special_chance > 0.0 && self.pipe_weights.total() == 0 {
            return Err(ConfigError::NoSpecialPipes);
        }
        if self.powerup_chance > 0.0 && self.powerup_kinds.is_empty() {
            return Err(ConfigError::NoPowerUps);
        }

        Ok(())
    }

    /// Parse a JSON config and validate it.
    ///
    /// The document starts from the preset named by its `variant` field
    /// (Classic when absent); every other field overrides the preset.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let variant = match overrides.get("variant") {
            Some(v) => serde_json::from_value(v.clone())?,
            None => Variant::default(),
        };

        let mut merged = serde_json::to_value(Self::for_variant(variant))?;
        if let (Some(base), Some(fields)) = (merged.as_object_mut(), overrides.as_object()) {
            for (key, value) in fields {
                base.insert(key.clone(), value.clone());
            }
        }

        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        log::info!("Loaded {} config", config.variant.as_str());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
