//! Timed effect bank
//!
//! Each effect is an independent countdown in ticks. Activation sets the
//! timer to the effect's full duration (re-collecting resets, never stacks)
//! and `decay` is the only thing that ever lowers it.

use serde::{Deserialize, Serialize};

use crate::config::EffectDurations;

/// A timed buff or debuff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Shield,
    Magnet,
    Speed,
    Fire,
    TimeWarp,
    /// Post-teleport intangibility
    Ghost,
}

impl Effect {
    pub const ALL: [Effect; 6] = [
        Effect::Shield,
        Effect::Magnet,
        Effect::Speed,
        Effect::Fire,
        Effect::TimeWarp,
        Effect::Ghost,
    ];

    fn duration(&self, durations: &EffectDurations) -> u32 {
        match self {
            Effect::Shield => durations.shield,
            Effect::Magnet => durations.magnet,
            Effect::Speed => durations.speed,
            Effect::Fire => durations.fire,
            Effect::TimeWarp => durations.time_warp,
            Effect::Ghost => durations.ghost,
        }
    }
}

/// Remaining ticks per effect (0 = inactive)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectBank {
    pub shield: u32,
    pub magnet: u32,
    pub speed: u32,
    pub fire: u32,
    pub time_warp: u32,
    pub ghost: u32,
}

impl EffectBank {
    fn slot_mut(&mut self, effect: Effect) -> &mut u32 {
        match effect {
            Effect::Shield => &mut self.shield,
            Effect::Magnet => &mut self.magnet,
            Effect::Speed => &mut self.speed,
            Effect::Fire => &mut self.fire,
            Effect::TimeWarp => &mut self.time_warp,
            Effect::Ghost => &mut self.ghost,
        }
    }

    pub fn remaining(&self, effect: Effect) -> u32 {
        match effect {
            Effect::Shield => self.shield,
            Effect::Magnet => self.magnet,
            Effect::Speed => self.speed,
            Effect::Fire => self.fire,
            Effect::TimeWarp => self.time_warp,
            Effect::Ghost => self.ghost,
        }
    }

    #[inline]
    pub fn is_active(&self, effect: Effect) -> bool {
        self.remaining(effect) > 0
    }

    /// Start (or restart) an effect at its full duration
    pub fn activate(&mut self, effect: Effect, durations: &EffectDurations) {
        *self.slot_mut(effect) = effect.duration(durations);
    }

    /// Count every timer down by one tick, floored at zero
    pub fn decay(&mut self) {
        for effect in Effect::ALL {
            let slot = self.slot_mut(effect);
            *slot = slot.saturating_sub(1);
        }
    }

    /// Pipes can't hurt the bird
    pub fn intangible(&self) -> bool {
        self.is_active(Effect::Shield) || self.is_active(Effect::Ghost)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_sets_full_duration() {
        let durations = EffectDurations::default();
        let mut bank = EffectBank::default();
        bank.activate(Effect::Shield, &durations);
        assert_eq!(bank.shield, durations.shield);
        assert!(bank.is_active(Effect::Shield));
        assert!(!bank.is_active(Effect::Magnet));
    }

    #[test]
    fn test_reactivation_resets_instead_of_stacking() {
        let durations = EffectDurations::default();
        let mut bank = EffectBank::default();
        bank.activate(Effect::Magnet, &durations);
        for _ in 0..50 {
            bank.decay();
        }
        bank.activate(Effect::Magnet, &durations);
        assert_eq!(bank.magnet, durations.magnet);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let mut bank = EffectBank {
            fire: 2,
            ..Default::default()
        };
        bank.decay();
        assert_eq!(bank.fire, 1);
        bank.decay();
        bank.decay();
        assert_eq!(bank.fire, 0);
        assert_eq!(bank, EffectBank::default());
    }

    #[test]
    fn test_effects_compose() {
        let durations = EffectDurations::default();
        let mut bank = EffectBank::default();
        bank.activate(Effect::Shield, &durations);
        bank.activate(Effect::TimeWarp, &durations);
        bank.decay();
        assert_eq!(bank.shield, durations.shield - 1);
        assert_eq!(bank.time_warp, durations.time_warp - 1);
        assert!(bank.intangible());
    }
}
