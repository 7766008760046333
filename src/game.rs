//! Frame-driven game driver
//!
//! Owns the simulation state, its seeded RNG and a best-score store. The host
//! calls [`Game::flap`] on input and [`Game::step`] once per frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::best_score::BestScoreStore;
use crate::config::{ConfigError, SimConfig};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, restart, tick};

/// Serialized save: the world plus the RNG stream position
#[derive(Serialize, Deserialize)]
struct Snapshot {
    state: GameState,
    rng: Pcg32,
}

/// Game instance holding all state
pub struct Game<S: BestScoreStore> {
    state: GameState,
    rng: Pcg32,
    store: S,
    /// Input buffered until the next step
    pending: TickInput,
}

impl<S: BestScoreStore> Game<S> {
    pub fn new(config: SimConfig, seed: u64, store: S) -> Result<Self, ConfigError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(config, &mut rng)?;
        log::info!(
            "Flap Rush ({}) starting, seed {}, best {}",
            state.config.variant.as_str(),
            seed,
            store.get()
        );
        Ok(Self {
            state,
            rng,
            store,
            pending: TickInput::default(),
        })
    }

    /// Flap input. After game over the same input starts a new run.
    pub fn flap(&mut self) {
        if self.state.is_game_over() {
            self.pending.restart = true;
        } else {
            self.pending.flap = true;
        }
    }

    /// Start a new run right away
    pub fn restart(&mut self) {
        restart(&mut self.state, &mut self.rng);
        self.pending = TickInput::default();
    }

    /// Advance one frame and return the events it produced
    pub fn step(&mut self) -> &[GameEvent] {
        let input = std::mem::take(&mut self.pending);
        let was_playing = self.state.phase == GamePhase::Playing;

        tick(&mut self.state, &input, &mut self.rng);

        if was_playing && self.state.is_game_over() {
            self.report_score(self.state.score.score);
        }
        &self.state.events
    }

    fn report_score(&mut self, score: u64) {
        if score > self.store.get() {
            log::info!("New best score: {}", score);
            self.store.set(score);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best_score(&self) -> u64 {
        self.store.get()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize the world and RNG so a later `restore` replays identically
    pub fn snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Snapshot {
            state: self.state.clone(),
            rng: self.rng.clone(),
        })
    }

    /// Resume from a snapshot, keeping this game's best-score store
    pub fn restore(&mut self, json: &str) -> Result<(), ConfigError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.state.config.validate()?;
        self.state = snapshot.state;
        self.rng = snapshot.rng;
        self.pending = TickInput::default();
        log::info!("Game restored at tick {}", self.state.time_ticks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::best_score::{JsonBestScore, MemoryBestScore};

    fn game(best: u64) -> Game<MemoryBestScore> {
        Game::new(SimConfig::classic(), 11, MemoryBestScore::new(best)).unwrap()
    }

    /// Let the bird drop into the floor
    fn run_until_dead<S: BestScoreStore>(game: &mut Game<S>) {
        for _ in 0..200 {
            game.step();
            if game.state().is_game_over() {
                return;
            }
        }
        panic!("bird never died");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            gap_min: 500.0,
            ..SimConfig::classic()
        };
        assert!(Game::new(config, 1, MemoryBestScore::default()).is_err());
    }

    #[test]
    fn test_flap_applies_on_next_step() {
        let mut game = game(0);
        game.flap();
        let events = game.step();
        assert!(events.contains(&GameEvent::Flapped));
        assert!(game.state().bird.velocity < 0.0);
        // One-shot: the next step falls again
        game.step();
        assert!(!game.state().events.contains(&GameEvent::Flapped));
    }

    #[test]
    fn test_best_score_reported_once() {
        let mut game = game(0);
        run_until_dead(&mut game);
        assert!(
            game.state()
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Died { .. }))
        );
        assert_eq!(game.best_score(), game.state().score.score);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut game = game(99);
        run_until_dead(&mut game);
        assert_eq!(game.best_score(), 99);
    }

    #[test]
    fn test_higher_score_replaces_best() {
        let mut game = Game::new(SimConfig::classic(), 11, JsonBestScore::default()).unwrap();
        game.state.score.score = 17;
        game.state.bird.pos.y = 0.0;
        game.step();
        assert!(game.state().is_game_over());
        assert_eq!(game.best_score(), 17);
        assert_eq!(game.store().record().runs, 1);

        // Game-over frames don't re-report
        game.step();
        assert_eq!(game.store().record().runs, 1);
    }

    #[test]
    fn test_flap_restarts_after_game_over() {
        let mut game = game(0);
        run_until_dead(&mut game);
        game.flap();
        let events = game.step();
        assert_eq!(events, &[GameEvent::Restarted]);
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert_eq!(game.state().score.score, 0);
    }

    #[test]
    fn test_snapshot_resumes_identically() {
        let mut game = Game::new(SimConfig::ultimate(), 5, MemoryBestScore::default()).unwrap();
        for i in 0..40 {
            if i % 9 == 0 {
                game.flap();
            }
            game.step();
        }
        let saved = game.snapshot().unwrap();

        let mut resumed = Game::new(SimConfig::ultimate(), 999, MemoryBestScore::default()).unwrap();
        resumed.restore(&saved).unwrap();

        for _ in 0..60 {
            game.step();
            resumed.step();
        }
        assert_eq!(game.state(), resumed.state());
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let mut game = game(0);
        let before = game.state().clone();
        assert!(matches!(
            game.restore("nope"),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(game.state(), &before);
    }
}
