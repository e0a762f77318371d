#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Alien Creep.
//!
//! The world owns the game phase, the score and the roster of live enemy
//! entities. Enemy destruction is handled in two phases: the roster and score
//! change as soon as the command is applied, while the matching
//! [`Event::EnemyDestroyed`] is queued and only broadcast at the next frame
//! boundary, when the removal is complete.

use std::{collections::VecDeque, time::Duration};

use alien_creep_core::{
    CellCoord, Command, DestructionError, Event, GameState, GridDimensions, GridError,
    GridOccupancy, WELCOME_BANNER,
};
use log::{debug, info, warn};

/// Represents the authoritative Alien Creep world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    state: GameState,
    score: u32,
    roster: GridOccupancy,
    pending: VecDeque<CellCoord>,
    elapsed: Duration,
}

impl World {
    /// Creates a new world on the title screen with a fully populated roster.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            banner: WELCOME_BANNER,
            state: GameState::InMenu,
            score: 0,
            roster: GridOccupancy::new(dimensions),
            pending: VecDeque::with_capacity(dimensions.cell_count()),
            elapsed: Duration::ZERO,
        }
    }

    fn start_game(&mut self, out_events: &mut Vec<Event>) {
        match self.state {
            GameState::InPlay => {
                warn!("start requested while a game is already in play; ignoring");
                return;
            }
            GameState::Win | GameState::Lose => {
                self.enter_menu(out_events);
            }
            GameState::Undefined | GameState::InMenu => {}
        }

        self.roster.populate();
        self.pending.clear();
        self.score = 0;
        out_events.push(Event::ScoreChanged { score: self.score });
        self.state = GameState::InPlay;
        info!("game started");
        out_events.push(Event::GameStarted);
    }

    fn enter_menu(&mut self, out_events: &mut Vec<Event>) {
        if self.state == GameState::InMenu {
            return;
        }
        if self.state == GameState::InPlay {
            info!("abandoning game in progress with score {}", self.score);
        }
        self.state = GameState::InMenu;
        out_events.push(Event::MenuEntered);
    }

    fn destroy_enemy(&mut self, cell: CellCoord, points: u32, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.remove_from_roster(cell) {
            warn!("rejected destruction of enemy at {cell:?}: {reason:?}");
            out_events.push(Event::DestructionRejected { cell, reason });
            return;
        }

        self.pending.push_back(cell);
        self.score = self.score.saturating_add(points);
        out_events.push(Event::ScoreChanged { score: self.score });
    }

    fn remove_from_roster(&mut self, cell: CellCoord) -> Result<(), DestructionError> {
        if !self.state.is_playing() {
            return Err(DestructionError::InvalidState);
        }
        self.roster.clear(cell).map_err(|error| match error {
            GridError::OutOfBounds(_) => DestructionError::OutOfBounds,
            GridError::AlreadyEmpty(_) => DestructionError::AlreadyDestroyed,
        })
    }

    fn finish(&mut self, outcome: GameState, out_events: &mut Vec<Event>) {
        if !self.state.is_playing() {
            debug!("ignoring {outcome:?} outside of play (state {:?})", self.state);
            return;
        }
        self.state = outcome;
        info!("game finished with {outcome:?}, score {}", self.score);
        out_events.push(match outcome {
            GameState::Win => Event::GameWon,
            _ => Event::GameLost,
        });
    }

    fn flush_pending(&mut self, out_events: &mut Vec<Event>) {
        for cell in self.pending.drain(..) {
            out_events.push(Event::EnemyDestroyed { cell });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.flush_pending(out_events);
            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::EnterMenu => world.enter_menu(out_events),
        Command::StartGame => world.start_game(out_events),
        Command::DestroyEnemy { cell, points } => world.destroy_enemy(cell, points, out_events),
        Command::WinGame => world.finish(GameState::Win, out_events),
        Command::LoseGame => world.finish(GameState::Lose, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use alien_creep_core::{CellCoord, GameState, GridDimensions};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current phase of the game.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Score accumulated in the current game.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Reports whether the enemy entity in `cell` is still present.
    ///
    /// Removal is visible here as soon as a destruction command is applied,
    /// ahead of the deferred [`alien_creep_core::Event::EnemyDestroyed`].
    #[must_use]
    pub fn is_enemy_alive(world: &World, cell: CellCoord) -> bool {
        world.roster.is_occupied(cell)
    }

    /// Number of enemy entities still present.
    #[must_use]
    pub fn live_enemies(world: &World) -> usize {
        world.roster.occupied_count()
    }

    /// Dimensions of the enemy roster.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.roster.dimensions()
    }

    /// Number of destruction notifications waiting for the next frame boundary.
    #[must_use]
    pub fn pending_notifications(world: &World) -> usize {
        world.pending.len()
    }

    /// Total simulated time the world has advanced through.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }
}
