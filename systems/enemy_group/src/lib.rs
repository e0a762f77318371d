#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy group system that sweeps the formation across the playfield,
//! descends it at the edges during play and reports win/lose outcomes.

use std::time::Duration;

use alien_creep_core::{
    Anchor, CellCoord, Command, Event, GameState, GridDimensions, GridError, GridOccupancy,
    GroupSnapshot, Heading, HorizontalDirection, OccupiedBounds, VerticalDirection,
    PLAYABLE_WIDTH_UNITS,
};
use log::{debug, warn};
use thiserror::Error;

/// Configuration parameters required to construct the enemy group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    rows: u32,
    columns: u32,
    speed: f32,
    start_y: f32,
    ground_threshold: f32,
    descent_distance: f32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `speed` is measured in world units per second, `start_y` is the anchor
    /// height at reset, `ground_threshold` is the height at which the lowest
    /// enemy row ends the game, and `descent_distance` is how far the group
    /// drops at each playfield edge.
    #[must_use]
    pub const fn new(
        rows: u32,
        columns: u32,
        speed: f32,
        start_y: f32,
        ground_threshold: f32,
        descent_distance: f32,
    ) -> Self {
        Self {
            rows,
            columns,
            speed,
            start_y,
            ground_threshold,
            descent_distance,
        }
    }

    /// Checks the configuration, rejecting values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::NoRows);
        }
        if self.columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if !self.descent_distance.is_finite() || self.descent_distance <= 0.0 {
            return Err(ConfigError::InvalidDescentDistance(self.descent_distance));
        }
        if !self.start_y.is_finite() {
            return Err(ConfigError::NonFinite("start_y"));
        }
        if !self.ground_threshold.is_finite() {
            return Err(ConfigError::NonFinite("ground_threshold"));
        }
        Ok(())
    }

    /// Dimensions of the enemy grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.columns, self.rows)
    }

    /// Horizontal and vertical travel speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Anchor height applied at reset.
    #[must_use]
    pub const fn start_y(&self) -> f32 {
        self.start_y
    }

    /// Height at or below which the lowest enemy row ends the game.
    #[must_use]
    pub const fn ground_threshold(&self) -> f32 {
        self.ground_threshold
    }

    /// Distance the group drops at each playfield edge.
    #[must_use]
    pub const fn descent_distance(&self) -> f32 {
        self.descent_distance
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(5, 8, 1.0, 5.0, 1.0, 0.5)
    }
}

/// Reasons an enemy group configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no rows.
    #[error("enemy group needs at least one row")]
    NoRows,
    /// The grid has no columns.
    #[error("enemy group needs at least one column")]
    NoColumns,
    /// The speed is zero, negative or not a number.
    #[error("enemy group speed must be a positive number, got {0}")]
    InvalidSpeed(f32),
    /// The descent distance is zero, negative or not a number.
    #[error("descent distance must be a positive number, got {0}")]
    InvalidDescentDistance(f32),
    /// A positional value is infinite or not a number.
    #[error("`{0}` must be a finite number")]
    NonFinite(&'static str),
}

/// Terminal condition detected by the group while the game is in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupOutcome {
    /// Every enemy was destroyed.
    Cleared,
    /// The lowest enemy row reached the ground threshold.
    Landed,
}

impl GroupOutcome {
    /// Command the world expects for this outcome.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::Cleared => Command::WinGame,
            Self::Landed => Command::LoseGame,
        }
    }
}

/// World-space x range the anchor may sweep across before turning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TravelLimits {
    /// Smallest anchor x before the group turns or descends.
    pub x_min: f32,
    /// Largest anchor x before the group turns or descends.
    pub x_max: f32,
}

impl TravelLimits {
    /// Derives the limits from the occupied flank columns.
    ///
    /// Each column is one world unit wide, so losing a flank column lets the
    /// anchor travel one unit further in that direction.
    #[must_use]
    pub fn from_bounds(bounds: OccupiedBounds) -> Self {
        let last_unit = (PLAYABLE_WIDTH_UNITS - 1) as f32;
        Self {
            x_min: -(bounds.left_column as f32),
            x_max: last_unit - bounds.right_column as f32,
        }
    }

    /// Horizontal distance the anchor may cover in one sweep.
    #[must_use]
    pub fn span(&self) -> f32 {
        self.x_max - self.x_min
    }
}

/// Stateful system driving the enemy formation.
#[derive(Debug)]
pub struct EnemyGroup {
    config: Config,
    grid: GridOccupancy,
    bounds: Option<OccupiedBounds>,
    limits: Option<TravelLimits>,
    anchor: Anchor,
    heading: Heading,
    heading_before_descent: HorizontalDirection,
    descent_start_y: f32,
    remaining: u32,
}

impl EnemyGroup {
    /// Creates a fully populated group at its start position.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut group = Self {
            config,
            grid: GridOccupancy::new(config.dimensions()),
            bounds: None,
            limits: None,
            anchor: Anchor::default(),
            heading: Heading::STILL,
            heading_before_descent: HorizontalDirection::Right,
            descent_start_y: config.start_y,
            remaining: 0,
        };
        group.reset();
        Ok(group)
    }

    /// Consumes world events to keep the group in sync and emits outcome commands.
    pub fn handle(&mut self, events: &[Event], game_state: GameState, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GameStarted => self.reset(),
                Event::EnemyDestroyed { cell } => {
                    if let Err(error) = self.on_enemy_destroyed(*cell) {
                        warn!("ignoring destruction notice: {error}");
                    }
                }
                Event::TimeAdvanced { dt } => {
                    if let Some(outcome) = self.tick(*dt, game_state) {
                        out.push(outcome.command());
                    }
                }
                _ => {}
            }
        }
    }

    /// Repopulates the grid and returns the group to its start position,
    /// sweeping right.
    pub fn reset(&mut self) {
        self.grid.populate();
        self.remaining = u32::try_from(self.grid.occupied_count()).unwrap_or(u32::MAX);
        self.anchor = Anchor::new(0.0, self.config.start_y);
        self.heading = Heading::sweeping(HorizontalDirection::Right);
        self.heading_before_descent = HorizontalDirection::Right;
        self.descent_start_y = self.config.start_y;
        self.recalculate_bounds();
    }

    /// Clears the destroyed enemy's cell and recomputes the boundaries.
    ///
    /// Invalid cells are reported and leave the remaining count untouched.
    pub fn on_enemy_destroyed(&mut self, cell: CellCoord) -> Result<(), GridError> {
        self.grid.clear(cell)?;
        self.remaining = self.remaining.saturating_sub(1);
        self.recalculate_bounds();
        debug!(
            "enemy at {cell:?} removed from group, {} remaining",
            self.remaining
        );
        Ok(())
    }

    /// Advances the group by one frame.
    ///
    /// Direction changes are resolved first, then the anchor moves by the
    /// full step even on the frame the direction changed. Outcomes are only
    /// evaluated while the game is in play.
    pub fn tick(&mut self, dt: Duration, game_state: GameState) -> Option<GroupOutcome> {
        self.update_heading(game_state);

        let step = self.config.speed * dt.as_secs_f32();
        self.anchor.x += self.heading.horizontal.sign() * step;
        self.anchor.y += self.heading.vertical.sign() * step;

        if game_state.is_playing() {
            self.evaluate_outcome()
        } else {
            None
        }
    }

    /// Captures a read-only snapshot of the group.
    #[must_use]
    pub fn snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            anchor: self.anchor,
            dimensions: self.grid.dimensions(),
            bounds: self.bounds,
            remaining: self.remaining,
        }
    }

    /// Current anchor position.
    #[must_use]
    pub const fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Current travel direction.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Enemies the group still counts as alive.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Extremes of the occupied cells, `None` once the grid is empty.
    #[must_use]
    pub const fn bounds(&self) -> Option<OccupiedBounds> {
        self.bounds
    }

    /// Anchor travel range derived from the occupied flank columns.
    #[must_use]
    pub const fn travel_limits(&self) -> Option<TravelLimits> {
        self.limits
    }

    /// Occupancy of the enemy grid as seen by the group.
    #[must_use]
    pub const fn grid(&self) -> &GridOccupancy {
        &self.grid
    }

    fn recalculate_bounds(&mut self) {
        self.bounds = self.grid.bounds();
        self.limits = self.bounds.map(TravelLimits::from_bounds);
    }

    fn update_heading(&mut self, game_state: GameState) {
        if let Some(limits) = self.limits {
            if self.heading.horizontal == HorizontalDirection::Right
                && self.anchor.x >= limits.x_max
            {
                self.turn_at_edge(game_state, HorizontalDirection::Left);
            }

            if self.heading.horizontal == HorizontalDirection::Left
                && self.anchor.x <= limits.x_min
            {
                self.turn_at_edge(game_state, HorizontalDirection::Right);
            }
        }

        if self.heading.vertical == VerticalDirection::Down
            && self.descent_start_y - self.anchor.y >= self.config.descent_distance
        {
            self.heading = Heading::sweeping(self.heading_before_descent.reversed());
        }
    }

    fn turn_at_edge(&mut self, game_state: GameState, demo_direction: HorizontalDirection) {
        if game_state.is_playing() {
            self.heading_before_descent = self.heading.horizontal;
            self.heading = Heading::DESCENDING;
            self.descent_start_y = self.anchor.y;
        } else {
            self.heading.horizontal = demo_direction;
        }
    }

    fn evaluate_outcome(&mut self) -> Option<GroupOutcome> {
        if self.remaining == 0 {
            self.heading = Heading::STILL;
            return Some(GroupOutcome::Cleared);
        }

        let bounds = self.bounds?;
        if self.anchor.y + bounds.lowest_row as f32 <= self.config.ground_threshold {
            self.heading = Heading::STILL;
            return Some(GroupOutcome::Landed);
        }
        None
    }
}
