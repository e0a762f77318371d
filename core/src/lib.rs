#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Alien Creep engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod grid;

pub use grid::{GridError, GridOccupancy};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Alien Creep.";

/// Width of the playable area measured in world units.
///
/// Each enemy column occupies exactly one unit, so the rightmost column a
/// group may reach is `PLAYABLE_WIDTH_UNITS - 1`.
pub const PLAYABLE_WIDTH_UNITS: u32 = 10;

/// Overall phase of a running game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Value held before the world finished initialising.
    #[default]
    Undefined,
    /// Title screen; the enemy group sweeps without descending.
    InMenu,
    /// Active play; scoring, descent and win/lose evaluation are enabled.
    InPlay,
    /// Every enemy was destroyed.
    Win,
    /// The enemy group reached the ground.
    Lose,
}

impl GameState {
    /// Reports whether gameplay-only operations are currently permitted.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::InPlay)
    }

    /// Reports whether the game finished with either outcome.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Returns the game to the title screen.
    EnterMenu,
    /// Resets the score and begins a new game.
    StartGame,
    /// Reports that a collision destroyed the enemy occupying `cell`.
    DestroyEnemy {
        /// Grid cell of the destroyed enemy.
        cell: CellCoord,
        /// Points awarded for the destruction.
        points: u32,
    },
    /// Declares that the player destroyed every enemy.
    WinGame,
    /// Declares that the enemy group reached the ground.
    LoseGame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the title screen became active.
    MenuEntered,
    /// Announces that a new game started.
    GameStarted,
    /// Announces that the player won the current game.
    GameWon,
    /// Announces that the player lost the current game.
    GameLost,
    /// Reports the score after it changed.
    ScoreChanged {
        /// Total score accumulated in the current game.
        score: u32,
    },
    /// Confirms that an enemy was fully removed from the world.
    ///
    /// Delivered at the frame boundary following the destruction request, so
    /// listeners never observe an enemy that is only partially removed.
    EnemyDestroyed {
        /// Grid cell the enemy occupied.
        cell: CellCoord,
    },
    /// Reports that a destruction request was rejected.
    DestructionRejected {
        /// Cell named by the rejected request.
        cell: CellCoord,
        /// Specific reason the request failed.
        reason: DestructionError,
    },
}

/// Reasons a destruction request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionError {
    /// The game is not in play, so scoring is disabled.
    InvalidState,
    /// The cell lies outside the enemy grid.
    OutOfBounds,
    /// The enemy occupying the cell was already destroyed.
    AlreadyDestroyed,
}

/// Location of a single enemy grid cell.
///
/// Column 0 is the leftmost column and row 0 the bottom row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Dimensions of the enemy grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells, `columns * rows`.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Iterates over every cell, bottom row first, left to right.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

/// Horizontal travel direction of the enemy group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalDirection {
    /// Travelling toward decreasing x.
    Left,
    /// No horizontal motion.
    #[default]
    Still,
    /// Travelling toward increasing x.
    Right,
}

impl HorizontalDirection {
    /// Unit sign of the direction: `-1.0`, `0.0` or `1.0`.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Still => 0.0,
            Self::Right => 1.0,
        }
    }

    /// Direction pointing the opposite way. `Still` stays `Still`.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Still => Self::Still,
            Self::Right => Self::Left,
        }
    }
}

/// Vertical travel direction of the enemy group. The group never rises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalDirection {
    /// No vertical motion.
    #[default]
    Still,
    /// Descending toward the ground.
    Down,
}

impl VerticalDirection {
    /// Unit sign of the direction: `0.0` or `-1.0`.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Still => 0.0,
            Self::Down => -1.0,
        }
    }
}

/// Combined travel direction of the enemy group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    /// Horizontal component.
    pub horizontal: HorizontalDirection,
    /// Vertical component.
    pub vertical: VerticalDirection,
}

impl Heading {
    /// Heading of a group at rest.
    pub const STILL: Self = Self {
        horizontal: HorizontalDirection::Still,
        vertical: VerticalDirection::Still,
    };

    /// Heading of a group sweeping in the provided horizontal direction.
    #[must_use]
    pub const fn sweeping(horizontal: HorizontalDirection) -> Self {
        Self {
            horizontal,
            vertical: VerticalDirection::Still,
        }
    }

    /// Heading of a group descending straight down.
    pub const DESCENDING: Self = Self {
        horizontal: HorizontalDirection::Still,
        vertical: VerticalDirection::Down,
    };

    /// Reports whether the heading produces no motion.
    #[must_use]
    pub fn is_still(&self) -> bool {
        *self == Self::STILL
    }
}

/// Anchor of the enemy group in world units.
///
/// The anchor is the bottom-left corner of cell `(0, 0)`; the enemy in
/// `(column, row)` covers `[x + column, x + column + 1)` horizontally and
/// `[y + row, y + row + 1)` vertically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Horizontal world position.
    pub x: f32,
    /// Vertical world position.
    pub y: f32,
}

impl Anchor {
    /// Creates an anchor at the provided world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Resolves the grid cell covering a world-space point, if any.
    #[must_use]
    pub fn cell_at(&self, x: f32, y: f32, dimensions: GridDimensions) -> Option<CellCoord> {
        let column = (x - self.x).floor();
        let row = (y - self.y).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        let cell = CellCoord::new(column as u32, row as u32);
        dimensions.contains(cell).then_some(cell)
    }
}

/// Extremes of the currently occupied cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupiedBounds {
    /// Smallest column index containing an enemy.
    pub left_column: u32,
    /// Largest column index containing an enemy.
    pub right_column: u32,
    /// Smallest row index containing an enemy.
    pub lowest_row: u32,
}

/// Read-only snapshot of the enemy group used by other systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupSnapshot {
    /// Current anchor position.
    pub anchor: Anchor,
    /// Dimensions of the enemy grid.
    pub dimensions: GridDimensions,
    /// Extremes of the occupied cells, `None` once every enemy is gone.
    pub bounds: Option<OccupiedBounds>,
    /// Number of enemies the group still counts as alive.
    pub remaining: u32,
}
