#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gun and bullet system that fires on a fixed cadence while the game is in
//! play and turns bullet hits into enemy destruction commands.

use std::time::Duration;

use alien_creep_core::{
    CellCoord, Command, Event, GameState, GroupSnapshot, PLAYABLE_WIDTH_UNITS,
};
use log::trace;

/// Configuration parameters required to construct the shooting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    shot_interval: Duration,
    bullet_speed: f32,
    gun_start_x: f32,
    gun_y: f32,
    ceiling_y: f32,
    points_per_enemy: u32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Bullets leave the gun at (`gun_x`, `gun_y`), rise at `bullet_speed`
    /// world units per second and disappear once above `ceiling_y`.
    #[must_use]
    pub const fn new(
        shot_interval: Duration,
        bullet_speed: f32,
        gun_start_x: f32,
        gun_y: f32,
        ceiling_y: f32,
        points_per_enemy: u32,
    ) -> Self {
        Self {
            shot_interval,
            bullet_speed,
            gun_start_x,
            gun_y,
            ceiling_y,
            points_per_enemy,
        }
    }

    /// Points awarded for every enemy a bullet destroys.
    #[must_use]
    pub const fn points_per_enemy(&self) -> u32 {
        self.points_per_enemy
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(250),
            12.0,
            PLAYABLE_WIDTH_UNITS as f32 / 2.0,
            0.0,
            16.0,
            100,
        )
    }
}

/// Bullet travelling up the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    /// Horizontal world position.
    pub x: f32,
    /// Vertical world position.
    pub y: f32,
}

/// Stateful system owning the gun and its bullets.
#[derive(Debug)]
pub struct Shooting {
    config: Config,
    gun_x: f32,
    fire_timer: Duration,
    bullets: Vec<Bullet>,
}

impl Shooting {
    /// Creates a new shooting system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            gun_x: config.gun_start_x,
            fire_timer: Duration::ZERO,
            bullets: Vec::new(),
        }
    }

    /// Consumes world events and the group snapshot to emit destruction commands.
    ///
    /// `is_enemy_alive` reports whether the world still holds the enemy in a
    /// cell; bullets pass through cells whose enemy is already gone.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        game_state: GameState,
        group: &GroupSnapshot,
        is_enemy_alive: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        for event in events {
            match event {
                Event::GameStarted => self.restart(),
                Event::TimeAdvanced { dt } => {
                    self.move_bullets(*dt);
                    if game_state.is_playing() {
                        self.resolve_hits(group, &is_enemy_alive, out);
                        self.fire(*dt);
                    }
                }
                _ => {}
            }
        }
    }

    /// Moves the gun horizontally while the game is in play.
    pub fn aim(&mut self, x: f32, game_state: GameState) {
        if !game_state.is_playing() || !x.is_finite() {
            return;
        }
        self.gun_x = x.clamp(0.0, PLAYABLE_WIDTH_UNITS as f32);
    }

    /// Current horizontal gun position.
    #[must_use]
    pub const fn gun_x(&self) -> f32 {
        self.gun_x
    }

    /// Bullets currently in flight.
    #[must_use]
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    fn restart(&mut self) {
        self.bullets.clear();
        self.fire_timer = Duration::ZERO;
        self.gun_x = self.config.gun_start_x;
    }

    fn move_bullets(&mut self, dt: Duration) {
        let rise = self.config.bullet_speed * dt.as_secs_f32();
        for bullet in &mut self.bullets {
            bullet.y += rise;
        }
        let ceiling = self.config.ceiling_y;
        self.bullets.retain(|bullet| bullet.y <= ceiling);
    }

    fn resolve_hits<F>(&mut self, group: &GroupSnapshot, is_enemy_alive: &F, out: &mut Vec<Command>)
    where
        F: Fn(CellCoord) -> bool,
    {
        let mut struck: Vec<CellCoord> = Vec::new();
        self.bullets.retain(|bullet| {
            let Some(cell) = group.anchor.cell_at(bullet.x, bullet.y, group.dimensions) else {
                return true;
            };
            if !is_enemy_alive(cell) || struck.contains(&cell) {
                return true;
            }
            struck.push(cell);
            false
        });

        let points = self.config.points_per_enemy;
        for cell in struck {
            trace!("bullet struck enemy at {cell:?}");
            out.push(Command::DestroyEnemy { cell, points });
        }
    }

    fn fire(&mut self, dt: Duration) {
        self.fire_timer = self.fire_timer.saturating_add(dt);
        if self.fire_timer >= self.config.shot_interval {
            self.bullets.push(Bullet {
                x: self.gun_x,
                y: self.config.gun_y,
            });
            self.fire_timer = Duration::ZERO;
        }
    }
}
