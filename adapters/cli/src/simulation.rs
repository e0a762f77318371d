use std::{collections::VecDeque, time::Duration};

use alien_creep_core::{CellCoord, Command, Event, GameState};
use alien_creep_system_enemy_group::EnemyGroup;
use alien_creep_system_shooting::Shooting;
use alien_creep_world::{self as world, query, World};
use anyhow::{ensure, Context, Result};
use log::{debug, info};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::SimulationConfig;

/// Result of a headless session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Report {
    /// Terminal state reached, if any, before the frame budget ran out.
    pub(crate) outcome: Option<GameState>,
    pub(crate) frames: u64,
    pub(crate) score: u32,
    pub(crate) terminal_events: u32,
    /// Simulated time the world advanced through.
    pub(crate) elapsed: Duration,
}

/// Owns the world and every system, and pumps commands between them.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    group: EnemyGroup,
    shooting: Shooting,
    frame: Duration,
    rng: ChaCha8Rng,
    target_column: Option<u32>,
    terminal_events: u32,
}

impl Simulation {
    pub(crate) fn new(config: &SimulationConfig) -> Result<Self> {
        ensure!(
            config.session.frame_ms > 0,
            "session frame duration must be positive"
        );
        let group_config = config.group.to_config();
        let group = EnemyGroup::new(group_config).context("invalid enemy group configuration")?;

        Ok(Self {
            world: World::new(group_config.dimensions()),
            group,
            shooting: Shooting::new(config.shooting.to_config()),
            frame: config.session.frame(),
            rng: ChaCha8Rng::seed_from_u64(config.session.seed),
            target_column: None,
            terminal_events: 0,
        })
    }

    pub(crate) fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Starts a game and advances frames until it ends or `max_frames` elapse.
    pub(crate) fn run(&mut self, max_frames: u64) -> Report {
        self.dispatch(Command::StartGame);

        for frame in 1..=max_frames {
            self.steer_gun();
            self.dispatch(Command::Tick { dt: self.frame });

            let state = query::game_state(&self.world);
            if state.is_over() {
                return self.report(Some(state), frame);
            }
        }
        self.report(None, max_frames)
    }

    fn report(&self, outcome: Option<GameState>, frames: u64) -> Report {
        Report {
            outcome,
            frames,
            score: query::score(&self.world),
            terminal_events: self.terminal_events,
            elapsed: query::elapsed(&self.world),
        }
    }

    fn dispatch(&mut self, command: Command) {
        let mut queue = VecDeque::from([command]);
        while let Some(command) = queue.pop_front() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);

            let game_state = query::game_state(&self.world);
            let mut commands = Vec::new();
            self.group.handle(&events, game_state, &mut commands);
            let snapshot = self.group.snapshot();
            let world = &self.world;
            self.shooting.handle(
                &events,
                game_state,
                &snapshot,
                |cell| query::is_enemy_alive(world, cell),
                &mut commands,
            );

            for event in &events {
                match event {
                    Event::TimeAdvanced { .. } => {}
                    Event::GameWon | Event::GameLost => {
                        self.terminal_events += 1;
                        info!("{event:?}");
                    }
                    _ => debug!("{event:?}"),
                }
            }
            queue.extend(commands);
        }
    }

    /// Keeps the gun under a randomly chosen column that still holds enemies.
    fn steer_gun(&mut self) {
        let snapshot = self.group.snapshot();
        let Some(bounds) = snapshot.bounds.filter(|_| snapshot.remaining > 0) else {
            self.target_column = None;
            return;
        };
        let rows = query::dimensions(&self.world).rows();
        let world = &self.world;
        let column_alive = |column: u32| {
            (0..rows).any(|row| query::is_enemy_alive(world, CellCoord::new(column, row)))
        };

        if !self.target_column.is_some_and(|column| column_alive(column)) {
            let candidates: Vec<u32> = (bounds.left_column..=bounds.right_column)
                .filter(|&column| column_alive(column))
                .collect();
            self.target_column = candidates.choose(&mut self.rng).copied();
            if let Some(column) = self.target_column {
                debug!("autopilot targeting column {column}");
            }
        }

        if let Some(column) = self.target_column {
            let x = snapshot.anchor.x + column as f32 + 0.5;
            self.shooting.aim(x, query::game_state(&self.world));
        }
    }
}
