use std::{collections::VecDeque, time::Duration};

use alien_creep_core::{CellCoord, Command, Event, GameState, Heading, HorizontalDirection};
use alien_creep_system_enemy_group::{Config, EnemyGroup};
use alien_creep_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

struct Harness {
    world: World,
    group: EnemyGroup,
    events: Vec<Event>,
}

impl Harness {
    fn new(config: Config) -> Self {
        Self {
            world: World::new(config.dimensions()),
            group: EnemyGroup::new(config).expect("valid config"),
            events: Vec::new(),
        }
    }

    fn dispatch(&mut self, command: Command) {
        let mut queue = VecDeque::from([command]);
        while let Some(command) = queue.pop_front() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);

            let mut commands = Vec::new();
            self.group
                .handle(&events, query::game_state(&self.world), &mut commands);

            self.events.extend(events);
            queue.extend(commands);
        }
    }

    fn tick(&mut self, dt: Duration) {
        self.dispatch(Command::Tick { dt });
    }

    fn count(&self, expected: &Event) -> usize {
        self.events.iter().filter(|event| *event == expected).count()
    }
}

fn scenario_config() -> Config {
    Config::new(5, 8, 1.0, 5.0, 1.0, 0.5)
}

#[test]
fn destroying_every_enemy_wins_exactly_once() {
    let config = scenario_config();
    let mut harness = Harness::new(config);
    harness.dispatch(Command::StartGame);

    let mut cells: Vec<CellCoord> = config.dimensions().cells().collect();
    cells.reverse();
    cells.swap(3, 27);
    cells.swap(11, 38);

    let mut expected_score = 0;
    for (index, cell) in cells.into_iter().enumerate() {
        let points = 10 + index as u32;
        expected_score += points;
        harness.dispatch(Command::DestroyEnemy { cell, points });
        harness.tick(FRAME);
    }
    for _ in 0..5 {
        harness.tick(FRAME);
    }

    assert_eq!(harness.group.remaining(), 0);
    assert_eq!(harness.count(&Event::GameWon), 1);
    assert_eq!(harness.count(&Event::GameLost), 0);
    assert_eq!(query::game_state(&harness.world), GameState::Win);
    assert_eq!(query::score(&harness.world), expected_score);
    assert!(harness.group.heading().is_still(), "group freezes on win");
}

#[test]
fn untouched_group_lands_exactly_once() {
    let mut harness = Harness::new(scenario_config());
    harness.dispatch(Command::StartGame);

    let dt = Duration::from_millis(250);
    for _ in 0..2_000 {
        harness.tick(dt);
        if query::game_state(&harness.world) != GameState::InPlay {
            break;
        }
    }
    for _ in 0..10 {
        harness.tick(dt);
    }

    assert_eq!(query::game_state(&harness.world), GameState::Lose);
    assert_eq!(harness.count(&Event::GameLost), 1);
    assert_eq!(harness.count(&Event::GameWon), 0);
    assert_eq!(harness.group.heading(), Heading::STILL);
    assert!(harness.group.anchor().y <= 1.0);
}

#[test]
fn group_sees_destruction_only_after_frame_boundary() {
    let mut harness = Harness::new(scenario_config());
    harness.dispatch(Command::StartGame);
    let cell = CellCoord::new(4, 3);

    harness.dispatch(Command::DestroyEnemy { cell, points: 100 });

    assert!(!query::is_enemy_alive(&harness.world, cell));
    assert_eq!(harness.group.remaining(), 40);
    assert!(harness.group.grid().is_occupied(cell));

    harness.tick(FRAME);

    assert_eq!(harness.group.remaining(), 39);
    assert!(!harness.group.grid().is_occupied(cell));
}

#[test]
fn lone_corner_enemy_moves_left_boundary() {
    let config = Config::new(1, 8, 1.0, 5.0, 1.0, 0.5);
    let mut harness = Harness::new(config);
    harness.dispatch(Command::StartGame);

    harness.dispatch(Command::DestroyEnemy {
        cell: CellCoord::new(0, 0),
        points: 100,
    });
    harness.tick(FRAME);

    let bounds = harness.group.bounds().expect("enemies remain");
    assert_eq!(bounds.left_column, 1);
    assert_eq!(bounds.right_column, 7);
    assert_eq!(bounds.lowest_row, 0);
}

#[test]
fn travel_span_never_narrows_as_flanks_fall() {
    let config = scenario_config();
    let mut harness = Harness::new(config);
    harness.dispatch(Command::StartGame);

    let mut previous_span = harness
        .group
        .travel_limits()
        .expect("limits exist")
        .span();
    let flank_order = [0, 7, 1, 6, 2, 5, 3];
    for column in flank_order {
        for row in 0..5 {
            harness.dispatch(Command::DestroyEnemy {
                cell: CellCoord::new(column, row),
                points: 1,
            });
            harness.tick(Duration::ZERO);
            let span = harness
                .group
                .travel_limits()
                .expect("limits exist")
                .span();
            assert!(span >= previous_span, "span narrowed to {span}");
            previous_span = span;
        }
    }
    assert_eq!(previous_span, 9.0);
}

#[test]
fn each_descent_reverses_the_sweep_once() {
    let mut harness = Harness::new(scenario_config());
    harness.dispatch(Command::StartGame);

    let dt = Duration::from_millis(250);
    let mut sweep = harness.group.heading().horizontal;
    let mut reversals = 0;
    let mut descents = 0;
    let mut descending = false;

    while query::game_state(&harness.world) == GameState::InPlay {
        harness.tick(dt);
        let heading = harness.group.heading();
        if heading == Heading::DESCENDING && !descending {
            descending = true;
            descents += 1;
        }
        if descending && heading.horizontal != HorizontalDirection::Still {
            descending = false;
            assert_eq!(heading.horizontal, sweep.reversed());
            sweep = heading.horizontal;
            reversals += 1;
        }
    }

    assert!(descents >= 7, "expected several descents, saw {descents}");
    assert!(reversals == descents || reversals + 1 == descents);
}

#[test]
fn menu_sweep_never_descends() {
    let mut harness = Harness::new(scenario_config());
    let start_y = harness.group.anchor().y;

    for _ in 0..500 {
        harness.tick(Duration::from_millis(50));
    }

    assert_eq!(harness.group.anchor().y, start_y);
    assert_eq!(query::game_state(&harness.world), GameState::InMenu);
    let x = harness.group.anchor().x;
    assert!((-0.1..=2.1).contains(&x), "anchor strayed to {x}");
}

#[test]
fn reset_after_menu_round_trip_fills_every_shape() {
    let dt = Duration::from_millis(250);
    for (rows, columns) in [(1, 1), (1, 10), (7, 3), (3, 12), (5, 8)] {
        let config = Config::new(rows, columns, 1.0, 5.0, 1.0, 0.5);
        let mut harness = Harness::new(config);

        harness.dispatch(Command::EnterMenu);
        for _ in 0..20 {
            harness.tick(dt);
        }
        harness.dispatch(Command::StartGame);

        let bounds = harness.group.bounds().expect("grid is populated");
        assert_eq!(
            (bounds.left_column, bounds.right_column, bounds.lowest_row),
            (0, columns - 1, 0),
            "bounds for {rows}x{columns}"
        );
        assert_eq!(harness.group.remaining(), rows * columns);
        assert_eq!(harness.group.anchor().x, 0.0);
        assert_eq!(harness.group.anchor().y, 5.0);

        for _ in 0..2_000 {
            harness.tick(dt);
            if query::game_state(&harness.world) != GameState::InPlay {
                break;
            }
        }
        assert_eq!(
            query::game_state(&harness.world),
            GameState::Lose,
            "{rows}x{columns} group lands"
        );
        assert_eq!(harness.count(&Event::GameLost), 1);
    }
}

#[test]
fn restart_after_loss_restores_group() {
    let mut harness = Harness::new(Config::new(2, 8, 1.0, 1.0, 1.0, 0.5));
    harness.dispatch(Command::StartGame);
    harness.tick(FRAME);
    assert_eq!(query::game_state(&harness.world), GameState::Lose);

    harness.dispatch(Command::StartGame);

    assert_eq!(query::game_state(&harness.world), GameState::InPlay);
    assert_eq!(harness.group.remaining(), 16);
    assert_eq!(harness.group.anchor().y, 1.0);
    assert_eq!(
        harness.group.heading(),
        Heading::sweeping(HorizontalDirection::Right)
    );
}
