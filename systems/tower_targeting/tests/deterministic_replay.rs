use lone_tower_core::{Command, EnemyId, Event, Position};
use lone_tower_system_tower_targeting::TowerTargeting;
use lone_tower_world::{self as world, query, World};

#[test]
fn deterministic_replay_handles_equidistant_enemies() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");

    let acquired: Vec<EnemyId> = first
        .iter()
        .filter_map(|event| match event {
            Event::TargetAcquired { enemy } => Some(*enemy),
            _ => None,
        })
        .collect();
    assert_eq!(
        acquired.first().copied(),
        Some(EnemyId::new(0)),
        "first spawned of two equidistant enemies must win"
    );
    assert_eq!(acquired.len(), 1, "sticky target must not flip: {acquired:?}");
}

fn replay() -> Vec<Event> {
    let mut world = World::new();
    let mut targeting = TowerTargeting::new();
    let mut events = Vec::new();
    let center = query::tower(&world).position;

    world::apply(
        &mut world,
        Command::SpawnWave {
            positions: vec![
                Position::new(center.x() - 200.0, center.y()),
                Position::new(center.x() + 200.0, center.y()),
            ],
        },
        &mut events,
    );

    for _ in 0..120 {
        world::apply(&mut world, Command::Tick, &mut events);
        world::apply(&mut world, Command::AdvanceEntities, &mut events);

        let mut commands = Vec::new();
        targeting.handle(
            &query::status(&world),
            &query::tower(&world),
            &query::enemy_view(&world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    events
}
