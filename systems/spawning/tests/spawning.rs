use lone_tower_core::{Command, Event};
use lone_tower_system_spawning::{SpawnRegion, WaveDirector, WaveTuning};
use lone_tower_world::{self as world, query, World};

fn director_for(world: &World, tuning: WaveTuning) -> WaveDirector {
    let arena = query::tuning(world).arena;
    let region = SpawnRegion::new(
        arena.width,
        arena.height,
        tuning.margin,
        arena.center(),
        tuning.exclusion_radius,
    )
    .expect("default arena admits spawns");
    WaveDirector::new(tuning, region)
}

fn step(world: &mut World, director: &mut WaveDirector, events: &mut Vec<Event>) {
    world::apply(world, Command::Tick, events);
    let mut commands = Vec::new();
    director.handle(
        &query::status(world),
        query::active_enemy_count(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, events);
    }
}

#[test]
fn empty_field_spawns_first_wave_after_the_pause() {
    let mut world = World::new();
    let mut director = director_for(&world, WaveTuning::default());
    let mut events = Vec::new();

    for _ in 0..120 {
        step(&mut world, &mut director, &mut events);
    }
    assert_eq!(query::status(&world).wave, 0, "wave arrived before the pause");

    step(&mut world, &mut director, &mut events);
    let status = query::status(&world);
    assert_eq!(status.wave, 1);
    assert_eq!(status.tick, 121);
    assert_eq!(query::active_enemy_count(&world), 25);
    assert!(events.contains(&Event::WaveStarted {
        wave: 1,
        enemy_count: 25,
    }));
}

#[test]
fn spawned_enemies_respect_the_exclusion_radius() {
    let mut world = World::new();
    let tuning = WaveTuning::default();
    let mut director = director_for(&world, tuning);
    let tower = query::tower(&world).position;
    let mut events = Vec::new();

    for _ in 0..=120 {
        step(&mut world, &mut director, &mut events);
    }

    let spawned: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { position, .. } => Some(*position),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 25);
    for position in spawned {
        assert!(
            position.distance(tower) > tuning.exclusion_radius,
            "enemy spawned at {position:?} inside the exclusion radius"
        );
    }
}

#[test]
fn waves_are_reproducible_from_the_seed() {
    let run = || {
        let mut world = World::new();
        let mut director = director_for(&world, WaveTuning::default());
        let mut events = Vec::new();
        for _ in 0..=120 {
            step(&mut world, &mut director, &mut events);
        }
        events
    };

    assert_eq!(run(), run(), "replay diverged between runs");
}
