#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use lone_tower_core::{Command, SessionStatus, TowerSnapshot};

/// Tower combat system that queues a firing command once the weapon is ready.
#[derive(Debug, Default)]
pub struct TowerCombat;

impl TowerCombat {
    /// Creates a new tower combat system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits `Command::FireProjectile` when the cooldown is exhausted and a
    /// target is held.
    pub fn handle(&self, status: &SessionStatus, tower: &TowerSnapshot, out: &mut Vec<Command>) {
        if !status.is_running() || !tower.is_ready() {
            return;
        }

        if let Some(target) = tower.target {
            out.push(Command::FireProjectile { target });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lone_tower_core::{Currency, EnemyId, Position};

    #[test]
    fn ready_tower_with_target_fires() {
        let mut out = Vec::new();
        TowerCombat::new().handle(&status(false), &tower(0, Some(7)), &mut out);

        assert_eq!(
            out,
            vec![Command::FireProjectile {
                target: EnemyId::new(7),
            }]
        );
    }

    #[test]
    fn cooling_down_tower_holds_fire() {
        let mut out = Vec::new();
        TowerCombat::new().handle(&status(false), &tower(3, Some(7)), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn ready_tower_without_target_holds_fire() {
        let mut out = Vec::new();
        TowerCombat::new().handle(&status(false), &tower(0, None), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn game_over_is_silent() {
        let mut out = Vec::new();
        TowerCombat::new().handle(&status(true), &tower(0, Some(1)), &mut out);

        assert!(out.is_empty());
    }

    fn status(game_over: bool) -> SessionStatus {
        SessionStatus {
            paused: false,
            game_over,
            wave: 1,
            currency: Currency::ZERO,
            tick: 10,
        }
    }

    fn tower(cooldown_remaining: u32, target: Option<u32>) -> TowerSnapshot {
        TowerSnapshot {
            position: Position::new(600.0, 600.0),
            radius: 40.0,
            range: 150.0,
            health: 100.0,
            max_health: 100,
            damage: 15,
            cooldown: 25,
            cooldown_remaining,
            target: target.map(EnemyId::new),
        }
    }
}
