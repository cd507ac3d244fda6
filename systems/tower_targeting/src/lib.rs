#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.
//!
//! Targeting is sticky: the held target is kept for as long as it stays
//! alive and in range. Only once it becomes invalid is the closest enemy in
//! range selected, with ties going to the enemy encountered first.

use lone_tower_core::{Command, EnemyId, EnemySnapshot, EnemyView, SessionStatus, TowerSnapshot};

/// Tower targeting system that reuses a scratch buffer to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidates: Vec<Candidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::SetTowerTarget` when the tower's target must change.
    ///
    /// Nothing is emitted while the session is paused or over, or when the
    /// held target is still the right choice.
    pub fn handle(
        &mut self,
        status: &SessionStatus,
        tower: &TowerSnapshot,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if !status.is_running() {
            return;
        }

        let selected = self.acquire(tower, enemies);
        if selected != tower.target {
            out.push(Command::SetTowerTarget { target: selected });
        }
    }

    /// Returns the enemy the tower should be tracking.
    pub fn acquire(&mut self, tower: &TowerSnapshot, enemies: &EnemyView) -> Option<EnemyId> {
        if let Some(current) = tower.target {
            if enemies
                .get(current)
                .is_some_and(|enemy| in_range(tower, enemy))
            {
                return Some(current);
            }
        }

        self.prepare_candidates(tower, enemies);

        let mut best: Option<&Candidate> = None;
        for candidate in &self.candidates {
            match best {
                Some(existing) if existing.distance_sq <= candidate.distance_sq => {}
                _ => best = Some(candidate),
            }
        }
        best.map(|candidate| candidate.enemy)
    }

    fn prepare_candidates(&mut self, tower: &TowerSnapshot, enemies: &EnemyView) {
        self.candidates.clear();
        self.candidates.reserve(enemies.len());

        for enemy in enemies.iter() {
            if !in_range(tower, enemy) {
                continue;
            }
            self.candidates.push(Candidate {
                enemy: enemy.id,
                distance_sq: tower.position.distance_squared(enemy.position),
            });
        }
    }
}

/// Computes a target without keeping a scratch buffer around.
#[must_use]
pub fn acquire_target(tower: &TowerSnapshot, enemies: &EnemyView) -> Option<EnemyId> {
    TowerTargeting::new().acquire(tower, enemies)
}

fn in_range(tower: &TowerSnapshot, enemy: &EnemySnapshot) -> bool {
    enemy.is_targetable()
        && tower.position.distance_squared(enemy.position) <= tower.range * tower.range
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    enemy: EnemyId,
    distance_sq: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lone_tower_core::{Currency, EnemyState, Position};

    #[test]
    fn closest_enemy_in_range_is_selected() {
        let tower = tower(None);
        let enemies = view(vec![
            enemy(1, 700.0, 600.0, EnemyState::Alive),
            enemy(2, 600.0, 540.0, EnemyState::Alive),
            enemy(3, 640.0, 600.0, EnemyState::Alive),
        ]);

        assert_eq!(acquire_target(&tower, &enemies), Some(EnemyId::new(3)));
    }

    #[test]
    fn ties_go_to_the_first_enemy_encountered() {
        let tower = tower(None);
        let enemies = view(vec![
            enemy(9, 500.0, 600.0, EnemyState::Alive),
            enemy(4, 700.0, 600.0, EnemyState::Alive),
        ]);

        assert_eq!(acquire_target(&tower, &enemies), Some(EnemyId::new(9)));
    }

    #[test]
    fn held_target_is_kept_while_valid() {
        let tower = tower(Some(EnemyId::new(1)));
        let enemies = view(vec![
            enemy(1, 740.0, 600.0, EnemyState::Alive),
            enemy(2, 610.0, 600.0, EnemyState::Alive),
        ]);
        let mut out = Vec::new();

        TowerTargeting::new().handle(&running(), &tower, &enemies, &mut out);

        assert!(out.is_empty(), "sticky target must not be re-optimised");
    }

    #[test]
    fn invalid_target_is_replaced() {
        let tower = tower(Some(EnemyId::new(1)));
        let enemies = view(vec![
            enemy(1, 620.0, 600.0, EnemyState::Dying),
            enemy(2, 700.0, 600.0, EnemyState::Alive),
        ]);
        let mut out = Vec::new();

        TowerTargeting::new().handle(&running(), &tower, &enemies, &mut out);

        assert_eq!(
            out,
            vec![Command::SetTowerTarget {
                target: Some(EnemyId::new(2)),
            }]
        );
    }

    #[test]
    fn target_leaving_range_is_cleared() {
        let tower = tower(Some(EnemyId::new(1)));
        let enemies = view(vec![enemy(1, 900.0, 600.0, EnemyState::Alive)]);
        let mut out = Vec::new();

        TowerTargeting::new().handle(&running(), &tower, &enemies, &mut out);

        assert_eq!(out, vec![Command::SetTowerTarget { target: None }]);
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let tower = tower(None);
        let enemies = view(vec![enemy(5, 750.0, 600.0, EnemyState::Alive)]);

        assert_eq!(acquire_target(&tower, &enemies), Some(EnemyId::new(5)));
    }

    #[test]
    fn paused_session_is_silent() {
        let tower = tower(None);
        let enemies = view(vec![enemy(1, 620.0, 600.0, EnemyState::Alive)]);
        let status = SessionStatus {
            paused: true,
            ..running()
        };
        let mut out = Vec::new();

        TowerTargeting::new().handle(&status, &tower, &enemies, &mut out);

        assert!(out.is_empty());
    }

    fn running() -> SessionStatus {
        SessionStatus {
            paused: false,
            game_over: false,
            wave: 1,
            currency: Currency::new(100),
            tick: 0,
        }
    }

    fn tower(target: Option<EnemyId>) -> TowerSnapshot {
        TowerSnapshot {
            position: Position::new(600.0, 600.0),
            radius: 40.0,
            range: 150.0,
            health: 100.0,
            max_health: 100,
            damage: 15,
            cooldown: 25,
            cooldown_remaining: 0,
            target,
        }
    }

    fn enemy(id: u32, x: f32, y: f32, state: EnemyState) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position: Position::new(x, y),
            half_size: 10.0,
            health: if state == EnemyState::Alive { 10 } else { -5 },
            max_health: 10,
            state,
            death_progress: 0.0,
        }
    }

    fn view(snapshots: Vec<EnemySnapshot>) -> EnemyView {
        EnemyView::from_snapshots(snapshots)
    }
}
