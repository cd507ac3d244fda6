//! Enemy lifecycle: walk to the tower, attack it, die, disappear.

use lone_tower_core::{Currency, EnemyId, EnemySnapshot, EnemyState, Position};

use crate::{tuning::EnemyTuning, Entity};

/// Result of advancing an enemy by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnemyStep {
    /// The enemy walked toward the tower.
    Approached,
    /// The enemy is touching the tower and did not move.
    Holding,
    /// The enemy's health was found exhausted and it started dying.
    Killed,
    /// The death animation advanced without finishing.
    Fading,
    /// The death animation finished this frame.
    Expired,
    /// Nothing happens to dead enemies.
    Idle,
}

/// Authoritative enemy state stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    position: Position,
    health: i32,
    max_health: i32,
    damage: f32,
    speed: f32,
    half_size: f32,
    bounty: Currency,
    bounty_claimed: bool,
    state: EnemyState,
    death_timer: u32,
    death_duration: u32,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, position: Position, tuning: &EnemyTuning) -> Self {
        Self {
            id,
            position,
            health: tuning.health,
            max_health: tuning.health,
            damage: tuning.damage,
            speed: tuning.speed,
            half_size: tuning.half_size,
            bounty: tuning.bounty,
            bounty_claimed: false,
            state: EnemyState::Alive,
            death_timer: 0,
            death_duration: tuning.death_duration,
        }
    }

    pub(crate) fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn damage(&self) -> f32 {
        self.damage
    }

    pub(crate) fn is_targetable(&self) -> bool {
        self.state == EnemyState::Alive && self.health > 0
    }

    /// Contact test against the tower's contact radius.
    pub(crate) fn touches(&self, tower: Position, radius: f32) -> bool {
        self.position.distance_squared(tower) <= radius * radius
    }

    /// Advances movement or the death animation by one frame.
    pub(crate) fn advance(&mut self, tower: Position, contact_radius: f32) -> EnemyStep {
        match self.state {
            EnemyState::Alive => {
                if self.health <= 0 {
                    self.begin_dying();
                    return EnemyStep::Killed;
                }

                if self.touches(tower, contact_radius) {
                    return EnemyStep::Holding;
                }

                let Some(heading) = self.position.direction_to(tower) else {
                    return EnemyStep::Holding;
                };
                let remaining = self.position.distance(tower);
                self.position = self.position.moved(heading, self.speed.min(remaining));
                EnemyStep::Approached
            }
            EnemyState::Dying => {
                self.death_timer = self.death_timer.saturating_add(1);
                if self.death_timer >= self.death_duration {
                    self.state = EnemyState::Dead;
                    EnemyStep::Expired
                } else {
                    EnemyStep::Fading
                }
            }
            EnemyState::Dead => EnemyStep::Idle,
        }
    }

    /// Applies projectile damage. Returns `true` when the hit killed the enemy.
    pub(crate) fn take_hit(&mut self, damage: u32) -> bool {
        if self.state != EnemyState::Alive {
            return false;
        }

        self.health = self.health.saturating_sub_unsigned(damage);
        if self.health <= 0 {
            self.begin_dying();
            return true;
        }
        false
    }

    /// Hands out the bounty exactly once, after the enemy left the alive state.
    pub(crate) fn claim_bounty(&mut self) -> Option<Currency> {
        if self.state == EnemyState::Alive || self.bounty_claimed {
            return None;
        }
        self.bounty_claimed = true;
        Some(self.bounty)
    }

    fn begin_dying(&mut self) {
        self.death_timer = 0;
        self.state = if self.death_duration == 0 {
            EnemyState::Dead
        } else {
            EnemyState::Dying
        };
    }
}

impl Entity for Enemy {
    type Snapshot = EnemySnapshot;

    fn snapshot(&self) -> EnemySnapshot {
        let death_progress = match self.state {
            EnemyState::Alive => 0.0,
            EnemyState::Dying => self.death_timer as f32 / self.death_duration.max(1) as f32,
            EnemyState::Dead => 1.0,
        };

        EnemySnapshot {
            id: self.id,
            position: self.position,
            half_size: self.half_size,
            health: self.health,
            max_health: self.max_health,
            state: self.state,
            death_progress,
        }
    }

    fn is_spent(&self) -> bool {
        self.state == EnemyState::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::spawn(
            EnemyId::new(1),
            Position::new(x, y),
            &EnemyTuning::default(),
        )
    }

    #[test]
    fn walks_straight_toward_the_tower() {
        let mut enemy = enemy_at(0.0, 100.0);
        assert_eq!(enemy.advance(Position::ORIGIN, 40.0), EnemyStep::Approached);
        assert!((enemy.position().y() - 99.0).abs() < 1e-5);
        assert!(enemy.position().x().abs() < 1e-5);
    }

    #[test]
    fn stops_when_touching_the_tower() {
        let mut enemy = enemy_at(40.0, 0.0);
        assert_eq!(enemy.advance(Position::ORIGIN, 40.0), EnemyStep::Holding);
        assert_eq!(enemy.position(), Position::new(40.0, 0.0));
    }

    #[test]
    fn enemy_on_the_tower_centre_holds_without_faulting() {
        let mut enemy = enemy_at(0.0, 0.0);
        assert_eq!(enemy.advance(Position::ORIGIN, 0.0), EnemyStep::Holding);
    }

    #[test]
    fn lethal_hit_starts_dying_once() {
        let mut enemy = enemy_at(0.0, 100.0);
        assert!(enemy.take_hit(15));
        assert_eq!(enemy.snapshot().health, -5);
        assert_eq!(enemy.snapshot().state, EnemyState::Dying);
        assert!(!enemy.take_hit(15), "a dying enemy cannot be killed again");
        assert_eq!(enemy.snapshot().health, -5);
    }

    #[test]
    fn dying_lasts_exactly_the_death_duration() {
        let mut enemy = enemy_at(0.0, 100.0);
        let _ = enemy.take_hit(10);
        let duration = EnemyTuning::default().death_duration;

        for _ in 1..duration {
            assert_eq!(enemy.advance(Position::ORIGIN, 40.0), EnemyStep::Fading);
        }
        assert_eq!(enemy.advance(Position::ORIGIN, 40.0), EnemyStep::Expired);
        assert!(enemy.is_spent());
        assert_eq!(enemy.advance(Position::ORIGIN, 40.0), EnemyStep::Idle);
    }

    #[test]
    fn bounty_is_paid_once_and_only_after_death() {
        let mut enemy = enemy_at(0.0, 100.0);
        assert_eq!(enemy.claim_bounty(), None);
        let _ = enemy.take_hit(50);
        assert_eq!(enemy.claim_bounty(), Some(Currency::new(5)));
        assert_eq!(enemy.claim_bounty(), None);
    }

    #[test]
    fn zero_death_duration_skips_the_animation() {
        let tuning = EnemyTuning {
            death_duration: 0,
            ..EnemyTuning::default()
        };
        let mut enemy = Enemy::spawn(EnemyId::new(3), Position::ORIGIN, &tuning);
        assert!(enemy.take_hit(100));
        assert!(enemy.is_spent());
    }
}
