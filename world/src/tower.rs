//! Authoritative tower state: health, weapon cooldown and upgrades.

use lone_tower_core::{
    Currency, EnemyId, Position, TowerSnapshot, UpgradeCosts, UpgradeError, UpgradeKind,
    UpgradeReceipt,
};

use crate::tuning::{ArenaTuning, TowerTuning};

const UPGRADE_BASE_COST: u32 = 50;
const DAMAGE_COST_FACTOR: u32 = 2;
const SPEED_COST_FACTOR: u32 = 3;
const ARMOR_COST_FACTOR: u32 = 2;

const DAMAGE_STEP: u32 = 5;
const COOLDOWN_STEP: u32 = 2;
const ARMOR_STEP: u32 = 20;

/// Speed upgrades are only sold while the cooldown is above this many frames.
const SPEED_UPGRADE_FLOOR: u32 = 5;

/// The single defended tower.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    position: Position,
    radius: f32,
    range: f32,
    health: f32,
    max_health: u32,
    regen_per_frame: f32,
    damage: u32,
    cooldown: u32,
    cooldown_remaining: u32,
    target: Option<EnemyId>,
}

impl Tower {
    pub(crate) fn new(tuning: &TowerTuning, arena: &ArenaTuning) -> Self {
        Self {
            position: arena.center(),
            radius: tuning.radius,
            range: tuning.range,
            health: tuning.health as f32,
            max_health: tuning.health,
            regen_per_frame: tuning.regen_per_second / arena.frames_per_second(),
            damage: tuning.damage,
            cooldown: tuning.cooldown,
            cooldown_remaining: tuning.cooldown,
            target: None,
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn radius(&self) -> f32 {
        self.radius
    }

    pub(crate) fn damage(&self) -> u32 {
        self.damage
    }

    pub(crate) fn target(&self) -> Option<EnemyId> {
        self.target
    }

    pub(crate) fn set_target(&mut self, target: Option<EnemyId>) {
        self.target = target;
    }

    pub(crate) fn in_range(&self, position: Position) -> bool {
        self.position.distance_squared(position) <= self.range * self.range
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    pub(crate) fn regenerate(&mut self) {
        let max_health = self.max_health as f32;
        if self.health < max_health {
            self.health = (self.health + self.regen_per_frame).min(max_health);
        }
    }

    pub(crate) fn tick_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }

    /// Restarts the cooldown after a shot.
    pub(crate) fn rearm(&mut self) {
        self.cooldown_remaining = self.cooldown;
    }

    pub(crate) fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    pub(crate) fn upgrade_costs(&self) -> UpgradeCosts {
        UpgradeCosts {
            damage: self.cost_of(UpgradeKind::Damage),
            speed: (self.cooldown > SPEED_UPGRADE_FLOOR)
                .then(|| self.cost_of(UpgradeKind::Speed)),
            armor: self.cost_of(UpgradeKind::Armor),
        }
    }

    fn cost_of(&self, kind: UpgradeKind) -> Currency {
        let variable = match kind {
            UpgradeKind::Damage => self.damage.saturating_mul(DAMAGE_COST_FACTOR),
            UpgradeKind::Speed => self.cooldown.saturating_mul(SPEED_COST_FACTOR),
            UpgradeKind::Armor => self.max_health.saturating_mul(ARMOR_COST_FACTOR),
        };
        Currency::new(UPGRADE_BASE_COST.saturating_add(variable))
    }

    /// Buys `kind` from `purse`. The purse and the tower are left untouched on
    /// rejection.
    pub(crate) fn upgrade(
        &mut self,
        kind: UpgradeKind,
        purse: &mut Currency,
    ) -> Result<UpgradeReceipt, UpgradeError> {
        if kind == UpgradeKind::Speed && self.cooldown <= SPEED_UPGRADE_FLOOR {
            return Err(UpgradeError::CooldownFloor {
                cooldown: self.cooldown,
            });
        }

        let cost = self.cost_of(kind);
        let remaining = purse
            .checked_sub(cost)
            .ok_or(UpgradeError::InsufficientFunds {
                cost,
                available: *purse,
            })?;
        *purse = remaining;

        match kind {
            UpgradeKind::Damage => self.damage = self.damage.saturating_add(DAMAGE_STEP),
            UpgradeKind::Speed => {
                self.cooldown = self.cooldown.saturating_sub(COOLDOWN_STEP);
                self.cooldown_remaining = self.cooldown_remaining.min(self.cooldown);
            }
            UpgradeKind::Armor => {
                self.max_health = self.max_health.saturating_add(ARMOR_STEP);
                self.health += ARMOR_STEP as f32;
            }
        }

        Ok(UpgradeReceipt {
            kind,
            cost,
            remaining,
        })
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            position: self.position,
            radius: self.radius,
            range: self.range,
            health: self.health,
            max_health: self.max_health,
            damage: self.damage,
            cooldown: self.cooldown,
            cooldown_remaining: self.cooldown_remaining,
            target: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower() -> Tower {
        Tower::new(&TowerTuning::default(), &ArenaTuning::default())
    }

    #[test]
    fn damage_upgrade_rejected_without_funds() {
        let mut tower = tower();
        let mut purse = Currency::new(40);

        for _ in 0..3 {
            let error = tower
                .upgrade(UpgradeKind::Damage, &mut purse)
                .expect_err("upgrade must be rejected");
            assert_eq!(
                error,
                UpgradeError::InsufficientFunds {
                    cost: Currency::new(80),
                    available: Currency::new(40),
                }
            );
        }

        assert_eq!(purse, Currency::new(40));
        assert_eq!(tower.damage(), 15);
    }

    #[test]
    fn damage_upgrade_from_zero_costs_fifty() {
        let tuning = TowerTuning {
            damage: 0,
            ..TowerTuning::default()
        };
        let mut tower = Tower::new(&tuning, &ArenaTuning::default());
        let mut purse = Currency::new(100);

        let receipt = tower
            .upgrade(UpgradeKind::Damage, &mut purse)
            .expect("affordable upgrade");

        assert_eq!(receipt.cost, Currency::new(50));
        assert_eq!(purse, Currency::new(50));
        assert_eq!(tower.damage(), 5);
    }

    #[test]
    fn speed_upgrades_stop_at_the_floor() {
        let mut tower = tower();
        let mut purse = Currency::new(10_000);
        let mut bought = 0;
        while tower.upgrade(UpgradeKind::Speed, &mut purse).is_ok() {
            bought += 1;
        }

        assert_eq!(bought, 10, "25 -> 5 in steps of two");
        assert_eq!(tower.snapshot().cooldown, 5);
        assert_eq!(tower.upgrade_costs().speed, None);
        assert_eq!(
            tower.upgrade(UpgradeKind::Speed, &mut purse),
            Err(UpgradeError::CooldownFloor { cooldown: 5 })
        );
    }

    #[test]
    fn speed_upgrade_keeps_counter_within_cooldown() {
        let mut tower = tower();
        let mut purse = Currency::new(1_000);
        let _ = tower
            .upgrade(UpgradeKind::Speed, &mut purse)
            .expect("affordable upgrade");

        let snapshot = tower.snapshot();
        assert_eq!(snapshot.cooldown, 23);
        assert_eq!(snapshot.cooldown_remaining, 23);
    }

    #[test]
    fn armor_upgrade_raises_capacity_and_heals() {
        let mut tower = tower();
        tower.take_damage(30.0);
        let mut purse = Currency::new(300);

        let receipt = tower
            .upgrade(UpgradeKind::Armor, &mut purse)
            .expect("affordable upgrade");

        assert_eq!(receipt.cost, Currency::new(250));
        let snapshot = tower.snapshot();
        assert_eq!(snapshot.max_health, 120);
        assert!((snapshot.health - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn regeneration_never_exceeds_maximum() {
        let mut tower = tower();
        tower.take_damage(0.001);
        for _ in 0..120 {
            tower.regenerate();
            assert!(tower.snapshot().health <= 100.0);
        }
        assert!((tower.snapshot().health - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn cooldown_counts_down_to_zero_and_rearms() {
        let mut tower = tower();
        for _ in 0..25 {
            assert!(!tower.is_ready());
            tower.tick_cooldown();
        }
        assert!(tower.is_ready());
        tower.tick_cooldown();
        assert_eq!(tower.snapshot().cooldown_remaining, 0);

        tower.rearm();
        assert_eq!(tower.snapshot().cooldown_remaining, 25);
    }
}
