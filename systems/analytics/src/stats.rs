use lone_tower_core::Event;
use serde::Serialize;

/// Counters describing how a session has unfolded.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionStats {
    /// Frames simulated.
    pub ticks: u64,
    /// Waves started; also the highest wave reached.
    pub waves_started: u32,
    /// Enemies placed on the field.
    pub enemies_spawned: u32,
    /// Enemies whose health was exhausted.
    pub enemies_killed: u32,
    /// Projectiles fired by the tower.
    pub shots_fired: u32,
    /// Projectiles that struck their target.
    pub hits: u32,
    /// Projectiles that left the field without striking anything.
    pub projectiles_expired: u32,
    /// Currency credited through bounties.
    pub currency_earned: u32,
    /// Currency spent on upgrades.
    pub currency_spent: u32,
    /// Upgrades purchased.
    pub upgrades_bought: u32,
    /// Upgrade attempts that were refused.
    pub upgrades_rejected: u32,
    /// Health the tower lost to enemy contact.
    pub contact_damage_taken: f32,
    /// Wave during which the tower fell, if it did.
    pub fallen_at_wave: Option<u32>,
}

impl SessionStats {
    /// Fraction of fired projectiles that hit, or `None` before the first shot.
    #[must_use]
    pub fn accuracy(&self) -> Option<f32> {
        (self.shots_fired > 0).then(|| self.hits as f32 / self.shots_fired as f32)
    }

    pub(crate) fn record(&mut self, event: &Event) {
        match event {
            Event::TimeAdvanced { tick } => self.ticks = *tick,
            Event::WaveStarted { wave, .. } => self.waves_started = *wave,
            Event::EnemySpawned { .. } => self.enemies_spawned += 1,
            Event::EnemyKilled { .. } => self.enemies_killed += 1,
            Event::ProjectileFired { .. } => self.shots_fired += 1,
            Event::ProjectileHit { .. } => self.hits += 1,
            Event::ProjectileExpired { .. } => self.projectiles_expired += 1,
            Event::BountyAwarded { bounty, .. } => {
                self.currency_earned = self.currency_earned.saturating_add(bounty.get());
            }
            Event::UpgradeApplied { receipt } => {
                self.upgrades_bought += 1;
                self.currency_spent = self.currency_spent.saturating_add(receipt.cost.get());
            }
            Event::UpgradeRejected { .. } => self.upgrades_rejected += 1,
            Event::TowerDamaged { amount, .. } => self.contact_damage_taken += amount,
            Event::GameOver { wave } => self.fallen_at_wave = Some(*wave),
            Event::TargetAcquired { .. }
            | Event::TargetCleared { .. }
            | Event::EnemyRemoved { .. }
            | Event::PauseToggled { .. }
            | Event::SessionReset => {}
        }
    }
}
