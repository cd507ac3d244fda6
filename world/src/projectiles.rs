//! Projectiles fired by the tower.

use lone_tower_core::{EnemyId, Heading, Position, ProjectileId, ProjectileSnapshot};

use crate::{enemies::Enemy, tuning::ArenaTuning, Entity};

/// Result of advancing a projectile by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProjectileStep {
    /// Still in flight.
    Travelling,
    /// Struck its target. `killed` reports whether the hit was lethal.
    Hit {
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage applied.
        damage: u32,
        /// Whether the hit moved the enemy out of the alive state.
        killed: bool,
    },
    /// Left the play area after losing its target.
    Expired,
}

/// Authoritative projectile state stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    position: Position,
    damage: u32,
    speed: f32,
    hit_radius: f32,
    target: EnemyId,
    heading: Option<Heading>,
    homing: bool,
    spent: bool,
}

impl Projectile {
    pub(crate) fn fire(
        id: ProjectileId,
        origin: Position,
        target: (EnemyId, Position),
        damage: u32,
        speed: f32,
        hit_radius: f32,
    ) -> Self {
        let (target, aim) = target;
        Self {
            id,
            position: origin,
            damage,
            speed,
            hit_radius,
            target,
            heading: origin.direction_to(aim),
            homing: true,
            spent: false,
        }
    }

    pub(crate) fn id(&self) -> ProjectileId {
        self.id
    }

    /// Moves the projectile one frame and resolves a hit against `enemies`.
    ///
    /// While the target stays targetable the projectile steers toward it and
    /// never overshoots. Once the target is gone it keeps its last heading and
    /// expires on leaving the arena.
    pub(crate) fn advance(&mut self, enemies: &mut [Enemy], arena: &ArenaTuning) -> ProjectileStep {
        if self.spent {
            return ProjectileStep::Expired;
        }

        if self.homing {
            let target = enemies
                .iter_mut()
                .find(|enemy| enemy.id() == self.target && enemy.is_targetable());
            match target {
                Some(enemy) => return self.home_in(enemy),
                None => self.homing = false,
            }
        }

        match self.heading {
            Some(heading) => self.position = self.position.moved(heading, self.speed),
            None => {
                self.spent = true;
                return ProjectileStep::Expired;
            }
        }

        if arena.contains(self.position) {
            ProjectileStep::Travelling
        } else {
            self.spent = true;
            ProjectileStep::Expired
        }
    }

    fn home_in(&mut self, enemy: &mut Enemy) -> ProjectileStep {
        let aim = enemy.position();
        let distance = self.position.distance(aim);

        if distance >= self.hit_radius {
            if let Some(heading) = self.position.direction_to(aim) {
                self.heading = Some(heading);
                self.position = self.position.moved(heading, self.speed.min(distance));
            }
        }

        if self.position.distance(aim) >= self.hit_radius {
            return ProjectileStep::Travelling;
        }

        self.spent = true;
        let killed = enemy.take_hit(self.damage);
        ProjectileStep::Hit {
            enemy: enemy.id(),
            damage: self.damage,
            killed,
        }
    }
}

impl Entity for Projectile {
    type Snapshot = ProjectileSnapshot;

    fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            target: self.target,
            homing: self.homing,
        }
    }

    fn is_spent(&self) -> bool {
        self.spent
    }
}
