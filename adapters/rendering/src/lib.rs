#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lone Tower adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use lone_tower_core::{
    Currency, EnemyId, EnemyState, EnemyView, Position, ProjectileView, SessionStatus,
    TowerSnapshot, UpgradeCosts, UpgradeError, UpgradeKind, UpgradeReceipt,
};
use std::time::Duration;

/// Frames an upgrade feedback message stays on screen.
pub const FEEDBACK_FRAMES: u32 = 90;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with its alpha scaled by `factor`.
    #[must_use]
    pub fn faded(self, factor: f32) -> Self {
        Self {
            alpha: self.alpha * factor.clamp(0.0, 1.0),
            ..self
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn to_vec2(position: Position) -> Vec2 {
    Vec2::new(position.x(), position.y())
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the player asked to pause or resume on this frame.
    pub toggle_pause: bool,
    /// Whether the player asked to restart on this frame.
    pub reset: bool,
    /// Upgrade the player asked to buy on this frame, if any.
    pub upgrade: Option<UpgradeKind>,
}

impl FrameInput {
    /// Reports whether the frame carries no player action.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.toggle_pause && !self.reset && self.upgrade.is_none()
    }
}

/// Tower as drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Centre of the tower in world units.
    pub position: Vec2,
    /// Contact radius, also the tower's drawn size.
    pub radius: f32,
    /// Targeting range.
    pub range: f32,
    /// Health as a fraction of maximum.
    pub health_ratio: f32,
}

/// Enemy as drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Centre of the enemy in world units.
    pub position: Vec2,
    /// Half the side length of the enemy's square.
    pub half_size: f32,
    /// Health as a fraction of spawn health.
    pub health_ratio: f32,
    /// Opacity in `0.0..=1.0`; falls while the death animation plays.
    pub opacity: f32,
}

/// Projectile as drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Current position in world units.
    pub position: Vec2,
    /// Whether the projectile is still steering toward its target.
    pub homing: bool,
}

/// Line from the tower to the enemy it is tracking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetLine {
    /// Tracked enemy.
    pub enemy: EnemyId,
    /// Start of the line at the tower centre.
    pub from: Vec2,
    /// End of the line at the enemy centre.
    pub to: Vec2,
}

/// Outcome of the most recent upgrade attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// The upgrade was bought.
    Purchased(UpgradeReceipt),
    /// The upgrade was refused.
    Rejected {
        /// Upgrade that was requested.
        kind: UpgradeKind,
        /// Why it was refused.
        reason: UpgradeError,
    },
}

/// Short-lived message describing an upgrade attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeFeedback {
    /// What happened.
    pub outcome: UpgradeOutcome,
    /// Frames left before the message disappears.
    pub frames_remaining: u32,
}

impl UpgradeFeedback {
    /// Creates feedback for an upgrade result, visible for [`FEEDBACK_FRAMES`].
    #[must_use]
    pub fn new(kind: UpgradeKind, result: Result<UpgradeReceipt, UpgradeError>) -> Self {
        let outcome = match result {
            Ok(receipt) => UpgradeOutcome::Purchased(receipt),
            Err(reason) => UpgradeOutcome::Rejected { kind, reason },
        };
        Self {
            outcome,
            frames_remaining: FEEDBACK_FRAMES,
        }
    }

    /// Text shown to the player.
    #[must_use]
    pub fn message(&self) -> String {
        match self.outcome {
            UpgradeOutcome::Purchased(receipt) => {
                format!("{} bought for {}", receipt.kind.label(), receipt.cost)
            }
            UpgradeOutcome::Rejected {
                reason: UpgradeError::InsufficientFunds { cost, .. },
                ..
            } => format!("Insufficient funds ({cost} needed)"),
            UpgradeOutcome::Rejected {
                reason: UpgradeError::CooldownFloor { .. },
                ..
            } => "Speed at maximum".to_owned(),
            UpgradeOutcome::Rejected {
                kind,
                reason: UpgradeError::SessionInactive,
            } => format!("{} unavailable right now", kind.label()),
        }
    }

    /// Reports whether the message reports a refusal.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self.outcome, UpgradeOutcome::Rejected { .. })
    }

    /// Counts one frame down. Returns `false` once the message has expired.
    pub fn tick(&mut self) -> bool {
        self.frames_remaining = self.frames_remaining.saturating_sub(1);
        self.frames_remaining > 0
    }
}

/// Heads-up display values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Waves started so far.
    pub wave: u32,
    /// Player purse.
    pub currency: Currency,
    /// Current tower health.
    pub health: f32,
    /// Maximum tower health.
    pub max_health: u32,
    /// Damage per projectile.
    pub damage: u32,
    /// Frames between shots.
    pub cooldown: u32,
    /// Price of each upgrade.
    pub costs: UpgradeCosts,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Whether the tower fell.
    pub game_over: bool,
}

impl Hud {
    /// Gathers HUD values from the session snapshots.
    #[must_use]
    pub fn new(status: &SessionStatus, tower: &TowerSnapshot, costs: UpgradeCosts) -> Self {
        Self {
            wave: status.wave,
            currency: status.currency,
            health: tower.health.max(0.0),
            max_health: tower.max_health,
            damage: tower.damage,
            cooldown: tower.cooldown,
            costs,
            paused: status.paused,
            game_over: status.game_over,
        }
    }

    /// Reports whether `kind` is currently affordable and available.
    #[must_use]
    pub fn can_afford(&self, kind: UpgradeKind) -> bool {
        self.costs
            .cost_of(kind)
            .is_some_and(|cost| self.currency.checked_sub(cost).is_some())
    }
}

/// Scene description combining the arena and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Size of the visible play area in world units.
    pub arena: Vec2,
    /// The defended tower.
    pub tower: TowerPresentation,
    /// Enemies currently on the field.
    pub enemies: Vec<EnemyPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Line to the tracked enemy, if any.
    pub target_line: Option<TargetLine>,
    /// Heads-up display values.
    pub hud: Hud,
    /// Feedback about the last upgrade attempt.
    pub feedback: Option<UpgradeFeedback>,
}

impl Scene {
    /// Builds a scene from world snapshots.
    #[must_use]
    pub fn capture(
        arena: Vec2,
        tower: &TowerSnapshot,
        enemies: &EnemyView,
        projectiles: &ProjectileView,
        hud: Hud,
    ) -> Self {
        let target_line = tower.target.and_then(|id| {
            enemies.get(id).map(|enemy| TargetLine {
                enemy: id,
                from: to_vec2(tower.position),
                to: to_vec2(enemy.position),
            })
        });

        Self {
            arena,
            tower: TowerPresentation {
                position: to_vec2(tower.position),
                radius: tower.radius,
                range: tower.range,
                health_ratio: tower.health_ratio(),
            },
            enemies: enemies
                .iter()
                .map(|enemy| EnemyPresentation {
                    position: to_vec2(enemy.position),
                    half_size: enemy.half_size,
                    health_ratio: enemy.health_ratio(),
                    opacity: match enemy.state {
                        EnemyState::Alive => 1.0,
                        EnemyState::Dying | EnemyState::Dead => {
                            (1.0 - enemy.death_progress).clamp(0.0, 1.0)
                        }
                    },
                })
                .collect(),
            projectiles: projectiles
                .iter()
                .map(|projectile| ProjectilePresentation {
                    position: to_vec2(projectile.position),
                    homing: projectile.homing,
                })
                .collect(),
            target_line,
            hud,
            feedback: None,
        }
    }

    /// Replaces the world content with a fresh capture, keeping the feedback.
    pub fn refresh(&mut self, captured: Scene) {
        let feedback = self.feedback.take();
        *self = Self {
            feedback,
            ..captured
        };
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Lone Tower scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the wall-clock frame
    /// delta and the input captured by the adapter, and updates the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}
