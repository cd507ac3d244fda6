#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Lone Tower.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! entry.
//!
//! The control panel is drawn with Macroquad's immediate-mode UI module. All
//! UI-specific calls live inside the local `ui` module to avoid leaking
//! Macroquad UI types throughout the renderer.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::Result;
use glam::Vec2;
use lone_tower_core::UpgradeKind;
use lone_tower_rendering::{
    Color, EnemyPresentation, FrameInput, Presentation, ProjectilePresentation, RenderingBackend,
    Scene, TargetLine, TowerPresentation, UpgradeFeedback, FEEDBACK_FRAMES,
};
use macroquad::input::{is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use std::time::Duration;
use tracing::debug;

/// Width of the control panel docked to the right edge of the window.
const CONTROL_PANEL_WIDTH: f32 = 240.0;

const TOWER_COLOR: Color = Color::from_rgb_u8(64, 140, 220);
const RANGE_COLOR: Color = Color::new(0.25, 0.55, 0.86, 0.35);
const ENEMY_COLOR: Color = Color::from_rgb_u8(214, 72, 64);
const HOMING_PROJECTILE_COLOR: Color = Color::from_rgb_u8(250, 220, 90);
const STRAY_PROJECTILE_COLOR: Color = Color::from_rgb_u8(150, 150, 150);
const TARGET_LINE_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.4);
const ARENA_BORDER_COLOR: Color = Color::from_rgb_u8(60, 60, 70);
const HEALTH_BAR_BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 0.6);
const HEALTH_BAR_FILL: Color = Color::from_rgb_u8(90, 200, 110);
const PURCHASE_COLOR: Color = Color::from_rgb_u8(110, 220, 120);
const REJECTION_COLOR: Color = Color::from_rgb_u8(240, 90, 80);
const OVERLAY_TEXT_COLOR: Color = Color::from_rgb_u8(240, 240, 240);
const PANEL_BACKGROUND: Color = Color::from_rgb_u8(28, 28, 34);

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    toggle_pause_latched: bool,
    reset_latched: bool,
    upgrade_latched: Option<UpgradeKind>,
}

impl ControlPanelInputState {
    /// Returns whether the UI requested a pause toggle and clears the latch so
    /// the action fires only once.
    pub fn take_toggle_pause(&mut self) -> bool {
        std::mem::take(&mut self.toggle_pause_latched)
    }

    /// Records that the pause button was pressed this frame.
    pub fn register_toggle_pause(&mut self) {
        self.toggle_pause_latched = true;
    }

    /// Returns whether the UI requested a reset and clears the latch.
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_latched)
    }

    /// Records that the reset button was pressed this frame.
    pub fn register_reset(&mut self) {
        self.reset_latched = true;
    }

    /// Returns the latched upgrade purchase, clearing it so it is bought once.
    pub fn take_upgrade(&mut self) -> Option<UpgradeKind> {
        self.upgrade_latched.take()
    }

    /// Records that an upgrade button was pressed this frame. A later press
    /// in the same frame replaces an earlier one.
    pub fn register_upgrade(&mut self, kind: UpgradeKind) {
        self.upgrade_latched = Some(kind);
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `P` or `Space` pauses and resumes.
    toggle_pause: bool,
    /// `R` restarts the session.
    reset: bool,
    /// `1`, `2` and `3` buy damage, speed and armor.
    upgrade: Option<UpgradeKind>,
    /// `T` toggles the tower targeting line.
    toggle_target_line: bool,
    /// `H` toggles enemy health-bar overlays.
    toggle_health_bars: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let upgrade = if is_key_pressed(KeyCode::Key1) {
            Some(UpgradeKind::Damage)
        } else if is_key_pressed(KeyCode::Key2) {
            Some(UpgradeKind::Speed)
        } else if is_key_pressed(KeyCode::Key3) {
            Some(UpgradeKind::Armor)
        } else {
            None
        };

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            toggle_pause: is_key_pressed(KeyCode::P) || is_key_pressed(KeyCode::Space),
            reset: is_key_pressed(KeyCode::R),
            upgrade,
            toggle_target_line: is_key_pressed(KeyCode::T),
            toggle_health_bars: is_key_pressed(KeyCode::H),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    avg_frame: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the averages once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let metrics = FpsMetrics {
            per_second: self.frames as f32 / seconds,
            avg_frame: self.elapsed / self.frames.max(1),
        };
        *self = Self::default();
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960 + CONTROL_PANEL_WIDTH as i32,
            window_height: 960,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut show_target_line = true;
            let mut show_health_bars = true;
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                if keyboard.toggle_target_line {
                    show_target_line = !show_target_line;
                }

                if keyboard.toggle_health_bars {
                    show_health_bars = !show_health_bars;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(keyboard, &mut control_panel_input);

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                draw_arena(&metrics);
                draw_range(&scene.tower, &metrics);
                if show_target_line {
                    if let Some(line) = scene.target_line {
                        draw_target_line(line, &metrics);
                    }
                }
                draw_enemies(&scene.enemies, &metrics);
                if show_health_bars {
                    draw_enemy_health_bars(&scene.enemies, &metrics);
                }
                draw_tower(&scene.tower, &metrics);
                draw_projectiles(&scene.projectiles, &metrics);
                draw_overlay(&scene, &metrics);
                if let Some(feedback) = scene.feedback {
                    draw_feedback(feedback, &metrics);
                }

                let panel_context = draw_control_panel(&scene, screen_width, screen_height);
                let mut control_panel_ui = macroquad::ui::root_ui();
                let ControlPanelUiResult {
                    toggle_pause,
                    reset,
                    upgrade,
                } = draw_control_panel_ui(&mut control_panel_ui, panel_context);
                if toggle_pause {
                    control_panel_input.register_toggle_pause();
                }
                if reset {
                    control_panel_input.register_reset();
                }
                if let Some(kind) = upgrade {
                    control_panel_input.register_upgrade(kind);
                }

                let fps_metrics = fps_counter.record_frame(frame_dt);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        avg_frame,
                    }) = fps_metrics
                    {
                        debug!(
                            fps = per_second,
                            frame_ms = avg_frame.as_secs_f64() * 1_000.0,
                            "frame rate"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps world units onto the part of the window left of the control panel.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    arena_width_scaled: f32,
    arena_height_scaled: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.arena.x;
        let world_height = scene.arena.y;
        let available_width = (screen_width - CONTROL_PANEL_WIDTH.min(screen_width)).max(0.0);

        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (available_width / world_width).min(screen_height / world_height)
        };

        let arena_width_scaled = world_width * scale;
        let arena_height_scaled = world_height * scale;

        Self {
            scale,
            offset_x: ((available_width - arena_width_scaled) * 0.5).max(0.0),
            offset_y: ((screen_height - arena_height_scaled) * 0.5).max(0.0),
            arena_width_scaled,
            arena_height_scaled,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn length(&self, length: f32) -> f32 {
        length * self.scale
    }

    fn arena_center(&self) -> Vec2 {
        Vec2::new(
            self.offset_x + self.arena_width_scaled * 0.5,
            self.offset_y + self.arena_height_scaled * 0.5,
        )
    }
}

fn gather_frame_input(
    keyboard: KeyboardShortcuts,
    control_panel: &mut ControlPanelInputState,
) -> FrameInput {
    let toggle_pause = control_panel.take_toggle_pause() || keyboard.toggle_pause;
    let reset = control_panel.take_reset() || keyboard.reset;
    let upgrade = control_panel.take_upgrade().or(keyboard.upgrade);

    FrameInput {
        toggle_pause,
        reset,
        upgrade,
    }
}

fn draw_control_panel(scene: &Scene, screen_width: f32, screen_height: f32) -> ControlPanelUiContext {
    let width = CONTROL_PANEL_WIDTH.min(screen_width);
    let left = (screen_width - width).max(0.0);
    let background = to_macroquad_color(PANEL_BACKGROUND);
    macroquad::shapes::draw_rectangle(left, 0.0, width, screen_height, background);

    ControlPanelUiContext {
        origin: MacroquadVec2::new(left, 0.0),
        size: MacroquadVec2::new(width, screen_height),
        background,
        hud: scene.hud,
    }
}

fn draw_arena(metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle_lines(
        metrics.offset_x,
        metrics.offset_y,
        metrics.arena_width_scaled,
        metrics.arena_height_scaled,
        2.0,
        to_macroquad_color(ARENA_BORDER_COLOR),
    );
}

fn draw_range(tower: &TowerPresentation, metrics: &SceneMetrics) {
    let center = metrics.to_screen(tower.position);
    macroquad::shapes::draw_circle_lines(
        center.x,
        center.y,
        metrics.length(tower.range),
        1.5,
        to_macroquad_color(RANGE_COLOR),
    );
}

fn draw_tower(tower: &TowerPresentation, metrics: &SceneMetrics) {
    let center = metrics.to_screen(tower.position);
    let radius = metrics.length(tower.radius);
    macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(TOWER_COLOR));
    macroquad::shapes::draw_circle_lines(
        center.x,
        center.y,
        radius,
        2.0,
        to_macroquad_color(TOWER_COLOR.lighten(0.4)),
    );

    let width = radius * 2.0;
    draw_health_bar(
        Vec2::new(center.x - radius, center.y - radius - 12.0),
        width,
        6.0,
        tower.health_ratio,
        1.0,
    );
}

fn draw_enemies(enemies: &[EnemyPresentation], metrics: &SceneMetrics) {
    for enemy in enemies {
        let (origin, side) = enemy_rectangle(enemy, metrics);
        let color = ENEMY_COLOR.faded(enemy.opacity);
        macroquad::shapes::draw_rectangle(origin.x, origin.y, side, side, to_macroquad_color(color));
    }
}

fn draw_enemy_health_bars(enemies: &[EnemyPresentation], metrics: &SceneMetrics) {
    for enemy in enemies {
        if enemy.health_ratio >= 1.0 {
            continue;
        }
        let (origin, side) = enemy_rectangle(enemy, metrics);
        let height = (side * 0.2).clamp(2.0, 4.0);
        draw_health_bar(
            Vec2::new(origin.x, origin.y - height - 2.0),
            side,
            height,
            enemy.health_ratio,
            enemy.opacity,
        );
    }
}

fn enemy_rectangle(enemy: &EnemyPresentation, metrics: &SceneMetrics) -> (Vec2, f32) {
    let center = metrics.to_screen(enemy.position);
    let half = metrics.length(enemy.half_size);
    (Vec2::new(center.x - half, center.y - half), half * 2.0)
}

fn draw_health_bar(origin: Vec2, width: f32, height: f32, ratio: f32, opacity: f32) {
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        width,
        height,
        to_macroquad_color(HEALTH_BAR_BACKGROUND.faded(opacity)),
    );
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        width * ratio.clamp(0.0, 1.0),
        height,
        to_macroquad_color(HEALTH_BAR_FILL.faded(opacity)),
    );
}

fn draw_projectiles(projectiles: &[ProjectilePresentation], metrics: &SceneMetrics) {
    let radius = metrics.length(3.0).max(1.5);
    for projectile in projectiles {
        let center = metrics.to_screen(projectile.position);
        let color = if projectile.homing {
            HOMING_PROJECTILE_COLOR
        } else {
            STRAY_PROJECTILE_COLOR
        };
        macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(color));
    }
}

fn draw_target_line(line: TargetLine, metrics: &SceneMetrics) {
    let start = metrics.to_screen(line.from);
    let end = metrics.to_screen(line.to);
    macroquad::shapes::draw_line(
        start.x,
        start.y,
        end.x,
        end.y,
        1.0,
        to_macroquad_color(TARGET_LINE_COLOR),
    );
}

fn draw_overlay(scene: &Scene, metrics: &SceneMetrics) {
    let text = if scene.hud.game_over {
        "GAME OVER - press R to restart"
    } else if scene.hud.paused {
        "PAUSED"
    } else {
        return;
    };

    let center = metrics.arena_center();
    draw_centered_text(text, center, 40.0, OVERLAY_TEXT_COLOR);
}

fn draw_feedback(feedback: UpgradeFeedback, metrics: &SceneMetrics) {
    let color = if feedback.is_rejection() {
        REJECTION_COLOR
    } else {
        PURCHASE_COLOR
    };
    let opacity = feedback.frames_remaining as f32 / FEEDBACK_FRAMES as f32;
    let anchor = Vec2::new(metrics.arena_center().x, metrics.offset_y + 40.0);
    draw_centered_text(&feedback.message(), anchor, 28.0, color.faded(opacity));
}

fn draw_centered_text(text: &str, anchor: Vec2, font_size: f32, color: Color) {
    let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
    let _ = macroquad::text::draw_text(
        text,
        anchor.x - dimensions.width * 0.5,
        anchor.y + dimensions.height * 0.5,
        font_size,
        to_macroquad_color(color),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
