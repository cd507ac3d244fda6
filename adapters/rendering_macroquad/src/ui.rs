//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use lone_tower_core::UpgradeKind;
use lone_tower_rendering::Hud;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Buttons pressed on the control panel during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlPanelUiResult {
    /// Pause/resume button.
    pub(crate) toggle_pause: bool,
    /// Restart button.
    pub(crate) reset: bool,
    /// Upgrade button, if any.
    pub(crate) upgrade: Option<UpgradeKind>,
}

/// Snapshot of the control panel's layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub(crate) background: Color,
    /// Values shown on the panel.
    pub(crate) hud: Hud,
}

/// Renders the control panel's labels and buttons for the current frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext,
) -> ControlPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(0.0, 0.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let hud = context.hud;
    let mut result = ControlPanelUiResult::default();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        ui.label(None, &format!("Wave: {}", hud.wave));
        ui.label(None, &format!("Currency: {}", hud.currency));
        ui.label(
            None,
            &format!("Health: {:.0} / {}", hud.health, hud.max_health),
        );
        ui.label(None, &format!("Damage: {}", hud.damage));
        ui.label(None, &format!("Cooldown: {} frames", hud.cooldown));
        ui.separator();

        for (kind, label) in upgrade_buttons(&hud) {
            if ui.button(None, label.as_str()) {
                result.upgrade = Some(kind);
            }
        }
        ui.separator();

        let pause_label = if hud.paused { "Resume (P)" } else { "Pause (P)" };
        result.toggle_pause = ui.button(None, pause_label);
        result.reset = ui.button(None, "Reset (R)");

        if hud.game_over {
            ui.label(None, "The tower has fallen.");
        }
    });

    ui.pop_skin();

    result
}

/// Upgrade buttons in presentation order, labelled with their keyboard shortcut.
fn upgrade_buttons(hud: &Hud) -> impl Iterator<Item = (UpgradeKind, String)> + '_ {
    UpgradeKind::ALL
        .into_iter()
        .zip(1..)
        .map(move |(kind, shortcut)| (kind, upgrade_button_label(hud, kind, shortcut)))
}

fn upgrade_button_label(hud: &Hud, kind: UpgradeKind, shortcut: usize) -> String {
    match hud.costs.cost_of(kind) {
        Some(cost) => format!("{} {cost} ({shortcut})", kind.label()),
        None => format!("{} max", kind.label()),
    }
}
