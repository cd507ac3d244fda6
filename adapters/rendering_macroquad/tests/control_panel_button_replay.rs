use lone_tower_core::UpgradeKind;
use lone_tower_rendering_macroquad::ControlPanelInputState;

fn run_pause_sequence(sequence: &[bool]) -> Vec<bool> {
    let mut state = ControlPanelInputState::default();
    let mut toggles = Vec::new();
    for &pressed in sequence {
        toggles.push(state.take_toggle_pause());
        if pressed {
            state.register_toggle_pause();
        }
    }

    // Flush any trailing latched press so the harness observes the final toggle.
    toggles.push(state.take_toggle_pause());
    toggles
}

fn run_upgrade_sequence(sequence: &[Option<UpgradeKind>]) -> Vec<Option<UpgradeKind>> {
    let mut state = ControlPanelInputState::default();
    let mut purchases = Vec::new();
    for &pressed in sequence {
        purchases.push(state.take_upgrade());
        if let Some(kind) = pressed {
            state.register_upgrade(kind);
        }
    }
    purchases.push(state.take_upgrade());
    purchases
}

#[test]
fn pause_button_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_pause_sequence(&button_sequence);
    let second_run = run_pause_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn upgrade_buttons_fire_once_on_the_following_frame() {
    let button_sequence = [
        Some(UpgradeKind::Damage),
        None,
        Some(UpgradeKind::Armor),
        Some(UpgradeKind::Speed),
        None,
    ];
    let expected = vec![
        None,
        Some(UpgradeKind::Damage),
        None,
        Some(UpgradeKind::Armor),
        Some(UpgradeKind::Speed),
        None,
    ];

    let first_run = run_upgrade_sequence(&button_sequence);
    let second_run = run_upgrade_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn reset_latch_clears_after_it_is_taken() {
    let mut state = ControlPanelInputState::default();
    assert!(!state.take_reset());

    state.register_reset();
    state.register_reset();

    assert!(state.take_reset());
    assert!(!state.take_reset());
}
