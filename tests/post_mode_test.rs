use instant::{Duration, Instant};
use render_engine::post::{ModeSelector, PostClock, PostUniform, ShaderMode};
use winit::keyboard::KeyCode;

#[test]
fn should_start_in_passthrough() {
    let modes = ModeSelector::new();
    assert_eq!(modes.current(), ShaderMode::Passthrough);
    assert_eq!(modes.current().index(), 0);
}

#[test]
fn should_keep_the_most_recent_mode_key() {
    let mut modes = ModeSelector::new();

    assert!(modes.press(KeyCode::Digit3));
    assert_eq!(modes.current(), ShaderMode::Invert);

    // Several keys between two frames: the last one wins
    modes.press(KeyCode::Digit2);
    modes.press(KeyCode::Digit4);
    assert_eq!(modes.current(), ShaderMode::Wave);

    modes.press(KeyCode::Numpad1);
    assert_eq!(modes.current(), ShaderMode::Passthrough);
}

#[test]
fn should_latch_until_another_mode_key() {
    let mut modes = ModeSelector::new();
    modes.press(KeyCode::Digit2);

    assert!(!modes.press(KeyCode::KeyW));
    assert!(!modes.press(KeyCode::Digit5));
    assert!(!modes.press(KeyCode::Escape));
    assert_eq!(modes.current(), ShaderMode::Greyscale);
}

#[test]
fn should_map_keys_to_mode_indices() {
    let keys = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
    ];
    for (index, key) in keys.into_iter().enumerate() {
        let mode = ShaderMode::from_key(key).unwrap();
        assert_eq!(mode.index() as usize, index);
        assert_eq!(ShaderMode::ALL[index], mode);
    }
    assert_eq!(ShaderMode::from_key(KeyCode::Digit0), None);
}

#[test]
fn should_scale_elapsed_time() {
    let start = Instant::now();
    let clock = PostClock::starting_at(start, 10.0);

    assert_eq!(clock.time_at(start), 0.0);
    let later = clock.time_at(start + Duration::from_millis(1500));
    assert!((later - 15.0).abs() < 1e-4);
    // Never runs backwards
    assert!(clock.time() >= 0.0);
}

#[test]
fn should_pack_the_uniform_for_the_shader() {
    let uniform = PostUniform::new(ShaderMode::Wave, 2.5);

    assert_eq!(uniform.mode, 3);
    assert_eq!(uniform.time, 2.5);
    assert_eq!(std::mem::size_of::<PostUniform>(), 16);
}
