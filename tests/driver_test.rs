use std::path::PathBuf;

use instant::{Duration, Instant};
use render_engine::{
    config::Config,
    driver::{FrameStats, RunState},
};
use winit::{event::ElementState, keyboard::KeyCode};

#[test]
fn should_exit_on_escape_press() {
    let mut run_state = RunState::default();
    assert!(run_state.is_running());

    run_state.on_key(KeyCode::KeyW, ElementState::Pressed);
    run_state.on_key(KeyCode::Escape, ElementState::Released);
    assert!(run_state.is_running());

    run_state.on_key(KeyCode::Escape, ElementState::Pressed);
    assert_eq!(run_state, RunState::Exiting);
}

#[test]
fn should_exit_on_close_request() {
    let mut run_state = RunState::Running;
    run_state.on_close_requested();
    assert!(!run_state.is_running());
}

#[test]
fn should_report_frame_time_once_per_second() {
    let start = Instant::now();
    let mut stats = FrameStats::new(start);

    for frame in 1..50 {
        assert_eq!(stats.tick(start + Duration::from_millis(frame * 20)), None);
    }
    // The 50th frame completes the first second
    let ms = stats.tick(start + Duration::from_millis(1000)).unwrap();
    assert!((ms - 20.0).abs() < 1e-9);

    // The counter starts over
    assert_eq!(stats.tick(start + Duration::from_millis(1500)), None);
    let ms = stats.tick(start + Duration::from_millis(2000)).unwrap();
    assert!((ms - 500.0).abs() < 1e-9);
}

#[test]
fn should_use_the_default_models_without_arguments() {
    let config = Config::from_args(Vec::<String>::new());

    assert_eq!(
        config.models,
        vec![
            PathBuf::from("person.obj"),
            PathBuf::from("earthobj.obj"),
            PathBuf::from("CarvedTable.obj"),
            PathBuf::from("glass bottle.obj"),
        ]
    );
    assert_eq!(config.window_size, (1024, 768));
    assert_eq!(config.title, "renderEngine Skeleton");
}

#[test]
fn should_replace_the_models_with_arguments() {
    let config = Config::from_args(["a.obj", "nested/b.obj"]);

    assert_eq!(
        config.models,
        vec![PathBuf::from("a.obj"), PathBuf::from("nested/b.obj")]
    );
}

#[test]
fn should_size_the_offscreen_target_from_the_window_by_default() {
    let mut config = Config::default();
    assert_eq!(config.offscreen_descriptor().width, 1024);

    config.offscreen_size = Some((64, 32));
    let descriptor = config.offscreen_descriptor();
    assert_eq!((descriptor.width, descriptor.height), (64, 32));
}
