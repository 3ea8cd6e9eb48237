//! # Session Integration Test
//!
//! Config files, quick-save/quick-load through the filesystem and a full
//! session of ticks.

use std::fs;

use myth::core::{InputState, Key};
use myth::region::{RegionCoord, RegionState};
use myth::save::{SaveData, SaveManager};
use myth::shared::Vec3;
use myth::{ConfigError, SimConfig, Simulation};

fn config_in(dir: &tempfile::TempDir) -> SimConfig {
    let mut config = SimConfig::default();
    config.streaming.load_radius = 1;
    config.save.path = dir.path().join("saves").join("quicksave.json");
    config
}

fn run(sim: &mut Simulation, keys: &[Key], seconds: f32) {
    let mut input = InputState::holding(keys);
    let ticks = (seconds * 10.0).round() as u32;
    for _ in 0..ticks {
        sim.tick(&input, 0.1);
        input.begin_frame();
    }
}

#[test]
fn test_config_file_with_partial_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim.toml");
    fs::write(
        &path,
        "[streaming]\nload_radius = 3\nsalt = 9\n\n[regions]\nbuild_rate = 0.5\n",
    )
    .unwrap();

    let config = SimConfig::load(&path).unwrap();
    assert_eq!(config.streaming.load_radius, 3);
    assert_eq!(config.streaming.salt, 9);
    assert_eq!(config.regions.build_rate, 0.5);
    assert_eq!(config.regions.decay_delay, 10.0);
    assert_eq!(config.timing.status_interval, 3.0);

    let sim = Simulation::new(config);
    assert_eq!(sim.chunks().len(), 49);
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[timing]\nmax_dt = -1.0\n").unwrap();
    assert!(matches!(SimConfig::load(&path), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_quick_save_and_load_restore_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = Simulation::new(config_in(&dir));

    assert!(!sim.save_manager().save_exists());
    assert!(!sim.quick_load(), "nothing to load yet");

    // 3.5 s at home, then north across the border at z = 20
    run(&mut sim, &[], 3.5);
    run(&mut sim, &[Key::Forward], 3.0);
    assert_eq!(sim.regions().current_region(), RegionCoord::new(0, 1));
    assert!(sim.quick_save());
    assert!(sim.save_manager().save_exists());

    let snapshot = sim.capture_save();
    let position = sim.player_position();

    run(&mut sim, &[Key::Back, Key::Sprint], 5.0);
    assert!(sim.player_position().distance(position) > 10.0);

    assert!(sim.quick_load());
    assert_eq!(sim.player_position(), position);
    assert_eq!(sim.capture_save(), snapshot);

    let home = sim.regions().region(RegionCoord::new(0, 0)).copied().unwrap();
    assert_eq!(home.state, RegionState::Awakening);
}

#[test]
fn test_save_file_is_plain_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = Simulation::new(config_in(&dir));
    run(&mut sim, &[], 1.0);
    assert!(sim.quick_save());

    let text = fs::read_to_string(sim.save_manager().path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["regions"].as_array().map(Vec::len), Some(1));
    assert!(value["playTime"].as_f64().unwrap() > 0.9);
}

#[test]
fn test_corrupt_save_leaves_session_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    fs::create_dir_all(config.save.path.parent().unwrap()).unwrap();
    fs::write(&config.save.path, "{ not json").unwrap();

    let mut sim = Simulation::new(config);
    run(&mut sim, &[Key::Forward], 1.0);
    let before = sim.capture_save();

    assert!(!sim.quick_load());
    assert_eq!(sim.capture_save(), before);
}

#[test]
fn test_manager_round_trip_outside_simulation() {
    let dir = tempfile::tempdir().unwrap();
    let manager = SaveManager::new(dir.path().join("nested/deeper/slot.json"));
    let mut data = SaveData::default();
    data.play_time = 77.0;
    data.player.position = [1.0, 2.0, 3.0];

    manager.save(&data).unwrap();
    assert_eq!(manager.load().unwrap(), data);
}

#[test]
fn test_loaded_pressure_keeps_decaying() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = Simulation::new(config_in(&dir));
    run(&mut sim, &[], 5.0);
    assert!(sim.quick_save());

    let mut other = Simulation::new(config_in(&dir));
    assert!(other.quick_load());
    let restored = other.regions().region(RegionCoord::new(0, 0)).copied().unwrap();
    assert!((restored.pressure - 0.5).abs() < 1e-4);

    // leave for 20 s: 10 s grace, then 10 s at 0.02/s
    let player = other.world().player();
    other.world_mut().transforms.get_mut(player).position = Vec3::new(100.0, 0.0, 0.0);
    run(&mut other, &[], 20.0);
    let home = other.regions().region(RegionCoord::new(0, 0)).copied().unwrap();
    assert!((home.pressure - 0.3).abs() < 0.01, "pressure = {}", home.pressure);
}
