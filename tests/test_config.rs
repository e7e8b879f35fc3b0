use std::fs;
use std::path::PathBuf;

use log::LevelFilter;
use space_fighter::config::GameConfig;
use space_fighter::entities::ArenaBounds;
use space_fighter::error::GameError;

use tempfile::TempDir;

#[test]
fn defaults() {
    let c = GameConfig::default();
    assert_eq!(c.arena(), ArenaBounds::new(800.0, 600.0));
    assert_eq!(c.records_path, PathBuf::from("data/records.txt"));
    assert_eq!(c.target_fps, 60);
    assert_eq!(c.level_filter().unwrap(), LevelFilter::Info);
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let c = GameConfig::from_toml("arena_width = 1024\nlog_level = \"debug\"\n").unwrap();
    assert_eq!(c.arena_width, 1024.0);
    assert_eq!(c.arena_height, 600.0);
    assert_eq!(c.level_filter().unwrap(), LevelFilter::Debug);
    assert_eq!(c.target_fps, 60);
}

#[test]
fn unknown_log_level_is_rejected() {
    let err = GameConfig::from_toml("log_level = \"loud\"").unwrap_err();
    assert!(matches!(err, GameError::Config(_)));
}

#[test]
fn zero_fps_is_rejected() {
    assert!(matches!(
        GameConfig::from_toml("target_fps = 0"),
        Err(GameError::Config(_))
    ));
}

#[test]
fn arena_too_small_for_enemies_is_rejected() {
    let err = GameConfig::from_toml("arena_width = 400.0\narena_height = 400.0").unwrap_err();
    assert!(matches!(
        err,
        GameError::Arena { width, height } if width == 400.0 && height == 400.0
    ));
}

#[test]
fn load_rejects_small_arena_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("space_fighter.toml");
    fs::write(&path, "arena_width = 300\n").unwrap();
    assert!(matches!(GameConfig::load(&path), Err(GameError::Arena { .. })));
}

#[test]
fn invalid_toml_is_a_config_error() {
    assert!(matches!(
        GameConfig::from_toml("arena_width = \"wide\""),
        Err(GameError::Config(_))
    ));
}

#[test]
fn load_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let c = GameConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(c.target_fps, 60);
}

#[test]
fn load_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("space_fighter.toml");
    fs::write(&path, "records_path = \"scores.txt\"\ntarget_fps = 30\n").unwrap();
    let c = GameConfig::load(&path).unwrap();
    assert_eq!(c.records_path, PathBuf::from("scores.txt"));
    assert_eq!(c.target_fps, 30);
}
