use std::fs;

use space_fighter::entities::Level;
use space_fighter::error::GameError;
use space_fighter::leaderboard::*;

use tempfile::TempDir;

fn board_in(dir: &TempDir) -> Leaderboard {
    Leaderboard::new(dir.path().join("records.txt"))
}

// ── Sorting ───────────────────────────────────────────────────────────────────

#[test]
fn sort_hardest_first_then_longest() {
    let mut records = vec![
        Record::new("A", 10.0, Level::Easy),
        Record::new("B", 20.0, Level::Hard),
        Record::new("C", 5.0, Level::Hard),
    ];
    sort_records(&mut records);
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}

#[test]
fn sort_places_medium_between() {
    let mut records = vec![
        Record::new("easy-long", 900.0, Level::Easy),
        Record::new("medium-short", 1.0, Level::Medium),
        Record::new("hard-short", 0.5, Level::Hard),
        Record::new("medium-long", 60.0, Level::Medium),
    ];
    sort_records(&mut records);
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["hard-short", "medium-long", "medium-short", "easy-long"]);
}

#[test]
fn level_ranks() {
    assert_eq!(level_rank(&Level::Hard), 1);
    assert_eq!(level_rank(&Level::Medium), 2);
    assert_eq!(level_rank(&Level::Easy), 3);
}

// ── Line format ───────────────────────────────────────────────────────────────

#[test]
fn record_line_has_two_decimals() {
    let line = Record::new("Player1", 12.3456, Level::Medium).to_line();
    assert_eq!(line, "Player1, 12.35, Средний");
}

#[test]
fn parse_line_trims_fields() {
    let r = parse_line("  Player2 ,  15.50 , Легкий  ", 1).unwrap();
    assert_eq!(r, Record::new("Player2", 15.5, Level::Easy));
}

#[test]
fn parse_line_accepts_english_labels() {
    assert_eq!(parse_line("x, 1.00, HARD", 1).unwrap().level, Level::Hard);
    assert_eq!(parse_line("x, 1.00, medium", 1).unwrap().level, Level::Medium);
}

#[test]
fn parse_line_rejects_wrong_field_count() {
    let err = parse_line("only, two", 4).unwrap_err();
    assert!(matches!(err, GameError::MalformedRecord { line: 4, .. }));
}

#[test]
fn parse_line_rejects_bad_duration() {
    assert!(matches!(
        parse_line("bob, fast, Сложный", 2),
        Err(GameError::MalformedRecord { line: 2, .. })
    ));
    assert!(parse_line("bob, inf, Сложный", 2).is_err());
}

#[test]
fn parse_line_rejects_unknown_difficulty() {
    assert!(matches!(
        parse_line("bob, 3.00, Nightmare", 9),
        Err(GameError::MalformedRecord { line: 9, .. })
    ));
}

#[test]
fn sanitize_name_strips_separators() {
    assert_eq!(sanitize_name("Ann, the Great"), "Ann  the Great");
    assert_eq!(sanitize_name("two\nlines"), "two lines");
    assert_eq!(sanitize_name("   "), "Anonymous");
    assert_eq!(sanitize_name(""), "Anonymous");
}

// ── File store ────────────────────────────────────────────────────────────────

#[test]
fn save_appends_line() {
    let dir = TempDir::new().unwrap();
    let board = board_in(&dir);
    board.save(&Record::new("Player1", 12.34, Level::Medium)).unwrap();
    board.save(&Record::new("Player2", 1.0, Level::Easy)).unwrap();

    let content = fs::read_to_string(board.path()).unwrap();
    assert_eq!(content, "Player1, 12.34, Средний\nPlayer2, 1.00, Легкий\n");
}

#[test]
fn save_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let board = Leaderboard::new(dir.path().join("data").join("records.txt"));
    board.save(&Record::new("Zed", 3.0, Level::Hard)).unwrap();
    assert!(board.path().exists());
}

#[test]
fn load_single_record() {
    let dir = TempDir::new().unwrap();
    let board = board_in(&dir);
    fs::write(board.path(), "Player2, 15.50, Легкий\n").unwrap();

    let loaded = board.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Player2");
    assert_eq!(loaded[0].duration, 15.5);
    assert_eq!(loaded[0].level, Level::Easy);
}

#[test]
fn load_empty_file() {
    let dir = TempDir::new().unwrap();
    let board = board_in(&dir);
    fs::write(board.path(), "").unwrap();
    assert!(board.load().unwrap().is_empty());
}

#[test]
fn load_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let board = Leaderboard::new(dir.path().join("nope.txt"));
    assert!(board.load().unwrap().is_empty());
}

#[test]
fn load_skips_malformed_lines() {
    let dir = TempDir::new().unwrap();
    let board = board_in(&dir);
    fs::write(
        board.path(),
        "A, 10.00, Легкий\n\
         broken line\n\
         \n\
         B, lots, Сложный\n\
         C, 5.00, Unknown\n\
         D, 20.00, Сложный\n",
    )
    .unwrap();

    let loaded = board.load().unwrap();
    let names: Vec<&str> = loaded.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["D", "A"]);
}

#[test]
fn saved_records_load_sorted() {
    let dir = TempDir::new().unwrap();
    let board = board_in(&dir);
    board.save(&Record::new("A", 10.0, Level::Easy)).unwrap();
    board.save(&Record::new("B", 20.0, Level::Hard)).unwrap();
    board.save(&Record::new("C", 5.0, Level::Hard)).unwrap();

    let names: Vec<String> = board.load().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}

#[test]
fn saved_names_with_commas_still_load() {
    let dir = TempDir::new().unwrap();
    let board = board_in(&dir);
    board.save(&Record::new("Smith, J", 7.5, Level::Medium)).unwrap();
    let loaded = board.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Smith  J");
}
