//! Flat-file leaderboard: one `name, duration, difficulty` line per run.

use std::cmp::Ordering;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::entities::Level;
use crate::error::GameError;

const ANONYMOUS: &str = "Anonymous";

// ── Difficulty labels ────────────────────────────────────────────────────────

/// Label written to the records file.
pub fn level_label(level: &Level) -> &'static str {
    match level {
        Level::Easy => "Легкий",
        Level::Medium => "Средний",
        Level::Hard => "Сложный",
    }
}

/// Accepts the stored labels and, ignoring case, `easy`/`medium`/`hard`.
pub fn parse_level(label: &str) -> Option<Level> {
    match label.trim() {
        "Легкий" => Some(Level::Easy),
        "Средний" => Some(Level::Medium),
        "Сложный" => Some(Level::Hard),
        other => match other.to_ascii_lowercase().as_str() {
            "easy" => Some(Level::Easy),
            "medium" => Some(Level::Medium),
            "hard" => Some(Level::Hard),
            _ => None,
        },
    }
}

/// Sort rank: hardest first.
pub fn level_rank(level: &Level) -> u8 {
    match level {
        Level::Hard => 1,
        Level::Medium => 2,
        Level::Easy => 3,
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub name: String,
    /// Seconds survived.
    pub duration: f64,
    pub level: Level,
}

impl Record {
    pub fn new(name: &str, duration: f64, level: Level) -> Self {
        Record {
            name: name.to_string(),
            duration,
            level,
        }
    }

    /// The line as stored, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{}, {:.2}, {}",
            sanitize_name(&self.name),
            self.duration,
            level_label(&self.level)
        )
    }
}

/// Commas and line breaks would corrupt the file, so they become spaces.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == ',' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        ANONYMOUS.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse one stored line. `line_no` is only used for the error.
pub fn parse_line(line: &str, line_no: usize) -> Result<Record, GameError> {
    let malformed = |reason: String| GameError::MalformedRecord {
        line: line_no,
        reason,
    };

    let parts: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(malformed(format!("expected 3 fields, found {}", parts.len())));
    }

    let duration: f64 = parts[1]
        .parse()
        .map_err(|_| malformed(format!("duration '{}' is not a number", parts[1])))?;
    if !duration.is_finite() {
        return Err(malformed(format!("duration '{}' is not finite", parts[1])));
    }
    let level = parse_level(parts[2])
        .ok_or_else(|| malformed(format!("unknown difficulty '{}'", parts[2])))?;

    Ok(Record {
        name: parts[0].to_string(),
        duration,
        level,
    })
}

/// Hardest difficulty first; within a difficulty, longest run first.
pub fn compare_records(a: &Record, b: &Record) -> Ordering {
    level_rank(&a.level)
        .cmp(&level_rank(&b.level))
        .then_with(|| b.duration.total_cmp(&a.duration))
}

pub fn sort_records(records: &mut [Record]) {
    records.sort_by(compare_records);
}

// ── Store ────────────────────────────────────────────────────────────────────

pub struct Leaderboard {
    path: PathBuf,
}

impl Leaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Leaderboard { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file and its directory if needed.
    pub fn save(&self, record: &Record) -> Result<(), GameError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", record.to_line())?;
        info!("saved record '{}' to {}", record.to_line(), self.path.display());
        Ok(())
    }

    /// All stored records, sorted. A missing file is an empty leaderboard;
    /// unparsable lines are logged and skipped.
    pub fn load(&self) -> Result<Vec<Record>, GameError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line, i + 1) {
                Ok(record) => records.push(record),
                Err(e) => warn!("{}: skipping: {}", self.path.display(), e),
            }
        }
        sort_records(&mut records);
        info!("loaded {} record(s) from {}", records.len(), self.path.display());
        Ok(records)
    }
}
