use std::fmt;
use std::io;

#[derive(Debug)]
pub enum GameError {
    Io(io::Error),
    Config(String),
    /// No enemy position clear of the player was found.
    Placement { attempts: u32 },
    /// A leaderboard line that could not be parsed (1-based line number).
    MalformedRecord { line: usize, reason: String },
    /// The arena is too small to spawn enemies clear of the ship.
    Arena { width: f64, height: f64 },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Config(m) => write!(f, "invalid configuration: {m}"),
            Self::Placement { attempts } => {
                write!(f, "no safe enemy position found after {attempts} attempts")
            }
            Self::MalformedRecord { line, reason } => {
                write!(f, "malformed record on line {line}: {reason}")
            }
            Self::Arena { width, height } => {
                write!(f, "arena {width}x{height} is too small to play in")
            }
        }
    }
}

impl GameError {
    /// Errors that end the current run but leave the session usable.
    pub fn ends_run(&self) -> bool {
        matches!(self, Self::Placement { .. })
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GameError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for GameError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
