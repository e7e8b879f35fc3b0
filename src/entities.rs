//! Game entity types: plain data plus the small per-entity rules
//! (bounding-box overlap, enemy bouncing, bonus ageing).

/// Side length of the player's ship, in arena pixels.
pub const SHIP_SIZE: f64 = 64.0;
pub const ENEMY_SIZE: f64 = 32.0;
pub const BONUS_SIZE: f64 = 32.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BonusKind {
    /// Suppresses life loss from enemy contact for SHIELD_DURATION_MS.
    Shield,
    /// Instantly adds one life.
    Life,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Immutable play-field size in pixels, fixed for the whole session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaBounds {
    pub width: f64,
    pub height: f64,
}

impl ArenaBounds {
    pub fn new(width: f64, height: f64) -> Self {
        ArenaBounds { width, height }
    }
}

/// Axis-aligned box; `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    /// Pixels moved per tick along each pressed axis.
    pub speed: f64,
    pub lives: u32,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, SHIP_SIZE, SHIP_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shield {
    Inactive,
    Active { since_ms: u64 },
}

impl Shield {
    pub fn is_active(&self) -> bool {
        matches!(self, Shield::Active { .. })
    }
}

/// Directional keys held during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    /// Drawn once at spawn; never changes.
    pub speed: f64,
    /// Horizontal direction sign, -1.0 or 1.0.
    pub dir_x: f64,
    /// Vertical direction sign, -1.0 or 1.0.
    pub dir_y: f64,
}

impl Enemy {
    pub fn new(x: f64, y: f64, speed: f64, dir_x: f64, dir_y: f64) -> Self {
        Enemy {
            rect: Rect::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
            speed,
            dir_x,
            dir_y,
        }
    }

    /// Move one step and bounce off the arena edges.
    ///
    /// The edge test is inclusive, so a body sitting exactly on a bound flips
    /// its direction on that tick.
    pub fn advance(&mut self, arena: &ArenaBounds) {
        self.rect.x += self.speed * self.dir_x;
        self.rect.y += self.speed * self.dir_y;

        if self.rect.x <= 0.0 || self.rect.right() >= arena.width {
            self.dir_x = -self.dir_x;
        }
        if self.rect.y <= 0.0 || self.rect.bottom() >= arena.height {
            self.dir_y = -self.dir_y;
        }
    }
}

// ── Bonus items ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bonus {
    pub rect: Rect,
    pub kind: BonusKind,
    pub spawned_at_ms: u64,
    pub duration_ms: u64,
    pub active: bool,
}

impl Bonus {
    pub fn new(x: f64, y: f64, kind: BonusKind, spawned_at_ms: u64, duration_ms: u64) -> Self {
        Bonus {
            rect: Rect::new(x, y, BONUS_SIZE, BONUS_SIZE),
            kind,
            spawned_at_ms,
            duration_ms,
            active: true,
        }
    }

    /// Deactivate once the bonus has outlived its duration.
    pub fn update(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.spawned_at_ms) > self.duration_ms {
            self.active = false;
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything one run needs. Only `compute` mutates it.
#[derive(Clone, Debug)]
pub struct GameState {
    pub arena: ArenaBounds,
    pub level: Level,
    pub player: Player,
    pub shield: Shield,
    /// Insertion order is spawn order.
    pub enemies: Vec<Enemy>,
    pub bonuses: Vec<Bonus>,
    pub last_spawn_ms: u64,
    pub last_bonus_ms: u64,
    /// Game clock value seen by the most recent tick.
    pub elapsed_ms: u64,
    pub status: GameStatus,
}
