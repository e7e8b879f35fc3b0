//! Game-logic functions.
//!
//! Every function here takes the session state by mutable reference and
//! the game clock (milliseconds since the run started) as an argument.
//! Randomness comes through an injected RNG so callers control determinism
//! (tests use a seeded `StdRng`).

use log::{debug, info, warn};
use rand::Rng;

use crate::entities::{
    ArenaBounds, Bonus, BonusKind, Enemy, GameState, GameStatus, InputState, Level, Player,
    Rect, Shield, BONUS_SIZE, ENEMY_SIZE, SHIP_SIZE,
};
use crate::error::GameError;

/// Minimum distance between a fresh enemy and the player (three ship widths).
pub const SAFE_RADIUS: f64 = 3.0 * SHIP_SIZE;
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

pub const PLAYER_SPEED: f64 = 5.0;

pub const BONUS_INTERVAL_MS: u64 = 7000;
pub const BONUS_DURATION_MS: u64 = 5000;
pub const SHIELD_DURATION_MS: u64 = 5000;
/// Bonuses are kept this far from every arena edge.
const BONUS_MARGIN: f64 = 32.0;

// ── Difficulty tables ────────────────────────────────────────────────────────

pub fn spawn_interval_ms(level: &Level) -> u64 {
    match level {
        Level::Easy => 2000,
        Level::Medium => 1500,
        Level::Hard => 1000,
    }
}

pub fn starting_lives(level: &Level) -> u32 {
    match level {
        Level::Easy => 3,
        Level::Medium => 2,
        Level::Hard => 1,
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Whether an enemy can be placed clear of the ship wherever the ship is.
///
/// Enemy top-left corners are drawn from `[SAFE_RADIUS, side - SAFE_RADIUS - ENEMY_SIZE]`
/// on each axis. The worst ship position is the middle of that band, so half
/// its diagonal must exceed `SAFE_RADIUS`. Any arena passing this also holds
/// the bonus spawn band.
pub fn arena_fits(arena: &ArenaBounds) -> bool {
    let (lo, hi_x, hi_y) = placement_band(arena);
    if hi_x < lo || hi_y < lo {
        return false;
    }
    let half_x = (hi_x - lo) as f64 / 2.0;
    let half_y = (hi_y - lo) as f64 / 2.0;
    half_x.hypot(half_y) > SAFE_RADIUS
}

/// Integer sampling bounds for enemy top-left corners: `(lo, hi_x, hi_y)`.
fn placement_band(arena: &ArenaBounds) -> (i64, i64, i64) {
    let lo = SAFE_RADIUS as i64;
    let hi_x = (arena.width - SAFE_RADIUS - ENEMY_SIZE) as i64;
    let hi_y = (arena.height - SAFE_RADIUS - ENEMY_SIZE) as i64;
    (lo, hi_x, hi_y)
}

/// Build the initial state for a run. The ship starts at the arena centre.
pub fn init_state(level: Level, arena: ArenaBounds) -> Result<GameState, GameError> {
    if !arena_fits(&arena) {
        return Err(GameError::Arena {
            width: arena.width,
            height: arena.height,
        });
    }

    let mut player = Player {
        x: arena.width / 2.0,
        y: arena.height / 2.0,
        speed: PLAYER_SPEED,
        lives: starting_lives(&level),
    };
    clamp_player(&mut player, &arena);

    info!(
        "new run: level={:?} arena={}x{} lives={}",
        level, arena.width, arena.height, player.lives
    );

    Ok(GameState {
        arena,
        level,
        player,
        shield: Shield::Inactive,
        enemies: Vec::new(),
        bonuses: Vec::new(),
        last_spawn_ms: 0,
        last_bonus_ms: 0,
        elapsed_ms: 0,
        status: GameStatus::Playing,
    })
}

// ── Player movement ──────────────────────────────────────────────────────────

/// Apply held keys additively. Diagonals are not normalised.
pub fn move_player(player: &mut Player, input: &InputState, arena: &ArenaBounds) {
    if input.up {
        player.y -= player.speed;
    }
    if input.left {
        player.x -= player.speed;
    }
    if input.down {
        player.y += player.speed;
    }
    if input.right {
        player.x += player.speed;
    }
    clamp_player(player, arena);
}

fn clamp_player(player: &mut Player, arena: &ArenaBounds) {
    player.x = player.x.max(0.0).min(arena.width - SHIP_SIZE);
    player.y = player.y.max(0.0).min(arena.height - SHIP_SIZE);
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// An enemy at `(x, y)` with a random speed in [1, 3) and random diagonal heading.
pub fn random_enemy(x: f64, y: f64, rng: &mut impl Rng) -> Enemy {
    let speed = rng.gen_range(1.0..3.0);
    let dir_x = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let dir_y = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    Enemy::new(x, y, speed, dir_x, dir_y)
}

/// Rejection-sample a top-left corner whose box centre lies further than
/// `SAFE_RADIUS` from `(player_x, player_y)`.
pub fn place_enemy(
    arena: &ArenaBounds,
    player_x: f64,
    player_y: f64,
    rng: &mut impl Rng,
) -> Result<(f64, f64), GameError> {
    let (lo, hi_x, hi_y) = placement_band(arena);
    if hi_x < lo || hi_y < lo {
        warn!(
            "arena {}x{} leaves no room outside the safe radius",
            arena.width, arena.height
        );
        return Err(GameError::Placement { attempts: 0 });
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let x = rng.gen_range(lo..=hi_x) as f64;
        let y = rng.gen_range(lo..=hi_y) as f64;
        let (cx, cy) = Rect::new(x, y, ENEMY_SIZE, ENEMY_SIZE).center();
        let distance = ((cx - player_x).powi(2) + (cy - player_y).powi(2)).sqrt();
        if distance > SAFE_RADIUS {
            return Ok((x, y));
        }
    }

    warn!(
        "gave up placing an enemy after {} attempts (player at {},{})",
        MAX_PLACEMENT_ATTEMPTS, player_x, player_y
    );
    Err(GameError::Placement {
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

pub fn spawn_enemy(state: &mut GameState, rng: &mut impl Rng) -> Result<(), GameError> {
    let (x, y) = place_enemy(&state.arena, state.player.x, state.player.y, rng)?;
    let enemy = random_enemy(x, y, rng);
    debug!(
        "enemy spawned at {},{} speed={:.2} dir=({},{})",
        x, y, enemy.speed, enemy.dir_x, enemy.dir_y
    );
    state.enemies.push(enemy);
    Ok(())
}

/// Advance every enemy one step. Called by the frame loop once per frame.
pub fn move_enemies(state: &mut GameState) {
    let arena = state.arena;
    for enemy in &mut state.enemies {
        enemy.advance(&arena);
    }
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Remove every enemy touching `player_box` and charge at most one life.
///
/// Returns `true` when the run is over. With the shield up the enemies are
/// still destroyed but no life is lost.
pub fn check_collision(state: &mut GameState, player_box: &Rect) -> bool {
    let before = state.enemies.len();
    state.enemies.retain(|e| !e.rect.intersects(player_box));
    let hits = before - state.enemies.len();

    if hits == 0 {
        return false;
    }
    if state.shield.is_active() {
        debug!("shield absorbed {} enemy hit(s)", hits);
        return false;
    }

    state.player.lives = state.player.lives.saturating_sub(1);
    info!("player hit by {} enemy(ies), lives left: {}", hits, state.player.lives);
    state.player.lives == 0
}

// ── Bonuses ──────────────────────────────────────────────────────────────────

pub fn spawn_bonus(state: &mut GameState, now_ms: u64, rng: &mut impl Rng) {
    let hi_x = (state.arena.width - 2.0 * BONUS_SIZE) as i64;
    let hi_y = (state.arena.height - 2.0 * BONUS_SIZE) as i64;
    let x = rng.gen_range(BONUS_MARGIN as i64..=hi_x) as f64;
    let y = rng.gen_range(BONUS_MARGIN as i64..=hi_y) as f64;
    let kind = if rng.gen_bool(0.5) {
        BonusKind::Shield
    } else {
        BonusKind::Life
    };
    debug!("{:?} bonus spawned at {},{}", kind, x, y);
    state
        .bonuses
        .push(Bonus::new(x, y, kind, now_ms, BONUS_DURATION_MS));
}

/// Age bonuses and drop the expired ones.
pub fn age_bonuses(state: &mut GameState, now_ms: u64) {
    state.bonuses.retain_mut(|bonus| {
        bonus.update(now_ms);
        bonus.active
    });
}

/// Consume every bonus under the player, whatever its age.
pub fn collect_bonuses(state: &mut GameState, player_box: &Rect, now_ms: u64) {
    let mut taken: Vec<BonusKind> = Vec::new();
    state.bonuses.retain(|bonus| {
        if bonus.rect.intersects(player_box) {
            taken.push(bonus.kind.clone());
            false
        } else {
            true
        }
    });

    for kind in taken {
        match kind {
            BonusKind::Shield => {
                state.shield = Shield::Active { since_ms: now_ms };
                info!("shield up at {}ms", now_ms);
            }
            BonusKind::Life => {
                state.player.lives += 1;
                info!("extra life, lives: {}", state.player.lives);
            }
        }
    }
}

pub fn expire_shield(state: &mut GameState, now_ms: u64) {
    if let Shield::Active { since_ms } = state.shield {
        if now_ms.saturating_sub(since_ms) > SHIELD_DURATION_MS {
            state.shield = Shield::Inactive;
            info!("shield down at {}ms", now_ms);
        }
    }
}

/// Seconds of shield left, for the HUD. Zero when the shield is down.
pub fn shield_remaining_secs(state: &GameState, now_ms: u64) -> f64 {
    match state.shield {
        Shield::Active { since_ms } => {
            let used = now_ms.saturating_sub(since_ms) as f64 / 1000.0;
            (SHIELD_DURATION_MS as f64 / 1000.0 - used).max(0.0)
        }
        Shield::Inactive => 0.0,
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the run by one frame.
///
/// Order matters: a collision that ends the run returns before bonuses are
/// spawned or collected and before the shield is aged.
pub fn tick(
    state: &mut GameState,
    now_ms: u64,
    input: &InputState,
    rng: &mut impl Rng,
) -> Result<GameStatus, GameError> {
    if state.status == GameStatus::GameOver {
        return Ok(GameStatus::GameOver);
    }
    state.elapsed_ms = now_ms;

    // ── 1. Player ────────────────────────────────────────────────────────────
    let arena = state.arena;
    move_player(&mut state.player, input, &arena);

    // ── 2. Enemy spawn ───────────────────────────────────────────────────────
    if now_ms.saturating_sub(state.last_spawn_ms) > spawn_interval_ms(&state.level) {
        spawn_enemy(state, rng)?;
        state.last_spawn_ms = now_ms;
    }

    // ── 3. Bonus ageing ──────────────────────────────────────────────────────
    age_bonuses(state, now_ms);

    // ── 4. Enemy contact ─────────────────────────────────────────────────────
    let player_box = state.player.rect();
    if check_collision(state, &player_box) {
        state.status = GameStatus::GameOver;
        info!("game over after {}ms on {:?}", now_ms, state.level);
        return Ok(GameStatus::GameOver);
    }

    // ── 5. Bonus spawn & pickup ──────────────────────────────────────────────
    if now_ms.saturating_sub(state.last_bonus_ms) > BONUS_INTERVAL_MS {
        spawn_bonus(state, now_ms, rng);
        state.last_bonus_ms = now_ms;
    }
    collect_bonuses(state, &player_box, now_ms);

    // ── 6. Shield timer ──────────────────────────────────────────────────────
    expire_shield(state, now_ms);

    Ok(GameStatus::Playing)
}

// ── Formatting ───────────────────────────────────────────────────────────────

/// `m:ss`, minutes keep counting past an hour.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
