//! Terminal rendering. All crossterm output for the game goes through here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! state it draws. The arena is in pixels; `Viewport` squeezes it into the
//! character grid between the border lines.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use space_fighter::compute::{format_time, shield_remaining_secs};
use space_fighter::entities::{BonusKind, GameState, Level, Rect};
use space_fighter::leaderboard::Record;
use space_fighter::menu::{level_name, NameInput, ScrollView, Selector, LEVELS, MAIN_MENU};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_TIME: Color = Color::White;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_SHIELD: Color = Color::Blue;
const C_PLAYER: Color = Color::White;
const C_PLAYER_SHIELDED: Color = Color::Cyan;
const C_ENEMY: Color = Color::Red;
const C_BONUS_LIFE: Color = Color::Green;
const C_BONUS_SHIELD: Color = Color::Blue;
const C_HINT: Color = Color::DarkGrey;
const C_SELECTED: Color = Color::Green;
const C_HEADER: Color = Color::Yellow;

/// Rows taken by the records table header and frame.
const RECORDS_CHROME_ROWS: u16 = 6;

fn level_color(level: &Level) -> Color {
    match level {
        Level::Easy => Color::Green,
        Level::Medium => Color::Yellow,
        Level::Hard => Color::Red,
    }
}

fn print_at<W: Write>(
    out: &mut W,
    col: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn print_centered<W: Write>(
    out: &mut W,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let (width, _) = terminal::size()?;
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    print_at(out, col, row, text, color)
}

fn finish<W: Write>(out: &mut W, park_row: u16) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, park_row))?;
    out.flush()
}

// ── Arena → terminal projection ───────────────────────────────────────────────

/// Maps arena pixels onto the cells inside the border.
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    arena_w: f64,
    arena_h: f64,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, state: &GameState) -> Self {
        Viewport {
            cols,
            rows,
            arena_w: state.arena.width,
            arena_h: state.arena.height,
        }
    }

    fn inner_cols(&self) -> f64 {
        self.cols.saturating_sub(2).max(1) as f64
    }

    // HUD on row 0, border on rows 1 and rows-2, hint on rows-1.
    fn inner_rows(&self) -> f64 {
        self.rows.saturating_sub(4).max(1) as f64
    }

    /// Top-left cell and cell extent of `rect`; every box covers at least one cell.
    fn cells(&self, rect: &Rect) -> (u16, u16, u16, u16) {
        let sx = self.inner_cols() / self.arena_w;
        let sy = self.inner_rows() / self.arena_h;
        let col = 1 + (rect.x * sx).floor().clamp(0.0, self.inner_cols() - 1.0) as u16;
        let row = 2 + (rect.y * sy).floor().clamp(0.0, self.inner_rows() - 1.0) as u16;
        let w = ((rect.w * sx).round() as u16).max(1);
        let h = ((rect.h * sy).round() as u16).max(1);
        let w = w.min(self.cols.saturating_sub(1).saturating_sub(col).max(1));
        let h = h.min(self.rows.saturating_sub(2).saturating_sub(row).max(1));
        (col, row, w, h)
    }
}

fn fill_rect<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    let (col, row, w, h) = view.cells(rect);
    let line: String = std::iter::repeat(glyph).take(w as usize).collect();
    out.queue(style::SetForegroundColor(color))?;
    for r in row..row + h {
        out.queue(cursor::MoveTo(col, r))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Game screen ───────────────────────────────────────────────────────────────

/// Render one complete game frame.
pub fn render_game<W: Write>(out: &mut W, state: &GameState, now_ms: u64) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let view = Viewport::new(cols, rows, state);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, &view)?;
    draw_hud(out, state, &view, now_ms)?;

    for bonus in &state.bonuses {
        let (glyph, color) = match bonus.kind {
            BonusKind::Life => ('+', C_BONUS_LIFE),
            BonusKind::Shield => ('S', C_BONUS_SHIELD),
        };
        fill_rect(out, &view, &bonus.rect, glyph, color)?;
    }
    for enemy in &state.enemies {
        fill_rect(out, &view, &enemy.rect, '█', C_ENEMY)?;
    }

    let ship_color = if state.shield.is_active() {
        C_PLAYER_SHIELDED
    } else {
        C_PLAYER
    };
    fill_rect(out, &view, &state.player.rect(), '▲', ship_color)?;

    print_at(
        out,
        1,
        rows.saturating_sub(1),
        "W A S D / arrows : Move   ESC : End run",
        C_HINT,
    )?;

    finish(out, rows.saturating_sub(1))
}

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
    now_ms: u64,
) -> std::io::Result<()> {
    let time_str = format!("Time: {}", format_time(now_ms as f64 / 1000.0));
    print_at(out, 1, 0, &time_str, C_HUD_TIME)?;

    let lives_str = format!("Lives: {}", state.player.lives);
    let mut col = 1 + time_str.chars().count() as u16 + 3;
    print_at(out, col, 0, &lives_str, C_HUD_LIVES)?;
    col += lives_str.chars().count() as u16 + 3;

    if state.shield.is_active() {
        let shield_str = format!("Shield: {:.1}s", shield_remaining_secs(state, now_ms));
        print_at(out, col, 0, &shield_str, C_HUD_SHIELD)?;
    }

    let level_str = format!("[ {} ]", level_name(&state.level).to_uppercase());
    let lx = view
        .cols
        .saturating_sub(level_str.chars().count() as u16 + 1);
    print_at(out, lx, 0, &level_str, level_color(&state.level))?;

    Ok(())
}

// ── Menus ─────────────────────────────────────────────────────────────────────

pub fn render_menu<W: Write>(out: &mut W, selected: &Selector) -> std::io::Result<()> {
    let (_, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let top = (height / 2).saturating_sub(MAIN_MENU.len() as u16 + 2);
    print_centered(out, top, "★  SPACE  FIGHTER  ★", Color::Cyan)?;

    for (i, item) in MAIN_MENU.iter().enumerate() {
        let color = if i == selected.index() {
            C_SELECTED
        } else {
            Color::White
        };
        print_centered(out, top + 2 + 2 * i as u16, item.label(), color)?;
    }

    print_centered(
        out,
        height.saturating_sub(2),
        "↑ ↓ : Choose   ENTER : Select",
        C_HINT,
    )?;
    finish(out, height.saturating_sub(1))
}

pub fn render_level_select<W: Write>(out: &mut W, selected: &Selector) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let row = height / 2;
    print_centered(out, row.saturating_sub(2), "Select difficulty:", Color::White)?;

    let slot = 12u16;
    let start = (width / 2).saturating_sub(slot * LEVELS.len() as u16 / 2);
    for (i, level) in LEVELS.iter().enumerate() {
        let name = level_name(level);
        let color = if i == selected.index() {
            C_SELECTED
        } else {
            Color::White
        };
        let col = start + slot * i as u16 + (slot / 2).saturating_sub(name.len() as u16 / 2);
        print_at(out, col, row, name, color)?;
    }

    print_centered(
        out,
        height.saturating_sub(2),
        "← → : Choose   ENTER : Start   ESC : Back",
        C_HINT,
    )?;
    finish(out, height.saturating_sub(1))
}

/// Game-over box plus the name prompt.
pub fn render_name_entry<W: Write>(
    out: &mut W,
    input: &NameInput,
    duration_secs: f64,
    level: &Level,
) -> std::io::Result<()> {
    let (_, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let start_row = (height / 2).saturating_sub(4);
    for (i, (msg, color)) in lines.iter().enumerate() {
        print_centered(out, start_row + i as u16, msg, *color)?;
    }

    let summary = format!(
        "Survived {} on {}",
        format_time(duration_secs),
        level_name(level)
    );
    print_centered(out, start_row + 4, &summary, level_color(level))?;

    print_centered(out, start_row + 6, "Enter your name:", Color::White)?;
    let field = format!("[ {:<20} ]", input.text());
    print_centered(out, start_row + 7, &field, Color::Cyan)?;

    print_centered(
        out,
        height.saturating_sub(2),
        "ENTER : Save   ESC : Skip",
        C_HINT,
    )?;
    finish(out, height.saturating_sub(1))
}

// ── Records table ─────────────────────────────────────────────────────────────

/// How many record rows fit on screen at `height` rows.
pub fn records_visible_rows(height: u16) -> usize {
    height.saturating_sub(RECORDS_CHROME_ROWS).max(1) as usize
}

/// Column starts as fractions of the width: place, name, duration, difficulty.
fn record_columns(width: u16) -> [u16; 4] {
    let w = u32::from(width);
    let at = |percent: u32| (w * percent / 100) as u16;
    [1, at(10), at(35), at(75)]
}

pub fn render_records<W: Write>(
    out: &mut W,
    records: &[Record],
    scroll: &ScrollView,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let cols = record_columns(width);
    let headers = ["Place", "Player", "Duration (s)", "Difficulty"];

    print_centered(out, 0, "RECORDS", Color::Cyan)?;
    for (col, header) in cols.iter().zip(headers.iter()) {
        print_at(out, *col, 2, header, C_HEADER)?;
    }
    let rule = "─".repeat(width.saturating_sub(2) as usize);
    print_at(out, 1, 3, &rule, C_BORDER)?;

    if records.is_empty() {
        print_centered(out, 5, "No records yet", C_HINT)?;
    }

    for (row, idx) in scroll.window().enumerate() {
        let record = &records[idx];
        let y = 4 + row as u16;
        let place = (idx + 1).to_string();
        let duration = format!("{:.2}", record.duration);
        print_at(out, cols[0], y, &place, Color::White)?;
        print_at(out, cols[1], y, &record.name, Color::White)?;
        print_at(out, cols[2], y, &duration, Color::White)?;
        print_at(out, cols[3], y, level_name(&record.level), level_color(&record.level))?;
    }

    print_centered(
        out,
        height.saturating_sub(1),
        "↑ ↓ : Scroll   ESC : Back",
        C_HINT,
    )?;
    finish(out, height.saturating_sub(1))
}

// ── Help ──────────────────────────────────────────────────────────────────────

pub fn render_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    let (_, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let sections: &[(&str, &[(&str, Color)])] = &[
        ("Controls:", &[("W A S D / arrows - move", Color::White)]),
        ("Exit:", &[("ESC - end the run", Color::White)]),
        (
            "Entities:",
            &[
                ("█ Red: enemies, a hit costs one life", C_ENEMY),
                ("+ Green: bonus, one extra life", C_BONUS_LIFE),
                ("S Blue: shield, 5 seconds of protection", C_BONUS_SHIELD),
            ],
        ),
        (
            "Difficulty:",
            &[
                ("Easy   - 3 lives, an enemy every 2 s", Color::Green),
                ("Medium - 2 lives, an enemy every 1.5 s", Color::Yellow),
                ("Hard   - 1 life, an enemy every second", Color::Red),
            ],
        ),
        (
            "Goal:",
            &[("Survive as long as you can and avoid the red blocks.", Color::White)],
        ),
    ];

    print_at(out, 4, 1, "SPACE FIGHTER: HELP", Color::Cyan)?;
    let mut row = 3u16;
    for (title, lines) in sections {
        print_at(out, 4, row, title, C_HEADER)?;
        row += 1;
        for (line, color) in lines.iter() {
            print_at(out, 6, row, line, *color)?;
            row += 1;
        }
        row += 1;
    }

    print_at(out, 4, height.saturating_sub(1), "ESC : Back", C_HINT)?;
    finish(out, height.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_columns_scale_with_width() {
        assert_eq!(record_columns(100), [1, 10, 35, 75]);
    }

    #[test]
    fn record_columns_survive_very_wide_terminals() {
        assert_eq!(record_columns(1000), [1, 100, 350, 750]);
        let cols = record_columns(u16::MAX);
        assert!(cols[1] < cols[2] && cols[2] < cols[3]);
    }
}
