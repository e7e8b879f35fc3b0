mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info, warn};
use rand::thread_rng;

use space_fighter::compute::{init_state, move_enemies, tick};
use space_fighter::config::GameConfig;
use space_fighter::entities::{GameState, GameStatus, InputState, Level};
use space_fighter::error::GameError;
use space_fighter::leaderboard::{Leaderboard, Record};
use space_fighter::menu::{MenuItem, NameInput, ScrollView, Selector, LEVELS, MAIN_MENU};

const MAX_NAME_LEN: usize = 20;

// ── Held-key input ────────────────────────────────────────────────────────────

/// Frames a key stays down after its last press or repeat. Terminals without
/// release events rely on OS key repeat (15 Hz or faster) to refresh it;
/// 8 frames at 60 FPS is about 133 ms.
const HOLD_WINDOW: u64 = 8;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn snapshot(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    InputState {
        up: any_held(
            key_frame,
            &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
            frame,
        ),
        left: any_held(
            key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        ),
        down: any_held(
            key_frame,
            &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
            frame,
        ),
        right: any_held(
            key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        ),
    }
}

fn is_ctrl_c(code: &KeyCode, modifiers: &KeyModifiers) -> bool {
    *code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL)
}

/// Block until the next key press (releases are ignored).
fn next_key(rx: &mpsc::Receiver<Event>) -> Option<(KeyCode, KeyModifiers)> {
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            })) if kind != KeyEventKind::Release => return Some((code, modifiers)),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuItem> {
    let mut selected = Selector::new(MAIN_MENU.len());
    loop {
        display::render_menu(out, &selected)?;
        let Some((code, modifiers)) = next_key(rx) else {
            return Ok(MenuItem::Exit);
        };
        match code {
            KeyCode::Up | KeyCode::Char('w') => selected.prev(),
            KeyCode::Down | KeyCode::Char('s') => selected.next(),
            KeyCode::Enter => return Ok(MAIN_MENU[selected.index()]),
            KeyCode::Esc => return Ok(MenuItem::Exit),
            _ if is_ctrl_c(&code, &modifiers) => return Ok(MenuItem::Exit),
            _ => {}
        }
    }
}

/// `None` when the player backs out to the main menu.
fn select_level<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<Option<Level>> {
    let mut selected = Selector::new(LEVELS.len());
    loop {
        display::render_level_select(out, &selected)?;
        let Some((code, _)) = next_key(rx) else {
            return Ok(None);
        };
        match code {
            KeyCode::Left | KeyCode::Char('a') => selected.prev(),
            KeyCode::Right | KeyCode::Char('d') => selected.next(),
            KeyCode::Enter => return Ok(Some(LEVELS[selected.index()].clone())),
            KeyCode::Esc => return Ok(None),
            _ => {}
        }
    }
}

fn show_records<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    leaderboard: &Leaderboard,
) -> Result<(), GameError> {
    let records = leaderboard.load()?;
    let (_, height) = terminal::size()?;
    let mut scroll = ScrollView::new(records.len(), display::records_visible_rows(height));
    loop {
        display::render_records(out, &records, &scroll)?;
        match next_key(rx) {
            Some((KeyCode::Up, _)) => scroll.up(),
            Some((KeyCode::Down, _)) => scroll.down(),
            Some((KeyCode::Esc, _)) | None => return Ok(()),
            _ => {}
        }
    }
}

fn show_help<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    display::render_help(out)?;
    loop {
        match next_key(rx) {
            Some((KeyCode::Esc, _)) | None => return Ok(()),
            _ => {}
        }
    }
}

/// Prompt for a name after a run. `None` means the player skipped saving.
fn collect_name<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    duration_secs: f64,
    level: &Level,
) -> std::io::Result<Option<String>> {
    let mut input = NameInput::new(MAX_NAME_LEN);
    loop {
        display::render_name_entry(out, &input, duration_secs, level)?;
        let Some((code, _)) = next_key(rx) else {
            return Ok(None);
        };
        match code {
            KeyCode::Enter => return Ok(Some(input.text().to_string())),
            KeyCode::Esc => return Ok(None),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum RunEnd {
    /// Lives ran out or the player pressed Esc.
    Finished,
    /// Ctrl-C: leave the program without saving.
    Quit,
}

/// Drive one run until it ends.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key. Each frame the keys still within
/// `HOLD_WINDOW` become the `InputState` snapshot handed to `tick`, so
/// several directions can be held at once.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    frame_time: Duration,
) -> Result<RunEnd, GameError> {
    let mut rng = thread_rng();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let started = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // Pending input, without blocking.
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    if is_ctrl_c(&code, &modifiers) {
                        return Ok(RunEnd::Quit);
                    }
                    if code == KeyCode::Esc {
                        info!("run ended by player at frame {}", frame);
                        return Ok(RunEnd::Finished);
                    }
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let now_ms = started.elapsed().as_millis() as u64;
        let input = snapshot(&key_frame, frame);

        let status = match tick(state, now_ms, &input, &mut rng) {
            Ok(status) => status,
            Err(e) if e.ends_run() => {
                warn!("run cut short at {}ms: {}", now_ms, e);
                return Ok(RunEnd::Finished);
            }
            Err(e) => return Err(e),
        };
        move_enemies(state);
        display::render_game(out, state, now_ms)?;

        if status == GameStatus::GameOver {
            return Ok(RunEnd::Finished);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let config = GameConfig::load(&GameConfig::config_path())?;
    if let Err(e) = simple_logging::log_to_file(&config.log_file, config.level_filter()?) {
        eprintln!("logging disabled: {}", e);
    }
    info!("Starting Space Fighter with {:?}", config);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for release/repeat events; unsupported terminals ignore it.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen on their own thread; screens poll the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("event reader stopped: {}", e);
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config);

    // Restore the terminal even when the session failed.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("exiting with error: {}", e);
    }
    info!("Space Fighter stopped");
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> Result<(), GameError> {
    let leaderboard = Leaderboard::new(&config.records_path);
    let frame_time = Duration::from_secs(1) / config.target_fps;

    loop {
        match show_menu(out, rx)? {
            MenuItem::Exit => break,
            MenuItem::Help => show_help(out, rx)?,
            MenuItem::Records => show_records(out, rx, &leaderboard)?,
            MenuItem::Play => {
                let Some(level) = select_level(out, rx)? else {
                    continue;
                };
                let mut state = init_state(level, config.arena())?;
                let end = game_loop(out, &mut state, rx, frame_time)?;
                if let RunEnd::Quit = end {
                    warn!("quit mid-run, result not saved");
                    break;
                }

                let duration_secs = state.elapsed_ms as f64 / 1000.0;
                if let Some(name) = collect_name(out, rx, duration_secs, &state.level)? {
                    let record = Record::new(&name, duration_secs, state.level.clone());
                    leaderboard.save(&record)?;
                }
            }
        }
    }
    Ok(())
}
