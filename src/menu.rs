//! Navigation state for the menu screens. Drawing lives in the binary;
//! this module only tracks what is selected, scrolled, or typed.

use std::ops::Range;

use crate::entities::Level;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuItem {
    Play,
    Records,
    Help,
    Exit,
}

pub const MAIN_MENU: [MenuItem; 4] = [
    MenuItem::Play,
    MenuItem::Records,
    MenuItem::Help,
    MenuItem::Exit,
];

pub const LEVELS: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Play => "Play",
            MenuItem::Records => "Records",
            MenuItem::Help => "Help",
            MenuItem::Exit => "Exit",
        }
    }
}

pub fn level_name(level: &Level) -> &'static str {
    match level {
        Level::Easy => "Easy",
        Level::Medium => "Medium",
        Level::Hard => "Hard",
    }
}

// ── Selector ─────────────────────────────────────────────────────────────────

/// Cursor over a fixed list that wraps at both ends.
#[derive(Clone, Debug)]
pub struct Selector {
    index: usize,
    len: usize,
}

impl Selector {
    pub fn new(len: usize) -> Self {
        Selector { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }
}

// ── Records table scrolling ──────────────────────────────────────────────────

/// Scroll offset kept within `0..=total - visible`.
#[derive(Clone, Debug)]
pub struct ScrollView {
    offset: usize,
    total: usize,
    visible: usize,
}

impl ScrollView {
    pub fn new(total: usize, visible: usize) -> Self {
        ScrollView {
            offset: 0,
            total,
            visible,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn down(&mut self) {
        let max = self.total.saturating_sub(self.visible);
        self.offset = (self.offset + 1).min(max);
    }

    /// Indices of the rows currently on screen.
    pub fn window(&self) -> Range<usize> {
        let end = (self.offset + self.visible).min(self.total);
        self.offset.min(end)..end
    }
}

// ── Name entry ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct NameInput {
    text: String,
    max_len: usize,
}

impl NameInput {
    pub fn new(max_len: usize) -> Self {
        NameInput {
            text: String::new(),
            max_len,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Control characters are ignored, as is anything past `max_len`.
    pub fn push(&mut self, c: char) {
        if !c.is_control() && self.text.chars().count() < self.max_len {
            self.text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }
}
