// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keys, per-frame input snapshots, and the intents demos act on.
//!
//! Hosts report raw key state as an [`Input`]; each demo translates that into
//! [`Intent`]s and applies them through the scene API. Headless runs replay
//! a [`Script`] instead of reading a keyboard.

use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::{Context, bail};
use kurbo::Vec2;
use mosaic_core::anchor::Anchor;

/// The keys demos react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    S,
    D,
    Z,
    X,
    Space,
    Num1,
    Num2,
    Num3,
    Escape,
    Q,
}

impl FromStr for Key {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            "a" => Self::A,
            "s" => Self::S,
            "d" => Self::D,
            "z" => Self::Z,
            "x" => Self::X,
            "space" => Self::Space,
            "1" => Self::Num1,
            "2" => Self::Num2,
            "3" => Self::Num3,
            "esc" | "escape" => Self::Escape,
            "q" => Self::Q,
            other => bail!("unknown key '{other}'"),
        })
    }
}

/// Key state for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Input {
    /// Keys currently held down.
    pub(crate) held: BTreeSet<Key>,
    /// Keys released since the previous frame.
    pub(crate) released: Vec<Key>,
    /// The host asked to close (the window was closed).
    pub(crate) closed: bool,
}

impl Input {
    pub(crate) fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub(crate) fn was_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    /// Escape or Q released, or the host closed.
    pub(crate) fn quit_requested(&self) -> bool {
        self.closed || self.was_released(Key::Escape) || self.was_released(Key::Q)
    }

    /// -1, 0, or +1 depending on which of two opposing keys is held.
    pub(crate) fn axis(&self, negative: Key, positive: Key) -> i32 {
        i32::from(self.is_held(positive)) - i32::from(self.is_held(negative))
    }
}

/// Something a demo should do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Intent {
    /// Move by whole steps in x and y.
    Move(Vec2),
    /// Grow (+1) or shrink (-1) by one scale step.
    Scale(i32),
    /// Rotate counter-clockwise (+1) or clockwise (-1) by one step.
    Rotate(i32),
    ToggleVisibility,
    SetAnchor(Anchor),
    /// Advance to the next anchor preset.
    CycleAnchor,
    /// Switch to layer preset 1, 2, or 3.
    SetLayers(u8),
}

/// Anything that can produce per-frame input.
pub(crate) trait InputSource {
    fn poll(&mut self, frame_index: u64) -> Input;
}

// -- Scripted input --

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Press,
    Release,
    Tap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScriptEvent {
    frame: u64,
    edge: Edge,
    key: Key,
}

/// Replays key presses and releases at fixed frames.
///
/// A script is a whitespace- or comma-separated list of `FRAME+KEY` (press),
/// `FRAME-KEY` (release), and `FRAME*KEY` (press and release within the same
/// frame) entries, for example `0+right 10-right 12*space 20*q`.
#[derive(Clone, Debug, Default)]
pub(crate) struct Script {
    events: Vec<ScriptEvent>,
    held: BTreeSet<Key>,
    cursor: usize,
}

impl FromStr for Script {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut events = Vec::new();
        for token in s.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            let Some(split) = token.find(['+', '-', '*']) else {
                bail!("script entry '{token}' has no +, - or * separator");
            };
            let (frame, rest) = token.split_at(split);
            let frame: u64 = frame
                .parse()
                .with_context(|| format!("bad frame number in script entry '{token}'"))?;
            let edge = match &rest[..1] {
                "+" => Edge::Press,
                "-" => Edge::Release,
                _ => Edge::Tap,
            };
            let key = rest[1..].parse()?;
            events.push(ScriptEvent { frame, edge, key });
        }
        events.sort_by_key(|e| e.frame);
        Ok(Self {
            events,
            ..Self::default()
        })
    }
}

impl InputSource for Script {
    fn poll(&mut self, frame_index: u64) -> Input {
        let mut released = Vec::new();
        while let Some(event) = self.events.get(self.cursor) {
            if event.frame > frame_index {
                break;
            }
            match event.edge {
                Edge::Press => {
                    self.held.insert(event.key);
                }
                Edge::Release => {
                    if self.held.remove(&event.key) {
                        released.push(event.key);
                    }
                }
                Edge::Tap => released.push(event.key),
            }
            self.cursor += 1;
        }
        Input {
            held: self.held.clone(),
            released,
            closed: false,
        }
    }
}
