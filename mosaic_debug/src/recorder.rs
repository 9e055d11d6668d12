// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording with JSON-lines export.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event as a
//! [`RecordedEvent`]. [`RecorderSink::write_json_lines`] writes one JSON
//! object per line; [`decode`] reads such a log back.

use std::io::{self, Write};

use mosaic_core::trace::{
    DamageRect, FrameBeginEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
    PresentEvent, SpriteChange, SpriteField, TraceSink,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// Frame-loop phase, as recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// See [`PhaseKind::Clear`].
    Clear,
    /// See [`PhaseKind::Update`].
    Update,
    /// See [`PhaseKind::Draw`].
    Draw,
    /// See [`PhaseKind::Present`].
    Present,
}

impl From<PhaseKind> for Phase {
    fn from(kind: PhaseKind) -> Self {
        match kind {
            PhaseKind::Clear => Self::Clear,
            PhaseKind::Update => Self::Update,
            PhaseKind::Draw => Self::Draw,
            PhaseKind::Present => Self::Present,
        }
    }
}

/// Sprite change category, as recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// See [`SpriteField::Geometry`].
    Geometry,
    /// See [`SpriteField::Image`].
    Image,
    /// See [`SpriteField::Visibility`].
    Visibility,
    /// See [`SpriteField::Membership`].
    Membership,
    /// See [`SpriteField::Added`].
    Added,
    /// See [`SpriteField::Removed`].
    Removed,
}

impl From<SpriteField> for Field {
    fn from(field: SpriteField) -> Self {
        match field {
            SpriteField::Geometry => Self::Geometry,
            SpriteField::Image => Self::Image,
            SpriteField::Visibility => Self::Visibility,
            SpriteField::Membership => Self::Membership,
            SpriteField::Added => Self::Added,
            SpriteField::Removed => Self::Removed,
        }
    }
}

/// One recorded sprite change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedChange {
    /// Sprite slot index.
    pub sprite: u32,
    /// What changed.
    pub field: Field,
}

/// One recorded damage rectangle, in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// A single recorded trace event. Times are nanoseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordedEvent {
    /// A frame started.
    FrameBegin {
        /// Frame counter.
        frame_index: u64,
        /// Frame start time.
        now: u64,
        /// Time since the previous frame.
        delta: u64,
        /// Next frame deadline.
        deadline: u64,
        /// Whether the frame started late.
        late: bool,
    },
    /// A phase started.
    PhaseBegin {
        /// Frame counter.
        frame_index: u64,
        /// Which phase.
        phase: Phase,
        /// Start time.
        timestamp: u64,
    },
    /// A phase ended.
    PhaseEnd {
        /// Frame counter.
        frame_index: u64,
        /// Which phase.
        phase: Phase,
        /// End time.
        timestamp: u64,
    },
    /// A frame was presented.
    Present {
        /// Frame counter.
        frame_index: u64,
        /// Presentation time.
        presented_at: u64,
        /// Whether the whole surface was damaged.
        full_damage: bool,
        /// Number of damage rectangles.
        damage_rects: u32,
    },
    /// Per-frame summary.
    Summary {
        /// Frame counter.
        frame_index: u64,
        /// Clear phase duration.
        clear: u64,
        /// Update phase duration.
        update: u64,
        /// Draw phase duration.
        draw: u64,
        /// Present phase duration.
        present: u64,
        /// Rectangles restored by the clear pass.
        cleared_rects: u32,
        /// Rectangles painted by the draw pass.
        drawn_rects: u32,
        /// Whether the frame started late.
        late: bool,
    },
    /// Sprite changes reported by scene evaluation.
    SpriteChanges {
        /// Frame counter.
        frame_index: u64,
        /// The changes, in report order.
        changes: Vec<RecordedChange>,
    },
    /// Damage rectangles handed to the presenter.
    Damage {
        /// Frame counter.
        frame_index: u64,
        /// The rectangles.
        rects: Vec<RecordedRect>,
    },
}

impl RecordedEvent {
    /// The frame this event belongs to.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        match self {
            Self::FrameBegin { frame_index, .. }
            | Self::PhaseBegin { frame_index, .. }
            | Self::PhaseEnd { frame_index, .. }
            | Self::Present { frame_index, .. }
            | Self::Summary { frame_index, .. }
            | Self::SpriteChanges { frame_index, .. }
            | Self::Damage { frame_index, .. } => *frame_index,
        }
    }
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Writes every event as one JSON object per line.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_json_lines<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for event in &self.events {
            serde_json::to_writer(&mut writer, event)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

/// Parses a JSON-lines log written by [`RecorderSink::write_json_lines`].
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns the first line that fails to parse.
pub fn decode(log: &str) -> Result<Vec<RecordedEvent>, serde_json::Error> {
    log.lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str)
        .collect()
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.events.push(RecordedEvent::FrameBegin {
            frame_index: e.frame_index,
            now: e.now.nanos(),
            delta: e.delta.nanos(),
            deadline: e.deadline.nanos(),
            late: e.late,
        });
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.events.push(RecordedEvent::PhaseBegin {
            frame_index: e.frame_index,
            phase: e.phase.into(),
            timestamp: e.timestamp.nanos(),
        });
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.events.push(RecordedEvent::PhaseEnd {
            frame_index: e.frame_index,
            phase: e.phase.into(),
            timestamp: e.timestamp.nanos(),
        });
    }

    fn on_present(&mut self, e: &PresentEvent) {
        self.events.push(RecordedEvent::Present {
            frame_index: e.frame_index,
            presented_at: e.presented_at.nanos(),
            full_damage: e.full_damage,
            damage_rects: e.damage_rects,
        });
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.events.push(RecordedEvent::Summary {
            frame_index: s.frame_index,
            clear: s.clear_nanos,
            update: s.update_nanos,
            draw: s.draw_nanos,
            present: s.present_nanos,
            cleared_rects: s.cleared_rects,
            drawn_rects: s.drawn_rects,
            late: s.late,
        });
    }

    fn on_sprite_changes(&mut self, frame_index: u64, changes: &[SpriteChange]) {
        if changes.is_empty() {
            return;
        }
        self.events.push(RecordedEvent::SpriteChanges {
            frame_index,
            changes: changes
                .iter()
                .map(|c| RecordedChange {
                    sprite: c.sprite_index,
                    field: c.field.into(),
                })
                .collect(),
        });
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        self.events.push(RecordedEvent::Damage {
            frame_index,
            rects: rects
                .iter()
                .map(|r| RecordedRect {
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height: r.height,
                })
                .collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use mosaic_core::time::{Duration, HostTime};

    use super::*;

    #[test]
    fn records_events_in_order() {
        let mut sink = RecorderSink::new();
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 4,
            now: HostTime(100),
            delta: Duration(25),
            deadline: HostTime(125),
            late: false,
        });
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 4,
            phase: PhaseKind::Clear,
            timestamp: HostTime(101),
        });
        sink.on_sprite_changes(4, &[]);

        let events = sink.events();
        assert_eq!(events.len(), 2, "empty change lists are not recorded");
        assert_eq!(events[1].frame_index(), 4);
        assert_eq!(
            events[1],
            RecordedEvent::PhaseBegin {
                frame_index: 4,
                phase: Phase::Clear,
                timestamp: 101
            }
        );
    }

    #[test]
    fn json_lines_decode_back() {
        let mut sink = RecorderSink::new();
        sink.on_present(&PresentEvent {
            frame_index: 1,
            presented_at: HostTime(5_000),
            full_damage: true,
            damage_rects: 0,
        });
        sink.on_sprite_changes(
            1,
            &[SpriteChange {
                sprite_index: 7,
                field: SpriteField::Geometry,
            }],
        );
        sink.on_damage_rects(
            1,
            &[DamageRect {
                x: 1,
                y: 2,
                width: 3,
                height: 4,
            }],
        );

        let mut out = Vec::new();
        sink.write_json_lines(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(
            text.starts_with(r#"{"event":"present","frame_index":1"#),
            "got: {text}"
        );
        assert!(text.contains(r#""field":"geometry""#), "got: {text}");

        let decoded = decode(&text).unwrap();
        assert_eq!(decoded, sink.into_events());
    }

    #[test]
    fn decode_reports_bad_lines() {
        assert!(decode("{\"event\":\"nope\"}\n").is_err());
        assert_eq!(decode("\n\n").unwrap(), Vec::new());
    }
}
