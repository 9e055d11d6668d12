// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in microseconds.

use std::io::Write;

use mosaic_core::time::HostTime;
use mosaic_core::trace::{
    DamageRect, FrameBeginEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, PresentEvent,
    SpriteChange, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn us(nanos: u64) -> f64 {
    nanos as f64 / 1000.0
}

fn host_us(t: HostTime) -> f64 {
    us(t.nanos())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let late = if e.late { " LATE" } else { "" };
        let _ = writeln!(
            self.writer,
            "[frame] frame={} now={:.1}µs delta={:.1}µs deadline={:.1}µs{late}",
            e.frame_index,
            host_us(e.now),
            us(e.delta.nanos()),
            host_us(e.deadline),
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.name(),
            host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.name(),
            host_us(e.timestamp),
        );
    }

    fn on_present(&mut self, e: &PresentEvent) {
        let damage = if e.full_damage {
            String::from("full")
        } else {
            format!("{} rects", e.damage_rects)
        };
        let _ = writeln!(
            self.writer,
            "[present] frame={} at {:.1}µs damage={damage}",
            e.frame_index,
            host_us(e.presented_at),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let late = if s.late { "LATE" } else { "ok" };
        let _ = writeln!(
            self.writer,
            "[summary] frame={} clear={:.1}µs update={:.1}µs draw={:.1}µs \
             present={:.1}µs cleared={} drawn={} schedule={late}",
            s.frame_index,
            us(s.clear_nanos),
            us(s.update_nanos),
            us(s.draw_nanos),
            us(s.present_nanos),
            s.cleared_rects,
            s.drawn_rects,
        );
    }

    fn on_sprite_changes(&mut self, frame_index: u64, changes: &[SpriteChange]) {
        let _ = writeln!(
            self.writer,
            "[sprites] frame={frame_index} changes={}",
            changes.len(),
        );
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        let _ = writeln!(
            self.writer,
            "[damage] frame={frame_index} rects={}",
            rects.len(),
        );
    }
}
