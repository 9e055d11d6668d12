// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! the [`FrameDriver`](crate::driver::FrameDriver) calls at each stage. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects phase timestamps during a frame and
//! produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`SpriteChange`] and
//!   [`DamageRect`] events plus the corresponding `TraceSink` methods.

#[cfg(feature = "trace-rich")]
use kurbo::Rect;

use crate::time::{Duration, HostTime};
use crate::timing::FrameTick;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of the frame loop is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Restoring last frame's rectangles from the background.
    Clear,
    /// Running sprite behaviors.
    Update,
    /// Painting the backdrop and the group's members.
    Draw,
    /// Handing the finished frame to the presenter.
    Present,
}

impl PhaseKind {
    /// Lowercase name, for sinks that print events.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Update => "update",
            Self::Draw => "draw",
            Self::Present => "present",
        }
    }
}

/// Which category of sprite state changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteField {
    /// Rectangle moved or resized.
    Geometry,
    /// Derived image recomputed.
    Image,
    /// Visibility flag.
    Visibility,
    /// Group membership or draw layer.
    Membership,
    /// Sprite created.
    Added,
    /// Sprite destroyed.
    Removed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a frame starts.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time when the frame started.
    pub now: HostTime,
    /// Time since the previous frame started.
    pub delta: Duration,
    /// When the next frame is due.
    pub deadline: HostTime,
    /// Whether this frame started after its deadline.
    pub late: bool,
}

impl From<&FrameTick> for FrameBeginEvent {
    fn from(tick: &FrameTick) -> Self {
        Self {
            frame_index: tick.frame_index,
            now: tick.now,
            delta: tick.delta,
            deadline: tick.deadline,
            late: tick.late,
        }
    }
}

/// Marks the beginning of a frame-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a frame-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: HostTime,
}

/// Emitted after the presenter accepted a frame.
#[derive(Clone, Copy, Debug)]
pub struct PresentEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of presentation.
    pub presented_at: HostTime,
    /// Whether the whole surface was damaged.
    pub full_damage: bool,
    /// Number of damage rectangles (0 when `full_damage`).
    pub damage_rects: u32,
}

/// Per-frame summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time when the frame started.
    pub now: HostTime,
    /// When the next frame is due.
    pub deadline: HostTime,
    /// Whether the frame started late.
    pub late: bool,
    /// Clear phase duration in nanoseconds (0 if not measured).
    pub clear_nanos: u64,
    /// Update phase duration in nanoseconds (0 if not measured).
    pub update_nanos: u64,
    /// Draw phase duration in nanoseconds (0 if not measured).
    pub draw_nanos: u64,
    /// Present phase duration in nanoseconds (0 if not measured).
    pub present_nanos: u64,
    /// Rectangles restored by the clear pass.
    pub cleared_rects: u32,
    /// Rectangles painted by the draw pass.
    pub drawn_rects: u32,
}

/// A per-frame sprite change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct SpriteChange {
    /// Slot index of the sprite that changed.
    pub sprite_index: u32,
    /// Which category changed.
    pub field: SpriteField,
}

/// An axis-aligned damage rectangle in whole pixels.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

#[cfg(feature = "trace-rich")]
impl From<Rect> for DamageRect {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "damage rectangles are pixel-aligned and surface-sized"
    )]
    fn from(rect: Rect) -> Self {
        let r = rect.expand();
        Self {
            x: r.x0 as i32,
            y: r.y0 as i32,
            width: r.width().max(0.0) as u32,
            height: r.height().max(0.0) as u32,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame starts.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of a frame-loop phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a frame-loop phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called after a frame is presented.
    fn on_present(&mut self, e: &PresentEvent) {
        _ = e;
    }

    /// Called with a per-frame summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with per-frame sprite changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_sprite_changes(&mut self, frame_index: u64, changes: &[SpriteChange]) {
        _ = (frame_index, changes);
    }

    /// Called with per-frame damage rectangles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        _ = (frame_index, rects);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PresentEvent`].
    #[inline]
    pub fn present(&mut self, e: &PresentEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_present(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits sprite changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn sprite_changes(&mut self, frame_index: u64, changes: &[SpriteChange]) {
        if let Some(s) = &mut self.sink {
            s.on_sprite_changes(frame_index, changes);
        }
    }

    /// Emits damage rectangles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_rects(frame_index, rects);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a frame and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    begin: FrameBeginEvent,
    phase_starts: [Option<HostTime>; 4],
    phase_ends: [Option<HostTime>; 4],
    cleared_rects: u32,
    drawn_rects: u32,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given frame.
    #[must_use]
    pub fn new(begin: &FrameBeginEvent) -> Self {
        Self {
            begin: *begin,
            phase_starts: [None; 4],
            phase_ends: [None; 4],
            cleared_rects: 0,
            drawn_rects: 0,
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase_index(phase)] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase_index(phase)] = Some(t);
    }

    /// Records how many rectangles the clear and draw passes touched.
    pub fn set_rect_counts(&mut self, cleared: u32, drawn: u32) {
        self.cleared_rects = cleared;
        self.drawn_rects = drawn;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.begin.frame_index,
            now: self.begin.now,
            deadline: self.begin.deadline,
            late: self.begin.late,
            clear_nanos: self.phase_duration(PhaseKind::Clear),
            update_nanos: self.phase_duration(PhaseKind::Update),
            draw_nanos: self.phase_duration(PhaseKind::Draw),
            present_nanos: self.phase_duration(PhaseKind::Present),
            cleared_rects: self.cleared_rects,
            drawn_rects: self.drawn_rects,
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).nanos(),
            _ => 0,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Clear => 0,
        PhaseKind::Update => 1,
        PhaseKind::Draw => 2,
        PhaseKind::Present => 3,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> FrameBeginEvent {
        FrameBeginEvent {
            frame_index: 42,
            now: HostTime(1_000_000),
            delta: Duration(25_000_000),
            deadline: HostTime(26_000_000),
            late: false,
        }
    }

    #[test]
    fn frame_begin_from_tick() {
        let tick = FrameTick {
            frame_index: 7,
            now: HostTime(100),
            delta: Duration(10),
            deadline: HostTime(200),
            late: true,
        };
        let evt = FrameBeginEvent::from(&tick);
        assert_eq!(evt.frame_index, 7);
        assert_eq!(evt.now, HostTime(100));
        assert_eq!(evt.deadline, HostTime(200));
        assert!(evt.late);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame_begin(&sample_begin());
        sink.on_frame_summary(&FrameSummaryBuilder::new(&sample_begin()).finish());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_begin(&sample_begin());
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Clear,
            timestamp: HostTime(0),
        });
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = FrameSummaryBuilder::new(&sample_begin());

        builder.phase_begin(PhaseKind::Clear, HostTime(1_000_000));
        builder.phase_end(PhaseKind::Clear, HostTime(1_000_100));
        builder.phase_begin(PhaseKind::Update, HostTime(1_000_100));
        builder.phase_end(PhaseKind::Update, HostTime(1_000_500));
        builder.phase_begin(PhaseKind::Draw, HostTime(1_000_500));
        builder.phase_end(PhaseKind::Draw, HostTime(1_002_000));
        builder.phase_begin(PhaseKind::Present, HostTime(1_002_000));
        builder.phase_end(PhaseKind::Present, HostTime(1_002_050));
        builder.set_rect_counts(3, 4);

        let summary = builder.finish();
        assert_eq!(summary.clear_nanos, 100);
        assert_eq!(summary.update_nanos, 400);
        assert_eq!(summary.draw_nanos, 1500);
        assert_eq!(summary.present_nanos, 50);
        assert_eq!(summary.cleared_rects, 3);
        assert_eq!(summary.drawn_rects, 4);
        assert_eq!(summary.frame_index, 42);
    }

    #[test]
    fn summary_builder_missing_phases_are_zero() {
        let summary = FrameSummaryBuilder::new(&sample_begin()).finish();
        assert_eq!(summary.clear_nanos, 0);
        assert_eq!(summary.update_nanos, 0);
        assert_eq!(summary.draw_nanos, 0);
        assert_eq!(summary.present_nanos, 0);
    }

    #[test]
    fn phase_names() {
        assert_eq!(PhaseKind::Clear.name(), "clear");
        assert_eq!(PhaseKind::Present.name(), "present");
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn damage_rect_covers_fractional_rect() {
        let r = DamageRect::from(Rect::new(1.5, 2.0, 4.2, 6.0));
        assert_eq!(
            r,
            DamageRect {
                x: 1,
                y: 2,
                width: 4,
                height: 4
            }
        );
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame_begin(&sample_begin());
        drop(tracer);
        assert_eq!(sink.frames, &[42]);
    }
}
