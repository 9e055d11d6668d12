// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-rate frame pacing.
//!
//! [`FramePacer`] turns clock readings into [`FrameTick`]s. Each tick carries
//! the time elapsed since the previous frame (fed to behaviors as
//! [`UpdateArgs::delta`](crate::scene::UpdateArgs::delta)) and the deadline
//! the host should sleep until before starting the next frame.
//!
//! Deadlines advance by exactly one interval per frame, so short frames do
//! not drift. A frame that starts after its deadline is counted as late and
//! the schedule restarts from the late frame instead of trying to catch up.

use crate::time::{Duration, HostTime};

/// Frame-loop configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameConfig {
    /// Target frames per second. Never zero.
    pub frame_rate_hz: u32,
    /// Report the first frame's damage as the whole surface.
    pub first_frame_full_damage: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::new(40)
    }
}

impl FrameConfig {
    /// Configuration for `hz` frames per second. Zero is treated as one.
    #[must_use]
    pub const fn new(hz: u32) -> Self {
        Self {
            frame_rate_hz: if hz == 0 { 1 } else { hz },
            first_frame_full_damage: true,
        }
    }

    /// The interval between frames.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_hz(self.frame_rate_hz)
    }
}

/// A frame opportunity produced by [`FramePacer::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    /// Monotonically increasing frame counter, starting at 0.
    pub frame_index: u64,
    /// When the frame started.
    pub now: HostTime,
    /// Time since the previous frame started (zero for the first frame).
    pub delta: Duration,
    /// When the next frame should start.
    pub deadline: HostTime,
    /// Whether this frame started after its deadline.
    pub late: bool,
}

/// Produces fixed-rate frame deadlines.
#[derive(Clone, Debug)]
pub struct FramePacer {
    interval: Duration,
    next_frame: u64,
    last_start: Option<HostTime>,
    deadline: Option<HostTime>,
    late_frames: u64,
}

impl FramePacer {
    /// Creates a pacer for the given configuration.
    #[must_use]
    pub const fn new(config: &FrameConfig) -> Self {
        Self {
            interval: config.interval(),
            next_frame: 0,
            last_start: None,
            deadline: None,
            late_frames: 0,
        }
    }

    /// Starts a frame at `now`.
    pub fn tick(&mut self, now: HostTime) -> FrameTick {
        let delta = self
            .last_start
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        let late = self.deadline.is_some_and(|d| now > d);
        let base = match self.deadline {
            Some(d) if !late => d,
            _ => now,
        };
        if late {
            self.late_frames += 1;
        }
        let deadline = base.checked_add(self.interval).unwrap_or(base);

        let tick = FrameTick {
            frame_index: self.next_frame,
            now,
            delta,
            deadline,
            late,
        };
        self.next_frame += 1;
        self.last_start = Some(now);
        self.deadline = Some(deadline);
        tick
    }

    /// How long to wait at `now` before the next frame should start.
    #[must_use]
    pub fn wait_time(&self, now: HostTime) -> Duration {
        self.deadline
            .map_or(Duration::ZERO, |d| d.saturating_duration_since(now))
    }

    /// The interval between frames.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of frames that started after their deadline.
    #[must_use]
    pub const fn late_frames(&self) -> u64 {
        self.late_frames
    }
}
