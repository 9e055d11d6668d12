// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time in nanoseconds.
//!
//! The core never reads a clock itself. Hosts implement
//! [`Clock`](crate::backend::Clock) and hand [`HostTime`] values to the frame
//! pacer and the trace events. Both types count nanoseconds from an
//! arbitrary host-defined epoch.

use core::fmt;

const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A point in time, in nanoseconds since a host-defined epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({}ns)", self.0)
    }
}

/// A span of time in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(NANOS_PER_MILLI))
    }

    /// The interval between frames at `hz` frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `hz` is zero.
    #[inline]
    #[must_use]
    pub const fn from_hz(hz: u32) -> Self {
        assert!(hz != 0, "frame rate must not be zero");
        Self(NANOS_PER_SEC / hz as u64)
    }

    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}ns)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_hertz_interval() {
        assert_eq!(Duration::from_hz(40), Duration::from_millis(25));
        assert_eq!(Duration::from_hz(40).nanos(), 25_000_000);
    }

    #[test]
    #[should_panic(expected = "frame rate must not be zero")]
    fn zero_hertz_panics() {
        let _ = Duration::from_hz(0);
    }

    #[test]
    fn host_time_arithmetic_saturates() {
        let t = HostTime(1000);
        let d = Duration(200);
        assert_eq!(t.checked_add(d), Some(HostTime(1200)));
        assert_eq!(t.saturating_duration_since(HostTime(400)), Duration(600));
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(HostTime(u64::MAX).checked_add(d), None);
    }
}
