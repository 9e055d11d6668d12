// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite and group identity types.

use core::fmt;

/// Sentinel value indicating "no sprite" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a sprite in a [`Scene`](super::Scene).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a sprite is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl SpriteId {
    /// Returns the raw slot index (for diagnostics and change reports).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpriteId({}@gen{})", self.idx, self.generation)
    }
}

/// A handle to a group in a [`Scene`](super::Scene).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl GroupId {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({}@gen{})", self.idx, self.generation)
    }
}
