// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite anchors.
//!
//! An anchor names the point inside a sprite's bounding rectangle that sits
//! at the sprite's designated position. Anchoring at [`Anchor::Center`] keeps
//! a sprite centered on its position while it grows, shrinks, or rotates.

use kurbo::{Size, Vec2};

/// The point of a sprite's rectangle that is placed at its position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Anchor {
    /// The top-left corner.
    #[default]
    TopLeft,
    /// The top-right corner.
    TopRight,
    /// The bottom-left corner.
    BottomLeft,
    /// The bottom-right corner.
    BottomRight,
    /// The center of the rectangle.
    Center,
    /// An explicit offset from the rectangle's top-left corner, used verbatim
    /// regardless of the rectangle's size.
    Offset(Vec2),
}

impl Anchor {
    /// Resolves the anchor to an offset from the top-left corner of a
    /// rectangle of the given size.
    #[must_use]
    pub fn resolve(self, size: Size) -> Vec2 {
        match self {
            Self::TopLeft => Vec2::ZERO,
            Self::TopRight => Vec2::new(size.width, 0.0),
            Self::BottomLeft => Vec2::new(0.0, size.height),
            Self::BottomRight => Vec2::new(size.width, size.height),
            Self::Center => Vec2::new(size.width / 2.0, size.height / 2.0),
            Self::Offset(offset) => offset,
        }
    }
}

impl From<Vec2> for Anchor {
    fn from(offset: Vec2) -> Self {
        Self::Offset(offset)
    }
}
