// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen damage for partial presentation.

use alloc::vec::Vec;

use kurbo::Rect;

/// A region of the backbuffer that changed this frame.
///
/// Presenters can use this to copy only the touched rectangles to the
/// screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DamageRegion {
    /// The whole backbuffer changed.
    #[default]
    Full,
    /// The listed rectangles changed. They may overlap.
    Rects(Vec<Rect>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Builds a region from a list of rectangles, dropping zero-area ones.
    #[must_use]
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let rects: Vec<Rect> = rects.into_iter().filter(|r| !r.is_zero_area()).collect();
        if rects.is_empty() {
            Self::None
        } else {
            Self::Rects(rects)
        }
    }

    /// Returns `true` if nothing needs presenting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if the whole backbuffer changed.
    #[must_use]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// The damaged rectangles, or `None` for full damage.
    #[must_use]
    pub fn rects(&self) -> Option<&[Rect]> {
        match self {
            Self::Full => None,
            Self::Rects(rects) => Some(rects),
            Self::None => Some(&[]),
        }
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(a), Self::Rects(b)) => {
                let mut merged = a.clone();
                merged.extend_from_slice(b);
                *self = Self::Rects(merged);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn r(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    #[test]
    fn default_is_full() {
        assert!(DamageRegion::default().is_full());
    }

    #[test]
    fn from_rects_drops_zero_area() {
        let d = DamageRegion::from_rects([r(0.0, 0.0, 0.0, 5.0)]);
        assert!(d.is_empty());
        let d = DamageRegion::from_rects([r(0.0, 0.0, 0.0, 5.0), r(1.0, 1.0, 2.0, 2.0)]);
        assert_eq!(d, DamageRegion::Rects(vec![r(1.0, 1.0, 2.0, 2.0)]));
    }

    #[test]
    fn merge_full_wins() {
        let mut d = DamageRegion::Rects(vec![r(0.0, 0.0, 10.0, 10.0)]);
        d.merge(&DamageRegion::Full);
        assert!(d.is_full());
    }

    #[test]
    fn merge_none_is_identity() {
        let mut d = DamageRegion::None;
        d.merge(&DamageRegion::Rects(vec![r(1.0, 2.0, 3.0, 4.0)]));
        assert_eq!(d.rects().map(<[Rect]>::len), Some(1));

        let mut d = DamageRegion::Rects(vec![r(1.0, 2.0, 3.0, 4.0)]);
        d.merge(&DamageRegion::None);
        assert_eq!(d.rects().map(<[Rect]>::len), Some(1));
    }

    #[test]
    fn merge_rects_concatenates() {
        let mut d = DamageRegion::Rects(vec![r(0.0, 0.0, 1.0, 1.0)]);
        d.merge(&DamageRegion::Rects(vec![r(5.0, 5.0, 2.0, 2.0)]));
        assert_eq!(d.rects().map(<[Rect]>::len), Some(2));
    }
}
