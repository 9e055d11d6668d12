// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-sprite visual attributes and the image/rectangle derived from them.
//!
//! A [`TransformModel`] stores what the caller sets (anchor, position, offset,
//! scale, rotation, visibility, base image) and eagerly recomputes what is
//! drawn:
//!
//! 1. **Derived image**: the base image scaled, then rotated. The order is
//!    fixed; rotation changes the bounding box, so the rectangle's size is
//!    always taken from the rotated image.
//! 2. **Rectangle size**: the derived image's size.
//! 3. **Rectangle origin**: `position + offset − anchor(rect)`.
//!
//! Translation-only changes skip step 1 since it cannot change.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};

use crate::anchor::Anchor;
use crate::error::{Attribute, Error};
use crate::image::Image;
use crate::surface::Surface;

/// A single attribute mutation.
///
/// Every mutating operation on a sprite is expressed as one of these so that
/// composite sprites can intercept it before it is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttributeChange {
    /// Set the position.
    MoveTo(Point),
    /// Add to the position.
    MoveBy(Vec2),
    /// Set the offset applied on top of the position.
    Offset(Vec2),
    /// Set the scale ratio.
    ScaleTo(f64),
    /// Multiply the scale ratio.
    ScaleBy(f64),
    /// Set the rotation in degrees (normalized mod 360).
    RotateTo(i32),
    /// Add to the rotation in degrees (normalized mod 360).
    RotateBy(i32),
    /// Set visibility.
    Visible(bool),
    /// Flip visibility.
    ToggleVisibility,
    /// Set the anchor.
    Anchor(Anchor),
}

impl AttributeChange {
    /// Whether the change moves the sprite without touching its image.
    #[must_use]
    pub const fn is_translation(&self) -> bool {
        matches!(self, Self::MoveTo(_) | Self::MoveBy(_) | Self::Offset(_))
    }
}

/// Visual attribute state of one sprite.
#[derive(Clone, Debug)]
pub struct TransformModel {
    anchor: Anchor,
    position: Point,
    offset: Vec2,
    scale: f64,
    rotation: u16,
    visible: bool,
    base: Option<Image>,
    // `None` while scale is 1 and rotation is 0; the base image is drawn as-is.
    derived: Option<Image>,
    rect: Option<Rect>,
    dirty: bool,
}

impl Default for TransformModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformModel {
    /// Creates a detached model: no image, no rectangle, anchored top-left at
    /// the origin, unscaled, unrotated, and visible.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            anchor: Anchor::TopLeft,
            position: Point::ORIGIN,
            offset: Vec2::ZERO,
            scale: 1.0,
            rotation: 0,
            visible: true,
            base: None,
            derived: None,
            rect: None,
            dirty: false,
        }
    }

    /// Creates a model showing `image` at the origin.
    #[must_use]
    pub fn with_image(image: Image) -> Self {
        let mut model = Self::new();
        model.set_image(image);
        model
    }

    // -- Getters --

    /// The anchor.
    #[must_use]
    pub const fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// The designated position: where the anchor is drawn (before offset).
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// The translation applied on top of the position.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// The scale ratio.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// The rotation in degrees, in `0..360`.
    #[must_use]
    pub const fn rotation(&self) -> u16 {
        self.rotation
    }

    /// Whether the sprite draws.
    #[must_use]
    pub const fn visible(&self) -> bool {
        self.visible
    }

    /// The bounding rectangle of the derived image, if one has been bound.
    #[must_use]
    pub const fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// The image as loaded, before scale and rotation.
    #[must_use]
    pub fn base_image(&self) -> Option<&Image> {
        self.base.as_ref()
    }

    /// The image that is drawn: the base image scaled, then rotated.
    #[must_use]
    pub fn image(&self) -> Option<&Image> {
        self.derived.as_ref().or(self.base.as_ref())
    }

    /// The offset from the rectangle's top-left corner to the anchor point.
    ///
    /// # Panics
    ///
    /// Panics if no rectangle is bound yet; anchor math before the sprite has
    /// an image (or an explicit rectangle) is a programming error.
    #[must_use]
    pub fn anchor_offset(&self) -> Vec2 {
        let Some(rect) = self.rect else {
            panic!("anchor resolved before the sprite has a rect");
        };
        self.anchor.resolve(rect.size())
    }

    /// Whether any attribute changed since the last [`take_dirty`](Self::take_dirty).
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns and clears the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    // -- Mutation API --

    /// Replaces the base image. The rectangle is resized to the new derived
    /// image and re-anchored.
    pub fn set_image(&mut self, image: Image) {
        self.base = Some(image);
        self.rederive();
        self.relayout();
        self.dirty = true;
    }

    /// Binds an explicit rectangle, for sprites that have no image of their
    /// own (composites, placeholders). The origin is recomputed from the
    /// anchor immediately; the size is kept until an image is set.
    pub fn bind_rect(&mut self, rect: Rect) {
        self.rect = Some(rect);
        self.relayout();
        self.dirty = true;
    }

    /// Sets the position.
    pub fn move_to(&mut self, position: Point) {
        self.commit(AttributeChange::MoveTo(position));
    }

    /// Adds `delta` to the position.
    pub fn move_by(&mut self, delta: Vec2) {
        self.commit(AttributeChange::MoveBy(delta));
    }

    /// Sets the offset without touching the stored position.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.commit(AttributeChange::Offset(offset));
    }

    /// Sets the scale ratio.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `ratio` is not finite and
    /// strictly positive; the model is left unchanged.
    pub fn scale_to(&mut self, ratio: f64) -> Result<(), Error> {
        self.apply(AttributeChange::ScaleTo(ratio))
    }

    /// Multiplies the scale ratio by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `factor` or the resulting ratio is
    /// not finite and strictly positive; the model is left unchanged.
    pub fn scale_by(&mut self, factor: f64) -> Result<(), Error> {
        self.apply(AttributeChange::ScaleBy(factor))
    }

    /// Sets the rotation, normalized mod 360.
    pub fn rotate_to(&mut self, degrees: i32) {
        self.commit(AttributeChange::RotateTo(degrees));
    }

    /// Adds `degrees` to the rotation, normalized mod 360.
    pub fn rotate_by(&mut self, degrees: i32) {
        self.commit(AttributeChange::RotateBy(degrees));
    }

    /// Makes the sprite draw.
    pub fn make_visible(&mut self) {
        self.commit(AttributeChange::Visible(true));
    }

    /// Stops the sprite from drawing. Position and image are kept.
    pub fn make_invisible(&mut self) {
        self.commit(AttributeChange::Visible(false));
    }

    /// Flips visibility.
    pub fn toggle_visibility(&mut self) {
        self.commit(AttributeChange::ToggleVisibility);
    }

    /// Sets the anchor and re-anchors the rectangle.
    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.commit(AttributeChange::Anchor(anchor));
    }

    /// Validates and applies a change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for out-of-range scale values.
    pub fn apply(&mut self, change: AttributeChange) -> Result<(), Error> {
        self.check(change)?;
        self.commit(change);
        Ok(())
    }

    /// Draws the derived image at the rectangle.
    ///
    /// Returns the drawn area, or `None` if the sprite is invisible or has no
    /// image. An invisible sprite leaves `surface` untouched.
    pub fn draw(&self, surface: &mut dyn Surface) -> Option<Rect> {
        if !self.visible {
            return None;
        }
        let image = self.image()?;
        let rect = self.rect?;
        Some(surface.blit(image, rect))
    }

    /// The `(position, offset)` pair this model would hold after `change`.
    #[must_use]
    pub fn translation_after(&self, change: AttributeChange) -> (Point, Vec2) {
        match change {
            AttributeChange::MoveTo(p) => (p, self.offset),
            AttributeChange::MoveBy(d) => (self.position + d, self.offset),
            AttributeChange::Offset(o) => (self.position, o),
            _ => (self.position, self.offset),
        }
    }

    // -- Internal --

    /// Rejects a change before anything is mutated.
    pub(crate) fn check(&self, change: AttributeChange) -> Result<(), Error> {
        match change {
            AttributeChange::ScaleTo(ratio) => {
                check_scale(ratio)?;
                check_scaled_size(self.base.as_ref(), ratio)
            }
            AttributeChange::ScaleBy(factor) => {
                check_scale(factor)?;
                let ratio = self.scale * factor;
                check_scale(ratio)?;
                check_scaled_size(self.base.as_ref(), ratio)
            }
            _ => Ok(()),
        }
    }

    /// Applies a change that has already passed [`check`](Self::check).
    pub(crate) fn commit(&mut self, change: AttributeChange) {
        match change {
            AttributeChange::MoveTo(p) => self.position = p,
            AttributeChange::MoveBy(d) => self.position += d,
            AttributeChange::Offset(o) => self.offset = o,
            AttributeChange::ScaleTo(ratio) => self.scale = ratio,
            AttributeChange::ScaleBy(factor) => self.scale *= factor,
            AttributeChange::RotateTo(deg) => self.rotation = normalize_degrees(i64::from(deg)),
            AttributeChange::RotateBy(deg) => {
                self.rotation = normalize_degrees(i64::from(self.rotation) + i64::from(deg));
            }
            AttributeChange::Visible(v) => self.visible = v,
            AttributeChange::ToggleVisibility => self.visible = !self.visible,
            AttributeChange::Anchor(anchor) => self.anchor = anchor,
        }
        if matches!(
            change,
            AttributeChange::ScaleTo(_)
                | AttributeChange::ScaleBy(_)
                | AttributeChange::RotateTo(_)
                | AttributeChange::RotateBy(_)
        ) {
            self.rederive();
        }
        self.relayout();
        self.dirty = true;
    }

    /// Recomputes the derived image and the rectangle's size.
    fn rederive(&mut self) {
        let Some(base) = self.base.as_ref() else {
            return;
        };
        let scaled = if self.scale == 1.0 {
            None
        } else {
            let (w, h) = scaled_size(base, self.scale);
            Some(base.scaled(w, h))
        };
        let derived = if self.rotation == 0 {
            scaled
        } else {
            Some(scaled.as_ref().unwrap_or(base).rotated(self.rotation))
        };
        let size = derived.as_ref().unwrap_or(base).size();
        let origin = self.rect.map_or(Point::ORIGIN, |r| r.origin());
        self.derived = derived;
        self.rect = Some(Rect::from_origin_size(origin, size));
    }

    /// Recomputes the rectangle's origin from position, offset, and anchor.
    fn relayout(&mut self) {
        if self.rect.is_none() {
            return;
        }
        let origin = self.position + self.offset - self.anchor_offset();
        if let Some(rect) = &mut self.rect {
            *rect = rect.with_origin(origin);
        }
    }
}

fn check_scale(value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument {
            attribute: Attribute::Scale,
            value,
        })
    }
}

/// Largest scaled image, in pixels per side and in total, a ratio may
/// produce. Rotation can at most double the area on top of this.
const MAX_SCALED_PIXELS: f64 = 67_108_864.0;
/// Per-side cap whose square is [`MAX_SCALED_PIXELS`].
const MAX_SCALED_SIDE: f64 = 8_192.0;

/// Rejects ratios whose scaled image could not be allocated.
fn check_scaled_size(base: Option<&Image>, ratio: f64) -> Result<(), Error> {
    let Some(base) = base else {
        return Ok(());
    };
    let w = (f64::from(base.width()) * ratio).round();
    let h = (f64::from(base.height()) * ratio).round();
    if w.max(h) <= MAX_SCALED_PIXELS && w * h <= MAX_SCALED_PIXELS {
        Ok(())
    } else {
        Err(Error::InvalidArgument {
            attribute: Attribute::Scale,
            value: ratio,
        })
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "rem_euclid(360) always fits in u16"
)]
fn normalize_degrees(degrees: i64) -> u16 {
    degrees.rem_euclid(360) as u16
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "both sides are capped well below u32::MAX"
)]
fn scaled_size(base: &Image, scale: f64) -> (u32, u32) {
    // Only an image set after an oversized ratio reaches the cap; ratio
    // changes are rejected by `check_scaled_size` first.
    let w = (f64::from(base.width()) * scale).round().min(MAX_SCALED_SIDE);
    let h = (f64::from(base.height()) * scale).round().min(MAX_SCALED_SIDE);
    (w as u32, h as u32)
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::image::Color;

    fn placeholder() -> TransformModel {
        let mut m = TransformModel::new();
        m.bind_rect(Rect::ZERO);
        m.move_to(Point::ORIGIN);
        m
    }

    fn size_of(m: &TransformModel) -> Size {
        m.rect().expect("rect bound").size()
    }

    #[test]
    fn move_to_sets_position() {
        let mut m = placeholder();
        m.move_to(Point::new(52.0, 24.0));
        assert_eq!(m.position(), Point::new(52.0, 24.0));
        assert_eq!(m.rect().unwrap().origin(), Point::new(52.0, 24.0));
    }

    #[test]
    fn move_by_accumulates() {
        let mut m = placeholder();
        m.move_by(Vec2::new(2.0, 4.0));
        assert_eq!(m.position(), Point::new(2.0, 4.0));
        m.move_by(Vec2::new(3.0, 3.0));
        assert_eq!(m.position(), Point::new(5.0, 7.0));
    }

    #[test]
    fn set_image_resizes_rect() {
        let mut m = placeholder();
        m.set_image(Image::new(10, 10));
        assert_eq!(size_of(&m), Size::new(10.0, 10.0));
        m.set_image(Image::new(28, 93));
        assert_eq!(size_of(&m), Size::new(28.0, 93.0));
    }

    #[test]
    fn set_image_keeps_scale_and_rotation() {
        let mut m = placeholder();
        m.scale_to(2.0).unwrap();
        m.rotate_to(90);
        m.set_image(Image::new(10, 20));
        assert_eq!(size_of(&m), Size::new(40.0, 20.0));
    }

    #[test]
    fn offset_composes_with_position() {
        let mut m = placeholder();
        m.set_offset(Vec2::new(25.0, 25.0));
        assert_eq!(m.rect().unwrap().origin(), Point::new(25.0, 25.0));
        m.move_to(Point::new(12.0, 12.0));
        assert_eq!(m.rect().unwrap().origin(), Point::new(37.0, 37.0));
        m.set_offset(Vec2::new(7.0, 7.0));
        assert_eq!(m.rect().unwrap().origin(), Point::new(19.0, 19.0));
        // Offset does not leak into the stored position.
        assert_eq!(m.position(), Point::new(12.0, 12.0));
    }

    #[test]
    fn anchors_reposition_rect() {
        let mut m = TransformModel::with_image(Image::new(20, 10));
        m.move_to(Point::new(100.0, 100.0));
        m.set_anchor(Anchor::Center);
        assert_eq!(m.rect().unwrap().origin(), Point::new(90.0, 95.0));
        m.set_anchor(Anchor::BottomRight);
        assert_eq!(m.rect().unwrap().origin(), Point::new(80.0, 90.0));
        m.set_anchor(Anchor::Offset(Vec2::new(25.0, 20.0)));
        assert_eq!(m.rect().unwrap().origin(), Point::new(75.0, 80.0));
    }

    #[test]
    fn center_anchor_follows_scaling() {
        let mut m = TransformModel::with_image(Image::new(10, 10));
        m.set_anchor(Anchor::Center);
        m.move_to(Point::new(50.0, 50.0));
        m.scale_to(3.0).unwrap();
        assert_eq!(m.rect().unwrap(), Rect::new(35.0, 35.0, 65.0, 65.0));
    }

    #[test]
    fn visibility_flags() {
        let mut surface = Image::filled(20, 20, Color::WHITE);
        let mut m = TransformModel::with_image(Image::filled(10, 10, Color::RED));
        m.make_invisible();
        assert!(!m.visible());
        assert_eq!(m.draw(&mut surface), None);
        assert_eq!(surface.get(5, 5), Some(Color::WHITE));
        m.make_visible();
        assert!(m.visible());
        assert!(m.draw(&mut surface).is_some());
        assert_eq!(surface.get(5, 5), Some(Color::RED));
    }

    #[test]
    fn toggle_is_an_involution() {
        let mut m = placeholder();
        m.make_visible();
        m.toggle_visibility();
        assert!(!m.visible());
        m.toggle_visibility();
        assert!(m.visible());
    }

    #[test]
    fn rotate_to_half_turn_repaints() {
        let mut surface = Image::filled(100, 100, Color::WHITE);
        let mut img = Image::new(32, 32);
        img.fill_rect(Color::RED, Rect::new(0.0, 0.0, 16.0, 32.0));
        img.fill_rect(Color::BLUE, Rect::new(16.0, 0.0, 32.0, 32.0));
        let mut m = TransformModel::with_image(img);
        let _ = m.draw(&mut surface);
        assert_eq!(surface.get(5, 5), Some(Color::RED));

        m.rotate_to(180);
        let _ = m.draw(&mut surface);
        assert_eq!(surface.get(5, 5), Some(Color::BLUE));
    }

    #[test]
    fn rotate_by_wraps() {
        let mut m = TransformModel::with_image(Image::new(15, 45));
        assert_eq!(m.rotation(), 0);
        m.rotate_by(15);
        assert_eq!(m.rotation(), 15);
        m.rotate_by(15);
        assert_eq!(m.rotation(), 30);
        m.rotate_by(390);
        assert_eq!(m.rotation(), 60);
        m.rotate_by(-120);
        assert_eq!(m.rotation(), 300);
        m.rotate_to(-90);
        assert_eq!(m.rotation(), 270);
    }

    #[test]
    fn rotation_resizes_rect() {
        let mut m = TransformModel::with_image(Image::new(15, 45));
        m.rotate_to(90);
        assert_eq!(size_of(&m), Size::new(45.0, 15.0));
        m.rotate_to(0);
        assert_eq!(size_of(&m), Size::new(15.0, 45.0));
    }

    #[test]
    fn scale_to_replaces_ratio() {
        let mut m = TransformModel::with_image(Image::new(10, 10));
        m.scale_to(3.0).unwrap();
        assert_eq!(size_of(&m), Size::new(30.0, 30.0));
        m.scale_to(0.7).unwrap();
        assert_eq!(size_of(&m), Size::new(7.0, 7.0));
    }

    #[test]
    fn scale_by_compounds() {
        let mut m = TransformModel::with_image(Image::new(10, 10));
        m.scale_by(3.0).unwrap();
        assert_eq!(size_of(&m), Size::new(30.0, 30.0));
        m.scale_by(0.7).unwrap();
        assert_eq!(size_of(&m), Size::new(21.0, 21.0));
    }

    #[test]
    fn non_positive_scale_is_rejected_without_mutation() {
        let mut m = TransformModel::with_image(Image::new(10, 10));
        m.scale_to(2.0).unwrap();
        let _ = m.take_dirty();

        let err = m.scale_to(0.0).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument {
                attribute: Attribute::Scale,
                value: 0.0
            }
        );
        assert!(m.scale_by(-2.0).is_err());
        assert!(m.scale_to(f64::NAN).is_err());
        assert_eq!(m.scale(), 2.0);
        assert_eq!(size_of(&m), Size::new(20.0, 20.0));
        assert!(!m.is_dirty());
    }

    #[test]
    fn unallocatable_scale_is_rejected_without_mutation() {
        let mut m = TransformModel::with_image(Image::new(10, 10));
        m.scale_to(100.0).unwrap();
        assert_eq!(size_of(&m), Size::new(1000.0, 1000.0));

        assert_eq!(
            m.scale_to(1e9),
            Err(Error::InvalidArgument {
                attribute: Attribute::Scale,
                value: 1e9
            })
        );
        assert!(m.scale_by(1e7).is_err());
        assert_eq!(m.scale(), 100.0);
        assert_eq!(size_of(&m), Size::new(1000.0, 1000.0));
    }

    #[test]
    fn mutations_mark_dirty() {
        let mut m = placeholder();
        let _ = m.take_dirty();
        m.rotate_by(10);
        assert!(m.take_dirty());
        assert!(!m.is_dirty());
    }

    #[test]
    fn imageless_sprite_draws_nothing() {
        let mut surface = Image::new(4, 4);
        let m = placeholder();
        assert_eq!(m.draw(&mut surface), None);
    }

    #[test]
    fn translation_after_previews_moves() {
        let mut m = placeholder();
        m.move_to(Point::new(1.0, 1.0));
        let (p, o) = m.translation_after(AttributeChange::MoveBy(Vec2::new(2.0, 3.0)));
        assert_eq!(p, Point::new(3.0, 4.0));
        assert_eq!(o, Vec2::ZERO);
        assert_eq!(m.position(), Point::new(1.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "anchor resolved before the sprite has a rect")]
    fn anchor_without_rect_panics() {
        let m = TransformModel::new();
        let _ = m.anchor_offset();
    }
}
