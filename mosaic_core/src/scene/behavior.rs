// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame sprite behaviors.

use core::fmt;

use kurbo::{Point, Vec2};

use super::id::SpriteId;
use super::store::Scene;
use crate::anchor::Anchor;
use crate::error::Error;
use crate::image::Image;
use crate::time::Duration;
use crate::transform::TransformModel;

/// Arguments passed to every behavior during
/// [`Scene::update_group`](super::Scene::update_group).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateArgs {
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
    /// Time elapsed since the previous frame.
    pub delta: Duration,
}

/// The update hook for a concrete kind of sprite.
///
/// Sprites without a behavior do nothing when their group is updated.
pub trait Behavior {
    /// Advances the sprite by one frame.
    ///
    /// # Errors
    ///
    /// Any error aborts the group's update pass and is returned to its
    /// caller.
    fn update(&mut self, sprite: SpriteMut<'_>, args: &UpdateArgs) -> Result<(), Error>;
}

/// A [`Behavior`] backed by a closure. Created by [`from_fn`].
pub struct FromFn<F>(F);

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn(..)")
    }
}

/// Wraps a closure as a [`Behavior`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(SpriteMut<'_>, &UpdateArgs) -> Result<(), Error>,
{
    FromFn(f)
}

impl<F> Behavior for FromFn<F>
where
    F: FnMut(SpriteMut<'_>, &UpdateArgs) -> Result<(), Error>,
{
    fn update(&mut self, sprite: SpriteMut<'_>, args: &UpdateArgs) -> Result<(), Error> {
        (self.0)(sprite, args)
    }
}

/// Mutable access to one sprite during its update.
///
/// Every mutation goes through the scene, so composite interception and
/// dirty tracking behave exactly as for direct calls.
#[derive(Debug)]
pub struct SpriteMut<'a> {
    scene: &'a mut Scene,
    id: SpriteId,
}

impl<'a> SpriteMut<'a> {
    pub(crate) fn new(scene: &'a mut Scene, id: SpriteId) -> Self {
        Self { scene, id }
    }

    /// The sprite being updated.
    #[must_use]
    pub fn id(&self) -> SpriteId {
        self.id
    }

    /// The sprite's attribute model.
    #[must_use]
    pub fn model(&self) -> &TransformModel {
        self.scene.model(self.id)
    }

    /// The whole scene, for behaviors that spawn, kill, or regroup sprites.
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    /// See [`Scene::set_image`].
    pub fn set_image(&mut self, image: Image) {
        self.scene.set_image(self.id, image);
    }

    /// See [`Scene::move_to`].
    pub fn move_to(&mut self, position: Point) {
        self.scene.move_to(self.id, position);
    }

    /// See [`Scene::move_by`].
    pub fn move_by(&mut self, delta: Vec2) {
        self.scene.move_by(self.id, delta);
    }

    /// See [`Scene::set_offset`].
    pub fn set_offset(&mut self, offset: Vec2) {
        self.scene.set_offset(self.id, offset);
    }

    /// See [`Scene::scale_to`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for out-of-range ratios.
    pub fn scale_to(&mut self, ratio: f64) -> Result<(), Error> {
        self.scene.scale_to(self.id, ratio)
    }

    /// See [`Scene::scale_by`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for out-of-range factors.
    pub fn scale_by(&mut self, factor: f64) -> Result<(), Error> {
        self.scene.scale_by(self.id, factor)
    }

    /// See [`Scene::rotate_to`].
    pub fn rotate_to(&mut self, degrees: i32) {
        self.scene.rotate_to(self.id, degrees);
    }

    /// See [`Scene::rotate_by`].
    pub fn rotate_by(&mut self, degrees: i32) {
        self.scene.rotate_by(self.id, degrees);
    }

    /// See [`Scene::make_visible`].
    pub fn make_visible(&mut self) {
        self.scene.make_visible(self.id);
    }

    /// See [`Scene::make_invisible`].
    pub fn make_invisible(&mut self) {
        self.scene.make_invisible(self.id);
    }

    /// See [`Scene::toggle_visibility`].
    pub fn toggle_visibility(&mut self) {
        self.scene.toggle_visibility(self.id);
    }

    /// See [`Scene::set_anchor`].
    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.scene.set_anchor(self.id, anchor);
    }

    /// See [`Scene::kill`].
    pub fn kill(&mut self) {
        self.scene.kill(self.id);
    }

    /// Detaches the running behavior once this update returns. Use it for
    /// one-shot or finished animations.
    pub fn clear_behavior(&mut self) {
        self.scene.clear_behavior(self.id);
    }
}
