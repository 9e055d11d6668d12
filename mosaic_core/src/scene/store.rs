// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays sprite storage with allocation, attribute, and draw
//! management.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Vec2};
use understory_dirty::{Channel, CycleHandling, DirtyTracker, EagerPolicy};

use super::behavior::Behavior;
use super::group::GroupSlot;
use super::id::{GroupId, INVALID, SpriteId};
use crate::anchor::Anchor;
use crate::dirty;
use crate::error::Error;
use crate::image::Image;
use crate::surface::Surface;
use crate::transform::{AttributeChange, TransformModel};

/// What a sprite slot holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// A sprite that draws its own derived image.
    #[default]
    Plain,
    /// An aggregate that draws its children and forwards attribute changes
    /// to them.
    Composite,
}

/// Sprite and group arenas plus the membership relation between them.
///
/// Sprites are addressed by [`SpriteId`] handles, groups by [`GroupId`].
/// Internally each sprite occupies a slot in parallel arrays. Destroyed
/// slots are recycled via free lists, and generation counters prevent stale
/// handle access.
pub struct Scene {
    // -- Sprite attributes --
    pub(crate) model: Vec<TransformModel>,
    pub(crate) kind: Vec<SpriteKind>,
    pub(crate) layer: Vec<i32>,
    pub(crate) behavior: Vec<BehaviorSlot>,

    // -- Composite topology --
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) owner: Vec<u32>,

    // -- Membership (sprite side) --
    pub(crate) memberships: Vec<Vec<GroupId>>,

    // -- Sprite allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Groups --
    pub(crate) groups: Vec<GroupSlot>,
    pub(crate) group_generation: Vec<u32>,
    pub(crate) group_free_list: Vec<u32>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

/// A sprite's behavior, or its absence.
pub(crate) enum BehaviorSlot {
    Empty,
    Installed(Box<dyn Behavior>),
    /// Taken out by `update_group` while it runs. Any write during the run
    /// replaces this marker and wins over the running behavior.
    Running,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("sprites", &self.sprite_count())
            .field("groups", &self.group_count())
            .field("free_sprites", &self.free_list.len())
            .field("free_groups", &self.group_free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: Vec::new(),
            kind: Vec::new(),
            layer: Vec::new(),
            behavior: Vec::new(),
            children: Vec::new(),
            owner: Vec::new(),
            memberships: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            groups: Vec::new(),
            group_generation: Vec::new(),
            group_free_list: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a detached sprite: no image, no rectangle, no groups.
    ///
    /// Attribute changes are recorded but the sprite has nothing to draw
    /// until [`set_image`](Self::set_image) is called.
    pub fn create_sprite(&mut self) -> SpriteId {
        self.allocate(TransformModel::new(), SpriteKind::Plain)
    }

    /// Creates a sprite showing `image` at the origin.
    pub fn create_sprite_with_image(&mut self, image: Image) -> SpriteId {
        self.allocate(TransformModel::with_image(image), SpriteKind::Plain)
    }

    /// Creates an empty composite sprite.
    ///
    /// The composite is bound to a zero-size rectangle so anchor math is
    /// defined; it never draws an image of its own.
    pub fn create_composite(&mut self) -> SpriteId {
        let mut model = TransformModel::new();
        model.bind_rect(Rect::ZERO);
        self.allocate(model, SpriteKind::Composite)
    }

    fn allocate(&mut self, mut model: TransformModel, kind: SpriteKind) -> SpriteId {
        let _ = model.take_dirty();
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped on destroy.
            let i = idx as usize;
            self.model[i] = model;
            self.kind[i] = kind;
            self.layer[i] = 0;
            self.behavior[i] = BehaviorSlot::Empty;
            self.children[i].clear();
            self.owner[i] = INVALID;
            self.memberships[i].clear();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.model.push(model);
            self.kind.push(kind);
            self.layer.push(0);
            self.behavior.push(BehaviorSlot::Empty);
            self.children.push(Vec::new());
            self.owner.push(INVALID);
            self.memberships.push(Vec::new());
            self.generation.push(0);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::GEOMETRY);
        self.dirty.mark(idx, dirty::IMAGE);
        SpriteId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a sprite, freeing its slot for reuse.
    ///
    /// The sprite is first [killed](Self::kill) so every group records its
    /// last rectangle as lost. A composite's children are destroyed with it.
    /// A child is detached from its owning composite.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_sprite(&mut self, id: SpriteId) {
        self.validate(id);
        self.kill(id);

        let idx = id.idx;
        let children = core::mem::take(&mut self.children[idx as usize]);
        for child in children {
            self.owner[child as usize] = INVALID;
            let child_id = self.sprite_id(child);
            self.destroy_sprite(child_id);
        }

        let owner = self.owner[idx as usize];
        if owner != INVALID {
            self.children[owner as usize].retain(|&c| c != idx);
            self.owner[idx as usize] = INVALID;
        }

        self.behavior[idx as usize] = BehaviorSlot::Empty;
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
        self.pending_removed.push(idx);
    }

    /// Returns whether the given handle refers to a live sprite.
    #[must_use]
    pub fn is_alive(&self, id: SpriteId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    /// Number of live sprites.
    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the attribute model of a sprite.
    #[must_use]
    pub fn model(&self, id: SpriteId) -> &TransformModel {
        self.validate(id);
        &self.model[id.idx as usize]
    }

    /// Returns a sprite's bounding rectangle, if it has one.
    #[must_use]
    pub fn rect(&self, id: SpriteId) -> Option<Rect> {
        self.model(id).rect()
    }

    /// Returns a sprite's designated position.
    #[must_use]
    pub fn position(&self, id: SpriteId) -> Point {
        self.model(id).position()
    }

    /// Returns whether a sprite is plain or composite.
    #[must_use]
    pub fn kind(&self, id: SpriteId) -> SpriteKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns a sprite's draw layer.
    #[must_use]
    pub fn layer(&self, id: SpriteId) -> i32 {
        self.validate(id);
        self.layer[id.idx as usize]
    }

    // -- Attribute API --

    /// Applies an attribute change, routing it through composite
    /// interception first.
    ///
    /// The change is validated against the sprite and, for a composite,
    /// every descendant it would be forwarded to before anything mutates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for out-of-range scale values. No
    /// sprite is modified in that case.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn apply(&mut self, id: SpriteId, change: AttributeChange) -> Result<(), Error> {
        self.validate(id);
        self.check_subtree(id.idx, change)?;
        self.dispatch(id.idx, change);
        Ok(())
    }

    /// Replaces a sprite's base image.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_image(&mut self, id: SpriteId, image: Image) {
        self.validate(id);
        self.model[id.idx as usize].set_image(image);
        self.flush_dirty(id.idx, &[dirty::GEOMETRY, dirty::IMAGE]);
    }

    /// Sets a sprite's position.
    pub fn move_to(&mut self, id: SpriteId, position: Point) {
        self.apply_infallible(id, AttributeChange::MoveTo(position));
    }

    /// Adds `delta` to a sprite's position.
    pub fn move_by(&mut self, id: SpriteId, delta: Vec2) {
        self.apply_infallible(id, AttributeChange::MoveBy(delta));
    }

    /// Sets a sprite's offset.
    pub fn set_offset(&mut self, id: SpriteId, offset: Vec2) {
        self.apply_infallible(id, AttributeChange::Offset(offset));
    }

    /// Sets a sprite's scale ratio.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `ratio` is not finite and
    /// strictly positive.
    pub fn scale_to(&mut self, id: SpriteId, ratio: f64) -> Result<(), Error> {
        self.apply(id, AttributeChange::ScaleTo(ratio))
    }

    /// Multiplies a sprite's scale ratio.
    ///
    /// Scales compound: `scale_to(3.0)` then `scale_by(2.0)` leaves a ratio of
    /// 6, so a 10 × 10 image derives to 60 × 60. A composite forwards the
    /// factor, and each child multiplies its own ratio.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `factor`, or the resulting ratio
    /// of the sprite or any composite descendant, is not finite and strictly
    /// positive.
    pub fn scale_by(&mut self, id: SpriteId, factor: f64) -> Result<(), Error> {
        self.apply(id, AttributeChange::ScaleBy(factor))
    }

    /// Sets a sprite's rotation in degrees.
    pub fn rotate_to(&mut self, id: SpriteId, degrees: i32) {
        self.apply_infallible(id, AttributeChange::RotateTo(degrees));
    }

    /// Adds to a sprite's rotation in degrees.
    pub fn rotate_by(&mut self, id: SpriteId, degrees: i32) {
        self.apply_infallible(id, AttributeChange::RotateBy(degrees));
    }

    /// Makes a sprite draw.
    pub fn make_visible(&mut self, id: SpriteId) {
        self.apply_infallible(id, AttributeChange::Visible(true));
    }

    /// Stops a sprite from drawing.
    pub fn make_invisible(&mut self, id: SpriteId) {
        self.apply_infallible(id, AttributeChange::Visible(false));
    }

    /// Flips a sprite's visibility.
    pub fn toggle_visibility(&mut self, id: SpriteId) {
        self.apply_infallible(id, AttributeChange::ToggleVisibility);
    }

    /// Sets a sprite's anchor. Not forwarded to composite children.
    pub fn set_anchor(&mut self, id: SpriteId, anchor: Anchor) {
        self.apply_infallible(id, AttributeChange::Anchor(anchor));
    }

    /// Sets a sprite's draw layer. Groups draw lower layers first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_layer(&mut self, id: SpriteId, layer: i32) {
        self.validate(id);
        if self.layer[id.idx as usize] != layer {
            self.layer[id.idx as usize] = layer;
            self.dirty.mark(id.idx, dirty::MEMBERSHIP);
        }
    }

    /// Attaches the per-frame behavior run by [`update_group`](Self::update_group).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_behavior(&mut self, id: SpriteId, behavior: impl Behavior + 'static) {
        self.validate(id);
        self.behavior[id.idx as usize] = BehaviorSlot::Installed(Box::new(behavior));
    }

    /// Detaches a sprite's behavior, making its update a no-op.
    pub fn clear_behavior(&mut self, id: SpriteId) {
        self.validate(id);
        self.behavior[id.idx as usize] = BehaviorSlot::Empty;
    }

    // -- Draw API --

    /// Draws a sprite onto `surface`.
    ///
    /// A plain sprite blits its derived image if visible. A composite draws
    /// its children in order and returns the union of what they drew;
    /// children clipped entirely off the surface do not count.
    /// Returns `None` when nothing was drawn.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn draw_sprite(&self, id: SpriteId, surface: &mut dyn Surface) -> Option<Rect> {
        self.validate(id);
        self.draw_at(id.idx, surface)
    }

    pub(crate) fn draw_at(&self, idx: u32, surface: &mut dyn Surface) -> Option<Rect> {
        match self.kind[idx as usize] {
            SpriteKind::Plain => self.model[idx as usize].draw(surface),
            SpriteKind::Composite => self.children[idx as usize]
                .iter()
                .filter_map(|&child| self.draw_at(child, surface))
                .filter(|r| !r.is_zero_area())
                .reduce(|a, b| a.union(b)),
        }
    }

    // -- Internal --

    fn apply_infallible(&mut self, id: SpriteId, change: AttributeChange) {
        self.validate(id);
        self.dispatch(id.idx, change);
    }

    /// Validates `change` against `idx` and every sprite it would reach.
    fn check_subtree(&self, idx: u32, change: AttributeChange) -> Result<(), Error> {
        self.model[idx as usize].check(change)?;
        if self.kind[idx as usize] == SpriteKind::Composite
            && !change.is_translation()
            && !matches!(change, AttributeChange::Anchor(_))
        {
            for &child in &self.children[idx as usize] {
                self.check_subtree(child, change)?;
            }
        }
        Ok(())
    }

    /// Runs interception, then commits the change to the sprite itself.
    pub(crate) fn dispatch(&mut self, idx: u32, change: AttributeChange) {
        if self.before_change(idx, change) {
            self.model[idx as usize].commit(change);
            self.flush_dirty(idx, dirty::channels_for(change));
        }
    }

    /// Interception hook run before a sprite's own model applies `change`.
    ///
    /// Plain sprites always proceed. Composites forward the change to their
    /// children first and then proceed as well.
    fn before_change(&mut self, idx: u32, change: AttributeChange) -> bool {
        if self.kind[idx as usize] != SpriteKind::Composite {
            return true;
        }
        let forwarded = if change.is_translation() {
            let (position, offset) = self.model[idx as usize].translation_after(change);
            Some(AttributeChange::Offset(position.to_vec2() + offset))
        } else if let AttributeChange::Anchor(_) = change {
            None
        } else {
            Some(change)
        };
        if let Some(forwarded) = forwarded {
            let children = self.children[idx as usize].clone();
            for child in children {
                self.dispatch(child, forwarded);
            }
        }
        true
    }

    /// Moves a model's dirty flag into the scene's channels.
    fn flush_dirty(&mut self, idx: u32, channels: &[Channel]) {
        if !self.model[idx as usize].take_dirty() {
            return;
        }
        for &ch in channels {
            if ch == dirty::VISIBILITY {
                self.dirty.mark_with(idx, ch, &EagerPolicy);
            } else {
                self.dirty.mark(idx, ch);
            }
        }
    }

    /// Builds the current handle for a live slot.
    pub(crate) fn sprite_id(&self, idx: u32) -> SpriteId {
        SpriteId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if `id` is stale.
    pub(crate) fn validate(&self, id: SpriteId) {
        assert!(
            self.is_alive(id),
            "stale SpriteId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}
