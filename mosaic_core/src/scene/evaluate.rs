// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change reports.
//!
//! [`Scene::evaluate`] drains each dirty channel in deterministic order.
//! Nothing is recomputed here: the transform model derives images and
//! rectangles eagerly, so evaluation only reports which sprites changed.
//!
//! [`SceneChanges`] uses raw slot indices (`u32`) rather than
//! [`SpriteId`](super::SpriteId) handles; a removed sprite's slot may already
//! be reused by the time the report is read.

use alloc::vec::Vec;

use super::store::Scene;
use crate::dirty;

/// The set of changes produced by a single [`Scene::evaluate`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneChanges {
    /// Sprites whose rectangle moved or resized.
    pub geometry: Vec<u32>,
    /// Sprites whose derived image was recomputed.
    pub image: Vec<u32>,
    /// Sprites whose visibility flag changed, including composite children
    /// reached through their composite.
    pub visibility: Vec<u32>,
    /// Sprites whose group membership or draw layer changed.
    pub membership: Vec<u32>,
    /// Sprites created since the last evaluate.
    pub added: Vec<u32>,
    /// Sprites destroyed since the last evaluate.
    pub removed: Vec<u32>,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.geometry.clear();
        self.image.clear();
        self.visibility.clear();
        self.membership.clear();
        self.added.clear();
        self.removed.clear();
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
            && self.image.is_empty()
            && self.visibility.is_empty()
            && self.membership.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}

impl Scene {
    /// Drains every dirty channel and returns what changed since the last
    /// call.
    pub fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        changes.geometry = self
            .dirty
            .drain(dirty::GEOMETRY)
            .deterministic()
            .run()
            .collect();

        changes.image = self
            .dirty
            .drain(dirty::IMAGE)
            .deterministic()
            .run()
            .collect();

        // Visibility reaches composite children through dependency edges.
        changes.visibility = self
            .dirty
            .drain(dirty::VISIBILITY)
            .affected()
            .deterministic()
            .run()
            .collect();

        changes.membership = self
            .dirty
            .drain(dirty::MEMBERSHIP)
            .deterministic()
            .run()
            .collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}
