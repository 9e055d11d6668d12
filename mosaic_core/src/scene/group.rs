// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group storage and the per-frame clear/update/draw passes.
//!
//! Each member moves through `Undrawn → Drawn(rect) → Undrawn` (when removed,
//! its rectangle is pushed onto the group's lost list) `→ Drawn(rect')`.
//! [`Scene::clear_group`] restores every lost and every recorded rectangle
//! from the background; [`Scene::draw_group`] records fresh rectangles and
//! forgets the lost list, which the clear pass has already honored.

use alloc::vec::Vec;

use kurbo::Rect;

use super::behavior::{SpriteMut, UpdateArgs};
use super::id::{GroupId, SpriteId};
use super::store::{BehaviorSlot, Scene};
use crate::error::Error;
use crate::surface::{Background, Surface};

/// One member of a group and what it drew last.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Member {
    pub(crate) sprite: u32,
    pub(crate) drawn: Option<Rect>,
}

/// Storage for one group.
#[derive(Clone, Debug, Default)]
pub(crate) struct GroupSlot {
    /// Members in insertion order.
    pub(crate) members: Vec<Member>,
    /// Rectangles drawn by members removed since the last draw.
    pub(crate) lost: Vec<Rect>,
}

impl Scene {
    // -- Group allocation API --

    /// Creates an empty group.
    pub fn create_group(&mut self) -> GroupId {
        let idx = if let Some(idx) = self.group_free_list.pop() {
            self.groups[idx as usize] = GroupSlot::default();
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "group handles address slots with u32 indices"
            )]
            let idx = self.groups.len() as u32;
            self.groups.push(GroupSlot::default());
            self.group_generation.push(0);
            idx
        };
        GroupId {
            idx,
            generation: self.group_generation[idx as usize],
        }
    }

    /// Empties a group and frees its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_group(&mut self, group: GroupId) {
        self.empty(group);
        self.group_generation[group.idx as usize] += 1;
        self.group_free_list.push(group.idx);
    }

    /// Returns whether the given handle refers to a live group.
    #[must_use]
    pub fn is_group_alive(&self, group: GroupId) -> bool {
        (group.idx as usize) < self.groups.len()
            && self.group_generation[group.idx as usize] == group.generation
    }

    /// Number of live groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len() - self.group_free_list.len()
    }

    // -- Group queries --

    /// Members of a group in insertion order.
    #[must_use]
    pub fn sprites(&self, group: GroupId) -> Vec<SpriteId> {
        self.validate_group(group);
        self.groups[group.idx as usize]
            .members
            .iter()
            .map(|m| self.sprite_id(m.sprite))
            .collect()
    }

    /// Number of members in a group.
    #[must_use]
    pub fn group_len(&self, group: GroupId) -> usize {
        self.validate_group(group);
        self.groups[group.idx as usize].members.len()
    }

    /// Whether a group has no members.
    #[must_use]
    pub fn group_is_empty(&self, group: GroupId) -> bool {
        self.group_len(group) == 0
    }

    /// The rectangle `sprite` drew in its last [`draw_group`](Self::draw_group)
    /// pass for `group`, or `None` if it drew nothing or is not a member.
    #[must_use]
    pub fn drawn_rect(&self, group: GroupId, sprite: SpriteId) -> Option<Rect> {
        self.validate_group(group);
        self.validate(sprite);
        self.groups[group.idx as usize]
            .members
            .iter()
            .find(|m| m.sprite == sprite.idx)
            .and_then(|m| m.drawn)
    }

    /// Rectangles of removed members still awaiting a clear pass.
    #[must_use]
    pub fn lost_rects(&self, group: GroupId) -> &[Rect] {
        self.validate_group(group);
        &self.groups[group.idx as usize].lost
    }

    // -- Frame passes --

    /// Restores every lost rectangle and every rectangle members drew last
    /// frame from `background`. Returns the restored rectangles.
    ///
    /// Must run before [`update_group`](Self::update_group) and
    /// [`draw_group`](Self::draw_group) so stale imprints are erased before
    /// new positions are painted.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn clear_group(
        &self,
        group: GroupId,
        surface: &mut dyn Surface,
        background: Background<'_>,
    ) -> Vec<Rect> {
        self.validate_group(group);
        let slot = &self.groups[group.idx as usize];
        let recorded = slot.members.iter().filter_map(|m| m.drawn);
        let mut cleared = Vec::new();
        for rect in slot.lost.iter().copied().chain(recorded) {
            if rect.is_zero_area() {
                continue;
            }
            background.restore(surface, rect);
            cleared.push(rect);
        }
        cleared
    }

    /// Runs every member's behavior, lowest layer first.
    ///
    /// Members are snapshotted before the pass; a behavior may edit groups or
    /// destroy sprites, and sprites destroyed mid-pass are skipped.
    ///
    /// # Errors
    ///
    /// The first error returned by a behavior aborts the pass and is
    /// returned.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn update_group(&mut self, group: GroupId, args: &UpdateArgs) -> Result<(), Error> {
        self.validate_group(group);
        let members: Vec<SpriteId> = self
            .member_order(group.idx)
            .into_iter()
            .map(|i| self.sprite_id(self.groups[group.idx as usize].members[i].sprite))
            .collect();

        for id in members {
            if !self.is_alive(id) {
                continue;
            }
            let slot = &mut self.behavior[id.idx as usize];
            let mut behavior = match core::mem::replace(slot, BehaviorSlot::Running) {
                BehaviorSlot::Installed(behavior) => behavior,
                other => {
                    *slot = other;
                    continue;
                }
            };
            let result = behavior.update(SpriteMut::new(self, id), args);
            // Put it back unless the behavior replaced or cleared itself.
            if self.is_alive(id) {
                let slot = &mut self.behavior[id.idx as usize];
                if matches!(slot, BehaviorSlot::Running) {
                    *slot = BehaviorSlot::Installed(behavior);
                }
            }
            result?;
        }
        Ok(())
    }

    /// Draws every member, lowest layer first, recording each member's drawn
    /// rectangle (or `None`) and discarding the lost list. Returns the
    /// rectangles that were drawn.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn draw_group(&mut self, group: GroupId, surface: &mut dyn Surface) -> Vec<Rect> {
        self.validate_group(group);
        let g = group.idx as usize;
        let mut drawn = Vec::new();
        for i in self.member_order(group.idx) {
            let sprite = self.groups[g].members[i].sprite;
            let rect = self.draw_at(sprite, surface);
            self.groups[g].members[i].drawn = rect;
            drawn.extend(rect);
        }
        self.groups[g].lost.clear();
        drawn
    }

    // -- Internal --

    /// Member positions ordered by `(layer, insertion)`.
    fn member_order(&self, group: u32) -> Vec<usize> {
        let members = &self.groups[group as usize].members;
        let mut order: Vec<usize> = (0..members.len()).collect();
        order.sort_by_key(|&i| self.layer[members[i].sprite as usize]);
        order
    }

    /// Panics if `group` is stale.
    pub(crate) fn validate_group(&self, group: GroupId) {
        assert!(
            self.is_group_alive(group),
            "stale GroupId: {group:?} (current gen: {})",
            if (group.idx as usize) < self.groups.len() {
                self.group_generation[group.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}
