// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sprite/group membership relation.
//!
//! Both sides of the relation are edited only by [`Scene::link`] and
//! [`Scene::unlink`]. Public edits first flatten their [`MembershipArg`]s into
//! a deduplicated list of slots, validating every handle, and only then apply
//! the list; a rejected argument therefore commits nothing.

use alloc::vec::Vec;

use super::group::Member;
use super::id::{GroupId, SpriteId};
use super::store::Scene;
use crate::dirty;
use crate::error::{Error, MembershipError};

/// An argument to a membership edit.
///
/// Lists nest freely and are flattened depth-first. For group-side edits a
/// group stands for the sprites it currently contains; sprite-side edits
/// accept groups only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MembershipArg {
    /// A single sprite.
    Sprite(SpriteId),
    /// A single group.
    Group(GroupId),
    /// Any mix of the above.
    Many(Vec<MembershipArg>),
}

impl From<SpriteId> for MembershipArg {
    fn from(id: SpriteId) -> Self {
        Self::Sprite(id)
    }
}

impl From<GroupId> for MembershipArg {
    fn from(id: GroupId) -> Self {
        Self::Group(id)
    }
}

impl<T: Into<Self>> From<Vec<T>> for MembershipArg {
    fn from(items: Vec<T>) -> Self {
        Self::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for MembershipArg {
    fn from(items: [T; N]) -> Self {
        Self::Many(items.into_iter().map(Into::into).collect())
    }
}

impl Scene {
    // -- Group-side edits --

    /// Creates a group containing the sprites named by `args`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Membership`] for stale handles; no group is created.
    pub fn create_group_with(&mut self, args: impl Into<MembershipArg>) -> Result<GroupId, Error> {
        let sprites = self.flatten_sprites(&args.into())?;
        let group = self.create_group();
        for s in sprites {
            self.link(s, group);
        }
        Ok(group)
    }

    /// Adds the sprites named by `args` to `group`. Existing members are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Membership`] for stale handles; nothing is added.
    ///
    /// # Panics
    ///
    /// Panics if `group` is stale.
    pub fn add_sprites(
        &mut self,
        group: GroupId,
        args: impl Into<MembershipArg>,
    ) -> Result<(), Error> {
        self.validate_group(group);
        for s in self.flatten_sprites(&args.into())? {
            self.link(s, group);
        }
        Ok(())
    }

    /// Removes the sprites named by `args` from `group`. Non-members are
    /// skipped. Each removed member's last rectangle moves to the lost list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Membership`] for stale handles; nothing is removed.
    ///
    /// # Panics
    ///
    /// Panics if `group` is stale.
    pub fn remove_sprites(
        &mut self,
        group: GroupId,
        args: impl Into<MembershipArg>,
    ) -> Result<(), Error> {
        self.validate_group(group);
        for s in self.flatten_sprites(&args.into())? {
            self.unlink(s, group, true);
        }
        Ok(())
    }

    /// Whether every sprite named by `args` is a member of `group`.
    ///
    /// An argument that names no sprites (an empty list or an empty group)
    /// is never contained.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Membership`] for stale handles.
    ///
    /// # Panics
    ///
    /// Panics if `group` is stale.
    pub fn has_sprites(&self, group: GroupId, args: impl Into<MembershipArg>) -> Result<bool, Error> {
        self.validate_group(group);
        let sprites = self.flatten_sprites(&args.into())?;
        Ok(!sprites.is_empty() && sprites.iter().all(|&s| self.is_member(s, group)))
    }

    /// Removes every member without recording lost rectangles.
    ///
    /// Regions the members drew are not erased by the next clear; callers
    /// that need them erased should clear before emptying.
    ///
    /// # Panics
    ///
    /// Panics if `group` is stale.
    pub fn empty(&mut self, group: GroupId) {
        self.validate_group(group);
        let members: Vec<u32> = self.groups[group.idx as usize]
            .members
            .iter()
            .map(|m| m.sprite)
            .collect();
        for s in members {
            self.unlink(s, group, false);
        }
    }

    /// Creates a new group with the same members as `group`.
    ///
    /// Drawn rectangles and the lost list are not copied.
    ///
    /// # Panics
    ///
    /// Panics if `group` is stale.
    pub fn copy_group(&mut self, group: GroupId) -> GroupId {
        self.validate_group(group);
        let members: Vec<u32> = self.groups[group.idx as usize]
            .members
            .iter()
            .map(|m| m.sprite)
            .collect();
        let copy = self.create_group();
        for s in members {
            self.link(s, copy);
        }
        copy
    }

    // -- Sprite-side edits --

    /// Adds `sprite` to the groups named by `args`. Groups it already
    /// belongs to are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::ExpectedGroup`] if `args` names a sprite,
    /// or a stale-handle error; nothing is added in either case.
    ///
    /// # Panics
    ///
    /// Panics if `sprite` is stale.
    pub fn add_to_groups(
        &mut self,
        sprite: SpriteId,
        args: impl Into<MembershipArg>,
    ) -> Result<(), Error> {
        self.validate(sprite);
        for g in self.flatten_groups(&args.into())? {
            self.link(sprite.idx, g);
        }
        Ok(())
    }

    /// Removes `sprite` from the groups named by `args`. Groups it does not
    /// belong to are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::ExpectedGroup`] if `args` names a sprite,
    /// or a stale-handle error; nothing is removed in either case.
    ///
    /// # Panics
    ///
    /// Panics if `sprite` is stale.
    pub fn remove_from_groups(
        &mut self,
        sprite: SpriteId,
        args: impl Into<MembershipArg>,
    ) -> Result<(), Error> {
        self.validate(sprite);
        for g in self.flatten_groups(&args.into())? {
            self.unlink(sprite.idx, g, true);
        }
        Ok(())
    }

    /// Removes `sprite` from every group it belongs to.
    ///
    /// Each group records the sprite's last rectangle as lost. The sprite's
    /// own state is untouched and it may join groups again later.
    ///
    /// # Panics
    ///
    /// Panics if `sprite` is stale.
    pub fn kill(&mut self, sprite: SpriteId) {
        self.validate(sprite);
        let groups = self.memberships[sprite.idx as usize].clone();
        for g in groups {
            self.unlink(sprite.idx, g, true);
        }
    }

    /// Groups `sprite` belongs to, in the order it joined them.
    #[must_use]
    pub fn groups(&self, sprite: SpriteId) -> &[GroupId] {
        self.validate(sprite);
        &self.memberships[sprite.idx as usize]
    }

    /// Whether `sprite` belongs to at least one group.
    #[must_use]
    pub fn alive(&self, sprite: SpriteId) -> bool {
        !self.groups(sprite).is_empty()
    }

    // -- Internal --

    fn is_member(&self, sprite: u32, group: GroupId) -> bool {
        self.memberships[sprite as usize].contains(&group)
    }

    /// Adds one edge on both sides. Returns `false` if it already existed.
    pub(crate) fn link(&mut self, sprite: u32, group: GroupId) -> bool {
        if self.is_member(sprite, group) {
            return false;
        }
        self.memberships[sprite as usize].push(group);
        self.groups[group.idx as usize].members.push(Member {
            sprite,
            drawn: None,
        });
        self.dirty.mark(sprite, dirty::MEMBERSHIP);
        true
    }

    /// Removes one edge on both sides, optionally moving the member's last
    /// rectangle to the group's lost list. Returns `false` if there was no
    /// edge.
    pub(crate) fn unlink(&mut self, sprite: u32, group: GroupId, record_lost: bool) -> bool {
        let slot = &mut self.groups[group.idx as usize];
        let Some(pos) = slot.members.iter().position(|m| m.sprite == sprite) else {
            return false;
        };
        let member = slot.members.remove(pos);
        if record_lost && let Some(rect) = member.drawn {
            slot.lost.push(rect);
        }
        self.memberships[sprite as usize].retain(|&g| g != group);
        self.dirty.mark(sprite, dirty::MEMBERSHIP);
        true
    }

    /// Flattens `arg` into live sprite slots, groups expanding to their
    /// members. Duplicates are dropped, keeping first occurrence order.
    fn flatten_sprites(&self, arg: &MembershipArg) -> Result<Vec<u32>, MembershipError> {
        let mut out = Vec::new();
        self.collect_sprites(arg, &mut out)?;
        Ok(out)
    }

    fn collect_sprites(&self, arg: &MembershipArg, out: &mut Vec<u32>) -> Result<(), MembershipError> {
        match arg {
            MembershipArg::Sprite(id) => {
                if !self.is_alive(*id) {
                    return Err(MembershipError::StaleSprite(*id));
                }
                push_unique(out, id.idx);
            }
            MembershipArg::Group(group) => {
                if !self.is_group_alive(*group) {
                    return Err(MembershipError::StaleGroup(*group));
                }
                for m in &self.groups[group.idx as usize].members {
                    push_unique(out, m.sprite);
                }
            }
            MembershipArg::Many(items) => {
                for item in items {
                    self.collect_sprites(item, out)?;
                }
            }
        }
        Ok(())
    }

    /// Flattens `arg` into live groups. Sprites are rejected.
    fn flatten_groups(&self, arg: &MembershipArg) -> Result<Vec<GroupId>, MembershipError> {
        let mut out = Vec::new();
        self.collect_groups(arg, &mut out)?;
        Ok(out)
    }

    fn collect_groups(
        &self,
        arg: &MembershipArg,
        out: &mut Vec<GroupId>,
    ) -> Result<(), MembershipError> {
        match arg {
            MembershipArg::Sprite(id) => return Err(MembershipError::ExpectedGroup(*id)),
            MembershipArg::Group(group) => {
                if !self.is_group_alive(*group) {
                    return Err(MembershipError::StaleGroup(*group));
                }
                push_unique(out, *group);
            }
            MembershipArg::Many(items) => {
                for item in items {
                    self.collect_groups(item, out)?;
                }
            }
        }
        Ok(())
    }
}

fn push_unique<T: PartialEq>(out: &mut Vec<T>, item: T) {
    if !out.contains(&item) {
        out.push(item);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn membership_is_symmetric() {
        let mut scene = Scene::new();
        let s = scene.create_sprite();
        let g = scene.create_group();

        scene.add_to_groups(s, g).unwrap();
        assert_eq!(scene.groups(s), &[g]);
        assert_eq!(scene.sprites(g), vec![s]);
        assert!(scene.alive(s));

        scene.remove_sprites(g, s).unwrap();
        assert!(scene.groups(s).is_empty());
        assert!(scene.group_is_empty(g));
        assert!(!scene.alive(s));
    }

    #[test]
    fn edits_are_idempotent() {
        let mut scene = Scene::new();
        let s = scene.create_sprite();
        let g = scene.create_group();

        scene.add_to_groups(s, [g, g]).unwrap();
        scene.add_sprites(g, s).unwrap();
        assert_eq!(scene.group_len(g), 1);
        assert_eq!(scene.groups(s).len(), 1);

        scene.remove_from_groups(s, g).unwrap();
        scene.remove_from_groups(s, g).unwrap();
        assert!(scene.group_is_empty(g));
    }

    #[test]
    fn nested_arguments_flatten() {
        let mut scene = Scene::new();
        let a = scene.create_sprite();
        let b = scene.create_sprite();
        let c = scene.create_sprite();
        let source = scene.create_group_with([a, b]).unwrap();

        let target = scene.create_group();
        let arg = MembershipArg::Many(vec![
            MembershipArg::Group(source),
            MembershipArg::from(vec![c, a]),
        ]);
        scene.add_sprites(target, arg).unwrap();
        assert_eq!(scene.sprites(target), vec![a, b, c]);
        assert!(scene.has_sprites(target, source).unwrap());
    }

    #[test]
    fn sprite_side_rejects_sprites_without_partial_edit() {
        let mut scene = Scene::new();
        let s = scene.create_sprite();
        let other = scene.create_sprite();
        let g = scene.create_group();

        let arg = MembershipArg::Many(vec![g.into(), other.into()]);
        let err = scene.add_to_groups(s, arg).unwrap_err();
        assert_eq!(
            err,
            Error::Membership(MembershipError::ExpectedGroup(other))
        );
        assert!(scene.groups(s).is_empty());
        assert!(scene.group_is_empty(g));
    }

    #[test]
    fn stale_arguments_are_errors() {
        let mut scene = Scene::new();
        let g = scene.create_group();
        let live = scene.create_sprite();
        let dead = scene.create_sprite();
        scene.destroy_sprite(dead);

        let err = scene.add_sprites(g, [live, dead]).unwrap_err();
        assert_eq!(err, Error::Membership(MembershipError::StaleSprite(dead)));
        assert!(scene.group_is_empty(g));

        let gone = scene.create_group();
        scene.destroy_group(gone);
        let err = scene.add_to_groups(live, gone).unwrap_err();
        assert_eq!(err, Error::Membership(MembershipError::StaleGroup(gone)));
    }

    #[test]
    fn has_requires_every_sprite() {
        let mut scene = Scene::new();
        let a = scene.create_sprite();
        let b = scene.create_sprite();
        let g = scene.create_group_with(a).unwrap();

        assert!(scene.has_sprites(g, a).unwrap());
        assert!(!scene.has_sprites(g, [a, b]).unwrap());
        assert!(!scene.has_sprites(g, Vec::<SpriteId>::new()).unwrap());
    }

    #[test]
    fn kill_leaves_every_group() {
        let mut scene = Scene::new();
        let s = scene.create_sprite();
        let g1 = scene.create_group();
        let g2 = scene.create_group();
        scene.add_to_groups(s, [g1, g2]).unwrap();

        scene.kill(s);
        assert!(scene.groups(s).is_empty());
        assert!(!scene.has_sprites(g1, s).unwrap());
        assert!(!scene.has_sprites(g2, s).unwrap());
        assert!(scene.is_alive(s));

        scene.add_to_groups(s, g2).unwrap();
        assert_eq!(scene.groups(s), &[g2]);
    }

    #[test]
    fn empty_forgets_without_lost_rects() {
        use kurbo::Rect;

        use crate::image::Image;

        let mut scene = Scene::new();
        let s = scene.create_sprite_with_image(Image::new(2, 2));
        let g = scene.create_group_with(s).unwrap();
        let mut surface = Image::new(4, 4);
        let _ = scene.draw_group(g, &mut surface);

        scene.empty(g);
        assert!(scene.group_is_empty(g));
        assert!(scene.groups(s).is_empty());
        assert_eq!(scene.lost_rects(g), &[] as &[Rect]);
    }

    #[test]
    fn copy_group_shares_members() {
        let mut scene = Scene::new();
        let a = scene.create_sprite();
        let b = scene.create_sprite();
        let g = scene.create_group_with([a, b]).unwrap();
        let copy = scene.copy_group(g);

        assert_eq!(scene.sprites(copy), vec![a, b]);
        assert_eq!(scene.groups(a), &[g, copy]);
    }
}
