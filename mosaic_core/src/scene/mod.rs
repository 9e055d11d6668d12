// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite and group data model.
//!
//! A [`Scene`] owns two arenas:
//!
//! - **Sprites**: each slot holds a [`TransformModel`](crate::transform::TransformModel),
//!   a kind (plain or composite), an optional [`Behavior`], a draw layer, and
//!   the ordered set of groups the sprite belongs to. Sprites are addressed by
//!   [`SpriteId`], a generational handle that becomes stale when the sprite is
//!   destroyed.
//! - **Groups**: each slot holds its members in insertion order, the
//!   rectangle each member last drew (or `None`), and the *lost* rectangles of
//!   members removed since the last draw. Groups are addressed by [`GroupId`].
//!
//! Membership is a bipartite relation stored on both sides. Exactly one pair
//! of internal functions edits it, so the sprite's group set and the group's
//! member list can never disagree.
//!
//! # Composite sprites
//!
//! A composite owns an ordered list of children and has no image of its own.
//! Every attribute change on a sprite passes through an interception step
//! before the sprite's own model applies it. For a composite, translations
//! become offset changes on every child (so children keep their own
//! positions relative to the composite's reference point) and all other
//! changes except anchoring are forwarded verbatim.
//!
//! # Frame order
//!
//! [`Scene::clear_group`] → [`Scene::update_group`] → backdrop →
//! [`Scene::draw_group`]. Clearing erases every rectangle drawn last frame,
//! including those of members removed since; drawing records fresh rectangles
//! and forgets the lost list.

mod behavior;
mod composite;
mod evaluate;
mod group;
mod id;
mod membership;
mod store;

pub use behavior::{Behavior, FromFn, SpriteMut, UpdateArgs, from_fn};
pub use evaluate::SceneChanges;
pub use id::{GroupId, INVALID, SpriteId};
pub use membership::MembershipArg;
pub use store::{Scene, SpriteKind};
