// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The scene keeps one [`understory_dirty`] key per sprite slot and marks a
//! channel for every category of change:
//!
//! - **[`GEOMETRY`]**: position, offset, or anchor moved the rectangle.
//! - **[`IMAGE`]**: the derived image was recomputed (new base image, scale,
//!   or rotation). Always marked together with [`GEOMETRY`], since a new
//!   derived image resizes the rectangle.
//! - **[`VISIBILITY`]**: the visibility flag changed. Children of a composite
//!   depend on their composite for this channel, so marking a composite
//!   eagerly marks its subtree.
//! - **[`MEMBERSHIP`]**: group membership or draw layer changed.
//!
//! Channels are drained by [`Scene::evaluate`](crate::scene::Scene::evaluate).

use understory_dirty::Channel;

use crate::transform::AttributeChange;

/// Position, offset, or anchor changed.
pub const GEOMETRY: Channel = Channel::new(0);

/// Derived image recomputed.
pub const IMAGE: Channel = Channel::new(1);

/// Visibility flag changed; propagates to composite children.
pub const VISIBILITY: Channel = Channel::new(2);

/// Group membership or draw layer changed.
pub const MEMBERSHIP: Channel = Channel::new(3);

/// Channels touched by an attribute change.
pub(crate) fn channels_for(change: AttributeChange) -> &'static [Channel] {
    match change {
        AttributeChange::MoveTo(_)
        | AttributeChange::MoveBy(_)
        | AttributeChange::Offset(_)
        | AttributeChange::Anchor(_) => &[GEOMETRY],
        AttributeChange::ScaleTo(_)
        | AttributeChange::ScaleBy(_)
        | AttributeChange::RotateTo(_)
        | AttributeChange::RotateBy(_) => &[GEOMETRY, IMAGE],
        AttributeChange::Visible(_) | AttributeChange::ToggleVisibility => &[VISIBILITY],
    }
}
