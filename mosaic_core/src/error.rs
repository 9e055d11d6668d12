// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable errors surfaced by scene operations.
//!
//! Everything here is returned synchronously to the caller; nothing is logged
//! and swallowed inside the crate. Invariant violations (stale handles outside
//! of membership arguments, anchor resolution without a rectangle) are panics,
//! not errors.

use alloc::string::String;
use core::fmt;

use crate::scene::{GroupId, SpriteId};

/// A sprite attribute that accepts a constrained value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Scale ratio (must be finite and strictly positive).
    Scale,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scale => f.write_str("scale"),
        }
    }
}

/// A membership argument that could not be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipError {
    /// A sprite appeared where only groups are accepted.
    ExpectedGroup(SpriteId),
    /// The sprite handle no longer refers to a live sprite.
    StaleSprite(SpriteId),
    /// The group handle no longer refers to a live group.
    StaleGroup(GroupId),
}

impl fmt::Display for MembershipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedGroup(id) => write!(f, "expected a group, got sprite {id:?}"),
            Self::StaleSprite(id) => write!(f, "stale sprite handle {id:?}"),
            Self::StaleGroup(id) => write!(f, "stale group handle {id:?}"),
        }
    }
}

impl core::error::Error for MembershipError {}

/// A composite-sprite edit that would break the ownership tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeError {
    /// The target sprite is not a composite.
    NotComposite(SpriteId),
    /// The child already belongs to a composite.
    AlreadyOwned(SpriteId),
    /// The child is the composite itself or one of its ancestors.
    Cycle(SpriteId),
}

impl fmt::Display for CompositeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotComposite(id) => write!(f, "sprite {id:?} is not a composite"),
            Self::AlreadyOwned(id) => write!(f, "sprite {id:?} already belongs to a composite"),
            Self::Cycle(id) => write!(f, "adding sprite {id:?} would create a cycle"),
        }
    }
}

impl core::error::Error for CompositeError {}

/// A presenter failed to show a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentError {
    /// Backend-supplied description.
    pub message: String,
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "present failed: {}", self.message)
    }
}

impl core::error::Error for PresentError {}

/// Errors from scene operations.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// An attribute was assigned an out-of-range value. The sprite is left
    /// unchanged.
    InvalidArgument {
        /// The attribute being assigned.
        attribute: Attribute,
        /// The rejected value.
        value: f64,
    },
    /// A membership edit was rejected; no membership changed.
    Membership(MembershipError),
    /// A composite edit was rejected.
    Composite(CompositeError),
    /// The frame could not be presented.
    Present(PresentError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { attribute, value } => {
                write!(f, "invalid {attribute}: {value}")
            }
            Self::Membership(e) => write!(f, "membership: {e}"),
            Self::Composite(e) => write!(f, "composite: {e}"),
            Self::Present(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidArgument { .. } => None,
            Self::Membership(e) => Some(e),
            Self::Composite(e) => Some(e),
            Self::Present(e) => Some(e),
        }
    }
}

impl From<MembershipError> for Error {
    fn from(e: MembershipError) -> Self {
        Self::Membership(e)
    }
}

impl From<CompositeError> for Error {
    fn from(e: CompositeError) -> Self {
        Self::Composite(e)
    }
}

impl From<PresentError> for Error {
    fn from(e: PresentError) -> Self {
        Self::Present(e)
    }
}
