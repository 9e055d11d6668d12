// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprites, sprite groups, and dirty-rectangle redraw for software 2D scenes.
//!
//! `mosaic_core` layers a richer sprite model on top of a plain pixel-buffer
//! renderer: every sprite has an anchor, a position, an offset, a scale, a
//! rotation, and a visibility flag, and its drawable image and bounding
//! rectangle are derived from those attributes. It is `no_std` compatible
//! (with `alloc`) and stores sprites and groups in arenas addressed by
//! generational handles.
//!
//! # Architecture
//!
//! A frame runs in a fixed order so that stale imprints are erased before new
//! positions are painted:
//!
//! ```text
//!   input intents ──► Scene::move_to / scale_to / rotate_by / ...
//!                                     │
//!                 ┌───────────────────┘
//!                 ▼
//!   Scene::clear_group ──► Scene::update_group ──► backdrop
//!                                                     │
//!                 ┌───────────────────────────────────┘
//!                 ▼
//!   Scene::draw_group ──► DamageRegion ──► Presenter::present
//! ```
//!
//! **[`transform`]**: The per-sprite attribute model. Mutations re-derive the
//! drawn image (scale, then rotate) and re-anchor the bounding rectangle.
//!
//! **[`scene`]**: Sprite and group arenas, the bipartite membership relation,
//! composite sprites that fan attribute changes out to their children, and the
//! per-group last-drawn/lost rectangle bookkeeping.
//!
//! **[`dirty`]**: Change channels (via `understory_dirty`) that the scene
//! marks on every mutation and drains in [`Scene::evaluate`](scene::Scene::evaluate).
//!
//! **[`image`]** / **[`surface`]**: RGBA pixel buffers with the scale and
//! rotate primitives, and the [`Surface`](surface::Surface) contract that
//! sprites draw onto.
//!
//! **[`driver`]**: [`FrameDriver`](driver::FrameDriver) runs the
//! clear → update → backdrop → draw → present sequence and reports damage.
//!
//! **[`backend`]**: The [`Presenter`](backend::Presenter) and
//! [`Clock`](backend::Clock) traits that hosts implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-sprite
//!   change and damage-rect events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod anchor;
pub mod assets;
pub mod backend;
pub mod damage;
pub mod dirty;
pub mod driver;
pub mod error;
pub mod image;
pub mod scene;
pub mod surface;
pub mod time;
pub mod timing;
pub mod trace;
pub mod transform;
