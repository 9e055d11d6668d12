// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for windowing and timing.
//!
//! The core never talks to a window system or reads a clock. A host provides
//! two pieces:
//!
//! - **Clock**: Implements [`Clock`] to read a monotonic clock as
//!   [`HostTime`]. `std` hosts wrap `Instant`; tests use a manual clock.
//!
//! - **Presenter**: Implements [`Presenter`] to show a finished backbuffer
//!   (a window, an encoded file, or nothing at all for headless runs).
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! loop {
//!     let tick = pacer.tick(clock.now());
//!     let input = host.poll(tick.frame_index);
//!     for intent in demo.intents(&input) {
//!         demo.apply(&mut scene, intent)?;
//!     }
//!     let ctx = FrameContext {
//!         tick: &tick,
//!         clock: &clock,
//!         presenter: &mut presenter,
//!         tracer: &mut tracer,
//!     };
//!     driver.frame(&mut scene, group, &mut backbuffer, Background::Image(&bg), ctx)?;
//!     sleep(pacer.wait_time(clock.now()));
//! }
//! ```

use crate::damage::DamageRegion;
use crate::error::PresentError;
use crate::image::Image;
use crate::time::HostTime;

/// Shows a finished frame.
pub trait Presenter {
    /// Presents `frame`. `damage` lists the areas that changed since the
    /// previous call; presenters may ignore it and copy the whole frame.
    ///
    /// # Errors
    ///
    /// Returns [`PresentError`] if the host can no longer show frames (for
    /// example, the window was closed).
    fn present(&mut self, frame: &Image, damage: &DamageRegion) -> Result<(), PresentError>;
}

/// A monotonic clock.
pub trait Clock {
    /// The current time.
    fn now(&self) -> HostTime;
}
