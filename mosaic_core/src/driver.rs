// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame clear → update → draw → present sequence.
//!
//! [`FrameDriver::frame`] runs one frame of a group against a software
//! backbuffer:
//!
//! 1. **Clear**: restore every rectangle the group drew last frame, plus its
//!    lost rectangles, from the [`Background`].
//! 2. **Update**: run each member's behavior.
//! 3. **Draw**: optionally repaint the whole background, then draw every
//!    member and record its rectangle.
//! 4. **Present**: hand the backbuffer and its damage to the
//!    [`Presenter`].
//!
//! The order is fixed so stale imprints are erased before new positions are
//! painted. Damage is the list of cleared and drawn rectangles, or the whole
//! surface on the first frame and whenever the background is repainted.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use crate::backend::{Clock, Presenter};
use crate::damage::DamageRegion;
use crate::error::Error;
use crate::image::Image;
use crate::scene::{GroupId, Scene, SceneChanges, UpdateArgs};
use crate::surface::{Background, Surface};
use crate::time::HostTime;
use crate::timing::{FrameConfig, FrameTick};
#[cfg(feature = "trace-rich")]
use crate::trace::{DamageRect, SpriteChange, SpriteField};
use crate::trace::{
    FrameBeginEvent, FrameSummaryBuilder, PhaseBeginEvent, PhaseEndEvent, PhaseKind, PresentEvent,
    Tracer,
};

/// Host services a single frame needs.
pub struct FrameContext<'a, 't> {
    /// The tick produced by the pacer for this frame.
    pub tick: &'a FrameTick,
    /// Timestamps for phase events.
    pub clock: &'a dyn Clock,
    /// Receives the finished backbuffer.
    pub presenter: &'a mut dyn Presenter,
    /// Trace event dispatch.
    pub tracer: &'a mut Tracer<'t>,
}

impl core::fmt::Debug for FrameContext<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameContext")
            .field("tick", self.tick)
            .finish_non_exhaustive()
    }
}

/// What a frame did.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// The frame's index, copied from its tick.
    pub frame_index: u64,
    /// The damage handed to the presenter.
    pub damage: DamageRegion,
    /// Scene changes made since the previous frame, including this frame's
    /// behaviors.
    pub changes: SceneChanges,
    /// Number of rectangles restored by the clear pass.
    pub cleared: usize,
    /// Number of rectangles painted by the draw pass.
    pub drawn: usize,
}

/// Runs frames for one group.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    config: FrameConfig,
    frames_run: u64,
    repaint_background: bool,
}

impl FrameDriver {
    /// Creates a driver with the given configuration.
    #[must_use]
    pub const fn new(config: FrameConfig) -> Self {
        Self {
            config,
            frames_run: 0,
            repaint_background: false,
        }
    }

    /// Repaint the whole background before every draw pass.
    ///
    /// Enables groups whose backgrounds change every frame; damage is then
    /// always the full surface.
    #[must_use]
    pub const fn with_background_repaint(mut self, repaint: bool) -> Self {
        self.repaint_background = repaint;
        self
    }

    /// The driver's configuration.
    #[must_use]
    pub const fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Returns the first behavior error (the frame is then neither drawn nor
    /// presented) or the presenter's error.
    ///
    /// # Panics
    ///
    /// Panics if `group` is stale.
    pub fn frame(
        &mut self,
        scene: &mut Scene,
        group: GroupId,
        backbuffer: &mut Image,
        background: Background<'_>,
        ctx: FrameContext<'_, '_>,
    ) -> Result<FrameReport, Error> {
        let FrameContext {
            tick,
            clock,
            presenter,
            tracer,
        } = ctx;
        let frame_index = tick.frame_index;
        let begin = FrameBeginEvent::from(tick);
        tracer.frame_begin(&begin);
        let mut summary = FrameSummaryBuilder::new(&begin);

        // -- Clear --
        phase_begin(tracer, &mut summary, frame_index, PhaseKind::Clear, clock.now());
        let cleared = scene.clear_group(group, backbuffer, background);
        phase_end(tracer, &mut summary, frame_index, PhaseKind::Clear, clock.now());

        // -- Update --
        phase_begin(tracer, &mut summary, frame_index, PhaseKind::Update, clock.now());
        let args = UpdateArgs {
            frame_index,
            delta: tick.delta,
        };
        scene.update_group(group, &args)?;
        phase_end(tracer, &mut summary, frame_index, PhaseKind::Update, clock.now());

        // -- Draw --
        phase_begin(tracer, &mut summary, frame_index, PhaseKind::Draw, clock.now());
        if self.repaint_background {
            let bounds = backbuffer.bounds();
            background.restore(backbuffer, bounds);
        }
        let drawn = scene.draw_group(group, backbuffer);
        phase_end(tracer, &mut summary, frame_index, PhaseKind::Draw, clock.now());

        let full = self.repaint_background
            || (self.frames_run == 0 && self.config.first_frame_full_damage);
        let damage = if full {
            DamageRegion::Full
        } else {
            DamageRegion::from_rects(cleared.iter().chain(drawn.iter()).copied())
        };
        let changes = scene.evaluate();

        // -- Present --
        phase_begin(tracer, &mut summary, frame_index, PhaseKind::Present, clock.now());
        presenter.present(backbuffer, &damage)?;
        let presented_at = clock.now();
        phase_end(tracer, &mut summary, frame_index, PhaseKind::Present, presented_at);
        tracer.present(&PresentEvent {
            frame_index,
            presented_at,
            full_damage: damage.is_full(),
            damage_rects: count(damage.rects().map_or(0, <[_]>::len)),
        });

        #[cfg(feature = "trace-rich")]
        {
            tracer.sprite_changes(frame_index, &sprite_changes(&changes));
            if let Some(rects) = damage.rects() {
                let rects: Vec<DamageRect> = rects.iter().copied().map(DamageRect::from).collect();
                tracer.damage_rects(frame_index, &rects);
            }
        }

        summary.set_rect_counts(count(cleared.len()), count(drawn.len()));
        tracer.frame_summary(&summary.finish());

        self.frames_run += 1;
        Ok(FrameReport {
            frame_index,
            damage,
            changes,
            cleared: cleared.len(),
            drawn: drawn.len(),
        })
    }
}

fn phase_begin(
    tracer: &mut Tracer<'_>,
    summary: &mut FrameSummaryBuilder,
    frame_index: u64,
    phase: PhaseKind,
    timestamp: HostTime,
) {
    summary.phase_begin(phase, timestamp);
    tracer.phase_begin(&PhaseBeginEvent {
        frame_index,
        phase,
        timestamp,
    });
}

fn phase_end(
    tracer: &mut Tracer<'_>,
    summary: &mut FrameSummaryBuilder,
    frame_index: u64,
    phase: PhaseKind,
    timestamp: HostTime,
) {
    summary.phase_end(phase, timestamp);
    tracer.phase_end(&PhaseEndEvent {
        frame_index,
        phase,
        timestamp,
    });
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(feature = "trace-rich")]
fn sprite_changes(changes: &SceneChanges) -> Vec<SpriteChange> {
    let lists = [
        (&changes.geometry, SpriteField::Geometry),
        (&changes.image, SpriteField::Image),
        (&changes.visibility, SpriteField::Visibility),
        (&changes.membership, SpriteField::Membership),
        (&changes.added, SpriteField::Added),
        (&changes.removed, SpriteField::Removed),
    ];
    lists
        .into_iter()
        .flat_map(|(indices, field)| {
            indices.iter().map(move |&sprite_index| SpriteChange {
                sprite_index,
                field,
            })
        })
        .collect()
}
