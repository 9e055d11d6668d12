// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four demo scenes.
//!
//! - `stay`: one center-anchored ball that stays put; Space cycles anchors.
//! - `attack`: a 5 × 3 formation of balls moved, scaled, rotated, and
//!   hidden as one composite sprite.
//! - `regions`: a ball hopping between grid points under different anchors.
//! - `layers`: three overlapping sprites restacked by layer presets.

mod attack;
mod layers;
mod regions;
mod stay;

use clap::ValueEnum;
use kurbo::Rect;
use mosaic_core::assets::ImageProvider;
use mosaic_core::error::Error;
use mosaic_core::image::{Color, Image};
use mosaic_core::scene::{GroupId, Scene};
use mosaic_core::surface::Surface;

use crate::intent::{Input, Intent};

/// Fill color shared by every demo background.
pub(crate) const BACKGROUND: Color = Color::rgb(225, 225, 225);
const INK: Color = Color::BLACK;

/// Which demo to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum DemoKind {
    Stay,
    Attack,
    Regions,
    Layers,
}

/// Per-demo input handling.
pub(crate) trait Demo {
    /// Translates this frame's key state into intents.
    fn intents(&self, input: &Input) -> Vec<Intent>;

    /// Applies one intent to the scene.
    fn apply(&mut self, scene: &mut Scene, intent: Intent) -> Result<(), Error>;
}

/// A built demo, ready for the frame loop.
pub(crate) struct Stage {
    pub(crate) scene: Scene,
    pub(crate) group: GroupId,
    pub(crate) background: Image,
    pub(crate) demo: Box<dyn Demo>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("scene", &self.scene)
            .field("group", &self.group)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}

/// Builds `kind` on a `size` × `size` surface.
pub(crate) fn build(
    kind: DemoKind,
    assets: &mut dyn ImageProvider,
    size: u32,
) -> anyhow::Result<Stage> {
    let mut scene = Scene::new();
    let mut background = Image::filled(size, size, BACKGROUND);
    let (group, demo): (GroupId, Box<dyn Demo>) = match kind {
        DemoKind::Stay => {
            let (g, d) = stay::Stay::build(&mut scene, assets, &mut background)?;
            (g, Box::new(d))
        }
        DemoKind::Attack => {
            let (g, d) = attack::Attack::build(&mut scene, assets, size)?;
            (g, Box::new(d))
        }
        DemoKind::Regions => {
            let (g, d) = regions::Regions::build(&mut scene, assets, &mut background)?;
            (g, Box::new(d))
        }
        DemoKind::Layers => {
            let (g, d) = layers::Layers::build(&mut scene, assets)?;
            (g, Box::new(d))
        }
    };
    Ok(Stage {
        scene,
        group,
        background,
        demo,
    })
}

/// One-pixel-wide line between two points on a shared row or column.
fn axis_line(surface: &mut dyn Surface, x0: f64, y0: f64, x1: f64, y1: f64) {
    let rect = Rect::new(x0.min(x1), y0.min(y1), x0.max(x1) + 1.0, y0.max(y1) + 1.0);
    surface.fill_rect(INK, rect);
}
