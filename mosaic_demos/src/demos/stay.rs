// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use mosaic_core::anchor::Anchor;
use mosaic_core::assets::ImageProvider;
use mosaic_core::error::Error;
use mosaic_core::image::Image;
use mosaic_core::scene::{GroupId, Scene, SpriteId};

use super::{Demo, axis_line};
use crate::intent::{Input, Intent, Key};

const ANCHORS: [Anchor; 5] = [
    Anchor::Center,
    Anchor::TopLeft,
    Anchor::TopRight,
    Anchor::BottomRight,
    Anchor::BottomLeft,
];

/// Length of each corner-mark stroke.
const MARK: f64 = 5.0;

pub(super) struct Stay {
    ball: SpriteId,
    anchor: usize,
}

impl Stay {
    pub(super) fn build(
        scene: &mut Scene,
        assets: &mut dyn ImageProvider,
        background: &mut Image,
    ) -> anyhow::Result<(GroupId, Self)> {
        let size = background.width();
        let center = f64::from(size) / 2.0;
        draw_corner_marks(background, center);

        let ball = scene.create_sprite_with_image(assets.load("ball.png")?);
        scene.set_anchor(ball, Anchor::Center);
        scene.move_to(ball, Point::new(center, center));
        let group = scene.create_group_with(ball)?;
        Ok((group, Self { ball, anchor: 0 }))
    }
}

/// Corner marks of three nested squares around the center, so a reader can
/// see that the ball's center stays put.
fn draw_corner_marks(background: &mut Image, center: f64) {
    let scale = f64::from(background.width()) / 700.0;
    for side in [100.0, 250.0, 500.0] {
        let half = side * scale / 2.0;
        for sx in [1.0, -1.0] {
            for sy in [1.0, -1.0] {
                let x = center + sx * half;
                let y = center + sy * half;
                axis_line(background, x, y - sy * MARK, x, y);
                axis_line(background, x, y, x - sx * MARK, y);
            }
        }
    }
}

impl Demo for Stay {
    fn intents(&self, input: &Input) -> Vec<Intent> {
        if input.was_released(Key::Space) {
            vec![Intent::CycleAnchor]
        } else {
            Vec::new()
        }
    }

    fn apply(&mut self, scene: &mut Scene, intent: Intent) -> Result<(), Error> {
        if intent == Intent::CycleAnchor {
            self.anchor = (self.anchor + 1) % ANCHORS.len();
            scene.set_anchor(self.ball, ANCHORS[self.anchor]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use mosaic_core::image::Color;

    use super::*;
    use crate::assets::ProceduralAssets;
    use crate::demos::test_support::released;
    use crate::demos::{BACKGROUND, DemoKind, build};

    #[test]
    fn ball_is_centered_and_anchor_cycles() {
        let mut stage = build(DemoKind::Stay, &mut ProceduralAssets, 700).unwrap();
        let ball = stage.scene.sprites(stage.group)[0];
        assert_eq!(
            stage.scene.rect(ball),
            Some(Rect::new(325.0, 325.0, 375.0, 375.0))
        );

        let intents = stage.demo.intents(&released(&[Key::Space]));
        assert_eq!(intents, vec![Intent::CycleAnchor]);
        stage.demo.apply(&mut stage.scene, intents[0]).unwrap();
        assert_eq!(
            stage.scene.rect(ball),
            Some(Rect::new(350.0, 350.0, 400.0, 400.0))
        );
    }

    #[test]
    fn background_has_corner_marks() {
        let stage = build(DemoKind::Stay, &mut ProceduralAssets, 700).unwrap();
        // Inner square corner at (400, 400), strokes run back toward the center.
        assert_eq!(stage.background.get(400, 400), Some(Color::BLACK));
        assert_eq!(stage.background.get(400, 396), Some(Color::BLACK));
        assert_eq!(stage.background.get(410, 410), Some(BACKGROUND));
    }
}
