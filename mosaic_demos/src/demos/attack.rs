// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};
use mosaic_core::anchor::Anchor;
use mosaic_core::assets::ImageProvider;
use mosaic_core::error::Error;
use mosaic_core::scene::{GroupId, Scene, SpriteId};

use super::Demo;
use crate::intent::{Input, Intent, Key};

const COLS: u32 = 5;
const ROWS: u32 = 3;
const SCALE_STEP: f64 = 0.1;
/// Exclusive bounds for the formation's scale.
const SCALE_RANGE: (f64, f64) = (0.3, 3.0);
const ROTATE_STEP: i32 = 5;
const MOVE_STEP: f64 = 5.0;

pub(super) struct Attack {
    formation: SpriteId,
    max: Point,
}

impl Attack {
    pub(super) fn build(
        scene: &mut Scene,
        assets: &mut dyn ImageProvider,
        size: u32,
    ) -> anyhow::Result<(GroupId, Self)> {
        let cell = f64::from(size) / 7.0;
        let ball = assets.load("ball.png")?;

        let formation = scene.create_composite();
        for i in 0..COLS {
            for j in 0..ROWS {
                let b = scene.create_sprite_with_image(ball.clone());
                scene.set_anchor(b, Anchor::Center);
                scene.move_to(
                    b,
                    Point::new(cell + f64::from(i) * cell, cell + f64::from(j) * cell),
                );
                scene.add_child(formation, b)?;
            }
        }
        let group = scene.create_group_with(formation)?;
        let max = Point::new(
            f64::from(size) - f64::from(COLS + 1) * cell,
            f64::from(size) - f64::from(ROWS + 1) * cell,
        );
        Ok((group, Self { formation, max }))
    }
}

impl Demo for Attack {
    fn intents(&self, input: &Input) -> Vec<Intent> {
        let mut intents = Vec::new();
        let scale = input.axis(Key::X, Key::Z);
        if scale != 0 {
            intents.push(Intent::Scale(scale));
        }
        let rotate = input.axis(Key::S, Key::A);
        if rotate != 0 {
            intents.push(Intent::Rotate(rotate));
        }
        let dx = input.axis(Key::Left, Key::Right);
        let dy = input.axis(Key::Up, Key::Down);
        if dx != 0 || dy != 0 {
            intents.push(Intent::Move(Vec2::new(f64::from(dx), f64::from(dy))));
        }
        if input.was_released(Key::Space) {
            intents.push(Intent::ToggleVisibility);
        }
        intents
    }

    fn apply(&mut self, scene: &mut Scene, intent: Intent) -> Result<(), Error> {
        let f = self.formation;
        match intent {
            Intent::Scale(step) => {
                let next = scene.model(f).scale() + SCALE_STEP * f64::from(step);
                if SCALE_RANGE.0 < next && next < SCALE_RANGE.1 {
                    scene.scale_to(f, next)?;
                }
            }
            Intent::Rotate(step) => scene.rotate_by(f, step * ROTATE_STEP),
            Intent::Move(steps) => {
                let next = scene.position(f) + steps * MOVE_STEP;
                if (0.0..=self.max.x).contains(&next.x) && (0.0..=self.max.y).contains(&next.y) {
                    scene.move_to(f, next);
                }
            }
            Intent::ToggleVisibility => scene.toggle_visibility(f),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::assets::ProceduralAssets;
    use crate::demos::test_support::{held, released};
    use crate::demos::{DemoKind, Stage, build};

    fn stage() -> (Stage, SpriteId) {
        let stage = build(DemoKind::Attack, &mut ProceduralAssets, 700).unwrap();
        let formation = stage.scene.sprites(stage.group)[0];
        (stage, formation)
    }

    fn run(stage: &mut Stage, input: &Input, frames: usize) {
        for _ in 0..frames {
            for intent in stage.demo.intents(input) {
                stage.demo.apply(&mut stage.scene, intent).unwrap();
            }
        }
    }

    #[test]
    fn formation_has_fifteen_centered_balls() {
        let (stage, formation) = stage();
        let children = stage.scene.children(formation);
        assert_eq!(children.len(), 15);
        assert_eq!(
            stage.scene.rect(children[0]),
            Some(Rect::new(75.0, 75.0, 125.0, 125.0))
        );
    }

    #[test]
    fn moves_stay_in_bounds() {
        let (mut stage, formation) = stage();
        run(&mut stage, &held(&[Key::Left]), 3);
        assert_eq!(stage.scene.position(formation), Point::ORIGIN);

        run(&mut stage, &held(&[Key::Right, Key::Down]), 4);
        assert_eq!(stage.scene.position(formation), Point::new(20.0, 20.0));
        let first = stage.scene.children(formation)[0];
        assert_eq!(
            stage.scene.rect(first),
            Some(Rect::new(95.0, 95.0, 145.0, 145.0))
        );

        // X runs out at 100.
        run(&mut stage, &held(&[Key::Right]), 40);
        assert_eq!(stage.scene.position(formation), Point::new(100.0, 20.0));
    }

    #[test]
    fn scale_is_clamped_to_the_open_range() {
        let (mut stage, formation) = stage();
        run(&mut stage, &held(&[Key::X]), 20);
        let scale = stage.scene.model(formation).scale();
        assert!(scale > 0.3 && scale < 0.45, "scale {scale}");

        let child = stage.scene.children(formation)[0];
        assert_eq!(stage.scene.model(child).scale(), scale);
    }

    #[test]
    fn rotation_and_visibility_reach_children() {
        let (mut stage, formation) = stage();
        run(&mut stage, &held(&[Key::A]), 3);
        let child = stage.scene.children(formation)[4];
        assert_eq!(stage.scene.model(child).rotation(), 15);

        run(&mut stage, &released(&[Key::Space]), 1);
        assert!(!stage.scene.model(child).visible());
    }
}
