// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use mosaic_core::assets::ImageProvider;
use mosaic_core::error::Error;
use mosaic_core::scene::{GroupId, Scene, SpriteId};

use super::Demo;
use crate::intent::{Input, Intent, Key};

/// Layers for (ball, button, teddy) under each preset key.
const PRESETS: [[i32; 3]; 3] = [[1, 2, 3], [2, 3, 1], [3, 1, 2]];

pub(super) struct Layers {
    sprites: [SpriteId; 3],
}

impl Layers {
    pub(super) fn build(
        scene: &mut Scene,
        assets: &mut dyn ImageProvider,
    ) -> anyhow::Result<(GroupId, Self)> {
        let mut place = |name: &str, at: f64| -> anyhow::Result<SpriteId> {
            let sprite = scene.create_sprite_with_image(assets.load(name)?);
            scene.move_to(sprite, Point::new(at, at));
            Ok(sprite)
        };
        let sprites = [
            place("ball.png", 10.0)?,
            place("button.png", 30.0)?,
            place("teddy.png", 50.0)?,
        ];
        let mut demo = Self { sprites };
        demo.apply_preset(scene, 0);
        let group = scene.create_group_with(sprites)?;
        Ok((group, demo))
    }

    fn apply_preset(&mut self, scene: &mut Scene, preset: usize) {
        for (&sprite, &layer) in self.sprites.iter().zip(&PRESETS[preset]) {
            scene.set_layer(sprite, layer);
        }
    }
}

impl Demo for Layers {
    fn intents(&self, input: &Input) -> Vec<Intent> {
        input
            .released
            .iter()
            .filter_map(|key| match key {
                Key::Num1 => Some(Intent::SetLayers(1)),
                Key::Num2 => Some(Intent::SetLayers(2)),
                Key::Num3 => Some(Intent::SetLayers(3)),
                _ => None,
            })
            .collect()
    }

    fn apply(&mut self, scene: &mut Scene, intent: Intent) -> Result<(), Error> {
        if let Intent::SetLayers(n @ 1..=3) = intent {
            self.apply_preset(scene, usize::from(n - 1));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ProceduralAssets;
    use crate::demos::test_support::released;
    use crate::demos::{DemoKind, Stage, build};

    fn layers(stage: &Stage) -> Vec<i32> {
        stage
            .scene
            .sprites(stage.group)
            .into_iter()
            .map(|s| stage.scene.layer(s))
            .collect()
    }

    #[test]
    fn presets_restack_the_group() {
        let mut stage = build(DemoKind::Layers, &mut ProceduralAssets, 700).unwrap();
        assert_eq!(layers(&stage), vec![1, 2, 3]);

        for intent in stage.demo.intents(&released(&[Key::Num2])) {
            stage.demo.apply(&mut stage.scene, intent).unwrap();
        }
        assert_eq!(layers(&stage), vec![2, 3, 1]);

        for intent in stage.demo.intents(&released(&[Key::Num3, Key::Num1])) {
            stage.demo.apply(&mut stage.scene, intent).unwrap();
        }
        assert_eq!(layers(&stage), vec![1, 2, 3], "last preset wins");
    }

    #[test]
    fn other_keys_are_ignored() {
        let stage = build(DemoKind::Layers, &mut ProceduralAssets, 700).unwrap();
        assert!(stage.demo.intents(&released(&[Key::Space, Key::A])).is_empty());
    }
}
