// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Vec2};
use mosaic_core::anchor::Anchor;
use mosaic_core::assets::ImageProvider;
use mosaic_core::error::Error;
use mosaic_core::image::Image;
use mosaic_core::scene::{GroupId, Scene, SpriteId};
use mosaic_core::surface::Surface;

use super::{Demo, INK};
use crate::intent::{Input, Intent, Key};

/// Grid points per row and per column.
const PER_ROW: i32 = 7;

pub(super) struct Regions {
    ball: SpriteId,
    points: Vec<Point>,
    current: i32,
}

impl Regions {
    pub(super) fn build(
        scene: &mut Scene,
        assets: &mut dyn ImageProvider,
        background: &mut Image,
    ) -> anyhow::Result<(GroupId, Self)> {
        let cell = f64::from(background.width()) / f64::from(PER_ROW);
        let points: Vec<Point> = (0..PER_ROW)
            .flat_map(|row| {
                (0..PER_ROW)
                    .map(move |col| Point::new(f64::from(col) * cell, f64::from(row) * cell))
            })
            .collect();

        // A dot stands in for each point's coordinate label.
        for p in points.iter().filter(|p| p.x > 0.0 && p.y > 0.0) {
            let dot = Rect::new(p.x - 1.0, p.y - 1.0, p.x + 2.0, p.y + 2.0);
            background.fill_rect(INK, dot);
        }

        let ball = scene.create_sprite_with_image(assets.load("ball.png")?);
        scene.move_to(ball, points[0]);
        let group = scene.create_group_with(ball)?;
        Ok((
            group,
            Self {
                ball,
                points,
                current: 0,
            },
        ))
    }
}

impl Demo for Regions {
    fn intents(&self, input: &Input) -> Vec<Intent> {
        let mut intents = Vec::new();
        for &key in &input.released {
            let intent = match key {
                Key::Left => Intent::Move(Vec2::new(-1.0, 0.0)),
                Key::Right => Intent::Move(Vec2::new(1.0, 0.0)),
                Key::Up => Intent::Move(Vec2::new(0.0, -1.0)),
                Key::Down => Intent::Move(Vec2::new(0.0, 1.0)),
                Key::A => Intent::SetAnchor(Anchor::TopLeft),
                Key::S => Intent::SetAnchor(Anchor::Center),
                Key::D => Intent::SetAnchor(Anchor::Offset(Vec2::new(25.0, 20.0))),
                _ => continue,
            };
            intents.push(intent);
        }
        intents
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "steps are whole numbers from the key axis"
    )]
    fn apply(&mut self, scene: &mut Scene, intent: Intent) -> Result<(), Error> {
        match intent {
            Intent::Move(steps) => {
                let delta = steps.x as i32 + steps.y as i32 * PER_ROW;
                self.current = (self.current + delta).rem_euclid(PER_ROW * PER_ROW);
                scene.move_to(self.ball, self.points[self.current as usize]);
            }
            Intent::SetAnchor(anchor) => scene.set_anchor(self.ball, anchor),
            _ => {}
        }
        Ok(())
    }
}
