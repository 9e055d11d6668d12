// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-frame clear/update/draw cycles against a software backbuffer.

use std::cell::Cell;

use kurbo::{Point, Rect, Vec2};
use mosaic_core::anchor::Anchor;
use mosaic_core::backend::{Clock, Presenter};
use mosaic_core::damage::DamageRegion;
use mosaic_core::driver::{FrameContext, FrameDriver, FrameReport};
use mosaic_core::error::PresentError;
use mosaic_core::image::{Color, Image};
use mosaic_core::scene::{GroupId, Scene, from_fn};
use mosaic_core::surface::Background;
use mosaic_core::time::HostTime;
use mosaic_core::timing::{FrameConfig, FramePacer};
use mosaic_core::trace::Tracer;

struct ManualClock(Cell<u64>);

impl Clock for ManualClock {
    fn now(&self) -> HostTime {
        HostTime(self.0.get())
    }
}

#[derive(Default)]
struct CountingPresenter {
    frames: usize,
    last: Option<DamageRegion>,
}

impl Presenter for CountingPresenter {
    fn present(&mut self, _frame: &Image, damage: &DamageRegion) -> Result<(), PresentError> {
        self.frames += 1;
        self.last = Some(damage.clone());
        Ok(())
    }
}

struct Harness {
    scene: Scene,
    group: GroupId,
    background: Image,
    backbuffer: Image,
    driver: FrameDriver,
    pacer: FramePacer,
    clock: ManualClock,
    presenter: CountingPresenter,
}

impl Harness {
    fn new(width: u32, height: u32) -> Self {
        let mut scene = Scene::new();
        let group = scene.create_group();
        let background = Image::filled(width, height, Color::WHITE);
        let config = FrameConfig::default();
        Self {
            scene,
            group,
            backbuffer: background.clone(),
            background,
            driver: FrameDriver::new(config),
            pacer: FramePacer::new(&config),
            clock: ManualClock(Cell::new(0)),
            presenter: CountingPresenter::default(),
        }
    }

    fn frame(&mut self) -> FrameReport {
        let tick = self.pacer.tick(self.clock.now());
        let mut tracer = Tracer::none();
        let report = self
            .driver
            .frame(
                &mut self.scene,
                self.group,
                &mut self.backbuffer,
                Background::Image(&self.background),
                FrameContext {
                    tick: &tick,
                    clock: &self.clock,
                    presenter: &mut self.presenter,
                    tracer: &mut tracer,
                },
            )
            .unwrap();
        self.clock.0.set(tick.deadline.nanos());
        report
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        self.backbuffer.get(x, y).unwrap()
    }
}

#[test]
fn moving_sprite_leaves_no_trail() {
    let mut h = Harness::new(40, 20);
    let s = h
        .scene
        .create_sprite_with_image(Image::filled(4, 4, Color::RED));
    h.scene.add_sprites(h.group, s).unwrap();
    h.scene.set_behavior(
        s,
        from_fn(|mut sprite, _| {
            sprite.move_by(Vec2::new(5.0, 0.0));
            Ok(())
        }),
    );

    for _ in 0..6 {
        let _ = h.frame();
    }

    // Six frames at 5px per frame: the sprite now sits at x = 30.
    assert_eq!(h.scene.position(s), Point::new(30.0, 0.0));
    for x in 0..30 {
        assert_eq!(h.pixel(x, 1), Color::WHITE, "trail at x = {x}");
    }
    assert_eq!(h.pixel(31, 1), Color::RED);
    assert_eq!(h.presenter.frames, 6);
}

#[test]
fn removed_sprite_is_erased_next_frame() {
    let mut h = Harness::new(20, 20);
    let s = h
        .scene
        .create_sprite_with_image(Image::filled(5, 5, Color::BLUE));
    h.scene.move_to(s, Point::new(8.0, 8.0));
    h.scene.add_sprites(h.group, s).unwrap();
    let _ = h.frame();
    assert_eq!(h.pixel(10, 10), Color::BLUE);

    h.scene.remove_sprites(h.group, s).unwrap();
    assert_eq!(h.scene.lost_rects(h.group), &[Rect::new(8.0, 8.0, 13.0, 13.0)]);

    let report = h.frame();
    assert_eq!(h.pixel(10, 10), Color::WHITE);
    assert_eq!(report.cleared, 1);
    assert_eq!(report.drawn, 0);
    assert_eq!(
        report.damage,
        DamageRegion::Rects(vec![Rect::new(8.0, 8.0, 13.0, 13.0)])
    );
    assert!(h.scene.lost_rects(h.group).is_empty());

    // Nothing left to erase or draw.
    assert!(h.frame().damage.is_empty());
}

#[test]
fn destroyed_sprite_is_erased_next_frame() {
    let mut h = Harness::new(20, 20);
    let s = h
        .scene
        .create_sprite_with_image(Image::filled(3, 3, Color::RED));
    h.scene.add_sprites(h.group, s).unwrap();
    let _ = h.frame();

    h.scene.destroy_sprite(s);
    let report = h.frame();
    assert_eq!(h.pixel(1, 1), Color::WHITE);
    assert_eq!(report.changes.removed, vec![s.index()]);
}

#[test]
fn invisible_sprite_is_erased_and_not_redrawn() {
    let mut h = Harness::new(16, 16);
    let s = h
        .scene
        .create_sprite_with_image(Image::filled(4, 4, Color::RED));
    h.scene.add_sprites(h.group, s).unwrap();
    let _ = h.frame();

    h.scene.make_invisible(s);
    let report = h.frame();
    assert_eq!(h.pixel(0, 0), Color::WHITE);
    assert_eq!(report.drawn, 0);
    assert_eq!(h.scene.drawn_rect(h.group, s), None);

    // The next frame has nothing recorded to clear.
    assert_eq!(h.frame().cleared, 0);
}

#[test]
fn centered_sprite_grows_around_its_position() {
    let mut h = Harness::new(40, 40);
    let s = h
        .scene
        .create_sprite_with_image(Image::filled(4, 4, Color::BLUE));
    h.scene.set_anchor(s, Anchor::Center);
    h.scene.move_to(s, Point::new(20.0, 20.0));
    h.scene.add_sprites(h.group, s).unwrap();
    let _ = h.frame();
    assert_eq!(h.scene.rect(s), Some(Rect::new(18.0, 18.0, 22.0, 22.0)));

    h.scene.scale_to(s, 2.5).unwrap();
    let _ = h.frame();
    assert_eq!(h.scene.rect(s), Some(Rect::new(15.0, 15.0, 25.0, 25.0)));
    assert_eq!(h.pixel(15, 15), Color::BLUE);
    assert_eq!(h.pixel(14, 14), Color::WHITE);

    h.scene.scale_to(s, 1.0).unwrap();
    let _ = h.frame();
    assert_eq!(h.pixel(15, 15), Color::WHITE);
    assert_eq!(h.pixel(19, 19), Color::BLUE);
}

#[test]
fn higher_layers_paint_last() {
    let mut h = Harness::new(10, 10);
    let low = h
        .scene
        .create_sprite_with_image(Image::filled(6, 6, Color::RED));
    let high = h
        .scene
        .create_sprite_with_image(Image::filled(6, 6, Color::BLUE));
    // Insertion order puts `high` first; layers override it.
    h.scene.add_sprites(h.group, [high, low]).unwrap();
    h.scene.set_layer(high, 1);
    let _ = h.frame();
    assert_eq!(h.pixel(3, 3), Color::BLUE);

    h.scene.set_layer(high, -1);
    let _ = h.frame();
    assert_eq!(h.pixel(3, 3), Color::RED);
}

#[test]
fn pacer_deltas_reach_behaviors() {
    let mut h = Harness::new(8, 8);
    let s = h.scene.create_sprite_with_image(Image::new(1, 1));
    h.scene.add_sprites(h.group, s).unwrap();
    let seen = std::rc::Rc::new(Cell::new(0_u64));
    let sink = seen.clone();
    h.scene.set_behavior(
        s,
        from_fn(move |_, args| {
            sink.set(args.delta.nanos());
            Ok(())
        }),
    );

    let first = h.frame();
    assert_eq!(first.frame_index, 0);
    assert_eq!(seen.get(), 0);
    let second = h.frame();
    assert_eq!(second.frame_index, 1);
    assert_eq!(seen.get(), 25_000_000);
}
