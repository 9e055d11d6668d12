// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite sprite topology.

use alloc::vec::Vec;

use super::id::{INVALID, SpriteId};
use super::store::{Scene, SpriteKind};
use crate::dirty;
use crate::error::{CompositeError, Error};

impl Scene {
    /// Appends `child` to a composite's child list.
    ///
    /// The child keeps its own position and is not added to any group; group
    /// membership for rendering is up to the caller. The child picks up the
    /// composite's reference point on the composite's next move.
    ///
    /// # Errors
    ///
    /// - [`CompositeError::NotComposite`] if `composite` is a plain sprite.
    /// - [`CompositeError::Cycle`] if `child` is `composite` or one of its
    ///   owners.
    /// - [`CompositeError::AlreadyOwned`] if `child` belongs to a composite.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_child(&mut self, composite: SpriteId, child: SpriteId) -> Result<(), Error> {
        self.validate(composite);
        self.validate(child);
        let p = composite.idx;
        let c = child.idx;

        if self.kind[p as usize] != SpriteKind::Composite {
            return Err(CompositeError::NotComposite(composite).into());
        }
        let mut ancestor = p;
        while ancestor != INVALID {
            if ancestor == c {
                return Err(CompositeError::Cycle(child).into());
            }
            ancestor = self.owner[ancestor as usize];
        }
        if self.owner[c as usize] != INVALID {
            return Err(CompositeError::AlreadyOwned(child).into());
        }

        self.owner[c as usize] = p;
        self.children[p as usize].push(c);

        // Child visibility follows the composite.
        let _ = self.dirty.add_dependency(c, p, dirty::VISIBILITY);
        self.dirty.mark(p, dirty::MEMBERSHIP);
        Ok(())
    }

    /// Children of a composite in draw order. Empty for plain sprites.
    #[must_use]
    pub fn children(&self, composite: SpriteId) -> Vec<SpriteId> {
        self.validate(composite);
        self.children[composite.idx as usize]
            .iter()
            .map(|&c| self.sprite_id(c))
            .collect()
    }

    /// The composite that owns `sprite`, if any.
    #[must_use]
    pub fn owner(&self, sprite: SpriteId) -> Option<SpriteId> {
        self.validate(sprite);
        let o = self.owner[sprite.idx as usize];
        (o != INVALID).then(|| self.sprite_id(o))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::{Point, Rect, Size, Vec2};

    use super::*;
    use crate::image::{Color, Image};

    fn two_child_composite(scene: &mut Scene) -> (SpriteId, SpriteId, SpriteId) {
        let composite = scene.create_composite();
        let a = scene.create_sprite_with_image(Image::filled(10, 10, Color::RED));
        let b = scene.create_sprite_with_image(Image::filled(23, 23, Color::BLUE));
        scene.move_to(b, Point::new(3.0, 3.0));
        scene.add_child(composite, a).unwrap();
        scene.add_child(composite, b).unwrap();
        (composite, a, b)
    }

    fn origin(scene: &Scene, id: SpriteId) -> Point {
        scene.rect(id).unwrap().origin()
    }

    fn size(scene: &Scene, id: SpriteId) -> Size {
        scene.rect(id).unwrap().size()
    }

    #[test]
    fn moves_become_child_offsets() {
        let mut scene = Scene::new();
        let (composite, a, b) = two_child_composite(&mut scene);

        scene.move_to(composite, Point::new(6.0, 6.0));
        assert_eq!(origin(&scene, a), Point::new(6.0, 6.0));
        assert_eq!(origin(&scene, b), Point::new(9.0, 9.0));
        // Children keep their own positions.
        assert_eq!(scene.position(b), Point::new(3.0, 3.0));
        assert_eq!(scene.model(b).offset(), Vec2::new(6.0, 6.0));

        scene.move_by(composite, Vec2::new(1.0, 3.0));
        assert_eq!(origin(&scene, a), Point::new(7.0, 9.0));
        assert_eq!(origin(&scene, b), Point::new(10.0, 12.0));
    }

    #[test]
    fn scale_and_rotation_forward_verbatim() {
        let mut scene = Scene::new();
        let (composite, a, b) = two_child_composite(&mut scene);

        scene.scale_to(composite, 3.0).unwrap();
        assert_eq!(size(&scene, a), Size::new(30.0, 30.0));
        assert_eq!(size(&scene, b), Size::new(69.0, 69.0));

        // 3 × 2, not 3 + 2.
        scene.scale_by(composite, 2.0).unwrap();
        assert_eq!(scene.model(a).scale(), 6.0);
        assert_eq!(size(&scene, a), Size::new(60.0, 60.0));
        assert_eq!(size(&scene, b), Size::new(138.0, 138.0));

        scene.rotate_by(composite, 450);
        assert_eq!(scene.model(a).rotation(), 90);
        assert_eq!(scene.model(composite).rotation(), 90);
    }

    #[test]
    fn rejected_scale_touches_no_child() {
        let mut scene = Scene::new();
        let (composite, a, b) = two_child_composite(&mut scene);
        assert!(scene.scale_by(composite, 0.0).is_err());
        assert_eq!(scene.model(a).scale(), 1.0);
        assert_eq!(scene.model(b).scale(), 1.0);
        assert_eq!(scene.model(composite).scale(), 1.0);
    }

    #[test]
    fn visibility_forwards() {
        let mut scene = Scene::new();
        let (composite, a, b) = two_child_composite(&mut scene);
        scene.toggle_visibility(composite);
        assert!(!scene.model(a).visible());
        assert!(!scene.model(b).visible());

        let mut surface = Image::filled(40, 40, Color::WHITE);
        assert_eq!(scene.draw_sprite(composite, &mut surface), None);
    }

    #[test]
    fn draw_unions_children_in_order() {
        let mut scene = Scene::new();
        let (composite, _, _) = two_child_composite(&mut scene);
        let mut surface = Image::filled(40, 40, Color::WHITE);

        let drawn = scene.draw_sprite(composite, &mut surface);
        assert_eq!(drawn, Some(Rect::new(0.0, 0.0, 26.0, 26.0)));
        // The later child paints over the earlier one.
        assert_eq!(surface.get(5, 5), Some(Color::BLUE));
        assert_eq!(surface.get(1, 1), Some(Color::RED));
    }

    #[test]
    fn off_surface_children_stay_out_of_the_union() {
        let mut scene = Scene::new();
        let composite = scene.create_composite();
        let near = scene.create_sprite_with_image(Image::filled(4, 4, Color::RED));
        let far = scene.create_sprite_with_image(Image::filled(4, 4, Color::BLUE));
        scene.move_to(far, Point::new(100.0, 100.0));
        scene.add_child(composite, near).unwrap();
        scene.add_child(composite, far).unwrap();

        let mut surface = Image::filled(20, 20, Color::WHITE);
        assert_eq!(
            scene.draw_sprite(composite, &mut surface),
            Some(Rect::new(0.0, 0.0, 4.0, 4.0))
        );

        scene.move_to(near, Point::new(-50.0, -50.0));
        assert_eq!(scene.draw_sprite(composite, &mut surface), None);
    }

    #[test]
    fn nested_composites_accumulate_offsets() {
        let mut scene = Scene::new();
        let outer = scene.create_composite();
        let inner = scene.create_composite();
        let leaf = scene.create_sprite_with_image(Image::new(1, 1));
        scene.add_child(outer, inner).unwrap();
        scene.add_child(inner, leaf).unwrap();

        scene.move_to(inner, Point::new(2.0, 0.0));
        scene.move_to(outer, Point::new(10.0, 10.0));
        assert_eq!(origin(&scene, leaf), Point::new(12.0, 10.0));
    }

    #[test]
    fn topology_errors() {
        let mut scene = Scene::new();
        let outer = scene.create_composite();
        let inner = scene.create_composite();
        let plain = scene.create_sprite();
        scene.add_child(outer, inner).unwrap();

        assert_eq!(
            scene.add_child(plain, inner),
            Err(CompositeError::NotComposite(plain).into())
        );
        assert_eq!(
            scene.add_child(inner, outer),
            Err(CompositeError::Cycle(outer).into())
        );
        assert_eq!(
            scene.add_child(outer, outer),
            Err(CompositeError::Cycle(outer).into())
        );
        let other = scene.create_composite();
        assert_eq!(
            scene.add_child(other, inner),
            Err(CompositeError::AlreadyOwned(inner).into())
        );
        assert_eq!(scene.children(outer), vec![inner]);
        assert_eq!(scene.owner(inner), Some(outer));
    }

    #[test]
    fn destroying_composite_destroys_children() {
        let mut scene = Scene::new();
        let (composite, a, b) = two_child_composite(&mut scene);
        scene.destroy_sprite(composite);
        assert!(!scene.is_alive(a));
        assert!(!scene.is_alive(b));
        assert_eq!(scene.sprite_count(), 0);
    }

    #[test]
    fn destroying_child_detaches_it() {
        let mut scene = Scene::new();
        let (composite, a, b) = two_child_composite(&mut scene);
        scene.destroy_sprite(a);
        assert_eq!(scene.children(composite), vec![b]);
    }
}
