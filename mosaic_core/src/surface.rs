// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing-surface contract.
//!
//! Sprites and groups only ever talk to a [`Surface`]: they blit derived
//! images onto it and restore regions of it from a [`Background`]. [`Image`]
//! implements the trait, so a plain pixel buffer serves as the backbuffer.

use core::fmt;

use kurbo::{Point, Rect, Size};

use crate::image::{Color, Image};

/// A mutable pixel target.
pub trait Surface {
    /// The surface's size in pixels.
    fn size(&self) -> Size;

    /// Composites `image` with its top-left corner at `rect.origin()` (rounded
    /// to the nearest pixel) and returns the affected area clipped to the
    /// surface.
    ///
    /// A blit that lands entirely off-surface returns a zero-area rectangle.
    fn blit(&mut self, image: &Image, rect: Rect) -> Rect;

    /// Copies `area` from `source` to the same coordinates on this surface.
    ///
    /// `source` is expected to be the same size as the surface (a background
    /// template); pixels outside either buffer are skipped.
    fn blit_region(&mut self, source: &Image, area: Rect);

    /// Fills the whole surface with `color`.
    fn fill(&mut self, color: Color);

    /// Fills `rect` (clipped to the surface) with `color`.
    fn fill_rect(&mut self, color: Color, rect: Rect);

    /// The surface's bounds as a rectangle at the origin.
    fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size())
    }
}

/// Where [`Scene::clear_group`](crate::scene::Scene::clear_group) gets the
/// pixels that erase stale sprite imprints.
#[derive(Clone, Copy)]
pub enum Background<'a> {
    /// Copy the region from a surface-sized background image.
    Image(&'a Image),
    /// Invoke a procedural fill with the surface and the region to restore.
    Procedural(&'a dyn Fn(&mut dyn Surface, Rect)),
}

impl fmt::Debug for Background<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(image) => f.debug_tuple("Image").field(image).finish(),
            Self::Procedural(_) => f.write_str("Procedural(..)"),
        }
    }
}

impl Background<'_> {
    /// Restores `area` of `surface`.
    pub fn restore(&self, surface: &mut dyn Surface, area: Rect) {
        match self {
            Self::Image(image) => surface.blit_region(image, area),
            Self::Procedural(fill) => fill(surface, area),
        }
    }
}

/// Integer pixel span `[x0, x1) × [y0, y1)` of `rect` clipped to `w` × `h`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "values are clamped to the buffer dimensions first"
)]
fn pixel_span(rect: Rect, w: u32, h: u32) -> Option<(u32, u32, u32, u32)> {
    let r = rect.expand();
    let x0 = r.x0.max(0.0).min(f64::from(w)) as u32;
    let y0 = r.y0.max(0.0).min(f64::from(h)) as u32;
    let x1 = r.x1.max(0.0).min(f64::from(w)) as u32;
    let y1 = r.y1.max(0.0).min(f64::from(h)) as u32;
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

impl Surface for Image {
    fn size(&self) -> Size {
        Self::size(self)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "origins are rounded and destination coordinates bounds-checked"
    )]
    fn blit(&mut self, image: &Image, rect: Rect) -> Rect {
        let origin = rect.origin().round();
        let (ox, oy) = (origin.x as i64, origin.y as i64);
        let (w, h) = (i64::from(self.width()), i64::from(self.height()));

        for sy in 0..image.height() {
            let dy = oy + i64::from(sy);
            if dy < 0 || dy >= h {
                continue;
            }
            for sx in 0..image.width() {
                let dx = ox + i64::from(sx);
                if dx < 0 || dx >= w {
                    continue;
                }
                let src = image.pixels()[image.index(sx, sy)];
                let idx = self.index(dx as u32, dy as u32);
                let dst = &mut self.pixels_mut()[idx];
                *dst = src.over(*dst);
            }
        }

        Rect::from_origin_size(origin, image.size()).intersect(self.bounds())
    }

    fn blit_region(&mut self, source: &Image, area: Rect) {
        let w = self.width().min(source.width());
        let h = self.height().min(source.height());
        let Some((x0, y0, x1, y1)) = pixel_span(area, w, h) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let src = source.pixels()[source.index(x, y)];
                let idx = self.index(x, y);
                self.pixels_mut()[idx] = src;
            }
        }
    }

    fn fill(&mut self, color: Color) {
        self.pixels_mut().fill(color);
    }

    fn fill_rect(&mut self, color: Color, rect: Rect) {
        let Some((x0, y0, x1, y1)) = pixel_span(rect, self.width(), self.height()) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = self.index(x, y);
                self.pixels_mut()[idx] = color;
            }
        }
    }
}
