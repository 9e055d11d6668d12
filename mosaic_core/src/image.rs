// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RGBA pixel buffers and the scale/rotate primitives.
//!
//! [`Image`] is the only pixel container in the crate. It backs sprite images,
//! background templates, and (through its [`Surface`](crate::surface::Surface)
//! implementation) the software backbuffer that frames are composed into.
//!
//! The two transform primitives mirror what a sprite needs:
//!
//! - [`Image::scaled`] resizes with nearest-neighbor sampling.
//! - [`Image::rotated`] rotates counter-clockwise. Quarter turns are exact
//!   pixel transpositions; other angles sample through the inverse rotation
//!   into an enlarged, transparent-filled bounding box, so the result is in
//!   general larger than the input.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Size;

/// A straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 0 is fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with explicit alpha.
    #[inline]
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packs the color as `0xAARRGGBB`.
    #[inline]
    #[must_use]
    pub const fn to_argb_u32(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Composites `self` over `dst` (source-over, straight alpha).
    #[must_use]
    pub fn over(self, dst: Self) -> Self {
        match self.a {
            0 => dst,
            255 => self,
            a => {
                let a = u32::from(a);
                let inv = 255 - a;
                let mix = |s: u8, d: u8| -> u8 {
                    let v = (u32::from(s) * a + u32::from(d) * inv) / 255;
                    u8::try_from(v).unwrap_or(u8::MAX)
                };
                let out_a = a + u32::from(dst.a) * inv / 255;
                Self {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: u8::try_from(out_a).unwrap_or(u8::MAX),
                }
            }
        }
    }
}

/// An owned, row-major RGBA8 pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Image {
    /// Creates a fully transparent image.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Creates an image with every pixel set to `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wraps an existing pixel vector.
    ///
    /// Returns `None` if `pixels.len()` is not `width * height`.
    #[must_use]
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The image's natural size.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Row-major pixel slice.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the image.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of range for {}x{} image",
            self.width,
            self.height
        );
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Makes every pixel equal to `key` fully transparent.
    #[must_use]
    pub fn with_color_key(mut self, key: Color) -> Self {
        for px in &mut self.pixels {
            if *px == key {
                *px = Color::TRANSPARENT;
            }
        }
        self
    }

    /// Returns a copy resized to `width` × `height` with nearest-neighbor
    /// sampling.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source coordinates are below the source dimensions"
    )]
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        let mut out = Self::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (u64::from(y) * u64::from(self.height) / u64::from(height)) as u32;
            for x in 0..width {
                let sx = (u64::from(x) * u64::from(self.width) / u64::from(width)) as u32;
                let idx = out.index(x, y);
                out.pixels[idx] = self.pixels[self.index(sx, sy)];
            }
        }
        out
    }

    /// Returns a copy rotated counter-clockwise by `degrees` (taken mod 360).
    ///
    /// The result is sized to the rotated bounding box, so for angles that are
    /// not multiples of 90 it is larger than `self` and padded with
    /// transparent pixels.
    #[must_use]
    pub fn rotated(&self, degrees: u16) -> Self {
        match degrees % 360 {
            0 => self.clone(),
            90 => self.quarter_turns(1),
            180 => self.quarter_turns(2),
            270 => self.quarter_turns(3),
            other => self.rotated_sampled(other),
        }
    }

    /// Packs every pixel as `0xAARRGGBB`, e.g. for a window framebuffer.
    #[must_use]
    pub fn to_argb_u32(&self) -> Vec<u32> {
        self.pixels.iter().map(|c| c.to_argb_u32()).collect()
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Exact counter-clockwise rotation by `turns` × 90°.
    fn quarter_turns(&self, turns: u8) -> Self {
        let (w, h) = (self.width, self.height);
        let (nw, nh) = if turns % 2 == 1 { (h, w) } else { (w, h) };
        let mut out = Self::new(nw, nh);
        for y in 0..h {
            for x in 0..w {
                let (dx, dy) = match turns {
                    1 => (y, w - 1 - x),
                    2 => (w - 1 - x, h - 1 - y),
                    _ => (h - 1 - y, x),
                };
                let idx = out.index(dx, dy);
                out.pixels[idx] = self.pixels[self.index(x, y)];
            }
        }
        out
    }

    /// Arbitrary-angle rotation by inverse nearest-neighbor sampling.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bounding box dimensions are non-negative and bounded by the source diagonal"
    )]
    fn rotated_sampled(&self, degrees: u16) -> Self {
        let radians = f64::from(degrees).to_radians();
        let (sin, cos) = (radians.sin(), radians.cos());
        let (w, h) = (f64::from(self.width), f64::from(self.height));

        // Shave rounding noise so exact fits don't grow by a pixel.
        let nw = (w * cos.abs() + h * sin.abs() - 1e-9).ceil().max(0.0) as u32;
        let nh = (w * sin.abs() + h * cos.abs() - 1e-9).ceil().max(0.0) as u32;
        let mut out = Self::new(nw, nh);

        let (cx, cy) = (w / 2.0, h / 2.0);
        let (ncx, ncy) = (f64::from(nw) / 2.0, f64::from(nh) / 2.0);
        for dy in 0..nh {
            let y = f64::from(dy) + 0.5 - ncy;
            for dx in 0..nw {
                let x = f64::from(dx) + 0.5 - ncx;
                let sx = x * cos - y * sin + cx;
                let sy = x * sin + y * cos + cy;
                if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
                    let src = self.pixels[self.index(sx.floor() as u32, sy.floor() as u32)];
                    let idx = out.index(dx, dy);
                    out.pixels[idx] = src;
                }
            }
        }
        out
    }
}
