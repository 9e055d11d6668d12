// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image providers for the demos.

use std::path::{Path, PathBuf};

use mosaic_core::assets::{AssetError, ImageProvider};
use mosaic_core::image::{Color, Image};

/// Key color the procedural art is painted on, made transparent on load.
const KEY: Color = Color::rgb(255, 0, 255);

/// Built-in art, so demos run without any files on disk.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ProceduralAssets;

impl ImageProvider for ProceduralAssets {
    fn load(&mut self, name: &str) -> Result<Image, AssetError> {
        let image = match name {
            "ball.png" => ball(50),
            "button.png" => button(40),
            "teddy.png" => teddy(),
            _ => return Err(AssetError::new(name, "no built-in image with that name")),
        };
        Ok(keyed(image))
    }
}

/// PNG files from a directory. The top-left pixel of each file is its
/// transparent color key.
#[derive(Clone, Debug)]
pub(crate) struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub(crate) fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ImageProvider for DirectoryAssets {
    fn load(&mut self, name: &str) -> Result<Image, AssetError> {
        let path = self.root.join(name);
        let decoded = image::open(&path)
            .map_err(|e| AssetError::new(path.display().to_string(), e.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        let pixels = decoded
            .pixels()
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();
        let image = Image::from_pixels(width, height, pixels)
            .ok_or_else(|| AssetError::new(name, "decoded pixel count does not match size"))?;
        Ok(keyed(image))
    }
}

fn keyed(image: Image) -> Image {
    match image.get(0, 0) {
        Some(key) => image.with_color_key(key),
        None => image,
    }
}

/// Writes `frame` as a PNG file.
pub(crate) fn save_png(frame: &Image, path: &Path) -> anyhow::Result<()> {
    let bytes: Vec<u8> = frame
        .pixels()
        .iter()
        .flat_map(|c| [c.r, c.g, c.b, c.a])
        .collect();
    let buffer = image::RgbaImage::from_raw(frame.width(), frame.height(), bytes)
        .ok_or_else(|| anyhow::anyhow!("frame buffer has the wrong length"))?;
    buffer.save(path)?;
    Ok(())
}

// -- Procedural art --

fn disc(image: &mut Image, cx: f64, cy: f64, radius: f64, color: Color) {
    for y in 0..image.height() {
        for x in 0..image.width() {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                image.set(x, y, color);
            }
        }
    }
}

fn ball(size: u32) -> Image {
    let mut image = Image::filled(size, size, KEY);
    let r = f64::from(size) / 2.0;
    disc(&mut image, r, r, r - 1.0, Color::rgb(200, 30, 30));
    disc(&mut image, r * 0.7, r * 0.7, r * 0.25, Color::rgb(250, 180, 180));
    image
}

fn button(size: u32) -> Image {
    let mut image = Image::filled(size, size, KEY);
    let r = f64::from(size) / 2.0;
    disc(&mut image, r, r, r - 1.0, Color::rgb(30, 60, 200));
    for (cx, cy) in [(0.8, 0.8), (1.2, 0.8), (0.8, 1.2), (1.2, 1.2)] {
        disc(&mut image, r * cx, r * cy, r * 0.12, Color::BLACK);
    }
    image
}

fn teddy() -> Image {
    let mut image = Image::filled(60, 80, KEY);
    let fur = Color::rgb(150, 100, 50);
    disc(&mut image, 12.0, 12.0, 10.0, fur);
    disc(&mut image, 48.0, 12.0, 10.0, fur);
    disc(&mut image, 30.0, 24.0, 18.0, fur);
    disc(&mut image, 30.0, 60.0, 20.0, fur);
    disc(&mut image, 23.0, 20.0, 3.0, Color::BLACK);
    disc(&mut image, 37.0, 20.0, 3.0, Color::BLACK);
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_images_have_transparent_corners() {
        let mut assets = ProceduralAssets;
        for name in ["ball.png", "button.png", "teddy.png"] {
            let image = assets.load(name).unwrap();
            assert_eq!(image.get(0, 0), Some(Color::TRANSPARENT), "{name}");
            let (cx, cy) = (image.width() / 2, image.height() / 2);
            assert_ne!(image.get(cx, cy).map(|c| c.a), Some(0), "{name}");
        }
    }

    #[test]
    fn unknown_names_fail() {
        let err = ProceduralAssets.load("dragon.png").unwrap_err();
        assert_eq!(err.name, "dragon.png");
    }

    #[test]
    fn missing_directory_file_fails() {
        let mut assets = DirectoryAssets::new("/nonexistent-mosaic-assets");
        assert!(assets.load("ball.png").is_err());
    }
}
