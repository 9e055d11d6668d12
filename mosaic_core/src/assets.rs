// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named image assets.
//!
//! Sprites receive their base images from an [`ImageProvider`]. The core
//! decodes nothing itself; hosts supply providers backed by files or by
//! procedurally generated art.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use crate::image::Image;

/// An image could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetError {
    /// The requested asset name.
    pub name: String,
    /// Why loading failed.
    pub reason: String,
}

impl AssetError {
    /// Creates an error for `name`.
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot load image '{}': {}", self.name, self.reason)
    }
}

impl core::error::Error for AssetError {}

/// Loads images by name.
pub trait ImageProvider {
    /// Loads the image called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError`] if the asset is missing or cannot be decoded.
    fn load(&mut self, name: &str) -> Result<Image, AssetError>;
}

/// An in-memory provider, filled ahead of time.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    images: BTreeMap<String, Image>,
}

impl MemoryAssets {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `image` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, image: Image) {
        self.images.insert(name.into(), image);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, image: Image) -> Self {
        self.insert(name, image);
        self
    }
}

impl ImageProvider for MemoryAssets {
    fn load(&mut self, name: &str) -> Result<Image, AssetError> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::new(name, "no such asset"))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::image::Color;

    #[test]
    fn memory_assets_load_clones() {
        let mut assets = MemoryAssets::new().with("ball", Image::filled(3, 3, Color::RED));
        let a = assets.load("ball").unwrap();
        let b = assets.load("ball").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width(), 3);
    }

    #[test]
    fn missing_asset_names_the_resource() {
        let mut assets = MemoryAssets::new();
        let err = assets.load("teddy.png").unwrap_err();
        assert_eq!(err.name, "teddy.png");
        assert_eq!(
            err.to_string(),
            "cannot load image 'teddy.png': no such asset"
        );
    }
}
