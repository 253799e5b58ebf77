//! Texture loading for the 3D sketches.
//!
//! Textures are referenced by paths relative to an asset root and cached by
//! content hash, so the moon texture shared by dozens of moons is decoded
//! and uploaded once.
//!
//! # Invariants
//! - Every [`AssetId`] handed out resolves to an image in the cache.
//! - A texture that cannot be read never aborts a sketch: the lenient loader
//!   substitutes a 1x1 fallback texel and logs a warning.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Content-addressed asset ID computed from the file bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AssetId(pub u64);

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// A single texel of the given color.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// What a texture slot is used for, which decides the fallback texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FallbackKind {
    /// Color map: mid grey so the lit shape stays visible.
    Albedo,
    /// Bump map: flat (zero height).
    Bump,
    /// Specular map: no highlights.
    Specular,
}

impl FallbackKind {
    pub fn texel(self) -> [u8; 4] {
        match self {
            FallbackKind::Albedo => [128, 128, 128, 255],
            FallbackKind::Bump | FallbackKind::Specular => [0, 0, 0, 255],
        }
    }

    fn key(self) -> &'static str {
        match self {
            FallbackKind::Albedo => "fallback:albedo",
            FallbackKind::Bump => "fallback:bump",
            FallbackKind::Specular => "fallback:specular",
        }
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("asset not found: {0:?}")]
    NotFound(AssetId),
}

/// One cached texture, as reported by [`TextureCache::report`].
#[derive(Debug, Clone, Serialize)]
pub struct TextureEntry {
    pub id: AssetId,
    pub width: u32,
    pub height: u32,
    pub paths: Vec<String>,
}

/// Summary of the cache contents.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub root: PathBuf,
    pub textures: Vec<TextureEntry>,
    pub missing: Vec<String>,
}

/// Texture cache rooted at an asset directory.
#[derive(Debug, Clone)]
pub struct TextureCache {
    root: PathBuf,
    by_path: BTreeMap<String, AssetId>,
    images: BTreeMap<AssetId, ImageData>,
    missing: BTreeSet<String>,
}

impl TextureCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            by_path: BTreeMap::new(),
            images: BTreeMap::new(),
            missing: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load `relative` under the root, decoding it once.
    pub fn load(&mut self, relative: &str) -> Result<AssetId, AssetError> {
        if let Some(id) = self.by_path.get(relative) {
            return Ok(*id);
        }
        let path = self.root.join(relative);
        let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        let id = content_hash(&bytes);
        if !self.images.contains_key(&id) {
            let decoded = image::load_from_memory(&bytes)
                .map_err(|source| AssetError::Decode {
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();
            let (width, height) = decoded.dimensions();
            tracing::debug!("decoded {} ({width}x{height})", path.display());
            self.images.insert(
                id,
                ImageData {
                    width,
                    height,
                    rgba: decoded.into_raw(),
                },
            );
        }
        self.by_path.insert(relative.to_string(), id);
        Ok(id)
    }

    /// Like [`load`](Self::load) but substitutes a fallback texel on failure.
    pub fn load_or_fallback(&mut self, relative: &str, kind: FallbackKind) -> AssetId {
        match self.load(relative) {
            Ok(id) => id,
            Err(e) => {
                if self.missing.insert(relative.to_string()) {
                    tracing::warn!("{e}; using fallback texture");
                }
                self.fallback(kind)
            }
        }
    }

    /// The shared fallback texel for `kind`.
    pub fn fallback(&mut self, kind: FallbackKind) -> AssetId {
        let id = content_hash(kind.key().as_bytes());
        self.images
            .entry(id)
            .or_insert_with(|| ImageData::solid(kind.texel()));
        id
    }

    pub fn get(&self, id: AssetId) -> Result<&ImageData, AssetError> {
        self.images.get(&id).ok_or(AssetError::NotFound(id))
    }

    /// Number of distinct images held.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Paths that failed to load and were replaced by fallbacks.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(String::as_str)
    }

    pub fn report(&self) -> CacheReport {
        let textures = self
            .images
            .iter()
            .map(|(id, img)| TextureEntry {
                id: *id,
                width: img.width,
                height: img.height,
                paths: self
                    .by_path
                    .iter()
                    .filter(|(_, v)| *v == id)
                    .map(|(k, _)| k.clone())
                    .collect(),
            })
            .collect();
        CacheReport {
            root: self.root.clone(),
            textures,
            missing: self.missing.iter().cloned().collect(),
        }
    }

    /// Report as pretty JSON, for the CLI.
    pub fn report_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.report())
    }
}

fn content_hash(bytes: &[u8]) -> AssetId {
    let digest = Sha256::digest(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    AssetId(u64::from_le_bytes(head))
}

pub fn crate_info() -> &'static str {
    "sketchbook-assets v0.1.0"
}
