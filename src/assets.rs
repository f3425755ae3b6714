use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::error::{GameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum AssetKind {
    #[strum(to_string = "audio")]
    Audio,
    #[strum(to_string = "image")]
    Image,
}

impl AssetKind {
    fn subdir(self) -> &'static str {
        match self {
            AssetKind::Audio => "audio",
            AssetKind::Image => "images",
        }
    }
}

/// Encoded sound data, shared between every player of the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioHandle(Arc<[u8]>);

/// Encoded image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle(Arc<[u8]>);

impl AudioHandle {
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.0)
    }
}

impl ImageHandle {
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.0)
    }
}

/// Loads asset files from `root/<kind>/<name>` once and hands out shared handles afterwards.
#[derive(Debug)]
pub struct AssetCache {
    root: PathBuf,
    loaded: HashMap<(AssetKind, String), Arc<[u8]>>,
    reads: usize,
}

impl AssetCache {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            loaded: HashMap::new(),
            reads: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads every named asset that is not cached yet.
    pub fn ensure_loaded(&mut self, kind: AssetKind, names: &[&str]) -> Result<()> {
        for name in names {
            self.load(kind, name)?;
        }
        Ok(())
    }

    pub fn load_audio(&mut self, name: &str) -> Result<AudioHandle> {
        self.load(AssetKind::Audio, name).map(AudioHandle)
    }

    pub fn load_image(&mut self, name: &str) -> Result<ImageHandle> {
        self.load(AssetKind::Image, name).map(ImageHandle)
    }

    pub fn is_loaded(&self, kind: AssetKind, name: &str) -> bool {
        self.loaded.contains_key(&(kind, name.to_string()))
    }

    /// Number of files actually read from disk.
    pub fn reads(&self) -> usize {
        self.reads
    }

    fn load(&mut self, kind: AssetKind, name: &str) -> Result<Arc<[u8]>> {
        let key = (kind, name.to_string());
        if let Some(bytes) = self.loaded.get(&key) {
            return Ok(Arc::clone(bytes));
        }

        let path = self.root.join(kind.subdir()).join(name);
        let bytes: Arc<[u8]> = fs::read(&path)
            .map_err(|source| GameError::Asset {
                name: name.to_string(),
                path: path.clone(),
                source,
            })?
            .into();
        self.reads += 1;
        debug!("loaded {kind} asset {}", path.display());

        self.loaded.insert(key, Arc::clone(&bytes));
        Ok(bytes)
    }
}
