use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    assets::decode::load_image,
    foundation::error::{BackdropError, BackdropResult},
    surface::image::Image,
};

#[derive(Clone, Debug)]
enum Entry {
    Loaded(Arc<Image>),
    /// Decode failure message, kept so a broken file is only reported once.
    Failed(String),
}

/// Decoded images keyed by path, shared by every output that shows them.
#[derive(Debug, Default)]
pub struct ImageStore {
    entries: HashMap<PathBuf, Entry>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached image for `path`, decoding it on first use.
    ///
    /// A failed decode is remembered and returned as the same error on later calls.
    pub fn load(&mut self, path: &Path) -> BackdropResult<Arc<Image>> {
        if let Some(entry) = self.entries.get(path) {
            return match entry {
                Entry::Loaded(img) => Ok(Arc::clone(img)),
                Entry::Failed(msg) => Err(BackdropError::decode(msg.clone())),
            };
        }

        match load_image(path) {
            Ok(img) => Ok(self.insert(path, img)),
            Err(err) => {
                let msg = format!("{err:#}");
                tracing::error!(path = %path.display(), error = %msg, "failed to load image");
                self.entries
                    .insert(path.to_path_buf(), Entry::Failed(msg.clone()));
                Err(BackdropError::decode(msg))
            }
        }
    }

    /// Like [`ImageStore::load`], degrading a failure to "no image".
    pub fn get_or_load(&mut self, path: &Path) -> Option<Arc<Image>> {
        self.load(path).ok()
    }

    /// Register an already decoded image under `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, image: Image) -> Arc<Image> {
        let image = Arc::new(image.prepared());
        self.entries
            .insert(path.into(), Entry::Loaded(Arc::clone(&image)));
        image
    }

    pub fn get(&self, path: &Path) -> Option<Arc<Image>> {
        match self.entries.get(path)? {
            Entry::Loaded(img) => Some(Arc::clone(img)),
            Entry::Failed(_) => None,
        }
    }

    pub fn is_failed(&self, path: &Path) -> bool {
        matches!(self.entries.get(path), Some(Entry::Failed(_)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry whose path is not in `keep`, including remembered failures.
    pub fn retain_paths(&mut self, keep: &[&Path]) {
        self.entries.retain(|path, _| keep.contains(&path.as_path()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
