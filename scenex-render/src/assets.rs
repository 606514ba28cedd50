use crate::error::RenderError;
use bytemuck::cast_slice_mut;
use image::RgbaImage;
use scenex_core::asset_relative;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tiny_skia::{IntSize, Pixmap};
use tracing::{debug, warn};

/// Decoded stimulus images, keyed by asset URL. Failed loads are remembered
/// so a missing file is reported once.
pub struct ImageCache {
    root: PathBuf,
    images: HashMap<String, Option<Arc<Pixmap>>>,
}

impl ImageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    pub fn get(&mut self, url: &str) -> Option<Arc<Pixmap>> {
        if let Some(entry) = self.images.get(url) {
            return entry.clone();
        }
        let loaded = match self.load(url) {
            Ok(pm) => {
                debug!(url, width = pm.width(), height = pm.height(), "image decoded");
                Some(Arc::new(pm))
            }
            Err(err) => {
                warn!(url, error = %err, "stimulus image unavailable");
                None
            }
        };
        self.images.insert(url.to_string(), loaded.clone());
        loaded
    }

    /// Decodes every URL up front. Returns how many are usable.
    pub fn preload<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> usize {
        urls.into_iter().filter(|url| self.get(url).is_some()).count()
    }

    fn load(&self, url: &str) -> Result<Pixmap, RenderError> {
        let rel = asset_relative(url).ok_or_else(|| RenderError::AssetUrl(url.to_string()))?;
        let path = self.root.join(rel);
        let rgba = image::open(&path)
            .map_err(|source| RenderError::Image { path, source })?
            .into_rgba8();
        pixmap_from_rgba(rgba)
    }
}

/// Converts straight-alpha RGBA into a premultiplied pixmap.
pub fn pixmap_from_rgba(image: RgbaImage) -> Result<Pixmap, RenderError> {
    let (w, h) = image.dimensions();
    let size = IntSize::from_wh(w, h).ok_or(RenderError::EmptyImage)?;
    let mut data = image.into_raw();
    for px in cast_slice_mut::<u8, [u8; 4]>(&mut data) {
        let a = px[3] as u16;
        if a < 255 {
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
    }
    Pixmap::from_vec(data, size).ok_or(RenderError::EmptyImage)
}
