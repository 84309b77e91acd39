use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use sweep::{Categories, IconName};

pub const ICON_SIZE: i32 = 64;

static PATHS: OnceLock<RwLock<HashMap<IconName, Option<PathBuf>>>> = OnceLock::new();

/// Resolves an icon name or absolute path. Theme lookups are cached, misses included.
pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_str());
    if path.is_absolute() && path.exists() {
        return Some(path.to_path_buf());
    }

    let cache = PATHS.get_or_init(|| RwLock::new(HashMap::new()));
    if let Some(hit) = cache.read().get(icon_name) {
        return hit.clone();
    }

    let found = lookup(icon_name.as_str())
        .with_size(ICON_SIZE as u16)
        .with_scale(1)
        .find();
    if found.is_none() {
        log::debug!("No icon found for '{}'", icon_name);
    }
    cache.write().insert(icon_name.clone(), found.clone());
    found
}

/// Decoded icons keyed by category index.
#[derive(Default)]
pub struct CategoryIcons(HashMap<usize, Pixbuf>);

impl CategoryIcons {
    pub fn load(categories: &Categories) -> Self {
        Self(
            categories
                .iter()
                .enumerate()
                .filter_map(|(i, c)| Some((i, Self::load_icon(c.icon.as_ref()?)?)))
                .collect(),
        )
    }

    fn load_icon(name: &IconName) -> Option<Pixbuf> {
        let path = find_icon_path(name)?;
        Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
            .inspect_err(|e| log::warn!("Failed to load icon {}: {}", path.display(), e))
            .ok()
    }

    pub fn get(&self, index: usize) -> Option<&Pixbuf> {
        self.0.get(&index)
    }
}
