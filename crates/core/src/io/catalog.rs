//! Name-keyed collection of built-in and file-based schemes.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::io::{json, xml};
use crate::model::FlagScheme;
use crate::presets;

/// Schemes keyed by name, kept in insertion order.
///
/// Inserting a scheme whose name is already present replaces the earlier
/// scheme in place.
#[derive(Debug, Clone, Default)]
pub struct SchemeCatalog {
    schemes: Vec<FlagScheme>,
}

impl SchemeCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in presets only
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for scheme in presets::builtin_schemes() {
            catalog.insert(scheme);
        }
        catalog
    }

    /// Built-in presets, then the scheme files of each directory.
    ///
    /// Within one directory the file schemes are added sorted by name.
    pub fn load<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut catalog = Self::builtin();
        for dir in dirs {
            let mut found = read_directory(dir.as_ref());
            found.sort_by(|a, b| a.name().cmp(b.name()));
            for scheme in found {
                catalog.insert(scheme);
            }
        }
        debug!("scheme catalog holds {} scheme(s)", catalog.len());
        catalog
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::load(&settings.scheme_directories)
    }

    /// Add or replace a scheme, returning the one it replaced
    pub fn insert(&mut self, scheme: FlagScheme) -> Option<FlagScheme> {
        match self.schemes.iter_mut().find(|s| s.name() == scheme.name()) {
            Some(slot) => Some(std::mem::replace(slot, scheme)),
            None => {
                self.schemes.push(scheme);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FlagScheme> {
        self.schemes.iter().find(|s| s.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(|s| s.name())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlagScheme> {
        self.schemes.iter()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl<'a> IntoIterator for &'a SchemeCatalog {
    type Item = &'a FlagScheme;
    type IntoIter = std::slice::Iter<'a, FlagScheme>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemes.iter()
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Schemes of all `.xml` and `.json` files directly inside `dir`.
fn read_directory(dir: &Path) -> Vec<FlagScheme> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot scan scheme directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    let mut schemes = Vec::new();
    for path in &files {
        if has_extension(path, "xml") {
            schemes.extend(xml::schemes_from_file(path));
        } else if has_extension(path, "json") {
            match fs::read_to_string(path)
                .map_err(crate::Error::from)
                .and_then(|text| json::scheme_from_json(&text))
            {
                Ok(scheme) => schemes.push(scheme),
                Err(e) => warn!("skipping malformed scheme file {}: {}", path.display(), e),
            }
        }
    }
    debug!(
        "{} scheme(s) from {} file(s) in {}",
        schemes.len(),
        files.len(),
        dir.display()
    );
    schemes
}
