//! Seed file enumeration and loading.

use anyhow::Context;
use seeder_core::Template;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Count the non-directory entries of a seed directory.
pub fn count_seed_files(dir: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        if !entry?.file_type()?.is_dir() {
            count += 1;
        }
    }
    Ok(count)
}

/// Value parser for `--seeder-dir`: the directory must hold at least one file.
pub fn parse_seeder_dir(value: &str) -> Result<PathBuf, String> {
    let dir = PathBuf::from(value);
    match count_seed_files(&dir) {
        Ok(0) => Err(format!("no files under {value}")),
        Ok(_) => Ok(dir),
        Err(e) => Err(format!("cannot read {value}: {e}")),
    }
}

/// List the seed files to load: the directory's files sorted by name, then
/// the single file.
pub fn collect_seed_files(dir: Option<&Path>, file: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    if let Some(dir) = dir {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read seeder directory {}", dir.display()))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read entry of {}", dir.display()))?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            files.push(entry.path());
        }
        files.sort();
        paths.extend(files);
    }

    if let Some(file) = file {
        paths.push(file.to_path_buf());
    }

    Ok(paths)
}

/// Load every readable, well-formed JSON seed file.
///
/// Files that cannot be read or decoded are skipped with a warning.
pub fn load_templates(paths: &[PathBuf]) -> Vec<Template> {
    let mut templates = Vec::with_capacity(paths.len());
    for path in paths {
        match Template::from_file(path) {
            Ok(template) => {
                debug!("Loaded seed template {}", path.display());
                templates.push(template);
            }
            Err(e) => warn!("Skipping seed file {}: {}", path.display(), e),
        }
    }
    templates
}
