use crate::category::is_category_name;
use crate::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// Remove every directory under `root` that is empty, deepest first.
///
/// Children are visited before their parent, so a parent emptied by the
/// removal of its last child is removed in the same pass. The root and the
/// root-level category directories are always kept.
pub fn remove_empty_dirs(root: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut removed = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir = entry.path();
        if is_category_dir(root, dir) {
            continue;
        }
        if fs::read_dir(dir)?.next().is_none() {
            fs::remove_dir(dir)?;
            trace!("removed empty directory {}", dir.display());
            removed.push(dir.to_path_buf());
        }
    }

    Ok(removed)
}

fn is_category_dir(root: &Path, dir: &Path) -> bool {
    dir.parent() == Some(root)
        && dir
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_category_name)
}
