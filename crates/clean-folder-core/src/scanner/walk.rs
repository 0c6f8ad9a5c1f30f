use crate::category::is_category_name;
use crate::error::Error;
use crate::normalize::normalize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A path seen by the normalization walk, after any rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub path: PathBuf,
    pub is_file: bool,
}

#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Entries in walk order. Entries directly inside a category directory
    /// are left untouched and are not listed.
    pub entries: Vec<PathEntry>,
    pub renamed: usize,
}

impl WalkOutcome {
    pub fn files(&self) -> impl Iterator<Item = &PathEntry> {
        self.entries.iter().filter(|entry| entry.is_file)
    }
}

/// Walk `root` top-down, renaming every entry to its normalized name.
///
/// Siblings are visited in name order so the resulting entry order is stable.
/// Any failed rename aborts the walk; entries renamed before the failure stay
/// renamed.
pub fn normalize_tree(root: &Path) -> Result<WalkOutcome, Error> {
    let mut outcome = WalkOutcome::default();
    visit_dir(root, root, &mut outcome)?;
    debug!(
        "Normalization walk finished: {} entries, {} renamed",
        outcome.entries.len(),
        outcome.renamed
    );
    Ok(outcome)
}

fn visit_dir(root: &Path, dir: &Path, outcome: &mut WalkOutcome) -> Result<(), Error> {
    let mut children = fs::read_dir(dir)
        .map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("Error reading directory {}: {}", dir.display(), err),
            )
        })?
        .collect::<io::Result<Vec<_>>>()?;
    children.sort_by_key(|entry| entry.file_name());

    let frozen = dir != root
        && dir
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_category_name);

    for child in children {
        let path = child.path();
        // Symlinks are reported as non-directories and are never followed.
        let is_dir = child.file_type()?.is_dir();

        let path = if frozen {
            path
        } else {
            let renamed = rename_normalized(&path, !is_dir)?;
            if renamed != path {
                outcome.renamed += 1;
            }
            outcome.entries.push(PathEntry {
                path: renamed.clone(),
                is_file: !is_dir,
            });
            renamed
        };

        if is_dir {
            visit_dir(root, &path, outcome)?;
        }
    }

    Ok(())
}

fn rename_normalized(path: &Path, is_file: bool) -> Result<PathBuf, Error> {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return Ok(path.to_path_buf()),
    };
    let normalized = normalize(&name, is_file);
    if normalized == name {
        return Ok(path.to_path_buf());
    }

    let target = path.with_file_name(&normalized);
    if fs::symlink_metadata(&target).is_ok() {
        return Err(Error::RenameCollision {
            from: path.to_path_buf(),
            to: target,
        });
    }

    fs::rename(path, &target).map_err(|source| Error::Rename {
        from: path.to_path_buf(),
        to: target.clone(),
        source,
    })?;
    trace!("renamed {} -> {}", path.display(), target.display());
    Ok(target)
}
