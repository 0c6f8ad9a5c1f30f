use crate::category::{classify, in_category_dir, Category};
use crate::scanner::PathEntry;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files bucketed by category, each bucket in walk order.
#[derive(Debug, Default, Clone)]
pub struct ClassificationTable {
    buckets: BTreeMap<Category, Vec<PathBuf>>,
}

impl ClassificationTable {
    /// Classify every file entry that does not already live in a category
    /// directory under `root`.
    pub fn from_entries<'a>(
        root: &Path,
        entries: impl IntoIterator<Item = &'a PathEntry>,
    ) -> Self {
        let mut table = Self::default();
        for entry in entries {
            if !entry.is_file || in_category_dir(root, &entry.path) {
                continue;
            }
            table.push(classify(&entry.path), entry.path.clone());
        }
        table
    }

    pub fn push(&mut self, category: Category, path: PathBuf) {
        self.buckets.entry(category).or_default().push(path);
    }

    pub fn files(&self, category: Category) -> &[PathBuf] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty categories in classification order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(|category| !self.files(*category).is_empty())
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Create `root/<category>` for every category that received at least one file.
pub fn create_category_dirs(root: &Path, table: &ClassificationTable) -> io::Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for category in table.categories() {
        let dir = root.join(category.as_str());
        if !dir.is_dir() {
            fs::create_dir_all(&dir)?;
            created.push(dir);
        }
    }
    Ok(created)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    /// `None` means the destination name was already taken and the source
    /// is deleted instead.
    pub destination: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct MovePlan {
    entries: Vec<PlannedMove>,
}

impl MovePlan {
    /// First file to claim `root/<category>/<name>` wins; any later file
    /// mapping to the same destination, or to one that already exists on
    /// disk, is planned for deletion.
    pub fn build(root: &Path, table: &ClassificationTable) -> Self {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut seen_sources: HashSet<&Path> = HashSet::new();
        let mut entries = Vec::with_capacity(table.len());

        for category in Category::ALL {
            let category_dir = root.join(category.as_str());
            for source in table.files(category) {
                if in_category_dir(root, source) || !seen_sources.insert(source.as_path()) {
                    continue;
                }
                let Some(file_name) = source.file_name() else {
                    continue;
                };

                let destination = category_dir.join(file_name);
                if fs::symlink_metadata(&destination).is_ok() || claimed.contains(&destination) {
                    debug!(
                        "{} collides with {}, planned for deletion",
                        source.display(),
                        destination.display()
                    );
                    entries.push(PlannedMove {
                        source: source.clone(),
                        destination: None,
                    });
                    continue;
                }

                claimed.insert(destination.clone());
                entries.push(PlannedMove {
                    source: source.clone(),
                    destination: Some(destination),
                });
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[PlannedMove] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn deletions(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.destination.is_none())
            .count()
    }
}
