use crate::category::Category;
use crate::error::Error;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Final state of a sorted tree, rebuilt from disk at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// File names per category, sorted. All six categories are present.
    pub files: BTreeMap<Category, Vec<String>>,
    /// Extensions of files outside `undefined`.
    pub known_extensions: BTreeSet<String>,
    /// Extensions of files inside `undefined`.
    pub unknown_extensions: BTreeSet<String>,
    /// Files found outside every category directory.
    pub misplaced: Vec<PathBuf>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self {
            files: Category::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
            known_extensions: BTreeSet::new(),
            unknown_extensions: BTreeSet::new(),
            misplaced: Vec::new(),
        }
    }
}

impl RunReport {
    pub fn files_in(&self, category: Category) -> &[String] {
        self.files
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_files(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}

/// Walk the tree under `root` and attribute every file to the root-level
/// category directory holding it.
pub fn build_report(root: &Path) -> Result<RunReport, Error> {
    let mut report = RunReport::default();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let category = top_level_category(root, path);

        if let Some(extension) = extension_of(&name) {
            if category == Some(Category::Undefined) {
                report.unknown_extensions.insert(extension);
            } else {
                report.known_extensions.insert(extension);
            }
        }

        match category {
            Some(category) => report.files.entry(category).or_default().push(name),
            None => {
                warn!(
                    "File {} is outside every category directory",
                    path.display()
                );
                report.misplaced.push(path.to_path_buf());
            }
        }
    }

    for names in report.files.values_mut() {
        names.sort();
    }

    Ok(report)
}

fn top_level_category(root: &Path, path: &Path) -> Option<Category> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components = relative.components();
    let first = match components.next()? {
        Component::Normal(segment) => segment.to_str()?,
        _ => return None,
    };
    // A file sitting at the root is never inside a category, even if its
    // name matches one.
    components.next()?;
    Category::from_name(first)
}

fn extension_of(name: &str) -> Option<String> {
    let (_, extension) = name.rsplit_once('.')?;
    if extension.is_empty() {
        None
    } else {
        Some(extension.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_report_attributes_files_and_extensions() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        for dir in ["images", "undefined", "archives/bundle/inner"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("images/b.PNG"), "").unwrap();
        fs::write(root.join("images/a.jpg"), "").unwrap();
        fs::write(root.join("undefined/noext"), "").unwrap();
        fs::write(root.join("undefined/run.sh"), "").unwrap();
        fs::write(root.join("archives/bundle/inner/x.csv"), "").unwrap();

        let report = build_report(root).unwrap();

        assert_eq!(report.files_in(Category::Images), ["a.jpg", "b.PNG"]);
        assert_eq!(report.files_in(Category::Undefined), ["noext", "run.sh"]);
        assert_eq!(report.files_in(Category::Archives), ["x.csv"]);
        assert!(report.files_in(Category::Music).is_empty());
        assert_eq!(report.files.len(), 6);
        assert_eq!(
            report.known_extensions,
            BTreeSet::from(["csv".to_string(), "jpg".to_string(), "png".to_string()])
        );
        assert_eq!(report.unknown_extensions, BTreeSet::from(["sh".to_string()]));
        assert!(report.misplaced.is_empty());
        assert_eq!(report.total_files(), 5);
    }

    #[test]
    fn test_files_outside_categories_are_surfaced() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("stray")).unwrap();
        fs::write(root.join("stray/lost.txt"), "").unwrap();
        fs::write(root.join("music"), "").unwrap();

        let report = build_report(root).unwrap();

        assert_eq!(
            report.misplaced,
            vec![root.join("music"), root.join("stray/lost.txt")]
        );
        assert_eq!(report.total_files(), 0);
        assert_eq!(report.known_extensions, BTreeSet::from(["txt".to_string()]));
    }
}
