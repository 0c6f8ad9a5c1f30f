use std::fmt;
use std::path::{Component, Path};

/// Fixed file-type buckets. Declaration order is the classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Images,
    Videos,
    Documents,
    Music,
    Archives,
    Undefined,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Images,
        Category::Videos,
        Category::Documents,
        Category::Music,
        Category::Archives,
        Category::Undefined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Videos => "videos",
            Category::Documents => "documents",
            Category::Music => "music",
            Category::Archives => "archives",
            Category::Undefined => "undefined",
        }
    }

    /// Lowercase extensions owned by this category. `Undefined` owns none.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Category::Images => &["jpeg", "png", "jpg", "svg"],
            Category::Videos => &["avi", "mp4", "mov", "mkv"],
            Category::Documents => &["doc", "docx", "txt", "pdf", "xlsx", "pptx"],
            Category::Music => &["mp3", "ogg", "wav", "amr"],
            Category::Archives => &["zip", "rar", "tar"],
            Category::Undefined => &[],
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_category_name(name: &str) -> bool {
    Category::from_name(name).is_some()
}

/// Classify a file by the text after the last dot of its name.
pub fn classify(path: &Path) -> Category {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return Category::Undefined,
    };
    let extension = match name.rsplit_once('.') {
        Some((_, extension)) => extension.to_lowercase(),
        None => return Category::Undefined,
    };

    Category::ALL
        .into_iter()
        .find(|category| category.extensions().contains(&extension.as_str()))
        .unwrap_or(Category::Undefined)
}

/// True if any directory between `root` and `path` is named after a category.
pub fn in_category_dir(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parent = match relative.parent() {
        Some(parent) => parent,
        None => return false,
    };
    parent.components().any(|component| match component {
        Component::Normal(segment) => segment.to_str().is_some_and(is_category_name),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_classify_known_extensions() {
        assert_eq!(classify(Path::new("a/Foto.JPG")), Category::Images);
        assert_eq!(classify(Path::new("video.mkv")), Category::Videos);
        assert_eq!(classify(Path::new("doc1.TXT")), Category::Documents);
        assert_eq!(classify(Path::new("song.mp3")), Category::Music);
        assert_eq!(classify(Path::new("bundle.zip")), Category::Archives);
        assert_eq!(classify(Path::new("old.RAR")), Category::Archives);
    }

    #[test]
    fn test_classify_falls_back_to_undefined() {
        assert_eq!(classify(Path::new("noext")), Category::Undefined);
        assert_eq!(classify(Path::new("script.py")), Category::Undefined);
        assert_eq!(classify(Path::new("backup.tar.gz")), Category::Undefined);
        assert_eq!(classify(Path::new("trailing.")), Category::Undefined);
    }

    #[test]
    fn test_classify_is_total() {
        for ext in ["", "jpg", "JPG", "x", "tar", "pptx", "exe", "Ж"] {
            let path = PathBuf::from(format!("file.{ext}"));
            let category = classify(&path);
            let owners = Category::ALL
                .iter()
                .filter(|c| c.extensions().contains(&ext.to_lowercase().as_str()))
                .count();
            assert!(owners <= 1, "extension {ext:?} owned by several categories");
            if owners == 0 {
                assert_eq!(category, Category::Undefined);
            }
        }
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_name("Images"), None);
        assert!(!is_category_name("misc"));
    }

    #[test]
    fn test_in_category_dir_is_relative_to_root() {
        let root = Path::new("/home/me/music/inbox");
        assert!(!in_category_dir(root, &root.join("song.mp3")));
        assert!(in_category_dir(root, &root.join("music/song.mp3")));
        assert!(in_category_dir(root, &root.join("archives/bundle/a.txt")));
        assert!(!in_category_dir(root, &root.join("images")));
        assert!(!in_category_dir(root, &root.join("sub/deeper/x.jpg")));
    }
}
