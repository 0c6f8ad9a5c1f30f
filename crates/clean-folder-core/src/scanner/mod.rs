mod walk;

pub use walk::{normalize_tree, PathEntry, WalkOutcome};
