use crate::error::Error;
use crate::planner::{MovePlan, PlannedMove};
use crate::progress::ProgressReporter;
use dashmap::DashMap;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveFailure {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub error: String,
}

#[derive(Debug, Default, Clone)]
pub struct MoveSummary {
    pub moved: usize,
    pub deleted: usize,
    /// Sorted by source path.
    pub failures: Vec<MoveFailure>,
}

enum Outcome {
    Moved,
    Deleted,
}

/// Execute every planned move/delete on a pool of `max_workers` threads.
///
/// A failing operation never stops the others; every failure is collected
/// and returned once all operations have finished.
pub fn execute_plan(
    plan: &MovePlan,
    max_workers: usize,
    reporter: &dyn ProgressReporter,
) -> Result<MoveSummary, Error> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .thread_name(|index| format!("mover-{}", index))
        .build()?;

    let total = plan.len();
    let moved = AtomicUsize::new(0);
    let deleted = AtomicUsize::new(0);
    let completed = AtomicUsize::new(0);
    let failures: DashMap<PathBuf, MoveFailure> = DashMap::new();

    pool.install(|| {
        plan.entries().par_iter().for_each(|entry| {
            match apply(entry) {
                Ok(Outcome::Moved) => {
                    moved.fetch_add(1, Ordering::Relaxed);
                }
                Ok(Outcome::Deleted) => {
                    deleted.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    debug!("Failed to relocate '{}': {}", entry.source.display(), err);
                    failures.insert(
                        entry.source.clone(),
                        MoveFailure {
                            source: entry.source.clone(),
                            destination: entry.destination.clone(),
                            error: err.to_string(),
                        },
                    );
                }
            }
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            reporter.on_move_progress(done, total);
        });
    });

    let mut failures: Vec<MoveFailure> = failures.into_iter().map(|(_, failure)| failure).collect();
    failures.sort_by(|a, b| a.source.cmp(&b.source));

    Ok(MoveSummary {
        moved: moved.into_inner(),
        deleted: deleted.into_inner(),
        failures,
    })
}

fn apply(entry: &PlannedMove) -> io::Result<Outcome> {
    match &entry.destination {
        Some(destination) => {
            relocate(&entry.source, destination)?;
            debug!(
                "moved {} -> {}",
                entry.source.display(),
                destination.display()
            );
            Ok(Outcome::Moved)
        }
        None => {
            fs::remove_file(&entry.source)?;
            debug!("deleted duplicate {}", entry.source.display());
            Ok(Outcome::Deleted)
        }
    }
}

/// Move `source` to `destination` without ever replacing an existing
/// destination.
///
/// The planner filtered known collisions; anything found here appeared after
/// planning. Linking fails atomically with `AlreadyExists` in that case. When
/// links are not available (another filesystem, or a filesystem without hard
/// links) the move falls back to a checked rename.
fn relocate(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::hard_link(source, destination) {
        Ok(()) => {
            if let Err(err) = fs::remove_file(source) {
                // Leave the tree as it was rather than with two copies.
                let _ = fs::remove_file(destination);
                return Err(err);
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination '{}' already exists", destination.display()),
        )),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(err),
        Err(err) => {
            debug!(
                "hard link {} -> {} unavailable ({}), renaming",
                source.display(),
                destination.display(),
                err
            );
            if fs::symlink_metadata(destination).is_ok() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("destination '{}' already exists", destination.display()),
                ));
            }
            fs::rename(source, destination)
        }
    }
}
