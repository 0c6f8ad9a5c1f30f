use crate::archive::{self, ArchiveSummary};
use crate::cleanup;
use crate::config::AppConfig;
use crate::error::Error;
use crate::mover::{self, MoveSummary};
use crate::planner::{self, ClassificationTable, MovePlan};
use crate::progress::ProgressReporter;
use crate::report::{self, RunReport};
use crate::scanner;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct SortEngine {
    root: PathBuf,
    config: AppConfig,
}

#[derive(Debug)]
pub struct SortResult {
    pub report: RunReport,
    pub moves: MoveSummary,
    pub archives: ArchiveSummary,
    pub renamed: usize,
    pub removed_dirs: usize,
    pub normalize_duration: Duration,
    pub move_duration: Duration,
    pub cleanup_duration: Duration,
    pub extract_duration: Duration,
    pub total_duration: Duration,
}

impl SortEngine {
    pub fn new(root: impl Into<PathBuf>, config: AppConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Run the whole sorting pipeline on the root directory:
    /// 1. Normalize every name in place
    /// 2. Classify files and plan their destinations
    /// 3. Move (or delete colliding) files on a bounded worker pool
    /// 4. Remove directories left empty
    /// 5. Expand archives
    /// 6. Report the final tree
    ///
    /// Nothing on disk is touched before the root and configuration are
    /// validated.
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<SortResult, Error> {
        self.config.validate()?;
        validate_root(&self.root)?;
        let root = self.root.as_path();
        let run_start = Instant::now();
        info!("Sorting {}", root.display());

        // Phase 1: Normalize names
        reporter.on_normalize_start();
        let normalize_start = Instant::now();
        let walk = scanner::normalize_tree(root)?;
        let normalize_duration = normalize_start.elapsed();
        reporter.on_normalize_complete(
            walk.entries.len(),
            walk.renamed,
            normalize_duration.as_secs_f64(),
        );
        debug!(
            "Normalization completed in {:.2}s, {} renamed",
            normalize_duration.as_secs_f64(),
            walk.renamed
        );

        // Phase 2: Classify and plan
        let table = ClassificationTable::from_entries(root, walk.files());
        planner::create_category_dirs(root, &table)?;
        let plan = MovePlan::build(root, &table);
        let deletions = plan.deletions();
        reporter.on_plan_complete(plan.len() - deletions, deletions);
        info!(
            "{} files classified, {} to move, {} duplicates to delete",
            table.len(),
            plan.len() - deletions,
            deletions
        );

        // Phase 3: Move
        reporter.on_move_start(plan.len());
        let move_start = Instant::now();
        let moves = mover::execute_plan(&plan, self.config.max_workers, reporter)?;
        let move_duration = move_start.elapsed();
        reporter.on_move_complete(
            moves.moved,
            moves.deleted,
            moves.failures.len(),
            move_duration.as_secs_f64(),
        );
        if !moves.failures.is_empty() {
            return Err(Error::MoveFailed(moves.failures));
        }

        // Phase 4: Cleanup
        let cleanup_start = Instant::now();
        let removed = cleanup::remove_empty_dirs(root)?;
        let cleanup_duration = cleanup_start.elapsed();
        reporter.on_cleanup_complete(removed.len(), cleanup_duration.as_secs_f64());
        debug!("{} empty directories removed", removed.len());

        // Phase 5: Archives
        let extract_start = Instant::now();
        let archives = if self.config.extract_archives {
            reporter.on_extract_start();
            let summary = archive::expand_archives(root)?;
            reporter.on_extract_complete(
                summary.expanded.len(),
                summary.skipped.len(),
                extract_start.elapsed().as_secs_f64(),
            );
            summary
        } else {
            debug!("Archive expansion disabled");
            ArchiveSummary::default()
        };
        let extract_duration = extract_start.elapsed();

        // Phase 6: Report
        let report = report::build_report(root)?;
        let total_duration = run_start.elapsed();
        info!(
            "Sorted {} files in {:.2}s",
            report.total_files(),
            total_duration.as_secs_f64()
        );

        Ok(SortResult {
            report,
            moves,
            archives,
            renamed: walk.renamed,
            removed_dirs: removed.len(),
            normalize_duration,
            move_duration,
            cleanup_duration,
            extract_duration,
            total_duration,
        })
    }
}

fn validate_root(root: &Path) -> Result<(), Error> {
    let invalid = |reason: &str| Error::InvalidRoot {
        path: root.to_path_buf(),
        reason: reason.to_string(),
    };
    let metadata = std::fs::metadata(root).map_err(|err| invalid(&err.to_string()))?;
    if !metadata.is_dir() {
        return Err(invalid("not a directory"));
    }
    Ok(())
}
