/// Trait for reporting sort progress.
///
/// The CLI implements it with indicatif bars; tests and library callers use
/// [`SilentReporter`]. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_normalize_start(&self) {}
    fn on_normalize_complete(&self, _entries: usize, _renamed: usize, _duration_secs: f64) {}
    fn on_plan_complete(&self, _moves: usize, _deletions: usize) {}
    fn on_move_start(&self, _total: usize) {}
    fn on_move_progress(&self, _completed: usize, _total: usize) {}
    fn on_move_complete(&self, _moved: usize, _deleted: usize, _failed: usize, _duration_secs: f64) {}
    fn on_cleanup_complete(&self, _removed: usize, _duration_secs: f64) {}
    fn on_extract_start(&self) {}
    fn on_extract_complete(&self, _expanded: usize, _skipped: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
