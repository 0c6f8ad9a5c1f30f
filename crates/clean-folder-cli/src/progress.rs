use clean_folder_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Normalize phase: spinner (entry count unknown upfront)
/// - Move phase: progress bar (plan size known)
/// - Extract phase: spinner
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars(TICK_CHARS),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

impl Default for CliReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for CliReporter {
    fn on_normalize_start(&self) {
        self.set_bar(Self::spinner("Normalizing names..."));
    }

    fn on_normalize_complete(&self, entries: usize, renamed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Normalized: {} entries, {} renamed in {:.2}s",
            entries, renamed, duration_secs
        );
    }

    fn on_plan_complete(&self, moves: usize, deletions: usize) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Planned: {} moves, {} duplicates to delete",
            moves, deletions
        );
    }

    fn on_move_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Moving [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
            )
            .unwrap()
            .progress_chars("━╸─")
            .tick_chars(TICK_CHARS),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_move_progress(&self, completed: usize, _total: usize) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.set_position(completed as u64);
        }
    }

    fn on_move_complete(&self, moved: usize, deleted: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        let mark = if failed == 0 {
            "\x1b[32m✓\x1b[0m"
        } else {
            "\x1b[31m✗\x1b[0m"
        };
        eprintln!(
            "  {} Moved {} files, deleted {} duplicates, {} failed in {:.2}s",
            mark, moved, deleted, failed, duration_secs
        );
    }

    fn on_cleanup_complete(&self, removed: usize, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Removed {} empty directories in {:.2}s",
            removed, duration_secs
        );
    }

    fn on_extract_start(&self) {
        self.set_bar(Self::spinner("Expanding archives..."));
    }

    fn on_extract_complete(&self, expanded: usize, skipped: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Expanded {} archives, skipped {} in {:.2}s",
            expanded, skipped, duration_secs
        );
    }
}
