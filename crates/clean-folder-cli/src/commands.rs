use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "clean-folder")]
#[command(about = "Sort a messy folder into category subdirectories, in place", long_about = None)]
pub struct Cli {
    /// Directory to sort. Its content is renamed, moved and deleted in place.
    pub root: PathBuf,

    /// Maximum number of concurrent move/delete operations
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Leave archives packed instead of expanding them
    #[arg(long)]
    pub no_extract: bool,

    /// Also write the final report to a CSV file (category,file_name)
    #[arg(long, value_name = "FILE")]
    pub report_csv: Option<PathBuf>,
}
