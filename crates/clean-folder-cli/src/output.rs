use clean_folder_core::mover::MoveFailure;
use clean_folder_core::{Category, RunReport};
use colored::*;
use std::collections::BTreeSet;
use std::path::Path;

pub fn print_report(report: &RunReport) {
    println!();
    for category in Category::ALL {
        let names = report.files_in(category);
        println!(
            "{} ({}): {}",
            category.as_str().bold(),
            format!("{}", names.len()).cyan(),
            names.join(", ")
        );
    }
    println!(
        "{}: {}",
        "Known extensions".green(),
        join_set(&report.known_extensions)
    );
    println!(
        "{}: {}",
        "Unknown extensions".yellow(),
        join_set(&report.unknown_extensions)
    );
    if !report.misplaced.is_empty() {
        println!(
            "{}: {}",
            "Outside any category".red(),
            report.misplaced.len()
        );
        for path in &report.misplaced {
            println!("  {}", path.display());
        }
    }
}

fn join_set(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// One line per failed move or delete.
pub fn move_failure_message(failure: &MoveFailure) -> String {
    match &failure.destination {
        Some(destination) => format!(
            "Could not move '{}' to '{}': {}",
            failure.source.display(),
            destination.display(),
            failure.error
        ),
        None => format!(
            "Could not delete duplicate '{}': {}",
            failure.source.display(),
            failure.error
        ),
    }
}

/// Write one `category,file_name` row per sorted file.
pub fn write_csv(report: &RunReport, path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["category", "file_name"])?;
    for (category, names) in &report.files {
        for name in names {
            writer.write_record([category.as_str(), name.as_str()])?;
        }
    }
    writer.flush()?;
    Ok(())
}
