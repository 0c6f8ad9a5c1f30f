pub mod archive;
pub mod category;
pub mod cleanup;
pub mod config;
pub mod engine;
pub mod error;
pub mod mover;
pub mod normalize;
pub mod planner;
pub mod progress;
pub mod report;
pub mod scanner;

pub use category::Category;
pub use config::AppConfig;
pub use engine::{SortEngine, SortResult};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use report::RunReport;
