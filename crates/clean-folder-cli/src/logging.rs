use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "clean-folder.log";

pub fn init_logger() -> impl Drop {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::new(filter);

    // Defaults to the temp dir: the working directory may be the tree being sorted.
    let log_file_path = env::var("LOG_FILE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join(DEFAULT_LOG_FILE));
    let log_dir = log_file_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new(DEFAULT_LOG_FILE));

    let file_appender = tracing_appender::rolling::never(log_dir, log_file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .without_time()
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    info!("Logging to stdout and {}", log_file_path.display());

    guard
}
