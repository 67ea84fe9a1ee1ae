use chrono::Local;
use fern::Dispatch;
use log::{info, LevelFilter};
use std::{fs, io, path::Path};
use crate::config::Config;

/// The log file is rotated at startup once it grows past this size.
const MAX_LOG_BYTES: u64 = 1_000_000;

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info, // unknown levels fall back to info
    }
}

/// Moves an oversized log to `<file>.1`, replacing the previous backup.
/// Returns whether a rotation happened.
fn rotate_if_oversized(path: &Path, max_bytes: u64) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > max_bytes => {
            let mut backup = path.as_os_str().to_owned();
            backup.push(".1");
            fs::rename(path, backup)?;
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn init_logging(config: &Config) -> Result<(), fern::InitError> {
    let rotated = rotate_if_oversized(Path::new(&config.log_file), MAX_LOG_BYTES)?;

    Dispatch::new()
        .level(parse_level(&config.log_level))
        // reqwest/hyper are noisy at debug
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(std::io::stdout())
        .chain(fern::log_file(&config.log_file)?)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .apply()?;

    info!("Logging initialized with level: {} (file: {})", config.log_level, config.log_file);
    if rotated {
        info!("Previous log moved to {}.1", config.log_file);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
    }

    #[test]
    fn oversized_log_is_moved_to_backup() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("dashboard.log");
        let backup = dir.path().join("dashboard.log.1");

        assert!(!rotate_if_oversized(&log, 10).unwrap());

        fs::write(&log, "short").unwrap();
        assert!(!rotate_if_oversized(&log, 10).unwrap());
        assert!(log.exists());

        fs::write(&backup, "old backup").unwrap();
        fs::write(&log, "x".repeat(64)).unwrap();
        assert!(rotate_if_oversized(&log, 10).unwrap());
        assert!(!log.exists());
        assert_eq!(fs::read_to_string(&backup).unwrap().len(), 64);
    }
}
