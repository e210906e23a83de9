use std::{
    fs::File,
    io::{LineWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use ibm1align::AlignError;
use stderrlog::Timestamp;

/// Logging setup arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[clap(short, long)]
    pub quiet: bool,

    /// Raise log verbosity above the default (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enable timestamped logging.
    #[clap(long)]
    pub ts: bool,

    /// Write log messages to this file (truncated) instead of stderr.
    #[arg(short = 'l', long)]
    pub logfile: Option<PathBuf>,
}

fn level_filter(level: u8) -> log::LevelFilter {
    match level {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Line-buffered logger writing `LEVEL - message` records to a file.
struct FileLogger {
    level: log::LevelFilter,
    writer: Mutex<LineWriter<File>>,
}

impl FileLogger {
    fn create(path: &Path, level: log::LevelFilter) -> Result<Self, AlignError> {
        let file = File::create(path).map_err(|source| AlignError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            level,
            writer: Mutex::new(LineWriter::new(file)),
        })
    }
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut writer) = self.writer.lock() {
            // Logging must never abort the run.
            let _ = writeln!(writer, "{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

impl LogArgs {
    pub fn setup_logging(&self, default: u8) -> Result<(), Box<dyn std::error::Error>> {
        let level = if self.quiet {
            0
        } else {
            default.saturating_add(self.verbose)
        };

        if let Some(path) = &self.logfile {
            let filter = level_filter(level);
            let logger = FileLogger::create(path, filter)?;
            log::set_boxed_logger(Box::new(logger))?;
            log::set_max_level(filter);
            return Ok(());
        }

        let log_level = match level {
            0 => stderrlog::LogLevelNum::Off,
            1 => stderrlog::LogLevelNum::Error,
            2 => stderrlog::LogLevelNum::Warn,
            3 => stderrlog::LogLevelNum::Info,
            4 => stderrlog::LogLevelNum::Debug,
            _ => stderrlog::LogLevelNum::Trace,
        };

        stderrlog::new()
            .quiet(self.quiet)
            .verbosity(log_level)
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(0), log::LevelFilter::Off);
        assert_eq!(level_filter(3), log::LevelFilter::Info);
        assert_eq!(level_filter(9), log::LevelFilter::Trace);
    }

    #[test]
    fn test_file_logger_writes_enabled_records() {
        tempdir::TempDir::new("logfile_test")
            .and_then(|dir| {
                let path = dir.path().join("align.log");
                let logger =
                    FileLogger::create(&path, log::LevelFilter::Info).expect("create failed");

                logger.log(
                    &log::Record::builder()
                        .args(format_args!("iter 1: log_likelihood = -2.5"))
                        .level(log::Level::Info)
                        .build(),
                );
                logger.log(
                    &log::Record::builder()
                        .args(format_args!("uniform prior: 2.5"))
                        .level(log::Level::Debug)
                        .build(),
                );
                logger.flush();

                let contents = std::fs::read_to_string(&path)?;
                assert_eq!(contents, "INFO - iter 1: log_likelihood = -2.5\n");
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_file_logger_reports_unwritable_path() {
        let err = FileLogger::create(
            Path::new("/nonexistent/dir/align.log"),
            log::LevelFilter::Info,
        )
        .err()
        .expect("expected an error");
        assert!(matches!(err, AlignError::Io { .. }));
    }
}
