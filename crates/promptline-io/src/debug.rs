//! Debug logging backend for promptline
//!
//! Terminal prompts own stdout, so log records cannot go there. When
//! `PROMPTLINE_DEBUG` is `1` or `true`, [`init`] installs a [`log`] backend that
//! appends every record to `tmp/promptline-debug.log` (or
//! `/tmp/promptline-debug.log` when there is no `tmp/` directory).

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

const ENV_ENABLE_LOG: &str = "PROMPTLINE_DEBUG";

struct FileLogger {
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "[{timestamp}] {:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
            let _ = file.flush();
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Whether the environment asks for a debug log
pub fn enabled_by_env() -> bool {
    matches!(
        std::env::var(ENV_ENABLE_LOG).as_deref(),
        Ok("1") | Ok("true")
    )
}

fn log_path() -> &'static str {
    if std::path::Path::new("tmp").exists() {
        "tmp/promptline-debug.log"
    } else {
        "/tmp/promptline-debug.log"
    }
}

/// Install the file logger if the environment enables it. Only the first call
/// has any effect; a logger installed elsewhere is left in place.
pub fn init() {
    INIT.call_once(|| {
        if !enabled_by_env() {
            return;
        }

        let path = log_path();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let logger = FileLogger {
                    file: Mutex::new(file),
                };
                if log::set_boxed_logger(Box::new(logger)).is_ok() {
                    log::set_max_level(LevelFilter::Trace);
                    eprintln!("promptline debug log enabled: {path}");
                }
            }
            Err(e) => {
                eprintln!("Failed to open debug log file {path}: {e}");
            }
        }
    });
}
