//! Logging setup
//!
//! Console output plus an append-only file per hour
//! (`<dir>/server_<YYYY-MM-DD-HH>.log`, local time). All file writes go
//! through one process-wide lock; a failing log file never stops the server.

use chrono::{DateTime, Local};
use parking_lot::{Mutex, MutexGuard};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Safe to call more than once.
///
/// `RUST_LOG` wins over `level` when set. Without `log_dir` only the
/// console layer is installed.
pub fn init(level: &str, log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let file_layer = log_dir.map(|dir| {
        tracing_subscriber::fmt::layer()
            .with_writer(HourlyFile::new(dir))
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init();
}

/// Log file name for the hour containing `at`
pub fn file_name(at: &DateTime<Local>) -> String {
    format!("server_{}.log", at.format("%Y-%m-%d-%H"))
}

/// Writer factory that rolls over to a new file every hour
pub struct HourlyFile {
    dir: PathBuf,
    state: Mutex<FileState>,
}

#[derive(Default)]
struct FileState {
    name: String,
    file: Option<File>,
    warned: bool,
}

impl HourlyFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            state: Mutex::new(FileState::default()),
        }
    }
}

impl FileState {
    fn current(&mut self, dir: &Path) -> io::Result<&mut File> {
        let name = file_name(&Local::now());
        if self.file.is_none() || self.name != name {
            std::fs::create_dir_all(dir)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(&name))?;
            self.file = Some(file);
            self.name = name;
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file not open"))
    }
}

/// One formatted event, written under the file lock
pub struct HourlyWriter<'a> {
    dir: &'a Path,
    state: MutexGuard<'a, FileState>,
}

impl Write for HourlyWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self
            .state
            .current(self.dir)
            .and_then(|file| file.write_all(buf));
        if let Err(e) = result {
            self.state.file = None;
            if !self.state.warned {
                self.state.warned = true;
                eprintln!("log file in {} unavailable: {}", self.dir.display(), e);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.state.file.as_mut() {
            let _ = file.flush();
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for HourlyFile {
    type Writer = HourlyWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        HourlyWriter {
            dir: &self.dir,
            state: self.state.lock(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_name() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        assert_eq!(file_name(&at), "server_2024-03-09-07.log");
    }

    #[test]
    fn test_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let logs = HourlyFile::new(&log_dir);

        logs.make_writer().write_all(b"first\n").unwrap();
        logs.make_writer().write_all(b"second\n").unwrap();

        // An hour boundary between the writes splits them over two files
        let mut text = String::new();
        let mut names: Vec<_> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        names.sort();
        for path in names {
            text.push_str(&std::fs::read_to_string(path).unwrap());
        }
        assert_eq!(text, "first\nsecond\n");
    }

    #[test]
    fn test_unwritable_dir_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let logs = HourlyFile::new(&blocker);
        let mut writer = logs.make_writer();
        assert_eq!(writer.write(b"line\n").unwrap(), 5);
        assert!(writer.flush().is_ok());
    }

    #[test]
    fn test_init_twice() {
        init("info", None);
        init("debug", None);
        tracing::info!("still alive");
    }
}
