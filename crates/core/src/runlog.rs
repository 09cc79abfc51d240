use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::error;

/// Append-only run log. One writer, opened once per run, written
/// sequentially. Logging is best-effort: if the file cannot be opened the
/// sink degrades to disabled and the run continues.
pub struct RunLog {
    file: Option<std::fs::File>,
}

impl RunLog {
    pub fn open(path: &Path) -> RunLog {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => RunLog { file: Some(file) },
            Err(e) => {
                error!("unable to open log file {}: {}", path.display(), e);
                RunLog { file: None }
            }
        }
    }

    /// A sink that discards everything. Used by tests and --args-only runs.
    pub fn disabled() -> RunLog {
        RunLog { file: None }
    }

    /// Write one timestamped line. Write errors are swallowed; a failing log
    /// must not fail the run.
    pub fn line(&mut self, msg: &str) {
        if let Some(file) = self.file.as_mut() {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let _ = writeln!(file, "{} ffront: {}", stamp, msg);
        }
    }

    /// Write raw multi-line text, such as captured subprocess output.
    pub fn raw(&mut self, text: &str) {
        if let Some(file) = self.file.as_mut() {
            let _ = writeln!(file, "{}", text);
        }
    }
}

/// Pick the log file path. An explicit path wins when its directory exists;
/// otherwise the log lands next to the output file as `<outfile>.log`.
pub fn resolve_log_path(logfile: Option<&Path>, outfile: &str) -> PathBuf {
    let default = PathBuf::from(format!("{}.log", outfile));

    let Some(path) = logfile else {
        return default;
    };

    // A bare file name has an empty parent, which means the current directory
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if dir.is_dir() {
        path.to_path_buf()
    } else {
        default
    }
}
