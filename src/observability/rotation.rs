//! Append-only trace file that rolls over by size.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Roll over once the live file passes 10 MB.
const ROLLOVER_BYTES: u64 = 10 * 1024 * 1024;

/// Rolled-over files kept next to the live one.
const KEPT_BACKUPS: usize = 3;

/// Line-oriented file writer with size-based rollover.
///
/// Rolled files are renamed to `<stem>.<UTC timestamp>.json`; only the newest
/// [`KEPT_BACKUPS`] survive.
pub struct RotatingFile {
    path: PathBuf,
    limit: u64,
    handle: Mutex<Option<File>>,
}

impl RotatingFile {
    /// Writer for `path`; the file is opened on first write.
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limit(path, ROLLOVER_BYTES)
    }

    const fn with_limit(path: PathBuf, limit: u64) -> Self {
        Self {
            path,
            limit,
            handle: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline and flushes.
    pub fn append_line(&self, line: &str) -> io::Result<()> {
        let mut handle = self
            .handle
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("trace file lock poisoned: {e}")))?;

        if fs::metadata(&self.path).is_ok_and(|m| m.len() > self.limit) {
            *handle = None;
            self.roll_over()?;
        }

        if handle.is_none() {
            *handle = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        let Some(file) = handle.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "trace file not open"));
        };

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn roll_over(&self) -> io::Result<()> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let stem = self.stem()?;
        fs::rename(&self.path, self.path.with_file_name(format!("{stem}.{stamp}.json")))?;
        self.prune_backups(&stem)
    }

    fn stem(&self) -> io::Result<String> {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(String::from)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "trace file has no name"))
    }

    fn prune_backups(&self, stem: &str) -> io::Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let prefix = format!("{stem}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| *path != self.path)
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(".json"))
            })
            .collect();

        // timestamps sort lexically; newest first
        backups.sort_unstable_by(|a, b| b.cmp(a));
        for stale in backups.iter().skip(KEPT_BACKUPS) {
            if let Err(e) = fs::remove_file(stale) {
                tracing::debug!(path = ?stale, error = %e, "could not remove old trace file");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabula-otlp.json");
        let file = RotatingFile::new(path.clone());

        file.append_line("{\"a\":1}").unwrap();
        file.append_line("{\"b\":2}").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn rolls_over_past_limit_and_keeps_few_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabula-otlp.json");
        let file = RotatingFile::with_limit(path.clone(), 4);

        for i in 0..6 {
            file.append_line(&format!("line-{i}")).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "line-5\n");
        let backups = fs::read_dir(dir.path()).unwrap().count() - 1;
        assert_eq!(backups, KEPT_BACKUPS);
    }
}
