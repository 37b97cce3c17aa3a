//! On-disk record of a background instance's process id.
//!
//! A background instance is identified by a plain text file named
//! `<name>.pid` holding the decimal pid. The file is overwritten on every
//! start and never removed; a stale file is indistinguishable from a live
//! one, and `stop` trusts whatever the file says. No locking is performed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ServiceError};

/// Handle to a pidfile at a fixed path.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Pidfile for `name` in the current working directory: `<name>.pid`.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        Self {
            path: PathBuf::from(format!("{name}.pid")),
        }
    }

    /// Pidfile for `name` in an explicit directory.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{name}.pid")),
        }
    }

    /// Returns the pidfile path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `pid` as decimal text, replacing any existing content.
    pub fn write(&self, pid: u32) -> Result<()> {
        fs::write(&self.path, pid.to_string())?;
        Ok(())
    }

    /// Reads the recorded pid.
    ///
    /// Missing or unreadable files surface as [`ServiceError::Io`];
    /// non-integer content as [`ServiceError::InvalidPid`].
    pub fn read(&self) -> Result<u32> {
        let content = fs::read_to_string(&self.path)?;
        let trimmed = content.trim();
        trimmed.parse().map_err(|_| ServiceError::InvalidPid {
            path: self.path.clone(),
            content: trimmed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sereno-pidfile-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let pidfile = PidFile::in_dir(&dir, "svc");

        for pid in [0u32, 1, 4242, u32::MAX] {
            pidfile.write(pid).unwrap();
            assert_eq!(pidfile.read().unwrap(), pid);
        }
    }

    #[test]
    fn test_write_overwrites() {
        let dir = scratch_dir("overwrite");
        let pidfile = PidFile::in_dir(&dir, "svc");

        pidfile.write(111).unwrap();
        pidfile.write(222).unwrap();
        assert_eq!(pidfile.read().unwrap(), 222);
    }

    #[test]
    fn test_read_trims_whitespace() {
        let dir = scratch_dir("trim");
        let pidfile = PidFile::in_dir(&dir, "svc");

        fs::write(pidfile.path(), "  987\n").unwrap();
        assert_eq!(pidfile.read().unwrap(), 987);
    }

    #[test]
    fn test_read_missing_is_io_error() {
        let dir = scratch_dir("missing");
        let pidfile = PidFile::in_dir(&dir, "never-started");

        let err = pidfile.read().unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
    }

    #[test]
    fn test_read_garbage_is_invalid_pid() {
        let dir = scratch_dir("garbage");
        let pidfile = PidFile::in_dir(&dir, "svc");

        fs::write(pidfile.path(), "not-a-pid").unwrap();
        let err = pidfile.read().unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPid { .. }));
    }

    #[test]
    fn test_path_naming() {
        let pidfile = PidFile::for_name("worker");
        assert_eq!(pidfile.path(), Path::new("worker.pid"));
    }
}
