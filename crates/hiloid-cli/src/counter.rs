//! Single-host epoch counter persisted in a plain file.
//!
//! The counter file holds the last epoch handed out as decimal text. Each
//! acquisition takes an exclusive lock file next to it (created with
//! `create_new`, so only one process can hold it), bumps the value and
//! persists it with write-then-rename. The lock is released when the lease is
//! dropped, after the generator has installed the epoch.

use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use hiloid::{BoxError, EpochSource, Lease};

const LOCK_RETRIES: u32 = 50;
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(10);

/// An [`EpochSource`] backed by a counter file.
#[derive(Debug, Clone)]
pub struct FileCounterSource {
    path: PathBuf,
    lock_path: PathBuf,
    tmp_path: PathBuf,
}

impl FileCounterSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            lock_path: with_suffix(&path, ".lock"),
            tmp_path: with_suffix(&path, ".tmp"),
            path,
        }
    }

    /// Last value handed out, 0 if the file does not exist yet.
    pub fn last(&self) -> io::Result<i64> {
        match fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} is not a counter: {e}", self.path.display()),
                )
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn store(&self, value: i64) -> io::Result<()> {
        let mut tmp = File::create(&self.tmp_path)?;
        writeln!(tmp, "{value}")?;
        tmp.sync_all()?;
        fs::rename(&self.tmp_path, &self.path)
    }
}

impl EpochSource for FileCounterSource {
    fn acquire(&self) -> Result<Lease, BoxError> {
        let lock = FileLock::acquire(&self.lock_path)?;
        let next = self
            .last()?
            .checked_add(1)
            .ok_or("the counter overflowed")?;
        self.store(next)?;
        tracing::debug!(path = %self.path.display(), epoch = next, "counter bumped");

        Ok(Lease::with_cleanup(next, move || drop(lock)))
    }
}

/// Exclusive lock file, removed on drop.
#[derive(Debug)]
struct FileLock {
    path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> io::Result<Self> {
        let mut attempts = 0;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    // Best effort: the pid only helps humans clear stale locks.
                    let _ = writeln!(file, "{}", std::process::id());
                    return Ok(Self {
                        path: path.to_owned(),
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempts < LOCK_RETRIES => {
                    attempts += 1;
                    thread::sleep(LOCK_RETRY_DELAY);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    return Err(io::Error::new(
                        io::ErrorKind::WouldBlock,
                        format!(
                            "{} is held by another process; remove it if that process is gone",
                            path.display()
                        ),
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), "failed to remove lock file: {e}");
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiloid::{GeneratorConfig, HiLoGenerator, NoopLogger};

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "hiloid-cli-{}-{name}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn counter(&self) -> PathBuf {
            self.0.join("epoch.counter")
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn counts_from_one_and_persists() {
        let dir = TempDir::new("persist");
        let source = FileCounterSource::new(dir.counter());
        assert_eq!(source.last().unwrap(), 0);

        assert_eq!(source.acquire().unwrap().epoch(), 1);
        assert_eq!(source.acquire().unwrap().epoch(), 2);
        assert_eq!(fs::read_to_string(dir.counter()).unwrap(), "2\n");

        let reopened = FileCounterSource::new(dir.counter());
        assert_eq!(reopened.acquire().unwrap().epoch(), 3);
    }

    #[test]
    fn lock_is_held_until_lease_drops() {
        let dir = TempDir::new("lock");
        let source = FileCounterSource::new(dir.counter());
        let lock_path = with_suffix(&dir.counter(), ".lock");

        let lease = source.acquire().unwrap();
        assert!(lock_path.exists());
        drop(lease);
        assert!(!lock_path.exists());
        assert!(!with_suffix(&dir.counter(), ".tmp").exists());
    }

    #[test]
    fn held_lock_times_out() {
        let dir = TempDir::new("held");
        let source = FileCounterSource::new(dir.counter());
        let _held = source.acquire().unwrap();

        let err = source.acquire().unwrap_err();
        assert!(err.to_string().contains("held by another process"), "{err}");
        assert_eq!(source.last().unwrap(), 1);
    }

    #[test]
    fn corrupt_counter_releases_lock() {
        let dir = TempDir::new("corrupt");
        fs::write(dir.counter(), "not a number").unwrap();
        let source = FileCounterSource::new(dir.counter());

        let err = source.acquire().unwrap_err();
        assert!(err.to_string().contains("is not a counter"), "{err}");
        assert!(!with_suffix(&dir.counter(), ".lock").exists());
    }

    #[test]
    fn feeds_a_generator() {
        let dir = TempDir::new("generator");
        fs::write(dir.counter(), "41").unwrap();
        let generator: HiLoGenerator<NoopLogger> =
            HiLoGenerator::new(GeneratorConfig::new("file"));

        generator
            .load_epoch(FileCounterSource::new(dir.counter()))
            .unwrap();
        assert_eq!(generator.current_epoch(), 42);
        assert!(!with_suffix(&dir.counter(), ".lock").exists());

        generator.renew_now().unwrap();
        assert_eq!(generator.current_epoch(), 43);
        assert_eq!(generator.decode(generator.next()).epoch(), 43);
    }
}
