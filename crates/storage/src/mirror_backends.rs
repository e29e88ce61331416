//! Backends for the local mirror.
//!
//! - `MemoryMirrorStore`: process-local map, used in tests and as a
//!   stand-in when no durable medium is configured
//! - `FileMirrorStore`: one file per key under a directory, survives restarts

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::error::{LocalResult, LocalStoreError};
use crate::mirror::LocalMirrorStore;

/// In-memory mirror backend.
#[derive(Debug, Default)]
pub struct MemoryMirrorStore {
    entries: RwLock<HashMap<String, String>>,
    read_only: AtomicBool,
}

impl MemoryMirrorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, as a full or locked storage would.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Release);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn check_writable(&self) -> LocalResult<()> {
        if self.read_only.load(Ordering::Acquire) {
            return Err(LocalStoreError::Unavailable {
                reason: "store is read-only".to_string(),
            });
        }
        Ok(())
    }
}

impl LocalMirrorStore for MemoryMirrorStore {
    fn get(&self, key: &str) -> LocalResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LocalResult<()> {
        self.check_writable()?;
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> LocalResult<()> {
        self.check_writable()?;
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Directory-backed mirror: each key is a file, written via rename so a
/// crash never leaves a half-written entry.
#[derive(Debug)]
pub struct FileMirrorStore {
    dir: PathBuf,
}

impl FileMirrorStore {
    /// Open (creating if needed) a mirror rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> LocalResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| LocalStoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the entries.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are short ASCII names; anything else is replaced so a key can
        // never escape the directory.
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.entry", name))
    }

    fn io_err(key: &str, source: io::Error) -> LocalStoreError {
        LocalStoreError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl LocalMirrorStore for FileMirrorStore {
    fn get(&self, key: &str) -> LocalResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_err(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> LocalResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(|e| Self::io_err(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| Self::io_err(key, e))
    }

    fn remove(&self, key: &str) -> LocalResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err(key, e)),
        }
    }
}
