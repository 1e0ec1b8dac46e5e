//! JSON file persistence for the attendee collection.
//!
//! The whole collection is read at the start of every operation and written
//! back in full after a mutation. [`AttendeeStore::update`] holds an async
//! lock across load, mutate and save so concurrent requests in one process
//! cannot overwrite each other. Saves go through a temp file and a rename,
//! which keeps unlocked readers from ever seeing a partial file.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::checkin::Attendee;
use crate::error::StorageError;

/// Outcome of an [`AttendeeStore::update`] closure.
#[derive(Debug)]
pub enum Mutation<T> {
    /// The collection changed and must be written back.
    Commit(T),
    /// Nothing changed; skip the write.
    Skip(T),
}

pub struct AttendeeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AttendeeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    pub async fn load(&self) -> Result<Vec<Attendee>, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::Missing {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let attendees: Vec<Attendee> = serde_json::from_slice(&bytes)?;
        ensure_unique_tokens(&attendees)?;
        debug!(path = %self.path.display(), count = attendees.len(), "loaded attendees");
        Ok(attendees)
    }

    pub async fn save(&self, attendees: &[Attendee]) -> Result<(), StorageError> {
        let bytes = encode(attendees)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), count = attendees.len(), "saved attendees");
        Ok(())
    }

    /// Load, apply `f`, and save if `f` committed. Runs under the store's
    /// write lock.
    pub async fn update<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Vec<Attendee>) -> Mutation<T>,
    {
        let _guard = self.write_lock.lock().await;
        let mut attendees = self.load().await?;
        match f(&mut attendees) {
            Mutation::Commit(value) => {
                self.save(&attendees).await?;
                Ok(value)
            }
            Mutation::Skip(value) => Ok(value),
        }
    }

    /// Overwrite the whole collection.
    pub async fn replace(&self, attendees: &[Attendee]) -> Result<(), StorageError> {
        ensure_unique_tokens(attendees)?;
        let _guard = self.write_lock.lock().await;
        self.save(attendees).await
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

// Four-space indent, same layout the data files have always used.
fn encode(attendees: &[Attendee]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    attendees.serialize(&mut ser)?;
    Ok(out)
}

fn ensure_unique_tokens(attendees: &[Attendee]) -> Result<(), StorageError> {
    let mut seen = HashSet::with_capacity(attendees.len());
    for a in attendees {
        if !seen.insert(a.token.as_str()) {
            return Err(StorageError::DuplicateToken(a.token.clone()));
        }
    }
    Ok(())
}
