//! Pending-file list of one user session.
//!
//! The list is plain data with a reducer ([`PendingList::apply`]) so the
//! front end only decides *which* action happened; what the action does to
//! the list is decided here and can be tested without a browser.

use std::collections::HashSet;
use std::fmt;

use bytes::Bytes;
use tracing::debug;

use crate::error::Result;
use crate::merge::{CombinedDocument, Combiner, DocumentSource};

/// Identity of an uploaded file: its name plus its size in bytes.
///
/// Two uploads with the same name and size are considered the same file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(name: &str, byte_len: usize) -> Self {
        Self(format!("{name}-{byte_len}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file as received from the front end.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A file waiting to be combined.
#[derive(Debug, Clone)]
pub struct PendingFile {
    name: String,
    bytes: Bytes,
    key: IdentityKey,
}

impl PendingFile {
    pub fn new(upload: Upload) -> Self {
        let key = IdentityKey::new(&upload.name, upload.bytes.len());
        Self {
            name: upload.name,
            bytes: upload.bytes,
            key,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub const fn key(&self) -> &IdentityKey {
        &self.key
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Direction of a one-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward index 0
    Up,
    /// Toward the end
    Down,
}

/// A user action against the list.
#[derive(Debug, Clone)]
pub enum Action {
    Add(Vec<Upload>),
    Move { key: String, direction: Direction },
    Remove { key: String },
    Clear,
}

/// What an [`Action`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Number of files appended (duplicates are not counted)
    Added(usize),
    /// Whether the entry actually moved
    Moved(bool),
    /// Whether an entry was removed
    Removed(bool),
    Cleared,
}

impl Outcome {
    /// Whether the list changed.
    pub const fn changed(self) -> bool {
        match self {
            Self::Added(n) => n > 0,
            Self::Moved(moved) => moved,
            Self::Removed(removed) => removed,
            Self::Cleared => true,
        }
    }
}

/// Ordered list of pending files. Starts empty.
#[derive(Debug, Clone, Default)]
pub struct PendingList {
    files: Vec<PendingFile>,
}

impl PendingList {
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingFile> {
        self.files.iter()
    }

    /// Append uploads in order, skipping any whose identity key is already
    /// listed (including earlier items of the same batch).
    ///
    /// Returns the number of files appended.
    pub fn add(&mut self, uploads: impl IntoIterator<Item = Upload>) -> usize {
        let mut added = 0;
        for upload in uploads {
            let file = PendingFile::new(upload);
            if self.position(file.key.as_str()).is_some() {
                debug!("Ignoring duplicate upload {}", file.key);
                continue;
            }
            self.files.push(file);
            added += 1;
        }
        added
    }

    /// Swap the entry at `index` with its neighbour in `direction`.
    ///
    /// No-op (returns false) when there is no such neighbour.
    pub fn move_entry(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };

        match target {
            Some(target) if index < self.files.len() && target < self.files.len() => {
                self.files.swap(index, target);
                true
            }
            _ => false,
        }
    }

    /// Remove the entry at `index`; the others keep their relative order.
    pub fn remove(&mut self, index: usize) -> Option<PendingFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    /// Remove the entry with identity key `key`.
    pub fn remove_key(&mut self, key: &str) -> Option<PendingFile> {
        let index = self.position(key)?;
        self.remove(index)
    }

    /// Index of the entry with identity key `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.files.iter().position(|f| f.key.as_str() == key)
    }

    /// Names in list order; the merge order for a combine.
    pub fn snapshot_order(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Drop the entries that `combined` holds, keeping anything added since.
    ///
    /// Returns the number of entries dropped.
    pub fn remove_combined(&mut self, combined: &Self) -> usize {
        let keys: HashSet<&IdentityKey> = combined.files.iter().map(|f| &f.key).collect();
        let before = self.files.len();
        self.files.retain(|f| !keys.contains(&f.key));
        before - self.files.len()
    }

    /// Apply one user action.
    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::Add(uploads) => Outcome::Added(self.add(uploads)),
            Action::Move { key, direction } => Outcome::Moved(
                self.position(&key)
                    .is_some_and(|index| self.move_entry(index, direction)),
            ),
            Action::Remove { key } => Outcome::Removed(self.remove_key(&key).is_some()),
            Action::Clear => {
                self.clear();
                Outcome::Cleared
            }
        }
    }

    /// Reducer form of [`PendingList::apply`]: `(state, action) -> state`.
    #[must_use]
    pub fn reduce(mut self, action: Action) -> Self {
        self.apply(action);
        self
    }

    /// In-memory sources for the merge engine, in list order.
    pub fn to_sources(&self) -> Vec<DocumentSource> {
        self.files
            .iter()
            .map(|f| DocumentSource::Memory {
                name: f.name.clone(),
                bytes: f.bytes.clone(),
            })
            .collect()
    }

    /// Combine the listed files in list order.
    ///
    /// The list itself is left untouched; clearing it after a successful
    /// combine is up to the caller.
    pub fn combine(&self, combiner: &Combiner) -> Result<CombinedDocument> {
        combiner.combine(&self.to_sources(), &self.snapshot_order())
    }
}
