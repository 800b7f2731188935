//! Persistence collaborator for photo collections.
//!
//! A store is a key-value map from [`PhotoId`] to [`PhotoEntity`]. The
//! collection sends each logical mutation as one batch of [`StoreOp`]s so a
//! backend can apply it in a single round trip. Nothing is assumed about
//! durability beyond "last write wins, reads see prior writes".

use std::collections::BTreeMap;
use thiserror::Error;

use super::entity::{PhotoEntity, PhotoId};

/// Errors reported by a store backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Corrupt stored record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One write in a batch.
#[derive(Debug, Clone, Copy)]
pub enum StoreOp<'a> {
    Put(&'a PhotoEntity),
    Delete(PhotoId),
    Clear,
}

/// Key-value persistence keyed by photo id.
pub trait PhotoStore {
    /// Every stored photo, in no particular order.
    fn load_all(&self) -> StoreResult<Vec<PhotoEntity>>;

    /// Apply a batch of writes in order.
    fn apply(&mut self, ops: &[StoreOp<'_>]) -> StoreResult<()>;

    fn put(&mut self, photo: &PhotoEntity) -> StoreResult<()> {
        self.apply(&[StoreOp::Put(photo)])
    }

    fn put_many(&mut self, photos: &[PhotoEntity]) -> StoreResult<()> {
        let ops: Vec<StoreOp<'_>> = photos.iter().map(StoreOp::Put).collect();
        self.apply(&ops)
    }

    fn delete(&mut self, id: PhotoId) -> StoreResult<()> {
        self.apply(&[StoreOp::Delete(id)])
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.apply(&[StoreOp::Clear])
    }
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<PhotoId, PhotoEntity>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PhotoId) -> Option<&PhotoEntity> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PhotoStore for MemoryStore {
    fn load_all(&self) -> StoreResult<Vec<PhotoEntity>> {
        Ok(self.records.values().cloned().collect())
    }

    fn apply(&mut self, ops: &[StoreOp<'_>]) -> StoreResult<()> {
        for op in ops {
            match op {
                StoreOp::Put(photo) => {
                    self.records.insert(photo.id(), (*photo).clone());
                }
                StoreOp::Delete(id) => {
                    self.records.remove(id);
                }
                StoreOp::Clear => self.records.clear(),
            }
        }
        Ok(())
    }
}

/// A change a [`JournalStore`] recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalEntry {
    Put(PhotoId),
    Delete(PhotoId),
    Clear,
}

/// A [`MemoryStore`] that remembers every write until drained.
///
/// Lets an outer shell mirror changes into its own storage.
#[derive(Debug, Clone, Default)]
pub struct JournalStore {
    inner: MemoryStore,
    journal: Vec<JournalEntry>,
}

impl JournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed records without journaling them.
    pub fn preload(&mut self, photos: impl IntoIterator<Item = PhotoEntity>) {
        for photo in photos {
            self.inner.records.insert(photo.id(), photo);
        }
    }

    pub fn get(&self, id: PhotoId) -> Option<&PhotoEntity> {
        self.inner.get(id)
    }

    /// Take the recorded changes, oldest first.
    pub fn drain(&mut self) -> Vec<JournalEntry> {
        std::mem::take(&mut self.journal)
    }
}

impl PhotoStore for JournalStore {
    fn load_all(&self) -> StoreResult<Vec<PhotoEntity>> {
        self.inner.load_all()
    }

    fn apply(&mut self, ops: &[StoreOp<'_>]) -> StoreResult<()> {
        self.inner.apply(ops)?;
        self.journal.extend(ops.iter().map(|op| match op {
            StoreOp::Put(photo) => JournalEntry::Put(photo.id()),
            StoreOp::Delete(id) => JournalEntry::Delete(*id),
            StoreOp::Clear => JournalEntry::Clear,
        }));
        Ok(())
    }
}
