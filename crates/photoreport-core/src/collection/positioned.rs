//! Dense 1..=N ordering with shift-range reindexing.
//!
//! Photos are held in a vector sorted by position, and `photos[i].position()`
//! is always `i + 1` between operations. Every mutation reindexes only the
//! slots it displaces and persists exactly those photos in one store batch.
//! If the store rejects the batch the in-memory state is rolled back, so the
//! collection and the store never disagree.

use log::{debug, info, warn};
use thiserror::Error;

use super::entity::{OriginalImage, PhotoEntity, PhotoId};
use super::store::{PhotoStore, StoreError, StoreOp};
use crate::transform::RotationAngle;
use crate::validation::{Caption, ValidationError};

/// Errors from collection operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Photo {0} not found")]
    NotFound(PhotoId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Iterator over photos in position order.
pub type Photos<'a> = std::slice::Iter<'a, PhotoEntity>;

/// An ordered photo collection backed by a [`PhotoStore`].
///
/// All mutations take `&mut self`, so operations on one collection are
/// serialized by construction.
#[derive(Debug)]
pub struct PhotoCollection<S: PhotoStore> {
    store: S,
    photos: Vec<PhotoEntity>,
    next_id: u64,
}

impl<S: PhotoStore> PhotoCollection<S> {
    /// Load a collection from a store.
    ///
    /// Stored positions that are not exactly `1..=N` (gaps or duplicates
    /// left by older reindexing policies) are renormalised in
    /// `(position, id)` order and written back in one batch.
    pub fn open(mut store: S) -> Result<Self, CollectionError> {
        let mut photos = store.load_all()?;
        photos.sort_by_key(|p| (p.position(), p.id()));

        let stale: Vec<usize> = photos
            .iter()
            .enumerate()
            .filter(|(idx, p)| p.position() != slot_position(*idx))
            .map(|(idx, _)| idx)
            .collect();

        if !stale.is_empty() {
            warn!(
                "renormalising {} of {} stored photo positions",
                stale.len(),
                photos.len()
            );
            for &idx in &stale {
                photos[idx].set_position(slot_position(idx));
            }
            let ops: Vec<StoreOp<'_>> = stale
                .iter()
                .map(|&idx| StoreOp::Put(&photos[idx]))
                .collect();
            store.apply(&ops)?;
        }

        let next_id = photos.iter().map(|p| p.id().0).max().map_or(1, |max| max + 1);
        debug!("opened collection with {} photos", photos.len());

        Ok(Self {
            store,
            photos,
            next_id,
        })
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Photos in position order. Call again to restart.
    pub fn list(&self) -> Photos<'_> {
        self.photos.iter()
    }

    /// Photos in position order, as a slice.
    pub fn as_slice(&self) -> &[PhotoEntity] {
        &self.photos
    }

    pub fn get(&self, id: PhotoId) -> Option<&PhotoEntity> {
        self.photos.iter().find(|p| p.id() == id)
    }

    /// The id the next inserted photo will receive.
    pub fn next_id(&self) -> PhotoId {
        PhotoId(self.next_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Append a photo at position N + 1.
    pub fn insert(&mut self, original: OriginalImage) -> Result<PhotoId, CollectionError> {
        let ids = self.insert_many(vec![original])?;
        Ok(ids[0])
    }

    /// Append several photos, in order, with one store batch.
    pub fn insert_many(
        &mut self,
        originals: Vec<OriginalImage>,
    ) -> Result<Vec<PhotoId>, CollectionError> {
        let start = self.photos.len();
        let first_id = self.next_id;

        for original in originals {
            let id = PhotoId(self.next_id);
            self.next_id += 1;
            let position = slot_position(self.photos.len());
            self.photos.push(PhotoEntity::new(id, original, position));
        }

        if let Err(e) = self.store.put_many(&self.photos[start..]) {
            self.photos.truncate(start);
            self.next_id = first_id;
            return Err(e.into());
        }

        let ids: Vec<PhotoId> = self.photos[start..].iter().map(PhotoEntity::id).collect();
        debug!(
            "inserted {} photos at positions {}..={}",
            ids.len(),
            start + 1,
            self.photos.len()
        );
        Ok(ids)
    }

    /// Move a photo to `target`, shifting the photos in between by one slot.
    ///
    /// Moving to the current position is a no-op. Only the slots from the
    /// old to the new position are touched.
    pub fn move_to(&mut self, id: PhotoId, target: u32) -> Result<(), CollectionError> {
        let old_idx = self.index_of(id)?;
        let len = self.photos.len() as u32;
        if target < 1 || target > len {
            return Err(ValidationError::PositionOutOfRange {
                position: target,
                len,
            }
            .into());
        }

        let new_idx = (target - 1) as usize;
        if new_idx == old_idx {
            return Ok(());
        }

        let (lo, hi) = (old_idx.min(new_idx), old_idx.max(new_idx));
        shift(&mut self.photos[lo..=hi], new_idx < old_idx);
        self.renumber(lo..=hi);

        if let Err(e) = self.store.put_many(&self.photos[lo..=hi]) {
            shift(&mut self.photos[lo..=hi], new_idx > old_idx);
            self.renumber(lo..=hi);
            return Err(e.into());
        }

        debug!("moved photo {id} from {} to {target}", old_idx + 1);
        Ok(())
    }

    /// Remove a photo and close the gap it leaves.
    ///
    /// Removing an unknown id is a no-op; returns whether a photo was removed.
    pub fn remove(&mut self, id: PhotoId) -> Result<bool, CollectionError> {
        let Some(idx) = self.photos.iter().position(|p| p.id() == id) else {
            return Ok(false);
        };

        let removed = self.photos.remove(idx);
        self.renumber(idx..self.photos.len());

        let mut ops = Vec::with_capacity(self.photos.len() - idx + 1);
        ops.push(StoreOp::Delete(id));
        ops.extend(self.photos[idx..].iter().map(StoreOp::Put));

        if let Err(e) = self.store.apply(&ops) {
            self.photos.insert(idx, removed);
            self.renumber(idx..self.photos.len());
            return Err(e.into());
        }

        debug!("removed photo {id} from position {}", idx + 1);
        Ok(true)
    }

    /// Remove every photo.
    pub fn clear(&mut self) -> Result<(), CollectionError> {
        self.store.clear()?;
        let count = self.photos.len();
        self.photos.clear();
        info!("cleared collection of {count} photos");
        Ok(())
    }

    /// Set a caption, truncating text past the caption bound.
    pub fn set_caption(&mut self, id: PhotoId, text: &str) -> Result<(), CollectionError> {
        let idx = self.index_of(id)?;
        let caption = Caption::new(text);
        if caption.as_str().len() < text.len() {
            warn!("caption for photo {id} truncated to {} characters", caption.len());
        }
        self.update(idx, |photo| photo.set_caption(caption))
    }

    /// Set the display angle. Metadata only; the original is untouched.
    pub fn set_rotation(&mut self, id: PhotoId, degrees: u32) -> Result<(), CollectionError> {
        let idx = self.index_of(id)?;
        let angle = RotationAngle::try_from(degrees)?;
        self.update(idx, |photo| photo.set_rotation(angle))
    }

    fn index_of(&self, id: PhotoId) -> Result<usize, CollectionError> {
        self.photos
            .iter()
            .position(|p| p.id() == id)
            .ok_or(CollectionError::NotFound(id))
    }

    /// Apply a change to a copy, persist it, then commit it.
    fn update(
        &mut self,
        idx: usize,
        change: impl FnOnce(&mut PhotoEntity) -> bool,
    ) -> Result<(), CollectionError> {
        let mut updated = self.photos[idx].clone();
        if !change(&mut updated) {
            return Ok(());
        }
        self.store.put(&updated)?;
        self.photos[idx] = updated;
        Ok(())
    }

    fn renumber(&mut self, range: impl IntoIterator<Item = usize>) {
        for idx in range {
            self.photos[idx].set_position(slot_position(idx));
        }
    }
}

/// Rotate a slice by one slot: towards the end when `right`, else towards the start.
fn shift(slots: &mut [PhotoEntity], right: bool) {
    if right {
        slots.rotate_right(1);
    } else {
        slots.rotate_left(1);
    }
}

#[inline]
fn slot_position(idx: usize) -> u32 {
    idx as u32 + 1
}
