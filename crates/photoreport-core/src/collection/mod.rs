//! The photo collection: entities, dense positions and persistence.
//!
//! - [`PhotoEntity`] holds an immutable original, a rotation angle, a
//!   caption and a position.
//! - [`PhotoCollection`] keeps positions dense under insert, move and remove.
//! - [`PhotoStore`] is the injected key-value persistence collaborator.

mod entity;
mod positioned;
mod store;

pub use entity::{OriginalImage, PhotoEntity, PhotoId};
pub use positioned::{CollectionError, PhotoCollection, Photos};
pub use store::{
    JournalEntry, JournalStore, MemoryStore, PhotoStore, StoreError, StoreOp, StoreResult,
};
