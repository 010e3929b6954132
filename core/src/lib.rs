//! Tag-overlap recommendations over a corpus of tagged items.
//!
//! [`weighted::WeightedList`] keeps values ordered by weight, [`similarity`]
//! scores the overlap between two [`entity::TaggedEntity`] values, and
//! [`related::related_to`] ranks a corpus against a query. [`catalog`],
//! [`persist`] and [`tags`] supply the book-specific plumbing around that core.

pub mod catalog;
pub mod entity;
pub mod persist;
pub mod related;
pub mod similarity;
pub mod tags;
pub mod weighted;

pub use catalog::{Catalog, CatalogError};
pub use entity::{Author, Book, NewBook, TaggedEntity};
pub use related::related_to;
pub use similarity::{rank, shared_tags};
pub use weighted::{Weight, WeightEntry, WeightedList, WeightedListError};
