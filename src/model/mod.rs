//! Domain model types.
//!
//! Rows, their categories, and the arena that owns them.

pub mod category;
pub mod entity;
pub mod error;
pub mod key_action;
pub mod store;

pub use category::{Bucket, Category, CategoryTraits, FilterClass};
pub use entity::{EntityId, InvalidRowHeight, LogEntity, NewEntry, RowHeight, RowKind};
pub use error::{AppError, ConsoleError, FilterError, InputError};
pub use key_action::KeyAction;
pub use store::{EntityStore, IndexRecord, StoreSnapshot};
