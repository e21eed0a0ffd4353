//! Entity base for the NodeBB client.
//!
//! An entity is an immutable snapshot of one remote resource. Its attributes
//! are whatever keys the server returned; nothing is declared per field.
//! Reading a key goes through one resolution path shared by every entity
//! type:
//!
//! 1. a key stored in the entity's [`AttributeMap`] is returned, coerced;
//! 2. a key declared in the entity type's [`AliasTable`] resolves its target;
//! 3. anything else is [`EntityError::AttributeNotFound`].
//!
//! Entities can also be dumped to disk as sorted, indented JSON.

pub mod alias;
pub mod dump;
pub mod entity;
pub mod error;

pub use alias::{AliasTable, MAX_ALIAS_HOPS};
pub use dump::{render_snapshot, snapshot_file_name};
pub use entity::{merge_documents, resolve, Entity};
pub use error::{EntityError, EntityResult};

pub use nbb_types::{AttrValue, AttributeMap, Value};
