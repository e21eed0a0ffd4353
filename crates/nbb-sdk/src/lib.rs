//! High-level client for NodeBB forums.
//!
//! Forums, users and topics are immutable snapshots of what the server
//! returned when they were fetched. None of them declares its fields: any
//! key the server sends can be read through [`Entity::resolve`], which also
//! follows the entity type's aliases and turns timestamp-looking scalars
//! into `DateTime<Utc>` values.
//!
//! ```no_run
//! use nbb_sdk::{Entity, Forum};
//!
//! # fn main() -> nbb_sdk::SdkResult<()> {
//! let forum = Forum::connect("https://forum.example.com/")?;
//! println!("{}", forum.title());
//!
//! let user = forum.user("Webmaster4o")?;
//! println!("joined {:?}", user.resolve("joindate")?);
//!
//! for topic in forum.topics()? {
//!     println!("{} by {}", topic.resolve("title")?, topic.author_username()?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod avatar;
pub mod config;
pub mod error;
pub mod forum;
pub mod site;
pub mod topic;
pub mod user;

#[cfg(test)]
mod fixtures;

pub use avatar::{Avatar, AvatarImage};
pub use config::ClientConfig;
pub use error::{SdkError, SdkResult};
pub use forum::{Forum, NODEBB, POWERED_BY_HEADER};
pub use site::Site;
pub use topic::Topic;
pub use user::User;

// Re-export key types
pub use nbb_entity::{AliasTable, Entity, EntityError};
pub use nbb_transport::{HttpTransport, InMemoryTransport, RetryPolicy, Transport, TransportConfig, TransportError};
pub use nbb_types::{AttrValue, AttributeMap, Value};
