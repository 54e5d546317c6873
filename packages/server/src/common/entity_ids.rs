//! Typed ID definitions for stored entities.
//!
//! ```rust
//! use server_core::common::ResourceId;
//!
//! let id: ResourceId = ResourceId::new();
//! assert_eq!(id, id.to_string().parse().unwrap());
//! ```

pub use super::id::Id;

/// Marker type for content records (slides, news items, team members, ...).
pub struct Resource;

/// Typed ID for content records.
pub type ResourceId = Id<Resource>;
