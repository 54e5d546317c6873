//! Resources domain - ordered, typed content records
//!
//! Every admin-managed collection of the site (hero slides, news, case
//! studies, team members, partners, library items, journal publications,
//! toolkits, essentials, award recipients, gallery photos) is a set of
//! `ResourceRecord`s partitioned by (kind, scope).
//!
//! Responsibilities:
//! - Per-kind payload schemas and validation (models)
//! - Dense manual display order within a partition (ordering)
//! - Independent active/featured flags (visibility)
//! - CRUD and atomic reorder commands over a repository (store)
//! - Read-only projection of active records (public)

pub mod errors;
pub mod models;
pub mod ordering;
pub mod public;
pub mod store;
pub mod visibility;

pub use errors::{ResourceError, ResourceResult};
pub use public::PublicReader;
pub use store::{ReadFilter, ResourceStore};
pub use visibility::{Visibility, VisibilityChange, VisibilityState};
