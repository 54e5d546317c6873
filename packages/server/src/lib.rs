// Content Console - Ordered Resource Store
//
// This crate provides the backend for the site's admin console: typed content
// records (slides, news, team members, library items, ...) kept in a manual
// display order, with visibility flags, behind a bearer-token gateway.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
