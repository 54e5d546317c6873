/// Authorization for the content console
///
/// Provides a fluent API for authorization checks at the gateway:
///
/// ```rust
/// use server_core::common::auth::{Actor, AdminCapability};
///
/// Actor::new("editor", true)
///     .can(AdminCapability::ViewHidden)
///     .check()
///     .unwrap();
/// ```

mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::AdminCapability;
pub use errors::AuthError;
