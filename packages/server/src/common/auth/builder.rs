use super::{AdminCapability, AuthError};

/// Entry point for authorization checks
///
/// Usage:
/// ```
/// use server_core::common::{Actor, AdminCapability};
///
/// let result = Actor::new("editor@example.org", true)
///     .can(AdminCapability::ManageContent)
///     .check();
/// assert!(result.is_ok());
/// ```
pub struct Actor {
    subject: String,
    is_admin: bool,
}

impl Actor {
    /// Create a new actor for authorization checks
    ///
    /// `is_admin` comes from verified token claims; the gateway never trusts
    /// anything the request body says about the caller.
    pub fn new(subject: impl Into<String>, is_admin: bool) -> Self {
        Self {
            subject: subject.into(),
            is_admin,
        }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: AdminCapability) -> CapabilityBuilder {
        CapabilityBuilder {
            subject: self.subject,
            is_admin: self.is_admin,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    subject: String,
    is_admin: bool,
    capability: AdminCapability,
}

impl CapabilityBuilder {
    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        if !self.is_admin {
            tracing::debug!(
                subject = %self.subject,
                capability = %self.capability,
                "Capability denied"
            );
            return Err(AuthError::AdminRequired);
        }

        Ok(())
    }
}
