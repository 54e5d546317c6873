/// Capabilities guarded by the admin gateway
///
/// Public reads of active records need no capability at all; everything else
/// the console does maps to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCapability {
    /// Create, edit, delete, and reorder records
    ManageContent,

    /// Read records regardless of visibility (`all=true`)
    ViewHidden,
}

impl AdminCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminCapability::ManageContent => "manage_content",
            AdminCapability::ViewHidden => "view_hidden",
        }
    }
}

impl std::fmt::Display for AdminCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
