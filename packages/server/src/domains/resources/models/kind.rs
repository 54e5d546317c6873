use serde::{Deserialize, Serialize};

use crate::domains::resources::ResourceError;

/// Library shelves a library item can sit on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LibraryCategory {
    Blog,
    Publication,
    Video,
    Book,
    News,
}

impl LibraryCategory {
    pub const ALL: [LibraryCategory; 5] = [
        LibraryCategory::Blog,
        LibraryCategory::Publication,
        LibraryCategory::Video,
        LibraryCategory::Book,
        LibraryCategory::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryCategory::Blog => "blog",
            LibraryCategory::Publication => "publication",
            LibraryCategory::Video => "video",
            LibraryCategory::Book => "book",
            LibraryCategory::News => "news",
        }
    }
}

impl std::str::FromStr for LibraryCategory {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(LibraryCategory::Blog),
            "publication" => Ok(LibraryCategory::Publication),
            "video" => Ok(LibraryCategory::Video),
            "book" => Ok(LibraryCategory::Book),
            "news" => Ok(LibraryCategory::News),
            _ => Err(ResourceError::Validation(format!(
                "Invalid library category: {}",
                s
            ))),
        }
    }
}

/// Closed set of record kinds managed by the console
///
/// Serialized as the camelCase discriminator the admin screens send
/// (`slide`, `caseStudy`, `libraryItem/video`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceKind {
    Slide,
    News,
    CaseStudy,
    TeamMember,
    Partner,
    LibraryItem(LibraryCategory),
    JournalPublication,
    Toolkit,
    Essential,
    Recipient,
    GalleryPhoto,
}

impl ResourceKind {
    pub fn all() -> Vec<ResourceKind> {
        let mut kinds = vec![
            ResourceKind::Slide,
            ResourceKind::News,
            ResourceKind::CaseStudy,
            ResourceKind::TeamMember,
            ResourceKind::Partner,
        ];
        kinds.extend(LibraryCategory::ALL.into_iter().map(ResourceKind::LibraryItem));
        kinds.extend([
            ResourceKind::JournalPublication,
            ResourceKind::Toolkit,
            ResourceKind::Essential,
            ResourceKind::Recipient,
            ResourceKind::GalleryPhoto,
        ]);
        kinds
    }

    /// Whether records of this kind can be part of a "featured" subset.
    pub fn supports_featured(&self) -> bool {
        matches!(
            self,
            ResourceKind::News
                | ResourceKind::CaseStudy
                | ResourceKind::LibraryItem(_)
                | ResourceKind::JournalPublication
                | ResourceKind::Toolkit
                | ResourceKind::GalleryPhoto
        )
    }

    /// Kinds that only make sense with an outbound link.
    pub fn requires_url(&self) -> bool {
        matches!(
            self,
            ResourceKind::Partner
                | ResourceKind::LibraryItem(LibraryCategory::Video)
                | ResourceKind::JournalPublication
                | ResourceKind::Toolkit
        )
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Slide => write!(f, "slide"),
            ResourceKind::News => write!(f, "news"),
            ResourceKind::CaseStudy => write!(f, "caseStudy"),
            ResourceKind::TeamMember => write!(f, "teamMember"),
            ResourceKind::Partner => write!(f, "partner"),
            ResourceKind::LibraryItem(category) => write!(f, "libraryItem/{}", category.as_str()),
            ResourceKind::JournalPublication => write!(f, "journalPublication"),
            ResourceKind::Toolkit => write!(f, "toolkit"),
            ResourceKind::Essential => write!(f, "essential"),
            ResourceKind::Recipient => write!(f, "recipient"),
            ResourceKind::GalleryPhoto => write!(f, "galleryPhoto"),
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(category) = s.strip_prefix("libraryItem/") {
            return category.parse().map(ResourceKind::LibraryItem);
        }

        match s {
            "slide" => Ok(ResourceKind::Slide),
            "news" => Ok(ResourceKind::News),
            "caseStudy" => Ok(ResourceKind::CaseStudy),
            "teamMember" => Ok(ResourceKind::TeamMember),
            "partner" => Ok(ResourceKind::Partner),
            "journalPublication" => Ok(ResourceKind::JournalPublication),
            "toolkit" => Ok(ResourceKind::Toolkit),
            "essential" => Ok(ResourceKind::Essential),
            "recipient" => Ok(ResourceKind::Recipient),
            "galleryPhoto" => Ok(ResourceKind::GalleryPhoto),
            _ => Err(ResourceError::Validation(format!(
                "Invalid resource kind: {}",
                s
            ))),
        }
    }
}

impl TryFrom<String> for ResourceKind {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.to_string()
    }
}

/// A (kind, scope) grouping within which display order is unique and dense
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Partition {
    pub kind: ResourceKind,
    pub scope: Option<String>,
}

impl Partition {
    /// Blank scopes collapse to "no scope" so `?scope=` and a missing
    /// parameter address the same partition.
    pub fn new(kind: ResourceKind, scope: Option<String>) -> Self {
        Self {
            kind,
            scope: normalize_scope(scope),
        }
    }

    pub fn unscoped(kind: ResourceKind) -> Self {
        Self { kind, scope: None }
    }

    /// Stable string key, used for advisory locks and log fields.
    pub fn key(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}|{}", self.kind, scope),
            None => self.kind.to_string(),
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

pub fn normalize_scope(scope: Option<String>) -> Option<String> {
    scope
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
