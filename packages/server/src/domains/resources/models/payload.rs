//! Kind-specific payload schemas.
//!
//! The envelope (`id`, `kind`, `scope`, `order`, flags) is shared by every
//! record; the fields below it differ per kind. `ResourcePayload` is the sum of
//! those shapes and `ResourcePayload::from_fields` is the registry that picks
//! and validates the right one for a kind.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use super::kind::ResourceKind;
use crate::domains::resources::{ResourceError, ResourceResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SlidePayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewsPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CaseStudyPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TeamMemberPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartnerPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LibraryItemPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JournalPublicationPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolkitPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EssentialPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecipientPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GalleryPhotoPayload {
    pub title: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<String>,
}

/// Kind-indexed payload of a record.
///
/// Serializes as the bare inner object so it can be flattened into the
/// record envelope. Deserialization always goes through
/// [`ResourcePayload::from_fields`], because the shape depends on the kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourcePayload {
    Slide(SlidePayload),
    News(NewsPayload),
    CaseStudy(CaseStudyPayload),
    TeamMember(TeamMemberPayload),
    Partner(PartnerPayload),
    LibraryItem(LibraryItemPayload),
    JournalPublication(JournalPublicationPayload),
    Toolkit(ToolkitPayload),
    Essential(EssentialPayload),
    Recipient(RecipientPayload),
    GalleryPhoto(GalleryPhotoPayload),
}

fn parse<T: DeserializeOwned>(kind: ResourceKind, fields: Map<String, Value>) -> ResourceResult<T> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| ResourceError::Validation(format!("Invalid {} payload: {}", kind, e)))
}

impl ResourcePayload {
    /// Parse and validate the payload fields of a `kind` record.
    pub fn from_fields(kind: ResourceKind, fields: Map<String, Value>) -> ResourceResult<Self> {
        let payload = match kind {
            ResourceKind::Slide => ResourcePayload::Slide(parse(kind, fields)?),
            ResourceKind::News => ResourcePayload::News(parse(kind, fields)?),
            ResourceKind::CaseStudy => ResourcePayload::CaseStudy(parse(kind, fields)?),
            ResourceKind::TeamMember => ResourcePayload::TeamMember(parse(kind, fields)?),
            ResourceKind::Partner => ResourcePayload::Partner(parse(kind, fields)?),
            ResourceKind::LibraryItem(_) => ResourcePayload::LibraryItem(parse(kind, fields)?),
            ResourceKind::JournalPublication => {
                ResourcePayload::JournalPublication(parse(kind, fields)?)
            }
            ResourceKind::Toolkit => ResourcePayload::Toolkit(parse(kind, fields)?),
            ResourceKind::Essential => ResourcePayload::Essential(parse(kind, fields)?),
            ResourceKind::Recipient => ResourcePayload::Recipient(parse(kind, fields)?),
            ResourceKind::GalleryPhoto => ResourcePayload::GalleryPhoto(parse(kind, fields)?),
        };

        payload.validate(kind)?;
        Ok(payload)
    }

    /// Decode a stored payload (a JSON object) for a `kind` record.
    pub fn from_value(kind: ResourceKind, value: Value) -> ResourceResult<Self> {
        match value {
            Value::Object(fields) => Self::from_fields(kind, fields),
            other => Err(ResourceError::Validation(format!(
                "Payload for {} must be an object, got {}",
                kind, other
            ))),
        }
    }

    pub fn to_fields(&self) -> ResourceResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            _ => Err(ResourceError::Store(anyhow::anyhow!(
                "payload did not serialize to an object"
            ))),
        }
    }

    /// Overlay `patch` on the current fields and re-validate.
    ///
    /// A `null` in the patch clears an optional field.
    pub fn merge(&self, kind: ResourceKind, patch: Map<String, Value>) -> ResourceResult<Self> {
        let mut fields = self.to_fields()?;
        for (key, value) in patch {
            if value.is_null() {
                fields.remove(&key);
            } else {
                fields.insert(key, value);
            }
        }
        Self::from_fields(kind, fields)
    }

    /// The title-equivalent field (`title`, or `name` for people and partners).
    pub fn title(&self) -> &str {
        match self {
            ResourcePayload::Slide(p) => &p.title,
            ResourcePayload::News(p) => &p.title,
            ResourcePayload::CaseStudy(p) => &p.title,
            ResourcePayload::TeamMember(p) => &p.name,
            ResourcePayload::Partner(p) => &p.name,
            ResourcePayload::LibraryItem(p) => &p.title,
            ResourcePayload::JournalPublication(p) => &p.title,
            ResourcePayload::Toolkit(p) => &p.title,
            ResourcePayload::Essential(p) => &p.title,
            ResourcePayload::Recipient(p) => &p.name,
            ResourcePayload::GalleryPhoto(p) => &p.title,
        }
    }

    /// The primary outbound link, if the kind has one.
    pub fn url(&self) -> Option<&str> {
        match self {
            ResourcePayload::News(p) => p.url.as_deref(),
            ResourcePayload::Partner(p) => p.url.as_deref(),
            ResourcePayload::LibraryItem(p) => p.url.as_deref(),
            ResourcePayload::JournalPublication(p) => p.url.as_deref(),
            ResourcePayload::Toolkit(p) => p.url.as_deref(),
            ResourcePayload::Essential(p) => p.url.as_deref(),
            ResourcePayload::Slide(_)
            | ResourcePayload::CaseStudy(_)
            | ResourcePayload::TeamMember(_)
            | ResourcePayload::Recipient(_)
            | ResourcePayload::GalleryPhoto(_) => None,
        }
    }

    fn validate(&self, kind: ResourceKind) -> ResourceResult<()> {
        let title_field = match self {
            ResourcePayload::TeamMember(_)
            | ResourcePayload::Partner(_)
            | ResourcePayload::Recipient(_) => "name",
            _ => "title",
        };
        if self.title().trim().is_empty() {
            return Err(ResourceError::Validation(format!(
                "{} requires a non-empty {}",
                kind, title_field
            )));
        }

        if kind.requires_url() && self.url().map_or(true, |u| u.trim().is_empty()) {
            return Err(ResourceError::Validation(format!("{} requires a url", kind)));
        }
        check_url("url", self.url())?;

        match self {
            ResourcePayload::Slide(p) => check_url("ctaUrl", p.cta_url.as_deref()),
            ResourcePayload::TeamMember(p) => check_url("linkedinUrl", p.linkedin_url.as_deref()),
            ResourcePayload::GalleryPhoto(p) if p.image.trim().is_empty() => Err(
                ResourceError::validation("galleryPhoto requires a non-empty image"),
            ),
            _ => Ok(()),
        }
    }
}

/// Schemes the public site may link to.
const LINK_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

fn check_url(field: &str, value: Option<&str>) -> ResourceResult<()> {
    let Some(raw) = value else {
        return Ok(());
    };

    let url = Url::parse(raw.trim())
        .map_err(|e| ResourceError::Validation(format!("{} is not a valid URL: {}", field, e)))?;
    if !LINK_SCHEMES.contains(&url.scheme()) {
        return Err(ResourceError::Validation(format!(
            "{} must be an http(s) or mailto link, got {}:",
            field,
            url.scheme()
        )));
    }
    Ok(())
}
