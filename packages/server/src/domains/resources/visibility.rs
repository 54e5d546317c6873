//! Visibility flags and their transition rules.
//!
//! `isActive` and `isFeatured` are orthogonal: each toggles independently and
//! every combination is reachable in one step. The only rule is kind-level:
//! kinds without a featured subset cannot be featured.

use serde::{Deserialize, Serialize};

use super::models::ResourceKind;
use super::{ResourceError, ResourceResult};

/// The flag pair as a named state, mostly for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityState {
    HiddenNotFeatured,
    HiddenFeatured,
    ActiveNotFeatured,
    ActiveFeatured,
}

impl std::fmt::Display for VisibilityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisibilityState::HiddenNotFeatured => write!(f, "hidden_not_featured"),
            VisibilityState::HiddenFeatured => write!(f, "hidden_featured"),
            VisibilityState::ActiveNotFeatured => write!(f, "active_not_featured"),
            VisibilityState::ActiveFeatured => write!(f, "active_featured"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub is_active: bool,
    pub is_featured: bool,
}

/// Requested flag changes; `None` leaves a flag as it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityChange {
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl Visibility {
    /// Flags for a newly created record: active unless told otherwise,
    /// never featured unless asked for.
    pub fn for_new(
        kind: ResourceKind,
        is_active: Option<bool>,
        is_featured: Option<bool>,
    ) -> ResourceResult<Self> {
        let initial = Visibility {
            is_active: true,
            is_featured: false,
        };
        initial.apply(
            kind,
            VisibilityChange {
                is_active,
                is_featured,
            },
        )
    }

    pub fn state(&self) -> VisibilityState {
        match (self.is_active, self.is_featured) {
            (false, false) => VisibilityState::HiddenNotFeatured,
            (false, true) => VisibilityState::HiddenFeatured,
            (true, false) => VisibilityState::ActiveNotFeatured,
            (true, true) => VisibilityState::ActiveFeatured,
        }
    }

    /// Apply a change. Featuring a kind that has no featured subset is a
    /// validation error; clearing the flag is always allowed.
    pub fn apply(self, kind: ResourceKind, change: VisibilityChange) -> ResourceResult<Self> {
        if change.is_featured == Some(true) && !kind.supports_featured() {
            return Err(ResourceError::Validation(format!(
                "{} records cannot be featured",
                kind
            )));
        }

        Ok(Visibility {
            is_active: change.is_active.unwrap_or(self.is_active),
            is_featured: change.is_featured.unwrap_or(self.is_featured),
        })
    }

    pub fn is_public(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_states() -> Vec<Visibility> {
        let mut states = Vec::new();
        for is_active in [false, true] {
            for is_featured in [false, true] {
                states.push(Visibility {
                    is_active,
                    is_featured,
                });
            }
        }
        states
    }

    #[test]
    fn test_every_state_reaches_every_other_in_one_step() {
        for from in all_states() {
            for to in all_states() {
                let change = VisibilityChange {
                    is_active: Some(to.is_active),
                    is_featured: Some(to.is_featured),
                };
                assert_eq!(from.apply(ResourceKind::News, change).unwrap(), to);
            }
        }
    }

    #[test]
    fn test_new_records_default_to_active_not_featured() {
        let visibility = Visibility::for_new(ResourceKind::Slide, None, None).unwrap();
        assert_eq!(visibility.state(), VisibilityState::ActiveNotFeatured);
    }

    #[test]
    fn test_featured_does_not_imply_active() {
        let visibility =
            Visibility::for_new(ResourceKind::CaseStudy, Some(false), Some(true)).unwrap();
        assert_eq!(visibility.state(), VisibilityState::HiddenFeatured);
        assert!(!visibility.is_public());
    }

    #[test]
    fn test_unfeaturable_kind_rejects_featured() {
        let err = Visibility::for_new(ResourceKind::Partner, None, Some(true)).unwrap_err();
        assert!(matches!(err, ResourceError::Validation(_)));

        let cleared = Visibility::default()
            .apply(
                ResourceKind::Partner,
                VisibilityChange {
                    is_active: None,
                    is_featured: Some(false),
                },
            )
            .unwrap();
        assert!(!cleared.is_featured);
    }

    #[test]
    fn test_unset_fields_are_left_alone() {
        let current = Visibility {
            is_active: false,
            is_featured: true,
        };
        let next = current
            .apply(ResourceKind::Toolkit, VisibilityChange::default())
            .unwrap();
        assert_eq!(next, current);
    }
}
