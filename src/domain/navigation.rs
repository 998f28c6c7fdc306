//! Navigation link targets.
//!
//! A nav link points at exactly one thing: a published page or a custom
//! label/url pair. Request payloads arrive as loose optional fields and are
//! narrowed into [`NavTarget`] once, before anything is persisted.

use serde::Serialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    Page { page_id: i64 },
    Custom { label: String, url: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavTargetError {
    #[error("provide either page_id or custom_label and custom_url, not both")]
    Ambiguous,
    #[error("provide either page_id or custom_label and custom_url")]
    Missing,
    #[error("custom links need both custom_label and custom_url")]
    IncompleteCustom,
    #[error("custom_label must not be blank")]
    BlankLabel,
    #[error("custom_url `{url}` must be an http(s) URL or an absolute path")]
    InvalidUrl { url: String },
}

impl NavTarget {
    /// Narrow the optional request fields into exactly one target. A custom
    /// field that was sent counts as supplied even when it is empty.
    pub fn from_parts(
        page_id: Option<i64>,
        custom_label: Option<String>,
        custom_url: Option<String>,
    ) -> Result<Self, NavTargetError> {
        match (page_id, custom_label, custom_url) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(NavTargetError::Ambiguous),
            (Some(page_id), None, None) => Ok(NavTarget::Page { page_id }),
            (None, Some(label), Some(url)) => NavTarget::custom(label, url),
            (None, None, None) => Err(NavTargetError::Missing),
            (None, _, _) => Err(NavTargetError::IncompleteCustom),
        }
    }

    pub fn custom(label: String, url: String) -> Result<Self, NavTargetError> {
        let label = label.trim().to_string();
        if label.is_empty() {
            return Err(NavTargetError::BlankLabel);
        }

        let url = url.trim().to_string();
        if !is_acceptable_link(&url) {
            return Err(NavTargetError::InvalidUrl { url });
        }

        Ok(NavTarget::Custom { label, url })
    }

    pub fn page_id(&self) -> Option<i64> {
        match self {
            NavTarget::Page { page_id } => Some(*page_id),
            NavTarget::Custom { .. } => None,
        }
    }
}

fn is_acceptable_link(candidate: &str) -> bool {
    if candidate.starts_with('/') && !candidate.starts_with("//") {
        return true;
    }

    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// A nav link destination resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavDestination {
    Page {
        page_id: i64,
        title: String,
        slug: String,
        published: bool,
    },
    Custom {
        label: String,
        url: String,
    },
}

impl NavDestination {
    /// Whether the link should appear on the public site.
    pub fn is_visible(&self) -> bool {
        match self {
            NavDestination::Page { published, .. } => *published,
            NavDestination::Custom { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_only_is_accepted() {
        let target = NavTarget::from_parts(Some(4), None, None).expect("page target");
        assert_eq!(target, NavTarget::Page { page_id: 4 });
    }

    #[test]
    fn custom_only_is_accepted() {
        let target = NavTarget::from_parts(
            None,
            Some(" GitHub ".into()),
            Some("https://github.com/someone".into()),
        )
        .expect("custom target");
        assert_eq!(
            target,
            NavTarget::Custom {
                label: "GitHub".into(),
                url: "https://github.com/someone".into()
            }
        );
    }

    #[test]
    fn both_forms_are_rejected() {
        let err = NavTarget::from_parts(Some(1), Some("x".into()), Some("/x".into()))
            .expect_err("ambiguous");
        assert_eq!(err, NavTargetError::Ambiguous);

        let err = NavTarget::from_parts(Some(1), None, Some("/x".into())).expect_err("ambiguous");
        assert_eq!(err, NavTargetError::Ambiguous);

        let err = NavTarget::from_parts(Some(1), Some(String::new()), Some(String::new()))
            .expect_err("empty custom fields still count");
        assert_eq!(err, NavTargetError::Ambiguous);
    }

    #[test]
    fn neither_form_is_rejected() {
        assert_eq!(
            NavTarget::from_parts(None, None, None),
            Err(NavTargetError::Missing)
        );
    }

    #[test]
    fn empty_custom_fields_fail_validation() {
        assert_eq!(
            NavTarget::from_parts(None, Some(String::new()), Some(String::new())),
            Err(NavTargetError::BlankLabel)
        );
    }

    #[test]
    fn half_a_custom_link_is_rejected() {
        assert_eq!(
            NavTarget::from_parts(None, Some("Blog".into()), None),
            Err(NavTargetError::IncompleteCustom)
        );
    }

    #[test]
    fn custom_url_must_be_http_or_path() {
        assert!(NavTarget::custom("Home".into(), "/".into()).is_ok());
        assert!(NavTarget::custom("Docs".into(), "http://example.com/docs".into()).is_ok());
        assert!(matches!(
            NavTarget::custom("Bad".into(), "javascript:alert(1)".into()),
            Err(NavTargetError::InvalidUrl { .. })
        ));
        assert!(matches!(
            NavTarget::custom("Bad".into(), "//evil.example".into()),
            Err(NavTargetError::InvalidUrl { .. })
        ));
        assert_eq!(
            NavTarget::custom("  ".into(), "/x".into()),
            Err(NavTargetError::BlankLabel)
        );
    }

    #[test]
    fn unpublished_pages_are_hidden() {
        let page = NavDestination::Page {
            page_id: 1,
            title: "Draft".into(),
            slug: "draft".into(),
            published: false,
        };
        assert!(!page.is_visible());
        let custom = NavDestination::Custom {
            label: "x".into(),
            url: "/x".into(),
        };
        assert!(custom.is_visible());
    }
}
