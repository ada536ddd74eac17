//! OData filter construction for search requests.

use crate::overrides::{AuthClaims, Overrides};
use grounded_core::{AppError, AppResult};

/// Builds the search filter for one request.
pub trait FilterBuilder: Send + Sync {
    /// Return the filter expression, or `None` when nothing restricts results.
    fn build_filter(&self, overrides: &Overrides, claims: &AuthClaims) -> AppResult<Option<String>>;
}

/// Category exclusion plus oid/group access control.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityFilterBuilder {
    /// Apply both security filters regardless of overrides
    pub require_access_control: bool,

    /// Whether the index carries `oids` and `groups` fields
    pub has_auth_fields: bool,
}

impl SecurityFilterBuilder {
    pub fn new(require_access_control: bool, has_auth_fields: bool) -> Self {
        Self {
            require_access_control,
            has_auth_fields,
        }
    }
}

impl FilterBuilder for SecurityFilterBuilder {
    fn build_filter(&self, overrides: &Overrides, claims: &AuthClaims) -> AppResult<Option<String>> {
        let use_oid = self.require_access_control || overrides.use_oid_security_filter;
        let use_groups = self.require_access_control || overrides.use_groups_security_filter;

        if (use_oid || use_groups) && !self.has_auth_fields {
            return Err(AppError::Config(
                "Security filtering requested but the index has no oids/groups fields".to_string(),
            ));
        }

        let mut parts = Vec::new();

        if let Some(category) = overrides.exclude_category.as_deref() {
            parts.push(format!("category ne '{}'", escape(category)));
        }

        let oid_filter = use_oid.then(|| {
            format!(
                "oids/any(g:search.in(g, '{}'))",
                escape(claims.oid.as_deref().unwrap_or(""))
            )
        });
        let groups_filter = use_groups.then(|| {
            format!(
                "groups/any(g:search.in(g, '{}'))",
                escape(&claims.groups.join(", "))
            )
        });

        match (oid_filter, groups_filter) {
            (Some(oid), Some(groups)) => parts.push(format!("({} or {})", oid, groups)),
            (Some(filter), None) | (None, Some(filter)) => parts.push(filter),
            (None, None) => {}
        }

        if parts.is_empty() {
            Ok(None)
        } else {
            Ok(Some(parts.join(" and ")))
        }
    }
}

/// Double single quotes for an OData string literal.
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> AuthClaims {
        AuthClaims {
            oid: Some("user-1".to_string()),
            groups: vec!["g1".to_string(), "g2".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_no_filter() {
        let builder = SecurityFilterBuilder::default();
        let filter = builder
            .build_filter(&Overrides::default(), &AuthClaims::default())
            .unwrap();
        assert_eq!(filter, None);
    }

    #[test]
    fn test_exclude_category_escapes_quotes() {
        let overrides = Overrides {
            exclude_category: Some("men's health".to_string()),
            ..Default::default()
        };
        let filter = SecurityFilterBuilder::default()
            .build_filter(&overrides, &AuthClaims::default())
            .unwrap();
        assert_eq!(filter.as_deref(), Some("category ne 'men''s health'"));
    }

    #[test]
    fn test_oid_filter_only() {
        let overrides = Overrides {
            use_oid_security_filter: true,
            ..Default::default()
        };
        let filter = SecurityFilterBuilder::new(false, true)
            .build_filter(&overrides, &claims())
            .unwrap();
        assert_eq!(filter.as_deref(), Some("oids/any(g:search.in(g, 'user-1'))"));
    }

    #[test]
    fn test_groups_filter_only() {
        let overrides = Overrides {
            use_groups_security_filter: true,
            ..Default::default()
        };
        let filter = SecurityFilterBuilder::new(false, true)
            .build_filter(&overrides, &claims())
            .unwrap();
        assert_eq!(filter.as_deref(), Some("groups/any(g:search.in(g, 'g1, g2'))"));
    }

    #[test]
    fn test_required_access_control_combines_with_category() {
        let overrides = Overrides {
            exclude_category: Some("hr".to_string()),
            ..Default::default()
        };
        let filter = SecurityFilterBuilder::new(true, true)
            .build_filter(&overrides, &claims())
            .unwrap();
        assert_eq!(
            filter.as_deref(),
            Some(
                "category ne 'hr' and (oids/any(g:search.in(g, 'user-1')) or groups/any(g:search.in(g, 'g1, g2')))"
            )
        );
    }

    #[test]
    fn test_missing_oid_claim_matches_nothing() {
        let overrides = Overrides {
            use_oid_security_filter: true,
            ..Default::default()
        };
        let filter = SecurityFilterBuilder::new(false, true)
            .build_filter(&overrides, &AuthClaims::default())
            .unwrap();
        assert_eq!(filter.as_deref(), Some("oids/any(g:search.in(g, ''))"));
    }

    #[test]
    fn test_security_filter_without_auth_fields() {
        let overrides = Overrides {
            use_groups_security_filter: true,
            ..Default::default()
        };
        let result = SecurityFilterBuilder::new(false, false).build_filter(&overrides, &claims());
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
