use std::collections::HashSet;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
};

/// Role name that bypasses permission checks. This is the only place in the
/// crate that compares against it.
pub const ADMIN_ROLE: &str = "admin";

/// The set of (resource, action) pairs a role grants. Pairs are stored
/// lowercase; roles own independent sets with no inheritance between them.
#[derive(Debug, Default, Clone)]
pub struct GrantSet {
    grants: HashSet<(String, String)>,
}

impl GrantSet {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let grants = pairs
            .into_iter()
            .map(|(r, a)| (r.as_ref().to_lowercase(), a.as_ref().to_lowercase()))
            .collect();
        Self { grants }
    }

    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.grants
            .contains(&(resource.to_lowercase(), action.to_lowercase()))
    }
}

/// Pure gate decision: admin bypasses, everyone else needs an exact match.
pub fn check(role_name: &str, grants: &GrantSet, resource: &str, action: &str) -> bool {
    role_name.eq_ignore_ascii_case(ADMIN_ROLE) || grants.allows(resource, action)
}

/// Same decision over a list of alternatives; passes if any pair matches.
pub fn check_any(role_name: &str, grants: &GrantSet, pairs: &[(&str, &str)]) -> bool {
    role_name.eq_ignore_ascii_case(ADMIN_ROLE)
        || pairs.iter().any(|(r, a)| grants.allows(r, a))
}

/// Resolve a role name to its grant set. Unknown or inactive roles resolve to
/// an empty set rather than an error; the gate then denies.
pub async fn load_grant_set(pool: &DbPool, role_name: &str) -> AppResult<GrantSet> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT p.resource, p.action
        FROM permissions p
        JOIN role_permissions rp ON rp.permission_id = p.id
        JOIN roles r ON r.id = rp.role_id
        WHERE r.name = $1 AND r.is_active
        "#,
    )
    .bind(role_name.to_lowercase())
    .fetch_all(pool)
    .await?;

    Ok(GrantSet::from_pairs(rows))
}

/// Authorization Gate: allow if the actor's role is admin or grants the exact
/// (resource, action) pair. The denied pair is carried on the error.
pub async fn authorize(
    pool: &DbPool,
    user: &AuthUser,
    resource: &str,
    action: &str,
) -> AppResult<()> {
    let grants = if user.role.eq_ignore_ascii_case(ADMIN_ROLE) {
        GrantSet::default()
    } else {
        load_grant_set(pool, &user.role).await?
    };

    if check(&user.role, &grants, resource, action) {
        return Ok(());
    }

    Err(AppError::Forbidden {
        resource: resource.to_string(),
        action: action.to_string(),
    })
}

/// OR-variant of the gate: allow if any of the supplied pairs is granted.
pub async fn authorize_any(
    pool: &DbPool,
    user: &AuthUser,
    pairs: &[(&str, &str)],
) -> AppResult<()> {
    let grants = if user.role.eq_ignore_ascii_case(ADMIN_ROLE) {
        GrantSet::default()
    } else {
        load_grant_set(pool, &user.role).await?
    };

    if check_any(&user.role, &grants, pairs) {
        return Ok(());
    }

    let (resource, action) = pairs.first().copied().unwrap_or(("", ""));
    Err(AppError::Forbidden {
        resource: resource.to_string(),
        action: action.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operations_grants() -> GrantSet {
        GrantSet::from_pairs([
            ("profile", "read"),
            ("profile", "update"),
            ("restaurant", "read"),
            ("tables", "read"),
            ("tables", "list"),
            ("tables", "check-in"),
            ("tables", "reserve"),
            ("tables", "checkout"),
            ("tables", "clean"),
        ])
    }

    #[test]
    fn admin_bypasses_every_pair() {
        let empty = GrantSet::default();
        assert!(check("admin", &empty, "roles", "delete"));
        assert!(check("admin", &empty, "anything", "whatever"));
        assert!(check_any("admin", &empty, &[("x", "y")]));
    }

    #[test]
    fn exact_match_required_for_non_admin() {
        let grants = operations_grants();
        assert!(check("operations", &grants, "tables", "check-in"));
        assert!(!check("operations", &grants, "tables", "create"));
        assert!(!check("operations", &grants, "roles", "delete"));
    }

    #[test]
    fn user_role_without_roles_grants_is_denied() {
        let grants = GrantSet::from_pairs([("profile", "read"), ("restaurant", "read")]);
        assert!(!check("user", &grants, "roles", "delete"));
    }

    #[test]
    fn any_variant_passes_on_any_match() {
        let grants = operations_grants();
        assert!(check_any(
            "operations",
            &grants,
            &[("menu-items", "create"), ("tables", "clean")]
        ));
        assert!(!check_any(
            "operations",
            &grants,
            &[("menu-items", "create"), ("roles", "list")]
        ));
    }

    #[test]
    fn role_and_pair_comparison_is_case_normalized() {
        let grants = GrantSet::from_pairs([("Tables", "Check-In")]);
        assert!(check("operations", &grants, "tables", "check-in"));
        assert!(check("ADMIN", &GrantSet::default(), "roles", "delete"));
    }
}
