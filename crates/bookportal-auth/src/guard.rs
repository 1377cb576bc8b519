//! Navigation admission control.
//!
//! Evaluated on every navigation against a fresh session snapshot; decisions
//! are never cached.

use bookportal_config::RoutesConfig;
use bookportal_core::{Principal, Role};

use crate::session::SessionStore;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Path the caller ends up on for a requested `path`.
    pub fn target<'a>(&'a self, path: &'a str) -> &'a str {
        match self {
            Self::Allow => path,
            Self::Redirect(to) => to,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    login: String,
    admin_home: String,
    user_home: String,
    /// Only for anonymous visitors (sign-in, sign-up).
    public_only: Vec<String>,
    /// Open to everyone.
    public: Vec<String>,
    /// Prefix -> role that may enter it.
    restricted: Vec<(String, Role)>,
}

impl RouteGuard {
    pub fn new(routes: &RoutesConfig) -> Self {
        Self {
            login: routes.login.clone(),
            admin_home: routes.admin_home.clone(),
            user_home: routes.user_home.clone(),
            public_only: vec![routes.login.clone(), routes.register.clone()],
            public: Vec::new(),
            restricted: vec![(routes.admin_prefix.clone(), Role::Admin)],
        }
    }

    /// Allow `prefix` without a session.
    #[must_use]
    pub fn with_public(mut self, prefix: impl Into<String>) -> Self {
        self.public.push(prefix.into());
        self
    }

    /// Reserve `prefix` for principals with `role`.
    #[must_use]
    pub fn with_restricted(mut self, prefix: impl Into<String>, role: Role) -> Self {
        self.restricted.push((prefix.into(), role));
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login
    }

    pub fn home_for(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.admin_home,
            Role::User => &self.user_home,
        }
    }

    /// Decide whether `principal` may open `path`.
    ///
    /// Rules, first match wins:
    /// 1. signed in on a sign-in/sign-up path: go to the role's home
    /// 2. signed in with the wrong role for a restricted path: go to own home
    /// 3. anonymous on a non-public path: go to sign-in
    /// 4. allow
    pub fn evaluate(&self, principal: Option<&Principal>, path: &str) -> GuardDecision {
        let path = normalize(path);

        if let Some(principal) = principal {
            if self.public_only.iter().any(|p| matches_prefix(path, p)) {
                return GuardDecision::Redirect(self.home_for(principal.role).to_string());
            }
            if let Some(required) = self.required_role(path)
                && required != principal.role
            {
                return GuardDecision::Redirect(self.home_for(principal.role).to_string());
            }
            return GuardDecision::Allow;
        }

        if self.is_public(path) {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(self.login.clone())
        }
    }

    /// Evaluate against the store's current session, hydrating it first if needed.
    pub fn check(&self, store: &SessionStore, path: &str) -> GuardDecision {
        let snapshot = store.initialize();
        self.evaluate(snapshot.principal(), path)
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_only
            .iter()
            .chain(self.public.iter())
            .any(|p| matches_prefix(path, p))
    }

    fn required_role(&self, path: &str) -> Option<Role> {
        // longest prefix wins
        self.restricted
            .iter()
            .filter(|(prefix, _)| matches_prefix(path, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, role)| *role)
    }
}

fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// `/admin` matches `/admin` and `/admin/users` but not `/administrator`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    let prefix = normalize(prefix);
    if prefix == "/" {
        return path == "/";
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookportal_core::Credential;

    fn guard() -> RouteGuard {
        RouteGuard::new(&RoutesConfig::default())
    }

    fn principal(role: Role) -> Principal {
        Principal {
            id: 1,
            email: "someone@example.com".into(),
            first_name: "Some".into(),
            last_name: "One".into(),
            role,
        }
    }

    #[test]
    fn test_user_on_admin_path_goes_to_book_list() {
        let user = principal(Role::User);
        assert_eq!(
            guard().evaluate(Some(&user), "/admin/users"),
            GuardDecision::Redirect("/books".into())
        );
        assert_eq!(
            guard().evaluate(Some(&user), "/admin"),
            GuardDecision::Redirect("/books".into())
        );
    }

    #[test]
    fn test_anonymous_on_protected_path_goes_to_login() {
        for path in ["/books", "/books/12", "/admin/dashboard", "/profile", "/"] {
            assert_eq!(
                guard().evaluate(None, path),
                GuardDecision::Redirect("/login".into()),
                "path {path}"
            );
        }
    }

    #[test]
    fn test_signed_in_on_public_only_path_goes_home() {
        let admin = principal(Role::Admin);
        let user = principal(Role::User);
        assert_eq!(
            guard().evaluate(Some(&admin), "/login"),
            GuardDecision::Redirect("/admin/dashboard".into())
        );
        assert_eq!(
            guard().evaluate(Some(&user), "/register?next=/books"),
            GuardDecision::Redirect("/books".into())
        );
    }

    #[test]
    fn test_allowed_paths() {
        let admin = principal(Role::Admin);
        let user = principal(Role::User);
        assert!(guard().evaluate(None, "/login").is_allowed());
        assert!(guard().evaluate(None, "/register/").is_allowed());
        assert!(guard().evaluate(Some(&admin), "/admin/books").is_allowed());
        assert!(guard().evaluate(Some(&user), "/books/3").is_allowed());
        // admins may browse the user area
        assert!(guard().evaluate(Some(&admin), "/books").is_allowed());
        // prefix matching respects segment boundaries
        assert!(guard().evaluate(Some(&user), "/administrator").is_allowed());
    }

    #[test]
    fn test_extra_public_and_restricted_prefixes() {
        let guard = guard()
            .with_public("/about")
            .with_restricted("/my-feedback", Role::User);
        let admin = principal(Role::Admin);

        assert!(guard.evaluate(None, "/about").is_allowed());
        assert_eq!(
            guard.evaluate(Some(&admin), "/my-feedback"),
            GuardDecision::Redirect("/admin/dashboard".into())
        );
    }

    #[test]
    fn test_check_reads_current_session_every_time() {
        let store = SessionStore::in_memory();
        let guard = guard();
        assert_eq!(
            guard.check(&store, "/books"),
            GuardDecision::Redirect("/login".into())
        );

        store
            .set_session(principal(Role::User), Credential::new("tok"))
            .unwrap();
        assert!(guard.check(&store, "/books").is_allowed());

        store.clear().unwrap();
        assert_eq!(
            guard.check(&store, "/books"),
            GuardDecision::Redirect("/login".into())
        );
    }

    #[test]
    fn test_decision_target() {
        assert_eq!(GuardDecision::Allow.target("/books"), "/books");
        assert_eq!(
            GuardDecision::Redirect("/login".into()).target("/books"),
            "/login"
        );
    }
}
