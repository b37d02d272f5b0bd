//! Client-side token storage, one `mytoken` cookie per path scope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared::domain::{CookieScope, TOKEN_COOKIE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieJar {
    #[serde(default)]
    tokens: BTreeMap<CookieScope, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, scope: CookieScope, token: impl Into<String>) {
        self.tokens.insert(scope, token.into());
    }

    /// Removes the cookie of exactly this scope; the other scope is untouched.
    pub fn clear(&mut self, scope: CookieScope) -> Option<String> {
        self.tokens.remove(&scope)
    }

    pub fn get(&self, scope: CookieScope) -> Option<&str> {
        self.tokens.get(&scope).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `Set-Cookie`-style rendering of a scope, as `document.cookie` would hold it.
    pub fn render(&self, scope: CookieScope) -> Option<String> {
        self.get(scope)
            .map(|token| format!("{TOKEN_COOKIE}={token}; path={}", scope.path()))
    }

    /// `Cookie` request header for `request_path`. Longer paths go first, so
    /// under `/admin` the admin token is the one a server reads.
    pub fn header_for(&self, request_path: &str) -> Option<String> {
        let mut matching: Vec<(CookieScope, &String)> = self
            .tokens
            .iter()
            .filter(|(scope, _)| scope.covers(request_path))
            .map(|(scope, token)| (*scope, token))
            .collect();
        if matching.is_empty() {
            return None;
        }
        matching.sort_by_key(|(scope, _)| std::cmp::Reverse(scope.path().len()));

        Some(
            matching
                .into_iter()
                .map(|(_, token)| format!("{TOKEN_COOKIE}={token}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
