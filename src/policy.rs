// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Static route-to-requirement table.
//!
//! Each protected route is listed explicitly with its required combination of
//! session and envelope; dispatch resolves the first matching entry and
//! unmatched routes default to unprotected. Protection is opt-in: forgetting
//! to list a route leaves it open, which is why the table below is the single
//! place the HTTP surface's security posture is defined.

use axum::http::Method;

/// Requirement pair for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub session: bool,
    pub envelope: bool,
}

impl Requirements {
    /// No session, no envelope.
    pub const OPEN: Self = Self {
        session: false,
        envelope: false,
    };
    /// Valid session token required.
    pub const SESSION: Self = Self {
        session: true,
        envelope: false,
    };
    /// Valid session token and enveloped body required.
    pub const SEALED: Self = Self {
        session: true,
        envelope: true,
    };
}

/// One entry of the policy table.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub method: Method,
    /// Path pattern; `*` matches exactly one segment.
    pub pattern: &'static str,
    pub requirements: Requirements,
}

/// Ordered policy table, resolved first-match-wins.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    rules: Vec<RouteRule>,
}

impl PolicyTable {
    /// The gateway's route table.
    pub fn gateway() -> Self {
        let rule = |method: Method, pattern: &'static str, requirements| RouteRule {
            method,
            pattern,
            requirements,
        };
        Self {
            rules: vec![
                rule(Method::POST, "/auth/login", Requirements::OPEN),
                rule(Method::POST, "/auth/logout", Requirements::SESSION),
                rule(Method::GET, "/auth/me", Requirements::SESSION),
                rule(Method::GET, "/v1/objects", Requirements::SESSION),
                rule(Method::POST, "/v1/objects", Requirements::SEALED),
                rule(Method::POST, "/v1/objects/*/rename", Requirements::SEALED),
                rule(Method::POST, "/v1/objects/*/share", Requirements::SEALED),
                rule(Method::HEAD, "/v1/objects/*", Requirements::SESSION),
                rule(Method::GET, "/v1/objects/*", Requirements::SESSION),
                rule(Method::DELETE, "/v1/objects/*", Requirements::SESSION),
            ],
        }
    }

    /// Build a table from explicit rules (tests, embedding).
    pub fn from_rules(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Resolve the requirements for a request. Unmatched routes are open.
    pub fn resolve(&self, method: &Method, path: &str) -> Requirements {
        self.rules
            .iter()
            .find(|rule| rule.method == *method && pattern_matches(rule.pattern, path))
            .map(|rule| rule.requirements)
            .unwrap_or(Requirements::OPEN)
    }
}

/// Segment-wise match; `*` matches exactly one non-empty segment.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.trim_matches('/').split('/');
    let mut path_segments = path.trim_matches('/').split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) if p == "*" => {
                if s.is_empty() {
                    return false;
                }
            }
            (Some(p), Some(s)) if p == s => {}
            _ => return false,
        }
    }
}
