//! Per-route access rules.
//!
//! A [`SecurityPolicy`] is an ordered list of rules; the first rule whose
//! method and path pattern match the request decides what the caller must
//! present. Requests no rule matches are permitted.

use axum::http::Method;

use crate::manager::Principal;
use crate::users::DOCTOR_AUTHORITY;

/// What a caller must present to reach a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    PermitAll,
    /// Any authenticated principal.
    Authenticated,
    /// An authenticated principal holding the named authority.
    Authority(String),
}

/// Outcome of checking a request against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Permit,
    /// Credentials are required but missing. Answered with 401.
    Unauthenticated,
    /// The principal lacks the required authority. Answered with 403.
    Forbidden { required: String },
}

/// Path template where `{name}` matches exactly one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathPattern {
    segments: Vec<String>,
}

impl PathPattern {
    fn new(pattern: &str) -> Self {
        Self {
            segments: split_path(pattern).map(str::to_string).collect(),
        }
    }

    fn matches(&self, path: &str) -> bool {
        let mut segments = split_path(path);
        for expected in &self.segments {
            let Some(actual) = segments.next() else {
                return false;
            };
            let is_variable = expected.starts_with('{') && expected.ends_with('}');
            if !is_variable && expected != actual {
                return false;
            }
        }
        segments.next().is_none()
    }
}

static PERMIT_ALL: Requirement = Requirement::PermitAll;

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Debug, Clone)]
struct Rule {
    method: Method,
    pattern: PathPattern,
    requirement: Requirement,
}

impl Rule {
    /// `GET` rules also guard `HEAD`, which the router answers with the
    /// same handler.
    fn matches(&self, method: &Method, path: &str) -> bool {
        let method_matches = self.method == *method
            || (self.method == Method::GET && *method == Method::HEAD);
        method_matches && self.pattern.matches(path)
    }
}

/// Ordered access rules for the HTTP surface.
#[derive(Debug, Clone, Default)]
pub struct SecurityPolicy {
    rules: Vec<Rule>,
}

impl SecurityPolicy {
    /// A policy that permits everything.
    pub fn permit_all() -> Self {
        Self::default()
    }

    /// The clinic rules:
    /// - `POST /medical-tests` needs the `DOCTOR` authority
    /// - `GET /patients/{id}/medical-tests` needs any authenticated caller
    /// - everything else is open
    pub fn clinic() -> Self {
        Self::permit_all()
            .rule(
                Method::POST,
                "/medical-tests",
                Requirement::Authority(DOCTOR_AUTHORITY.to_string()),
            )
            .rule(
                Method::GET,
                "/patients/{id}/medical-tests",
                Requirement::Authenticated,
            )
    }

    /// Appends a rule. Earlier rules take precedence.
    #[must_use]
    pub fn rule(mut self, method: Method, pattern: &str, requirement: Requirement) -> Self {
        self.rules.push(Rule {
            method,
            pattern: PathPattern::new(pattern),
            requirement,
        });
        self
    }

    /// Returns the requirement of the first rule matching the request.
    pub fn requirement_for(&self, method: &Method, path: &str) -> &Requirement {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.requirement)
            .unwrap_or(&PERMIT_ALL)
    }

    /// Decides whether `principal` may perform the request.
    pub fn decide(
        &self,
        method: &Method,
        path: &str,
        principal: Option<&Principal>,
    ) -> AccessDecision {
        match (self.requirement_for(method, path), principal) {
            (Requirement::PermitAll, _) => AccessDecision::Permit,
            (_, None) => AccessDecision::Unauthenticated,
            (Requirement::Authenticated, Some(_)) => AccessDecision::Permit,
            (Requirement::Authority(authority), Some(principal)) => {
                if principal.has_authority(authority) {
                    AccessDecision::Permit
                } else {
                    AccessDecision::Forbidden {
                        required: authority.clone(),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> Principal {
        Principal {
            username: "admin".into(),
            authorities: vec!["DOCTOR".into()],
        }
    }

    fn nurse() -> Principal {
        Principal {
            username: "anna".into(),
            authorities: vec!["NURSE".into()],
        }
    }

    #[test]
    fn test_path_pattern() {
        let pattern = PathPattern::new("/patients/{id}/medical-tests");
        assert!(pattern.matches("/patients/1/medical-tests"));
        assert!(pattern.matches("/patients/abc/medical-tests/"));
        assert!(!pattern.matches("/patients/1"));
        assert!(!pattern.matches("/patients//medical-tests"));
        assert!(!pattern.matches("/patients/1/medical-tests/2"));
    }

    #[test]
    fn test_saving_a_test_needs_doctor() {
        let policy = SecurityPolicy::clinic();
        assert_eq!(
            policy.decide(&Method::POST, "/medical-tests", None),
            AccessDecision::Unauthenticated
        );
        assert_eq!(
            policy.decide(&Method::POST, "/medical-tests", Some(&nurse())),
            AccessDecision::Forbidden {
                required: "DOCTOR".into()
            }
        );
        assert_eq!(
            policy.decide(&Method::POST, "/medical-tests", Some(&doctor())),
            AccessDecision::Permit
        );
    }

    #[test]
    fn test_tests_of_patient_need_authentication() {
        let policy = SecurityPolicy::clinic();
        let path = "/patients/1/medical-tests";
        assert_eq!(
            policy.decide(&Method::GET, path, None),
            AccessDecision::Unauthenticated
        );
        assert_eq!(
            policy.decide(&Method::GET, path, Some(&nurse())),
            AccessDecision::Permit
        );
        assert_eq!(
            policy.decide(&Method::HEAD, path, None),
            AccessDecision::Unauthenticated
        );
        assert_eq!(
            policy.decide(&Method::HEAD, path, Some(&nurse())),
            AccessDecision::Permit
        );
    }

    #[test]
    fn test_head_does_not_match_post_rules() {
        let policy = SecurityPolicy::clinic();
        assert_eq!(
            policy.decide(&Method::HEAD, "/medical-tests", None),
            AccessDecision::Permit
        );
    }

    #[test]
    fn test_everything_else_is_open() {
        let policy = SecurityPolicy::clinic();
        for (method, path) in [
            (Method::GET, "/patients"),
            (Method::GET, "/patients/1"),
            (Method::POST, "/patients"),
            (Method::GET, "/medical-tests"),
            (Method::GET, "/medical-tests/3"),
            (Method::GET, "/healthz"),
        ] {
            assert_eq!(
                policy.decide(&method, path, None),
                AccessDecision::Permit,
                "{method} {path}"
            );
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let policy = SecurityPolicy::permit_all()
            .rule(Method::GET, "/a/{id}", Requirement::PermitAll)
            .rule(Method::GET, "/a/{id}", Requirement::Authenticated);
        assert_eq!(policy.requirement_for(&Method::GET, "/a/1"), &Requirement::PermitAll);
    }
}
