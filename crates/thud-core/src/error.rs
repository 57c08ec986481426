// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Thud module host.

use thiserror::Error;

/// A single handler failure collected during one publish round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// Module that registered the failing handler.
    pub module: String,
    /// Position of the handler in the event's subscription list.
    pub position: usize,
    /// Error or panic message produced by the handler.
    pub message: String,
    /// True when the handler panicked rather than returning an error.
    pub panicked: bool,
}

impl std::fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.panicked { "panicked" } else { "failed" };
        write!(
            f,
            "handler #{} of module `{}` {kind}: {}",
            self.position, self.module, self.message
        )
    }
}

/// The primary error type used across the registry, loader, and ABI boundary.
#[derive(Debug, Error)]
pub enum ThudError {
    /// Configuration errors (invalid TOML, missing fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A module descriptor broke one or more structural rules.
    #[error("invalid module `{module}`: {}", .problems.join("; "))]
    InvalidModule {
        module: String,
        problems: Vec<String>,
    },

    /// A module lists a dependency that no discovered or registered module provides.
    #[error("module `{module}` depends on `{dependency}`, which is not available")]
    UnresolvedDependency { module: String, dependency: String },

    /// The dependency graph contains a directed cycle. Members are listed
    /// so that each one depends on the next, and the last on the first.
    #[error("dependency cycle: {}", format_cycle(.cycle))]
    CyclicDependency { cycle: Vec<String> },

    /// A module with the same name is already registered.
    #[error("module `{name}` is already registered")]
    DuplicateModule { name: String },

    /// A component name collides under the active naming scope.
    #[error("component `{name}` of module `{module}` collides with one owned by `{existing}`")]
    DuplicateComponent {
        module: String,
        name: String,
        existing: String,
    },

    /// No component with this name is registered.
    #[error("unknown component `{name}`{}", suggestion_note(.suggestion.as_deref()))]
    UnknownComponent {
        name: String,
        suggestion: Option<String>,
    },

    /// A bare component name matches components in several modules.
    #[error("component `{name}` is ambiguous, qualify it with one of: {}", .modules.join(", "))]
    AmbiguousComponent { name: String, modules: Vec<String> },

    /// No module with this name is registered.
    #[error("unknown module `{name}`")]
    UnknownModule { name: String },

    /// The module cannot be unloaded while others depend on it.
    #[error("module `{name}` is required by: {}", .dependents.join(", "))]
    ModuleInUse {
        name: String,
        dependents: Vec<String>,
    },

    /// A module's load or unload hook failed.
    #[error("lifecycle hook of module `{module}` failed: {source}")]
    ModuleLifecycle {
        module: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The payload handed to `publish` is not the type declared for the event.
    #[error("event `{event}` expects a payload of type `{expected}`")]
    PayloadMismatch {
        event: String,
        expected: &'static str,
    },

    /// Failure reported by an individual event handler.
    #[error("handler error: {0}")]
    Handler(String),

    /// One or more handlers failed during a publish round.
    #[error("{} of {delivered} handler(s) for event `{event}` failed", .failures.len())]
    HandlerFailures {
        event: String,
        delivered: usize,
        failures: Vec<HandlerFailure>,
    },

    /// Malformed data read across the C layout boundary.
    #[error("abi error: {0}")]
    Abi(String),

    /// Module manifest could not be parsed or failed validation.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

fn suggestion_note(suggestion: Option<&str>) -> String {
    suggestion.map(|s| format!(" (did you mean `{s}`?)")).unwrap_or_default()
}

fn format_cycle(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => format!("{} -> {first}", cycle.join(" -> ")),
        None => String::new(),
    }
}

impl ThudError {
    /// Returns true for errors raised while computing a load order, before
    /// any registry state was touched.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            ThudError::InvalidModule { .. }
                | ThudError::UnresolvedDependency { .. }
                | ThudError::CyclicDependency { .. }
        )
    }

    /// Returns true for errors raised during the registration pass, after
    /// earlier modules may already have been registered.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            ThudError::DuplicateModule { .. }
                | ThudError::DuplicateComponent { .. }
                | ThudError::ModuleLifecycle { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_members_in_order() {
        let err = ThudError::CyclicDependency {
            cycle: vec!["X".into(), "Y".into()],
        };
        assert_eq!(err.to_string(), "dependency cycle: X -> Y -> X");
    }

    #[test]
    fn unknown_component_mentions_suggestion() {
        let err = ThudError::UnknownComponent {
            name: "ecoh".into(),
            suggestion: Some("echo".into()),
        };
        assert_eq!(
            err.to_string(),
            "unknown component `ecoh` (did you mean `echo`?)"
        );

        let bare = ThudError::UnknownComponent {
            name: "zzz".into(),
            suggestion: None,
        };
        assert_eq!(bare.to_string(), "unknown component `zzz`");
    }

    #[test]
    fn handler_failures_counts_failed_handlers() {
        let err = ThudError::HandlerFailures {
            event: "startup".into(),
            delivered: 3,
            failures: vec![HandlerFailure {
                module: "a".into(),
                position: 1,
                message: "boom".into(),
                panicked: true,
            }],
        };
        assert_eq!(err.to_string(), "1 of 3 handler(s) for event `startup` failed");
    }

    #[test]
    fn phases_are_disjoint() {
        let resolve = ThudError::CyclicDependency { cycle: vec![] };
        let register = ThudError::DuplicateModule { name: "a".into() };
        assert!(resolve.is_resolution_error());
        assert!(!resolve.is_registration_error());
        assert!(register.is_registration_error());
        assert!(!register.is_resolution_error());
    }
}
