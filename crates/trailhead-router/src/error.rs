//! Insertion errors.
//!
//! Every variant represents a structural conflict in route configuration.
//! These are programmer errors: they surface synchronously from the
//! registration call and must abort startup, never be deferred to request
//! time.

use http::Method;
use thiserror::Error;

/// An error raised while inserting a pattern into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// Patterns are absolute paths and must begin with `/`.
    #[error("pattern {pattern:?} must begin with '/'")]
    MissingLeadingSlash {
        /// The rejected pattern.
        pattern: String,
    },

    /// A doubled slash produced an empty segment.
    #[error("empty segment at byte {index} of pattern {pattern:?}")]
    EmptySegment {
        /// The rejected pattern.
        pattern: String,
        /// Byte offset of the slash that opens the empty segment.
        index: usize,
    },

    /// A `:` with no name before the next `/`.
    #[error("parameter without a name at byte {index} of pattern {pattern:?}")]
    EmptyParamName {
        /// The rejected pattern.
        pattern: String,
        /// Byte offset of the `:`.
        index: usize,
    },

    /// `:` or `*` may only begin a segment.
    #[error("unexpected {found:?} inside segment {segment:?} of pattern {pattern:?}")]
    UnexpectedSpecifier {
        /// The rejected pattern.
        pattern: String,
        /// The segment containing the stray specifier.
        segment: String,
        /// The offending character.
        found: char,
    },

    /// A parameter name containing a reserved character.
    #[error("invalid character {found:?} in parameter name {name:?} of pattern {pattern:?}")]
    InvalidParamName {
        /// The rejected pattern.
        pattern: String,
        /// The parameter name as written.
        name: String,
        /// The offending character.
        found: char,
    },

    /// `*` must be the final character of the pattern.
    #[error("catch-all must terminate the pattern: {pattern:?}")]
    InvalidCatchAll {
        /// The rejected pattern.
        pattern: String,
    },

    /// The same parameter name appears twice in one route path, which
    /// would make lookup-by-name ambiguous.
    #[error("pattern {pattern:?} uses parameter name {name:?} more than once")]
    DuplicateParamName {
        /// The rejected pattern.
        pattern: String,
        /// The repeated name.
        name: String,
    },

    /// More parameters than a request's parameter buffer can hold.
    #[error("pattern {pattern:?} declares {count} parameters, more than the limit of {limit}")]
    TooManyParams {
        /// The rejected pattern.
        pattern: String,
        /// Parameters declared by the pattern.
        count: usize,
        /// The fixed ceiling ([`crate::MAX_ROUTE_PARAMS`]).
        limit: usize,
    },

    /// Two different parameter names at the same branch point.
    #[error(
        "parameter :{name} in pattern {pattern:?} conflicts with existing parameter :{existing} at the same branch"
    )]
    ParamNameMismatch {
        /// The rejected pattern.
        pattern: String,
        /// The name already stored at this branch point.
        existing: String,
        /// The conflicting name from the new pattern.
        name: String,
    },

    /// A catch-all where the same method already routes through a
    /// parameter at this node.
    #[error(
        "catch-all in pattern {pattern:?} conflicts with parameter :{param} already registered for {method} at this branch"
    )]
    CatchAllParamConflict {
        /// The rejected pattern.
        pattern: String,
        /// The parameter the method already routes through.
        param: String,
        /// The conflicting method.
        method: Method,
    },

    /// A parameter where the same method already routes through a
    /// catch-all at this node.
    #[error(
        "parameter :{param} in pattern {pattern:?} conflicts with a catch-all already registered for {method} at this branch"
    )]
    ParamCatchAllConflict {
        /// The rejected pattern.
        pattern: String,
        /// The conflicting parameter name.
        param: String,
        /// The conflicting method.
        method: Method,
    },

    /// The exact (method, path) pair is already registered.
    #[error("{method} already registered for pattern {pattern:?}")]
    DuplicateRoute {
        /// The conflicting method.
        method: Method,
        /// The already-occupied pattern.
        pattern: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_both_parameter_occurrences() {
        let err = InsertError::ParamNameMismatch {
            pattern: "/store/:name".to_string(),
            existing: "id".to_string(),
            name: "name".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains(":name"), "{text}");
        assert!(text.contains(":id"), "{text}");
    }

    #[test]
    fn display_reports_empty_segment_index() {
        let err = InsertError::EmptySegment {
            pattern: "/a//b".to_string(),
            index: 3,
        };
        assert_eq!(err.to_string(), "empty segment at byte 3 of pattern \"/a//b\"");
    }

    #[test]
    fn display_identifies_duplicate_method_and_path() {
        let err = InsertError::DuplicateRoute {
            method: Method::GET,
            pattern: "/home".to_string(),
        };
        assert_eq!(err.to_string(), "GET already registered for pattern \"/home\"");
    }
}
