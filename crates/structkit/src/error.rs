// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema building, construction and validation.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error for every struct operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Two or more fields in a merged schema share a name.
    #[error("struct {type_name} has colliding field name(s): {}", .names.join(", "))]
    SchemaCollision {
        type_name: String,
        names: Vec<String>,
    },

    /// A field was declared with an empty name.
    #[error("struct {type_name} declares a field with an empty name")]
    EmptyFieldName { type_name: String },

    /// Constructor arguments did not bind to the type's signature.
    #[error("error constructing {type_name}: {source}")]
    Construction {
        type_name: String,
        source: BindError,
    },

    /// Write attempted after construction on an immutable type.
    #[error("struct {type_name} is immutable; cannot assign field '{field}'")]
    ImmutableMutation { type_name: String, field: String },

    /// Field read without an instance.
    #[error("cannot read field '{field}' without an instance")]
    UnreadableField { field: String },

    /// Field name is not part of the type's schema.
    #[error("struct {type_name} has no field '{field}'")]
    UnknownField { type_name: String, field: String },

    #[error(transparent)]
    Hashability(#[from] Unhashable),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Snapshot refers to a type the registry does not know.
    #[error("unknown struct type '{0}'")]
    UnknownType(String),

    /// Value kind has no serialized form.
    #[error("value of type {0} cannot be serialized")]
    Unserializable(&'static str),

    /// Raised by a post-construction hook.
    #[error("initialization failed: {0}")]
    Init(String),
}

/// Argument binding failures, reported inside [`Error::Construction`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("takes {expected} positional argument(s) but {given} were given")]
    TooManyPositional { expected: usize, given: usize },

    #[error("got an unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("got multiple values for argument '{0}'")]
    MultipleValues(String),

    #[error("missing a required argument: '{0}'")]
    MissingArgument(String),
}

/// Typed field validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Scalar value of the wrong type.
    #[error("Expected {expected}; got {got}")]
    TypeMismatch { expected: String, got: String },

    /// Sequence element of the wrong type.
    #[error("Expected sequence of {expected}; got sequence with {got} at position {position}")]
    ElementMismatch {
        expected: String,
        got: String,
        position: usize,
    },

    /// Value is not a sequence at all.
    #[error("Expected sequence of {expected}; got {got} instead of sequence")]
    NotASequence { expected: String, got: String },

    /// Strings are never accepted as character sequences.
    #[error(
        "Expected sequence of {expected}; got single str (strings do not count as character sequences)"
    )]
    BareString { expected: String },

    /// Iterable without a length; validating it would consume it.
    #[error(
        "Expected sequence of {expected}; got {got} instead of sequence (iterators have no length)"
    )]
    NotLengthBearing { expected: String, got: String },

    /// Repeated element in a sequence that forbids duplicates.
    #[error("Duplicate element {value} at position {position}")]
    Duplicate { value: String, position: usize },
}

/// Reasons a hash cannot be computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unhashable {
    #[error("cannot hash mutable struct {0}")]
    MutableStruct(String),

    #[error("cannot hash uninitialized struct {0}")]
    UninitializedStruct(String),

    #[error("unhashable value of type {0}")]
    Value(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_lists_every_name() {
        let err = Error::SchemaCollision {
            type_name: "Point".into(),
            names: vec!["x".into(), "y".into()],
        };
        assert_eq!(
            err.to_string(),
            "struct Point has colliding field name(s): x, y"
        );
    }

    #[test]
    fn test_construction_wraps_bind_error() {
        let err = Error::Construction {
            type_name: "Point".into(),
            source: BindError::MissingArgument("y".into()),
        };
        assert_eq!(
            err.to_string(),
            "error constructing Point: missing a required argument: 'y'"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::TypeMismatch {
            expected: "int".into(),
            got: "str".into(),
        };
        assert_eq!(err.to_string(), "Expected int; got str");

        let err = ValidationError::Duplicate {
            value: "5".into(),
            position: 2,
        };
        assert_eq!(err.to_string(), "Duplicate element 5 at position 2");
    }
}
