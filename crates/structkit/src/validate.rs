// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type predicates used by typed fields.
//!
//! Both checks report a [`ValidationError`] describing exactly what was
//! expected and what was found, rather than a bare boolean.

use crate::error::ValidationError;
use crate::schema::StructType;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Element type accepted by a typed field.
#[derive(Clone)]
pub enum FieldType {
    /// Any value.
    Any,
    Bool,
    /// Integers; booleans count as integers.
    Int,
    Float,
    Str,
    Tuple,
    List,
    /// Instances of the struct type or any type deriving from it.
    Struct(Arc<StructType>),
}

impl FieldType {
    /// Name used in validation messages.
    pub fn name(&self) -> &str {
        match self {
            Self::Any => "object",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Tuple => "tuple",
            Self::List => "list",
            Self::Struct(ty) => ty.name(),
        }
    }

    /// Subtype-inclusive membership test.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _)
            | (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_) | Value::Bool(_))
            | (Self::Float, Value::Float(_))
            | (Self::Str, Value::Str(_))
            | (Self::Tuple, Value::Tuple(_))
            | (Self::List, Value::List(_)) => true,
            (Self::Struct(ty), Value::Struct(s)) => s.ty().is_subtype_of(ty),
            _ => false,
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Struct(a), Self::Struct(b)) => Arc::ptr_eq(a, b),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

/// Check that `value` has type `expected` (or a subtype of it).
pub fn check_type(value: &Value, expected: &FieldType) -> Result<(), ValidationError> {
    if expected.accepts(value) {
        return Ok(());
    }
    Err(ValidationError::TypeMismatch {
        expected: expected.name().to_string(),
        got: value.type_name().to_string(),
    })
}

/// Check that `value` is a proper sequence whose elements all have type
/// `element`, returning the elements on success.
///
/// Strings are not sequences of characters here, and generators are
/// rejected before any element is pulled from them.
pub fn check_sequence<'a>(
    value: &'a Value,
    element: &FieldType,
    no_duplicates: bool,
) -> Result<&'a [Value], ValidationError> {
    let expected = || element.name().to_string();

    let items = match value {
        Value::Tuple(items) | Value::List(items) => items,
        Value::Str(_) => {
            return Err(ValidationError::BareString {
                expected: expected(),
            })
        }
        Value::Generator(_) => {
            return Err(ValidationError::NotLengthBearing {
                expected: expected(),
                got: value.type_name().to_string(),
            })
        }
        other => {
            return Err(ValidationError::NotASequence {
                expected: expected(),
                got: other.type_name().to_string(),
            })
        }
    };

    if let Some((position, item)) = items
        .iter()
        .enumerate()
        .find(|(_, item)| !element.accepts(item))
    {
        return Err(ValidationError::ElementMismatch {
            expected: expected(),
            got: item.type_name().to_string(),
            position,
        });
    }

    if no_duplicates {
        if let Some(position) = first_duplicate(items) {
            return Err(ValidationError::Duplicate {
                value: items[position].to_string(),
                position,
            });
        }
    }

    Ok(items)
}

// Position of the second occurrence of the first repeated element.
// Equality only, so unhashable elements are supported.
fn first_duplicate(items: &[Value]) -> Option<usize> {
    (1..items.len()).find(|&i| items[..i].contains(&items[i]))
}
