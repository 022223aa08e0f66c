// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fields that validate values against a declared element type.

use crate::error::Error;
use crate::field::Descriptor;
use crate::validate::{check_sequence, check_type, FieldType};
use crate::value::Value;

/// A field whose writes are checked against an element type.
///
/// Scalar by default. As a sequence, the stored value is an immutable
/// tuple snapshot of the caller's elements, not the caller's container.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedField {
    element: FieldType,
    sequence: bool,
    no_duplicates: bool,
    optional: bool,
}

impl TypedField {
    /// Scalar field of type `element`.
    pub fn new(element: FieldType) -> Self {
        Self {
            element,
            sequence: false,
            no_duplicates: false,
            optional: false,
        }
    }

    /// Sequence of `element`.
    pub fn sequence_of(element: FieldType) -> Self {
        Self::new(element).sequence()
    }

    /// Require a sequence of the element type.
    pub fn sequence(mut self) -> Self {
        self.sequence = true;
        self
    }

    /// Reject repeated elements. Only meaningful for sequences.
    pub fn no_duplicates(mut self) -> Self {
        self.no_duplicates = true;
        self
    }

    /// Accept [`Value::None`] without validation; it is also the default.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn element(&self) -> &FieldType {
        &self.element
    }

    pub fn is_sequence(&self) -> bool {
        self.sequence
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn rejects_duplicates(&self) -> bool {
        self.no_duplicates
    }
}

impl Default for TypedField {
    fn default() -> Self {
        Self::new(FieldType::Any)
    }
}

impl Descriptor for TypedField {
    fn coerce(&self, value: Value) -> Result<Value, Error> {
        if self.optional && value.is_none() {
            return Ok(value);
        }
        if !self.sequence {
            check_type(&value, &self.element)?;
            return Ok(value);
        }
        check_sequence(&value, &self.element, self.no_duplicates)?;
        match value {
            Value::List(items) => Ok(Value::Tuple(items)),
            other => Ok(other),
        }
    }

    fn default_value(&self) -> Option<Value> {
        self.optional.then_some(Value::None)
    }

    fn copy(&self) -> Box<dyn Descriptor> {
        Box::new(self.clone())
    }
}
