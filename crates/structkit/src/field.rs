// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field descriptors and name-bound field declarations.

use crate::error::Error;
use crate::instance::StructValue;
use crate::value::Value;
use std::fmt;

/// Per-field read/write/equality/hash policy.
///
/// Implementations may validate or coerce on write, and may replace the
/// equality and hash used for structural comparison. A descriptor passed
/// to a builder is a template: the builder stores a [`copy`](Self::copy)
/// so one template never shares state across the sites that use it.
pub trait Descriptor: fmt::Debug + Send + Sync {
    /// Validate or coerce a value before it is stored.
    fn coerce(&self, value: Value) -> Result<Value, Error> {
        Ok(value)
    }

    /// Value bound when the constructor omits this field.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Compare two values of this field.
    fn values_equal(&self, a: &Value, b: &Value) -> bool {
        a == b
    }

    /// Hash a value of this field.
    fn hash_value(&self, value: &Value) -> Result<u64, Error> {
        value.try_hash()
    }

    /// Fresh, independent descriptor of the same kind.
    fn copy(&self) -> Box<dyn Descriptor>;
}

/// Plain field: stores any value, natural equality and hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Field;

impl Field {
    pub const fn new() -> Self {
        Self
    }
}

impl Descriptor for Field {
    fn copy(&self) -> Box<dyn Descriptor> {
        Box::new(*self)
    }
}

/// A descriptor bound to a field name within a struct schema.
pub struct FieldDecl {
    name: String,
    descriptor: Box<dyn Descriptor>,
}

impl FieldDecl {
    pub(crate) fn bind(name: impl Into<String>, template: &dyn Descriptor) -> Self {
        Self {
            name: name.into(),
            descriptor: template.copy(),
        }
    }

    pub(crate) fn from_boxed(name: impl Into<String>, descriptor: Box<dyn Descriptor>) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound descriptor.
    pub fn descriptor(&self) -> &dyn Descriptor {
        self.descriptor.as_ref()
    }

    /// Read this field from `owner`.
    ///
    /// `None` models access through the type rather than an instance, which
    /// has no value to return.
    pub fn read<'a>(&self, owner: Option<&'a StructValue>) -> Result<&'a Value, Error> {
        let owner = owner.ok_or_else(|| Error::UnreadableField {
            field: self.name.clone(),
        })?;
        let slot = self.slot_in(owner)?;
        Ok(owner.slot(slot))
    }

    /// Write this field on `target` through the descriptor.
    ///
    /// Fails once construction has finished on an immutable type.
    pub fn write(&self, target: &mut StructValue, value: Value) -> Result<(), Error> {
        if target.is_frozen() {
            log::trace!(
                "[FieldDecl::write] rejected write to {}.{}",
                target.type_name(),
                self.name
            );
            return Err(Error::ImmutableMutation {
                type_name: target.type_name().to_string(),
                field: self.name.clone(),
            });
        }
        let slot = self.slot_in(target)?;
        let value = self.descriptor.coerce(value)?;
        target.store(slot, value);
        Ok(())
    }

    fn slot_in(&self, owner: &StructValue) -> Result<usize, Error> {
        owner
            .ty()
            .slot_of(self)
            .ok_or_else(|| Error::UnknownField {
                type_name: owner.type_name().to_string(),
                field: self.name.clone(),
            })
    }
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}
