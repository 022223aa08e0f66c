// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Frozen struct schemas and constructor signatures.

use crate::config::StructOptions;
use crate::error::{BindError, Error};
use crate::field::FieldDecl;
use crate::instance::StructValue;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Post-construction hook. Runs while the instance is still writable.
pub type InitHook = Arc<dyn Fn(&mut StructValue) -> Result<(), Error> + Send + Sync>;

/// A declared struct type: ordered fields plus the derived signature.
///
/// Built once by [`StructBuilder`](crate::StructBuilder) and shared behind
/// an `Arc`. Type identity is pointer identity.
pub struct StructType {
    name: String,
    bases: Vec<Arc<StructType>>,
    fields: Vec<Arc<FieldDecl>>,
    signature: Signature,
    options: StructOptions,
    init: Option<InitHook>,
}

impl StructType {
    pub(crate) fn new(
        name: String,
        bases: Vec<Arc<StructType>>,
        fields: Vec<Arc<FieldDecl>>,
        options: StructOptions,
        init: Option<InitHook>,
    ) -> Self {
        let signature = Signature::from_fields(&fields);
        Self {
            name,
            bases,
            fields,
            signature,
            options,
            init,
        }
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct base types, in declaration order.
    pub fn bases(&self) -> &[Arc<StructType>] {
        &self.bases
    }

    /// Schema fields, in order.
    pub fn fields(&self) -> &[Arc<FieldDecl>] {
        &self.fields
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDecl>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    /// Number of fields in the schema.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn options(&self) -> StructOptions {
        self.options
    }

    pub fn is_immutable(&self) -> bool {
        self.options.immutable
    }

    /// Post-construction hook, own or inherited.
    ///
    /// A derived type declaring its own hook can call this on a base to run
    /// the base's hook first.
    pub fn init_hook(&self) -> Option<&InitHook> {
        self.init.as_ref()
    }

    /// True if `self` is `other` or derives from it.
    pub fn is_subtype_of(&self, other: &StructType) -> bool {
        std::ptr::eq(self, other) || self.bases.iter().any(|b| b.is_subtype_of(other))
    }

    /// True if both schemas hold the same field declarations in the same order.
    pub fn same_schema(&self, other: &StructType) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    pub(crate) fn slot_of(&self, field: &FieldDecl) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| std::ptr::eq(f.as_ref(), field))
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("name", &self.name)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// One positional-or-named constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    default: Option<Value>,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Constructor signature: one parameter per field, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    fn from_fields(fields: &[Arc<FieldDecl>]) -> Self {
        let params = fields
            .iter()
            .map(|f| Param {
                name: f.name().to_string(),
                default: f.descriptor().default_value(),
            })
            .collect();
        Self { params }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Bind arguments to parameters, returning one value per parameter.
    pub fn bind(&self, args: Args) -> Result<Vec<Value>, BindError> {
        let Args { positional, named } = args;
        let expected = self.params.len();
        if positional.len() > expected {
            return Err(BindError::TooManyPositional {
                expected,
                given: positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = positional.into_iter().map(Some).collect();
        slots.resize_with(expected, || None);

        for (name, value) in named {
            let index = self
                .params
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| BindError::UnexpectedArgument(name.clone()))?;
            if slots[index].is_some() {
                return Err(BindError::MultipleValues(name));
            }
            slots[index] = Some(value);
        }

        slots
            .into_iter()
            .zip(&self.params)
            .map(|(slot, param)| {
                slot.or_else(|| param.default.clone())
                    .ok_or_else(|| BindError::MissingArgument(param.name.clone()))
            })
            .collect()
    }
}

/// Constructor arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments bound by position only.
    pub fn positional<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: Vec::new(),
        }
    }

    /// Arguments bound by name only.
    pub fn from_named<I, K, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        Self {
            positional: Vec::new(),
            named: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a named argument.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }
}
