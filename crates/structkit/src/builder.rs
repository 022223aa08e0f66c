// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for struct types.

use crate::config::{StructOptions, DEFAULT_IMMUTABLE};
use crate::error::Error;
use crate::field::{Descriptor, FieldDecl};
use crate::instance::StructValue;
use crate::schema::{InitHook, StructType};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Builder for declaring a [`StructType`].
///
/// Fields are kept in declaration order. With
/// [`inherit_fields`](Self::inherit_fields), each base's fields are
/// prepended left to right. The resulting schema is frozen by [`build`](Self::build).
pub struct StructBuilder {
    name: String,
    bases: Vec<Arc<StructType>>,
    fields: Vec<FieldDecl>,
    immutable: Option<bool>,
    inherit_fields: bool,
    init: Option<InitHook>,
}

impl StructBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            immutable: None,
            inherit_fields: StructOptions::default().inherit_fields,
            init: None,
        }
    }

    /// Add a base type.
    pub fn base(mut self, base: &Arc<StructType>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Add a field from a descriptor template (copied, never shared).
    pub fn field(mut self, name: impl Into<String>, descriptor: &dyn Descriptor) -> Self {
        self.fields.push(FieldDecl::bind(name, descriptor));
        self
    }

    /// Add a field using the descriptor kind's default configuration.
    pub fn field_default<D>(mut self, name: impl Into<String>) -> Self
    where
        D: Descriptor + Default + 'static,
    {
        self.fields
            .push(FieldDecl::from_boxed(name, Box::new(D::default())));
        self
    }

    pub fn immutable(mut self, immutable: bool) -> Self {
        self.immutable = Some(immutable);
        self
    }

    /// Shorthand for `immutable(false)`.
    pub fn mutable(self) -> Self {
        self.immutable(false)
    }

    /// Merge base type fields ahead of this type's own.
    pub fn inherit_fields(mut self, inherit: bool) -> Self {
        self.inherit_fields = inherit;
        self
    }

    pub fn options(mut self, options: StructOptions) -> Self {
        self.immutable = Some(options.immutable);
        self.inherit_fields = options.inherit_fields;
        self
    }

    /// Run `hook` after fields are written, before the instance is sealed.
    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut StructValue) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(hook));
        self
    }

    /// Freeze the schema.
    pub fn build(self) -> Result<Arc<StructType>, Error> {
        if self.fields.iter().any(|f| f.name().is_empty()) {
            return Err(Error::EmptyFieldName {
                type_name: self.name,
            });
        }

        let mut fields: Vec<Arc<FieldDecl>> = Vec::new();
        if self.inherit_fields {
            for base in &self.bases {
                fields.extend(base.fields().iter().cloned());
            }
        }
        fields.extend(self.fields.into_iter().map(Arc::new));

        let names = collisions(&fields);
        if !names.is_empty() {
            log::debug!(
                "[StructBuilder::build] {} has colliding field(s): {:?}",
                self.name,
                names
            );
            return Err(Error::SchemaCollision {
                type_name: self.name,
                names,
            });
        }

        // immutability is inherited from the first base, inherit_fields is not
        let immutable = self
            .immutable
            .or_else(|| self.bases.first().map(|b| b.is_immutable()))
            .unwrap_or(DEFAULT_IMMUTABLE);
        let init = self
            .init
            .or_else(|| self.bases.iter().find_map(|b| b.init_hook().cloned()));
        let options = StructOptions {
            immutable,
            inherit_fields: self.inherit_fields,
        };

        log::debug!(
            "[StructBuilder::build] registered {} with {} field(s)",
            self.name,
            fields.len()
        );
        Ok(Arc::new(StructType::new(
            self.name,
            self.bases,
            fields,
            options,
            init,
        )))
    }
}

// Every name appearing more than once, in first-appearance order.
fn collisions(fields: &[Arc<FieldDecl>]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for field in fields {
        *counts.entry(field.name()).or_default() += 1;
    }
    let mut reported = HashSet::new();
    fields
        .iter()
        .map(|f| f.name())
        .filter(|name| counts[name] > 1 && reported.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Declare a struct type from `name: descriptor` pairs.
///
/// ```rust
/// use structkit::{struct_type, Field, FieldType, TypedField};
///
/// let point = struct_type!(Point {
///     x: TypedField::new(FieldType::Int),
///     y: TypedField::new(FieldType::Int),
///     label: Field,
/// })
/// .unwrap();
/// assert_eq!(point.len(), 3);
///
/// let counter = struct_type!(mut Counter { count: Field }).unwrap();
/// assert!(!counter.is_immutable());
/// ```
#[macro_export]
macro_rules! struct_type {
    (mut $name:ident { $($field:ident : $desc:expr),* $(,)? }) => {
        $crate::StructBuilder::new(stringify!($name))
            .mutable()
            $(.field(stringify!($field), &$desc))*
            .build()
    };
    ($name:ident { $($field:ident : $desc:expr),* $(,)? }) => {
        $crate::StructBuilder::new(stringify!($name))
            $(.field(stringify!($field), &$desc))*
            .build()
    };
}
