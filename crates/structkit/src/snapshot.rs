// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializable snapshots of struct instances.
//!
//! A [`Snapshot`] carries the type name and the field values in schema
//! order. Reviving one resolves the name through a [`TypeRegistry`] and
//! calls the ordinary constructor, so validation and init hooks run again.

use crate::error::Error;
use crate::instance::{Reduced, StructValue};
use crate::schema::StructType;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry that resolves struct type names during revival.
pub trait TypeRegistry {
    /// Look up a struct type by name.
    ///
    /// Returns `None` if the name is unknown.
    fn lookup(&self, name: &str) -> Option<Arc<StructType>>;
}

/// Simple [`HashMap`]-backed [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct HashMapTypeRegistry {
    types: HashMap<String, Arc<StructType>>,
}

impl HashMapTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its name, returning any type it replaces.
    pub fn register(&mut self, ty: &Arc<StructType>) -> Option<Arc<StructType>> {
        self.types.insert(ty.name().to_string(), Arc::clone(ty))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for HashMapTypeRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<StructType>> {
        let found = self.types.get(name).cloned();
        if found.is_none() {
            log::trace!("[HashMapTypeRegistry::lookup] unknown type {}", name);
        }
        found
    }
}

/// Serialized form of a [`StructValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "type")]
    pub type_name: String,
    pub values: Vec<SnapshotValue>,
}

/// Serialized form of a [`Value`]. Generators have none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SnapshotValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<SnapshotValue>),
    List(Vec<SnapshotValue>),
    Struct(Snapshot),
}

impl SnapshotValue {
    fn capture(value: &Value) -> Result<Self, Error> {
        Ok(match value {
            Value::None => Self::None,
            Value::Bool(v) => Self::Bool(*v),
            Value::Int(v) => Self::Int(*v),
            Value::Float(v) => Self::Float(*v),
            Value::Str(v) => Self::Str(v.clone()),
            Value::Tuple(items) => Self::Tuple(capture_all(items)?),
            Value::List(items) => Self::List(capture_all(items)?),
            Value::Struct(s) => Self::Struct(s.snapshot()?),
            Value::Generator(_) => return Err(Error::Unserializable("generator")),
        })
    }

    fn restore<R: TypeRegistry + ?Sized>(&self, registry: &R) -> Result<Value, Error> {
        Ok(match self {
            Self::None => Value::None,
            Self::Bool(v) => Value::Bool(*v),
            Self::Int(v) => Value::Int(*v),
            Self::Float(v) => Value::Float(*v),
            Self::Str(v) => Value::Str(v.clone()),
            Self::Tuple(items) => Value::Tuple(restore_all(items, registry)?),
            Self::List(items) => Value::List(restore_all(items, registry)?),
            Self::Struct(s) => Value::Struct(s.revive(registry)?),
        })
    }
}

fn capture_all(items: &[Value]) -> Result<Vec<SnapshotValue>, Error> {
    items.iter().map(SnapshotValue::capture).collect()
}

fn restore_all<R: TypeRegistry + ?Sized>(
    items: &[SnapshotValue],
    registry: &R,
) -> Result<Vec<Value>, Error> {
    items.iter().map(|item| item.restore(registry)).collect()
}

impl Snapshot {
    /// Rebuild the instance through its type's constructor.
    pub fn revive<R: TypeRegistry + ?Sized>(&self, registry: &R) -> Result<StructValue, Error> {
        let ty = registry
            .lookup(&self.type_name)
            .ok_or_else(|| Error::UnknownType(self.type_name.clone()))?;
        let values = restore_all(&self.values, registry)?;
        Reduced { ty, values }.reconstruct()
    }
}

impl StructValue {
    /// Capture the instance as a serializable snapshot.
    pub fn snapshot(&self) -> Result<Snapshot, Error> {
        Ok(Snapshot {
            type_name: self.type_name().to_string(),
            values: capture_all(self.values())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StructBuilder;
    use crate::field::Field;
    use crate::typed::TypedField;
    use crate::validate::FieldType;

    fn registry_with_point() -> (HashMapTypeRegistry, Arc<StructType>) {
        let point = StructBuilder::new("Point")
            .field("x", &TypedField::new(FieldType::Int))
            .field("tags", &TypedField::sequence_of(FieldType::Str))
            .build()
            .unwrap();
        let mut registry = HashMapTypeRegistry::new();
        assert!(registry.register(&point).is_none());
        (registry, point)
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let (registry, point) = registry_with_point();
        let p = point
            .instantiate([Value::Int(3), Value::list(["a", "b"])])
            .unwrap();

        let snap = p.snapshot().unwrap();
        assert_eq!(snap.type_name, "Point");
        assert_eq!(
            snap.values[1],
            SnapshotValue::Tuple(vec![
                SnapshotValue::Str("a".into()),
                SnapshotValue::Str("b".into())
            ])
        );

        let back = snap.revive(&registry).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_unknown_type() {
        let (_, point) = registry_with_point();
        let p = point.instantiate([Value::Int(1), Value::tuple(["a"])]).unwrap();
        let empty = HashMapTypeRegistry::new();
        let err = p.snapshot().unwrap().revive(&empty).unwrap_err();
        assert!(matches!(err, Error::UnknownType(ref name) if name == "Point"));
    }

    #[test]
    fn test_generator_not_serializable() {
        let ty = StructBuilder::new("Holder")
            .field("g", &Field)
            .build()
            .unwrap();
        let h = ty.instantiate([Value::generator(Vec::new())]).unwrap();
        assert!(matches!(
            h.snapshot(),
            Err(Error::Unserializable("generator"))
        ));
    }

    #[test]
    fn test_revive_validates_again() {
        let (registry, _) = registry_with_point();
        let forged = Snapshot {
            type_name: "Point".into(),
            values: vec![SnapshotValue::Str("x".into()), SnapshotValue::List(vec![])],
        };
        assert!(matches!(
            forged.revive(&registry),
            Err(Error::Validation(_))
        ));
    }
}
