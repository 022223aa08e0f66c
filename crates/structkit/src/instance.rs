// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct instances: construction, comparison, hashing and copying.

use crate::error::{Error, Unhashable};
use crate::field::FieldDecl;
use crate::schema::{Args, StructType};
use crate::value::{FromValue, Value};
use std::fmt;
use std::sync::Arc;

impl StructType {
    /// Construct an instance.
    ///
    /// Arguments are bound to the signature, each field is written through
    /// its descriptor in schema order, then the init hook runs. The instance
    /// is sealed only after all of that succeeds.
    pub fn construct(self: &Arc<Self>, args: Args) -> Result<StructValue, Error> {
        let bound = self
            .signature()
            .bind(args)
            .map_err(|source| Error::Construction {
                type_name: self.name().to_string(),
                source,
            })?;

        let mut inst = StructValue {
            ty: Arc::clone(self),
            values: vec![Value::None; self.len()],
            initializing: true,
        };
        for (field, value) in self.fields().iter().zip(bound) {
            field.write(&mut inst, value)?;
        }
        if let Some(hook) = self.init_hook() {
            (**hook)(&mut inst)?;
        }
        inst.initializing = false;

        log::trace!("[StructType::construct] built {}", self.name());
        Ok(inst)
    }

    /// Construct from positional values only.
    pub fn instantiate<I, T>(self: &Arc<Self>, values: I) -> Result<StructValue, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.construct(Args::positional(values))
    }
}

/// An instance of a [`StructType`].
pub struct StructValue {
    ty: Arc<StructType>,
    values: Vec<Value>,
    initializing: bool,
}

/// Clones are always sealed, even when taken inside an init hook.
impl Clone for StructValue {
    fn clone(&self) -> Self {
        Self {
            ty: Arc::clone(&self.ty),
            values: self.values.clone(),
            initializing: false,
        }
    }
}

impl StructValue {
    /// Exact runtime type.
    pub fn ty(&self) -> &Arc<StructType> {
        &self.ty
    }

    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// False while the constructor (including the init hook) is running.
    pub fn is_initialized(&self) -> bool {
        !self.initializing
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.ty.is_immutable() && !self.initializing
    }

    pub(crate) fn slot(&self, index: usize) -> &Value {
        &self.values[index]
    }

    pub(crate) fn store(&mut self, index: usize, value: Value) {
        self.values[index] = value;
    }

    fn field_decl(&self, name: &str) -> Result<&Arc<FieldDecl>, Error> {
        self.ty.field(name).ok_or_else(|| Error::UnknownField {
            type_name: self.type_name().to_string(),
            field: name.to_string(),
        })
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Result<&Value, Error> {
        self.field_decl(name)?.read(Some(self))
    }

    /// Get a field value converted to `T`.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T, Error> {
        Ok(T::from_value(self.get(name)?)?)
    }

    /// Set a field value by name, through the field's descriptor.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let ty = Arc::clone(&self.ty);
        let field = ty.field(name).ok_or_else(|| Error::UnknownField {
            type_name: ty.name().to_string(),
            field: name.to_string(),
        })?;
        field.write(self, value.into())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field values in schema order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// (name, value) pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.ty
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(&self.values)
    }

    /// Ordered snapshot of the fields.
    pub fn as_mapping(&self) -> FieldMap {
        FieldMap {
            entries: self
                .fields()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }

    /// New instance of the same type with some fields replaced.
    ///
    /// Goes through the ordinary constructor, so validation and the init
    /// hook apply to the copy. Unknown names fail construction.
    pub fn with_changes<I, K, V>(&self, changes: I) -> Result<StructValue, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut named: Vec<(String, Value)> = self.as_mapping().into_iter().collect();
        for (name, value) in changes {
            let name = name.into();
            let value = value.into();
            match named.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = value,
                None => named.push((name, value)),
            }
        }
        self.ty.construct(Args::from_named(named))
    }

    /// XOR fold of the per-field hashes.
    ///
    /// Only immutable, fully constructed instances are hashable. The fold is
    /// order-insensitive, so permuted field hashes collide.
    pub fn try_hash(&self) -> Result<u64, Error> {
        if !self.ty.is_immutable() {
            return Err(Unhashable::MutableStruct(self.type_name().to_string()).into());
        }
        if self.initializing {
            return Err(Unhashable::UninitializedStruct(self.type_name().to_string()).into());
        }
        self.ty
            .fields()
            .iter()
            .zip(&self.values)
            .try_fold(0u64, |acc, (field, value)| -> Result<u64, Error> {
                Ok(acc ^ field.descriptor().hash_value(value)?)
            })
    }

    /// Exact type plus field values, enough to rebuild through the constructor.
    pub fn reduce(&self) -> Reduced {
        Reduced {
            ty: Arc::clone(&self.ty),
            values: self.values.clone(),
        }
    }

    fn fmt_with<F>(&self, f: &mut fmt::Formatter<'_>, render: F) -> fmt::Result
    where
        F: Fn(&Value, &mut fmt::Formatter<'_>) -> fmt::Result,
    {
        write!(f, "{}(", self.type_name())?;
        for (i, (name, value)) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}=")?;
            render(value, f)?;
        }
        f.write_str(")")
    }
}

/// Instances compare equal when one type derives from (or is) the other,
/// both share the same schema, and every field's descriptor agrees.
impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        let related = self.ty.is_subtype_of(&other.ty) || other.ty.is_subtype_of(&self.ty);
        if !related || !self.ty.same_schema(&other.ty) {
            return false;
        }
        self.ty
            .fields()
            .iter()
            .zip(self.values.iter().zip(&other.values))
            .all(|(field, (a, b))| field.descriptor().values_equal(a, b))
    }
}

impl fmt::Debug for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, |v, f| fmt::Debug::fmt(v, f))
    }
}

impl fmt::Display for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, |v, f| fmt::Display::fmt(v, f))
    }
}

impl<'a> IntoIterator for &'a StructValue {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Ordered name to value mapping taken from an instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, Value)>,
}

impl FieldMap {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Reduced form of an instance: its exact type and field values.
#[derive(Debug, Clone)]
pub struct Reduced {
    pub ty: Arc<StructType>,
    pub values: Vec<Value>,
}

impl Reduced {
    /// Rebuild through the ordinary constructor, so the init hook reruns.
    pub fn reconstruct(self) -> Result<StructValue, Error> {
        self.ty.construct(Args::positional(self.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StructBuilder;
    use crate::error::BindError;
    use crate::field::Field;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn point() -> Arc<StructType> {
        StructBuilder::new("Point")
            .field("x", &Field)
            .field("y", &Field)
            .build()
            .expect("build Point")
    }

    #[test]
    fn test_construct_positional_and_named() {
        let ty = point();
        let p = ty.construct(Args::new().arg(1).named("y", 2)).unwrap();
        assert_eq!(p.get("x").unwrap(), &Value::Int(1));
        assert_eq!(p.get_as::<i64>("y").unwrap(), 2);
        assert!(p.is_initialized());
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_construction_error_names_type() {
        let ty = point();
        let err = ty.instantiate([1]).unwrap_err();
        match err {
            Error::Construction { type_name, source } => {
                assert_eq!(type_name, "Point");
                assert_eq!(source, BindError::MissingArgument("y".into()));
            }
            other => panic!("Expected construction error, got {other:?}"),
        }
    }

    #[test]
    fn test_immutable_rejects_writes() {
        let mut p = point().instantiate([1, 2]).unwrap();
        let err = p.set("x", 5).unwrap_err();
        assert!(matches!(err, Error::ImmutableMutation { ref field, .. } if field == "x"));
        assert_eq!(p.get("x").unwrap(), &Value::Int(1));
    }

    #[test]
    fn test_mutable_accepts_writes() {
        let ty = StructBuilder::new("Cell")
            .mutable()
            .field("v", &Field)
            .build()
            .unwrap();
        let mut c = ty.instantiate([1]).unwrap();
        c.set("v", 7).unwrap();
        assert_eq!(c.get("v").unwrap(), &Value::Int(7));
    }

    #[test]
    fn test_unknown_field() {
        let mut p = point().instantiate([1, 2]).unwrap();
        assert!(matches!(p.get("z"), Err(Error::UnknownField { .. })));
        assert!(matches!(p.set("z", 1), Err(Error::UnknownField { .. })));
    }

    #[test]
    fn test_field_decl_from_other_schema() {
        let other = point();
        let p = point().instantiate([1, 2]).unwrap();
        let err = other.fields()[0].read(Some(&p)).unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_hash_rules() {
        let p = point()
            .instantiate([Value::Int(1), Value::from("a")])
            .unwrap();
        assert_eq!(p.try_hash().unwrap(), p.try_hash().unwrap());
        assert_eq!(p, p.clone());

        let ty = StructBuilder::new("Cell")
            .mutable()
            .field("v", &Field)
            .build()
            .unwrap();
        let c = ty.instantiate([1]).unwrap();
        assert!(matches!(
            c.try_hash(),
            Err(Error::Hashability(Unhashable::MutableStruct(_)))
        ));
    }

    #[test]
    fn test_hash_is_xor_of_field_hashes() {
        let p = point().instantiate([1, 2]).unwrap();
        let expected = Value::Int(1).try_hash().unwrap() ^ Value::Int(2).try_hash().unwrap();
        assert_eq!(p.try_hash().unwrap(), expected);

        // order-insensitive fold
        let q = point().instantiate([2, 1]).unwrap();
        assert_eq!(p.try_hash().unwrap(), q.try_hash().unwrap());
        assert_ne!(p, q);
    }

    #[test]
    fn test_hash_with_unhashable_field() {
        let p = point().instantiate([Value::list([1]), Value::Int(2)]).unwrap();
        assert!(matches!(
            p.try_hash(),
            Err(Error::Hashability(Unhashable::Value("list")))
        ));
    }

    #[test]
    fn test_init_hook_runs_before_seal() {
        let ty = StructBuilder::new("Name")
            .field("name", &Field)
            .on_init(|s| {
                assert!(!s.is_initialized());
                assert!(matches!(
                    s.try_hash(),
                    Err(Error::Hashability(Unhashable::UninitializedStruct(_)))
                ));
                let upper = s.get_as::<String>("name")?.to_uppercase();
                s.set("name", upper)
            })
            .build()
            .unwrap();

        let n = ty.instantiate(["ada"]).unwrap();
        assert_eq!(n.get_as::<String>("name").unwrap(), "ADA");
        assert!(n.try_hash().is_ok());
    }

    #[test]
    fn test_init_hook_failure_propagates() {
        let ty = StructBuilder::new("Positive")
            .field("n", &Field)
            .on_init(|s| match s.get_as::<i64>("n")? {
                n if n > 0 => Ok(()),
                n => Err(Error::Init(format!("{n} is not positive"))),
            })
            .build()
            .unwrap();

        assert!(ty.instantiate([1]).is_ok());
        let err = ty.instantiate([-1]).unwrap_err();
        assert_eq!(err.to_string(), "initialization failed: -1 is not positive");
    }

    #[test]
    fn test_clone_taken_during_init_is_sealed() {
        let escaped: Arc<parking_lot::Mutex<Option<StructValue>>> = Arc::default();
        let sink = Arc::clone(&escaped);
        let ty = StructBuilder::new("Leaky")
            .field("x", &Field)
            .on_init(move |s| {
                *sink.lock() = Some(s.clone());
                Ok(())
            })
            .build()
            .unwrap();

        let original = ty.instantiate([1]).unwrap();
        let mut copy = escaped.lock().take().unwrap();

        assert!(copy.is_initialized());
        assert!(matches!(
            copy.set("x", 99),
            Err(Error::ImmutableMutation { .. })
        ));
        assert_eq!(copy, original);
        assert_eq!(copy.try_hash().unwrap(), original.try_hash().unwrap());
    }

    #[test]
    fn test_formatting() {
        let p = point().instantiate([Value::Int(1), Value::from("a")]).unwrap();
        assert_eq!(format!("{p:?}"), "Point(x=1, y=\"a\")");
        assert_eq!(p.to_string(), "Point(x=1, y=a)");

        let f = point().instantiate([Value::Float(1.0), Value::Bool(true)]).unwrap();
        assert_eq!(f.to_string(), "Point(x=1.0, y=true)");
        assert_eq!(format!("{f:?}"), "Point(x=1.0, y=true)");
    }

    #[test]
    fn test_as_mapping_and_iteration() {
        let p = point().instantiate([3, 4]).unwrap();
        let map = p.as_mapping();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["x", "y"]);
        assert_eq!(map.get("y"), Some(&Value::Int(4)));
        assert_eq!(
            (&p).into_iter().cloned().collect::<Vec<_>>(),
            vec![Value::Int(3), Value::Int(4)]
        );
    }

    #[test]
    fn test_with_changes() {
        let p = point().instantiate([1, 2]).unwrap();
        assert_eq!(p.with_changes(Vec::<(&str, Value)>::new()).unwrap(), p);

        let q = p.with_changes([("y", 5)]).unwrap();
        assert_eq!(q.get("x").unwrap(), &Value::Int(1));
        assert_eq!(q.get("y").unwrap(), &Value::Int(5));

        let err = p.with_changes([("z", 5)]).unwrap_err();
        assert!(matches!(
            err,
            Error::Construction {
                source: BindError::UnexpectedArgument(_),
                ..
            }
        ));
    }

    #[test]
    fn test_reduce_reruns_init() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let ty = StructBuilder::new("Tracked")
            .field("v", &Field)
            .on_init(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .build()
            .unwrap();

        let t = ty.instantiate([1]).unwrap();
        let reduced = t.reduce();
        assert!(Arc::ptr_eq(&reduced.ty, &ty));
        let back = reduced.reconstruct().unwrap();
        assert_eq!(back, t);
        assert!(back.is_initialized());
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
