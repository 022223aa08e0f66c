// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic field values.

use crate::error::{Error, Unhashable, ValidationError};
use crate::instance::StructValue;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A value stored in a struct field.
///
/// `bool` is a subtype of `int`: `Bool(true) == Int(1)`, and the two hash alike.
#[derive(Clone)]
pub enum Value {
    /// Absent value; accepted by optional typed fields.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Immutable ordered snapshot.
    Tuple(Vec<Value>),
    /// Caller-owned ordered sequence.
    List(Vec<Value>),
    /// One-shot iterator with no known length.
    Generator(Generator),
    /// Nested struct instance.
    Struct(StructValue),
}

impl Value {
    /// Build a tuple value.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a list value.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Wrap an iterator as a lazily consumed generator value.
    pub fn generator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self::Generator(Generator::new(iter))
    }

    /// Runtime type name, as used in validation messages.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Struct(s) => s.type_name(),
            other => other.kind_name(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Generator(_) => "generator",
            Self::Struct(_) => "struct",
        }
    }

    /// Check if value is the absent sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of a tuple or list.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(items) | Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Natural hash of the value.
    ///
    /// Lists are unhashable; nested structs follow [`StructValue::try_hash`].
    pub fn try_hash(&self) -> Result<u64, Error> {
        let mut hasher = DefaultHasher::new();
        self.hash_into(&mut hasher)?;
        Ok(hasher.finish())
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) -> Result<(), Error> {
        // bool hashes as the equal int
        match self {
            Self::Bool(_) => std::mem::discriminant(&Self::Int(0)).hash(state),
            other => std::mem::discriminant(other).hash(state),
        }
        match self {
            Self::None => {}
            Self::Bool(v) => i64::from(*v).hash(state),
            Self::Int(v) => v.hash(state),
            // 0.0 == -0.0, so both must hash alike
            Self::Float(v) => {
                let bits = if *v == 0.0 { 0 } else { v.to_bits() };
                bits.hash(state);
            }
            Self::Str(v) => v.hash(state),
            Self::Tuple(items) => {
                items.len().hash(state);
                for item in items {
                    item.hash_into(state)?;
                }
            }
            Self::List(_) => return Err(Unhashable::Value("list").into()),
            Self::Generator(g) => g.addr().hash(state),
            Self::Struct(s) => s.try_hash()?.hash(state),
        }
        Ok(())
    }
}

fn write_items(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: &[Value],
    trailing_single: bool,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item:?}")?;
    }
    if trailing_single && items.len() == 1 {
        f.write_str(",")?;
    }
    f.write_str(close)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Int(i), Self::Bool(b)) | (Self::Bool(b), Self::Int(i)) => *i == i64::from(*b),
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) | (Self::List(a), Self::List(b)) => a == b,
            (Self::Generator(a), Self::Generator(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::Tuple(items) => write_items(f, "(", ")", items, true),
            Self::List(items) => write_items(f, "[", "]", items, false),
            Self::Generator(g) => fmt::Debug::fmt(g, f),
            Self::Struct(s) => fmt::Debug::fmt(s, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(v) => f.write_str(v),
            Self::Struct(s) => fmt::Display::fmt(s, f),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

type BoxedIter = Box<dyn Iterator<Item = Value> + Send>;

/// Shared one-shot iterator.
///
/// Clones share the same underlying iterator, so consuming one consumes all.
#[derive(Clone)]
pub struct Generator {
    inner: Arc<Mutex<BoxedIter>>,
}

impl Generator {
    pub fn new<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(iter.into_iter()))),
        }
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner).cast::<()>() as usize
    }
}

impl Iterator for Generator {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.inner.lock().next()
    }
}

impl PartialEq for Generator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<generator>")
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<StructValue> for Value {
    fn from(v: StructValue) -> Self {
        Self::Struct(v)
    }
}

impl From<Generator> for Value {
    fn from(v: Generator) -> Self {
        Self::Generator(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}

/// Typed extraction from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ValidationError>;
}

fn mismatch(expected: &str, value: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name().to_string(),
    }
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, ValidationError> {
                match value {
                    Value::$variant(v) => Ok(v.clone()),
                    other => Err(mismatch($name, other)),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(i64, Int, "int");
impl_from_value!(f64, Float, "float");
impl_from_value!(String, Str, "str");
impl_from_value!(StructValue, Struct, "struct");

impl FromValue for Vec<Value> {
    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        value
            .as_slice()
            .map(<[Value]>::to_vec)
            .ok_or_else(|| mismatch("sequence", value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::None => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        Ok(value.clone())
    }
}
